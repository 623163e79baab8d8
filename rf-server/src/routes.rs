use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use rf::basic_models::{
    AllergyFilterRequest, AllergyFilterResult, GenerationRequest, RecipeResult,
    SubstitutionRequest, SubstitutionResult,
};
use rf_client::Pipeline;
use serde_json::{json, Value};

use crate::config::CorsConfig;
use crate::errors::{WebError, WebResult};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
}

/// Build the whole application: routes, state and middleware.
pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        // `GET /` and `GET /health` go to `health`
        .route("/", get(health))
        .route("/health", get(health))
        // `POST /generate-recipe` goes to `generate_recipe`
        .route("/generate-recipe", post(generate_recipe))
        // `POST /ingredient-substitutions` goes to `ingredient_substitutions`
        .route("/ingredient-substitutions", post(ingredient_substitutions))
        // `POST /filter-recipes-by-allergy` goes to `filter_recipes_by_allergy`
        .route("/filter-recipes-by-allergy", post(filter_recipes_by_allergy))
        .fallback(not_found)
        .layer(cors.layer())
        .layer(
            tower_http::compression::CompressionLayer::new()
                .quality(tower_http::CompressionLevel::Fastest),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

// Just reply that everything is okay
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> WebError {
    WebError::NotFound
}

/// The pipeline never rejects anything, so empty ingredient lists are stopped here.
fn require_ingredients(ingredients: &[String]) -> WebResult<()> {
    if ingredients.iter().all(|i| i.trim().is_empty()) {
        return Err(WebError::Validation(
            "ingredients must contain at least one entry".into(),
        ));
    }
    Ok(())
}

/// Generate a recipe. Answers 200 with a fallback recipe if the LLM is unavailable.
async fn generate_recipe(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> WebResult<Json<RecipeResult>> {
    let Json(request) = payload?;
    require_ingredients(&request.ingredients)?;
    Ok(Json(state.pipeline.generate_recipe(&request).await))
}

async fn ingredient_substitutions(
    State(state): State<AppState>,
    payload: Result<Json<SubstitutionRequest>, JsonRejection>,
) -> WebResult<Json<SubstitutionResult>> {
    let Json(request) = payload?;
    require_ingredients(&request.ingredients)?;
    Ok(Json(state.pipeline.suggest_substitutions(&request).await))
}

/// Partition recipes by the user's allergies.
///
/// When the LLM can't decide, every recipe is reported safe (fail-open).
async fn filter_recipes_by_allergy(
    State(state): State<AppState>,
    payload: Result<Json<AllergyFilterRequest>, JsonRejection>,
) -> WebResult<Json<AllergyFilterResult>> {
    let Json(request) = payload?;
    Ok(Json(state.pipeline.filter_by_allergy(&request).await))
}
