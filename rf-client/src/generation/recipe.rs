use itertools::Itertools;
use rf::basic_models::{Difficulty, GenerationRequest, RecipeResult};
use serde_json::{Map, Value};

use super::{fields, template, ResponseShape};

pub const DEFAULT_TITLE: &str = "AI generated recipe";
pub const DEFAULT_SERVINGS: u32 = 2;
pub const DEFAULT_RATING: f64 = 4.5;
pub const DEFAULT_COOK_TIME_MINUTES: u32 = 30;
pub const FALLBACK_STEPS: [&str; 5] = [
    "Read through the ingredients and preheat your oven or pan if needed.",
    "Prepare all ingredients by washing, chopping and measuring.",
    "Cook the ingredients using appropriate methods (sauté, boil, bake) until done.",
    "Taste and adjust seasoning with salt, pepper and herbs.",
    "Serve warm and enjoy your AI-generated meal!",
];

/// Generate a whole recipe from a list of ingredients.
pub struct RecipeShape;

fn fresh_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn listed_or_none(items: &[String]) -> String {
    let listed = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .join(", ");
    if listed.is_empty() {
        "none".into()
    } else {
        listed
    }
}

impl ResponseShape for RecipeShape {
    type Input = GenerationRequest;
    type Output = RecipeResult;
    const NAME: &'static str = "recipe";

    fn build_prompt(request: &GenerationRequest) -> String {
        let ingredients = listed_or_none(&request.ingredients);
        let servings = request
            .servings_hint()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "none".into());
        let dietary_tags = listed_or_none(request.dietary_tags.as_deref().unwrap_or_default());
        template::fill(
            include_str!("../prompts/generate-recipe.md"),
            &[
                ("ingredients", ingredients.as_str()),
                ("title", request.title_hint().unwrap_or("none")),
                ("servings", servings.as_str()),
                ("dietary_tags", dietary_tags.as_str()),
            ],
        )
    }

    /// Fill every field from the reply where possible, then the request, then defaults.
    /// The reply's own `id`, if any, is ignored.
    fn reconcile(parsed: &Map<String, Value>, request: &GenerationRequest) -> Option<RecipeResult> {
        let fallback_title = || request.title_hint().unwrap_or(DEFAULT_TITLE).to_string();
        Some(RecipeResult {
            id: fresh_id(),
            title: fields::text(parsed, &["title"]).unwrap_or_else(fallback_title),
            ingredients: fields::text_list(parsed, &["ingredients"])
                .unwrap_or_else(|| request.ingredients.clone()),
            steps: fields::text_list(parsed, &["steps", "instructions"])
                .unwrap_or_else(fallback_steps),
            servings: fields::count(parsed, &["servings"])
                .filter(|s| *s > 0)
                .or(request.servings_hint())
                .unwrap_or(DEFAULT_SERVINGS),
            calories: fields::count(parsed, &["calories"]),
            cook_time_minutes: fields::count(parsed, &["cookTimeMinutes", "cook_time_minutes"]),
            difficulty: fields::text(parsed, &["difficulty"])
                .and_then(|d| d.parse().ok())
                .unwrap_or_default(),
            rating: Some(
                fields::number_within(parsed, &["rating"], 1.0, 5.0).unwrap_or(DEFAULT_RATING),
            ),
            tags: fields::text_list(parsed, &["tags"])
                .or_else(|| request.dietary_tags.clone())
                .unwrap_or_default(),
            image_url: fields::text(parsed, &["imageUrl", "image_url"]),
        })
    }

    fn fallback(request: &GenerationRequest) -> RecipeResult {
        RecipeResult {
            id: fresh_id(),
            title: request.title_hint().unwrap_or(DEFAULT_TITLE).to_string(),
            ingredients: request.ingredients.clone(),
            steps: fallback_steps(),
            servings: request.servings_hint().unwrap_or(DEFAULT_SERVINGS),
            calories: None,
            cook_time_minutes: Some(DEFAULT_COOK_TIME_MINUTES),
            difficulty: Difficulty::Easy,
            rating: Some(DEFAULT_RATING),
            tags: request.dietary_tags.clone().unwrap_or_default(),
            image_url: None,
        }
    }
}

fn fallback_steps() -> Vec<String> {
    FALLBACK_STEPS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::resolve;
    use serde_json::json;

    fn request() -> GenerationRequest {
        GenerationRequest {
            title: Some("Weeknight Pasta".into()),
            ingredients: vec!["pasta".into(), "tomato".into(), "garlic".into()],
            servings: Some(4),
            dietary_tags: Some(vec!["vegetarian".into()]),
        }
    }

    fn bare_request() -> GenerationRequest {
        GenerationRequest {
            ingredients: vec!["rice".into()],
            ..Default::default()
        }
    }

    /// Everything but the id, which is always fresh
    fn without_id(mut recipe: RecipeResult) -> RecipeResult {
        recipe.id = String::new();
        recipe
    }

    #[test]
    fn prompt_mentions_the_whole_request() {
        let prompt = RecipeShape::build_prompt(&request());
        assert!(prompt.contains("pasta, tomato, garlic"));
        assert!(prompt.contains("Preferred title: Weeknight Pasta"));
        assert!(prompt.contains("Servings: 4"));
        assert!(prompt.contains("Dietary tags: vegetarian"));
        assert!(prompt.contains(r#""cookTimeMinutes""#));
        assert!(prompt.contains("code fences"));
    }

    #[test]
    fn prompt_uses_placeholders_for_missing_fields() {
        let prompt = RecipeShape::build_prompt(&bare_request());
        assert!(prompt.contains("Preferred title: none"));
        assert!(prompt.contains("Servings: none"));
        assert!(prompt.contains("Dietary tags: none"));
        assert!(!prompt.contains("{title}"));
    }

    #[test]
    fn no_reply_gives_the_fallback() {
        let recipe = resolve::<RecipeShape>(None, &request());
        assert_eq!(recipe.ingredients, request().ingredients);
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.difficulty, Difficulty::Easy);
        assert_eq!(recipe.tags, vec!["vegetarian".to_string()]);
        assert_eq!(recipe.title, "Weeknight Pasta");
        assert_eq!(recipe.steps.len(), FALLBACK_STEPS.len());
        assert_eq!(recipe.rating, Some(DEFAULT_RATING));
    }

    #[test]
    fn fallback_defaults_for_a_bare_request() {
        let recipe = resolve::<RecipeShape>(None, &bare_request());
        assert_eq!(recipe.title, DEFAULT_TITLE);
        assert_eq!(recipe.servings, DEFAULT_SERVINGS);
        assert!(recipe.tags.is_empty());
        assert_eq!(recipe.ingredients, vec!["rice".to_string()]);
    }

    #[test]
    fn garbage_reply_matches_the_fallback() {
        let from_garbage = resolve::<RecipeShape>(Some("not json at all"), &request());
        let from_nothing = resolve::<RecipeShape>(None, &request());
        assert_ne!(from_garbage.id, from_nothing.id);
        assert_eq!(without_id(from_garbage), without_id(from_nothing));
    }

    #[test]
    fn non_object_reply_matches_the_fallback() {
        let reply = r#"[{"title": "Array Soup", "steps": ["Stir"]}]"#;
        let recipe = resolve::<RecipeShape>(Some(reply), &request());
        assert_eq!(
            without_id(recipe),
            without_id(RecipeShape::fallback(&request()))
        );
    }

    #[test]
    fn full_reply_is_taken_field_by_field() {
        let reply = json!({
            "id": "model-chosen-id",
            "title": "Garlic Tomato Pasta",
            "ingredients": ["200g pasta", "3 tomatoes", "2 cloves garlic"],
            "steps": ["Boil pasta.", "Make sauce.", "Combine."],
            "servings": 3,
            "calories": 520,
            "cookTimeMinutes": 25,
            "difficulty": "medium",
            "rating": 4.2,
            "tags": ["italian", "vegetarian"],
            "imageUrl": "https://example.com/pasta.webp"
        })
        .to_string();
        let recipe = resolve::<RecipeShape>(Some(&reply), &request());
        assert_ne!(recipe.id, "model-chosen-id");
        assert!(uuid::Uuid::parse_str(&recipe.id).is_ok());
        assert_eq!(recipe.title, "Garlic Tomato Pasta");
        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.steps, vec!["Boil pasta.", "Make sauce.", "Combine."]);
        assert_eq!(recipe.servings, 3);
        assert_eq!(recipe.calories, Some(520));
        assert_eq!(recipe.cook_time_minutes, Some(25));
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert_eq!(recipe.rating, Some(4.2));
        assert_eq!(recipe.tags, vec!["italian", "vegetarian"]);
        assert_eq!(
            recipe.image_url.as_deref(),
            Some("https://example.com/pasta.webp")
        );
    }

    #[test]
    fn reply_inside_prose_equals_the_bare_reply() {
        let bare = r#"{"title": "Rice Bowl", "steps": ["Cook rice.", "Serve."], "difficulty": "hard"}"#;
        let chatty = format!("Here you go:\n{}\nEnjoy!", bare);
        let from_bare = resolve::<RecipeShape>(Some(bare), &bare_request());
        let from_chatty = resolve::<RecipeShape>(Some(&chatty), &bare_request());
        assert_eq!(without_id(from_bare), without_id(from_chatty));
    }

    #[test]
    fn partial_reply_is_completed_not_discarded() {
        let reply = r#"{"ingredients": ["rice", "egg"], "difficulty": "impossible", "rating": 11, "servings": 0}"#;
        let recipe = resolve::<RecipeShape>(Some(reply), &request());
        assert_eq!(recipe.ingredients, vec!["rice", "egg"]);
        assert_eq!(recipe.steps.len(), FALLBACK_STEPS.len());
        assert_eq!(recipe.title, "Weeknight Pasta");
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.difficulty, Difficulty::Easy);
        assert_eq!(recipe.rating, Some(DEFAULT_RATING));
        assert_eq!(recipe.tags, vec!["vegetarian"]);
        assert_eq!(recipe.cook_time_minutes, None);
    }

    #[test]
    fn snake_case_reply_fields_are_understood() {
        let reply = r#"{"cook_time_minutes": 40, "image_url": "https://example.com/x.png"}"#;
        let recipe = resolve::<RecipeShape>(Some(reply), &bare_request());
        assert_eq!(recipe.cook_time_minutes, Some(40));
        assert_eq!(recipe.image_url.as_deref(), Some("https://example.com/x.png"));
    }

    #[test]
    fn wrongly_typed_fields_fall_back() {
        let reply = r#"{"title": 12, "steps": "just cook it", "ingredients": [1, 2], "tags": "spicy"}"#;
        let recipe = resolve::<RecipeShape>(Some(reply), &bare_request());
        assert_eq!(recipe.title, DEFAULT_TITLE);
        assert_eq!(recipe.steps.len(), FALLBACK_STEPS.len());
        assert_eq!(recipe.ingredients, vec!["rice"]);
        assert!(recipe.tags.is_empty());
    }

    #[test]
    fn required_fields_are_never_empty() {
        let replies = [
            None,
            Some("not json"),
            Some("{}"),
            Some(r#"{"steps": [], "ingredients": [], "title": ""}"#),
            Some(r#"{"steps": ["", "  "]}"#),
        ];
        for reply in replies {
            let recipe = resolve::<RecipeShape>(reply, &bare_request());
            assert!(!recipe.title.is_empty(), "{:?}", reply);
            assert!(!recipe.ingredients.is_empty(), "{:?}", reply);
            assert!(!recipe.steps.is_empty(), "{:?}", reply);
            assert!(recipe.steps.iter().all(|s| !s.is_empty()), "{:?}", reply);
            assert!(recipe.servings > 0, "{:?}", reply);
        }
    }

    #[test]
    fn placeholder_shaped_input_is_embedded_verbatim() {
        let request = GenerationRequest {
            title: Some("{dietary_tags}".into()),
            ingredients: vec!["{servings}".into()],
            servings: Some(3),
            dietary_tags: Some(vec!["vegan".into()]),
        };
        let prompt = RecipeShape::build_prompt(&request);
        assert!(prompt.contains("Ingredients: {servings}"));
        assert!(prompt.contains("Preferred title: {dietary_tags}"));
        assert!(prompt.contains("Servings: 3"));
        assert!(prompt.contains("Dietary tags: vegan"));
    }

    #[test]
    fn malformed_reply_with_a_valid_inner_object_falls_back() {
        let raw = r#"{"title": "Rice Soup", "ingredients": [{"name": "rice", "calories": 200}], "steps": ["Boil."],}"#;
        let recipe = resolve::<RecipeShape>(Some(raw), &bare_request());
        assert_eq!(
            without_id(recipe),
            without_id(RecipeShape::fallback(&bare_request()))
        );
    }
}
