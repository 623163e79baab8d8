use anyhow::{ensure, Result};
use clap::Parser;
use rf::basic_models::GenerationRequest;
use rf_client::generation::{LlmConfig, RecipeShape};
use rf_client::{Pipeline, ResponseShape};

/// Generate a recipe from a list of ingredients
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Ingredients to cook with
    ingredients: Vec<String>,
    /// A title to suggest to the model
    #[arg(short, long)]
    title: Option<String>,
    /// How many people to serve
    #[arg(short, long)]
    servings: Option<u32>,
    /// Dietary tags, like vegetarian or gluten-free
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// Dry run mode: print the prompt and don't call the LLM
    #[arg(long)]
    dry: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    ensure!(
        !args.ingredients.is_empty(),
        "At least one ingredient is required."
    );

    let request = GenerationRequest {
        title: args.title,
        ingredients: args.ingredients,
        servings: args.servings,
        dietary_tags: (!args.tags.is_empty()).then_some(args.tags),
    };

    if args.dry {
        println!("{}", RecipeShape::build_prompt(&request));
        return Ok(());
    }

    let config = LlmConfig::from_env();
    tracing::info!("LLM configuration: {:?}", config);
    let pipeline = Pipeline::from_config(&config);
    if pipeline.model_name().is_none() {
        println!("No LLM_API_KEY found, using the offline fallback recipe");
    }
    let recipe = pipeline.generate_recipe(&request).await;
    println!("{}", serde_json::to_string_pretty(&recipe)?);
    Ok(())
}
