use itertools::Itertools;
use rf::basic_models::{SubstitutionRequest, SubstitutionResult};
use rf::ingredients::clean_ingredient;
use serde_json::{Map, Value};

use super::{fields, template, ResponseShape};

/// Shown in place of suggestions when the LLM can't help.
/// There's no sensible offline default for substitutions, so we say so.
pub const UNAVAILABLE_NOTICE: &str =
    "Sorry, substitution suggestions are unavailable right now. Please try again later.";

/// Suggest replacements for the ingredients of a recipe.
pub struct SubstitutionShape;

impl ResponseShape for SubstitutionShape {
    type Input = SubstitutionRequest;
    type Output = SubstitutionResult;
    const NAME: &'static str = "substitutions";

    fn build_prompt(request: &SubstitutionRequest) -> String {
        let ingredients = request
            .ingredients
            .iter()
            .map(|raw| clean_ingredient(raw))
            .filter(|name| !name.is_empty())
            .unique()
            .join(", ");
        template::fill(
            include_str!("../prompts/ingredient-substitutions.md"),
            &[
                (
                    "title",
                    request
                        .recipe_title
                        .as_deref()
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .unwrap_or("unknown"),
                ),
                (
                    "ingredients",
                    if ingredients.is_empty() {
                        "none"
                    } else {
                        ingredients.as_str()
                    },
                ),
            ],
        )
    }

    fn reconcile(parsed: &Map<String, Value>, _: &SubstitutionRequest) -> Option<SubstitutionResult> {
        fields::text_list(parsed, &["suggestions"]).map(|suggestions| SubstitutionResult { suggestions })
    }

    fn fallback(_: &SubstitutionRequest) -> SubstitutionResult {
        SubstitutionResult {
            suggestions: vec![UNAVAILABLE_NOTICE.to_string()],
        }
    }
}
