use std::collections::HashSet;

use itertools::Itertools;
use rf::basic_models::{id_string, recipe_id, AllergyFilterRequest, AllergyFilterResult};
use serde_json::{Map, Value};

use super::{template, ResponseShape};

/// Split candidate recipes into safe and unsafe for a described set of allergies.
///
/// This filter FAILS OPEN. Whenever the model's answer can't be used (no provider, a
/// provider error, an unparseable reply) every candidate is reported safe, and any
/// candidate the model didn't classify is safe too. Callers that need a conservative
/// filter must not rely on this one alone.
pub struct AllergyShape;

fn id_set(parsed: &Map<String, Value>, keys: &[&str]) -> Option<HashSet<String>> {
    let ids = keys.iter().find_map(|key| parsed.get(*key))?.as_array()?;
    Some(ids.iter().filter_map(id_string).collect())
}

fn string_items(recipe: &Value, key: &str) -> Vec<String> {
    recipe
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    // Ingredient rows sometimes come as objects with a name
                    Value::Object(o) => o.get("name").and_then(Value::as_str).map(str::to_string),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// One line of the candidate list in the prompt
fn describe(id: &str, recipe: &Value) -> String {
    let mut line = format!(
        "- {}: {}",
        id,
        recipe
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("untitled")
    );
    let tags = string_items(recipe, "tags");
    if !tags.is_empty() {
        line += &format!(" (tags: {})", tags.join(", "));
    }
    let ingredients = string_items(recipe, "ingredients");
    if !ingredients.is_empty() {
        line += &format!(" (ingredients: {})", ingredients.join(", "));
    }
    line
}

impl ResponseShape for AllergyShape {
    type Input = AllergyFilterRequest;
    type Output = AllergyFilterResult;
    const NAME: &'static str = "allergy filter";

    /// Nothing to decide without allergies or without identifiable recipes
    fn needs_provider(request: &AllergyFilterRequest) -> bool {
        !request.allergies.trim().is_empty() && request.recipes.iter().any(|r| recipe_id(r).is_some())
    }

    fn build_prompt(request: &AllergyFilterRequest) -> String {
        let recipes = request
            .recipes
            .iter()
            .filter_map(|recipe| recipe_id(recipe).map(|id| describe(&id, recipe)))
            .join("\n");
        template::fill(
            include_str!("../prompts/filter-by-allergy.md"),
            &[("allergies", request.allergies.trim()), ("recipes", recipes.as_str())],
        )
    }

    /// A missing id list is the complement of the other one. If both are given, only
    /// recipes listed as unsafe are unsafe.
    fn reconcile(
        parsed: &Map<String, Value>,
        request: &AllergyFilterRequest,
    ) -> Option<AllergyFilterResult> {
        let safe_ids = id_set(parsed, &["safeIds", "safe_ids"]);
        let unsafe_ids = id_set(parsed, &["unsafeIds", "unsafe_ids"]);
        if safe_ids.is_none() && unsafe_ids.is_none() {
            return None;
        }
        let (not_safe, safe): (Vec<Value>, Vec<Value>) =
            request.recipes.iter().cloned().partition(|recipe| {
                match (recipe_id(recipe), &safe_ids, &unsafe_ids) {
                    (Some(id), _, Some(unsafe_ids)) => unsafe_ids.contains(&id),
                    (Some(id), Some(safe_ids), None) => !safe_ids.contains(&id),
                    _ => false,
                }
            });
        Some(AllergyFilterResult { safe, not_safe })
    }

    fn fallback(request: &AllergyFilterRequest) -> AllergyFilterResult {
        AllergyFilterResult {
            safe: request.recipes.clone(),
            not_safe: vec![],
        }
    }
}
