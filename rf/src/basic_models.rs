use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString, IntoStaticStr};

/// What the user wants cooked: a list of ingredients plus a few optional hints.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub title: Option<String>,
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default, alias = "dietary_tags")]
    pub dietary_tags: Option<Vec<String>>,
}

impl GenerationRequest {
    /// The title, if it has any visible content
    pub fn title_hint(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// Servings, with zero treated the same as absent
    pub fn servings_hint(&self) -> Option<u32> {
        self.servings.filter(|s| *s > 0)
    }
}

#[derive(
    Debug,
    Default,
    Deserialize,
    Serialize,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// A complete recipe as returned to the front-end.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResult {
    pub id: String,
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub servings: u32,
    pub calories: Option<u32>,
    pub cook_time_minutes: Option<u32>,
    pub difficulty: Difficulty,
    pub rating: Option<f64>,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubstitutionRequest {
    #[serde(default, alias = "recipe_title")]
    pub recipe_title: Option<String>,
    pub ingredients: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SubstitutionResult {
    pub suggestions: Vec<String>,
}

/// Candidate recipes are passed through untouched, so they stay as raw JSON.
/// The only field we look at is `id`, plus a few descriptive ones for the prompt.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AllergyFilterRequest {
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub recipes: Vec<Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AllergyFilterResult {
    pub safe: Vec<Value>,
    #[serde(rename = "unsafe")]
    pub not_safe: Vec<Value>,
}

/// Read the identifier of a candidate recipe. Numbers are rendered in decimal
/// so that `7` and `"7"` compare equal.
pub fn recipe_id(recipe: &Value) -> Option<String> {
    id_string(recipe.get("id")?)
}

/// Render a JSON identifier (string or number) as a string
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
