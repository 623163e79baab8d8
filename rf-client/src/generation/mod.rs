use std::sync::Arc;

use rf::basic_models::{
    AllergyFilterRequest, AllergyFilterResult, GenerationRequest, RecipeResult,
    SubstitutionRequest, SubstitutionResult,
};
use serde_json::{Map, Value};

use crate::errors::{GenerationError, GenerationResult};

pub mod allergy;
pub mod extract;
pub mod fields;
pub mod llm;
pub mod recipe;
pub mod substitution;
pub mod template;

pub use allergy::AllergyShape;
pub use llm::{CompletionProvider, LlmConfig, OpenAiProvider};
pub use recipe::RecipeShape;
pub use substitution::SubstitutionShape;

/// What one kind of generation asks for and how its answer is read back.
///
/// A shape never fails: `reconcile` turns a parsed reply into output, or refuses it,
/// and `fallback` produces an answer from the input alone.
pub trait ResponseShape {
    type Input: Sync;
    type Output;
    /// Used in logs
    const NAME: &'static str;

    fn build_prompt(input: &Self::Input) -> String;

    /// `None` means the reply had nothing usable and the fallback should be used instead.
    fn reconcile(parsed: &Map<String, Value>, input: &Self::Input) -> Option<Self::Output>;

    fn fallback(input: &Self::Input) -> Self::Output;

    fn needs_provider(_input: &Self::Input) -> bool {
        true
    }
}

/// Turn raw completion text (or its absence) into output, falling back when it's unusable.
pub fn resolve<S: ResponseShape>(raw: Option<&str>, input: &S::Input) -> S::Output {
    let Some(raw) = raw else {
        return S::fallback(input);
    };
    let reconciled = extract::parse_object(raw).and_then(|parsed| {
        S::reconcile(&parsed, input).ok_or_else(|| {
            GenerationError::ParseFailure(format!("reply has no usable {} fields", S::NAME))
        })
    });
    match reconciled {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(shape = S::NAME, "Using fallback: {}", e);
            tracing::debug!("Unusable reply: {}", raw);
            S::fallback(input)
        }
    }
}

/// Prompt, call, resolve. Holds the provider, if there is one, and nothing else.
#[derive(Clone, Default)]
pub struct Pipeline {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl Pipeline {
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>) -> Self {
        Self { provider }
    }

    /// A pipeline that always answers with fallbacks
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(
            OpenAiProvider::from_config(config)
                .map(|provider| Arc::new(provider) as Arc<dyn CompletionProvider>),
        )
    }

    pub fn model_name(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.model_name())
    }

    /// Send the prompt to the provider, once.
    pub async fn invoke(&self, prompt: &str) -> GenerationResult<String> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(GenerationError::ProviderUnavailable)?;
        tracing::debug!("Prompt: {}", prompt);
        provider.complete(prompt).await
    }

    pub async fn run<S: ResponseShape>(&self, input: &S::Input) -> S::Output {
        if !S::needs_provider(input) {
            return S::fallback(input);
        }
        tracing::info!(shape = S::NAME, "Generating ..");
        let raw = match self.invoke(&S::build_prompt(input)).await {
            Ok(text) => Some(text),
            Err(GenerationError::ProviderUnavailable) => {
                tracing::debug!(shape = S::NAME, "No LLM configured, answering offline");
                None
            }
            Err(e) => {
                tracing::warn!(shape = S::NAME, "LLM call failed: {}", e);
                None
            }
        };
        resolve::<S>(raw.as_deref(), input)
    }

    pub async fn generate_recipe(&self, request: &GenerationRequest) -> RecipeResult {
        self.run::<RecipeShape>(request).await
    }

    pub async fn suggest_substitutions(&self, request: &SubstitutionRequest) -> SubstitutionResult {
        self.run::<SubstitutionShape>(request).await
    }

    /// Fails open; see [`AllergyShape`].
    pub async fn filter_by_allergy(&self, request: &AllergyFilterRequest) -> AllergyFilterResult {
        self.run::<AllergyShape>(request).await
    }
}
