pub type GenerationResult<T> = std::result::Result<T, GenerationError>;

/// Everything that can go wrong between a prompt and a usable reply.
///
/// None of these reach the HTTP layer: the pipeline maps each one onto a fallback.
#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    /// No credential configured. This is the offline mode, not a failure.
    #[error("No LLM provider is configured")]
    ProviderUnavailable,
    #[error("LLM provider error: {0}")]
    Provider(String),
    #[error("Could not interpret LLM response: {0}")]
    ParseFailure(String),
}

impl From<async_openai::error::OpenAIError> for GenerationError {
    fn from(e: async_openai::error::OpenAIError) -> Self {
        GenerationError::Provider(e.to_string())
    }
}
