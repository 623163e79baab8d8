use axum::{
    extract::rejection::JsonRejection,
    http,
    response::{IntoResponse, Response},
};
pub type WebResult<T> = std::result::Result<T, WebError>;

/// Errors that reach the client. Generation failures never end up here:
/// the pipeline answers with a fallback instead.
#[derive(thiserror::Error, Debug)]
pub enum WebError {
    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("Not found")]
    NotFound,
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let display = self.to_string();
        match self {
            WebError::Body(rejection) => (rejection.status(), display).into_response(),
            WebError::Validation(_) => {
                (http::StatusCode::UNPROCESSABLE_ENTITY, display).into_response()
            }
            WebError::NotFound => (http::StatusCode::NOT_FOUND, "Not Found").into_response(),
        }
    }
}
