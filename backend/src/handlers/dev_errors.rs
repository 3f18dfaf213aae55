use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures a dev-server request can end in. Static routes answer in plain
/// text, the screenshot API in `{"error": ...}` JSON.
#[derive(Debug, Error)]
pub enum DevServerError {
    #[error("Forbidden")]
    Forbidden,
    #[error("Not found")]
    NotFound,
    #[error("File not found")]
    FileNotFound,
    #[error("Missing image data")]
    MissingImage,
    #[error("{0}")]
    Screenshot(String),
    #[error("{0}")]
    Internal(String),
}

impl DevServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            DevServerError::Forbidden => StatusCode::FORBIDDEN,
            DevServerError::NotFound | DevServerError::FileNotFound => StatusCode::NOT_FOUND,
            DevServerError::MissingImage => StatusCode::BAD_REQUEST,
            DevServerError::Screenshot(_) | DevServerError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DevServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            DevServerError::MissingImage | DevServerError::Screenshot(_) => {
                (status, Json(json!({ "error": self.to_string() }))).into_response()
            }
            _ => (status, self.to_string()).into_response(),
        }
    }
}
