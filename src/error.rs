use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing path")]
    MissingPath,

    #[error("Missing filename")]
    MissingFilename,

    #[error("Empty body")]
    EmptyBody,

    #[error("Failed to revalidate {0}")]
    Invalidation(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::MissingPath | AppError::MissingFilename | AppError::EmptyBody => {
                StatusCode::BAD_REQUEST
            }
            AppError::Invalidation { .. } | AppError::InternalError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
