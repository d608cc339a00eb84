use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;

/// Failures while loading or running the scan model.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Failed to load model {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("Model inference failed: {0}")]
    Inference(String),

    #[error("Model produced {got} scores, expected {expected}")]
    UnexpectedOutput { expected: usize, got: usize },

    #[error("Failed to read upload: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Errors returned to HTTP clients as `{"error": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file part")]
    MissingFile,

    #[error("No selected file")]
    EmptyFilename,

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("Uploaded file exceeds {0} bytes")]
    TooLarge(usize),

    #[error("{0}")]
    Processing(String),
}

impl From<ClassifierError> for ApiError {
    fn from(e: ClassifierError) -> Self {
        ApiError::Processing(e.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Processing(e.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::EmptyFilename | ApiError::EmptyFile => {
                StatusCode::BAD_REQUEST
            }
            ApiError::TooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
