use serde::Serialize;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),
    #[error("Database error: {0}")]
    DatabaseError(#[from] mongodb::error::Error),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::ValidationError(_) => {
                HttpResponse::BadRequest().json(ErrorResponse {
                    code: "VALIDATION_ERROR".to_string(),
                    message: self.to_string(),
                    details: None,
                })
            }
            ApiError::Unauthorized(_) => {
                HttpResponse::Unauthorized().json(ErrorResponse {
                    code: "UNAUTHORIZED".to_string(),
                    message: self.to_string(),
                    details: None,
                })
            }
            ApiError::NotFound(_) => {
                HttpResponse::NotFound().json(ErrorResponse {
                    code: "NOT_FOUND".to_string(),
                    message: self.to_string(),
                    details: None,
                })
            }
            ApiError::DuplicateEntry(_) => {
                HttpResponse::Conflict().json(ErrorResponse {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message: self.to_string(),
                    details: None,
                })
            }
            ApiError::DatabaseError(_) => {
                // Never leak driver internals to the client
                HttpResponse::InternalServerError().json(ErrorResponse {
                    code: "DATABASE_ERROR".to_string(),
                    message: "Internal server error".to_string(),
                    details: None,
                })
            }
            ApiError::InternalError(_) => {
                HttpResponse::InternalServerError().json(ErrorResponse {
                    code: "INTERNAL_ERROR".to_string(),
                    message: self.to_string(),
                    details: None,
                })
            }
        }
    }
}
