// src/errors.rs
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DesignError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Content generation error: {0}")]
    ContentGeneration(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl ResponseError for DesignError {
    fn error_response(&self) -> HttpResponse {
        match self {
            DesignError::Validation(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Validation error",
                "message": self.to_string()
            })),
            DesignError::ContentGeneration(_) => {
                HttpResponse::ServiceUnavailable().json(serde_json::json!({
                    "error": "AI service error",
                    "message": self.to_string()
                }))
            }
            DesignError::Render(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Render error",
                "message": self.to_string()
            })),
            DesignError::Export(_) => HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Export error",
                "message": self.to_string()
            })),
        }
    }
}
