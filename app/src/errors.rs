// vitrin/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use cartsync::CartError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Cart Error: {0}")]
  Cart(#[from] CartError),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

// Lets handlers use `?` on helpers returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      // `From<sqlx::Error>` exists, but the error may arrive wrapped.
      match err.downcast::<sqlx::Error>() {
        Ok(db_err) => return AppError::Sqlx(db_err),
        Err(err) => return AppError::Internal(err.to_string()),
      }
    }
    AppError::Internal(err.to_string())
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response.
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
      AppError::Cart(source) => match source {
        CartError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m})),
        CartError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
        CartError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
        // Transport failures: the cart view has already been reconciled,
        // the client only needs to know the operation is retryable.
        CartError::Fetch { .. } | CartError::Mutation { .. } => HttpResponse::InternalServerError()
          .json(json!({"error": "Cart storage unavailable", "retryable": true})),
        CartError::Internal(m) => {
          HttpResponse::InternalServerError().json(json!({"error": "Cart processing error", "detail": m}))
        }
      },
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m}))
      }
    }
  }
}

// Result type alias for the application.
pub type Result<T, E = AppError> = std::result::Result<T, E>;
