// vitrin/src/web/extractors.rs

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::auth_service;
use crate::state::AppState;

/// The user behind the request's `Authorization: Bearer` token.
///
/// Resolution hits the sessions table, so extraction is asynchronous;
/// handlers that take this extractor are 401 before their body runs when
/// the token is missing, unknown or expired.
#[derive(Debug)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
}

pub fn bearer_token(req: &HttpRequest) -> Option<String> {
  req
    .headers()
    .get(actix_web::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(|token| token.trim().to_string())
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let token = bearer_token(req);

    Box::pin(async move {
      let state = state.ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;
      let Some(token) = token else {
        return Err(AppError::Auth("Missing bearer token.".to_string()));
      };

      match auth_service::resolve_session(&state.db_pool, &token).await? {
        Some(user_id) => Ok(AuthenticatedUser { user_id }),
        None => {
          warn!("AuthenticatedUser extractor: unknown or expired session token.");
          Err(AppError::Auth("Invalid or expired session token.".to_string()))
        }
      }
    })
  }
}
