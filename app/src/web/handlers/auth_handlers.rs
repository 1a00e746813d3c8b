// vitrin/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::i18n::Locale;
use crate::models::User;
use crate::services::auth_service;
use crate::state::AppState;
use crate::web::extractors::{bearer_token, AuthenticatedUser};

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct SignupRequestPayload {
  pub email: String,
  pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct SigninRequestPayload {
  pub email: String,
  pub password: String,
}

// --- Handler Implementations ---

#[instrument(
    name = "handler::signup",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SignupRequestPayload>,
  locale: Locale,
) -> Result<HttpResponse, AppError> {
  let email = req_payload.email.trim().to_lowercase();
  if email.is_empty() || !email.contains('@') {
    return Err(AppError::Validation("A valid email address is required.".to_string()));
  }
  if req_payload.password.len() < 8 {
    return Err(AppError::Validation(
      "Password must be at least 8 characters long.".to_string(),
    ));
  }

  let password_hash = auth_service::hash_password(&req_payload.password)?;

  let inserted: Option<User> = sqlx::query_as(
    "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) \
     ON CONFLICT (email) DO NOTHING \
     RETURNING *",
  )
  .bind(uuid::Uuid::new_v4())
  .bind(&email)
  .bind(&password_hash)
  .fetch_optional(&app_state.db_pool)
  .await?;

  let Some(user) = inserted else {
    warn!("Signup rejected: email already registered.");
    return Err(AppError::Validation(locale.email_taken().to_string()));
  };

  let token = auth_service::create_session(&app_state.db_pool, user.id, app_state.config.session_ttl_hours).await?;

  info!(user_id = %user.id, "Signup successful.");
  Ok(HttpResponse::Created().json(json!({
      "message": "User created successfully.",
      "userId": user.id.to_string(),
      "email": user.email,
      "token": token,
  })))
}

#[instrument(
    name = "handler::signin",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SigninRequestPayload>,
  locale: Locale,
) -> Result<HttpResponse, AppError> {
  let email = req_payload.email.trim().to_lowercase();

  let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
    .bind(&email)
    .fetch_optional(&app_state.db_pool)
    .await?;

  // A missing user and a wrong password get the same answer.
  let Some(user) = user else {
    warn!("Signin rejected: unknown email.");
    return Err(AppError::Auth(locale.invalid_credentials().to_string()));
  };
  if !auth_service::verify_password(&user.password_hash, &req_payload.password)? {
    warn!(user_id = %user.id, "Signin rejected: password mismatch.");
    return Err(AppError::Auth(locale.invalid_credentials().to_string()));
  }

  let token = auth_service::create_session(&app_state.db_pool, user.id, app_state.config.session_ttl_hours).await?;

  info!(user_id = %user.id, "Signin successful.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Signed in successfully.",
      "userId": user.id.to_string(),
      "email": user.email,
      "token": token,
  })))
}

#[instrument(name = "handler::signout", skip(app_state, req, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn signout_handler(
  app_state: web::Data<AppState>,
  req: HttpRequest,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  if let Some(token) = bearer_token(&req) {
    auth_service::destroy_session(&app_state.db_pool, &token).await?;
  }
  // The cart session dies with the auth session; a new sign-in builds a
  // fresh one from server state.
  app_state.cart_sessions.discard(auth_user.user_id);

  info!("Signout successful.");
  Ok(HttpResponse::Ok().json(json!({ "message": "Signed out successfully." })))
}

#[instrument(name = "handler::me", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn me_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
    .bind(auth_user.user_id)
    .fetch_optional(&app_state.db_pool)
    .await?;

  match user {
    Some(user) => Ok(HttpResponse::Ok().json(json!({ "user": user }))),
    None => Err(AppError::Auth("Session user no longer exists.".to_string())),
  }
}
