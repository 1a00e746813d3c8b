// vitrin/src/services/auth_service.rs

//! Password hashing/verification and the persisted session tokens that
//! back bearer authentication.

use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result};

/// Hashes a plain-text password with Argon2 and a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| {
      error!(error = %e, "Argon2 password hashing failed.");
      AppError::Internal(format!("Password hashing process failed: {}", e))
    })
}

/// Verifies a plain-text password against a stored Argon2 hash. `Ok(false)`
/// means "well-formed hash, wrong password"; a malformed stored hash is an
/// internal error, not an authentication result.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(stored_hash: &str, provided_password: &str) -> Result<bool> {
  if stored_hash.is_empty() || provided_password.is_empty() {
    return Ok(false);
  }

  let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
    error!(error = %e, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", e))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(e) => {
      error!(error = %e, "Argon2 password verification encountered an error.");
      Err(AppError::Internal(format!("Password verification process failed: {}", e)))
    }
  }
}

/// Issues a new opaque session token for `user_id`.
#[instrument(name = "auth_service::create_session", skip(pool), fields(user_id = %user_id))]
pub async fn create_session(pool: &PgPool, user_id: Uuid, ttl_hours: i64) -> Result<String> {
  // An opaque random token; its only meaning is the sessions row.
  let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
  let expires_at = Utc::now() + Duration::hours(ttl_hours);

  sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
    .bind(&token)
    .bind(user_id)
    .bind(expires_at)
    .execute(pool)
    .await?;

  debug!("session created");
  Ok(token)
}

/// Resolves a bearer token to its user, ignoring expired sessions.
#[instrument(name = "auth_service::resolve_session", skip_all)]
pub async fn resolve_session(pool: &PgPool, token: &str) -> Result<Option<Uuid>> {
  if token.is_empty() {
    return Ok(None);
  }
  let user_id: Option<Uuid> =
    sqlx::query_scalar("SELECT user_id FROM sessions WHERE token = $1 AND expires_at > NOW()")
      .bind(token)
      .fetch_optional(pool)
      .await?;
  Ok(user_id)
}

/// Deletes a session token. Deleting an unknown token is a no-op.
#[instrument(name = "auth_service::destroy_session", skip_all)]
pub async fn destroy_session(pool: &PgPool, token: &str) -> Result<()> {
  sqlx::query("DELETE FROM sessions WHERE token = $1")
    .bind(token)
    .execute(pool)
    .await?;
  Ok(())
}
