// vitrin/src/web/handlers/cart_handlers.rs

//! Thin glue over the per-user cart session: each handler resolves the
//! session, delegates to the controller, and returns the reconciled view.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

// --- Request DTOs ---

fn default_quantity() -> i32 {
  1
}

#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  pub product_id: Uuid,
  pub variant_id: Option<Uuid>,
  #[serde(default = "default_quantity")]
  pub quantity: i32,
}

#[derive(Deserialize, Debug)]
pub struct UpdateQuantityRequestPayload {
  pub quantity: i32,
}

// --- Handler Implementations ---

#[instrument(name = "handler::view_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn view_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let session = app_state.cart_sessions.obtain(auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "cart": session.controller().snapshot() })))
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, product_id = %req_payload.product_id, quantity = %req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<AddToCartRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let session = app_state.cart_sessions.obtain(auth_user.user_id).await?;
  let line = session
    .controller()
    .add_line(req_payload.product_id, req_payload.variant_id, req_payload.quantity)
    .await?;

  info!(line_id = %line.id, new_quantity = line.quantity, "Item added to cart.");
  Ok(HttpResponse::Ok().json(json!({
      "message": "Item added to cart successfully.",
      "cartLine": line,
      "cart": session.controller().snapshot(),
  })))
}

#[instrument(
    name = "handler::update_cart_line",
    skip(app_state, path, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, line_id = %path.as_ref(), quantity = %req_payload.quantity)
)]
pub async fn update_cart_line_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<UpdateQuantityRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let line_id = path.into_inner();
  let session = app_state.cart_sessions.obtain(auth_user.user_id).await?;
  let updated = session.controller().set_quantity(line_id, req_payload.quantity).await?;

  let message = if updated.is_some() { "Cart line updated." } else { "Cart line removed." };
  Ok(HttpResponse::Ok().json(json!({
      "message": message,
      "cartLine": updated,
      "cart": session.controller().snapshot(),
  })))
}

#[instrument(
    name = "handler::remove_cart_line",
    skip(app_state, path, auth_user),
    fields(user_id = %auth_user.user_id, line_id = %path.as_ref())
)]
pub async fn remove_cart_line_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let line_id = path.into_inner();
  let session = app_state.cart_sessions.obtain(auth_user.user_id).await?;
  session.controller().remove_line(line_id).await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Cart line removed.",
      "cart": session.controller().snapshot(),
  })))
}

#[instrument(name = "handler::clear_cart", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let session = app_state.cart_sessions.obtain(auth_user.user_id).await?;
  session.controller().clear().await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Cart cleared.",
      "cart": session.controller().snapshot(),
  })))
}
