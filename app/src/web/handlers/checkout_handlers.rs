// vitrin/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::i18n::Locale;
use crate::models::{AddressData, OrderStatus, PaymentStatus};
use crate::services::checkout;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct CheckoutRequestPayload {
  pub shipping_address: AddressData,
  pub billing_address: Option<AddressData>,
  pub notes: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateOrderStatusPayload {
  pub status: OrderStatus,
  pub payment_status: Option<PaymentStatus>,
}

// --- Handler Implementations ---

#[instrument(
    name = "handler::checkout",
    skip(app_state, req_payload, auth_user),
    fields(user_id = %auth_user.user_id)
)]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CheckoutRequestPayload>,
  auth_user: AuthenticatedUser,
  locale: Locale,
) -> Result<HttpResponse, AppError> {
  let payload = req_payload.into_inner();

  let order = checkout::place_order(
    &app_state.db_pool,
    &app_state.config,
    &app_state.change_bus,
    auth_user.user_id,
    payload.shipping_address,
    payload.billing_address,
    payload.notes,
    locale,
  )
  .await?;

  info!(order_id = %order.id, "Checkout completed.");
  Ok(HttpResponse::Created().json(json!({
      "message": "Order placed successfully.",
      "order": order,
  })))
}

#[instrument(name = "handler::list_orders", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = checkout::list_orders(&app_state.db_pool, auth_user.user_id).await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(
    name = "handler::get_order",
    skip(app_state, path, auth_user),
    fields(user_id = %auth_user.user_id, order_id = %path.as_ref())
)]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let (order, items) = checkout::fetch_order(&app_state.db_pool, auth_user.user_id, order_id).await?;

  Ok(HttpResponse::Ok().json(json!({
      "order": order,
      "orderItems": items,
  })))
}

#[instrument(
    name = "handler::update_order_status",
    skip(app_state, path, req_payload, auth_user),
    fields(user_id = %auth_user.user_id, order_id = %path.as_ref())
)]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<UpdateOrderStatusPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let order = checkout::update_status(
    &app_state.db_pool,
    auth_user.user_id,
    order_id,
    req_payload.status,
    req_payload.payment_status,
  )
  .await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Order status updated.",
      "order": order,
  })))
}
