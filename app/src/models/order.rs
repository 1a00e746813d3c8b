// vitrin/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type as SqlxType};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Paid,
  Processing,
  Shipped,
  Delivered,
  Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "payment_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
  Pending,
  Paid,
  Failed,
  Refunded,
}

/// Postal address embedded in an order as JSONB. Orders keep their own
/// copy; later edits to a saved address never rewrite order history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressData {
  pub full_name: String,
  pub address_line1: String,
  pub address_line2: Option<String>,
  pub city: String,
  pub state: Option<String>,
  pub postal_code: String,
  pub country: String,
  pub phone: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub order_number: String,
  pub user_id: Uuid,
  pub status: OrderStatus,
  pub subtotal_cents: i64,
  pub shipping_cost_cents: i64,
  pub tax_cents: i64,
  pub total_cents: i64,
  pub shipping_address: Json<AddressData>,
  pub billing_address: Json<AddressData>,
  pub payment_intent_id: Option<String>,
  pub payment_status: PaymentStatus,
  pub notes: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
