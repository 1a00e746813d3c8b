// vitrin/src/models/order_item.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Immutable snapshot of one cart line at the moment an order was placed.
/// Names and unit price are copied, not referenced: catalog edits after
/// purchase must not rewrite what the customer bought.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub variant_id: Option<Uuid>,
  pub product_name: String,
  pub variant_name: Option<String>,
  pub unit_price_cents: i32,
  pub quantity: i32,
  pub total_cents: i64,
  pub created_at: DateTime<Utc>,
}
