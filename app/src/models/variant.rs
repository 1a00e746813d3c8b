// vitrin/src/models/variant.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A purchasable sub-option of a product (e.g. "Small", "Red"). The price
/// modifier is added to the product's base price and may be negative; a
/// non-empty image set overrides the product's images when the variant is
/// selected.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductVariant {
  pub id: Uuid,
  pub product_id: Uuid,
  pub name: String,
  pub sku: Option<String>,
  pub price_modifier_cents: i32,
  pub stock_quantity: i32,
  pub images: Vec<String>,
  pub is_active: bool,
  pub created_at: DateTime<Utc>,
}
