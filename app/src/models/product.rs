// vitrin/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub slug: String,
  pub description: Option<String>,
  pub short_description: Option<String>,
  pub category_id: Option<Uuid>,
  pub base_price_cents: i32,
  pub images: Vec<String>,
  pub is_active: bool,
  pub is_featured: bool,
  pub stock_quantity: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
