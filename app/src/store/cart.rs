// vitrin/src/store/cart.rs

//! PostgreSQL implementation of the engine's `CartStore` seam.
//!
//! All statements are scoped by `user_id`, so a caller can never reach
//! another user's rows; a row filtered out by that scope is reported the
//! same way as a missing one. Every successful mutation publishes a
//! `ChangeEvent` on the bus.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use cartsync::{CartError, CartLine, CartResult, CartStore, ChangeEvent, ChangeKind};

use crate::bus::ChangeBus;
use crate::models::{CartLineRecord, CART_LINE_SELECT};

pub struct PgCartStore {
  pool: PgPool,
  bus: ChangeBus,
}

impl PgCartStore {
  pub fn new(pool: PgPool, bus: ChangeBus) -> Self {
    PgCartStore { pool, bus }
  }

  async fn fetch_line(&self, user_id: Uuid, line_id: Uuid) -> CartResult<CartLine> {
    let sql = format!("{CART_LINE_SELECT} WHERE cl.user_id = $1 AND cl.id = $2");
    let record: Option<CartLineRecord> = sqlx::query_as(&sql)
      .bind(user_id)
      .bind(line_id)
      .fetch_optional(&self.pool)
      .await
      .map_err(CartError::fetch)?;
    record
      .map(CartLineRecord::into_line)
      .ok_or_else(|| CartError::NotFound(format!("Cart line {line_id} not found.")))
  }
}

#[async_trait]
impl CartStore for PgCartStore {
  #[instrument(name = "cart_store::fetch_lines", skip(self), fields(user_id = %user_id))]
  async fn fetch_lines(&self, user_id: Uuid) -> CartResult<Vec<CartLine>> {
    let sql = format!("{CART_LINE_SELECT} WHERE cl.user_id = $1 ORDER BY cl.created_at DESC");
    let records: Vec<CartLineRecord> = sqlx::query_as(&sql)
      .bind(user_id)
      .fetch_all(&self.pool)
      .await
      .map_err(CartError::fetch)?;
    Ok(records.into_iter().map(CartLineRecord::into_line).collect())
  }

  #[instrument(
    name = "cart_store::upsert_line",
    skip(self),
    fields(user_id = %user_id, product_id = %product_id, quantity)
  )]
  async fn upsert_line(
    &self,
    user_id: Uuid,
    product_id: Uuid,
    variant_id: Option<Uuid>,
    quantity: i32,
  ) -> CartResult<CartLine> {
    // Resolve the catalog side first: the product must exist and be
    // active, and a requested variant must belong to it.
    let product_stock: Option<i32> =
      sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = $1 AND is_active")
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(CartError::fetch)?;
    let Some(product_stock) = product_stock else {
      return Err(CartError::NotFound(format!("Product {product_id} not found.")));
    };

    let available = match variant_id {
      None => product_stock,
      Some(vid) => {
        let variant_stock: Option<i32> = sqlx::query_scalar(
          "SELECT stock_quantity FROM product_variants WHERE id = $1 AND product_id = $2 AND is_active",
        )
        .bind(vid)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(CartError::fetch)?;
        variant_stock.ok_or_else(|| CartError::NotFound(format!("Variant {vid} not found.")))?
      }
    };

    let current: Option<i32> = sqlx::query_scalar(
      "SELECT quantity FROM cart_lines WHERE user_id = $1 AND product_id = $2 AND variant_id IS NOT DISTINCT FROM $3",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(variant_id)
    .fetch_optional(&self.pool)
    .await
    .map_err(CartError::fetch)?;

    // Checked here, enforced nowhere else: a concurrent add can still
    // overshoot between this read and the upsert. Stock is re-validated at
    // checkout, which is the gate that matters.
    let requested_total = current.unwrap_or(0).saturating_add(quantity);
    if requested_total > available {
      return Err(CartError::Validation(format!(
        "Insufficient stock. Only {available} available."
      )));
    }

    let line_id: Uuid = sqlx::query_scalar(
      "INSERT INTO cart_lines (id, user_id, product_id, variant_id, quantity) \
       VALUES ($1, $2, $3, $4, $5) \
       ON CONFLICT (user_id, product_id, variant_id) \
       DO UPDATE SET quantity = cart_lines.quantity + EXCLUDED.quantity, updated_at = NOW() \
       RETURNING id",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(product_id)
    .bind(variant_id)
    .bind(quantity)
    .fetch_one(&self.pool)
    .await
    .map_err(CartError::mutation)?;

    let line = self.fetch_line(user_id, line_id).await?;

    let kind = if current.is_some() { ChangeKind::Update } else { ChangeKind::Insert };
    self.bus.publish(ChangeEvent::new(user_id, kind));
    info!(line_id = %line.id, new_quantity = line.quantity, "cart line upserted");
    Ok(line)
  }

  #[instrument(
    name = "cart_store::set_quantity",
    skip(self),
    fields(user_id = %user_id, line_id = %line_id, quantity)
  )]
  async fn set_quantity(&self, user_id: Uuid, line_id: Uuid, quantity: i32) -> CartResult<CartLine> {
    let updated: Option<Uuid> = sqlx::query_scalar(
      "UPDATE cart_lines SET quantity = $3, updated_at = NOW() WHERE id = $1 AND user_id = $2 RETURNING id",
    )
    .bind(line_id)
    .bind(user_id)
    .bind(quantity)
    .fetch_optional(&self.pool)
    .await
    .map_err(CartError::mutation)?;

    if updated.is_none() {
      return Err(CartError::NotFound(format!("Cart line {line_id} not found.")));
    }

    let line = self.fetch_line(user_id, line_id).await?;
    self.bus.publish(ChangeEvent::new(user_id, ChangeKind::Update));
    Ok(line)
  }

  #[instrument(name = "cart_store::delete_line", skip(self), fields(user_id = %user_id, line_id = %line_id))]
  async fn delete_line(&self, user_id: Uuid, line_id: Uuid) -> CartResult<()> {
    let result = sqlx::query("DELETE FROM cart_lines WHERE id = $1 AND user_id = $2")
      .bind(line_id)
      .bind(user_id)
      .execute(&self.pool)
      .await
      .map_err(CartError::mutation)?;

    if result.rows_affected() == 0 {
      return Err(CartError::NotFound(format!("Cart line {line_id} not found.")));
    }

    self.bus.publish(ChangeEvent::new(user_id, ChangeKind::Delete));
    Ok(())
  }

  #[instrument(name = "cart_store::clear", skip(self), fields(user_id = %user_id))]
  async fn clear(&self, user_id: Uuid) -> CartResult<()> {
    let result = sqlx::query("DELETE FROM cart_lines WHERE user_id = $1")
      .bind(user_id)
      .execute(&self.pool)
      .await
      .map_err(CartError::mutation)?;

    if result.rows_affected() > 0 {
      self.bus.publish(ChangeEvent::new(user_id, ChangeKind::Delete));
    }
    Ok(())
  }
}
