// vitrin/src/services/checkout.rs

//! Order placement: consumes the cart into an immutable order inside one
//! database transaction.

use rand_core::{OsRng, RngCore};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::bus::ChangeBus;
use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::i18n::Locale;
use crate::models::{AddressData, CartLineRecord, Order, OrderItem, OrderStatus, PaymentStatus, CART_LINE_SELECT};
use cartsync::{ChangeEvent, ChangeKind};

/// Flat shipping plus basis-point tax on the subtotal, rounded half up.
/// Returns `(tax_cents, total_cents)`.
pub fn order_totals(subtotal_cents: i64, shipping_fee_cents: i64, tax_rate_bps: i64) -> (i64, i64) {
  let tax_cents = (subtotal_cents * tax_rate_bps + 5_000) / 10_000;
  (tax_cents, subtotal_cents + shipping_fee_cents + tax_cents)
}

/// `ORD-YYYYMM-XXXX` with a random 4-digit suffix. Uniqueness is enforced
/// by the column constraint; collisions surface as a database error and
/// the client retries checkout.
pub fn generate_order_number() -> String {
  let month = chrono::Utc::now().format("%Y%m");
  let random = OsRng.next_u32() % 10_000;
  format!("ORD-{}-{:04}", month, random)
}

/// Places an order from the user's current cart.
///
/// One transaction covers the whole consumption: read lines, re-check
/// stock, write the order and its item snapshots, delete the cart lines.
/// Either the cart becomes an order or nothing changes.
#[instrument(
  name = "checkout::place_order",
  skip(pool, config, bus, shipping_address, billing_address, notes),
  fields(user_id = %user_id)
)]
pub async fn place_order(
  pool: &PgPool,
  config: &AppConfig,
  bus: &ChangeBus,
  user_id: Uuid,
  shipping_address: AddressData,
  billing_address: Option<AddressData>,
  notes: Option<String>,
  locale: Locale,
) -> Result<Order> {
  let mut tx = pool.begin().await?;

  let sql = format!("{CART_LINE_SELECT} WHERE cl.user_id = $1 ORDER BY cl.created_at DESC");
  let records: Vec<CartLineRecord> = sqlx::query_as(&sql).bind(user_id).fetch_all(&mut *tx).await?;
  if records.is_empty() {
    return Err(AppError::Validation(locale.cart_empty().to_string()));
  }

  let lines: Vec<_> = records.into_iter().map(CartLineRecord::into_line).collect();

  // The add-to-cart stock check is advisory; this one is binding.
  for line in &lines {
    if line.quantity > line.available_stock() {
      return Err(AppError::Validation(format!(
        "{}: {}",
        locale.insufficient_stock(),
        line.product.name
      )));
    }
  }

  let subtotal_cents: i64 = lines.iter().map(|l| l.line_total_cents()).sum();
  let (tax_cents, total_cents) = order_totals(subtotal_cents, config.shipping_fee_cents, config.tax_rate_bps);

  // Billing defaults to the shipping address, as on the storefront form.
  let billing_address = billing_address.unwrap_or_else(|| shipping_address.clone());
  let order_number = generate_order_number();

  let order: Order = sqlx::query_as(
    "INSERT INTO orders \
       (id, order_number, user_id, status, subtotal_cents, shipping_cost_cents, tax_cents, total_cents, \
        shipping_address, billing_address, payment_status, notes) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
     RETURNING *",
  )
  .bind(Uuid::new_v4())
  .bind(&order_number)
  .bind(user_id)
  .bind(OrderStatus::Pending)
  .bind(subtotal_cents)
  .bind(config.shipping_fee_cents)
  .bind(tax_cents)
  .bind(total_cents)
  .bind(Json(&shipping_address))
  .bind(Json(&billing_address))
  .bind(PaymentStatus::Pending)
  .bind(&notes)
  .fetch_one(&mut *tx)
  .await?;

  for line in &lines {
    sqlx::query(
      "INSERT INTO order_items \
         (id, order_id, product_id, variant_id, product_name, variant_name, unit_price_cents, quantity, total_cents) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(Uuid::new_v4())
    .bind(order.id)
    .bind(line.product.id)
    .bind(line.variant.as_ref().map(|v| v.id))
    .bind(&line.product.name)
    .bind(line.variant.as_ref().map(|v| v.name.clone()))
    .bind(line.unit_price_cents())
    .bind(line.quantity)
    .bind(line.line_total_cents())
    .execute(&mut *tx)
    .await?;
  }

  // Cart lines are consumed into the order's snapshots.
  sqlx::query("DELETE FROM cart_lines WHERE user_id = $1")
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

  tx.commit().await?;

  bus.publish(ChangeEvent::new(user_id, ChangeKind::Delete));
  info!(order_id = %order.id, order_number = %order.order_number, total_cents, "order placed");
  Ok(order)
}

/// The user's orders, newest first.
pub async fn list_orders(pool: &PgPool, user_id: Uuid) -> Result<Vec<Order>> {
  let orders: Vec<Order> = sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC")
    .bind(user_id)
    .fetch_all(pool)
    .await?;
  Ok(orders)
}

/// One order with its item snapshots, scoped to the owner.
pub async fn fetch_order(pool: &PgPool, user_id: Uuid, order_id: Uuid) -> Result<(Order, Vec<OrderItem>)> {
  let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
    .bind(order_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
  let order = order.ok_or_else(|| AppError::NotFound(format!("Order {order_id} not found.")))?;

  let items: Vec<OrderItem> = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY created_at ASC")
    .bind(order_id)
    .fetch_all(pool)
    .await?;
  Ok((order, items))
}

/// Back-office status transition, scoped to the owner.
#[instrument(name = "checkout::update_status", skip(pool), fields(user_id = %user_id, order_id = %order_id))]
pub async fn update_status(
  pool: &PgPool,
  user_id: Uuid,
  order_id: Uuid,
  status: OrderStatus,
  payment_status: Option<PaymentStatus>,
) -> Result<Order> {
  let order: Option<Order> = sqlx::query_as(
    "UPDATE orders SET status = $3, payment_status = COALESCE($4, payment_status), updated_at = NOW() \
     WHERE id = $1 AND user_id = $2 \
     RETURNING *",
  )
  .bind(order_id)
  .bind(user_id)
  .bind(status)
  .bind(payment_status)
  .fetch_optional(pool)
  .await?;
  order.ok_or_else(|| AppError::NotFound(format!("Order {order_id} not found.")))
}
