// vitrin/src/models/cart_line.rs

use sqlx::FromRow;
use uuid::Uuid;

use cartsync::{CartLine, ProductSnapshot, VariantSnapshot};

/// The joined SELECT behind every cart read: one row per line with the
/// product and (optional) variant snapshots denormalized in. Kept as one
/// constant so the store and the checkout transaction read identical data.
pub const CART_LINE_SELECT: &str = "\
SELECT cl.id, cl.user_id, cl.product_id, cl.variant_id, cl.quantity, \
       p.name AS product_name, p.base_price_cents, p.stock_quantity AS product_stock, p.images AS product_images, \
       v.name AS variant_name, v.price_modifier_cents, v.stock_quantity AS variant_stock, v.images AS variant_images \
FROM cart_lines cl \
JOIN products p ON p.id = cl.product_id \
LEFT JOIN product_variants v ON v.id = cl.variant_id";

/// Flat row shape produced by [`CART_LINE_SELECT`]. Variant columns are
/// NULL when the line has no variant selected.
#[derive(Debug, Clone, FromRow)]
pub struct CartLineRecord {
  pub id: Uuid,
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub variant_id: Option<Uuid>,
  pub quantity: i32,

  pub product_name: String,
  pub base_price_cents: i32,
  pub product_stock: i32,
  pub product_images: Vec<String>,

  pub variant_name: Option<String>,
  pub price_modifier_cents: Option<i32>,
  pub variant_stock: Option<i32>,
  pub variant_images: Option<Vec<String>>,
}

impl CartLineRecord {
  /// Rehydrates the engine-facing line from the flat join row.
  pub fn into_line(self) -> CartLine {
    let variant = match (self.variant_id, self.variant_name) {
      (Some(id), Some(name)) => Some(VariantSnapshot {
        id,
        name,
        price_modifier_cents: self.price_modifier_cents.unwrap_or(0),
        stock_quantity: self.variant_stock.unwrap_or(0),
        images: self.variant_images.unwrap_or_default(),
      }),
      _ => None,
    };

    CartLine {
      id: self.id,
      product: ProductSnapshot {
        id: self.product_id,
        name: self.product_name,
        base_price_cents: self.base_price_cents,
        stock_quantity: self.product_stock,
        images: self.product_images,
      },
      variant,
      quantity: self.quantity,
    }
  }
}
