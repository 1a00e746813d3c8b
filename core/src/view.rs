// cartsync/src/view.rs

//! The cached cart view and the denormalized catalog snapshots it carries.
//!
//! Totals are always derived from the line list, never stored, so they
//! cannot drift from it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pricing and display data for a product, joined onto a line at read time.
///
/// Read-only from the cart's perspective; the catalog owns these rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
  pub id: Uuid,
  pub name: String,
  pub base_price_cents: i32,
  pub stock_quantity: i32,
  pub images: Vec<String>,
}

/// A purchasable sub-option of a product (size, color, ...) with its own
/// stock and price adjustment. The modifier may be negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSnapshot {
  pub id: Uuid,
  pub name: String,
  pub price_modifier_cents: i32,
  pub stock_quantity: i32,
  pub images: Vec<String>,
}

/// One row of the per-user cart: a quantity of a (product, variant-or-none)
/// pairing. At most one line exists per pairing; adding the same pairing
/// again increments the quantity instead of creating a second row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
  pub id: Uuid,
  pub product: ProductSnapshot,
  pub variant: Option<VariantSnapshot>,
  pub quantity: i32,
}

impl CartLine {
  /// Base product price plus the variant's price modifier when a variant is
  /// selected, else the base price alone.
  pub fn unit_price_cents(&self) -> i32 {
    let modifier = self.variant.as_ref().map(|v| v.price_modifier_cents).unwrap_or(0);
    self.product.base_price_cents + modifier
  }

  pub fn line_total_cents(&self) -> i64 {
    i64::from(self.unit_price_cents()) * i64::from(self.quantity)
  }

  /// Display images: the variant's set overrides the product's when the
  /// variant carries one.
  pub fn images(&self) -> &[String] {
    match &self.variant {
      Some(v) if !v.images.is_empty() => &v.images,
      _ => &self.product.images,
    }
  }

  /// Stock that bounds this line: the variant's when one is selected.
  pub fn available_stock(&self) -> i32 {
    self
      .variant
      .as_ref()
      .map(|v| v.stock_quantity)
      .unwrap_or(self.product.stock_quantity)
  }
}

/// The locally cached line list. A cache of the server-side cart, replaced
/// wholesale on every reload, never merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartView {
  pub lines: Vec<CartLine>,
}

impl CartView {
  /// Σ unit_price × quantity over the current lines.
  pub fn total_cents(&self) -> i64 {
    self.lines.iter().map(CartLine::line_total_cents).sum()
  }

  /// Σ quantity over the current lines.
  pub fn item_count(&self) -> i64 {
    self.lines.iter().map(|l| i64::from(l.quantity)).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  pub fn line(&self, line_id: Uuid) -> Option<&CartLine> {
    self.lines.iter().find(|l| l.id == line_id)
  }
}

/// A point-in-time copy of the view with its derived figures materialized,
/// suitable for handing to a renderer or serializing into a response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSummary {
  pub lines: Vec<CartLine>,
  pub total_cents: i64,
  pub item_count: i64,
}

impl From<&CartView> for CartSummary {
  fn from(view: &CartView) -> Self {
    CartSummary {
      total_cents: view.total_cents(),
      item_count: view.item_count(),
      lines: view.lines.clone(),
    }
  }
}
