// tests/pricing_tests.rs
mod common;

use common::*;
use uuid::Uuid;

use cartsync::{CartController, CartLine, CartView};
use serial_test::serial;

#[test]
fn test_unit_price_is_base_plus_variant_modifier() {
  let p = product("tea", 100, 10);
  let v = variant("large", 20, 5);

  let with_variant = CartLine {
    id: Uuid::new_v4(),
    product: p.clone(),
    variant: Some(v),
    quantity: 3,
  };
  assert_eq!(with_variant.unit_price_cents(), 120);
  assert_eq!(with_variant.line_total_cents(), 360);

  let without_variant = CartLine {
    id: Uuid::new_v4(),
    product: p,
    variant: None,
    quantity: 3,
  };
  assert_eq!(without_variant.unit_price_cents(), 100);
  assert_eq!(without_variant.line_total_cents(), 300);
}

#[test]
fn test_negative_variant_modifier_discounts_the_base_price() {
  let p = product("tea", 100, 10);
  let v = variant("small", -30, 5);

  let line = CartLine {
    id: Uuid::new_v4(),
    product: p,
    variant: Some(v),
    quantity: 2,
  };
  assert_eq!(line.unit_price_cents(), 70);
  assert_eq!(line.line_total_cents(), 140);
}

#[test]
fn test_variant_images_override_product_images_when_present() {
  let p = product("tea", 100, 10);
  let mut v = variant("large", 20, 5);

  let mut line = CartLine {
    id: Uuid::new_v4(),
    product: p.clone(),
    variant: Some(v.clone()),
    quantity: 1,
  };
  // Variant with no image set falls back to the product's.
  assert_eq!(line.images(), &p.images[..]);

  v.images = vec!["large.jpg".to_string()];
  line.variant = Some(v);
  assert_eq!(line.images(), &["large.jpg".to_string()][..]);
}

#[test]
fn test_view_totals_sum_over_lines() {
  let p1 = product("tea", 1234, 10);
  let p2 = product("coffee", 567, 10);
  let v1 = variant("large", 100, 5);

  let view = CartView {
    lines: vec![
      CartLine {
        id: Uuid::new_v4(),
        product: p1,
        variant: Some(v1),
        quantity: 2,
      },
      CartLine {
        id: Uuid::new_v4(),
        product: p2,
        variant: None,
        quantity: 3,
      },
    ],
  };

  assert_eq!(view.total_cents(), 2 * 1334 + 3 * 567);
  assert_eq!(view.item_count(), 5);
}

#[tokio::test]
#[serial]
async fn test_controller_totals_match_the_worked_example() {
  setup_tracing();
  let store = MemoryStore::new();
  let p = product("tea", 100, 10);
  let v = variant("large", 20, 5);
  store.add_product(&p);
  store.add_variant(&v);

  let cart = CartController::new(store.clone(), signed_in(Uuid::new_v4()));

  cart.add_line(p.id, Some(v.id), 3).await.unwrap();
  assert_eq!(cart.total_cents(), 360);

  cart.clear().await.unwrap();
  cart.add_line(p.id, None, 3).await.unwrap();
  assert_eq!(cart.total_cents(), 300);
}
