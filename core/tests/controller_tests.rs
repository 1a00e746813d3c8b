// tests/controller_tests.rs
mod common;

use common::*;
use std::sync::Arc;
use uuid::Uuid;

use cartsync::{CartController, CartError};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_add_merges_repeated_pairing_into_one_line() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1000, 50);
  store.add_product(&p1);

  let user = Uuid::new_v4();
  let cart = CartController::new(store.clone(), signed_in(user));

  // Fresh cart: one add creates one line.
  let line = cart.add_line(p1.id, None, 2).await.unwrap();
  assert_eq!(line.quantity, 2);
  assert_eq!(cart.item_count(), 2);
  assert_eq!(cart.snapshot().lines.len(), 1);

  // Same pairing again: still one line, quantities accumulate.
  let line = cart.add_line(p1.id, None, 3).await.unwrap();
  assert_eq!(line.quantity, 5);
  assert_eq!(cart.item_count(), 5);
  assert_eq!(cart.snapshot().lines.len(), 1);

  // Quantity update in place.
  let updated = cart.set_quantity(line.id, 1).await.unwrap();
  assert_eq!(updated.unwrap().quantity, 1);
  assert_eq!(cart.item_count(), 1);

  // Removal empties the cart.
  cart.remove_line(line.id).await.unwrap();
  assert!(cart.snapshot().lines.is_empty());
  assert_eq!(cart.total_cents(), 0);
  assert_eq!(cart.item_count(), 0);
}

#[tokio::test]
#[serial]
async fn test_variant_and_no_variant_are_distinct_lines() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1000, 50);
  let v1 = variant("large", 250, 10);
  store.add_product(&p1);
  store.add_variant(&v1);

  let cart = CartController::new(store.clone(), signed_in(Uuid::new_v4()));

  cart.add_line(p1.id, None, 1).await.unwrap();
  cart.add_line(p1.id, Some(v1.id), 1).await.unwrap();

  let snapshot = cart.snapshot();
  assert_eq!(snapshot.lines.len(), 2);
  assert_eq!(snapshot.item_count, 2);

  // The variant line merges with itself, not with the bare-product line.
  cart.add_line(p1.id, Some(v1.id), 2).await.unwrap();
  let snapshot = cart.snapshot();
  assert_eq!(snapshot.lines.len(), 2);
  assert_eq!(snapshot.item_count, 4);
}

#[tokio::test]
#[serial]
async fn test_unauthenticated_load_is_empty_and_writes_are_rejected() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1000, 50);
  store.add_product(&p1);

  let cart = CartController::new(store.clone(), signed_out());

  // Reads no-op to an empty view without touching the store.
  let summary = cart.load().await.unwrap();
  assert!(summary.lines.is_empty());
  assert_eq!(store.fetch_calls.load(std::sync::atomic::Ordering::SeqCst), 0);

  // Writes fail before any store call.
  let err = cart.add_line(p1.id, None, 1).await.unwrap_err();
  assert!(matches!(err, CartError::Auth(_)));
  assert_eq!(store.line_count(), 0);
}

#[tokio::test]
#[serial]
async fn test_add_validates_arguments_before_any_store_call() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1000, 50);
  store.add_product(&p1);

  let cart = CartController::new(store.clone(), signed_in(Uuid::new_v4()));

  let err = cart.add_line(p1.id, None, 0).await.unwrap_err();
  assert!(matches!(err, CartError::Validation(_)));

  let err = cart.add_line(p1.id, None, -3).await.unwrap_err();
  assert!(matches!(err, CartError::Validation(_)));

  let err = cart.add_line(Uuid::nil(), None, 1).await.unwrap_err();
  assert!(matches!(err, CartError::Validation(_)));

  assert_eq!(store.line_count(), 0);
  assert_eq!(store.fetch_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
#[serial]
async fn test_set_quantity_zero_or_less_removes_the_line() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1000, 50);
  store.add_product(&p1);

  let cart = CartController::new(store.clone(), signed_in(Uuid::new_v4()));

  let line = cart.add_line(p1.id, None, 4).await.unwrap();
  assert_eq!(cart.set_quantity(line.id, 0).await.unwrap(), None);
  assert!(cart.snapshot().lines.is_empty());

  let line = cart.add_line(p1.id, None, 4).await.unwrap();
  assert_eq!(cart.set_quantity(line.id, -2).await.unwrap(), None);
  assert!(cart.snapshot().lines.is_empty());
}

#[tokio::test]
#[serial]
async fn test_set_quantity_on_unknown_line_is_not_found() {
  setup_tracing();
  let store = MemoryStore::new();
  let cart = CartController::new(store, signed_in(Uuid::new_v4()));

  let err = cart.set_quantity(Uuid::new_v4(), 3).await.unwrap_err();
  assert!(matches!(err, CartError::NotFound(_)));
}

#[tokio::test]
#[serial]
async fn test_carts_are_scoped_per_user() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1000, 50);
  store.add_product(&p1);

  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();
  let alice_cart = CartController::new(store.clone(), signed_in(alice));
  let bob_cart = CartController::new(store.clone(), signed_in(bob));

  let alice_line = alice_cart.add_line(p1.id, None, 2).await.unwrap();
  bob_cart.add_line(p1.id, None, 7).await.unwrap();

  assert_eq!(alice_cart.item_count(), 2);
  assert_eq!(bob_cart.item_count(), 7);

  // One user's line id means nothing in another user's cart.
  let err = bob_cart.set_quantity(alice_line.id, 1).await.unwrap_err();
  assert!(matches!(err, CartError::NotFound(_)));
  assert_eq!(alice_cart.item_count(), 2);
}

#[tokio::test]
#[serial]
async fn test_shared_view_handle_observes_reconciliation() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1000, 50);
  store.add_product(&p1);

  let cart = Arc::new(CartController::new(store.clone(), signed_in(Uuid::new_v4())));
  let view = cart.view();
  assert!(view.read().is_empty());

  cart.add_line(p1.id, None, 2).await.unwrap();
  assert_eq!(view.read().item_count(), 2);
  assert_eq!(view.map_read(|v| &v.lines).len(), 1);

  cart.clear().await.unwrap();
  assert!(view.read().is_empty());
}
