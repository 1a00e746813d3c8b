// tests/reconciliation_tests.rs
mod common;

use common::*;
use uuid::Uuid;

use cartsync::{CartController, CartError, ChangeEvent, ChangeKind};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_failed_remove_rolls_back_to_last_confirmed_state() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1000, 50);
  store.add_product(&p1);

  let cart = CartController::new(store.clone(), signed_in(Uuid::new_v4()));
  let line = cart.add_line(p1.id, None, 3).await.unwrap();
  let confirmed = cart.snapshot();

  store.fail_next_mutations(1);
  let err = cart.remove_line(line.id).await.unwrap_err();
  assert!(matches!(err, CartError::Mutation { .. }));

  // The optimistic removal was discarded by the reconciling reload: the
  // post-failure state is exactly the last confirmed server state.
  assert_eq!(cart.snapshot(), confirmed);
  assert_eq!(store.line_count(), 1);
}

#[tokio::test]
#[serial]
async fn test_failed_clear_rolls_back_to_last_confirmed_state() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1000, 50);
  let p2 = product("p2", 500, 50);
  store.add_product(&p1);
  store.add_product(&p2);

  let cart = CartController::new(store.clone(), signed_in(Uuid::new_v4()));
  cart.add_line(p1.id, None, 1).await.unwrap();
  cart.add_line(p2.id, None, 2).await.unwrap();
  let confirmed = cart.snapshot();

  store.fail_next_mutations(1);
  let err = cart.clear().await.unwrap_err();
  assert!(matches!(err, CartError::Mutation { .. }));

  assert_eq!(cart.snapshot(), confirmed);
}

#[tokio::test]
#[serial]
async fn test_failed_add_leaves_view_at_server_state() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1000, 50);
  store.add_product(&p1);

  let cart = CartController::new(store.clone(), signed_in(Uuid::new_v4()));
  cart.add_line(p1.id, None, 2).await.unwrap();

  store.fail_next_mutations(1);
  let err = cart.add_line(p1.id, None, 5).await.unwrap_err();
  assert!(matches!(err, CartError::Mutation { .. }));

  // No partial application: the failed increment is nowhere visible.
  assert_eq!(cart.item_count(), 2);
}

#[tokio::test]
#[serial]
async fn test_remove_twice_is_a_successful_no_op() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1000, 50);
  store.add_product(&p1);

  let cart = CartController::new(store.clone(), signed_in(Uuid::new_v4()));
  let line = cart.add_line(p1.id, None, 1).await.unwrap();

  cart.remove_line(line.id).await.unwrap();
  assert!(cart.snapshot().lines.is_empty());

  // The line is already gone (and the first reload confirmed that); the
  // second delete is indistinguishable from a successful one.
  cart.remove_line(line.id).await.unwrap();
  assert!(cart.snapshot().lines.is_empty());
}

#[tokio::test]
#[serial]
async fn test_concurrent_actor_delete_then_local_delete_is_no_op() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1000, 50);
  store.add_product(&p1);

  let user = Uuid::new_v4();
  let cart = CartController::new(store.clone(), signed_in(user));
  let line = cart.add_line(p1.id, None, 1).await.unwrap();

  // Another session deletes the same line first.
  store.raw_delete(line.id);

  cart.remove_line(line.id).await.unwrap();
  assert!(cart.snapshot().lines.is_empty());
}

#[tokio::test]
#[serial]
async fn test_change_event_triggers_full_reload() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1000, 50);
  store.add_product(&p1);

  let user = Uuid::new_v4();
  let cart = CartController::new(store.clone(), signed_in(user));
  cart.load().await.unwrap();
  assert_eq!(cart.item_count(), 0);

  // A write lands out of band; the notification carries no usable payload.
  store.raw_insert(user, &p1, 4);
  cart.handle_change(ChangeEvent::new(user, ChangeKind::Other)).await;

  assert_eq!(cart.item_count(), 4);
}

#[tokio::test]
#[serial]
async fn test_change_events_for_other_users_are_ignored() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1000, 50);
  store.add_product(&p1);

  let user = Uuid::new_v4();
  let stranger = Uuid::new_v4();
  let cart = CartController::new(store.clone(), signed_in(user));
  cart.load().await.unwrap();

  let before = store.fetch_calls.load(std::sync::atomic::Ordering::SeqCst);
  cart.handle_change(ChangeEvent::new(stranger, ChangeKind::Insert)).await;
  assert_eq!(store.fetch_calls.load(std::sync::atomic::Ordering::SeqCst), before);
}

#[tokio::test]
#[serial]
async fn test_failed_load_keeps_previous_cached_state() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1000, 50);
  store.add_product(&p1);

  let cart = CartController::new(store.clone(), signed_in(Uuid::new_v4()));
  cart.add_line(p1.id, None, 2).await.unwrap();

  store.fail_next_fetches(1);
  let err = cart.load().await.unwrap_err();
  assert!(matches!(err, CartError::Fetch { .. }));

  // Previous good state stays visible rather than blanking the view.
  assert_eq!(cart.item_count(), 2);

  // A retry resolves the discrepancy without any other intervention.
  let summary = cart.load().await.unwrap();
  assert_eq!(summary.item_count, 2);
}

#[tokio::test]
#[serial]
async fn test_reload_replaces_rather_than_merges() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1000, 50);
  let p2 = product("p2", 700, 50);
  store.add_product(&p1);
  store.add_product(&p2);

  let user = Uuid::new_v4();
  let cart = CartController::new(store.clone(), signed_in(user));
  let line = cart.add_line(p1.id, None, 2).await.unwrap();

  // Server truth diverges completely from the cached view.
  store.raw_delete(line.id);
  store.raw_insert(user, &p2, 1);

  let summary = cart.load().await.unwrap();
  assert_eq!(summary.lines.len(), 1);
  assert_eq!(summary.lines[0].product.id, p2.id);
  assert_eq!(summary.item_count, 1);
}

#[tokio::test]
#[serial]
async fn test_derived_totals_hold_after_every_operation() {
  setup_tracing();
  let store = MemoryStore::new();
  let p1 = product("p1", 1234, 50);
  let p2 = product("p2", 567, 50);
  let v1 = variant("big", 100, 20);
  store.add_product(&p1);
  store.add_product(&p2);
  store.add_variant(&v1);

  let cart = CartController::new(store.clone(), signed_in(Uuid::new_v4()));

  let assert_invariants = |cart: &CartController<MemoryStore>| {
    let summary = cart.snapshot();
    let expected_total: i64 = summary.lines.iter().map(|l| l.line_total_cents()).sum();
    let expected_count: i64 = summary.lines.iter().map(|l| i64::from(l.quantity)).sum();
    assert_eq!(summary.total_cents, expected_total);
    assert_eq!(summary.item_count, expected_count);
  };

  let line = cart.add_line(p1.id, Some(v1.id), 2).await.unwrap();
  assert_invariants(&cart);

  cart.add_line(p2.id, None, 3).await.unwrap();
  assert_invariants(&cart);

  cart.set_quantity(line.id, 1).await.unwrap();
  assert_invariants(&cart);

  cart.remove_line(line.id).await.unwrap();
  assert_invariants(&cart);

  cart.load().await.unwrap();
  assert_invariants(&cart);

  cart.clear().await.unwrap();
  assert_invariants(&cart);
  assert_eq!(cart.total_cents(), 0);
}
