// cartsync/src/controller.rs

//! The cart controller: one owner for the cached view, one reconciliation
//! path for every way the view can change.
//!
//! Three sources mutate a user's cart: explicit operations issued here,
//! writes from elsewhere (another device, another session) surfacing as
//! change notifications, and the optimistic edits this controller applies
//! ahead of server confirmation. All three funnel into one reload path,
//! which replaces the cached line list with the server's current truth.
//! Replace, never merge: interleaved updates can therefore never diverge
//! for longer than one reload cycle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{CartError, CartResult};
use crate::event::ChangeEvent;
use crate::shared::Shared;
use crate::store::{CartStore, IdentityProvider};
use crate::view::{CartLine, CartSummary, CartView};

/// Presents a single, eventually-consistent cart view sourced from a
/// [`CartStore`], accepting local mutations and push-driven invalidations.
///
/// Construct one per user session and share it behind an `Arc`; operations
/// take `&self`. The controller holds no lock across its awaits, so
/// overlapping operations are safe: the reload sequence guard ensures a
/// stale fetch never overwrites a newer one.
pub struct CartController<S> {
  store: Arc<S>,
  identity: Arc<dyn IdentityProvider>,
  view: Shared<CartView>,
  // Reload sequencing. `begun` hands out ticket numbers; `applied` (only
  // written under the view's write lock) remembers the newest installed
  // fetch. A completed fetch with a ticket at or below `applied` is stale
  // and is discarded.
  reload_begun: AtomicU64,
  reload_applied: AtomicU64,
}

impl<S: CartStore> CartController<S> {
  pub fn new(store: Arc<S>, identity: Arc<dyn IdentityProvider>) -> Self {
    CartController {
      store,
      identity,
      view: Shared::default(),
      reload_begun: AtomicU64::new(0),
      reload_applied: AtomicU64::new(0),
    }
  }

  /// A live handle to the cached view. Reads through this handle observe
  /// reconciliation as it happens; guards must not be held across awaits.
  pub fn view(&self) -> Shared<CartView> {
    self.view.clone()
  }

  /// Point-in-time copy of the view with totals materialized.
  pub fn snapshot(&self) -> CartSummary {
    CartSummary::from(&*self.view.read())
  }

  pub fn total_cents(&self) -> i64 {
    self.view.read().total_cents()
  }

  pub fn item_count(&self) -> i64 {
    self.view.read().item_count()
  }

  /// Fetches the full current line list for the authenticated user.
  ///
  /// Unauthenticated callers get an empty view and no store call. On
  /// transport failure the previous cached state stays visible (empty only
  /// if nothing was ever loaded) and the error is returned so the caller
  /// can offer a retry.
  #[instrument(name = "cart::load", skip(self))]
  pub async fn load(&self) -> CartResult<CartSummary> {
    match self.identity.current_user().await {
      None => {
        self.view.write().lines.clear();
        Ok(self.snapshot())
      }
      Some(user_id) => {
        self.reload(user_id).await?;
        Ok(self.snapshot())
      }
    }
  }

  /// Adds `quantity` of a (product, variant) pairing to the cart.
  ///
  /// If a line for the pairing already exists its quantity increases by
  /// `quantity`; otherwise a new line is created. Returns the line as the
  /// server confirmed it.
  #[instrument(name = "cart::add_line", skip(self), fields(product_id = %product_id, quantity))]
  pub async fn add_line(
    &self,
    product_id: Uuid,
    variant_id: Option<Uuid>,
    quantity: i32,
  ) -> CartResult<CartLine> {
    let user_id = self.require_user().await?;
    if product_id.is_nil() {
      return Err(CartError::Validation("A product identifier is required.".to_string()));
    }
    if quantity < 1 {
      return Err(CartError::Validation("Quantity must be a positive number.".to_string()));
    }

    let result = self.store.upsert_line(user_id, product_id, variant_id, quantity).await;
    self.reconcile(user_id).await;

    match result {
      Ok(line) => {
        info!(line_id = %line.id, new_quantity = line.quantity, "cart line added or incremented");
        Ok(line)
      }
      Err(e) => {
        warn!(error = %e, "add_line failed; view reconciled to server state");
        Err(e)
      }
    }
  }

  /// Sets one line's quantity in place. A quantity of zero or less is the
  /// same operation as [`remove_line`]; `None` is returned in that case,
  /// `Some(line)` with the confirmed row otherwise.
  ///
  /// [`remove_line`]: CartController::remove_line
  #[instrument(name = "cart::set_quantity", skip(self), fields(line_id = %line_id, quantity))]
  pub async fn set_quantity(&self, line_id: Uuid, quantity: i32) -> CartResult<Option<CartLine>> {
    if quantity <= 0 {
      self.remove_line(line_id).await?;
      return Ok(None);
    }

    let user_id = self.require_user().await?;
    let result = self.store.set_quantity(user_id, line_id, quantity).await;
    self.reconcile(user_id).await;

    match result {
      Ok(line) => Ok(Some(line)),
      Err(e) => {
        warn!(error = %e, "set_quantity failed; view reconciled to server state");
        Err(e)
      }
    }
  }

  /// Deletes one line.
  ///
  /// The removal is applied to the local view immediately, before the
  /// server confirms; the reconciling reload then either confirms it or
  /// rolls it back, so a failure is visible for at most one round trip.
  /// Deleting a line that is already gone is a success: the reload that
  /// follows cannot distinguish "deleted just now" from "deleted earlier".
  #[instrument(name = "cart::remove_line", skip(self), fields(line_id = %line_id))]
  pub async fn remove_line(&self, line_id: Uuid) -> CartResult<()> {
    let user_id = self.require_user().await?;

    // Optimistic removal; the reload below is the single path that either
    // confirms or discards it.
    self.view.write().lines.retain(|l| l.id != line_id);

    let result = self.store.delete_line(user_id, line_id).await;
    self.reconcile(user_id).await;

    match result {
      Ok(()) => Ok(()),
      Err(CartError::NotFound(_)) => {
        debug!("line already absent on server; delete treated as success");
        Ok(())
      }
      Err(e) => {
        warn!(error = %e, "remove_line failed; optimistic removal rolled back");
        Err(e)
      }
    }
  }

  /// Deletes every line, with the same optimistic-then-reconcile discipline
  /// as [`remove_line`].
  ///
  /// [`remove_line`]: CartController::remove_line
  #[instrument(name = "cart::clear", skip(self))]
  pub async fn clear(&self) -> CartResult<()> {
    let user_id = self.require_user().await?;

    self.view.write().lines.clear();

    let result = self.store.clear(user_id).await;
    self.reconcile(user_id).await;

    match result {
      Ok(()) => Ok(()),
      Err(e) => {
        warn!(error = %e, "clear failed; optimistic clear rolled back");
        Err(e)
      }
    }
  }

  /// Feeds one push-channel notification into the controller.
  ///
  /// Any event scoped to the current user triggers a full reload,
  /// regardless of payload. Events for other users are ignored.
  #[instrument(name = "cart::handle_change", skip(self), fields(event_user = %event.user_id, kind = ?event.kind))]
  pub async fn handle_change(&self, event: ChangeEvent) {
    let Some(user_id) = self.identity.current_user().await else {
      return;
    };
    if event.user_id != user_id {
      return;
    }
    debug!("change notification received; reloading");
    self.reconcile(user_id).await;
  }

  async fn require_user(&self) -> CartResult<Uuid> {
    self
      .identity
      .current_user()
      .await
      .ok_or_else(|| CartError::Auth("No authenticated user for cart operation.".to_string()))
  }

  /// Replaces the cached view with the server's current line list.
  ///
  /// Concurrent reloads are deduplicated by ticket: a fetch that completes
  /// after a newer one has installed is discarded, so installation order
  /// can never run backwards even though fetches overlap.
  async fn reload(&self, user_id: Uuid) -> CartResult<()> {
    let ticket = self.reload_begun.fetch_add(1, Ordering::SeqCst) + 1;

    let lines = self.store.fetch_lines(user_id).await?;

    let mut view = self.view.write();
    // `reload_applied` is only written while holding the view write lock.
    if self.reload_applied.load(Ordering::Acquire) < ticket {
      self.reload_applied.store(ticket, Ordering::Release);
      view.lines = lines;
      debug!(ticket, line_count = view.lines.len(), "view replaced from server");
    } else {
      debug!(ticket, "stale reload discarded");
    }
    Ok(())
  }

  /// The reconciliation entry point used after mutations and change
  /// events: a reload whose own failure is logged, not propagated, so the
  /// previous good state stays visible instead of blanking the view.
  async fn reconcile(&self, user_id: Uuid) {
    if let Err(e) = self.reload(user_id).await {
      warn!(error = %e, "reconciling reload failed; keeping previous view");
    }
  }
}
