// vitrin/src/sessions.rs

//! Per-user cart sessions: one `CartController` per signed-in user, plus
//! the feed binding that keeps it subscribed to the change bus.
//!
//! The binding is scoped acquisition with guaranteed release: dropping a
//! session aborts its forwarding task, so no handler outlives the cart it
//! was reloading.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use cartsync::{CartController, ChangeEvent, ChangeKind, IdentityProvider};

use crate::bus::ChangeBus;
use crate::errors::Result;
use crate::store::PgCartStore;

/// Server-side identity for a session whose user is already resolved: the
/// bearer-token lookup happened in the extractor, so the controller's
/// identity seam is a fixed answer.
struct SessionIdentity {
  user_id: Uuid,
}

#[async_trait]
impl IdentityProvider for SessionIdentity {
  async fn current_user(&self) -> Option<Uuid> {
    Some(self.user_id)
  }
}

/// Aborts the feed-forwarding task when the session goes away.
struct FeedBinding {
  task: JoinHandle<()>,
}

impl Drop for FeedBinding {
  fn drop(&mut self) {
    self.task.abort();
  }
}

pub struct CartSession {
  controller: Arc<CartController<PgCartStore>>,
  _feed: FeedBinding,
}

impl CartSession {
  pub fn controller(&self) -> &CartController<PgCartStore> {
    &self.controller
  }
}

/// Registry of live cart sessions, keyed by user.
///
/// Two requests (or two tabs) for the same user share one session, so both
/// observe the same reconciled view.
pub struct CartSessions {
  store: Arc<PgCartStore>,
  bus: ChangeBus,
  inner: Mutex<HashMap<Uuid, Arc<CartSession>>>,
}

impl CartSessions {
  pub fn new(store: Arc<PgCartStore>, bus: ChangeBus) -> Self {
    CartSessions {
      store,
      bus,
      inner: Mutex::new(HashMap::new()),
    }
  }

  /// Returns the user's cart session, creating (and initially loading) it
  /// on first access.
  pub async fn obtain(&self, user_id: Uuid) -> Result<Arc<CartSession>> {
    if let Some(session) = self.inner.lock().get(&user_id) {
      return Ok(session.clone());
    }

    let controller = Arc::new(CartController::new(
      self.store.clone(),
      Arc::new(SessionIdentity { user_id }),
    ));
    controller.load().await?;

    let feed = self.bind_feed(user_id, controller.clone());
    let session = Arc::new(CartSession {
      controller,
      _feed: feed,
    });

    // Two requests may race to create the first session; the one that
    // loses the insert adopts the winner's.
    let mut sessions = self.inner.lock();
    let entry = sessions.entry(user_id).or_insert_with(|| session.clone());
    info!(user_id = %user_id, "cart session ready");
    Ok(entry.clone())
  }

  /// Drops the user's session (sign-out); the feed binding aborts with it.
  pub fn discard(&self, user_id: Uuid) {
    if self.inner.lock().remove(&user_id).is_some() {
      debug!(user_id = %user_id, "cart session discarded");
    }
  }

  fn bind_feed(&self, user_id: Uuid, controller: Arc<CartController<PgCartStore>>) -> FeedBinding {
    let mut rx = self.bus.subscribe();
    let task = tokio::spawn(async move {
      loop {
        match rx.recv().await {
          Ok(event) if event.user_id == user_id => controller.handle_change(event).await,
          Ok(_) => {} // another user's cart
          Err(RecvError::Lagged(skipped)) => {
            // Dropped notifications are indistinguishable from "something
            // changed"; reload once and continue.
            warn!(user_id = %user_id, skipped, "change feed lagged; forcing reload");
            controller
              .handle_change(ChangeEvent::new(user_id, ChangeKind::Other))
              .await;
          }
          Err(RecvError::Closed) => break,
        }
      }
    });
    FeedBinding { task }
  }
}
