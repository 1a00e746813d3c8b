// vitrin/src/bus.rs

//! In-process fan-out of row-level cart changes. Every successful cart
//! mutation publishes here; every live cart session subscribes and answers
//! matching events with a reload. This is the push channel a hosted
//! realtime service would otherwise provide.

use cartsync::ChangeEvent;
use tokio::sync::broadcast;
use tracing::debug;

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct ChangeBus {
  tx: broadcast::Sender<ChangeEvent>,
}

impl ChangeBus {
  pub fn new() -> Self {
    let (tx, _) = broadcast::channel(DEFAULT_CAPACITY);
    ChangeBus { tx }
  }

  /// Publishes one change notification. A send error only means no
  /// session is currently listening, which is not a failure.
  pub fn publish(&self, event: ChangeEvent) {
    match self.tx.send(event) {
      Ok(receivers) => debug!(user_id = %event.user_id, kind = ?event.kind, receivers, "change event published"),
      Err(_) => debug!(user_id = %event.user_id, "change event dropped, no subscribers"),
    }
  }

  pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
    self.tx.subscribe()
  }
}

impl Default for ChangeBus {
  fn default() -> Self {
    Self::new()
  }
}
