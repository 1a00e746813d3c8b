// cartsync/src/event.rs

use uuid::Uuid;

/// What kind of row change a notification reported.
///
/// Carried for log context only: reconciliation reloads the full line list
/// on any event, so the engine never patches incrementally from these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
  Insert,
  Update,
  Delete,
  /// The channel reported activity without a usable payload.
  Other,
}

/// A row-level change notification for one user's cart lines.
///
/// No payload contract beyond "something changed for this user": the
/// controller answers every event with a full reload.
#[derive(Debug, Clone, Copy)]
pub struct ChangeEvent {
  pub user_id: Uuid,
  pub kind: ChangeKind,
}

impl ChangeEvent {
  pub fn new(user_id: Uuid, kind: ChangeKind) -> Self {
    ChangeEvent { user_id, kind }
  }
}
