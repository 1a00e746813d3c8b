// cartsync/src/store.rs

//! The seams between the engine and its environment: where cart lines
//! actually live, and who the current user is.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::CartResult;
use crate::view::CartLine;

/// The authoritative, server-side cart storage.
///
/// Every operation is scoped by `user_id`; an implementation must reject
/// operations against another user's rows, reporting them as `NotFound`,
/// the same as rows that no longer exist. Callers cannot distinguish the
/// two. All reads return lines joined with current product/variant
/// snapshots.
#[async_trait]
pub trait CartStore: Send + Sync {
  /// The full current line list for `user_id`, newest first.
  async fn fetch_lines(&self, user_id: Uuid) -> CartResult<Vec<CartLine>>;

  /// Creates a line for the (product, variant) pairing, or increments the
  /// quantity of the existing one. Returns the resulting line with
  /// snapshots joined.
  async fn upsert_line(
    &self,
    user_id: Uuid,
    product_id: Uuid,
    variant_id: Option<Uuid>,
    quantity: i32,
  ) -> CartResult<CartLine>;

  /// Sets the quantity of one line in place. `NotFound` when the line does
  /// not exist or belongs to another user. Callers never pass a quantity
  /// below 1 here; zero-or-less goes through [`delete_line`].
  ///
  /// [`delete_line`]: CartStore::delete_line
  async fn set_quantity(&self, user_id: Uuid, line_id: Uuid, quantity: i32) -> CartResult<CartLine>;

  /// Deletes one line. `NotFound` when it is already gone.
  async fn delete_line(&self, user_id: Uuid, line_id: Uuid) -> CartResult<()>;

  /// Deletes every line for `user_id`.
  async fn clear(&self, user_id: Uuid) -> CartResult<()>;
}

/// Current-user lookup, used to gate every cart operation.
///
/// `None` means unauthenticated: reads present an empty view and writes
/// fail with `CartError::Auth` before any store call is made.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
  async fn current_user(&self) -> Option<Uuid>;
}
