// src/lib.rs

//! Cartsync: an asynchronous, storage-agnostic cart reconciliation engine.
//!
//! The server-side line list is the sole authority; what a process holds is
//! a cache with a defined staleness-resolution policy:
//!  - Explicit operations (add/update/remove/clear) write through a
//!    pluggable [`CartStore`] and then reload.
//!  - Push-channel notifications ([`ChangeEvent`]) trigger a full reload,
//!    never an incremental patch.
//!  - Removals and clears apply optimistically and are confirmed or rolled
//!    back by the same reload path.
//!  - `total` and `itemCount` are derived from the line list on demand,
//!    never stored.
//!
//! Wire it up by implementing [`CartStore`] over your storage and
//! [`IdentityProvider`] over your session handling, then constructing a
//! [`CartController`] per user session.

pub mod controller;
pub mod error;
pub mod event;
pub mod shared;
pub mod store;
pub mod view;

// --- Re-exports for the Public API ---

pub use crate::controller::CartController;
pub use crate::error::{CartError, CartResult};
pub use crate::event::{ChangeEvent, ChangeKind};
pub use crate::shared::Shared;
pub use crate::store::{CartStore, IdentityProvider};
pub use crate::view::{CartLine, CartSummary, CartView, ProductSnapshot, VariantSnapshot};
