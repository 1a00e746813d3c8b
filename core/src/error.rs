// cartsync/src/error.rs

use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Error taxonomy for cart operations.
///
/// `Auth`, `Validation` and `NotFound` are detected before any network call
/// (or reported by the store for rows the caller does not own) and are safe
/// to surface inline. `Fetch` and `Mutation` wrap whatever transport or
/// backend failure the store hit; by the time either reaches the caller the
/// controller has already reconciled its cached view against the server, so
/// the only remaining decision is whether to retry.
#[derive(Debug, Error)]
pub enum CartError {
  #[error("Authentication required: {0}")]
  Auth(String),

  #[error("Validation failed: {0}")]
  Validation(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Failed to fetch cart state. Source: {source}")]
  Fetch {
    #[source]
    source: AnyhowError,
  },

  #[error("Cart mutation failed. Source: {source}")]
  Mutation {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal cart engine error: {0}")]
  Internal(String),
}

impl CartError {
  /// Wraps a backend read failure.
  pub fn fetch(source: impl Into<AnyhowError>) -> Self {
    CartError::Fetch { source: source.into() }
  }

  /// Wraps a backend write failure.
  pub fn mutation(source: impl Into<AnyhowError>) -> Self {
    CartError::Mutation { source: source.into() }
  }

  /// True for the variants a caller may retry without changing its input.
  pub fn is_transient(&self) -> bool {
    matches!(self, CartError::Fetch { .. } | CartError::Mutation { .. })
  }
}

pub type CartResult<T, E = CartError> = std::result::Result<T, E>;
