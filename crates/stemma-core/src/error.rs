//! Error types for `stemma-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The caller passed an empty identifier. An unknown-but-well-formed
  /// identifier is not an error; it resolves to absence.
  #[error("identifier must not be empty")]
  EmptyIdentifier,

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend failure at the resolver boundary.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
