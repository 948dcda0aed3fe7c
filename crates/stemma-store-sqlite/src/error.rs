//! Error type for `stemma-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  Parse(String),

  /// Another production event already carries this serial.
  #[error("identifier already recorded: {0:?}")]
  DuplicateIdentifier(String),

  /// Attempted to record a consumption for an event that does not exist.
  #[error("production event not found: {0}")]
  EventNotFound(uuid::Uuid),

  #[error("identifier must not be empty")]
  EmptyIdentifier,

  #[error("quantity must carry a mass or a length")]
  EmptyQuantity,

  #[error("quantity components must be non-negative")]
  NegativeQuantity,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
