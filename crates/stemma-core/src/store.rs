//! The `TraceStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `stemma-store-sqlite`). The resolver and the API depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::event::{
  ConsumptionRecord, NewConsumption, NewProductionEvent, ProductionEvent,
};

/// Abstraction over a traceability store backend.
///
/// Both record kinds are append-only: the recording operations insert, and
/// nothing ever updates or deletes. The read operations are what the
/// lineage resolver traverses.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait TraceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Look up the production event that created `identifier`, joined with
  /// its catalog, operator and equipment descriptors.
  ///
  /// `None` when no such unit exists — an expected outcome of scanned or
  /// hand-typed input, not an error.
  fn find_event<'a>(
    &'a self,
    identifier: &'a str,
  ) -> impl Future<Output = Result<Option<ProductionEvent>, Self::Error>> + Send + 'a;

  /// Look up a production event by its row id. Used to materialise the
  /// consuming side of a consumption record.
  fn get_event(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<Option<ProductionEvent>, Self::Error>> + Send + '_;

  /// All consumption records written by the given event: what it consumed.
  /// Order is stable for a given store state.
  fn inputs_of(
    &self,
    consuming_event_id: Uuid,
  ) -> impl Future<Output = Result<Vec<ConsumptionRecord>, Self::Error>> + Send + '_;

  /// All consumption records that consumed `identifier`: who used it.
  /// Order is stable for a given store state.
  fn consumers_of<'a>(
    &'a self,
    identifier: &'a str,
  ) -> impl Future<Output = Result<Vec<ConsumptionRecord>, Self::Error>> + Send + 'a;

  // ── Appends ───────────────────────────────────────────────────────────

  /// Record a unit's creation and return the persisted event.
  /// `event_id` and `recorded_at` are set by the store. Rejects an empty
  /// identifier, a duplicate identifier, and an absent or negative
  /// quantity.
  fn record_event(
    &self,
    input: NewProductionEvent,
  ) -> impl Future<Output = Result<ProductionEvent, Self::Error>> + Send + '_;

  /// Record that an event consumed a portion of a previously produced
  /// unit. Rejects an unknown `consuming_event_id`, an empty consumed
  /// identifier, and an absent or negative quantity. The consumed
  /// identifier is not checked against the events table: recording may
  /// legitimately run ahead of it.
  fn record_consumption(
    &self,
    input: NewConsumption,
  ) -> impl Future<Output = Result<ConsumptionRecord, Self::Error>> + Send + '_;
}
