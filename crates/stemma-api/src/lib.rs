//! JSON REST API for Stemma.
//!
//! Exposes an axum [`Router`] backed by any
//! [`stemma_core::store::TraceStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", stemma_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod lineage;
pub mod units;

use std::sync::Arc;

use axum::{Router, routing::get};
use stemma_core::store::TraceStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type. Every route is a read; recording is
/// the surrounding application's concern.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: TraceStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Units
    .route("/units/{identifier}", get(units::get_one::<S>))
    .route("/units/{identifier}/balance", get(units::balance::<S>))
    // Lineage
    .route("/units/{identifier}/lineage", get(lineage::full::<S>))
    .route(
      "/units/{identifier}/lineage/compact",
      get(lineage::compact::<S>),
    )
    .route("/units/{identifier}/children", get(lineage::children::<S>))
    .with_state(store)
}
