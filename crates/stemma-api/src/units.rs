//! Handlers for `/units` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/units/:identifier` | Single production event; 404 if unknown |
//! | `GET`  | `/units/:identifier/balance` | Produced vs consumed; 404 if unknown |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use stemma_core::{
  event::ProductionEvent, lineage::UnitBalance, resolver, store::TraceStore,
};

use crate::error::ApiError;

/// `GET /units/:identifier`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(identifier): Path<String>,
) -> Result<Json<ProductionEvent>, ApiError>
where
  S: TraceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let event = store
    .find_event(&identifier)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| {
      ApiError::NotFound(format!("no production record for {identifier:?}"))
    })?;
  Ok(Json(event))
}

/// `GET /units/:identifier/balance`
pub async fn balance<S>(
  State(store): State<Arc<S>>,
  Path(identifier): Path<String>,
) -> Result<Json<UnitBalance>, ApiError>
where
  S: TraceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let balance = resolver::resolve_balance(store.as_ref(), &identifier)
    .await?
    .ok_or_else(|| {
      ApiError::NotFound(format!("no production record for {identifier:?}"))
    })?;
  Ok(Json(balance))
}
