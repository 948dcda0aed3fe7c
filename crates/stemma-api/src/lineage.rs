//! Handlers for `/units/:identifier/lineage*` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/units/:identifier/lineage` | `{ancestors, children}`; unknown identifier → `ancestors: null` |
//! | `GET`  | `/units/:identifier/lineage/compact` | `CompactLineage`, or JSON `null` when unknown |
//! | `GET`  | `/units/:identifier/children` | Immediate consumers, parents left empty |
//!
//! Absence is success on these routes: a scanned serial with no production
//! record yields an empty shape with status 200, while a store failure is a
//! 500. Only a malformed request (e.g. `depth=0`) is a client error.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use stemma_core::{
  lineage::{CompactLineage, Lineage, LineageNode},
  resolver::{self, DEFAULT_ANCESTOR_DEPTH, DEFAULT_CHILD_DEPTH},
  store::TraceStore,
};

use crate::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct DepthParams {
  /// Override for the traversal's generation ceiling; must be ≥ 1.
  pub depth: Option<usize>,
}

fn depth_or(params: &DepthParams, default: usize) -> Result<usize, ApiError> {
  match params.depth {
    Some(0) => Err(ApiError::BadRequest("depth must be at least 1".into())),
    Some(d) => Ok(d),
    None => Ok(default),
  }
}

/// `GET /units/:identifier/lineage[?depth=N]`
pub async fn full<S>(
  State(store): State<Arc<S>>,
  Path(identifier): Path<String>,
  Query(params): Query<DepthParams>,
) -> Result<Json<Lineage>, ApiError>
where
  S: TraceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let depth = depth_or(&params, DEFAULT_ANCESTOR_DEPTH)?;
  let lineage =
    resolver::resolve_lineage(store.as_ref(), &identifier, depth).await?;
  Ok(Json(lineage))
}

/// `GET /units/:identifier/lineage/compact[?depth=N]`
///
/// The body is the compact tree, or JSON `null` when the identifier has no
/// production record — the payload a label printer embeds verbatim.
pub async fn compact<S>(
  State(store): State<Arc<S>>,
  Path(identifier): Path<String>,
  Query(params): Query<DepthParams>,
) -> Result<Json<Option<CompactLineage>>, ApiError>
where
  S: TraceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let depth = depth_or(&params, DEFAULT_ANCESTOR_DEPTH)?;
  let tree =
    resolver::resolve_ancestors(store.as_ref(), &identifier, depth).await?;
  Ok(Json(tree.map(|node| node.to_compact())))
}

/// `GET /units/:identifier/children[?depth=N]`
pub async fn children<S>(
  State(store): State<Arc<S>>,
  Path(identifier): Path<String>,
  Query(params): Query<DepthParams>,
) -> Result<Json<Vec<LineageNode>>, ApiError>
where
  S: TraceStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let depth = depth_or(&params, DEFAULT_CHILD_DEPTH)?;
  let children =
    resolver::resolve_children(store.as_ref(), &identifier, depth).await?;
  Ok(Json(children))
}
