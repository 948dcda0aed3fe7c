//! The lineage resolver — ancestor and consumer traversal over a
//! [`TraceStore`].
//!
//! The production graph is acyclic by construction (the recording process
//! never lets a unit consume itself transitively), but the resolver does
//! not trust that: every ancestor walk carries a hard generation ceiling
//! and a visited set over the current root-to-node path, so corrupt data
//! terminates instead of recursing forever.
//!
//! Every operation is stateless per call and read-only. Dropping a returned
//! future abandons its in-flight lookups; nothing is retried.

use std::collections::HashSet;

use futures::future::{BoxFuture, FutureExt as _, try_join, try_join_all};

use crate::{
  Error, Result,
  event::Quantity,
  lineage::{Lineage, LineageNode, UnitBalance},
  store::TraceStore,
};

/// Default generation ceiling for ancestor walks.
pub const DEFAULT_ANCESTOR_DEPTH: usize = 5;

/// Default ceiling for consumer walks. The current contract only ever
/// produces one level; see [`resolve_children`].
pub const DEFAULT_CHILD_DEPTH: usize = 3;

// ─── Ancestors ───────────────────────────────────────────────────────────────

/// Resolve the ancestor tree for `identifier`.
///
/// Returns `Ok(None)` when no production event carries the identifier.
/// Ancestors beyond `max_depth` generations are omitted silently; a node
/// whose input records were cut off by the ceiling is marked
/// [`truncated`](LineageNode::truncated). A parent identifier with no
/// production event is skipped and its siblings still resolve, so a node's
/// parent count may be lower than its consumption-record count. Any store
/// failure aborts the whole walk.
///
/// Sibling parents are looked up concurrently and joined in
/// consumption-record order, so the tree is deterministic for a fixed
/// store snapshot.
pub async fn resolve_ancestors<S: TraceStore>(
  store:      &S,
  identifier: &str,
  max_depth:  usize,
) -> Result<Option<LineageNode>> {
  if identifier.is_empty() {
    return Err(Error::EmptyIdentifier);
  }
  ascend(store, identifier.to_owned(), 0, max_depth, HashSet::new()).await
}

/// One level of the ancestor walk. `path` holds the identifiers already on
/// the root-to-node chain; a record pointing back into it is dropped the
/// same way a missing parent is.
fn ascend<'a, S: TraceStore>(
  store:      &'a S,
  identifier: String,
  depth:      usize,
  max_depth:  usize,
  path:       HashSet<String>,
) -> BoxFuture<'a, Result<Option<LineageNode>>> {
  async move {
    if depth >= max_depth {
      return Ok(None);
    }

    let Some(event) = store.find_event(&identifier).await.map_err(Error::store)?
    else {
      return Ok(None);
    };

    let records =
      store.inputs_of(event.event_id).await.map_err(Error::store)?;

    let mut node = LineageNode::from(event);
    if records.is_empty() {
      return Ok(Some(node));
    }

    if depth + 1 >= max_depth {
      // The next generation would exceed the ceiling; its lookups are
      // never issued.
      node.truncated = true;
      return Ok(Some(node));
    }

    let mut path = path;
    path.insert(node.identifier.clone());

    // try_join_all keeps record order and fails fast, aborting the whole
    // walk on the first store error.
    let resolved = try_join_all(
      records
        .into_iter()
        .filter(|r| !path.contains(&r.consumed_identifier))
        .map(|r| {
          ascend(store, r.consumed_identifier, depth + 1, max_depth, path.clone())
        }),
    )
    .await?;

    node.parents = resolved.into_iter().flatten().collect();
    Ok(Some(node))
  }
  .boxed()
}

// ─── Children ────────────────────────────────────────────────────────────────

/// Resolve the immediate consumers of `identifier`.
///
/// One node per consumption record referencing the identifier, in record
/// order, each carrying the *consuming* event's own attributes with an
/// empty parent list. The walk is deliberately one level deep: `max_depth`
/// is part of the contract for symmetry with [`resolve_ancestors`] (a
/// ceiling of `0` yields nothing), and descent into grandchildren is
/// reserved. A record whose consuming event cannot be found is skipped.
pub async fn resolve_children<S: TraceStore>(
  store:      &S,
  identifier: &str,
  max_depth:  usize,
) -> Result<Vec<LineageNode>> {
  if identifier.is_empty() {
    return Err(Error::EmptyIdentifier);
  }
  if max_depth == 0 {
    return Ok(Vec::new());
  }

  let records =
    store.consumers_of(identifier).await.map_err(Error::store)?;

  let events = try_join_all(
    records.into_iter().map(|r| store.get_event(r.consuming_event_id)),
  )
  .await
  .map_err(Error::store)?;

  Ok(events.into_iter().flatten().map(LineageNode::from).collect())
}

// ─── Combined view ───────────────────────────────────────────────────────────

/// Resolve ancestors and immediate consumers in one call, the shape served
/// by the lineage endpoint. `max_depth` bounds the ancestor walk; the
/// consumer side uses [`DEFAULT_CHILD_DEPTH`].
pub async fn resolve_lineage<S: TraceStore>(
  store:      &S,
  identifier: &str,
  max_depth:  usize,
) -> Result<Lineage> {
  let (ancestors, children) = try_join(
    resolve_ancestors(store, identifier, max_depth),
    resolve_children(store, identifier, DEFAULT_CHILD_DEPTH),
  )
  .await?;

  Ok(Lineage { ancestors, children })
}

// ─── Balance ─────────────────────────────────────────────────────────────────

/// Produced-versus-consumed aggregate for `identifier`.
///
/// `Ok(None)` when the unit is unknown. The remaining quantity may go
/// negative when upstream recording over-consumed the unit; conservation is
/// assumed by the recording process, not validated here.
pub async fn resolve_balance<S: TraceStore>(
  store:      &S,
  identifier: &str,
) -> Result<Option<UnitBalance>> {
  if identifier.is_empty() {
    return Err(Error::EmptyIdentifier);
  }

  let Some(event) = store.find_event(identifier).await.map_err(Error::store)?
  else {
    return Ok(None);
  };

  let consumed = store
    .consumers_of(identifier)
    .await
    .map_err(Error::store)?
    .iter()
    .fold(Quantity::default(), |acc, r| acc.add(&r.quantity));

  Ok(Some(UnitBalance {
    identifier: event.identifier,
    produced:   event.quantity,
    consumed,
    remaining:  event.quantity.sub(&consumed),
  }))
}
