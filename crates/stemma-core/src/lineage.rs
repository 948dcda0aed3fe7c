//! Resolver output types — computed read models, never persisted.
//!
//! [`LineageNode`] is one node of a resolved ancestor tree, constructed
//! fresh per query and owned by the caller. [`CompactLineage`] is its
//! minimal shadow, sized for embedding in a printed and scanned code
//! payload.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::event::{ItemCategory, ItemSummary, ProductionEvent, Quantity};

// ─── Lineage tree ────────────────────────────────────────────────────────────

/// One node in a resolved ancestor tree. `parents` points from descendant
/// toward ancestor: each entry is a unit this one consumed as input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageNode {
  pub identifier:  String,
  pub item:        ItemSummary,
  pub quantity:    Quantity,
  pub produced_on: NaiveDate,
  pub produced_at: NaiveTime,
  pub operator:    String,
  pub equipment:   Option<String>,
  /// True when this unit has input records that the depth ceiling cut off:
  /// an empty `parents` list here does not mean "raw material".
  #[serde(default)]
  pub truncated:   bool,
  #[serde(default)]
  pub parents:     Vec<LineageNode>,
}

impl From<ProductionEvent> for LineageNode {
  /// A childless node carrying the event's attributes.
  fn from(event: ProductionEvent) -> Self {
    Self {
      identifier:  event.identifier,
      item:        event.item,
      quantity:    event.quantity,
      produced_on: event.produced_on,
      produced_at: event.produced_at,
      operator:    event.operator,
      equipment:   event.equipment,
      truncated:   false,
      parents:     Vec::new(),
    }
  }
}

impl LineageNode {
  /// Project the tree into its compact printable shadow.
  ///
  /// Pure and total: copies only the fields below, recursively, and encodes
  /// an empty parent list as absent so the serialised form stays minimal.
  pub fn to_compact(&self) -> CompactLineage {
    CompactLineage {
      identifier:  self.identifier.clone(),
      item_code:   self.item.code.clone(),
      category:    self.item.category,
      quantity:    self.quantity,
      produced_on: self.produced_on,
      parents:     if self.parents.is_empty() {
        None
      } else {
        Some(self.parents.iter().map(Self::to_compact).collect())
      },
    }
  }
}

// ─── Compact form ────────────────────────────────────────────────────────────

/// Minimal serialisable shadow of a [`LineageNode`] for a printed code
/// payload. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactLineage {
  pub identifier:  String,
  pub item_code:   String,
  pub category:    ItemCategory,
  pub quantity:    Quantity,
  pub produced_on: NaiveDate,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub parents:     Option<Vec<CompactLineage>>,
}

// ─── Combined view ───────────────────────────────────────────────────────────

/// The ancestor-and-consumer view backing the lineage endpoint.
/// `ancestors` is `None` when the identifier has no production event —
/// absence, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lineage {
  pub ancestors: Option<LineageNode>,
  pub children:  Vec<LineageNode>,
}

// ─── Stock balance ───────────────────────────────────────────────────────────

/// Produced-versus-consumed aggregate for one unit.
///
/// `remaining` is component-wise `produced - consumed` and may go negative
/// when upstream recording over-consumed a unit; the resolver reports the
/// arithmetic, it does not police it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitBalance {
  pub identifier: String,
  pub produced:   Quantity,
  pub consumed:   Quantity,
  pub remaining:  Quantity,
}
