//! Production events and consumption records — the two record kinds of the
//! traceability graph.
//!
//! A production event is written once, when a unit leaves a workstation. A
//! consumption record is written once, when a later event uses a measured
//! portion of that unit as input. Neither is ever updated or deleted; the
//! resolver only reads them.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Catalog descriptor ──────────────────────────────────────────────────────

/// Catalog category of a produced unit's item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
  RawMaterial,
  Intermediate,
  Finished,
}

/// The catalog fields joined onto an event when it is read from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSummary {
  pub code:     String,
  pub name:     String,
  pub category: ItemCategory,
}

// ─── Quantity ────────────────────────────────────────────────────────────────

/// A produced or consumed amount. Units are weighed, measured, or both; at
/// least one component must be present when a record is written (enforced by
/// the store, not by this type).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quantity {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub mass_kg:  Option<f64>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub length_m: Option<f64>,
}

impl Quantity {
  pub fn mass(kg: f64) -> Self {
    Self { mass_kg: Some(kg), length_m: None }
  }

  pub fn length(m: f64) -> Self {
    Self { mass_kg: None, length_m: Some(m) }
  }

  pub fn is_empty(&self) -> bool {
    self.mass_kg.is_none() && self.length_m.is_none()
  }

  pub fn has_negative_component(&self) -> bool {
    self.mass_kg.is_some_and(|v| v < 0.0)
      || self.length_m.is_some_and(|v| v < 0.0)
  }

  /// Component-wise sum. A component absent on both sides stays absent;
  /// absent on one side counts as zero.
  pub fn add(&self, other: &Quantity) -> Quantity {
    Quantity {
      mass_kg:  sum_components(self.mass_kg, other.mass_kg),
      length_m: sum_components(self.length_m, other.length_m),
    }
  }

  /// Component-wise difference. May go negative; callers report, they do
  /// not police.
  pub fn sub(&self, other: &Quantity) -> Quantity {
    Quantity {
      mass_kg:  sum_components(self.mass_kg, other.mass_kg.map(|v| -v)),
      length_m: sum_components(self.length_m, other.length_m.map(|v| -v)),
    }
  }
}

fn sum_components(a: Option<f64>, b: Option<f64>) -> Option<f64> {
  match (a, b) {
    (None, None) => None,
    (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
  }
}

// ─── Production events ───────────────────────────────────────────────────────

/// One unit's creation. `identifier` is the human-readable serial printed on
/// the unit; it is assigned on the production floor and unique store-wide.
/// Once written, no field is ever updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionEvent {
  pub event_id:    Uuid,
  pub identifier:  String,
  pub item:        ItemSummary,
  pub quantity:    Quantity,
  pub produced_on: NaiveDate,
  pub produced_at: NaiveTime,
  pub operator:    String,
  pub equipment:   Option<String>,
  /// Server-assigned timestamp; never changes after creation.
  pub recorded_at: DateTime<Utc>,
}

/// Input to [`crate::store::TraceStore::record_event`].
/// `event_id` and `recorded_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewProductionEvent {
  pub identifier:  String,
  pub item:        ItemSummary,
  pub quantity:    Quantity,
  pub produced_on: NaiveDate,
  pub produced_at: NaiveTime,
  pub operator:    String,
  pub equipment:   Option<String>,
}

// ─── Consumption records ─────────────────────────────────────────────────────

/// One production event consuming a measured portion of a previously
/// produced unit. The consumed unit is referenced by its serial identifier
/// rather than its row id — scanned labels carry the serial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
  pub consumption_id:      Uuid,
  pub consuming_event_id:  Uuid,
  pub consumed_identifier: String,
  pub quantity:            Quantity,
  pub recorded_at:         DateTime<Utc>,
}

/// Input to [`crate::store::TraceStore::record_consumption`].
#[derive(Debug, Clone)]
pub struct NewConsumption {
  pub consuming_event_id:  Uuid,
  pub consumed_identifier: String,
  pub quantity:            Quantity,
}
