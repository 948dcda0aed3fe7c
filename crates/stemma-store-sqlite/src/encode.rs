//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, production dates as ISO 8601
//! dates, times of day as `HH:MM:SS`. UUIDs are stored as hyphenated
//! lowercase strings. Quantities are split into two nullable REAL columns.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use stemma_core::event::{
  ConsumptionRecord, ItemCategory, ItemSummary, ProductionEvent, Quantity,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Parse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::Parse(e.to_string()))
}

pub fn encode_time(t: NaiveTime) -> String { t.format("%H:%M:%S").to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, "%H:%M:%S").map_err(|e| Error::Parse(e.to_string()))
}

// ─── ItemCategory ────────────────────────────────────────────────────────────

pub fn encode_category(c: ItemCategory) -> &'static str {
  match c {
    ItemCategory::RawMaterial => "raw_material",
    ItemCategory::Intermediate => "intermediate",
    ItemCategory::Finished => "finished",
  }
}

pub fn decode_category(s: &str) -> Result<ItemCategory> {
  match s {
    "raw_material" => Ok(ItemCategory::RawMaterial),
    "intermediate" => Ok(ItemCategory::Intermediate),
    "finished" => Ok(ItemCategory::Finished),
    other => Err(Error::Parse(format!("unknown item category: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `production_events` row.
pub struct RawEvent {
  pub event_id:      String,
  pub identifier:    String,
  pub item_code:     String,
  pub item_name:     String,
  pub item_category: String,
  pub mass_kg:       Option<f64>,
  pub length_m:      Option<f64>,
  pub produced_on:   String,
  pub produced_at:   String,
  pub operator:      String,
  pub equipment:     Option<String>,
  pub recorded_at:   String,
}

impl RawEvent {
  pub fn into_event(self) -> Result<ProductionEvent> {
    Ok(ProductionEvent {
      event_id:    decode_uuid(&self.event_id)?,
      identifier:  self.identifier,
      item:        ItemSummary {
        code:     self.item_code,
        name:     self.item_name,
        category: decode_category(&self.item_category)?,
      },
      quantity:    Quantity {
        mass_kg:  self.mass_kg,
        length_m: self.length_m,
      },
      produced_on: decode_date(&self.produced_on)?,
      produced_at: decode_time(&self.produced_at)?,
      operator:    self.operator,
      equipment:   self.equipment,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw values read directly from a `consumptions` row.
pub struct RawConsumption {
  pub consumption_id:      String,
  pub consuming_event_id:  String,
  pub consumed_identifier: String,
  pub mass_kg:             Option<f64>,
  pub length_m:            Option<f64>,
  pub recorded_at:         String,
}

impl RawConsumption {
  pub fn into_record(self) -> Result<ConsumptionRecord> {
    Ok(ConsumptionRecord {
      consumption_id:      decode_uuid(&self.consumption_id)?,
      consuming_event_id:  decode_uuid(&self.consuming_event_id)?,
      consumed_identifier: self.consumed_identifier,
      quantity:            Quantity {
        mass_kg:  self.mass_kg,
        length_m: self.length_m,
      },
      recorded_at:         decode_dt(&self.recorded_at)?,
    })
  }
}
