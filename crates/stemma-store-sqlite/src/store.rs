//! [`SqliteStore`] — the SQLite implementation of [`TraceStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use stemma_core::{
  event::{
    ConsumptionRecord, NewConsumption, NewProductionEvent, ProductionEvent,
  },
  store::TraceStore,
};

use crate::{
  Error, Result,
  encode::{
    RawConsumption, RawEvent, encode_category, encode_date, encode_dt,
    encode_time, encode_uuid,
  },
  schema::SCHEMA,
};

/// `SELECT` column list shared by every event lookup; `read_event_row`
/// reads positionally against it.
const EVENT_BY_IDENTIFIER_SQL: &str = "SELECT event_id, identifier, item_code, item_name, item_category,
          mass_kg, length_m, produced_on, produced_at, operator,
          equipment, recorded_at
   FROM production_events WHERE identifier = ?1";

const EVENT_BY_ID_SQL: &str = "SELECT event_id, identifier, item_code, item_name, item_category,
          mass_kg, length_m, produced_on, produced_at, operator,
          equipment, recorded_at
   FROM production_events WHERE event_id = ?1";

/// Consumption lookups are ordered by recording time (rowid breaks ties),
/// which is what makes resolver output stable for a given store state.
const CONSUMPTIONS_BY_EVENT_SQL: &str = "SELECT consumption_id, consuming_event_id, consumed_identifier,
          mass_kg, length_m, recorded_at
   FROM consumptions WHERE consuming_event_id = ?1
   ORDER BY recorded_at, rowid";

const CONSUMPTIONS_BY_IDENTIFIER_SQL: &str = "SELECT consumption_id, consuming_event_id, consumed_identifier,
          mass_kg, length_m, recorded_at
   FROM consumptions WHERE consumed_identifier = ?1
   ORDER BY recorded_at, rowid";

fn read_event_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEvent> {
  Ok(RawEvent {
    event_id:      row.get(0)?,
    identifier:    row.get(1)?,
    item_code:     row.get(2)?,
    item_name:     row.get(3)?,
    item_category: row.get(4)?,
    mass_kg:       row.get(5)?,
    length_m:      row.get(6)?,
    produced_on:   row.get(7)?,
    produced_at:   row.get(8)?,
    operator:      row.get(9)?,
    equipment:     row.get(10)?,
    recorded_at:   row.get(11)?,
  })
}

fn read_consumption_row(
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<RawConsumption> {
  Ok(RawConsumption {
    consumption_id:      row.get(0)?,
    consuming_event_id:  row.get(1)?,
    consumed_identifier: row.get(2)?,
    mass_kg:             row.get(3)?,
    length_m:            row.get(4)?,
    recorded_at:         row.get(5)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A traceability store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Is `identifier` already carried by a recorded production event?
  async fn identifier_taken(&self, identifier: String) -> Result<bool> {
    let taken: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM production_events WHERE identifier = ?1",
              rusqlite::params![identifier],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(taken)
  }

  async fn event_exists(&self, event_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(event_id);
    let exists: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM production_events WHERE event_id = ?1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  /// Fetch a single event row by an exact-match column lookup.
  async fn query_event(
    &self,
    sql: &'static str,
    key: String,
  ) -> Result<Option<ProductionEvent>> {
    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(sql, rusqlite::params![key], read_event_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }

  /// Fetch consumption rows by an exact-match column lookup, in recording
  /// order.
  async fn query_consumptions(
    &self,
    sql: &'static str,
    key: String,
  ) -> Result<Vec<ConsumptionRecord>> {
    let raws: Vec<RawConsumption> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(rusqlite::params![key], read_consumption_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawConsumption::into_record).collect()
  }

  /// Insert a fully-built [`ProductionEvent`].
  async fn insert_event(&self, event: &ProductionEvent) -> Result<()> {
    let event_id_str    = encode_uuid(event.event_id);
    let identifier      = event.identifier.clone();
    let item_code       = event.item.code.clone();
    let item_name       = event.item.name.clone();
    let category_str    = encode_category(event.item.category).to_owned();
    let mass_kg         = event.quantity.mass_kg;
    let length_m        = event.quantity.length_m;
    let produced_on_str = encode_date(event.produced_on);
    let produced_at_str = encode_time(event.produced_at);
    let operator        = event.operator.clone();
    let equipment       = event.equipment.clone();
    let recorded_at_str = encode_dt(event.recorded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO production_events (
             event_id, identifier, item_code, item_name, item_category,
             mass_kg, length_m, produced_on, produced_at, operator,
             equipment, recorded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
          rusqlite::params![
            event_id_str,
            identifier,
            item_code,
            item_name,
            category_str,
            mass_kg,
            length_m,
            produced_on_str,
            produced_at_str,
            operator,
            equipment,
            recorded_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── TraceStore impl ─────────────────────────────────────────────────────────

impl TraceStore for SqliteStore {
  type Error = Error;

  // ── Reads ──────────────────────────────────────────────────────────────────

  async fn find_event(
    &self,
    identifier: &str,
  ) -> Result<Option<ProductionEvent>> {
    self
      .query_event(EVENT_BY_IDENTIFIER_SQL, identifier.to_owned())
      .await
  }

  async fn get_event(&self, event_id: Uuid) -> Result<Option<ProductionEvent>> {
    self.query_event(EVENT_BY_ID_SQL, encode_uuid(event_id)).await
  }

  async fn inputs_of(
    &self,
    consuming_event_id: Uuid,
  ) -> Result<Vec<ConsumptionRecord>> {
    self
      .query_consumptions(
        CONSUMPTIONS_BY_EVENT_SQL,
        encode_uuid(consuming_event_id),
      )
      .await
  }

  async fn consumers_of(
    &self,
    identifier: &str,
  ) -> Result<Vec<ConsumptionRecord>> {
    self
      .query_consumptions(
        CONSUMPTIONS_BY_IDENTIFIER_SQL,
        identifier.to_owned(),
      )
      .await
  }

  // ── Appends ────────────────────────────────────────────────────────────────

  async fn record_event(
    &self,
    input: NewProductionEvent,
  ) -> Result<ProductionEvent> {
    if input.identifier.is_empty() {
      return Err(Error::EmptyIdentifier);
    }
    if input.quantity.is_empty() {
      return Err(Error::EmptyQuantity);
    }
    if input.quantity.has_negative_component() {
      return Err(Error::NegativeQuantity);
    }
    if self.identifier_taken(input.identifier.clone()).await? {
      return Err(Error::DuplicateIdentifier(input.identifier));
    }

    let event = ProductionEvent {
      event_id:    Uuid::new_v4(),
      identifier:  input.identifier,
      item:        input.item,
      quantity:    input.quantity,
      produced_on: input.produced_on,
      produced_at: input.produced_at,
      operator:    input.operator,
      equipment:   input.equipment,
      recorded_at: Utc::now(),
    };

    self.insert_event(&event).await?;
    Ok(event)
  }

  async fn record_consumption(
    &self,
    input: NewConsumption,
  ) -> Result<ConsumptionRecord> {
    if input.consumed_identifier.is_empty() {
      return Err(Error::EmptyIdentifier);
    }
    if input.quantity.is_empty() {
      return Err(Error::EmptyQuantity);
    }
    if input.quantity.has_negative_component() {
      return Err(Error::NegativeQuantity);
    }
    if !self.event_exists(input.consuming_event_id).await? {
      return Err(Error::EventNotFound(input.consuming_event_id));
    }

    let record = ConsumptionRecord {
      consumption_id:      Uuid::new_v4(),
      consuming_event_id:  input.consuming_event_id,
      consumed_identifier: input.consumed_identifier,
      quantity:            input.quantity,
      recorded_at:         Utc::now(),
    };

    let consumption_id_str = encode_uuid(record.consumption_id);
    let event_id_str       = encode_uuid(record.consuming_event_id);
    let consumed           = record.consumed_identifier.clone();
    let mass_kg            = record.quantity.mass_kg;
    let length_m           = record.quantity.length_m;
    let recorded_at_str    = encode_dt(record.recorded_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO consumptions (
             consumption_id, consuming_event_id, consumed_identifier,
             mass_kg, length_m, recorded_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            consumption_id_str,
            event_id_str,
            consumed,
            mass_kg,
            length_m,
            recorded_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }
}
