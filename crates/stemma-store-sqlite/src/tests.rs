//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, NaiveTime};
use stemma_core::{
  event::{
    ItemCategory, ItemSummary, NewConsumption, NewProductionEvent,
    ProductionEvent, Quantity,
  },
  resolver::{
    DEFAULT_ANCESTOR_DEPTH, DEFAULT_CHILD_DEPTH, resolve_ancestors,
    resolve_balance, resolve_children, resolve_lineage,
  },
  store::TraceStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_event(identifier: &str, mass_kg: f64) -> NewProductionEvent {
  NewProductionEvent {
    identifier:  identifier.to_owned(),
    item:        ItemSummary {
      code:     format!("IT-{identifier}"),
      name:     format!("{identifier} item"),
      category: ItemCategory::Intermediate,
    },
    quantity:    Quantity::mass(mass_kg),
    produced_on: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
    produced_at: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
    operator:    "Marta".to_owned(),
    equipment:   Some("line-2".to_owned()),
  }
}

async fn produce(s: &SqliteStore, identifier: &str, mass_kg: f64) -> ProductionEvent {
  s.record_event(new_event(identifier, mass_kg)).await.unwrap()
}

async fn consume(
  s:        &SqliteStore,
  consumer: &ProductionEvent,
  consumed: &str,
  mass_kg:  f64,
) {
  s.record_consumption(NewConsumption {
    consuming_event_id:  consumer.event_id,
    consumed_identifier: consumed.to_owned(),
    quantity:            Quantity::mass(mass_kg),
  })
  .await
  .unwrap();
}

// ─── Recording and lookup ────────────────────────────────────────────────────

#[tokio::test]
async fn record_event_and_find_by_identifier() {
  let s = store().await;

  let recorded = produce(&s, "RM-0001", 120.5).await;
  assert_eq!(recorded.identifier, "RM-0001");

  let fetched = s.find_event("RM-0001").await.unwrap().unwrap();
  assert_eq!(fetched, recorded);
}

#[tokio::test]
async fn find_event_missing_returns_none() {
  let s = store().await;
  let result = s.find_event("NOPE-1").await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn get_event_by_row_id() {
  let s = store().await;
  let recorded = produce(&s, "RM-0002", 10.0).await;

  let fetched = s.get_event(recorded.event_id).await.unwrap().unwrap();
  assert_eq!(fetched.identifier, "RM-0002");

  assert!(s.get_event(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn event_fields_roundtrip() {
  let s = store().await;

  let mut input = new_event("FN-0001", 3.25);
  input.quantity = Quantity { mass_kg: Some(3.25), length_m: Some(1200.0) };
  input.equipment = None;
  let recorded = s.record_event(input).await.unwrap();

  let fetched = s.find_event("FN-0001").await.unwrap().unwrap();
  assert_eq!(fetched.quantity.mass_kg, Some(3.25));
  assert_eq!(fetched.quantity.length_m, Some(1200.0));
  assert_eq!(fetched.produced_on, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
  assert_eq!(fetched.produced_at, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
  assert!(fetched.equipment.is_none());
  assert_eq!(fetched.recorded_at, recorded.recorded_at);
}

// ─── Recording validation ────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_identifier_is_rejected() {
  let s = store().await;
  produce(&s, "RM-0001", 1.0).await;

  let err = s.record_event(new_event("RM-0001", 2.0)).await.unwrap_err();
  assert!(matches!(err, crate::Error::DuplicateIdentifier(id) if id == "RM-0001"));
}

#[tokio::test]
async fn empty_identifier_is_rejected() {
  let s = store().await;
  let err = s.record_event(new_event("", 1.0)).await.unwrap_err();
  assert!(matches!(err, crate::Error::EmptyIdentifier));
}

#[tokio::test]
async fn quantity_must_have_a_component() {
  let s = store().await;

  let mut input = new_event("RM-0001", 1.0);
  input.quantity = Quantity::default();
  let err = s.record_event(input).await.unwrap_err();
  assert!(matches!(err, crate::Error::EmptyQuantity));
}

#[tokio::test]
async fn negative_quantity_is_rejected() {
  let s = store().await;

  let mut input = new_event("RM-0001", 1.0);
  input.quantity = Quantity::mass(-4.0);
  let err = s.record_event(input).await.unwrap_err();
  assert!(matches!(err, crate::Error::NegativeQuantity));
}

#[tokio::test]
async fn consumption_requires_existing_event() {
  let s = store().await;

  let err = s
    .record_consumption(NewConsumption {
      consuming_event_id:  Uuid::new_v4(),
      consumed_identifier: "RM-0001".to_owned(),
      quantity:            Quantity::mass(1.0),
    })
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::EventNotFound(_)));
}

#[tokio::test]
async fn consumption_of_unrecorded_identifier_is_allowed() {
  // The consumed side is a plain serial; recording may run ahead of it.
  let s = store().await;
  let consumer = produce(&s, "IN-0001", 5.0).await;
  consume(&s, &consumer, "NOT-YET-RECORDED", 5.0).await;

  let inputs = s.inputs_of(consumer.event_id).await.unwrap();
  assert_eq!(inputs.len(), 1);
  assert_eq!(inputs[0].consumed_identifier, "NOT-YET-RECORDED");
}

// ─── Consumption queries ─────────────────────────────────────────────────────

#[tokio::test]
async fn inputs_and_consumers_are_distinct_directions() {
  let s = store().await;
  produce(&s, "A", 100.0).await;
  let b = produce(&s, "B", 40.0).await;
  let c = produce(&s, "C", 60.0).await;
  consume(&s, &b, "A", 40.0).await;
  consume(&s, &c, "A", 60.0).await;

  let inputs = s.inputs_of(b.event_id).await.unwrap();
  assert_eq!(inputs.len(), 1);
  assert_eq!(inputs[0].consumed_identifier, "A");

  let consumers = s.consumers_of("A").await.unwrap();
  assert_eq!(consumers.len(), 2);
  assert_eq!(consumers[0].consuming_event_id, b.event_id);
  assert_eq!(consumers[1].consuming_event_id, c.event_id);

  assert!(s.consumers_of("B").await.unwrap().is_empty());
}

// ─── Resolver over SQLite ────────────────────────────────────────────────────

/// Raw unit A consumed by B and C; B consumed in turn by D.
async fn diamond() -> SqliteStore {
  let s = store().await;
  produce(&s, "A", 100.0).await;
  let b = produce(&s, "B", 40.0).await;
  let c = produce(&s, "C", 60.0).await;
  let d = produce(&s, "D", 35.0).await;
  consume(&s, &b, "A", 40.0).await;
  consume(&s, &c, "A", 60.0).await;
  consume(&s, &d, "B", 35.0).await;
  s
}

#[tokio::test]
async fn ancestors_resolve_through_sql() {
  let s = diamond().await;

  let d = resolve_ancestors(&s, "D", DEFAULT_ANCESTOR_DEPTH)
    .await
    .unwrap()
    .unwrap();
  assert_eq!(d.identifier, "D");
  assert_eq!(d.parents.len(), 1);
  assert_eq!(d.parents[0].identifier, "B");
  assert_eq!(d.parents[0].parents[0].identifier, "A");
  assert!(d.parents[0].parents[0].parents.is_empty());
}

#[tokio::test]
async fn children_resolve_through_sql() {
  let s = diamond().await;

  let children = resolve_children(&s, "A", DEFAULT_CHILD_DEPTH)
    .await
    .unwrap();
  let ids: Vec<_> = children.iter().map(|c| c.identifier.as_str()).collect();
  assert_eq!(ids, ["B", "C"]);
  assert!(children.iter().all(|c| c.parents.is_empty()));
}

#[tokio::test]
async fn lineage_view_through_sql() {
  let s = diamond().await;

  let lineage = resolve_lineage(&s, "B", DEFAULT_ANCESTOR_DEPTH)
    .await
    .unwrap();
  assert_eq!(lineage.ancestors.unwrap().parents[0].identifier, "A");
  assert_eq!(lineage.children.len(), 1);
  assert_eq!(lineage.children[0].identifier, "D");
}

#[tokio::test]
async fn deep_chain_is_truncated_at_the_ceiling() {
  let s = store().await;
  let mut prev: Option<ProductionEvent> = None;
  for i in 1..=6 {
    let event = produce(&s, &format!("L{i}"), 10.0).await;
    if let Some(p) = prev {
      consume(&s, &event, &p.identifier, 10.0).await;
    }
    prev = Some(event);
  }

  let tree = resolve_ancestors(&s, "L6", 5).await.unwrap().unwrap();
  let mut node = &tree;
  while !node.parents.is_empty() {
    node = &node.parents[0];
  }
  assert_eq!(node.identifier, "L2");
  assert!(node.truncated);
}

#[tokio::test]
async fn balance_through_sql() {
  let s = diamond().await;

  let balance = resolve_balance(&s, "A").await.unwrap().unwrap();
  assert_eq!(balance.produced, Quantity::mass(100.0));
  assert_eq!(balance.consumed, Quantity::mass(100.0));
  assert_eq!(balance.remaining, Quantity::mass(0.0));

  let untouched = resolve_balance(&s, "C").await.unwrap().unwrap();
  assert_eq!(untouched.consumed, Quantity::default());
  assert_eq!(untouched.remaining, Quantity::mass(60.0));
}
