mod common;

use std::sync::Arc;

use common::{create, date, new_recurrence};
use recurring_core::engine::ExecutionEngine;
use recurring_core::errors::ScheduleError;
use recurring_core::recurrence::{EntryKind, Recurrence};
use recurring_core::schedule::FrequencyRule;
use recurring_core::storage::{MemoryStore, RecurrenceRepository};
use uuid::Uuid;

fn engine_with_store() -> (ExecutionEngine, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let engine = ExecutionEngine::new(store.clone(), store.clone());
    (engine, store)
}

#[test]
fn execute_books_record_and_advances_cursor() {
    let (engine, store) = engine_with_store();
    let rec = create(FrequencyRule::monthly(25), date(2026, 2, 1));
    assert_eq!(rec.next_due_date, date(2026, 2, 25));
    store.insert(rec.clone()).unwrap();

    let receipt = engine.execute(rec.id).expect("execute due occurrence");

    assert_eq!(receipt.kind, EntryKind::Expense);
    assert_eq!(receipt.next_due_date, date(2026, 3, 25));
    assert!(receipt.message.contains("Rent"));

    let records = store.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, receipt.ledger_record_id);
    assert_eq!(records[0].date, date(2026, 2, 25));
    assert_eq!(records[0].amount, rec.amount);
    assert_eq!(records[0].description, rec.description);
    assert_eq!(records[0].owner, rec.owner);
    assert_eq!(records[0].recurrence_id, rec.id);

    let stored = store.load(rec.id).unwrap();
    assert_eq!(stored.version, 2);
    assert_eq!(stored.value.next_due_date, date(2026, 3, 25));
    assert!(stored.value.active);
}

#[test]
fn skip_advances_without_booking() {
    let (engine, store) = engine_with_store();
    let rec = create(FrequencyRule::weekly(0), date(2026, 2, 16));
    store.insert(rec.clone()).unwrap();

    let next = engine.skip(rec.id).expect("skip due occurrence");

    assert_eq!(next, date(2026, 2, 23));
    assert!(store.records().is_empty());
    assert_eq!(store.load(rec.id).unwrap().value.next_due_date, next);
}

#[test]
fn skip_past_end_date_deactivates() {
    let (engine, store) = engine_with_store();
    let mut input = new_recurrence(FrequencyRule::custom(14), date(2026, 2, 16));
    input.end_date = Some(date(2026, 3, 1));
    let rec = Recurrence::create(input).unwrap();
    assert_eq!(rec.next_due_date, date(2026, 2, 16));
    store.insert(rec.clone()).unwrap();

    let next = engine.skip(rec.id).unwrap();

    assert_eq!(next, date(2026, 3, 2));
    let stored = store.load(rec.id).unwrap().value;
    assert!(!stored.active, "2026-03-02 is past the 2026-03-01 end date");

    let err = engine.skip(rec.id).expect_err("no further occurrences");
    assert!(matches!(err, ScheduleError::InactiveRecurrence(id) if id == rec.id));
    assert_eq!(store.load(rec.id).unwrap().value.next_due_date, next);
}

#[test]
fn advance_landing_on_end_date_stays_active() {
    let (engine, store) = engine_with_store();
    let mut input = new_recurrence(FrequencyRule::weekly(0), date(2026, 2, 16));
    input.end_date = Some(date(2026, 2, 23));
    let rec = Recurrence::create(input).unwrap();
    store.insert(rec.clone()).unwrap();

    engine.execute(rec.id).unwrap();

    let stored = store.load(rec.id).unwrap().value;
    assert_eq!(stored.next_due_date, date(2026, 2, 23));
    assert!(stored.active, "a new due date equal to end_date keeps the schedule running");
}

#[test]
fn execute_on_inactive_recurrence_has_no_effects() {
    let (engine, store) = engine_with_store();
    let mut rec = create(FrequencyRule::monthly(25), date(2026, 2, 1));
    rec.active = false;
    store.insert(rec.clone()).unwrap();

    let err = engine.execute(rec.id).expect_err("inactive schedules stay put");

    assert!(matches!(err, ScheduleError::InactiveRecurrence(id) if id == rec.id));
    assert!(store.records().is_empty());
    let stored = store.load(rec.id).unwrap();
    assert_eq!(stored.version, 1);
    assert_eq!(stored.value.next_due_date, date(2026, 2, 25));
}

#[test]
fn execute_unknown_recurrence_reports_not_found() {
    let (engine, _store) = engine_with_store();
    let id = Uuid::new_v4();
    let err = engine.execute(id).expect_err("nothing stored");
    assert!(matches!(err, ScheduleError::NotFound(missing) if missing == id));
}

#[test]
fn execute_income_recurrence_carries_kind() {
    let (engine, store) = engine_with_store();
    let mut input = new_recurrence(FrequencyRule::monthly(28), date(2026, 1, 1));
    input.kind = EntryKind::Income;
    input.description = "Salary".into();
    input.amount = 4200.0;
    let rec = Recurrence::create(input).unwrap();
    store.insert(rec.clone()).unwrap();

    let receipt = engine.execute(rec.id).unwrap();

    assert_eq!(receipt.kind, EntryKind::Income);
    assert_eq!(store.records()[0].kind, EntryKind::Income);
    assert_eq!(store.records()[0].amount, 4200.0);
}

#[test]
fn pending_query_filters_and_orders_by_due_date() {
    let (_engine, store) = engine_with_store();
    let today = date(2026, 3, 1);

    let due_late = create(FrequencyRule::monthly(28), date(2026, 2, 1));
    let due_early = create(FrequencyRule::monthly(5), date(2026, 2, 1));
    let future = create(FrequencyRule::monthly(25), date(2026, 3, 1));
    let mut inactive = create(FrequencyRule::monthly(10), date(2026, 2, 1));
    inactive.active = false;

    store.insert(due_late.clone()).unwrap();
    store.insert(due_early.clone()).unwrap();
    store.insert(future).unwrap();
    store.insert(inactive).unwrap();

    let pending = store.due_on_or_before(today).unwrap();

    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].id, due_early.id);
    assert_eq!(pending[1].id, due_late.id);
    assert!(pending.iter().all(|rec| rec.next_due_date <= today));
}

#[test]
fn pending_query_is_driven_by_the_supplied_today() {
    let (_engine, store) = engine_with_store();
    let rec = create(FrequencyRule::monthly(25), date(2026, 2, 1));
    store.insert(rec).unwrap();

    assert!(store.due_on_or_before(date(2026, 2, 24)).unwrap().is_empty());
    assert_eq!(store.due_on_or_before(date(2026, 2, 25)).unwrap().len(), 1);
}
