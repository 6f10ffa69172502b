//! In-memory repository and ledger sink, for tests and embedded use.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use uuid::Uuid;

use super::{RecurrenceRepository, Versioned};
use crate::errors::{Result, ScheduleError};
use crate::ledger::{LedgerRecord, LedgerSink, NewLedgerRecord};
use crate::recurrence::Recurrence;

/// Mutex-guarded store keeping templates and appended records together, so a
/// single instance can serve as both collaborators of the execution engine.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    recurrences: HashMap<Uuid, Versioned<Recurrence>>,
    records: Vec<LedgerRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every appended ledger record, in append order.
    pub fn records(&self) -> Vec<LedgerRecord> {
        self.guard().records.clone()
    }

    pub fn record(&self, id: Uuid) -> Option<LedgerRecord> {
        self.guard()
            .records
            .iter()
            .find(|record| record.id == id)
            .cloned()
    }
}

impl RecurrenceRepository for MemoryStore {
    fn insert(&self, recurrence: Recurrence) -> Result<()> {
        let mut inner = self.guard();
        if inner.recurrences.contains_key(&recurrence.id) {
            return Err(ScheduleError::Transaction(format!(
                "recurrence {} already stored",
                recurrence.id
            )));
        }
        inner.recurrences.insert(
            recurrence.id,
            Versioned {
                value: recurrence,
                version: 1,
            },
        );
        Ok(())
    }

    fn load(&self, id: Uuid) -> Result<Versioned<Recurrence>> {
        self.guard()
            .recurrences
            .get(&id)
            .cloned()
            .ok_or(ScheduleError::NotFound(id))
    }

    fn save(&self, recurrence: &Recurrence, expected_version: u64) -> Result<u64> {
        let mut inner = self.guard();
        let slot = inner
            .recurrences
            .get_mut(&recurrence.id)
            .ok_or(ScheduleError::NotFound(recurrence.id))?;
        if slot.version != expected_version {
            return Err(ScheduleError::Transaction(format!(
                "version conflict for recurrence {}: expected {expected_version}, found {}",
                recurrence.id, slot.version
            )));
        }
        slot.value = recurrence.clone();
        slot.version += 1;
        Ok(slot.version)
    }

    fn due_on_or_before(&self, today: NaiveDate) -> Result<Vec<Recurrence>> {
        let inner = self.guard();
        let mut due: Vec<Recurrence> = inner
            .recurrences
            .values()
            .filter(|slot| slot.value.active && slot.value.next_due_date <= today)
            .map(|slot| slot.value.clone())
            .collect();
        due.sort_by_key(|rec| (rec.next_due_date, rec.id));
        Ok(due)
    }
}

impl LedgerSink for MemoryStore {
    fn append(&self, record: NewLedgerRecord) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.guard().records.push(LedgerRecord::from_new(id, record));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::{EntryKind, NewRecurrence, Owner};
    use crate::schedule::FrequencyRule;

    fn sample() -> Recurrence {
        Recurrence::create(NewRecurrence {
            owner: Owner::personal(Uuid::new_v4()),
            kind: EntryKind::Expense,
            amount: 9.99,
            description: "Streaming".into(),
            category_id: None,
            rule: FrequencyRule::monthly(1),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: None,
        })
        .unwrap()
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let store = MemoryStore::new();
        let rec = sample();
        store.insert(rec.clone()).unwrap();
        let err = store.insert(rec).expect_err("duplicate insert");
        assert!(matches!(err, ScheduleError::Transaction(_)));
    }

    #[test]
    fn save_rejects_stale_versions() {
        let store = MemoryStore::new();
        let rec = sample();
        store.insert(rec.clone()).unwrap();

        let loaded = store.load(rec.id).unwrap();
        assert_eq!(loaded.version, 1);
        assert_eq!(store.save(&loaded.value, 1).unwrap(), 2);

        let err = store.save(&loaded.value, 1).expect_err("stale version");
        assert!(matches!(err, ScheduleError::Transaction(ref m) if m.contains("conflict")));
        assert_eq!(store.load(rec.id).unwrap().version, 2);
    }

    #[test]
    fn load_reports_missing_entities() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        let err = store.load(id).expect_err("nothing stored");
        assert!(matches!(err, ScheduleError::NotFound(missing) if missing == id));
    }
}
