//! Write-through JSON persistence for recurrences and ledger records.
//!
//! State is kept in memory and flushed to a single schema-versioned JSON file
//! on every mutation; the in-memory copy only adopts a change after the file
//! write succeeded. Writes go through a temp file and rename.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{RecurrenceRepository, Versioned};
use crate::errors::{Result, ScheduleError};
use crate::ledger::{LedgerRecord, LedgerSink, NewLedgerRecord};
use crate::recurrence::Recurrence;

const CURRENT_SCHEMA_VERSION: u32 = 1;
const TMP_SUFFIX: &str = "tmp";

pub struct JsonStore {
    path: PathBuf,
    state: Mutex<Snapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default = "Snapshot::schema_version_default")]
    schema_version: u32,
    #[serde(default)]
    recurrences: Vec<StoredRecurrence>,
    #[serde(default)]
    records: Vec<LedgerRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRecurrence {
    version: u64,
    recurrence: Recurrence,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            recurrences: Vec::new(),
            records: Vec::new(),
        }
    }
}

impl Snapshot {
    fn schema_version_default() -> u32 {
        CURRENT_SCHEMA_VERSION
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.recurrences
            .iter()
            .position(|slot| slot.recurrence.id == id)
    }
}

impl JsonStore {
    /// Opens the store at `path`, loading persisted state when the file exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            Snapshot::default()
        };
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    fn guard(&self) -> MutexGuard<'_, Snapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, state: &Snapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        write_atomic(&self.path, &json)
    }

    /// Every appended ledger record, in append order.
    pub fn records(&self) -> Vec<LedgerRecord> {
        self.guard().records.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecurrenceRepository for JsonStore {
    fn insert(&self, recurrence: Recurrence) -> Result<()> {
        let mut state = self.guard();
        if state.position(recurrence.id).is_some() {
            return Err(ScheduleError::Transaction(format!(
                "recurrence {} already stored",
                recurrence.id
            )));
        }
        let mut next = state.clone();
        next.recurrences.push(StoredRecurrence {
            version: 1,
            recurrence,
        });
        self.persist(&next)?;
        *state = next;
        Ok(())
    }

    fn load(&self, id: Uuid) -> Result<Versioned<Recurrence>> {
        let state = self.guard();
        state
            .position(id)
            .map(|index| Versioned {
                value: state.recurrences[index].recurrence.clone(),
                version: state.recurrences[index].version,
            })
            .ok_or(ScheduleError::NotFound(id))
    }

    fn save(&self, recurrence: &Recurrence, expected_version: u64) -> Result<u64> {
        let mut state = self.guard();
        let index = state
            .position(recurrence.id)
            .ok_or(ScheduleError::NotFound(recurrence.id))?;
        let found = state.recurrences[index].version;
        if found != expected_version {
            return Err(ScheduleError::Transaction(format!(
                "version conflict for recurrence {}: expected {expected_version}, found {found}",
                recurrence.id
            )));
        }
        let mut next = state.clone();
        next.recurrences[index] = StoredRecurrence {
            version: expected_version + 1,
            recurrence: recurrence.clone(),
        };
        self.persist(&next)?;
        *state = next;
        Ok(expected_version + 1)
    }

    fn due_on_or_before(&self, today: NaiveDate) -> Result<Vec<Recurrence>> {
        let state = self.guard();
        let mut due: Vec<Recurrence> = state
            .recurrences
            .iter()
            .filter(|slot| slot.recurrence.active && slot.recurrence.next_due_date <= today)
            .map(|slot| slot.recurrence.clone())
            .collect();
        due.sort_by_key(|rec| (rec.next_due_date, rec.id));
        Ok(due)
    }
}

impl LedgerSink for JsonStore {
    fn append(&self, record: NewLedgerRecord) -> Result<Uuid> {
        let mut state = self.guard();
        let id = Uuid::new_v4();
        let mut next = state.clone();
        next.records.push(LedgerRecord::from_new(id, record));
        self.persist(&next)?;
        *state = next;
        Ok(id)
    }
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension(TMP_SUFFIX);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}
