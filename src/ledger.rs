//! Ledger-sink contract and the record payloads appended through it.
//!
//! The ledger itself lives outside this crate; execution only ever calls
//! [`LedgerSink::append`], exactly once per successful execute.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::Result;
use crate::recurrence::{EntryKind, Owner};

/// Payload for one realized occurrence, handed to the sink.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewLedgerRecord {
    pub owner: Owner,
    pub kind: EntryKind,
    pub amount: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub date: NaiveDate,
    /// Provenance tag tying the record back to the recurrence that produced it.
    pub recurrence_id: Uuid,
}

/// A record as stored by a ledger backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerRecord {
    pub id: Uuid,
    pub owner: Owner,
    pub kind: EntryKind,
    pub amount: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub date: NaiveDate,
    pub recurrence_id: Uuid,
}

impl LedgerRecord {
    pub fn from_new(id: Uuid, record: NewLedgerRecord) -> Self {
        Self {
            id,
            owner: record.owner,
            kind: record.kind,
            amount: record.amount,
            description: record.description,
            category_id: record.category_id,
            date: record.date,
            recurrence_id: record.recurrence_id,
        }
    }
}

/// Append-only store of realized expense/income records.
pub trait LedgerSink: Send + Sync {
    /// Appends one record and returns its identifier.
    fn append(&self, record: NewLedgerRecord) -> Result<Uuid>;
}
