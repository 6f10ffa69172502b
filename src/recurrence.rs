//! Recurrence templates: the persisted state of one repeating transaction.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, ScheduleError};
use crate::ledger::NewLedgerRecord;
use crate::schedule::{calculator, FrequencyRule};

/// Whether a recurrence books money out or in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EntryKind {
    Expense,
    Income,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Expense => f.write_str("expense"),
            EntryKind::Income => f.write_str("income"),
        }
    }
}

/// Account (and optional shared group) a schedule belongs to. Opaque to the
/// scheduler; carried verbatim onto generated ledger records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Owner {
    pub account_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
}

impl Owner {
    pub fn personal(account_id: Uuid) -> Self {
        Self {
            account_id,
            group_id: None,
        }
    }

    pub fn shared(account_id: Uuid, group_id: Uuid) -> Self {
        Self {
            account_id,
            group_id: Some(group_id),
        }
    }
}

/// Creation input for a recurrence template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecurrence {
    pub owner: Owner,
    pub kind: EntryKind,
    pub amount: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub rule: FrequencyRule,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// One persisted recurring template with its schedule cursor.
///
/// `next_due_date` never precedes `start_date` and never moves backward;
/// advances that would pass `end_date` flip `active` off instead of
/// producing further occurrences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recurrence {
    pub id: Uuid,
    pub owner: Owner,
    pub kind: EntryKind,
    pub amount: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub rule: FrequencyRule,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub next_due_date: NaiveDate,
    pub active: bool,
}

impl Recurrence {
    /// Validates the input, computes the first due date, and returns the
    /// template ready for storage.
    pub fn create(input: NewRecurrence) -> Result<Recurrence> {
        if !input.amount.is_finite() || input.amount <= 0.0 {
            return Err(ScheduleError::NonPositiveAmount(input.amount));
        }
        input.rule.validate()?;
        let next_due_date = calculator::initial_due_date(input.start_date, &input.rule)?;
        // A window that closes before the first occurrence leaves nothing to run.
        let active = input.end_date.map_or(true, |end| next_due_date <= end);
        Ok(Recurrence {
            id: Uuid::new_v4(),
            owner: input.owner,
            kind: input.kind,
            amount: input.amount,
            description: input.description,
            category_id: input.category_id,
            rule: input.rule,
            start_date: input.start_date,
            end_date: input.end_date,
            next_due_date,
            active,
        })
    }

    /// Returns a copy with the cursor moved one occurrence forward,
    /// deactivated when the new cursor is strictly past `end_date`.
    pub fn advanced(&self) -> Result<Recurrence> {
        let next = calculator::next_due_date(self.next_due_date, &self.rule)?;
        let mut advanced = self.clone();
        advanced.next_due_date = next;
        if let Some(end) = self.end_date {
            if next > end {
                advanced.active = false;
            }
        }
        Ok(advanced)
    }

    /// Ledger payload for the occurrence currently at the cursor.
    pub fn draft_record(&self) -> NewLedgerRecord {
        NewLedgerRecord {
            owner: self.owner,
            kind: self.kind,
            amount: self.amount,
            description: self.description.clone(),
            category_id: self.category_id,
            date: self.next_due_date,
            recurrence_id: self.id,
        }
    }
}
