//! Resolves due occurrences: execute books a ledger record and advances the
//! schedule, skip advances silently.
//!
//! The repository's compare-and-swap is the serialization point: the advanced
//! entity is saved before the ledger sink is touched, so of two concurrent
//! calls against the same recurrence only one can claim an occurrence. If the
//! sink append fails after the claim, the pre-advance entity is restored under
//! the claimed version and the call surfaces `Transaction` with no net
//! effects, leaving the caller free to resubmit the identical request.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::{Result, ScheduleError};
use crate::ledger::LedgerSink;
use crate::recurrence::EntryKind;
use crate::storage::{RecurrenceRepository, Versioned};

/// Outcome of a successful execute.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReceipt {
    pub message: String,
    pub ledger_record_id: Uuid,
    pub kind: EntryKind,
    pub next_due_date: NaiveDate,
}

#[derive(Clone)]
pub struct ExecutionEngine {
    repository: Arc<dyn RecurrenceRepository>,
    ledger: Arc<dyn LedgerSink>,
}

impl ExecutionEngine {
    pub fn new(repository: Arc<dyn RecurrenceRepository>, ledger: Arc<dyn LedgerSink>) -> Self {
        Self { repository, ledger }
    }

    /// Books a ledger record for the occurrence at the cursor and advances
    /// the schedule.
    pub fn execute(&self, id: Uuid) -> Result<ExecutionReceipt> {
        let Versioned {
            value: current,
            version,
        } = self.repository.load(id)?;
        if !current.active {
            return Err(ScheduleError::InactiveRecurrence(id));
        }

        let due_date = current.next_due_date;
        let record = current.draft_record();
        let advanced = current.advanced()?;
        let claimed = self.repository.save(&advanced, version)?;

        match self.ledger.append(record) {
            Ok(record_id) => {
                tracing::debug!(
                    recurrence = %id,
                    record = %record_id,
                    due = %due_date,
                    next = %advanced.next_due_date,
                    "executed recurring occurrence"
                );
                Ok(ExecutionReceipt {
                    message: format!(
                        "Recorded {} \"{}\" dated {due_date}; next due {}",
                        current.kind, current.description, advanced.next_due_date
                    ),
                    ledger_record_id: record_id,
                    kind: current.kind,
                    next_due_date: advanced.next_due_date,
                })
            }
            Err(append_err) => {
                if let Err(rollback_err) = self.repository.save(&current, claimed) {
                    tracing::error!(
                        recurrence = %id,
                        error = %rollback_err,
                        "cursor rollback failed after ledger append error"
                    );
                }
                Err(ScheduleError::Transaction(format!(
                    "ledger append failed: {append_err}"
                )))
            }
        }
    }

    /// Advances the schedule without booking a record; returns the new cursor.
    pub fn skip(&self, id: Uuid) -> Result<NaiveDate> {
        let Versioned {
            value: current,
            version,
        } = self.repository.load(id)?;
        if !current.active {
            return Err(ScheduleError::InactiveRecurrence(id));
        }

        let advanced = current.advanced()?;
        self.repository.save(&advanced, version)?;
        tracing::debug!(
            recurrence = %id,
            next = %advanced.next_due_date,
            active = advanced.active,
            "skipped recurring occurrence"
        );
        Ok(advanced.next_due_date)
    }
}
