//! Persistence contracts and bundled backends for recurrence templates.

pub mod json_backend;
pub mod memory;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::Result;
use crate::recurrence::Recurrence;

/// Entity snapshot paired with the version that guards its next write.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub value: T,
    pub version: u64,
}

/// Abstraction over recurrence stores.
///
/// `save` is a compare-and-swap: a write whose `expected_version` is stale
/// must be rejected without touching stored state, so concurrent advances
/// against the same entity serialize on the version column.
pub trait RecurrenceRepository: Send + Sync {
    /// Stores a new template at version 1.
    fn insert(&self, recurrence: Recurrence) -> Result<()>;

    /// Current state and version of the template.
    fn load(&self, id: Uuid) -> Result<Versioned<Recurrence>>;

    /// Replaces the stored state, returning the new version.
    fn save(&self, recurrence: &Recurrence, expected_version: u64) -> Result<u64>;

    /// Active templates whose cursor is due on or before `today`, ordered by
    /// due date. `today` is always supplied by the caller; the store never
    /// consults a clock.
    fn due_on_or_before(&self, today: NaiveDate) -> Result<Vec<Recurrence>>;
}

pub use json_backend::JsonStore;
pub use memory::MemoryStore;
