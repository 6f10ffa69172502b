#![doc(test(attr(deny(warnings))))]

//! Recurring Core computes when repeating financial obligations fall due and
//! resolves each due occurrence into either a permanent ledger record or a
//! silently advanced schedule.

pub mod engine;
pub mod errors;
pub mod ledger;
pub mod recurrence;
pub mod schedule;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Recurring Core tracing initialized.");
    });
}
