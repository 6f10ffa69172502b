//! Pure schedule computation: frequency rules and due-date arithmetic.

pub mod calculator;
pub mod frequency;

pub use calculator::{initial_due_date, next_due_date};
pub use frequency::{Frequency, FrequencyRule};
