use chrono::NaiveDate;
use recurring_core::recurrence::{EntryKind, NewRecurrence, Owner, Recurrence};
use recurring_core::schedule::FrequencyRule;
use uuid::Uuid;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// Baseline creation input; tests adjust the fields they care about.
pub fn new_recurrence(rule: FrequencyRule, start: NaiveDate) -> NewRecurrence {
    NewRecurrence {
        owner: Owner::personal(Uuid::new_v4()),
        kind: EntryKind::Expense,
        amount: 1200.0,
        description: "Rent".into(),
        category_id: None,
        rule,
        start_date: start,
        end_date: None,
    }
}

pub fn create(rule: FrequencyRule, start: NaiveDate) -> Recurrence {
    Recurrence::create(new_recurrence(rule, start)).expect("valid recurrence")
}
