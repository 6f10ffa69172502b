//! Due-date arithmetic for frequency rules.
//!
//! Everything here is pure: identical inputs always produce the identical
//! output, and no function reads a clock. All calendar clamping flows through
//! [`clamped_date`], so the month-length edge cases behave the same for the
//! initial computation and for every later advance.

use chrono::{Datelike, Duration, NaiveDate};

use super::frequency::{require, Frequency, FrequencyRule};
use crate::errors::Result;

/// First due date on or after `start` for the given rule.
pub fn initial_due_date(start: NaiveDate, rule: &FrequencyRule) -> Result<NaiveDate> {
    match rule.frequency {
        Frequency::Weekly => {
            let target = require(rule.day_of_week, rule.frequency, "day_of_week")?;
            let current = start.weekday().num_days_from_monday();
            let ahead = (target % 7 + 7 - current) % 7;
            Ok(start + Duration::days(ahead as i64))
        }
        Frequency::Monthly => {
            let day = require(rule.day_of_month, rule.frequency, "day_of_month")?;
            let candidate = clamped_date(start.year(), start.month(), day);
            if candidate < start {
                let (year, month) = month_after(start.year(), start.month());
                Ok(clamped_date(year, month, day))
            } else {
                Ok(candidate)
            }
        }
        Frequency::Yearly => {
            let day = require(rule.day_of_month, rule.frequency, "day_of_month")?;
            let month = require(rule.month_of_year, rule.frequency, "month_of_year")?.clamp(1, 12);
            let candidate = clamped_date(start.year(), month, day);
            if candidate < start {
                Ok(clamped_date(start.year() + 1, month, day))
            } else {
                Ok(candidate)
            }
        }
        Frequency::Custom => Ok(start),
    }
}

/// Due date following `current` under the rule.
pub fn next_due_date(current: NaiveDate, rule: &FrequencyRule) -> Result<NaiveDate> {
    match rule.frequency {
        // The configured weekday is anchored by the initial computation and
        // not re-checked afterwards.
        Frequency::Weekly => Ok(current + Duration::days(7)),
        Frequency::Monthly => {
            let day = require(rule.day_of_month, rule.frequency, "day_of_month")?;
            let (year, month) = month_after(current.year(), current.month());
            Ok(clamped_date(year, month, day))
        }
        Frequency::Yearly => {
            let day = require(rule.day_of_month, rule.frequency, "day_of_month")?;
            let month = rule.month_of_year.unwrap_or(current.month()).clamp(1, 12);
            Ok(clamped_date(current.year() + 1, month, day))
        }
        Frequency::Custom => {
            // Validation requires `interval`; tolerate its absence by
            // advancing a single day.
            let step = rule.interval.unwrap_or(1).max(1);
            Ok(current + Duration::days(step as i64))
        }
    }
}

/// Builds `year-month-day`, reducing `day` to the last valid day of the month
/// when the literal day does not exist.
fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.min(days_in_month(year, month)).max(1);
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn month_after(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = month_after(year, month);
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    (first_next - Duration::days(1)).day()
}
