use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, ScheduleError};

/// How often a recurrence repeats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Frequency {
    Weekly,
    Monthly,
    Yearly,
    Custom,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
            Frequency::Custom => "custom",
        };
        f.write_str(label)
    }
}

impl FromStr for Frequency {
    type Err = ScheduleError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            "yearly" => Ok(Frequency::Yearly),
            "custom" => Ok(Frequency::Custom),
            _ => Err(ScheduleError::InvalidFrequency(tag.to_string())),
        }
    }
}

/// Immutable schedule rule for one recurrence.
///
/// Which optional fields must be present depends on `frequency`:
/// weekly needs `day_of_week` (0 = Monday, matching
/// `chrono::Weekday::num_days_from_monday`), monthly needs `day_of_month`,
/// yearly needs `day_of_month` and `month_of_year`, custom needs `interval`
/// in days.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrequencyRule {
    pub frequency: Frequency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_of_week: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_of_year: Option<u32>,
}

impl FrequencyRule {
    pub fn weekly(day_of_week: u32) -> Self {
        Self {
            frequency: Frequency::Weekly,
            interval: None,
            day_of_month: None,
            day_of_week: Some(day_of_week),
            month_of_year: None,
        }
    }

    pub fn monthly(day_of_month: u32) -> Self {
        Self {
            frequency: Frequency::Monthly,
            interval: None,
            day_of_month: Some(day_of_month),
            day_of_week: None,
            month_of_year: None,
        }
    }

    pub fn yearly(month_of_year: u32, day_of_month: u32) -> Self {
        Self {
            frequency: Frequency::Yearly,
            interval: None,
            day_of_month: Some(day_of_month),
            day_of_week: None,
            month_of_year: Some(month_of_year),
        }
    }

    pub fn custom(interval: u32) -> Self {
        Self {
            frequency: Frequency::Custom,
            interval: Some(interval),
            day_of_month: None,
            day_of_week: None,
            month_of_year: None,
        }
    }

    /// Checks that every field the frequency depends on is present and in
    /// range. Runs once at creation, before the recurrence is persisted.
    pub fn validate(&self) -> Result<()> {
        match self.frequency {
            Frequency::Weekly => {
                let day = require(self.day_of_week, self.frequency, "day_of_week")?;
                if day > 6 {
                    return Err(ScheduleError::FieldOutOfRange {
                        field: "day_of_week",
                        value: day,
                    });
                }
            }
            Frequency::Monthly => {
                let day = require(self.day_of_month, self.frequency, "day_of_month")?;
                if !(1..=31).contains(&day) {
                    return Err(ScheduleError::FieldOutOfRange {
                        field: "day_of_month",
                        value: day,
                    });
                }
            }
            Frequency::Yearly => {
                let day = require(self.day_of_month, self.frequency, "day_of_month")?;
                if !(1..=31).contains(&day) {
                    return Err(ScheduleError::FieldOutOfRange {
                        field: "day_of_month",
                        value: day,
                    });
                }
                let month = require(self.month_of_year, self.frequency, "month_of_year")?;
                if !(1..=12).contains(&month) {
                    return Err(ScheduleError::FieldOutOfRange {
                        field: "month_of_year",
                        value: month,
                    });
                }
            }
            Frequency::Custom => {
                let interval = require(self.interval, self.frequency, "interval")?;
                if interval == 0 {
                    return Err(ScheduleError::NonPositiveInterval(interval));
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn require(value: Option<u32>, frequency: Frequency, field: &'static str) -> Result<u32> {
    value.ok_or(ScheduleError::MissingFrequencyField { frequency, field })
}
