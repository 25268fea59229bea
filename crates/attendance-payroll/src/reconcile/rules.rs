use chrono::Weekday;
use rust_decimal::RoundingStrategy;
use serde::Deserialize;

use crate::Decimal;

const HOURS_PER_DAY: i64 = 24;

/// Business rules deciding how many minutes of a day are paid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawWorkRules")]
pub struct WorkRules {
    /// Hours that make up a full working day.
    pub full_day_hours: Decimal,
    /// A weekday shorter than a full day by at most this many minutes is paid in full.
    pub relief_minutes: Decimal,
    /// The weekly rest day, on which half a day of attendance counts as a full day.
    pub rest_day: Weekday,
}

impl Default for WorkRules {
    fn default() -> Self {
        WorkRules {
            full_day_hours: Decimal::new(105, 1),
            relief_minutes: Decimal::from(30),
            rest_day: Weekday::Sun,
        }
    }
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawWorkRules {
    full_day_hours: Decimal,
    relief_minutes: Decimal,
    rest_day: Weekday,
}

impl Default for RawWorkRules {
    fn default() -> Self {
        let rules = WorkRules::default();
        RawWorkRules {
            full_day_hours: rules.full_day_hours,
            relief_minutes: rules.relief_minutes,
            rest_day: rules.rest_day,
        }
    }
}

impl TryFrom<RawWorkRules> for WorkRules {
    type Error = String;

    fn try_from(raw: RawWorkRules) -> Result<Self, Self::Error> {
        if raw.full_day_hours <= Decimal::ZERO || raw.full_day_hours > Decimal::from(HOURS_PER_DAY)
        {
            return Err(format!(
                "full_day_hours must be greater than 0 and at most {HOURS_PER_DAY}, got {}",
                raw.full_day_hours
            ));
        }
        let full_day_minutes = raw.full_day_hours * Decimal::from(60);
        if raw.relief_minutes.is_sign_negative() || raw.relief_minutes > full_day_minutes {
            return Err(format!(
                "relief_minutes must be between 0 and {full_day_minutes}, got {}",
                raw.relief_minutes
            ));
        }

        Ok(WorkRules {
            full_day_hours: raw.full_day_hours,
            relief_minutes: raw.relief_minutes,
            rest_day: raw.rest_day,
        })
    }
}

impl WorkRules {
    pub fn full_day_minutes(&self) -> Decimal {
        self.full_day_hours * Decimal::from(60)
    }

    pub fn half_day_minutes(&self) -> Decimal {
        self.full_day_minutes() / Decimal::from(2)
    }

    pub fn is_rest_day(&self, date: chrono::NaiveDate) -> bool {
        chrono::Datelike::weekday(&date) == self.rest_day
    }

    /// Minutes credited for a day on which `actual_minutes` were worked.
    pub fn payable_minutes(&self, actual_minutes: Decimal, is_weekend: bool) -> Decimal {
        let expected = self.full_day_minutes();

        if is_weekend {
            return if actual_minutes >= self.half_day_minutes() {
                expected
            } else {
                actual_minutes
            };
        }

        if actual_minutes >= expected {
            // overtime is kept
            actual_minutes
        } else if expected - actual_minutes <= self.relief_minutes {
            expected
        } else {
            actual_minutes
        }
    }
}

/// Span between two clock readings in minutes, rounded to two decimals.
pub fn span_minutes(seconds: i64) -> Decimal {
    (Decimal::from(seconds) / Decimal::from(60))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
