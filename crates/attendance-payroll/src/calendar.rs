//! Resolution of the month a report covers.

use chrono::{Datelike, Month, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportMonth {
    year: i32,
    month: u32,
}

impl ReportMonth {
    /// Returns `None` if the combination does not name a representable month.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(ReportMonth { year, month })
    }

    /// Pick the report month from optional user input, falling back to `today`
    /// for anything missing or invalid.
    pub fn resolve(year: Option<i32>, month: Option<u32>, today: NaiveDate) -> Self {
        let month = match month {
            Some(month) if (1..=12).contains(&month) => month,
            Some(month) => {
                tracing::warn!(month, "Invalid month, using {}", today.month());
                today.month()
            }
            None => today.month(),
        };
        let year = match year {
            Some(year) if NaiveDate::from_ymd_opt(year, month, 1).is_some() => year,
            Some(year) => {
                tracing::warn!(year, "Invalid year, using {}", today.year());
                today.year()
            }
            None => today.year(),
        };

        ReportMonth { year, month }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // checked on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// Every date of the month, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.first_day()
            .iter_days()
            .take_while(|date| date.month() == self.month)
            .collect()
    }

    pub fn days(&self) -> usize {
        self.dates().len()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn name(&self) -> &'static str {
        Month::try_from(self.month as u8)
            .map(|month| month.name())
            .unwrap_or("Unknown")
    }
}

impl std::fmt::Display for ReportMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}
