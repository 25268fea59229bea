//! Reconciling raw badge logs into one record per calendar day.

mod rules;

pub use rules::{WorkRules, span_minutes};

use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;

use crate::{Decimal, Direction, LogEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub is_weekend: bool,
    pub first_check_in: Option<NaiveTime>,
    pub last_check_out: Option<NaiveTime>,
    pub payable_minutes: Decimal,
}

impl DayRecord {
    fn absent(date: NaiveDate, is_weekend: bool) -> Self {
        DayRecord {
            date,
            is_weekend,
            first_check_in: None,
            last_check_out: None,
            payable_minutes: Decimal::ZERO,
        }
    }

    /// Minutes between check-in and check-out, if both exist in the right order.
    pub fn actual_minutes(&self) -> Option<Decimal> {
        let (check_in, check_out) = (self.first_check_in?, self.last_check_out?);
        if check_out < check_in {
            return None;
        }
        Some(span_minutes((check_out - check_in).num_seconds()))
    }

    pub fn is_present(&self) -> bool {
        self.payable_minutes > Decimal::ZERO
    }
}

#[derive(Default)]
struct DayBucket {
    first_check_in: Option<NaiveTime>,
    last_check_out: Option<NaiveTime>,
}

impl DayBucket {
    fn push(&mut self, entry: &LogEntry) {
        match entry.direction {
            Direction::CheckIn => {
                self.first_check_in = Some(match self.first_check_in {
                    Some(time) => time.min(entry.time),
                    None => entry.time,
                });
            }
            Direction::CheckOut => {
                self.last_check_out = Some(match self.last_check_out {
                    Some(time) => time.max(entry.time),
                    None => entry.time,
                });
            }
        }
    }
}

/// Produce exactly one [`DayRecord`] per date in `month_dates`, in the same order.
///
/// Entries dated outside `month_dates` are ignored. Several check-ins (or
/// check-outs) on one day collapse to the earliest check-in and the latest
/// check-out, so a split shift is treated as a single span.
pub fn reconcile(
    entries: &[LogEntry],
    month_dates: &[NaiveDate],
    rules: &WorkRules,
) -> Vec<DayRecord> {
    let mut buckets: BTreeMap<NaiveDate, DayBucket> = month_dates
        .iter()
        .map(|date| (*date, DayBucket::default()))
        .collect();

    for entry in entries {
        if let Some(bucket) = buckets.get_mut(&entry.date) {
            bucket.push(entry);
        }
    }

    month_dates
        .iter()
        .map(|&date| {
            let is_weekend = rules.is_rest_day(date);
            let Some(bucket) = buckets.remove(&date) else {
                // duplicate date in the input
                return DayRecord::absent(date, is_weekend);
            };

            let mut record = DayRecord {
                first_check_in: bucket.first_check_in,
                last_check_out: bucket.last_check_out,
                ..DayRecord::absent(date, is_weekend)
            };
            if let Some(actual) = record.actual_minutes() {
                record.payable_minutes = rules.payable_minutes(actual, is_weekend);
            }
            record
        })
        .collect()
}
