//! Parsing the raw attendance payload into typed log entries.
//!
//! Malformed records and entries never fail the whole payload. Every entry
//! either becomes a [`LogEntry`] or a [`LogParseError`], so callers can count
//! what was dropped.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;

use crate::Decimal;

const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%I:%M:%S %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    CheckIn,
    CheckOut,
}

impl FromStr for Direction {
    type Err = LogParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Check-IN" => Ok(Direction::CheckIn),
            "Check-OUT" => Ok(Direction::CheckOut),
            other => Err(LogParseError::UnknownStatus(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub employee_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LogParseError {
    #[error("log entry is not an object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid date `{0}`")]
    InvalidDate(String),
    #[error("invalid time `{0}`")]
    InvalidTime(String),
    #[error("unknown status `{0}`")]
    UnknownStatus(String),
}

/// The body returned by the attendance log endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RawPayload {
    #[serde(default)]
    pub data: Vec<Value>,
}

impl RawPayload {
    /// Lenient conversion: anything that isn't `{"data": [...]}` is an empty payload.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Read a payload saved from the log endpoint.
    pub fn read_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        use anyhow::Context;

        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read log file: {}", path.display()))?;
        let value = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse log file: {}", path.display()))?;
        Ok(RawPayload::from_value(value))
    }

    /// Parse every record, returning the usable ones and the number of dropped records.
    pub fn records(&self) -> (Vec<EmployeeRecord>, usize) {
        let mut records = Vec::with_capacity(self.data.len());
        let mut dropped = 0;
        for value in &self.data {
            match EmployeeRecord::from_value(value) {
                Some(record) => records.push(record),
                None => {
                    tracing::debug!("Dropping malformed employee record: {value}");
                    dropped += 1;
                }
            }
        }
        (records, dropped)
    }
}

/// One employee as delivered by the device backend, before reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeRecord {
    pub uid: String,
    pub name: String,
    pub salary: Option<Decimal>,
    pub logs: Vec<Value>,
}

impl EmployeeRecord {
    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let uid = match object.get("uid") {
            Some(Value::String(uid)) => uid.clone(),
            Some(Value::Number(uid)) => uid.to_string(),
            _ => "N/A".to_owned(),
        };
        let name = object
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_owned();
        let salary = match object.get("salary") {
            Some(Value::Number(salary)) => Decimal::from_str(&salary.to_string()).ok(),
            Some(Value::String(salary)) => Decimal::from_str(salary.trim()).ok(),
            _ => None,
        }
        .filter(|salary| !salary.is_sign_negative());
        let logs = match object.get("logs") {
            Some(Value::Array(logs)) => logs.clone(),
            _ => Vec::new(),
        };

        Some(EmployeeRecord {
            uid,
            name,
            salary,
            logs,
        })
    }

    /// Split the raw logs into valid entries and per-entry errors.
    pub fn parse_logs(&self) -> (Vec<LogEntry>, Vec<LogParseError>) {
        let mut entries = Vec::with_capacity(self.logs.len());
        let mut errors = Vec::new();
        for raw in &self.logs {
            match parse_entry(&self.uid, raw) {
                Ok(entry) => entries.push(entry),
                Err(error) => errors.push(error),
            }
        }
        (entries, errors)
    }
}

/// Parse a single `{date, time, status}` object.
pub fn parse_entry(employee_id: &str, raw: &Value) -> Result<LogEntry, LogParseError> {
    let object = raw.as_object().ok_or(LogParseError::NotAnObject)?;
    let field = |name: &'static str| {
        object
            .get(name)
            .and_then(Value::as_str)
            .ok_or(LogParseError::MissingField(name))
    };

    let date = parse_date(field("date")?)?;
    let time = parse_time(field("time")?)?;
    let direction = field("status")?.parse()?;

    Ok(LogEntry {
        employee_id: employee_id.to_owned(),
        date,
        time,
        direction,
    })
}

pub fn parse_date(date: &str) -> Result<NaiveDate, LogParseError> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map_err(|_| LogParseError::InvalidDate(date.to_owned()))
}

pub fn parse_time(time: &str) -> Result<NaiveTime, LogParseError> {
    NaiveTime::parse_from_str(&time.trim().to_uppercase(), TIME_FORMAT)
        .map_err(|_| LogParseError::InvalidTime(time.to_owned()))
}
