pub mod calendar;
pub mod financials;
pub mod logs;
pub mod payroll;
pub mod reconcile;
pub mod report;
mod sorting;

pub type Decimal = rust_decimal::Decimal;

pub use anyhow::Result;
pub use calendar::ReportMonth;
pub use financials::{FinancialTables, Financials, LookupTable};
pub use logs::{Direction, LogEntry, LogParseError, RawPayload};
pub use payroll::{EmployeeMonth, PayrollSummary, aggregate};
pub use reconcile::{DayRecord, WorkRules, reconcile};
pub use report::{EmployeeReport, MonthlyReport, ParseStats, ReportConfig};
