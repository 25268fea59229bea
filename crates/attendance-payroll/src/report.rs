//! Assembling the full monthly report from a fetched payload.

use crate::logs::RawPayload;
use crate::{
    EmployeeMonth, FinancialTables, PayrollSummary, ReportMonth, WorkRules, aggregate, reconcile,
    sorting,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeReport {
    pub employee: EmployeeMonth,
    pub summary: PayrollSummary,
}

/// What was filtered out of the payload on the way in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub dropped_records: usize,
    pub dropped_entries: usize,
    pub duplicate_entries: usize,
    pub outside_month: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyReport {
    pub month: ReportMonth,
    pub employees: Vec<EmployeeReport>,
    pub stats: ParseStats,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub month: ReportMonth,
    pub rules: WorkRules,
    pub financials: FinancialTables,
}

impl ReportConfig {
    pub fn new(month: ReportMonth, rules: WorkRules, financials: FinancialTables) -> Self {
        ReportConfig {
            month,
            rules,
            financials,
        }
    }

    /// Reconcile and aggregate every employee in the payload.
    pub fn build(&self, payload: &RawPayload) -> MonthlyReport {
        let dates = self.month.dates();
        let mut stats = ParseStats::default();

        let (records, dropped_records) = payload.records();
        stats.dropped_records = dropped_records;

        let mut employees = Vec::with_capacity(records.len());
        for record in records {
            let (mut entries, errors) = record.parse_logs();
            for error in &errors {
                tracing::debug!(employee = %record.uid, "Dropping log entry: {error}");
            }
            stats.dropped_entries += errors.len();
            stats.duplicate_entries += sorting::sort_dedup_entries(&mut entries);
            stats.outside_month += entries
                .iter()
                .filter(|entry| !self.month.contains(entry.date))
                .count();

            let employee = EmployeeMonth {
                financials: self.financials.resolve(&record.uid, record.salary),
                day_records: reconcile(&entries, &dates, &self.rules),
                employee_id: record.uid,
                name: record.name,
            };
            let summary = aggregate(&employee, &self.rules);
            employees.push(EmployeeReport { employee, summary });
        }
        sorting::sort_employees(&mut employees);

        MonthlyReport {
            month: self.month,
            employees,
            stats,
        }
    }
}

impl MonthlyReport {
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn total_in_hand(&self) -> crate::Decimal {
        self.employees
            .iter()
            .map(|report| report.summary.in_hand_salary)
            .sum()
    }
}
