use crate::LogEntry;
use crate::report::EmployeeReport;

/// Sorts entries chronologically and removes exact duplicates, returning how many were removed.
pub fn sort_dedup_entries(entries: &mut Vec<LogEntry>) -> usize {
    let before = entries.len();
    entries.sort_by_key(entry_order);
    entries.dedup_by(|a, b| is_identical(a, b));
    before - entries.len()
}

fn entry_order(entry: &LogEntry) -> (chrono::NaiveDate, chrono::NaiveTime, crate::Direction) {
    (entry.date, entry.time, entry.direction)
}

// The device sometimes reports the same badge event twice
fn is_identical(a: &LogEntry, b: &LogEntry) -> bool {
    a.date == b.date && a.time == b.time && a.direction == b.direction
}

/// Ascending by employee id; stable, so records sharing an id keep payload order.
pub fn sort_employees(employees: &mut [EmployeeReport]) {
    employees.sort_by(|a, b| a.employee.employee_id.cmp(&b.employee.employee_id));
}
