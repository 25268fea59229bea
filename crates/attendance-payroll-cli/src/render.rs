//! CSV rendering of the monthly report.
//!
//! The layout follows the printed attendance sheet: a title block, the
//! attendance calendar (three rows per day, one column per employee), the
//! pivoted financial summary and the allowances & deductions table.

use anyhow::{Context, Result};
use attendance_payroll::{Decimal, EmployeeReport, MonthlyReport};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::RoundingStrategy;
use std::io::Write;
use std::path::{Path, PathBuf};

const ABSENT: &str = "-";

pub struct ReportMeta<'a> {
    pub company_name: &'a str,
    pub title: &'a str,
    pub generated_at: NaiveDateTime,
}

impl ReportMeta<'_> {
    fn today(&self) -> NaiveDate {
        self.generated_at.date()
    }
}

pub fn default_output_path(report: &MonthlyReport) -> PathBuf {
    PathBuf::from(format!(
        "attendance-report-{:02}-{}.csv",
        report.month.month(),
        report.month.year()
    ))
}

/// Write the report to `path`, replacing it only once rendering succeeded.
pub fn write_report(path: &Path, report: &MonthlyReport, meta: &ReportMeta) -> Result<()> {
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let result = std::fs::File::create(&tmp_path)
        .with_context(|| format!("Failed to create {}", tmp_path.display()))
        .and_then(|file| render(std::io::BufWriter::new(file), report, meta))
        .and_then(|()| {
            std::fs::rename(&tmp_path, path)
                .with_context(|| format!("Failed to move report into {}", path.display()))
        });

    if result.is_err() {
        let _ = std::fs::remove_file(&tmp_path);
    }
    result
}

pub fn render(writer: impl Write, report: &MonthlyReport, meta: &ReportMeta) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    write_title(&mut csv, report, meta)?;
    write_calendar(&mut csv, report, meta)?;
    write_summary(&mut csv, report)?;
    write_deductions(&mut csv, report)?;

    csv.flush()?;
    Ok(())
}

type Metric = fn(&EmployeeReport) -> String;

fn write_title<W: Write>(
    csv: &mut csv::Writer<W>,
    report: &MonthlyReport,
    meta: &ReportMeta,
) -> Result<()> {
    if !meta.company_name.is_empty() {
        csv.write_record([meta.company_name])?;
    }
    csv.write_record([format!("{} - {}", meta.title, report.month)])?;
    csv.write_record([
        "Report Generated".to_owned(),
        meta.generated_at.format("%Y-%m-%d %H:%M").to_string(),
    ])?;
    Ok(())
}

fn write_calendar<W: Write>(
    csv: &mut csv::Writer<W>,
    report: &MonthlyReport,
    meta: &ReportMeta,
) -> Result<()> {
    let employees = &report.employees;

    let mut ids = vec!["Date".to_owned(), "Status".to_owned()];
    ids.extend(employees.iter().map(|e| text_cell(&e.employee.employee_id)));
    csv.write_record(&ids)?;
    let mut names = vec![String::new(), String::new()];
    names.extend(employees.iter().map(|e| text_cell(&e.employee.name)));
    csv.write_record(&names)?;

    for (i, date) in report.month.dates().into_iter().enumerate() {
        let mut label = date.format("%a %-d").to_string();
        if date == meta.today() {
            label.push_str(" (today)");
        }

        let days = employees.iter().filter_map(|e| e.employee.day_records.get(i));

        let mut check_in = vec![label, "Check-In".to_owned()];
        check_in.extend(days.clone().map(|day| format_time(day.first_check_in)));
        csv.write_record(&check_in)?;

        let mut check_out = vec![String::new(), "Check-Out".to_owned()];
        check_out.extend(days.clone().map(|day| format_time(day.last_check_out)));
        csv.write_record(&check_out)?;

        let mut minutes = vec![String::new(), "Minutes Worked".to_owned()];
        minutes.extend(days.map(|day| money(day.payable_minutes)));
        csv.write_record(&minutes)?;
    }
    Ok(())
}

fn write_summary<W: Write>(csv: &mut csv::Writer<W>, report: &MonthlyReport) -> Result<()> {
    let metrics: [(&str, Metric); 14] = [
        ("ID", |e| text_cell(&e.employee.employee_id)),
        ("Name", |e| text_cell(&e.employee.name)),
        ("Presence", |e| e.summary.presence_days.to_string()),
        ("Absence", |e| e.summary.absence_days.to_string()),
        ("Basic Salary", |e| money(e.employee.financials.monthly_salary)),
        ("Total Days", |e| e.summary.total_days.to_string()),
        ("Payable Days", |e| e.summary.payable_days.to_string()),
        ("Per Day Amt", |e| money(e.summary.per_day_amount)),
        ("Per Min Wage", |e| format_amount(e.summary.per_minute_wage, 4)),
        ("Total Mins", |e| money(e.summary.total_minutes)),
        ("Gross Salary", |e| money(e.summary.gross_salary)),
        ("Short Hour Deduct.", |e| money(e.summary.shortfall_deduction)),
        ("Earned Salary", |e| money(e.summary.earned_salary)),
        ("In Hand Salary", |e| money(e.summary.in_hand_salary)),
    ];

    csv.write_record(["Financial Summary"])?;
    for (label, metric) in metrics {
        let mut row = vec![label.to_owned()];
        row.extend(report.employees.iter().map(metric));
        csv.write_record(&row)?;
    }
    Ok(())
}

fn write_deductions<W: Write>(csv: &mut csv::Writer<W>, report: &MonthlyReport) -> Result<()> {
    csv.write_record(["Allowances & Deductions"])?;
    csv.write_record([
        "ID",
        "Name",
        "Allowance",
        "Advance Paid",
        "Loan",
        "Premium",
        "Total Deductions",
    ])?;
    for e in &report.employees {
        let financials = &e.employee.financials;
        csv.write_record([
            text_cell(&e.employee.employee_id),
            text_cell(&e.employee.name),
            money(financials.allowance),
            money(financials.advance_paid),
            money(financials.loan),
            money(financials.premium),
            money(e.summary.total_deductions),
        ])?;
    }
    Ok(())
}

fn format_time(time: Option<NaiveTime>) -> String {
    match time {
        Some(time) => time.format("%-I:%M:%S %p").to_string(),
        None => ABSENT.to_owned(),
    }
}

/// Payload text, quoted so spreadsheets don't evaluate it as a formula.
fn text_cell(value: &str) -> String {
    match value.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => format!("'{value}"),
        _ => value.to_owned(),
    }
}

fn money(value: Decimal) -> String {
    format_amount(value, 2)
}

fn format_amount(value: Decimal, decimals: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(decimals);
    rounded.to_string()
}
