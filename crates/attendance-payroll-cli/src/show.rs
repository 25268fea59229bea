use anstyle::{AnsiColor, Color, Style};
use attendance_payroll::{Decimal, MonthlyReport};
use rust_decimal::RoundingStrategy;
use std::io::{self, Write};

struct Palette {
    bold: Style,
    present: Style,
    absent: Style,
    deduction: Style,
}

impl Palette {
    fn new(color: bool) -> Self {
        if !color {
            return Palette {
                bold: Style::new(),
                present: Style::new(),
                absent: Style::new(),
                deduction: Style::new(),
            };
        }
        Palette {
            bold: Style::new().bold(),
            present: Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))),
            absent: Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
            deduction: Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))),
        }
    }
}

pub fn show_summary(mut out: impl Write, report: &MonthlyReport, color: bool) -> io::Result<()> {
    let Palette {
        bold,
        present,
        absent,
        deduction,
    } = Palette::new(color);

    writeln!(out, "{bold}━━━ Attendance & Salary, {} ━━━{bold:#}", report.month)?;
    writeln!(out)?;

    if report.is_empty() {
        writeln!(out, "No employee data for this month.")?;
        return Ok(());
    }

    for item in &report.employees {
        let employee = &item.employee;
        let summary = &item.summary;

        writeln!(out, "{bold}{} ({}){bold:#}", employee.name, employee.employee_id)?;
        writeln!(
            out,
            "  {present}{}{present:#} present, {absent}{}{absent:#} absent of {} days, {} minutes",
            summary.presence_days,
            summary.absence_days,
            summary.total_days,
            rounded(summary.total_minutes),
        )?;
        writeln!(
            out,
            "  gross {}  short hours {deduction}-{}{deduction:#}  earned {}",
            rounded(summary.gross_salary),
            rounded(summary.shortfall_deduction),
            rounded(summary.earned_salary),
        )?;
        if !summary.total_deductions.is_zero() || !employee.financials.allowance.is_zero() {
            writeln!(
                out,
                "  allowance {}  deductions {deduction}-{}{deduction:#}",
                rounded(employee.financials.allowance),
                rounded(summary.total_deductions),
            )?;
        }
        writeln!(out, "  in hand {bold}{}{bold:#}", rounded(summary.in_hand_salary))?;
        writeln!(out)?;
    }

    // Summary
    writeln!(out, "{bold}━━━ Total ━━━{bold:#}")?;
    writeln!(
        out,
        "  {} employee(s), {bold}{}{bold:#} in hand",
        report.employees.len(),
        rounded(report.total_in_hand())
    )?;
    out.flush()
}

fn rounded(value: Decimal) -> Decimal {
    let mut value = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(2);
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::sample_report;
    use attendance_payroll::{FinancialTables, RawPayload, ReportConfig, ReportMonth, WorkRules};

    fn show_to_string(report: &MonthlyReport, color: bool) -> String {
        let mut output = Vec::new();
        show_summary(&mut output, report, color).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn show_employees_and_total() {
        insta::assert_snapshot!(show_to_string(&sample_report(), false), @r"
        ━━━ Attendance & Salary, February 2025 ━━━

        Sita (10)
          1 present, 27 absent of 28 days, 480.00 minutes
          gross 571.43  short hours -136.05  earned 435.37
          allowance 500.00  deductions -1000.00
          in hand -64.63

        Ravi (B3517733)
          2 present, 26 absent of 28 days, 1260.00 minutes
          gross 928.57  short hours -0.00  earned 928.57
          in hand 928.57

        ━━━ Total ━━━
          2 employee(s), 863.95 in hand
        ");
    }

    #[test]
    fn show_without_employees() {
        let report = ReportConfig::new(
            ReportMonth::new(2025, 2).unwrap(),
            WorkRules::default(),
            FinancialTables::default(),
        )
        .build(&RawPayload::default());

        insta::assert_snapshot!(show_to_string(&report, false), @r"
        ━━━ Attendance & Salary, February 2025 ━━━

        No employee data for this month.
        ");
    }

    #[test]
    fn show_colors_only_when_asked() {
        let report = sample_report();
        assert!(!show_to_string(&report, false).contains('\x1b'));
        assert!(show_to_string(&report, true).contains("\x1b[1m"));
    }
}
