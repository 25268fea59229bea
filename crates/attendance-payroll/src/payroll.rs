//! Deriving the monthly salary figures from reconciled days.

use crate::{DayRecord, Decimal, Financials, WorkRules};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeMonth {
    pub employee_id: String,
    pub name: String,
    /// One record per calendar day, ascending.
    pub day_records: Vec<DayRecord>,
    pub financials: Financials,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayrollSummary {
    pub presence_days: usize,
    pub absence_days: usize,
    pub total_days: usize,
    pub payable_days: usize,
    pub per_day_amount: Decimal,
    pub per_minute_wage: Decimal,
    pub total_minutes: Decimal,
    pub gross_salary: Decimal,
    pub shortfall_deduction: Decimal,
    pub earned_salary: Decimal,
    pub total_deductions: Decimal,
    pub in_hand_salary: Decimal,
}

/// Compute the payroll summary for one employee.
///
/// Figures keep full precision; rounding is left to whoever displays them.
/// The shortfall compares the minutes credited across the month with a full
/// day for every payable day, so short days are only penalised in aggregate.
pub fn aggregate(employee: &EmployeeMonth, rules: &WorkRules) -> PayrollSummary {
    let Financials {
        monthly_salary,
        allowance,
        advance_paid,
        loan,
        premium,
    } = employee.financials;

    let total_days = employee.day_records.len();
    let presence_days = employee
        .day_records
        .iter()
        .filter(|record| record.is_present())
        .count();
    let absence_days = total_days - presence_days;
    let payable_days = presence_days;

    let total_minutes: Decimal = employee
        .day_records
        .iter()
        .map(|record| record.payable_minutes)
        .sum();

    let full_day_minutes = rules.full_day_minutes();
    let days = Decimal::from(total_days);
    let payable = Decimal::from(payable_days);
    let month_minutes = days * full_day_minutes;

    let (per_day_amount, per_minute_wage, gross_salary, shortfall_deduction) =
        if total_days > 0 && !month_minutes.is_zero() {
            let deficit = payable * full_day_minutes - total_minutes;
            let shortfall = (deficit * monthly_salary / month_minutes).max(Decimal::ZERO);
            (
                monthly_salary / days,
                monthly_salary / month_minutes,
                // divide last so a full month pays exactly the salary
                monthly_salary * payable / days,
                shortfall,
            )
        } else {
            Default::default()
        };

    let earned_salary = gross_salary - shortfall_deduction;
    let total_deductions = advance_paid + loan + premium;
    let in_hand_salary = earned_salary + allowance - total_deductions;

    PayrollSummary {
        presence_days,
        absence_days,
        total_days,
        payable_days,
        per_day_amount,
        per_minute_wage,
        total_minutes,
        gross_salary,
        shortfall_deduction,
        earned_salary,
        total_deductions,
        in_hand_salary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportMonth;
    use chrono::NaiveTime;
    use rust_decimal_macros::dec;

    fn employee(minutes: &[Decimal], financials: Financials) -> EmployeeMonth {
        let dates = ReportMonth::new(2025, 4).unwrap().dates();
        let day_records = dates
            .iter()
            .enumerate()
            .map(|(i, &date)| {
                let payable_minutes = minutes.get(i).copied().unwrap_or_default();
                let present = payable_minutes > Decimal::ZERO;
                DayRecord {
                    date,
                    is_weekend: false,
                    first_check_in: present.then(|| NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
                    last_check_out: present.then(|| NaiveTime::from_hms_opt(19, 0, 0).unwrap()),
                    payable_minutes,
                }
            })
            .collect();

        EmployeeMonth {
            employee_id: "E1".to_owned(),
            name: "Asha".to_owned(),
            day_records,
            financials,
        }
    }

    fn salary(monthly_salary: Decimal) -> Financials {
        Financials {
            monthly_salary,
            ..Default::default()
        }
    }

    #[test]
    fn full_month_pays_full_salary() {
        let month = employee(&[dec!(630); 30], salary(dec!(13000)));
        let summary = aggregate(&month, &WorkRules::default());

        assert_eq!(summary.total_days, 30);
        assert_eq!(summary.presence_days, 30);
        assert_eq!(summary.absence_days, 0);
        assert_eq!(summary.payable_days, 30);
        assert_eq!(summary.total_minutes, dec!(18900));
        assert_eq!(summary.per_day_amount.round_dp(2), dec!(433.33));
        assert_eq!(summary.per_minute_wage.round_dp(4), dec!(0.6878));
        assert_eq!(summary.gross_salary, dec!(13000));
        assert_eq!(summary.shortfall_deduction, dec!(0));
        assert_eq!(summary.earned_salary, dec!(13000));
        assert_eq!(summary.in_hand_salary, dec!(13000));
    }

    #[test]
    fn shortfall_is_aggregated_across_the_month() {
        // 20 days present, one of them 130 minutes short
        let mut minutes = vec![dec!(630); 20];
        minutes[3] = dec!(500);
        let month = employee(&minutes, salary(dec!(18900)));
        let summary = aggregate(&month, &WorkRules::default());

        assert_eq!(summary.presence_days, 20);
        assert_eq!(summary.absence_days, 10);
        assert_eq!(summary.total_minutes, dec!(12470));
        assert_eq!(summary.per_day_amount, dec!(630));
        assert_eq!(summary.per_minute_wage, dec!(1));
        assert_eq!(summary.gross_salary, dec!(12600));
        assert_eq!(summary.shortfall_deduction, dec!(130));
        assert_eq!(summary.earned_salary, dec!(12470));
    }

    #[test]
    fn overtime_never_produces_negative_deduction() {
        let month = employee(&[dec!(700); 30], salary(dec!(18900)));
        let summary = aggregate(&month, &WorkRules::default());

        assert_eq!(summary.total_minutes, dec!(21000));
        assert_eq!(summary.shortfall_deduction, dec!(0));
        assert_eq!(summary.earned_salary, summary.gross_salary);
    }

    #[test]
    fn deductions_and_allowance() {
        let financials = Financials {
            monthly_salary: dec!(18900),
            allowance: dec!(500),
            advance_paid: dec!(1000),
            loan: dec!(250.50),
            premium: dec!(100),
        };
        let month = employee(&[dec!(630); 30], financials);
        let summary = aggregate(&month, &WorkRules::default());

        assert_eq!(summary.total_deductions, dec!(1350.50));
        assert_eq!(summary.in_hand_salary, dec!(18049.50));
    }

    #[test]
    fn absent_month() {
        let month = employee(&[], salary(dec!(12000)));
        let summary = aggregate(&month, &WorkRules::default());

        assert_eq!(summary.presence_days, 0);
        assert_eq!(summary.absence_days, 30);
        assert_eq!(summary.total_minutes, dec!(0));
        assert_eq!(summary.gross_salary, dec!(0));
        assert_eq!(summary.shortfall_deduction, dec!(0));
        assert_eq!(summary.in_hand_salary, dec!(0));
    }

    #[test]
    fn no_days_divides_nothing() {
        let month = EmployeeMonth {
            employee_id: "E1".to_owned(),
            name: "Asha".to_owned(),
            day_records: Vec::new(),
            financials: Financials {
                monthly_salary: dec!(12000),
                allowance: dec!(100),
                ..Default::default()
            },
        };
        let summary = aggregate(&month, &WorkRules::default());

        assert_eq!(summary.total_days, 0);
        assert_eq!(summary.per_day_amount, dec!(0));
        assert_eq!(summary.per_minute_wage, dec!(0));
        assert_eq!(summary.in_hand_salary, dec!(100));
    }

    #[test]
    fn aggregate_is_repeatable() {
        let mut minutes = vec![dec!(612.5); 25];
        minutes[0] = dec!(100);
        let month = employee(&minutes, salary(dec!(14000)));
        let rules = WorkRules::default();

        assert_eq!(aggregate(&month, &rules), aggregate(&month, &rules));
    }
}
