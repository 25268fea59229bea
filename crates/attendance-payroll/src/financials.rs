//! Static per-employee amounts: salary, allowance and deductions.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::Decimal;

const DEFAULT_KEY: &str = "default";

/// Amounts keyed by employee id, with a fallback for everyone else.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<String, Decimal>")]
pub struct LookupTable {
    default: Decimal,
    entries: BTreeMap<String, Decimal>,
}

impl TryFrom<BTreeMap<String, Decimal>> for LookupTable {
    type Error = String;

    fn try_from(mut raw: BTreeMap<String, Decimal>) -> Result<Self, Self::Error> {
        if let Some((id, amount)) = raw.iter().find(|(_, amount)| amount.is_sign_negative()) {
            return Err(format!("amount for '{id}' must not be negative, got {amount}"));
        }
        let default = raw.remove(DEFAULT_KEY).unwrap_or_default();
        Ok(LookupTable {
            default,
            entries: raw,
        })
    }
}

impl LookupTable {
    pub fn new(default: Decimal) -> Self {
        LookupTable {
            default,
            entries: BTreeMap::new(),
        }
    }

    pub fn with(mut self, id: impl Into<String>, amount: Decimal) -> Self {
        self.entries.insert(id.into(), amount);
        self
    }

    pub fn default_amount(&self) -> Decimal {
        self.default
    }

    /// The explicit entry for `id`, if one is configured.
    pub fn get(&self, id: &str) -> Option<Decimal> {
        self.entries.get(id).copied()
    }

    pub fn lookup(&self, id: &str) -> Decimal {
        self.get(id).unwrap_or(self.default)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Financials {
    pub monthly_salary: Decimal,
    pub allowance: Decimal,
    pub advance_paid: Decimal,
    pub loan: Decimal,
    pub premium: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinancialTables {
    pub monthly_salary: LookupTable,
    pub allowance: LookupTable,
    pub advance_paid: LookupTable,
    pub loan: LookupTable,
    pub premium: LookupTable,
}

impl FinancialTables {
    /// Resolve the amounts for one employee.
    ///
    /// `record_salary` is the salary delivered alongside the attendance logs;
    /// it wins over the table default but not over an explicit table entry.
    pub fn resolve(&self, id: &str, record_salary: Option<Decimal>) -> Financials {
        let monthly_salary = self
            .monthly_salary
            .get(id)
            .or(record_salary)
            .unwrap_or(self.monthly_salary.default_amount());

        Financials {
            monthly_salary,
            allowance: self.allowance.lookup(id),
            advance_paid: self.advance_paid.lookup(id),
            loan: self.loan.lookup(id),
            premium: self.premium.lookup(id),
        }
    }
}
