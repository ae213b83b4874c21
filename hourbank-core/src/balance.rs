//! Debt figures read from a report and the aggregated period result.

use serde::{Deserialize, Serialize};

use crate::format::format_minutes;
use crate::month::MonthKey;

/// Unreconciled debt magnitudes read from one monthly report.
///
/// Both sides are non-negative minute counts; the signed balance only
/// exists after reconciliation, as `net_minutes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtPair {
    /// Minutes the employee owes the company.
    pub employee_owes: i64,
    /// Minutes the company owes the employee.
    pub company_owes: i64,
}

impl DebtPair {
    pub fn new(employee_owes: i64, company_owes: i64) -> Self {
        Self {
            employee_owes,
            company_owes,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.employee_owes == 0 && self.company_owes == 0
    }

    /// Signed net balance: positive means the company owes the employee.
    pub fn net_minutes(&self) -> i64 {
        self.company_owes - self.employee_owes
    }
}

/// One month's settled balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBalance {
    pub month: MonthKey,
    pub net_minutes: i64,
    pub formatted: String,
}

impl MonthlyBalance {
    pub fn new(month: MonthKey, net_minutes: i64) -> Self {
        Self {
            month,
            net_minutes,
            formatted: format_minutes(net_minutes),
        }
    }
}

/// Aggregated result over a month range, in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub total_minutes: i64,
    pub months: Vec<MonthlyBalance>,
}

impl PeriodSummary {
    pub fn push(&mut self, month: MonthlyBalance) {
        self.total_minutes += month.net_minutes;
        self.months.push(month);
    }

    pub fn positive_months(&self) -> usize {
        self.months.iter().filter(|m| m.net_minutes > 0).count()
    }

    pub fn negative_months(&self) -> usize {
        self.months.iter().filter(|m| m.net_minutes < 0).count()
    }

    pub fn neutral_months(&self) -> usize {
        self.months.iter().filter(|m| m.net_minutes == 0).count()
    }

    /// Running cumulative balance, one entry per month.
    pub fn running_totals(&self) -> Vec<i64> {
        self.months
            .iter()
            .scan(0, |acc, m| {
                *acc += m.net_minutes;
                Some(*acc)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(month: u32, year: i32) -> MonthKey {
        MonthKey::new(month, year).unwrap()
    }

    #[test]
    fn test_net_minutes_sign() {
        assert_eq!(DebtPair::new(90, 0).net_minutes(), -90);
        assert_eq!(DebtPair::new(0, 480).net_minutes(), 480);
        assert_eq!(DebtPair::new(0, 0).net_minutes(), 0);
    }

    #[test]
    fn test_monthly_balance_carries_formatted_value() {
        let m = MonthlyBalance::new(key(1, 2025), -90);
        assert_eq!(m.formatted, "-01:30");
    }

    #[test]
    fn test_summary_accumulates_in_order() {
        let mut summary = PeriodSummary::default();
        summary.push(MonthlyBalance::new(key(1, 2025), -90));
        summary.push(MonthlyBalance::new(key(2, 2025), 0));
        summary.push(MonthlyBalance::new(key(3, 2025), 480));

        assert_eq!(summary.total_minutes, 390);
        assert_eq!(summary.months.len(), 3);
        assert_eq!(summary.positive_months(), 1);
        assert_eq!(summary.negative_months(), 1);
        assert_eq!(summary.neutral_months(), 1);
        assert_eq!(summary.running_totals(), vec![-90, -90, 390]);
    }
}
