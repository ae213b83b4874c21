//! Compensatory-day-off reconciliation.
//!
//! A "folga a compensar" marker is worth a fixed 8 hours and always moves
//! the ledger in the employee's favour: it first pays down what the
//! employee owes, and anything beyond that is credited to the company's
//! side.

use crate::balance::DebtPair;

impl DebtPair {
    /// Apply `compensation` minutes of time-off credit to the pair.
    ///
    /// Branches are mutually exclusive, in priority order:
    /// 1. the employee owes: subtract; an underflow clears the debt and
    ///    moves the excess to the company's side;
    /// 2. only the company owes: the credit is added to it;
    /// 3. neither owes: the credit becomes the company's debt outright.
    ///
    /// A non-positive `compensation` passes the pair through unchanged.
    pub fn apply_compensation(self, compensation: i64) -> DebtPair {
        if compensation <= 0 {
            return self;
        }
        if self.employee_owes > 0 {
            let remaining = self.employee_owes - compensation;
            if remaining < 0 {
                DebtPair {
                    employee_owes: 0,
                    company_owes: self.company_owes + remaining.abs(),
                }
            } else {
                DebtPair {
                    employee_owes: remaining,
                    ..self
                }
            }
        } else if self.company_owes > 0 {
            DebtPair {
                company_owes: self.company_owes + compensation,
                ..self
            }
        } else {
            DebtPair {
                employee_owes: 0,
                company_owes: compensation,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_debt_cleared_with_excess_transferred() {
        let pair = DebtPair::new(100, 0).apply_compensation(480);
        assert_eq!(pair, DebtPair::new(0, 380));
    }

    #[test]
    fn test_employee_debt_partially_reduced() {
        let pair = DebtPair::new(600, 0).apply_compensation(480);
        assert_eq!(pair, DebtPair::new(120, 0));
    }

    #[test]
    fn test_employee_debt_exactly_cleared() {
        let pair = DebtPair::new(480, 0).apply_compensation(480);
        assert_eq!(pair, DebtPair::new(0, 0));
    }

    #[test]
    fn test_company_debt_grows() {
        let pair = DebtPair::new(0, 200).apply_compensation(480);
        assert_eq!(pair, DebtPair::new(0, 680));
    }

    #[test]
    fn test_settled_pair_credits_company() {
        let pair = DebtPair::new(0, 0).apply_compensation(480);
        assert_eq!(pair, DebtPair::new(0, 480));
    }

    #[test]
    fn test_employee_branch_takes_priority_over_company() {
        // Both sides non-zero: only the employee side is reduced.
        let pair = DebtPair::new(100, 50).apply_compensation(60);
        assert_eq!(pair, DebtPair::new(40, 50));
    }

    #[test]
    fn test_zero_compensation_is_a_pass_through() {
        let pair = DebtPair::new(90, 30);
        assert_eq!(pair.apply_compensation(0), pair);
    }
}
