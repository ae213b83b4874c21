//! hourbank-core: month keys, debt arithmetic, and display formatting for the hour-bank calculator.

pub mod balance;
pub mod compensation;
pub mod format;
pub mod month;

pub use balance::{DebtPair, MonthlyBalance, PeriodSummary};
pub use format::format_minutes;
pub use month::{MonthKey, month_sequence};
