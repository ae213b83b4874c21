//! hourbank-extract: HTML report parsing -- time tokens and balance-location strategies.

pub mod row_time;
pub mod strategies;

pub use row_time::row_minutes;
pub use strategies::{compensation_minutes, net_balance};
