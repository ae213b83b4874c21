//! Calendar month keys and period enumeration.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month, ordered chronologically.
///
/// The canonical text form is `MM/YYYY`, which is also what the report
/// endpoint expects in its `mesAno` query parameter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            bail!("month out of range: {month}");
        }
        if year < 1 {
            bail!("year out of range: {year}");
        }
        Ok(Self { year, month })
    }

    /// The month a given date falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                month: self.month + 1,
                ..self
            }
        }
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                month: self.month - 1,
                ..self
            }
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

impl FromStr for MonthKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (month, year) = s
            .trim()
            .split_once('/')
            .with_context(|| format!("expected MM/YYYY, got {s:?}"))?;
        let month: u32 = month
            .parse()
            .with_context(|| format!("invalid month in {s:?}"))?;
        let year: i32 = year
            .parse()
            .with_context(|| format!("invalid year in {s:?}"))?;
        Self::new(month, year)
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> String {
        key.to_string()
    }
}

impl TryFrom<String> for MonthKey {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Inclusive chronological month sequence from `start` to `end`.
/// Empty when `end < start`.
pub fn month_sequence(start: MonthKey, end: MonthKey) -> Vec<MonthKey> {
    let mut months = Vec::new();
    let mut current = start;
    while current <= end {
        months.push(current);
        current = current.next();
    }
    months
}
