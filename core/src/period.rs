//! Period arithmetic — `YYYYMM` keys, previous-month stepping, fiscal years.
//!
//! A period is a calendar year-month. The fiscal year starts in October:
//! October through December belong to the following fiscal year.

use crate::{
    error::{AlertError, AlertResult},
    types::FiscalYear,
};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// First calendar month of a new fiscal year.
pub const FISCAL_YEAR_START_MONTH: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year:  i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> AlertResult<Self> {
        if year < 1 || !(1..=12).contains(&month) {
            return Err(AlertError::InvalidPeriod {
                input: format!("{year:04}{month:02}"),
            });
        }
        Ok(Self { year, month })
    }

    /// Parse a 6-digit `YYYYMM` key.
    pub fn parse(input: &str) -> AlertResult<Self> {
        let invalid = || AlertError::InvalidPeriod { input: input.to_string() };

        if input.len() != 6 || !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let year: i32 = input[..4].parse().map_err(|_| invalid())?;
        let month: u32 = input[4..].parse().map_err(|_| invalid())?;
        if year < 1 || !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }

    /// The period containing a calendar date. Dates before year 1 are rejected.
    pub fn from_date<D: Datelike>(date: &D) -> AlertResult<Self> {
        Self::new(date.year(), date.month())
    }

    pub fn year(&self)  -> i32 { self.year }
    pub fn month(&self) -> u32 { self.month }

    /// One month earlier. January wraps to December of the prior year.
    ///
    /// January of year 1 has no valid predecessor and is rejected.
    pub fn previous(self) -> AlertResult<Self> {
        match self.month {
            1 if self.year == 1 => Err(AlertError::InvalidPeriod { input: self.key() }),
            1 => Ok(Self { year: self.year - 1, month: 12 }),
            m => Ok(Self { year: self.year, month: m - 1 }),
        }
    }

    pub fn fiscal_year(self) -> FiscalYear {
        if self.month >= FISCAL_YEAR_START_MONTH {
            self.year + 1
        } else {
            self.year
        }
    }

    /// Canonical `YYYYMM` form.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = AlertError;

    fn from_str(s: &str) -> AlertResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Period {
    type Error = AlertError;

    fn try_from(value: String) -> AlertResult<Self> {
        Self::parse(&value)
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.to_string()
    }
}

/// Previous period of a raw `YYYYMM` key.
pub fn previous_period(input: &str) -> AlertResult<Period> {
    Period::parse(input)?.previous()
}

/// Fiscal year of an already-validated period.
pub fn fiscal_year(period: Period) -> FiscalYear {
    period.fiscal_year()
}
