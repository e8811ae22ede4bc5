//! Pension start month and the month counts derived from it

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{ValuationError, ValuationResult};

/// Start month `m` with its derived counts `n` and `r`
///
/// - `n = 13 - m` months to complete the first annual cycle (0 for January)
/// - `r = 7 - m` months before July (0 from July on)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PensionTiming {
    start_month: u32,
    n: u32,
    r: u32,
}

impl PensionTiming {
    /// Derive `n` and `r` from a start month in 1..=12
    pub fn from_month(month: u32) -> ValuationResult<Self> {
        Self::check_month(month)?;
        Ok(Self::derive(month))
    }

    /// Use explicitly supplied counts; they are passed to the formula unchanged
    ///
    /// `n` and `r` count months, so both must lie in 0..=12.
    pub fn from_parts(month: u32, n: u32, r: u32) -> ValuationResult<Self> {
        Self::check_month(month)?;
        Self::check_count("months to complete the year (n)", n)?;
        Self::check_count("months before July (r)", r)?;
        Ok(Self { start_month: month, n, r })
    }

    /// Timing for a pension whose first payment falls on `start`
    pub fn from_date(start: NaiveDate) -> Self {
        Self::derive(start.month())
    }

    fn derive(month: u32) -> Self {
        let n = if month > 1 { 13 - month } else { 0 };
        let r = if month < 7 { 7 - month } else { 0 };
        Self { start_month: month, n, r }
    }

    fn check_month(month: u32) -> ValuationResult<()> {
        if (1..=12).contains(&month) {
            Ok(())
        } else {
            Err(ValuationError::InvalidInput {
                field: "pension start month",
                value: month as f64,
                reason: "must be between 1 and 12",
            })
        }
    }

    fn check_count(field: &'static str, count: u32) -> ValuationResult<()> {
        if count <= 12 {
            Ok(())
        } else {
            Err(ValuationError::InvalidInput {
                field,
                value: count as f64,
                reason: "must be between 0 and 12",
            })
        }
    }

    pub fn start_month(&self) -> u32 {
        self.start_month
    }

    pub fn n(&self) -> u32 {
        self.n
    }

    pub fn r(&self) -> u32 {
        self.r
    }

    /// Inflation applied in the formula: none for a January start
    pub fn k_star(&self, inflation: f64) -> f64 {
        if self.start_month == 1 {
            0.0
        } else {
            inflation
        }
    }
}
