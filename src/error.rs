//! Error types for table loading, configuration and valuation

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

use crate::tables::TableKey;

/// Result alias for valuation operations
pub type ValuationResult<T> = Result<T, ValuationError>;

/// Which life a valuation error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PartyRole {
    /// The primary affiliate
    Affiliate,
    /// The optional second life (spouse or other substitute beneficiary)
    Substitute,
}

impl std::fmt::Display for PartyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartyRole::Affiliate => write!(f, "affiliate"),
            PartyRole::Substitute => write!(f, "substitute"),
        }
    }
}

/// Errors that halt a valuation request without producing numeric results
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    /// The valuation age has no usable row in the party's life table
    #[error("age {age} not found in life table for {party}")]
    AgeNotFound {
        party: PartyRole,
        age: u32,
    },

    /// The table provider has no table for the requested category
    #[error("no life table '{key}' available for {party}")]
    TableNotFound {
        party: PartyRole,
        key: TableKey,
    },

    /// A request parameter is outside its domain
    #[error("invalid {field}: {value} ({reason})")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// A date of birth falls after the pension start date
    #[error("date of birth {birth} is after the pension start date {reference}")]
    InvalidDates {
        birth: NaiveDate,
        reference: NaiveDate,
    },
}

/// Errors raised while reading mortality tables from CSV
#[derive(Error, Debug)]
pub enum TableLoadError {
    #[error("failed to read tables from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown table key '{0}'")]
    UnknownKey(String),

    #[error("cannot parse survivor count '{value}' at age {age} of table {key}")]
    InvalidSurvivors {
        key: String,
        age: u32,
        value: String,
    },

    #[error("survivor count {lx} at age {age} must be finite and non-negative")]
    NegativeSurvivors { age: u32, lx: f64 },

    #[error("age {age} appears more than once in table {key}")]
    DuplicateAge { key: String, age: u32 },

    /// Repeated age in rows passed straight to `LifeTable::from_pairs`
    #[error("age {age} appears more than once")]
    RepeatedAge { age: u32 },

    #[error("age {age} exceeds the maximum tabulated age {max}")]
    AgeOutOfRange { age: u32, max: u32 },
}

/// Errors raised while reading an engine configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
