//! Engine configuration loaded from JSON
//!
//! Every field is optional in the file; missing fields take the defaults below.
//!
//! ```json
//! {
//!   "tables_path": "data/tables.csv",
//!   "number_format": "colombian",
//!   "technical_interest_rate": 0.0381,
//!   "inflation": { "previous_1": 0.052, "previous_2": 0.0928, "previous_3": 0.1312 }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::inflation::InflationHistory;
use crate::tables::loader::DEFAULT_TABLES_PATH;
use crate::tables::NumberFormat;

/// Default annual technical interest rate (3.81%)
pub const DEFAULT_TECHNICAL_INTEREST_RATE: f64 = 0.0381;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// CSV file with all life tables
    #[serde(default = "default_tables_path")]
    pub tables_path: PathBuf,

    /// Number format of the survivor column
    #[serde(default)]
    pub number_format: NumberFormat,

    /// Annual technical interest rate (decimal)
    #[serde(default = "default_interest_rate")]
    pub technical_interest_rate: f64,

    /// Inflation history for the weighted `K`
    #[serde(default)]
    pub inflation: InflationHistory,
}

fn default_tables_path() -> PathBuf { PathBuf::from(DEFAULT_TABLES_PATH) }
fn default_interest_rate() -> f64 { DEFAULT_TECHNICAL_INTEREST_RATE }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tables_path: default_tables_path(),
            number_format: NumberFormat::default(),
            technical_interest_rate: default_interest_rate(),
            inflation: InflationHistory::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}
