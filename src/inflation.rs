//! Inflation assumption for the balance formula
//!
//! Decree 3099 of 2015 sets `K` as a weighted average of the last three
//! observed annual inflation rates, with the most recent year weighted most:
//!
//! ```text
//! K = (3 f(t-1) + 2 f(t-2) + f(t-3)) / 6
//! ```

use serde::{Deserialize, Serialize};

/// Last three annual inflation rates (decimals), most recent first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InflationHistory {
    /// Inflation of the year before the calculation year
    #[serde(default = "default_previous_1")]
    pub previous_1: f64,
    #[serde(default = "default_previous_2")]
    pub previous_2: f64,
    #[serde(default = "default_previous_3")]
    pub previous_3: f64,
}

fn default_previous_1() -> f64 { 0.0520 } // 2024
fn default_previous_2() -> f64 { 0.0928 } // 2023
fn default_previous_3() -> f64 { 0.1312 } // 2022

impl InflationHistory {
    pub fn new(previous_1: f64, previous_2: f64, previous_3: f64) -> Self {
        Self { previous_1, previous_2, previous_3 }
    }

    /// Weighted average `K` used by the balance formula
    pub fn weighted_average(&self) -> f64 {
        (3.0 * self.previous_1 + 2.0 * self.previous_2 + self.previous_3) / 6.0
    }
}

impl Default for InflationHistory {
    fn default() -> Self {
        Self {
            previous_1: default_previous_1(),
            previous_2: default_previous_2(),
            previous_3: default_previous_3(),
        }
    }
}
