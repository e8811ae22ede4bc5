//! Funeral-aid (auxilio funerario) tier applied to the insurance term

use serde::{Deserialize, Serialize};

/// Fixed normative reference wage used to place a pension in a tier
pub const SMMLV2: f64 = 1_423_500.0;

/// Tier of a pension amount relative to `SMMLV2`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuneralAidTier {
    /// Below 5 reference wages
    Low,
    /// From 5 to 10 reference wages, both inclusive
    Middle,
    /// Above 10 reference wages
    High,
}

impl FuneralAidTier {
    /// Tier for a monthly pension amount
    pub fn for_amount(pension: f64) -> Self {
        if pension < 5.0 * SMMLV2 {
            FuneralAidTier::Low
        } else if pension <= 10.0 * SMMLV2 {
            FuneralAidTier::Middle
        } else {
            FuneralAidTier::High
        }
    }

    /// Multiplier applied to the whole-life insurance factor
    pub fn factor(&self) -> f64 {
        match self {
            FuneralAidTier::Low => 5.0,
            FuneralAidTier::Middle => 1.0,
            FuneralAidTier::High => 10.0,
        }
    }
}
