//! Annual discount factor from the technical interest rate

use serde::{Deserialize, Serialize};

use crate::error::{ValuationError, ValuationResult};

/// Annual discount factor `v = 1 / (1 + i)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct DiscountFactor(f64);

impl DiscountFactor {
    /// Wrap an explicit discount factor (must be finite and positive)
    pub fn new(v: f64) -> ValuationResult<Self> {
        if !v.is_finite() || v <= 0.0 {
            return Err(ValuationError::InvalidInput {
                field: "discount factor",
                value: v,
                reason: "must be finite and positive",
            });
        }
        Ok(Self(v))
    }

    /// Discount factor for an annual technical interest rate (decimal, e.g. 0.0381)
    pub fn from_interest_rate(rate: f64) -> ValuationResult<Self> {
        if !rate.is_finite() || rate <= -1.0 {
            return Err(ValuationError::InvalidInput {
                field: "technical interest rate",
                value: rate,
                reason: "must be finite and greater than -1",
            });
        }
        Ok(Self(1.0 / (1.0 + rate)))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Annual interest rate implied by the factor
    pub fn interest_rate(&self) -> f64 {
        1.0 / self.0 - 1.0
    }

    /// `v^k`
    pub fn powi(&self, k: u32) -> f64 {
        self.0.powi(k as i32)
    }
}

impl TryFrom<f64> for DiscountFactor {
    type Error = ValuationError;

    fn try_from(v: f64) -> Result<Self, Self::Error> {
        Self::new(v)
    }
}

impl From<DiscountFactor> for f64 {
    fn from(v: DiscountFactor) -> Self {
        v.0
    }
}
