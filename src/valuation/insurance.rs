//! Whole-life insurance factor
//!
//! ```text
//! A_x = Σ_{k=0}^{MAX_AGE-X-2} v^(k+1) (l(X+k) - l(X+k+1)) / l(X)
//! ```
//!
//! Unlike the annuity sums, this one ends at the first age pair where either
//! survivor count is missing or zero. Rows after a gap never contribute.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{ActuarialParty, DiscountFactor};
use crate::error::{PartyRole, ValuationResult};
use crate::tables::MAX_AGE;

/// Whole-life insurance valuation for the affiliate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InsuranceResult {
    /// Present value of 1 paid at the end of the year of death
    #[serde(rename = "A_x")]
    pub a_x: f64,
}

/// Compute `A_x` for the affiliate
pub fn whole_life_insurance(party: &ActuarialParty<'_>, v: DiscountFactor) -> ValuationResult<InsuranceResult> {
    let lx = party.base_survivors(PartyRole::Affiliate)?;

    let mut sum = 0.0;
    for k in 0..MAX_AGE.saturating_sub(party.age + 1) {
        let alive = party.survivors_after(k);
        let next = party.survivors_after(k + 1);
        if alive <= 0.0 || next <= 0.0 {
            debug!("Insurance sum ends at age {} (k={k})", party.age + k);
            break;
        }
        sum += v.powi(k + 1) * (alive - next);
    }

    let a_x = sum / lx;
    debug!("Insurance factor: A_x={a_x:.8}");
    Ok(InsuranceResult { a_x })
}
