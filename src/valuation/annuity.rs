//! Single and joint-life annuity factors
//!
//! For a primary life aged X and an optional second life aged Y:
//!
//! ```text
//! a_x     = Σ_{k=1}^{MAX_AGE-X-1} l(X+k) v^k / l(X)
//! a_y     = Σ_{k=1}^{MAX_AGE-Y-1} l(Y+k) v^k / l(Y)
//! a_xy    = Σ_{k=1}^{min(..)} l(X+k) l(Y+k) v^k / (l(X) l(Y))
//! a_total = a_x + a_y - a_xy
//! ```
//!
//! Terms whose survivor count is missing or zero are skipped; the sum carries
//! on past gaps in the table.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{ActuarialParty, DiscountFactor};
use crate::error::{PartyRole, ValuationResult};
use crate::tables::MAX_AGE;

/// Annuity factors for a single or joint-life valuation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnuityResult {
    /// Survivors at the affiliate's valuation age
    pub lx_affiliate: f64,
    /// Survivors at the substitute's valuation age, when there is one
    pub lx_substitute: Option<f64>,
    /// Affiliate alive
    pub a_x: f64,
    /// Substitute alive (0 without a substitute)
    pub a_y: f64,
    /// Both alive (0 without a substitute)
    pub a_xy: f64,
    /// At least one alive
    pub a_total: f64,
}

/// Compute annuity factors for `primary` and, optionally, a second life
///
/// Both valuation ages are checked before any summation starts.
pub fn annuity_factors(
    primary: &ActuarialParty<'_>,
    second: Option<&ActuarialParty<'_>>,
    v: DiscountFactor,
) -> ValuationResult<AnnuityResult> {
    let lx = primary.base_survivors(PartyRole::Affiliate)?;
    let ly = second
        .map(|party| party.base_survivors(PartyRole::Substitute))
        .transpose()?;

    let a_x = single_life_sum(primary, v) / lx;

    let (a_y, a_xy) = match (second, ly) {
        (Some(party), Some(ly)) => {
            let a_y = single_life_sum(party, v) / ly;
            let a_xy = joint_life_sum(primary, party, v) / (lx * ly);
            (a_y, a_xy)
        }
        _ => (0.0, 0.0),
    };

    let a_total = a_x + a_y - a_xy;
    debug!("Annuity factors: a_x={a_x:.8} a_y={a_y:.8} a_xy={a_xy:.8} a_total={a_total:.8}");

    Ok(AnnuityResult {
        lx_affiliate: lx,
        lx_substitute: ly,
        a_x,
        a_y,
        a_xy,
        a_total,
    })
}

/// Σ l(X+k) v^k over k = 1..MAX_AGE-X, skipping empty terms
fn single_life_sum(party: &ActuarialParty<'_>, v: DiscountFactor) -> f64 {
    (1..MAX_AGE.saturating_sub(party.age))
        .filter_map(|k| {
            let l = party.survivors_after(k);
            (l > 0.0).then(|| l * v.powi(k))
        })
        .sum()
}

/// Σ l(X+k) l(Y+k) v^k while both lives are within the table horizon
fn joint_life_sum(first: &ActuarialParty<'_>, second: &ActuarialParty<'_>, v: DiscountFactor) -> f64 {
    let horizon = MAX_AGE
        .saturating_sub(first.age)
        .min(MAX_AGE.saturating_sub(second.age));

    (1..horizon)
        .filter_map(|k| {
            let lx = first.survivors_after(k);
            let ly = second.survivors_after(k);
            (lx > 0.0 && ly > 0.0).then(|| lx * ly * v.powi(k))
        })
        .sum()
}
