//! SPM and pension calculations, forward and inverse

use log::debug;
use serde::Serialize;

use super::{FuneralAidTier, PensionTiming};
use crate::valuation::DiscountFactor;

/// Statutory loading on the required balance
pub const LOADING_FACTOR: f64 = 1.02;

/// Actuarial and economic inputs shared by both directions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceInputs {
    /// Total annuity factor `a` (at least one life alive)
    pub annuity: f64,
    /// Whole-life insurance factor `A` before the funeral-aid adjustment
    pub insurance: f64,
    /// Annual discount factor
    pub v: DiscountFactor,
    /// Annual inflation rate `K`
    pub inflation: f64,
    pub timing: PensionTiming,
}

/// Factors that depend only on `v`, `K` and the start month
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalanceFactors {
    /// Inflation used in the formula (`K* = 0` for a January start)
    pub k_star: f64,
    /// Monthly discount net of inflation: `(v / (1 + K))^(1/12)`
    pub u: f64,
    pub f12: f64,
    pub f2: f64,
    /// Catch-up term for the first partial year
    pub c: f64,
}

impl BalanceFactors {
    pub fn compute(v: DiscountFactor, inflation: f64, timing: PensionTiming) -> Self {
        let k = inflation;
        let k_star = timing.k_star(k);
        let u = (v.value() / (1.0 + k)).powf(1.0 / 12.0);

        let (f12, f2) = if k != 0.0 {
            ((1.0 + 11.0 * k / 24.0) / (1.0 + k), (1.0 + k / 4.0) / (1.0 + k))
        } else {
            (1.0 / 12.0, 1.0 / 2.0)
        };

        let n = timing.n() as i32;
        let c = match timing.start_month() {
            1 => 0.0,
            2..=6 => (u - u.powi(n + 1)) / (1.0 - u) + u.powi(timing.r() as i32) + u.powi(n),
            _ => (u - u.powi(n + 1)) / (1.0 - u) + u.powi(n),
        };

        Self { k_star, u, f12, f2, c }
    }

    /// `[(12 f12 + 2 f2) a + 6 + A_adj]`
    pub fn base_value(&self, annuity: f64, adjusted_insurance: f64) -> f64 {
        (12.0 * self.f12 + 2.0 * self.f2) * annuity + 6.0 + adjusted_insurance
    }

    /// Balance per unit of monthly pension: `1.02 (base (1 + K*) U^n + C)`
    fn balance_per_unit(&self, base: f64, timing: PensionTiming) -> f64 {
        LOADING_FACTOR * (base * (1.0 + self.k_star) * self.u.powi(timing.n() as i32) + self.c)
    }
}

/// Required balance for a given monthly pension
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalanceResult {
    /// Minimum pension balance
    pub spm: f64,
    /// Pension amount the balance funds (also selects the funeral-aid tier)
    pub pension: f64,
    pub base_value: f64,
    pub funeral_aid_tier: FuneralAidTier,
    /// Insurance term after the funeral-aid factor
    pub funeral_aid: f64,
    #[serde(flatten)]
    pub factors: BalanceFactors,
}

/// Monthly pension funded by a given balance
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PensionResult {
    pub pension: f64,
    /// First-pass estimate with the unadjusted insurance term; selects the tier
    pub provisional_pension: f64,
    /// Balance the pension was computed from
    pub spm: f64,
    pub base_value: f64,
    pub funeral_aid_tier: FuneralAidTier,
    pub funeral_aid: f64,
    #[serde(flatten)]
    pub factors: BalanceFactors,
}

/// Minimum pension balance for a monthly pension of `pension`
///
/// The funeral-aid tier is taken from `pension` itself.
pub fn minimum_pension_balance(pension: f64, inputs: &BalanceInputs) -> BalanceResult {
    let factors = BalanceFactors::compute(inputs.v, inputs.inflation, inputs.timing);

    let tier = FuneralAidTier::for_amount(pension);
    let funeral_aid = tier.factor() * inputs.insurance;
    let base_value = factors.base_value(inputs.annuity, funeral_aid);
    let spm = pension * factors.balance_per_unit(base_value, inputs.timing);

    debug!("SPM for pension {pension:.2}: {spm:.2} (tier {tier:?}, base {base_value:.8})");

    BalanceResult {
        spm,
        pension,
        base_value,
        funeral_aid_tier: tier,
        funeral_aid,
        factors,
    }
}

/// Monthly pension funded by a balance of `spm`
///
/// Two passes: a provisional pension computed with the unadjusted insurance
/// term picks the funeral-aid tier, then the pension is recomputed with the
/// tier-adjusted term. The tier is not re-checked against the final amount.
pub fn pension_from_balance(spm: f64, inputs: &BalanceInputs) -> PensionResult {
    let factors = BalanceFactors::compute(inputs.v, inputs.inflation, inputs.timing);

    let unadjusted_base = factors.base_value(inputs.annuity, inputs.insurance);
    let provisional_pension = spm / factors.balance_per_unit(unadjusted_base, inputs.timing);

    let tier = FuneralAidTier::for_amount(provisional_pension);
    let funeral_aid = tier.factor() * inputs.insurance;
    let base_value = factors.base_value(inputs.annuity, funeral_aid);
    let pension = spm / factors.balance_per_unit(base_value, inputs.timing);

    debug!(
        "Pension for SPM {spm:.2}: {pension:.2} (provisional {provisional_pension:.2}, tier {tier:?})"
    );

    PensionResult {
        pension,
        provisional_pension,
        spm,
        base_value,
        funeral_aid_tier: tier,
        funeral_aid,
        factors,
    }
}
