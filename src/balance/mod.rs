//! Statutory conversion between the minimum pension balance (SPM) and a monthly pension
//!
//! The conversion follows Article 1 of Decree 1875 of 1997:
//!
//! ```text
//! SPM = 1.02 * P * ([(12 f12 + 2 f2) a + 6 + A_adj] (1 + K*) U^n + C)
//! ```
//!
//! - `a`, `A`: annuity and whole-life insurance factors from [`crate::valuation`]
//! - `f12`, `f2`: payment-timing coefficients for 12 monthly and 2 extra payments
//! - `U`: monthly discount factor net of inflation
//! - `C`: catch-up term for a pension starting after January
//! - `A_adj`: insurance term scaled by the funeral-aid tier of the pension amount

mod formula;
mod funeral;
mod timing;

pub use formula::{
    minimum_pension_balance, pension_from_balance, BalanceFactors, BalanceInputs, BalanceResult,
    PensionResult, LOADING_FACTOR,
};
pub use funeral::{FuneralAidTier, SMMLV2};
pub use timing::PensionTiming;
