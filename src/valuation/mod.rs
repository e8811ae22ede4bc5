//! Life-contingent present values from survivor tables
//!
//! - **Annuities**: single and joint-life annuity factors (`a_x`, `a_y`, `a_xy`)
//! - **Insurance**: whole-life insurance factor (`A_x`)
//!
//! Both read the same [`ActuarialParty`] inputs and share the discount factor `v`.

mod annuity;
mod discount;
mod insurance;

pub use annuity::{annuity_factors, AnnuityResult};
pub use discount::DiscountFactor;
pub use insurance::{whole_life_insurance, InsuranceResult};

use crate::error::{PartyRole, ValuationError, ValuationResult};
use crate::tables::LifeTable;

/// A life being valued: integer age plus the table that applies to it
#[derive(Debug, Clone, Copy)]
pub struct ActuarialParty<'a> {
    pub age: u32,
    pub table: &'a LifeTable,
}

impl<'a> ActuarialParty<'a> {
    pub fn new(age: u32, table: &'a LifeTable) -> Self {
        Self { age, table }
    }

    /// Survivors at the valuation age, which must be present and positive
    pub(crate) fn base_survivors(&self, role: PartyRole) -> ValuationResult<f64> {
        self.table
            .valuation_base(self.age)
            .ok_or(ValuationError::AgeNotFound { party: role, age: self.age })
    }

    /// Survivors `k` years after the valuation age (0 when missing)
    pub(crate) fn survivors_after(&self, k: u32) -> f64 {
        self.table.survivors(self.age + k)
    }
}
