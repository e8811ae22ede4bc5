//! SPM Actuarial - minimum pension balance and pension valuation engine
//!
//! This library provides:
//! - Life table lookup and CSV loading by actuarial category
//! - Single and joint-life annuity factors, whole-life insurance factor
//! - Statutory SPM ⇄ pension conversion with start-month proration and funeral-aid tiers
//! - An engine composing the above into one request/response

pub mod age;
pub mod balance;
pub mod config;
pub mod engine;
pub mod error;
pub mod inflation;
pub mod tables;
pub mod valuation;

// Re-export commonly used types
pub use balance::{BalanceResult, PensionResult, PensionTiming};
pub use config::EngineConfig;
pub use engine::{BalanceAmount, CalculationRequest, CalculationResult, ValuationEngine};
pub use error::{PartyRole, ValuationError, ValuationResult};
pub use tables::{LifeTable, LifeTables, TableKey, TableProvider};
pub use valuation::{ActuarialParty, AnnuityResult, DiscountFactor, InsuranceResult};
