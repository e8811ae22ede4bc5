//! Valuation engine: tables in, annuity/insurance factors and SPM or pension out
//!
//! A request runs in three steps, each of which must succeed before the next:
//! 1. Fetch the affiliate's (and optional substitute's) life tables
//! 2. Value the annuity and the whole-life insurance
//! 3. Convert between balance and pension with the statutory formula

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::balance::{
    minimum_pension_balance, pension_from_balance, BalanceInputs, BalanceResult, PensionResult,
    PensionTiming,
};
use crate::config::DEFAULT_TECHNICAL_INTEREST_RATE;
use crate::error::{PartyRole, ValuationError, ValuationResult};
use crate::inflation::InflationHistory;
use crate::tables::{TableKey, TableProvider};
use crate::valuation::{
    annuity_factors, whole_life_insurance, ActuarialParty, AnnuityResult, DiscountFactor,
    InsuranceResult,
};

/// Age and table category of one life
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartyInput {
    pub age: u32,
    pub table: TableKey,
}

impl PartyInput {
    pub fn new(age: u32, table: TableKey) -> Self {
        Self { age, table }
    }
}

/// Annuity and insurance valuation request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationRequest {
    pub affiliate: PartyInput,
    pub substitute: Option<PartyInput>,
    pub v: DiscountFactor,
}

/// Annuity and insurance factors for one request
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Valuation {
    pub annuity: AnnuityResult,
    pub insurance: InsuranceResult,
}

/// Known amount of a balance request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceAmount {
    /// Monthly pension (SMMLV-denominated reference amount); solve for the SPM
    Pension(f64),
    /// Available balance; solve for the pension
    Spm(f64),
}

/// Balance formula request with precomputed actuarial factors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceRequest {
    pub annuity: f64,
    pub insurance: f64,
    pub v: DiscountFactor,
    pub inflation: f64,
    pub timing: PensionTiming,
    pub amount: BalanceAmount,
}

/// Result of a balance request in either direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceOutcome {
    Spm(BalanceResult),
    Pension(PensionResult),
}

impl BalanceOutcome {
    /// The solved amount: SPM for a pension request, pension for an SPM request
    pub fn amount(&self) -> f64 {
        match self {
            BalanceOutcome::Spm(result) => result.spm,
            BalanceOutcome::Pension(result) => result.pension,
        }
    }
}

/// End-to-end request, deserializable from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub affiliate: PartyInput,
    #[serde(default)]
    pub substitute: Option<PartyInput>,

    /// Annual technical interest rate (decimal)
    #[serde(default = "default_interest_rate")]
    pub technical_interest_rate: f64,

    /// Explicit inflation rate; when absent `inflation_history` is averaged
    #[serde(default)]
    pub inflation_rate: Option<f64>,
    #[serde(default)]
    pub inflation_history: InflationHistory,

    /// Calendar month of the first pension payment (1-12)
    pub start_month: u32,

    pub amount: BalanceAmount,
}

fn default_interest_rate() -> f64 { DEFAULT_TECHNICAL_INTEREST_RATE }

impl CalculationRequest {
    /// Inflation `K` used by the balance formula
    pub fn inflation(&self) -> f64 {
        self.inflation_rate
            .unwrap_or_else(|| self.inflation_history.weighted_average())
    }
}

/// End-to-end result
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalculationResult {
    pub discount_factor: DiscountFactor,
    pub inflation: f64,
    pub timing: PensionTiming,
    pub valuation: Valuation,
    pub balance: BalanceOutcome,
}

/// Runs valuations against a table provider
#[derive(Debug, Clone)]
pub struct ValuationEngine<P> {
    tables: P,
}

impl<P: TableProvider> ValuationEngine<P> {
    pub fn new(tables: P) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &P {
        &self.tables
    }

    fn party(&self, input: &PartyInput, role: PartyRole) -> ValuationResult<ActuarialParty<'_>> {
        let table = self
            .tables
            .table(&input.table)
            .ok_or(ValuationError::TableNotFound { party: role, key: input.table })?;
        Ok(ActuarialParty::new(input.age, table))
    }

    /// Annuity and insurance factors
    pub fn value(&self, request: &ValuationRequest) -> ValuationResult<Valuation> {
        info!(
            "Valuing affiliate age {} ({}){}",
            request.affiliate.age,
            request.affiliate.table,
            request
                .substitute
                .map(|s| format!(" with substitute age {} ({})", s.age, s.table))
                .unwrap_or_default()
        );

        self.value_inner(request).inspect_err(|err| warn!("Valuation failed: {err}"))
    }

    fn value_inner(&self, request: &ValuationRequest) -> ValuationResult<Valuation> {
        let affiliate = self.party(&request.affiliate, PartyRole::Affiliate)?;
        let substitute = request
            .substitute
            .as_ref()
            .map(|input| self.party(input, PartyRole::Substitute))
            .transpose()?;

        let annuity = annuity_factors(&affiliate, substitute.as_ref(), request.v)?;
        let insurance = whole_life_insurance(&affiliate, request.v)?;
        debug!("a_total={:.8} A_x={:.8}", annuity.a_total, insurance.a_x);

        Ok(Valuation { annuity, insurance })
    }

    /// SPM or pension from precomputed factors
    pub fn balance(&self, request: &BalanceRequest) -> ValuationResult<BalanceOutcome> {
        validate_balance(request).inspect_err(|err| warn!("Balance request rejected: {err}"))?;

        let inputs = BalanceInputs {
            annuity: request.annuity,
            insurance: request.insurance,
            v: request.v,
            inflation: request.inflation,
            timing: request.timing,
        };

        let outcome = match request.amount {
            BalanceAmount::Pension(pension) => {
                BalanceOutcome::Spm(minimum_pension_balance(pension, &inputs))
            }
            BalanceAmount::Spm(spm) => BalanceOutcome::Pension(pension_from_balance(spm, &inputs)),
        };
        info!("Balance formula (start month {}): {:.2}", request.timing.start_month(), outcome.amount());
        Ok(outcome)
    }

    /// Full pipeline: valuation, then the balance formula on its factors
    pub fn calculate(&self, request: &CalculationRequest) -> ValuationResult<CalculationResult> {
        let v = DiscountFactor::from_interest_rate(request.technical_interest_rate)?;
        let timing = PensionTiming::from_month(request.start_month)?;
        let inflation = request.inflation();

        let valuation = self.value(&ValuationRequest {
            affiliate: request.affiliate,
            substitute: request.substitute,
            v,
        })?;

        let balance = self.balance(&BalanceRequest {
            annuity: valuation.annuity.a_total,
            insurance: valuation.insurance.a_x,
            v,
            inflation,
            timing,
            amount: request.amount,
        })?;

        Ok(CalculationResult {
            discount_factor: v,
            inflation,
            timing,
            valuation,
            balance,
        })
    }
}

fn validate_balance(request: &BalanceRequest) -> ValuationResult<()> {
    if !request.inflation.is_finite() || request.inflation <= -1.0 {
        return Err(ValuationError::InvalidInput {
            field: "inflation rate",
            value: request.inflation,
            reason: "must be finite and greater than -1",
        });
    }
    for (field, value) in [("annuity factor", request.annuity), ("insurance factor", request.insurance)] {
        if !value.is_finite() {
            return Err(ValuationError::InvalidInput { field, value, reason: "must be finite" });
        }
    }
    // U = 1 makes the catch-up term 0/0 for any start after January
    let monthly_base = request.v.value() / (1.0 + request.inflation);
    if request.timing.start_month() > 1 && monthly_base == 1.0 {
        return Err(ValuationError::InvalidInput {
            field: "monthly discount factor",
            value: monthly_base,
            reason: "v / (1 + K) must differ from 1 when the pension starts after January",
        });
    }
    let amount = match request.amount {
        BalanceAmount::Pension(x) | BalanceAmount::Spm(x) => x,
    };
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValuationError::InvalidInput {
            field: "amount",
            value: amount,
            reason: "must be finite and non-negative",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::{FuneralAidTier, SMMLV2};
    use crate::tables::{test_tables, Condition, Gender, LifeTables};
    use approx::assert_relative_eq;

    fn men() -> TableKey {
        TableKey::new(Gender::Hombre, Condition::NoInvalido)
    }

    fn women() -> TableKey {
        TableKey::new(Gender::Mujer, Condition::NoInvalido)
    }

    fn engine() -> ValuationEngine<LifeTables> {
        let tables = LifeTables::new()
            .with_table(men(), test_tables::linear())
            .with_table(women(), test_tables::linear_without(70));
        ValuationEngine::new(tables)
    }

    fn v() -> DiscountFactor {
        DiscountFactor::from_interest_rate(0.0381).unwrap()
    }

    #[test]
    fn test_single_life_valuation() {
        let request = ValuationRequest {
            affiliate: PartyInput::new(65, men()),
            substitute: None,
            v: v(),
        };
        let valuation = engine().value(&request).unwrap();

        assert_eq!(valuation.annuity.a_total, valuation.annuity.a_x);
        assert_relative_eq!(valuation.annuity.a_x, 13.479961722309941, max_relative = 1e-12);
        assert_relative_eq!(valuation.insurance.a_x, 0.46047946513195326, max_relative = 1e-12);
    }

    #[test]
    fn test_joint_valuation() {
        let request = ValuationRequest {
            affiliate: PartyInput::new(65, men()),
            substitute: Some(PartyInput::new(62, men())),
            v: v(),
        };
        let valuation = engine().value(&request).unwrap();
        let a = valuation.annuity;
        assert_eq!(a.a_total, a.a_x + a.a_y - a.a_xy);
        assert_relative_eq!(a.a_total, 17.255829922071005, max_relative = 1e-12);
    }

    #[test]
    fn test_gap_policies_differ_between_components() {
        let request = ValuationRequest {
            affiliate: PartyInput::new(65, women()),
            substitute: None,
            v: v(),
        };
        let valuation = engine().value(&request).unwrap();
        assert_relative_eq!(valuation.annuity.a_x, 12.740645782424245, max_relative = 1e-12);
        assert_relative_eq!(valuation.insurance.a_x, 0.07926539314432085, max_relative = 1e-12);
    }

    #[test]
    fn test_errors_surface_without_results() {
        let engine = engine();

        // Substitute's age row missing
        let request = ValuationRequest {
            affiliate: PartyInput::new(60, men()),
            substitute: Some(PartyInput::new(70, women())),
            v: v(),
        };
        assert_eq!(
            engine.value(&request),
            Err(ValuationError::AgeNotFound { party: PartyRole::Substitute, age: 70 })
        );

        // Category not loaded
        let missing = TableKey::new(Gender::Mujer, Condition::Invalido);
        let request = ValuationRequest {
            affiliate: PartyInput::new(60, missing),
            substitute: None,
            v: v(),
        };
        assert_eq!(
            engine.value(&request),
            Err(ValuationError::TableNotFound { party: PartyRole::Affiliate, key: missing })
        );
    }

    #[test]
    fn test_calculate_never_runs_formula_after_valuation_error() {
        let request = CalculationRequest {
            affiliate: PartyInput::new(70, women()),
            substitute: None,
            technical_interest_rate: 0.0381,
            inflation_rate: None,
            inflation_history: InflationHistory::default(),
            start_month: 4,
            amount: BalanceAmount::Pension(SMMLV2),
        };
        assert!(matches!(
            engine().calculate(&request),
            Err(ValuationError::AgeNotFound { party: PartyRole::Affiliate, age: 70 })
        ));
    }

    #[test]
    fn test_calculate_spm_from_json() {
        let json = r#"{
            "affiliate": {"age": 65, "table": "Hombre_No_Invalido"},
            "substitute": {"age": 62, "table": "Hombre_No_Invalido"},
            "start_month": 4,
            "amount": {"pension": 1423500}
        }"#;
        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert_relative_eq!(request.inflation(), 0.0788, epsilon = 1e-15);

        let result = engine().calculate(&request).unwrap();
        assert_eq!(result.timing.n(), 9);
        match result.balance {
            BalanceOutcome::Spm(spm) => {
                assert_relative_eq!(spm.spm, 360249709.7807287, max_relative = 1e-12);
                assert_eq!(spm.funeral_aid_tier, FuneralAidTier::Low);
            }
            other => panic!("expected SPM outcome, got {:?}", other),
        }
    }

    #[test]
    fn test_calculate_pension() {
        let request = CalculationRequest {
            affiliate: PartyInput::new(65, men()),
            substitute: Some(PartyInput::new(62, men())),
            technical_interest_rate: 0.0381,
            inflation_rate: Some(0.0788),
            inflation_history: InflationHistory::default(),
            start_month: 4,
            amount: BalanceAmount::Spm(100_000_000.0),
        };
        let result = engine().calculate(&request).unwrap();
        assert_relative_eq!(result.balance.amount(), 395142.58064675034, max_relative = 1e-12);
    }

    #[test]
    fn test_balance_round_trip() {
        let engine = engine();
        let timing = PensionTiming::from_month(9).unwrap();
        let request = BalanceRequest {
            annuity: 17.255829922071005,
            insurance: 0.46047946513195326,
            v: v(),
            inflation: 0.0788,
            timing,
            amount: BalanceAmount::Pension(8_000_000.0),
        };
        let spm = engine.balance(&request).unwrap().amount();

        let inverse = engine
            .balance(&BalanceRequest { amount: BalanceAmount::Spm(spm), ..request })
            .unwrap();
        assert_relative_eq!(inverse.amount(), 8_000_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_balance_validation() {
        let request = BalanceRequest {
            annuity: 10.0,
            insurance: 0.5,
            v: v(),
            inflation: -1.0,
            timing: PensionTiming::from_month(1).unwrap(),
            amount: BalanceAmount::Spm(1.0e8),
        };
        assert!(matches!(
            engine().balance(&request),
            Err(ValuationError::InvalidInput { field: "inflation rate", .. })
        ));

        let request = BalanceRequest { inflation: 0.05, amount: BalanceAmount::Pension(f64::NAN), ..request };
        assert!(matches!(
            engine().balance(&request),
            Err(ValuationError::InvalidInput { field: "amount", .. })
        ));
    }

    #[test]
    fn test_zero_real_rate_after_january_is_rejected() {
        let mut request = CalculationRequest {
            affiliate: PartyInput::new(65, men()),
            substitute: None,
            technical_interest_rate: 0.0,
            inflation_rate: Some(0.0),
            inflation_history: InflationHistory::default(),
            start_month: 4,
            amount: BalanceAmount::Pension(SMMLV2),
        };
        assert!(matches!(
            engine().calculate(&request),
            Err(ValuationError::InvalidInput { field: "monthly discount factor", .. })
        ));

        // (1 + i)(1 + K) = 1 with non-zero rates
        request.technical_interest_rate = -0.2;
        request.inflation_rate = Some(0.25);
        request.amount = BalanceAmount::Spm(1.0e8);
        assert!(matches!(
            engine().calculate(&request),
            Err(ValuationError::InvalidInput { field: "monthly discount factor", .. })
        ));

        // A January start has no catch-up term, so the result is finite
        request.start_month = 1;
        let result = engine().calculate(&request).unwrap();
        assert!(result.balance.amount().is_finite());
    }

    #[test]
    fn test_invalid_request_parameters() {
        let mut request = CalculationRequest {
            affiliate: PartyInput::new(65, men()),
            substitute: None,
            technical_interest_rate: 0.0381,
            inflation_rate: None,
            inflation_history: InflationHistory::default(),
            start_month: 13,
            amount: BalanceAmount::Pension(SMMLV2),
        };
        assert!(matches!(
            engine().calculate(&request),
            Err(ValuationError::InvalidInput { field: "pension start month", .. })
        ));

        request.start_month = 1;
        request.technical_interest_rate = -1.5;
        assert!(engine().calculate(&request).is_err());
    }

    #[test]
    fn test_repeated_requests_are_identical() {
        let engine = engine();
        let request = CalculationRequest {
            affiliate: PartyInput::new(58, men()),
            substitute: Some(PartyInput::new(55, women())),
            technical_interest_rate: 0.0381,
            inflation_rate: None,
            inflation_history: InflationHistory::default(),
            start_month: 6,
            amount: BalanceAmount::Spm(250_000_000.0),
        };
        let first = engine.calculate(&request).unwrap();
        let second = engine.calculate(&request).unwrap();
        assert_eq!(first.balance.amount().to_bits(), second.balance.amount().to_bits());
        assert_eq!(first, second);
    }
}
