//! SPM Actuarial CLI
//!
//! Computes the minimum pension balance for a pension, or the pension a balance funds

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use spm_actuarial::age::completed_age;
use spm_actuarial::balance::{PensionTiming, SMMLV2};
use spm_actuarial::engine::{BalanceAmount, BalanceOutcome, CalculationRequest, PartyInput};
use spm_actuarial::tables::{load_tables, Condition, Gender, NumberFormat, TableKey};
use spm_actuarial::{CalculationResult, EngineConfig, ValuationEngine};

/// Minimum pension balance (SPM) calculator
#[derive(Parser)]
#[command(name = "spm_actuarial")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Life table CSV (overrides the config file)
    #[arg(short, long, global = true)]
    tables: Option<PathBuf>,

    /// Number format of the table's lx column
    #[arg(long, value_enum, global = true)]
    number_format: Option<NumberFormatArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Required balance for a monthly pension
    Spm {
        /// Monthly pension amount
        #[arg(long, default_value_t = SMMLV2)]
        pension: f64,

        #[command(flatten)]
        valuation: ValuationArgs,
    },

    /// Monthly pension funded by a balance
    Pension {
        /// Available balance
        #[arg(long)]
        spm: f64,

        #[command(flatten)]
        valuation: ValuationArgs,
    },
}

#[derive(Args)]
struct ValuationArgs {
    /// Affiliate age in completed years
    #[arg(long, conflicts_with = "affiliate_birth", required_unless_present = "affiliate_birth")]
    affiliate_age: Option<u32>,

    /// Affiliate date of birth (YYYY-MM-DD)
    #[arg(long)]
    affiliate_birth: Option<NaiveDate>,

    #[arg(long, value_enum, default_value = "hombre")]
    affiliate_gender: GenderArg,

    #[arg(long, value_enum, default_value = "valido")]
    affiliate_condition: ConditionArg,

    /// Substitute age in completed years
    #[arg(long, conflicts_with = "substitute_birth")]
    substitute_age: Option<u32>,

    /// Substitute date of birth (YYYY-MM-DD)
    #[arg(long)]
    substitute_birth: Option<NaiveDate>,

    #[arg(long, value_enum, default_value = "mujer")]
    substitute_gender: GenderArg,

    #[arg(long, value_enum, default_value = "valido")]
    substitute_condition: ConditionArg,

    /// Pension start date (YYYY-MM-DD); defaults to today
    #[arg(long, conflicts_with = "start_month")]
    start_date: Option<NaiveDate>,

    /// Pension start month (1-12), when ages are given directly
    #[arg(long)]
    start_month: Option<u32>,

    /// Annual technical interest rate in percent (e.g. 3.81)
    #[arg(long)]
    interest: Option<f64>,

    /// Annual inflation in percent; defaults to the weighted three-year average
    #[arg(long)]
    inflation: Option<f64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GenderArg {
    Hombre,
    Mujer,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConditionArg {
    Valido,
    Invalido,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NumberFormatArg {
    Plain,
    Colombian,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn table_key(gender: GenderArg, condition: ConditionArg) -> TableKey {
    let gender = match gender {
        GenderArg::Hombre => Gender::Hombre,
        GenderArg::Mujer => Gender::Mujer,
    };
    let condition = match condition {
        ConditionArg::Valido => Condition::NoInvalido,
        ConditionArg::Invalido => Condition::Invalido,
    };
    TableKey::new(gender, condition)
}

fn resolve_age(age: Option<u32>, birth: Option<NaiveDate>, start: NaiveDate, who: &str) -> Result<Option<u32>> {
    match (age, birth) {
        (Some(age), _) => Ok(Some(age)),
        (None, Some(birth)) => Ok(Some(
            completed_age(birth, start).with_context(|| format!("computing {who} age"))?,
        )),
        (None, None) => Ok(None),
    }
}

fn build_request(args: &ValuationArgs, config: &EngineConfig, amount: BalanceAmount) -> Result<CalculationRequest> {
    let start = args
        .start_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let start_month = match args.start_month {
        Some(month) => month,
        None => PensionTiming::from_date(start).start_month(),
    };

    let Some(affiliate_age) = resolve_age(args.affiliate_age, args.affiliate_birth, start, "affiliate")? else {
        bail!("either --affiliate-age or --affiliate-birth is required");
    };
    let substitute = resolve_age(args.substitute_age, args.substitute_birth, start, "substitute")?
        .map(|age| PartyInput::new(age, table_key(args.substitute_gender, args.substitute_condition)));

    Ok(CalculationRequest {
        affiliate: PartyInput::new(affiliate_age, table_key(args.affiliate_gender, args.affiliate_condition)),
        substitute,
        technical_interest_rate: args
            .interest
            .map(|pct| pct / 100.0)
            .unwrap_or(config.technical_interest_rate),
        inflation_rate: args.inflation.map(|pct| pct / 100.0),
        inflation_history: config.inflation,
        start_month,
        amount,
    })
}

fn print_table(request: &CalculationRequest, result: &CalculationResult) {
    let annuity = &result.valuation.annuity;
    let timing = &result.timing;

    println!("Affiliate: age {} ({})", request.affiliate.age, request.affiliate.table);
    if let Some(substitute) = &request.substitute {
        println!("Substitute: age {} ({})", substitute.age, substitute.table);
    }
    println!(
        "Start month: {} | n = {} | r = {} | K = {:.6}",
        timing.start_month(),
        timing.n(),
        timing.r(),
        result.inflation
    );
    println!();

    println!("{:<28} {:>20}", "Component", "Value");
    println!("{}", "-".repeat(49));
    println!("{:<28} {:>20.5}", "a_x (affiliate)", annuity.a_x);
    println!("{:<28} {:>20.5}", "a_y (substitute)", annuity.a_y);
    println!("{:<28} {:>20.5}", "a_xy (both)", annuity.a_xy);
    println!("{:<28} {:>20.5}", "a_total", annuity.a_total);
    println!("{:<28} {:>20.8}", "A_x (whole life)", result.valuation.insurance.a_x);
    println!("{}", "-".repeat(49));

    let (label, amount, base, funeral_aid, factors) = match &result.balance {
        BalanceOutcome::Spm(r) => ("SPM", r.spm, r.base_value, r.funeral_aid, r.factors),
        BalanceOutcome::Pension(r) => ("Pension (monthly)", r.pension, r.base_value, r.funeral_aid, r.factors),
    };
    println!("{:<28} {:>20.2}", label, amount);
    if let BalanceOutcome::Pension(r) = &result.balance {
        println!("{:<28} {:>20.2}", "Provisional pension", r.provisional_pension);
    }
    println!("{:<28} {:>20.8}", "Base value", base);
    println!("{:<28} {:>20.8}", "Funeral aid (A adjusted)", funeral_aid);
    println!("{:<28} {:>20.8}", "f12", factors.f12);
    println!("{:<28} {:>20.8}", "f2", factors.f2);
    println!("{:<28} {:>20.4}", "K*", factors.k_star);
    println!("{:<28} {:>20.8}", "U", factors.u);
    println!("{:<28} {:>20.8}", "C", factors.c);
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(path) = &cli.tables {
        config.tables_path = path.clone();
    }
    if let Some(format) = cli.number_format {
        config.number_format = match format {
            NumberFormatArg::Plain => NumberFormat::Plain,
            NumberFormatArg::Colombian => NumberFormat::Colombian,
        };
    }

    let tables = load_tables(&config.tables_path, config.number_format)
        .with_context(|| format!("loading life tables from {}", config.tables_path.display()))?;
    let engine = ValuationEngine::new(tables);

    let request = match &cli.command {
        Commands::Spm { pension, valuation } => build_request(valuation, &config, BalanceAmount::Pension(*pension))?,
        Commands::Pension { spm, valuation } => build_request(valuation, &config, BalanceAmount::Spm(*spm))?,
    };

    let result = engine.calculate(&request).context("valuation failed")?;

    match cli.format {
        OutputFormat::Table => print_table(&request, &result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    Ok(())
}
