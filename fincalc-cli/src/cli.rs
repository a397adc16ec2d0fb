use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fincalc_core::{
    CompoundInterestInputs, LoanInputs, MortgageInputs, PlannerMode, Prepayment,
    PrepaymentFrequency, PrepaymentStrategy, Regime, SipInputs, StepUpMode, TaxInputs,
    calculations::recurring_prepayments,
};
use rust_decimal::Decimal;
use tracing::warn;

use crate::{logging::DEFAULT_LOG_LEVEL, profile::WageProfile, utils::parse_decimal};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Personal-finance calculators: Indian income tax under both regimes, the
/// real hourly wage after shadow work, and loan and investment projections.
///
/// Amounts accept thousands separators in either grouping
/// (`15,00,000` or `1,500,000`).
#[derive(Debug, Parser)]
#[command(name = "fincalc", version, about, long_about = None)]
pub struct Cli {
    /// Log filter: a level (`warn`, `debug`) or an EnvFilter directive.
    /// `RUST_LOG` takes precedence when set.
    #[arg(long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compare old and new regime tax for one filer.
    Tax(TaxArgs),
    /// Compare both regimes for every scenario in a CSV file.
    TaxBatch(BatchArgs),
    /// Compute the real hourly wage.
    Wage(WageArgs),
    /// EMI and amortization schedule, with optional prepayments.
    Loan(LoanArgs),
    /// Monthly cost of a mortgage including tax, insurance, PMI and HOA.
    Mortgage(MortgageArgs),
    /// Growth of a deposit plus monthly contributions.
    Compound(CompoundArgs),
    /// Purchasing power across CPI years or at a constant rate.
    Inflation(InflationArgs),
    /// Systematic investment plan projection or goal search.
    Sip(SipArgs),
}

fn parse_regime(s: &str) -> Result<Regime, String> {
    Regime::parse(s).ok_or_else(|| format!("unknown regime '{s}', expected 'old' or 'new'"))
}

fn parse_strategy(s: &str) -> Result<PrepaymentStrategy, String> {
    PrepaymentStrategy::parse(s).ok_or_else(|| {
        format!("unknown strategy '{s}', expected 'reduce-tenure' or 'reduce-emi'")
    })
}

fn parse_frequency(s: &str) -> Result<PrepaymentFrequency, String> {
    PrepaymentFrequency::parse(s).ok_or_else(|| {
        format!("unknown frequency '{s}', expected 'monthly', 'quarterly' or 'yearly'")
    })
}

fn parse_step_up_mode(s: &str) -> Result<StepUpMode, String> {
    StepUpMode::parse(s)
        .ok_or_else(|| format!("unknown step-up mode '{s}', expected 'percent' or 'fixed'"))
}

/// A one-time prepayment written as `AMOUNT@MONTH`, e.g. `5,00,000@12`.
pub fn parse_prepayment(s: &str) -> Result<(Decimal, u32), String> {
    let (amount, month) = s
        .split_once('@')
        .ok_or_else(|| format!("expected AMOUNT@MONTH, got '{s}'"))?;
    let amount = parse_decimal(amount).map_err(|e| e.to_string())?;
    let month: u32 = month
        .trim()
        .parse()
        .map_err(|_| format!("invalid month '{month}' in '{s}'"))?;
    if month == 0 {
        return Err(format!("prepayment month must be at least 1 in '{s}'"));
    }
    Ok((amount, month))
}

// ─── tax ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TaxArgs {
    /// TOML profile supplying the `[tax]` inputs.
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Annual salary.
    #[arg(long, value_parser = parse_decimal)]
    pub salary: Option<Decimal>,

    /// Interest income (savings, FDs).
    #[arg(long, value_parser = parse_decimal)]
    pub interest: Option<Decimal>,

    #[arg(long, value_parser = parse_decimal)]
    pub rental: Option<Decimal>,

    #[arg(long, value_parser = parse_decimal)]
    pub other_income: Option<Decimal>,

    /// Section 80C investments (capped at 1.5L).
    #[arg(long = "section-80c", value_parser = parse_decimal)]
    pub section_80c: Option<Decimal>,

    /// Section 80D health insurance (capped at 1L).
    #[arg(long = "section-80d", value_parser = parse_decimal)]
    pub section_80d: Option<Decimal>,

    /// HRA exemption.
    #[arg(long, value_parser = parse_decimal)]
    pub hra: Option<Decimal>,

    /// Home loan interest (capped at 2L).
    #[arg(long, value_parser = parse_decimal)]
    pub home_loan_interest: Option<Decimal>,

    /// NPS contribution under 80CCD(1B) (capped at 50K).
    #[arg(long, value_parser = parse_decimal)]
    pub nps: Option<Decimal>,

    #[arg(long, value_parser = parse_decimal)]
    pub other_deductions: Option<Decimal>,

    /// Business or professional income: no standard deduction.
    #[arg(long)]
    pub business: bool,

    /// Print only this regime (`old` or `new`).
    #[arg(long, value_parser = parse_regime)]
    pub regime: Option<Regime>,

    /// Write the income-wise tax series to this CSV file.
    #[arg(long)]
    pub series_csv: Option<PathBuf>,
}

/// Negative amounts are clamped to zero.
fn non_negative(
    field: &'static str,
    value: Decimal,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(field, %value, "negative amount clamped to zero");
        Decimal::ZERO
    } else {
        value
    }
}

impl TaxArgs {
    /// Overlays the flags that were given onto `base` (defaults or profile).
    pub fn apply(
        &self,
        base: TaxInputs,
    ) -> TaxInputs {
        let pick = |field, flag: Option<Decimal>, current: Decimal| {
            non_negative(field, flag.unwrap_or(current))
        };

        TaxInputs {
            annual_salary: pick("annual_salary", self.salary, base.annual_salary),
            interest_income: pick("interest_income", self.interest, base.interest_income),
            rental_income: pick("rental_income", self.rental, base.rental_income),
            other_income: pick("other_income", self.other_income, base.other_income),
            section_80c: pick("section_80c", self.section_80c, base.section_80c),
            section_80d: pick("section_80d", self.section_80d, base.section_80d),
            hra_exemption: pick("hra_exemption", self.hra, base.hra_exemption),
            home_loan_interest: pick(
                "home_loan_interest",
                self.home_loan_interest,
                base.home_loan_interest,
            ),
            nps_80ccd_1b: pick("nps_80ccd_1b", self.nps, base.nps_80ccd_1b),
            other_deductions: pick(
                "other_deductions",
                self.other_deductions,
                base.other_deductions,
            ),
            is_salaried: base.is_salaried && !self.business,
        }
    }
}

// ─── tax-batch ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// CSV file with one scenario per row.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output CSV file; stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

// ─── wage ────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct WageArgs {
    /// TOML profile supplying the `[wage]` inputs.
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Gross annual salary.
    #[arg(long, value_parser = parse_decimal)]
    pub salary: Option<Decimal>,

    /// Effective tax rate in percent (e.g. `25`).
    #[arg(long, value_parser = parse_decimal)]
    pub tax_rate: Option<Decimal>,

    /// Contracted hours per week.
    #[arg(long, value_parser = parse_decimal)]
    pub hours: Option<Decimal>,

    #[arg(long, value_parser = parse_decimal)]
    pub vacation_weeks: Option<Decimal>,

    /// Round-trip commute, minutes per workday.
    #[arg(long, value_parser = parse_decimal)]
    pub commute_minutes: Option<Decimal>,

    /// Getting ready for work, minutes per workday.
    #[arg(long, value_parser = parse_decimal)]
    pub prep_minutes: Option<Decimal>,

    /// Winding down after work, minutes per workday.
    #[arg(long, value_parser = parse_decimal)]
    pub decompression_minutes: Option<Decimal>,

    /// Unpaid overtime hours per week.
    #[arg(long, value_parser = parse_decimal)]
    pub overtime: Option<Decimal>,

    /// Monthly commute cost.
    #[arg(long, value_parser = parse_decimal)]
    pub commute_cost: Option<Decimal>,

    /// Monthly food and coffee bought because of work.
    #[arg(long, value_parser = parse_decimal)]
    pub food_cost: Option<Decimal>,

    /// Annual professional upkeep (clothes, equipment, courses).
    #[arg(long, value_parser = parse_decimal)]
    pub upkeep: Option<Decimal>,

    /// Other monthly work costs.
    #[arg(long, value_parser = parse_decimal)]
    pub misc_cost: Option<Decimal>,

    /// Remote work: no commute time, commute cost or food cost.
    #[arg(long)]
    pub remote: bool,

    /// Currency symbol for the report.
    #[arg(long)]
    pub currency: Option<String>,
}

impl WageArgs {
    /// Overlays the flags that were given onto `base` (defaults or profile).
    pub fn apply(
        &self,
        base: WageProfile,
    ) -> WageProfile {
        let mut profile = base;
        let inputs = &mut profile.inputs;

        let overrides = [
            (self.salary, &mut inputs.gross_annual_salary),
            (self.tax_rate, &mut inputs.tax_rate),
            (self.hours, &mut inputs.hours_per_week),
            (self.vacation_weeks, &mut inputs.vacation_weeks),
            (self.commute_minutes, &mut inputs.commute_daily_minutes),
            (self.prep_minutes, &mut inputs.prep_daily_minutes),
            (self.decompression_minutes, &mut inputs.decompression_daily_minutes),
            (self.overtime, &mut inputs.unpaid_overtime_weekly),
            (self.commute_cost, &mut inputs.commute_cost_monthly),
            (self.food_cost, &mut inputs.food_coffee_monthly),
            (self.upkeep, &mut inputs.professional_upkeep_annual),
            (self.misc_cost, &mut inputs.misc_monthly_costs),
        ];
        for (flag, slot) in overrides {
            if let Some(value) = flag {
                *slot = value;
            }
        }
        inputs.is_remote |= self.remote;

        if let Some(symbol) = &self.currency {
            profile.currency_symbol = symbol.clone();
        }
        profile
    }
}

// ─── loan ────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoanArgs {
    /// Loan amount.
    #[arg(long, value_parser = parse_decimal)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent.
    #[arg(long, value_parser = parse_decimal)]
    pub rate: Option<Decimal>,

    /// Tenure in years.
    #[arg(long, conflicts_with = "months")]
    pub years: Option<u32>,

    /// Tenure in months.
    #[arg(long)]
    pub months: Option<u32>,

    /// One-time prepayment as `AMOUNT@MONTH`; repeatable.
    #[arg(long = "prepay", value_parser = parse_prepayment)]
    pub prepayments: Vec<(Decimal, u32)>,

    /// Recurring prepayment amount.
    #[arg(long, value_parser = parse_decimal)]
    pub recurring: Option<Decimal>,

    /// How often the recurring prepayment is made.
    #[arg(long, value_parser = parse_frequency, default_value = "yearly")]
    pub every: PrepaymentFrequency,

    /// First month of the recurring prepayment.
    #[arg(long, default_value_t = 1)]
    pub from_month: u32,

    /// What prepayments shorten: `reduce-tenure` or `reduce-emi`.
    #[arg(long, value_parser = parse_strategy, default_value = "reduce-tenure")]
    pub strategy: PrepaymentStrategy,

    /// Write the amortization schedule to this CSV file.
    #[arg(long)]
    pub schedule_csv: Option<PathBuf>,
}

impl LoanArgs {
    pub fn to_inputs(&self) -> LoanInputs {
        let base = LoanInputs::default();
        let tenure_months = match (self.years, self.months) {
            (_, Some(months)) => months,
            (Some(years), None) => years.saturating_mul(12),
            (None, None) => base.tenure_months,
        };

        let mut prepayments: Vec<Prepayment> = self
            .prepayments
            .iter()
            .map(|&(amount, month)| Prepayment {
                month,
                amount: non_negative("prepayment", amount),
                strategy: self.strategy,
            })
            .collect();
        if let Some(amount) = self.recurring {
            prepayments.extend(recurring_prepayments(
                non_negative("recurring", amount),
                self.from_month,
                self.every,
                tenure_months,
                self.strategy,
            ));
        }

        LoanInputs {
            principal: non_negative("principal", self.principal.unwrap_or(base.principal)),
            annual_rate: non_negative("annual_rate", self.rate.unwrap_or(base.annual_rate)),
            tenure_months,
            prepayments,
        }
    }
}

// ─── mortgage ────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MortgageArgs {
    #[arg(long, value_parser = parse_decimal)]
    pub price: Option<Decimal>,

    #[arg(long, value_parser = parse_decimal)]
    pub down_payment: Option<Decimal>,

    /// Loan term in years.
    #[arg(long)]
    pub years: Option<u32>,

    /// Annual interest rate in percent.
    #[arg(long, value_parser = parse_decimal)]
    pub rate: Option<Decimal>,

    /// Annual property tax as a percent of the home price.
    #[arg(long, value_parser = parse_decimal)]
    pub property_tax: Option<Decimal>,

    /// Monthly home insurance.
    #[arg(long, value_parser = parse_decimal)]
    pub insurance: Option<Decimal>,

    /// Annual PMI as a percent of the loan, charged under 20% down.
    #[arg(long, value_parser = parse_decimal)]
    pub pmi: Option<Decimal>,

    /// Monthly HOA dues.
    #[arg(long, value_parser = parse_decimal)]
    pub hoa: Option<Decimal>,

    /// Currency symbol for the report.
    #[arg(long, default_value = "$")]
    pub currency: String,
}

impl MortgageArgs {
    pub fn to_inputs(&self) -> MortgageInputs {
        let base = MortgageInputs::default();
        let pick = |field, flag: Option<Decimal>, current: Decimal| {
            non_negative(field, flag.unwrap_or(current))
        };

        MortgageInputs {
            home_price: pick("home_price", self.price, base.home_price),
            down_payment: pick("down_payment", self.down_payment, base.down_payment),
            term_years: self.years.unwrap_or(base.term_years),
            interest_rate: pick("interest_rate", self.rate, base.interest_rate),
            property_tax_rate: pick("property_tax_rate", self.property_tax, base.property_tax_rate),
            home_insurance_monthly: pick(
                "home_insurance_monthly",
                self.insurance,
                base.home_insurance_monthly,
            ),
            pmi_rate: pick("pmi_rate", self.pmi, base.pmi_rate),
            hoa_monthly: pick("hoa_monthly", self.hoa, base.hoa_monthly),
        }
    }
}

// ─── compound ────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompoundArgs {
    /// Opening deposit.
    #[arg(long, value_parser = parse_decimal)]
    pub principal: Option<Decimal>,

    /// Contribution added every month.
    #[arg(long, value_parser = parse_decimal)]
    pub monthly: Option<Decimal>,

    /// Annual interest rate in percent.
    #[arg(long, value_parser = parse_decimal)]
    pub rate: Option<Decimal>,

    #[arg(long)]
    pub years: Option<u32>,

    /// Annual inflation in percent, for the real value.
    #[arg(long, value_parser = parse_decimal)]
    pub inflation: Option<Decimal>,

    /// Write the year-by-year balances to this CSV file.
    #[arg(long)]
    pub yearly_csv: Option<PathBuf>,

    #[arg(long, default_value = "$")]
    pub currency: String,
}

impl CompoundArgs {
    pub fn to_inputs(&self) -> CompoundInterestInputs {
        let base = CompoundInterestInputs::default();
        CompoundInterestInputs {
            initial_principal: non_negative(
                "initial_principal",
                self.principal.unwrap_or(base.initial_principal),
            ),
            monthly_contribution: non_negative(
                "monthly_contribution",
                self.monthly.unwrap_or(base.monthly_contribution),
            ),
            annual_rate: self.rate.unwrap_or(base.annual_rate),
            years: self.years.unwrap_or(base.years),
            inflation_rate: self.inflation.unwrap_or(base.inflation_rate),
        }
    }
}

// ─── inflation ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InflationArgs {
    /// Amount to re-express.
    #[arg(long, value_parser = parse_decimal, default_value = "100")]
    pub amount: Decimal,

    /// CPI year the amount is expressed in.
    #[arg(long = "from", requires = "to_year", conflicts_with = "years")]
    pub from_year: Option<i32>,

    /// CPI year to convert into.
    #[arg(long = "to", requires = "from_year")]
    pub to_year: Option<i32>,

    /// Project forward this many years at `--rate` instead of using CPI.
    #[arg(long)]
    pub years: Option<u32>,

    /// Annual inflation in percent for `--years`.
    #[arg(long, value_parser = parse_decimal, default_value = "6")]
    pub rate: Decimal,

    #[arg(long, default_value = "$")]
    pub currency: String,
}

/// How `inflation` was asked to convert the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InflationQuery {
    Cpi { from: i32, to: i32 },
    Projection { years: u32, rate: Decimal },
}

impl InflationArgs {
    /// CPI years win when given; otherwise a constant-rate projection,
    /// ten years by default.
    pub fn query(&self) -> InflationQuery {
        match (self.from_year, self.to_year) {
            (Some(from), Some(to)) => InflationQuery::Cpi { from, to },
            _ => InflationQuery::Projection {
                years: self.years.unwrap_or(10),
                rate: self.rate,
            },
        }
    }
}

// ─── sip ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SipArgs {
    /// Starting monthly installment.
    #[arg(long, value_parser = parse_decimal)]
    pub monthly: Option<Decimal>,

    #[arg(long)]
    pub years: Option<u32>,

    /// Expected annual return in percent.
    #[arg(long = "return", value_parser = parse_decimal)]
    pub annual_return: Option<Decimal>,

    /// Amount invested up front.
    #[arg(long, value_parser = parse_decimal)]
    pub lumpsum: Option<Decimal>,

    /// Yearly increase of the installment; `0` disables it.
    #[arg(long, value_parser = parse_decimal)]
    pub step_up: Option<Decimal>,

    /// Whether `--step-up` is a `percent` or a `fixed` amount.
    #[arg(long, value_parser = parse_step_up_mode)]
    pub step_up_mode: Option<StepUpMode>,

    /// Annual inflation in percent, for the real corpus.
    #[arg(long, value_parser = parse_decimal, conflicts_with = "no_inflation")]
    pub inflation: Option<Decimal>,

    /// Report the corpus without inflation adjustment.
    #[arg(long)]
    pub no_inflation: bool,

    /// Find the installment that reaches this corpus.
    #[arg(long, value_parser = parse_decimal)]
    pub goal: Option<Decimal>,

    /// Write the year-by-year projection to this CSV file.
    #[arg(long)]
    pub yearly_csv: Option<PathBuf>,
}

impl SipArgs {
    pub fn to_inputs(&self) -> SipInputs {
        let base = SipInputs::default();
        let inflation_rate = if self.no_inflation {
            None
        } else {
            self.inflation.or(base.inflation_rate)
        };
        let (mode, target_corpus) = match self.goal {
            Some(goal) => (PlannerMode::Goal, non_negative("target_corpus", goal)),
            None => (base.mode, base.target_corpus),
        };

        SipInputs {
            monthly_investment: non_negative(
                "monthly_investment",
                self.monthly.unwrap_or(base.monthly_investment),
            ),
            tenure_years: self.years.unwrap_or(base.tenure_years),
            annual_return: self.annual_return.unwrap_or(base.annual_return),
            lumpsum_amount: non_negative(
                "lumpsum_amount",
                self.lumpsum.unwrap_or(base.lumpsum_amount),
            ),
            step_up_mode: self.step_up_mode.unwrap_or(base.step_up_mode),
            step_up_value: non_negative(
                "step_up_value",
                self.step_up.unwrap_or(base.step_up_value),
            ),
            inflation_rate,
            mode,
            target_corpus,
        }
    }
}
