use std::{
    fs::File,
    io::{self, BufWriter},
    path::Path,
};

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use tracing::{debug, info};

use fincalc_cli::{
    batch,
    cli::{
        BatchArgs, Cli, Command, CompoundArgs, InflationArgs, InflationQuery, LoanArgs,
        MortgageArgs, SipArgs, TaxArgs, WageArgs,
    },
    logging,
    profile::Profile,
    report::{
        self, CompoundReport, InflationReport, LoanReport, MortgageReport, SipReport, TaxReport,
        WageReport,
    },
};
use fincalc_core::{
    CpiTable, InflationResult, calculations::IncomeTaxCalculator, compute_compound_interest,
    compute_loan, compute_mortgage, compute_real_hourly_wage, compute_sip, project_inflation,
    purchasing_power,
};

// ─── subcommands ─────────────────────────────────────────────────────────────

fn load_profile(path: Option<&Path>) -> Result<Profile> {
    Profile::load_or_default(path).with_context(|| match path {
        Some(path) => format!("Failed to load profile: {}", path.display()),
        None => "Failed to build default profile".to_string(),
    })
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("Failed to create: {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn run_tax(args: TaxArgs) -> Result<()> {
    let profile = load_profile(args.profile.as_deref())?;
    let inputs = args.apply(profile.tax);
    debug!(?inputs, "tax inputs");

    let result = IncomeTaxCalculator::default().calculate(&inputs);
    info!(
        recommended = %result.recommended_regime,
        savings = %result.savings,
        "tax computed"
    );

    println!("{}", TaxReport::new(&result, args.regime));

    if let Some(path) = &args.series_csv {
        report::write_series_csv(create_output(path)?, &result.income_wise_tax)
            .with_context(|| format!("Failed to write series: {}", path.display()))?;
        info!(path = %path.display(), points = result.income_wise_tax.len(), "series written");
    }
    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<()> {
    let input = File::open(&args.input)
        .with_context(|| format!("Failed to open: {}", args.input.display()))?;

    let rows = match &args.output {
        Some(path) => batch::run(input, create_output(path)?),
        None => batch::run(input, io::stdout().lock()),
    }
    .with_context(|| format!("Failed to process batch: {}", args.input.display()))?;

    info!(rows, "batch complete");
    Ok(())
}

fn run_wage(args: WageArgs) -> Result<()> {
    let profile = load_profile(args.profile.as_deref())?;
    let wage = args.apply(profile.wage);
    debug!(inputs = ?wage.inputs, "wage inputs");

    let result = compute_real_hourly_wage(&wage.inputs);
    if let Some(error) = result.error {
        return Err(error).context("Cannot compute real hourly wage");
    }

    println!("{}", WageReport::new(&result, &wage.currency_symbol));
    Ok(())
}

fn run_loan(args: LoanArgs) -> Result<()> {
    let inputs = args.to_inputs();
    debug!(?inputs, "loan inputs");

    let result = compute_loan(&inputs).context("Cannot compute loan schedule")?;
    println!("{}", LoanReport::new(&result));

    if let Some(path) = &args.schedule_csv {
        report::write_schedule_csv(create_output(path)?, &result.schedule)
            .with_context(|| format!("Failed to write schedule: {}", path.display()))?;
        info!(path = %path.display(), months = result.schedule.len(), "schedule written");
    }
    Ok(())
}

fn run_mortgage(args: MortgageArgs) -> Result<()> {
    let inputs = args.to_inputs();
    debug!(?inputs, "mortgage inputs");

    let result = compute_mortgage(&inputs).context("Cannot compute mortgage payment")?;
    println!("{}", MortgageReport::new(&result, &args.currency));
    Ok(())
}

fn run_compound(args: CompoundArgs) -> Result<()> {
    let inputs = args.to_inputs();
    debug!(?inputs, "compound interest inputs");

    let result =
        compute_compound_interest(&inputs).context("Cannot compute compound growth")?;
    println!("{}", CompoundReport::new(&result, &args.currency));

    if let Some(path) = &args.yearly_csv {
        report::write_compound_csv(create_output(path)?, &result.yearly)
            .with_context(|| format!("Failed to write yearly table: {}", path.display()))?;
        info!(path = %path.display(), "yearly table written");
    }
    Ok(())
}

fn run_inflation(args: InflationArgs) -> Result<()> {
    let (result, from, to) = match args.query() {
        InflationQuery::Cpi { from, to } => {
            let result = purchasing_power(args.amount, from, to, &CpiTable::us())
                .context("Cannot compare CPI years")?;
            (result, format!("in {from}"), format!("in {to}"))
        }
        InflationQuery::Projection { years, rate } => {
            let factor = project_inflation(Decimal::ONE, years, rate)
                .context("Cannot project inflation")?;
            let future_value = project_inflation(args.amount, years, rate)
                .context("Cannot project inflation")?;
            let result = InflationResult {
                future_value,
                total_inflation: future_value - args.amount,
                cumulative_rate: (factor - Decimal::ONE) * Decimal::ONE_HUNDRED,
            };
            (result, "today".to_string(), format!("in {years} years"))
        }
    };

    let report = InflationReport::new(
        args.amount,
        &result,
        (from.as_str(), to.as_str()),
        &args.currency,
    );
    println!("{report}");
    Ok(())
}

fn run_sip(args: SipArgs) -> Result<()> {
    let inputs = args.to_inputs();
    debug!(?inputs, "sip inputs");

    let result = compute_sip(&inputs).context("Cannot project SIP")?;
    info!(corpus = %result.estimated_corpus, xirr = %result.xirr, "sip projected");
    println!("{}", SipReport::new(&result));

    if let Some(path) = &args.yearly_csv {
        report::write_csv(create_output(path)?, &result.yearly)
            .with_context(|| format!("Failed to write yearly table: {}", path.display()))?;
        info!(path = %path.display(), "yearly table written");
    }
    Ok(())
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_file.as_deref())?;

    match cli.command {
        Command::Tax(args) => run_tax(args),
        Command::TaxBatch(args) => run_batch(args),
        Command::Wage(args) => run_wage(args),
        Command::Loan(args) => run_loan(args),
        Command::Mortgage(args) => run_mortgage(args),
        Command::Compound(args) => run_compound(args),
        Command::Inflation(args) => run_inflation(args),
        Command::Sip(args) => run_sip(args),
    }
}
