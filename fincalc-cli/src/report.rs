//! Plain-text reports and CSV export for computed results.

use std::{fmt, io::Write};

use fincalc_core::{
    AmortizationRow, CompoundInterestResult, CompoundYear, IncomeTaxPoint, InflationResult,
    LoanResult, MortgageResult, Regime, SipResult, TaxBreakdown, TaxResult, WageResult,
};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::format::{
    format_currency, format_hourly, format_hours, format_inr, format_inr_compact, format_percent,
    format_rate,
};

const HOURS_PER_WEEK: Decimal = dec!(168);

// ---------------------------------------------------------------------------
// Tax
// ---------------------------------------------------------------------------

/// Side-by-side regime comparison, or a single regime when `only` is set.
pub struct TaxReport<'a> {
    result: &'a TaxResult,
    only: Option<Regime>,
}

impl<'a> TaxReport<'a> {
    pub fn new(
        result: &'a TaxResult,
        only: Option<Regime>,
    ) -> Self {
        Self { result, only }
    }

    fn write_regime(
        f: &mut fmt::Formatter<'_>,
        b: &TaxBreakdown,
        recommended: bool,
    ) -> fmt::Result {
        let marker = if recommended { "  (recommended)" } else { "" };
        writeln!(f, "{}{marker}", b.regime.label())?;
        writeln!(f, "  Gross income        {}", format_inr(b.gross_income))?;
        writeln!(f, "  Deductions          -{}", format_inr(b.total_deductions))?;
        writeln!(f, "  Taxable income      {}", format_inr(b.taxable_income))?;
        writeln!(f, "  Slab tax            {}", format_inr(b.raw_tax))?;
        writeln!(f, "  Rebate (87A)        -{}", format_inr(b.rebate))?;
        writeln!(f, "  Surcharge           {}", format_inr(b.surcharge))?;
        writeln!(f, "  Cess                {}", format_inr(b.cess))?;
        writeln!(f, "  Total tax           {}", format_inr(b.total_tax))?;
        writeln!(f, "  Take-home           {}", format_inr(b.take_home_income))?;
        writeln!(f, "  Effective rate      {}", format_rate(b.effective_rate))?;
        writeln!(f, "  Marginal rate       {}", format_rate(b.marginal_rate))?;
        writeln!(f, "  Monthly tax         {}", format_inr(b.monthly_tax))?;
        writeln!(f, "  Monthly in-hand     {}", format_inr(b.monthly_take_home))?;
        writeln!(f, "  Slabs")?;
        for slab in &b.slab_breakdown {
            writeln!(
                f,
                "    {:<12} {:>6}  {:>12}  {:>12}",
                slab.label,
                format_rate(slab.rate),
                format_inr(slab.taxable_amount),
                format_inr(slab.tax)
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for TaxReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = self.result;
        writeln!(
            f,
            "Recommended: {} (saves {} vs {})",
            r.recommended_regime.label(),
            format_inr(r.savings),
            other(r.recommended_regime).label()
        )?;

        let regimes: &[Regime] = match self.only {
            Some(Regime::Old) => &[Regime::Old],
            Some(Regime::New) => &[Regime::New],
            None => &[Regime::Old, Regime::New],
        };
        for regime in regimes {
            writeln!(f)?;
            Self::write_regime(f, r.breakdown(*regime), *regime == r.recommended_regime)?;
        }

        if let (Some(first), Some(last)) = (r.income_wise_tax.first(), r.income_wise_tax.last()) {
            writeln!(f)?;
            write!(
                f,
                "Income sweep: {} points from {} to {}",
                r.income_wise_tax.len(),
                format_inr_compact(first.income),
                format_inr_compact(last.income)
            )?;
        }
        Ok(())
    }
}

fn other(regime: Regime) -> Regime {
    match regime {
        Regime::Old => Regime::New,
        Regime::New => Regime::Old,
    }
}

#[derive(Serialize)]
struct SeriesRow {
    income: Decimal,
    old_tax: Decimal,
    new_tax: Decimal,
}

/// Serializes `rows` with a header taken from the first row's field names.
pub fn write_csv<W, S>(
    writer: W,
    rows: impl IntoIterator<Item = S>,
) -> Result<(), csv::Error>
where
    W: Write,
    S: Serialize,
{
    let mut writer = csv::Writer::from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes the income-wise series as `income,old_tax,new_tax`.
pub fn write_series_csv<W: Write>(
    writer: W,
    points: &[IncomeTaxPoint],
) -> Result<(), csv::Error> {
    write_csv(
        writer,
        points.iter().map(|point| SeriesRow {
            income: point.income.normalize(),
            old_tax: point.old_tax.normalize(),
            new_tax: point.new_tax.normalize(),
        }),
    )
}

fn cents(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Writes the amortization schedule with amounts rounded to cents.
pub fn write_schedule_csv<W: Write>(
    writer: W,
    schedule: &[AmortizationRow],
) -> Result<(), csv::Error> {
    write_csv(
        writer,
        schedule.iter().map(|row| AmortizationRow {
            month: row.month,
            emi: cents(row.emi),
            principal: cents(row.principal),
            interest: cents(row.interest),
            prepayment: cents(row.prepayment),
            total_payment: cents(row.total_payment),
            remaining_balance: cents(row.remaining_balance),
        }),
    )
}

/// Writes the compound growth table with amounts rounded to cents.
pub fn write_compound_csv<W: Write>(
    writer: W,
    yearly: &[CompoundYear],
) -> Result<(), csv::Error> {
    write_csv(
        writer,
        yearly.iter().map(|year| CompoundYear {
            year: year.year,
            balance: cents(year.balance),
            total_principal: cents(year.total_principal),
            total_interest: cents(year.total_interest),
            annual_interest: cents(year.annual_interest),
            real_value: cents(year.real_value),
        }),
    )
}

// ---------------------------------------------------------------------------
// Wage
// ---------------------------------------------------------------------------

pub struct WageReport<'a> {
    result: &'a WageResult,
    symbol: &'a str,
}

impl<'a> WageReport<'a> {
    pub fn new(
        result: &'a WageResult,
        symbol: &'a str,
    ) -> Self {
        Self { result, symbol }
    }
}

impl fmt::Display for WageReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if let Some(error) = &self.result.error {
            return write!(f, "Error: {error}");
        }

        let sym = self.symbol;
        let m = &self.result.summary_metrics;
        let d = &self.result.detailed_breakdown;

        writeln!(f, "Nominal wage        {}/hr", format_hourly(m.nominal_wage, sym))?;
        writeln!(f, "Real wage           {}/hr", format_hourly(m.real_wage, sym))?;
        writeln!(f, "Wage erosion        {}", format_percent(m.erosion_percentage))?;
        writeln!(
            f,
            "Remote equivalent   {}",
            format_currency(m.remote_equivalent, sym, true)
        )?;
        writeln!(
            f,
            "Hours invested      {} hrs/year",
            format_hours(d.total_annual_hours_invested)
        )?;
        writeln!(f, "Unpaid hours        {} hrs/year", format_hours(d.total_unpaid_hours))?;
        writeln!(
            f,
            "Work costs          {}/year",
            format_currency(d.total_annual_work_costs, sym, false)
        )?;
        writeln!(
            f,
            "Adjusted take-home  {}",
            format_currency(d.adjusted_take_home_pay, sym, false)
        )?;

        writeln!(f)?;
        writeln!(f, "Waterfall")?;
        for point in &self.result.chart_data.waterfall_series {
            writeln!(
                f,
                "  {:<14} {:>12}  {:>12}",
                point.stage.label(),
                format_currency(point.value, sym, false),
                format_currency(point.cumulative, sym, false)
            )?;
        }

        writeln!(f)?;
        write!(f, "Weekly hours")?;
        for segment in &self.result.chart_data.hours_distribution {
            write!(
                f,
                "\n  {:<14} {:>6}  ({})",
                segment.segment.label(),
                format_hours(segment.hours),
                format_percent(segment.hours / HOURS_PER_WEEK * Decimal::ONE_HUNDRED)
            )?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

pub struct LoanReport<'a> {
    result: &'a LoanResult,
}

impl<'a> LoanReport<'a> {
    pub fn new(result: &'a LoanResult) -> Self {
        Self { result }
    }
}

impl fmt::Display for LoanReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let s = &self.result.summary;
        writeln!(f, "EMI                 {}", format_inr(s.emi))?;
        writeln!(f, "Total interest      {}", format_inr(s.total_interest))?;
        writeln!(f, "Total amount        {}", format_inr(s.total_amount))?;
        write!(f, "Tenure              {} months", s.actual_tenure_months)?;

        if s.total_prepayment > Decimal::ZERO {
            writeln!(f)?;
            writeln!(f, "Total prepayment    {}", format_inr(s.total_prepayment))?;
            writeln!(f, "Final EMI           {}", format_inr(s.final_emi))?;
            writeln!(f, "Interest saved      {}", format_inr(s.interest_saved))?;
            write!(f, "Months saved        {}", s.months_saved)?;
        }
        Ok(())
    }
}

pub struct MortgageReport<'a> {
    result: &'a MortgageResult,
    symbol: &'a str,
}

impl<'a> MortgageReport<'a> {
    pub fn new(
        result: &'a MortgageResult,
        symbol: &'a str,
    ) -> Self {
        Self { result, symbol }
    }
}

impl fmt::Display for MortgageReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = self.result;
        let money = |value| format_currency(value, self.symbol, false);

        writeln!(f, "Loan amount         {}", money(r.loan_amount))?;
        writeln!(f, "Down payment        {}", format_percent(r.down_payment_percentage))?;
        writeln!(f)?;
        writeln!(f, "Monthly payment")?;
        writeln!(f, "  Principal & int.  {}", money(r.monthly_principal_and_interest))?;
        writeln!(f, "  Property tax      {}", money(r.monthly_property_tax))?;
        writeln!(f, "  Home insurance    {}", money(r.monthly_home_insurance))?;
        writeln!(f, "  PMI               {}", money(r.monthly_pmi))?;
        writeln!(f, "  HOA               {}", money(r.monthly_hoa))?;
        writeln!(f, "  Total             {}", money(r.total_monthly_payment))?;
        writeln!(f)?;
        writeln!(f, "Total of payments   {}", money(r.total_payment))?;
        write!(f, "Total interest      {}", money(r.total_interest))
    }
}

// ---------------------------------------------------------------------------
// Growth
// ---------------------------------------------------------------------------

pub struct CompoundReport<'a> {
    result: &'a CompoundInterestResult,
    symbol: &'a str,
}

impl<'a> CompoundReport<'a> {
    pub fn new(
        result: &'a CompoundInterestResult,
        symbol: &'a str,
    ) -> Self {
        Self { result, symbol }
    }
}

impl fmt::Display for CompoundReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = self.result;
        let money = |value| format_currency(value, self.symbol, false);

        writeln!(f, "Final balance       {}", money(r.final_balance))?;
        writeln!(f, "Total contributed   {}", money(r.total_principal))?;
        writeln!(f, "Total interest      {}", money(r.total_interest))?;
        writeln!(f, "Real value          {}", money(r.real_value))?;
        writeln!(f)?;
        write!(f, "{:>4}  {:>14}  {:>14}  {:>14}", "Year", "Balance", "Interest", "Real value")?;
        for year in &r.yearly {
            write!(
                f,
                "\n{:>4}  {:>14}  {:>14}  {:>14}",
                year.year,
                money(year.balance),
                money(year.annual_interest),
                money(year.real_value)
            )?;
        }
        Ok(())
    }
}

/// An amount carried between two points in time, labelled by the caller
/// (`in 2000` and `in 2024`, or `today` and `in 10 years`).
pub struct InflationReport<'a> {
    amount: Decimal,
    result: &'a InflationResult,
    from: &'a str,
    to: &'a str,
    symbol: &'a str,
}

impl<'a> InflationReport<'a> {
    pub fn new(
        amount: Decimal,
        result: &'a InflationResult,
        (from, to): (&'a str, &'a str),
        symbol: &'a str,
    ) -> Self {
        Self {
            amount,
            result,
            from,
            to,
            symbol,
        }
    }
}

impl fmt::Display for InflationReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = self.result;
        writeln!(
            f,
            "{} {} is worth {} {}",
            format_hourly(self.amount, self.symbol),
            self.from,
            format_hourly(r.future_value, self.symbol),
            self.to
        )?;
        writeln!(f, "Change              {}", format_hourly(r.total_inflation, self.symbol))?;
        write!(f, "Cumulative          {}", format_percent(r.cumulative_rate))
    }
}

pub struct SipReport<'a> {
    result: &'a SipResult,
}

impl<'a> SipReport<'a> {
    pub fn new(result: &'a SipResult) -> Self {
        Self { result }
    }
}

impl fmt::Display for SipReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let r = self.result;
        if r.required_monthly_investment > Decimal::ZERO {
            writeln!(
                f,
                "Required SIP        {}/month",
                format_inr(r.required_monthly_investment)
            )?;
        }
        writeln!(f, "Estimated corpus    {}", format_inr(r.estimated_corpus))?;
        writeln!(f, "Total invested      {}", format_inr(r.total_invested))?;
        writeln!(f, "Wealth gained       {}", format_inr(r.wealth_gained))?;
        writeln!(f, "Purchasing power    {}", format_inr(r.purchasing_power))?;
        writeln!(f, "Final SIP           {}/month", format_inr(r.final_monthly_investment))?;
        writeln!(f, "XIRR                {}", format_percent(r.xirr))?;
        writeln!(f, "Absolute return     {}", format_percent(r.absolute_return))?;
        if r.goal_gap > Decimal::ZERO {
            writeln!(f, "Short of goal by    {}", format_inr(r.goal_gap))?;
        }
        writeln!(f, "Without step-up     {}", format_inr(r.flat_corpus))?;

        writeln!(f)?;
        write!(f, "Cost of delay")?;
        for delay in r.delay_costs.iter().filter(|d| d.delay_years > 0) {
            write!(
                f,
                "\n  {:>2} yr late  {:>12}  (-{})",
                delay.delay_years,
                format_inr_compact(delay.corpus),
                format_inr_compact(delay.loss)
            )?;
        }
        Ok(())
    }
}
