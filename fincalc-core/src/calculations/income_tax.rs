//! Indian income tax under the old and new regimes (FY 2025-26).
//!
//! # Computation Order
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Gross income (salary + interest + rental + other) |
//! | 2    | Deductions (standard if salaried; capped itemized in the old regime) |
//! | 3    | Taxable income (Step 1 - Step 2, minimum 0) |
//! | 4    | Slab tax from the regime's bracket schedule |
//! | 5    | Section 87A rebate, with marginal relief just above the new regime threshold |
//! | 6    | Surcharge on tax after rebate, with marginal relief at each threshold |
//! | 7    | Cess at 4% of (Step 4 - Step 5 + Step 6) |
//! | 8    | Total tax, take-home, effective and marginal rates, monthly figures |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::{Regime, TaxInputs, compute_regime_tax};
//!
//! let inputs = TaxInputs {
//!     annual_salary: dec!(1280000),
//!     section_80c: dec!(0),
//!     section_80d: dec!(0),
//!     ..TaxInputs::default()
//! };
//!
//! let breakdown = compute_regime_tax(&inputs, Regime::New);
//!
//! assert_eq!(breakdown.taxable_income, dec!(1205000));
//! assert_eq!(breakdown.raw_tax, dec!(60750));
//! // Tax owed is capped at the 5,000 earned above 12L, plus cess.
//! assert_eq!(breakdown.total_tax, dec!(5200));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::calculations::brackets::{BracketTax, compute_bracket_tax, marginal_rate};
use crate::calculations::common::{max, ratio_or_zero, round_rupee};
use crate::models::{
    IncomeTaxPoint, Recommendation, Regime, RegimeConfig, TaxBreakdown, TaxInputs, TaxResult,
};

/// Lowest upper end of the income sweep.
const SWEEP_FLOOR: Decimal = dec!(2500000);

/// Most intervals a sweep is split into before a coarser step is chosen.
const SWEEP_MAX_STEPS: Decimal = dec!(50);

const SWEEP_STEPS: [Decimal; 10] = [
    dec!(100000),
    dec!(250000),
    dec!(500000),
    dec!(1000000),
    dec!(2500000),
    dec!(5000000),
    dec!(10000000),
    dec!(25000000),
    dec!(50000000),
    dec!(100000000),
];

/// Computes the tax breakdown for one regime.
#[derive(Debug, Clone)]
pub struct RegimeCalculator<'a> {
    config: &'a RegimeConfig,
}

impl<'a> RegimeCalculator<'a> {
    pub fn new(config: &'a RegimeConfig) -> Self {
        Self { config }
    }

    /// Runs every step for `inputs` and returns the full breakdown.
    pub fn calculate(
        &self,
        inputs: &TaxInputs,
    ) -> TaxBreakdown {
        let gross_income = inputs.gross_income();
        let total_deductions = self.total_deductions(inputs);
        let taxable_income = self.taxable_income(gross_income, total_deductions);

        let BracketTax {
            tax: raw_tax,
            breakdown: slab_breakdown,
        } = compute_bracket_tax(taxable_income, &self.config.schedule);

        let rebate = self.rebate(taxable_income, raw_tax);
        let tax_after_rebate = raw_tax - rebate;
        let surcharge = self.surcharge(taxable_income, tax_after_rebate);

        let tax_before_cess = tax_after_rebate + surcharge;
        let cess = self.cess(tax_before_cess);
        let total_tax = tax_before_cess + cess;
        let take_home_income = gross_income - total_tax;

        debug!(
            regime = self.config.regime.as_str(),
            %taxable_income,
            %raw_tax,
            %rebate,
            %surcharge,
            %total_tax,
            "computed regime tax"
        );

        TaxBreakdown {
            regime: self.config.regime,
            gross_income,
            total_deductions,
            taxable_income,
            raw_tax,
            rebate,
            surcharge,
            tax_before_cess,
            cess,
            total_tax,
            take_home_income,
            effective_rate: ratio_or_zero(total_tax, gross_income),
            marginal_rate: marginal_rate(taxable_income, &self.config.schedule),
            monthly_tax: round_rupee(total_tax / dec!(12)),
            monthly_take_home: round_rupee(take_home_income / dec!(12)),
            slab_breakdown,
        }
    }

    /// Standard deduction for salaried filers plus capped itemized deductions
    /// where the regime allows them.
    fn total_deductions(
        &self,
        inputs: &TaxInputs,
    ) -> Decimal {
        let mut total = Decimal::ZERO;

        if inputs.is_salaried {
            total += self.config.standard_deduction;
        }

        if self.config.itemized_deductions_allowed {
            let caps = &self.config.deduction_caps;
            total += inputs.section_80c.min(caps.section_80c);
            total += inputs.section_80d.min(caps.section_80d);
            total += inputs.hra_exemption;
            total += inputs.home_loan_interest.min(caps.home_loan_interest);
            total += inputs.nps_80ccd_1b.min(caps.nps_80ccd_1b);
            total += inputs.other_deductions;
        }

        total
    }

    fn taxable_income(
        &self,
        gross_income: Decimal,
        total_deductions: Decimal,
    ) -> Decimal {
        max(gross_income - total_deductions, Decimal::ZERO)
    }

    /// Section 87A rebate.
    ///
    /// At or below the threshold the rebate is the slab tax up to the ceiling.
    /// Inside the marginal relief band, tax owed may not exceed the income
    /// earned above the threshold.
    fn rebate(
        &self,
        taxable_income: Decimal,
        raw_tax: Decimal,
    ) -> Decimal {
        let rule = &self.config.rebate;

        if taxable_income <= rule.threshold {
            return raw_tax.min(rule.ceiling);
        }

        match rule.marginal_relief_limit {
            Some(limit) if taxable_income <= limit => {
                let excess = taxable_income - rule.threshold;
                if raw_tax > excess {
                    raw_tax - excess
                } else {
                    Decimal::ZERO
                }
            }
            _ => Decimal::ZERO,
        }
    }

    /// Surcharge on tax after rebate, capped by marginal relief.
    ///
    /// Only the outermost threshold exceeded is considered: tax plus surcharge
    /// may not exceed the same figure computed at that threshold plus the
    /// income above it.
    fn surcharge(
        &self,
        taxable_income: Decimal,
        tax_after_rebate: Decimal,
    ) -> Decimal {
        let Some(band) = self
            .config
            .surcharge_bands
            .iter()
            .rev()
            .find(|b| taxable_income > b.threshold)
        else {
            return Decimal::ZERO;
        };

        let surcharge = tax_after_rebate * band.rate;
        let ceiling =
            self.tax_through_surcharge(band.threshold) + (taxable_income - band.threshold);

        if tax_after_rebate + surcharge > ceiling {
            let relieved = max(ceiling - tax_after_rebate, Decimal::ZERO);
            debug!(
                threshold = %band.threshold,
                %surcharge,
                %relieved,
                "surcharge marginal relief applied"
            );
            relieved
        } else {
            surcharge
        }
    }

    /// Slab tax less rebate plus surcharge at a given taxable income.
    ///
    /// Thresholds strictly decrease on each recursive call through
    /// `surcharge`, so the recursion ends once no band is exceeded.
    fn tax_through_surcharge(
        &self,
        taxable_income: Decimal,
    ) -> Decimal {
        let raw_tax = compute_bracket_tax(taxable_income, &self.config.schedule).tax;
        let tax_after_rebate = raw_tax - self.rebate(taxable_income, raw_tax);
        tax_after_rebate + self.surcharge(taxable_income, tax_after_rebate)
    }

    fn cess(
        &self,
        tax_before_cess: Decimal,
    ) -> Decimal {
        tax_before_cess * self.config.cess_rate
    }
}

/// Both regimes under an explicit configuration.
///
/// `Default` uses the FY 2025-26 rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeTaxCalculator {
    old_regime: RegimeConfig,
    new_regime: RegimeConfig,
}

impl IncomeTaxCalculator {
    pub fn new(
        old_regime: RegimeConfig,
        new_regime: RegimeConfig,
    ) -> Self {
        Self {
            old_regime,
            new_regime,
        }
    }

    pub fn config(
        &self,
        regime: Regime,
    ) -> &RegimeConfig {
        match regime {
            Regime::Old => &self.old_regime,
            Regime::New => &self.new_regime,
        }
    }

    pub fn compute_regime_tax(
        &self,
        inputs: &TaxInputs,
        regime: Regime,
    ) -> TaxBreakdown {
        RegimeCalculator::new(self.config(regime)).calculate(inputs)
    }

    /// Computes both regimes, the recommendation and the income curve.
    pub fn calculate(
        &self,
        inputs: &TaxInputs,
    ) -> TaxResult {
        let old_regime = self.compute_regime_tax(inputs, Regime::Old);
        let new_regime = self.compute_regime_tax(inputs, Regime::New);
        let Recommendation {
            recommended,
            savings,
        } = recommend_regime(&old_regime, &new_regime);

        TaxResult {
            old_regime,
            new_regime,
            recommended_regime: recommended,
            savings,
            income_wise_tax: self.income_wise_series(inputs),
        }
    }

    /// Total tax in both regimes across a range of salaries.
    ///
    /// The sweep runs from zero to twice the current salary (at least 25L),
    /// holding deductions fixed and other income at zero. The upper end is
    /// always the last point.
    pub fn income_wise_series(
        &self,
        inputs: &TaxInputs,
    ) -> Vec<IncomeTaxPoint> {
        let upper = max(inputs.annual_salary * Decimal::TWO, SWEEP_FLOOR);
        let step = sweep_step(upper);

        let old_calc = RegimeCalculator::new(&self.old_regime);
        let new_calc = RegimeCalculator::new(&self.new_regime);
        let point = |income: Decimal| {
            let swept = inputs.with_salary_only(income);
            IncomeTaxPoint {
                income,
                old_tax: old_calc.calculate(&swept).total_tax,
                new_tax: new_calc.calculate(&swept).total_tax,
            }
        };

        let mut points = Vec::new();
        let mut income = Decimal::ZERO;
        while income < upper {
            points.push(point(income));
            income += step;
        }
        points.push(point(upper));

        points
    }
}

impl Default for IncomeTaxCalculator {
    fn default() -> Self {
        Self::new(RegimeConfig::old_regime(), RegimeConfig::new_regime())
    }
}

/// Picks the coarsest-needed step from a fixed ladder so the sweep stays
/// within [`SWEEP_MAX_STEPS`] intervals.
fn sweep_step(upper: Decimal) -> Decimal {
    SWEEP_STEPS
        .iter()
        .copied()
        .find(|step| upper / *step <= SWEEP_MAX_STEPS)
        .unwrap_or_else(|| {
            let largest = SWEEP_STEPS[SWEEP_STEPS.len() - 1];
            (upper / SWEEP_MAX_STEPS / largest).ceil() * largest
        })
}

/// Computes one regime under the FY 2025-26 rules.
pub fn compute_regime_tax(
    inputs: &TaxInputs,
    regime: Regime,
) -> TaxBreakdown {
    let config = RegimeConfig::for_regime(regime);
    RegimeCalculator::new(&config).calculate(inputs)
}

/// Recommends the regime with the lower total tax. The new regime wins ties.
pub fn recommend_regime(
    old_regime: &TaxBreakdown,
    new_regime: &TaxBreakdown,
) -> Recommendation {
    let recommended = if new_regime.total_tax <= old_regime.total_tax {
        Regime::New
    } else {
        Regime::Old
    };

    Recommendation {
        recommended,
        savings: (old_regime.total_tax - new_regime.total_tax).abs(),
    }
}

/// Income curve under the FY 2025-26 rules.
pub fn income_wise_series(inputs: &TaxInputs) -> Vec<IncomeTaxPoint> {
    IncomeTaxCalculator::default().income_wise_series(inputs)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn salaried(annual_salary: Decimal) -> TaxInputs {
        TaxInputs {
            annual_salary,
            section_80c: Decimal::ZERO,
            section_80d: Decimal::ZERO,
            ..TaxInputs::default()
        }
    }

    fn old_config() -> RegimeConfig {
        RegimeConfig::old_regime()
    }

    fn new_config() -> RegimeConfig {
        RegimeConfig::new_regime()
    }

    // =========================================================================
    // total_deductions tests
    // =========================================================================

    #[test]
    fn total_deductions_old_regime_applies_caps() {
        let config = old_config();
        let calc = RegimeCalculator::new(&config);
        let inputs = TaxInputs {
            section_80c: dec!(200000),
            section_80d: dec!(150000),
            hra_exemption: dec!(120000),
            home_loan_interest: dec!(250000),
            nps_80ccd_1b: dec!(80000),
            other_deductions: dec!(10000),
            ..TaxInputs::default()
        };

        let result = calc.total_deductions(&inputs);

        // 50k + 1.5L + 1L + 1.2L + 2L + 50k + 10k
        assert_eq!(result, dec!(680000));
    }

    #[test]
    fn total_deductions_old_regime_business_has_no_standard_deduction() {
        let config = old_config();
        let calc = RegimeCalculator::new(&config);
        let inputs = TaxInputs {
            is_salaried: false,
            ..TaxInputs::default()
        };

        let result = calc.total_deductions(&inputs);

        assert_eq!(result, dec!(175000));
    }

    #[test]
    fn total_deductions_new_regime_ignores_itemized() {
        let config = new_config();
        let calc = RegimeCalculator::new(&config);
        let inputs = TaxInputs {
            hra_exemption: dec!(300000),
            ..TaxInputs::default()
        };

        let result = calc.total_deductions(&inputs);

        assert_eq!(result, dec!(75000));
    }

    // =========================================================================
    // taxable_income tests
    // =========================================================================

    #[test]
    fn taxable_income_returns_zero_when_deductions_exceed_gross() {
        let config = old_config();
        let calc = RegimeCalculator::new(&config);

        let result = calc.taxable_income(dec!(40000), dec!(50000));

        assert_eq!(result, Decimal::ZERO);
    }

    // =========================================================================
    // rebate tests
    // =========================================================================

    #[test]
    fn rebate_old_regime_covers_tax_at_threshold() {
        let config = old_config();
        let calc = RegimeCalculator::new(&config);

        assert_eq!(calc.rebate(dec!(500000), dec!(12500)), dec!(12500));
    }

    #[test]
    fn rebate_old_regime_none_above_threshold() {
        let config = old_config();
        let calc = RegimeCalculator::new(&config);

        assert_eq!(calc.rebate(dec!(500001), dec!(12500.20)), Decimal::ZERO);
    }

    #[test]
    fn rebate_never_exceeds_raw_tax() {
        let config = new_config();
        let calc = RegimeCalculator::new(&config);

        assert_eq!(calc.rebate(dec!(600000), dec!(10000)), dec!(10000));
    }

    #[test]
    fn rebate_new_regime_marginal_relief_inside_band() {
        let config = new_config();
        let calc = RegimeCalculator::new(&config);

        // Excess over 12L is 5,000, so 55,750 of the 60,750 is rebated.
        assert_eq!(calc.rebate(dec!(1205000), dec!(60750)), dec!(55750));
    }

    #[test]
    fn rebate_new_regime_band_exits_when_tax_below_excess() {
        let config = new_config();
        let calc = RegimeCalculator::new(&config);

        // Raw tax 71,250 at 12.75L is below the 75,000 excess.
        assert_eq!(calc.rebate(dec!(1275000), dec!(71250)), Decimal::ZERO);
    }

    #[test]
    fn rebate_new_regime_none_above_band() {
        let config = new_config();
        let calc = RegimeCalculator::new(&config);

        assert_eq!(calc.rebate(dec!(1275001), dec!(71250.15)), Decimal::ZERO);
    }

    // =========================================================================
    // surcharge tests
    // =========================================================================

    #[test]
    fn surcharge_zero_at_threshold() {
        let config = old_config();
        let calc = RegimeCalculator::new(&config);

        assert_eq!(calc.surcharge(dec!(5000000), dec!(1312500)), Decimal::ZERO);
    }

    #[test]
    fn surcharge_marginal_relief_just_above_50_lakh() {
        let config = old_config();
        let calc = RegimeCalculator::new(&config);

        // Tax at 50L is 13,12,500; 10,000 over may add at most 10,000 in total.
        let result = calc.surcharge(dec!(5010000), dec!(1315500));

        assert_eq!(result, dec!(7000));
    }

    #[test]
    fn surcharge_full_rate_once_relief_no_longer_binds() {
        let config = old_config();
        let calc = RegimeCalculator::new(&config);

        let result = calc.surcharge(dec!(6000000), dec!(1612500));

        assert_eq!(result, dec!(161250));
    }

    #[test]
    fn surcharge_marginal_relief_just_above_1_crore_uses_lower_tier_reference() {
        let config = old_config();
        let calc = RegimeCalculator::new(&config);

        // Reference at 1Cr: 28,12,500 + 10% surcharge = 30,93,750.
        let result = calc.surcharge(dec!(10010000), dec!(2815500));

        assert_eq!(result, dec!(288250));
    }

    #[test]
    fn surcharge_top_band_differs_by_regime() {
        let old = old_config();
        let new = new_config();

        let old_result = RegimeCalculator::new(&old).surcharge(dec!(100000000), dec!(1000000));
        let new_result = RegimeCalculator::new(&new).surcharge(dec!(100000000), dec!(1000000));

        assert_eq!(old_result, dec!(370000));
        assert_eq!(new_result, dec!(250000));
    }

    // =========================================================================
    // calculate tests
    // =========================================================================

    #[test]
    fn calculate_default_inputs_old_regime() {
        let config = old_config();

        let result = RegimeCalculator::new(&config).calculate(&TaxInputs::default());

        // 15L - (50k + 1.5L + 25k) = 12.75L
        assert_eq!(result.taxable_income, dec!(1275000));
        // 1,12,500 + 2,75,000 at 30%
        assert_eq!(result.raw_tax, dec!(195000));
        assert_eq!(result.cess, dec!(7800));
        assert_eq!(result.total_tax, dec!(202800));
        assert_eq!(result.take_home_income, dec!(1297200));
        assert_eq!(result.monthly_tax, dec!(16900));
        assert_eq!(result.monthly_take_home, dec!(108100));
        assert_eq!(result.marginal_rate, dec!(0.30));
    }

    #[test]
    fn calculate_default_inputs_new_regime() {
        let config = new_config();

        let result = RegimeCalculator::new(&config).calculate(&TaxInputs::default());

        assert_eq!(result.taxable_income, dec!(1425000));
        assert_eq!(result.raw_tax, dec!(93750));
        assert_eq!(result.rebate, Decimal::ZERO);
        assert_eq!(result.total_tax, dec!(97500));
        assert_eq!(result.effective_rate, dec!(0.065));
    }

    #[test]
    fn calculate_zero_income_has_zero_rates() {
        let config = new_config();

        let result = RegimeCalculator::new(&config).calculate(&salaried(Decimal::ZERO));

        assert_eq!(result.total_tax, Decimal::ZERO);
        assert_eq!(result.effective_rate, Decimal::ZERO);
        assert_eq!(result.take_home_income, Decimal::ZERO);
    }

    #[test]
    fn calculate_new_regime_surcharge_relief_above_50_lakh() {
        let config = new_config();
        let inputs = TaxInputs {
            is_salaried: false,
            ..salaried(dec!(5010000))
        };

        let result = RegimeCalculator::new(&config).calculate(&inputs);

        assert_eq!(result.raw_tax, dec!(1083000));
        assert_eq!(result.surcharge, dec!(7000));
        assert_eq!(result.tax_before_cess, dec!(1090000));
        assert_eq!(result.total_tax, dec!(1133600));
    }

    // =========================================================================
    // recommend_regime tests
    // =========================================================================

    #[test]
    fn recommend_regime_picks_cheaper_old() {
        let mut old = compute_regime_tax(&TaxInputs::default(), Regime::Old);
        let new = compute_regime_tax(&TaxInputs::default(), Regime::New);
        old.total_tax = dec!(50000);

        let result = recommend_regime(&old, &new);

        assert_eq!(result.recommended, Regime::Old);
        assert_eq!(result.savings, dec!(47500));
    }

    #[test]
    fn recommend_regime_new_wins_ties() {
        let old = compute_regime_tax(&salaried(dec!(300000)), Regime::Old);
        let new = compute_regime_tax(&salaried(dec!(300000)), Regime::New);

        let result = recommend_regime(&old, &new);

        assert_eq!(result.recommended, Regime::New);
        assert_eq!(result.savings, Decimal::ZERO);
    }

    // =========================================================================
    // income_wise_series tests
    // =========================================================================

    #[test]
    fn sweep_step_uses_one_lakh_for_small_ranges() {
        assert_eq!(sweep_step(dec!(2500000)), dec!(100000));
        assert_eq!(sweep_step(dec!(5000000)), dec!(100000));
    }

    #[test]
    fn sweep_step_coarsens_for_large_ranges() {
        assert_eq!(sweep_step(dec!(5000001)), dec!(250000));
        assert_eq!(sweep_step(dec!(200000000)), dec!(5000000));
    }

    #[test]
    fn sweep_step_beyond_ladder_rounds_to_ten_crore_multiple() {
        assert_eq!(sweep_step(dec!(20000000000)), dec!(400000000));
    }

    #[test]
    fn income_wise_series_uses_floor_for_small_salaries() {
        let series = income_wise_series(&salaried(dec!(600000)));

        assert_eq!(series.len(), 26);
        assert_eq!(series[0].income, Decimal::ZERO);
        assert_eq!(series[25].income, dec!(2500000));
    }

    #[test]
    fn income_wise_series_ends_at_twice_salary() {
        let series = income_wise_series(&salaried(dec!(1530000)));

        let last = series.last().unwrap();
        assert_eq!(last.income, dec!(3060000));
        // 0, 1L, ..., 30L, then the 30.6L end point
        assert_eq!(series.len(), 32);
    }

    #[test]
    fn income_wise_series_ignores_other_income() {
        let inputs = TaxInputs {
            rental_income: dec!(900000),
            ..salaried(dec!(1000000))
        };

        let series = income_wise_series(&inputs);

        let at_ten_lakh = series.iter().find(|p| p.income == dec!(1000000)).unwrap();
        assert_eq!(
            at_ten_lakh.new_tax,
            compute_regime_tax(&salaried(dec!(1000000)), Regime::New).total_tax
        );
    }

    #[test]
    fn income_wise_series_points_match_full_calculation() {
        let inputs = TaxInputs {
            hra_exemption: dec!(120000),
            interest_income: dec!(40000),
            ..TaxInputs::default()
        };

        let series = income_wise_series(&inputs);

        for point in &series {
            let swept = inputs.with_salary_only(point.income);
            assert_eq!(
                point.old_tax,
                compute_regime_tax(&swept, Regime::Old).total_tax,
                "old regime at {}",
                point.income
            );
            assert_eq!(
                point.new_tax,
                compute_regime_tax(&swept, Regime::New).total_tax,
                "new regime at {}",
                point.income
            );
        }
    }

    // =========================================================================
    // IncomeTaxCalculator tests
    // =========================================================================

    #[test]
    fn calculator_calculate_recommends_new_for_defaults() {
        let result = IncomeTaxCalculator::default().calculate(&TaxInputs::default());

        assert_eq!(result.recommended_regime, Regime::New);
        assert_eq!(result.savings, dec!(105300));
        assert_eq!(result.recommended().total_tax, dec!(97500));
        assert!(!result.income_wise_tax.is_empty());
    }

    #[test]
    fn calculator_honours_custom_config() {
        let mut new_regime = new_config();
        new_regime.standard_deduction = Decimal::ZERO;
        let calculator = IncomeTaxCalculator::new(old_config(), new_regime);

        let result = calculator.compute_regime_tax(&salaried(dec!(1275000)), Regime::New);

        // Without the standard deduction 12.75L sits at the edge of the relief band.
        assert_eq!(result.taxable_income, dec!(1275000));
        assert_eq!(result.rebate, Decimal::ZERO);
    }
}
