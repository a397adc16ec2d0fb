//! End-to-end checks of the real hourly wage model through the public API.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use fincalc_core::{WageError, WageInputs, WaterfallStage, compute_real_hourly_wage};

#[test]
fn zero_hours_reports_error_and_zero_metrics() {
    let inputs = WageInputs {
        hours_per_week: Decimal::ZERO,
        ..WageInputs::default()
    };

    let result = compute_real_hourly_wage(&inputs);

    assert_eq!(result.error, Some(WageError::NonPositiveHours));
    let metrics = &result.summary_metrics;
    assert_eq!(metrics.nominal_wage, Decimal::ZERO);
    assert_eq!(metrics.real_wage, Decimal::ZERO);
    assert_eq!(metrics.erosion_percentage, Decimal::ZERO);
    assert_eq!(metrics.remote_equivalent, Decimal::ZERO);
}

#[test]
fn repeated_calls_are_identical() {
    let inputs = WageInputs::default();

    let first = compute_real_hourly_wage(&inputs);
    let second = compute_real_hourly_wage(&inputs);

    assert_eq!(first, second);
    assert_eq!(
        first.summary_metrics.real_wage.serialize(),
        second.summary_metrics.real_wage.serialize()
    );
}

#[test]
fn more_unpaid_overtime_lowers_real_wage() {
    let mut previous: Option<Decimal> = None;

    for overtime in [0, 1, 5, 10, 20] {
        let inputs = WageInputs {
            unpaid_overtime_weekly: Decimal::from(overtime),
            ..WageInputs::default()
        };
        let result = compute_real_hourly_wage(&inputs);
        assert!(result.summary_metrics.nominal_wage > Decimal::ZERO);

        let real = result.summary_metrics.real_wage;
        if let Some(prev) = previous {
            assert!(real < prev, "overtime {overtime}: {real} !< {prev}");
        }
        previous = Some(real);
    }
}

#[test]
fn remote_toggle_ignores_commute_and_food_inputs() {
    let baseline = WageInputs {
        is_remote: true,
        commute_daily_minutes: Decimal::ZERO,
        commute_cost_monthly: Decimal::ZERO,
        food_coffee_monthly: Decimal::ZERO,
        ..WageInputs::default()
    };
    let noisy = WageInputs {
        is_remote: true,
        commute_daily_minutes: dec!(180),
        commute_cost_monthly: dec!(900),
        food_coffee_monthly: dec!(650),
        ..WageInputs::default()
    };

    assert_eq!(
        compute_real_hourly_wage(&baseline),
        compute_real_hourly_wage(&noisy)
    );
}

#[test]
fn remote_work_raises_real_wage() {
    let on_site = compute_real_hourly_wage(&WageInputs::default());
    let remote = compute_real_hourly_wage(&WageInputs {
        is_remote: true,
        ..WageInputs::default()
    });

    assert!(remote.summary_metrics.real_wage > on_site.summary_metrics.real_wage);
}

#[test]
fn real_wage_below_nominal_at_default_overheads() {
    for salary in [dec!(20000), dec!(75000), dec!(250000)] {
        let result = compute_real_hourly_wage(&WageInputs {
            gross_annual_salary: salary,
            ..WageInputs::default()
        });

        assert!(result.summary_metrics.real_wage <= result.summary_metrics.nominal_wage);
        assert!(result.summary_metrics.erosion_percentage >= Decimal::ZERO);
    }
}

#[test]
fn long_vacation_without_overheads_lifts_real_above_nominal() {
    // Nominal hours assume 52 paid weeks; real hours only count working weeks.
    let result = compute_real_hourly_wage(&WageInputs {
        vacation_weeks: dec!(10),
        commute_daily_minutes: Decimal::ZERO,
        prep_daily_minutes: Decimal::ZERO,
        decompression_daily_minutes: Decimal::ZERO,
        unpaid_overtime_weekly: Decimal::ZERO,
        commute_cost_monthly: Decimal::ZERO,
        food_coffee_monthly: Decimal::ZERO,
        professional_upkeep_annual: Decimal::ZERO,
        misc_monthly_costs: Decimal::ZERO,
        ..WageInputs::default()
    });

    let metrics = &result.summary_metrics;
    // 56,250 net over 2,080 and 1,680 hours
    assert_eq!(metrics.nominal_wage.round_dp(2), dec!(27.04));
    assert_eq!(metrics.real_wage.round_dp(2), dec!(33.48));
    assert!(metrics.erosion_percentage < Decimal::ZERO);
}

#[test]
fn waterfall_ends_at_adjusted_net_income() {
    let result = compute_real_hourly_wage(&WageInputs::default());

    let last = result.chart_data.waterfall_series.last().unwrap();
    assert_eq!(last.stage, WaterfallStage::RealIncome);
    assert_eq!(
        last.cumulative,
        result.detailed_breakdown.adjusted_take_home_pay
    );
}
