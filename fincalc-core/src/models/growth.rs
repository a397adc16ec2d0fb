use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// A lump sum plus monthly contributions growing at a fixed annual rate.
///
/// Rates are percentages. Interest is credited monthly at `annual_rate / 12`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompoundInterestInputs {
    pub initial_principal: Decimal,
    pub monthly_contribution: Decimal,
    pub annual_rate: Decimal,
    pub years: u32,
    /// Used only to deflate balances into today's money.
    pub inflation_rate: Decimal,
}

impl Default for CompoundInterestInputs {
    fn default() -> Self {
        Self {
            initial_principal: dec!(100000),
            monthly_contribution: dec!(10000),
            annual_rate: dec!(10),
            years: 20,
            inflation_rate: dec!(6),
        }
    }
}

/// Balances at the end of `year`; year 0 is the opening deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundYear {
    pub year: u32,
    pub balance: Decimal,
    pub total_principal: Decimal,
    pub total_interest: Decimal,
    pub annual_interest: Decimal,
    pub real_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundInterestResult {
    pub final_balance: Decimal,
    pub total_principal: Decimal,
    pub total_interest: Decimal,
    pub real_value: Decimal,
    pub yearly: Vec<CompoundYear>,
}

/// Average annual consumer price index by year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpiTable {
    values: BTreeMap<i32, Decimal>,
}

impl CpiTable {
    pub fn new(values: BTreeMap<i32, Decimal>) -> Self {
        Self { values }
    }

    pub fn get(
        &self,
        year: i32,
    ) -> Option<Decimal> {
        self.values.get(&year).copied()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.values.keys().copied()
    }

    /// US CPI-U annual averages (BLS). Decades only before 2000; the last
    /// two years are estimates.
    pub fn us() -> Self {
        let values = [
            (1913, dec!(9.9)),
            (1920, dec!(20.0)),
            (1930, dec!(16.7)),
            (1940, dec!(14.0)),
            (1950, dec!(24.1)),
            (1960, dec!(29.6)),
            (1970, dec!(38.8)),
            (1980, dec!(82.4)),
            (1990, dec!(130.7)),
            (2000, dec!(172.2)),
            (2001, dec!(177.1)),
            (2002, dec!(179.9)),
            (2003, dec!(184.0)),
            (2004, dec!(188.9)),
            (2005, dec!(195.3)),
            (2006, dec!(201.6)),
            (2007, dec!(207.3)),
            (2008, dec!(215.3)),
            (2009, dec!(214.5)),
            (2010, dec!(218.056)),
            (2011, dec!(224.939)),
            (2012, dec!(229.594)),
            (2013, dec!(232.957)),
            (2014, dec!(236.736)),
            (2015, dec!(237.017)),
            (2016, dec!(240.007)),
            (2017, dec!(245.120)),
            (2018, dec!(251.107)),
            (2019, dec!(255.657)),
            (2020, dec!(258.811)),
            (2021, dec!(270.970)),
            (2022, dec!(292.655)),
            (2023, dec!(304.702)),
            (2024, dec!(313.2)),
            (2025, dec!(320.1)),
            (2026, dec!(322.6)),
        ];
        Self::new(values.into_iter().collect())
    }
}

/// Value of an amount moved between two CPI years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InflationResult {
    pub future_value: Decimal,
    pub total_inflation: Decimal,
    /// Percentage change in the index between the two years.
    pub cumulative_rate: Decimal,
}
