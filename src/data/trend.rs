use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::table::MetricTable;
use crate::foundation::core::Year;

/// Year-by-country pivot of a [`MetricTable`], one series per country.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrendView {
    pub years: Vec<Year>,
    /// Country name to values aligned with `years`; `None` where a year is missing.
    pub series: BTreeMap<String, Vec<Option<f64>>>,
}

impl TrendView {
    pub fn pivot(table: &MetricTable) -> Self {
        let years = table.years();
        let index: BTreeMap<Year, usize> = years.iter().enumerate().map(|(i, y)| (*y, i)).collect();

        let mut series: BTreeMap<String, Vec<Option<f64>>> = BTreeMap::new();
        for row in table.rows() {
            let slot = series
                .entry(row.country.clone())
                .or_insert_with(|| vec![None; years.len()]);
            if let Some(&i) = index.get(&row.year) {
                slot[i] = Some(row.value);
            }
        }

        Self { years, series }
    }

    pub fn value(&self, country: &str, year: Year) -> Option<f64> {
        let i = self.years.iter().position(|y| *y == year)?;
        self.series.get(country)?.get(i).copied().flatten()
    }
}
