use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::catalog::indicators::Indicator;
use crate::foundation::core::Year;
use crate::foundation::error::{GeodashError, GeodashResult};

/// One observation of one country in one year.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ObservationRow {
    #[serde(rename = "Country")]
    pub country: String,
    pub country_id: String,
    #[serde(rename = "Year")]
    pub year: Year,
    pub value: f64,
}

/// Normalized observations of a single indicator.
///
/// Rows keep provider order. `(country_id, year)` pairs are unique and values are finite.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MetricTable {
    indicator: Indicator,
    rows: Vec<ObservationRow>,
}

impl MetricTable {
    pub fn new(indicator: Indicator, rows: Vec<ObservationRow>) -> GeodashResult<Self> {
        let mut seen = HashSet::with_capacity(rows.len());
        for r in &rows {
            if !r.value.is_finite() {
                return Err(GeodashError::validation(format!(
                    "non-finite value for {} in {}",
                    r.country, r.year
                )));
            }
            if !seen.insert((r.country_id.as_str(), r.year)) {
                return Err(GeodashError::validation(format!(
                    "duplicate observation for {} in {}",
                    r.country, r.year
                )));
            }
        }
        Ok(Self { indicator, rows })
    }

    pub fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    pub fn rows(&self) -> &[ObservationRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<Year> {
        let set: BTreeSet<Year> = self.rows.iter().map(|r| r.year).collect();
        set.into_iter().collect()
    }

    /// Distinct country names, sorted.
    pub fn countries(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.rows.iter().map(|r| r.country.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    pub fn slice_for_year(&self, year: Year) -> Vec<&ObservationRow> {
        self.rows.iter().filter(|r| r.year == year).collect()
    }

    /// `(min, max)` over every value, `None` for an empty table.
    pub fn value_domain(&self) -> Option<(f64, f64)> {
        self.rows.iter().map(|r| r.value).fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Quantile with linear interpolation between closest ranks.
    pub fn quantile(&self, q: f64) -> Option<f64> {
        if self.rows.is_empty() || !(0.0..=1.0).contains(&q) {
            return None;
        }
        let mut values: Vec<f64> = self.rows.iter().map(|r| r.value).collect();
        values.sort_by(f64::total_cmp);

        let pos = q * (values.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        Some(values[lo] + (values[hi] - values[lo]) * (pos - lo as f64))
    }

    /// Every `(country, year)` pair present.
    pub fn coverage(&self) -> BTreeSet<(String, Year)> {
        self.rows
            .iter()
            .map(|r| (r.country.clone(), r.year))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/data/table.rs"]
mod tests;
