use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::catalog::indicators::Indicator;
use crate::data::table::{MetricTable, ObservationRow};
use crate::foundation::core::{Year, YearRange};
use crate::foundation::error::{GeodashError, GeodashResult};
use crate::provider::{DataProvider, RawObservation};

/// Fetch one indicator and normalize it into a [`MetricTable`].
///
/// An empty table is a valid result; callers decide how to surface it.
#[tracing::instrument(skip(provider, country_ids), fields(code = %indicator.code))]
pub fn fetch_metric_table(
    provider: &dyn DataProvider,
    indicator: &Indicator,
    country_ids: &[String],
    years: YearRange,
) -> GeodashResult<MetricTable> {
    let raw = provider.series(&indicator.code, country_ids, years)?;
    let fetched = raw.len();
    let rows = normalize_rows(raw, years)?;
    tracing::info!(fetched, kept = rows.len(), "fetched series");
    MetricTable::new(indicator.clone(), rows)
}

/// Drop missing values and out-of-range years, derive the year, keep the first of any duplicate.
pub fn normalize_rows(
    raw: Vec<RawObservation>,
    years: YearRange,
) -> GeodashResult<Vec<ObservationRow>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());
    for obs in raw {
        let Some(value) = obs.value.filter(|v| v.is_finite()) else {
            continue;
        };
        let year = parse_year(&obs.date).ok_or_else(|| {
            GeodashError::provider(format!(
                "unparseable observation date '{}' for {}",
                obs.date, obs.country
            ))
        })?;
        if !years.contains(year) {
            continue;
        }
        if !seen.insert((obs.country_id.clone(), year)) {
            tracing::debug!(country = %obs.country, %year, "dropping duplicate observation");
            continue;
        }
        out.push(ObservationRow {
            country: obs.country,
            country_id: obs.country_id,
            year,
            value,
        });
    }
    Ok(out)
}

/// Year of a provider date label: `2001`, `2001-07-01`, `2001M07` or `2001Q3`.
pub fn parse_year(date: &str) -> Option<Year> {
    let date = date.trim();
    if let Ok(d) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(Year(d.year()));
    }

    let digits = date.chars().take_while(char::is_ascii_digit).count();
    if digits != 4 {
        return None;
    }
    let (year, rest) = date.split_at(4);
    let rest_ok = match rest.chars().next() {
        None => true,
        Some('M' | 'm' | 'Q' | 'q') => {
            rest.len() > 1 && rest[1..].chars().all(|c| c.is_ascii_digit())
        }
        Some(_) => false,
    };
    if !rest_ok {
        return None;
    }
    year.parse().ok().map(Year)
}

#[cfg(test)]
#[path = "../../tests/unit/data/fetch.rs"]
mod tests;
