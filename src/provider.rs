//! Upstream statistical data provider.

pub mod worldbank;

use crate::catalog::countries::Country;
use crate::foundation::core::YearRange;
use crate::foundation::error::GeodashResult;

/// One row as the provider returns it, before normalization.
#[derive(Clone, Debug, PartialEq)]
pub struct RawObservation {
    pub country: String,
    pub country_id: String,
    /// Provider date label, e.g. `2001`, `2001Q3` or `2001-07-01`.
    pub date: String,
    pub value: Option<f64>,
}

/// Read-only query interface of the data provider.
///
/// Calls are synchronous and attempted once; callers decide what a failure means.
pub trait DataProvider {
    /// Full country listing.
    fn country_directory(&self) -> GeodashResult<Vec<Country>>;

    /// Time series of `code` for `country_ids` within `years`.
    fn series(
        &self,
        code: &str,
        country_ids: &[String],
        years: YearRange,
    ) -> GeodashResult<Vec<RawObservation>>;
}
