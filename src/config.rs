//! Runtime configuration.
//!
//! Every field has a default, so a missing config file and an empty JSON object behave the same.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::foundation::core::{Canvas, YearRange};
use crate::foundation::error::{GeodashError, GeodashResult};

/// Public World Bank v2 API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.worldbank.org/v2";

/// Natural Earth 1:110m admin-0 countries.
pub const DEFAULT_BOUNDARIES: &str = "https://raw.githubusercontent.com/nvkelso/natural-earth-vector/master/geojson/ne_110m_admin_0_countries.geojson";

/// What to do with selected country names the directory does not know.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedPolicy {
    /// Drop them without a trace.
    #[default]
    Ignore,
    /// Drop them and log a warning.
    Warn,
    /// Fail the whole run.
    Reject,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// GeoJSON file path or http(s) URL.
    pub boundaries: String,
    pub boundary_id_property: String,
    pub boundary_name_property: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub canvas: Canvas,
    /// Parent for per-run scratch directories; the system temp dir when unset.
    pub scratch_root: Option<PathBuf>,
    pub unresolved_countries: UnresolvedPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            boundaries: DEFAULT_BOUNDARIES.to_string(),
            boundary_id_property: "ADM0_A3".to_string(),
            boundary_name_property: "NAME".to_string(),
            start_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            canvas: Canvas::default(),
            scratch_root: None,
            unresolved_countries: UnresolvedPolicy::default(),
        }
    }
}

impl Config {
    /// Read and validate a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> GeodashResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Config = serde_json::from_str(&text)
            .map_err(|e| GeodashError::validation(format!("parse config '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> GeodashResult<()> {
        if self.api_base_url.trim().is_empty() {
            return Err(GeodashError::validation("api_base_url must not be empty"));
        }
        if self.boundaries.trim().is_empty() {
            return Err(GeodashError::validation("boundaries must not be empty"));
        }
        if self.start_date > self.end_date {
            return Err(GeodashError::validation(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }
        self.canvas.validate()
    }

    /// Inclusive year range covered by the configured dates.
    pub fn years(&self) -> GeodashResult<YearRange> {
        YearRange::from_dates(self.start_date, self.end_date)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
