use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::catalog::countries::Country;
use crate::config::Config;
use crate::foundation::core::YearRange;
use crate::foundation::error::{GeodashError, GeodashResult};
use crate::provider::{DataProvider, RawObservation};

const DEFAULT_PER_PAGE: u32 = 1000;

/// Blocking client for the World Bank v2 JSON API.
#[derive(Clone, Debug)]
pub struct WorldBankClient {
    client: reqwest::blocking::Client,
    base_url: String,
    per_page: u32,
}

impl WorldBankClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> GeodashResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("geodash/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            per_page: DEFAULT_PER_PAGE,
        })
    }

    pub fn from_config(cfg: &Config) -> GeodashResult<Self> {
        Self::new(
            cfg.api_base_url.clone(),
            Duration::from_secs(cfg.request_timeout_secs),
        )
    }

    /// Page size requested from the API.
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::blocking::Client {
        &self.client
    }

    /// GET every page of a `[meta, rows]` endpoint.
    fn get_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, String)],
    ) -> GeodashResult<Vec<T>> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut out = Vec::new();
        let mut page = 1u32;
        loop {
            tracing::debug!(%url, page, "provider request");
            let resp = self
                .client
                .get(&url)
                .query(&[
                    ("format", "json".to_string()),
                    ("per_page", self.per_page.to_string()),
                    ("page", page.to_string()),
                ])
                .query(extra)
                .send()?;

            let status = resp.status();
            if !status.is_success() {
                return Err(GeodashError::provider(format!(
                    "GET {url} returned HTTP {status}"
                )));
            }
            let body: serde_json::Value = resp.json().map_err(|e| {
                GeodashError::provider(format!("malformed response from {url}: {e}"))
            })?;

            let (meta, mut rows) = parse_page::<T>(body)
                .map_err(|e| GeodashError::provider(format!("{url}: {e}")))?;
            out.append(&mut rows);

            if page >= meta.pages {
                break;
            }
            page += 1;
        }
        Ok(out)
    }
}

impl DataProvider for WorldBankClient {
    fn country_directory(&self) -> GeodashResult<Vec<Country>> {
        let rows: Vec<CountryRow> = self.get_all_pages("country", &[])?;
        Ok(rows
            .into_iter()
            .map(|r| Country::new(r.name.trim(), r.id))
            .collect())
    }

    fn series(
        &self,
        code: &str,
        country_ids: &[String],
        years: YearRange,
    ) -> GeodashResult<Vec<RawObservation>> {
        if country_ids.is_empty() {
            return Err(GeodashError::validation(
                "series request needs at least one country id",
            ));
        }
        let path = format!("country/{}/indicator/{code}", country_ids.join(";"));
        let rows: Vec<SeriesRow> = self.get_all_pages(&path, &[("date", years.as_query())])?;
        Ok(rows
            .into_iter()
            .map(|r| {
                let country_id = match r.countryiso3code {
                    Some(id) if !id.is_empty() => id,
                    _ => r.country.id,
                };
                RawObservation {
                    country: r.country.value,
                    country_id,
                    date: r.date,
                    value: r.value,
                }
            })
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct PageMeta {
    #[serde(deserialize_with = "lenient_u32")]
    pages: u32,
}

#[derive(Debug, Deserialize)]
struct CountryRow {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct IdValue {
    id: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct SeriesRow {
    country: IdValue,
    countryiso3code: Option<String>,
    date: String,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    key: String,
    #[serde(default)]
    value: String,
}

/// Split a `[meta, rows]` body. A `null` rows slot is an empty page.
fn parse_page<T: DeserializeOwned>(body: serde_json::Value) -> Result<(PageMeta, Vec<T>), String> {
    let serde_json::Value::Array(mut parts) = body else {
        return Err("expected a JSON array".to_string());
    };

    if let Some(msg) = parts.first().and_then(api_error_message) {
        return Err(format!("api error: {msg}"));
    }
    if parts.len() != 2 {
        return Err(format!("expected [meta, rows], got {} elements", parts.len()));
    }

    let rows = parts.pop().unwrap_or(serde_json::Value::Null);
    let meta = parts.pop().unwrap_or(serde_json::Value::Null);
    let meta: PageMeta = serde_json::from_value(meta).map_err(|e| format!("bad page meta: {e}"))?;
    let rows: Option<Vec<T>> =
        serde_json::from_value(rows).map_err(|e| format!("bad rows: {e}"))?;
    Ok((meta, rows.unwrap_or_default()))
}

fn api_error_message(first: &serde_json::Value) -> Option<String> {
    let messages = first.get("message")?;
    let messages: Vec<ApiMessage> = serde_json::from_value(messages.clone()).ok()?;
    let text = messages
        .iter()
        .map(|m| match (m.key.is_empty(), m.value.is_empty()) {
            (false, false) => format!("{}: {}", m.key, m.value),
            (false, true) => m.key.clone(),
            _ => m.value.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ");
    Some(if text.is_empty() {
        "unspecified".to_string()
    } else {
        text
    })
}

/// The country endpoint reports paging numbers as strings, the indicator endpoint as numbers.
fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Num(u32),
        Str(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Num(n) => Ok(n),
        Repr::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/provider/worldbank.rs"]
mod tests;
