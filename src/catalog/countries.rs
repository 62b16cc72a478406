use std::collections::HashMap;

use serde::Serialize;

use crate::config::UnresolvedPolicy;
use crate::foundation::error::{GeodashError, GeodashResult};

/// A country as listed by the provider's directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Country {
    pub name: String,
    /// Provider identifier (ISO 3166-1 alpha-3 for the World Bank).
    pub id: String,
}

impl Country {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// Outcome of resolving a set of display names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Provider ids in selection order, deduplicated.
    pub ids: Vec<String>,
    /// Names with no directory entry.
    pub unresolved: Vec<String>,
}

/// Read-only name to id directory, loaded once per process.
#[derive(Clone, Debug, Default)]
pub struct CountryDirectory {
    countries: Vec<Country>,
    by_name: HashMap<String, usize>,
}

impl CountryDirectory {
    /// Build from the provider listing. Later duplicates of a name are ignored.
    pub fn from_countries(countries: Vec<Country>) -> Self {
        let mut kept = Vec::with_capacity(countries.len());
        let mut by_name = HashMap::with_capacity(countries.len());
        for c in countries {
            if by_name.contains_key(&c.name) {
                continue;
            }
            by_name.insert(c.name.clone(), kept.len());
            kept.push(c);
        }
        Self {
            countries: kept,
            by_name,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Country> {
        self.by_name.get(name).map(|&i| &self.countries[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.countries.iter()
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Map display names to provider ids under `policy`.
    pub fn resolve<S: AsRef<str>>(
        &self,
        names: &[S],
        policy: UnresolvedPolicy,
    ) -> GeodashResult<Resolution> {
        let mut out = Resolution::default();
        for name in names {
            let name = name.as_ref();
            match self.get(name) {
                Some(c) => {
                    if !out.ids.contains(&c.id) {
                        out.ids.push(c.id.clone());
                    }
                }
                None => out.unresolved.push(name.to_string()),
            }
        }

        if !out.unresolved.is_empty() {
            match policy {
                UnresolvedPolicy::Ignore => {}
                UnresolvedPolicy::Warn => {
                    tracing::warn!(unresolved = ?out.unresolved, "dropping unknown country names");
                }
                UnresolvedPolicy::Reject => {
                    return Err(GeodashError::validation(format!(
                        "unknown country names: {}",
                        out.unresolved.join(", ")
                    )));
                }
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/countries.rs"]
mod tests;
