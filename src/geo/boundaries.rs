use std::collections::HashMap;
use std::path::Path;

use anyhow::Context as _;
use geojson::GeoJson;
use kurbo::Point;

use crate::foundation::error::{GeodashError, GeodashResult};

/// Closed ring of `(lon, lat)` points in degrees.
pub type Ring = Vec<Point>;

/// Outer ring followed by holes.
pub type Polygon = Vec<Ring>;

/// Outline of one country.
#[derive(Clone, Debug, PartialEq)]
pub struct CountryShape {
    pub id: Option<String>,
    pub name: Option<String>,
    pub polygons: Vec<Polygon>,
}

impl CountryShape {
    /// Entry keyed by this shape's id, else by its name.
    pub fn lookup<'m, V>(
        &self,
        by_id: &'m HashMap<&str, V>,
        by_name: &'m HashMap<&str, V>,
    ) -> Option<&'m V> {
        self.id
            .as_deref()
            .and_then(|id| by_id.get(id))
            .or_else(|| self.name.as_deref().and_then(|n| by_name.get(n)))
    }
}

/// World country layer used as the choropleth base map.
#[derive(Clone, Debug, Default)]
pub struct BoundarySet {
    shapes: Vec<CountryShape>,
}

impl BoundarySet {
    pub fn new(shapes: Vec<CountryShape>) -> Self {
        Self { shapes }
    }

    /// Load from a file path or an `http(s)` URL.
    pub fn load(
        source: &str,
        id_property: &str,
        name_property: &str,
        http: &reqwest::blocking::Client,
    ) -> GeodashResult<Self> {
        let text = if source.starts_with("http://") || source.starts_with("https://") {
            tracing::info!(%source, "downloading boundaries");
            let resp = http.get(source).send()?;
            let status = resp.status();
            if !status.is_success() {
                return Err(GeodashError::provider(format!(
                    "GET {source} returned HTTP {status}"
                )));
            }
            resp.text()?
        } else {
            let path = Path::new(source);
            std::fs::read_to_string(path)
                .with_context(|| format!("read boundaries '{}'", path.display()))?
        };
        let set = Self::from_geojson_str(&text, id_property, name_property)?;
        tracing::info!(shapes = set.len(), "loaded boundaries");
        Ok(set)
    }

    /// Parse a GeoJSON `FeatureCollection` (or single `Feature`).
    pub fn from_geojson_str(
        text: &str,
        id_property: &str,
        name_property: &str,
    ) -> GeodashResult<Self> {
        let gj: GeoJson = text
            .parse()
            .map_err(|e| GeodashError::render(format!("parse boundaries geojson: {e}")))?;
        let features = match gj {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(f) => vec![f],
            GeoJson::Geometry(_) => {
                return Err(GeodashError::render(
                    "boundaries must be a FeatureCollection, got a bare geometry",
                ));
            }
        };

        let mut shapes = Vec::with_capacity(features.len());
        for feature in features {
            let polygons = match feature.geometry.as_ref().map(|g| &g.value) {
                Some(geojson::Value::Polygon(rings)) => vec![to_polygon(rings)],
                Some(geojson::Value::MultiPolygon(polys)) => polys.iter().map(|p| to_polygon(p)).collect(),
                _ => continue,
            };

            let id = string_property(&feature, id_property).or_else(|| match &feature.id {
                Some(geojson::feature::Id::String(s)) => Some(s.clone()),
                Some(geojson::feature::Id::Number(n)) => Some(n.to_string()),
                None => None,
            });
            let name = string_property(&feature, name_property);

            shapes.push(CountryShape { id, name, polygons });
        }

        if shapes.is_empty() {
            return Err(GeodashError::render(
                "boundaries contain no polygon features",
            ));
        }
        Ok(Self { shapes })
    }

    pub fn shapes(&self) -> &[CountryShape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

fn string_property(feature: &geojson::Feature, key: &str) -> Option<String> {
    feature
        .property(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn to_polygon(rings: &[Vec<Vec<f64>>]) -> Polygon {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .filter(|pos| pos.len() >= 2)
                .map(|pos| Point::new(pos[0], pos[1]))
                .collect::<Ring>()
        })
        .filter(|ring| ring.len() >= 3)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/geo/boundaries.rs"]
mod tests;
