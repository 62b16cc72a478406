use serde::Serialize;

use crate::catalog::indicators::Indicator;
use crate::data::table::MetricTable;
use crate::foundation::core::Year;
use crate::foundation::error::{GeodashError, GeodashResult};
use crate::render::style::{MapStyle, Theme, Tick};

/// Full-range animated choropleth, one frame per year with a playback position.
///
/// This is a presentation object for the host, not an exported file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnimatedChart {
    pub title: String,
    pub indicator: Indicator,
    pub theme: Theme,
    pub color_scale: &'static str,
    pub domain: (f64, f64),
    pub ticks: Vec<Tick>,
    pub default_year: Year,
    pub frames: Vec<ChartFrame>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartFrame {
    pub year: Year,
    pub entries: Vec<ChartEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartEntry {
    pub country: String,
    pub country_id: String,
    pub value: f64,
    /// `#rrggbb`
    pub color: String,
}

impl AnimatedChart {
    /// `None` for an empty table.
    pub fn build(table: &MetricTable, style: &MapStyle) -> Option<Self> {
        let years = table.years();
        let (&first, &last) = (years.first()?, years.last()?);

        let frames = years
            .iter()
            .map(|&year| ChartFrame {
                year,
                entries: table
                    .slice_for_year(year)
                    .into_iter()
                    .map(|r| ChartEntry {
                        country: r.country.clone(),
                        country_id: r.country_id.clone(),
                        value: r.value,
                        color: style.color_for(r.value).hex(),
                    })
                    .collect(),
            })
            .collect();

        Some(Self {
            title: format!("{} ({first}–{last})", table.indicator().name),
            indicator: table.indicator().clone(),
            theme: style.theme,
            color_scale: style.scale.name(),
            domain: style.domain,
            ticks: style.ticks.clone(),
            default_year: first,
            frames,
        })
    }

    pub fn frame(&self, year: Year) -> Option<&ChartFrame> {
        self.frames.iter().find(|f| f.year == year)
    }

    pub fn to_json(&self) -> GeodashResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| GeodashError::render(format!("serialize chart: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/chart.rs"]
mod tests;
