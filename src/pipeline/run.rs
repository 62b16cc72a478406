use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::catalog::countries::Resolution;
use crate::catalog::indicators::Indicator;
use crate::config::{Config, UnresolvedPolicy};
use crate::data::fetch::fetch_metric_table;
use crate::data::table::MetricTable;
use crate::data::trend::TrendView;
use crate::encode::assemble::assemble;
use crate::foundation::core::{Fps, Year, YearRange};
use crate::foundation::error::{GeodashError, GeodashResult};
use crate::pipeline::reference::ReferenceData;
use crate::pipeline::scratch::{ScratchDir, frame_file_name, gif_file_name, mp4_file_name};
use crate::provider::DataProvider;
use crate::render::chart::AnimatedChart;
use crate::render::frame::{FrameRGBA, FrameRenderer, encode_png};
use crate::render::style::{MapStyle, Theme};

/// One user request: countries by display name, metrics by catalog name.
#[derive(Clone, Debug)]
pub struct Selection {
    pub countries: Vec<String>,
    pub metrics: Vec<String>,
    pub theme: Theme,
    pub fps: Fps,
    pub years: YearRange,
}

impl Selection {
    pub fn validate(&self) -> GeodashResult<()> {
        if self.countries.is_empty() || self.metrics.is_empty() {
            return Err(GeodashError::validation(
                "Please select at least one country and one metric.",
            ));
        }
        Ok(())
    }
}

/// Per-indicator failure. A failure never affects the other indicators of a batch.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("No data for {metric}.")]
    NoData { metric: String },

    #[error("Error with {metric}: not in the indicator catalog")]
    UnknownMetric { metric: String },

    #[error("Error with {metric}: {source}")]
    Fetch {
        metric: String,
        source: GeodashError,
    },

    #[error("Error with {metric}: {source}")]
    Render {
        metric: String,
        source: GeodashError,
    },

    #[error("Error with {metric}: {source}")]
    Encode {
        metric: String,
        source: GeodashError,
    },
}

impl PipelineError {
    pub fn metric(&self) -> &str {
        match self {
            Self::NoData { metric }
            | Self::UnknownMetric { metric }
            | Self::Fetch { metric, .. }
            | Self::Render { metric, .. }
            | Self::Encode { metric, .. } => metric,
        }
    }

    /// Empty results are reported as warnings rather than errors.
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}

/// A named, typed file ready for delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// The three downloadable files of one indicator.
#[derive(Clone, Debug)]
pub struct ArtifactSet {
    /// Map of the last year.
    pub png: Artifact,
    pub gif: Artifact,
    pub mp4: Artifact,
}

impl ArtifactSet {
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        [&self.png, &self.gif, &self.mp4].into_iter()
    }

    /// Write every artifact into `dir` under its file name.
    pub fn write_to(&self, dir: &Path) -> GeodashResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
        self.iter()
            .map(|a| {
                let path = dir.join(&a.file_name);
                std::fs::write(&path, &a.bytes)
                    .with_context(|| format!("write '{}'", path.display()))?;
                Ok(path)
            })
            .collect()
    }
}

/// Everything produced for one indicator before encoding.
#[derive(Clone, Debug)]
pub struct RenderedIndicator {
    pub table: MetricTable,
    pub style: MapStyle,
    pub chart: AnimatedChart,
    pub trend: TrendView,
    /// Ascending by year, one per year present in `table`.
    pub frames: Vec<(Year, FrameRGBA)>,
}

#[derive(Clone, Debug)]
pub struct IndicatorReport {
    pub indicator: Indicator,
    pub table: MetricTable,
    pub chart: AnimatedChart,
    pub trend: TrendView,
    pub frame_years: Vec<Year>,
    pub artifacts: ArtifactSet,
}

#[derive(Debug)]
pub struct IndicatorOutcome {
    pub metric: String,
    pub result: Result<IndicatorReport, PipelineError>,
}

/// Result of a whole selection, in selection order.
#[derive(Debug)]
pub struct BatchReport {
    pub resolution: Resolution,
    pub outcomes: Vec<IndicatorOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &IndicatorReport> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &PipelineError> {
        self.failures().filter(|e| e.is_warning())
    }

    pub fn errors(&self) -> impl Iterator<Item = &PipelineError> {
        self.failures().filter(|e| !e.is_warning())
    }

    fn failures(&self) -> impl Iterator<Item = &PipelineError> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err())
    }
}

#[derive(Clone, Debug, Default)]
pub struct PipelineOpts {
    /// Parent of per-run scratch directories; the system temp dir when `None`.
    pub scratch_root: Option<PathBuf>,
    pub unresolved: UnresolvedPolicy,
}

impl PipelineOpts {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            scratch_root: cfg.scratch_root.clone(),
            unresolved: cfg.unresolved_countries,
        }
    }
}

/// Runs selections against shared reference data. Holds no per-run state.
pub struct Pipeline<'a> {
    provider: &'a dyn DataProvider,
    refdata: &'a ReferenceData,
    renderer: &'a FrameRenderer,
    opts: PipelineOpts,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        provider: &'a dyn DataProvider,
        refdata: &'a ReferenceData,
        renderer: &'a FrameRenderer,
        opts: PipelineOpts,
    ) -> Self {
        Self {
            provider,
            refdata,
            renderer,
            opts,
        }
    }

    /// Run every selected metric in order.
    ///
    /// Only selection-level problems fail the whole batch; each metric reports its own outcome.
    #[tracing::instrument(skip_all, fields(countries = sel.countries.len(), metrics = sel.metrics.len()))]
    pub fn run(&self, sel: &Selection) -> GeodashResult<BatchReport> {
        sel.validate()?;
        let resolution = self
            .refdata
            .countries
            .resolve(sel.countries.as_slice(), self.opts.unresolved)?;
        if resolution.ids.is_empty() {
            return Err(GeodashError::validation(format!(
                "none of the selected countries are known: {}",
                resolution.unresolved.join(", ")
            )));
        }

        let mut outcomes = Vec::with_capacity(sel.metrics.len());
        for metric in &sel.metrics {
            let result = match self.refdata.indicators.by_name(metric) {
                Some(indicator) => self.run_indicator(indicator, &resolution.ids, sel),
                None => Err(PipelineError::UnknownMetric {
                    metric: metric.clone(),
                }),
            };
            match &result {
                Ok(report) => {
                    tracing::info!(metric = %metric, frames = report.frame_years.len(), "indicator done")
                }
                Err(e) if e.is_warning() => tracing::warn!(metric = %metric, "{e}"),
                Err(e) => tracing::error!(metric = %metric, "{e}"),
            }
            outcomes.push(IndicatorOutcome {
                metric: metric.clone(),
                result,
            });
        }

        Ok(BatchReport {
            resolution,
            outcomes,
        })
    }

    /// Fetch, render and encode one indicator inside its own scratch directory.
    ///
    /// The scratch directory is gone when this returns, on every path.
    #[tracing::instrument(skip(self, country_ids, sel), fields(code = %indicator.code))]
    pub fn run_indicator(
        &self,
        indicator: &Indicator,
        country_ids: &[String],
        sel: &Selection,
    ) -> Result<IndicatorReport, PipelineError> {
        let metric = indicator.name.clone();
        let encode_err = |source| PipelineError::Encode {
            metric: metric.clone(),
            source,
        };

        let scratch = ScratchDir::acquire(self.opts.scratch_root.as_deref()).map_err(encode_err)?;
        let rendered = self.render_indicator(indicator, country_ids, sel)?;
        let code = indicator.code.as_str();
        let bg = rendered.style.theme.template().background;

        // Frames stay in memory for assembly; the files only fill the `{code}_{year}.png` layout.
        let mut last_png = None;
        for (year, frame) in &rendered.frames {
            let png = encode_png(frame, bg).map_err(encode_err)?;
            let path = scratch.frame_path(code, *year);
            std::fs::write(&path, &png)
                .with_context(|| format!("write frame '{}'", path.display()))
                .map_err(|e| encode_err(e.into()))?;
            last_png = Some((*year, png));
        }
        let Some((last_year, png)) = last_png else {
            return Err(PipelineError::NoData {
                metric: metric.clone(),
            });
        };

        let media = assemble(
            &rendered.frames,
            sel.fps,
            &scratch.gif_path(code),
            &scratch.mp4_path(code),
            bg.rgba(),
        )
        .map_err(encode_err)?;

        let artifacts = ArtifactSet {
            png: Artifact {
                file_name: frame_file_name(code, last_year),
                mime: "image/png",
                bytes: png,
            },
            gif: Artifact {
                file_name: gif_file_name(code),
                mime: "image/gif",
                bytes: media.gif,
            },
            mp4: Artifact {
                file_name: mp4_file_name(code),
                mime: "video/mp4",
                bytes: media.mp4,
            },
        };

        Ok(IndicatorReport {
            indicator: indicator.clone(),
            frame_years: rendered.frames.iter().map(|(y, _)| *y).collect(),
            table: rendered.table,
            chart: rendered.chart,
            trend: rendered.trend,
            artifacts,
        })
    }

    /// Fetch one indicator and render its chart, trend view and per-year frames. Writes nothing.
    #[tracing::instrument(skip(self, country_ids, sel), fields(code = %indicator.code))]
    pub fn render_indicator(
        &self,
        indicator: &Indicator,
        country_ids: &[String],
        sel: &Selection,
    ) -> Result<RenderedIndicator, PipelineError> {
        let metric = &indicator.name;
        let no_data = || PipelineError::NoData {
            metric: metric.clone(),
        };

        let table = fetch_metric_table(self.provider, indicator, country_ids, sel.years).map_err(
            |source| PipelineError::Fetch {
                metric: metric.clone(),
                source,
            },
        )?;
        if table.is_empty() {
            return Err(no_data());
        }

        let style = MapStyle::for_table(&table, sel.theme).ok_or_else(no_data)?;
        let chart = AnimatedChart::build(&table, &style).ok_or_else(no_data)?;
        let trend = TrendView::pivot(&table);

        let frames = table
            .years()
            .into_iter()
            .map(|year| {
                let rows = table.slice_for_year(year);
                self.renderer
                    .render_year_frame(&rows, indicator, year, &style, &self.refdata.boundaries)
                    .map(|frame| (year, frame))
            })
            .collect::<GeodashResult<Vec<_>>>()
            .map_err(|source| PipelineError::Render {
                metric: metric.clone(),
                source,
            })?;

        Ok(RenderedIndicator {
            table,
            style,
            chart,
            trend,
            frames,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/run.rs"]
mod tests;
