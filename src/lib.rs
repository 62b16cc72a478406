//! GeoDashboard turns country development indicators into choropleth maps.
//!
//! A run resolves a country selection, fetches each selected indicator from the World Bank,
//! and produces per indicator:
//!
//! - an [`AnimatedChart`] and a [`TrendView`] for interactive display
//! - one rendered map per year, assembled into a PNG, an animated GIF and an MP4
//!
//! Each indicator succeeds or fails on its own; see [`Pipeline::run`].
#![forbid(unsafe_code)]

mod foundation;

pub mod catalog;
pub mod config;
pub mod data;
pub mod encode;
pub mod geo;
pub mod pipeline;
pub mod provider;
pub mod render;

pub use crate::foundation::core::{Canvas, Fps, Year, YearRange};
pub use crate::foundation::error::{GeodashError, GeodashResult};

pub use crate::catalog::countries::{Country, CountryDirectory, Resolution};
pub use crate::catalog::indicators::{Indicator, IndicatorCatalog};
pub use crate::config::{Config, UnresolvedPolicy};
pub use crate::data::fetch::fetch_metric_table;
pub use crate::data::table::{MetricTable, ObservationRow};
pub use crate::data::trend::TrendView;
pub use crate::encode::assemble::{EncodedMedia, assemble, stream_frames};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::gif::GifSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::geo::boundaries::{BoundarySet, CountryShape};
pub use crate::pipeline::reference::ReferenceData;
pub use crate::pipeline::run::{
    Artifact, ArtifactSet, BatchReport, IndicatorOutcome, IndicatorReport, Pipeline,
    PipelineError, PipelineOpts, RenderedIndicator, Selection,
};
pub use crate::provider::worldbank::WorldBankClient;
pub use crate::provider::{DataProvider, RawObservation};
pub use crate::render::chart::AnimatedChart;
pub use crate::render::frame::{FrameRGBA, FrameRenderer, encode_png};
pub use crate::render::style::{ColorScale, MapStyle, Theme};
