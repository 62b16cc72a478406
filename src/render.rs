//! Choropleth frames and on-screen chart objects.

pub mod chart;
pub mod frame;
pub mod style;
