use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::foundation::error::{GeodashError, GeodashResult};

/// Calendar year of an observation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct Year(pub i32);

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive year range `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct YearRange {
    /// First year (inclusive).
    pub start: Year,
    /// Last year (inclusive).
    pub end: Year,
}

impl YearRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: Year, end: Year) -> GeodashResult<Self> {
        if start > end {
            return Err(GeodashError::validation(format!(
                "year range start {start} must be <= end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Range covering the calendar years of two dates.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> GeodashResult<Self> {
        Self::new(Year(start.year()), Year(end.year()))
    }

    /// Return `true` when `y` is inside `[start, end]`.
    pub fn contains(self, y: Year) -> bool {
        self.start <= y && y <= self.end
    }

    /// Number of years covered.
    pub fn len_years(self) -> u32 {
        (self.end.0 - self.start.0) as u32 + 1
    }

    /// Provider query form, `START:END`.
    pub fn as_query(self) -> String {
        format!("{}:{}", self.start, self.end)
    }
}

/// Animation speed in whole frames per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct Fps(u32);

impl Fps {
    /// Slowest accepted speed.
    pub const MIN: u32 = 1;
    /// Fastest accepted speed.
    pub const MAX: u32 = 5;

    /// Create a validated frame rate in `MIN..=MAX`.
    pub fn new(fps: u32) -> GeodashResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&fps) {
            return Err(GeodashError::validation(format!(
                "fps must be within {}..={}, got {fps}",
                Self::MIN,
                Self::MAX
            )));
        }
        Ok(Self(fps))
    }

    /// Frames per second.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self(2)
    }
}

/// Output frame dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Reject sizes the encoders cannot take.
    pub fn validate(self) -> GeodashResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GeodashError::validation(
                "canvas width/height must be non-zero",
            ));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            // yuv420p needs even dimensions
            return Err(GeodashError::validation(
                "canvas width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        Ok(())
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            width: 960,
            height: 540,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
