use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::table::MetricTable;
use crate::foundation::error::GeodashError;

/// Opaque sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn from_u32(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }

    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    fn lerp(self, other: Self, t: f64) -> Self {
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
        }
    }
}

const VIRIDIS: [u32; 10] = [
    0x440154, 0x482878, 0x3e4989, 0x31688e, 0x26828e, 0x1f9e89, 0x35b779, 0x6ece58, 0xb5de2b,
    0xfde725,
];

const PLASMA: [u32; 10] = [
    0x0d0887, 0x46039f, 0x7201a8, 0x9c179e, 0xbd3786, 0xd8576b, 0xed7953, 0xfb9f3a, 0xfdca26,
    0xf0f921,
];

/// Continuous sequential color scale with evenly spaced stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorScale {
    name: &'static str,
    stops: &'static [u32],
}

impl ColorScale {
    pub const VIRIDIS: Self = Self {
        name: "Viridis",
        stops: &VIRIDIS,
    };
    pub const PLASMA: Self = Self {
        name: "Plasma",
        stops: &PLASMA,
    };

    pub fn name(self) -> &'static str {
        self.name
    }

    pub fn stops(self) -> impl Iterator<Item = Rgb8> {
        self.stops.iter().map(|&c| Rgb8::from_u32(c))
    }

    /// Color at `t` in `[0, 1]`; out-of-range input is clamped.
    pub fn at(self, t: f64) -> Rgb8 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let last = self.stops.len() - 1;
        let pos = t * last as f64;
        let i = (pos.floor() as usize).min(last - 1);
        Rgb8::from_u32(self.stops[i]).lerp(Rgb8::from_u32(self.stops[i + 1]), pos - i as f64)
    }

    /// Color of `value` within `domain`. A degenerate domain maps to the middle.
    pub fn color_for(self, value: f64, domain: (f64, f64)) -> Rgb8 {
        let (lo, hi) = domain;
        if hi - lo <= f64::EPSILON * hi.abs().max(1.0) {
            return self.at(0.5);
        }
        self.at((value - lo) / (hi - lo))
    }
}

/// Page colors around the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Template {
    pub background: Rgb8,
    pub text: Rgb8,
    /// Fill of countries without an observation.
    pub land: Rgb8,
    pub border: Rgb8,
}

/// User-selectable look. Each theme owns exactly one color scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn scale(self) -> ColorScale {
        match self {
            Theme::Light => ColorScale::PLASMA,
            Theme::Dark => ColorScale::VIRIDIS,
        }
    }

    pub fn template(self) -> Template {
        match self {
            Theme::Light => Template {
                background: Rgb8::from_u32(0xffffff),
                text: Rgb8::from_u32(0x2a3f5f),
                land: Rgb8::from_u32(0xe5ecf6),
                border: Rgb8::from_u32(0xffffff),
            },
            Theme::Dark => Template {
                background: Rgb8::from_u32(0x111111),
                text: Rgb8::from_u32(0xf2f5fa),
                land: Rgb8::from_u32(0x2a3442),
                border: Rgb8::from_u32(0x506784),
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        })
    }
}

impl FromStr for Theme {
    type Err = GeodashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(GeodashError::validation(format!(
                "unknown theme '{other}', expected Light or Dark"
            ))),
        }
    }
}

/// Labelled position on the color bar.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// Everything that must stay identical between the chart and each frame of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct MapStyle {
    pub theme: Theme,
    pub scale: ColorScale,
    pub domain: (f64, f64),
    pub ticks: Vec<Tick>,
}

impl MapStyle {
    const TICK_QUANTILES: [f64; 3] = [0.1, 0.5, 0.9];

    /// Style over the full value range of `table`; `None` when it has no rows.
    pub fn for_table(table: &MetricTable, theme: Theme) -> Option<Self> {
        let domain = table.value_domain()?;
        let ticks = Self::TICK_QUANTILES
            .iter()
            .filter_map(|&q| table.quantile(q))
            .map(|value| Tick {
                value,
                label: format_sci(value),
            })
            .collect();
        Some(Self {
            theme,
            scale: theme.scale(),
            domain,
            ticks,
        })
    }

    pub fn color_for(&self, value: f64) -> Rgb8 {
        self.scale.color_for(value, self.domain)
    }
}

/// Scientific notation with two decimals and a signed two-digit exponent, e.g. `1.23e+04`.
pub fn format_sci(value: f64) -> String {
    let raw = format!("{value:.2e}");
    let Some((mantissa, exp)) = raw.split_once('e') else {
        return raw;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return raw;
    };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.abs())
}

#[cfg(test)]
#[path = "../../tests/unit/render/style.rs"]
mod tests;
