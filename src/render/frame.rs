use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;

use image::ImageEncoder as _;
use kurbo::Rect;

use crate::catalog::indicators::Indicator;
use crate::data::table::ObservationRow;
use crate::foundation::core::{Canvas, Year};
use crate::foundation::error::{GeodashError, GeodashResult};
use crate::foundation::math::to_opaque_rgba8;
use crate::geo::boundaries::BoundarySet;
use crate::geo::projection::Projection;
use crate::render::style::{MapStyle, Rgb8};

/// A rendered frame as RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight RGBA of the pixel at `(x, y)`, `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = &self.data[i..i + 4];
        let a = px[3];
        if !self.premultiplied || a == 255 || a == 0 {
            return Some([px[0], px[1], px[2], a]);
        }
        let un = |c: u8| ((u16::from(c) * 255 + u16::from(a) / 2) / u16::from(a)).min(255) as u8;
        Some([un(px[0]), un(px[1]), un(px[2]), a])
    }
}

const FONT_FAMILY: &str = "DejaVu Sans, Arial, Helvetica, sans-serif";

/// Pixel rectangles of the frame layout.
#[derive(Clone, Copy, Debug)]
struct Layout {
    map: Rect,
    bar: Rect,
    title_x: f64,
    title_y: f64,
    title_size: f64,
    tick_size: f64,
}

impl Layout {
    fn for_canvas(canvas: Canvas) -> Self {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        Self {
            map: Rect::new(w * 0.02, h * 0.12, w * 0.86, h * 0.97),
            bar: Rect::new(w * 0.89, h * 0.18, w * 0.91, h * 0.88),
            title_x: w * 0.02,
            title_y: h * 0.07,
            title_size: (h * 0.045).max(6.0),
            tick_size: (h * 0.028).max(5.0),
        }
    }
}

/// Rasterizes one choropleth frame per call at a fixed canvas size.
///
/// The font database is loaded once and shared by every frame.
pub struct FrameRenderer {
    canvas: Canvas,
    layout: Layout,
    svg_opts: usvg::Options<'static>,
}

impl FrameRenderer {
    pub fn new(canvas: Canvas) -> GeodashResult<Self> {
        canvas.validate()?;
        let svg_opts = usvg::Options {
            fontdb: build_fontdb(),
            ..Default::default()
        };
        Ok(Self {
            canvas,
            layout: Layout::for_canvas(canvas),
            svg_opts,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Projection used for the map area of every frame.
    pub fn projection(&self) -> Projection {
        Projection::fit(self.layout.map)
    }

    /// Render `rows` (one year of one indicator) over `boundaries`.
    #[tracing::instrument(skip_all, fields(code = %indicator.code, %year))]
    pub fn render_year_frame(
        &self,
        rows: &[&ObservationRow],
        indicator: &Indicator,
        year: Year,
        style: &MapStyle,
        boundaries: &BoundarySet,
    ) -> GeodashResult<FrameRGBA> {
        let title = format!("{} — {}", indicator.name, year);
        let svg = self.scene_svg(rows, &title, style, boundaries);
        self.rasterize(&svg)
    }

    /// SVG document for one frame.
    pub fn scene_svg(
        &self,
        rows: &[&ObservationRow],
        title: &str,
        style: &MapStyle,
        boundaries: &BoundarySet,
    ) -> String {
        let Canvas { width, height } = self.canvas;
        let tpl = style.theme.template();
        let l = self.layout;

        let by_id: HashMap<&str, f64> = rows.iter().map(|r| (r.country_id.as_str(), r.value)).collect();
        let by_name: HashMap<&str, f64> = rows.iter().map(|r| (r.country.as_str(), r.value)).collect();

        let mut svg = String::with_capacity(64 * 1024);
        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        );
        let _ = write!(
            svg,
            r#"<rect x="0" y="0" width="{width}" height="{height}" fill="{}"/>"#,
            tpl.background.hex()
        );

        let projection = self.projection();
        let stroke_w = (f64::from(height) / 1000.0).max(0.5);
        for shape in boundaries.shapes() {
            let fill = match shape.lookup(&by_id, &by_name) {
                Some(&v) => style.color_for(v),
                None => tpl.land,
            };
            let path = projection.shape_path(shape);
            if path.elements().is_empty() {
                continue;
            }
            let _ = write!(
                svg,
                r#"<path d="{}" fill="{}" fill-rule="evenodd" stroke="{}" stroke-width="{stroke_w:.2}"/>"#,
                path.to_svg(),
                fill.hex(),
                tpl.border.hex()
            );
        }

        self.write_color_bar(&mut svg, style, tpl.text);

        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-family="{FONT_FAMILY}" font-size="{:.1}" font-weight="bold" fill="{}">{}</text>"#,
            l.title_x,
            l.title_y,
            l.title_size,
            tpl.text.hex(),
            escape_xml(title)
        );
        svg.push_str("</svg>");
        svg
    }

    fn write_color_bar(&self, svg: &mut String, style: &MapStyle, text: Rgb8) {
        let bar = self.layout.bar;
        let stops: Vec<Rgb8> = style.scale.stops().collect();
        let last = (stops.len() - 1).max(1) as f64;

        svg.push_str(r#"<defs><linearGradient id="scale" x1="0" y1="1" x2="0" y2="0">"#);
        for (i, c) in stops.iter().enumerate() {
            let _ = write!(
                svg,
                r#"<stop offset="{:.4}" stop-color="{}"/>"#,
                i as f64 / last,
                c.hex()
            );
        }
        svg.push_str("</linearGradient></defs>");
        let _ = write!(
            svg,
            r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="url(#scale)"/>"#,
            bar.x0,
            bar.y0,
            bar.width(),
            bar.height()
        );

        let (lo, hi) = style.domain;
        let span = hi - lo;
        for tick in &style.ticks {
            let t = if span > 0.0 { (tick.value - lo) / span } else { 0.5 };
            let y = bar.y1 - t.clamp(0.0, 1.0) * bar.height();
            let _ = write!(
                svg,
                r#"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{}" stroke-width="1"/>"#,
                bar.x1,
                bar.x1 + 4.0,
                text.hex()
            );
            let _ = write!(
                svg,
                r#"<text x="{:.1}" y="{:.1}" font-family="{FONT_FAMILY}" font-size="{:.1}" fill="{}">{}</text>"#,
                bar.x1 + 6.0,
                y + self.layout.tick_size * 0.35,
                self.layout.tick_size,
                text.hex(),
                escape_xml(&tick.label)
            );
        }
    }

    fn rasterize(&self, svg: &str) -> GeodashResult<FrameRGBA> {
        let tree = usvg::Tree::from_str(svg, &self.svg_opts)
            .map_err(|e| GeodashError::render(format!("parse frame svg: {e}")))?;
        let Canvas { width, height } = self.canvas;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| GeodashError::render("failed to allocate frame pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        Ok(FrameRGBA {
            width,
            height,
            data: pixmap.take(),
            premultiplied: true,
        })
    }
}

/// Encode a frame as an opaque PNG.
pub fn encode_png(frame: &FrameRGBA, bg: Rgb8) -> GeodashResult<Vec<u8>> {
    let data = if frame.premultiplied {
        to_opaque_rgba8(&frame.data, bg.rgba())?
    } else {
        frame.data.clone()
    };
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(&data, frame.width, frame.height, image::ExtendedColorType::Rgba8)
        .map_err(|e| GeodashError::encode(format!("png encode: {e}")))?;
    Ok(out)
}

fn build_fontdb() -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();

    // Generic families default to fonts that may not be installed; point them at a real face.
    let sans = [usvg::fontdb::Family::SansSerif];
    let query = usvg::fontdb::Query {
        families: &sans,
        ..Default::default()
    };
    if db.query(&query).is_none() {
        let fallback = db
            .faces()
            .find_map(|f| f.families.first().map(|(name, _)| name.clone()));
        if let Some(name) = fallback {
            tracing::debug!(family = %name, "using fallback sans-serif family");
            db.set_sans_serif_family(name);
        }
    }
    tracing::debug!(faces = db.len(), "loaded font database");
    Arc::new(db)
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
