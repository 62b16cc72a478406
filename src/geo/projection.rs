use kurbo::{Affine, BezPath, Point, Rect};

use crate::geo::boundaries::CountryShape;

/// Natural Earth I projection of `(lon, lat)` in degrees to unit-sphere plane coordinates
/// (x right, y up).
pub fn natural_earth(lon: f64, lat: f64) -> Point {
    let lambda = lon.clamp(-180.0, 180.0).to_radians();
    let phi = lat.clamp(-90.0, 90.0).to_radians();
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    let x = lambda
        * (0.8707 - 0.131979 * phi2
            + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4)));
    let y = phi
        * (1.007226 + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)));
    Point::new(x, y)
}

/// Natural Earth projection fitted into a pixel rectangle.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    to_px: Affine,
}

impl Projection {
    /// Center the whole globe in `rect`, preserving aspect ratio.
    pub fn fit(rect: Rect) -> Self {
        let half_w = natural_earth(180.0, 0.0).x;
        let half_h = natural_earth(0.0, 90.0).y;
        let scale = (rect.width() / (2.0 * half_w)).min(rect.height() / (2.0 * half_h));
        let center = rect.center();
        // flip y: plane is y-up, pixels are y-down
        let to_px = Affine::translate(center.to_vec2()) * Affine::scale_non_uniform(scale, -scale);
        Self { to_px }
    }

    pub fn project(&self, lon: f64, lat: f64) -> Point {
        self.to_px * natural_earth(lon, lat)
    }

    /// Closed outline of every ring of `shape`; holes rely on an even-odd fill.
    pub fn shape_path(&self, shape: &CountryShape) -> BezPath {
        let mut path = BezPath::new();
        for polygon in &shape.polygons {
            for ring in polygon {
                let mut points = ring.iter().map(|p| self.project(p.x, p.y));
                let Some(first) = points.next() else {
                    continue;
                };
                path.move_to(first);
                for p in points {
                    path.line_to(p);
                }
                path.close_path();
            }
        }
        path
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geo/projection.rs"]
mod tests;
