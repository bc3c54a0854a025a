use crate::foundation::core::{Point, Rect};

/// A screen region where effect pixels are suppressed.
///
/// Coordinates share the draw surface's pixel space. Polygon zones use even-odd ray casting,
/// which is exact for convex and concave simple polygons; self-intersecting input is not
/// supported.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionZone {
    /// Arbitrary simple polygon, closed implicitly.
    Polygon {
        /// Ordered vertices.
        vertices: Vec<Point>,
    },
    /// Axis-aligned ellipse.
    Ellipse {
        /// Ellipse center.
        center: Point,
        /// Horizontal radius.
        rx: f64,
        /// Vertical radius.
        ry: f64,
    },
    /// Axis-aligned rectangle.
    Rect {
        /// Rectangle in pixel space.
        rect: Rect,
    },
}

impl ExclusionZone {
    /// Ellipse inscribed in a screen region (e.g. the box of a UI overlay).
    pub fn ellipse_in(region: Rect) -> Self {
        let region = region.abs();
        Self::Ellipse {
            center: region.center(),
            rx: region.width() / 2.0,
            ry: region.height() / 2.0,
        }
    }

    /// Membership test for a point in surface pixel space.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        match self {
            Self::Polygon { vertices } => polygon_contains(vertices, x, y),
            Self::Ellipse { center, rx, ry } => {
                if *rx <= 0.0 || *ry <= 0.0 {
                    return false;
                }
                let dx = (x - center.x) / rx;
                let dy = (y - center.y) / ry;
                dx * dx + dy * dy <= 1.0
            }
            Self::Rect { rect } => {
                let r = rect.abs();
                x >= r.x0 && x < r.x1 && y >= r.y0 && y < r.y1
            }
        }
    }

    /// Axis-aligned bounding box of the zone.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Polygon { vertices } => match vertices.split_first() {
                None => Rect::ZERO,
                Some((&first, rest)) => rest
                    .iter()
                    .fold(Rect::from_points(first, first), |r, &v| r.union_pt(v)),
            },
            Self::Ellipse { center, rx, ry } => Rect::new(
                center.x - rx.abs(),
                center.y - ry.abs(),
                center.x + rx.abs(),
                center.y + ry.abs(),
            ),
            Self::Rect { rect } => rect.abs(),
        }
    }
}

fn polygon_contains(vertices: &[Point], x: f64, y: f64) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > y) != (vj.y > y) && x < (vj.x - vi.x) * (y - vi.y) / (vj.y - vi.y) + vi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Ordered set of exclusion zones with cached bounding boxes.
///
/// Zones are replaced wholesale through [`ZoneSet::recompute`] when the screen regions they are
/// derived from move or resize.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZoneSet {
    zones: Vec<ExclusionZone>,
    bounds: Vec<Rect>,
}

impl ZoneSet {
    /// Build a set from zones.
    pub fn new(zones: Vec<ExclusionZone>) -> Self {
        let bounds = zones.iter().map(ExclusionZone::bounds).collect();
        Self { zones, bounds }
    }

    /// Replace all zones.
    pub fn recompute(&mut self, zones: Vec<ExclusionZone>) {
        *self = Self::new(zones);
    }

    /// Whether no zones are present.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Number of zones.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Zones in insertion order.
    pub fn zones(&self) -> &[ExclusionZone] {
        &self.zones
    }

    /// Whether any zone contains the point.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        self.zones.iter().zip(&self.bounds).any(|(z, b)| {
            x >= b.x0 && x <= b.x1 && y >= b.y0 && y <= b.y1 && z.contains_point(x, y)
        })
    }

    /// Union of all zone bounding boxes.
    pub fn union_bounds(&self) -> Option<Rect> {
        self.bounds.iter().copied().reduce(|a, b| a.union(b))
    }

    /// Whether any zone's bounding box overlaps `rect`; a cheap pre-check before per-pixel tests.
    pub fn may_intersect(&self, rect: Rect) -> bool {
        self.bounds
            .iter()
            .any(|b| b.x0 < rect.x1 && rect.x0 < b.x1 && b.y0 < rect.y1 && rect.y0 < b.y1)
    }
}

impl FromIterator<ExclusionZone> for ZoneSet {
    fn from_iter<I: IntoIterator<Item = ExclusionZone>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/zone.rs"]
mod tests;
