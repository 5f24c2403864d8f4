use crate::math::{polygon_2d::signed_area_2d, Point2, TOLERANCE};

/// Axis-aligned bounding box of a contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl BoundingBox {
    /// Computes the bounding box of a non-empty point set.
    ///
    /// Returns `None` for an empty slice.
    #[must_use]
    pub fn from_points(points: &[Point2]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self {
            xmin: first.x,
            xmax: first.x,
            ymin: first.y,
            ymax: first.y,
        };
        for pt in &points[1..] {
            bbox.xmin = bbox.xmin.min(pt.x);
            bbox.xmax = bbox.xmax.max(pt.x);
            bbox.ymin = bbox.ymin.min(pt.y);
            bbox.ymax = bbox.ymax.max(pt.y);
        }
        Some(bbox)
    }

    /// Returns `true` if `other` lies fully within this box (closed
    /// comparison: shared edges count as inside).
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.xmin <= other.xmin
            && other.xmax <= self.xmax
            && self.ymin <= other.ymin
            && other.ymax <= self.ymax
    }

    /// Returns `true` if the two boxes share any area.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.xmin <= other.xmax
            && other.xmin <= self.xmax
            && self.ymin <= other.ymax
            && other.ymin <= self.ymax
    }
}

/// A closed polygon boundary: an ordered ring of finite 2D points whose
/// first and last vertices are identical.
///
/// Immutable once constructed. The constructor closes the ring if the
/// input is open; validation of vertex count and finiteness happens in
/// the record reader, which is the only place raw coordinates enter the
/// crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point2>,
}

impl Contour {
    /// Builds a contour from a vertex ring, appending the first point at
    /// the end if the ring is not already closed.
    #[must_use]
    pub fn new(mut points: Vec<Point2>) -> Self {
        if let (Some(first), Some(last)) = (points.first().copied(), points.last()) {
            if first != *last {
                points.push(first);
            }
        }
        Self { points }
    }

    /// The vertex ring, closing vertex included.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Number of vertices, closing vertex included.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// The vertex ring without the duplicated closing vertex.
    #[must_use]
    pub fn open_ring(&self) -> &[Point2] {
        match self.points.split_last() {
            Some((_, rest)) if !rest.is_empty() => rest,
            _ => &self.points,
        }
    }

    /// Signed area (positive for counter-clockwise winding).
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(self.open_ring())
    }

    /// Axis-aligned bounding box. An empty contour (which the record
    /// reader never produces) yields a degenerate box at the origin.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points).unwrap_or(BoundingBox {
            xmin: 0.0,
            xmax: 0.0,
            ymin: 0.0,
            ymax: 0.0,
        })
    }

    /// Returns `true` if the two contours describe the same ring, up to
    /// the choice of starting vertex and within [`TOLERANCE`].
    #[must_use]
    pub fn same_ring(&self, other: &Self) -> bool {
        use crate::math::polygon_2d::rotate_to_canonical_start;

        let a = rotate_to_canonical_start(self.open_ring());
        let mut b = rotate_to_canonical_start(other.open_ring());
        if a.len() != b.len() {
            return false;
        }
        let matches = |a: &[Point2], b: &[Point2]| {
            a.iter()
                .zip(b)
                .all(|(p, q)| (p.x - q.x).abs() < TOLERANCE && (p.y - q.y).abs() < TOLERANCE)
        };
        if matches(&a, &b) {
            return true;
        }
        // Same ring traversed in the opposite direction.
        b.reverse();
        let b = rotate_to_canonical_start(&b);
        matches(&a, &b)
    }
}

/// The coordinate frame a [`PolygonSet`] lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// Planar detector (SKY pixel) coordinates.
    Plane,
    /// Celestial (RA, Dec) coordinates in degrees.
    Sky,
}

/// The closed contours of one observation's field of view, in a single
/// coordinate frame.
#[derive(Debug, Clone)]
pub struct PolygonSet {
    pub obsid: String,
    pub frame: Frame,
    pub contours: Vec<Contour>,
}

impl PolygonSet {
    /// Creates a polygon set for one observation.
    #[must_use]
    pub fn new(obsid: impl Into<String>, frame: Frame, contours: Vec<Contour>) -> Self {
        Self {
            obsid: obsid.into(),
            frame,
            contours,
        }
    }
}
