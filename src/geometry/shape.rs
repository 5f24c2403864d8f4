use super::contour::{BoundingBox, Contour};

/// One disjoint region of a merged footprint: an outer boundary plus
/// the holes it encloses.
///
/// Outer contours across all shapes of one result are pairwise
/// non-overlapping by construction of the union; each hole's bounding
/// box lies fully inside this shape's outer bounding box.
#[derive(Debug, Clone)]
pub struct Shape {
    pub outer: Contour,
    pub holes: Vec<Contour>,
}

impl Shape {
    /// Creates a shape with no holes.
    #[must_use]
    pub fn new(outer: Contour) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Returns `true` if the shape encloses any holes.
    #[must_use]
    pub fn has_holes(&self) -> bool {
        !self.holes.is_empty()
    }

    /// Bounding box of the outer boundary.
    #[must_use]
    pub fn bounding_box(&self) -> BoundingBox {
        self.outer.bounding_box()
    }
}
