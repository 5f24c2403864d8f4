use slotmap::SlotMap;

use super::contour::{BoundingBox, Contour};

slotmap::new_key_type! {
    /// Unique identifier for a ring in an [`Arrangement`].
    pub struct RingId;
}

/// Classification of a ring in a merged arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingTag {
    /// The ring adds to the enclosed area.
    Solid,
    /// The ring subtracts from the enclosed area.
    Hole,
}

/// One tagged ring of a merged arrangement, with its derived bounding
/// box stored as an attribute (looked up by [`RingId`], never used as a
/// map key).
#[derive(Debug, Clone)]
pub struct RingData {
    pub contour: Contour,
    pub tag: RingTag,
    pub bbox: BoundingBox,
}

/// The result of a polygon union: an arena of tagged rings.
///
/// Produced once by the merger, consumed exactly once by the
/// decomposer, then discarded. Iteration follows insertion order, which
/// is what "visit order" means for the decomposer's output ordering.
#[derive(Debug, Default)]
pub struct Arrangement {
    rings: SlotMap<RingId, RingData>,
    order: Vec<RingId>,
}

impl Arrangement {
    /// Creates an empty arrangement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a ring, deriving its bounding box, and returns its ID.
    pub fn insert(&mut self, contour: Contour, tag: RingTag) -> RingId {
        let bbox = contour.bounding_box();
        let id = self.rings.insert(RingData { contour, tag, bbox });
        self.order.push(id);
        id
    }

    /// Returns the ring data for an ID, if present.
    #[must_use]
    pub fn ring(&self, id: RingId) -> Option<&RingData> {
        self.rings.get(id)
    }

    /// Iterates over all rings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (RingId, &RingData)> {
        self.order.iter().filter_map(|&id| Some((id, self.rings.get(id)?)))
    }

    /// Consumes the arrangement, yielding its rings in insertion order.
    #[must_use]
    pub fn into_rings(mut self) -> Vec<RingData> {
        self.order
            .iter()
            .filter_map(|&id| self.rings.remove(id))
            .collect()
    }

    /// Number of rings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    /// Returns `true` if the arrangement holds no rings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Sum of the solid rings' areas minus the hole rings' areas.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.iter()
            .map(|(_, ring)| {
                let area = ring.contour.signed_area().abs();
                match ring.tag {
                    RingTag::Solid => area,
                    RingTag::Hole => -area,
                }
            })
            .sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::math::{Point2, TOLERANCE};

    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Contour {
        Contour::new(vec![
            Point2::new(x0, y0),
            Point2::new(x0 + size, y0),
            Point2::new(x0 + size, y0 + size),
            Point2::new(x0, y0 + size),
        ])
    }

    #[test]
    fn insert_derives_bbox() {
        let mut arr = Arrangement::new();
        let id = arr.insert(square(1.0, 1.0, 2.0), RingTag::Solid);
        let ring = arr.ring(id).unwrap();
        assert!((ring.bbox.xmin - 1.0).abs() < TOLERANCE);
        assert!((ring.bbox.xmax - 3.0).abs() < TOLERANCE);
        assert_eq!(ring.tag, RingTag::Solid);
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut arr = Arrangement::new();
        let a = arr.insert(square(0.0, 0.0, 1.0), RingTag::Solid);
        let b = arr.insert(square(5.0, 0.0, 1.0), RingTag::Solid);
        let c = arr.insert(square(0.2, 0.2, 0.5), RingTag::Hole);
        let ids: Vec<_> = arr.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn total_area_subtracts_holes() {
        let mut arr = Arrangement::new();
        arr.insert(square(0.0, 0.0, 4.0), RingTag::Solid);
        arr.insert(square(1.0, 1.0, 1.0), RingTag::Hole);
        assert!((arr.total_area() - 15.0).abs() < TOLERANCE);
    }

    #[test]
    fn empty_arrangement() {
        let arr = Arrangement::new();
        assert!(arr.is_empty());
        assert_eq!(arr.len(), 0);
    }
}
