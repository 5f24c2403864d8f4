//! Decomposition of a merged arrangement into structured shapes.
//!
//! Hole-to-outer ownership is decided purely from 2D bounding boxes,
//! not true polygon containment. That trade is valid only because the
//! union's outer contours are pairwise non-overlapping; an ambiguous
//! match means that assumption was violated upstream and is fatal.

use crate::error::{AssignmentError, EmptyResultError, Result};
use crate::geometry::{Arrangement, BoundingBox, RingTag, Shape};

/// Converts an arrangement into an ordered list of shapes.
///
/// Solid rings become shape outers in visit order. Each hole ring is
/// appended, in insertion order, to the single shape whose outer
/// bounding box fully contains the hole's bounding box.
///
/// # Errors
///
/// Returns [`EmptyResultError`] if the arrangement holds no solid
/// rings, and [`AssignmentError`] if a hole matches zero outers (orphan
/// hole) or more than one (ambiguous containment).
pub fn decompose(arrangement: Arrangement) -> Result<Vec<Shape>> {
    let mut shapes: Vec<Shape> = Vec::new();
    let mut outer_boxes: Vec<BoundingBox> = Vec::new();
    let mut holes = Vec::new();

    for ring in arrangement.into_rings() {
        match ring.tag {
            RingTag::Solid => {
                outer_boxes.push(ring.bbox);
                shapes.push(Shape::new(ring.contour));
            }
            RingTag::Hole => holes.push(ring),
        }
    }

    if shapes.is_empty() {
        return Err(EmptyResultError.into());
    }

    for (hole_idx, ring) in holes.into_iter().enumerate() {
        let mut owner = None;
        let mut matches = 0;
        for (outer_idx, outer_box) in outer_boxes.iter().enumerate() {
            if outer_box.contains(&ring.bbox) {
                owner = Some(outer_idx);
                matches += 1;
            }
        }

        match (owner, matches) {
            (Some(outer_idx), 1) => shapes[outer_idx].holes.push(ring.contour),
            (None, _) => return Err(AssignmentError::OrphanHole { hole: hole_idx }.into()),
            (_, matches) => {
                return Err(AssignmentError::AmbiguousHole {
                    hole: hole_idx,
                    matches,
                }
                .into())
            }
        }
    }

    Ok(shapes)
}
