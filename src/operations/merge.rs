//! Polygon union.
//!
//! All floating-point clipping happens behind this one boundary: input
//! contours go in, a tagged [`Arrangement`] comes out. The clipping
//! itself is delegated to the `geo` crate's boolean operations.

use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon};

use crate::geometry::{Arrangement, Contour, RingTag};
use crate::math::{Point2, TOLERANCE};

/// Computes the union of a set of closed planar contours.
///
/// Winding direction carries the solid/hole intent of each input ring:
/// rings wound like the first contour contribute area, opposite-wound
/// rings subtract it. A lone contour is therefore always solid, and a
/// footprint whose contours all share one winding (the normal case) is
/// a plain union. The clipper merges overlapping rings, cancels
/// degenerate zero-area rings, and reclassifies each surviving ring as
/// solid (exterior) or hole (interior). The output ring count is not
/// predictable from the input count.
///
/// An empty input produces an empty arrangement; the decomposer is the
/// layer that reports that as an error.
#[must_use]
pub fn union(contours: &[Contour]) -> Arrangement {
    let mut arrangement = Arrangement::new();
    let Some(first) = contours.first() else {
        return arrangement;
    };
    let reference_ccw = first.signed_area() >= 0.0;

    let mut solid: Option<MultiPolygon<f64>> = None;
    let mut subtractive: Option<MultiPolygon<f64>> = None;
    for contour in contours {
        let next = MultiPolygon::new(vec![to_polygon(contour)]);
        let slot = if (contour.signed_area() >= 0.0) == reference_ccw {
            &mut solid
        } else {
            &mut subtractive
        };
        *slot = Some(match slot.take() {
            Some(acc) => acc.union(&next),
            None => next,
        });
    }

    let merged = match (solid, subtractive) {
        (Some(solid), Some(subtractive)) => solid.difference(&subtractive),
        (Some(solid), None) => solid,
        // Unreachable: the first contour always lands in `solid`.
        (None, _) => return arrangement,
    };

    for polygon in &merged {
        let outer = to_contour(polygon.exterior());
        if outer.signed_area().abs() < TOLERANCE {
            continue;
        }
        arrangement.insert(outer, RingTag::Solid);

        for interior in polygon.interiors() {
            let hole = to_contour(interior);
            if hole.signed_area().abs() < TOLERANCE {
                continue;
            }
            arrangement.insert(hole, RingTag::Hole);
        }
    }
    arrangement
}

/// Converts a contour to a clipper polygon, normalized to
/// counter-clockwise winding; solid/hole intent is carried separately.
fn to_polygon(contour: &Contour) -> Polygon<f64> {
    let mut coords: Vec<Coord<f64>> = contour
        .points()
        .iter()
        .map(|p| Coord { x: p.x, y: p.y })
        .collect();
    if contour.signed_area() < 0.0 {
        coords.reverse();
    }
    Polygon::new(LineString::new(coords), Vec::new())
}

fn to_contour(ring: &LineString<f64>) -> Contour {
    Contour::new(ring.coords().map(|c| Point2::new(c.x, c.y)).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::geometry::RingTag;

    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Contour {
        Contour::new(vec![
            Point2::new(x0, y0),
            Point2::new(x0 + size, y0),
            Point2::new(x0 + size, y0 + size),
            Point2::new(x0, y0 + size),
        ])
    }

    fn square_cw(x0: f64, y0: f64, size: f64) -> Contour {
        Contour::new(vec![
            Point2::new(x0, y0),
            Point2::new(x0, y0 + size),
            Point2::new(x0 + size, y0 + size),
            Point2::new(x0 + size, y0),
        ])
    }

    fn solids(arrangement: &Arrangement) -> usize {
        arrangement
            .iter()
            .filter(|(_, r)| r.tag == RingTag::Solid)
            .count()
    }

    #[test]
    fn empty_input_yields_empty_arrangement() {
        let arrangement = union(&[]);
        assert!(arrangement.is_empty());
    }

    #[test]
    fn singleton_union_is_identity() {
        let input = square(0.0, 0.0, 4.0);
        let arrangement = union(std::slice::from_ref(&input));
        assert_eq!(arrangement.len(), 1);

        let (_, ring) = arrangement.iter().next().unwrap();
        assert_eq!(ring.tag, RingTag::Solid);
        assert!(ring.contour.same_ring(&input));
    }

    #[test]
    fn singleton_clockwise_contour_is_still_solid() {
        let input = square_cw(0.0, 0.0, 4.0);
        let arrangement = union(std::slice::from_ref(&input));
        assert_eq!(arrangement.len(), 1);
        let (_, ring) = arrangement.iter().next().unwrap();
        assert_eq!(ring.tag, RingTag::Solid);
        assert!((arrangement.total_area() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn nested_opposite_winding_square_becomes_a_hole() {
        let outer = square(0.0, 0.0, 10.0);
        let inner = square_cw(3.0, 3.0, 2.0);
        let arrangement = union(&[outer.clone(), inner.clone()]);

        assert_eq!(solids(&arrangement), 1);
        let (_, solid_ring) = arrangement
            .iter()
            .find(|(_, r)| r.tag == RingTag::Solid)
            .unwrap();
        assert!(solid_ring.contour.same_ring(&outer));

        let holes: Vec<_> = arrangement
            .iter()
            .filter(|(_, r)| r.tag == RingTag::Hole)
            .map(|(_, r)| r.contour.clone())
            .collect();
        assert_eq!(holes.len(), 1);
        assert!(holes[0].same_ring(&inner));
        assert!((arrangement.total_area() - 96.0).abs() < 1e-9);

        // The hole's box is strictly inside the outer's box.
        let outer_box = solid_ring.bbox;
        let hole_box = holes[0].bounding_box();
        assert!(outer_box.contains(&hole_box));
        assert!(hole_box.xmin > outer_box.xmin && hole_box.xmax < outer_box.xmax);
        assert!(hole_box.ymin > outer_box.ymin && hole_box.ymax < outer_box.ymax);
    }

    #[test]
    fn overlapping_squares_merge_into_one_solid() {
        let arrangement = union(&[square(0.0, 0.0, 4.0), square(2.0, 0.0, 4.0)]);
        assert_eq!(solids(&arrangement), 1);
        // 4x4 + 4x4 - 2x4 overlap.
        assert!((arrangement.total_area() - 24.0).abs() < 1e-9);
    }

    #[test]
    fn disjoint_squares_stay_separate() {
        let arrangement = union(&[square(0.0, 0.0, 2.0), square(10.0, 0.0, 2.0)]);
        assert_eq!(solids(&arrangement), 2);
        assert!((arrangement.total_area() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn four_abutting_chips_leave_no_seams() {
        // A 2x2 grid of touching squares, like the imaging array.
        let arrangement = union(&[
            square(0.0, 0.0, 2.0),
            square(2.0, 0.0, 2.0),
            square(0.0, 2.0, 2.0),
            square(2.0, 2.0, 2.0),
        ]);
        assert_eq!(solids(&arrangement), 1);
        assert!((arrangement.total_area() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn ring_of_squares_encloses_a_hole() {
        // Eight 1x1 squares forming a ring around the unit cell (1,1)-(2,2).
        let mut inputs = Vec::new();
        for gx in 0..3 {
            for gy in 0..3 {
                if gx == 1 && gy == 1 {
                    continue;
                }
                inputs.push(square(f64::from(gx), f64::from(gy), 1.0));
            }
        }
        let arrangement = union(&inputs);

        let holes: Vec<_> = arrangement
            .iter()
            .filter(|(_, r)| r.tag == RingTag::Hole)
            .map(|(_, r)| r.bbox)
            .collect();
        assert_eq!(solids(&arrangement), 1);
        assert_eq!(holes.len(), 1);
        assert!((arrangement.total_area() - 8.0).abs() < 1e-9);

        let hole_box = holes[0];
        assert!((hole_box.xmin - 1.0).abs() < 1e-9);
        assert!((hole_box.xmax - 2.0).abs() < 1e-9);
    }

    #[test]
    fn union_area_matches_exact_union_of_inputs() {
        // Three mutually overlapping squares; inclusion-exclusion:
        // 3*16 - 8 - 4 - 8 + 4 = 28.
        let arrangement = union(&[
            square(0.0, 0.0, 4.0),
            square(2.0, 0.0, 4.0),
            square(2.0, 2.0, 4.0),
        ]);
        assert!((arrangement.total_area() - 28.0).abs() < 1e-9);
    }
}
