use crate::geometry::{Contour, Frame, PolygonSet, SkyTransform};

/// Maps one observation's sky-frame contours into the planar frame of a
/// reference observation.
///
/// Pure transformation: every contour is mapped point-by-point through
/// `reference.invert`, keeping its per-observation identity. No merging
/// happens here.
#[must_use]
pub fn reproject(set: &PolygonSet, reference: &SkyTransform) -> PolygonSet {
    debug_assert_eq!(set.frame, Frame::Sky);

    let contours = set
        .contours
        .iter()
        .map(|contour| {
            Contour::new(
                contour
                    .points()
                    .iter()
                    .map(|sky| reference.invert(sky))
                    .collect(),
            )
        })
        .collect();

    PolygonSet::new(set.obsid.clone(), Frame::Plane, contours)
}
