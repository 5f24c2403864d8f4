pub mod arrangement;
pub mod contour;
pub mod shape;
pub mod transform;

pub use arrangement::{Arrangement, RingData, RingId, RingTag};
pub use contour::{BoundingBox, Contour, Frame, PolygonSet};
pub use shape::Shape;
pub use transform::SkyTransform;
