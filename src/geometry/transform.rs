//! Tangent-plane (gnomonic) mapping between an observation's planar
//! detector frame and celestial coordinates.

use serde::{Deserialize, Serialize};

use crate::math::Point2;

/// Invertible plane ↔ sky transform for one observation, anchored at
/// that observation's aim point.
///
/// Follows the FITS WCS convention: `crpix` is the planar reference
/// pixel, `crval` the celestial tangent point in degrees, and `cdelt`
/// the plate scale in degrees per pixel along each axis. Both
/// directions are total over finite inputs for a well-formed transform;
/// malformed transform metadata is rejected upstream when the record is
/// read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyTransform {
    /// Planar reference pixel (x, y).
    pub crpix: [f64; 2],
    /// Tangent point (RA, Dec) in degrees.
    pub crval: [f64; 2],
    /// Degrees per pixel along (x, y).
    pub cdelt: [f64; 2],
}

impl SkyTransform {
    /// Creates a transform from its WCS parameters.
    #[must_use]
    pub fn new(crpix: [f64; 2], crval: [f64; 2], cdelt: [f64; 2]) -> Self {
        Self {
            crpix,
            crval,
            cdelt,
        }
    }

    /// The celestial aim point (RA, Dec) in degrees.
    #[must_use]
    pub fn aim_point(&self) -> Point2 {
        Point2::new(self.crval[0], self.crval[1])
    }

    /// Maps a planar point to celestial (RA, Dec) degrees.
    #[must_use]
    pub fn forward(&self, plane: &Point2) -> Point2 {
        // Intermediate tangent-plane coordinates in radians.
        let xi = ((plane.x - self.crpix[0]) * self.cdelt[0]).to_radians();
        let eta = ((plane.y - self.crpix[1]) * self.cdelt[1]).to_radians();

        let ra0 = self.crval[0].to_radians();
        let dec0 = self.crval[1].to_radians();
        let (sin_dec0, cos_dec0) = dec0.sin_cos();

        let denom = cos_dec0 - eta * sin_dec0;
        let ra = ra0 + xi.atan2(denom);
        let dec = ((sin_dec0 + eta * cos_dec0)
            / (1.0 + xi * xi + eta * eta).sqrt())
        .asin();

        let mut ra_deg = ra.to_degrees();
        if ra_deg < 0.0 {
            ra_deg += 360.0;
        } else if ra_deg >= 360.0 {
            ra_deg -= 360.0;
        }
        Point2::new(ra_deg, dec.to_degrees())
    }

    /// Maps a celestial (RA, Dec) degrees point into this observation's
    /// planar frame.
    ///
    /// Applying this to contours produced under another observation's
    /// sky projection expresses them in this observation's planar frame,
    /// provided both observations share the projection convention. The
    /// tangent points may differ; no further coordinate-system
    /// reconciliation is performed.
    #[must_use]
    pub fn invert(&self, sky: &Point2) -> Point2 {
        let ra = sky.x.to_radians();
        let dec = sky.y.to_radians();
        let ra0 = self.crval[0].to_radians();
        let dec0 = self.crval[1].to_radians();

        let (sin_dec, cos_dec) = dec.sin_cos();
        let (sin_dec0, cos_dec0) = dec0.sin_cos();
        let (sin_dra, cos_dra) = (ra - ra0).sin_cos();

        let denom = sin_dec * sin_dec0 + cos_dec * cos_dec0 * cos_dra;
        let xi = cos_dec * sin_dra / denom;
        let eta = (sin_dec * cos_dec0 - cos_dec * sin_dec0 * cos_dra) / denom;

        Point2::new(
            self.crpix[0] + xi.to_degrees() / self.cdelt[0],
            self.crpix[1] + eta.to_degrees() / self.cdelt[1],
        )
    }
}
