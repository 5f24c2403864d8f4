//! Per-observation footprint records.
//!
//! A record carries one observation's FOV block: a shape tag per
//! contour, the planar (`pos`) and celestial (`eqpos`) vertex arrays
//! padded to a common per-file maximum with non-finite sentinels
//! (`null` in JSON), the plane ↔ sky transform, and the observation
//! metadata used by diagnostics.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{FormatError, FovError, Result};
use crate::geometry::{Contour, Frame, PolygonSet, SkyTransform};
use crate::math::{Point2, TOLERANCE};

/// One padded coordinate axis. `None` and non-finite values are both
/// treated as padding sentinels.
pub type PaddedAxis = Vec<Option<f64>>;

/// One contour row of a FOV block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FovRow {
    /// Shape type tag; only "Polygon" is recognized.
    pub shape: String,
    /// Planar (x, y) vertex axes, right-padded.
    pub pos: [PaddedAxis; 2],
    /// Celestial (RA, Dec) vertex axes in degrees, right-padded.
    pub eqpos: [PaddedAxis; 2],
}

/// One observation's footprint record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FovRecord {
    pub obsid: String,
    /// Detector identifier, e.g. "ACIS-01236".
    pub detnam: String,
    /// Observation cycle tag. Diagnostics only.
    pub cycle: i32,
    /// Frame time increment in seconds. Diagnostics only.
    pub timedel: f64,
    pub transform: SkyTransform,
    pub rows: Vec<FovRow>,
}

impl FovRecord {
    /// Reads a record from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error annotated with the path if the file cannot be
    /// read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| FovError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| FovError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Extracts the closed, finite-only contours of this record in both
    /// frames.
    ///
    /// Padding is stripped pairwise, open contours are closed by
    /// repeating the first vertex, and the result's contours may have
    /// differing vertex counts.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if the record holds no contours, mixes
    /// shape tags, uses a tag other than "Polygon", pairs a finite
    /// coordinate with a non-finite one, or leaves a contour with fewer
    /// than 3 distinct vertices after stripping.
    pub fn polygon_sets(&self) -> Result<(PolygonSet, PolygonSet)> {
        if self.rows.is_empty() {
            return Err(FormatError::EmptyTable {
                obsid: self.obsid.clone(),
            }
            .into());
        }

        let mut tags: Vec<String> = self.rows.iter().map(|r| r.shape.clone()).collect();
        tags.sort();
        tags.dedup();
        if tags.len() > 1 {
            return Err(FormatError::MixedShapes {
                obsid: self.obsid.clone(),
                found: tags,
            }
            .into());
        }
        if tags[0] != "Polygon" {
            return Err(FormatError::UnexpectedShape {
                obsid: self.obsid.clone(),
                shape: tags[0].clone(),
            }
            .into());
        }

        let mut plane = Vec::with_capacity(self.rows.len());
        let mut sky = Vec::with_capacity(self.rows.len());
        for (idx, row) in self.rows.iter().enumerate() {
            plane.push(self.strip_row(&row.pos, idx)?);
            sky.push(self.strip_row(&row.eqpos, idx)?);
        }

        Ok((
            PolygonSet::new(self.obsid.clone(), Frame::Plane, plane),
            PolygonSet::new(self.obsid.clone(), Frame::Sky, sky),
        ))
    }

    /// Strips padding from one contour row and closes the ring.
    fn strip_row(&self, axes: &[PaddedAxis; 2], contour: usize) -> Result<Contour> {
        let n = axes[0].len().max(axes[1].len());
        let mut points = Vec::with_capacity(n);
        for vertex in 0..n {
            let x = cell(&axes[0], vertex);
            let y = cell(&axes[1], vertex);
            match (x, y) {
                (Some(x), Some(y)) => points.push(Point2::new(x, y)),
                (None, None) => {}
                _ => {
                    return Err(FormatError::CoordinateMismatch {
                        obsid: self.obsid.clone(),
                        contour,
                        vertex,
                    }
                    .into())
                }
            }
        }

        // A valid ring needs 3 genuinely distinct vertices; repeated
        // points (the closing vertex, or a back-and-forth ring like
        // A,B,A,B) do not count.
        let distinct = distinct_vertex_count(&points);
        if distinct < 3 {
            return Err(FormatError::DegenerateContour {
                obsid: self.obsid.clone(),
                contour,
                vertex_count: distinct,
            }
            .into());
        }

        Ok(Contour::new(points))
    }
}

/// Reads one padded cell, mapping non-finite values to padding.
fn cell(axis: &PaddedAxis, index: usize) -> Option<f64> {
    axis.get(index).copied().flatten().filter(|v| v.is_finite())
}

/// Counts vertices that are distinct from every earlier vertex, within
/// [`TOLERANCE`]. Quadratic, but contours are small.
fn distinct_vertex_count(points: &[Point2]) -> usize {
    points
        .iter()
        .enumerate()
        .filter(|&(i, p)| {
            points[..i]
                .iter()
                .all(|q| (p.x - q.x).abs() >= TOLERANCE || (p.y - q.y).abs() >= TOLERANCE)
        })
        .count()
}
