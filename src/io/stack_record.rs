//! Combined-footprint output records.
//!
//! The merged result of a stack is flattened into one row per contour,
//! grouped by a 1-based component id shared between an outer boundary
//! and its holes. The reference observation's transform rides along so
//! celestial coordinates can be regenerated from the planar output.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{FovError, OutputExistsError, Result};
use crate::geometry::{Contour, Shape, SkyTransform};
use crate::io::record::PaddedAxis;

/// Shape tag for an outer boundary row.
const SHAPE_OUTER: &str = "Polygon";
/// Shape tag for a hole row.
const SHAPE_HOLE: &str = "!Polygon";

/// One contour row of a combined footprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackFovRow {
    /// 1-based component id, shared by an outer and its holes.
    pub component: u32,
    /// "Polygon" for an outer boundary, "!Polygon" for a hole.
    pub shape: String,
    /// Vertex count before padding.
    pub nvertex: u32,
    /// Planar (x, y) vertex axes, right-padded to the file maximum.
    pub pos: [PaddedAxis; 2],
}

/// The combined footprint of one stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackFovRecord {
    /// Stack identifier.
    pub stack: String,
    /// Observation whose transform anchors the planar frame.
    pub base_obsid: String,
    /// All member observations of the stack.
    pub obsids: Vec<String>,
    /// Tool that created this record.
    pub creator: String,
    /// Creation date and time, `YYYY-MM-DDTHH:MM:SS` in UTC.
    pub date: String,
    pub transform: SkyTransform,
    pub rows: Vec<StackFovRow>,
}

impl StackFovRecord {
    /// Flattens a decomposed shape list into an output record.
    ///
    /// Rows are padded to the longest contour in the record.
    #[must_use]
    pub fn from_shapes(
        stack: impl Into<String>,
        base_obsid: impl Into<String>,
        obsids: Vec<String>,
        transform: SkyTransform,
        shapes: &[Shape],
    ) -> Self {
        let nmax = shapes
            .iter()
            .flat_map(|s| {
                std::iter::once(s.outer.vertex_count())
                    .chain(s.holes.iter().map(Contour::vertex_count))
            })
            .max()
            .unwrap_or(0);

        let mut rows = Vec::new();
        for (idx, shape) in shapes.iter().enumerate() {
            let component = u32::try_from(idx + 1).unwrap_or(u32::MAX);
            rows.push(contour_row(&shape.outer, component, SHAPE_OUTER, nmax));
            for hole in &shape.holes {
                rows.push(contour_row(hole, component, SHAPE_HOLE, nmax));
            }
        }

        Self {
            stack: stack.into(),
            base_obsid: base_obsid.into(),
            obsids,
            creator: env!("CARGO_PKG_NAME").to_owned(),
            date: Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            transform,
            rows,
        }
    }

    /// Writes the record as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`OutputExistsError`] if `path` exists and `overwrite` is
    /// not set; the check happens before anything is written. I/O and
    /// serialization failures are annotated with the path.
    pub fn write(&self, path: &Path, overwrite: bool) -> Result<()> {
        if !overwrite && path.exists() {
            return Err(OutputExistsError {
                path: path.to_path_buf(),
            }
            .into());
        }

        let file = File::create(path).map_err(|source| FovError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|source| {
            FovError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?;
        info!(stack = %self.stack, path = %path.display(), "wrote combined footprint");
        Ok(())
    }
}

/// Builds one padded output row from a contour.
fn contour_row(contour: &Contour, component: u32, shape: &str, nmax: usize) -> StackFovRow {
    let points = contour.points();
    let mut xs: PaddedAxis = points.iter().map(|p| Some(p.x)).collect();
    let mut ys: PaddedAxis = points.iter().map(|p| Some(p.y)).collect();
    xs.resize(nmax, None);
    ys.resize(nmax, None);
    StackFovRow {
        component,
        shape: shape.to_owned(),
        nvertex: u32::try_from(points.len()).unwrap_or(u32::MAX),
        pos: [xs, ys],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::math::Point2;

    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Contour {
        Contour::new(vec![
            Point2::new(x0, y0),
            Point2::new(x0 + size, y0),
            Point2::new(x0 + size, y0 + size),
            Point2::new(x0, y0 + size),
        ])
    }

    fn test_transform() -> SkyTransform {
        SkyTransform::new([4096.5, 4096.5], [150.0, 2.2], [-1.37e-4, 1.37e-4])
    }

    fn sample_record() -> StackFovRecord {
        let shapes = vec![
            Shape {
                outer: square(0.0, 0.0, 10.0),
                holes: vec![square(2.0, 2.0, 1.0)],
            },
            Shape::new(square(20.0, 0.0, 5.0)),
        ];
        StackFovRecord::from_shapes(
            "acisfJ0001",
            "635",
            vec!["635".into(), "637".into()],
            test_transform(),
            &shapes,
        )
    }

    #[test]
    fn rows_are_grouped_by_component() {
        let record = sample_record();
        assert_eq!(record.rows.len(), 3);

        assert_eq!(record.rows[0].component, 1);
        assert_eq!(record.rows[0].shape, SHAPE_OUTER);
        assert_eq!(record.rows[1].component, 1);
        assert_eq!(record.rows[1].shape, SHAPE_HOLE);
        assert_eq!(record.rows[2].component, 2);
        assert_eq!(record.rows[2].shape, SHAPE_OUTER);
    }

    #[test]
    fn rows_are_padded_to_file_maximum() {
        let record = sample_record();
        let nmax = record.rows[0].pos[0].len();
        assert!(record.rows.iter().all(|r| r.pos[0].len() == nmax));
        assert!(record.rows.iter().all(|r| r.pos[1].len() == nmax));

        // All contours here are squares: 5 vertices closed.
        assert_eq!(nmax, 5);
        assert!(record.rows.iter().all(|r| r.nvertex == 5));
    }

    #[test]
    fn header_carries_stack_metadata() {
        let record = sample_record();
        assert_eq!(record.stack, "acisfJ0001");
        assert_eq!(record.base_obsid, "635");
        assert_eq!(record.obsids, vec!["635".to_owned(), "637".to_owned()]);
        assert_eq!(record.creator, "fovstack");
        assert!(
            chrono::NaiveDateTime::parse_from_str(&record.date, "%Y-%m-%dT%H:%M:%S").is_ok(),
            "date should be an ISO timestamp: {}",
            record.date
        );
    }

    #[test]
    fn refuses_to_overwrite_without_flag() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stack.fov.json");
        let record = sample_record();

        record.write(&path, false).unwrap();
        let err = record.write(&path, false).unwrap_err();
        assert!(matches!(err, FovError::OutputExists(_)));

        // Explicit overwrite succeeds.
        record.write(&path, true).unwrap();
    }

    #[test]
    fn round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stack.fov.json");
        let record = sample_record();
        record.write(&path, false).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: StackFovRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back.rows.len(), record.rows.len());
        assert_eq!(back.transform, record.transform);
    }
}
