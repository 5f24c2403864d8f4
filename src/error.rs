use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the fovstack crate.
#[derive(Debug, Error)]
pub enum FovError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    EmptyResult(#[from] EmptyResultError),

    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    #[error(transparent)]
    OutputExists(#[from] OutputExistsError),

    /// An inner failure annotated with the job (observation or stack)
    /// it belongs to and the input path that triggered it.
    #[error("{id} ({path}): {source}", path = .path.display())]
    Job {
        id: String,
        path: PathBuf,
        #[source]
        source: Box<FovError>,
    },

    #[error("{path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}", path = .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl FovError {
    /// Wraps this error with the failing job identifier and input path,
    /// so a single observation or stack can be re-run without repeating
    /// the whole batch.
    #[must_use]
    pub fn for_job(self, id: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Job {
            id: id.into(),
            path: path.into(),
            source: Box::new(self),
        }
    }
}

/// Malformed or missing data in an input record.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("obsid {obsid}: FOV block contains no contours")]
    EmptyTable { obsid: String },

    #[error("obsid {obsid}: multiple shape types found: {found:?}")]
    MixedShapes { obsid: String, found: Vec<String> },

    #[error("obsid {obsid}: expected shape \"Polygon\", found \"{shape}\"")]
    UnexpectedShape { obsid: String, shape: String },

    #[error(
        "obsid {obsid}: contour {contour} vertex {vertex}: one coordinate \
         is finite and the other is not"
    )]
    CoordinateMismatch {
        obsid: String,
        contour: usize,
        vertex: usize,
    },

    #[error(
        "obsid {obsid}: contour {contour} has only {vertex_count} distinct \
         finite vertices (need at least 3)"
    )]
    DegenerateContour {
        obsid: String,
        contour: usize,
        vertex_count: usize,
    },

    #[error("obsid {obsid}: unexpected detector name \"{detnam}\"")]
    UnexpectedDetector { obsid: String, detnam: String },

    #[error("stack {stack} not found in mapping")]
    UnknownStack { stack: String },

    #[error("stack {stack} has no observations")]
    EmptyStack { stack: String },

    #[error("malformed stack mapping at line {line}")]
    MalformedStackLine { line: usize },
}

/// The polygon union produced no solid contours, so decomposition has
/// nothing to emit.
#[derive(Debug, Error)]
#[error("polygon union produced no solid contours")]
pub struct EmptyResultError;

/// A hole contour could not be assigned to exactly one outer contour.
#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error("hole contour {hole} is contained in no outer contour")]
    OrphanHole { hole: usize },

    #[error("hole contour {hole} is contained in {matches} outer contours")]
    AmbiguousHole { hole: usize, matches: usize },
}

/// The merged footprint has fewer disjoint regions than the detector
/// chip layout demands. This indicates a processing bug rather than a
/// data anomaly, and aborts the job.
#[derive(Debug, Error)]
#[error(
    "obsid {obsid} (DETNAM={detnam}): found {actual} regions, \
     chip layout requires at least {expected}"
)]
pub struct ConsistencyError {
    pub obsid: String,
    pub detnam: String,
    pub actual: usize,
    pub expected: usize,
}

/// The target output path already exists and overwriting was not
/// requested.
#[derive(Debug, Error)]
#[error("output {path} exists and overwrite is not set", path = .path.display())]
pub struct OutputExistsError {
    pub path: PathBuf,
}

/// Convenience type alias for results using [`FovError`].
pub type Result<T> = std::result::Result<T, FovError>;
