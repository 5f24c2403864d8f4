//! End-to-end stack combination and single-observation checking.
//!
//! A "combine" operation produces one combined footprint file per
//! stack; a "check" operation produces a verdict for one observation.
//! Each stack is an independent batch job with no shared state, so
//! callers may run many in parallel.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{FovError, OutputExistsError, Result};
use crate::geometry::{Contour, Shape};
use crate::io::{FovRecord, StackFovRecord, StackMap};
use crate::operations::check::{evaluate, ChipSet, Verdict};
use crate::operations::decompose::decompose;
use crate::operations::merge::union;
use crate::operations::reproject::reproject;

/// Result of checking one observation's footprint against its chip
/// layout. Carries everything a diagnostic plot needs; rendering is
/// out of scope here.
#[derive(Debug)]
pub struct CheckReport {
    pub obsid: String,
    pub detnam: String,
    pub timedel: f64,
    pub verdict: Verdict,
    pub shapes: Vec<Shape>,
}

/// Combines the footprints of every observation in a stack into one
/// merged footprint record and writes it to `out_path`.
///
/// Per-observation records are read from `<fov_dir>/<obsid>.fov.json`.
/// The first observation in the stack anchors the planar frame: its
/// planar contours enter the merge directly, every other observation's
/// sky contours are reprojected through the reference transform. The
/// overwrite check runs before any input is read, so a refused job
/// leaves no partial output.
///
/// # Errors
///
/// Returns [`OutputExistsError`] if `out_path` exists and `overwrite`
/// is not set, and otherwise propagates format, merge, and I/O errors
/// annotated with the failing stack or observation and its input path.
pub fn combine_stack(
    fov_dir: &Path,
    stack_map_path: &Path,
    stack: &str,
    out_path: &Path,
    overwrite: bool,
) -> Result<StackFovRecord> {
    if !overwrite && out_path.exists() {
        return Err(OutputExistsError {
            path: out_path.to_path_buf(),
        }
        .into());
    }

    let map = StackMap::load(stack_map_path)?;
    let obsids = map
        .obsids(stack)
        .map_err(|e| FovError::from(e).for_job(stack, stack_map_path))?;
    info!(stack, observations = obsids.len(), "combining stack");

    let mut contours: Vec<Contour> = Vec::new();
    let mut reference = None;
    for obsid in obsids {
        let path = record_path(fov_dir, obsid);
        let record = FovRecord::load(&path).map_err(|e| e.for_job(stack, &path))?;
        let (plane, sky) = record
            .polygon_sets()
            .map_err(|e| e.for_job(obsid, &path))?;

        match &reference {
            None => {
                // The reference observation contributes its native
                // planar contours.
                debug!(%obsid, "using as reference frame");
                contours.extend(plane.contours);
                reference = Some(record.transform.clone());
            }
            Some(transform) => {
                let reprojected = reproject(&sky, transform);
                debug!(%obsid, contours = reprojected.contours.len(), "reprojected");
                contours.extend(reprojected.contours);
            }
        }
    }

    let Some(reference) = reference else {
        // StackMap::parse rejects empty stacks, so this is unreachable
        // for a loaded mapping; keep the typed error anyway.
        return Err(FovError::from(crate::error::FormatError::EmptyStack {
            stack: stack.to_owned(),
        })
        .for_job(stack, stack_map_path));
    };

    let arrangement = union(&contours);
    let shapes =
        decompose(arrangement).map_err(|e| e.for_job(stack, stack_map_path))?;
    info!(stack, shapes = shapes.len(), "merged footprint decomposed");

    let base_obsid = obsids[0].clone();
    let record = StackFovRecord::from_shapes(
        stack,
        base_obsid,
        obsids.to_vec(),
        reference,
        &shapes,
    );
    record.write(out_path, overwrite)?;
    Ok(record)
}

/// Checks one observation's footprint for chip-layout anomalies.
///
/// Reads the record, merges its own planar contours, decomposes the
/// result, and runs the chip-layout heuristic. The report's verdict
/// says whether the caller should render a diagnostic plot.
///
/// # Errors
///
/// Propagates format, merge, and consistency errors annotated with the
/// observation id and input path.
pub fn check_observation(fov_path: &Path) -> Result<CheckReport> {
    let record = FovRecord::load(fov_path)?;
    let obsid = record.obsid.clone();

    let wrap = |e: FovError| e.for_job(&obsid, fov_path);

    let (plane, _) = record.polygon_sets().map_err(wrap)?;
    let chips = ChipSet::parse(&record.detnam, &obsid).map_err(|e| wrap(e.into()))?;

    let arrangement = union(&plane.contours);
    let shapes = decompose(arrangement).map_err(wrap)?;
    let verdict = evaluate(&shapes, &chips, &obsid).map_err(wrap)?;
    debug!(%obsid, ?verdict, "chip-layout check finished");

    Ok(CheckReport {
        obsid,
        detnam: record.detnam,
        timedel: record.timedel,
        verdict,
        shapes,
    })
}

fn record_path(fov_dir: &Path, obsid: &str) -> PathBuf {
    fov_dir.join(format!("{obsid}.fov.json"))
}
