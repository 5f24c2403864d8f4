//! Detector chip-layout heuristic.
//!
//! Validates a single observation's merged footprint against the
//! region count its active-chip configuration predicts, flagging
//! "small dither" candidates whose footprint fragments into more
//! pieces than the layout explains.

use std::collections::BTreeSet;

use crate::error::{ConsistencyError, FormatError, Result};
use crate::geometry::Shape;

/// Active ACIS CCD chip ids (0-9) for one observation, parsed from its
/// detector identifier string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipSet {
    detnam: String,
    chips: BTreeSet<u8>,
}

impl ChipSet {
    /// Parses a detector name of the form `ACIS-<digits>`.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::UnexpectedDetector`] for a name that does
    /// not start with `ACIS-` or lists anything other than digits.
    pub fn parse(detnam: &str, obsid: &str) -> std::result::Result<Self, FormatError> {
        let unexpected = || FormatError::UnexpectedDetector {
            obsid: obsid.to_owned(),
            detnam: detnam.to_owned(),
        };

        let ids = detnam.strip_prefix("ACIS-").ok_or_else(unexpected)?;
        let mut chips = BTreeSet::new();
        for ch in ids.chars() {
            let digit = ch.to_digit(10).ok_or_else(unexpected)?;
            // to_digit(10) yields 0-9, which always fits in a u8.
            chips.insert(u8::try_from(digit).map_err(|_| unexpected())?);
        }

        Ok(Self {
            detnam: detnam.to_owned(),
            chips,
        })
    }

    /// The detector identifier this set was parsed from.
    #[must_use]
    pub fn detnam(&self) -> &str {
        &self.detnam
    }

    /// Number of disjoint footprint regions this chip configuration
    /// predicts.
    ///
    /// The imaging chips 0-3 abut into one contiguous array, so any of
    /// them contributes a single region. The spectroscopy chips 4-9 lie
    /// in a row; every maximal run of consecutive active ids contributes
    /// one region.
    #[must_use]
    pub fn expected_regions(&self) -> usize {
        let mut expected = usize::from(self.chips.iter().any(|&c| c <= 3));

        let mut within = false;
        for chip in 4..=9 {
            if self.chips.contains(&chip) {
                if !within {
                    expected += 1;
                    within = true;
                }
            } else {
                within = false;
            }
        }
        expected
    }
}

/// Outcome of the chip-layout check for one observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The footprint matches the chip layout.
    Nominal,
    /// The footprint is anomalous and should be routed to the
    /// diagnostic output.
    Diagnostic(DiagnosticReason),
}

/// Why a footprint was routed to the diagnostic output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticReason {
    /// At least one shape encloses a hole; holes are never expected in
    /// this domain, regardless of region counts.
    UnexpectedHoles,
    /// More disjoint regions than the chip layout predicts, e.g. a
    /// small pointing dither fragmenting one chip's footprint.
    ExtraRegions { actual: usize, expected: usize },
}

/// Compares a decomposed footprint against its chip layout.
///
/// Pure decision function: rendering any diagnostic plot is the
/// caller's concern.
///
/// # Errors
///
/// Returns [`ConsistencyError`] if the footprint has fewer regions than
/// the layout demands; that cannot come from a pointing anomaly and is
/// treated as a processing bug.
pub fn evaluate(shapes: &[Shape], chips: &ChipSet, obsid: &str) -> Result<Verdict> {
    if shapes.iter().any(Shape::has_holes) {
        return Ok(Verdict::Diagnostic(DiagnosticReason::UnexpectedHoles));
    }

    let actual = shapes.len();
    let expected = chips.expected_regions();

    if actual < expected {
        return Err(ConsistencyError {
            obsid: obsid.to_owned(),
            detnam: chips.detnam().to_owned(),
            actual,
            expected,
        }
        .into());
    }

    if actual == expected {
        Ok(Verdict::Nominal)
    } else {
        Ok(Verdict::Diagnostic(DiagnosticReason::ExtraRegions {
            actual,
            expected,
        }))
    }
}
