//! Frame metadata validation.
//!
//! [`validate`] inspects a [`FrameMetadata`] record and returns a
//! [`ValidationReport`] describing anything that will not survive the trip
//! into a GIF unchanged.
//!
//! # Example
//!
//! ```no_run
//! use frameinfo::{FrameProbe, validation};
//!
//! let metadata = FrameProbe::probe("run.gif")?;
//! let report = validation::validate(&metadata);
//! if !report.is_valid() {
//!     print!("{report}");
//! }
//! # Ok::<(), frameinfo::FrameInfoError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::gif::MAX_GIF_DIMENSION;
use crate::metadata::FrameMetadata;

/// Delays below this are raised by most browsers and viewers.
pub const MIN_RELIABLE_DELAY_MS: u32 = 20;

/// Summary of metadata validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Informational notices (not problems).
    pub info: Vec<String>,
    /// Non-fatal issues that may change how the GIF plays back.
    pub warnings: Vec<String>,
    /// Fatal issues that prevent a faithful conversion.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// Returns `true` if no errors were found.
    ///
    /// Warnings do not affect this result.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of issues (info + warnings + errors).
    pub fn issue_count(&self) -> usize {
        self.info.len() + self.warnings.len() + self.errors.len()
    }
}

impl Display for ValidationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for item in &self.info {
            writeln!(f, "[INFO] {item}")?;
        }
        for item in &self.warnings {
            writeln!(f, "[WARN] {item}")?;
        }
        for item in &self.errors {
            writeln!(f, "[ERROR] {item}")?;
        }
        if self.issue_count() == 0 {
            writeln!(f, "No issues found.")?;
        }
        Ok(())
    }
}

/// Run validation checks on a metadata record.
pub fn validate(metadata: &FrameMetadata) -> ValidationReport {
    let mut report = ValidationReport::default();
    let (width, height) = metadata.size;

    // ── Geometry ───────────────────────────────────────────────────
    if width == 0 || height == 0 {
        report
            .errors
            .push(format!("Invalid image dimensions: {width}×{height}"));
    } else if width > MAX_GIF_DIMENSION || height > MAX_GIF_DIMENSION {
        report.errors.push(format!(
            "Image dimensions {width}×{height} exceed the GIF limit of {MAX_GIF_DIMENSION}"
        ));
    }

    // ── Frame count ────────────────────────────────────────────────
    if metadata.n_frames == 0 {
        report.errors.push("Image contains no frames".to_string());
    } else if metadata.n_frames == 1 {
        report
            .info
            .push("Single frame: the output will be a still GIF".to_string());
    }

    if metadata.frame_duration.len() != metadata.n_frames {
        report.errors.push(format!(
            "Frame count {} does not match {} recorded durations",
            metadata.n_frames,
            metadata.frame_duration.len(),
        ));
    }

    // ── Durations ──────────────────────────────────────────────────
    if !metadata.defaulted_frames.is_empty() {
        report.warnings.push(format!(
            "{} frame(s) have no stored duration; a default was assumed",
            metadata.defaulted_frames.len(),
        ));
    }

    let short = metadata
        .frame_duration
        .iter()
        .filter(|&&d| d < MIN_RELIABLE_DELAY_MS)
        .count();
    if short > 0 {
        report.warnings.push(format!(
            "{short} frame(s) are shorter than {MIN_RELIABLE_DELAY_MS} ms and may play slower than intended"
        ));
    }

    let imprecise = metadata
        .frame_duration
        .iter()
        .filter(|&&d| d % 10 != 0)
        .count();
    if imprecise > 0 {
        report.warnings.push(format!(
            "{imprecise} frame duration(s) are not multiples of 10 ms and will be rounded in the GIF"
        ));
    }

    if let Some(stats) = metadata.timing_statistics()
        && stats.is_variable
    {
        report.info.push(format!(
            "Variable frame timing: {}–{} ms per frame",
            stats.min_duration_ms, stats.max_duration_ms,
        ));
    }

    report
}
