//! Frame timing arithmetic.
//!
//! The average frame rate of an animation is `1000 / mean(frame durations)`,
//! reported rounded to two decimal places. [`TimingStatistics`] adds the
//! spread of the durations, which tells a constant-rate animation apart from
//! one whose frames linger for different lengths of time.
//!
//! # Example
//!
//! ```
//! use frameinfo::timing::{average_fps, TimingStatistics};
//!
//! assert_eq!(average_fps(&[50, 100, 150]).unwrap(), 10.0);
//!
//! let stats = TimingStatistics::from_durations(&[50, 100, 150]).unwrap();
//! assert!(stats.is_variable);
//! ```

use std::time::Duration;

use crate::error::FrameInfoError;

/// Arithmetic mean of the durations in milliseconds, or `None` when empty.
pub fn average_frame_duration(durations_ms: &[u32]) -> Option<f64> {
    if durations_ms.is_empty() {
        return None;
    }
    let total: u64 = durations_ms.iter().map(|&d| u64::from(d)).sum();
    Some(total as f64 / durations_ms.len() as f64)
}

/// Average frames per second, rounded to two decimal places.
///
/// # Errors
///
/// Returns [`FrameInfoError::NoFrames`] when `durations_ms` is empty, and
/// also when every duration is zero, since no finite rate exists then.
pub fn average_fps(durations_ms: &[u32]) -> Result<f64, FrameInfoError> {
    let mean = average_frame_duration(durations_ms).ok_or(FrameInfoError::NoFrames)?;
    if mean <= 0.0 {
        return Err(FrameInfoError::NoFrames);
    }
    Ok(round_to_hundredths(1000.0 / mean))
}

/// Round half away from zero to two decimal places.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Summary of a duration list.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingStatistics {
    /// Sum of all frame durations (one loop of the animation).
    pub total_duration: Duration,
    /// Shortest frame, in milliseconds.
    pub min_duration_ms: u32,
    /// Longest frame, in milliseconds.
    pub max_duration_ms: u32,
    /// Mean frame duration, in milliseconds.
    pub mean_duration_ms: f64,
    /// Frame rate implied by the shortest frame.
    pub max_fps: f64,
    /// Frame rate implied by the longest frame.
    pub min_fps: f64,
    /// `true` when not every frame has the same duration.
    pub is_variable: bool,
}

impl TimingStatistics {
    /// Compute statistics, or `None` for an empty list.
    pub fn from_durations(durations_ms: &[u32]) -> Option<Self> {
        let min = *durations_ms.iter().min()?;
        let max = *durations_ms.iter().max()?;
        let mean = average_frame_duration(durations_ms)?;
        let total: u64 = durations_ms.iter().map(|&d| u64::from(d)).sum();

        let fps_for = |ms: u32| {
            if ms == 0 {
                0.0
            } else {
                round_to_hundredths(1000.0 / f64::from(ms))
            }
        };

        Some(Self {
            total_duration: Duration::from_millis(total),
            min_duration_ms: min,
            max_duration_ms: max,
            mean_duration_ms: mean,
            max_fps: fps_for(min),
            min_fps: fps_for(max),
            is_variable: min != max,
        })
    }
}
