//! Frame metadata record and its JSON sidecar.
//!
//! [`FrameMetadata`] is what an extraction returns and what the sidecar file
//! holds. The sidecar is pretty-printed with four-space indentation and keys
//! in a fixed order:
//!
//! ```json
//! {
//!     "original_format": "GIF",
//!     "output_format": "GIF",
//!     "size": [
//!         64,
//!         48
//!     ],
//!     "n_frames": 2,
//!     "frame_duration": [
//!         100,
//!         100
//!     ],
//!     "average_fps": 10.0
//! }
//! ```

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::FrameInfoError;
use crate::timing::TimingStatistics;

/// Output format name written into every record.
pub const OUTPUT_FORMAT: &str = "GIF";

/// Timing and geometry of one animated image.
///
/// Field order is the key order of the JSON sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use]
pub struct FrameMetadata {
    /// Format of the input as reported by the decoder (e.g. `"GIF"`, `"WEBP"`).
    pub original_format: String,
    /// Format of the re-encoded copy. Always `"GIF"`.
    pub output_format: String,
    /// Canvas size as `[width, height]` in pixels.
    pub size: (u32, u32),
    /// Number of frames decoded.
    pub n_frames: usize,
    /// Per-frame display time in milliseconds, in frame order.
    pub frame_duration: Vec<u32>,
    /// `1000 / mean(frame_duration)`, rounded to two decimal places.
    pub average_fps: f64,
    /// Indices of frames whose duration was substituted by the fallback.
    ///
    /// Not part of the sidecar.
    #[serde(skip)]
    pub defaulted_frames: Vec<usize>,
}

impl FrameMetadata {
    /// Canvas width in pixels.
    pub fn width(&self) -> u32 {
        self.size.0
    }

    /// Canvas height in pixels.
    pub fn height(&self) -> u32 {
        self.size.1
    }

    /// Spread of the frame durations, or `None` if there are no frames.
    pub fn timing_statistics(&self) -> Option<TimingStatistics> {
        TimingStatistics::from_durations(&self.frame_duration)
    }

    /// Serialise to the sidecar text.
    pub fn to_json_string(&self) -> Result<String, FrameInfoError> {
        let mut buffer = Vec::new();
        self.write_json(&mut buffer)?;
        String::from_utf8(buffer).map_err(|error| {
            FrameInfoError::IoError(io::Error::new(io::ErrorKind::InvalidData, error))
        })
    }

    /// Serialise to any writer with four-space indentation.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), FrameInfoError> {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)?;
        Ok(())
    }

    /// Write the sidecar file, replacing any existing file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), FrameInfoError> {
        let path = path.as_ref();
        log::debug!("Writing metadata sidecar {}", path.display());

        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a sidecar file back.
    ///
    /// `defaulted_frames` is empty in the result since the sidecar does not
    /// record it.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, FrameInfoError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
