//! Lightweight frame metadata probing.
//!
//! [`FrameProbe`] scans an image and returns its [`FrameMetadata`] without
//! writing the GIF copy or the sidecar. This is useful for inspecting many
//! files (e.g. a directory of animations) before deciding what to convert.
//!
//! For the full conversion, use
//! [`FrameMetadataExtractor`](crate::FrameMetadataExtractor) instead.

use std::path::Path;

use crate::animated_image::AnimatedImage;
use crate::configuration::ExtractOptions;
use crate::error::FrameInfoError;
use crate::extractor::{build_metadata, scan_frames};
use crate::metadata::FrameMetadata;

/// Scan-only metadata reader.
///
/// # Example
///
/// ```no_run
/// use frameinfo::FrameProbe;
///
/// let metadata = FrameProbe::probe("run.gif")?;
/// println!("{} frames, {:?}", metadata.n_frames, metadata.size);
/// # Ok::<(), frameinfo::FrameInfoError>(())
/// ```
#[derive(Debug)]
pub struct FrameProbe;

impl FrameProbe {
    /// Probe an image with default options.
    ///
    /// The returned record is identical to what an extraction would write,
    /// including `output_format = "GIF"`.
    ///
    /// # Errors
    ///
    /// Returns [`FrameInfoError::FileOpen`] if the file cannot be opened,
    /// [`FrameInfoError::FrameDecode`] if a frame fails to decode, or
    /// [`FrameInfoError::NoFrames`] if nothing decodes.
    pub fn probe<P: AsRef<Path>>(path: P) -> Result<FrameMetadata, FrameInfoError> {
        Self::probe_with_options(path, &ExtractOptions::default())
    }

    /// Probe an image honouring the fallback duration, progress callback
    /// and cancellation token of `options`.
    pub fn probe_with_options<P: AsRef<Path>>(
        path: P,
        options: &ExtractOptions,
    ) -> Result<FrameMetadata, FrameInfoError> {
        let image = AnimatedImage::open(path)?;
        let scan = scan_frames(&image, options)?;
        build_metadata(&image, scan)
    }

    /// Probe multiple images.
    ///
    /// Files that cannot be probed produce an `Err` entry in the result
    /// vector rather than aborting the entire batch.
    pub fn probe_many<P: AsRef<Path>>(paths: &[P]) -> Vec<Result<FrameMetadata, FrameInfoError>> {
        paths.iter().map(|path| Self::probe(path)).collect()
    }
}
