//! Extraction configuration.
//!
//! [`ExtractOptions`] is a builder that threads the fallback frame duration,
//! GIF output settings, progress callbacks, and cancellation tokens through
//! the extractor without polluting every function signature.
//! [`ExtractPaths`] names the input file and the two files an extraction
//! writes.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use frameinfo::{CancellationToken, ExtractOptions, GifOptions};
//!
//! let token = CancellationToken::new();
//! let options = ExtractOptions::new()
//!     .with_default_frame_duration(Duration::from_millis(80))
//!     .with_gif_options(GifOptions::new().repeat(Some(3)))
//!     .with_cancellation(token.clone());
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::gif::GifOptions;
use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};

/// Duration substituted for frames that carry no delay metadata.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(100);

/// Where an extraction reads from and writes to.
///
/// Each path has exactly one role: `input` is the source image,
/// `output_image` receives the re-encoded GIF and `output_json` receives the
/// metadata sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractPaths {
    /// Source image to scan.
    pub input: PathBuf,
    /// Destination for the re-encoded GIF copy.
    pub output_image: PathBuf,
    /// Destination for the JSON metadata sidecar.
    pub output_json: PathBuf,
}

impl ExtractPaths {
    /// Create a path set from three explicit paths.
    pub fn new<I, O, J>(input: I, output_image: O, output_json: J) -> Self
    where
        I: AsRef<Path>,
        O: AsRef<Path>,
        J: AsRef<Path>,
    {
        Self {
            input: input.as_ref().to_path_buf(),
            output_image: output_image.as_ref().to_path_buf(),
            output_json: output_json.as_ref().to_path_buf(),
        }
    }

    /// Derive output paths from the input's file stem.
    ///
    /// `assets/run.webp` with `output_directory = "out"` yields `out/run.gif`
    /// and `out/run.json`. Inputs without a usable stem fall back to
    /// `output`.
    pub fn derived<I, D>(input: I, output_directory: D) -> Self
    where
        I: AsRef<Path>,
        D: AsRef<Path>,
    {
        let input = input.as_ref();
        let stem = input
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .unwrap_or("output");
        let directory = output_directory.as_ref();

        Self {
            input: input.to_path_buf(),
            output_image: directory.join(format!("{stem}.gif")),
            output_json: directory.join(format!("{stem}.json")),
        }
    }
}

/// Configuration for extraction and probing.
///
/// All fields have sensible defaults; a default-constructed value behaves
/// like the plain [`crate::extract`] function.
#[derive(Clone)]
pub struct ExtractOptions {
    /// Duration used when a frame carries no delay. Never zero.
    pub(crate) default_frame_duration: Duration,
    /// Settings for the re-encoded GIF.
    pub(crate) gif: GifOptions,
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Cancellation token. `None` means never cancelled.
    pub(crate) cancellation: Option<CancellationToken>,
    /// How often to fire the progress callback (every N frames).
    pub(crate) batch_size: u64,
}

impl Debug for ExtractOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExtractOptions")
            .field("default_frame_duration", &self.default_frame_duration)
            .field("gif", &self.gif)
            .field("has_cancellation", &self.cancellation.is_some())
            .field("batch_size", &self.batch_size)
            .finish()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Create a new configuration with default settings.
    ///
    /// Defaults: 100 ms fallback duration, infinitely looping GIF, no
    /// progress callback, no cancellation, batch size 1.
    pub fn new() -> Self {
        Self {
            default_frame_duration: DEFAULT_FRAME_DURATION,
            gif: GifOptions::default(),
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            batch_size: 1,
        }
    }

    /// Set the duration substituted for frames without delay metadata.
    ///
    /// Clamped to a minimum of one millisecond so the average frame rate
    /// stays finite.
    #[must_use]
    pub fn with_default_frame_duration(mut self, duration: Duration) -> Self {
        self.default_frame_duration = duration.max(Duration::from_millis(1));
        self
    }

    /// Set the output GIF configuration.
    #[must_use]
    pub fn with_gif_options(mut self, gif: GifOptions) -> Self {
        self.gif = gif;
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token.
    ///
    /// When the token is cancelled, the next frame boundary returns
    /// [`FrameInfoError::Cancelled`](crate::FrameInfoError::Cancelled).
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Set how often the progress callback fires. Clamped to at least 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// The fallback duration in whole milliseconds.
    pub fn default_frame_duration_ms(&self) -> u32 {
        u32::try_from(self.default_frame_duration.as_millis())
            .unwrap_or(u32::MAX)
            .max(1)
    }

    /// The output GIF configuration.
    pub fn gif_options(&self) -> &GifOptions {
        &self.gif
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
