//! Frame metadata extraction.
//!
//! [`FrameMetadataExtractor`] runs the whole procedure: open the input, scan
//! every frame for its duration, compute the average frame rate, re-encode
//! the animation as a GIF and write the JSON sidecar. The scan finishes
//! before anything is written, so an input that fails to decode leaves the
//! output paths untouched.
//!
//! # Example
//!
//! ```no_run
//! use frameinfo::{ExtractOptions, ExtractPaths, FrameInfoError, FrameMetadataExtractor};
//!
//! let paths = ExtractPaths::new("assets/run.gif", "run.gif", "run.json");
//! let metadata = FrameMetadataExtractor::new(ExtractOptions::new()).extract(&paths)?;
//! println!("{} frames at {} fps", metadata.n_frames, metadata.average_fps);
//! # Ok::<(), FrameInfoError>(())
//! ```

use std::io::Write;
use std::path::Path;

use crate::{
    animated_image::AnimatedImage,
    configuration::{ExtractOptions, ExtractPaths},
    error::FrameInfoError,
    gif::GifWriter,
    metadata::{FrameMetadata, OUTPUT_FORMAT},
    progress::{OperationType, ProgressTracker},
    timing,
};

/// Result of the first pass over an image.
#[derive(Debug, Clone, Default)]
pub(crate) struct FrameScan {
    /// Effective duration of every frame, in milliseconds.
    pub(crate) durations: Vec<u32>,
    /// Frames whose duration came from the fallback.
    pub(crate) defaulted: Vec<usize>,
}

/// Extracts frame timing metadata and writes the GIF copy and sidecar.
#[derive(Debug, Clone, Default)]
pub struct FrameMetadataExtractor {
    options: ExtractOptions,
}

impl FrameMetadataExtractor {
    /// Create an extractor with the given options.
    pub fn new(options: ExtractOptions) -> Self {
        Self { options }
    }

    /// The options this extractor runs with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }

    /// Open `paths.input` and run the full extraction.
    ///
    /// # Errors
    ///
    /// - [`FrameInfoError::FileOpen`] / [`FrameInfoError::FrameDecode`] when
    ///   the input cannot be decoded (no output is written).
    /// - [`FrameInfoError::NoFrames`] when no frame decodes.
    /// - [`FrameInfoError::UnsupportedDimensions`] when the canvas cannot be
    ///   stored in a GIF (no output is written).
    /// - [`FrameInfoError::OutputIsInput`] when an output path names the
    ///   input file (no output is written).
    /// - [`FrameInfoError::GifEncode`], [`FrameInfoError::IoError`] or
    ///   [`FrameInfoError::Json`] when writing fails.
    /// - [`FrameInfoError::Cancelled`] when the cancellation token fires.
    pub fn extract(&self, paths: &ExtractPaths) -> Result<FrameMetadata, FrameInfoError> {
        let image = AnimatedImage::open(&paths.input)?;
        self.extract_image(&image, &paths.output_image, &paths.output_json)
    }

    /// Run the extraction on an already opened image.
    pub fn extract_image(
        &self,
        image: &AnimatedImage,
        output_image: &Path,
        output_json: &Path,
    ) -> Result<FrameMetadata, FrameInfoError> {
        log::debug!(
            "Extracting {} -> {} + {}",
            image.path().display(),
            output_image.display(),
            output_json.display(),
        );

        let scan = scan_frames(image, &self.options)?;
        let metadata = build_metadata(image, scan)?;

        let (width, height) = image.dimensions();
        if width > crate::gif::MAX_GIF_DIMENSION || height > crate::gif::MAX_GIF_DIMENSION {
            return Err(FrameInfoError::UnsupportedDimensions { width, height });
        }

        for output in [output_image, output_json] {
            if is_same_file(image.path(), output) {
                return Err(FrameInfoError::OutputIsInput {
                    path: output.to_path_buf(),
                });
            }
        }

        export_gif(image, &metadata.frame_duration, output_image, &self.options)?;
        metadata.save_json(output_json)?;

        log::info!(
            "Extracted {} frame(s) at {} fps from {}",
            metadata.n_frames,
            metadata.average_fps,
            image.path().display(),
        );
        Ok(metadata)
    }
}

/// Extract with default options.
///
/// Equivalent to `FrameMetadataExtractor::default().extract(..)`.
pub fn extract<I, O, J>(
    input: I,
    output_image: O,
    output_json: J,
) -> Result<FrameMetadata, FrameInfoError>
where
    I: AsRef<Path>,
    O: AsRef<Path>,
    J: AsRef<Path>,
{
    FrameMetadataExtractor::default().extract(&ExtractPaths::new(input, output_image, output_json))
}

/// Walk every frame once and collect effective durations.
pub(crate) fn scan_frames(
    image: &AnimatedImage,
    options: &ExtractOptions,
) -> Result<FrameScan, FrameInfoError> {
    let default_ms = options.default_frame_duration_ms();
    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::FrameScan,
        None,
        options.batch_size,
    );
    let mut scan = FrameScan::default();

    let mut frames = image.frames()?;
    loop {
        if options.is_cancelled() {
            return Err(FrameInfoError::Cancelled);
        }
        let Some(frame) = frames.next_frame() else {
            break;
        };
        let frame = frame?;

        let (delay, defaulted) = frame.effective_delay_ms(default_ms);
        if defaulted {
            log::debug!(
                "Frame {} has no usable duration ({:?}); using {} ms",
                frame.index,
                frame.delay_ms,
                default_ms,
            );
            scan.defaulted.push(frame.index);
        }
        scan.durations.push(delay);
        tracker.advance(frame.index);
    }
    tracker.finish();

    if !scan.defaulted.is_empty() {
        log::warn!(
            "{} of {} frame(s) in {} carry no duration; assumed {} ms each",
            scan.defaulted.len(),
            scan.durations.len(),
            image.path().display(),
            default_ms,
        );
    }
    log::debug!("Scanned {} frame(s)", scan.durations.len());
    Ok(scan)
}

/// Assemble the record from a completed scan.
pub(crate) fn build_metadata(
    image: &AnimatedImage,
    scan: FrameScan,
) -> Result<FrameMetadata, FrameInfoError> {
    let average_fps = timing::average_fps(&scan.durations)?;
    let (width, height) = image.dimensions();

    Ok(FrameMetadata {
        original_format: image.format_name().to_string(),
        output_format: OUTPUT_FORMAT.to_string(),
        size: (width, height),
        n_frames: scan.durations.len(),
        frame_duration: scan.durations,
        average_fps,
        defaulted_frames: scan.defaulted,
    })
}

/// Second pass: restart at frame 0 and stream every frame into the GIF.
///
/// Once the output file has been created, any failure removes it again. A
/// failure to create the file leaves whatever was at the path untouched.
fn export_gif(
    image: &AnimatedImage,
    durations: &[u32],
    output_image: &Path,
    options: &ExtractOptions,
) -> Result<(), FrameInfoError> {
    let (width, height) = image.dimensions();
    let mut tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::GifExport,
        Some(durations.len() as u64),
        options.batch_size,
    );

    let mut writer = GifWriter::create(output_image, width, height, options.gif_options())?;
    let result = match write_frames(image, durations, &mut writer, options, &mut tracker) {
        Ok(()) => writer.finish().map(|_| ()),
        Err(error) => {
            drop(writer);
            Err(error)
        }
    };

    if let Err(error) = result {
        remove_partial_gif(output_image);
        return Err(error);
    }
    tracker.finish();
    Ok(())
}

fn write_frames<W: Write>(
    image: &AnimatedImage,
    durations: &[u32],
    writer: &mut GifWriter<W>,
    options: &ExtractOptions,
    tracker: &mut ProgressTracker,
) -> Result<(), FrameInfoError> {
    let default_ms = options.default_frame_duration_ms();
    for frame in image.frames()? {
        if options.is_cancelled() {
            return Err(FrameInfoError::Cancelled);
        }
        let frame = frame?;
        let delay = durations.get(frame.index).copied().unwrap_or(default_ms);
        writer.write_frame(&frame.image, delay)?;
        tracker.advance(frame.index);
    }
    Ok(())
}

fn remove_partial_gif(path: &Path) {
    log::debug!("Removing partial GIF {}", path.display());
    if let Err(error) = std::fs::remove_file(path) {
        log::warn!("Failed to remove partial GIF {}: {error}", path.display());
    }
}

/// Whether both paths resolve to the same existing file.
fn is_same_file(left: &Path, right: &Path) -> bool {
    match (std::fs::canonicalize(left), std::fs::canonicalize(right)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}
