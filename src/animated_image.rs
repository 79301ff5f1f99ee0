//! Core [`AnimatedImage`] handle.
//!
//! `AnimatedImage` is the decoder-side entry point of the crate. It reads an
//! image file, detects its format from the content, caches the canvas
//! dimensions, and hands out [`FrameIterator`]s that walk the frames from
//! the beginning.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    io::Cursor,
    path::{Path, PathBuf},
};

use image::{
    AnimationDecoder, ImageDecoder, ImageFormat, ImageReader,
    codecs::{gif::GifDecoder, png::PngDecoder, webp::WebPDecoder},
};

use crate::{
    error::FrameInfoError,
    frame_iterator::{FrameIterator, FrameSource},
};

/// How frames are pulled out of the encoded bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SourceKind {
    Gif,
    Apng,
    AnimatedWebp,
    /// Any format decoded as exactly one frame.
    Still,
}

/// An opened image file, ready for frame iteration.
///
/// The encoded bytes are held in memory so that [`frames`](AnimatedImage::frames)
/// can restart from frame 0 any number of times without touching the file
/// again.
///
/// # Example
///
/// ```no_run
/// use frameinfo::{AnimatedImage, FrameInfoError};
///
/// let image = AnimatedImage::open("run.gif")?;
/// println!("{} {:?}", image.format_name(), image.dimensions());
///
/// let mut frames = image.frames()?;
/// while let Some(frame) = frames.next_frame() {
///     let frame = frame?;
///     println!("frame {} lasts {:?} ms", frame.index, frame.delay_ms);
/// }
/// # Ok::<(), FrameInfoError>(())
/// ```
pub struct AnimatedImage {
    path: PathBuf,
    data: Vec<u8>,
    format: ImageFormat,
    kind: SourceKind,
    width: u32,
    height: u32,
}

impl Debug for AnimatedImage {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AnimatedImage")
            .field("path", &self.path)
            .field("format", &self.format)
            .field("kind", &self.kind)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("byte_len", &self.data.len())
            .finish()
    }
}

impl AnimatedImage {
    /// Open an image file and detect its format.
    ///
    /// # Errors
    ///
    /// Returns [`FrameInfoError::FileOpen`] if the file is missing,
    /// unreadable, or not an image format the decoder recognises.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FrameInfoError> {
        let path = path.as_ref().to_path_buf();
        log::debug!("Opening image file: {}", path.display());

        let data = std::fs::read(&path).map_err(|error| FrameInfoError::FileOpen {
            path: path.clone(),
            reason: error.to_string(),
        })?;

        Self::from_bytes(path, data)
    }

    /// Wrap already-loaded encoded bytes.
    ///
    /// `path` is only used for error messages and [`path`](AnimatedImage::path).
    pub fn from_bytes<P: AsRef<Path>>(path: P, data: Vec<u8>) -> Result<Self, FrameInfoError> {
        let path = path.as_ref().to_path_buf();
        let open_error = |reason: String| FrameInfoError::FileOpen {
            path: path.clone(),
            reason,
        };

        let format = image::guess_format(&data).map_err(|error| open_error(error.to_string()))?;
        let (kind, (width, height)) =
            inspect(&data, format).map_err(|error| open_error(error.to_string()))?;

        log::debug!(
            "Detected {} ({:?}) {}x{} in {}",
            format_name(format),
            kind,
            width,
            height,
            path.display(),
        );

        Ok(Self {
            path,
            data,
            format,
            kind,
            width,
            height,
        })
    }

    /// Path the image was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The detected container format.
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Format name as reported by the decoder, e.g. `"GIF"` or `"WEBP"`.
    pub fn format_name(&self) -> &'static str {
        format_name(self.format)
    }

    /// Canvas size as `(width, height)` in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the input carries an animation (GIF, APNG, or animated WebP).
    ///
    /// A GIF is always treated as animated, even with a single frame.
    pub fn is_animated(&self) -> bool {
        self.kind != SourceKind::Still
    }

    /// Start a new pass over the frames, positioned at frame 0.
    ///
    /// # Errors
    ///
    /// Returns [`FrameInfoError::FrameDecode`] if the decoder cannot be
    /// re-created for the stored bytes.
    pub fn frames(&self) -> Result<FrameIterator<'_>, FrameInfoError> {
        let decode_error = |error: image::ImageError| FrameInfoError::FrameDecode {
            index: 0,
            reason: error.to_string(),
        };
        let reader = Cursor::new(self.data.as_slice());

        let source = match self.kind {
            SourceKind::Gif => {
                FrameSource::Animated(GifDecoder::new(reader).map_err(decode_error)?.into_frames())
            }
            SourceKind::Apng => FrameSource::Animated(
                PngDecoder::new(reader)
                    .and_then(|decoder| decoder.apng())
                    .map_err(decode_error)?
                    .into_frames(),
            ),
            SourceKind::AnimatedWebp => {
                FrameSource::Animated(WebPDecoder::new(reader).map_err(decode_error)?.into_frames())
            }
            SourceKind::Still => FrameSource::Still {
                data: self.data.as_slice(),
                format: self.format,
                consumed: false,
            },
        };

        Ok(FrameIterator::new(source))
    }
}

/// Work out how to iterate `data` and read its canvas size.
fn inspect(data: &[u8], format: ImageFormat) -> image::ImageResult<(SourceKind, (u32, u32))> {
    match format {
        ImageFormat::Gif => {
            let decoder = GifDecoder::new(Cursor::new(data))?;
            Ok((SourceKind::Gif, decoder.dimensions()))
        }
        ImageFormat::Png => {
            let decoder = PngDecoder::new(Cursor::new(data))?;
            let kind = if decoder.is_apng()? {
                SourceKind::Apng
            } else {
                SourceKind::Still
            };
            Ok((kind, decoder.dimensions()))
        }
        ImageFormat::WebP => {
            let decoder = WebPDecoder::new(Cursor::new(data))?;
            let kind = if decoder.has_animation() {
                SourceKind::AnimatedWebp
            } else {
                SourceKind::Still
            };
            Ok((kind, decoder.dimensions()))
        }
        other => {
            let dimensions = ImageReader::with_format(Cursor::new(data), other).into_dimensions()?;
            Ok((SourceKind::Still, dimensions))
        }
    }
}

/// Upper-case format name in the style image tools report it.
pub(crate) fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Gif => "GIF",
        ImageFormat::Png => "PNG",
        ImageFormat::WebP => "WEBP",
        ImageFormat::Jpeg => "JPEG",
        ImageFormat::Bmp => "BMP",
        ImageFormat::Tiff => "TIFF",
        ImageFormat::Ico => "ICO",
        ImageFormat::Avif => "AVIF",
        ImageFormat::Tga => "TGA",
        ImageFormat::Pnm => "PNM",
        ImageFormat::Hdr => "HDR",
        ImageFormat::OpenExr => "EXR",
        ImageFormat::Farbfeld => "FARBFELD",
        ImageFormat::Qoi => "QOI",
        _ => "UNKNOWN",
    }
}
