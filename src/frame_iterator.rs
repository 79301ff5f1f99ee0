//! Lazy, pull-based frame iterator.
//!
//! [`FrameIterator`] decodes frames on demand: each call to
//! [`next_frame`](FrameIterator::next_frame) decodes exactly one frame, and
//! `None` marks the end of the sequence. Reaching the end is not an error.
//!
//! Create a `FrameIterator` via [`AnimatedImage::frames`](crate::AnimatedImage::frames).
//!
//! # Example
//!
//! ```no_run
//! use frameinfo::AnimatedImage;
//!
//! let image = AnimatedImage::open("run.gif")?;
//! for frame in image.frames()? {
//!     let frame = frame?;
//!     frame.image.save(format!("frame_{}.png", frame.index))?;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use image::{Frames, ImageFormat, RgbaImage};

use crate::error::FrameInfoError;

/// One decoded frame.
#[derive(Debug, Clone)]
pub struct FrameData {
    /// Zero-based position in the animation.
    pub index: usize,
    /// Display time in milliseconds as stored in the file.
    ///
    /// `None` when the format carries no timing for this frame (still
    /// images). Animated formats report `Some`, possibly `Some(0)`.
    ///
    /// The decoder reports a GIF frame without a graphic control extension
    /// as `Some(0)`, the same as an explicit zero delay. Both are treated as
    /// missing by [`effective_delay_ms`](FrameData::effective_delay_ms), so
    /// an explicit zero is recorded as the fallback duration, not as 0.
    pub delay_ms: Option<u32>,
    /// The fully composited canvas for this frame.
    pub image: RgbaImage,
}

impl FrameData {
    /// The delay to use for this frame, falling back to `default_ms` when
    /// the file has no usable value.
    ///
    /// Returns the delay and whether the fallback was applied. Zero delays
    /// count as missing.
    pub fn effective_delay_ms(&self, default_ms: u32) -> (u32, bool) {
        match self.delay_ms {
            Some(delay) if delay > 0 => (delay, false),
            _ => (default_ms, true),
        }
    }
}

pub(crate) enum FrameSource<'a> {
    Animated(Frames<'a>),
    Still {
        data: &'a [u8],
        format: ImageFormat,
        consumed: bool,
    },
}

/// A lazy iterator over the frames of an [`AnimatedImage`](crate::AnimatedImage).
///
/// The iterator borrows the image, so the encoded bytes stay alive while it
/// runs. After the first error it yields nothing further.
pub struct FrameIterator<'a> {
    source: FrameSource<'a>,
    next_index: usize,
    done: bool,
}

impl<'a> FrameIterator<'a> {
    pub(crate) fn new(source: FrameSource<'a>) -> Self {
        Self {
            source,
            next_index: 0,
            done: false,
        }
    }

    /// Decode the next frame.
    ///
    /// Returns `None` once the sequence is exhausted or after an error has
    /// been returned.
    pub fn next_frame(&mut self) -> Option<Result<FrameData, FrameInfoError>> {
        if self.done {
            return None;
        }

        let index = self.next_index;
        let result = match &mut self.source {
            FrameSource::Animated(frames) => match frames.next() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Ok(frame)) => {
                    let (numerator, denominator) = frame.delay().numer_denom_ms();
                    let delay = if denominator == 0 {
                        0
                    } else {
                        (numerator as f64 / denominator as f64).round() as u32
                    };
                    Ok(FrameData {
                        index,
                        delay_ms: Some(delay),
                        image: frame.into_buffer(),
                    })
                }
                Some(Err(error)) => Err(FrameInfoError::FrameDecode {
                    index,
                    reason: error.to_string(),
                }),
            },
            FrameSource::Still {
                data,
                format,
                consumed,
            } => {
                if *consumed {
                    return None;
                }
                *consumed = true;
                image::load_from_memory_with_format(*data, *format)
                    .map(|decoded| FrameData {
                        index,
                        delay_ms: None,
                        image: decoded.to_rgba8(),
                    })
                    .map_err(|error| FrameInfoError::FrameDecode {
                        index,
                        reason: error.to_string(),
                    })
            }
        };

        match &result {
            Ok(_) => self.next_index += 1,
            Err(_) => self.done = true,
        }
        Some(result)
    }

    /// Number of frames yielded so far.
    pub fn position(&self) -> usize {
        self.next_index
    }
}

impl Iterator for FrameIterator<'_> {
    type Item = Result<FrameData, FrameInfoError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame()
    }
}
