//! Animated GIF re-encoding.
//!
//! This module provides [`GifOptions`] for configuring the GIF copy and the
//! streaming [`GifWriter`] used by
//! [`FrameMetadataExtractor`](crate::FrameMetadataExtractor). Frames are
//! written one at a time, so the whole animation never has to sit in memory.
//!
//! # Example
//!
//! ```no_run
//! use frameinfo::{AnimatedImage, FrameInfoError, GifOptions, GifWriter};
//!
//! let image = AnimatedImage::open("run.webp")?;
//! let (width, height) = image.dimensions();
//! let mut writer = GifWriter::create("run.gif", width, height, &GifOptions::new())?;
//! for frame in image.frames()? {
//!     let frame = frame?;
//!     writer.write_frame(&frame.image, frame.delay_ms.unwrap_or(100))?;
//! }
//! writer.finish()?;
//! # Ok::<(), FrameInfoError>(())
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use gif::{Encoder, Frame, Repeat};
use image::{RgbaImage, imageops};

use crate::error::FrameInfoError;

/// Largest canvas edge a GIF can describe.
pub const MAX_GIF_DIMENSION: u32 = u16::MAX as u32;

/// Configuration for the re-encoded GIF.
///
/// Controls looping and how hard the colour quantiser works.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifOptions {
    /// How many times the GIF should repeat. `None` means loop forever.
    pub repeat: Option<u16>,
    /// Quantiser speed, 1 (best quality) to 30 (fastest). Default 10.
    pub speed: i32,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            repeat: None,
            speed: 10,
        }
    }
}

impl GifOptions {
    /// Create a new [`GifOptions`] with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the repeat count. `None` means loop forever.
    #[must_use]
    pub fn repeat(mut self, repeat: Option<u16>) -> Self {
        self.repeat = repeat;
        self
    }

    /// Set the quantiser speed. Clamped to `1..=30`.
    #[must_use]
    pub fn speed(mut self, speed: i32) -> Self {
        self.speed = speed.clamp(1, 30);
        self
    }
}

/// Convert a millisecond delay to GIF centiseconds.
///
/// Rounds to the nearest centisecond. Non-zero delays never collapse to
/// zero.
pub fn delay_to_centiseconds(delay_ms: u32) -> u16 {
    if delay_ms == 0 {
        return 0;
    }
    let centiseconds = delay_ms.saturating_add(5) / 10;
    u16::try_from(centiseconds).unwrap_or(u16::MAX).max(1)
}

/// Streaming animated GIF encoder bound to a file.
pub struct GifWriter<W: Write = BufWriter<File>> {
    encoder: Encoder<W>,
    width: u16,
    height: u16,
    speed: i32,
    frames_written: usize,
}

impl GifWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and prepare to write a `width`×`height`
    /// animation.
    ///
    /// # Errors
    ///
    /// Returns [`FrameInfoError::UnsupportedDimensions`] if either edge
    /// exceeds [`MAX_GIF_DIMENSION`], or an I/O / encoding error.
    pub fn create<P: AsRef<Path>>(
        path: P,
        width: u32,
        height: u32,
        options: &GifOptions,
    ) -> Result<Self, FrameInfoError> {
        log::debug!(
            "Creating GIF file {:?} ({}x{}, repeat={:?}, speed={})",
            path.as_ref(),
            width,
            height,
            options.repeat,
            options.speed,
        );
        check_dimensions(width, height)?;
        let file = File::create(path.as_ref())?;
        Self::new(BufWriter::new(file), width, height, options)
    }
}

impl<W: Write> GifWriter<W> {
    /// Prepare to write an animation into any writer.
    pub fn new(
        writer: W,
        width: u32,
        height: u32,
        options: &GifOptions,
    ) -> Result<Self, FrameInfoError> {
        check_dimensions(width, height)?;
        let (width, height) = (width as u16, height as u16);

        let mut encoder = Encoder::new(writer, width, height, &[])?;
        let repeat = match options.repeat {
            None => Repeat::Infinite,
            Some(n) => Repeat::Finite(n),
        };
        encoder.set_repeat(repeat)?;

        Ok(Self {
            encoder,
            width,
            height,
            speed: options.speed.clamp(1, 30),
            frames_written: 0,
        })
    }

    /// Quantise and append one frame shown for `delay_ms` milliseconds.
    ///
    /// Frames whose size differs from the canvas are placed at the top-left
    /// corner, cropped to the canvas.
    pub fn write_frame(&mut self, image: &RgbaImage, delay_ms: u32) -> Result<(), FrameInfoError> {
        let (canvas_width, canvas_height) = (u32::from(self.width), u32::from(self.height));
        let mut pixels = if image.dimensions() == (canvas_width, canvas_height) {
            image.as_raw().clone()
        } else {
            let mut canvas = RgbaImage::new(canvas_width, canvas_height);
            imageops::replace(&mut canvas, image, 0, 0);
            canvas.into_raw()
        };

        let mut frame = Frame::from_rgba_speed(self.width, self.height, &mut pixels, self.speed);
        frame.delay = delay_to_centiseconds(delay_ms);

        self.encoder.write_frame(&frame)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Number of frames appended so far.
    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// Write the GIF trailer and flush, returning the inner writer.
    pub fn finish(self) -> Result<W, FrameInfoError> {
        log::debug!("Finishing GIF with {} frame(s)", self.frames_written);
        let mut writer = self.encoder.into_inner()?;
        writer.flush()?;
        Ok(writer)
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), FrameInfoError> {
    if width == 0 || height == 0 || width > MAX_GIF_DIMENSION || height > MAX_GIF_DIMENSION {
        return Err(FrameInfoError::UnsupportedDimensions { width, height });
    }
    Ok(())
}
