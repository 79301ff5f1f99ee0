//! Error types for the `frameinfo` crate.
//!
//! This module defines [`FrameInfoError`], the unified error type returned by
//! all fallible operations in the crate. Errors carry enough context (file
//! paths, frame indices, upstream messages) to diagnose a failure without
//! additional logging at the call site.

use std::{io::Error as IoError, path::PathBuf};

use image::ImageError;
use serde_json::Error as JsonError;
use thiserror::Error;

/// The unified error type for all `frameinfo` operations.
///
/// Every public method that can fail returns `Result<T, FrameInfoError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FrameInfoError {
    /// The input image could not be opened or its format was not recognised.
    #[error("Failed to open image file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::AnimatedImage::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// A frame could not be decoded partway through the animation.
    #[error("Failed to decode frame {index}: {reason}")]
    FrameDecode {
        /// Zero-based index of the frame that failed.
        index: usize,
        /// Underlying decoder message.
        reason: String,
    },

    /// The input produced no decodable frames, so no frame rate exists.
    #[error("No decodable frames found in image")]
    NoFrames,

    /// The canvas is too large to be written as a GIF.
    #[error("Image dimensions {width}x{height} exceed the GIF limit of 65535x65535")]
    UnsupportedDimensions {
        /// Canvas width in pixels.
        width: u32,
        /// Canvas height in pixels.
        height: u32,
    },

    /// An output path resolves to the input file.
    #[error("Output path {path} is the input file")]
    OutputIsInput {
        /// The offending output path.
        path: PathBuf,
    },

    /// GIF encoding failed.
    #[error("GIF encoding error: {0}")]
    GifEncode(String),

    /// The metadata sidecar could not be serialised or parsed.
    #[error("JSON error: {0}")]
    Json(#[from] JsonError),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate outside of frame decoding.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),

    /// The operation was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,
}

impl From<gif::EncodingError> for FrameInfoError {
    fn from(error: gif::EncodingError) -> Self {
        FrameInfoError::GifEncode(error.to_string())
    }
}
