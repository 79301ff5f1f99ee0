//! # frameinfo
//!
//! Extract frame timing metadata from animated images and re-save them as
//! GIF alongside a JSON description.
//!
//! `frameinfo` opens an animated (or still) image, walks its frames to read
//! each frame's display duration, computes the average frame rate, writes a
//! re-encoded GIF copy of every frame and a JSON sidecar, powered by the
//! [`image`](https://crates.io/crates/image) and
//! [`gif`](https://crates.io/crates/gif) crates.
//!
//! ## Quick Start
//!
//! ### Convert and describe an animation
//!
//! ```no_run
//! let metadata = frameinfo::extract("assets/run.gif", "run.gif", "run.json").unwrap();
//! println!("{} frames @ {} fps", metadata.n_frames, metadata.average_fps);
//! ```
//!
//! ### Inspect without writing anything
//!
//! ```no_run
//! use frameinfo::FrameProbe;
//!
//! let metadata = FrameProbe::probe("assets/run.webp").unwrap();
//! println!("{:?}", metadata.frame_duration);
//! ```
//!
//! ### Walk frames yourself
//!
//! ```no_run
//! use frameinfo::AnimatedImage;
//!
//! let image = AnimatedImage::open("assets/run.gif").unwrap();
//! let mut frames = image.frames().unwrap();
//! while let Some(frame) = frames.next_frame() {
//!     let frame = frame.unwrap();
//!     println!("frame {}: {:?} ms", frame.index, frame.delay_ms);
//! }
//! ```
//!
//! ## Features
//!
//! - **Format detection** by content: GIF, APNG, animated WebP, and any
//!   still format the `image` crate decodes
//! - **Frame timing**: per-frame durations, average fps rounded to two
//!   decimals, min/max/variable-rate statistics
//! - **Fallback durations**: frames without timing get a configurable
//!   default (100 ms), reported through `log` and the returned record
//! - **Streaming GIF export** with configurable looping and quantiser speed
//! - **JSON sidecar** with a stable key order
//! - **Validation** of records against what GIF can represent
//! - **Progress & cancellation**: cooperative callbacks and
//!   `CancellationToken`

pub mod animated_image;
pub mod configuration;
pub mod error;
pub mod extractor;
pub mod frame_iterator;
pub mod gif;
pub mod metadata;
pub mod probe;
pub mod progress;
pub mod timing;
pub mod validation;

pub use animated_image::AnimatedImage;
pub use configuration::{DEFAULT_FRAME_DURATION, ExtractOptions, ExtractPaths};
pub use error::FrameInfoError;
pub use extractor::{FrameMetadataExtractor, extract};
pub use frame_iterator::{FrameData, FrameIterator};
pub use crate::gif::{GifOptions, GifWriter};
pub use metadata::FrameMetadata;
pub use probe::FrameProbe;
pub use progress::{CancellationToken, OperationType, ProgressCallback, ProgressInfo};
pub use timing::TimingStatistics;
pub use validation::{ValidationReport, validate};
