//! # Video Processing Module
//!
//! Handles video probing, frame extraction, and output generation through the
//! external FFmpeg binaries.

pub mod encoder;
pub mod probe;
pub mod types;

pub use encoder::VideoEncoder;
pub use probe::VideoLoader;
pub use types::{Frame, OutputParams, VideoMetadata};
