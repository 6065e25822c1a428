//! # Chroma-Compositor
//!
//! Replace the green-screen backdrop of a pre-recorded video with a
//! user-supplied photo, keeping the original audio track.
//!
//! This library provides the per-pixel chroma keyer and the frame pipeline
//! that applies it across a whole video, plus the per-job workspace handling
//! the surrounding flow needs.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use chroma_compositor::{config::Config, render::RenderEngine};
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let engine = RenderEngine::new(Config::default());
//! engine.render(
//!     Path::new("video.mp4"),
//!     Path::new("user_photo.jpg"),
//!     Path::new("output_video_with_audio.mp4"),
//! ).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`keying`] - The chroma-key compositor (HSV range mask + replacement)
//! - [`video`] - Video probing, frame extraction and output encoding
//! - [`render`] - The frame pipeline driving a whole render
//! - [`job`] - Per-job working directories and their cleanup contract
//! - [`config`] - Configuration management

pub mod config;
pub mod error;
pub mod job;
pub mod keying;
pub mod render;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{CompositorError, Result},
    job::JobWorkspace,
    render::RenderEngine,
};
