//! # Job Workspace
//!
//! Per-job working directories keyed by an external identifier. Each job gets
//! the fixed layout the flow has always used (`video.mp4`, `user_photo.jpg`,
//! `output_video_with_audio.mp4`), and the directory is removed in its
//! entirety once the output has been delivered, or the job has failed.

pub mod workspace;

pub use workspace::JobWorkspace;
