use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use tokio::task;
use tracing::{debug, info, warn};

use crate::error::{Result, VideoError};
use crate::video::types::OutputParams;

/// Reassembles keyed frames into an output video using external FFmpeg
///
/// Encoding runs in two passes the way the original flow did: a video-only
/// encode from the frame dump, then a mux that carries the source's audio
/// track over into the final file.
pub struct VideoEncoder {
    params: OutputParams,
}

impl VideoEncoder {
    pub fn new(params: OutputParams) -> Self {
        Self { params }
    }

    /// Encode an ordered list of frame images into a video-only file
    pub async fn encode_frames(
        &self,
        frame_paths: &[PathBuf],
        fps: f64,
        output_path: &Path,
    ) -> Result<()> {
        if frame_paths.is_empty() {
            return Err(VideoError::EncodingFailed {
                reason: "No frames to encode".to_string(),
            }
            .into());
        }

        let list_path = output_path.with_extension("txt");
        self.create_frame_list(frame_paths, fps, &list_path)?;

        let mut cmd = Command::new("ffmpeg");
        cmd.args([
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
            &list_path.display().to_string(),
            "-c:v",
            &self.params.codec,
            "-r",
            &fps.to_string(),
            "-pix_fmt",
            "yuv420p",
            "-crf",
            &self.quality_to_crf(self.params.quality).to_string(),
            "-y",
            &output_path.display().to_string(),
        ]);

        debug!("Encoding {} frames at {:.2} fps", frame_paths.len(), fps);
        self.run_ffmpeg(cmd, output_path).await?;

        info!("Encoded video-only file: {:?}", output_path);
        Ok(())
    }

    /// Mux the processed video stream with the source video's audio track
    ///
    /// The video stream is copied as-is; audio is re-encoded with the
    /// configured lossy codec. A source without an audio track still produces
    /// a (silent) output.
    pub async fn mux_audio(
        &self,
        video_path: &Path,
        source_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        let mut cmd = Command::new("ffmpeg");
        cmd.args([
            "-i",
            &video_path.display().to_string(),
            "-i",
            &source_path.display().to_string(),
            "-map",
            "0:v:0",
            "-map",
            "1:a:0?",
            "-c:v",
            "copy",
            "-c:a",
            &self.params.audio_codec,
            "-shortest",
            "-y",
            &output_path.display().to_string(),
        ]);

        debug!("Muxing audio from {:?}", source_path);
        self.run_ffmpeg(cmd, output_path).await?;

        info!("Output written: {:?}", output_path);
        Ok(())
    }

    /// Run an FFmpeg command, removing any partially written output on failure
    async fn run_ffmpeg(&self, mut cmd: Command, output_path: &Path) -> Result<()> {
        let output = task::spawn_blocking(move || cmd.output())
            .await
            .map_err(|e| VideoError::EncodingFailed {
                reason: format!("Failed to spawn FFmpeg process: {}", e),
            })?
            .map_err(|e| VideoError::EncodingFailed {
                reason: format!("FFmpeg execution failed: {}", e),
            })?;

        if !output.status.success() {
            if output_path.exists() {
                if let Err(e) = std::fs::remove_file(output_path) {
                    warn!("Failed to remove partial output {:?}: {}", output_path, e);
                }
            }

            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VideoError::EncodingFailed {
                reason: format!("FFmpeg failed: {}", stderr),
            }
            .into());
        }

        Ok(())
    }

    /// Write a concat-demuxer list holding every frame for one frame duration
    fn create_frame_list(
        &self,
        frame_paths: &[PathBuf],
        fps: f64,
        list_path: &Path,
    ) -> Result<()> {
        let mut file = File::create(list_path)?;
        let frame_duration = 1.0 / fps;

        for frame_path in frame_paths {
            let absolute = frame_path
                .canonicalize()
                .unwrap_or_else(|_| frame_path.clone());

            writeln!(file, "file '{}'", absolute.display())?;
            writeln!(file, "duration {:.6}", frame_duration)?;
        }

        // The concat demuxer ignores the last duration unless the final entry
        // is repeated
        if let Some(last) = frame_paths.last() {
            let absolute = last.canonicalize().unwrap_or_else(|_| last.clone());
            writeln!(file, "file '{}'", absolute.display())?;
        }

        Ok(())
    }

    fn quality_to_crf(&self, quality: u8) -> u8 {
        (51 - ((quality.min(100) as f32 / 100.0) * 51.0) as u8).clamp(0, 51)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_quality_to_crf_mapping() {
        let encoder = VideoEncoder::new(OutputParams::default());

        assert_eq!(encoder.quality_to_crf(100), 0);
        assert_eq!(encoder.quality_to_crf(0), 51);
        // Default quality lands in the visually-lossless band
        let crf = encoder.quality_to_crf(85);
        assert!(crf < 18, "crf {} too high for quality 85", crf);
    }

    #[test]
    fn test_create_frame_list_format() {
        let dir = tempdir().unwrap();
        let frames: Vec<PathBuf> = (0..3)
            .map(|i| {
                let path = dir.path().join(format!("frame_{:06}.png", i));
                std::fs::write(&path, b"png").unwrap();
                path
            })
            .collect();

        let list_path = dir.path().join("frames.txt");
        let encoder = VideoEncoder::new(OutputParams::default());
        encoder.create_frame_list(&frames, 25.0, &list_path).unwrap();

        let content = std::fs::read_to_string(&list_path).unwrap();
        let file_lines = content.lines().filter(|l| l.starts_with("file ")).count();
        let duration_lines = content
            .lines()
            .filter(|l| l.starts_with("duration "))
            .count();

        // Three frames plus the repeated final entry
        assert_eq!(file_lines, 4);
        assert_eq!(duration_lines, 3);
        assert!(content.contains("duration 0.040000"));
    }

    #[tokio::test]
    async fn test_encode_rejects_empty_frame_list() {
        let encoder = VideoEncoder::new(OutputParams::default());
        let result = encoder
            .encode_frames(&[], 30.0, Path::new("unused.mp4"))
            .await;
        assert!(result.is_err());
    }
}
