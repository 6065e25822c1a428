use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tokio::task;
use tracing::{debug, info};

use crate::error::{Result, VideoError};
use crate::video::types::VideoMetadata;

/// Video loader backed by the external `ffmpeg`/`ffprobe` binaries
///
/// All codec work stays outside the process: metadata comes from `ffprobe`,
/// frames are decoded to numbered PNG files by a single `ffmpeg` run so the
/// on-disk order matches the frame order of the container.
pub struct VideoLoader;

impl VideoLoader {
    /// Create a loader, failing up front when FFmpeg is not installed
    pub fn new() -> Result<Self> {
        if !Self::check_ffmpeg_available() {
            return Err(VideoError::LoadFailed {
                path: "FFmpeg not found. Please install FFmpeg.".to_string(),
            }
            .into());
        }

        debug!("Initialized video loader with external FFmpeg");
        Ok(Self)
    }

    pub fn check_ffmpeg_available() -> bool {
        Command::new("ffmpeg")
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false)
    }

    /// Probe the container for width, height, frame rate and duration
    ///
    /// Unreadable dimensions or frame rate are a hard error; the pipeline never
    /// guesses the geometry it will composite against.
    pub fn load_metadata<P: AsRef<Path>>(&self, path: P) -> Result<VideoMetadata> {
        let path = path.as_ref();

        let output = Command::new("ffprobe")
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_streams",
                "-select_streams",
                "v:0",
                &path.display().to_string(),
            ])
            .output()
            .map_err(|_| VideoError::LoadFailed {
                path: format!("{}: ffprobe failed", path.display()),
            })?;

        if !output.status.success() {
            return Err(VideoError::LoadFailed {
                path: path.display().to_string(),
            }
            .into());
        }

        let json = String::from_utf8(output.stdout).map_err(|_| VideoError::MetadataUnreadable {
            path: path.display().to_string(),
            reason: "invalid ffprobe output".to_string(),
        })?;

        let metadata = parse_stream_metadata(&json).ok_or_else(|| VideoError::MetadataUnreadable {
            path: path.display().to_string(),
            reason: "missing width, height or frame rate".to_string(),
        })?;

        info!(
            "Video metadata: {}x{} @ {:.2}fps, {:.1}s",
            metadata.width, metadata.height, metadata.fps, metadata.duration
        );

        Ok(metadata)
    }

    /// Decode every frame of the video, in order, to PNG files under `dir`
    ///
    /// Returns the ordered list of frame paths. A video that decodes to zero
    /// frames is an error.
    pub async fn extract_frames(&self, path: &Path, dir: &Path) -> Result<Vec<PathBuf>> {
        let path = path.to_path_buf();
        let dir = dir.to_path_buf();

        std::fs::create_dir_all(&dir)?;
        let pattern = dir.join("frame_%06d.png");

        let mut cmd = Command::new("ffmpeg");
        cmd.args([
            "-i",
            &path.display().to_string(),
            // Passthrough timing so the decoded frame count is exactly the
            // container's, not resampled to a nominal rate
            "-vsync",
            "0",
            "-f",
            "image2",
            "-y",
            &pattern.display().to_string(),
        ]);

        debug!("Extracting frames from {:?} into {:?}", path, dir);

        let output = task::spawn_blocking(move || cmd.output())
            .await
            .map_err(|e| VideoError::DecodingFailed {
                reason: format!("Failed to spawn FFmpeg process: {}", e),
            })?
            .map_err(|e| VideoError::DecodingFailed {
                reason: format!("FFmpeg execution failed: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VideoError::DecodingFailed {
                reason: format!("FFmpeg failed: {}", stderr),
            }
            .into());
        }

        let mut frames: Vec<PathBuf> = std::fs::read_dir(&dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with("frame_") && n.ends_with(".png"))
                    .unwrap_or(false)
            })
            .collect();
        frames.sort();

        if frames.is_empty() {
            return Err(VideoError::NoFrames {
                path: path.display().to_string(),
            }
            .into());
        }

        info!("Extracted {} frames", frames.len());
        Ok(frames)
    }
}

/// Pull width, height, frame rate and duration out of `ffprobe -print_format
/// json` output
///
/// Returns `None` when width, height or frame rate cannot be determined.
fn parse_stream_metadata(json: &str) -> Option<VideoMetadata> {
    let width = extract_json_number(json, "width")? as u32;
    let height = extract_json_number(json, "height")? as u32;
    let fps = extract_frame_rate(json)?;

    if width == 0 || height == 0 || fps <= 0.0 {
        return None;
    }

    let duration = extract_json_number(json, "duration").unwrap_or(0.0);
    let frame_count = extract_json_number(json, "nb_frames")
        .map(|n| n as i64)
        .unwrap_or_else(|| (duration * fps) as i64);

    Some(VideoMetadata {
        duration,
        fps,
        width,
        height,
        frame_count,
    })
}

fn extract_json_number(json: &str, key: &str) -> Option<f64> {
    let pattern = format!("\"{}\":", key);
    let start = json.find(&pattern)? + pattern.len();
    let remaining = json[start..].trim_start().trim_start_matches('"');
    let end = remaining
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-')
        .unwrap_or(remaining.len());
    remaining[..end].parse().ok()
}

fn extract_frame_rate(json: &str) -> Option<f64> {
    let start = json.find("\"avg_frame_rate\":")? + 17;
    let remaining = json[start..].trim_start().trim_start_matches('"');
    let fps_str = &remaining[..remaining.find('"')?];

    let (num, den) = fps_str.split_once('/')?;
    let num: f64 = num.parse().ok()?;
    let den: f64 = den.parse().ok()?;

    if den != 0.0 {
        Some(num / den)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBE_JSON: &str = r#"{
        "streams": [
            {
                "codec_name": "h264",
                "width": 1280,
                "height": 720,
                "avg_frame_rate": "30000/1001",
                "duration": "12.345000",
                "nb_frames": "370"
            }
        ]
    }"#;

    #[test]
    fn test_parse_stream_metadata() {
        let metadata = parse_stream_metadata(PROBE_JSON).unwrap();
        assert_eq!(metadata.width, 1280);
        assert_eq!(metadata.height, 720);
        assert!((metadata.fps - 29.97).abs() < 0.01);
        assert!((metadata.duration - 12.345).abs() < 1e-6);
        assert_eq!(metadata.frame_count, 370);
    }

    #[test]
    fn test_parse_rejects_missing_dimensions() {
        let json = r#"{"streams":[{"codec_name":"h264","avg_frame_rate":"30/1"}]}"#;
        assert!(parse_stream_metadata(json).is_none());
    }

    #[test]
    fn test_parse_rejects_zero_frame_rate() {
        let json = r#"{"streams":[{"width":640,"height":480,"avg_frame_rate":"0/0"}]}"#;
        assert!(parse_stream_metadata(json).is_none());
    }

    #[test]
    fn test_frame_count_estimated_when_unreported() {
        let json = r#"{"streams":[{"width":640,"height":480,"avg_frame_rate":"25/1","duration":"4.0"}]}"#;
        let metadata = parse_stream_metadata(json).unwrap();
        assert_eq!(metadata.frame_count, 100);
    }

    #[test]
    fn test_extract_json_number_handles_quoted_values() {
        assert_eq!(extract_json_number(PROBE_JSON, "width"), Some(1280.0));
        assert_eq!(extract_json_number(PROBE_JSON, "nb_frames"), Some(370.0));
        assert_eq!(extract_json_number(PROBE_JSON, "missing"), None);
    }
}
