use image::{ImageBuffer, Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, VideoError};

/// Represents a single video frame
///
/// This is a simple wrapper around an RGB image buffer, the video I/O
/// encoding. The keyer works on the BGR processing encoding; conversion
/// happens explicitly at the pipeline boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    buffer: RgbImage,
}

impl Frame {
    /// Create a new frame from an RGB image buffer
    pub fn new(buffer: RgbImage) -> Self {
        Self { buffer }
    }

    /// Create a new frame with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let buffer = ImageBuffer::from_fn(width, height, |_, _| Rgb(color));
        Self { buffer }
    }

    /// Read a frame from an image file on disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let image = image::open(path.as_ref()).map_err(|e| VideoError::DecodingFailed {
            reason: format!("{}: {}", path.as_ref().display(), e),
        })?;
        Ok(Self::new(image.to_rgb8()))
    }

    /// Get the width of the frame
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Get the height of the frame
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Get a pixel at the given coordinates (returns RGB array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let pixel = self.buffer.get_pixel(x, y);
        [pixel[0], pixel[1], pixel[2]]
    }

    /// Set a pixel at the given coordinates
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        self.buffer.put_pixel(x, y, Rgb(color));
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &RgbImage {
        &self.buffer
    }

    /// Save the frame as a PNG file
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.buffer
            .save(path.as_ref())
            .map_err(|e| VideoError::EncodingFailed {
                reason: format!("Failed to save frame: {}", e),
            })?;
        Ok(())
    }
}

/// Video file metadata probed from the container
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    /// Duration in seconds
    pub duration: f64,

    /// Frame rate
    pub fps: f64,

    /// Frame width in pixels
    pub width: u32,

    /// Frame height in pixels
    pub height: u32,

    /// Number of frames, if the container reports it (estimated otherwise)
    pub frame_count: i64,
}

/// Output encoding parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputParams {
    /// Video codec to use for output
    pub codec: String,

    /// Audio codec used when carrying over the source audio track
    pub audio_codec: String,

    /// Quality setting (0-100, higher is better)
    pub quality: u8,
}

impl Default for OutputParams {
    fn default() -> Self {
        Self {
            codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            quality: 85,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_frame_pixel_roundtrip() {
        let mut frame = Frame::new_filled(4, 2, [1, 2, 3]);
        assert_eq!(frame.get_pixel(3, 1), [1, 2, 3]);

        frame.set_pixel(0, 0, [9, 9, 9]);
        assert_eq!(frame.get_pixel(0, 0), [9, 9, 9]);
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 2);
    }

    #[test]
    fn test_frame_save_and_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("frame.png");

        let frame = Frame::new_filled(3, 3, [10, 200, 30]);
        frame.save_png(&path).unwrap();

        let loaded = Frame::open(&path).unwrap();
        assert_eq!(loaded, frame);
    }

    #[test]
    fn test_open_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("not_an_image.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        assert!(Frame::open(&path).is_err());
    }
}
