use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::{Result, VideoError},
    keying::{composite, BgrImage},
    video::{Frame, VideoEncoder, VideoLoader, VideoMetadata},
};

/// Main render engine that replaces a video's green-screen backdrop with a
/// still photo
///
/// The engine follows a clear pipeline:
/// 1. Probe - read width, height and frame rate from the source video
/// 2. Background - decode the photo and stretch it to the video's dimensions
/// 3. Decode - dump every source frame, in order
/// 4. Keying - composite each frame against the background, in order
/// 5. Output - re-encode the keyed frames and carry over the original audio
pub struct RenderEngine {
    config: Config,
}

impl RenderEngine {
    /// Create a new render engine with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Render `video_path` keyed over `background_path` into `output_path`
    ///
    /// Processing is strictly sequential: frame *i* of the input becomes frame
    /// *i* of the output. Any failure aborts the render, removes intermediate
    /// files and any partially written output.
    pub async fn render(
        &self,
        video_path: &Path,
        background_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        let result = self
            .render_inner(video_path, background_path, output_path)
            .await;

        // No partial output may be left in a usable state
        if result.is_err() && output_path.exists() {
            if let Err(e) = std::fs::remove_file(output_path) {
                warn!("Failed to remove partial output {:?}: {}", output_path, e);
            }
        }

        result
    }

    async fn render_inner(
        &self,
        video_path: &Path,
        background_path: &Path,
        output_path: &Path,
    ) -> Result<()> {
        info!("🎬 Starting green-screen render");
        info!("   Video: {:?}", video_path);
        info!("   Photo: {:?}", background_path);
        info!("   Output: {:?}", output_path);

        let loader = VideoLoader::new()?;

        // Step 1: Probe the source video
        let metadata = self.probe_video(&loader, video_path)?;

        // Step 2: Load and resize the background photo
        let background =
            self.load_background(background_path, metadata.width, metadata.height)?;

        // Step 3: Decode every frame in order
        info!("📥 Step 3: Decoding source frames...");
        let workdir = RenderWorkdir::create()?;
        let frames = loader
            .extract_frames(video_path, &workdir.frames_dir())
            .await?;

        // Step 4: Key each frame against the background
        let keyed = self.process_frames(&frames, &background, &workdir.keyed_dir())?;

        // Step 5: Encode and carry the original audio over
        info!("🎞️  Step 5: Encoding output...");
        let encoder = VideoEncoder::new(self.config.output.clone());
        encoder
            .encode_frames(&keyed, metadata.fps, &workdir.video_only_path())
            .await?;
        encoder
            .mux_audio(&workdir.video_only_path(), video_path, output_path)
            .await?;

        info!("🎉 Render complete! Output saved to: {:?}", output_path);
        Ok(())
    }

    fn probe_video(&self, loader: &VideoLoader, path: &Path) -> Result<VideoMetadata> {
        info!("📼 Step 1: Probing source video...");
        let metadata = loader.load_metadata(path)?;

        info!(
            "   ✅ {}x{} @ {:.2} fps, ~{} frames",
            metadata.width, metadata.height, metadata.fps, metadata.frame_count
        );
        Ok(metadata)
    }

    /// Decode the photo and stretch it once to the video's dimensions
    ///
    /// No aspect-ratio preservation: the photo fills the frame exactly, the
    /// way the effect has always worked.
    fn load_background(&self, path: &Path, width: u32, height: u32) -> Result<BgrImage> {
        info!("🖼️  Step 2: Loading background photo...");

        let image = image::open(path).map_err(|_| VideoError::BackgroundUndecodable {
            path: path.display().to_string(),
        })?;
        let rgb = image.to_rgb8();

        let resized = if rgb.dimensions() != (width, height) {
            debug!(
                "Resizing background {}x{} -> {}x{}",
                rgb.width(),
                rgb.height(),
                width,
                height
            );
            image::imageops::resize(&rgb, width, height, FilterType::Triangle)
        } else {
            rgb
        };

        info!("   ✅ Background ready at {}x{}", width, height);
        Ok(BgrImage::from_rgb(&resized))
    }

    /// Key a single RGB frame against the prepared background
    ///
    /// The frame crosses into the BGR processing encoding, is composited, and
    /// crosses back. This is the only place the two encodings meet.
    pub fn composite_frame(frame: &Frame, background: &BgrImage) -> Result<Frame> {
        let foreground = BgrImage::from_rgb(frame.as_image());
        let combined = composite(&foreground, background)?;
        Ok(Frame::new(combined.to_rgb()))
    }

    /// Key every decoded frame, strictly in order, writing the results as a
    /// numbered PNG sequence
    fn process_frames(
        &self,
        frame_paths: &[PathBuf],
        background: &BgrImage,
        out_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        info!("🎨 Step 4: Keying {} frames...", frame_paths.len());
        std::fs::create_dir_all(out_dir)?;

        let mut keyed = Vec::with_capacity(frame_paths.len());

        for (index, path) in frame_paths.iter().enumerate() {
            let frame = Frame::open(path)?;
            let combined = Self::composite_frame(&frame, background)?;

            let out_path = out_dir.join(format!("keyed_{:06}.png", index));
            combined.save_png(&out_path)?;
            keyed.push(out_path);

            if (index + 1) % 100 == 0 {
                debug!("Keyed {}/{} frames", index + 1, frame_paths.len());
            }
        }

        info!("   ✅ {} frames keyed", keyed.len());
        Ok(keyed)
    }
}

/// Per-render scratch directory for frame dumps and the video-only file
///
/// Removed on drop, so intermediate storage is released whether the render
/// succeeded or failed.
struct RenderWorkdir {
    dir: PathBuf,
}

impl RenderWorkdir {
    fn create() -> Result<Self> {
        let dir = std::env::temp_dir().join(format!("chroma_compositor_{}", std::process::id()));
        std::fs::create_dir_all(dir.join("frames"))?;
        std::fs::create_dir_all(dir.join("keyed"))?;
        Ok(Self { dir })
    }

    fn frames_dir(&self) -> PathBuf {
        self.dir.join("frames")
    }

    fn keyed_dir(&self) -> PathBuf {
        self.dir.join("keyed")
    }

    fn video_only_path(&self) -> PathBuf {
        self.dir.join("video_only.mp4")
    }
}

impl Drop for RenderWorkdir {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.dir) {
            warn!("Failed to remove render workdir {:?}: {}", self.dir, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use tempfile::tempdir;

    fn engine() -> RenderEngine {
        RenderEngine::new(Config::default())
    }

    fn solid_rgb(width: u32, height: u32, color: [u8; 3]) -> BgrImage {
        let rgb = RgbImage::from_pixel(width, height, image::Rgb(color));
        BgrImage::from_rgb(&rgb)
    }

    #[test]
    fn test_composite_frame_replaces_green_with_background() {
        // 2x2 foreground: pure green at (0,0), pure blue elsewhere
        let mut frame = Frame::new_filled(2, 2, [0, 0, 255]);
        frame.set_pixel(0, 0, [0, 255, 0]);

        // Solid red background
        let background = solid_rgb(2, 2, [255, 0, 0]);

        let keyed = RenderEngine::composite_frame(&frame, &background).unwrap();
        assert_eq!(keyed.get_pixel(0, 0), [255, 0, 0]);
        assert_eq!(keyed.get_pixel(1, 0), [0, 0, 255]);
        assert_eq!(keyed.get_pixel(0, 1), [0, 0, 255]);
        assert_eq!(keyed.get_pixel(1, 1), [0, 0, 255]);
    }

    #[test]
    fn test_process_frames_preserves_count_and_order() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("keyed");

        // Three blue frames, each carrying a red marker column at x = i
        let frame_paths: Vec<PathBuf> = (0..3u32)
            .map(|i| {
                let mut frame = Frame::new_filled(3, 1, [0, 0, 255]);
                frame.set_pixel(i, 0, [255, 0, 0]);
                let path = dir.path().join(format!("frame_{:06}.png", i));
                frame.save_png(&path).unwrap();
                path
            })
            .collect();

        let background = solid_rgb(3, 1, [9, 9, 9]);
        let keyed = engine()
            .process_frames(&frame_paths, &background, &out_dir)
            .unwrap();

        assert_eq!(keyed.len(), frame_paths.len());

        // Frame i of the input maps to frame i of the output
        for (i, path) in keyed.iter().enumerate() {
            let frame = Frame::open(path).unwrap();
            assert_eq!(frame.get_pixel(i as u32, 0), [255, 0, 0]);
        }
    }

    #[test]
    fn test_process_frames_rejects_mismatched_dimensions() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("keyed");

        let path = dir.path().join("frame_000000.png");
        Frame::new_filled(4, 4, [0, 0, 255]).save_png(&path).unwrap();

        let background = solid_rgb(2, 2, [0, 0, 0]);
        let result = engine().process_frames(&[path], &background, &out_dir);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_background_stretches_smaller_photo() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.png");
        RgbImage::from_pixel(2, 2, image::Rgb([200, 10, 10]))
            .save(&path)
            .unwrap();

        let background = engine().load_background(&path, 8, 6).unwrap();
        assert_eq!(background.dimensions(), (8, 6));
    }

    #[test]
    fn test_load_background_rejects_undecodable_photo() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        std::fs::write(&path, b"not actually a jpeg").unwrap();

        let result = engine().load_background(&path, 4, 4);
        assert!(matches!(
            result,
            Err(crate::error::CompositorError::Video(
                VideoError::BackgroundUndecodable { .. }
            ))
        ));
    }

    #[test]
    fn test_missing_background_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = engine().load_background(&dir.path().join("nope.jpg"), 4, 4);
        assert!(result.is_err());
    }
}
