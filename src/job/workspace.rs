use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{JobError, Result};

/// A per-job working directory with the fixed asset layout
///
/// The workspace is removed when [`cleanup`](JobWorkspace::cleanup) is called
/// or when the value is dropped, so early returns on the failure path cannot
/// leak per-job storage across invocations.
#[derive(Debug)]
pub struct JobWorkspace {
    dir: PathBuf,
    cleaned: bool,
}

impl JobWorkspace {
    /// Create the working directory for a job under `root`, keyed by `job_id`
    pub fn create<P: AsRef<Path>>(root: P, job_id: &str) -> Result<Self> {
        let dir = root.as_ref().join(job_id);

        std::fs::create_dir_all(&dir).map_err(|_| JobError::CreateFailed {
            path: dir.display().to_string(),
        })?;

        debug!("Created job workspace: {:?}", dir);
        Ok(Self {
            dir,
            cleaned: false,
        })
    }

    /// The workspace directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the green-screen source video inside the workspace
    pub fn video_path(&self) -> PathBuf {
        self.dir.join("video.mp4")
    }

    /// Path of the user-supplied photo inside the workspace
    pub fn photo_path(&self) -> PathBuf {
        self.dir.join("user_photo.jpg")
    }

    /// Path of the rendered output inside the workspace
    pub fn output_path(&self) -> PathBuf {
        self.dir.join("output_video_with_audio.mp4")
    }

    /// Copy the source video into the workspace layout
    pub fn stage_video<P: AsRef<Path>>(&self, source: P) -> Result<PathBuf> {
        self.stage(source.as_ref(), self.video_path(), "video")
    }

    /// Copy the background photo into the workspace layout
    pub fn stage_photo<P: AsRef<Path>>(&self, source: P) -> Result<PathBuf> {
        self.stage(source.as_ref(), self.photo_path(), "photo")
    }

    fn stage(&self, source: &Path, target: PathBuf, asset: &str) -> Result<PathBuf> {
        std::fs::copy(source, &target).map_err(|e| JobError::StageFailed {
            asset: asset.to_string(),
            reason: format!("{}: {}", source.display(), e),
        })?;

        debug!("Staged {} into {:?}", asset, target);
        Ok(target)
    }

    /// Remove the workspace directory in its entirety
    pub fn cleanup(mut self) -> Result<()> {
        self.cleaned = true;
        std::fs::remove_dir_all(&self.dir).map_err(|_| JobError::CleanupFailed {
            path: self.dir.display().to_string(),
        })?;

        debug!("Removed job workspace: {:?}", self.dir);
        Ok(())
    }
}

impl Drop for JobWorkspace {
    fn drop(&mut self) {
        if !self.cleaned {
            if let Err(e) = std::fs::remove_dir_all(&self.dir) {
                warn!("Failed to remove job workspace {:?}: {}", self.dir, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_workspace_layout() {
        let root = tempdir().unwrap();
        let ws = JobWorkspace::create(root.path(), "203151105").unwrap();

        assert!(ws.dir().is_dir());
        assert_eq!(ws.video_path().file_name().unwrap(), "video.mp4");
        assert_eq!(ws.photo_path().file_name().unwrap(), "user_photo.jpg");
        assert_eq!(
            ws.output_path().file_name().unwrap(),
            "output_video_with_audio.mp4"
        );
    }

    #[test]
    fn test_staging_copies_assets() {
        let root = tempdir().unwrap();
        let src = root.path().join("incoming.jpg");
        std::fs::write(&src, b"jpeg bytes").unwrap();

        let ws = JobWorkspace::create(root.path(), "job").unwrap();
        let staged = ws.stage_photo(&src).unwrap();

        assert_eq!(staged, ws.photo_path());
        assert_eq!(std::fs::read(&staged).unwrap(), b"jpeg bytes");
    }

    #[test]
    fn test_staging_missing_source_fails() {
        let root = tempdir().unwrap();
        let ws = JobWorkspace::create(root.path(), "job").unwrap();

        assert!(ws.stage_video(root.path().join("missing.mp4")).is_err());
    }

    #[test]
    fn test_cleanup_removes_directory() {
        let root = tempdir().unwrap();
        let ws = JobWorkspace::create(root.path(), "job").unwrap();
        let dir = ws.dir().to_path_buf();
        std::fs::write(ws.photo_path(), b"x").unwrap();

        ws.cleanup().unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn test_drop_removes_directory_on_failure_path() {
        let root = tempdir().unwrap();
        let dir;
        {
            let ws = JobWorkspace::create(root.path(), "job").unwrap();
            dir = ws.dir().to_path_buf();
            std::fs::write(ws.video_path(), b"x").unwrap();
            // Early return: workspace dropped without cleanup()
        }
        assert!(!dir.exists());
    }
}
