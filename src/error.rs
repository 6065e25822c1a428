use thiserror::Error;

/// Main error type for the chroma-compositor library
#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("Keying error: {0}")]
    Keying(#[from] KeyingError),

    #[error("Video processing error: {0}")]
    Video(#[from] VideoError),

    #[error("Job workspace error: {0}")]
    Job(#[from] JobError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Errors from the chroma-key compositor
#[derive(Error, Debug)]
pub enum KeyingError {
    #[error("Dimension mismatch: foreground is {fg_width}x{fg_height}, background is {bg_width}x{bg_height}")]
    DimensionMismatch {
        fg_width: u32,
        fg_height: u32,
        bg_width: u32,
        bg_height: u32,
    },
}

/// Video-specific errors
#[derive(Error, Debug)]
pub enum VideoError {
    #[error("Failed to load video file: {path}")]
    LoadFailed { path: String },

    #[error("Failed to decode background image: {path}")]
    BackgroundUndecodable { path: String },

    #[error("Video metadata unreadable: {path} - {reason}")]
    MetadataUnreadable { path: String, reason: String },

    #[error("Video contains no frames: {path}")]
    NoFrames { path: String },

    #[error("Video encoding failed: {reason}")]
    EncodingFailed { reason: String },

    #[error("Video decoding failed: {reason}")]
    DecodingFailed { reason: String },
}

/// Job workspace errors
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Failed to create job directory: {path}")]
    CreateFailed { path: String },

    #[error("Failed to stage {asset} into job directory: {reason}")]
    StageFailed { asset: String, reason: String },

    #[error("Failed to remove job directory: {path}")]
    CleanupFailed { path: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using CompositorError
pub type Result<T> = std::result::Result<T, CompositorError>;

impl CompositorError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Video(VideoError::LoadFailed { path }) => {
                format!("Could not load video file '{}'. Please check the file exists and is a supported format.", path)
            }
            Self::Video(VideoError::BackgroundUndecodable { path }) => {
                format!("Could not read the photo '{}'. Please send a standard image format (JPEG, PNG).", path)
            }
            Self::Video(VideoError::NoFrames { path }) => {
                format!("The video '{}' contains no frames.", path)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
