use thiserror::Error;

/// Errors raised while acquiring or decoding media
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Unsupported media type '{mime}' for {name}")]
    UnsupportedType { name: String, mime: String },
    #[error("Video playback is not supported: {0}")]
    VideoUnsupported(String),
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Failed to read media file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Dropped file has no accessible data: {0}")]
    NoData(String),
    #[error("Media load was cancelled")]
    Cancelled,
}

pub type MediaResult<T> = Result<T, MediaError>;

/// Errors raised while loading the viewer configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid range for {name}: min {min} must not exceed max {max}")]
    InvalidRange { name: &'static str, min: f32, max: f32 },
}
