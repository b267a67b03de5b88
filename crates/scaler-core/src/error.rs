//! Error types for the Scaler resize pipeline.
//!
//! Errors are split by blast radius: [`PipelineError`] covers a single input
//! image and is recovered by skipping that item, [`PackagingError`] covers a
//! whole batch download and is handed back to the caller.

use thiserror::Error;

/// Top-level error type for Scaler operations.
#[derive(Error, Debug)]
pub enum ScalerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Archive or download packaging errors
    #[error("Packaging error: {0}")]
    Packaging(#[from] PackagingError),

    /// Every input in a batch failed, so there is nothing to offer
    #[error("Nothing to download: none of the {total} input image(s) could be resized")]
    NothingToDownload { total: usize },

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Per-image errors. The batch processor logs these and moves on.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input could not be interpreted as a raster image
    #[error("Decode error for {name}: {message}")]
    Decode { name: String, message: String },

    /// Resized raster could not be serialized back to a blob
    #[error("Encode error for {name}: {message}")]
    Encode { name: String, message: String },

    /// A blocking stage did not finish in time
    #[error("Timeout in {stage} stage for {name} after {timeout_ms}ms")]
    Timeout {
        name: String,
        stage: String,
        timeout_ms: u64,
    },

    /// Input exceeds the byte size limit
    #[error("File too large: {name} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        name: String,
        size_mb: u64,
        max_mb: u64,
    },

    /// Decoded raster exceeds the dimension limit
    #[error("Image too large: {name} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        name: String,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// MIME type or extension outside png/jpeg/webp
    #[error("Unsupported format for {name}: {format}")]
    UnsupportedFormat { name: String, format: String },

    /// Target width or quality out of range
    #[error("Invalid resize parameters for {name}: {message}")]
    InvalidParameters { name: String, message: String },

    /// Input file not found
    #[error("File not found: {0}")]
    FileNotFound(std::path::PathBuf),
}

impl PipelineError {
    /// Display name of the image the error refers to.
    pub fn name(&self) -> String {
        match self {
            Self::Decode { name, .. }
            | Self::Encode { name, .. }
            | Self::Timeout { name, .. }
            | Self::FileTooLarge { name, .. }
            | Self::ImageTooLarge { name, .. }
            | Self::UnsupportedFormat { name, .. }
            | Self::InvalidParameters { name, .. } => name.clone(),
            Self::FileNotFound(path) => path.display().to_string(),
        }
    }
}

/// Batch packaging errors. Not recoverable per item.
#[derive(Error, Debug)]
pub enum PackagingError {
    /// No artifacts were handed to the packager
    #[error("No artifacts to package")]
    Empty,

    /// The zip writer rejected an entry or failed to finish
    #[error("Archive construction failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Writing entry bytes into the archive failed
    #[error("Archive write failed: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking archive task panicked or was cancelled
    #[error("Archive task failed: {0}")]
    Task(String),
}

/// Convenience type alias for Scaler results.
pub type Result<T> = std::result::Result<T, ScalerError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_error_name() {
        let err = PipelineError::Decode {
            name: "broken.png".to_string(),
            message: "bad header".to_string(),
        };
        assert_eq!(err.name(), "broken.png");
        assert!(err.to_string().contains("broken.png"));
    }

    #[test]
    fn test_nothing_to_download_message() {
        let err = ScalerError::NothingToDownload { total: 3 };
        assert!(err.to_string().contains("Nothing to download"));
    }
}
