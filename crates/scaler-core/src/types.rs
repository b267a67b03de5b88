//! Core data types for the Scaler pipeline: inputs, artifacts, batch outcomes.

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{PipelineError, ScalerError};
use crate::handle::AccessHandle;

/// Immutable, shareable encoded bytes.
pub type Blob = Arc<[u8]>;

/// Raster formats accepted at the input boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MimeType {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/webp")]
    Webp,
}

impl MimeType {
    /// The MIME string, e.g. `image/jpeg`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    /// Canonical file extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }

    /// The matching `image` crate format.
    pub fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Webp => ImageFormat::WebP,
        }
    }

    /// Map an `image` crate format back, if it is one we accept.
    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::WebP => Some(Self::Webp),
            _ => None,
        }
    }

    /// Guess from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Guess from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl FromStr for MimeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image/png" => Ok(Self::Png),
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/webp" => Ok(Self::Webp),
            other => Err(format!("unsupported MIME type: {other}")),
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One image handed to the pipeline by the caller.
#[derive(Debug, Clone)]
pub struct InputImage {
    /// Display name, usually the original file name
    pub name: String,

    /// Declared MIME type
    pub mime: MimeType,

    /// Encoded source bytes
    pub data: Vec<u8>,
}

impl InputImage {
    /// Create an input from a name, MIME type and bytes.
    pub fn new(name: impl Into<String>, mime: MimeType, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime,
            data,
        }
    }

    /// Create an input from a MIME string, rejecting anything but png/jpeg/webp.
    pub fn with_mime_str(
        name: impl Into<String>,
        mime: &str,
        data: Vec<u8>,
    ) -> Result<Self, PipelineError> {
        let name = name.into();
        let mime = mime
            .parse::<MimeType>()
            .map_err(|_| PipelineError::UnsupportedFormat {
                name: name.clone(),
                format: mime.to_string(),
            })?;
        Ok(Self::new(name, mime, data))
    }

    /// Read an input from disk. The MIME type comes from the extension.
    pub async fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let mime = MimeType::from_path(path).ok_or_else(|| PipelineError::UnsupportedFormat {
            name: name.clone(),
            format: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        })?;
        let data = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PipelineError::FileNotFound(path.to_path_buf())
            } else {
                PipelineError::Decode {
                    name: name.clone(),
                    message: format!("Cannot read file: {}", e),
                }
            }
        })?;
        Ok(Self::new(name, mime, data))
    }
}

/// The pipeline's output unit: one resized, encoded image.
#[derive(Debug)]
pub struct ResizedArtifact {
    /// Display name inherited from the input
    pub name: String,

    /// Encoding of `data`, same as the input
    pub mime: MimeType,

    /// Width of the encoded raster
    pub width: u32,

    /// Height of the encoded raster
    pub height: u32,

    /// Width of the decoded source
    pub source_width: u32,

    /// Height of the decoded source
    pub source_height: u32,

    /// Encoded bytes
    pub data: Blob,

    /// Ephemeral locator for `data`
    pub handle: AccessHandle,
}

impl ResizedArtifact {
    /// Encoded size in bytes.
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    /// Revoke this artifact's locator.
    pub fn release(&self) -> bool {
        self.handle.release()
    }
}

/// An input that was skipped during a batch.
#[derive(Debug)]
pub struct ItemFailure {
    /// Position of the input in the batch
    pub index: usize,

    /// Display name of the input
    pub name: String,

    /// Why it was skipped
    pub error: PipelineError,
}

/// Result of running a batch: successes in input order plus skipped items.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Successfully resized artifacts, input order preserved
    pub artifacts: Vec<ResizedArtifact>,

    /// Inputs that failed, in input order
    pub failures: Vec<ItemFailure>,

    /// Number of inputs in the batch
    pub total: usize,
}

impl BatchOutcome {
    /// True when no input produced an artifact.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Number of successful artifacts.
    pub fn succeeded(&self) -> usize {
        self.artifacts.len()
    }

    /// Number of failed inputs.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Fail with [`ScalerError::NothingToDownload`] if every input failed.
    pub fn ensure_any(&self) -> Result<(), ScalerError> {
        if self.is_empty() {
            return Err(ScalerError::NothingToDownload { total: self.total });
        }
        Ok(())
    }

    /// Release every artifact's locator.
    pub fn release_all(&self) -> usize {
        self.artifacts.iter().filter(|a| a.release()).count()
    }

    /// Consume the outcome and keep only the artifacts.
    pub fn into_artifacts(self) -> Vec<ResizedArtifact> {
        self.artifacts
    }
}

/// A file ready to be saved by the caller.
#[derive(Debug, Clone)]
pub struct Download {
    /// Suggested file name
    pub file_name: String,

    /// MIME type string of `data`
    pub mime: String,

    /// Bytes to save
    pub data: Blob,
}

/// Serializable summary of an artifact, used for manifests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Artifact name (archive entry name)
    pub name: String,

    /// Suggested single-download name
    pub download_name: String,

    /// MIME type
    pub mime: MimeType,

    /// Output width in pixels
    pub width: u32,

    /// Output height in pixels
    pub height: u32,

    /// Source width in pixels
    pub source_width: u32,

    /// Source height in pixels
    pub source_height: u32,

    /// Encoded size in bytes
    pub bytes: usize,

    /// Access locator at the time the record was taken
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
}
