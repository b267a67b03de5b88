//! Sub-configuration structs and their defaults.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Resize settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// Output width in pixels; height follows the source aspect ratio
    pub target_width: u32,

    /// Lossy encoding quality in [0.0, 1.0] (JPEG only)
    pub quality: f32,

    /// Resampling filter
    pub filter: ResizeFilter,

    /// Enlarge inputs narrower than `target_width`.
    /// When false those inputs keep their own width.
    pub upscale: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            target_width: 2048,
            quality: 0.9,
            filter: ResizeFilter::default(),
            upscale: true,
        }
    }
}

/// Resampling filter used when drawing the source into the output surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    /// Nearest neighbour
    Nearest,
    /// Bilinear
    Triangle,
    /// Bicubic (Catmull-Rom)
    CatmullRom,
    /// Lanczos with window 3
    #[default]
    Lanczos3,
}

impl ResizeFilter {
    /// Map to the `image` crate filter.
    pub fn filter_type(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }

    /// Parse a filter name (case-insensitive). Accepts "bilinear" and "bicubic" aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "nearest" => Some(Self::Nearest),
            "triangle" | "bilinear" => Some(Self::Triangle),
            "catmullrom" | "bicubic" => Some(Self::CatmullRom),
            "lanczos3" | "lanczos" => Some(Self::Lanczos3),
            _ => None,
        }
    }
}

/// Processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Images in flight at once. 1 processes strictly one after another.
    pub parallel_workers: usize,

    /// Input extensions picked up by directory discovery
    pub supported_formats: Vec<String>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel_workers: 1,
            supported_formats: vec![
                "png".to_string(),
                "jpg".to_string(),
                "jpeg".to_string(),
                "webp".to_string(),
            ],
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum input size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum source dimension (width or height)
    pub max_image_dimension: u32,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,

    /// Resample + encode timeout in milliseconds
    pub encode_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 20000,
            decode_timeout_ms: 10000,
            encode_timeout_ms: 10000,
        }
    }
}

/// Download and archive settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Default file name of the batch archive
    pub archive_name: String,

    /// Prefix for single-image download names
    pub download_prefix: String,

    /// Archive entry compression
    pub compression: ArchiveCompression,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            archive_name: "resized-images.zip".to_string(),
            download_prefix: "resized-".to_string(),
            compression: ArchiveCompression::default(),
        }
    }
}

/// Compression applied to archive entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveCompression {
    /// No compression
    Stored,
    /// DEFLATE
    #[default]
    Deflated,
}

impl ArchiveCompression {
    pub(crate) fn method(self) -> zip::CompressionMethod {
        match self {
            Self::Stored => zip::CompressionMethod::Stored,
            Self::Deflated => zip::CompressionMethod::Deflated,
        }
    }
}

/// Output settings used by front ends that write downloads to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory downloads are written to (supports `~`)
    pub dir: String,

    /// Manifest format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON manifests
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
            format: "json".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
