//! Image decoding with format sniffing, dimension limits and timeout support.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::io::Cursor;
use std::time::Duration;
use tokio::sync::OwnedSemaphorePermit;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::PipelineError;
use crate::types::MimeType;

/// Image decoder with configurable limits and timeout.
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an image.
#[derive(Debug)]
pub struct DecodedImage {
    /// The decoded raster
    pub image: DynamicImage,
    /// Format the bytes actually contained
    pub format: ImageFormat,
    /// Raster width in pixels
    pub width: u32,
    /// Raster height in pixels
    pub height: u32,
    /// Encoded input size in bytes
    pub file_size: u64,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode an in-memory image on the blocking pool, bounded by
    /// `limits.decode_timeout_ms`.
    ///
    /// The container format is sniffed from the bytes; `declared` is only
    /// used when sniffing finds nothing.
    pub async fn decode(
        &self,
        bytes: Vec<u8>,
        name: &str,
        declared: MimeType,
    ) -> Result<DecodedImage, PipelineError> {
        self.decode_holding(bytes, name, declared, None).await
    }

    /// Decode while the blocking job holds `permit`. The permit is released
    /// when the job finishes, even if the caller already gave up on timeout.
    pub(crate) async fn decode_holding(
        &self,
        bytes: Vec<u8>,
        name: &str,
        declared: MimeType,
        permit: Option<OwnedSemaphorePermit>,
    ) -> Result<DecodedImage, PipelineError> {
        let name_owned = name.to_string();
        let timeout_duration = Duration::from_millis(self.limits.decode_timeout_ms);

        let decode_result = timeout(timeout_duration, async {
            tokio::task::spawn_blocking(move || {
                let _permit = permit;
                Self::decode_bytes_sync(bytes, &name_owned, declared)
            })
            .await
        })
        .await;

        match decode_result {
            Ok(Ok(Ok(decoded))) => {
                if decoded.width > self.limits.max_image_dimension
                    || decoded.height > self.limits.max_image_dimension
                {
                    return Err(PipelineError::ImageTooLarge {
                        name: name.to_string(),
                        width: decoded.width,
                        height: decoded.height,
                        max_dim: self.limits.max_image_dimension,
                    });
                }
                Ok(decoded)
            }
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(e)) => Err(PipelineError::Decode {
                name: name.to_string(),
                message: format!("Task join error: {}", e),
            }),
            Err(_) => Err(PipelineError::Timeout {
                name: name.to_string(),
                stage: "decode".to_string(),
                timeout_ms: self.limits.decode_timeout_ms,
            }),
        }
    }

    /// Synchronous decode (runs in spawn_blocking).
    pub(crate) fn decode_bytes_sync(
        bytes: Vec<u8>,
        name: &str,
        declared: MimeType,
    ) -> Result<DecodedImage, PipelineError> {
        let file_size = bytes.len() as u64;
        let mut reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                name: name.to_string(),
                message: format!("Cannot detect image format: {}", e),
            })?;
        let format = match reader.format() {
            Some(f) => f,
            None => {
                let fallback = declared.image_format();
                reader.set_format(fallback);
                fallback
            }
        };
        let image = reader.decode().map_err(|e| PipelineError::Decode {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        Ok(DecodedImage {
            image,
            format,
            width,
            height,
            file_size,
        })
    }
}
