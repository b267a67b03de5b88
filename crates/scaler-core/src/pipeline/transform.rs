//! The image transform unit: decode → resample → encode → register.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::time::timeout;

use crate::config::{Config, LimitsConfig, ResizeFilter};
use crate::error::{PipelineError, PipelineResult};
use crate::handle::HandleRegistry;
use crate::types::{InputImage, ResizedArtifact};

use super::decode::ImageDecoder;
use super::encode::encode;
use super::resize::{effective_width, resample, target_dimensions};
use super::validate::Validator;

/// Resizes one image at a time into a [`ResizedArtifact`].
pub struct ImageTransformer {
    decoder: ImageDecoder,
    validator: Validator,
    limits: LimitsConfig,
    filter: ResizeFilter,
    upscale: bool,
    registry: HandleRegistry,
    slots: Arc<Semaphore>,
}

impl ImageTransformer {
    /// Create a transformer that registers artifact handles in `registry`.
    pub fn new(config: &Config, registry: HandleRegistry) -> Self {
        Self {
            decoder: ImageDecoder::new(config.limits.clone()),
            validator: Validator::new(config.limits.clone()),
            limits: config.limits.clone(),
            filter: config.resize.filter,
            upscale: config.resize.upscale,
            registry,
            slots: Arc::new(Semaphore::new(config.processing.parallel_workers.max(1))),
        }
    }

    /// Resize `input` to `target_width`, keeping its aspect ratio and MIME type.
    ///
    /// Fails with [`PipelineError::Decode`] when the bytes are not a raster
    /// image and [`PipelineError::Encode`] when no output blob can be produced.
    pub async fn resize(
        &self,
        input: InputImage,
        target_width: u32,
        quality: f32,
    ) -> PipelineResult<ResizedArtifact> {
        self.resize_in(input, target_width, quality, &self.slots)
            .await
    }

    /// Like [`ImageTransformer::resize`], drawing blocking work slots from
    /// `slots`.
    ///
    /// Each blocking stage owns a permit until its closure returns, so a
    /// stage abandoned on timeout keeps its slot until the work really ends.
    pub(crate) async fn resize_in(
        &self,
        input: InputImage,
        target_width: u32,
        quality: f32,
        slots: &Arc<Semaphore>,
    ) -> PipelineResult<ResizedArtifact> {
        let start = Instant::now();
        tracing::debug!("Resizing: {:?}", input.name);

        if target_width == 0 {
            return Err(PipelineError::InvalidParameters {
                name: input.name,
                message: "target width must be > 0".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&quality) {
            return Err(PipelineError::InvalidParameters {
                name: input.name,
                message: format!("quality {quality} is outside [0, 1]"),
            });
        }

        self.validator.validate(&input)?;
        let InputImage { name, mime, data } = input;

        // Decode
        let decode_start = Instant::now();
        let permit = acquire_slot(slots, &name).await?;
        let decoded = self
            .decoder
            .decode_holding(data, &name, mime, Some(permit))
            .await?;
        tracing::trace!("  Decode: {:?}", decode_start.elapsed());

        let width = effective_width(decoded.width, target_width, self.upscale);
        let (width, height) = target_dimensions(decoded.width, decoded.height, width);
        if width == 0 || height == 0 {
            return Err(PipelineError::Encode {
                name,
                message: format!(
                    "output surface {}x{} has no area (source {}x{})",
                    width, height, decoded.width, decoded.height
                ),
            });
        }

        let max_dim = self.limits.max_image_dimension;
        if width > max_dim || height > max_dim {
            return Err(PipelineError::ImageTooLarge {
                name,
                width,
                height,
                max_dim,
            });
        }

        // Resample + encode on the blocking pool
        let encode_start = Instant::now();
        let filter = self.filter;
        let source = decoded.image;
        let permit = acquire_slot(slots, &name).await?;
        let encode_result = timeout(
            Duration::from_millis(self.limits.encode_timeout_ms),
            tokio::task::spawn_blocking(move || {
                let _permit = permit;
                let resized = resample(&source, width, height, filter);
                encode(&resized, mime, quality)
            }),
        )
        .await;

        let bytes = match encode_result {
            Ok(Ok(Ok(bytes))) => bytes,
            Ok(Ok(Err(e))) => {
                return Err(PipelineError::Encode {
                    name,
                    message: e.to_string(),
                })
            }
            Ok(Err(e)) => {
                return Err(PipelineError::Encode {
                    name,
                    message: format!("Task join error: {}", e),
                })
            }
            Err(_) => {
                return Err(PipelineError::Timeout {
                    name,
                    stage: "encode".to_string(),
                    timeout_ms: self.limits.encode_timeout_ms,
                })
            }
        };
        if bytes.is_empty() {
            return Err(PipelineError::Encode {
                name,
                message: "encoder produced no data".to_string(),
            });
        }
        tracing::trace!("  Resample + encode: {:?}", encode_start.elapsed());

        let data: Arc<[u8]> = Arc::from(bytes);
        let handle = self.registry.register(Arc::clone(&data));

        tracing::debug!(
            "Resized {:?} in {:?} ({}x{} -> {}x{}, {} bytes)",
            name,
            start.elapsed(),
            decoded.width,
            decoded.height,
            width,
            height,
            data.len()
        );

        Ok(ResizedArtifact {
            name,
            mime,
            width,
            height,
            source_width: decoded.width,
            source_height: decoded.height,
            data,
            handle,
        })
    }
}

async fn acquire_slot(
    slots: &Arc<Semaphore>,
    name: &str,
) -> PipelineResult<OwnedSemaphorePermit> {
    Arc::clone(slots)
        .acquire_owned()
        .await
        .map_err(|e| PipelineError::Encode {
            name: name.to_string(),
            message: format!("Worker slots unavailable: {}", e),
        })
}
