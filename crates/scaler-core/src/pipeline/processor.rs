//! Batch orchestration: runs inputs through the transform unit in order,
//! skipping failures and reporting progress.

use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

use crate::config::Config;
use crate::handle::HandleRegistry;
use crate::progress::{ProgressObserver, ProgressTracker};
use crate::types::{BatchOutcome, InputImage, ItemFailure};

use super::transform::ImageTransformer;

/// Options for a batch run. Defaults come from [`Config`].
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Output width in pixels
    pub target_width: u32,
    /// Lossy encoding quality in [0, 1]
    pub quality: f32,
    /// Items in flight at once (1 = strictly sequential)
    pub parallel_workers: usize,
}

impl ProcessOptions {
    /// Options taken from the resize and processing config sections.
    pub fn from_config(config: &Config) -> Self {
        Self {
            target_width: config.resize.target_width,
            quality: config.resize.quality,
            parallel_workers: config.processing.parallel_workers,
        }
    }
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Drives a list of inputs through the [`ImageTransformer`].
pub struct BatchProcessor {
    transformer: ImageTransformer,
    options: ProcessOptions,
}

impl BatchProcessor {
    /// Create a processor whose artifacts register handles in `registry`.
    pub fn new(config: &Config, registry: HandleRegistry) -> Self {
        Self {
            transformer: ImageTransformer::new(config, registry),
            options: ProcessOptions::from_config(config),
        }
    }

    /// The options used by [`BatchProcessor::process`].
    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// The underlying transform unit.
    pub fn transformer(&self) -> &ImageTransformer {
        &self.transformer
    }

    /// Process a batch with the configured options.
    pub async fn process(
        &self,
        inputs: Vec<InputImage>,
        observer: &dyn ProgressObserver,
    ) -> BatchOutcome {
        self.process_with_options(inputs, &self.options, observer)
            .await
    }

    /// Process a batch with explicit options.
    ///
    /// Results come back in input order regardless of `parallel_workers`,
    /// which also caps how many decode/resample jobs run at once.
    /// Failed items are logged, recorded in [`BatchOutcome::failures`] and
    /// never appear among the artifacts. The observer sees the completed
    /// fraction after every item and a final `100.0`.
    pub async fn process_with_options(
        &self,
        inputs: Vec<InputImage>,
        options: &ProcessOptions,
        observer: &dyn ProgressObserver,
    ) -> BatchOutcome {
        let start = Instant::now();
        let total = inputs.len();
        let workers = options.parallel_workers.max(1);
        let mut tracker = ProgressTracker::new(observer, total);
        let mut outcome = BatchOutcome {
            total,
            ..BatchOutcome::default()
        };

        if total > 0 {
            tracing::info!(
                "Resizing {} image(s) to {}px ({} worker(s))",
                total,
                options.target_width,
                workers
            );
        }

        let transformer = &self.transformer;
        let slots = Arc::new(Semaphore::new(workers));
        let slots = &slots;
        let (target_width, quality) = (options.target_width, options.quality);
        let mut results = stream::iter(inputs.into_iter().enumerate())
            .map(|(index, input)| async move {
                let name = input.name.clone();
                let result = transformer
                    .resize_in(input, target_width, quality, slots)
                    .await;
                (index, name, result)
            })
            .buffered(workers);

        while let Some((index, name, result)) = results.next().await {
            match result {
                Ok(artifact) => outcome.artifacts.push(artifact),
                Err(error) => {
                    tracing::warn!("Skipping {:?}: {}", name, error);
                    outcome.failures.push(ItemFailure { index, name, error });
                }
            }
            tracker.advance();
        }
        tracker.finish();

        tracing::info!(
            "Batch finished in {:?}: {} resized, {} failed",
            start.elapsed(),
            outcome.succeeded(),
            outcome.failed()
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;

    #[test]
    fn test_process_options_default() {
        let options = ProcessOptions::default();
        assert_eq!(options.target_width, 2048);
        assert!((options.quality - 0.9).abs() < f32::EPSILON);
        assert_eq!(options.parallel_workers, 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let processor = BatchProcessor::new(&Config::default(), HandleRegistry::new());
        let outcome = processor.process(Vec::new(), &NoProgress).await;
        assert!(outcome.is_empty());
        assert_eq!(outcome.total, 0);
        assert!(outcome.failures.is_empty());
    }
}
