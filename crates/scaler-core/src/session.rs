//! A resize session: the latest batch and its downloads.
//!
//! Starting a new run supersedes the previous one; every handle from the
//! earlier batch is released before the new batch is processed.

use crate::error::{Result, ScalerError};
use crate::progress::ProgressObserver;
use crate::types::{BatchOutcome, Download, InputImage, ItemFailure, ResizedArtifact};
use crate::Scaler;

/// Holds the current batch for a [`Scaler`].
pub struct Session<'a> {
    scaler: &'a Scaler,
    current: BatchOutcome,
}

impl<'a> Session<'a> {
    /// Start an empty session.
    pub fn new(scaler: &'a Scaler) -> Self {
        Self {
            scaler,
            current: BatchOutcome::default(),
        }
    }

    /// Process a new batch, releasing the previous batch's handles first.
    pub async fn run(
        &mut self,
        inputs: Vec<InputImage>,
        observer: &dyn ProgressObserver,
    ) -> &BatchOutcome {
        self.reset();
        self.current = self.scaler.process(inputs, observer).await;
        &self.current
    }

    /// Discard the current batch. Returns how many handles were released.
    pub fn reset(&mut self) -> usize {
        let released = self.current.release_all();
        if released > 0 {
            tracing::debug!("Released {} handle(s) from previous batch", released);
        }
        self.current = BatchOutcome::default();
        released
    }

    /// Artifacts of the current batch, in input order.
    pub fn artifacts(&self) -> &[ResizedArtifact] {
        &self.current.artifacts
    }

    /// Inputs of the current batch that were skipped.
    pub fn failures(&self) -> &[ItemFailure] {
        &self.current.failures
    }

    /// Single download of the artifact at `index`.
    pub fn download(&self, index: usize) -> Option<Download> {
        self.current
            .artifacts
            .get(index)
            .map(|artifact| self.scaler.package_one(artifact))
    }

    /// Archive of every artifact in the current batch.
    pub async fn download_all(&self) -> Result<Download> {
        self.current.ensure_any()?;
        Ok(self.scaler.package_many(&self.current.artifacts).await?)
    }

    /// Single download for one result, archive for several.
    pub async fn download_auto(&self) -> Result<Download> {
        self.current.ensure_any()?;
        self.scaler
            .package_auto(&self.current.artifacts)
            .await
            .map_err(ScalerError::from)
    }
}
