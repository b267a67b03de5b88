//! Scaler Core - resize images to a fixed width and package them for download.
//!
//! Each input is decoded, resampled to the target width with its aspect ratio
//! preserved, and re-encoded in its original format. Results can be handed
//! out one by one or bundled into a zip archive.
//!
//! ```text
//! InputImage → Validate → Decode → Resample → Encode → ResizedArtifact → Download / Zip
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use scaler_core::{Config, InputImage, MimeType, NoProgress, Scaler};
//!
//! #[tokio::main]
//! async fn main() -> scaler_core::Result<()> {
//!     let scaler = Scaler::new(Config::load()?)?;
//!     let bytes = std::fs::read("photo.jpg")?;
//!     let input = InputImage::new("photo.jpg", MimeType::Jpeg, bytes);
//!
//!     let outcome = scaler.process(vec![input], &NoProgress).await;
//!     outcome.ensure_any()?;
//!     let download = scaler.package_one(&outcome.artifacts[0]);
//!     std::fs::write(&download.file_name, &download.data[..])?;
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod handle;
pub mod output;
pub mod package;
pub mod pipeline;
pub mod progress;
pub mod session;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{
    ConfigError, PackagingError, PipelineError, PipelineResult, Result, ScalerError,
};
pub use handle::{AccessHandle, HandleRegistry};
pub use output::{ManifestWriter, OutputFormat};
pub use package::Packager;
pub use pipeline::{BatchProcessor, DiscoveredFile, FileDiscovery, ImageTransformer, ProcessOptions};
pub use progress::{NoProgress, ProgressObserver};
pub use session::Session;
pub use types::{
    ArtifactRecord, BatchOutcome, Blob, Download, InputImage, ItemFailure, MimeType,
    ResizedArtifact,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Scaler - the main entry point for resizing and packaging.
pub struct Scaler {
    config: Config,
    registry: HandleRegistry,
    processor: BatchProcessor,
    packager: Packager,
}

impl Scaler {
    /// Create a new Scaler with the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        tracing::debug!("Initializing Scaler v{}", VERSION);
        let registry = HandleRegistry::new();
        let processor = BatchProcessor::new(&config, registry.clone());
        let packager = Packager::new(config.package.clone());
        Ok(Self {
            config,
            registry,
            processor,
            packager,
        })
    }

    /// Create a new Scaler from the config file (or defaults).
    pub fn with_defaults() -> Result<Self> {
        let config = Config::load()?;
        Self::new(config)
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registry resolving the locators of every artifact this Scaler produced.
    pub fn registry(&self) -> &HandleRegistry {
        &self.registry
    }

    /// Resize a single image with the configured width and quality.
    pub async fn resize(&self, input: InputImage) -> PipelineResult<ResizedArtifact> {
        let options = self.processor.options();
        self.processor
            .transformer()
            .resize(input, options.target_width, options.quality)
            .await
    }

    /// Resize a batch with the configured options.
    pub async fn process(
        &self,
        inputs: Vec<InputImage>,
        observer: &dyn ProgressObserver,
    ) -> BatchOutcome {
        self.processor.process(inputs, observer).await
    }

    /// Resize a batch with explicit options.
    pub async fn process_with_options(
        &self,
        inputs: Vec<InputImage>,
        options: &ProcessOptions,
        observer: &dyn ProgressObserver,
    ) -> BatchOutcome {
        self.processor
            .process_with_options(inputs, options, observer)
            .await
    }

    /// Single download named `resized-<name>`.
    pub fn package_one(&self, artifact: &ResizedArtifact) -> Download {
        self.packager.package_one(artifact)
    }

    /// Single downloads for every artifact, with collision-free names.
    pub fn package_each(&self, artifacts: &[ResizedArtifact]) -> Vec<Download> {
        self.packager.package_each(artifacts)
    }

    /// Archive of all artifacts under the configured archive name.
    pub async fn package_many(
        &self,
        artifacts: &[ResizedArtifact],
    ) -> std::result::Result<Download, PackagingError> {
        self.packager.package_many(artifacts).await
    }

    /// Archive of all artifacts under a caller-supplied name.
    pub async fn package_many_named(
        &self,
        artifacts: &[ResizedArtifact],
        archive_name: &str,
    ) -> std::result::Result<Download, PackagingError> {
        self.packager
            .package_many_named(artifacts, archive_name)
            .await
    }

    /// Single download for one artifact, archive for several.
    pub async fn package_auto(
        &self,
        artifacts: &[ResizedArtifact],
    ) -> std::result::Result<Download, PackagingError> {
        self.packager.package_auto(artifacts).await
    }

    /// Manifest record for an artifact.
    pub fn record(&self, artifact: &ResizedArtifact) -> ArtifactRecord {
        ArtifactRecord {
            name: artifact.name.clone(),
            download_name: self.packager.download_name(&artifact.name),
            mime: artifact.mime,
            width: artifact.width,
            height: artifact.height,
            source_width: artifact.source_width,
            source_height: artifact.source_height,
            bytes: artifact.byte_len(),
            locator: artifact
                .handle
                .is_live()
                .then(|| artifact.handle.locator()),
        }
    }

    /// Start a session bound to this Scaler.
    pub fn session(&self) -> Session<'_> {
        Session::new(self)
    }
}
