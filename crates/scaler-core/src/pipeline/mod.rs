//! Resize pipeline components.
//!
//! - **validate**: size and magic-byte checks before decoding
//! - **decode**: load rasters from PNG, JPEG and WEBP bytes
//! - **resize**: output geometry and resampling
//! - **encode**: serialize rasters back into the input format
//! - **transform**: the per-image unit tying the stages together
//! - **processor**: batch orchestration with progress reporting
//! - **discovery**: find image files on disk

pub mod decode;
pub mod discovery;
pub mod encode;
pub mod processor;
pub mod resize;
pub mod transform;
pub mod validate;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use processor::{BatchProcessor, ProcessOptions};
pub use resize::target_dimensions;
pub use transform::ImageTransformer;
pub use validate::Validator;
