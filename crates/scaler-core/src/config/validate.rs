//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resize.target_width == 0 {
            return Err(ConfigError::ValidationError(
                "resize.target_width must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.resize.quality) {
            return Err(ConfigError::ValidationError(
                "resize.quality must be between 0.0 and 1.0".into(),
            ));
        }
        if self.processing.parallel_workers == 0 {
            return Err(ConfigError::ValidationError(
                "processing.parallel_workers must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.encode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.encode_timeout_ms must be > 0".into(),
            ));
        }
        if self.package.archive_name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "package.archive_name must not be empty".into(),
            ));
        }
        if !self.package.archive_name.to_lowercase().ends_with(".zip") {
            return Err(ConfigError::ValidationError(
                "package.archive_name must end with .zip".into(),
            ));
        }
        Ok(())
    }
}
