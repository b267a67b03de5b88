//! Input validation before decoding.

use crate::config::LimitsConfig;
use crate::error::PipelineError;
use crate::types::{InputImage, MimeType};

/// Validates inputs before they reach the decoder.
pub struct Validator {
    limits: LimitsConfig,
}

impl Validator {
    /// Create a new validator with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Quick checks before a full decode:
    /// - byte size is within limits
    /// - header matches PNG, JPEG or WEBP
    pub fn validate(&self, input: &InputImage) -> Result<(), PipelineError> {
        let len = input.data.len() as u64;
        let max_bytes = self.limits.max_file_size_mb.saturating_mul(1024 * 1024);
        if len > max_bytes {
            return Err(PipelineError::FileTooLarge {
                name: input.name.clone(),
                size_mb: len / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        if input.data.len() < 4 {
            return Err(PipelineError::Decode {
                name: input.name.clone(),
                message: "File too small to be a valid image".to_string(),
            });
        }

        if Self::sniff(&input.data).is_none() {
            return Err(PipelineError::Decode {
                name: input.name.clone(),
                message: "Unrecognized image format (invalid magic bytes)".to_string(),
            });
        }

        Ok(())
    }

    /// Identify the container from its leading bytes.
    ///
    /// A `RIFF` header shorter than 12 bytes is let through as WEBP; the
    /// decoder has the final word.
    pub fn sniff(header: &[u8]) -> Option<MimeType> {
        if header.len() < 4 {
            return None;
        }

        // JPEG: FF D8 FF
        if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(MimeType::Jpeg);
        }

        // PNG: 89 50 4E 47
        if header.starts_with(&[0x89, b'P', b'N', b'G']) {
            return Some(MimeType::Png);
        }

        // WebP: RIFF....WEBP
        if header.starts_with(b"RIFF") {
            if header.len() >= 12 {
                return (&header[8..12] == b"WEBP").then_some(MimeType::Webp);
            }
            return Some(MimeType::Webp);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(data: Vec<u8>) -> InputImage {
        InputImage::new("test", MimeType::Png, data)
    }

    #[test]
    fn test_sniff_jpeg() {
        let header = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
        assert_eq!(Validator::sniff(&header), Some(MimeType::Jpeg));
    }

    #[test]
    fn test_sniff_png() {
        let header = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        assert_eq!(Validator::sniff(&header), Some(MimeType::Png));
    }

    #[test]
    fn test_sniff_webp() {
        let header = [b'R', b'I', b'F', b'F', 0, 0, 0, 0, b'W', b'E', b'B', b'P'];
        assert_eq!(Validator::sniff(&header), Some(MimeType::Webp));
    }

    #[test]
    fn test_sniff_riff_wave_rejected() {
        let header = [b'R', b'I', b'F', b'F', 0, 0, 0, 0, b'W', b'A', b'V', b'E'];
        assert_eq!(Validator::sniff(&header), None);
    }

    #[test]
    fn test_sniff_gif_rejected() {
        assert_eq!(Validator::sniff(b"GIF89a......"), None);
    }

    #[test]
    fn test_validate_rejects_tiny_input() {
        let validator = Validator::new(LimitsConfig::default());
        let err = validator.validate(&input(vec![0x89, b'P'])).unwrap_err();
        assert!(err.to_string().contains("too small"));
    }

    #[test]
    fn test_validate_rejects_oversized_input() {
        let limits = LimitsConfig {
            max_file_size_mb: 1,
            ..LimitsConfig::default()
        };
        let validator = Validator::new(limits);
        let mut data = vec![0x89, b'P', b'N', b'G'];
        data.resize(2 * 1024 * 1024, 0);
        let err = validator.validate(&input(data)).unwrap_err();
        assert!(matches!(err, PipelineError::FileTooLarge { max_mb: 1, .. }));
    }

    #[test]
    fn test_validate_huge_size_limit_does_not_overflow() {
        let limits = LimitsConfig {
            max_file_size_mb: u64::MAX,
            ..LimitsConfig::default()
        };
        let validator = Validator::new(limits);
        assert!(validator
            .validate(&input(vec![0x89, b'P', b'N', b'G', 0, 0, 0, 0]))
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_header() {
        let validator = Validator::new(LimitsConfig::default());
        let err = validator.validate(&input(vec![0; 16])).unwrap_err();
        assert!(err.to_string().contains("magic bytes"));
    }
}
