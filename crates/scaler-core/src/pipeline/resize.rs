//! Output geometry and resampling.

use image::DynamicImage;

use crate::config::ResizeFilter;

/// Output size for a source of `(source_width, source_height)` scaled to
/// `target_width`: `(target_width, round(target_width * h0 / w0))`.
///
/// A zero-width source yields a zero height, which the encoder rejects.
/// Heights beyond `u32::MAX` saturate; callers check the result against
/// their dimension limit before allocating.
pub fn target_dimensions(source_width: u32, source_height: u32, target_width: u32) -> (u32, u32) {
    if source_width == 0 {
        return (target_width, 0);
    }
    let height = (f64::from(target_width) * f64::from(source_height) / f64::from(source_width))
        .round();
    (target_width, height as u32)
}

/// Width to scale to, honouring the upscale switch.
pub fn effective_width(source_width: u32, target_width: u32, upscale: bool) -> u32 {
    if !upscale && source_width < target_width {
        source_width
    } else {
        target_width
    }
}

/// Resample `image` to exactly `width` x `height`.
pub fn resample(image: &DynamicImage, width: u32, height: u32, filter: ResizeFilter) -> DynamicImage {
    if image.width() == width && image.height() == height {
        return image.clone();
    }
    image.resize_exact(width, height, filter.filter_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_4000x3000() {
        assert_eq!(target_dimensions(4000, 3000, 2048), (2048, 1536));
    }

    #[test]
    fn test_portrait() {
        assert_eq!(target_dimensions(3000, 4000, 2048), (2048, 2731));
    }

    #[test]
    fn test_rounds_half_up() {
        // 3 * 5 / 2 = 7.5
        assert_eq!(target_dimensions(2, 5, 3), (3, 8));
    }

    #[test]
    fn test_upscales_narrow_source() {
        assert_eq!(target_dimensions(100, 50, 2048), (2048, 1024));
    }

    #[test]
    fn test_extreme_panorama_collapses_to_zero_height() {
        assert_eq!(target_dimensions(10000, 1, 2048), (2048, 0));
    }

    #[test]
    fn test_tall_strip_height_is_not_truncated() {
        assert_eq!(target_dimensions(1, 20000, 2048), (2048, 40_960_000));
        assert_eq!(target_dimensions(1, u32::MAX, u32::MAX), (u32::MAX, u32::MAX));
    }

    #[test]
    fn test_zero_width_source() {
        assert_eq!(target_dimensions(0, 10, 2048), (2048, 0));
    }

    #[test]
    fn test_effective_width() {
        assert_eq!(effective_width(100, 2048, true), 2048);
        assert_eq!(effective_width(100, 2048, false), 100);
        assert_eq!(effective_width(4000, 2048, false), 2048);
    }

    #[test]
    fn test_resample_exact_size() {
        let img = DynamicImage::new_rgb8(400, 300);
        let out = resample(&img, 256, 192, ResizeFilter::Triangle);
        assert_eq!((out.width(), out.height()), (256, 192));
    }
}
