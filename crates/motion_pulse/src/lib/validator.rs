use std::path::Path;

use image::ImageFormat;

/// Acceptance limits for candidate source images. Both bounds are inclusive.
#[derive(Debug, Clone)]
pub struct ImageLimits {
    pub max_dimension: u32,
    pub max_bytes: u64,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            max_dimension: 4096,
            max_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Gate in front of the upload stage. A rejected image is skipped by the
/// caller; rejection never aborts the run.
#[derive(Debug, Clone, Default)]
pub struct ImageValidator {
    limits: ImageLimits,
}

impl ImageValidator {
    pub fn new(limits: ImageLimits) -> Self {
        Self { limits }
    }

    /// Returns false (with a logged reason) for images that are too large on
    /// disk, undecodable, not JPEG/PNG, or over the dimension limit.
    pub fn validate(&self, path: &Path) -> bool {
        let byte_size = match std::fs::metadata(path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                tracing::warn!(error = %e, image = %path.display(), "Failed to stat image");
                return false;
            }
        };
        if byte_size > self.limits.max_bytes {
            tracing::warn!(
                image = %path.display(),
                byte_size,
                max_bytes = self.limits.max_bytes,
                "Image file too large"
            );
            return false;
        }

        let reader = match image::ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
        {
            Ok(reader) => reader,
            Err(e) => {
                tracing::warn!(error = %e, image = %path.display(), "Failed to read image");
                return false;
            }
        };

        match reader.format() {
            Some(ImageFormat::Jpeg | ImageFormat::Png) => {}
            format => {
                tracing::warn!(image = %path.display(), ?format, "Unsupported image format");
                return false;
            }
        }

        let (width, height) = match reader.into_dimensions() {
            Ok(dimensions) => dimensions,
            Err(e) => {
                tracing::warn!(error = %e, image = %path.display(), "Failed to decode image header");
                return false;
            }
        };
        if width > self.limits.max_dimension || height > self.limits.max_dimension {
            tracing::warn!(
                image = %path.display(),
                width,
                height,
                max_dimension = self.limits.max_dimension,
                "Image dimensions too large"
            );
            return false;
        }

        true
    }
}
