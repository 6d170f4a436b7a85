use std::path::{Path, PathBuf};

/// Immutable input to a single assembly run.
#[derive(Debug, Clone)]
pub struct AssemblyRequest {
    /// Source images, in the order they should appear in the final video.
    pub image_paths: Vec<PathBuf>,
    /// Seconds each motion clip is shown for.
    pub duration_per_image: f64,
    /// Caption text overlaid across the whole video; empty skips the overlay.
    pub caption: String,
    /// Optional audio track, looped or truncated to the video duration.
    pub audio_path: Option<PathBuf>,
    /// How much apparent movement the animation service introduces.
    pub motion_strength: u8,
}

impl AssemblyRequest {
    pub const DEFAULT_DURATION_PER_IMAGE: f64 = 3.0;
    pub const DEFAULT_MOTION_STRENGTH: u8 = 3;

    pub fn new(image_paths: Vec<PathBuf>, caption: impl Into<String>) -> Self {
        Self {
            image_paths,
            duration_per_image: Self::DEFAULT_DURATION_PER_IMAGE,
            caption: caption.into(),
            audio_path: None,
            motion_strength: Self::DEFAULT_MOTION_STRENGTH,
        }
    }
}

/// Ordered set of downloaded motion clips, one per surviving source image.
/// Order always matches the input image order, regardless of per-image
/// completion order.
#[derive(Debug, Clone, Default)]
pub struct ClipSet(Vec<PathBuf>);

impl ClipSet {
    pub fn new(clips: Vec<PathBuf>) -> Self {
        Self(clips)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.0
    }
}

/// Reference to the rendered output file. Created once per successful run.
#[derive(Debug, Clone)]
pub struct RenderedVideo {
    pub path: PathBuf,
}

impl RenderedVideo {
    pub fn path(&self) -> &Path {
        &self.path
    }
}
