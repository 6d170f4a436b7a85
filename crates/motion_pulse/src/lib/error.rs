/// Failure of a whole assembly run. Per-image failures are logged and
/// swallowed upstream; only these reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    /// Every source image was rejected, failed to upload, or produced no
    /// clip. User-actionable: resubmit with usable images.
    #[error("no valid motion videos generated")]
    NoValidClips,
    /// Composition or encoding failed after clips were gathered.
    #[error("failed to render final video: {0}")]
    Render(#[source] anyhow::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssemblyError {
    /// Distinguishes caller-correctable failures (400-class) from
    /// server-side ones (500-class).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NoValidClips)
    }
}
