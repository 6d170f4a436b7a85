pub mod fetcher;
pub mod leonardo;
pub(crate) mod poller;

use std::{fmt, fmt::Debug, future::Future, path::Path};

/// Opaque handle returned by the animation service after an image upload.
/// Used exactly once to request motion generation.
#[derive(Debug, Clone)]
pub struct RemoteAsset {
    pub id: String,
}

/// A created motion-generation job, prior to polling.
#[derive(Debug, Clone)]
pub struct MotionJob {
    pub generation_id: String,
    pub asset_id: String,
    pub motion_strength: u8,
}

/// Job status as reported by the animation service, plus the poller-side
/// `Timeout` terminal reached when the polling attempts are exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    InProgress,
    Complete,
    Failed,
    Timeout,
    Unknown(String),
}

impl JobStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "PENDING" => Self::Pending,
            "IN_PROGRESS" => Self::InProgress,
            "COMPLETE" => Self::Complete,
            "FAILED" => Self::Failed,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Complete => write!(f, "COMPLETE"),
            Self::Failed => write!(f, "FAILED"),
            Self::Timeout => write!(f, "TIMEOUT"),
            Self::Unknown(other) => write!(f, "{other}"),
        }
    }
}

/// One observation of a generation job while polling.
#[derive(Debug, Clone)]
pub struct GenerationSnapshot {
    pub status: JobStatus,
    /// First produced clip with a playable URL, if any.
    pub clip_url: Option<String>,
}

/// Pushes a validated image to the animation service, yielding the remote
/// asset handle. An error means "skip this image", never "abort the run".
pub trait MotionUploader {
    type Error: Debug;

    fn upload(
        &self,
        image_path: &Path,
    ) -> impl Future<Output = Result<RemoteAsset, Self::Error>> + Send;
}

/// Requests motion generation for an uploaded asset and waits for a terminal
/// outcome. `Ok(None)` covers every non-fatal terminal state: FAILED,
/// timeout, COMPLETE without a produced clip, or an unexpected status.
pub trait MotionGenerator {
    type Error: Debug;

    fn request_motion(
        &self,
        asset: &RemoteAsset,
        motion_strength: u8,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;
}

/// Downloads a produced motion clip to a local path.
pub trait ClipFetcher {
    type Error: Debug;

    fn fetch(
        &self,
        url: &str,
        dest: &Path,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
