use std::{fmt::Debug, future::Future, time::Duration};

use crate::motion::{GenerationSnapshot, JobStatus};

/// Bounded suspend-and-retry loop over a generation job.
///
/// Fetches at most `max_attempts` snapshots, sleeping `interval` between
/// non-terminal attempts. Returns the first playable clip URL as soon as one
/// appears, even before the job reports COMPLETE. Suspends only in the sleep
/// and in the injected fetch future, so a caller-side timeout that drops this
/// future cancels the wait promptly.
pub(crate) async fn poll_generation<F, Fut, E>(
    mut fetch: F,
    interval: Duration,
    max_attempts: u32,
) -> Result<Option<String>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<GenerationSnapshot, E>>,
    E: Debug,
{
    for attempt in 1..=max_attempts {
        let snapshot = fetch().await?;

        if let Some(url) = snapshot.clip_url {
            tracing::info!(attempt, "Motion clip ready");
            return Ok(Some(url));
        }

        match snapshot.status {
            JobStatus::Complete => {
                tracing::warn!(attempt, "Generation complete but no clip URL produced");
                return Ok(None);
            }
            JobStatus::Failed => {
                tracing::warn!(attempt, "Motion generation failed");
                return Ok(None);
            }
            JobStatus::Pending | JobStatus::InProgress => {
                if attempt < max_attempts {
                    tokio::time::sleep(interval).await;
                }
            }
            status => {
                tracing::warn!(attempt, %status, "Unexpected generation status");
                return Ok(None);
            }
        }
    }

    tracing::warn!(
        max_attempts,
        status = %JobStatus::Timeout,
        "Exceeded maximum polling attempts"
    );
    Ok(None)
}
