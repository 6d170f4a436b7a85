use std::{
    fs::remove_dir_all,
    path::{Path, PathBuf},
};

use uuid::Uuid;

use crate::{
    compositor::{CompositionJob, Compositor},
    error::AssemblyError,
    motion::{ClipFetcher, MotionGenerator, MotionUploader},
    types::{AssemblyRequest, ClipSet, RenderedVideo},
    validator::ImageValidator,
};

pub mod builder;

// The core motion-video assembly processor: validate -> upload -> poll ->
// download per image, then compose the surviving clips into one video.
#[derive(Debug)]
pub struct VideoAssembler<U, M, F, C>
where
    U: MotionUploader + Send + Sync + 'static,
    M: MotionGenerator + Send + Sync + 'static,
    F: ClipFetcher + Send + Sync + 'static,
    C: Compositor + Clone + Send + Sync + 'static,
{
    workdir: PathBuf,
    output_dir: PathBuf,
    run_id: String,
    validator: ImageValidator,
    uploader: U,
    motion: M,
    fetcher: F,
    compositor: C,
}

impl<U, M, F, C> VideoAssembler<U, M, F, C>
where
    U: MotionUploader + Send + Sync + 'static,
    M: MotionGenerator + Send + Sync + 'static,
    F: ClipFetcher + Send + Sync + 'static,
    C: Compositor + Clone + Send + Sync + 'static,
{
    fn run_dir(&self) -> PathBuf {
        self.workdir.join(&self.run_id)
    }

    /// Runs one full assembly. Per-image failures are logged and skipped;
    /// only an empty clip set or a rendering failure reaches the caller.
    #[tracing::instrument(skip(self, request), fields(run_id = %self.run_id, images = request.image_paths.len()))]
    pub async fn run(self, request: AssemblyRequest) -> Result<RenderedVideo, AssemblyError> {
        let run_dir = self.run_dir();
        tokio::fs::create_dir_all(&run_dir).await?;

        let audio_path = self.stage_audio(&request, &run_dir).await?;

        let clips = self.collect_motion_clips(&request, &run_dir).await;
        tracing::info!(clips = clips.len(), "Motion clip collection finished");

        let clip_set = ClipSet::new(clips);
        if clip_set.is_empty() {
            return Err(AssemblyError::NoValidClips);
        }

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let output_path = self
            .output_dir
            .join(format!("video_{}.mp4", Uuid::new_v4().simple()));

        // The render stage is synchronous and CPU-bound; keep it off the
        // async workers.
        let job = CompositionJob {
            clips: clip_set,
            duration_per_clip: request.duration_per_image,
            caption: request.caption.clone(),
            audio_path,
            scratch_dir: run_dir,
            output_path: output_path.clone(),
        };
        let compositor = self.compositor.clone();
        tokio::task::spawn_blocking(move || compositor.assemble(&job))
            .await
            .map_err(|e| AssemblyError::Render(anyhow::anyhow!("render worker panicked: {e}")))?
            .map_err(|e| AssemblyError::Render(anyhow::anyhow!("{e:?}")))?;

        tracing::info!(video = %output_path.display(), "Assembly run complete");
        Ok(RenderedVideo { path: output_path })
    }

    /// Copies the caller's audio track into the run directory so it lives
    /// and dies with the run.
    #[tracing::instrument(skip_all)]
    async fn stage_audio(
        &self,
        request: &AssemblyRequest,
        run_dir: &Path,
    ) -> Result<Option<PathBuf>, AssemblyError> {
        let Some(source) = &request.audio_path else {
            return Ok(None);
        };
        let staged = run_dir.join("audio.mp3");
        tokio::fs::copy(source, &staged).await?;
        Ok(Some(staged))
    }

    /// Walks the images in input order through validate -> upload -> poll ->
    /// download. Every failure mode skips the image and continues; the
    /// returned paths keep the input order.
    #[tracing::instrument(skip(self, request, run_dir))]
    async fn collect_motion_clips(
        &self,
        request: &AssemblyRequest,
        run_dir: &Path,
    ) -> Vec<PathBuf> {
        let mut clips = Vec::new();

        for (index, image_path) in request.image_paths.iter().enumerate() {
            if !image_path.exists() {
                tracing::warn!(image = %image_path.display(), "Image not found, skipping");
                continue;
            }
            if !self.validator.validate(image_path) {
                continue;
            }

            let asset = match self.uploader.upload(image_path).await {
                Ok(asset) => asset,
                Err(e) => {
                    tracing::error!(error = ?e, image = %image_path.display(), "Failed to upload image");
                    continue;
                }
            };
            tracing::info!(asset_id = %asset.id, image = %image_path.display(), "Image uploaded");

            let clip_url = match self
                .motion
                .request_motion(&asset, request.motion_strength)
                .await
            {
                Ok(Some(url)) => url,
                Ok(None) => {
                    tracing::warn!(asset_id = %asset.id, "No motion clip produced, skipping");
                    continue;
                }
                Err(e) => {
                    tracing::error!(error = ?e, asset_id = %asset.id, "Motion generation failed");
                    continue;
                }
            };

            let clip_path = run_dir.join(format!("motion_{index}.mp4"));
            if let Err(e) = self.fetcher.fetch(&clip_url, &clip_path).await {
                tracing::error!(error = ?e, url = %clip_url, "Failed to download motion clip");
                continue;
            }
            clips.push(clip_path);
        }

        clips
    }
}

impl<U, M, F, C> Drop for VideoAssembler<U, M, F, C>
where
    U: MotionUploader + Send + Sync + 'static,
    M: MotionGenerator + Send + Sync + 'static,
    F: ClipFetcher + Send + Sync + 'static,
    C: Compositor + Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        let run_dir = self.run_dir();

        if run_dir.exists() {
            if let Err(e) = remove_dir_all(&run_dir) {
                tracing::warn!(error = ?e, path = ?run_dir, "Failed to clean up run directory");
            } else {
                tracing::info!(path = ?run_dir, "Cleaned up run directory");
            }
        }
    }
}
