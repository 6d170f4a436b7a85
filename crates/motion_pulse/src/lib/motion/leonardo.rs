use std::{collections::HashMap, path::Path, time::Duration};

use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::LeonardoConfig,
    motion::{
        poller::poll_generation, GenerationSnapshot, JobStatus, MotionGenerator, MotionJob,
        MotionUploader, RemoteAsset,
    },
};

/// Client for the Leonardo.ai REST API: two-phase image upload plus
/// motion-SVD generation with bounded status polling.
#[derive(Clone)]
pub struct LeonardoClient {
    client: Client,
    api_key: String,
    base_url: String,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum LeonardoError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed API payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

impl LeonardoClient {
    const DEFAULT_BASE_URL: &'static str = "https://cloud.leonardo.ai/api/rest/v1";
    const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
    const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 120;

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.into(),
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            max_poll_attempts: Self::DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }

    pub fn from_config(config: &LeonardoConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            poll_interval: config.poll_interval,
            max_poll_attempts: config.max_poll_attempts,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Phase one: ask the service for a short-lived upload destination for a
    /// file with the given extension.
    pub async fn request_upload_slot(&self, extension: &str) -> Result<UploadSlot, LeonardoError> {
        let resp = self
            .client
            .post(format!("{}/init-image", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "extension": extension }))
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(LeonardoError::Api { status, message });
        }

        let body = resp.json::<InitImageResponse>().await?;
        // `fields` arrives as a JSON-encoded string of multipart form fields.
        let fields: HashMap<String, String> = serde_json::from_str(&body.upload_init_image.fields)?;

        Ok(UploadSlot {
            asset_id: body.upload_init_image.id,
            url: body.upload_init_image.url,
            fields,
        })
    }

    /// Phase two: submit the file content plus the returned form fields as a
    /// multipart payload to the destination URL. The destination accepts
    /// 200, 201 and 204; anything else fails the upload.
    pub async fn submit_upload(
        &self,
        slot: &UploadSlot,
        image_path: &Path,
    ) -> Result<(), LeonardoError> {
        let bytes = tokio::fs::read(image_path).await?;
        let file_name = image_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image.jpg")
            .to_string();

        let mut form = reqwest::multipart::Form::new();
        for (key, value) in &slot.fields {
            form = form.text(key.clone(), value.clone());
        }
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for_extension(extension_of(image_path)))?;
        form = form.part("file", part);

        let resp = self
            .client
            .post(&slot.url)
            .multipart(form)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !matches!(resp.status().as_u16(), 200 | 201 | 204) {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(LeonardoError::Api { status, message });
        }

        Ok(())
    }

    /// Creates a motion-SVD generation job for an uploaded asset.
    pub async fn send_motion_request(
        &self,
        asset: &RemoteAsset,
        motion_strength: u8,
    ) -> Result<MotionJob, LeonardoError> {
        let body = serde_json::json!({
            "imageId": asset.id,
            "isInitImage": true,
            "motionStrength": motion_strength,
        });

        let resp = self
            .client
            .post(format!("{}/generations-motion-svd", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(LeonardoError::Api { status, message });
        }

        let body = resp.json::<MotionGenerationResponse>().await?;

        Ok(MotionJob {
            generation_id: body.job.generation_id,
            asset_id: asset.id.clone(),
            motion_strength,
        })
    }

    /// One poll of a generation job's state.
    pub async fn fetch_generation(
        &self,
        generation_id: &str,
    ) -> Result<GenerationSnapshot, LeonardoError> {
        let resp = self
            .client
            .get(format!("{}/generations/{generation_id}", self.base_url))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(LeonardoError::Api { status, message });
        }

        let body = resp.json::<GenerationStatusResponse>().await?;
        let generation = body.generation.unwrap_or_default();

        let clip_url = generation
            .generated_images
            .iter()
            .find_map(|image| image.motion_mp4_url.clone());
        let status = JobStatus::parse(generation.status.as_deref().unwrap_or(""));

        Ok(GenerationSnapshot { status, clip_url })
    }
}

impl MotionUploader for LeonardoClient {
    type Error = LeonardoError;

    async fn upload(&self, image_path: &Path) -> Result<RemoteAsset, LeonardoError> {
        let slot = self.request_upload_slot(extension_of(image_path)).await?;
        self.submit_upload(&slot, image_path).await?;
        Ok(RemoteAsset { id: slot.asset_id })
    }
}

impl MotionGenerator for LeonardoClient {
    type Error = LeonardoError;

    async fn request_motion(
        &self,
        asset: &RemoteAsset,
        motion_strength: u8,
    ) -> Result<Option<String>, LeonardoError> {
        let job = self
            .send_motion_request(asset, motion_strength)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to create motion job"))?;
        tracing::info!(generation_id = %job.generation_id, "Motion generation started");

        poll_generation(
            || self.fetch_generation(&job.generation_id),
            self.poll_interval,
            self.max_poll_attempts,
        )
        .await
    }
}

/// Upload destination returned by phase one of the upload protocol.
#[derive(Debug, Clone)]
pub struct UploadSlot {
    pub asset_id: String,
    pub url: String,
    pub fields: HashMap<String, String>,
}

fn extension_of(path: &Path) -> &str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") | Some("PNG") => "png",
        _ => "jpg",
    }
}

fn mime_for_extension(extension: &str) -> &'static str {
    match extension {
        "png" => "image/png",
        _ => "image/jpeg",
    }
}

#[derive(Debug, Deserialize)]
struct InitImageResponse {
    #[serde(rename = "uploadInitImage")]
    upload_init_image: UploadInitImage,
}

#[derive(Debug, Deserialize)]
struct UploadInitImage {
    id: String,
    url: String,
    fields: String,
}

#[derive(Debug, Deserialize)]
struct MotionGenerationResponse {
    #[serde(rename = "motionSvdGenerationJob")]
    job: MotionSvdGenerationJob,
}

#[derive(Debug, Deserialize)]
struct MotionSvdGenerationJob {
    #[serde(rename = "generationId")]
    generation_id: String,
}

#[derive(Debug, Deserialize)]
struct GenerationStatusResponse {
    #[serde(rename = "generations_by_pk")]
    generation: Option<GenerationByPk>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerationByPk {
    status: Option<String>,
    #[serde(default)]
    generated_images: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
struct GeneratedImage {
    #[serde(rename = "motionMP4URL")]
    motion_mp4_url: Option<String>,
}
