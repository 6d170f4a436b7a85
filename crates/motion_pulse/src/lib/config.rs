use std::time::Duration;

use ffmpeg_bindings::RenderSettings;

use crate::validator::ImageLimits;

/// Connection and polling parameters for the animation service.
#[derive(Debug, Clone)]
pub struct LeonardoConfig {
    pub api_key: String,
    pub base_url: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl LeonardoConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: "https://cloud.leonardo.ai/api/rest/v1".into(),
            poll_interval: Duration::from_secs(10),
            max_poll_attempts: 120,
        }
    }
}

/// All tunables of one pipeline deployment, gathered so tests and binaries
/// substitute fakes without touching embedded literals.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub leonardo: LeonardoConfig,
    pub image_limits: ImageLimits,
    pub render: RenderSettings,
}

impl PipelineConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            leonardo: LeonardoConfig::new(api_key),
            image_limits: ImageLimits::default(),
            render: RenderSettings::default(),
        }
    }
}
