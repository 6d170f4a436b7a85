use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use motion_pulse::{MotionGenerator, RemoteAsset};

#[derive(Clone, Default)]
pub struct MockMotionGenerator {
    pub calls: Arc<Mutex<Vec<(String, u8)>>>,
    /// Asset ids that reach a terminal state without producing a clip.
    pub none_for: HashSet<String>,
    pub fail_with: Option<String>,
}

impl MockMotionGenerator {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn none_for(asset_ids: impl IntoIterator<Item = String>) -> Self {
        Self {
            none_for: asset_ids.into_iter().collect(),
            ..Default::default()
        }
    }
}

impl MotionGenerator for MockMotionGenerator {
    type Error = anyhow::Error;

    async fn request_motion(
        &self,
        asset: &RemoteAsset,
        motion_strength: u8,
    ) -> anyhow::Result<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .push((asset.id.clone(), motion_strength));
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        if self.none_for.contains(&asset.id) {
            return Ok(None);
        }
        Ok(Some(format!("https://cdn.mock/{}.mp4", asset.id)))
    }
}
