use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use motion_pulse::{MotionUploader, RemoteAsset};

#[derive(Clone, Default)]
pub struct MockUploader {
    pub calls: Arc<Mutex<Vec<PathBuf>>>,
    pub fail_for: HashSet<PathBuf>,
    pub fail_with: Option<String>,
}

impl MockUploader {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn failing_for(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            fail_for: paths.into_iter().collect(),
            ..Default::default()
        }
    }
}

impl MotionUploader for MockUploader {
    type Error = anyhow::Error;

    async fn upload(&self, image_path: &Path) -> anyhow::Result<RemoteAsset> {
        self.calls.lock().unwrap().push(image_path.to_path_buf());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        if self.fail_for.contains(image_path) {
            return Err(anyhow::anyhow!(
                "upload rejected for {}",
                image_path.display()
            ));
        }
        let stem = image_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(RemoteAsset {
            id: format!("asset-{stem}"),
        })
    }
}
