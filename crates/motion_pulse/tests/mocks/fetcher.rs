use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use motion_pulse::ClipFetcher;

#[derive(Clone, Default)]
pub struct MockClipFetcher {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockClipFetcher {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl ClipFetcher for MockClipFetcher {
    type Error = anyhow::Error;

    async fn fetch(&self, url: &str, dest: &Path) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        tokio::fs::write(dest, b"mock clip bytes").await?;
        Ok(())
    }
}
