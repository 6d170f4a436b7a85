use std::{ops::Deref, path::Path};

use crate::motion::ClipFetcher;

/// Downloads produced motion clips over HTTP.
#[derive(Default)]
pub struct HttpClipFetcher(pub reqwest::Client);

impl Deref for HttpClipFetcher {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ClipFetcher for HttpClipFetcher {
    type Error = anyhow::Error;

    async fn fetch(&self, url: &str, dest: &Path) -> anyhow::Result<()> {
        let resp = self.get(url).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp.text().await.unwrap_or_default();
            anyhow::bail!("Failed to download clip: {status} - {message}");
        }

        let bytes = resp.bytes().await?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }
}
