use std::sync::{Arc, Mutex};

use motion_pulse::{CompositionJob, Compositor};

#[derive(Clone, Default)]
pub struct MockCompositor {
    pub jobs: Arc<Mutex<Vec<CompositionJob>>>,
    pub fail_with: Option<String>,
}

impl MockCompositor {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl Compositor for MockCompositor {
    type Error = anyhow::Error;

    fn assemble(&self, job: &CompositionJob) -> anyhow::Result<()> {
        self.jobs.lock().unwrap().push(job.clone());
        if let Some(ref msg) = self.fail_with {
            anyhow::bail!("{}", msg);
        }
        std::fs::write(&job.output_path, b"rendered video")?;
        Ok(())
    }
}
