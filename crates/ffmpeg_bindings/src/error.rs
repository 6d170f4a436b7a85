#[derive(Debug, thiserror::Error)]
pub enum FfmpegError {
    #[error("`{0}` binary not found in PATH")]
    BinaryNotFound(&'static str),
    #[error("{command} exited with status {status}: {stderr}")]
    CommandFailed {
        command: &'static str,
        status: i32,
        stderr: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unexpected ffprobe output: {0}")]
    Probe(String),
}
