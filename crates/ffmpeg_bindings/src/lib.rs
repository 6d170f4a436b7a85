//! # FFmpeg Bindings
//!
//! Thin wrapper around the `ffmpeg` and `ffprobe` binaries for the video
//! operations the assembly pipeline composes: probing, trimming and
//! letterboxing clips onto a common canvas, concatenation, caption
//! rendering and audio muxing.
//!
//! The binaries are resolved from `PATH` at construction time. Every
//! operation builds its argument list through a pure function so command
//! construction stays testable without invoking ffmpeg.

mod error;
mod video;

pub use error::FfmpegError;
pub use video::{FfMpeg, RenderSettings, VideoProcessor};
