use std::{
    io::Write,
    path::{Path, PathBuf},
    process::Command,
};

use crate::FfmpegError;

/// Encoding parameters shared by every rendering step.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub video_bitrate: String,
    pub audio_bitrate: String,
    pub font_size: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30,
            video_bitrate: "4000k".into(),
            audio_bitrate: "192k".into(),
            font_size: 30,
        }
    }
}

pub trait VideoProcessor {
    /// Duration of the container in seconds, via ffprobe.
    fn probe_duration(&self, input: &Path) -> Result<f64, FfmpegError>;

    /// Caps `input` at `duration_secs` and letterboxes it onto the settings
    /// canvas (scale preserving aspect ratio, then pad), dropping audio.
    fn trim_and_letterbox(
        &self,
        input: &Path,
        duration_secs: f64,
        settings: &RenderSettings,
        output: &Path,
    ) -> Result<(), FfmpegError>;

    /// Concatenates uniformly encoded clips in slice order via the concat
    /// demuxer, writing the list file to `list_path`.
    fn concat_clips(
        &self,
        clips: &[PathBuf],
        list_path: &Path,
        output: &Path,
    ) -> Result<(), FfmpegError>;

    /// Final video encode, overlaying `caption` as a bottom-centered band.
    /// An empty caption skips the drawtext filter but still encodes.
    fn render_caption(
        &self,
        input: &Path,
        caption: &str,
        settings: &RenderSettings,
        output: &Path,
    ) -> Result<(), FfmpegError>;

    /// Attaches `audio` as the single audio stream, looping it if shorter
    /// than `video_duration_secs` and truncating it if longer, so the output
    /// audio duration matches the video duration exactly.
    fn mux_looped_audio(
        &self,
        video: &Path,
        audio: &Path,
        video_duration_secs: f64,
        settings: &RenderSettings,
        output: &Path,
    ) -> Result<(), FfmpegError>;
}

#[derive(Debug, Clone)]
pub struct FfMpeg {
    ffmpeg_path: PathBuf,
    ffprobe_path: PathBuf,
}

impl FfMpeg {
    /// Resolves `ffmpeg` and `ffprobe` from `PATH`.
    pub fn new() -> Result<Self, FfmpegError> {
        let ffmpeg_path =
            which::which("ffmpeg").map_err(|_| FfmpegError::BinaryNotFound("ffmpeg"))?;
        let ffprobe_path =
            which::which("ffprobe").map_err(|_| FfmpegError::BinaryNotFound("ffprobe"))?;
        Ok(Self {
            ffmpeg_path,
            ffprobe_path,
        })
    }

    pub fn with_paths(ffmpeg_path: impl Into<PathBuf>, ffprobe_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            ffprobe_path: ffprobe_path.into(),
        }
    }

    fn run_ffmpeg(&self, args: &[String]) -> Result<(), FfmpegError> {
        tracing::debug!(args = ?args, "Running ffmpeg");
        let output = Command::new(&self.ffmpeg_path).args(args).output()?;
        if !output.status.success() {
            return Err(FfmpegError::CommandFailed {
                command: "ffmpeg",
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }
}

impl VideoProcessor for FfMpeg {
    fn probe_duration(&self, input: &Path) -> Result<f64, FfmpegError> {
        let args = build_probe_args(input);
        tracing::debug!(args = ?args, "Running ffprobe");
        let output = Command::new(&self.ffprobe_path).args(&args).output()?;
        if !output.status.success() {
            return Err(FfmpegError::CommandFailed {
                command: "ffprobe",
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        parse_duration(&String::from_utf8_lossy(&output.stdout))
    }

    fn trim_and_letterbox(
        &self,
        input: &Path,
        duration_secs: f64,
        settings: &RenderSettings,
        output: &Path,
    ) -> Result<(), FfmpegError> {
        self.run_ffmpeg(&build_trim_args(input, duration_secs, settings, output))
    }

    fn concat_clips(
        &self,
        clips: &[PathBuf],
        list_path: &Path,
        output: &Path,
    ) -> Result<(), FfmpegError> {
        let mut list = std::fs::File::create(list_path)?;
        for clip in clips {
            writeln!(list, "file '{}'", clip.display())?;
        }
        self.run_ffmpeg(&build_concat_args(list_path, output))
    }

    fn render_caption(
        &self,
        input: &Path,
        caption: &str,
        settings: &RenderSettings,
        output: &Path,
    ) -> Result<(), FfmpegError> {
        self.run_ffmpeg(&build_caption_args(input, caption, settings, output))
    }

    fn mux_looped_audio(
        &self,
        video: &Path,
        audio: &Path,
        video_duration_secs: f64,
        settings: &RenderSettings,
        output: &Path,
    ) -> Result<(), FfmpegError> {
        self.run_ffmpeg(&build_mux_args(
            video,
            audio,
            video_duration_secs,
            settings,
            output,
        ))
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

fn build_probe_args(input: &Path) -> Vec<String> {
    vec![
        "-v".into(),
        "error".into(),
        "-show_entries".into(),
        "format=duration".into(),
        "-of".into(),
        "default=noprint_wrappers=1:nokey=1".into(),
        path_arg(input),
    ]
}

fn parse_duration(stdout: &str) -> Result<f64, FfmpegError> {
    stdout
        .trim()
        .parse::<f64>()
        .map_err(|_| FfmpegError::Probe(stdout.trim().to_string()))
}

fn build_trim_args(
    input: &Path,
    duration_secs: f64,
    settings: &RenderSettings,
    output: &Path,
) -> Vec<String> {
    let filter = format!(
        "scale={w}:{h}:force_original_aspect_ratio=decrease,\
         pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,fps={fps}",
        w = settings.width,
        h = settings.height,
        fps = settings.fps,
    );
    vec![
        "-y".into(),
        "-i".into(),
        path_arg(input),
        "-t".into(),
        format!("{duration_secs:.3}"),
        "-vf".into(),
        filter,
        "-an".into(),
        "-c:v".into(),
        "libx264".into(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        path_arg(output),
    ]
}

fn build_concat_args(list_path: &Path, output: &Path) -> Vec<String> {
    vec![
        "-y".into(),
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        path_arg(list_path),
        "-c".into(),
        "copy".into(),
        path_arg(output),
    ]
}

fn build_caption_args(
    input: &Path,
    caption: &str,
    settings: &RenderSettings,
    output: &Path,
) -> Vec<String> {
    let mut args = vec!["-y".into(), "-i".into(), path_arg(input)];
    if !caption.is_empty() {
        let drawtext = format!(
            "drawtext=text='{text}':fontcolor=white:fontsize={size}:\
             box=1:boxcolor=black@0.4:boxborderw=16:\
             x=(w-text_w)/2:y=h-text_h-40",
            text = escape_drawtext(caption),
            size = settings.font_size,
        );
        args.push("-vf".into());
        args.push(drawtext);
    }
    args.extend([
        "-r".into(),
        settings.fps.to_string(),
        "-c:v".into(),
        "libx264".into(),
        "-b:v".into(),
        settings.video_bitrate.clone(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        path_arg(output),
    ]);
    args
}

fn build_mux_args(
    video: &Path,
    audio: &Path,
    video_duration_secs: f64,
    settings: &RenderSettings,
    output: &Path,
) -> Vec<String> {
    vec![
        "-y".into(),
        "-i".into(),
        path_arg(video),
        "-stream_loop".into(),
        "-1".into(),
        "-i".into(),
        path_arg(audio),
        "-map".into(),
        "0:v:0".into(),
        "-map".into(),
        "1:a:0".into(),
        "-c:v".into(),
        "copy".into(),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        settings.audio_bitrate.clone(),
        "-t".into(),
        format!("{video_duration_secs:.3}"),
        path_arg(output),
    ]
}

// Escapes the characters the drawtext filter treats specially inside a
// quoted text value.
fn escape_drawtext(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            ':' => escaped.push_str("\\:"),
            ',' => escaped.push_str("\\,"),
            ';' => escaped.push_str("\\;"),
            '%' => escaped.push_str("\\%"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
