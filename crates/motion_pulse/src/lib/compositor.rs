use std::{fmt::Debug, path::PathBuf};

use ffmpeg_bindings::{FfmpegError, RenderSettings, VideoProcessor};
use rayon::prelude::*;

use crate::types::ClipSet;

/// Everything the rendering stage needs for one run: the gathered clips,
/// presentation parameters, a scratch directory for intermediates, and the
/// final output path.
#[derive(Debug, Clone)]
pub struct CompositionJob {
    pub clips: ClipSet,
    pub duration_per_clip: f64,
    pub caption: String,
    pub audio_path: Option<PathBuf>,
    pub scratch_dir: PathBuf,
    pub output_path: PathBuf,
}

/// Synchronous rendering stage. Runs on a blocking worker; everything it
/// writes besides the output file lands in the job's scratch directory.
pub trait Compositor {
    type Error: Debug + Send + 'static;

    fn assemble(&self, job: &CompositionJob) -> Result<(), Self::Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum CompositorError {
    #[error("no valid motion videos generated")]
    EmptyClipSet,
    #[error(transparent)]
    Ffmpeg(#[from] FfmpegError),
}

/// Composes motion clips with ffmpeg: trim and letterbox each clip onto a
/// common canvas, concatenate in input order, overlay the caption band, and
/// attach the audio track matched to the video duration.
#[derive(Debug, Clone)]
pub struct FfmpegCompositor<F> {
    video: F,
    settings: RenderSettings,
}

impl<F: VideoProcessor> FfmpegCompositor<F> {
    pub fn new(video: F, settings: RenderSettings) -> Self {
        Self { video, settings }
    }
}

impl<F: VideoProcessor + Sync> Compositor for FfmpegCompositor<F> {
    type Error = CompositorError;

    fn assemble(&self, job: &CompositionJob) -> Result<(), CompositorError> {
        if job.clips.is_empty() {
            return Err(CompositorError::EmptyClipSet);
        }
        tracing::info!(clips = job.clips.len(), "Composing final video");

        // Clips are independent until concatenation; fan the re-encodes out.
        let normalized: Vec<PathBuf> = (0..job.clips.len())
            .map(|i| job.scratch_dir.join(format!("clip_{i:03}.mp4")))
            .collect();
        job.clips
            .as_slice()
            .par_iter()
            .enumerate()
            .try_for_each(|(i, clip)| {
                self.video.trim_and_letterbox(
                    clip,
                    job.duration_per_clip,
                    &self.settings,
                    &normalized[i],
                )
            })?;

        let combined = job.scratch_dir.join("combined.mp4");
        let list_path = job.scratch_dir.join("clips.txt");
        self.video.concat_clips(&normalized, &list_path, &combined)?;

        // The caption pass performs the final video encode; with audio to
        // attach it renders to an intermediate, otherwise straight to the
        // output file.
        let captioned = if job.audio_path.is_some() {
            job.scratch_dir.join("captioned.mp4")
        } else {
            job.output_path.clone()
        };
        self.video
            .render_caption(&combined, &job.caption, &self.settings, &captioned)?;

        if let Some(audio) = &job.audio_path {
            let video_duration = self.video.probe_duration(&captioned)?;
            self.video.mux_looped_audio(
                &captioned,
                audio,
                video_duration,
                &self.settings,
                &job.output_path,
            )?;
        }

        tracing::info!(output = %job.output_path.display(), "Final video rendered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        path::Path,
        sync::{Arc, Mutex},
    };

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingVideo {
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingVideo {
        fn record(&self, entry: String) {
            self.calls.lock().unwrap().push(entry);
        }
    }

    impl VideoProcessor for RecordingVideo {
        fn probe_duration(&self, _input: &Path) -> Result<f64, FfmpegError> {
            self.record("probe".into());
            Ok(10.0)
        }

        fn trim_and_letterbox(
            &self,
            input: &Path,
            duration_secs: f64,
            _settings: &RenderSettings,
            _output: &Path,
        ) -> Result<(), FfmpegError> {
            self.record(format!(
                "trim {} {duration_secs}",
                input.file_name().unwrap().to_string_lossy()
            ));
            Ok(())
        }

        fn concat_clips(
            &self,
            clips: &[PathBuf],
            _list_path: &Path,
            _output: &Path,
        ) -> Result<(), FfmpegError> {
            self.record(format!("concat {}", clips.len()));
            Ok(())
        }

        fn render_caption(
            &self,
            _input: &Path,
            caption: &str,
            _settings: &RenderSettings,
            output: &Path,
        ) -> Result<(), FfmpegError> {
            self.record(format!(
                "caption '{caption}' -> {}",
                output.file_name().unwrap().to_string_lossy()
            ));
            Ok(())
        }

        fn mux_looped_audio(
            &self,
            _video: &Path,
            _audio: &Path,
            video_duration_secs: f64,
            _settings: &RenderSettings,
            _output: &Path,
        ) -> Result<(), FfmpegError> {
            self.record(format!("mux {video_duration_secs}"));
            Ok(())
        }
    }

    fn job(clips: Vec<PathBuf>, audio: Option<PathBuf>) -> CompositionJob {
        CompositionJob {
            clips: ClipSet::new(clips),
            duration_per_clip: 3.0,
            caption: "hello".into(),
            audio_path: audio,
            scratch_dir: PathBuf::from("/tmp/run"),
            output_path: PathBuf::from("/tmp/out/video_abc.mp4"),
        }
    }

    #[test]
    fn empty_clip_set_errors_before_any_ffmpeg_work() {
        let video = RecordingVideo::default();
        let calls = video.calls.clone();
        let compositor = FfmpegCompositor::new(video, RenderSettings::default());

        let err = compositor.assemble(&job(vec![], None)).unwrap_err();

        assert!(matches!(err, CompositorError::EmptyClipSet));
        assert_eq!(err.to_string(), "no valid motion videos generated");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[test]
    fn trims_every_clip_then_concats_captions_and_muxes() {
        let video = RecordingVideo::default();
        let calls = video.calls.clone();
        let compositor = FfmpegCompositor::new(video, RenderSettings::default());

        compositor
            .assemble(&job(
                vec![PathBuf::from("/tmp/run/motion_0.mp4"), PathBuf::from("/tmp/run/motion_2.mp4")],
                Some(PathBuf::from("/tmp/run/audio.mp3")),
            ))
            .unwrap();

        let calls = calls.lock().unwrap();
        // Trims fan out across the rayon pool; their relative order is free.
        assert!(calls[..2].iter().all(|c| c.starts_with("trim")));
        assert!(calls.contains(&"trim motion_0.mp4 3".to_string()));
        assert!(calls.contains(&"trim motion_2.mp4 3".to_string()));
        assert_eq!(
            calls[2..],
            [
                "concat 2".to_string(),
                "caption 'hello' -> captioned.mp4".to_string(),
                "probe".to_string(),
                "mux 10".to_string(),
            ]
        );
    }

    #[test]
    fn without_audio_the_caption_pass_writes_the_output_directly() {
        let video = RecordingVideo::default();
        let calls = video.calls.clone();
        let compositor = FfmpegCompositor::new(video, RenderSettings::default());

        compositor
            .assemble(&job(vec![PathBuf::from("/tmp/run/motion_0.mp4")], None))
            .unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(
            calls[1..],
            [
                "concat 1".to_string(),
                "caption 'hello' -> video_abc.mp4".to_string(),
            ]
        );
    }

    #[test]
    fn audio_is_matched_to_the_probed_video_duration() {
        let video = RecordingVideo::default();
        let calls = video.calls.clone();
        let compositor = FfmpegCompositor::new(video, RenderSettings::default());

        compositor
            .assemble(&job(
                vec![PathBuf::from("/tmp/run/motion_0.mp4")],
                Some(PathBuf::from("/tmp/run/audio.mp3")),
            ))
            .unwrap();

        let calls = calls.lock().unwrap();
        assert!(calls.contains(&"mux 10".to_string()));
    }
}
