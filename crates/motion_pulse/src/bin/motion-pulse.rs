use std::path::PathBuf;

use clap::Parser;
use ffmpeg_bindings::FfMpeg;
use motion_pulse::{
    tracing::init_tracing_subscriber, types::AssemblyRequest, AssemblyError, FfmpegCompositor,
    HttpClipFetcher, LeonardoClient, PipelineConfig, VideoAssemblerBuilder,
};

#[derive(Parser)]
#[command(name = "motion-pulse", about = "Assembles still images into a motion video")]
struct Cli {
    /// Leonardo.ai API key
    #[arg(long, env = "LEONARDO_API_KEY")]
    api_key: String,

    /// Source images, in the order they should appear
    #[arg(long = "image", required = true)]
    images: Vec<PathBuf>,

    /// Seconds each clip is shown for
    #[arg(long, default_value_t = AssemblyRequest::DEFAULT_DURATION_PER_IMAGE)]
    duration_per_image: f64,

    /// Caption overlaid on the final video
    #[arg(long, default_value = "")]
    caption: String,

    /// Optional audio track, looped or truncated to fit
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Motion strength passed to the animation service
    #[arg(long, default_value_t = AssemblyRequest::DEFAULT_MOTION_STRENGTH)]
    motion_strength: u8,

    /// Working directory for per-run scratch files
    #[arg(long, default_value = "/var/tmp/motion-pulse")]
    workdir: PathBuf,

    /// Directory the rendered video is written to
    #[arg(long, default_value = "static/videos")]
    output_dir: PathBuf,
}

async fn run_pipeline(cli: Cli) -> Result<(), AssemblyError> {
    let config = PipelineConfig::new(&cli.api_key);

    // Handles both upload and motion generation, hence the clone.
    let leonardo = LeonardoClient::from_config(&config.leonardo);
    let ffmpeg = FfMpeg::new()
        .map_err(|e| AssemblyError::Render(anyhow::anyhow!("ffmpeg unavailable: {e}")))?;

    let assembler = VideoAssemblerBuilder::new(&cli.workdir)
        .uploader(leonardo.clone())
        .motion_generator(leonardo)
        .clip_fetcher(HttpClipFetcher::default())
        .compositor(FfmpegCompositor::new(ffmpeg, config.render.clone()))
        .image_limits(config.image_limits.clone())
        .output_dir(&cli.output_dir)
        .build();

    let mut request = AssemblyRequest::new(cli.images, cli.caption);
    request.duration_per_image = cli.duration_per_image;
    request.audio_path = cli.audio;
    request.motion_strength = cli.motion_strength;

    let rendered = assembler.run(request).await?;
    println!("{}", rendered.path().display());
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    if let Err(e) = run_pipeline(cli).await {
        if e.is_client_error() {
            tracing::warn!(error = %e, "Assembly rejected; check the submitted images");
        } else {
            tracing::error!(error = %e, "Assembly failed");
        }
        return Err(e.into());
    }

    Ok(())
}
