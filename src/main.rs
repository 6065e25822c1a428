use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber;

use chroma_compositor::{config::Config, job::JobWorkspace, render::RenderEngine};

#[derive(Parser)]
#[command(
    name = "chroma-compositor",
    version,
    about = "Replace the green-screen backdrop of a video with a photo",
    long_about = "Chroma-Compositor keys out the green-screen backdrop of a source video and composites a user-supplied photo behind it, carrying the original audio track over into the output."
)]
struct Cli {
    /// Green-screen source video (MP4, MOV, ...)
    #[arg(short = 'i', long)]
    video: PathBuf,

    /// Photo to composite behind the keyed footage
    #[arg(short, long)]
    photo: PathBuf,

    /// Output video file path
    #[arg(short, long)]
    output: PathBuf,

    /// Job identifier used to key the working directory (defaults to the
    /// process id)
    #[arg(short, long)]
    job_id: Option<String>,

    /// Configuration file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .init();

    info!("Starting Chroma-Compositor v{}", env!("CARGO_PKG_VERSION"));
    info!("Video: {:?}", cli.video);
    info!("Photo: {:?}", cli.photo);
    info!("Output: {:?}", cli.output);

    // Load configuration
    let config = match cli.config {
        Some(config_path) => {
            info!("Loading configuration from {:?}", config_path);
            Config::from_file(&config_path)?
        }
        None => {
            info!("Using default configuration");
            Config::default()
        }
    };
    config.validate()?;

    let job_id = cli
        .job_id
        .unwrap_or_else(|| std::process::id().to_string());

    // Stage the inputs into a per-job workspace; the workspace removes itself
    // even when the render fails partway
    let workspace = JobWorkspace::create(&config.job.root, &job_id)?;
    workspace.stage_video(&cli.video)?;
    workspace.stage_photo(&cli.photo)?;

    let engine = RenderEngine::new(config);
    engine
        .render(
            &workspace.video_path(),
            &workspace.photo_path(),
            &workspace.output_path(),
        )
        .await?;

    // Deliver the result, then release the workspace
    std::fs::copy(workspace.output_path(), &cli.output)?;
    workspace.cleanup()?;

    info!("Render complete! Output saved to: {:?}", cli.output);
    Ok(())
}
