use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use detectview::presenter::{self, LOWER_THRESHOLD_HINT, NO_DETECTIONS_MESSAGE, ResultView};
use detectview::{Config, DetectionClient, DetectionPage, FileCandidate, UiState, UploadController};

#[derive(Parser)]
#[command(name = "detectview")]
#[command(about = "Upload images to an object-detection service and inspect the results")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, value_name = "FILE", env = "DETECTVIEW_CONFIG")]
    config: Option<PathBuf>,

    /// Backend origin, overrides the config file
    #[arg(long, value_name = "URL", env = "DETECTVIEW_BACKEND")]
    backend: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the desktop client (default)
    #[cfg(feature = "gui")]
    Gui,

    /// Submit one image and print the detections
    Detect {
        /// Path to input image file
        #[arg(value_name = "IMAGE")]
        image_path: PathBuf,

        /// Minimum score the service should keep (clamped to 0.1..=1.0)
        #[arg(short, long)]
        confidence: Option<f32>,

        /// Save the annotated result image here
        #[arg(long, value_name = "PATH")]
        save: Option<PathBuf>,
    },

    /// Check the service's health endpoint
    Health,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(origin) = args.backend {
        config = config.with_origin(origin);
    }
    config.origin()?;
    info!(origin = %config.backend.origin, "using detection service");

    match args.command {
        #[cfg(feature = "gui")]
        None | Some(Command::Gui) => detectview::gui::run(config),
        #[cfg(not(feature = "gui"))]
        None => anyhow::bail!("built without the `gui` feature; use `detect` or `health`"),
        Some(Command::Detect {
            image_path,
            confidence,
            save,
        }) => runtime()?.block_on(detect(config, image_path, confidence, save)),
        Some(Command::Health) => runtime()?.block_on(health(config)),
    }
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("start tokio runtime")
}

async fn detect(
    config: Config,
    image_path: PathBuf,
    confidence: Option<f32>,
    save: Option<PathBuf>,
) -> anyhow::Result<()> {
    let client = DetectionClient::new(&config)?;
    let mut controller = UploadController::new(config.upload.default_confidence);
    if let Some(confidence) = confidence {
        controller.set_confidence_threshold(confidence);
    }

    let candidate = FileCandidate::from_path(&image_path).await?;
    controller.select_file(candidate)?;
    let request = controller.prepare_submission()?;

    let mut page = DetectionPage::new();
    page.begin_submission()?;
    page.finish(client.detect(request).await);

    let ResultView::Results(view) = presenter::present(page.state()) else {
        match page.state() {
            UiState::Failure(message) => anyhow::bail!("{}", message),
            _ => anyhow::bail!("detection did not complete"),
        }
    };

    println!("\n=== Detection Results ===");
    println!("Objects detected: {}", view.summary.object_count);
    println!("Processing time:  {}", view.summary.processing_time);
    println!("Image size:       {}", view.summary.image_size);

    if view.has_detections() {
        println!("\n{}", view.heading());
        for row in &view.rows {
            println!(
                "  {:<16} {:>6}  {}  {}",
                row.label,
                row.percent,
                row.position(),
                row.size()
            );
        }
    } else {
        println!("\n{}", NO_DETECTIONS_MESSAGE);
        println!("{}", LOWER_THRESHOLD_HINT);
    }

    if let Some(path) = save {
        let bytes = client.fetch_image(&view.image_url).await?;
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        println!("\nSaved result image to {}", path.display());
    }
    Ok(())
}

async fn health(config: Config) -> anyhow::Result<()> {
    let client = DetectionClient::new(&config)?;
    let status = client
        .health()
        .await
        .with_context(|| format!("health check against {}", client.origin()))?;
    println!("Status:       {}", status.status);
    println!("Model loaded: {}", status.model_loaded);
    println!("Device:       {}", status.device);
    if !status.is_ready() {
        anyhow::bail!("detection service is not ready");
    }
    Ok(())
}
