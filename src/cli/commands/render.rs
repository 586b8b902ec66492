use anyhow::Context;
use clap::Args;
use serde_json::json;
use std::path::PathBuf;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::render::{render_itinerary_pdf, TripDocument};

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[arg(help = "Trip document JSON file: {id, destinations, duration, itinerary}")]
    pub file: PathBuf,

    #[arg(long, help = "Output directory (defaults to PDF_OUTPUT_DIR)")]
    pub output_dir: Option<PathBuf>,
}

pub async fn handle(args: RenderArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let input = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let document = TripDocument::from_json(&input)?;

    let output_dir = match args.output_dir {
        Some(dir) => dir,
        None => AppConfig::from_env().export.output_dir,
    };

    let path = tokio::task::spawn_blocking(move || render_itinerary_pdf(&document, &output_dir))
        .await
        .context("render task failed")??;

    output_success(
        output_format,
        &format!("Itinerary written to {}", path.display()),
        Some(json!({ "path": path })),
    )
}
