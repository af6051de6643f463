//! # Image Editor
//!
//! Command-line front end for the layered image editor.

use clap::Parser;
use editor_cli::{run, CliArgs, CliConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing with optional JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,editor_core=info,editor_cli=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    // Use JSON format for machine consumption (RUST_LOG_FORMAT=json)
    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = CliConfig::from(args);
    tracing::debug!(
        "Canvas {}x{}, output {} as {:?}",
        config.editor.width,
        config.editor.height,
        config.output.display(),
        config.format
    );

    let summary = run(config).await?;

    tracing::info!(
        objects = summary.objects,
        edits = summary.replay.edits,
        images = summary.replay.images,
        skipped = summary.replay.skipped_images,
        "Wrote {} as {:?}",
        summary.output.display(),
        summary.format
    );
    Ok(())
}
