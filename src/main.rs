//! Dogear
//!
//! Command-line entry point: load configuration from the environment, run
//! one sequential export pass over every annotated book, report counts.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dogear::config::Config;
use dogear::export;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dogear=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting Dogear v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Annotation store: {}", config.annotation_db.display());
    tracing::info!("Library store: {}", config.library_db.display());
    tracing::info!("Output directory: {}", config.output_dir.display());

    let summary = export::run(&config).await?;

    println!(
        "{} books: {} exported, {} unchanged, {} skipped",
        summary.books, summary.exported, summary.unchanged, summary.skipped
    );

    if summary.skipped > 0 {
        tracing::warn!("{} books were skipped; re-run with RUST_LOG=dogear=debug for details", summary.skipped);
    }

    Ok(())
}
