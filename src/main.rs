//! Plagiview - plagiarism analysis review client.
//!
//! Terminal client for reviewing plagiarism analyses produced by the
//! soutenance platform: scores, match tables, text diffs and overlay
//! geometry for the PDF viewer.

use plagiview::cli;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "plagiview=info"
    } else {
        "plagiview=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::run().await
}
