//! CLI commands implementation.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;

use crate::client::ApiClient;
use crate::config::{load_settings, Settings};
use crate::models::AnalysisResult;
use crate::viewer::{MatchBrowser, PageRegistry, SortDirection, SortKey};

use super::render;

#[derive(Parser)]
#[command(name = "plagiview")]
#[command(about = "Plagiarism analysis review client for the soutenance platform")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config file)
    #[arg(long, global = true, env = "PLAGIVIEW_API_URL")]
    api_url: Option<String>,

    /// Bearer token for authorized endpoints
    #[arg(long, global = true, env = "PLAGIVIEW_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Show an analysis: scores, statistics and the match table
    Show {
        /// Analysis ID
        analysis_id: i64,
        /// Sort column
        #[arg(long, value_enum, default_value = "similarity")]
        sort: SortKey,
        /// Sort ascending (default direction depends on the column)
        #[arg(long)]
        asc: bool,
        /// Sort descending
        #[arg(long, conflicts_with = "asc")]
        desc: bool,
        /// Free-text filter over submitted text, matched text and source
        #[arg(short, long)]
        filter: Option<String>,
        /// Limit the number of rows shown (0 = unlimited)
        #[arg(short, long, default_value = "0")]
        limit: usize,
    },

    /// Show the detail panel for one match
    Detail {
        /// Analysis ID
        analysis_id: i64,
        /// Match number as listed by `show` (1-based)
        number: u32,
        /// Skip the word-level diff
        #[arg(long)]
        no_diff: bool,
    },

    /// Compute highlight overlay rectangles for a page
    Overlays {
        /// Analysis ID
        analysis_id: i64,
        /// Page to compute overlays for
        #[arg(short, long, default_value = "1")]
        page: u32,
        /// Page width in layout units at scale 1
        #[arg(long, default_value = "612")]
        width: f64,
        /// Page height in layout units at scale 1
        #[arg(long, default_value = "792")]
        height: f64,
    },

    /// Trigger a reanalysis of a rapport, then re-fetch the result
    Reanalyze {
        /// Rapport ID
        rapport_id: i64,
        /// Analysis ID to re-fetch after the delay (skipped when absent)
        #[arg(long)]
        analysis_id: Option<i64>,
    },

    /// Generate and download the plagiarism report PDF
    Report {
        /// Analysis ID
        analysis_id: i64,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Download the source rapport PDF
    Fetch {
        /// Rapport ID
        rapport_id: i64,
        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Parse arguments and dispatch.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings: Settings = load_settings(cli.config.as_deref())?;
    if let Some(api_url) = cli.api_url {
        settings.api.base_url = api_url;
    }
    if let Some(token) = cli.token {
        settings.auth.token = Some(token);
    }

    let client = ApiClient::new(&settings)?;

    match cli.command {
        Commands::Show { analysis_id, sort, asc, desc, filter, limit } => {
            let direction = match (asc, desc) {
                (true, _) => Some(SortDirection::Asc),
                (_, true) => Some(SortDirection::Desc),
                _ => None,
            };
            cmd_show(&client, analysis_id, sort, direction, filter, limit).await
        }
        Commands::Detail { analysis_id, number, no_diff } => {
            cmd_detail(&client, analysis_id, number, !no_diff).await
        }
        Commands::Overlays { analysis_id, page, width, height } => {
            cmd_overlays(&client, analysis_id, page, width, height).await
        }
        Commands::Reanalyze { rapport_id, analysis_id } => {
            cmd_reanalyze(&client, rapport_id, analysis_id).await
        }
        Commands::Report { analysis_id, output } => {
            cmd_report(&client, analysis_id, &output).await
        }
        Commands::Fetch { rapport_id, output } => {
            cmd_fetch(&client, rapport_id, &output).await
        }
    }
}

async fn fetch_analysis(client: &ApiClient, analysis_id: i64) -> anyhow::Result<AnalysisResult> {
    let pb = render::spinner(&format!("Chargement de l'analyse #{analysis_id}..."));
    let result = client.get_analysis(analysis_id).await;
    pb.finish_and_clear();
    result.context("échec du chargement de l'analyse")
}

async fn cmd_show(
    client: &ApiClient,
    analysis_id: i64,
    sort: SortKey,
    direction: Option<SortDirection>,
    filter: Option<String>,
    limit: usize,
) -> anyhow::Result<()> {
    let result = fetch_analysis(client, analysis_id).await?;

    let mut browser = MatchBrowser::new(result.matches.clone());
    match direction {
        Some(direction) => browser.set_sort(sort, direction),
        None => {
            // Column default: similarity desc, chunk asc.
            if sort != browser.sort_key() {
                browser.toggle_sort(sort);
            }
        }
    }
    if let Some(filter) = filter {
        browser.set_filter(filter);
    }

    render::print_summary(&result);
    render::print_match_table(&browser, limit);
    Ok(())
}

async fn cmd_detail(
    client: &ApiClient,
    analysis_id: i64,
    number: u32,
    with_diff: bool,
) -> anyhow::Result<()> {
    let result = fetch_analysis(client, analysis_id).await?;

    // Numbers are the 1-based handles printed by `show`.
    let m = result
        .match_by_number(number)
        .with_context(|| format!("aucune correspondance numéro {number}"))?;
    render::print_match_detail(m, with_diff);
    Ok(())
}

async fn cmd_overlays(
    client: &ApiClient,
    analysis_id: i64,
    page: u32,
    width: f64,
    height: f64,
) -> anyhow::Result<()> {
    let result = fetch_analysis(client, analysis_id).await?;

    let mut registry = PageRegistry::new();
    registry.record(page, width, height);

    let overlays = registry.page_overlays(&result.matches, page);
    let on_page = result.matches.iter().filter(|m| m.page == page).count();

    println!(
        "\nPage {page} ({width}x{height}): {} correspondances, {} avec position",
        on_page,
        overlays.len()
    );
    for overlay in overlays {
        println!(
            "  chunk {:<4} left={:.1} top={:.1} width={:.1} height={:.1}  fill={} border={}",
            overlay.source.display_number(),
            overlay.rect.left,
            overlay.rect.top,
            overlay.rect.width,
            overlay.rect.height,
            overlay.fill.css(),
            overlay.border.css()
        );
    }
    Ok(())
}

async fn cmd_reanalyze(
    client: &ApiClient,
    rapport_id: i64,
    analysis_id: Option<i64>,
) -> anyhow::Result<()> {
    let pb = render::spinner(&format!("Réanalyse du rapport #{rapport_id}..."));

    match analysis_id {
        Some(analysis_id) => {
            let result = client.reanalyze_and_fetch(rapport_id, analysis_id).await;
            pb.finish_and_clear();
            let result = result.context("échec de la réanalyse")?;
            println!("{}", style("Réanalyse terminée.").green());
            render::print_summary(&result);
        }
        None => {
            let result = client.trigger_reanalysis(rapport_id).await;
            pb.finish_and_clear();
            result.context("échec de la réanalyse")?;
            println!(
                "{}",
                style("Réanalyse déclenchée; le résultat sera disponible sous peu.").green()
            );
        }
    }
    Ok(())
}

async fn cmd_report(
    client: &ApiClient,
    analysis_id: i64,
    output: &std::path::Path,
) -> anyhow::Result<()> {
    let pb = render::spinner("Génération du rapport PDF...");
    let bytes = client.generate_report(analysis_id).await;
    pb.finish_and_clear();

    let bytes = bytes.context("échec de la génération du rapport")?;
    std::fs::write(output, &bytes)
        .with_context(|| format!("impossible d'écrire {}", output.display()))?;
    println!(
        "{} {} ({} octets)",
        style("Rapport enregistré:").green(),
        output.display(),
        bytes.len()
    );
    Ok(())
}

async fn cmd_fetch(
    client: &ApiClient,
    rapport_id: i64,
    output: &std::path::Path,
) -> anyhow::Result<()> {
    let pb = render::spinner(&format!("Téléchargement du rapport #{rapport_id}..."));
    let bytes = client.fetch_rapport_pdf(rapport_id).await;
    pb.finish_and_clear();

    let bytes = bytes.context("échec du téléchargement")?;
    std::fs::write(output, &bytes)
        .with_context(|| format!("impossible d'écrire {}", output.display()))?;
    println!(
        "{} {} ({} octets)",
        style("Document enregistré:").green(),
        output.display(),
        bytes.len()
    );
    Ok(())
}
