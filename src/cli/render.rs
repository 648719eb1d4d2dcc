//! Terminal rendering for analysis results.
//!
//! Colors track the risk tiers used everywhere else: green for low, yellow
//! for medium, red for high, bold red for critical.

use std::time::Duration;

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};

use std::fmt::Write;

use crate::diff::{diff_words, DiffKind};
use crate::models::{AnalysisResult, Match};
use crate::risk::{self, RiskTier};
use crate::viewer::MatchBrowser;

/// Spinner shown while a request is in flight.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    pb
}

/// Apply the tier's color to a text fragment.
pub fn tier_styled(tier: RiskTier, text: String) -> StyledObject<String> {
    match tier {
        RiskTier::Low => style(text).green(),
        RiskTier::Medium => style(text).yellow(),
        RiskTier::High => style(text).red(),
        RiskTier::Critical => style(text).red().bold(),
    }
}

/// Tier badge: colored label like the UI chips.
pub fn tier_badge(tier: RiskTier) -> StyledObject<String> {
    tier_styled(tier, tier.label().to_string())
}

/// Char-safe truncation with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Print the score and statistics summary of an analysis.
pub fn print_summary(result: &AnalysisResult) {
    println!();
    println!(
        "{}  {}",
        style(&result.rapport).bold(),
        style(format!("(analyse #{})", result.analysis_id)).dim()
    );
    println!("Étudiant: {}", result.student);
    if let Some(analyzed_at) = result.analyzed_at {
        println!(
            "Analysé le {}",
            analyzed_at.format("%d/%m/%Y %H:%M")
        );
    }
    println!();

    let emphasis = risk::classify_emphasis(result.similarity.value());
    println!(
        "  Similarité   {}   Originalité  {}   Risque  {}",
        tier_styled(emphasis, result.similarity.display()),
        style(result.originality.display()).green(),
        tier_badge(result.risk)
    );
    println!("  {}", style(risk::originality_message(result.similarity.value())).dim());
    println!();

    println!("{}", style("Statistiques d'analyse").bold());
    println!(
        "  Chunks analysés: {}   Avec correspondances: {} ({:.1}%)   Score IA: {:.0}%",
        result.chunks_analyzed,
        result.chunks_with_matches,
        result.match_rate(),
        result.ai_score
    );
    println!(
        "  Correspondances: {}   Similarité moyenne: {:.1}%",
        result.total_matches, result.avg_similarity
    );
    println!();

    println!("{}", style("Statistiques du document").bold());
    println!(
        "  Mots: {}   Caractères: {}   Paragraphes: {}   Mots uniques: {}   Lisibilité: {:.0}",
        result.stats.words,
        result.stats.characters,
        result.stats.paragraphs,
        result.stats.unique_words,
        result.stats.readability
    );
}

/// Print the sortable match table.
pub fn print_match_table(browser: &MatchBrowser, limit: usize) {
    let visible = browser.visible();
    if visible.is_empty() {
        println!("\n  Aucune correspondance.");
        return;
    }

    println!();
    println!(
        "  {:<6} {:<5} {:<44} {:<22} {:>12}  {}",
        style("Chunk").bold(),
        style("Page").bold(),
        style("Texte soumis").bold(),
        style("Source").bold(),
        style("Similarité").bold(),
        style("Risque").bold()
    );
    println!("  {}", "-".repeat(100));

    let shown = if limit == 0 { visible.len() } else { limit.min(visible.len()) };
    for m in &visible[..shown] {
        println!(
            "  {:<6} {:<5} {:<44} {:<22} {:>11}  {}",
            m.display_number(),
            m.page,
            truncate(&m.text, 42),
            truncate(&m.source, 20),
            tier_styled(m.tier(), format!("{:.1}%", m.similarity)),
            tier_badge(m.tier())
        );
    }
    if shown < visible.len() {
        println!(
            "  {}",
            style(format!("... {} autres correspondances", visible.len() - shown)).dim()
        );
    }
}

/// Render the detail panel for one match.
///
/// Returned as a string so callers (and tests) can inspect exactly what
/// gets printed; the heading carries the same 1-based number the match
/// table shows.
pub fn format_match_detail(m: &Match, with_diff: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}",
        style(format!("Correspondance (chunk {})", m.display_number())).bold()
    );
    let _ = writeln!(
        out,
        "  Page {}   Similarité {}   Risque {}",
        m.page,
        tier_styled(m.tier(), format!("{:.1}%", m.similarity)),
        tier_badge(m.tier())
    );

    if m.source.is_empty() {
        let _ = writeln!(out, "  Source: {}", style("inconnue").dim());
    } else {
        let _ = writeln!(out, "  Source: {}", m.source);
    }
    // No link line when the backend gave no URL.
    if let Some(url) = &m.source_url {
        let _ = writeln!(out, "  URL: {}", style(url).underlined());
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", style("Texte soumis (rapport):").bold());
    let _ = writeln!(
        out,
        "  {}",
        if m.text.is_empty() { "Non disponible." } else { m.text.as_str() }
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", style("Texte correspondant (source):").bold());
    let _ = writeln!(
        out,
        "  {}",
        if m.matched_text.is_empty() { "Non disponible." } else { m.matched_text.as_str() }
    );

    if with_diff && !m.text.is_empty() && !m.matched_text.is_empty() {
        out.push_str(&format_diff(&m.matched_text, &m.text));
    }
    out
}

/// Print the detail panel for one match.
pub fn print_match_detail(m: &Match, with_diff: bool) {
    print!("{}", format_match_detail(m, with_diff));
}

/// Dual-pane word diff: source pane strikes through removed spans, the
/// submitted pane colors added spans.
pub fn format_diff(source: &str, submitted: &str) -> String {
    let segments = diff_words(source, submitted);

    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", style("Comparaison:").bold());

    out.push_str("  Source:  ");
    for segment in &segments {
        match segment.kind {
            DiffKind::Unchanged => out.push_str(&segment.text),
            DiffKind::Removed => {
                let _ = write!(out, "{}", style(&segment.text).red().strikethrough());
            }
            DiffKind::Added => {}
        }
    }
    out.push('\n');

    out.push_str("  Rapport: ");
    for segment in &segments {
        match segment.kind {
            DiffKind::Unchanged => out.push_str(&segment.text),
            DiffKind::Added => {
                let _ = write!(out, "{}", style(&segment.text).green());
            }
            DiffKind::Removed => {}
        }
    }
    out.push('\n');
    out
}
