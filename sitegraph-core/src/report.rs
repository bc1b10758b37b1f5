//! Report assembly and export over a finished crawl.

use crate::centrality::{betweenness_centrality, closeness_centrality, degree_centrality};
use crate::words::{WordStat, frequency_table};
use chrono::Local;
use serde::Serialize;
use sitegraph_crawler::CrawlOutcome;
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Default export sizes: word-frequency rows, centrality table rows, and
/// pages in the link-structure excerpt.
pub const DEFAULT_TOP_WORDS: usize = 250;
pub const DEFAULT_TOP_URLS: usize = 150;
pub const DEFAULT_TOP_GRAPH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedUrl {
    pub url: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DomainReport {
    pub root_url: String,
    pub generated_at: String,
    pub pages_crawled: usize,
    pub graph_nodes: usize,
    pub graph_edges: usize,
    pub total_words: usize,
    pub distinct_words: usize,
    pub top_words: Vec<WordStat>,
    pub degree: Vec<RankedUrl>,
    pub closeness: Vec<RankedUrl>,
    pub betweenness: Vec<RankedUrl>,
    /// Edges of the induced subgraph over the best-ranked pages, for the
    /// link-structure excerpt.
    pub top_subgraph_edges: Vec<(String, String)>,
}

fn truncate_ranking(scores: Vec<(String, f64)>, limit: usize) -> Vec<RankedUrl> {
    scores
        .into_iter()
        .take(limit)
        .map(|(url, score)| RankedUrl { url, score })
        .collect()
}

/// Assemble the full report. Truncation happens here, in the caller layer:
/// the centrality functions themselves rank every node.
pub fn build_report(
    root_url: &str,
    outcome: &CrawlOutcome,
    top_words: usize,
    top_urls: usize,
    top_graph: usize,
) -> DomainReport {
    let degree = degree_centrality(&outcome.graph);
    let closeness = closeness_centrality(&outcome.graph);
    let betweenness = betweenness_centrality(&outcome.graph);

    // Link-structure excerpt: induced subgraph over the closeness top-N,
    // mirroring the chart export of the data this replaces.
    let top_nodes: Vec<String> = closeness
        .iter()
        .take(top_graph)
        .map(|(url, _)| url.clone())
        .collect();
    let subgraph = outcome.graph.subgraph(&top_nodes);
    let top_subgraph_edges: Vec<(String, String)> = subgraph
        .edges()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect();

    let distinct_words = outcome
        .global_words
        .iter()
        .collect::<HashSet<_>>()
        .len();

    DomainReport {
        root_url: root_url.to_string(),
        generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        pages_crawled: outcome.pages.len(),
        graph_nodes: outcome.graph.node_count(),
        graph_edges: outcome.graph.edge_count(),
        total_words: outcome.global_words.len(),
        distinct_words,
        top_words: frequency_table(&outcome.global_words, &outcome.pages, top_words),
        degree: truncate_ranking(degree, top_urls),
        closeness: truncate_ranking(closeness, top_urls),
        betweenness: truncate_ranking(betweenness, top_urls),
        top_subgraph_edges,
    }
}

fn push_ranking_section(out: &mut String, title: &str, ranking: &[RankedUrl]) {
    out.push_str(&format!("## {}\n", title));
    if ranking.is_empty() {
        out.push_str("  (no pages)\n\n");
        return;
    }
    for row in ranking {
        out.push_str(&format!("  {:<64} {:.6}\n", row.url, row.score));
    }
    out.push('\n');
}

/// Render the report as readable text.
pub fn render_text(report: &DomainReport) -> String {
    let mut out = String::new();
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    out.push_str("# Crawl summary\n");
    out.push_str(&format!("  Root URL: {}\n", report.root_url));
    out.push_str(&format!("  Generated: {}\n", report.generated_at));
    out.push_str(&format!("  Pages crawled: {}\n", report.pages_crawled));
    out.push_str(&format!(
        "  Link graph: {} nodes, {} edges\n",
        report.graph_nodes, report.graph_edges
    ));
    out.push_str(&format!(
        "  Words: {} total, {} distinct\n",
        report.total_words, report.distinct_words
    ));
    out.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    out.push_str("## Word frequencies\n");
    if report.top_words.is_empty() {
        out.push_str("  (no words collected)\n\n");
    } else {
        out.push_str(&format!(
            "  {:<32} {:>9} {:>11}\n",
            "Word", "Frequency", "Page count"
        ));
        for stat in &report.top_words {
            out.push_str(&format!(
                "  {:<32} {:>9} {:>11}\n",
                stat.word, stat.frequency, stat.page_count
            ));
        }
        out.push('\n');
    }

    push_ranking_section(&mut out, "Degree centrality", &report.degree);
    push_ranking_section(&mut out, "Closeness centrality", &report.closeness);
    push_ranking_section(&mut out, "Betweenness centrality", &report.betweenness);

    out.push_str("## Link structure of top pages\n");
    if report.top_subgraph_edges.is_empty() {
        out.push_str("  (no edges)\n");
    } else {
        for (from, to) in &report.top_subgraph_edges {
            out.push_str(&format!("  {} -> {}\n", from, to));
        }
    }

    out
}

/// Render the report as pretty-printed JSON.
pub fn render_json(report: &DomainReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Write a rendered report to disk.
pub fn save_report(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(contents.as_bytes())?;
    Ok(())
}
