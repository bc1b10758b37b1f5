//! Glue between option parsing and the crawl engine: derives the
//! same-site marker, wires up progress reporting, and maps engine errors
//! into readable strings.

use indicatif::{ProgressBar, ProgressStyle};
use sitegraph_crawler::{CrawlConfig, CrawlOutcome, Crawler};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::info;
use url::Url;

/// Options for one crawl run.
pub struct CrawlOptions {
    pub root_url: String,
    pub max_depth: usize,
    /// Same-site marker substring; derived from the root host when absent.
    pub domain_marker: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_secs: u64,
    pub concurrency: usize,
    pub show_progress: bool,
}

impl CrawlOptions {
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            max_depth: 2,
            domain_marker: None,
            user_agent: None,
            timeout_secs: 10,
            concurrency: 10,
            show_progress: false,
        }
    }
}

/// Derive the same-site marker from the root URL: its host with any
/// leading `www.` stripped, so a `https://www.example.edu/` root matches
/// links on every `example.edu` subdomain.
pub fn domain_marker_for(root_url: &str) -> Result<String, String> {
    let parsed =
        Url::parse(root_url).map_err(|e| format!("Invalid root URL {}: {}", root_url, e))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| format!("Root URL {} has no host", root_url))?;
    Ok(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Execute a crawl with the given options, driving a progress spinner
/// while pages are scheduled.
pub async fn execute_crawl(options: CrawlOptions) -> Result<CrawlOutcome, String> {
    let marker = match options.domain_marker {
        Some(ref marker) => marker.clone(),
        None => domain_marker_for(&options.root_url)?,
    };
    info!("Crawling {} (marker: {})", options.root_url, marker);

    let mut config =
        CrawlConfig::for_domain(&marker).with_timeout(Duration::from_secs(options.timeout_secs));
    if let Some(ref user_agent) = options.user_agent {
        config = config.with_user_agent(user_agent.clone());
    }

    let progress_bar = if options.show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let mut crawler = Crawler::new(config)
        .map_err(|e| format!("Failed to build crawler: {}", e))?
        .with_concurrency(options.concurrency);

    let scheduled = Arc::new(AtomicUsize::new(0));
    if let Some(ref pb) = progress_bar {
        let pb = pb.clone();
        let scheduled = scheduled.clone();
        crawler = crawler.with_progress_callback(Arc::new(move |url: String| {
            let count = scheduled.fetch_add(1, Ordering::Relaxed) + 1;
            pb.set_message(format!("Crawling... {} URLs scheduled, latest {}", count, url));
            pb.tick();
        }));
    }

    let outcome = crawler
        .crawl(&options.root_url, options.max_depth)
        .await
        .map_err(|e| format!("Crawl of {} failed: {}", options.root_url, e))?;

    if let Some(ref pb) = progress_bar {
        pb.finish_with_message(format!(
            "Crawl complete: {} pages, {} links",
            outcome.pages.len(),
            outcome.graph.edge_count()
        ));
    }

    Ok(outcome)
}
