use crate::config::CrawlConfig;
use std::collections::HashSet;

/// Apply the link-shape rules: a candidate survives only if it is
/// non-empty, contains the same-site domain marker, has not already been
/// kept earlier in this batch, and does not end with a blocked suffix.
///
/// Visited pages are NOT excluded here: a link to an already-crawled page
/// is still a real link, and the crawler records its edge. Use
/// [`filter_links`] where the visited rule belongs too.
pub fn filter_candidate_links(candidates: &[String], config: &CrawlConfig) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();
    for link in candidates {
        if link.is_empty() {
            continue;
        }
        if !link.contains(&config.domain_marker) {
            continue;
        }
        if kept.iter().any(|k| k == link) {
            continue;
        }
        if config
            .blocked_suffixes
            .iter()
            .any(|suffix| link.ends_with(suffix))
        {
            continue;
        }
        kept.push(link.clone());
    }
    kept
}

/// Select which discovered links are worth crawling.
///
/// A candidate survives only if every rule holds: it is non-empty,
/// contains the same-site domain marker, is not already visited, has not
/// already been kept earlier in this batch, and does not end with a
/// blocked suffix. Pure: `visited` is never mutated here.
pub fn filter_links(
    candidates: &[String],
    visited: &HashSet<String>,
    config: &CrawlConfig,
) -> Vec<String> {
    filter_candidate_links(candidates, config)
        .into_iter()
        .filter(|link| !visited.contains(link))
        .collect()
}
