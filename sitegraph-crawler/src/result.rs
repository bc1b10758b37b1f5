use crate::graph::LinkGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Word tally for one successfully crawled page. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    pub url: String,
    pub word_frequency: HashMap<String, usize>,
}

impl PageRecord {
    pub fn new(url: String, words: &[String]) -> Self {
        let mut word_frequency: HashMap<String, usize> = HashMap::new();
        for word in words {
            *word_frequency.entry(word.clone()).or_insert(0) += 1;
        }
        Self {
            url,
            word_frequency,
        }
    }

    /// Total tokens on the page (sum of all frequencies).
    pub fn word_count(&self) -> usize {
        self.word_frequency.values().sum()
    }
}

/// Everything one crawl produces: the link graph, one record per crawled
/// page, and the global word multiset concatenated across all pages.
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    pub graph: LinkGraph,
    pub pages: Vec<PageRecord>,
    pub global_words: Vec<String>,
}
