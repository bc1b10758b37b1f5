//! Word-frequency statistics over crawl results.

use serde::Serialize;
use sitegraph_crawler::PageRecord;
use std::collections::HashMap;

/// One row of the word-frequency table: how often a word appears across
/// the whole crawl and how many pages contain it.
#[derive(Debug, Clone, Serialize)]
pub struct WordStat {
    pub word: String,
    pub frequency: usize,
    pub page_count: usize,
}

/// Rank every distinct word in the multiset by frequency, descending.
/// Ties keep first-appearance order, so the ranking is deterministic for
/// a fixed multiset.
pub fn global_frequencies(global_words: &[String]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for word in global_words {
        let entry = counts.entry(word.as_str()).or_insert(0);
        if *entry == 0 {
            order.push(word.as_str());
        }
        *entry += 1;
    }
    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|word| (word.to_string(), counts[word]))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Number of crawled pages whose frequency map contains `word`.
pub fn page_count(word: &str, pages: &[PageRecord]) -> usize {
    pages
        .iter()
        .filter(|page| page.word_frequency.get(word).is_some_and(|&count| count > 0))
        .count()
}

/// The (word, frequency, page count) rows the frequency table consumes,
/// truncated to the `limit` most frequent words.
pub fn frequency_table(
    global_words: &[String],
    pages: &[PageRecord],
    limit: usize,
) -> Vec<WordStat> {
    global_frequencies(global_words)
        .into_iter()
        .take(limit)
        .map(|(word, frequency)| {
            let page_count = page_count(&word, pages);
            WordStat {
                word,
                frequency,
                page_count,
            }
        })
        .collect()
}
