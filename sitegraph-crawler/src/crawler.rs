use crate::config::CrawlConfig;
use crate::error::{CrawlError, Result};
use crate::filter::filter_candidate_links;
use crate::loader::{HttpLoader, Page, PageLoader};
use crate::result::{CrawlOutcome, PageRecord};
use crate::tokenize::tokenize;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Depth-bounded, dedup-aware crawler for a single domain.
///
/// The coordinator loop owns all crawl state (visited set, link graph,
/// page records, word multiset) and serializes every mutation. Spawned
/// tasks only fetch and parse, bounded by a semaphore, and hand their
/// result back through a join set.
///
/// A URL is claimed in the visited set when it is scheduled, before its
/// fetch begins, so no URL is ever fetched twice in one crawl. The
/// trade-off: a URL whose fetch fails stays claimed for the rest of the
/// run and is not retried through another parent.
pub struct Crawler {
    loader: Arc<dyn PageLoader>,
    config: CrawlConfig,
    concurrency: usize,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler {
    pub fn new(config: CrawlConfig) -> Result<Self> {
        let loader = Arc::new(HttpLoader::new(&config)?);
        Ok(Self::with_loader(loader, config))
    }

    /// Build a crawler over a custom page source. This is the seam tests
    /// use to crawl canned documents.
    pub fn with_loader(loader: Arc<dyn PageLoader>, config: CrawlConfig) -> Self {
        Self {
            loader,
            config,
            concurrency: 10,
            progress_callback: None,
        }
    }

    /// Maximum number of fetches in flight at once.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Called with each URL as it is scheduled for fetching.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Crawl `root_url`, following same-site links for at most `max_depth`
    /// hops, and return the link graph and word statistics gathered along
    /// the way.
    ///
    /// Individual fetch failures are logged and end their branch; the
    /// crawl always completes with whatever was collected. Only an
    /// unparseable root URL is fatal.
    pub async fn crawl(&self, root_url: &str, max_depth: usize) -> Result<CrawlOutcome> {
        Url::parse(root_url).map_err(|e| CrawlError::InvalidUrl(format!("{}: {}", root_url, e)))?;

        info!("Starting crawl of {} to depth {}", root_url, max_depth);

        let mut visited: HashSet<String> = HashSet::new();
        let mut frontier: VecDeque<(String, usize)> = VecDeque::new();
        let mut outcome = CrawlOutcome::default();

        // A task at depth 0 would be terminal without fetching, so it is
        // never scheduled; the root only enters the frontier for positive
        // depths.
        if max_depth > 0 {
            visited.insert(root_url.to_string());
            frontier.push_back((root_url.to_string(), max_depth));
        }

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut in_flight: JoinSet<(String, usize, Result<Page>)> = JoinSet::new();

        loop {
            // Dispatch everything currently scheduled. Fetches run
            // concurrently up to the semaphore limit.
            while let Some((url, depth)) = frontier.pop_front() {
                if let Some(ref callback) = self.progress_callback {
                    callback(url.clone());
                }
                let loader = self.loader.clone();
                let semaphore = semaphore.clone();
                in_flight.spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .expect("crawl semaphore closed");
                    let page = loader.load(&url).await;
                    (url, depth, page)
                });
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };
            let (url, depth, fetched) = match joined {
                Ok(item) => item,
                Err(e) => {
                    warn!("Crawl task failed: {}", e);
                    continue;
                }
            };

            let page = match fetched {
                Ok(page) => page,
                Err(e) => {
                    // The branch ends here; siblings are unaffected.
                    warn!("Failed to fetch {}: {}", url, e);
                    continue;
                }
            };

            // Edges are recorded for every well-formed same-site link,
            // including links to pages another branch already claimed:
            // two parents converging on one child both get their edge.
            let links = filter_candidate_links(page.links(), &self.config);
            debug!("{}: kept {} of {} links", url, links.len(), page.links().len());

            for link in &links {
                outcome.graph.add_edge(&url, link);
            }

            let words = tokenize(page.text());
            outcome.pages.push(PageRecord::new(url.clone(), &words));
            outcome.global_words.extend(words);

            // Schedule surviving links one level deeper; the visited rule
            // applies here, and insert doubles as the test-and-add. Links
            // landing at depth 0 stay unclaimed: they exist only as edge
            // targets and remain fetchable through a shorter path.
            if depth > 1 {
                for link in links {
                    if visited.insert(link.clone()) {
                        frontier.push_back((link, depth - 1));
                    }
                }
            }
        }

        info!(
            "Crawl complete: {} pages, {} nodes, {} edges",
            outcome.pages.len(),
            outcome.graph.node_count(),
            outcome.graph.edge_count()
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Serves canned pages and counts every fetch per URL.
    struct MockLoader {
        pages: HashMap<String, Page>,
        failures: HashSet<String>,
        fetch_counts: StdMutex<HashMap<String, usize>>,
    }

    impl MockLoader {
        fn new() -> Self {
            Self {
                pages: HashMap::new(),
                failures: HashSet::new(),
                fetch_counts: StdMutex::new(HashMap::new()),
            }
        }

        fn page(mut self, url: &str, links: &[&str], text: &str) -> Self {
            let links = links.iter().map(|s| s.to_string()).collect();
            self.pages.insert(url.to_string(), Page::new(links, text.to_string()));
            self
        }

        fn fail_on(mut self, url: &str) -> Self {
            self.failures.insert(url.to_string());
            self
        }

        fn fetches(&self, url: &str) -> usize {
            *self.fetch_counts.lock().unwrap().get(url).unwrap_or(&0)
        }

        fn total_fetches(&self) -> usize {
            self.fetch_counts.lock().unwrap().values().sum()
        }
    }

    impl PageLoader for MockLoader {
        fn load<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Page>> {
            Box::pin(async move {
                *self
                    .fetch_counts
                    .lock()
                    .unwrap()
                    .entry(url.to_string())
                    .or_insert(0) += 1;
                if self.failures.contains(url) {
                    return Err(CrawlError::Other(format!("canned failure for {}", url)));
                }
                self.pages
                    .get(url)
                    .cloned()
                    .ok_or_else(|| CrawlError::Other(format!("no canned page for {}", url)))
            })
        }
    }

    fn config() -> CrawlConfig {
        CrawlConfig::for_domain("example.com")
    }

    #[tokio::test]
    async fn urls_are_fetched_at_most_once() {
        // Diamond: both branches discover the same grandchild.
        let loader = Arc::new(
            MockLoader::new()
                .page(
                    "https://example.com/",
                    &["https://example.com/a", "https://example.com/b"],
                    "root",
                )
                .page("https://example.com/a", &["https://example.com/d"], "a")
                .page("https://example.com/b", &["https://example.com/d"], "b")
                .page("https://example.com/d", &[], "d"),
        );
        let crawler = Crawler::with_loader(loader.clone(), config());

        let outcome = crawler.crawl("https://example.com/", 3).await.unwrap();

        for url in ["https://example.com/", "https://example.com/a", "https://example.com/b", "https://example.com/d"] {
            assert!(loader.fetches(url) <= 1, "{} fetched more than once", url);
        }
        assert_eq!(loader.fetches("https://example.com/d"), 1);
        // Both discovery edges exist even though d was crawled once,
        // regardless of which sibling the coordinator processed first.
        assert!(outcome.graph.has_edge("https://example.com/a", "https://example.com/d"));
        assert!(outcome.graph.has_edge("https://example.com/b", "https://example.com/d"));
        assert_eq!(outcome.graph.edge_count(), 4);
    }

    #[tokio::test]
    async fn depth_limit_keeps_leaves_as_edge_targets() {
        // Root links two pages, each links one more; with depth 2 the
        // grandchildren must appear in the graph but never be fetched.
        let loader = Arc::new(
            MockLoader::new()
                .page(
                    "https://example.com/",
                    &["https://example.com/p1", "https://example.com/p2"],
                    "root words",
                )
                .page("https://example.com/p1", &["https://example.com/c1"], "p1")
                .page("https://example.com/p2", &["https://example.com/c2"], "p2")
                .page("https://example.com/c1", &[], "c1")
                .page("https://example.com/c2", &[], "c2"),
        );
        let crawler = Crawler::with_loader(loader.clone(), config());

        let outcome = crawler.crawl("https://example.com/", 2).await.unwrap();

        assert_eq!(outcome.graph.edge_count(), 4);
        assert!(outcome.graph.contains("https://example.com/c1"));
        assert!(outcome.graph.contains("https://example.com/c2"));
        assert_eq!(loader.fetches("https://example.com/c1"), 0);
        assert_eq!(loader.fetches("https://example.com/c2"), 0);

        let crawled: Vec<&str> = outcome.pages.iter().map(|p| p.url.as_str()).collect();
        assert_eq!(crawled.len(), 3);
        assert!(!crawled.contains(&"https://example.com/c1"));
        assert!(!crawled.contains(&"https://example.com/c2"));
    }

    #[tokio::test]
    async fn depth_zero_fetches_nothing() {
        let loader = Arc::new(MockLoader::new().page("https://example.com/", &[], "root"));
        let crawler = Crawler::with_loader(loader.clone(), config());

        let outcome = crawler.crawl("https://example.com/", 0).await.unwrap();

        assert_eq!(loader.total_fetches(), 0);
        assert!(outcome.pages.is_empty());
        assert!(outcome.graph.is_empty());
        assert!(outcome.global_words.is_empty());
    }

    #[tokio::test]
    async fn failing_branch_leaves_sibling_intact() {
        let loader = Arc::new(
            MockLoader::new()
                .page(
                    "https://example.com/",
                    &["https://example.com/broken", "https://example.com/ok"],
                    "root",
                )
                .fail_on("https://example.com/broken")
                .page("https://example.com/ok", &[], "healthy words here"),
        );
        let crawler = Crawler::with_loader(loader.clone(), config());

        let outcome = crawler.crawl("https://example.com/", 2).await.unwrap();

        let crawled: Vec<&str> = outcome.pages.iter().map(|p| p.url.as_str()).collect();
        assert!(crawled.contains(&"https://example.com/ok"));
        assert!(!crawled.contains(&"https://example.com/broken"));
        // Discovery edges to both children survive.
        assert!(outcome.graph.has_edge("https://example.com/", "https://example.com/broken"));
        assert!(outcome.graph.has_edge("https://example.com/", "https://example.com/ok"));
        assert!(outcome.global_words.contains(&"healthy".to_string()));
    }

    #[tokio::test]
    async fn cycles_terminate_through_the_visited_set() {
        let loader = Arc::new(
            MockLoader::new()
                .page("https://example.com/a", &["https://example.com/b"], "a")
                .page("https://example.com/b", &["https://example.com/a"], "b"),
        );
        let crawler = Crawler::with_loader(loader.clone(), config());

        let outcome = crawler.crawl("https://example.com/a", 10).await.unwrap();

        assert_eq!(loader.fetches("https://example.com/a"), 1);
        assert_eq!(loader.fetches("https://example.com/b"), 1);
        assert_eq!(outcome.pages.len(), 2);
        // Both directions of the cycle are real links and become edges;
        // only the refetch is suppressed.
        assert!(outcome.graph.has_edge("https://example.com/a", "https://example.com/b"));
        assert!(outcome.graph.has_edge("https://example.com/b", "https://example.com/a"));
        assert_eq!(outcome.graph.edge_count(), 2);
    }

    #[tokio::test]
    async fn word_multiset_spans_all_crawled_pages() {
        let loader = Arc::new(
            MockLoader::new()
                .page("https://example.com/", &["https://example.com/a"], "one two two")
                .page("https://example.com/a", &[], "two three"),
        );
        let crawler = Crawler::with_loader(loader.clone(), config());

        let outcome = crawler.crawl("https://example.com/", 2).await.unwrap();

        assert_eq!(outcome.global_words.len(), 5);
        let per_page: usize = outcome.pages.iter().map(|p| p.word_count()).sum();
        assert_eq!(per_page, outcome.global_words.len());
    }

    #[tokio::test]
    async fn invalid_root_url_is_fatal() {
        let loader = Arc::new(MockLoader::new());
        let crawler = Crawler::with_loader(loader, config());
        let result = crawler.crawl("not a url", 2).await;
        assert!(matches!(result, Err(CrawlError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn crawl_over_http_builds_graph_and_words() {
        let mock_server = MockServer::start().await;
        let uri = mock_server.uri();

        let root_html = format!(
            r#"<html><body>
                <p>welcome page</p>
                <a href="{uri}/page1">Page 1</a>
                <a href="{uri}/page2">Page 2</a>
                <a href="{uri}/manual.pdf">Manual</a>
                <a href="https://elsewhere.net/out">External</a>
            </body></html>"#
        );

        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", "sitegraph/0.1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string(root_html),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/page1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<html><body>first page words</body></html>"),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/page2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<html><body>second page words</body></html>"),
            )
            .mount(&mock_server)
            .await;

        // The mock server listens on 127.0.0.1, which doubles as the
        // same-site marker.
        let crawler = Crawler::new(CrawlConfig::for_domain("127.0.0.1")).unwrap();
        let root = format!("{uri}/");
        let outcome = crawler.crawl(&root, 2).await.unwrap();

        assert_eq!(outcome.pages.len(), 3);
        assert!(outcome.graph.has_edge(&root, &format!("{uri}/page1")));
        assert!(outcome.graph.has_edge(&root, &format!("{uri}/page2")));
        assert!(!outcome.graph.contains(&format!("{uri}/manual.pdf")));
        assert!(!outcome.graph.contains("https://elsewhere.net/out"));
        assert!(outcome.global_words.contains(&"welcome".to_string()));
        assert!(outcome.global_words.contains(&"first".to_string()));
        assert!(outcome.global_words.contains(&"second".to_string()));
    }

    #[tokio::test]
    async fn http_error_pages_end_their_branch() {
        let mock_server = MockServer::start().await;
        let uri = mock_server.uri();

        let root_html = format!(
            r#"<html><body>
                <a href="{uri}/missing">gone</a>
                <a href="{uri}/alive">here</a>
            </body></html>"#
        );

        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string(root_html),
            )
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/alive"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_string("<html><body>still standing</body></html>"),
            )
            .mount(&mock_server)
            .await;

        let crawler = Crawler::new(CrawlConfig::for_domain("127.0.0.1")).unwrap();
        let root = format!("{uri}/");
        let outcome = crawler.crawl(&root, 2).await.unwrap();

        let crawled: Vec<&str> = outcome.pages.iter().map(|p| p.url.as_str()).collect();
        assert!(crawled.contains(&format!("{uri}/alive").as_str()));
        assert!(!crawled.contains(&format!("{uri}/missing").as_str()));
        // The failed page still shows up as a discovered edge target.
        assert!(outcome.graph.has_edge(&root, &format!("{uri}/missing")));
    }
}
