use std::time::Duration;

/// Suffixes that are never crawled: binary, media, office, and archive
/// formats, plus one explicit blocked path. Matched as plain string
/// suffixes against the whole link.
pub const DEFAULT_BLOCKED_SUFFIXES: &[&str] = &[
    "pdf", "jpg", "jpeg", "png", "gif", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "zip", "rar",
    "tar", "gz", "exe", "mp4", "login.php",
];

pub const DEFAULT_USER_AGENT: &str = "sitegraph/0.1";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Settings shared by the link filter and the HTTP loader.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Substring a link must contain to count as same-site.
    pub domain_marker: String,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Links ending with any of these are skipped.
    pub blocked_suffixes: Vec<String>,
}

impl CrawlConfig {
    pub fn for_domain(marker: impl Into<String>) -> Self {
        Self {
            domain_marker: marker.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            blocked_suffixes: DEFAULT_BLOCKED_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_blocked_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.blocked_suffixes = suffixes;
        self
    }
}
