use crate::config::CrawlConfig;
use crate::error::Result;
use futures::future::BoxFuture;
use reqwest::Client;
use scraper::{Html, Node};
use tracing::debug;

/// A fetched, parsed document: raw anchor targets plus visible text.
#[derive(Debug, Clone, Default)]
pub struct Page {
    links: Vec<String>,
    text: String,
}

impl Page {
    pub fn new(links: Vec<String>, text: String) -> Self {
        Self { links, text }
    }

    /// Parse an HTML body. Lenient: malformed markup never fails, it just
    /// yields whatever the parser recovered.
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);

        let link_selector = scraper::Selector::parse("a[href]").unwrap();
        let links = document
            .select(&link_selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect();

        Self {
            links,
            text: visible_text(&document),
        }
    }

    /// Raw href values of every anchor that carries one. Not resolved
    /// against the page URL and not normalized: link identity downstream
    /// is the exact string.
    pub fn links(&self) -> &[String] {
        &self.links
    }

    /// Visible text of the document, script and style contents excluded.
    pub fn text(&self) -> &str {
        &self.text
    }
}

fn visible_text(document: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for node in document.root_element().descendants() {
        if let Node::Text(text) = node.value() {
            let hidden = node.ancestors().any(|ancestor| {
                matches!(ancestor.value(), Node::Element(e) if e.name() == "script" || e.name() == "style")
            });
            if !hidden {
                parts.push(&**text);
            }
        }
    }
    parts.join(" ")
}

/// Fetch seam for the crawler. Production uses [`HttpLoader`]; tests
/// substitute an in-memory loader serving canned pages.
pub trait PageLoader: Send + Sync {
    fn load<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Page>>;
}

pub struct HttpLoader {
    client: Client,
}

impl HttpLoader {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .connect_timeout(config.timeout / 2)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

impl PageLoader for HttpLoader {
    fn load<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Page>> {
        Box::pin(async move {
            debug!("Fetching {}", url);
            let response = self.client.get(url).send().await?.error_for_status()?;
            let body = response.text().await?;
            Ok(Page::parse(&body))
        })
    }
}
