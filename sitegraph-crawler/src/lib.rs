pub mod config;
pub mod crawler;
pub mod error;
pub mod filter;
pub mod graph;
pub mod loader;
pub mod result;
pub mod tokenize;

pub use config::CrawlConfig;
pub use crawler::{Crawler, ProgressCallback};
pub use error::CrawlError;
pub use graph::LinkGraph;
pub use loader::{HttpLoader, Page, PageLoader};
pub use result::{CrawlOutcome, PageRecord};
