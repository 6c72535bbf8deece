use std::sync::Arc;

use ns_core::config::SourceConfig;
use ns_core::{Error, NewsSource, Result};

pub mod google;
pub mod static_source;

pub use google::GoogleNewsScraper;
pub use static_source::StaticSource;

/// Builds the news source named in the configuration.
pub fn create_source(config: &SourceConfig) -> Result<Arc<dyn NewsSource>> {
    match config.kind.to_ascii_lowercase().as_str() {
        "google" | "googlenews" => Ok(Arc::new(GoogleNewsScraper::from_config(config)?)),
        "static" | "demo" => Ok(Arc::new(StaticSource::demo())),
        other => Err(Error::Config(format!(
            "Unknown news source: {}. Available sources: google (default), static",
            other
        ))),
    }
}

/// Common utilities for scrapers
pub(crate) mod utils {
    use ns_core::{Error, Result};
    use scraper::{ElementRef, Selector};
    use url::Url;

    pub fn parse_url(url: &str) -> Result<Url> {
        Url::parse(url).map_err(|e| Error::Scraping(format!("Failed to parse URL: {}", e)))
    }

    pub fn selector(selector: &str) -> Result<Selector> {
        Selector::parse(selector)
            .map_err(|e| Error::Scraping(format!("Invalid selector {}: {}", selector, e)))
    }

    /// Text of the first element matching any of the selectors, in order.
    pub fn first_text(element: &ElementRef<'_>, selectors: &[Selector]) -> Option<String> {
        selectors.iter().find_map(|selector| {
            element
                .select(selector)
                .map(|el| collapse_whitespace(&el.text().collect::<String>()))
                .find(|text| !text.is_empty())
        })
    }

    pub fn collapse_whitespace(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}
