use std::fmt;
use std::sync::Arc;

use ns_core::config::DEFAULT_MAX_PAGES;
use ns_core::{Article, NewsSource, Result, Topic};
use tracing::debug;

/// Presents a paged news source as one continuous result stream per topic.
///
/// Pages are walked from the first one on every request, up to `max_pages`;
/// results beyond the last walked page are never offered.
#[derive(Clone)]
pub struct ResultsWindow {
    source: Arc<dyn NewsSource>,
    max_pages: usize,
}

impl fmt::Debug for ResultsWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultsWindow")
            .field("source", &self.source.name())
            .field("max_pages", &self.max_pages)
            .finish()
    }
}

impl ResultsWindow {
    pub fn new(source: Arc<dyn NewsSource>) -> Self {
        Self::with_max_pages(source, DEFAULT_MAX_PAGES)
    }

    pub fn with_max_pages(source: Arc<dyn NewsSource>, max_pages: usize) -> Self {
        Self {
            source,
            max_pages: max_pages.max(1),
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Returns up to `count` articles starting at result `start`.
    ///
    /// A slice shorter than `count`, or empty, means the stream ran out.
    pub async fn fetch(&self, topic: Topic, start: usize, count: usize) -> Result<Vec<Article>> {
        let wanted = start.saturating_add(count);
        let mut collected: Vec<Article> = Vec::new();

        for page in 1..=self.max_pages {
            if collected.len() >= wanted {
                break;
            }
            let batch = self.source.search(topic, page).await?;
            debug!("📄 {} page {} returned {} articles", self.source.name(), page, batch.len());
            if batch.is_empty() {
                break;
            }
            collected.extend(batch);
        }

        Ok(collected
            .into_iter()
            .enumerate()
            .skip(start)
            .take(count)
            .map(|(position, mut article)| {
                article.position = position;
                article
            })
            .collect())
    }
}
