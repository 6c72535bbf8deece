use ns_core::config::{OffsetPolicy, PagerConfig};
use ns_core::{Article, Error, Result, Topic};
use ns_scrapers::ResultsWindow;
use tracing::{debug, info};

use crate::state::SessionState;

/// Articles returned by one page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    pub topic: Topic,
    /// Display number of the first article in the batch, counting from 1.
    pub first_number: usize,
    pub articles: Vec<Article>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Appended(Batch),
    /// The source has nothing more for the active topic.
    Exhausted,
}

/// Decides which slice of results to request next and accumulates them.
///
/// Every operation takes the session state by value and hands it back along
/// with the outcome, so the pager itself holds no per-session data.
#[derive(Debug, Clone)]
pub struct Pager {
    window: ResultsWindow,
    page_size: usize,
    offset_policy: OffsetPolicy,
}

impl Pager {
    pub fn new(window: ResultsWindow, config: &PagerConfig) -> Self {
        Self {
            window,
            page_size: config.page_size.max(1),
            offset_policy: config.offset_policy,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn offset_policy(&self) -> OffsetPolicy {
        self.offset_policy
    }

    /// Resets the session to `topic` and requests its first page.
    ///
    /// The returned state is always the reset one, whatever the outcome. A
    /// first page with no articles is reported as `SourceUnavailable`.
    pub async fn start_topic(
        &self,
        state: SessionState,
        topic: Topic,
    ) -> (SessionState, Result<PageOutcome>) {
        info!("📰 Fetching {} news from {}", topic, self.window.source_name());
        let state = state.reset(topic);
        let (state, outcome) = self.fetch_page(state, topic).await;
        match outcome {
            Ok(PageOutcome::Exhausted) => (
                state,
                Err(Error::SourceUnavailable(format!(
                    "No news articles found for {}.",
                    topic
                ))),
            ),
            other => (state, other),
        }
    }

    /// Requests the next page for the active topic and appends it.
    pub async fn load_more(&self, state: SessionState) -> (SessionState, Result<PageOutcome>) {
        let Some(topic) = state.topic else {
            return (state, Err(Error::NoActiveTopic));
        };
        debug!("📥 Loading more {} news from offset {}", topic, state.offset);
        self.fetch_page(state, topic).await
    }

    async fn fetch_page(
        &self,
        mut state: SessionState,
        topic: Topic,
    ) -> (SessionState, Result<PageOutcome>) {
        let articles = match self.window.fetch(topic, state.offset, self.page_size).await {
            Ok(articles) => articles,
            Err(e) => return (state, Err(e)),
        };

        if articles.is_empty() {
            debug!("🏁 No more {} news after offset {}", topic, state.offset);
            state.exhausted = true;
            return (state, Ok(PageOutcome::Exhausted));
        }

        let first_number = state.articles.len() + 1;
        state.offset += match self.offset_policy {
            OffsetPolicy::Requested => self.page_size,
            OffsetPolicy::Returned => articles.len(),
        };
        state.articles.extend(articles.iter().cloned());
        debug!(
            "✨ {} {} articles fetched, offset now {}",
            articles.len(),
            topic,
            state.offset
        );

        (
            state,
            Ok(PageOutcome::Appended(Batch {
                topic,
                first_number,
                articles,
            })),
        )
    }
}
