use std::sync::Arc;

use ns_core::config::Config;
use ns_core::{Error, NewsSource, ScoredArticle, SentimentModel, Topic};
use ns_scrapers::ResultsWindow;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::pager::{PageOutcome, Pager};
use crate::pipeline::{AnnotatedBatch, Annotator};
use crate::state::SessionState;

pub const NO_MORE_NEWS: &str = "No more news articles available.";

/// Informational message shown next to the cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Notice {
    SourceUnavailable(String),
    Exhausted,
    ScoringFaults(usize),
    NoActiveTopic,
}

impl Notice {
    fn from_error(error: Error) -> Self {
        match error {
            Error::SourceUnavailable(message) => Notice::SourceUnavailable(message),
            Error::NoActiveTopic => Notice::NoActiveTopic,
            other => Notice::SourceUnavailable(other.to_string()),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::SourceUnavailable(message) => message.clone(),
            Notice::Exhausted => NO_MORE_NEWS.to_string(),
            Notice::ScoringFaults(1) => "1 article could not be scored.".to_string(),
            Notice::ScoringFaults(n) => format!("{} articles could not be scored.", n),
            Notice::NoActiveTopic => "Select a topic and fetch news first.".to_string(),
        }
    }
}

/// Everything the dashboard remembers for one user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub pager: SessionState,
    /// Scored articles on display, numbered from 1 in fetch order.
    pub cards: Vec<ScoredArticle>,
    /// Outcome of the last action, if it deserves a message.
    pub notice: Option<Notice>,
    /// Articles that could not be scored since the topic was fetched.
    pub faults: usize,
}

impl DashboardState {
    pub fn can_load_more(&self) -> bool {
        self.pager.topic.is_some() && !self.pager.exhausted && !self.cards.is_empty()
    }

    fn push(&mut self, batch: AnnotatedBatch) {
        self.faults += batch.faults;
        if batch.faults > 0 {
            self.notice = Some(Notice::ScoringFaults(batch.faults));
        }
        self.cards.extend(batch.entries);
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            topic: self.pager.topic,
            offset: self.pager.offset,
            cards: self.cards.clone(),
            message: self.notice.as_ref().map(Notice::message),
            notice: self.notice.clone(),
            can_load_more: self.can_load_more(),
            faults: self.faults,
        }
    }
}

/// Serializable snapshot handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub topic: Option<Topic>,
    pub offset: usize,
    pub cards: Vec<ScoredArticle>,
    pub notice: Option<Notice>,
    pub message: Option<String>,
    pub can_load_more: bool,
    pub faults: usize,
}

/// Runs the two user actions: fetch news for a topic, and load more.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pager: Pager,
    annotator: Annotator,
}

impl Dashboard {
    pub fn new(pager: Pager, annotator: Annotator) -> Self {
        Self { pager, annotator }
    }

    pub fn from_config(
        source: Arc<dyn NewsSource>,
        model: Arc<dyn SentimentModel>,
        config: &Config,
    ) -> Self {
        let window = ResultsWindow::with_max_pages(source, config.source.max_pages);
        Self::new(
            Pager::new(window, &config.pager),
            Annotator::new(model, config.model.concurrency),
        )
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }

    /// Starts over with `topic`: the cards are replaced by its first page.
    pub async fn fetch(&self, state: DashboardState, topic: Topic) -> DashboardState {
        let (pager, outcome) = self.pager.start_topic(state.pager, topic).await;
        let mut next = DashboardState {
            pager,
            ..DashboardState::default()
        };
        self.apply(&mut next, outcome).await;
        info!("📊 Showing {} {} articles", next.cards.len(), topic);
        next
    }

    /// Appends the next page of the active topic to the cards.
    pub async fn load_more(&self, state: DashboardState) -> DashboardState {
        let DashboardState {
            pager, cards, faults, ..
        } = state;
        let (pager, outcome) = self.pager.load_more(pager).await;
        let mut next = DashboardState {
            pager,
            cards,
            notice: None,
            faults,
        };
        self.apply(&mut next, outcome).await;
        next
    }

    async fn apply(&self, state: &mut DashboardState, outcome: ns_core::Result<PageOutcome>) {
        match outcome {
            Ok(PageOutcome::Appended(batch)) => {
                let annotated = self.annotator.annotate_batch(&batch).await;
                state.push(annotated);
            }
            Ok(PageOutcome::Exhausted) => state.notice = Some(Notice::Exhausted),
            Err(e) => state.notice = Some(Notice::from_error(e)),
        }
    }
}
