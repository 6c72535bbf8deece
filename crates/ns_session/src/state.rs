use ns_core::{Article, Topic};
use serde::{Deserialize, Serialize};

/// Pagination bookkeeping for one user session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub topic: Option<Topic>,
    /// Result index the next page is requested from.
    pub offset: usize,
    /// Every article fetched for the active topic, in fetch order.
    pub articles: Vec<Article>,
    /// Set once a fetch for the active topic came back empty.
    pub exhausted: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything about the previous topic and makes `topic` active.
    pub fn reset(mut self, topic: Topic) -> Self {
        self.topic = Some(topic);
        self.offset = 0;
        self.articles.clear();
        self.exhausted = false;
        self
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_clears_previous_topic() {
        let state = SessionState {
            topic: Some(Topic::Ipo),
            offset: 20,
            articles: vec![Article {
                title: "t".into(),
                description: "d".into(),
                media: "m".into(),
                date: "today".into(),
                link: String::new(),
                position: 0,
            }],
            exhausted: true,
        };
        let state = state.reset(Topic::Trading);
        assert_eq!(state.topic, Some(Topic::Trading));
        assert_eq!(state.offset, 0);
        assert!(state.is_empty());
        assert!(!state.exhausted);
    }
}
