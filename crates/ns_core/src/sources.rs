use async_trait::async_trait;
use crate::types::{Article, Topic};
use crate::Result;

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Returns the name of the news source
    fn name(&self) -> &str;

    /// Fetches one page of search results for a topic. Pages start at 1.
    ///
    /// An empty vector means the source has no results for that page.
    async fn search(&self, topic: Topic, page: usize) -> Result<Vec<Article>>;
}
