use async_trait::async_trait;
use crate::types::SentimentAnnotation;
use crate::Result;

#[async_trait]
pub trait SentimentModel: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Classify a piece of text. Empty input is an error.
    async fn classify(&self, text: &str) -> Result<SentimentAnnotation>;
}
