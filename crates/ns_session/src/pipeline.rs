use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use ns_core::{Article, ScoredArticle, SentimentAnnotation, SentimentModel};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::pager::Batch;

/// Scored entries for one fetched batch, in fetch order.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedBatch {
    pub entries: Vec<ScoredArticle>,
    /// Articles the model failed on; they carry an unknown annotation.
    pub faults: usize,
}

/// Pairs every article of a batch with a sentiment annotation.
#[derive(Clone)]
pub struct Annotator {
    model: Arc<dyn SentimentModel>,
    semaphore: Arc<Semaphore>,
}

impl fmt::Debug for Annotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotator")
            .field("model", &self.model.name())
            .field("available_permits", &self.semaphore.available_permits())
            .finish()
    }
}

impl Annotator {
    /// `concurrency` bounds how many classifications run at once, across all
    /// clones of this annotator.
    pub fn new(model: Arc<dyn SentimentModel>, concurrency: usize) -> Self {
        Self {
            model,
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub async fn annotate_batch(&self, batch: &Batch) -> AnnotatedBatch {
        self.annotate(batch.first_number, &batch.articles).await
    }

    /// Scores `articles`, numbering them from `first_number`.
    ///
    /// A failure on one article never aborts the others: that entry gets
    /// `SentimentAnnotation::unknown()` and is counted in `faults`.
    pub async fn annotate(&self, first_number: usize, articles: &[Article]) -> AnnotatedBatch {
        let scoring = articles.iter().map(|article| async move {
            let _permit = self.semaphore.acquire().await.ok();
            self.model.classify(article.scoring_text()).await
        });
        let results = join_all(scoring).await;

        let mut faults = 0;
        let entries = articles
            .iter()
            .zip(results)
            .enumerate()
            .map(|(i, (article, result))| {
                let number = first_number + i;
                let annotation = result.unwrap_or_else(|e| {
                    warn!("⚠️ Could not score article {} ({}): {}", number, article.title, e);
                    faults += 1;
                    SentimentAnnotation::unknown()
                });
                ScoredArticle {
                    number,
                    article: article.clone(),
                    annotation,
                }
            })
            .collect();

        debug!(
            "🧠 Scored {} articles with {} ({} faults)",
            articles.len(),
            self.model.name(),
            faults
        );
        AnnotatedBatch { entries, faults }
    }
}
