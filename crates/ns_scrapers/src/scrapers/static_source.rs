use std::collections::HashMap;

use async_trait::async_trait;
use ns_core::{Article, NewsSource, Result, Topic};

/// A news source serving a fixed set of articles, split into pages.
#[derive(Debug, Clone)]
pub struct StaticSource {
    page_len: usize,
    articles: HashMap<Topic, Vec<Article>>,
}

const OUTLETS: &[&str] = &["Market Wire", "The Ledger", "Daily Ticker"];

const HEADLINES: &[(&str, &str)] = &[
    ("{} shares rally as earnings beat expectations", "Strong quarterly profit growth lifted investor confidence across the {} sector."),
    ("Analysts warn of {} slowdown amid weak demand", "Falling orders and rising costs raised fears of losses in {} later this year."),
    ("What the latest {} figures mean for your portfolio", "A look at the numbers behind this week's {} report and how they compare."),
    ("{} outlook improves on record inflows", "Fund managers reported record inflows into {} as momentum continued to gain."),
    ("Regulators probe {} after sudden crash", "Authorities opened an investigation following a sharp decline in {} prices."),
    ("{} steady ahead of central bank meeting", "Participants in {} held positions unchanged before the policy decision."),
    ("Investors cheer {} recovery", "Gains in {} extended for a third straight session as buyers returned."),
    ("{} hit by layoffs and downgrade", "A rating downgrade and job cuts weighed on sentiment around {}."),
];

impl StaticSource {
    pub fn new(page_len: usize) -> Self {
        Self {
            page_len: page_len.max(1),
            articles: HashMap::new(),
        }
    }

    /// Serves `articles` for `topic`, replacing anything registered before.
    pub fn with_articles(mut self, topic: Topic, articles: Vec<Article>) -> Self {
        self.articles.insert(topic, articles);
        self
    }

    /// Twenty-four generated articles per topic, handy when no network is available.
    pub fn demo() -> Self {
        let mut source = Self::new(10);
        for topic in Topic::ALL {
            let name = topic.display_name();
            let articles = (0..OUTLETS.len() * HEADLINES.len())
                .map(|i| {
                    let (title, description) = HEADLINES[i % HEADLINES.len()];
                    Article {
                        title: title.replace("{}", name),
                        description: description.replace("{}", name),
                        media: OUTLETS[i / HEADLINES.len()].to_string(),
                        date: format!("{} hours ago", i + 1),
                        link: format!("https://news.example.com/{}/{}", topic.slug(), i),
                        position: i,
                    }
                })
                .collect();
            source.articles.insert(topic, articles);
        }
        source
    }
}

#[async_trait]
impl NewsSource for StaticSource {
    fn name(&self) -> &str {
        "Static"
    }

    async fn search(&self, topic: Topic, page: usize) -> Result<Vec<Article>> {
        let Some(articles) = self.articles.get(&topic) else {
            return Ok(Vec::new());
        };
        let start = (page.max(1) - 1) * self.page_len;
        Ok(articles
            .iter()
            .skip(start)
            .take(self.page_len)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_pages() {
        let source = StaticSource::demo();
        let first = source.search(Topic::Economy, 1).await.unwrap();
        let third = source.search(Topic::Economy, 3).await.unwrap();
        let fourth = source.search(Topic::Economy, 4).await.unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(third.len(), 4);
        assert!(fourth.is_empty());
        assert!(first[0].title.contains("Economy"));
        assert_eq!(third[0].position, 20);
    }

    #[tokio::test]
    async fn test_unknown_topic_is_empty() {
        let source = StaticSource::new(5);
        assert!(source.search(Topic::Ipo, 1).await.unwrap().is_empty());
    }
}
