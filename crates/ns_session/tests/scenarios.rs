use std::sync::Arc;

use async_trait::async_trait;
use ns_core::config::Config;
use ns_core::{Article, Error, NewsSource, Result, SentimentLabel, Topic};
use ns_inference::LexiconModel;
use ns_scrapers::StaticSource;
use ns_session::{Dashboard, DashboardState, Notice};

fn crypto_articles(n: usize) -> Vec<Article> {
    (0..n)
        .map(|i| Article {
            title: format!("Crypto story {}", i + 1),
            description: if i % 2 == 0 {
                "Bitcoin surged to a record high.".to_string()
            } else {
                "Tokens plunged after the exchange hack.".to_string()
            },
            media: "CoinDesk".to_string(),
            date: format!("{} hours ago", i + 1),
            link: format!("https://example.com/{}", i),
            position: 0,
        })
        .collect()
}

fn dashboard(source: Arc<dyn NewsSource>) -> Dashboard {
    Dashboard::from_config(source, Arc::new(LexiconModel::new()), &Config::default())
}

#[tokio::test]
async fn test_fetch_then_load_more_numbers_continuously() {
    let source = StaticSource::new(10).with_articles(Topic::Cryptocurrency, crypto_articles(14));
    let dashboard = dashboard(Arc::new(source));

    let state = dashboard.fetch(DashboardState::default(), Topic::Cryptocurrency).await;
    assert_eq!(state.cards.len(), 10);
    let numbers: Vec<usize> = state.cards.iter().map(|c| c.number).collect();
    assert_eq!(numbers, (1..=10).collect::<Vec<_>>());
    assert_eq!(state.pager.offset, 10);
    assert!(state.can_load_more());
    let first_render = state.cards.clone();

    let state = dashboard.load_more(state).await;
    assert_eq!(state.cards.len(), 14);
    let numbers: Vec<usize> = state.cards.iter().map(|c| c.number).collect();
    assert_eq!(numbers, (1..=14).collect::<Vec<_>>());
    assert_eq!(&state.cards[..10], &first_render[..]);
    assert_eq!(state.cards[10].article.title, "Crypto story 11");
    assert!(state.notice.is_none());

    for card in &state.cards {
        assert_eq!(card.article, state.pager.articles[card.number - 1]);
    }
    assert_eq!(state.cards[0].annotation.label, SentimentLabel::Positive);
    assert_eq!(state.cards[1].annotation.label, SentimentLabel::Negative);
}

#[tokio::test]
async fn test_load_more_on_exhausted_topic() {
    let source = StaticSource::new(10).with_articles(Topic::Cryptocurrency, crypto_articles(10));
    let dashboard = dashboard(Arc::new(source));

    let state = dashboard.fetch(DashboardState::default(), Topic::Cryptocurrency).await;
    let state = dashboard.load_more(state).await;

    assert_eq!(state.cards.len(), 10);
    assert_eq!(state.notice, Some(Notice::Exhausted));
    assert_eq!(state.view().message.as_deref(), Some("No more news articles available."));
    assert!(!state.can_load_more());
}

#[tokio::test]
async fn test_fetch_replaces_previous_topic() {
    let source = StaticSource::demo();
    let dashboard = dashboard(Arc::new(source));

    let state = dashboard.fetch(DashboardState::default(), Topic::Economy).await;
    let state = dashboard.load_more(state).await;
    assert_eq!(state.cards.len(), 20);

    let state = dashboard.fetch(state, Topic::Ipo).await;
    assert_eq!(state.cards.len(), 10);
    assert_eq!(state.cards[0].number, 1);
    assert!(state.cards.iter().all(|c| c.article.title.contains("IPO")));
    assert_eq!(state.pager.topic, Some(Topic::Ipo));
}

struct DownSource;

#[async_trait]
impl NewsSource for DownSource {
    fn name(&self) -> &str {
        "down"
    }

    async fn search(&self, _topic: Topic, _page: usize) -> Result<Vec<Article>> {
        Err(Error::SourceUnavailable("Google News answered 503".to_string()))
    }
}

#[tokio::test]
async fn test_source_failure_is_an_inline_notice() {
    let dashboard = dashboard(Arc::new(DownSource));
    let state = dashboard.fetch(DashboardState::default(), Topic::Business).await;

    assert!(state.cards.is_empty());
    assert_eq!(
        state.notice,
        Some(Notice::SourceUnavailable("Google News answered 503".to_string()))
    );
    assert!(!state.can_load_more());
}

#[tokio::test]
async fn test_unscorable_articles_get_unknown_label() {
    let mut articles = crypto_articles(3);
    articles[1].title = String::new();
    articles[1].description = " ".to_string();
    let source = StaticSource::new(10).with_articles(Topic::Trading, articles);
    let dashboard = dashboard(Arc::new(source));

    let state = dashboard.fetch(DashboardState::default(), Topic::Trading).await;
    assert_eq!(state.cards.len(), 3);
    assert_eq!(state.cards[1].annotation.label, SentimentLabel::Unknown);
    assert_eq!(state.cards[1].annotation.score, 0.0);
    assert_eq!(state.faults, 1);
    assert_eq!(state.notice, Some(Notice::ScoringFaults(1)));
}
