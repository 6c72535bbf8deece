use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use ns_core::config::SourceConfig;
use ns_core::{Article, Error, NewsSource, Result, Topic};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::utils;

const BASE_URL: &str = "https://www.google.com";
const RESULTS_PER_PAGE: usize = 10;
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

// Google reshuffles its markup regularly; each field lists the class names
// seen so far, newest first.
const CONTAINERS: &[&str] = &["div.SoaBEf", "g-card", "a.WlydOe"];
const TITLES: &[&str] = &["div[role='heading']", "h3"];
const MEDIA: &[&str] = &[".MgUUmf", ".CEMjEf", ".NUnG9d"];
const DESCRIPTIONS: &[&str] = &[".GI74Re", ".Y3v8qd"];
const DATES: &[&str] = &[".OSrXXb", ".LfVVr", ".WG9SHc"];

pub struct GoogleNewsScraper {
    client: Client,
    base_url: String,
    lang: String,
    region: String,
}

impl fmt::Debug for GoogleNewsScraper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleNewsScraper")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .field("lang", &self.lang)
            .field("region", &self.region)
            .finish()
    }
}

impl GoogleNewsScraper {
    pub fn new() -> Result<Self> {
        Self::from_config(&SourceConfig::default())
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            lang: config.lang.clone(),
            region: config.region.clone(),
        })
    }

    fn search_url(&self, topic: Topic, page: usize) -> Result<Url> {
        let start = (page.max(1) - 1) * RESULTS_PER_PAGE;
        let base = utils::parse_url(&format!("{}/search", self.base_url))?;
        Url::parse_with_params(
            base.as_str(),
            &[
                ("q", topic.display_name().to_string()),
                ("tbm", "nws".to_string()),
                ("hl", self.lang.clone()),
                ("gl", self.region.clone()),
                ("start", start.to_string()),
            ],
        )
        .map_err(|e| Error::Scraping(format!("Failed to build search URL: {}", e)))
    }

    /// Extracts the news results from a Google search page.
    pub fn parse_results(&self, html: &str) -> Result<Vec<Article>> {
        let document = Html::parse_document(html);
        let fields = FieldSelectors::new()?;

        let mut containers = Vec::new();
        for container in CONTAINERS {
            let selector = utils::selector(container)?;
            containers = document.select(&selector).collect::<Vec<_>>();
            if !containers.is_empty() {
                break;
            }
        }

        Ok(containers
            .iter()
            .filter_map(|container| self.parse_result(container, &fields))
            .enumerate()
            .map(|(position, mut article)| {
                article.position = position;
                article
            })
            .collect())
    }

    fn parse_result(&self, container: &ElementRef<'_>, fields: &FieldSelectors) -> Option<Article> {
        let title = utils::first_text(container, &fields.titles)?;
        let href = if container.value().name() == "a" {
            container.value().attr("href")
        } else {
            container
                .select(&fields.links)
                .find_map(|a| a.value().attr("href"))
        };

        Some(Article {
            title,
            description: utils::first_text(container, &fields.descriptions).unwrap_or_default(),
            media: utils::first_text(container, &fields.media).unwrap_or_default(),
            date: utils::first_text(container, &fields.dates).unwrap_or_default(),
            link: href.map(|href| self.resolve_link(href)).unwrap_or_default(),
            position: 0,
        })
    }

    /// Unwraps Google's `/url?q=` redirects and makes relative links absolute.
    fn resolve_link(&self, href: &str) -> String {
        let Ok(base) = utils::parse_url(&self.base_url) else {
            return href.to_string();
        };
        let Ok(resolved) = base.join(href) else {
            return href.to_string();
        };
        if resolved.path() == "/url" {
            let target = resolved
                .query_pairs()
                .filter(|(key, value)| (key == "q" || key == "url") && !value.is_empty())
                .map(|(_, value)| value.into_owned())
                .next();
            if let Some(target) = target {
                return target;
            }
        }
        resolved.to_string()
    }
}

struct FieldSelectors {
    titles: Vec<Selector>,
    media: Vec<Selector>,
    descriptions: Vec<Selector>,
    dates: Vec<Selector>,
    links: Selector,
}

impl FieldSelectors {
    fn new() -> Result<Self> {
        let all = |list: &[&str]| list.iter().map(|s| utils::selector(s)).collect::<Result<Vec<_>>>();
        Ok(Self {
            titles: all(TITLES)?,
            media: all(MEDIA)?,
            descriptions: all(DESCRIPTIONS)?,
            dates: all(DATES)?,
            links: utils::selector("a[href]")?,
        })
    }
}

#[async_trait]
impl NewsSource for GoogleNewsScraper {
    fn name(&self) -> &str {
        "Google News"
    }

    async fn search(&self, topic: Topic, page: usize) -> Result<Vec<Article>> {
        let url = self.search_url(topic, page)?;
        tracing::debug!("🔍 Searching {} page {}: {}", topic, page, url);

        let response = self.client.get(url).send().await.map_err(|e| {
            Error::SourceUnavailable(format!("Google News request failed: {}", e))
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::SourceUnavailable(format!(
                "Google News answered {} for {}",
                status, topic
            )));
        }

        let html = response.text().await?;
        let articles = self.parse_results(&html)?;
        tracing::debug!("📰 {} results on page {} for {}", articles.len(), page, topic);
        Ok(articles)
    }
}
