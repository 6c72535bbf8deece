use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// A news item as returned by a news source. Never modified after fetching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    /// Name of the outlet that published the article.
    pub media: String,
    /// Publication date exactly as the source printed it ("2 hours ago", "Mar 3, 2024").
    pub date: String,
    #[serde(default)]
    pub link: String,
    /// Index of the article in the topic's result stream.
    #[serde(default)]
    pub position: usize,
}

impl Article {
    /// Text handed to the sentiment model: the description, or the title when
    /// the source gave no description.
    pub fn scoring_text(&self) -> &str {
        if self.description.trim().is_empty() {
            self.title.trim()
        } else {
            self.description.trim()
        }
    }
}

/// Topics offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    StockMarket,
    Investing,
    Economy,
    Business,
    Finance,
    Cryptocurrency,
    Ipo,
    Trading,
}

impl Topic {
    pub const ALL: [Topic; 8] = [
        Topic::StockMarket,
        Topic::Investing,
        Topic::Economy,
        Topic::Business,
        Topic::Finance,
        Topic::Cryptocurrency,
        Topic::Ipo,
        Topic::Trading,
    ];

    /// Human readable name, also used as the search query.
    pub fn display_name(&self) -> &'static str {
        match self {
            Topic::StockMarket => "Stock Market",
            Topic::Investing => "Investing",
            Topic::Economy => "Economy",
            Topic::Business => "Business",
            Topic::Finance => "Finance",
            Topic::Cryptocurrency => "Cryptocurrency",
            Topic::Ipo => "IPO",
            Topic::Trading => "Trading",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Topic::StockMarket => "stock-market",
            Topic::Investing => "investing",
            Topic::Economy => "economy",
            Topic::Business => "business",
            Topic::Finance => "finance",
            Topic::Cryptocurrency => "cryptocurrency",
            Topic::Ipo => "ipo",
            Topic::Trading => "trading",
        }
    }
}

impl Default for Topic {
    fn default() -> Self {
        Topic::StockMarket
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Topic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Topic::ALL
            .into_iter()
            .find(|t| {
                t.slug().eq_ignore_ascii_case(wanted) || t.display_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| Error::UnknownTopic(wanted.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    /// Stand-in for an article the model could not score.
    Unknown,
}

impl SentimentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "POSITIVE",
            SentimentLabel::Negative => "NEGATIVE",
            SentimentLabel::Neutral => "NEUTRAL",
            SentimentLabel::Unknown => "UNKNOWN",
        }
    }

    /// Maps a label as emitted by a text-classification model.
    ///
    /// Handles named labels (`POSITIVE`, `neg`, ...) and the positional
    /// `LABEL_n` names of three-class models, ordered negative, neutral, positive.
    pub fn from_model_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" | "pos" | "bullish" | "label_2" => Some(SentimentLabel::Positive),
            "negative" | "neg" | "bearish" | "label_0" => Some(SentimentLabel::Negative),
            "neutral" | "neu" | "label_1" => Some(SentimentLabel::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnnotation {
    pub label: SentimentLabel,
    /// Model confidence in `[0, 1]`.
    pub score: f32,
}

impl SentimentAnnotation {
    pub fn new(label: SentimentLabel, score: f32) -> Self {
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) };
        Self { label, score }
    }

    pub fn unknown() -> Self {
        Self {
            label: SentimentLabel::Unknown,
            score: 0.0,
        }
    }

    pub fn summary(&self) -> String {
        format!("Sentiment: {} (Confidence: {:.2})", self.label, self.score)
    }
}

/// An article paired with its annotation and its 1-based display number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredArticle {
    pub number: usize,
    pub article: Article,
    pub annotation: SentimentAnnotation,
}
