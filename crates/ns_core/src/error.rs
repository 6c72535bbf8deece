use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("News source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Scoring error: {0}")]
    Scoring(String),

    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    #[error("No active topic, fetch news first")]
    NoActiveTopic,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
