pub mod config;
pub mod error;
pub mod models;
pub mod sources;
pub mod types;

pub use error::{Error, Result};
pub use models::SentimentModel;
pub use sources::NewsSource;
pub use types::{Article, ScoredArticle, SentimentAnnotation, SentimentLabel, Topic};

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::{Article, Error, NewsSource, Result, SentimentModel, Topic};
}
