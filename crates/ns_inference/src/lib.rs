pub mod models;

pub use models::{create_model, HuggingFaceModel, LexiconModel};

pub mod prelude {
    pub use super::models::create_model;
    pub use ns_core::config::ModelConfig;
    pub use ns_core::{Error, Result, SentimentAnnotation, SentimentLabel, SentimentModel};
}
