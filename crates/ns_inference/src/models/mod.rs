use std::sync::Arc;

use ns_core::config::ModelConfig;
use ns_core::{Error, Result, SentimentModel};
use tracing::info;

pub mod huggingface;
pub mod lexicon;

pub use huggingface::HuggingFaceModel;
pub use lexicon::LexiconModel;

/// Builds the sentiment model named in the configuration.
pub fn create_model(config: &ModelConfig) -> Result<Arc<dyn SentimentModel>> {
    match config.kind.to_ascii_lowercase().as_str() {
        "huggingface" | "hf" => {
            let model = HuggingFaceModel::new(config)?;
            if config.api_key.is_none() {
                info!("⚠️ No Hugging Face API token set, requests may be rate limited");
            }
            info!("🧠 Using Hugging Face model {}", model.model_name());
            Ok(Arc::new(model))
        }
        "lexicon" => Ok(Arc::new(LexiconModel::new())),
        other => Err(Error::Config(format!(
            "Unknown model: {}. Available models: huggingface (default), lexicon",
            other
        ))),
    }
}
