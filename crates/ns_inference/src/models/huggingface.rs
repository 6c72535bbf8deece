use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use ns_core::config::ModelConfig;
use ns_core::{Error, Result, SentimentAnnotation, SentimentLabel, SentimentModel};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";

// Long inputs are cut before sending; the default model only reads 512 tokens anyway.
const MAX_INPUT_CHARS: usize = 2000;

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
    Failure { error: String },
}

/// Text classification through the Hugging Face inference API.
pub struct HuggingFaceModel {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model_name: String,
}

impl fmt::Debug for HuggingFaceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl HuggingFaceModel {
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model_name: config
                .model_name
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn pick_best(scores: Vec<LabelScore>) -> Result<SentimentAnnotation> {
        let best = scores
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| Error::Scoring("model returned no labels".to_string()))?;
        let label = SentimentLabel::from_model_label(&best.label)
            .ok_or_else(|| Error::Scoring(format!("unrecognised label: {}", best.label)))?;
        Ok(SentimentAnnotation::new(label, best.score))
    }
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[async_trait]
impl SentimentModel for HuggingFaceModel {
    fn name(&self) -> &str {
        "HuggingFace"
    }

    async fn classify(&self, text: &str) -> Result<SentimentAnnotation> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Scoring("cannot classify empty text".to_string()));
        }

        let mut request = self
            .client
            .post(format!("{}/models/{}", self.base_url, self.model_name))
            .json(&ClassifyRequest { inputs: truncate(text) });
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Scoring(format!("inference request failed: {}", e)))?;
        let status = response.status();
        let body = response.text().await?;

        let parsed = serde_json::from_str::<ClassifyResponse>(&body);
        if !status.is_success() {
            let reason = match parsed {
                Ok(ClassifyResponse::Failure { error }) => error,
                _ => body,
            };
            return Err(Error::Scoring(format!("inference API answered {}: {}", status, reason)));
        }

        match parsed? {
            ClassifyResponse::Nested(mut batches) => {
                if batches.is_empty() {
                    return Err(Error::Scoring("model returned no labels".to_string()));
                }
                Self::pick_best(batches.swap_remove(0))
            }
            ClassifyResponse::Flat(scores) => Self::pick_best(scores),
            ClassifyResponse::Failure { error } => Err(Error::Scoring(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_for(base_url: &str, api_key: Option<&str>) -> HuggingFaceModel {
        let config = ModelConfig {
            base_url: Some(base_url.to_string()),
            api_key: api_key.map(str::to_string),
            ..ModelConfig::default()
        };
        HuggingFaceModel::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_classify_nested_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", format!("/models/{}", DEFAULT_MODEL).as_str())
            .match_header("authorization", "Bearer hf_test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[[{"label":"POSITIVE","score":0.9931},{"label":"NEGATIVE","score":0.0069}]]"#)
            .create_async()
            .await;

        let model = model_for(&server.url(), Some("hf_test"));
        let annotation = model.classify("Stocks surged to a record high.").await.unwrap();
        assert_eq!(annotation.label, SentimentLabel::Positive);
        assert!((annotation.score - 0.9931).abs() < 1e-6);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_classify_flat_three_class_response() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"[{"label":"LABEL_0","score":0.81},{"label":"LABEL_1","score":0.15},{"label":"LABEL_2","score":0.04}]"#)
            .create_async()
            .await;

        let model = model_for(&server.url(), None);
        let annotation = model.classify("Shares plunged after the warning.").await.unwrap();
        assert_eq!(annotation.label, SentimentLabel::Negative);
    }

    #[tokio::test]
    async fn test_model_loading_is_scoring_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", mockito::Matcher::Any)
            .with_status(503)
            .with_body(r#"{"error":"Model is currently loading","estimated_time":20.0}"#)
            .create_async()
            .await;

        let model = model_for(&server.url(), None);
        match model.classify("Anything").await {
            Err(Error::Scoring(message)) => assert!(message.contains("currently loading")),
            other => panic!("expected scoring error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected_without_request() {
        let model = model_for("http://127.0.0.1:9", None);
        assert!(matches!(model.classify("   ").await, Err(Error::Scoring(_))));
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        let long = "é".repeat(MAX_INPUT_CHARS + 10);
        assert_eq!(truncate(&long).chars().count(), MAX_INPUT_CHARS);
        assert_eq!(truncate("short"), "short");
    }

    #[test]
    fn test_debug_redacts_key() {
        let model = model_for("http://localhost", Some("hf_secret"));
        assert!(!format!("{:?}", model).contains("hf_secret"));
    }
}
