use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_MAX_PAGES: usize = 5;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    pub model: ModelConfig,
    pub pager: PagerConfig,
    pub web: WebConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.pager.page_size == 0 {
            return Err(Error::Config("page size must be at least 1".to_string()));
        }
        if self.source.max_pages == 0 {
            return Err(Error::Config("max pages must be at least 1".to_string()));
        }
        if self.model.concurrency == 0 {
            return Err(Error::Config("scoring concurrency must be at least 1".to_string()));
        }
        if self.web.session_ttl_secs == 0 {
            return Err(Error::Config("session ttl must be at least 1 second".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// `google` or `static`
    pub kind: String,
    pub base_url: Option<String>,
    pub lang: String,
    pub region: String,
    /// Result pages walked per topic before the source counts as exhausted.
    pub max_pages: usize,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: "google".to_string(),
            base_url: None,
            lang: "en".to_string(),
            region: "US".to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            timeout_secs: 15,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// `huggingface` or `lexicon`
    pub kind: String,
    pub model_name: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Articles scored at the same time within one batch.
    pub concurrency: usize,
    pub timeout_secs: u64,
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("kind", &self.kind)
            .field("model_name", &self.model_name)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("concurrency", &self.concurrency)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: "huggingface".to_string(),
            model_name: None,
            api_key: None,
            base_url: None,
            concurrency: 4,
            timeout_secs: 30,
        }
    }
}

/// How far the offset moves after a successful page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetPolicy {
    /// Advance by the page size that was requested, even on a short page.
    #[default]
    Requested,
    /// Advance by the number of articles the source actually returned.
    Returned,
}

impl FromStr for OffsetPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "requested" => Ok(OffsetPolicy::Requested),
            "returned" => Ok(OffsetPolicy::Returned),
            other => Err(Error::Config(format!("unknown offset policy: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagerConfig {
    pub page_size: usize,
    pub offset_policy: OffsetPolicy,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            offset_policy: OffsetPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    pub bind: String,
    /// Idle time after which a browser session is forgotten.
    pub session_ttl_secs: u64,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8501".to_string(),
            session_ttl_secs: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pager.page_size, 10);
        assert_eq!(config.source.max_pages, 5);
        assert_eq!(config.pager.offset_policy, OffsetPolicy::Requested);
    }

    #[test]
    fn test_rejects_zero_session_ttl() {
        let mut config = Config::default();
        config.web.session_ttl_secs = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let mut config = Config::default();
        config.pager.page_size = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_offset_policy_from_str() {
        assert_eq!("Returned".parse::<OffsetPolicy>().unwrap(), OffsetPolicy::Returned);
        assert_eq!("requested".parse::<OffsetPolicy>().unwrap(), OffsetPolicy::Requested);
        assert!("sometimes".parse::<OffsetPolicy>().is_err());
    }

    #[test]
    fn test_api_key_is_redacted() {
        let config = ModelConfig {
            api_key: Some("hf_secret".to_string()),
            ..ModelConfig::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hf_secret"));
        assert!(debug.contains("<redacted>"));
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("hf_secret"));
    }
}
