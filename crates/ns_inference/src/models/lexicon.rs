use async_trait::async_trait;
use ns_core::{Error, Result, SentimentAnnotation, SentimentLabel, SentimentModel};

const POSITIVE: &[&str] = &[
    "beat", "beats", "boom", "boost", "boosted", "bullish", "buy", "cheer", "climb", "climbed",
    "confidence", "gain", "gains", "grew", "growth", "high", "improve", "improves", "inflows",
    "jump", "jumped", "momentum", "optimism", "outperform", "profit", "profits", "rally",
    "rallies", "rebound", "record", "recovery", "rise", "rises", "rose", "strong", "surge",
    "surged", "surges", "upgrade", "win",
];

const NEGATIVE: &[&str] = &[
    "bearish", "collapse", "concern", "concerns", "crash", "cut", "cuts", "decline", "declined",
    "default", "downgrade", "drop", "dropped", "fall", "fell", "fear", "fears", "fraud", "hack",
    "halt", "halts", "layoffs", "loss", "losses", "miss", "misses", "plunge", "plunged", "probe",
    "recession", "risk", "selloff", "slowdown", "slump", "tumble", "warn", "warning", "weak",
    "weighed", "worst",
];

const NEGATORS: &[&str] = &["not", "no", "never", "without", "hardly", "isn't", "wasn't", "don't", "didn't"];

/// Offline classifier counting bullish and bearish words.
#[derive(Debug, Default, Clone)]
pub struct LexiconModel;

impl LexiconModel {
    pub fn new() -> Self {
        Self
    }

    fn tally(text: &str) -> (usize, usize) {
        let lowered = text.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
            .collect();

        let mut positive = 0;
        let mut negative = 0;
        for (i, token) in tokens.iter().enumerate() {
            let negated = i > 0 && NEGATORS.contains(&tokens[i - 1]);
            let polarity = if POSITIVE.contains(token) {
                1
            } else if NEGATIVE.contains(token) {
                -1
            } else {
                0
            };
            match (polarity, negated) {
                (1, false) | (-1, true) => positive += 1,
                (-1, false) | (1, true) => negative += 1,
                _ => {}
            }
        }
        (positive, negative)
    }
}

#[async_trait]
impl SentimentModel for LexiconModel {
    fn name(&self) -> &str {
        "Lexicon"
    }

    async fn classify(&self, text: &str) -> Result<SentimentAnnotation> {
        if text.trim().is_empty() {
            return Err(Error::Scoring("cannot classify empty text".to_string()));
        }

        let (positive, negative) = Self::tally(text);
        let hits = positive + negative;
        if hits == 0 || positive == negative {
            return Ok(SentimentAnnotation::new(SentimentLabel::Neutral, 0.5));
        }

        let label = if positive > negative {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Negative
        };
        let margin = positive.abs_diff(negative) as f32 / hits as f32;
        Ok(SentimentAnnotation::new(label, 0.5 + 0.5 * margin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lexicon_model() {
        let model = LexiconModel::new();

        let bullish = model
            .classify("Bitcoin surged to a record high as inflows continued.")
            .await
            .unwrap();
        assert_eq!(bullish.label, SentimentLabel::Positive);
        assert_eq!(bullish.score, 1.0);

        let bearish = model
            .classify("Shares plunged after the company warned of losses.")
            .await
            .unwrap();
        assert_eq!(bearish.label, SentimentLabel::Negative);

        let mixed = model.classify("Gains were offset by losses.").await.unwrap();
        assert_eq!(mixed.label, SentimentLabel::Neutral);
        assert_eq!(mixed.score, 0.5);
    }

    #[tokio::test]
    async fn test_negation_flips_polarity() {
        let model = LexiconModel::new();
        let annotation = model.classify("Investors did not rally behind the plan.").await.unwrap();
        assert_eq!(annotation.label, SentimentLabel::Negative);
    }

    #[tokio::test]
    async fn test_empty_text_fails() {
        let model = LexiconModel::new();
        assert!(matches!(model.classify("  \n").await, Err(Error::Scoring(_))));
    }
}
