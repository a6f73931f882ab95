//! Generated insights about the user's habits.
//!
//! [`InsightService`] never fails: any transport, status or parse error is
//! logged and replaced with canned content. There is no retry and no cache.

mod client;
mod fallback;
mod prompt;

pub use client::{GeminiClient, InsightProvider, API_KEY_ENTRY, API_KEY_ENV};
pub use fallback::{fallback_insights, fallback_verdict};
pub use prompt::{habit_snapshot, insights_prompt, verdict_prompt, Tone};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::InsightError;
use crate::habit::Habit;

/// One insight card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSource {
    Generated,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightReport {
    pub source: InsightSource,
    pub insights: Vec<Insight>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub source: InsightSource,
    pub tone: Tone,
    pub text: String,
}

/// Strip a surrounding Markdown code fence, if any.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_lang, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse generated text as a JSON array of insights.
pub fn parse_insights(text: &str) -> Result<Vec<Insight>, InsightError> {
    let insights: Vec<Insight> = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| InsightError::Parse(e.to_string()))?;
    if insights.is_empty() {
        return Err(InsightError::Parse("empty insight list".into()));
    }
    Ok(insights)
}

/// Builds prompts, calls the provider and falls back on failure.
pub struct InsightService {
    provider: Option<Box<dyn InsightProvider>>,
}

impl InsightService {
    pub fn new(provider: Box<dyn InsightProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A service that always serves canned content.
    pub fn offline() -> Self {
        Self { provider: None }
    }

    async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        match &self.provider {
            Some(provider) => provider.generate(prompt).await,
            None => Err(InsightError::MissingApiKey),
        }
    }

    /// Three insight cards for `habits`.
    pub async fn insights(&self, habits: &[Habit], reveal_private: bool) -> InsightReport {
        let prompt = insights_prompt(habits, reveal_private);
        match self.generate(&prompt).await.and_then(|text| parse_insights(&text)) {
            Ok(insights) => {
                debug!("Generated {} insights", insights.len());
                InsightReport {
                    source: InsightSource::Generated,
                    insights,
                }
            }
            Err(e) => {
                warn!("Insight generation failed, using fallback: {e}");
                InsightReport {
                    source: InsightSource::Fallback,
                    insights: fallback_insights(),
                }
            }
        }
    }

    /// One sentence of praise or roast.
    pub async fn verdict(&self, habits: &[Habit], tone: Tone, reveal_private: bool) -> Verdict {
        let prompt = verdict_prompt(habits, tone, reveal_private);
        match self.generate(&prompt).await {
            Ok(text) if !text.trim().is_empty() => Verdict {
                source: InsightSource::Generated,
                tone,
                text: text.trim().to_string(),
            },
            Ok(_) => {
                warn!("Verdict generation returned empty text, using fallback");
                Self::fallback(tone)
            }
            Err(e) => {
                warn!("Verdict generation failed, using fallback: {e}");
                Self::fallback(tone)
            }
        }
    }

    fn fallback(tone: Tone) -> Verdict {
        Verdict {
            source: InsightSource::Fallback,
            tone,
            text: fallback_verdict(tone).to_string(),
        }
    }
}
