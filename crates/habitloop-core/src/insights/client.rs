//! Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use url::Url;

use crate::credentials;
use crate::error::InsightError;
use crate::storage::InsightsConfig;

/// Environment variable consulted before the OS keyring.
pub const API_KEY_ENV: &str = "HABITLOOP_INSIGHTS_KEY";
/// Keyring entry holding the API key.
pub const API_KEY_ENTRY: &str = "insights_api_key";

/// External text-generation service.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, InsightError>;
}

pub struct GeminiClient {
    base_url: Url,
    model: String,
    api_key: String,
    http_client: Client,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Result<Self, InsightError> {
        if api_key.is_empty() {
            return Err(InsightError::MissingApiKey);
        }
        Ok(Self {
            base_url: Url::parse(base_url)?,
            model: model.to_string(),
            api_key: api_key.to_string(),
            http_client: Client::new(),
        })
    }

    /// Build from config, reading the key from the environment or keyring.
    pub fn from_config(config: &InsightsConfig) -> Result<Self, InsightError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| credentials::get(API_KEY_ENTRY).ok().flatten())
            .ok_or(InsightError::MissingApiKey)?;
        Self::new(&config.base_url, &config.model, &api_key)
    }

    fn endpoint(&self) -> Result<Url, InsightError> {
        let mut url = self
            .base_url
            .join(&format!("v1beta/models/{}:generateContent", self.model))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

#[async_trait]
impl InsightProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let resp = self
            .http_client
            .post(self.endpoint()?)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(InsightError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let value: serde_json::Value = resp.json().await?;
        value["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .filter(|t| !t.trim().is_empty())
            .ok_or(InsightError::EmptyResponse)
    }
}
