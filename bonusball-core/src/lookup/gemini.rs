use crate::config::LookupConfig;
use crate::error::{BonusBallError, Result};
use crate::lookup::{
    parse_latest_number, parse_recent_results, ResultLookup, LATEST_RESULT_PROMPT,
    RECENT_RESULTS_PROMPT,
};
use crate::types::ExternalResult;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

/// Gemini `generateContent` client grounded with Google Search.
pub struct GeminiLookup {
    client: reqwest::Client,
    api_url: String,
    model: String,
    api_key: String,
}

impl GeminiLookup {
    pub fn new(config: &LookupConfig, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        }
    }

    /// Reads the API key from the environment variable named in the config.
    pub fn from_env(config: &LookupConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            BonusBallError::config(format!(
                "Set {} to enable result lookup",
                config.api_key_env
            ))
        })?;
        Ok(Self::new(config, api_key))
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "tools": [{ "google_search": {} }],
        });

        tracing::debug!("Requesting result lookup from {}", url);
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BonusBallError::lookup(format!(
                "Lookup API error: {}",
                response.status()
            )));
        }

        let parsed: GenerateResponse = response.json().await?;
        Ok(parsed.text())
    }
}

#[async_trait]
impl ResultLookup for GeminiLookup {
    async fn latest_number(&self) -> Result<Option<u32>> {
        let text = self.generate(LATEST_RESULT_PROMPT).await?;
        let number = parse_latest_number(&text);
        if number.is_none() {
            tracing::warn!("Could not read a bonus ball number from lookup response");
        }
        Ok(number)
    }

    async fn recent_results(&self) -> Result<Vec<ExternalResult>> {
        let text = self.generate(RECENT_RESULTS_PROMPT).await?;
        parse_recent_results(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_joins_parts() {
        let raw = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "{\"number\"" }, { "text": ": 31}" } ] } }
            ]
        }"#;
        let response: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parse_latest_number(&response.text()), Some(31));
    }

    #[test]
    fn test_empty_response() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), "");
    }

    #[test]
    fn test_missing_api_key() {
        let config = LookupConfig {
            api_key_env: "BONUSBALL_TEST_UNSET_KEY".to_string(),
            ..LookupConfig::default()
        };
        assert!(matches!(
            GeminiLookup::from_env(&config),
            Err(BonusBallError::Config(_))
        ));
    }
}
