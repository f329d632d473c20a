use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::TranslateConfig;
use crate::error::{Result, VideoconvError};
use super::Translator;

/// Client for the `translate_a/single` endpoint used by the Google Translate web widget
pub struct GoogleTranslator {
    client: Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(config: TranslateConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        let url = format!("{}/translate_a/single", self.endpoint);
        debug!("Sending translation request to {} (target {})", url, target_language);

        let response = self.client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| VideoconvError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VideoconvError::Translation(format!(
                "Google Translate error {}: {}", status, error_text
            )));
        }

        let body: Value = response.json().await
            .map_err(|e| VideoconvError::Translation(format!("Failed to parse response: {}", e)))?;

        parse_translation(&body)
    }
}

/// The reply is `[[["translated", "source", ...], ...], ...]`; the
/// translation is the concatenation of the first field of every fragment.
fn parse_translation(body: &Value) -> Result<String> {
    let fragments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| VideoconvError::Translation("Unexpected response shape".to_string()))?;

    let translated: String = fragments
        .iter()
        .filter_map(|fragment| fragment.get(0).and_then(Value::as_str))
        .collect();

    let translated = translated.trim();
    if translated.is_empty() {
        return Err(VideoconvError::Translation("Empty translation received".to_string()));
    }

    Ok(translated.to_string())
}
