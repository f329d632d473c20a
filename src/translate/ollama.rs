use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::TranslateConfig;
use crate::error::{Result, VideoconvError};
use super::Translator;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub response: String,
    pub done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
}

/// Translation through a local Ollama server
pub struct OllamaTranslator {
    client: Client,
    config: TranslateConfig,
}

impl OllamaTranslator {
    pub fn new(config: TranslateConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    fn build_translation_prompt(&self, text: &str, target_language: &str) -> String {
        let language_name = language_code_to_name(target_language);

        format!(
            "You are a professional subtitle translator.\n\
             \n\
             CRITICAL: You must translate the text to {} ONLY. Do not translate to any other language.\n\
             The target language is: {} (language code: {})\n\
             \n\
             Return ONLY the translation in JSON format as {{\"text\":\"your {} translation here\"}}.\n\
             Do not include any explanations, alternatives, or text in other languages.\n\
             \n\
             [Text to translate]\n\
             {}\n",
            language_name, language_name, target_language, language_name, text
        )
    }
}

#[async_trait]
impl Translator for OllamaTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: self.build_translation_prompt(text, target_language),
            stream: false,
            format: "json".to_string(),
        };

        let url = format!("{}/api/generate", self.config.endpoint.trim_end_matches('/'));
        debug!("Sending translation request to: {}", url);

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| VideoconvError::Translation(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(VideoconvError::Translation(format!(
                "Ollama API error {}: {}", status, error_text
            )));
        }

        let generated: GenerateResponse = response.json().await
            .map_err(|e| VideoconvError::Translation(format!("Failed to parse response: {}", e)))?;

        let raw_response = generated.response.trim();
        debug!("Raw Ollama response: {}", raw_response);

        extract_translation(raw_response)
    }
}

/// Pull the translation out of a model reply: the `{"text": ...}` object,
/// either as the whole reply or embedded in surrounding chatter.
fn extract_translation(raw_response: &str) -> Result<String> {
    let raw_response = raw_response.trim();
    if raw_response.is_empty() {
        return Err(VideoconvError::Translation("Empty translation received".to_string()));
    }

    let embedded = match (raw_response.find('{'), raw_response.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&raw_response[start..=end]),
        _ => None,
    };

    let result = serde_json::from_str::<TranslationResult>(raw_response)
        .ok()
        .or_else(|| embedded.and_then(|json| serde_json::from_str::<TranslationResult>(json).ok()))
        .ok_or_else(|| {
            VideoconvError::Translation(format!("Reply is not a translation object: {}", raw_response))
        })?;

    let text = result.text.trim();
    if text.is_empty() {
        return Err(VideoconvError::Translation("Empty translation received".to_string()));
    }
    Ok(text.to_string())
}

/// Full language names make the prompt less ambiguous for small models
fn language_code_to_name(code: &str) -> String {
    match code.to_lowercase().as_str() {
        "es" => "Spanish".to_string(),
        "en" => "English".to_string(),
        "pt" => "Portuguese".to_string(),
        "it" => "Italian".to_string(),
        "fr" => "French".to_string(),
        "de" => "German".to_string(),
        "ja" => "Japanese".to_string(),
        "ko" => "Korean".to_string(),
        "zh" => "Chinese".to_string(),
        "ru" => "Russian".to_string(),
        "nl" => "Dutch".to_string(),
        "pl" => "Polish".to_string(),
        "tr" => "Turkish".to_string(),
        "ar" => "Arabic".to_string(),
        "hi" => "Hindi".to_string(),
        "ca" => "Catalan".to_string(),
        "gl" => "Galician".to_string(),
        "eu" => "Basque".to_string(),
        _ => code.to_string(),
    }
}
