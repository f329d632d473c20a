use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::config::SpeechConfig;
use crate::error::{Result, VideoconvError};
use super::SpeechSynthesizer;

/// The endpoint rejects requests longer than this many characters
const MAX_CHUNK_CHARS: usize = 100;

/// Online synthesis through the Google Translate TTS endpoint
pub struct GoogleSpeech {
    client: Client,
    config: SpeechConfig,
}

impl GoogleSpeech {
    pub fn new(config: SpeechConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("Mozilla/5.0")
            .build()?;

        Ok(Self { client, config })
    }

    /// Unsupported languages are read with the first configured voice
    fn resolve_language<'a>(&'a self, language: &'a str) -> &'a str {
        if self.config.supported_languages.iter().any(|l| l == language) {
            language
        } else {
            self.config
                .supported_languages
                .first()
                .map(String::as_str)
                .unwrap_or(language)
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSpeech {
    fn name(&self) -> &'static str {
        "Google TTS"
    }

    async fn synthesize(&self, text: &str, output_stem: &Path, language: &str) -> Result<PathBuf> {
        let language = self.resolve_language(language);
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(VideoconvError::Speech("Nothing to synthesize".to_string()));
        }

        let total = chunks.len().to_string();
        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let idx = idx.to_string();
            let textlen = chunk.chars().count().to_string();
            debug!("Requesting TTS chunk {}/{} ({} chars)", idx, total, textlen);

            let response = self.client
                .get(&self.config.endpoint)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", language),
                    ("q", chunk.as_str()),
                    ("total", total.as_str()),
                    ("idx", idx.as_str()),
                    ("textlen", textlen.as_str()),
                ])
                .send()
                .await
                .map_err(|e| VideoconvError::Speech(format!("TTS request failed: {}", e)))?;

            if !response.status().is_success() {
                return Err(VideoconvError::Speech(format!(
                    "TTS endpoint returned {}",
                    response.status()
                )));
            }

            let bytes = response.bytes().await
                .map_err(|e| VideoconvError::Speech(format!("Failed to read TTS audio: {}", e)))?;
            // MP3 frames can be concatenated as-is
            audio.extend_from_slice(&bytes);
        }

        let output_path = output_stem.with_extension("mp3");
        tokio::fs::write(&output_path, audio).await?;
        Ok(output_path)
    }
}

/// Split on whitespace into chunks of at most `max_chars` characters.
/// Words longer than the limit are cut.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();

        while word.len() > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            chunks.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() { word.len() } else { current_len + 1 + word.len() };
        if needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_chunk_text_respects_limit_and_word_boundaries() {
        let chunks = chunk_text("uno dos tres cuatro", 8);
        assert_eq!(chunks, vec!["uno dos", "tres", "cuatro"]);
    }

    #[test]
    fn test_chunk_text_cuts_long_words() {
        let chunks = chunk_text("ab abcdefgh", 3);
        assert_eq!(chunks, vec!["ab", "abc", "def", "gh"]);
    }

    #[test]
    fn test_chunk_text_counts_characters_not_bytes() {
        let chunks = chunk_text("canción ñandú", 13);
        assert_eq!(chunks, vec!["canción ñandú"]);
        assert!(chunk_text("   ", 10).is_empty());
    }

    #[test]
    fn test_unsupported_language_uses_first_voice() {
        let speech = GoogleSpeech::new(Config::default().speech).unwrap();
        assert_eq!(speech.resolve_language("pt"), "pt");
        assert_eq!(speech.resolve_language("ja"), "es");
    }
}
