// Translation behind a small trait so every workflow gets its own client:
// - Google: public Google Translate web endpoint
// - Ollama: local LLM with a JSON translation prompt
// - batch: per-item fallback helpers used by the pipeline

pub mod batch;
pub mod google;
pub mod ollama;

use async_trait::async_trait;

pub use batch::*;
use crate::config::{TranslateConfig, TranslationBackend};
use crate::error::Result;

/// Translate one piece of text into `target_language`
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String>;
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create the translator selected in the configuration
    pub fn create_translator(config: TranslateConfig) -> Result<Box<dyn Translator>> {
        match config.backend {
            TranslationBackend::Google => Ok(Box::new(google::GoogleTranslator::new(config)?)),
            TranslationBackend::Ollama => Ok(Box::new(ollama::OllamaTranslator::new(config)?)),
        }
    }
}
