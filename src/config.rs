use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::error::{Result, VideoconvError};
use crate::summarize::DEFAULT_MAX_SENTENCES;

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_beam_size() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub media: MediaConfig,
    pub transcriber: TranscriberConfig,
    pub translate: TranslateConfig,
    pub speech: SpeechConfig,
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root of the data tree (videos, audio, outputs, temp, log)
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to ffmpeg binary
    pub binary_path: String,
    /// Sample rate of the extracted waveform
    pub sample_rate: u32,
    /// Channel count of the extracted waveform
    pub channels: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Which command line transcriber to drive
    pub implementation: TranscriberImplementation,
    /// Path to transcriber binary (e.g., whisper-cli)
    pub binary_path: String,
    /// Model name (OpenAI whisper) or model file path (whisper.cpp)
    pub model: String,
    /// Language used for the base track when the audio language is "auto"
    /// and the transcriber did not report one
    pub fallback_language: String,
    #[serde(default = "default_beam_size")]
    pub beam_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TranscriberImplementation {
    WhisperCpp,
    OpenAI,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Translation backend
    pub backend: TranslationBackend,
    /// Backend endpoint URL
    pub endpoint: String,
    /// LLM model (Ollama backend only)
    pub model: String,
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TranslationBackend {
    /// Public Google Translate web endpoint
    Google,
    /// Local Ollama server
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Google TTS endpoint used by the primary synthesizer
    pub endpoint: String,
    /// Languages the primary synthesizer accepts; others fall back to the first entry
    pub supported_languages: Vec<String>,
    /// Offline synthesizer binary used when the primary fails
    pub offline_binary: String,
    /// Words per minute for the offline synthesizer
    pub offline_rate: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    pub max_sentences: usize,
    /// Language the summarizer's stop words are written in; summaries
    /// requested in any other language get translated
    pub source_language: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                data_dir: PathBuf::from("data"),
            },
            media: MediaConfig {
                binary_path: "ffmpeg".to_string(),
                sample_rate: 16000,
                channels: 1,
            },
            transcriber: TranscriberConfig {
                implementation: TranscriberImplementation::OpenAI,
                binary_path: "whisper".to_string(),
                model: "small".to_string(),
                fallback_language: "es".to_string(),
                beam_size: 5,
            },
            translate: TranslateConfig {
                backend: TranslationBackend::Google,
                endpoint: "https://translate.googleapis.com".to_string(),
                model: "llama3.2:3b".to_string(),
                timeout_secs: 60,
            },
            speech: SpeechConfig {
                endpoint: "https://translate.google.com/translate_tts".to_string(),
                supported_languages: ["es", "en", "pt", "it", "fr"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                offline_binary: "espeak-ng".to_string(),
                offline_rate: 180,
                timeout_secs: 60,
            },
            summary: SummaryConfig {
                max_sentences: DEFAULT_MAX_SENTENCES,
                source_language: "es".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| VideoconvError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| VideoconvError::Config(format!("Failed to parse config file: {}", e)))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VideoconvError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| VideoconvError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
