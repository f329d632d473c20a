// Transcription through external whisper command line tools.
//
// Each implementation runs its tool with JSON output into a temporary
// directory, parses the tool-specific JSON, and maps it onto the shared
// `Transcript` through `TranscriptionMapper`.
// - WhisperCpp: whisper.cpp `whisper-cli`
// - OpenAI: OpenAI Whisper Python `whisper`

pub mod common;
pub mod whisper_cpp;
pub mod openai;

use async_trait::async_trait;
use std::path::Path;

pub use common::*;
use crate::config::{TranscriberConfig, TranscriberImplementation};
use crate::error::Result;

/// Main trait for transcription operations
#[async_trait]
pub trait TranscriberTrait: Send + Sync {
    /// Transcribe a waveform file. `language` of `None` lets the tool detect it.
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<Transcript>;
}

/// Factory for creating transcriber instances
pub struct TranscriberFactory;

impl TranscriberFactory {
    /// Create the transcriber selected in the configuration
    pub fn create_transcriber(config: TranscriberConfig) -> Box<dyn TranscriberTrait> {
        match config.implementation {
            TranscriberImplementation::WhisperCpp => {
                Box::new(whisper_cpp::WhisperCppTranscriber::new(config))
            }
            TranscriberImplementation::OpenAI => {
                Box::new(openai::OpenAITranscriber::new(config))
            }
        }
    }
}
