// Text-to-speech for summaries:
// - Google: online Google TTS endpoint, MP3 output (primary)
// - Espeak: offline espeak-ng binary, WAV output (fallback)

pub mod espeak;
pub mod google;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::SpeechConfig;
use crate::error::Result;

/// Synthesize `text` spoken in `language` next to `output_stem`.
///
/// Implementations choose the container and return the path they wrote
/// (`output_stem` plus their own extension).
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &'static str;

    async fn synthesize(&self, text: &str, output_stem: &Path, language: &str) -> Result<PathBuf>;
}

/// Which backend produced the summary audio, if any did
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechOutcome {
    Primary(PathBuf),
    Fallback(PathBuf),
    Unavailable,
}

impl SpeechOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Primary(path) | Self::Fallback(path) => Some(path),
            Self::Unavailable => None,
        }
    }

    /// File name to record in job state
    pub fn file_name(&self) -> Option<String> {
        self.path()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().to_string())
    }
}

/// Try `primary`, and `fallback` once if it fails. Both failing is not an
/// error: the job simply has no summary audio.
pub async fn synthesize_with_fallback(
    primary: &dyn SpeechSynthesizer,
    fallback: &dyn SpeechSynthesizer,
    text: &str,
    output_stem: &Path,
    language: &str,
) -> SpeechOutcome {
    match primary.synthesize(text, output_stem, language).await {
        Ok(path) => {
            info!("Summary audio synthesized with {}: {}", primary.name(), path.display());
            return SpeechOutcome::Primary(path);
        }
        Err(e) => warn!("{} synthesis failed, trying {}: {}", primary.name(), fallback.name(), e),
    }

    match fallback.synthesize(text, output_stem, language).await {
        Ok(path) => {
            info!("Summary audio synthesized with {}: {}", fallback.name(), path.display());
            SpeechOutcome::Fallback(path)
        }
        Err(e) => {
            warn!("{} synthesis failed, continuing without summary audio: {}", fallback.name(), e);
            SpeechOutcome::Unavailable
        }
    }
}

/// Factory for the primary/fallback synthesizer pair
pub struct SpeechFactory;

impl SpeechFactory {
    pub fn create_primary(config: SpeechConfig) -> Result<Box<dyn SpeechSynthesizer>> {
        Ok(Box::new(google::GoogleSpeech::new(config)?))
    }

    pub fn create_fallback(config: SpeechConfig) -> Box<dyn SpeechSynthesizer> {
        Box::new(espeak::EspeakSpeech::new(config))
    }
}
