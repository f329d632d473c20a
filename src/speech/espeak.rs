use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::debug;

use crate::config::SpeechConfig;
use crate::error::{Result, VideoconvError};
use super::SpeechSynthesizer;

/// Offline synthesis with the espeak-ng binary
pub struct EspeakSpeech {
    config: SpeechConfig,
}

impl EspeakSpeech {
    pub fn new(config: SpeechConfig) -> Self {
        Self { config }
    }
}

/// espeak-ng voice for a language code; unknown codes are passed through
pub fn voice_for_language(language: &str) -> &str {
    match language {
        "es" => "es",
        "en" => "en-us",
        "pt" => "pt-br",
        "it" => "it",
        "fr" => "fr-fr",
        other => other,
    }
}

#[async_trait]
impl SpeechSynthesizer for EspeakSpeech {
    fn name(&self) -> &'static str {
        "espeak-ng"
    }

    async fn synthesize(&self, text: &str, output_stem: &Path, language: &str) -> Result<PathBuf> {
        if text.trim().is_empty() {
            return Err(VideoconvError::Speech("Nothing to synthesize".to_string()));
        }

        // long summaries do not fit on a command line
        let mut text_file = tempfile::NamedTempFile::new()?;
        text_file.write_all(text.as_bytes())?;
        text_file.flush()?;

        let output_path = output_stem.with_extension("wav");

        let mut cmd = Command::new(&self.config.offline_binary);
        cmd.arg("-v").arg(voice_for_language(language))
            .arg("-s").arg(self.config.offline_rate.to_string())
            .arg("-f").arg(text_file.path())
            .arg("-w").arg(&output_path);

        debug!("Executing offline synthesizer: {:?}", cmd);

        let output = cmd.output().await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => VideoconvError::Speech(format!(
                "'{}' was not found in PATH",
                self.config.offline_binary
            )),
            _ => VideoconvError::Speech(format!("Failed to execute {}: {}", self.config.offline_binary, e)),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VideoconvError::Speech(format!("espeak-ng failed: {}", stderr)));
        }

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_voice_table() {
        assert_eq!(voice_for_language("en"), "en-us");
        assert_eq!(voice_for_language("pt"), "pt-br");
        assert_eq!(voice_for_language("de"), "de");
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_speech_error() {
        let mut config = Config::default().speech;
        config.offline_binary = "videoconv-no-such-espeak".to_string();
        let dir = tempfile::tempdir().unwrap();

        let result = EspeakSpeech::new(config)
            .synthesize("Hola.", &dir.path().join("summary"), "es")
            .await;

        assert!(matches!(result, Err(VideoconvError::Speech(_))));
    }
}
