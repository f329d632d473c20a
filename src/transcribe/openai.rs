// OpenAI Whisper Python implementation, driven through its `whisper` command

use async_trait::async_trait;
use std::path::Path;
use serde::{Serialize, Deserialize};
use tokio::process::Command;
use tracing::info;

use crate::config::TranscriberConfig;
use crate::error::{Result, VideoconvError};
use crate::segment::TimedSegment;
use super::{TranscriberTrait, Transcript, common::{TranscriptionMapper, json_output_path, normalize_language, read_json_output, run_transcriber}};

/// OpenAI Whisper specific JSON output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIWhisperOutput {
    pub text: String,
    pub segments: Vec<OpenAIWhisperSegment>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIWhisperSegment {
    pub id: u64,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

pub struct OpenAIWhisperMapper;

impl TranscriptionMapper<OpenAIWhisperOutput> for OpenAIWhisperMapper {
    fn to_transcript(whisper_output: OpenAIWhisperOutput) -> Transcript {
        let segments = whisper_output
            .segments
            .iter()
            .filter_map(|seg| TimedSegment::from_raw(seg.start, seg.end, &seg.text))
            .collect();

        Transcript {
            language: normalize_language(whisper_output.language),
            segments,
        }
    }
}

/// OpenAI Whisper implementation
pub struct OpenAITranscriber {
    config: TranscriberConfig,
}

impl OpenAITranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TranscriberTrait for OpenAITranscriber {
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<Transcript> {
        info!(
            "Transcribing {} with OpenAI Whisper model {}",
            audio_path.display(),
            self.config.model
        );

        let temp_dir = tempfile::tempdir()
            .map_err(|e| VideoconvError::Transcriber(format!("Failed to create temp directory: {}", e)))?;
        let output_dir = temp_dir.path();

        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg(audio_path)
            .arg("--model").arg(&self.config.model)
            .arg("--output_dir").arg(output_dir)
            .arg("--output_format").arg("json")
            .arg("--beam_size").arg(self.config.beam_size.to_string())
            .arg("--verbose").arg("False");

        if let Some(lang) = language {
            cmd.arg("--language").arg(lang);
        }

        run_transcriber(cmd, &self.config.binary_path).await?;

        let json_file = json_output_path(output_dir, audio_path)?;
        let whisper_output: OpenAIWhisperOutput = read_json_output(&json_file).await?;
        let transcript = OpenAIWhisperMapper::to_transcript(whisper_output);

        info!(
            "OpenAI Whisper produced {} segments (language: {})",
            transcript.segments.len(),
            transcript.language.as_deref().unwrap_or("unknown")
        );
        Ok(transcript)
    }
}
