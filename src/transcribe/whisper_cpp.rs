use async_trait::async_trait;
use std::path::Path;
use serde::{Serialize, Deserialize};
use tokio::process::Command;
use tracing::info;

use crate::config::TranscriberConfig;
use crate::error::{Result, VideoconvError};
use crate::segment::TimedSegment;
use super::{TranscriberTrait, Transcript, common::{TranscriptionMapper, json_output_path, normalize_language, read_json_output, run_transcriber}};

// Structs for parsing whisper.cpp `-oj` output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppOutput {
    pub result: Option<WhisperCppResult>,
    pub transcription: Vec<WhisperCppSegment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppResult {
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppSegment {
    pub offsets: WhisperCppOffsets,
    pub text: String,
}

/// Milliseconds from the start of the audio
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperCppOffsets {
    pub from: i64,
    pub to: i64,
}

pub struct WhisperCppMapper;

impl TranscriptionMapper<WhisperCppOutput> for WhisperCppMapper {
    fn to_transcript(whisper_output: WhisperCppOutput) -> Transcript {
        let segments = whisper_output
            .transcription
            .iter()
            .filter_map(|seg| {
                let start = seg.offsets.from.max(0) as f64 / 1000.0; // Convert ms to seconds
                let end = seg.offsets.to.max(0) as f64 / 1000.0;
                TimedSegment::from_raw(start, end, &seg.text)
            })
            .collect();

        Transcript {
            language: normalize_language(whisper_output.result.and_then(|r| r.language)),
            segments,
        }
    }
}

/// whisper.cpp command line implementation
pub struct WhisperCppTranscriber {
    config: TranscriberConfig,
}

impl WhisperCppTranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl TranscriberTrait for WhisperCppTranscriber {
    async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<Transcript> {
        info!("Transcribing {} with whisper.cpp", audio_path.display());

        let temp_dir = tempfile::tempdir()
            .map_err(|e| VideoconvError::Transcriber(format!("Failed to create temp directory: {}", e)))?;
        let json_file = json_output_path(temp_dir.path(), audio_path)?;
        // -of takes the output path without extension
        let output_base = json_file.with_extension("");

        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg("-m").arg(&self.config.model)
            .arg("-f").arg(audio_path)
            .arg("-l").arg(language.unwrap_or("auto"))
            .arg("-bs").arg(self.config.beam_size.to_string())
            .arg("-oj")
            .arg("-of").arg(&output_base);

        run_transcriber(cmd, &self.config.binary_path).await?;

        let whisper_output: WhisperCppOutput = read_json_output(&json_file).await?;
        let transcript = WhisperCppMapper::to_transcript(whisper_output);

        info!(
            "whisper.cpp produced {} segments (language: {})",
            transcript.segments.len(),
            transcript.language.as_deref().unwrap_or("unknown")
        );
        Ok(transcript)
    }
}
