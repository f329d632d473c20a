use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, VideoconvError};
use crate::segment::TimedSegment;

/// Transcription result shared by every implementation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    /// Language reported by the tool, if any
    pub language: Option<String>,
    pub segments: Vec<TimedSegment>,
}

impl Transcript {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Trait for converting service-specific transcription formats to `Transcript`
pub trait TranscriptionMapper<T> {
    fn to_transcript(service_result: T) -> Transcript;
}

/// Normalize a reported language code; tools print "auto" or an empty
/// string when they did not detect anything.
pub fn normalize_language(language: Option<String>) -> Option<String> {
    language
        .map(|lang| lang.trim().to_lowercase())
        .filter(|lang| !lang.is_empty() && lang != "auto" && lang != "unknown")
}

/// Run a transcriber command to completion
pub async fn run_transcriber(mut cmd: Command, binary_path: &str) -> Result<()> {
    debug!("Executing transcriber command: {:?}", cmd);

    let output = cmd.output().await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => VideoconvError::Transcriber(format!(
            "'{}' was not found in PATH",
            binary_path
        )),
        _ => VideoconvError::Transcriber(format!("Failed to execute {}: {}", binary_path, e)),
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VideoconvError::Transcriber(format!(
            "{} failed: {}",
            binary_path, stderr
        )));
    }

    Ok(())
}

/// Read and parse the JSON file a transcriber left behind
pub async fn read_json_output<T: DeserializeOwned>(json_file: &Path) -> Result<T> {
    if !json_file.exists() {
        return Err(VideoconvError::Transcriber(format!(
            "Transcriber JSON output not found: {}",
            json_file.display()
        )));
    }

    let content = tokio::fs::read_to_string(json_file)
        .await
        .map_err(|e| VideoconvError::Transcriber(format!("Failed to read JSON output: {}", e)))?;

    serde_json::from_str(&content)
        .map_err(|e| VideoconvError::Transcriber(format!("Failed to parse JSON output: {}", e)))
}

/// `<dir>/<audio stem>.json`, the file name both tools derive from the input
pub fn json_output_path(output_dir: &Path, audio_path: &Path) -> Result<PathBuf> {
    let stem = audio_path
        .file_stem()
        .ok_or_else(|| VideoconvError::Transcriber("Invalid audio filename".to_string()))?;
    Ok(output_dir.join(format!("{}.json", stem.to_string_lossy())))
}
