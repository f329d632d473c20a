use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::Result;

/// Directory tree under the configured data directory, and the names of
/// every artifact a job produces.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn videos_dir(&self) -> PathBuf {
        self.root.join("videos")
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.root.join("audio")
    }

    pub fn outputs_dir(&self) -> PathBuf {
        self.root.join("outputs")
    }

    /// Job state documents live here
    pub fn temp_dir(&self) -> PathBuf {
        self.root.join("temp")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join("log")
    }

    /// Create every directory of the tree
    pub async fn ensure(&self) -> Result<()> {
        for dir in [
            self.videos_dir(),
            self.audio_dir(),
            self.outputs_dir(),
            self.temp_dir(),
        ] {
            fs::create_dir_all(&dir).await?;
        }
        Ok(())
    }
}

/// `video_<id><ext>`, keeping the uploaded file's extension (lower-cased,
/// `.mp4` when it has none)
pub fn video_name(job_id: &str, original: &Path) -> String {
    let ext = original
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_else(|| ".mp4".to_string());
    format!("video_{}{}", job_id, ext)
}

pub fn base_srt_name(job_id: &str) -> String {
    format!("subs_{}_base.srt", job_id)
}

pub fn track_name(job_id: &str, language: &str) -> String {
    format!("subs_{}_{}.vtt", job_id, language)
}

pub fn summary_text_name(job_id: &str) -> String {
    format!("summary_{}.txt", job_id)
}

/// Extension-less; the synthesizer picks the container
pub fn summary_audio_stem(job_id: &str, language: &str) -> String {
    format!("summary_{}_{}", job_id, language)
}

/// Human readable byte size with one decimal: `512.0 B`, `1.5 KB`, ..., capped at GB
pub fn format_size(n_bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = n_bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_names() {
        assert_eq!(video_name("ab12cd34", Path::new("Clase Uno.MKV")), "video_ab12cd34.mkv");
        assert_eq!(video_name("ab12cd34", Path::new("raw")), "video_ab12cd34.mp4");
        assert_eq!(base_srt_name("ab12cd34"), "subs_ab12cd34_base.srt");
        assert_eq!(track_name("ab12cd34", "en"), "subs_ab12cd34_en.vtt");
        assert_eq!(summary_text_name("ab12cd34"), "summary_ab12cd34.txt");
        assert_eq!(summary_audio_stem("ab12cd34", "pt"), "summary_ab12cd34_pt");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0.0 B");
        assert_eq!(format_size(1023), "1023.0 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024 * 1024), "3072.0 GB");
    }

    #[tokio::test]
    async fn test_ensure_creates_tree() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DataLayout::new(dir.path().join("data"));
        layout.ensure().await.unwrap();

        assert!(layout.videos_dir().is_dir());
        assert!(layout.audio_dir().is_dir());
        assert!(layout.outputs_dir().is_dir());
        assert!(layout.temp_dir().is_dir());
    }
}
