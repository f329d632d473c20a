use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::segment::TimedSegment;
use crate::tracks::TrackRegistry;

/// Value of `used_language` when the transcriber should detect the language
pub const AUTO_LANGUAGE: &str = "auto";

fn auto_language() -> String {
    AUTO_LANGUAGE.to_string()
}

/// Everything one processed video accumulates, persisted as one JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub file_id: String,
    pub video_name: String,
    #[serde(default)]
    pub video_size: u64,
    #[serde(default)]
    pub segments: Vec<TimedSegment>,
    #[serde(default)]
    pub summary: String,
    /// Language the transcriber reported
    #[serde(default)]
    pub detected_lang: Option<String>,
    /// Language chosen by the user, `auto` for detection
    #[serde(default = "auto_language")]
    pub used_language: String,
    #[serde(default)]
    pub summary_lang: String,
    #[serde(default)]
    pub tracks: TrackRegistry,
    #[serde(default)]
    pub srt_base: Option<String>,
    #[serde(default)]
    pub summary_txt: Option<String>,
    #[serde(default)]
    pub summary_audio: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Job {
    pub fn new(file_id: String, video_name: String, video_size: u64) -> Self {
        Self {
            file_id,
            video_name,
            video_size,
            segments: Vec::new(),
            summary: String::new(),
            detected_lang: None,
            used_language: auto_language(),
            summary_lang: String::new(),
            tracks: TrackRegistry::default(),
            srt_base: None,
            summary_txt: None,
            summary_audio: None,
            created_at: Utc::now(),
        }
    }

    /// Short random id: the first 8 hex characters of a v4 UUID
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
    }

    /// Ids are generated hex tokens; anything else cannot name a job and
    /// must never reach a file path.
    pub fn is_valid_id(job_id: &str) -> bool {
        !job_id.is_empty() && job_id.len() <= 32 && job_id.chars().all(|c| c.is_ascii_alphanumeric())
    }

    /// Language of the audio: the user's choice, else what the transcriber
    /// detected, else `fallback`.
    pub fn base_language(&self, fallback: &str) -> String {
        if self.used_language != AUTO_LANGUAGE && !self.used_language.trim().is_empty() {
            return self.used_language.clone();
        }
        self.detected_lang
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }

    /// The track players should show first: the base language track, or
    /// the first registered track when the base language has none.
    pub fn preferred_track(&self, fallback: &str) -> Option<(String, String)> {
        let base = self.base_language(fallback);
        if let Some(file) = self.tracks.get(&base) {
            return Some((base, file.to_string()));
        }
        self.tracks
            .iter()
            .next()
            .map(|(lang, file)| (lang.to_string(), file.to_string()))
    }
}
