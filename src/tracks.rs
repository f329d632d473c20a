use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::info;

use crate::error::{Result, VideoconvError};
use crate::job::Job;
use crate::layout::track_name;
use crate::segment::TimedSegment;
use crate::subtitle::write_vtt;
use crate::translate::{Translator, translate_segments};

/// Language code → subtitle file name of every track generated for a job.
/// A registered language is never generated again.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackRegistry {
    tracks: BTreeMap<String, String>,
}

/// Outcome of planning a track request against a registry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackPlan {
    /// Languages to generate, in request order
    pub generate: Vec<String>,
    /// Languages already available (or repeated within the request)
    pub skipped: Vec<String>,
}

impl TrackRegistry {
    pub fn contains(&self, language: &str) -> bool {
        self.tracks.contains_key(language)
    }

    pub fn get(&self, language: &str) -> Option<&str> {
        self.tracks.get(language).map(String::as_str)
    }

    pub fn register(&mut self, language: &str, file_name: &str) {
        self.tracks.insert(language.to_string(), file_name.to_string());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tracks.iter().map(|(lang, file)| (lang.as_str(), file.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Split a request into languages to generate and languages to skip.
    /// Codes are compared lower-cased; blank entries are ignored.
    pub fn plan<S: AsRef<str>>(&self, requested: &[S]) -> TrackPlan {
        let mut plan = TrackPlan::default();
        let mut seen = HashSet::new();

        for language in requested.iter().map(|l| l.as_ref().trim().to_lowercase()) {
            if language.is_empty() {
                continue;
            }
            if self.contains(&language) || !seen.insert(language.clone()) {
                plan.skipped.push(language);
            } else {
                plan.generate.push(language);
            }
        }

        plan
    }
}

/// Generate a WebVTT track in `outputs_dir` for every requested language
/// the job does not have yet, registering each one in `job.tracks`.
///
/// The base language reuses the original segments and never reaches the
/// translator. Persisting the job is up to the caller, also on error:
/// tracks written before a failing write stay registered.
pub async fn generate_tracks<S: AsRef<str>>(
    job: &mut Job,
    requested: &[S],
    base_language: &str,
    translator: &dyn Translator,
    outputs_dir: &Path,
) -> Result<TrackPlan> {
    if job.segments.is_empty() {
        return Err(VideoconvError::NoSegments(job.file_id.clone()));
    }

    let plan = job.tracks.plan(requested);
    if !plan.skipped.is_empty() {
        info!("Tracks already available for {}: {}", job.file_id, plan.skipped.join(", "));
    }

    for language in &plan.generate {
        let segments: Vec<TimedSegment> = if language == base_language {
            info!("Generating {} track from the original transcript", language);
            job.segments.clone()
        } else {
            translate_segments(translator, &job.segments, language).await
        };

        let file_name = track_name(&job.file_id, language);
        write_vtt(&segments, outputs_dir.join(&file_name)).await?;
        job.tracks.register(language, &file_name);
    }

    Ok(plan)
}
