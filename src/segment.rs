use serde::{Deserialize, Serialize};

/// One unit of transcript text with its time offsets in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl TimedSegment {
    /// Build a segment from raw transcriber output. Returns `None` when the
    /// text is blank after trimming, so callers can `filter_map` over it.
    pub fn from_raw(start: f64, end: f64, text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        Some(Self {
            start,
            end: end.max(start),
            text: text.to_string(),
        })
    }

    /// Same timing, different text.
    pub fn with_text(&self, text: String) -> Self {
        Self {
            start: self.start,
            end: self.end,
            text,
        }
    }
}

/// Concatenate segment texts with single spaces, the input the summarizer expects.
pub fn full_text(segments: &[TimedSegment]) -> String {
    segments
        .iter()
        .map(|seg| seg.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
