use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::{Result, VideoconvError};
use crate::segment::TimedSegment;

/// Caption container formats understood by video players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    Srt,
    Vtt,
}

impl SubtitleFormat {
    /// Separator between seconds and milliseconds in a cue timestamp
    fn millis_separator(self) -> char {
        match self {
            Self::Srt => ',',
            Self::Vtt => '.',
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Vtt => "vtt",
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("srt") => Ok(Self::Srt),
            Some("vtt") => Ok(Self::Vtt),
            _ => Err(VideoconvError::UnsupportedFormat(format!(
                "{} is neither .srt nor .vtt",
                path.display()
            ))),
        }
    }
}

/// Format seconds as `HH:MM:SS,mmm` (SRT) or `HH:MM:SS.mmm` (VTT).
///
/// Milliseconds are rounded; a fraction that rounds up to a full second
/// carries into the seconds field.
pub fn format_timestamp(seconds: f64, format: SubtitleFormat) -> String {
    let total_milliseconds = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_milliseconds / 3_600_000;
    let minutes = (total_milliseconds % 3_600_000) / 60_000;
    let secs = (total_milliseconds % 60_000) / 1_000;
    let millis = total_milliseconds % 1_000;

    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours,
        minutes,
        secs,
        format.millis_separator(),
        millis
    )
}

pub fn render_srt(segments: &[TimedSegment]) -> String {
    let mut srt_content = String::new();

    for (index, segment) in segments.iter().enumerate() {
        srt_content.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
            format_timestamp(segment.start, SubtitleFormat::Srt),
            format_timestamp(segment.end, SubtitleFormat::Srt),
            segment.text
        ));
    }

    srt_content
}

pub fn render_vtt(segments: &[TimedSegment]) -> String {
    let mut vtt_content = String::from("WEBVTT\n\n");

    for segment in segments {
        vtt_content.push_str(&format!(
            "{} --> {}\n{}\n\n",
            format_timestamp(segment.start, SubtitleFormat::Vtt),
            format_timestamp(segment.end, SubtitleFormat::Vtt),
            segment.text
        ));
    }

    vtt_content
}

pub fn render(segments: &[TimedSegment], format: SubtitleFormat) -> String {
    match format {
        SubtitleFormat::Srt => render_srt(segments),
        SubtitleFormat::Vtt => render_vtt(segments),
    }
}

/// Write an SRT file
pub async fn write_srt<P: AsRef<Path>>(segments: &[TimedSegment], output_path: P) -> Result<()> {
    write_subtitles(segments, output_path, SubtitleFormat::Srt).await
}

/// Write a WebVTT file
pub async fn write_vtt<P: AsRef<Path>>(segments: &[TimedSegment], output_path: P) -> Result<()> {
    write_subtitles(segments, output_path, SubtitleFormat::Vtt).await
}

pub async fn write_subtitles<P: AsRef<Path>>(
    segments: &[TimedSegment],
    output_path: P,
    format: SubtitleFormat,
) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(
        "Generating {} file with {} segments: {}",
        format.extension(),
        segments.len(),
        output_path.display()
    );

    fs::write(output_path, render(segments, format)).await?;
    Ok(())
}

/// Read an SRT or VTT file back into segments, picking the parser from the extension.
pub async fn read_subtitles<P: AsRef<Path>>(input_path: P) -> Result<Vec<TimedSegment>> {
    let input_path = input_path.as_ref();
    if !input_path.exists() {
        return Err(VideoconvError::FileNotFound(input_path.display().to_string()));
    }

    let format = SubtitleFormat::from_path(input_path)?;
    let content = fs::read_to_string(input_path).await?;

    match format {
        SubtitleFormat::Srt => parse_srt(&content),
        SubtitleFormat::Vtt => parse_vtt(&content),
    }
}

pub fn parse_srt(content: &str) -> Result<Vec<TimedSegment>> {
    parse_cues(content, SubtitleFormat::Srt)
}

pub fn parse_vtt(content: &str) -> Result<Vec<TimedSegment>> {
    let content = content.trim_start_matches('\u{feff}');
    if !content.starts_with("WEBVTT") {
        return Err(VideoconvError::UnsupportedFormat(
            "WebVTT content must start with a WEBVTT header".to_string(),
        ));
    }
    parse_cues(content, SubtitleFormat::Vtt)
}

/// Both formats are blank-line separated blocks with a `start --> end`
/// line followed by the cue text. Blocks without a timing line (the VTT
/// header, NOTE blocks) are skipped; lines before the timing line are
/// SRT indices or VTT cue identifiers.
fn parse_cues(content: &str, format: SubtitleFormat) -> Result<Vec<TimedSegment>> {
    let normalized = content.trim_start_matches('\u{feff}').replace("\r\n", "\n");
    let mut segments = Vec::new();

    for block in normalized.split("\n\n") {
        let lines: Vec<&str> = block.lines().collect();
        let Some(timing_idx) = lines.iter().position(|line| line.contains("-->")) else {
            continue;
        };

        let (start, end) = parse_timing_line(lines[timing_idx], format)?;
        let text = lines[timing_idx + 1..].join("\n");

        if let Some(segment) = TimedSegment::from_raw(start, end, &text) {
            segments.push(segment);
        }
    }

    Ok(segments)
}

fn parse_timing_line(line: &str, format: SubtitleFormat) -> Result<(f64, f64)> {
    let mut parts = line.split("-->");
    let start = parts.next().unwrap_or_default();
    // VTT allows cue settings after the end timestamp
    let end = parts
        .next()
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap_or_default();

    Ok((parse_timestamp(start, format)?, parse_timestamp(end, format)?))
}

/// Parse `HH:MM:SS,mmm` / `HH:MM:SS.mmm`. VTT also permits `MM:SS.mmm`.
pub fn parse_timestamp(value: &str, format: SubtitleFormat) -> Result<f64> {
    let value = value.trim();
    let invalid = || VideoconvError::UnsupportedFormat(format!("Invalid timestamp: '{}'", value));

    let (clock, millis) = value
        .rsplit_once(format.millis_separator())
        .ok_or_else(invalid)?;
    let millis: u64 = millis.parse().map_err(|_| invalid())?;

    let fields: Vec<u64> = clock
        .split(':')
        .map(|f| f.parse::<u64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| invalid())?;

    let (hours, minutes, secs) = match fields.as_slice() {
        [h, m, s] => (*h, *m, *s),
        [m, s] if format == SubtitleFormat::Vtt => (0, *m, *s),
        _ => return Err(invalid()),
    };

    let total_milliseconds = hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(minutes.checked_mul(60_000)?))
        .and_then(|ms| ms.checked_add(secs.checked_mul(1_000)?))
        .and_then(|ms| ms.checked_add(millis))
        .ok_or_else(invalid)?;
    Ok(total_milliseconds as f64 / 1000.0)
}
