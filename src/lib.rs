//! videoconv - Video to subtitles and spoken summaries
//!
//! Takes an uploaded video, extracts its audio with ffmpeg, transcribes it
//! with whisper, and produces SRT/WebVTT subtitle tracks in any number of
//! languages plus an extractive summary read aloud by a text-to-speech
//! backend. Every processed video is a job persisted as JSON.

pub mod cli;
pub mod config;
pub mod error;
pub mod job;
pub mod layout;
pub mod media;
pub mod segment;
pub mod speech;
pub mod store;
pub mod subtitle;
pub mod summarize;
pub mod tracks;
pub mod transcribe;
pub mod translate;
pub mod workflow;
