use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process a video: subtitles, summary and summary audio
    Process {
        /// Input video file
        #[arg(short, long)]
        input: PathBuf,

        /// Spoken language of the video, or "auto" to detect it
        #[arg(short, long, default_value = "auto")]
        audio_lang: String,

        /// Language of the summary
        #[arg(short, long, default_value = "es")]
        summary_lang: String,
    },

    /// Show the workspace of a processed video
    Show {
        /// Job id printed by `process`
        job_id: String,
    },

    /// Set the spoken language of a processed video
    SetLang {
        job_id: String,

        /// Language code, or "auto"
        language: String,
    },

    /// Regenerate the summary (and its audio) in another language
    Summary {
        job_id: String,

        #[arg(short, long, default_value = "es")]
        lang: String,
    },

    /// Generate subtitle tracks for more languages
    Tracks {
        job_id: String,

        /// Target languages (comma-separated)
        langs: String,
    },

    /// List processed videos
    Jobs,

    /// Check that ffmpeg is available
    Check,

    /// Extract audio from video file
    Extract {
        /// Input video file
        #[arg(short, long)]
        input: PathBuf,

        /// Output audio file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Transcribe audio to an SRT or VTT file
    Transcribe {
        /// Input audio file
        #[arg(short, long)]
        input: PathBuf,

        /// Output subtitle file
        #[arg(short, long)]
        output: PathBuf,

        /// Source language hint
        #[arg(short, long)]
        language: Option<String>,
    },

    /// Summarize a text file
    Summarize {
        /// Input text file
        #[arg(short, long)]
        input: PathBuf,

        /// Number of sentences to keep
        #[arg(short, long)]
        max_sentences: Option<usize>,
    },

    /// Translate an SRT or VTT file
    Translate {
        /// Input subtitle file
        #[arg(short, long)]
        input: PathBuf,

        /// Output subtitle file
        #[arg(short, long)]
        output: PathBuf,

        /// Target language
        #[arg(short, long)]
        target_lang: String,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write the default configuration
    Init {
        #[arg(short, long, default_value = "config.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Split a comma separated language list, dropping blanks
pub fn parse_languages(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
