//! videoconv - transcripts, subtitle tracks and spoken summaries for videos
//!
//! Command line entry point: one subcommand per workspace operation plus
//! standalone tool commands.

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use videoconv::cli::{Args, Commands, ConfigAction, parse_languages};
use videoconv::config::Config;
use videoconv::error::VideoconvError;
use videoconv::layout::DataLayout;
use videoconv::summarize::summarize;
use videoconv::workflow::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new("config.toml").exists() {
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };

    setup_logging(args.verbose, &DataLayout::new(&config.storage.data_dir).log_dir())?;
    info!("Starting videoconv");

    if let Err(e) = run(args.command, config).await {
        error!("{}", e);
        eprintln!("Processing failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Config { action } => match action {
            ConfigAction::Init { path, force } => {
                if path.exists() && !force {
                    return Err(VideoconvError::Config(format!(
                        "{} already exists, use --force to overwrite",
                        path.display()
                    ))
                    .into());
                }
                Config::default().save_to_file(&path)?;
                println!("Wrote default configuration to {}", path.display());
            }
        },
        Commands::Summarize { input, max_sentences } => {
            let text = tokio::fs::read_to_string(&input).await?;
            let max_sentences = max_sentences.unwrap_or(config.summary.max_sentences);
            println!("{}", summarize(&text, max_sentences));
        }
        command => {
            let workflow = Workflow::new(config)?;
            run_workflow(&workflow, command).await?;
        }
    }

    Ok(())
}

async fn run_workflow(workflow: &Workflow, command: Commands) -> Result<()> {
    match command {
        Commands::Process { input, audio_lang, summary_lang } => {
            info!("Processing video file: {}", input.display());

            let spinner = spinner(format!("Processing {}", input.display()));
            let result = workflow.process_upload(&input, &audio_lang, &summary_lang).await;
            spinner.finish_and_clear();

            let job = result?;
            println!("Job {} ready\n", job.file_id);
            println!("{}", workflow.workspace(&job.file_id).await?);
        }
        Commands::Show { job_id } => {
            println!("{}", workflow.workspace(&job_id).await?);
        }
        Commands::SetLang { job_id, language } => {
            let job = workflow.set_language(&job_id, &language).await?;
            println!("Audio language of {} set to {}", job.file_id, job.used_language);
        }
        Commands::Summary { job_id, lang } => {
            let spinner = spinner(format!("Summarizing {} in {}", job_id, lang));
            let result = workflow.regenerate_summary(&job_id, &lang).await;
            spinner.finish_and_clear();

            let job = result?;
            println!("{}", job.summary);
            if job.summary_audio.is_none() {
                println!("(summary audio unavailable)");
            }
        }
        Commands::Tracks { job_id, langs } => {
            let languages = parse_languages(&langs);
            let spinner = spinner(format!("Generating tracks for {}", job_id));
            let result = workflow.generate_tracks(&job_id, &languages).await;
            spinner.finish_and_clear();

            let (job, plan) = result?;
            for language in &plan.generate {
                println!("Generated {}", job.tracks.get(language).unwrap_or(language));
            }
            if !plan.skipped.is_empty() {
                println!("Already available: {}", plan.skipped.join(", "));
            }
        }
        Commands::Jobs => {
            let ids = workflow.list_jobs().await?;
            if ids.is_empty() {
                println!("No processed videos found.");
            }
            for id in ids {
                println!("{}", id);
            }
        }
        Commands::Check => {
            println!("{}", workflow.check_media().await?);
        }
        Commands::Extract { input, output } => {
            info!("Extracting audio from: {}", input.display());
            workflow.extract_audio(&input, &output).await?;
            println!("Audio written to {}", output.display());
        }
        Commands::Transcribe { input, output, language } => {
            info!("Transcribing audio file: {}", input.display());
            let spinner = spinner(format!("Transcribing {}", input.display()));
            let result = workflow.transcribe_audio(&input, &output, language.as_deref()).await;
            spinner.finish_and_clear();

            let segments = result?;
            println!("{} segments written to {}", segments.len(), output.display());
        }
        Commands::Translate { input, output, target_lang } => {
            info!("Translating subtitles: {}", input.display());
            let segments = workflow.translate_subtitles(&input, &output, &target_lang).await?;
            println!("{} segments written to {}", segments.len(), output.display());
        }
        Commands::Summarize { .. } | Commands::Config { .. } => {}
    }

    Ok(())
}

fn spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool, log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(log_dir, "videoconv.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}", log_level, log_dir.join("videoconv.log").display());

    Ok(())
}
