use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Result, VideoconvError};
use crate::job::{AUTO_LANGUAGE, Job};
use crate::layout::{self, DataLayout, format_size};
use crate::media::{MediaProcessorFactory, MediaProcessorTrait};
use crate::segment::{TimedSegment, full_text};
use crate::speech::{SpeechFactory, SpeechSynthesizer, synthesize_with_fallback};
use crate::store::{FileJobStore, JobStore};
use crate::subtitle::{SubtitleFormat, read_subtitles, write_srt, write_subtitles, write_vtt};
use crate::summarize::{EMPTY_SUMMARY, summarize};
use crate::tracks::{self, TrackPlan};
use crate::transcribe::{TranscriberFactory, TranscriberTrait};
use crate::translate::{Translator, TranslatorFactory, translate_segments, translate_summary};

/// External collaborators of a workflow
pub struct Collaborators {
    pub media: Box<dyn MediaProcessorTrait>,
    pub transcriber: Box<dyn TranscriberTrait>,
    pub translator: Box<dyn Translator>,
    pub speech_primary: Box<dyn SpeechSynthesizer>,
    pub speech_fallback: Box<dyn SpeechSynthesizer>,
    pub store: Box<dyn JobStore>,
}

impl Collaborators {
    /// Build every collaborator from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let layout = DataLayout::new(&config.storage.data_dir);

        Ok(Self {
            media: MediaProcessorFactory::create_processor(config.media.clone()),
            transcriber: TranscriberFactory::create_transcriber(config.transcriber.clone()),
            translator: TranslatorFactory::create_translator(config.translate.clone())?,
            speech_primary: SpeechFactory::create_primary(config.speech.clone())?,
            speech_fallback: SpeechFactory::create_fallback(config.speech.clone()),
            store: Box::new(FileJobStore::new(layout.temp_dir())),
        })
    }
}

pub struct Workflow {
    config: Config,
    layout: DataLayout,
    media: Box<dyn MediaProcessorTrait>,
    transcriber: Box<dyn TranscriberTrait>,
    translator: Box<dyn Translator>,
    speech_primary: Box<dyn SpeechSynthesizer>,
    speech_fallback: Box<dyn SpeechSynthesizer>,
    store: Box<dyn JobStore>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let collaborators = Collaborators::from_config(&config)?;
        Ok(Self::with_collaborators(config, collaborators))
    }

    pub fn with_collaborators(config: Config, collaborators: Collaborators) -> Self {
        let layout = DataLayout::new(&config.storage.data_dir);

        Self {
            config,
            layout,
            media: collaborators.media,
            transcriber: collaborators.transcriber,
            translator: collaborators.translator,
            speech_primary: collaborators.speech_primary,
            speech_fallback: collaborators.speech_fallback,
            store: collaborators.store,
        }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// Run the whole pipeline for a new video and persist the resulting job.
    ///
    /// Failures up to and including subtitle generation abort the job and
    /// nothing is persisted. Summary translation and speech synthesis
    /// degrade instead of failing.
    pub async fn process_upload<P: AsRef<Path>>(
        &self,
        source_path: P,
        audio_language: &str,
        summary_language: &str,
    ) -> Result<Job> {
        let source_path = source_path.as_ref();
        if !source_path.exists() {
            return Err(VideoconvError::FileNotFound(source_path.display().to_string()));
        }

        self.layout.ensure().await?;

        let job_id = Job::generate_id();
        let video_name = layout::video_name(&job_id, source_path);
        let video_path = self.layout.videos_dir().join(&video_name);
        info!("Processing {} as job {}", source_path.display(), job_id);

        fs::copy(source_path, &video_path).await?;
        let video_size = fs::metadata(&video_path).await?.len();

        let mut job = Job::new(job_id.clone(), video_name, video_size);
        job.used_language = normalize_language_choice(audio_language);
        job.summary_lang = normalize_summary_language(summary_language, &self.config);

        // Step 1: waveform next to the stored video
        let audio_path = video_path.with_extension("wav");
        self.media.extract_audio(&video_path, &audio_path).await?;

        // Step 2: transcription, with the user's language as a hint
        let hint = (job.used_language != AUTO_LANGUAGE).then_some(job.used_language.as_str());
        let transcript = self.transcriber.transcribe(&audio_path, hint).await?;
        info!("Transcription produced {} segments", transcript.segments.len());
        job.segments = transcript.segments;
        job.detected_lang = transcript.language;

        // Step 3: base subtitles, so the player has a track right away
        let outputs_dir = self.layout.outputs_dir();
        let srt_name = layout::base_srt_name(&job_id);
        write_srt(&job.segments, outputs_dir.join(&srt_name)).await?;
        job.srt_base = Some(srt_name);

        let base_language = job.base_language(&self.config.transcriber.fallback_language);
        let vtt_name = layout::track_name(&job_id, &base_language);
        write_vtt(&job.segments, outputs_dir.join(&vtt_name)).await?;
        job.tracks.register(&base_language, &vtt_name);

        // Step 4: summary, its audio and its text file
        self.refresh_summary(&mut job).await?;

        self.store.save(&job).await?;
        info!("Job {} completed", job_id);
        Ok(job)
    }

    /// Change the audio language used for future base-language decisions
    pub async fn set_language(&self, job_id: &str, language: &str) -> Result<Job> {
        let _guard = self.store.lock(job_id).await;
        let mut job = self.store.load(job_id).await?;

        job.used_language = normalize_language_choice(language);
        info!("Job {} audio language set to {}", job_id, job.used_language);

        self.store.save(&job).await?;
        Ok(job)
    }

    /// Recompute the summary from the stored transcript in `language`
    pub async fn regenerate_summary(&self, job_id: &str, language: &str) -> Result<Job> {
        let _guard = self.store.lock(job_id).await;
        let mut job = self.store.load(job_id).await?;

        self.layout.ensure().await?;
        job.summary_lang = normalize_summary_language(language, &self.config);
        self.refresh_summary(&mut job).await?;

        self.store.save(&job).await?;
        Ok(job)
    }

    /// Generate subtitle tracks for every requested language the job lacks
    pub async fn generate_tracks<S: AsRef<str>>(
        &self,
        job_id: &str,
        languages: &[S],
    ) -> Result<(Job, TrackPlan)> {
        let _guard = self.store.lock(job_id).await;
        let mut job = self.store.load(job_id).await?;

        self.layout.ensure().await?;
        let base_language = job.base_language(&self.config.transcriber.fallback_language);
        let registered_before = job.tracks.len();
        let result = tracks::generate_tracks(
            &mut job,
            languages,
            &base_language,
            self.translator.as_ref(),
            &self.layout.outputs_dir(),
        )
        .await;

        // tracks written before a failure are kept
        if job.tracks.len() > registered_before {
            self.store.save(&job).await?;
        }
        let plan = result?;
        Ok((job, plan))
    }

    pub async fn workspace(&self, job_id: &str) -> Result<WorkspaceView> {
        let job = self.store.load(job_id).await?;
        let fallback = &self.config.transcriber.fallback_language;

        let video_path = self.layout.videos_dir().join(&job.video_name);
        let video_size = match fs::metadata(&video_path).await {
            Ok(metadata) => metadata.len(),
            Err(_) => job.video_size,
        };

        let outputs_dir = self.layout.outputs_dir();
        let preferred = job.preferred_track(fallback).map(|(lang, _)| lang);
        let tracks = job
            .tracks
            .iter()
            .map(|(language, file)| TrackView {
                language: language.to_string(),
                path: outputs_dir.join(file),
                preferred: preferred.as_deref() == Some(language),
            })
            .collect();

        Ok(WorkspaceView {
            job_id: job.file_id.clone(),
            video_path,
            size_human: format_size(video_size),
            detected_language: job.detected_lang.clone().unwrap_or_else(|| AUTO_LANGUAGE.to_string()),
            used_language: job.used_language.clone(),
            base_language: job.base_language(fallback),
            summary: job.summary.clone(),
            summary_language: job.summary_lang.clone(),
            summary_audio: job.summary_audio.as_ref().map(|name| self.layout.audio_dir().join(name)),
            srt_path: job.srt_base.as_ref().map(|name| outputs_dir.join(name)),
            summary_text_path: job.summary_txt.as_ref().map(|name| outputs_dir.join(name)),
            segment_count: job.segments.len(),
            tracks,
        })
    }

    pub async fn list_jobs(&self) -> Result<Vec<String>> {
        self.store.list().await
    }

    /// Report the media tool version, failing when it is missing
    pub async fn check_media(&self) -> Result<String> {
        self.media.check_availability().await?;
        self.media.get_version_info().await
    }

    /// Extract audio from a video file
    pub async fn extract_audio<P: AsRef<Path>>(&self, video_path: P, audio_path: P) -> Result<()> {
        let video_path = video_path.as_ref();
        if !video_path.exists() {
            return Err(VideoconvError::FileNotFound(video_path.display().to_string()));
        }
        self.media.extract_audio(video_path, audio_path.as_ref()).await
    }

    /// Transcribe an audio file into a subtitle file (format from the extension)
    pub async fn transcribe_audio<P: AsRef<Path>>(
        &self,
        audio_path: P,
        output_path: P,
        language: Option<&str>,
    ) -> Result<Vec<TimedSegment>> {
        let output_path = output_path.as_ref();
        let format = SubtitleFormat::from_path(output_path)?;

        let transcript = self.transcriber.transcribe(audio_path.as_ref(), language).await?;
        write_subtitles(&transcript.segments, output_path, format).await?;
        Ok(transcript.segments)
    }

    /// Translate an existing SRT/VTT file, writing the format of `output_path`
    pub async fn translate_subtitles<P: AsRef<Path>>(
        &self,
        input_path: P,
        output_path: P,
        target_language: &str,
    ) -> Result<Vec<TimedSegment>> {
        let output_path = output_path.as_ref();
        let format = SubtitleFormat::from_path(output_path)?;

        let segments = read_subtitles(input_path).await?;
        let translated = translate_segments(self.translator.as_ref(), &segments, target_language).await;
        write_subtitles(&translated, output_path, format).await?;
        Ok(translated)
    }

    /// Summary text, summary audio and summary text file for the job's
    /// current transcript and summary language
    async fn refresh_summary(&self, job: &mut Job) -> Result<()> {
        job.summary = self.build_summary(&job.segments, &job.summary_lang).await;

        self.layout.ensure().await?;
        let stem = self
            .layout
            .audio_dir()
            .join(layout::summary_audio_stem(&job.file_id, &job.summary_lang));
        let outcome = synthesize_with_fallback(
            self.speech_primary.as_ref(),
            self.speech_fallback.as_ref(),
            &job.summary,
            &stem,
            &job.summary_lang,
        )
        .await;
        job.summary_audio = outcome.file_name();

        let txt_name = layout::summary_text_name(&job.file_id);
        fs::write(self.layout.outputs_dir().join(&txt_name), &job.summary).await?;
        job.summary_txt = Some(txt_name);

        Ok(())
    }

    async fn build_summary(&self, segments: &[TimedSegment], language: &str) -> String {
        let text = full_text(segments);
        if text.trim().is_empty() {
            return EMPTY_SUMMARY.to_string();
        }

        let summary = summarize(&text, self.config.summary.max_sentences);
        if language == self.config.summary.source_language {
            return summary;
        }

        let targets = [language.to_string()];
        let translations = translate_summary(self.translator.as_ref(), &summary, &targets).await;
        match translations.get(language) {
            Some(translated) if !translated.trim().is_empty() => translated.clone(),
            _ => {
                warn!("Summary translation to {} unavailable, keeping original", language);
                summary
            }
        }
    }
}

fn normalize_language_choice(language: &str) -> String {
    let language = language.trim();
    if language.is_empty() {
        AUTO_LANGUAGE.to_string()
    } else {
        language.to_lowercase()
    }
}

fn normalize_summary_language(language: &str, config: &Config) -> String {
    let language = language.trim();
    if language.is_empty() {
        config.summary.source_language.clone()
    } else {
        language.to_lowercase()
    }
}

/// Everything the workspace screen shows for one job
#[derive(Debug, Clone)]
pub struct WorkspaceView {
    pub job_id: String,
    pub video_path: PathBuf,
    pub size_human: String,
    pub detected_language: String,
    pub used_language: String,
    pub base_language: String,
    pub summary: String,
    pub summary_language: String,
    pub summary_audio: Option<PathBuf>,
    pub srt_path: Option<PathBuf>,
    pub summary_text_path: Option<PathBuf>,
    pub segment_count: usize,
    pub tracks: Vec<TrackView>,
}

#[derive(Debug, Clone)]
pub struct TrackView {
    pub language: String,
    pub path: PathBuf,
    pub preferred: bool,
}

impl fmt::Display for WorkspaceView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Job:              {}", self.job_id)?;
        writeln!(f, "Video:            {} ({})", self.video_path.display(), self.size_human)?;
        writeln!(f, "Detected language: {}", self.detected_language)?;
        writeln!(f, "Audio language:   {} (base track: {})", self.used_language, self.base_language)?;
        writeln!(f, "Segments:         {}", self.segment_count)?;
        if let Some(srt) = &self.srt_path {
            writeln!(f, "SRT:              {}", srt.display())?;
        }
        if let Some(txt) = &self.summary_text_path {
            writeln!(f, "Summary file:     {}", txt.display())?;
        }
        match &self.summary_audio {
            Some(audio) => writeln!(f, "Summary audio:    {}", audio.display())?,
            None => writeln!(f, "Summary audio:    unavailable")?,
        }
        writeln!(f, "\nTracks:")?;
        for track in &self.tracks {
            let marker = if track.preferred { " (default)" } else { "" };
            writeln!(f, "  {:<6} {}{}", track.language, track.path.display(), marker)?;
        }
        writeln!(f, "\nSummary [{}]:", self.summary_language)?;
        write!(f, "{}", self.summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::speech::testing::FakeSpeech;
    use crate::transcribe::Transcript;
    use crate::translate::batch::testing::RecordingTranslator;

    /// Writes a placeholder waveform, or fails like a missing ffmpeg
    struct FakeMedia {
        missing: bool,
    }

    #[async_trait]
    impl MediaProcessorTrait for FakeMedia {
        async fn extract_audio(&self, _video_path: &Path, audio_path: &Path) -> Result<()> {
            if self.missing {
                return Err(VideoconvError::MediaToolMissing("ffmpeg".to_string()));
            }
            fs::write(audio_path, b"RIFF").await?;
            Ok(())
        }

        async fn check_availability(&self) -> Result<()> {
            Ok(())
        }

        async fn get_version_info(&self) -> Result<String> {
            Ok("ffmpeg version test".to_string())
        }
    }

    struct FakeTranscriber {
        transcript: Transcript,
        hints: Mutex<Vec<Option<String>>>,
    }

    #[async_trait]
    impl TranscriberTrait for FakeTranscriber {
        async fn transcribe(&self, audio_path: &Path, language: Option<&str>) -> Result<Transcript> {
            assert!(audio_path.exists(), "audio must be extracted before transcription");
            self.hints.lock().unwrap().push(language.map(str::to_string));
            Ok(self.transcript.clone())
        }
    }

    /// Shares its call log with the test through an `Arc`
    struct SharedTranslator(std::sync::Arc<RecordingTranslator>);

    #[async_trait]
    impl Translator for SharedTranslator {
        async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
            self.0.translate(text, target_language).await
        }
    }

    struct Harness {
        _dir: tempfile::TempDir,
        source: PathBuf,
        workflow: Workflow,
        translator: std::sync::Arc<RecordingTranslator>,
    }

    fn spanish_transcript() -> Transcript {
        let texts = [
            "Hola.",
            "Esto es una prueba.",
            "El clima está muy lindo hoy.",
            "Vamos a caminar.",
            "Después volvemos a casa.",
        ];
        let segments = texts
            .iter()
            .enumerate()
            .map(|(i, text)| TimedSegment::from_raw(i as f64 * 2.0, i as f64 * 2.0 + 1.5, text).unwrap())
            .collect();
        Transcript { language: Some("es".to_string()), segments }
    }

    fn harness(transcript: Transcript, media_missing: bool, speech_fails: bool) -> Harness {
        harness_with_translator(transcript, media_missing, speech_fails, RecordingTranslator::default())
    }

    fn harness_with_translator(
        transcript: Transcript,
        media_missing: bool,
        speech_fails: bool,
        translator: RecordingTranslator,
    ) -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Clase.MP4");
        std::fs::write(&source, vec![0u8; 2048]).unwrap();

        let mut config = Config::default();
        config.storage.data_dir = dir.path().join("data");
        let layout = DataLayout::new(&config.storage.data_dir);

        let translator = std::sync::Arc::new(translator);
        let collaborators = Collaborators {
            media: Box::new(FakeMedia { missing: media_missing }),
            transcriber: Box::new(FakeTranscriber { transcript, hints: Mutex::new(Vec::new()) }),
            translator: Box::new(SharedTranslator(translator.clone())),
            speech_primary: Box::new(FakeSpeech::new("primary", "mp3", speech_fails)),
            speech_fallback: Box::new(FakeSpeech::new("fallback", "wav", speech_fails)),
            store: Box::new(FileJobStore::new(layout.temp_dir())),
        };

        Harness {
            _dir: dir,
            source,
            workflow: Workflow::with_collaborators(config, collaborators),
            translator,
        }
    }

    #[tokio::test]
    async fn test_process_upload_produces_all_artifacts() {
        let h = harness(spanish_transcript(), false, false);

        let job = h.workflow.process_upload(&h.source, "auto", "es").await.unwrap();
        let layout = h.workflow.layout();
        let outputs = layout.outputs_dir();

        assert_eq!(job.video_name, format!("video_{}.mp4", job.file_id));
        assert_eq!(job.video_size, 2048);
        assert!(layout.videos_dir().join(format!("video_{}.wav", job.file_id)).exists());
        assert_eq!(job.segments.len(), 5);
        assert_eq!(job.detected_lang.as_deref(), Some("es"));
        assert!(outputs.join(format!("subs_{}_base.srt", job.file_id)).exists());
        assert_eq!(job.tracks.get("es"), Some(format!("subs_{}_es.vtt", job.file_id).as_str()));
        assert_eq!(job.summary_audio, Some(format!("summary_{}_es.mp3", job.file_id)));

        let summary_file = std::fs::read_to_string(outputs.join(format!("summary_{}.txt", job.file_id))).unwrap();
        assert_eq!(summary_file, job.summary);
        assert_eq!(h.translator.call_count(), 0);

        let stored = h.workflow.workspace(&job.file_id).await.unwrap();
        assert_eq!(stored.segment_count, 5);
        assert!(stored.tracks.iter().any(|t| t.language == "es" && t.preferred));
    }

    #[tokio::test]
    async fn test_silent_video_gets_fixed_summary_without_translation() {
        let h = harness(Transcript::default(), false, false);

        let job = h.workflow.process_upload(&h.source, "auto", "en").await.unwrap();

        assert!(job.segments.is_empty());
        assert_eq!(job.summary, EMPTY_SUMMARY);
        assert_eq!(h.translator.call_count(), 0);
        // no detection and no user choice: fixed default language
        assert!(job.tracks.contains("es"));
        let vtt = std::fs::read_to_string(
            h.workflow.layout().outputs_dir().join(format!("subs_{}_es.vtt", job.file_id)),
        )
        .unwrap();
        assert_eq!(vtt, "WEBVTT\n\n");
    }

    #[tokio::test]
    async fn test_missing_media_tool_aborts_without_state() {
        let h = harness(spanish_transcript(), true, false);

        let result = h.workflow.process_upload(&h.source, "auto", "es").await;

        assert!(matches!(result, Err(VideoconvError::MediaToolMissing(_))));
        assert!(h.workflow.list_jobs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summary_in_other_language_is_translated() {
        let h = harness(spanish_transcript(), false, false);

        let job = h.workflow.process_upload(&h.source, "es", "en").await.unwrap();

        assert!(job.summary.starts_with("[en] "));
        assert_eq!(job.summary_lang, "en");
        assert_eq!(h.translator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_summary_translation_keeps_original_summary() {
        let translator = RecordingTranslator {
            fail_languages: vec!["en".to_string()],
            ..Default::default()
        };
        let h = harness_with_translator(spanish_transcript(), false, false, translator);

        let job = h.workflow.process_upload(&h.source, "es", "en").await.unwrap();

        let expected = summarize(&full_text(&spanish_transcript().segments), 4);
        assert_eq!(job.summary, expected);
        assert_eq!(job.summary_lang, "en");
        assert_eq!(h.translator.call_count(), 1);
        assert_eq!(job.summary_audio, Some(format!("summary_{}_en.mp3", job.file_id)));
    }

    #[tokio::test]
    async fn test_speech_failure_leaves_audio_absent() {
        let h = harness(spanish_transcript(), false, true);

        let job = h.workflow.process_upload(&h.source, "auto", "es").await.unwrap();

        assert!(job.summary_audio.is_none());
        let view = h.workflow.workspace(&job.file_id).await.unwrap();
        assert!(view.summary_audio.is_none());
    }

    #[tokio::test]
    async fn test_generate_tracks_is_idempotent_and_skips_base() {
        let h = harness(spanish_transcript(), false, false);
        let job = h.workflow.process_upload(&h.source, "auto", "es").await.unwrap();

        let (_, plan) = h.workflow.generate_tracks(&job.file_id, &["es", "en", "en"]).await.unwrap();
        assert_eq!(plan.generate, vec!["en"]);
        assert_eq!(plan.skipped, vec!["es", "en"]);
        assert_eq!(h.translator.call_count(), 5);

        let (again, plan) = h.workflow.generate_tracks(&job.file_id, &["en"]).await.unwrap();
        assert!(plan.generate.is_empty());
        assert_eq!(again.tracks.len(), 2);
        assert_eq!(h.translator.call_count(), 5);
    }

    #[tokio::test]
    async fn test_tracks_written_before_a_failure_are_persisted() {
        let h = harness(spanish_transcript(), false, false);
        let job = h.workflow.process_upload(&h.source, "auto", "es").await.unwrap();
        let blocked = h.workflow.layout().outputs_dir().join(format!("subs_{}_pt.vtt", job.file_id));
        std::fs::create_dir(&blocked).unwrap();

        let result = h.workflow.generate_tracks(&job.file_id, &["en", "pt"]).await;
        assert!(result.is_err());

        let view = h.workflow.workspace(&job.file_id).await.unwrap();
        let languages: Vec<_> = view.tracks.iter().map(|t| t.language.as_str()).collect();
        assert_eq!(languages, vec!["en", "es"]);
    }

    #[tokio::test]
    async fn test_track_request_is_case_insensitive() {
        let h = harness(spanish_transcript(), false, false);
        let job = h.workflow.process_upload(&h.source, "auto", "es").await.unwrap();

        let (updated, plan) = h.workflow.generate_tracks(&job.file_id, &["ES", "EN"]).await.unwrap();

        assert_eq!(plan.generate, vec!["en"]);
        assert_eq!(plan.skipped, vec!["es"]);
        assert_eq!(updated.tracks.len(), 2);
        assert!(!updated.tracks.contains("ES"));
        assert_eq!(h.translator.call_count(), 5);
    }

    #[tokio::test]
    async fn test_set_language_changes_base_track_source() {
        let h = harness(spanish_transcript(), false, false);
        let job = h.workflow.process_upload(&h.source, "auto", "es").await.unwrap();

        let updated = h.workflow.set_language(&job.file_id, "pt").await.unwrap();
        assert_eq!(updated.used_language, "pt");

        // "pt" is now the base language, so no translation happens
        h.workflow.generate_tracks(&job.file_id, &["pt"]).await.unwrap();
        assert_eq!(h.translator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_regenerate_summary_in_new_language() {
        let h = harness(spanish_transcript(), false, false);
        let job = h.workflow.process_upload(&h.source, "auto", "es").await.unwrap();

        let updated = h.workflow.regenerate_summary(&job.file_id, "fr").await.unwrap();

        assert_eq!(updated.summary_lang, "fr");
        assert!(updated.summary.starts_with("[fr] "));
        assert_eq!(updated.summary_audio, Some(format!("summary_{}_fr.mp3", job.file_id)));
        let reloaded = h.workflow.workspace(&job.file_id).await.unwrap();
        assert_eq!(reloaded.summary, updated.summary);
    }

    #[tokio::test]
    async fn test_unknown_job_is_not_found() {
        let h = harness(spanish_transcript(), false, false);

        assert!(matches!(h.workflow.workspace("deadbeef").await, Err(VideoconvError::JobNotFound(_))));
        assert!(matches!(
            h.workflow.generate_tracks("deadbeef", &["en"]).await,
            Err(VideoconvError::JobNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_translate_subtitles_file() {
        let h = harness(spanish_transcript(), false, false);
        let dir = h.workflow.layout().root().to_path_buf();
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("in.srt");
        std::fs::write(&input, "1\n00:00:01,000 --> 00:00:02,000\nHola.\n\n").unwrap();
        let output = dir.join("out.vtt");

        h.workflow.translate_subtitles(&input, &output, "en").await.unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        assert_eq!(content, "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\n[en] Hola.\n\n");
    }
}
