use std::collections::HashMap;
use tracing::{info, warn};

use crate::segment::TimedSegment;
use super::Translator;

/// Translate every segment into `target_language`, keeping its timing.
///
/// Segments whose translation fails (or comes back blank) keep their
/// original text; the output always has one segment per input segment.
pub async fn translate_segments(
    translator: &dyn Translator,
    segments: &[TimedSegment],
    target_language: &str,
) -> Vec<TimedSegment> {
    info!("Translating {} segments to {}", segments.len(), target_language);

    let mut translated = Vec::with_capacity(segments.len());
    let mut failures = 0;

    for segment in segments {
        match translator.translate(&segment.text, target_language).await {
            Ok(text) if !text.trim().is_empty() => {
                translated.push(segment.with_text(text.trim().to_string()));
            }
            Ok(_) => {
                failures += 1;
                warn!("Blank translation for segment at {:.3}s, keeping original", segment.start);
                translated.push(segment.clone());
            }
            Err(e) => {
                failures += 1;
                warn!("Translation failed for segment at {:.3}s: {}", segment.start, e);
                translated.push(segment.clone());
            }
        }
    }

    if failures > 0 {
        warn!(
            "{} of {} segments left untranslated for {}",
            failures,
            segments.len(),
            target_language
        );
    }

    translated
}

/// Translate a summary into each requested language.
///
/// Blank input makes no calls and yields an empty map. A language whose
/// translation fails maps to an empty string, which callers must read as
/// "translation unavailable".
pub async fn translate_summary(
    translator: &dyn Translator,
    text: &str,
    target_languages: &[String],
) -> HashMap<String, String> {
    let mut translations = HashMap::new();
    if text.trim().is_empty() {
        return translations;
    }

    for lang in target_languages {
        let translated = match translator.translate(text, lang).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!("Summary translation to {} failed: {}", lang, e);
                String::new()
            }
        };
        translations.insert(lang.clone(), translated);
    }

    translations
}


#[cfg(test)]
mod tests {
    use super::*;
    use super::testing::RecordingTranslator;

    fn segments() -> Vec<TimedSegment> {
        vec![
            TimedSegment::from_raw(0.0, 1.25, "Hola.").unwrap(),
            TimedSegment::from_raw(1.25, 3.5, "Esto es una prueba.").unwrap(),
            TimedSegment::from_raw(3.0, 6.0, "Vamos a caminar.").unwrap(),
        ]
    }

    #[tokio::test]
    async fn test_translate_segments_preserves_timing_and_order() {
        let translator = RecordingTranslator::default();
        let input = segments();

        let output = translate_segments(&translator, &input, "en").await;

        assert_eq!(output.len(), input.len());
        for (before, after) in input.iter().zip(&output) {
            assert_eq!((before.start, before.end), (after.start, after.end));
            assert_eq!(after.text, format!("[en] {}", before.text));
        }
        assert_eq!(translator.call_count(), 3);
    }

    #[tokio::test]
    async fn test_translate_segments_falls_back_per_segment() {
        let translator = RecordingTranslator {
            fail_texts: vec!["Esto es una prueba.".to_string()],
            ..Default::default()
        };

        let output = translate_segments(&translator, &segments(), "en").await;

        assert_eq!(output[0].text, "[en] Hola.");
        assert_eq!(output[1].text, "Esto es una prueba.");
        assert_eq!(output[2].text, "[en] Vamos a caminar.");
        // the failure did not stop later segments
        assert_eq!(translator.call_count(), 3);
    }

    #[tokio::test]
    async fn test_translate_segments_all_failing_returns_originals() {
        let translator = RecordingTranslator {
            fail_languages: vec!["xx".to_string()],
            ..Default::default()
        };
        let input = segments();
        assert_eq!(translate_segments(&translator, &input, "xx").await, input);
    }

    #[tokio::test]
    async fn test_translate_summary_blank_makes_no_calls() {
        let translator = RecordingTranslator::default();
        let langs = vec!["en".to_string(), "pt".to_string()];

        assert!(translate_summary(&translator, "  \n ", &langs).await.is_empty());
        assert_eq!(translator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_translate_summary_failure_maps_to_empty_string() {
        let translator = RecordingTranslator {
            fail_languages: vec!["pt".to_string()],
            ..Default::default()
        };
        let langs = vec!["en".to_string(), "pt".to_string()];

        let out = translate_summary(&translator, "Hola.", &langs).await;

        assert_eq!(out.len(), 2);
        assert_eq!(out["en"], "[en] Hola.");
        assert_eq!(out["pt"], "");
    }
}
