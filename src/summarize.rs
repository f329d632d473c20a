//! Frequency-based extractive summarizer.
//!
//! Sentences are scored by the global frequency of the content words they
//! contain and the best ones are re-emitted in their original order. The
//! tokenizer and stop-word list are tuned for Spanish, the language the
//! transcripts are summarized in before any translation happens.

use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use tracing::debug;

/// Returned when there is no text to summarize.
pub const EMPTY_SUMMARY: &str = "No se pudo generar un resumen.";

pub const DEFAULT_MAX_SENTENCES: usize = 4;

/// Tokens shorter than this never score.
const MIN_TOKEN_CHARS: usize = 3;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

// Terminal punctuation followed by whitespace. The punctuation belongs to
// the sentence on its left.
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]\s+").expect("sentence break pattern is valid"));

// Applied to lower-cased text only.
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-záéíóúñü]+").expect("word pattern is valid"));

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "de", "la", "que", "el", "en", "y", "a", "los", "las", "un", "una", "para", "con",
        "por", "del", "se", "al", "lo", "es", "como", "más", "muy", "ya", "no", "sí", "o",
        "pero", "también", "si", "esto", "esta", "este", "estos", "estas", "fue", "fueron",
        "son", "ser", "sobre", "entre", "hasta", "donde", "cuando", "porque",
    ]
    .into_iter()
    .collect()
});

/// Summarize `full_text` down to at most `max_sentences` sentences.
///
/// Text that already fits is returned whitespace-normalized but otherwise
/// untouched. Otherwise the highest scoring sentences are kept (ties go to
/// the earlier sentence) and re-joined in source order. A sentence that
/// appears several times verbatim is emitted at every position once selected.
pub fn summarize(full_text: &str, max_sentences: usize) -> String {
    let text = normalize_whitespace(full_text);
    if text.is_empty() {
        return EMPTY_SUMMARY.to_string();
    }

    let sentences = split_sentences(&text);
    if sentences.len() <= max_sentences {
        return text;
    }

    let freq = word_frequencies(&text);

    let mut scored: Vec<(usize, &str)> = sentences
        .iter()
        .map(|sentence| (score_sentence(sentence, &freq), *sentence))
        .collect();
    // sort_by is stable: equal scores keep their order of appearance
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let selected: HashSet<&str> = scored
        .iter()
        .take(max_sentences)
        .map(|(_, sentence)| *sentence)
        .collect();

    debug!(
        "Selected {} of {} sentences for summary",
        selected.len(),
        sentences.len()
    );

    sentences
        .into_iter()
        .filter(|sentence| selected.contains(sentence))
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BREAK.find_iter(text) {
        // keep the punctuation mark, drop the whitespace after it
        let end = boundary.start() + 1;
        sentences.push(&text[start..end]);
        start = boundary.end();
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }

    sentences
}

fn tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD.find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

fn is_content_word(token: &str) -> bool {
    token.chars().count() >= MIN_TOKEN_CHARS && !STOP_WORDS.contains(token)
}

fn word_frequencies(text: &str) -> HashMap<String, usize> {
    let mut freq = HashMap::new();
    for token in tokens(text).into_iter().filter(|t| is_content_word(t)) {
        *freq.entry(token).or_insert(0) += 1;
    }
    freq
}

fn score_sentence(sentence: &str, freq: &HashMap<String, usize>) -> usize {
    // stop words and short tokens are absent from `freq`, so they add nothing
    tokens(sentence)
        .iter()
        .map(|token| freq.get(token).copied().unwrap_or(0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_gets_fixed_message() {
        assert_eq!(summarize("", 4), EMPTY_SUMMARY);
        assert_eq!(summarize(" \n\t  ", 4), EMPTY_SUMMARY);
    }

    #[test]
    fn test_short_text_is_normalized_but_kept() {
        let input = "  Hola.\n\nEsto es   una prueba.  ";
        assert_eq!(summarize(input, 4), "Hola. Esto es una prueba.");
    }

    #[test]
    fn test_exactly_max_sentences_is_kept() {
        let input = "Uno. Dos. Tres. Cuatro.";
        assert_eq!(summarize(input, 4), input);
    }

    #[test]
    fn test_selects_top_sentences_in_original_order() {
        let input = "Hola. Esto es una prueba. El clima está muy lindo hoy. Vamos a caminar.";
        assert_eq!(
            summarize(input, 2),
            "El clima está muy lindo hoy. Vamos a caminar."
        );
    }

    #[test]
    fn test_output_is_chronological_not_by_score() {
        // last sentence scores highest but must stay last
        let input = "Perro corre. Gato duerme. Sol brilla. Perro gato perro gato ladran.";
        assert_eq!(summarize(input, 2), "Perro corre. Perro gato perro gato ladran.");
    }

    #[test]
    fn test_zero_scores_fall_back_to_first_sentences() {
        let input = "De la. Que el. En y. A los. Las un.";
        assert_eq!(summarize(input, 4), "De la. Que el. En y. A los.");
    }

    #[test]
    fn test_ties_prefer_earlier_sentences() {
        let input = "Rojo. Verde. Azul. Negro. Blanco.";
        assert_eq!(summarize(input, 3), "Rojo. Verde. Azul.");
    }

    #[test]
    fn test_repeated_sentence_emitted_at_each_position() {
        let input = "Gato negro. Gato negro. Perro. Sol. Luna.";
        assert_eq!(summarize(input, 1), "Gato negro. Gato negro.");
    }

    #[test]
    fn test_split_keeps_terminal_punctuation() {
        let sentences = split_sentences("¿Vienes? ¡Claro! Bueno. fin");
        assert_eq!(sentences, vec!["¿Vienes?", "¡Claro!", "Bueno.", "fin"]);
    }

    #[test]
    fn test_abbreviation_without_space_does_not_split() {
        assert_eq!(split_sentences("Pesa 3.5 kilos. Listo."), vec!["Pesa 3.5 kilos.", "Listo."]);
    }

    #[test]
    fn test_tokens_keep_accented_letters() {
        assert_eq!(tokens("Canción ÑANDÚ, pingüino!"), vec!["canción", "ñandú", "pingüino"]);
    }

    #[test]
    fn test_stop_words_and_short_tokens_do_not_count() {
        let freq = word_frequencies("el perro y la casa son de él");
        assert!(!freq.contains_key("el"));
        assert!(!freq.contains_key("son"));
        assert!(!freq.contains_key("él"));
        assert_eq!(freq.get("perro"), Some(&1));
        assert_eq!(freq.get("casa"), Some(&1));
    }

    #[test]
    fn test_summarize_is_deterministic() {
        let input = "Alfa beta. Gamma delta. Alfa gamma. Beta delta. Épsilon zeta. Alfa.";
        let first = summarize(input, 3);
        for _ in 0..10 {
            assert_eq!(summarize(input, 3), first);
        }
    }
}
