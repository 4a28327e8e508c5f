use std::sync::OnceLock;

use regex::Regex;

use crate::models::{Chapter, Word};

/// Fixation point cap; keeps the ORP column narrow for long words.
pub const MAX_ORP_INDEX: usize = 3;

pub fn orp_index(token: &str) -> usize {
    (token.chars().count() / 2).min(MAX_ORP_INDEX)
}

/// Splits text on whitespace runs into display words.
pub fn tokenize(text: &str) -> Vec<Word> {
    text.split_whitespace()
        .map(|token| Word {
            text: token.to_string(),
            orp_index: orp_index(token),
        })
        .collect()
}

fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| {
        Regex::new(
            r"(?i)^(?:(?:chapter|cap[ií]tulo|part|parte|book|libro)\s+(?:\d+|[ivxlcdm]+)\b.*|#{1,6}\s+\S.*)$",
        )
        .expect("heading pattern is valid")
    })
}

/// Finds chapter headings and maps each to the word index of its first word.
pub fn detect_chapters(text: &str) -> Vec<Chapter> {
    let mut chapters = Vec::new();
    let mut words_before = 0;

    for line in text.lines() {
        let trimmed = line.trim();
        let line_words = trimmed.split_whitespace().count();
        if line_words > 0 && line_words <= 12 && heading_regex().is_match(trimmed) {
            let label = trimmed.trim_start_matches('#').trim().to_string();
            chapters.push(Chapter {
                label,
                start: words_before,
            });
        }
        words_before += line_words;
    }

    chapters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_quick_brown_fox() {
        let words = tokenize("the quick brown fox");
        let pairs: Vec<(&str, usize)> = words
            .iter()
            .map(|w| (w.text.as_str(), w.orp_index))
            .collect();
        assert_eq!(
            pairs,
            vec![("the", 1), ("quick", 2), ("brown", 2), ("fox", 1)]
        );
    }

    #[test]
    fn test_orp_is_capped() {
        assert_eq!(orp_index("a"), 0);
        assert_eq!(orp_index("ab"), 1);
        assert_eq!(orp_index("abcdef"), 3);
        assert_eq!(orp_index("extraordinarily"), 3);
    }

    #[test]
    fn test_orp_counts_chars_not_bytes() {
        // 4 chars, 5 bytes
        assert_eq!(orp_index("niño"), 2);
    }

    #[test]
    fn test_tokenize_collapses_whitespace() {
        let words = tokenize("  one\t\ttwo\n\n three   ");
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert!(words.iter().all(|w| !w.text.chars().any(char::is_whitespace)));
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \n\t ").is_empty());
    }

    #[test]
    fn test_orp_formula_holds_for_every_word() {
        let text = "I am a sentence with several extraordinarily lengthy words, punctuation! and 123";
        for word in tokenize(text) {
            let len = word.text.chars().count();
            assert_eq!(word.orp_index, (len / 2).min(3));
        }
    }

    #[test]
    fn test_detect_chapters() {
        let text = "Prologue text here.\n\nChapter 1\nIt was a dark night.\n\nCHAPTER II The Storm\nRain fell.\n";
        let chapters = detect_chapters(text);
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].label, "Chapter 1");
        assert_eq!(chapters[0].start, 3);
        assert_eq!(chapters[1].label, "CHAPTER II The Storm");
        // "Prologue text here." (3) + "Chapter 1" (2) + "It was a dark night." (5)
        assert_eq!(chapters[1].start, 10);

        let words = tokenize(text);
        assert_eq!(words[chapters[1].start].text, "CHAPTER");
    }

    #[test]
    fn test_detect_markdown_and_spanish_headings() {
        let text = "# Intro\nhola\nCapítulo 2\nadiós";
        let chapters = detect_chapters(text);
        let labels: Vec<&str> = chapters.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Intro", "Capítulo 2"]);
        assert_eq!(chapters[1].start, 3);
    }

    #[test]
    fn test_prose_mentioning_chapter_is_not_a_heading() {
        let text = "In the previous chapter we saw how things went.";
        assert!(detect_chapters(text).is_empty());
    }
}
