use serde::Serialize;

use super::round_to;
use super::tokenize::{is_alpha, split_sentences, tokenize_words};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicStats {
    pub word_count: usize,
    pub sentence_count: usize,
    pub character_count: usize,
    pub character_count_no_spaces: usize,
    pub average_words_per_sentence: f64,
    pub average_characters_per_word: f64,
}

pub fn calculate_basic_stats(text: &str) -> BasicStats {
    let sentence_count = split_sentences(text).len();
    let words: Vec<&str> = tokenize_words(text)
        .into_iter()
        .filter(|t| is_alpha(t))
        .collect();
    let word_chars: usize = words.iter().map(|w| w.chars().count()).sum();

    let average_words_per_sentence = if sentence_count > 0 {
        round_to(words.len() as f64 / sentence_count as f64, 2)
    } else {
        0.0
    };
    let average_characters_per_word = if words.is_empty() {
        0.0
    } else {
        round_to(word_chars as f64 / words.len() as f64, 2)
    };

    BasicStats {
        word_count: words.len(),
        sentence_count,
        character_count: text.chars().count(),
        character_count_no_spaces: text.chars().filter(|c| *c != ' ').count(),
        average_words_per_sentence,
        average_characters_per_word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_stats() {
        let stats = calculate_basic_stats("Hello world. This is Rust 2024!");
        assert_eq!(stats.word_count, 5);
        assert_eq!(stats.sentence_count, 2);
        assert_eq!(stats.character_count, 31);
        assert_eq!(stats.character_count_no_spaces, 26);
        assert_eq!(stats.average_words_per_sentence, 2.5);
        assert_eq!(stats.average_characters_per_word, 4.0);
    }

    #[test]
    fn test_empty_text() {
        let stats = calculate_basic_stats("");
        assert_eq!(stats.word_count, 0);
        assert_eq!(stats.sentence_count, 0);
        assert_eq!(stats.average_words_per_sentence, 0.0);
        assert_eq!(stats.average_characters_per_word, 0.0);
    }
}
