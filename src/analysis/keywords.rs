use serde::Serialize;
use std::collections::HashMap;

use super::round_to;
use super::tokenize::{is_alpha, is_stopword, tokenize_words};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Keyword {
    pub keyword: String,
    pub score: f64,
    pub frequency: usize,
}

/// Lowercased alphabetic tokens longer than two characters, stopwords removed.
pub fn content_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    tokenize_words(&lowered)
        .into_iter()
        .filter(|w| is_alpha(w) && w.chars().count() > 2 && !is_stopword(w))
        .map(str::to_string)
        .collect()
}

/// Rank unigrams and bigrams of a single text by TF-IDF weight.
///
/// With one document every term has the same smoothed IDF, so the weight is
/// the raw count, L2-normalized over the `limit * 2` most frequent terms.
pub fn extract_keywords(text: &str, limit: usize) -> Vec<Keyword> {
    let words = content_words(text);
    if words.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for word in &words {
        *counts.entry(word.clone()).or_default() += 1;
    }
    for pair in words.windows(2) {
        *counts.entry(format!("{} {}", pair[0], pair[1])).or_default() += 1;
    }

    let mut terms: Vec<(String, usize)> = counts.into_iter().collect();
    terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    terms.truncate(limit * 2);

    let norm = terms
        .iter()
        .map(|(_, count)| (*count as f64).powi(2))
        .sum::<f64>()
        .sqrt();

    let unigram_counts = |term: &str| words.iter().filter(|w| w.as_str() == term).count();

    terms
        .into_iter()
        .take(limit)
        .filter(|(_, count)| *count > 0)
        .map(|(term, count)| {
            let frequency = if term.contains(' ') { 0 } else { unigram_counts(&term) };
            Keyword {
                score: round_to(count as f64 / norm, 4),
                keyword: term,
                frequency,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_words_filters() {
        let words = content_words("The AI model is an AI system, and it runs on 3 GPUs!");
        assert_eq!(words, vec!["model", "system", "runs", "gpus"]);
    }

    #[test]
    fn test_extract_keywords_ranking() {
        let text = "Rust compiler. Rust compiler errors. Rust borrow checker.";
        let keywords = extract_keywords(text, 3);

        assert_eq!(keywords.len(), 3);
        assert_eq!(keywords[0].keyword, "rust");
        assert_eq!(keywords[0].frequency, 3);
        assert_eq!(keywords[1].keyword, "compiler");
        assert_eq!(keywords[1].frequency, 2);
        assert_eq!(keywords[2].keyword, "rust compiler");
        assert_eq!(keywords[2].frequency, 0);
        assert!(keywords[0].score > keywords[1].score);
        assert_eq!(keywords[1].score, keywords[2].score);
    }

    #[test]
    fn test_scores_are_normalized() {
        let keywords = extract_keywords("alpha alpha beta", 1);
        // kept terms: alpha=2, alpha alpha=1 (limit * 2 = 2); norm = sqrt(5)
        assert_eq!(keywords.len(), 1);
        assert_eq!(keywords[0].keyword, "alpha");
        assert_eq!(keywords[0].score, 0.8944);
    }

    #[test]
    fn test_extract_keywords_empty() {
        assert!(extract_keywords("the and of it is", 10).is_empty());
        assert!(extract_keywords("", 10).is_empty());
    }
}
