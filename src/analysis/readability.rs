use serde::Serialize;

use super::round_to;
use super::tokenize::{count_syllables, split_sentences};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Readability {
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub automated_readability_index: f64,
    pub coleman_liau_index: f64,
    pub reading_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Readability {
    fn unknown(reason: &str) -> Self {
        Self {
            flesch_reading_ease: 0.0,
            flesch_kincaid_grade: 0.0,
            automated_readability_index: 0.0,
            coleman_liau_index: 0.0,
            reading_level: "Unknown".to_string(),
            error: Some(reason.to_string()),
        }
    }
}

/// Raw counts the readability formulas are built from.
struct TextCounts {
    words: f64,
    sentences: f64,
    syllables: f64,
    letters: f64,
    complex_words: f64,
}

impl TextCounts {
    fn of(text: &str) -> Option<Self> {
        let words: Vec<&str> = text
            .split_whitespace()
            .filter(|w| w.chars().any(char::is_alphanumeric))
            .collect();
        if words.is_empty() {
            return None;
        }

        let mut syllables = 0;
        let mut complex_words = 0;
        let mut letters = 0;
        for word in &words {
            let count = count_syllables(word);
            syllables += count;
            if count >= 3 {
                complex_words += 1;
            }
            letters += word.chars().filter(|c| c.is_alphanumeric()).count();
        }

        Some(Self {
            words: words.len() as f64,
            sentences: split_sentences(text).len().max(1) as f64,
            syllables: syllables as f64,
            letters: letters as f64,
            complex_words: complex_words as f64,
        })
    }

    fn words_per_sentence(&self) -> f64 {
        self.words / self.sentences
    }

    fn syllables_per_word(&self) -> f64 {
        self.syllables / self.words
    }

    fn flesch_reading_ease(&self) -> f64 {
        206.835 - 1.015 * self.words_per_sentence() - 84.6 * self.syllables_per_word()
    }

    fn flesch_kincaid_grade(&self) -> f64 {
        0.39 * self.words_per_sentence() + 11.8 * self.syllables_per_word() - 15.59
    }

    fn automated_readability_index(&self) -> f64 {
        4.71 * (self.letters / self.words) + 0.5 * self.words_per_sentence() - 21.43
    }

    fn coleman_liau_index(&self) -> f64 {
        let letters_per_100 = self.letters / self.words * 100.0;
        let sentences_per_100 = self.sentences / self.words * 100.0;
        0.058 * letters_per_100 - 0.296 * sentences_per_100 - 15.8
    }

    fn gunning_fog(&self) -> f64 {
        0.4 * (self.words_per_sentence() + 100.0 * self.complex_words / self.words)
    }
}

pub fn calculate_readability(text: &str) -> Readability {
    let Some(counts) = TextCounts::of(text) else {
        return Readability::unknown("Text contains no words");
    };

    let fre = counts.flesch_reading_ease();
    let fk = counts.flesch_kincaid_grade();
    let ari = counts.automated_readability_index();
    let cli = counts.coleman_liau_index();

    Readability {
        flesch_reading_ease: round_to(fre, 2),
        flesch_kincaid_grade: round_to(fk, 2),
        automated_readability_index: round_to(ari, 2),
        coleman_liau_index: round_to(cli, 2),
        reading_level: reading_level(&counts),
        error: None,
    }
}

/// Consensus grade: the most common grade among several formulas, each
/// contributing its rounded and ceiled value.
fn reading_level(counts: &TextCounts) -> String {
    let mut grades: Vec<i64> = Vec::new();
    let mut push_bounds = |score: f64| {
        grades.push(score.round() as i64);
        grades.push(score.ceil() as i64);
    };

    push_bounds(counts.flesch_kincaid_grade());
    push_bounds(counts.coleman_liau_index());
    push_bounds(counts.automated_readability_index());
    push_bounds(counts.gunning_fog());

    let fre = counts.flesch_reading_ease();
    match fre {
        s if s >= 90.0 => grades.push(5),
        s if s >= 80.0 => grades.push(6),
        s if s >= 70.0 => grades.push(7),
        s if s >= 60.0 => grades.extend([8, 9]),
        s if s >= 50.0 => grades.push(10),
        s if s >= 40.0 => grades.push(11),
        s if s >= 30.0 => grades.push(12),
        _ => grades.push(13),
    }

    // Most common grade; ties go to the one seen first
    let mut tally: Vec<(i64, usize)> = Vec::new();
    for grade in grades {
        match tally.iter_mut().find(|(g, _)| *g == grade) {
            Some((_, n)) => *n += 1,
            None => tally.push((grade, 1)),
        }
    }
    let mut best = tally[0];
    for entry in &tally[1..] {
        if entry.1 > best.1 {
            best = *entry;
        }
    }

    let grade = best.0.max(2);
    format!(
        "{}{} and {}{} grade",
        grade - 1,
        ordinal_suffix(grade - 1),
        grade,
        ordinal_suffix(grade)
    )
}

fn ordinal_suffix(n: i64) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
