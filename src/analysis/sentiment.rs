use serde::Serialize;

use super::lexicon;
use super::round_to;
use super::tokenize::{is_stopword, tokenize_words};

const LABEL_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sentiment {
    pub sentiment: SentimentLabel,
    pub polarity: f64,
    pub subjectivity: f64,
    pub confidence: f64,
}

/// Score text against the sentiment lexicon.
///
/// Every lexicon hit contributes one assessment. An intensifier directly in
/// front scales both polarity and subjectivity; a negation flips and damps
/// polarity (`* -0.5`). Stopwords between a modifier and its target keep the
/// modifier pending; any other word clears it.
pub fn calculate_sentiment(text: &str) -> Sentiment {
    let lowered = text.to_lowercase();
    let mut assessments: Vec<(f64, f64)> = Vec::new();
    let mut negated = false;
    let mut intensity = 1.0;

    for token in tokenize_words(&lowered) {
        if lexicon::is_negation(token) {
            negated = true;
            continue;
        }
        if let Some(factor) = lexicon::intensity(token) {
            intensity *= factor;
            continue;
        }
        if let Some(entry) = lexicon::lookup(token) {
            let mut polarity = (entry.polarity * intensity).clamp(-1.0, 1.0);
            let subjectivity = (entry.subjectivity * intensity).clamp(0.0, 1.0);
            if negated {
                polarity *= -0.5;
            }
            assessments.push((polarity, subjectivity));
            negated = false;
            intensity = 1.0;
            continue;
        }
        if !is_stopword(token) {
            negated = false;
            intensity = 1.0;
        }
    }

    let (polarity, subjectivity) = if assessments.is_empty() {
        (0.0, 0.0)
    } else {
        let n = assessments.len() as f64;
        let p: f64 = assessments.iter().map(|(p, _)| p).sum();
        let s: f64 = assessments.iter().map(|(_, s)| s).sum();
        ((p / n).clamp(-1.0, 1.0), (s / n).clamp(0.0, 1.0))
    };

    let sentiment = if polarity > LABEL_THRESHOLD {
        SentimentLabel::Positive
    } else if polarity < -LABEL_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    Sentiment {
        sentiment,
        polarity: round_to(polarity, 3),
        subjectivity: round_to(subjectivity, 3),
        confidence: round_to(polarity.abs(), 3),
    }
}
