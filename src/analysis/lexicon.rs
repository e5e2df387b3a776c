//! Sentiment lexicon: `(word, polarity, subjectivity)` plus modifier words.

use std::collections::HashMap;
use std::sync::LazyLock;

pub struct Entry {
    pub polarity: f64,
    pub subjectivity: f64,
}

static LEXICON: LazyLock<HashMap<&'static str, Entry>> = LazyLock::new(|| {
    WORDS
        .iter()
        .map(|&(word, polarity, subjectivity)| (word, Entry { polarity, subjectivity }))
        .collect()
});

pub fn lookup(word: &str) -> Option<&'static Entry> {
    LEXICON.get(word)
}

/// Multiplier applied to the sentiment word that follows.
pub fn intensity(word: &str) -> Option<f64> {
    INTENSIFIERS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, factor)| *factor)
}

pub fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word)
}

const NEGATIONS: &[&str] = &["not", "n't", "never", "no", "nor", "neither", "cannot", "hardly"];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.2),
    ("too", 1.2),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("highly", 1.3),
    ("truly", 1.3),
    ("most", 1.3),
    ("quite", 1.1),
    ("pretty", 1.1),
    ("somewhat", 0.8),
    ("slightly", 0.6),
    ("barely", 0.5),
];

const WORDS: &[(&str, f64, f64)] = &[
    // positive
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("excellent", 1.0, 1.0),
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("wonderful", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("outstanding", 0.5, 0.75),
    ("superb", 1.0, 1.0),
    ("brilliant", 0.9, 1.0),
    ("perfect", 1.0, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("nice", 0.6, 1.0),
    ("happy", 0.8, 1.0),
    ("glad", 0.5, 1.0),
    ("pleased", 0.5, 1.0),
    ("delighted", 0.7, 0.8),
    ("love", 0.5, 0.6),
    ("loved", 0.7, 0.8),
    ("enjoy", 0.4, 0.5),
    ("enjoyed", 0.5, 0.6),
    ("beautiful", 0.85, 1.0),
    ("positive", 0.23, 0.55),
    ("success", 0.3, 0.4),
    ("successful", 0.75, 0.95),
    ("effective", 0.6, 0.8),
    ("efficient", 0.5, 0.7),
    ("productive", 0.5, 0.6),
    ("helpful", 0.5, 0.6),
    ("useful", 0.3, 0.0),
    ("valuable", 0.5, 0.6),
    ("innovative", 0.5, 0.7),
    ("impressive", 1.0, 1.0),
    ("remarkable", 0.75, 0.75),
    ("exciting", 0.3, 0.8),
    ("excited", 0.4, 0.75),
    ("promising", 0.4, 0.6),
    ("powerful", 0.3, 1.0),
    ("strong", 0.43, 0.73),
    ("robust", 0.4, 0.5),
    ("reliable", 0.5, 0.6),
    ("easy", 0.43, 0.83),
    ("clear", 0.1, 0.38),
    ("important", 0.4, 1.0),
    ("significant", 0.38, 0.88),
    ("interesting", 0.5, 0.5),
    ("fun", 0.3, 0.2),
    ("friendly", 0.38, 0.5),
    ("smart", 0.21, 0.64),
    ("clever", 0.5, 0.75),
    ("fast", 0.2, 0.6),
    ("improved", 0.4, 0.5),
    ("improve", 0.3, 0.4),
    ("benefit", 0.3, 0.4),
    ("beneficial", 0.5, 0.6),
    ("advantage", 0.3, 0.4),
    ("recommend", 0.4, 0.5),
    ("satisfied", 0.5, 1.0),
    ("comfortable", 0.4, 0.7),
    ("fine", 0.42, 0.5),
    ("well", 0.2, 0.3),
    ("right", 0.29, 0.54),
    ("correct", 0.3, 0.4),
    ("favorite", 0.5, 1.0),
    ("thankful", 0.5, 0.8),
    ("grateful", 0.5, 0.8),
    ("optimistic", 0.5, 0.8),
    ("hope", 0.2, 0.5),
    ("hopeful", 0.4, 0.7),
    ("incredible", 0.9, 0.9),
    ("exceptional", 0.67, 0.67),
    ("revolutionary", 0.5, 0.8),
    ("transformative", 0.4, 0.6),
    ("seamless", 0.4, 0.6),
    ("smooth", 0.4, 0.6),
    ("win", 0.8, 0.4),
    ("won", 0.5, 0.4),
    ("gain", 0.2, 0.3),
    ("growth", 0.2, 0.3),
    ("healthy", 0.5, 0.5),
    ("safe", 0.5, 0.5),
    ("secure", 0.4, 0.6),
    // negative
    ("bad", -0.7, 0.67),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("terrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("poor", -0.4, 0.6),
    ("sad", -0.5, 1.0),
    ("unhappy", -0.6, 0.9),
    ("angry", -0.5, 1.0),
    ("upset", -0.5, 0.8),
    ("hate", -0.8, 0.9),
    ("hated", -0.9, 0.7),
    ("dislike", -0.5, 0.6),
    ("disappointing", -0.6, 0.7),
    ("disappointed", -0.75, 0.75),
    ("frustrating", -0.4, 0.8),
    ("frustrated", -0.7, 0.4),
    ("annoying", -0.8, 0.9),
    ("boring", -1.0, 1.0),
    ("ugly", -0.7, 1.0),
    ("difficult", -0.5, 1.0),
    ("hard", -0.29, 0.54),
    ("problem", -0.3, 0.4),
    ("problems", -0.3, 0.4),
    ("issue", -0.2, 0.3),
    ("issues", -0.2, 0.3),
    ("fail", -0.5, 0.3),
    ("failed", -0.5, 0.3),
    ("failure", -0.32, 0.3),
    ("broken", -0.4, 0.4),
    ("slow", -0.3, 0.4),
    ("wrong", -0.5, 0.9),
    ("useless", -0.5, 0.0),
    ("waste", -0.2, 0.0),
    ("risk", -0.2, 0.4),
    ("risky", -0.4, 0.6),
    ("dangerous", -0.6, 0.9),
    ("harmful", -0.6, 0.6),
    ("negative", -0.3, 0.4),
    ("concern", -0.2, 0.3),
    ("concerns", -0.2, 0.3),
    ("concerning", -0.3, 0.5),
    ("worried", -0.4, 0.7),
    ("worry", -0.3, 0.6),
    ("fear", -0.4, 0.6),
    ("afraid", -0.6, 0.9),
    ("crisis", -0.4, 0.5),
    ("decline", -0.3, 0.3),
    ("loss", -0.3, 0.3),
    ("lost", -0.2, 0.3),
    ("weak", -0.38, 0.63),
    ("confusing", -0.3, 0.7),
    ("confused", -0.4, 0.7),
    ("expensive", -0.5, 0.7),
    ("stupid", -0.8, 1.0),
    ("painful", -0.7, 0.9),
    ("pain", -0.3, 0.5),
    ("stress", -0.3, 0.5),
    ("stressful", -0.5, 0.7),
    ("tired", -0.4, 0.7),
    ("mediocre", -0.3, 0.6),
    ("unfortunately", -0.5, 1.0),
    ("unfortunate", -0.5, 0.8),
    ("unreliable", -0.5, 0.6),
    ("inefficient", -0.4, 0.6),
    ("ineffective", -0.4, 0.6),
    ("miserable", -1.0, 1.0),
    ("disaster", -0.7, 0.7),
    ("threat", -0.3, 0.4),
    ("threats", -0.3, 0.4),
];
