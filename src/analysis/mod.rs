//! Text analysis primitives used by the document tools.
//!
//! Everything here is pure and synchronous: tokenization, lexicon sentiment,
//! TF-IDF keywords and search, readability formulas and basic statistics.

pub mod keywords;
mod lexicon;
pub mod readability;
pub mod sentiment;
pub mod similarity;
pub mod stats;
pub mod tokenize;

pub use keywords::{extract_keywords, Keyword};
pub use readability::{calculate_readability, Readability};
pub use sentiment::{calculate_sentiment, Sentiment};
pub use similarity::{rank_by_similarity, SimilarityMatch};
pub use stats::{calculate_basic_stats, BasicStats};

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
