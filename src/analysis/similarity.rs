use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use super::round_to;
use super::tokenize::is_stopword;

/// Tokens of two or more word characters.
static TERM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("term pattern is valid"));

const MAX_FEATURES: usize = 1000;

/// A corpus entry scored against a query.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatch {
    pub index: usize,
    pub score: f64,
}

fn analyze(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TERM_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !is_stopword(t))
        .map(str::to_string)
        .collect()
}

type SparseVector = HashMap<String, f64>;

/// Fits TF-IDF weights over a set of analyzed texts.
struct TfIdf {
    idf: HashMap<String, f64>,
}

impl TfIdf {
    fn fit(texts: &[Vec<String>]) -> Self {
        let mut total: HashMap<&str, usize> = HashMap::new();
        let mut df: HashMap<&str, usize> = HashMap::new();
        for terms in texts {
            let mut seen = HashSet::new();
            for term in terms {
                *total.entry(term).or_default() += 1;
                if seen.insert(term.as_str()) {
                    *df.entry(term).or_default() += 1;
                }
            }
        }

        let mut vocabulary: Vec<(&str, usize)> = total.into_iter().collect();
        vocabulary.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        vocabulary.truncate(MAX_FEATURES);

        let n = texts.len() as f64;
        let idf = vocabulary
            .into_iter()
            .map(|(term, _)| {
                let doc_freq = df.get(term).copied().unwrap_or(0) as f64;
                (term.to_string(), ((1.0 + n) / (1.0 + doc_freq)).ln() + 1.0)
            })
            .collect();
        Self { idf }
    }

    fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    /// L2-normalized TF-IDF vector; terms outside the vocabulary are dropped.
    fn transform(&self, terms: &[String]) -> SparseVector {
        let mut vector = SparseVector::new();
        for term in terms {
            if let Some(idf) = self.idf.get(term) {
                *vector.entry(term.clone()).or_default() += idf;
            }
        }
        let norm = vector.values().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in vector.values_mut() {
                *value /= norm;
            }
        }
        vector
    }
}

fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(term, x)| large.get(term).map(|y| x * y))
        .sum()
}

/// Rank corpus entries by cosine similarity to the query.
///
/// Returns `None` when neither the corpus nor the query has a single usable
/// term, so callers can fall back to a plain substring search. A query whose
/// own terms are all filtered out simply matches nothing.
pub fn rank_by_similarity(
    query: &str,
    corpus: &[&str],
    limit: usize,
) -> Option<Vec<SimilarityMatch>> {
    let mut texts: Vec<Vec<String>> = corpus.iter().map(|text| analyze(text)).collect();
    texts.push(analyze(query));

    let model = TfIdf::fit(&texts);
    if model.is_empty() {
        return None;
    }

    let query_vector = model.transform(&texts[texts.len() - 1]);

    let mut matches: Vec<SimilarityMatch> = texts[..texts.len() - 1]
        .iter()
        .enumerate()
        .map(|(index, terms)| SimilarityMatch {
            index,
            score: cosine(&query_vector, &model.transform(terms)),
        })
        .filter(|m| m.score > 0.0)
        .collect();

    // Stable sort keeps corpus order among equal scores
    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches.truncate(limit);
    for m in &mut matches {
        m.score = round_to(m.score, 4);
    }
    Some(matches)
}
