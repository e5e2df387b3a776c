//! Document collection model backing the analyzer tools.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ToolError, ToolResult};
use crate::storage::JsonStore;

pub type DocumentStore = JsonStore<DocumentCollection>;

const UNKNOWN: &str = "Unknown";
const UNCATEGORIZED: &str = "Uncategorized";

fn unknown_author() -> String {
    UNKNOWN.to_string()
}

fn uncategorized() -> String {
    UNCATEGORIZED.to_string()
}

/// Root of the documents data file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentCollection {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default = "unknown_author")]
    pub author: String,
    #[serde(default = "uncategorized")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

/// Known metadata keys; anything else in the file is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Caller-supplied fields for a new document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDocument {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

fn required(field: &str, value: &Option<String>) -> ToolResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(ToolError::invalid(format!(
            "Required field '{}' is missing or empty",
            field
        ))),
    }
}

/// One row of the document listing.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub date: String,
    pub word_count: usize,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CollectionStats {
    Empty { message: String },
    Summary(StatsSummary),
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub total_documents: usize,
    pub total_words: usize,
    pub average_words_per_document: f64,
    /// Category name to document count, most common first.
    pub categories: Map<String, Value>,
    /// Author name to document count, most prolific first.
    pub authors: Map<String, Value>,
    pub top_category: Option<String>,
    pub most_prolific_author: Option<String>,
}

/// Count occurrences keeping first-seen order, then order by count descending.
fn ranked_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(name, _)| name == value) {
            Some((_, n)) => *n += 1,
            None => counts.push((value.to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn to_map(counts: &[(String, usize)]) -> Map<String, Value> {
    counts
        .iter()
        .map(|(name, n)| (name.clone(), Value::from(*n)))
        .collect()
}

impl Document {
    pub fn word_count(&self) -> usize {
        self.metadata.word_count.unwrap_or(0)
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            author: self.author.clone(),
            category: self.category.clone(),
            date: self.date.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            word_count: self.word_count(),
            tags: self.tags.clone(),
        }
    }
}

impl DocumentCollection {
    pub fn find(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Smallest unused `doc_NNN` id.
    pub fn next_id(&self) -> String {
        (1..)
            .map(|n| format!("doc_{:03}", n))
            .find(|id| self.find(id).is_none())
            .unwrap_or_default()
    }

    /// Validate and append a new document, returning its id.
    pub fn add(&mut self, new: NewDocument, today: &str) -> ToolResult<String> {
        let title = required("title", &new.title)?;
        let content = required("content", &new.content)?;

        let id = self.next_id();
        let word_count = content.split_whitespace().count();
        self.documents.push(Document {
            id: id.clone(),
            title,
            content,
            author: new.author.unwrap_or_else(unknown_author),
            category: new.category.unwrap_or_else(uncategorized),
            date: Some(new.date.unwrap_or_else(|| today.to_string())),
            tags: new.tags.unwrap_or_default(),
            metadata: DocumentMetadata {
                source: Some(new.source.unwrap_or_else(|| "User Added".to_string())),
                word_count: Some(word_count),
                language: Some(new.language.unwrap_or_else(|| "en".to_string())),
                extra: Map::new(),
            },
        });
        Ok(id)
    }

    pub fn stats(&self) -> CollectionStats {
        if self.documents.is_empty() {
            return CollectionStats::Empty {
                message: "No documents found".to_string(),
            };
        }

        let total_documents = self.documents.len();
        let total_words: usize = self.documents.iter().map(Document::word_count).sum();
        let categories = ranked_counts(self.documents.iter().map(|d| d.category.as_str()));
        let authors = ranked_counts(self.documents.iter().map(|d| d.author.as_str()));

        CollectionStats::Summary(StatsSummary {
            total_documents,
            total_words,
            average_words_per_document: crate::analysis::round_to(
                total_words as f64 / total_documents as f64,
                2,
            ),
            top_category: categories.first().map(|(name, _)| name.clone()),
            most_prolific_author: authors.first().map(|(name, _)| name.clone()),
            categories: to_map(&categories),
            authors: to_map(&authors),
        })
    }
}
