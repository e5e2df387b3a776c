use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{check_range, Tool};
use crate::analysis::{
    calculate_basic_stats, calculate_readability, calculate_sentiment, extract_keywords,
    rank_by_similarity, BasicStats, Keyword, Readability, Sentiment,
};
use crate::documents::{
    CollectionStats, Document, DocumentMetadata, DocumentStore, DocumentSummary, NewDocument,
};
use crate::error::{ToolError, ToolResult};

const DOCUMENT_KEYWORDS: usize = 10;
const BATCH_KEYWORDS: usize = 5;
const ANALYSIS_TYPES: [&str; 5] = ["sentiment", "keywords", "readability", "stats", "all"];

fn default_limit() -> i64 {
    10
}

fn non_empty(text: &str, message: &str) -> ToolResult<()> {
    if text.trim().is_empty() {
        Err(ToolError::invalid(message))
    } else {
        Ok(())
    }
}

fn limit_error(max: usize) -> String {
    format!("Limit must be between 1 and {}", max)
}

pub struct AnalyzeDocument {
    store: Arc<DocumentStore>,
}

impl AnalyzeDocument {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
pub struct DocumentIdInput {
    pub document_id: String,
}

#[derive(Debug, Serialize)]
pub struct TextAnalysis {
    pub sentiment: Sentiment,
    pub keywords: Vec<Keyword>,
    pub readability: Readability,
    pub basic_stats: BasicStats,
}

#[derive(Debug, Serialize)]
pub struct DocumentAnalysis {
    pub document_id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub analysis: TextAnalysis,
    pub metadata: DocumentMetadata,
}

#[async_trait]
impl Tool for AnalyzeDocument {
    type Input = DocumentIdInput;
    type Output = DocumentAnalysis;

    fn name(&self) -> &str {
        "analyze_document"
    }

    fn description(&self) -> &str {
        "Perform comprehensive analysis of a document by ID: sentiment, keywords, readability and basic statistics"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "document_id": { "type": "string", "description": "The ID of the document to analyze" }
            },
            "required": ["document_id"]
        })
    }

    async fn run(&self, input: DocumentIdInput) -> ToolResult<DocumentAnalysis> {
        let doc = self
            .store
            .read(|data| data.find(&input.document_id).cloned())
            .await
            .ok_or_else(|| {
                ToolError::not_found(format!("Document with ID '{}' not found", input.document_id))
            })?;

        log::info!("Documents: analyzing {}", doc.id);
        let content = &doc.content;
        Ok(DocumentAnalysis {
            analysis: TextAnalysis {
                sentiment: calculate_sentiment(content),
                keywords: extract_keywords(content, DOCUMENT_KEYWORDS),
                readability: calculate_readability(content),
                basic_stats: calculate_basic_stats(content),
            },
            document_id: input.document_id,
            title: doc.title,
            author: doc.author,
            category: doc.category,
            metadata: doc.metadata,
        })
    }
}

pub struct GetSentiment;

#[derive(Debug, Deserialize)]
pub struct TextInput {
    pub text: String,
}

#[async_trait]
impl Tool for GetSentiment {
    type Input = TextInput;
    type Output = Sentiment;

    fn name(&self) -> &str {
        "get_sentiment"
    }

    fn description(&self) -> &str {
        "Analyze the sentiment of any text"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "Text to analyze" }
            },
            "required": ["text"]
        })
    }

    async fn run(&self, input: TextInput) -> ToolResult<Sentiment> {
        non_empty(&input.text, "Text cannot be empty")?;
        Ok(calculate_sentiment(&input.text))
    }
}

pub struct ExtractKeywords {
    max_limit: usize,
}

impl ExtractKeywords {
    pub fn new(max_limit: usize) -> Self {
        Self { max_limit }
    }
}

#[derive(Debug, Deserialize)]
pub struct KeywordsInput {
    pub text: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct KeywordsOutput {
    pub keywords: Vec<Keyword>,
    pub total_found: usize,
    pub limit_applied: i64,
}

#[async_trait]
impl Tool for ExtractKeywords {
    type Input = KeywordsInput;
    type Output = KeywordsOutput;

    fn name(&self) -> &str {
        "extract_keywords"
    }

    fn description(&self) -> &str {
        "Extract keywords from text using TF-IDF weighting"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "Text to extract keywords from" },
                "limit": { "type": "integer", "minimum": 1, "maximum": self.max_limit, "default": 10 }
            },
            "required": ["text"]
        })
    }

    async fn run(&self, input: KeywordsInput) -> ToolResult<KeywordsOutput> {
        non_empty(&input.text, "Text cannot be empty")?;
        let limit = check_range(input.limit, 1, self.max_limit as i64, &limit_error(self.max_limit))?;

        let keywords = extract_keywords(&input.text, limit as usize);
        Ok(KeywordsOutput {
            total_found: keywords.len(),
            keywords,
            limit_applied: limit,
        })
    }
}

pub struct AddDocument {
    store: Arc<DocumentStore>,
}

impl AddDocument {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
pub struct AddDocumentInput {
    pub document_data: NewDocument,
}

#[derive(Debug, Serialize)]
pub struct AddDocumentOutput {
    pub success: bool,
    pub message: String,
    pub document_id: String,
}

#[async_trait]
impl Tool for AddDocument {
    type Input = AddDocumentInput;
    type Output = AddDocumentOutput;

    fn name(&self) -> &str {
        "add_document"
    }

    fn description(&self) -> &str {
        "Add a new document to the collection"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "document_data": {
                    "type": "object",
                    "description": "Document fields; title and content are required",
                    "properties": {
                        "title": { "type": "string" },
                        "content": { "type": "string" },
                        "author": { "type": "string" },
                        "category": { "type": "string" },
                        "date": { "type": "string" },
                        "tags": { "type": "array", "items": { "type": "string" } },
                        "source": { "type": "string" },
                        "language": { "type": "string" }
                    },
                    "required": ["title", "content"]
                }
            },
            "required": ["document_data"]
        })
    }

    async fn run(&self, input: AddDocumentInput) -> ToolResult<AddDocumentOutput> {
        let today = chrono::Local::now().format("%Y-%m-%d").to_string();
        let document_id = self
            .store
            .update(|data| data.add(input.document_data, &today))
            .await?;

        log::info!("Documents: added {}", document_id);
        Ok(AddDocumentOutput {
            success: true,
            message: format!("Document added successfully with ID: {}", document_id),
            document_id,
        })
    }
}

pub struct SearchDocuments {
    store: Arc<DocumentStore>,
    max_limit: usize,
}

impl SearchDocuments {
    pub fn new(store: Arc<DocumentStore>, max_limit: usize) -> Self {
        Self { store, max_limit }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchInput {
    pub query: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub document: Document,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub total_found: usize,
    pub limit_applied: i64,
}

/// Rank by TF-IDF similarity, or fall back to substring matching on content
/// and title when neither the documents nor the query has a usable term.
fn search(documents: &[Document], query: &str, limit: usize) -> Vec<SearchHit> {
    if documents.is_empty() {
        return Vec::new();
    }

    let corpus: Vec<&str> = documents.iter().map(|d| d.content.as_str()).collect();
    match rank_by_similarity(query, &corpus, limit) {
        Some(matches) => matches
            .into_iter()
            .map(|m| SearchHit {
                document: documents[m.index].clone(),
                similarity_score: Some(m.score),
            })
            .collect(),
        None => {
            log::debug!("Documents: empty vocabulary for '{}', using substring match", query);
            let needle = query.to_lowercase();
            documents
                .iter()
                .filter(|d| {
                    d.content.to_lowercase().contains(&needle)
                        || d.title.to_lowercase().contains(&needle)
                })
                .take(limit)
                .map(|d| SearchHit {
                    document: d.clone(),
                    similarity_score: None,
                })
                .collect()
        }
    }
}

#[async_trait]
impl Tool for SearchDocuments {
    type Input = SearchInput;
    type Output = SearchOutput;

    fn name(&self) -> &str {
        "search_documents"
    }

    fn description(&self) -> &str {
        "Search documents by content similarity"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Search query" },
                "limit": { "type": "integer", "minimum": 1, "maximum": self.max_limit, "default": 10 }
            },
            "required": ["query"]
        })
    }

    async fn run(&self, input: SearchInput) -> ToolResult<SearchOutput> {
        non_empty(&input.query, "Search query cannot be empty")?;
        let limit = check_range(input.limit, 1, self.max_limit as i64, &limit_error(self.max_limit))?;

        let results = self
            .store
            .read(|data| search(&data.documents, &input.query, limit as usize))
            .await;

        log::debug!("Documents: '{}' matched {} documents", input.query, results.len());
        Ok(SearchOutput {
            query: input.query,
            total_found: results.len(),
            results,
            limit_applied: limit,
        })
    }
}

pub struct GetDocumentList {
    store: Arc<DocumentStore>,
}

impl GetDocumentList {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NoInput {}

#[derive(Debug, Serialize)]
pub struct DocumentListOutput {
    pub documents: Vec<DocumentSummary>,
    pub total_count: usize,
}

#[async_trait]
impl Tool for GetDocumentList {
    type Input = NoInput;
    type Output = DocumentListOutput;

    fn name(&self) -> &str {
        "get_document_list"
    }

    fn description(&self) -> &str {
        "List all available documents with basic information"
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn run(&self, _input: NoInput) -> ToolResult<DocumentListOutput> {
        let documents: Vec<DocumentSummary> = self
            .store
            .read(|data| data.documents.iter().map(Document::summary).collect())
            .await;

        Ok(DocumentListOutput {
            total_count: documents.len(),
            documents,
        })
    }
}

pub struct GetDocumentStats {
    store: Arc<DocumentStore>,
}

impl GetDocumentStats {
    pub fn new(store: Arc<DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetDocumentStats {
    type Input = NoInput;
    type Output = CollectionStats;

    fn name(&self) -> &str {
        "get_document_stats"
    }

    fn description(&self) -> &str {
        "Get overall statistics about the document collection"
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn run(&self, _input: NoInput) -> ToolResult<CollectionStats> {
        Ok(self.store.read(|data| data.stats()).await)
    }
}

pub struct AnalyzeTextBatch {
    max_batch_size: usize,
}

impl AnalyzeTextBatch {
    pub fn new(max_batch_size: usize) -> Self {
        Self { max_batch_size }
    }
}

fn default_analysis_type() -> String {
    "all".to_string()
}

#[derive(Debug, Deserialize)]
pub struct BatchInput {
    pub texts: Vec<String>,
    #[serde(default = "default_analysis_type")]
    pub analysis_type: String,
}

#[derive(Debug, Default, Serialize)]
pub struct BatchEntry {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<Keyword>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readability: Option<Readability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_stats: Option<BasicStats>,
}

#[derive(Debug, Serialize)]
pub struct BatchOutput {
    pub analysis_type: String,
    pub total_texts: usize,
    pub results: Vec<BatchEntry>,
}

fn analyze_entry(index: usize, text: &str, analysis_type: &str) -> BatchEntry {
    if text.trim().is_empty() {
        return BatchEntry {
            index,
            error: Some("Empty text".to_string()),
            ..Default::default()
        };
    }

    let wants = |kind: &str| analysis_type == kind || analysis_type == "all";
    BatchEntry {
        index,
        error: None,
        sentiment: wants("sentiment").then(|| calculate_sentiment(text)),
        keywords: wants("keywords").then(|| extract_keywords(text, BATCH_KEYWORDS)),
        readability: wants("readability").then(|| calculate_readability(text)),
        basic_stats: wants("stats").then(|| calculate_basic_stats(text)),
    }
}

#[async_trait]
impl Tool for AnalyzeTextBatch {
    type Input = BatchInput;
    type Output = BatchOutput;

    fn name(&self) -> &str {
        "analyze_text_batch"
    }

    fn description(&self) -> &str {
        "Analyze multiple texts in one call"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "texts": { "type": "array", "items": { "type": "string" }, "maxItems": self.max_batch_size },
                "analysis_type": { "type": "string", "enum": ANALYSIS_TYPES, "default": "all" }
            },
            "required": ["texts"]
        })
    }

    async fn run(&self, input: BatchInput) -> ToolResult<BatchOutput> {
        if input.texts.is_empty() {
            return Err(ToolError::invalid("No texts provided"));
        }
        if input.texts.len() > self.max_batch_size {
            return Err(ToolError::invalid(format!(
                "Maximum {} texts allowed per batch",
                self.max_batch_size
            )));
        }
        if !ANALYSIS_TYPES.contains(&input.analysis_type.as_str()) {
            return Err(ToolError::invalid(format!(
                "Invalid analysis type. Must be one of: {}",
                ANALYSIS_TYPES.join(", ")
            )));
        }

        log::debug!("Documents: batch of {} texts ({})", input.texts.len(), input.analysis_type);
        let results = input
            .texts
            .iter()
            .enumerate()
            .map(|(index, text)| analyze_entry(index, text, &input.analysis_type))
            .collect();

        Ok(BatchOutput {
            total_texts: input.texts.len(),
            analysis_type: input.analysis_type,
            results,
        })
    }
}
