pub mod documents;
pub mod meetings;

use async_trait::async_trait;
use rmcp::model::{JsonObject, Tool as ToolDescriptor};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::config::{DocumentsConfig, MeetingsConfig};
use crate::documents::DocumentStore;
use crate::error::{ToolError, ToolResult};
use crate::meetings::{MeetingStore, SuggestionRules};

/// A named operation taking structured arguments.
///
/// Implementations work on typed input and output; the registry reaches them
/// through [`DynTool`], which handles the JSON on either side.
#[async_trait]
pub trait Tool: Send + Sync {
    type Input: DeserializeOwned + Send;
    type Output: Serialize + Send;

    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// JSON schema of the arguments object.
    fn input_schema(&self) -> Value;

    async fn run(&self, input: Self::Input) -> ToolResult<Self::Output>;
}

/// Object-safe view of a [`Tool`] speaking raw JSON.
#[async_trait]
pub trait DynTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> Value;
    async fn call(&self, arguments: Value) -> ToolResult<Value>;
}

#[async_trait]
impl<T: Tool> DynTool for T {
    fn name(&self) -> &str {
        Tool::name(self)
    }

    fn description(&self) -> &str {
        Tool::description(self)
    }

    fn input_schema(&self) -> Value {
        Tool::input_schema(self)
    }

    async fn call(&self, arguments: Value) -> ToolResult<Value> {
        let arguments = if arguments.is_null() { json!({}) } else { arguments };
        let input: T::Input = serde_json::from_value(arguments).map_err(|e| {
            ToolError::invalid(format!("Invalid arguments for '{}': {}", Tool::name(self), e))
        })?;

        let output = self.run(input).await?;
        serde_json::to_value(output).map_err(|e| ToolError::Internal(e.to_string()))
    }
}

/// The tool set of one service, in registration order.
pub struct ToolRegistry {
    tools: Vec<Box<dyn DynTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.tools.push(Box::new(tool));
    }

    pub fn documents(store: Arc<DocumentStore>, config: &DocumentsConfig) -> Self {
        use documents::*;

        let mut registry = Self::new();
        registry.register(AnalyzeDocument::new(store.clone()));
        registry.register(GetSentiment);
        registry.register(ExtractKeywords::new(config.max_limit));
        registry.register(AddDocument::new(store.clone()));
        registry.register(SearchDocuments::new(store.clone(), config.max_limit));
        registry.register(GetDocumentList::new(store.clone()));
        registry.register(GetDocumentStats::new(store));
        registry.register(AnalyzeTextBatch::new(config.max_batch_size));
        registry
    }

    pub fn meetings(store: Arc<MeetingStore>, config: &MeetingsConfig) -> Self {
        use meetings::*;

        let rules = SuggestionRules {
            business_hours: config.business_hours.clone(),
            search_days: config.search_days,
            max_suggestions: config.max_suggestions,
        };

        let mut registry = Self::new();
        registry.register(GetUserProfile::new(store.clone()));
        registry.register(CreateUser::new(store.clone()));
        registry.register(UpdateUserPreferences::new(store.clone()));
        registry.register(CheckAvailability::new(store.clone()));
        registry.register(ScheduleMeeting::new(store.clone()));
        registry.register(GetMeetingSuggestions::new(store.clone(), rules));
        registry.register(GetMeetingDetails::new(store.clone()));
        registry.register(AnalyzeMeetingEffectiveness::new(store.clone()));
        registry.register(UpdateMeetingEffectiveness::new(store.clone()));
        registry.register(ListUpcomingMeetings::new(store));
        registry
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Descriptors as `tools/list` returns them.
    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.tools
            .iter()
            .map(|tool| {
                let schema = match tool.input_schema() {
                    Value::Object(map) => map,
                    _ => JsonObject::new(),
                };
                ToolDescriptor::new(
                    tool.name().to_string(),
                    tool.description().to_string(),
                    Arc::new(schema),
                )
            })
            .collect()
    }

    pub async fn call(&self, name: &str, arguments: Value) -> ToolResult<Value> {
        let tool = self
            .tools
            .iter()
            .find(|tool| tool.name() == name)
            .ok_or_else(|| ToolError::not_found(format!("Unknown tool: {}", name)))?;

        log::debug!("Tools: calling {}", name);
        tool.call(arguments).await
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Accept a bounded integer argument or report the allowed range.
pub(crate) fn check_range(value: i64, min: i64, max: i64, message: &str) -> ToolResult<i64> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ToolError::invalid(message))
    }
}
