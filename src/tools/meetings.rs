use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{check_range, Tool};
use crate::error::{ToolError, ToolResult};
use crate::meetings::schedule::{Availability, EffectivenessReport, SuggestionReport, UpcomingReport};
use crate::meetings::{parse_date, MeetingDetails, MeetingStore, NewMeeting, SuggestionRules, User};

const MAX_DAYS_AHEAD: i64 = 365;

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn default_days_ahead() -> i64 {
    7
}

fn default_duration() -> i64 {
    60
}

/// Plain acknowledgement returned by the mutating tools.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
}

impl Ack {
    fn new(message: String) -> Self {
        Self { success: true, message }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserIdInput {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct MeetingIdInput {
    pub meeting_id: String,
}

#[derive(Debug, Deserialize)]
pub struct OptionalUserInput {
    #[serde(default)]
    pub user_id: Option<i64>,
}

pub struct GetUserProfile {
    store: Arc<MeetingStore>,
}

impl GetUserProfile {
    pub fn new(store: Arc<MeetingStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetUserProfile {
    type Input = UserIdInput;
    type Output = User;

    fn name(&self) -> &str {
        "get_user_profile"
    }

    fn description(&self) -> &str {
        "Get a user profile including preferences and meeting history"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "user_id": { "type": "integer" } },
            "required": ["user_id"]
        })
    }

    async fn run(&self, input: UserIdInput) -> ToolResult<User> {
        self.store
            .read(|data| data.user(input.user_id).cloned())
            .await
            .ok_or_else(|| ToolError::not_found(format!("User {} not found", input.user_id)))
    }
}

pub struct CreateUser {
    store: Arc<MeetingStore>,
}

impl CreateUser {
    pub fn new(store: Arc<MeetingStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateUserInput {
    pub name: String,
    pub timezone: String,
    #[serde(default)]
    pub preferences: String,
}

#[derive(Debug, Serialize)]
pub struct CreateUserOutput {
    pub success: bool,
    pub user_id: i64,
    pub message: String,
}

#[async_trait]
impl Tool for CreateUser {
    type Input = CreateUserInput;
    type Output = CreateUserOutput;

    fn name(&self) -> &str {
        "create_user"
    }

    fn description(&self) -> &str {
        "Create a new user profile"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "timezone": { "type": "string", "description": "IANA name, e.g. Europe/Paris" },
                "preferences": { "type": "string" }
            },
            "required": ["name", "timezone"]
        })
    }

    async fn run(&self, input: CreateUserInput) -> ToolResult<CreateUserOutput> {
        let user_id = self
            .store
            .update(|data| data.create_user(&input.name, &input.timezone, &input.preferences))
            .await?;

        log::info!("Meetings: created user {} ({})", user_id, input.name);
        Ok(CreateUserOutput {
            success: true,
            user_id,
            message: format!("User '{}' created successfully", input.name),
        })
    }
}

pub struct UpdateUserPreferences {
    store: Arc<MeetingStore>,
}

impl UpdateUserPreferences {
    pub fn new(store: Arc<MeetingStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
pub struct PreferencesInput {
    pub user_id: i64,
    pub preferences: String,
}

#[async_trait]
impl Tool for UpdateUserPreferences {
    type Input = PreferencesInput;
    type Output = Ack;

    fn name(&self) -> &str {
        "update_user_preferences"
    }

    fn description(&self) -> &str {
        "Update a user's meeting preferences"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "user_id": { "type": "integer" },
                "preferences": { "type": "string" }
            },
            "required": ["user_id", "preferences"]
        })
    }

    async fn run(&self, input: PreferencesInput) -> ToolResult<Ack> {
        self.store
            .update(|data| data.update_preferences(input.user_id, &input.preferences))
            .await?;
        Ok(Ack::new(format!("Preferences updated for user {}", input.user_id)))
    }
}

pub struct CheckAvailability {
    store: Arc<MeetingStore>,
}

impl CheckAvailability {
    pub fn new(store: Arc<MeetingStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityInput {
    pub user_id: i64,
    pub date: String,
}

#[async_trait]
impl Tool for CheckAvailability {
    type Input = AvailabilityInput;
    type Output = Availability;

    fn name(&self) -> &str {
        "check_availability"
    }

    fn description(&self) -> &str {
        "Check a user's existing meetings on a date (YYYY-MM-DD)"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "user_id": { "type": "integer" },
                "date": { "type": "string", "format": "date" }
            },
            "required": ["user_id", "date"]
        })
    }

    async fn run(&self, input: AvailabilityInput) -> ToolResult<Availability> {
        let date = parse_date(&input.date).ok_or_else(|| {
            ToolError::invalid(format!("Invalid date '{}', expected YYYY-MM-DD", input.date))
        })?;
        Ok(self.store.read(|data| data.availability(input.user_id, date)).await)
    }
}

pub struct ScheduleMeeting {
    store: Arc<MeetingStore>,
}

impl ScheduleMeeting {
    pub fn new(store: Arc<MeetingStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScheduleInput {
    pub title: String,
    pub participants: Vec<i64>,
    pub start_time: String,
    pub duration: i64,
    #[serde(default)]
    pub agenda: String,
}

#[derive(Debug, Serialize)]
pub struct ScheduleOutput {
    pub success: bool,
    pub meeting_id: String,
    pub message: String,
}

#[async_trait]
impl Tool for ScheduleMeeting {
    type Input = ScheduleInput;
    type Output = ScheduleOutput;

    fn name(&self) -> &str {
        "schedule_meeting"
    }

    fn description(&self) -> &str {
        "Schedule a new meeting after checking every participant for conflicts"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": { "type": "string" },
                "participants": { "type": "array", "items": { "type": "integer" } },
                "start_time": { "type": "string", "description": "ISO-8601 start, e.g. 2025-10-01T10:00:00Z" },
                "duration": { "type": "integer", "description": "Minutes" },
                "agenda": { "type": "string" }
            },
            "required": ["title", "participants", "start_time", "duration"]
        })
    }

    async fn run(&self, input: ScheduleInput) -> ToolResult<ScheduleOutput> {
        let title = input.title.clone();
        let request = NewMeeting {
            title: input.title,
            participants: input.participants,
            start_time: input.start_time,
            duration: input.duration,
            agenda: input.agenda,
        };

        let meeting_id = self
            .store
            .update(|data| data.schedule(request))
            .await
            .inspect_err(|e| {
                if let ToolError::Conflict(conflicts) = e {
                    log::info!("Meetings: '{}' rejected with {} conflicts", title, conflicts.len());
                }
            })?;

        log::info!("Meetings: scheduled {} '{}'", meeting_id, title);
        Ok(ScheduleOutput {
            success: true,
            meeting_id,
            message: format!("Meeting '{}' scheduled successfully", title),
        })
    }
}

pub struct GetMeetingSuggestions {
    store: Arc<MeetingStore>,
    rules: SuggestionRules,
}

impl GetMeetingSuggestions {
    pub fn new(store: Arc<MeetingStore>, rules: SuggestionRules) -> Self {
        Self { store, rules }
    }
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsInput {
    pub participants: Vec<i64>,
    #[serde(default = "default_duration")]
    pub duration: i64,
    #[serde(default)]
    pub preferred_date: Option<String>,
}

#[async_trait]
impl Tool for GetMeetingSuggestions {
    type Input = SuggestionsInput;
    type Output = SuggestionReport;

    fn name(&self) -> &str {
        "get_meeting_suggestions"
    }

    fn description(&self) -> &str {
        "Suggest free business-hour slots for a group of participants"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "participants": { "type": "array", "items": { "type": "integer" } },
                "duration": { "type": "integer", "description": "Minutes", "default": 60 },
                "preferred_date": { "type": "string", "description": "Search starts the day after this date" }
            },
            "required": ["participants"]
        })
    }

    async fn run(&self, input: SuggestionsInput) -> ToolResult<SuggestionReport> {
        let duration = u32::try_from(input.duration)
            .map_err(|_| ToolError::invalid("Duration must be a positive number of minutes"))?;
        let now = now();
        self.store
            .read(|data| {
                data.suggest_times(
                    &input.participants,
                    duration,
                    input.preferred_date.as_deref(),
                    now,
                    &self.rules,
                )
            })
            .await
    }
}

pub struct GetMeetingDetails {
    store: Arc<MeetingStore>,
}

impl GetMeetingDetails {
    pub fn new(store: Arc<MeetingStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for GetMeetingDetails {
    type Input = MeetingIdInput;
    type Output = MeetingDetails;

    fn name(&self) -> &str {
        "get_meeting_details"
    }

    fn description(&self) -> &str {
        "Get details of a specific meeting"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "meeting_id": { "type": "string" } },
            "required": ["meeting_id"]
        })
    }

    async fn run(&self, input: MeetingIdInput) -> ToolResult<MeetingDetails> {
        self.store.read(|data| data.meeting_details(&input.meeting_id)).await
    }
}

pub struct AnalyzeMeetingEffectiveness {
    store: Arc<MeetingStore>,
}

impl AnalyzeMeetingEffectiveness {
    pub fn new(store: Arc<MeetingStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for AnalyzeMeetingEffectiveness {
    type Input = OptionalUserInput;
    type Output = EffectivenessReport;

    fn name(&self) -> &str {
        "analyze_meeting_effectiveness"
    }

    fn description(&self) -> &str {
        "Summarize meeting durations and effectiveness scores, for one user or everyone"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "user_id": { "type": "integer" } }
        })
    }

    async fn run(&self, input: OptionalUserInput) -> ToolResult<EffectivenessReport> {
        self.store.read(|data| data.analyze_effectiveness(input.user_id)).await
    }
}

pub struct UpdateMeetingEffectiveness {
    store: Arc<MeetingStore>,
}

impl UpdateMeetingEffectiveness {
    pub fn new(store: Arc<MeetingStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
pub struct EffectivenessInput {
    pub meeting_id: String,
    pub effectiveness_score: i64,
}

#[async_trait]
impl Tool for UpdateMeetingEffectiveness {
    type Input = EffectivenessInput;
    type Output = Ack;

    fn name(&self) -> &str {
        "update_meeting_effectiveness"
    }

    fn description(&self) -> &str {
        "Record a meeting's effectiveness score (1-10)"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "meeting_id": { "type": "string" },
                "effectiveness_score": { "type": "integer", "minimum": 1, "maximum": 10 }
            },
            "required": ["meeting_id", "effectiveness_score"]
        })
    }

    async fn run(&self, input: EffectivenessInput) -> ToolResult<Ack> {
        self.store
            .update(|data| data.set_effectiveness(&input.meeting_id, input.effectiveness_score))
            .await?;
        Ok(Ack::new(format!(
            "Effectiveness score updated for meeting {}",
            input.meeting_id
        )))
    }
}

pub struct ListUpcomingMeetings {
    store: Arc<MeetingStore>,
}

impl ListUpcomingMeetings {
    pub fn new(store: Arc<MeetingStore>) -> Self {
        Self { store }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpcomingInput {
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default = "default_days_ahead")]
    pub days_ahead: i64,
}

#[async_trait]
impl Tool for ListUpcomingMeetings {
    type Input = UpcomingInput;
    type Output = UpcomingReport;

    fn name(&self) -> &str {
        "list_upcoming_meetings"
    }

    fn description(&self) -> &str {
        "List meetings starting within the next few days, for one user or everyone"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "user_id": { "type": "integer" },
                "days_ahead": { "type": "integer", "minimum": 1, "maximum": MAX_DAYS_AHEAD, "default": 7 }
            }
        })
    }

    async fn run(&self, input: UpcomingInput) -> ToolResult<UpcomingReport> {
        let days = check_range(
            input.days_ahead,
            1,
            MAX_DAYS_AHEAD,
            "days_ahead must be between 1 and 365",
        )?;
        let now = now();
        Ok(self
            .store
            .read(|data| data.upcoming(input.user_id, days as u32, now))
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meetings::tests::sample;
    use crate::meetings::MeetingData;
    use crate::tools::{DynTool, ToolRegistry};
    use crate::config::MeetingsConfig;
    use chrono::Duration;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> Arc<MeetingStore> {
        Arc::new(MeetingStore::with_data(dir.path().join("meetings.json"), "data", sample()))
    }

    fn registry(store: Arc<MeetingStore>) -> ToolRegistry {
        let config = MeetingsConfig {
            data_file: store.path().display().to_string(),
            business_hours: vec![9, 10, 11, 14, 15, 16],
            search_days: 7,
            max_suggestions: 3,
        };
        ToolRegistry::meetings(store, &config)
    }

    #[tokio::test]
    async fn test_registry_lists_all_tools() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(store(&dir));
        let names: Vec<String> = registry
            .list()
            .iter()
            .map(|t| t.name.to_string())
            .collect();
        assert_eq!(names.len(), 10);
        assert!(names.contains(&"schedule_meeting".to_string()));
        assert!(names.contains(&"list_upcoming_meetings".to_string()));
    }

    #[tokio::test]
    async fn test_user_profile_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);

        let out = CreateUser::new(store.clone())
            .call(json!({"name": "Dan", "timezone": "Asia/Tokyo", "preferences": "Late"}))
            .await
            .unwrap();
        assert_eq!(out["user_id"], 4);
        assert_eq!(out["message"], "User 'Dan' created successfully");

        UpdateUserPreferences::new(store.clone())
            .call(json!({"user_id": 4, "preferences": "Early"}))
            .await
            .unwrap();

        let profile = GetUserProfile::new(store.clone()).call(json!({"user_id": 4})).await.unwrap();
        assert_eq!(profile["preferences"], "Early");
        assert_eq!(profile["meeting_history"], json!([]));

        let err = GetUserProfile::new(store).call(json!({"user_id": 40})).await.unwrap_err();
        assert_eq!(err.to_string(), "User 40 not found");
    }

    #[tokio::test]
    async fn test_schedule_persists_and_reports_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let tool = ScheduleMeeting::new(store.clone());

        let out = tool
            .call(json!({
                "title": "Retro",
                "participants": [2, 3],
                "start_time": "2025-10-03T15:00:00Z",
                "duration": 45,
                "agenda": "What went well"
            }))
            .await
            .unwrap();
        assert_eq!(out["meeting_id"], "M003");
        assert_eq!(out["message"], "Meeting 'Retro' scheduled successfully");

        let reopened = MeetingStore::open(store.path(), "data").unwrap();
        assert!(reopened.read(|d| d.meeting("M003").is_some()).await);

        let err = tool
            .call(json!({
                "title": "Clash",
                "participants": [3],
                "start_time": "2025-10-03T15:30:00Z",
                "duration": 30
            }))
            .await
            .unwrap_err();
        let payload = err.to_payload();
        assert_eq!(payload["error"], "Scheduling conflicts detected");
        assert_eq!(payload["conflicts"][0]["conflicting_meeting"], "Retro");
        assert_eq!(payload["conflicts"][0]["conflict_time"], "2025-10-03T15:00:00Z");
    }

    #[tokio::test]
    async fn test_check_availability_validates_date() {
        let dir = tempfile::tempdir().unwrap();
        let tool = CheckAvailability::new(store(&dir));

        let out = tool.call(json!({"user_id": 2, "date": "2025-10-01"})).await.unwrap();
        assert_eq!(out["available"], true);
        assert_eq!(out["existing_meetings"][0]["meeting_id"], "A");

        let err = tool.call(json!({"user_id": 2, "date": "01/10/2025"})).await.unwrap_err();
        assert!(err.to_string().starts_with("Invalid date"));
    }

    #[tokio::test]
    async fn test_suggestions_and_details() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let registry = registry(store);

        let out = registry
            .call(
                "get_meeting_suggestions",
                json!({"participants": [1, 2], "duration": 30, "preferred_date": "2025-09-30"}),
            )
            .await
            .unwrap();
        assert_eq!(out["suggestions"].as_array().unwrap().len(), 3);
        assert_eq!(out["suggestions"][0]["suggested_time"], "2025-10-01T09:00:00");

        let err = registry
            .call("get_meeting_suggestions", json!({"participants": [1], "duration": -10}))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Duration"));

        let details = registry.call("get_meeting_details", json!({"meeting_id": "A"})).await.unwrap();
        assert_eq!(details["participants"][1]["name"], "Bob");
    }

    #[tokio::test]
    async fn test_effectiveness_tools() {
        let dir = tempfile::tempdir().unwrap();
        let registry = registry(store(&dir));

        let out = registry
            .call("update_meeting_effectiveness", json!({"meeting_id": "B", "effectiveness_score": 9}))
            .await
            .unwrap();
        assert_eq!(out["success"], true);

        let err = registry
            .call("update_meeting_effectiveness", json!({"meeting_id": "B", "effectiveness_score": 0}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Effectiveness score must be between 1 and 10");

        let report = registry.call("analyze_meeting_effectiveness", json!({})).await.unwrap();
        assert_eq!(report["average_effectiveness_score"], 8.5);

        let err = registry
            .call("analyze_meeting_effectiveness", json!({"user_id": 99}))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No meetings found for analysis");
    }

    #[tokio::test]
    async fn test_upcoming_uses_current_time() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir);
        let start = (now() + Duration::days(2)).format("%Y-%m-%dT%H:%M:%S").to_string();
        store
            .update(|data: &mut MeetingData| {
                data.schedule(NewMeeting {
                    title: "Soon".to_string(),
                    participants: vec![3],
                    start_time: start.clone(),
                    duration: 30,
                    agenda: String::new(),
                })
            })
            .await
            .unwrap();

        let tool = ListUpcomingMeetings::new(store);
        let out = tool.call(json!({})).await.unwrap();
        assert_eq!(out["total_count"], 1);
        assert_eq!(out["upcoming_meetings"][0]["title"], "Soon");
        assert_eq!(out["upcoming_meetings"][0]["participants"][0]["name"], "Carol");

        let out = tool.call(json!({"user_id": 1})).await.unwrap();
        assert_eq!(out["total_count"], 0);

        let err = tool.call(json!({"days_ahead": 0})).await.unwrap_err();
        assert_eq!(err.to_string(), "days_ahead must be between 1 and 365");
    }
}
