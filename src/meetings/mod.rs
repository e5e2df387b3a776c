//! Users and meetings backing the meeting assistant tools.

pub mod schedule;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ToolError, ToolResult};
use crate::storage::JsonStore;

pub use schedule::{parse_date, parse_timestamp, SuggestionRules};

pub type MeetingStore = JsonStore<MeetingData>;

/// Root of the meetings data file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeetingData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub meetings: Vec<Meeting>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub name: String,
    pub timezone: String,
    #[serde(default)]
    pub preferences: String,
    #[serde(default)]
    pub meeting_history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub meeting_id: String,
    pub date: String,
    pub duration: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub meeting_id: String,
    pub title: String,
    pub participants: Vec<i64>,
    pub start_time: String,
    /// Minutes.
    pub duration: u32,
    #[serde(default)]
    pub agenda: String,
    #[serde(default)]
    pub effectiveness_score: Option<u8>,
}

/// A meeting request as received from a caller, before validation.
#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub title: String,
    pub participants: Vec<i64>,
    pub start_time: String,
    pub duration: i64,
    pub agenda: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantRef {
    pub user_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingDetails {
    pub meeting_id: String,
    pub title: String,
    pub participants: Vec<ParticipantRef>,
    pub start_time: String,
    pub duration: u32,
    pub agenda: String,
    pub effectiveness_score: Option<u8>,
}

impl MeetingData {
    pub fn user(&self, user_id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.user_id == user_id)
    }

    fn user_mut(&mut self, user_id: i64) -> ToolResult<&mut User> {
        self.users
            .iter_mut()
            .find(|u| u.user_id == user_id)
            .ok_or_else(|| ToolError::not_found(format!("User {} not found", user_id)))
    }

    pub fn meeting(&self, meeting_id: &str) -> Option<&Meeting> {
        self.meetings.iter().find(|m| m.meeting_id == meeting_id)
    }

    /// Resolve participant ids to names, skipping ids with no profile.
    pub fn participant_refs(&self, ids: &[i64]) -> Vec<ParticipantRef> {
        ids.iter()
            .filter_map(|id| self.user(*id))
            .map(|u| ParticipantRef {
                user_id: u.user_id,
                name: u.name.clone(),
            })
            .collect()
    }

    pub fn create_user(&mut self, name: &str, timezone: &str, preferences: &str) -> ToolResult<i64> {
        if name.trim().is_empty() {
            return Err(ToolError::invalid("Name cannot be empty"));
        }
        let user_id = self.users.iter().map(|u| u.user_id).max().map_or(1, |max| max + 1);
        self.users.push(User {
            user_id,
            name: name.to_string(),
            timezone: timezone.to_string(),
            preferences: preferences.to_string(),
            meeting_history: Vec::new(),
        });
        Ok(user_id)
    }

    pub fn update_preferences(&mut self, user_id: i64, preferences: &str) -> ToolResult<()> {
        self.user_mut(user_id)?.preferences = preferences.to_string();
        Ok(())
    }

    pub fn set_effectiveness(&mut self, meeting_id: &str, score: i64) -> ToolResult<()> {
        let meeting = self
            .meetings
            .iter_mut()
            .find(|m| m.meeting_id == meeting_id)
            .ok_or_else(|| ToolError::not_found(format!("Meeting {} not found", meeting_id)))?;
        if !(1..=10).contains(&score) {
            return Err(ToolError::invalid("Effectiveness score must be between 1 and 10"));
        }
        meeting.effectiveness_score = Some(score as u8);
        Ok(())
    }

    pub fn meeting_details(&self, meeting_id: &str) -> ToolResult<MeetingDetails> {
        let meeting = self
            .meeting(meeting_id)
            .ok_or_else(|| ToolError::not_found(format!("Meeting {} not found", meeting_id)))?;
        Ok(MeetingDetails {
            meeting_id: meeting.meeting_id.clone(),
            title: meeting.title.clone(),
            participants: self.participant_refs(&meeting.participants),
            start_time: meeting.start_time.clone(),
            duration: meeting.duration,
            agenda: meeting.agenda.clone(),
            effectiveness_score: meeting.effectiveness_score,
        })
    }

    /// `M` followed by a 3-digit number, starting after the current meeting count.
    pub fn next_meeting_id(&self) -> String {
        (self.meetings.len() + 1..)
            .map(|n| format!("M{:03}", n))
            .find(|id| self.meeting(id).is_none())
            .unwrap_or_default()
    }

    /// Validate a request, reject it on any overlap, otherwise book it and
    /// record it in every participant's history.
    pub fn schedule(&mut self, request: NewMeeting) -> ToolResult<String> {
        if request.title.trim().is_empty() {
            return Err(ToolError::invalid("Title cannot be empty"));
        }
        if request.participants.is_empty() {
            return Err(ToolError::invalid("At least one participant is required"));
        }
        let invalid: Vec<i64> = request
            .participants
            .iter()
            .copied()
            .filter(|id| self.user(*id).is_none())
            .collect();
        if !invalid.is_empty() {
            return Err(ToolError::invalid(format!("Invalid participants: {:?}", invalid)));
        }
        let duration = u32::try_from(request.duration)
            .ok()
            .filter(|d| *d > 0)
            .ok_or_else(|| ToolError::invalid("Duration must be a positive number of minutes"))?;
        let start = parse_timestamp(&request.start_time).ok_or_else(|| {
            ToolError::invalid(format!("Invalid start_time '{}'", request.start_time))
        })?;

        let mut participants = request.participants.clone();
        let mut seen = std::collections::HashSet::new();
        participants.retain(|id| seen.insert(*id));

        let conflicts = self.find_conflicts(&participants, start, duration);
        if !conflicts.is_empty() {
            return Err(ToolError::Conflict(conflicts));
        }

        let meeting_id = self.next_meeting_id();
        let date = start.date().format("%Y-%m-%d").to_string();
        for id in &participants {
            self.user_mut(*id)?.meeting_history.push(HistoryEntry {
                meeting_id: meeting_id.clone(),
                date: date.clone(),
                duration,
                extra: Map::new(),
            });
        }
        self.meetings.push(Meeting {
            meeting_id: meeting_id.clone(),
            title: request.title,
            participants,
            start_time: request.start_time,
            duration,
            agenda: request.agenda,
            effectiveness_score: None,
        });
        Ok(meeting_id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Alice (1) and Bob (2) share "A" at 10:00; Alice and Carol (3) share
    /// "B" at 14:00 on 2025-10-01.
    pub(crate) fn sample() -> MeetingData {
        serde_json::from_value(serde_json::json!({
            "users": [
                {"user_id": 1, "name": "Alice", "timezone": "UTC", "preferences": "Mornings",
                 "meeting_history": [{"meeting_id": "A", "date": "2025-10-01", "duration": 60}]},
                {"user_id": 2, "name": "Bob", "timezone": "Europe/Paris", "preferences": "Afternoons",
                 "meeting_history": []},
                {"user_id": 3, "name": "Carol", "timezone": "America/New_York", "preferences": "",
                 "meeting_history": []}
            ],
            "meetings": [
                {"meeting_id": "A", "title": "Planning", "participants": [1, 2],
                 "start_time": "2025-10-01T10:00:00Z", "duration": 60, "agenda": "Roadmap",
                 "effectiveness_score": 8},
                {"meeting_id": "B", "title": "Review", "participants": [1, 3],
                 "start_time": "2025-10-01T14:00:00", "duration": 30, "agenda": "Code review",
                 "effectiveness_score": 6}
            ]
        }))
        .unwrap()
    }

    fn request(participants: Vec<i64>, start: &str, duration: i64) -> NewMeeting {
        NewMeeting {
            title: "Sync".to_string(),
            participants,
            start_time: start.to_string(),
            duration,
            agenda: "Status".to_string(),
        }
    }

    #[test]
    fn test_create_user_assigns_next_id() {
        let mut data = sample();
        assert_eq!(data.create_user("Dan", "UTC", "None").unwrap(), 4);
        assert_eq!(data.user(4).unwrap().name, "Dan");
        assert_eq!(MeetingData::default().create_user("Eve", "UTC", "").unwrap(), 1);
        assert!(data.create_user(" ", "UTC", "").is_err());
    }

    #[test]
    fn test_update_preferences() {
        let mut data = sample();
        data.update_preferences(2, "Late mornings").unwrap();
        assert_eq!(data.user(2).unwrap().preferences, "Late mornings");
        let err = data.update_preferences(99, "x").unwrap_err();
        assert_eq!(err.to_string(), "User 99 not found");
    }

    #[test]
    fn test_set_effectiveness_bounds() {
        let mut data = sample();
        data.set_effectiveness("A", 10).unwrap();
        assert_eq!(data.meeting("A").unwrap().effectiveness_score, Some(10));
        let err = data.set_effectiveness("A", 11).unwrap_err();
        assert_eq!(err.to_string(), "Effectiveness score must be between 1 and 10");
        assert!(data.set_effectiveness("A", 0).is_err());
        assert!(matches!(data.set_effectiveness("Z", 5), Err(ToolError::NotFound(_))));
    }

    #[test]
    fn test_meeting_details_resolves_names() {
        let details = sample().meeting_details("B").unwrap();
        let names: Vec<&str> = details.participants.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Carol"]);
        assert_eq!(details.effectiveness_score, Some(6));
        assert!(sample().meeting_details("nope").is_err());
    }

    #[test]
    fn test_next_meeting_id_skips_taken() {
        let mut data = sample();
        assert_eq!(data.next_meeting_id(), "M003");
        data.meetings[0].meeting_id = "M003".to_string();
        assert_eq!(data.next_meeting_id(), "M004");
    }

    #[test]
    fn test_schedule_books_and_records_history() {
        let mut data = sample();
        let id = data.schedule(request(vec![2, 3], "2025-10-02T09:00:00Z", 45)).unwrap();
        assert_eq!(id, "M003");

        let meeting = data.meeting(&id).unwrap();
        assert_eq!(meeting.duration, 45);
        assert_eq!(meeting.effectiveness_score, None);
        let history = &data.user(3).unwrap().meeting_history;
        assert_eq!(history.last().unwrap().meeting_id, "M003");
        assert_eq!(history.last().unwrap().date, "2025-10-02");
    }

    #[test]
    fn test_schedule_rejects_invalid_participants() {
        let mut data = sample();
        let err = data
            .schedule(request(vec![1, 42, 77], "2025-10-02T09:00:00", 30))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid participants: [42, 77]");
    }

    #[test]
    fn test_schedule_rejects_bad_input() {
        let mut data = sample();
        assert!(data.schedule(request(vec![], "2025-10-02T09:00:00", 30)).is_err());
        assert!(data.schedule(request(vec![1], "2025-10-02T09:00:00", 0)).is_err());
        assert!(data.schedule(request(vec![1], "2025-10-02T09:00:00", -5)).is_err());
        assert!(data.schedule(request(vec![1], "tomorrow", 30)).is_err());
        assert_eq!(data.meetings.len(), 2);
    }

    #[test]
    fn test_schedule_reports_conflicts() {
        let mut data = sample();
        let err = data
            .schedule(request(vec![1, 2], "2025-10-01T10:30:00Z", 30))
            .unwrap_err();
        let ToolError::Conflict(conflicts) = err else {
            panic!("expected conflict");
        };
        assert_eq!(conflicts.len(), 2);
        assert_eq!(conflicts[0].participant, 1);
        assert_eq!(conflicts[0].conflicting_meeting, "Planning");
        assert_eq!(conflicts[1].participant, 2);
        assert_eq!(data.meetings.len(), 2);
    }

    #[test]
    fn test_schedule_back_to_back_is_allowed() {
        let mut data = sample();
        assert!(data.schedule(request(vec![1], "2025-10-01T11:00:00Z", 30)).is_ok());
        assert!(data.schedule(request(vec![1], "2025-10-01T13:30:00Z", 30)).is_ok());
    }
}
