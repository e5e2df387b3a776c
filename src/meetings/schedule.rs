//! Interval arithmetic over the meeting list: availability, conflict
//! detection, slot suggestion, effectiveness and upcoming-meeting reports.
//!
//! All times are naive UTC. Timestamps carrying an offset are converted to
//! UTC; timestamps without one are taken as UTC already.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use super::{MeetingData, ParticipantRef};
use crate::analysis::round_to;
use crate::error::{ConflictDetail, ToolError, ToolResult};

const SUGGESTION_CONFIDENCE: f64 = 0.8;
const SUGGESTION_REASON: &str = "No conflicts found, matches general business hours";

const LOW_EFFECTIVENESS: f64 = 7.0;
const LONG_MEETING_MINUTES: f64 = 60.0;
const HIGH_MEETING_COUNT: usize = 15;

/// Parse an ISO-8601 timestamp, with or without offset, into naive UTC.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M:%S%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(value, format) {
            return Some(dt.naive_utc());
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    None
}

/// Parse `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// A date alone or a full timestamp; a bare date means midnight.
fn parse_date_or_timestamp(value: &str) -> Option<NaiveDateTime> {
    parse_timestamp(value).or_else(|| parse_date(value).map(|d| d.and_time(NaiveTime::MIN)))
}

/// Half-open overlap test: `[a, a + a_minutes)` against `[b, b + b_minutes)`.
pub fn overlaps(a_start: NaiveDateTime, a_minutes: u32, b_start: NaiveDateTime, b_minutes: u32) -> bool {
    let a_end = a_start + Duration::minutes(i64::from(a_minutes));
    let b_end = b_start + Duration::minutes(i64::from(b_minutes));
    a_start < b_end && a_end > b_start
}

/// Knobs for slot suggestion.
#[derive(Debug, Clone)]
pub struct SuggestionRules {
    pub business_hours: Vec<u32>,
    pub search_days: u32,
    pub max_suggestions: usize,
}

impl Default for SuggestionRules {
    fn default() -> Self {
        Self {
            business_hours: vec![9, 10, 11, 14, 15, 16],
            search_days: 7,
            max_suggestions: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingSlot {
    pub meeting_id: String,
    pub title: String,
    pub start_time: String,
    pub duration: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Availability {
    Unknown {
        available: bool,
        reason: String,
    },
    Known {
        available: bool,
        timezone: String,
        preferences: String,
        existing_meetings: Vec<MeetingSlot>,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct Suggestion {
    pub suggested_time: String,
    pub confidence: f64,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantInfo {
    pub user_id: i64,
    pub name: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SuggestionReport {
    pub suggestions: Vec<Suggestion>,
    pub participants: Vec<ParticipantInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeetingScore {
    pub meeting_id: String,
    pub title: String,
    pub duration: u32,
    pub effectiveness_score: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectivenessReport {
    pub total_meetings: usize,
    pub total_duration_minutes: u64,
    pub average_duration_minutes: f64,
    pub average_effectiveness_score: f64,
    pub insights: Vec<String>,
    pub meeting_breakdown: Vec<MeetingScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingMeeting {
    pub meeting_id: String,
    pub title: String,
    pub start_time: String,
    pub duration: u32,
    pub participants: Vec<ParticipantRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingReport {
    pub upcoming_meetings: Vec<UpcomingMeeting>,
    pub total_count: usize,
}

impl MeetingData {
    /// Meetings of one participant with their parsed start, skipping (and
    /// logging) entries whose start time cannot be read.
    fn timed_meetings_of(&self, user_id: i64) -> impl Iterator<Item = (NaiveDateTime, &super::Meeting)> {
        self.meetings
            .iter()
            .filter(move |m| m.participants.contains(&user_id))
            .filter_map(|m| match parse_timestamp(&m.start_time) {
                Some(start) => Some((start, m)),
                None => {
                    log::warn!(
                        "Meetings: skipping {} with unreadable start_time '{}'",
                        m.meeting_id,
                        m.start_time
                    );
                    None
                }
            })
    }

    pub fn availability(&self, user_id: i64, date: NaiveDate) -> Availability {
        let Some(user) = self.user(user_id) else {
            return Availability::Unknown {
                available: false,
                reason: "User not found".to_string(),
            };
        };

        let mut on_date: Vec<(NaiveDateTime, MeetingSlot)> = self
            .timed_meetings_of(user_id)
            .filter(|(start, _)| start.date() == date)
            .map(|(start, m)| {
                (
                    start,
                    MeetingSlot {
                        meeting_id: m.meeting_id.clone(),
                        title: m.title.clone(),
                        start_time: m.start_time.clone(),
                        duration: m.duration,
                    },
                )
            })
            .collect();
        on_date.sort_by_key(|(start, _)| *start);

        Availability::Known {
            available: true,
            timezone: user.timezone.clone(),
            preferences: user.preferences.clone(),
            existing_meetings: on_date.into_iter().map(|(_, slot)| slot).collect(),
        }
    }

    /// Every (participant, meeting) pair overlapping the proposed slot.
    pub fn find_conflicts(&self, participants: &[i64], start: NaiveDateTime, duration: u32) -> Vec<ConflictDetail> {
        let mut conflicts = Vec::new();
        for &participant in participants {
            for (existing_start, meeting) in self.timed_meetings_of(participant) {
                if overlaps(start, duration, existing_start, meeting.duration) {
                    conflicts.push(ConflictDetail {
                        participant,
                        conflicting_meeting: meeting.title.clone(),
                        conflict_time: meeting.start_time.clone(),
                    });
                }
            }
        }
        conflicts
    }

    fn is_free(&self, participants: &[i64], start: NaiveDateTime, duration: u32) -> bool {
        participants.iter().all(|&participant| {
            self.timed_meetings_of(participant)
                .all(|(existing, m)| !overlaps(start, duration, existing, m.duration))
        })
    }

    /// Walk the business-hour grid over the days after the base date and keep
    /// the first slots no participant is busy in.
    pub fn suggest_times(
        &self,
        participants: &[i64],
        duration: u32,
        preferred_date: Option<&str>,
        now: NaiveDateTime,
        rules: &SuggestionRules,
    ) -> ToolResult<SuggestionReport> {
        let known: Vec<i64> = participants
            .iter()
            .copied()
            .filter(|id| self.user(*id).is_some())
            .collect();
        if known.is_empty() {
            return Err(ToolError::invalid("No valid participants found"));
        }
        if duration == 0 {
            return Err(ToolError::invalid("Duration must be a positive number of minutes"));
        }

        let base = match preferred_date {
            Some(value) => parse_date_or_timestamp(value).ok_or_else(|| {
                ToolError::invalid(format!("Invalid preferred_date '{}'", value))
            })?,
            None => now,
        };

        let mut suggestions = Vec::new();
        'days: for days_ahead in 1..=i64::from(rules.search_days) {
            let day = base.date() + Duration::days(days_ahead);
            for &hour in &rules.business_hours {
                if suggestions.len() >= rules.max_suggestions {
                    break 'days;
                }
                let Some(time) = NaiveTime::from_hms_opt(hour, 0, 0) else {
                    continue;
                };
                let slot = day.and_time(time);
                if self.is_free(&known, slot, duration) {
                    suggestions.push(Suggestion {
                        suggested_time: slot.format("%Y-%m-%dT%H:%M:%S").to_string(),
                        confidence: SUGGESTION_CONFIDENCE,
                        reason: SUGGESTION_REASON.to_string(),
                    });
                }
            }
        }
        suggestions.truncate(rules.max_suggestions);

        let participants = known
            .iter()
            .filter_map(|id| self.user(*id))
            .map(|u| ParticipantInfo {
                user_id: u.user_id,
                name: u.name.clone(),
                timezone: u.timezone.clone(),
            })
            .collect();

        Ok(SuggestionReport {
            suggestions,
            participants,
        })
    }

    pub fn analyze_effectiveness(&self, user_id: Option<i64>) -> ToolResult<EffectivenessReport> {
        let meetings: Vec<&super::Meeting> = self
            .meetings
            .iter()
            .filter(|m| user_id.map_or(true, |id| m.participants.contains(&id)))
            .collect();
        if meetings.is_empty() {
            return Err(ToolError::not_found("No meetings found for analysis"));
        }

        let total_meetings = meetings.len();
        let total_duration: u64 = meetings.iter().map(|m| u64::from(m.duration)).sum();
        let average_duration = total_duration as f64 / total_meetings as f64;

        let scores: Vec<f64> = meetings
            .iter()
            .filter_map(|m| m.effectiveness_score)
            .map(f64::from)
            .collect();
        let average_effectiveness = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };

        let mut insights = Vec::new();
        // An unscored history averages 0 and counts as below average
        if average_effectiveness < LOW_EFFECTIVENESS {
            insights.push(
                "Meeting effectiveness is below average. Consider reviewing agenda preparation and participant engagement."
                    .to_string(),
            );
        }
        if average_duration > LONG_MEETING_MINUTES {
            insights.push(
                "Average meeting duration is high. Consider breaking long meetings into shorter, focused sessions."
                    .to_string(),
            );
        }
        if total_meetings > HIGH_MEETING_COUNT {
            insights.push(
                "High meeting frequency detected. Consider consolidating or eliminating unnecessary meetings."
                    .to_string(),
            );
        }

        Ok(EffectivenessReport {
            total_meetings,
            total_duration_minutes: total_duration,
            average_duration_minutes: round_to(average_duration, 2),
            average_effectiveness_score: round_to(average_effectiveness, 2),
            insights,
            meeting_breakdown: meetings
                .iter()
                .map(|m| MeetingScore {
                    meeting_id: m.meeting_id.clone(),
                    title: m.title.clone(),
                    duration: m.duration,
                    effectiveness_score: m.effectiveness_score,
                })
                .collect(),
        })
    }

    /// Meetings starting in `(now, now + days_ahead]`, earliest first.
    pub fn upcoming(&self, user_id: Option<i64>, days_ahead: u32, now: NaiveDateTime) -> UpcomingReport {
        let cutoff = now + Duration::days(i64::from(days_ahead));
        let mut upcoming: Vec<(NaiveDateTime, UpcomingMeeting)> = self
            .meetings
            .iter()
            .filter(|m| user_id.map_or(true, |id| m.participants.contains(&id)))
            .filter_map(|m| parse_timestamp(&m.start_time).map(|start| (start, m)))
            .filter(|(start, _)| *start > now && *start <= cutoff)
            .map(|(start, m)| {
                (
                    start,
                    UpcomingMeeting {
                        meeting_id: m.meeting_id.clone(),
                        title: m.title.clone(),
                        start_time: m.start_time.clone(),
                        duration: m.duration,
                        participants: self.participant_refs(&m.participants),
                    },
                )
            })
            .collect();
        upcoming.sort_by_key(|(start, _)| *start);

        let upcoming_meetings: Vec<UpcomingMeeting> = upcoming.into_iter().map(|(_, m)| m).collect();
        UpcomingReport {
            total_count: upcoming_meetings.len(),
            upcoming_meetings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meetings::tests::sample;

    fn at(value: &str) -> NaiveDateTime {
        parse_timestamp(value).unwrap()
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = NaiveDate::from_ymd_opt(2025, 10, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2025-10-01T09:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-10-01T09:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-10-01T09:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-10-01T11:00:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-10-01 09:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-10-01"), None);
        assert_eq!(parse_timestamp("soon"), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-10-01"), NaiveDate::from_ymd_opt(2025, 10, 1));
        assert_eq!(parse_date("10/01/2025"), None);
    }

    #[test]
    fn test_overlaps_half_open() {
        let nine = at("2025-10-01T09:00:00");
        let half_past = at("2025-10-01T09:30:00");
        let ten = at("2025-10-01T10:00:00");
        assert!(overlaps(nine, 60, half_past, 15));
        assert!(overlaps(half_past, 60, nine, 60));
        assert!(!overlaps(nine, 60, ten, 30));
        assert!(!overlaps(ten, 30, nine, 60));
    }

    #[test]
    fn test_overlap_across_midnight() {
        let late = at("2025-10-01T23:30:00");
        let early = at("2025-10-02T00:00:00");
        assert!(overlaps(late, 60, early, 30));
    }

    #[test]
    fn test_availability_lists_meetings_on_date() {
        let data = sample();
        let Availability::Known { available, existing_meetings, timezone, .. } =
            data.availability(1, parse_date("2025-10-01").unwrap())
        else {
            panic!("expected known user");
        };
        assert!(available);
        assert_eq!(timezone, "UTC");
        let ids: Vec<&str> = existing_meetings.iter().map(|m| m.meeting_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);

        let Availability::Known { existing_meetings, .. } =
            data.availability(1, parse_date("2025-10-02").unwrap())
        else {
            panic!("expected known user");
        };
        assert!(existing_meetings.is_empty());
    }

    #[test]
    fn test_availability_unknown_user() {
        let json = serde_json::to_value(sample().availability(999, parse_date("2025-10-01").unwrap())).unwrap();
        assert_eq!(json, serde_json::json!({"available": false, "reason": "User not found"}));
    }

    #[test]
    fn test_find_conflicts_only_for_participants() {
        let data = sample();
        let conflicts = data.find_conflicts(&[3], at("2025-10-01T10:15:00"), 30);
        assert!(conflicts.is_empty());
        let conflicts = data.find_conflicts(&[3], at("2025-10-01T13:45:00"), 30);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].conflicting_meeting, "Review");
        assert_eq!(conflicts[0].conflict_time, "2025-10-01T14:00:00");
    }

    #[test]
    fn test_suggestions_skip_busy_slots() {
        let data = sample();
        let report = data
            .suggest_times(&[1, 2], 60, Some("2025-09-30"), at("2025-01-01T00:00:00"), &SuggestionRules::default())
            .unwrap();

        let times: Vec<&str> = report.suggestions.iter().map(|s| s.suggested_time.as_str()).collect();
        // "A" blocks 10:00 for both, "B" blocks 14:00 for Alice
        assert_eq!(
            times,
            vec!["2025-10-01T09:00:00", "2025-10-01T11:00:00", "2025-10-01T15:00:00"]
        );
        assert!(report.suggestions.iter().all(|s| s.confidence == 0.8));
        assert_eq!(report.participants.len(), 2);
        assert_eq!(report.participants[1].name, "Bob");
    }

    #[test]
    fn test_suggestions_long_meeting_avoids_overlap() {
        let data = sample();
        // 90 minutes for Alice: 9:00 runs into "A", 14:00 is "B"
        let rules = SuggestionRules {
            max_suggestions: 10,
            search_days: 1,
            ..SuggestionRules::default()
        };
        let report = data
            .suggest_times(&[1], 90, Some("2025-09-30"), at("2025-01-01T00:00:00"), &rules)
            .unwrap();
        let times: Vec<&str> = report.suggestions.iter().map(|s| s.suggested_time.as_str()).collect();
        assert_eq!(
            times,
            vec!["2025-10-01T11:00:00", "2025-10-01T15:00:00", "2025-10-01T16:00:00"]
        );
    }

    #[test]
    fn test_suggestions_use_now_without_preference() {
        let data = sample();
        let report = data
            .suggest_times(&[2], 30, None, at("2030-05-10T17:45:00"), &SuggestionRules::default())
            .unwrap();
        assert_eq!(report.suggestions[0].suggested_time, "2030-05-11T09:00:00");
        assert_eq!(report.suggestions.len(), 3);
    }

    #[test]
    fn test_suggestions_ignore_unknown_ids() {
        let data = sample();
        let report = data
            .suggest_times(&[2, 999], 30, Some("2026-01-01"), at("2025-01-01T00:00:00"), &SuggestionRules::default())
            .unwrap();
        assert_eq!(report.participants.len(), 1);

        let err = data
            .suggest_times(&[999], 30, None, at("2025-01-01T00:00:00"), &SuggestionRules::default())
            .unwrap_err();
        assert_eq!(err.to_string(), "No valid participants found");

        let err = data
            .suggest_times(&[1], 30, Some("someday"), at("2025-01-01T00:00:00"), &SuggestionRules::default())
            .unwrap_err();
        assert!(err.to_string().contains("preferred_date"));
    }

    #[test]
    fn test_effectiveness_for_user_and_all() {
        let data = sample();
        let report = data.analyze_effectiveness(Some(2)).unwrap();
        assert_eq!(report.total_meetings, 1);
        assert_eq!(report.average_effectiveness_score, 8.0);
        assert!(report.insights.is_empty());

        let report = data.analyze_effectiveness(None).unwrap();
        assert_eq!(report.total_meetings, 2);
        assert_eq!(report.total_duration_minutes, 90);
        assert_eq!(report.average_duration_minutes, 45.0);
        assert_eq!(report.average_effectiveness_score, 7.0);
        assert_eq!(report.meeting_breakdown.len(), 2);

        assert!(data.analyze_effectiveness(Some(42)).is_err());
    }

    #[test]
    fn test_effectiveness_insights() {
        let mut data = sample();
        for m in &mut data.meetings {
            m.duration = 120;
            m.effectiveness_score = Some(4);
        }
        let report = data.analyze_effectiveness(None).unwrap();
        assert_eq!(report.insights.len(), 2);
        assert!(report.insights[0].contains("below average"));
        assert!(report.insights[1].contains("duration is high"));

        for m in &mut data.meetings {
            m.effectiveness_score = None;
        }
        let report = data.analyze_effectiveness(None).unwrap();
        assert_eq!(report.average_effectiveness_score, 0.0);
        assert_eq!(report.insights.len(), 2);
        assert!(report.insights[0].contains("below average"));
    }

    #[test]
    fn test_upcoming_window_and_order() {
        let data = sample();
        let now = at("2025-09-30T12:00:00");

        let report = data.upcoming(None, 7, now);
        assert_eq!(report.total_count, 2);
        assert_eq!(report.upcoming_meetings[0].meeting_id, "A");
        assert_eq!(report.upcoming_meetings[0].participants.len(), 2);

        let report = data.upcoming(Some(3), 7, now);
        assert_eq!(report.total_count, 1);
        assert_eq!(report.upcoming_meetings[0].meeting_id, "B");

        // Window ends before "B" starts
        let report = data.upcoming(None, 1, now);
        assert_eq!(report.total_count, 1);

        let report = data.upcoming(None, 7, at("2025-10-02T00:00:00"));
        assert_eq!(report.total_count, 0);
    }
}
