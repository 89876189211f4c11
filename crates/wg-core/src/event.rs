//! Calendar event records as supplied by the storage collaborator.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::source::{EventSource, PriorityTier};
use crate::types::EventId;

/// A single time-bounded calendar entry.
///
/// The engine only reads events. Time strings stay raw (`HH:mm`) so the
/// normalizer can apply its leniency rules instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Stable opaque identifier.
    pub id: EventId,
    /// Calendar day the event falls on.
    pub date: NaiveDate,
    /// Start time as `HH:mm`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub start_time: String,
    /// End time as `HH:mm`. `"00:00"` means end of day.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub end_time: String,
    /// Producer tag (`classroom`, `school`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EventSource>,
    /// Free-form event type (`study`, `work`, `meeting`, ...).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Display color, e.g. `#8b5cf6`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Minutes before start to notify, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<u32>,
}

/// Reads a time string, treating `null` like a missing field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Event {
    /// Creates an untitled event with no source or type.
    pub fn new(
        id: EventId,
        date: NaiveDate,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            id,
            date,
            start_time: start_time.into(),
            end_time: end_time.into(),
            source: None,
            kind: None,
            title: String::new(),
            description: None,
            color: None,
            reminder: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: EventSource) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Scheduling priority used to order rotation stacks.
    pub fn priority_tier(&self) -> PriorityTier {
        PriorityTier::classify(self.source.as_ref(), self.kind.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backup_record() {
        let json = r##"{
            "id": "classroom-981",
            "title": "Essay draft",
            "description": "Literature\n\nFirst draft",
            "date": "2025-03-10",
            "startTime": "23:59",
            "endTime": "23:59",
            "color": "#8b5cf6",
            "type": "study",
            "source": "classroom",
            "courseId": "c-1",
            "reminder": 60
        }"##;
        let event: Event = serde_json::from_str(json).unwrap();

        assert_eq!(event.id.as_str(), "classroom-981");
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());
        assert_eq!(event.source, Some(EventSource::Classroom));
        assert_eq!(event.kind.as_deref(), Some("study"));
        assert_eq!(event.priority_tier(), PriorityTier::Classroom);
        assert_eq!(event.reminder, Some(60));
    }

    #[test]
    fn missing_times_deserialize_as_empty() {
        let json = r#"{"id": "e1", "date": "2025-03-10"}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(event.start_time.is_empty());
        assert!(event.end_time.is_empty());
        assert_eq!(event.priority_tier(), PriorityTier::General);
    }

    #[test]
    fn null_times_deserialize_as_empty() {
        let json = r#"{"id": "e1", "date": "2025-03-10", "startTime": null, "endTime": null}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert!(event.start_time.is_empty());
        assert!(event.end_time.is_empty());
    }

    #[test]
    fn event_rejects_empty_ids() {
        let json = r#"{"id": "", "date": "2025-03-10", "startTime": "09:00"}"#;
        let result: Result<Event, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let event = Event::new(
            EventId::new("e1").unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            "09:00",
            "10:00",
        )
        .with_kind("work");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["startTime"], "09:00");
        assert_eq!(json["type"], "work");
        assert!(json.get("source").is_none());
    }
}
