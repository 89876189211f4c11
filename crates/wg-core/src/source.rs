//! Event origin tags and the scheduling priority derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where an event record came from.
///
/// Unknown tags are preserved verbatim so records round-trip untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// Google Classroom coursework.
    Classroom,
    /// School timetable entries.
    School,
    /// Google Calendar events.
    GoogleCalendar,
    /// Any other producer.
    Other(String),
}

impl fmt::Display for EventSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Classroom => "classroom",
            Self::School => "school",
            Self::GoogleCalendar => "gcalendar",
            Self::Other(tag) => tag,
        };
        write!(f, "{s}")
    }
}

impl FromStr for EventSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "classroom" => Self::Classroom,
            "school" => Self::School,
            "gcalendar" => Self::GoogleCalendar,
            other => Self::Other(other.to_string()),
        })
    }
}

impl Serialize for EventSource {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EventSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Scheduling priority of an event. Lower tiers outrank higher ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    /// Tier 1: classroom coursework.
    Classroom = 1,
    /// Tier 2: school entries and study sessions.
    Study = 2,
    /// Tier 3: everything else.
    General = 3,
}

impl PriorityTier {
    /// Derives the tier from an event's source tag and type.
    pub fn classify(source: Option<&EventSource>, kind: Option<&str>) -> Self {
        match source {
            Some(EventSource::Classroom) => Self::Classroom,
            Some(EventSource::School) => Self::Study,
            _ if kind == Some("study") => Self::Study,
            _ => Self::General,
        }
    }
}
