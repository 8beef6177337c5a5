use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Timestamp format used by `task export` (always UTC)
pub const TASKWARRIOR_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Parse a Taskwarrior timestamp, accepting RFC 3339 as a fallback
pub fn parse_taskwarrior_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, TASKWARRIOR_DATE_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// A note attached to a task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(with = "tw_date")]
    pub entry: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
}

/// A pending task as reported by the backend.
///
/// Snapshots are read-only: every change goes through
/// [`TaskBackend`](crate::io::backend::TaskBackend) and is picked up by the
/// next refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub uuid: String,
    #[serde(default)]
    pub description: String,
    /// Dot-separated project path, empty when the task has no project
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub project: String,
    #[serde(
        default,
        deserialize_with = "non_empty_tags",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tags: Vec<String>,
    #[serde(with = "tw_date")]
    pub entry: DateTime<Utc>,
    #[serde(default, with = "tw_date::option", skip_serializing_if = "Option::is_none")]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub urgency: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    /// Set while the task is started
    #[serde(
        rename = "start",
        default,
        with = "tw_date::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub active_since: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a task with no project, tags, due date or annotations
    pub fn new(uuid: impl Into<String>, description: impl Into<String>, entry: DateTime<Utc>) -> Self {
        Task {
            uuid: uuid.into(),
            description: description.into(),
            project: String::new(),
            tags: Vec::new(),
            entry,
            due: None,
            urgency: 0.0,
            annotations: Vec::new(),
            active_since: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active_since.is_some()
    }

    pub fn has_project(&self) -> bool {
        !self.project.is_empty()
    }
}

fn non_empty_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(tags.into_iter().filter(|t| !t.is_empty()).collect())
}

mod tw_date {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{TASKWARRIOR_DATE_FORMAT, parse_taskwarrior_date};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.format(TASKWARRIOR_DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse_taskwarrior_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        use super::super::parse_taskwarrior_date;

        pub fn serialize<S: Serializer>(date: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => super::serialize(d, s),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                None => Ok(None),
                Some(raw) => parse_taskwarrior_date(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}"))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const EXPORT_TASK: &str = r#"{
        "id": 3,
        "description": "Write release notes",
        "entry": "20240105T093000Z",
        "modified": "20240106T101500Z",
        "project": "work.docs",
        "start": "20240106T100000Z",
        "due": "20240110T170000Z",
        "status": "pending",
        "tags": ["writing", ""],
        "uuid": "0c2a5e4d-8f1b-4a53-9c7e-1d2f3a4b5c6d",
        "annotations": [
            {"entry": "20240105T120000Z", "description": "draft in wiki"}
        ],
        "urgency": 9.1
    }"#;

    #[test]
    fn deserialize_export_object() {
        let task: Task = serde_json::from_str(EXPORT_TASK).unwrap();
        assert_eq!(task.uuid, "0c2a5e4d-8f1b-4a53-9c7e-1d2f3a4b5c6d");
        assert_eq!(task.project, "work.docs");
        assert_eq!(task.tags, vec!["writing"]);
        assert_eq!(task.entry, Utc.with_ymd_and_hms(2024, 1, 5, 9, 30, 0).unwrap());
        assert_eq!(
            task.active_since,
            Some(Utc.with_ymd_and_hms(2024, 1, 6, 10, 0, 0).unwrap())
        );
        assert_eq!(task.annotations.len(), 1);
        assert_eq!(task.annotations[0].description, "draft in wiki");
        assert!(task.is_active());
        assert!((task.urgency - 9.1).abs() < f64::EPSILON);
    }

    #[test]
    fn deserialize_minimal_object() {
        let task: Task =
            serde_json::from_str(r#"{"uuid":"u1","entry":"20240101T000000Z"}"#).unwrap();
        assert_eq!(task.description, "");
        assert!(!task.has_project());
        assert!(task.tags.is_empty());
        assert!(task.due.is_none());
        assert!(!task.is_active());
        assert_eq!(task.urgency, 0.0);
    }

    #[test]
    fn invalid_date_is_an_error() {
        let result = serde_json::from_str::<Task>(r#"{"uuid":"u1","entry":"yesterday"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn parse_rfc3339_fallback() {
        let parsed = parse_taskwarrior_date("2024-03-01T08:00:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap());
    }

    #[test]
    fn serialize_uses_taskwarrior_format() {
        let mut task = Task::new("u1", "x", Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).unwrap());
        task.active_since = Some(Utc.with_ymd_and_hms(2024, 2, 4, 0, 0, 0).unwrap());
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["entry"], "20240203T040506Z");
        assert_eq!(json["start"], "20240204T000000Z");
        assert!(json.get("project").is_none());
        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, task);
    }
}
