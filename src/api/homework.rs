//! Homework records and validation of the statuses response.

use crate::error::ValidationError;
use crate::relay::Checkpoint;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Review status of a homework submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    /// A reviewer has picked the work up.
    Reviewing,
    /// The work was accepted.
    Approved,
    /// The work was sent back with remarks.
    Rejected,
}

impl HomeworkStatus {
    /// All known statuses.
    pub const ALL: [HomeworkStatus; 3] = [Self::Reviewing, Self::Approved, Self::Rejected];

    /// Wire name of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reviewing => "reviewing",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Human-readable sentence for notifications.
    pub const fn verdict(self) -> &'static str {
        match self {
            Self::Reviewing => "The work has been taken for review.",
            Self::Approved => "The work has been reviewed: the reviewer liked everything. Hooray!",
            Self::Rejected => "The work has been reviewed: the reviewer has remarks.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HomeworkStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let expected = Self::ALL.map(Self::as_str).join(", ");
                ValidationError::invalid_field(
                    "status",
                    format!("unexpected status '{}', expected one of {}", s, expected),
                )
            })
    }
}

/// One homework entry from the statuses API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Homework {
    /// Stable identifier of the submission.
    pub id: u64,
    /// Display name, usually `<login>__<project>.zip`.
    pub name: String,
    /// Current review status.
    pub status: HomeworkStatus,
    /// Reviewer's comment, if any.
    pub reviewer_comment: Option<String>,
    /// Lesson the work belongs to.
    pub lesson_name: Option<String>,
    /// When the status last changed.
    pub date_updated: Option<DateTime<Utc>>,
}

/// Validated response of one fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPage {
    /// Records changed since the requested checkpoint.
    pub homeworks: Vec<Homework>,
    /// Server time to use as the next checkpoint.
    pub current_date: Checkpoint,
}

/// Validate a decoded statuses response.
///
/// Every problem in the page is collected, so a single call reports all
/// offending fields at once (for example `homeworks[1].status`).
///
/// # Errors
///
/// Returns a [`ValidationError`] naming each missing or malformed field.
///
/// # Examples
///
/// ```rust
/// use homework_relay::api::{HomeworkStatus, check_response};
/// use serde_json::json;
///
/// let page = check_response(&json!({
///     "homeworks": [{"id": 1, "homework_name": "hw.zip", "status": "approved"}],
///     "current_date": 1700000000
/// }))
/// .unwrap();
/// assert_eq!(page.homeworks[0].status, HomeworkStatus::Approved);
/// ```
pub fn check_response(response: &Value) -> Result<StatusPage, ValidationError> {
    let root = response.as_object().ok_or_else(|| {
        ValidationError::custom(format!(
            "expected a JSON object at the root, got {}",
            kind(response)
        ))
    })?;

    let mut errors = Vec::new();

    let current_date = match root.get("current_date") {
        None | Some(Value::Null) => {
            errors.push(ValidationError::missing_field("current_date"));
            None
        }
        Some(value) => match value.as_i64().filter(|ts| *ts >= 0) {
            Some(ts) => Some(Checkpoint::from_secs(ts)),
            None => {
                errors.push(ValidationError::invalid_field(
                    "current_date",
                    format!("expected a non-negative integer, got {}", value),
                ));
                None
            }
        },
    };

    let mut homeworks = Vec::new();
    match root.get("homeworks") {
        None | Some(Value::Null) => errors.push(ValidationError::missing_field("homeworks")),
        Some(Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                match check_homework(&format!("homeworks[{}]", index), item) {
                    Ok(homework) => homeworks.push(homework),
                    Err(mut found) => errors.append(&mut found),
                }
            }
        }
        Some(other) => errors.push(ValidationError::invalid_field(
            "homeworks",
            format!("expected an array, got {}", kind(other)),
        )),
    }

    ValidationError::from_list(errors)?;
    Ok(StatusPage {
        homeworks,
        // from_list only passes when current_date was recorded
        current_date: current_date.unwrap_or_default(),
    })
}

fn check_homework(path: &str, item: &Value) -> Result<Homework, Vec<ValidationError>> {
    let Some(fields) = item.as_object() else {
        return Err(vec![ValidationError::invalid_field(
            path,
            format!("expected an object, got {}", kind(item)),
        )]);
    };

    let mut errors = Vec::new();

    let id = match fields.get("id") {
        None | Some(Value::Null) => {
            errors.push(ValidationError::missing_field(format!("{}.id", path)));
            None
        }
        Some(value) => {
            let id = value.as_u64();
            if id.is_none() {
                errors.push(ValidationError::invalid_field(
                    format!("{}.id", path),
                    format!("expected a non-negative integer, got {}", value),
                ));
            }
            id
        }
    };

    let name = required_str(fields, path, "homework_name", &mut errors);

    let status = required_str(fields, path, "status", &mut errors).and_then(|raw| {
        raw.parse::<HomeworkStatus>()
            .map_err(|e| errors.push(e.at(format!("{}.status", path))))
            .ok()
    });

    let reviewer_comment = optional_str(fields, path, "reviewer_comment", &mut errors);
    let lesson_name = optional_str(fields, path, "lesson_name", &mut errors);
    let date_updated =
        optional_str(fields, path, "date_updated", &mut errors).and_then(|raw| {
            DateTime::parse_from_rfc3339(&raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    errors.push(ValidationError::invalid_field(
                        format!("{}.date_updated", path),
                        format!("'{}' is not an RFC 3339 timestamp: {}", raw, e),
                    ))
                })
                .ok()
        });

    match (id, name, status) {
        (Some(id), Some(name), Some(status)) if errors.is_empty() => Ok(Homework {
            id,
            name,
            status,
            reviewer_comment,
            lesson_name,
            date_updated,
        }),
        _ => Err(errors),
    }
}

fn required_str(
    fields: &Map<String, Value>,
    path: &str,
    key: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<String> {
    match fields.get(key) {
        None | Some(Value::Null) => {
            errors.push(ValidationError::missing_field(format!("{}.{}", path, key)));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.push(ValidationError::invalid_field(
                format!("{}.{}", path, key),
                format!("expected a string, got {}", kind(other)),
            ));
            None
        }
    }
}

fn optional_str(
    fields: &Map<String, Value>,
    path: &str,
    key: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<String> {
    match fields.get(key) {
        None | Some(Value::Null) => None,
        Some(_) => required_str(fields, path, key, errors),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
