//! JSON wire format for the remote API.
//!
//! Payloads are plain objects without a schema version. Parsing is lenient
//! about nulls and missing optional fields and strict about the fields an
//! entity cannot exist without.

use serde_json::{json, Map, Value};

use crate::error::CloudError;
use crate::model::{format_datetime, parse_datetime, Category, Event, Priority, Task};

type Object = Map<String, Value>;

fn parse_error(message: impl Into<String>) -> CloudError {
    CloudError::Parse(message.into())
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Object, CloudError> {
    value
        .as_object()
        .ok_or_else(|| parse_error(format!("{what}: expected a JSON object, got {value}")))
}

/// String field, `None` when missing or null.
fn opt_str(obj: &Object, key: &str) -> Result<Option<String>, CloudError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(parse_error(format!("'{key}' must be a string, got {other}"))),
    }
}

fn req_str(obj: &Object, key: &str) -> Result<String, CloudError> {
    opt_str(obj, key)?.ok_or_else(|| parse_error(format!("missing required field '{key}'")))
}

/// Integer field that may arrive as a number or a numeric string.
fn opt_int(obj: &Object, key: &str) -> Result<Option<i64>, CloudError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| parse_error(format!("'{key}' is not an integer: {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| parse_error(format!("'{key}' is not an integer: '{s}'"))),
        Some(other) => Err(parse_error(format!("'{key}' is not an integer: {other}"))),
    }
}

fn parse_body(body: &str) -> Result<Value, CloudError> {
    serde_json::from_str(body).map_err(|e| parse_error(format!("invalid JSON: {e}")))
}

// === Tasks ===

pub fn task_to_json(task: &Task) -> Value {
    json!({
        "id": task.id,
        "task": task.title,
        "category": task.category.map(|c| c.name()),
        "description": task.description,
        "priority": task.priority.name(),
    })
}

fn parse_priority(obj: &Object) -> Result<Priority, CloudError> {
    match obj.get("priority") {
        None | Some(Value::Null) => Ok(Priority::default()),
        Some(Value::String(s)) => match Priority::from_name(s) {
            Some(p) => Ok(p),
            None => s
                .trim()
                .parse::<i32>()
                .map(Priority::from_value)
                .map_err(|_| parse_error(format!("unknown priority '{s}'"))),
        },
        Some(Value::Number(n)) => n
            .as_i64()
            .map(|v| i32::try_from(v).map_or(Priority::NotUrgentNotImportant, Priority::from_value))
            .ok_or_else(|| parse_error(format!("unknown priority {n}"))),
        Some(other) => Err(parse_error(format!("unknown priority {other}"))),
    }
}

/// Parse one task object.
pub fn parse_task(value: &Value) -> Result<Task, CloudError> {
    let obj = as_object(value, "task")?;
    let category = match opt_str(obj, "category")? {
        Some(name) => Some(
            Category::from_name(&name)
                .ok_or_else(|| parse_error(format!("unknown category '{name}'")))?,
        ),
        None => None,
    };

    Ok(Task {
        id: req_str(obj, "id")?,
        title: req_str(obj, "task")?,
        category,
        description: opt_str(obj, "description")?,
        priority: parse_priority(obj)?,
    })
}

/// Parse a JSON array of tasks.
pub fn parse_task_list(body: &str) -> Result<Vec<Task>, CloudError> {
    match parse_body(body)? {
        Value::Array(items) => items
            .iter()
            .map(parse_task)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| parse_error(format!("Error parsing task list: {e}"))),
        other => Err(parse_error(format!("task list: expected a JSON array, got {other}"))),
    }
}

// === Events ===

pub fn event_to_json(event: &Event) -> Value {
    json!({
        "event_id": event.id,
        "title": event.title,
        "category": event.category,
        "startDateTime": format_datetime(&event.start),
        "endDateTime": format_datetime(&event.end),
        "travelTime": event.travel_time,
        "location": event.location,
        "repetition": event.repetition,
        "notes": event.notes,
        "participants": event.participants,
    })
}

fn req_datetime(obj: &Object, key: &str) -> Result<chrono::NaiveDateTime, CloudError> {
    let raw = req_str(obj, key)?;
    parse_datetime(&raw).ok_or_else(|| parse_error(format!("'{key}' is not an ISO date-time: '{raw}'")))
}

/// Parse one event object.
pub fn parse_event_value(value: &Value) -> Result<Event, CloudError> {
    let obj = as_object(value, "event")?;

    let participants = match obj.get("participants") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(parse_error(format!("participant must be a string, got {other}"))),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(parse_error(format!("'participants' must be an array, got {other}")))
        }
    };

    let travel_time = opt_int(obj, "travelTime")?.unwrap_or(0);

    Ok(Event {
        id: req_str(obj, "event_id")?,
        title: req_str(obj, "title")?,
        category: opt_str(obj, "category")?.map(|c| c.to_uppercase()),
        start: req_datetime(obj, "startDateTime")?,
        end: req_datetime(obj, "endDateTime")?,
        travel_time: i32::try_from(travel_time)
            .map_err(|_| parse_error(format!("'travelTime' out of range: {travel_time}")))?,
        location: opt_str(obj, "location")?,
        repetition: opt_str(obj, "repetition")?.map(|r| r.to_uppercase()),
        notes: opt_str(obj, "notes")?,
        participants,
    })
}

/// Parse a single event response body.
pub fn parse_event(body: &str) -> Result<Event, CloudError> {
    parse_event_value(&parse_body(body)?)
}

/// Parse a JSON array of events.
pub fn parse_event_list(body: &str) -> Result<Vec<Event>, CloudError> {
    match parse_body(body)? {
        Value::Array(items) => items
            .iter()
            .map(parse_event_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| parse_error(format!("Error parsing event list: {e}"))),
        other => Err(parse_error(format!("event list: expected a JSON array, got {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn task_json_uses_wire_names() {
        let task = Task {
            id: "00000100".into(),
            title: "Hausaufgaben".into(),
            category: Some(Category::University),
            description: Some("Prog3 erledigen".into()),
            priority: Priority::NotUrgentNotImportant,
        };
        let value = task_to_json(&task);
        assert_eq!(value["task"], "Hausaufgaben");
        assert_eq!(value["category"], "UNIVERSITY");
        assert_eq!(value["priority"], "NOT_URGENT_NOT_IMPORTANT");
        assert_eq!(parse_task(&value).unwrap(), task);
    }

    #[test]
    fn task_priority_accepts_name_or_ordinal() {
        let by_name = json!({"id": "1", "task": "a", "priority": "URGENT_IMPORTANT"});
        let by_number = json!({"id": "1", "task": "a", "priority": 2});
        let by_string_number = json!({"id": "1", "task": "a", "priority": "3"});
        let missing = json!({"id": "1", "task": "a", "priority": null});
        assert_eq!(parse_task(&by_name).unwrap().priority, Priority::UrgentImportant);
        assert_eq!(parse_task(&by_number).unwrap().priority, Priority::UrgentNotImportant);
        assert_eq!(parse_task(&by_string_number).unwrap().priority, Priority::NotUrgentImportant);
        assert_eq!(parse_task(&missing).unwrap().priority, Priority::NotUrgentNotImportant);

        // 2^32 + 1 must not wrap around to 1.
        let out_of_range = json!({"id": "1", "task": "a", "priority": 4_294_967_297i64});
        assert_eq!(parse_task(&out_of_range).unwrap().priority, Priority::NotUrgentNotImportant);
    }

    #[test]
    fn task_category_is_case_insensitive_but_must_exist() {
        let lower = json!({"id": "1", "task": "a", "category": "household"});
        assert_eq!(parse_task(&lower).unwrap().category, Some(Category::Household));
        let unknown = json!({"id": "1", "task": "a", "category": "garden"});
        assert!(matches!(parse_task(&unknown), Err(CloudError::Parse(_))));
    }

    #[test]
    fn task_list_reports_bad_entries() {
        let body = r#"[{"id": "1", "task": "ok"}, {"id": "2"}]"#;
        let err = parse_task_list(body).unwrap_err();
        assert!(err.to_string().contains("Error parsing task list"));
        assert!(err.to_string().contains("'task'"));
        assert!(parse_task_list("{}").is_err());
        assert!(parse_task_list("[]").unwrap().is_empty());
    }

    #[test]
    fn event_parse_normalises_fields() {
        let body = r#"{
            "event_id": "00000101",
            "title": "Fußball",
            "category": "sport",
            "startDateTime": "2025-01-11T17:30",
            "endDateTime": "2025-01-11T20:00:00",
            "travelTime": "15",
            "location": "SEP",
            "repetition": "weekly",
            "notes": null
        }"#;
        let event = parse_event(body).unwrap();
        assert_eq!(event.category.as_deref(), Some("SPORT"));
        assert_eq!(event.repetition.as_deref(), Some("WEEKLY"));
        assert_eq!(event.travel_time, 15);
        assert!(event.notes.is_none());
        assert!(event.participants.is_empty());
        assert_eq!(
            event.start,
            NaiveDate::from_ymd_opt(2025, 1, 11).unwrap().and_hms_opt(17, 30, 0).unwrap()
        );
    }

    #[test]
    fn event_missing_travel_time_defaults_to_zero() {
        let body = r#"{"event_id": "1", "title": "Date",
            "startDateTime": "2025-01-17T15:00", "endDateTime": "2025-01-17T22:00"}"#;
        assert_eq!(parse_event(body).unwrap().travel_time, 0);
    }

    #[test]
    fn event_requires_id_and_times() {
        let no_id = r#"{"title": "x", "startDateTime": "2025-01-17T15:00", "endDateTime": "2025-01-17T22:00"}"#;
        let no_end = r#"{"event_id": "1", "title": "x", "startDateTime": "2025-01-17T15:00"}"#;
        let bad_time = r#"{"event_id": "1", "title": "x", "startDateTime": "tomorrow", "endDateTime": "2025-01-17T22:00"}"#;
        assert!(matches!(parse_event(no_id), Err(CloudError::Parse(_))));
        assert!(matches!(parse_event(no_end), Err(CloudError::Parse(_))));
        assert!(matches!(parse_event(bad_time), Err(CloudError::Parse(_))));
        assert!(matches!(parse_event("not json"), Err(CloudError::Parse(_))));
    }

    #[test]
    fn event_json_round_trips_through_parser() {
        let event = Event::new(
            "Vorlesung",
            NaiveDate::from_ymd_opt(2025, 1, 13).unwrap().and_hms_opt(12, 15, 0).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 13).unwrap().and_hms_opt(13, 45, 0).unwrap(),
        )
        .unwrap()
        .with_category("UNIVERSITY")
        .with_travel_time(90)
        .with_location("C446")
        .with_repetition("DAILY")
        .with_notes("Prog3")
        .with_participants(vec!["3d652250-7db0-411a-a8bb-1ce9904c5ef9".into()]);

        let value = event_to_json(&event);
        assert_eq!(value["startDateTime"], "2025-01-13T12:15:00");
        assert_eq!(value["travelTime"], 90);
        assert_eq!(parse_event_value(&value).unwrap(), event);
    }

    #[test]
    fn event_list_parses_array() {
        let body = r#"[
            {"event_id": "a", "title": "A", "startDateTime": "2025-01-13T12:30", "endDateTime": "2025-01-13T14:00", "travelTime": 90},
            {"event_id": "b", "title": "B", "startDateTime": "2025-02-02T08:25", "endDateTime": "2025-02-02T08:45", "participants": ["x"]}
        ]"#;
        let events = parse_event_list(body).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].participants, vec!["x"]);
    }
}
