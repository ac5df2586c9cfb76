//! Calendar entries.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::Task;
use crate::error::ValidationError;

/// Category given to events scheduled from a task for a specific day.
pub const TASK_CATEGORY: &str = "Task";

/// A calendar entry with a time range and optional participants.
///
/// Times are local wall-clock times without an offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub category: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Travel time in minutes.
    pub travel_time: i32,
    pub location: Option<String>,
    pub repetition: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Event {
    /// Create an event with a fresh id and no optional fields set.
    ///
    /// # Errors
    /// Returns an error if the title is blank.
    pub fn new(
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, ValidationError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title,
            category: None,
            start,
            end,
            travel_time: 0,
            location: None,
            repetition: None,
            notes: None,
            participants: Vec::new(),
        })
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_blank(category.into());
        self
    }

    pub fn with_travel_time(mut self, minutes: i32) -> Self {
        self.travel_time = minutes;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = non_blank(location.into());
        self
    }

    pub fn with_repetition(mut self, repetition: impl Into<String>) -> Self {
        self.repetition = non_blank(repetition.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = non_blank(notes.into());
        self
    }

    pub fn with_participants(mut self, participants: Vec<String>) -> Self {
        self.participants = participants;
        self
    }

    /// Schedule a task as a one-hour event starting at `now`.
    ///
    /// The event reuses the task id, so the two stay linked on the server.
    pub fn from_task(task: &Task, now: NaiveDateTime) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            category: task.category.map(|c| c.name().to_string()),
            start: now,
            end: now + Duration::hours(1),
            travel_time: task.category.map(|c| c.travel_time()).unwrap_or(0),
            location: task.category.map(|c| c.location().to_string()),
            repetition: None,
            notes: task.description.clone(),
            participants: Vec::new(),
        }
    }

    /// Schedule a task on a chosen day, 09:00 to 10:00.
    ///
    /// Unlike [`Event::from_task`] the category is always `"Task"` and the
    /// category's location and travel time are not applied.
    pub fn from_task_on(task: &Task, date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN) + Duration::hours(9);
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            category: Some(TASK_CATEGORY.to_string()),
            start,
            end: start + Duration::hours(1),
            travel_time: 0,
            location: None,
            repetition: None,
            notes: task.description.clone(),
            participants: Vec::new(),
        }
    }

    /// Whether any part of the event falls on `date`.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        let (first, last) = if self.end < self.start {
            (self.end.date(), self.start.date())
        } else {
            (self.start.date(), self.end.date())
        };
        first <= date && date <= last
    }
}

/// Split a comma-separated participant list, dropping blanks.
pub fn parse_participants(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Priority};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn builder_drops_blank_optionals() {
        let event = Event::new("Meeting", at(2025, 1, 13, 12, 30), at(2025, 1, 13, 14, 0))
            .unwrap()
            .with_category("WORK")
            .with_location("  ")
            .with_notes("Meeting about our App")
            .with_travel_time(90);
        assert_eq!(event.category.as_deref(), Some("WORK"));
        assert!(event.location.is_none());
        assert_eq!(event.travel_time, 90);
    }

    #[test]
    fn from_task_uses_category_defaults() {
        let task = Task::new("Vorlesung", Some(Category::University), Some("Prog3".into()), Priority::UrgentImportant).unwrap();
        let now = at(2025, 1, 13, 12, 15);
        let event = Event::from_task(&task, now);
        assert_eq!(event.id, task.id);
        assert_eq!(event.category.as_deref(), Some("UNIVERSITY"));
        assert_eq!(event.location.as_deref(), Some("Campus"));
        assert_eq!(event.travel_time, 30);
        assert_eq!(event.end, at(2025, 1, 13, 13, 15));
        assert_eq!(event.notes.as_deref(), Some("Prog3"));
        assert!(event.participants.is_empty());
    }

    #[test]
    fn from_task_without_category() {
        let task = Task::new("Lesen", None, None, Priority::default()).unwrap();
        let event = Event::from_task(&task, at(2025, 2, 2, 8, 0));
        assert!(event.category.is_none());
        assert!(event.location.is_none());
        assert_eq!(event.travel_time, 0);
    }

    #[test]
    fn from_task_on_uses_fixed_morning_slot() {
        let task = Task::new("Vorlesung", Some(Category::University), Some("Prog3".into()), Priority::UrgentImportant).unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let event = Event::from_task_on(&task, day);
        assert_eq!(event.id, task.id);
        assert_eq!(event.title, "Vorlesung");
        assert_eq!(event.category.as_deref(), Some("Task"));
        assert_eq!(event.start, at(2025, 3, 4, 9, 0));
        assert_eq!(event.end, at(2025, 3, 4, 10, 0));
        assert_eq!(event.travel_time, 0);
        assert!(event.location.is_none());
        assert!(event.repetition.is_none());
        assert_eq!(event.notes.as_deref(), Some("Prog3"));
        assert!(event.participants.is_empty());
        assert!(event.occurs_on(day));
    }

    #[test]
    fn occurs_on_spans_multiple_days() {
        let event = Event::new("Trip", at(2025, 1, 10, 22, 0), at(2025, 1, 12, 1, 0)).unwrap();
        assert!(!event.occurs_on(NaiveDate::from_ymd_opt(2025, 1, 9).unwrap()));
        assert!(event.occurs_on(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()));
        assert!(event.occurs_on(NaiveDate::from_ymd_opt(2025, 1, 11).unwrap()));
        assert!(event.occurs_on(NaiveDate::from_ymd_opt(2025, 1, 12).unwrap()));
        assert!(!event.occurs_on(NaiveDate::from_ymd_opt(2025, 1, 13).unwrap()));
    }

    #[test]
    fn participants_are_trimmed() {
        assert_eq!(parse_participants("anna, ben,, carl "), vec!["anna", "ben", "carl"]);
        assert!(parse_participants(" , ").is_empty());
    }
}
