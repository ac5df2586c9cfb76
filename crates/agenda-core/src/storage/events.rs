//! Local CRUD for the `events` table.

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::Database;
use crate::error::DatabaseError;
use crate::model::{format_datetime, parse_datetime, Event};

const EVENT_COLUMNS: &str =
    "_id, title, category, start_time, end_time, travel_time, location, repetition, description, participants";

/// Raw row; decoding the timestamps and participant list can fail independently of SQLite.
struct EventRow {
    id: String,
    title: String,
    category: Option<String>,
    start_time: String,
    end_time: String,
    travel_time: Option<i32>,
    location: Option<String>,
    repetition: Option<String>,
    notes: Option<String>,
    participants: Option<String>,
}

impl EventRow {
    fn read(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            category: row.get(2)?,
            start_time: row.get(3)?,
            end_time: row.get(4)?,
            travel_time: row.get(5)?,
            location: row.get(6)?,
            repetition: row.get(7)?,
            notes: row.get(8)?,
            participants: row.get(9)?,
        })
    }

    fn into_event(self) -> Result<Event, DatabaseError> {
        let corrupt = |message: String| DatabaseError::CorruptRow {
            table: "events",
            message,
        };
        let start = parse_datetime(&self.start_time)
            .ok_or_else(|| corrupt(format!("{}: bad start_time '{}'", self.id, self.start_time)))?;
        let end = parse_datetime(&self.end_time)
            .ok_or_else(|| corrupt(format!("{}: bad end_time '{}'", self.id, self.end_time)))?;
        let participants = match self.participants.as_deref() {
            None | Some("") => Vec::new(),
            Some(json) => serde_json::from_str::<Vec<String>>(json)
                .map_err(|e| corrupt(format!("{}: bad participants: {e}", self.id)))?,
        };

        Ok(Event {
            id: self.id,
            title: self.title,
            category: self.category,
            start,
            end,
            travel_time: self.travel_time.unwrap_or(0),
            location: self.location,
            repetition: self.repetition,
            notes: self.notes,
            participants,
        })
    }
}

/// Participants are stored as a JSON array, or NULL when there are none.
fn encode_participants(participants: &[String]) -> Option<String> {
    if participants.is_empty() {
        None
    } else {
        serde_json::to_string(participants).ok()
    }
}

impl Database {
    /// Insert a new event.
    ///
    /// # Errors
    /// Returns [`DatabaseError::DuplicateId`] if an event with the same id exists.
    pub fn insert_event(&self, event: &Event) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO events (_id, title, category, start_time, end_time, travel_time,
                                 location, repetition, description, participants)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                event.id,
                event.title,
                event.category,
                format_datetime(&event.start),
                format_datetime(&event.end),
                event.travel_time,
                event.location,
                event.repetition,
                event.notes,
                encode_participants(&event.participants),
            ],
        )?;
        debug!(event_id = %event.id, title = %event.title, "event inserted");
        Ok(())
    }

    /// Overwrite an existing event. Returns whether a row was updated.
    pub fn update_event(&self, event: &Event) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE events SET title = ?2, category = ?3, start_time = ?4, end_time = ?5,
                               travel_time = ?6, location = ?7, repetition = ?8,
                               description = ?9, participants = ?10
             WHERE _id = ?1",
            params![
                event.id,
                event.title,
                event.category,
                format_datetime(&event.start),
                format_datetime(&event.end),
                event.travel_time,
                event.location,
                event.repetition,
                event.notes,
                encode_participants(&event.participants),
            ],
        )?;
        if changed > 0 {
            debug!(event_id = %event.id, "event updated");
        } else {
            debug!(event_id = %event.id, "no event to update");
        }
        Ok(changed > 0)
    }

    pub fn get_event(&self, id: &str) -> Result<Option<Event>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM events WHERE _id = ?1"),
                params![id],
                EventRow::read,
            )
            .optional()?;
        row.map(EventRow::into_event).transpose()
    }

    /// All events ordered by start time.
    pub fn list_events(&self) -> Result<Vec<Event>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY start_time ASC, title ASC"
        ))?;
        let rows = stmt
            .query_map([], EventRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(EventRow::into_event).collect()
    }

    /// Events touching the given day.
    pub fn events_on(&self, date: NaiveDate) -> Result<Vec<Event>, DatabaseError> {
        Ok(self
            .list_events()?
            .into_iter()
            .filter(|e| e.occurs_on(date))
            .collect())
    }

    /// Delete one event. Returns whether a row was removed.
    pub fn delete_event(&self, id: &str) -> Result<bool, DatabaseError> {
        let removed = self
            .conn
            .execute("DELETE FROM events WHERE _id = ?1", params![id])?;
        if removed > 0 {
            debug!(event_id = %id, "event deleted");
        } else {
            debug!(event_id = %id, "no event to delete");
        }
        Ok(removed > 0)
    }
}
