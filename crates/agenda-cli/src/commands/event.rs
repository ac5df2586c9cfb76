//! Calendar event commands.

use agenda_core::model::{parse_datetime, parse_participants};
use agenda_core::{Event, ValidationError};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use clap::Subcommand;

use super::{finish_push, open_repository, print_json, CmdResult};

fn datetime_arg(raw: &str) -> Result<NaiveDateTime, String> {
    parse_datetime(raw).ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM[:SS], got '{raw}'"))
}

#[derive(Subcommand)]
pub enum EventAction {
    /// Create an event
    Add {
        /// Event title
        title: String,
        /// Start time (e.g. 2024-05-02T14:00)
        #[arg(long, value_parser = datetime_arg)]
        start: NaiveDateTime,
        /// End time (default: one hour after start)
        #[arg(long, value_parser = datetime_arg)]
        end: Option<NaiveDateTime>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        location: Option<String>,
        /// Travel time in minutes
        #[arg(long, default_value = "0")]
        travel_time: i32,
        #[arg(long)]
        repetition: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Comma-separated participant list
        #[arg(long)]
        participants: Option<String>,
    },
    /// List local events
    List {
        /// Only events touching this day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Update an event
    Update {
        /// Event ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, value_parser = datetime_arg)]
        start: Option<NaiveDateTime>,
        #[arg(long, value_parser = datetime_arg)]
        end: Option<NaiveDateTime>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        travel_time: Option<i32>,
        #[arg(long)]
        repetition: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Comma-separated participant list (replaces the current one)
        #[arg(long)]
        participants: Option<String>,
    },
    /// Delete an event
    Delete {
        /// Event ID
        id: String,
    },
}

/// Blank strings clear an optional field.
fn replace(field: &mut Option<String>, value: Option<String>) {
    if let Some(v) = value {
        let v = v.trim();
        *field = (!v.is_empty()).then(|| v.to_string());
    }
}

pub async fn run(action: EventAction) -> CmdResult {
    let repo = open_repository()?;

    match action {
        EventAction::Add {
            title,
            start,
            end,
            category,
            location,
            travel_time,
            repetition,
            notes,
            participants,
        } => {
            let mut event = Event::new(title, start, end.unwrap_or(start + Duration::hours(1)))?
                .with_travel_time(travel_time)
                .with_participants(participants.as_deref().map(parse_participants).unwrap_or_default());
            replace(&mut event.category, category.map(|c| c.to_uppercase()));
            replace(&mut event.location, location);
            replace(&mut event.repetition, repetition.map(|r| r.to_uppercase()));
            replace(&mut event.notes, notes);

            let write = repo.add_event(&event)?;
            println!("Event created: {}", event.id);
            print_json(&event)?;
            finish_push("event add", write.push).await;
        }
        EventAction::List { date } => {
            let events = match date {
                Some(day) => repo.events_on(day)?,
                None => repo.events()?,
            };
            print_json(&events)?;
        }
        EventAction::Update {
            id,
            title,
            start,
            end,
            category,
            location,
            travel_time,
            repetition,
            notes,
            participants,
        } => {
            let mut event = repo.event(&id)?.ok_or_else(|| ValidationError::NotFound {
                kind: "event",
                id: id.clone(),
            })?;
            if let Some(title) = title {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return Err(ValidationError::EmptyField("title").into());
                }
                event.title = title;
            }
            if let Some(start) = start {
                event.start = start;
            }
            if let Some(end) = end {
                event.end = end;
            }
            if let Some(minutes) = travel_time {
                event.travel_time = minutes;
            }
            if let Some(raw) = participants {
                event.participants = parse_participants(&raw);
            }
            replace(&mut event.category, category.map(|c| c.to_uppercase()));
            replace(&mut event.location, location);
            replace(&mut event.repetition, repetition.map(|r| r.to_uppercase()));
            replace(&mut event.notes, notes);

            let write = repo.update_event(&event)?;
            println!("Event updated: {id}");
            print_json(&event)?;
            finish_push("event update", write.push).await;
        }
        EventAction::Delete { id } => {
            let write = repo.delete_event(&id)?;
            if !write.applied {
                return Err(ValidationError::NotFound { kind: "event", id }.into());
            }
            println!("Event deleted: {id}");
            finish_push("event delete", write.push).await;
        }
    }
    Ok(())
}
