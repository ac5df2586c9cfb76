//! Task management commands for CLI.

use agenda_core::{Category, Priority, Task, ValidationError};
use chrono::{Local, NaiveDate};
use clap::Subcommand;

use super::{finish_push, open_repository, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Add {
        /// Task title
        title: String,
        /// Category: university, work, household or sport
        #[arg(long)]
        category: Option<Category>,
        /// Task description
        #[arg(long)]
        description: Option<String>,
        /// Priority 1-4 or a quadrant name (default: 4, not urgent / not important)
        #[arg(long, default_value = "4")]
        priority: Priority,
    },
    /// List local tasks
    List {
        /// Order by priority instead of creation
        #[arg(long)]
        by_priority: bool,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New category
        #[arg(long)]
        category: Option<Category>,
        /// New description (empty clears it)
        #[arg(long)]
        description: Option<String>,
        /// New priority
        #[arg(long)]
        priority: Option<Priority>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Delete all tasks
    Clear,
    /// Turn a task into a one-hour event starting now, or 09:00 on --date
    ToEvent {
        /// Task ID
        id: String,
        /// Day to schedule on (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub async fn run(action: TaskAction) -> CmdResult {
    let repo = open_repository()?;

    match action {
        TaskAction::Add {
            title,
            category,
            description,
            priority,
        } => {
            let task = Task::new(title, category, description, priority)?;
            let write = repo.add_task(&task)?;
            println!("Task created: {}", task.id);
            print_json(&task)?;
            finish_push("task add", write.push).await;
        }
        TaskAction::List { by_priority } => {
            let tasks = if by_priority {
                repo.tasks_by_priority()?
            } else {
                repo.tasks()?
            };
            print_json(&tasks)?;
        }
        TaskAction::Update {
            id,
            title,
            category,
            description,
            priority,
        } => {
            let mut task = repo.task(&id)?.ok_or_else(|| ValidationError::NotFound {
                kind: "task",
                id: id.clone(),
            })?;
            if let Some(title) = title {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return Err(ValidationError::EmptyField("title").into());
                }
                task.title = title;
            }
            if category.is_some() {
                task.category = category;
            }
            if let Some(description) = description {
                task.description = Some(description).filter(|d| !d.trim().is_empty());
            }
            if let Some(priority) = priority {
                task.priority = priority;
            }

            let write = repo.update_task(&task)?;
            println!("Task updated: {id}");
            print_json(&task)?;
            finish_push("task update", write.push).await;
        }
        TaskAction::Delete { id } => {
            let write = repo.delete_task(&id)?;
            if !write.applied {
                return Err(ValidationError::NotFound { kind: "task", id }.into());
            }
            println!("Task deleted: {id}");
            finish_push("task delete", write.push).await;
        }
        TaskAction::Clear => {
            let (ids, push) = repo.delete_all_tasks()?;
            println!("Deleted {} task(s)", ids.len());
            finish_push("task clear", push).await;
        }
        TaskAction::ToEvent { id, date } => {
            let (event, write) = match date {
                Some(day) => repo.event_from_task_on(&id, day)?,
                None => repo.event_from_task(&id, Local::now().naive_local())?,
            };
            println!("Event created: {}", event.id);
            print_json(&event)?;
            finish_push("task to-event", write.push).await;
        }
    }
    Ok(())
}
