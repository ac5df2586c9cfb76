//! Local CRUD for the `todos` table.

use rusqlite::{params, OptionalExtension, Row};
use tracing::{debug, warn};

use super::Database;
use crate::error::DatabaseError;
use crate::model::{Category, Priority, Task};

const TASK_COLUMNS: &str = "_id, title, category, description, priority";

fn row_to_task(row: &Row) -> Result<Task, rusqlite::Error> {
    let id: String = row.get(0)?;
    let category = row
        .get::<_, Option<String>>(2)?
        .and_then(|name| match Category::from_name(&name) {
            Some(c) => Some(c),
            None => {
                warn!(task_id = %id, category = %name, "unknown category in todos table");
                None
            }
        });
    let priority = row
        .get::<_, Option<i32>>(4)?
        .map(Priority::from_value)
        .unwrap_or_default();

    Ok(Task {
        id,
        title: row.get(1)?,
        category,
        description: row.get(3)?,
        priority,
    })
}

impl Database {
    /// Insert a new task.
    ///
    /// # Errors
    /// Returns [`DatabaseError::DuplicateId`] if a task with the same id exists.
    pub fn insert_task(&self, task: &Task) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO todos (_id, title, category, description, priority)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                task.id,
                task.title,
                task.category.map(|c| c.name()),
                task.description,
                task.priority.value(),
            ],
        )?;
        debug!(task_id = %task.id, title = %task.title, "task inserted");
        Ok(())
    }

    /// Overwrite an existing task. Returns whether a row was updated.
    pub fn update_task(&self, task: &Task) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE todos SET title = ?2, category = ?3, description = ?4, priority = ?5
             WHERE _id = ?1",
            params![
                task.id,
                task.title,
                task.category.map(|c| c.name()),
                task.description,
                task.priority.value(),
            ],
        )?;
        debug!(task_id = %task.id, changed, "task update");
        Ok(changed > 0)
    }

    pub fn get_task(&self, id: &str) -> Result<Option<Task>, DatabaseError> {
        let task = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM todos WHERE _id = ?1"),
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// All tasks in insertion order.
    pub fn list_tasks(&self) -> Result<Vec<Task>, DatabaseError> {
        self.query_tasks(&format!("SELECT {TASK_COLUMNS} FROM todos ORDER BY rowid"))
    }

    /// All tasks, most urgent first, ties broken by title.
    pub fn list_tasks_by_priority(&self) -> Result<Vec<Task>, DatabaseError> {
        self.query_tasks(&format!(
            "SELECT {TASK_COLUMNS} FROM todos
             ORDER BY COALESCE(priority, 4) ASC, title COLLATE NOCASE ASC"
        ))
    }

    fn query_tasks(&self, sql: &str) -> Result<Vec<Task>, DatabaseError> {
        let mut stmt = self.conn.prepare(sql)?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Delete one task. Returns whether a row was removed.
    pub fn delete_task(&self, id: &str) -> Result<bool, DatabaseError> {
        let removed = self
            .conn
            .execute("DELETE FROM todos WHERE _id = ?1", params![id])?;
        if removed > 0 {
            debug!(task_id = %id, "task deleted");
        } else {
            debug!(task_id = %id, "no task to delete");
        }
        Ok(removed > 0)
    }

    /// Delete every task and return the ids that were removed.
    pub fn delete_all_tasks(&self) -> Result<Vec<String>, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        let ids = {
            let mut stmt = tx.prepare("SELECT _id FROM todos ORDER BY rowid")?;
            let ids = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            ids
        };
        tx.execute("DELETE FROM todos", [])?;
        tx.commit()?;
        debug!(count = ids.len(), "all tasks deleted");
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, title: &str, category: Option<Category>, priority: Priority) -> Task {
        Task {
            id: id.into(),
            title: title.into(),
            category,
            description: Some(format!("{title} description")),
            priority,
        }
    }

    #[test]
    fn insert_and_get() {
        let db = Database::open_memory().unwrap();
        let t = task("1", "Testaufgabe", Some(Category::Work), Priority::UrgentImportant);
        db.insert_task(&t).unwrap();
        assert_eq!(db.get_task("1").unwrap(), Some(t));
        assert!(db.get_task("2").unwrap().is_none());
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let db = Database::open_memory().unwrap();
        let t = task("1", "a", None, Priority::default());
        db.insert_task(&t).unwrap();
        assert!(matches!(db.insert_task(&t), Err(DatabaseError::DuplicateId(_))));
    }

    #[test]
    fn missing_category_round_trips_as_none() {
        let db = Database::open_memory().unwrap();
        db.insert_task(&task("1", "a", None, Priority::NotUrgentImportant)).unwrap();
        let stored = db.get_task("1").unwrap().unwrap();
        assert!(stored.category.is_none());
        assert_eq!(stored.priority, Priority::NotUrgentImportant);
    }

    #[test]
    fn update_overwrites_fields() {
        let db = Database::open_memory().unwrap();
        let mut t = task("1", "a", None, Priority::default());
        assert!(!db.update_task(&t).unwrap());
        db.insert_task(&t).unwrap();

        t.title = "renamed".into();
        t.category = Some(Category::Sport);
        t.priority = Priority::UrgentNotImportant;
        assert!(db.update_task(&t).unwrap());
        assert_eq!(db.get_task("1").unwrap(), Some(t));
    }

    #[test]
    fn sorted_by_priority() {
        let db = Database::open_memory().unwrap();
        db.insert_task(&task("1", "b", None, Priority::NotUrgentNotImportant)).unwrap();
        db.insert_task(&task("2", "z", None, Priority::UrgentImportant)).unwrap();
        db.insert_task(&task("3", "a", None, Priority::UrgentImportant)).unwrap();
        let ids: Vec<_> = db
            .list_tasks_by_priority()
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn delete_by_id() {
        let db = Database::open_memory().unwrap();
        db.insert_task(&task("1", "Aufgabe 1", Some(Category::Work), Priority::UrgentImportant)).unwrap();
        db.insert_task(&task("2", "Aufgabe 2", Some(Category::University), Priority::NotUrgentImportant)).unwrap();

        assert!(db.delete_task("1").unwrap());
        assert!(!db.delete_task("1").unwrap());

        let tasks = db.list_tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "2");
    }

    #[test]
    fn delete_all_returns_removed_ids() {
        let db = Database::open_memory().unwrap();
        db.insert_task(&task("1", "a", None, Priority::default())).unwrap();
        db.insert_task(&task("2", "b", None, Priority::default())).unwrap();
        assert_eq!(db.delete_all_tasks().unwrap(), vec!["1", "2"]);
        assert!(db.list_tasks().unwrap().is_empty());
        assert!(db.delete_all_tasks().unwrap().is_empty());
    }

    #[test]
    fn unknown_stored_category_reads_as_none() {
        let db = Database::open_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO todos (_id, title, category, priority) VALUES ('x', 't', 'GARDEN', NULL)",
                [],
            )
            .unwrap();
        let stored = db.get_task("x").unwrap().unwrap();
        assert!(stored.category.is_none());
        assert_eq!(stored.priority, Priority::NotUrgentNotImportant);
    }
}
