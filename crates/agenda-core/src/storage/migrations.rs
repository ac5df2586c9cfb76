//! Database schema versioning for agenda.
//!
//! There is no data migration: when the stored `schema_version` is older
//! than [`SCHEMA_VERSION`], the task and event tables are dropped and
//! recreated. Preferences (including the device identity) are kept.

use rusqlite::{Connection, Result as SqliteResult};
use tracing::{info, warn};

/// Current schema version.
///
/// Increment this when the `todos` or `events` layout changes.
pub const SCHEMA_VERSION: i32 = 1;

/// Bring the database to the current schema version.
///
/// # Errors
/// Returns an error if any statement fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;
    create_prefs_table(conn)?;

    let current_version = get_schema_version(conn)?;
    if current_version < SCHEMA_VERSION {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(
            "DROP TABLE IF EXISTS todos;
             DROP TABLE IF EXISTS events;",
        )?;
        create_entity_tables(&tx)?;
        set_schema_version(&tx, SCHEMA_VERSION)?;
        tx.commit()?;
        if current_version > 0 {
            warn!(
                from = current_version,
                to = SCHEMA_VERSION,
                "schema upgraded; local tasks and events were reset"
            );
        } else {
            info!(version = SCHEMA_VERSION, "created task and event tables");
        }
    } else {
        create_entity_tables(conn)?;
    }

    Ok(())
}

/// Stored schema version, 0 for a fresh database.
///
/// # Errors
/// Any failure other than a missing row is returned, so a locked or
/// unreadable database is never mistaken for an outdated one.
pub fn get_schema_version(conn: &Connection) -> SqliteResult<i32> {
    match conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e),
    }
}

/// Overwrite the stored schema version.
pub fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

fn create_prefs_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS prefs (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )
}

fn create_entity_tables(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS todos (
            _id         TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            category    TEXT,
            description TEXT,
            priority    INTEGER
        );

        CREATE TABLE IF NOT EXISTS events (
            _id          TEXT PRIMARY KEY,
            title        TEXT NOT NULL,
            start_time   TEXT NOT NULL,
            end_time     TEXT NOT NULL,
            location     TEXT,
            travel_time  INTEGER,
            repetition   TEXT,
            description  TEXT,
            category     TEXT,
            participants TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_events_start_time ON events(start_time);",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn fresh_database_gets_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(table_exists(&conn, "todos"));
        assert!(table_exists(&conn, "events"));
        assert!(table_exists(&conn, "prefs"));
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn.execute(
            "INSERT INTO todos (_id, title, priority) VALUES ('1', 'keep me', 1)",
            [],
        )
        .unwrap();
        migrate(&conn).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM todos", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn outdated_schema_drops_entities_but_keeps_prefs() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn.execute(
            "INSERT INTO todos (_id, title, priority) VALUES ('1', 'old', 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO prefs (key, value) VALUES ('cloud.uuid', 'abc')",
            [],
        )
        .unwrap();
        set_schema_version(&conn, 0).unwrap();

        migrate(&conn).unwrap();

        let todos: i64 = conn
            .query_row("SELECT COUNT(*) FROM todos", [], |row| row.get(0))
            .unwrap();
        let prefs: i64 = conn
            .query_row("SELECT COUNT(*) FROM prefs", [], |row| row.get(0))
            .unwrap();
        assert_eq!(todos, 0);
        assert_eq!(prefs, 1);
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn unreadable_version_fails_without_dropping_data() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_schema_version(&conn).ok(), None);
        migrate(&conn).unwrap();
        conn.execute(
            "INSERT INTO todos (_id, title, priority) VALUES ('1', 'keep me', 1)",
            [],
        )
        .unwrap();
        // A version that cannot be read as an integer.
        conn.execute_batch(
            "DROP TABLE schema_version;
             CREATE VIEW schema_version AS SELECT 'one' AS version;",
        )
        .unwrap();

        assert!(get_schema_version(&conn).is_err());
        assert!(migrate(&conn).is_err());
        let todos: i64 = conn
            .query_row("SELECT COUNT(*) FROM todos", [], |row| row.get(0))
            .unwrap();
        assert_eq!(todos, 1);
    }

    #[test]
    fn empty_version_table_reads_as_zero() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn.execute("DELETE FROM schema_version", []).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
    }
}
