use rusqlite::Connection;

use crate::error::TutorResult;

/// Initialize the database schema. Creates all tables if they don't exist.
///
/// `position` is the person's place in the displayed list. Relations are
/// stored per side, so a one-sided link survives a save/load cycle as is.
pub fn initialize(conn: &Connection) -> TutorResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS persons (
            position INTEGER PRIMARY KEY NOT NULL,
            role TEXT NOT NULL,
            name TEXT NOT NULL,
            phone TEXT NOT NULL,
            email TEXT NOT NULL,
            address TEXT NOT NULL,
            zoom_link TEXT,
            grade_level TEXT,
            fees REAL,
            exam_details TEXT,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS person_tags (
            person_position INTEGER NOT NULL REFERENCES persons(position) ON DELETE CASCADE,
            tag TEXT NOT NULL,
            PRIMARY KEY (person_position, tag)
        );

        CREATE TABLE IF NOT EXISTS student_subjects (
            person_position INTEGER NOT NULL REFERENCES persons(position) ON DELETE CASCADE,
            subject TEXT NOT NULL,
            PRIMARY KEY (person_position, subject)
        );

        CREATE TABLE IF NOT EXISTS relations (
            owner_position INTEGER NOT NULL REFERENCES persons(position) ON DELETE CASCADE,
            related_position INTEGER NOT NULL REFERENCES persons(position) ON DELETE CASCADE,
            sequence INTEGER NOT NULL,
            PRIMARY KEY (owner_position, related_position)
        );

        PRAGMA foreign_keys = ON;
        ",
    )?;
    Ok(())
}

/// Create an in-memory connection for testing. Available in test builds.
pub fn test_connection() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    initialize(&conn).unwrap();
    conn
}
