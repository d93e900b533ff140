//! `SQLite` schema definitions for rollcall.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the students table.
///
/// The `UNIQUE` constraint on `roll` is the authority for roll uniqueness;
/// service-level pre-checks only exist to produce friendlier messages.
pub const CREATE_STUDENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS students (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    roll TEXT NOT NULL UNIQUE,
    course TEXT,
    email TEXT
)
";

/// SQL statement to create an index on `roll` for uniqueness lookups.
pub const CREATE_ROLL_INDEX: &str = r"
CREATE UNIQUE INDEX IF NOT EXISTS idx_students_roll ON students(roll)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_STUDENTS_TABLE,
    CREATE_ROLL_INDEX,
    CREATE_METADATA_TABLE,
];
