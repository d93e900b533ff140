//! Storage layer for rollcall.
//!
//! This module provides `SQLite`-based persistent storage for student
//! records, including substring search and storage-level roll uniqueness.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::student::Student;

/// Storage engine for student records.
///
/// Provides persistent storage using `SQLite` with support for:
/// - Record insertion with a `UNIQUE` roll constraint
/// - Case-insensitive substring search across all text fields
/// - In-place updates and permanent deletes
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

/// Columns selected by every student query, in `row_to_student` order.
const STUDENT_COLUMNS: &str = "id, name, roll, course, email";

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Enable WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        // Initialize schema
        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a student and return the assigned row id.
    ///
    /// The `UNIQUE` constraint on `roll` is enforced by the database, so a
    /// racing insert with the same roll cannot slip past a prior existence
    /// check.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRoll`] if the roll is already taken, or a
    /// database error for any other failure.
    pub fn insert(&self, student: &Student) -> Result<i64> {
        self.conn
            .execute(
                r"
                INSERT INTO students (name, roll, course, email)
                VALUES (?1, ?2, ?3, ?4)
                ",
                params![student.name, student.roll, student.course, student.email],
            )
            .map_err(|e| map_roll_conflict(e, &student.roll))?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted student with id {}", id);
        Ok(id)
    }

    /// Get a student by row id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, id: i64) -> Result<Option<Student>> {
        let result = self
            .conn
            .query_row(
                &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1"),
                [id],
                Self::row_to_student,
            )
            .optional()?;
        Ok(result)
    }

    /// List all students in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list(&self) -> Result<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {STUDENT_COLUMNS} FROM students ORDER BY id"))?;

        let students = stmt
            .query_map([], Self::row_to_student)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(students)
    }

    /// Search students by a case-insensitive substring.
    ///
    /// Matches when the query is contained in `name`, `roll`, `course`, or
    /// `email`; NULL optional fields are treated as empty strings.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn search(&self, query: &str) -> Result<Vec<Student>> {
        let pattern = format!("%{}%", query.to_lowercase());
        let mut stmt = self.conn.prepare(&format!(
            r"
            SELECT {STUDENT_COLUMNS} FROM students
            WHERE lower(name) LIKE ?1
               OR lower(roll) LIKE ?1
               OR lower(coalesce(course, '')) LIKE ?1
               OR lower(coalesce(email, '')) LIKE ?1
            ORDER BY id
            "
        ))?;

        let students = stmt
            .query_map([pattern], Self::row_to_student)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(students)
    }

    /// Check whether a roll is already taken.
    ///
    /// Passing `exclude_id` skips that row, so a student can keep its own
    /// unchanged roll during an update.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn roll_exists(&self, roll: &str, exclude_id: Option<i64>) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM students WHERE roll = ?1 AND (?2 IS NULL OR id <> ?2)",
            params![roll, exclude_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Overwrite all editable fields of a stored student.
    ///
    /// The single `UPDATE` statement rewrites all four fields together, so a
    /// failure leaves the row untouched. Returns `false` if no row has the
    /// student's id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRoll`] if another row holds the new roll,
    /// [`Error::Internal`] if the student has no id, or a database error for
    /// any other failure.
    pub fn update(&self, student: &Student) -> Result<bool> {
        let Some(id) = student.id else {
            return Err(Error::internal("update requires a stored student id"));
        };

        let affected = self
            .conn
            .execute(
                r"
                UPDATE students SET name = ?1, roll = ?2, course = ?3, email = ?4
                WHERE id = ?5
                ",
                params![student.name, student.roll, student.course, student.email, id],
            )
            .map_err(|e| map_roll_conflict(e, &student.roll))?;

        if affected > 0 {
            debug!("Updated student with id {}", id);
        }
        Ok(affected > 0)
    }

    /// Delete a student by id.
    ///
    /// Returns `true` if a row was deleted, `false` if not found. The delete
    /// is a single statement, so a failure leaves no partial state.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM students WHERE id = ?1", [id])?;
        if affected > 0 {
            debug!("Deleted student with id {}", id);
        }
        Ok(affected > 0)
    }

    /// Count total students in storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Convert a database row to a Student struct.
    fn row_to_student(row: &rusqlite::Row) -> rusqlite::Result<Student> {
        Ok(Student {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            roll: row.get(2)?,
            course: row.get(3)?,
            email: row.get(4)?,
        })
    }
}

/// Translate a `UNIQUE` constraint violation into [`Error::DuplicateRoll`].
///
/// The roll constraint is the only uniqueness constraint in the schema, so
/// any constraint violation from an insert/update means a roll conflict.
fn map_roll_conflict(err: rusqlite::Error, roll: &str) -> Error {
    match err {
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::duplicate_roll(roll)
        }
        other => other.into(),
    }
}
