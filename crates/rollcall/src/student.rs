//! Core student types for rollcall.
//!
//! This module defines the student entity stored by the persistence layer and
//! the raw form input submitted by the presentation layer, along with the
//! trimming and required-field validation that sits between them.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A student record.
///
/// The canonical copy lives in the storage layer; everything else only ever
/// holds transient snapshots for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Unique identifier (assigned by the storage layer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Full name. Always non-empty once stored.
    pub name: String,

    /// Human-assigned roll number. Always non-empty and unique once stored.
    pub roll: String,

    /// Course of study, if known.
    pub course: Option<String>,

    /// Contact email, if known.
    pub email: Option<String>,
}

impl Student {
    /// Plain-string snapshot for template rendering.
    ///
    /// Optional fields render as empty strings, and an unsaved student
    /// renders with id 0 (templates only use the id for edit/delete links,
    /// which are never shown for unsaved rows).
    #[must_use]
    pub fn view(&self) -> StudentView {
        StudentView {
            id: self.id.unwrap_or(0),
            name: self.name.clone(),
            roll: self.roll.clone(),
            course: self.course.clone().unwrap_or_default(),
            email: self.email.clone().unwrap_or_default(),
        }
    }
}

/// Read-only student snapshot with all fields as plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentView {
    /// Row identifier.
    pub id: i64,
    /// Full name.
    pub name: String,
    /// Roll number.
    pub roll: String,
    /// Course of study; empty when unknown.
    pub course: String,
    /// Contact email; empty when unknown.
    pub email: String,
}

/// Raw student form input, exactly as submitted.
///
/// All fields arrive as untrimmed text; [`StudentForm::validated`] is the
/// only path from here to a [`Student`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentForm {
    /// Submitted name.
    pub name: String,
    /// Submitted roll.
    pub roll: String,
    /// Submitted course; may be blank.
    pub course: String,
    /// Submitted email; may be blank.
    pub email: String,
}

impl StudentForm {
    /// Validate the submitted values and produce an unsaved [`Student`].
    ///
    /// All inputs are trimmed; blank optional fields become `None`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if `name` or `roll` is empty after
    /// trimming. Roll uniqueness is checked later, against the store.
    pub fn validated(&self) -> Result<Student> {
        let name = self.name.trim();
        let roll = self.roll.trim();
        let course = self.course.trim();
        let email = self.email.trim();

        if name.is_empty() {
            return Err(Error::missing_field("name"));
        }
        if roll.is_empty() {
            return Err(Error::missing_field("roll"));
        }

        Ok(Student {
            id: None,
            name: name.to_string(),
            roll: roll.to_string(),
            course: (!course.is_empty()).then(|| course.to_string()),
            email: (!email.is_empty()).then(|| email.to_string()),
        })
    }
}

impl From<&Student> for StudentForm {
    /// Pre-fill a form with a student's current values (edit view).
    fn from(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            roll: student.roll.clone(),
            course: student.course.clone().unwrap_or_default(),
            email: student.email.clone().unwrap_or_default(),
        }
    }
}
