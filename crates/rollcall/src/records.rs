//! Record service for rollcall.
//!
//! This module applies validation on top of the storage layer and owns the
//! decision of which error to surface: required-field and duplicate-roll
//! failures are user-correctable, missing ids are not.
//!
//! The service holds the storage connection behind a mutex; each operation
//! locks, runs to completion, and unlocks, so requests never observe a
//! half-applied mutation. Roll uniqueness under racing writers is still
//! guaranteed by the storage-level `UNIQUE` constraint, not by the friendly
//! pre-check here.

use std::sync::{Mutex, MutexGuard};

use tracing::info;

use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::student::{Student, StudentForm};

/// The student record service.
#[derive(Debug)]
pub struct Records {
    storage: Mutex<Storage>,
}

impl Records {
    /// Create a record service over the given storage.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self {
            storage: Mutex::new(storage),
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, Storage>> {
        self.storage
            .lock()
            .map_err(|_| Error::internal("storage lock poisoned"))
    }

    /// List students, optionally filtered by a case-insensitive substring.
    ///
    /// A blank or absent filter returns every student in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage query fails.
    pub fn list(&self, filter: Option<&str>) -> Result<Vec<Student>> {
        let store = self.store()?;
        match filter.map(str::trim) {
            Some(query) if !query.is_empty() => store.search(query),
            _ => store.list(),
        }
    }

    /// Validate a submitted form and create a new student.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if `name` or `roll` is blank,
    /// [`Error::DuplicateRoll`] if the roll is taken, or a storage error.
    pub fn create(&self, form: &StudentForm) -> Result<i64> {
        let student = form.validated()?;

        let store = self.store()?;
        // Friendly pre-check; the UNIQUE constraint is the real guard.
        if store.roll_exists(&student.roll, None)? {
            return Err(Error::duplicate_roll(&student.roll));
        }

        let id = store.insert(&student)?;
        info!("Created student {} with roll {}", id, student.roll);
        Ok(id)
    }

    /// Fetch a single student.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StudentNotFound`] if no row has the id, or a storage
    /// error.
    pub fn get(&self, id: i64) -> Result<Student> {
        self.store()?.get(id)?.ok_or_else(|| Error::not_found(id))
    }

    /// Validate a submitted form and overwrite an existing student.
    ///
    /// All four editable fields are rewritten together. A student may keep
    /// its own unchanged roll.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StudentNotFound`] if the id does not exist,
    /// [`Error::MissingField`] / [`Error::DuplicateRoll`] on validation
    /// failure, or a storage error.
    pub fn update(&self, id: i64, form: &StudentForm) -> Result<()> {
        let mut student = form.validated()?;
        student.id = Some(id);

        let store = self.store()?;
        if store.get(id)?.is_none() {
            return Err(Error::not_found(id));
        }
        if store.roll_exists(&student.roll, Some(id))? {
            return Err(Error::duplicate_roll(&student.roll));
        }

        if !store.update(&student)? {
            return Err(Error::not_found(id));
        }
        info!("Updated student {}", id);
        Ok(())
    }

    /// Permanently delete a student.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StudentNotFound`] if no row has the id, or a storage
    /// error (the single-statement delete leaves no partial state).
    pub fn delete(&self, id: i64) -> Result<()> {
        if !self.store()?.delete(id)? {
            return Err(Error::not_found(id));
        }
        info!("Deleted student {}", id);
        Ok(())
    }

    /// Count stored students.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage query fails.
    pub fn count(&self) -> Result<i64> {
        self.store()?.count()
    }
}
