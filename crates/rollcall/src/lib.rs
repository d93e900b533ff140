//! `rollcall` - a student-record management web service
//!
//! This library provides a CRUD layer over a single `SQLite` table of
//! student records, a validation service on top of it, and an HTTP
//! presentation layer rendered through server-side templates.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod records;
pub mod storage;
pub mod student;
pub mod web;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use records::Records;
pub use storage::Storage;
pub use student::{Student, StudentForm};
