//! HTTP layer for rollcall.
//!
//! Maps routes onto the record service and renders responses through the
//! template registry. Mutations follow redirect-after-POST: a successful
//! write answers with a redirect to the list view carrying a one-shot
//! `flash` code, which the next render maps back to a message. No message
//! state lives outside the request/response cycle.

pub mod templates;

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use minijinja::context;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::records::Records;
use crate::student::{Student, StudentForm};

/// Shared state for all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    records: Arc<Records>,
}

impl AppState {
    /// Wrap a record service for use as router state.
    #[must_use]
    pub fn new(records: Records) -> Self {
        Self {
            records: Arc::new(records),
        }
    }
}

/// Build the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/about", get(about))
        .route("/contact", get(contact_page).post(contact_submit))
        .route("/students/new", get(add_student_page).post(add_student_submit))
        .route(
            "/students/:id/edit",
            get(edit_student_page).post(edit_student_submit),
        )
        .route("/students/:id/delete", post(delete_student))
        .with_state(state)
}

/// Serve the application at the given address (e.g. `"127.0.0.1:8080"`).
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

/// One-shot notice rendered by the next page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
struct Flash {
    category: &'static str,
    message: &'static str,
}

/// Map a redirect `flash` code to its message. Unknown codes are ignored.
fn flash_for(code: &str) -> Option<Flash> {
    let flash = match code {
        "created" => Flash {
            category: "success",
            message: "Student added.",
        },
        "updated" => Flash {
            category: "success",
            message: "Student updated.",
        },
        "deleted" => Flash {
            category: "success",
            message: "Student deleted successfully.",
        },
        "delete-failed" => Flash {
            category: "danger",
            message: "Error deleting student. Please try again.",
        },
        "sent" => Flash {
            category: "success",
            message: "Thank you for your message. We will get back to you shortly.",
        },
        _ => return None,
    };
    Some(flash)
}

/// Contact form input. Displayed and validated, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    /// Sender name.
    pub name: String,
    /// Sender email.
    pub email: String,
    /// Message body.
    pub message: String,
}

impl ContactForm {
    /// Check that all three fields are non-empty after trimming.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.message.trim().is_empty()
    }
}

/// Query parameters accepted by the list view.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListParams {
    q: Option<String>,
    flash: Option<String>,
}

/// Query parameters accepted by the contact view.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ContactParams {
    flash: Option<String>,
}

/// Error wrapper that renders infrastructure failures as responses.
///
/// Validation errors never reach this type; handlers re-render their form
/// instead. What's left is either a missing student (404) or an internal
/// failure (500) that is logged and shown as a generic message.
#[derive(Debug)]
struct WebError(Error);

impl From<Error> for WebError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.0.is_not_found() {
            (
                StatusCode::NOT_FOUND,
                Html("<h1>Not Found</h1><p>No such student.</p>".to_string()),
            )
                .into_response()
        } else {
            error!("Request failed: {}", self.0);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Something went wrong</h1><p>Please try again.</p>".to_string()),
            )
                .into_response()
        }
    }
}

type HandlerResult = std::result::Result<Response, WebError>;

/// `GET /` - list students, optionally filtered by `?q=`.
async fn home(State(state): State<AppState>, Query(params): Query<ListParams>) -> HandlerResult {
    let q = params.q.unwrap_or_default();
    let students = state.records.list(Some(&q))?;
    let views: Vec<_> = students.iter().map(Student::view).collect();
    let flash = params.flash.as_deref().and_then(flash_for);

    let html = templates::render(
        "index.html",
        context! {
            active => "home",
            q => q,
            students => views,
            flash => flash,
        },
    )?;
    Ok(Html(html).into_response())
}

/// `GET /about` - static informational page.
async fn about() -> HandlerResult {
    let html = templates::render("about.html", context! { active => "about" })?;
    Ok(Html(html).into_response())
}

/// `GET /contact` - contact form.
async fn contact_page(Query(params): Query<ContactParams>) -> HandlerResult {
    let flash = params.flash.as_deref().and_then(flash_for);
    let html = templates::render(
        "contact.html",
        context! {
            active => "contact",
            form => ContactForm::default(),
            error => (),
            flash => flash,
        },
    )?;
    Ok(Html(html).into_response())
}

/// `POST /contact` - validate the three required fields; nothing persists.
async fn contact_submit(Form(form): Form<ContactForm>) -> HandlerResult {
    if !form.is_complete() {
        let html = templates::render(
            "contact.html",
            context! {
                active => "contact",
                form => form,
                error => "All contact fields are required.",
                flash => (),
            },
        )?;
        return Ok(Html(html).into_response());
    }

    Ok(Redirect::to("/contact?flash=sent").into_response())
}

/// `GET /students/new` - blank add form.
async fn add_student_page() -> HandlerResult {
    render_add_form(&StudentForm::default(), None)
}

/// `POST /students/new` - run Create; redirect on success, re-display the
/// submitted values on validation failure.
async fn add_student_submit(
    State(state): State<AppState>,
    Form(form): Form<StudentForm>,
) -> HandlerResult {
    match state.records.create(&form) {
        Ok(_) => Ok(Redirect::to("/?flash=created").into_response()),
        Err(err) if err.is_validation() => render_add_form(&form, Some(err.to_string())),
        Err(err) => Err(err.into()),
    }
}

/// `GET /students/:id/edit` - edit form pre-filled with current values.
async fn edit_student_page(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult {
    let student = state.records.get(id)?;
    render_edit_form(id, &StudentForm::from(&student), None)
}

/// `POST /students/:id/edit` - run Update; redirect on success, re-display
/// the submitted values on validation failure.
async fn edit_student_submit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<StudentForm>,
) -> HandlerResult {
    match state.records.update(id, &form) {
        Ok(()) => Ok(Redirect::to("/?flash=updated").into_response()),
        Err(err) if err.is_validation() => render_edit_form(id, &form, Some(err.to_string())),
        Err(err) => Err(err.into()),
    }
}

/// `POST /students/:id/delete` - run Delete.
///
/// A storage failure is absorbed into a generic notice on the list view
/// rather than an error page; the single-statement delete left no partial
/// state behind.
async fn delete_student(State(state): State<AppState>, Path(id): Path<i64>) -> HandlerResult {
    match state.records.delete(id) {
        Ok(()) => Ok(Redirect::to("/?flash=deleted").into_response()),
        Err(err) if err.is_not_found() => Err(err.into()),
        Err(err) => {
            error!("Delete failed for student {}: {}", id, err);
            Ok(Redirect::to("/?flash=delete-failed").into_response())
        }
    }
}

fn render_add_form(form: &StudentForm, error: Option<String>) -> HandlerResult {
    let html = templates::render(
        "add_student.html",
        context! {
            active => "add",
            form => form,
            error => error,
        },
    )?;
    Ok(Html(html).into_response())
}

fn render_edit_form(id: i64, form: &StudentForm, error: Option<String>) -> HandlerResult {
    let html = templates::render(
        "edit_student.html",
        context! {
            active => "home",
            id => id,
            form => form,
            error => error,
        },
    )?;
    Ok(Html(html).into_response())
}
