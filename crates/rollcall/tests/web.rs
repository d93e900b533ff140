//! HTTP integration tests.
//!
//! Starts an axum server on an ephemeral port and exercises the full
//! request surface with reqwest.

use rollcall::web::{self, AppState};
use rollcall::{Records, Storage};

/// Bind to port 0 and return the server's base URL.
async fn start_server() -> String {
    let records = Records::new(Storage::open_in_memory().expect("in-memory storage"));
    let app = web::router(AppState::new(records));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn student_form(name: &str, roll: &str, course: &str, email: &str) -> Vec<(&'static str, String)> {
    vec![
        ("name", name.to_string()),
        ("roll", roll.to_string()),
        ("course", course.to_string()),
        ("email", email.to_string()),
    ]
}

async fn add_student(client: &reqwest::Client, base: &str, name: &str, roll: &str, course: &str) {
    let resp = client
        .post(format!("{base}/students/new"))
        .form(&student_form(name, roll, course, ""))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn empty_list_page() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client.get(&base).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body = resp.text().await.unwrap();
    assert!(body.contains("Students"));
    assert!(body.contains("No students found"));
}

#[tokio::test]
async fn add_student_redirects_to_list_with_notice() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/students/new"))
        .form(&student_form("Ann Lee", "R100", "CS", "ann@x.com"))
        .send()
        .await
        .unwrap();

    // Followed the redirect back to the list view
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.url().path(), "/");

    let body = resp.text().await.unwrap();
    assert!(body.contains("Student added."));
    assert!(body.contains("Ann Lee"));
    assert!(body.contains("R100"));
}

#[tokio::test]
async fn mutation_answers_with_redirect_not_a_page() {
    let base = start_server().await;
    let no_redirect = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let resp = no_redirect
        .post(format!("{base}/students/new"))
        .form(&student_form("Ann", "R1", "", ""))
        .send()
        .await
        .unwrap();

    assert!(resp.status().is_redirection());
    let location = resp.headers().get("location").unwrap().to_str().unwrap();
    assert_eq!(location, "/?flash=created");
}

#[tokio::test]
async fn add_student_missing_roll_preserves_input() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/students/new"))
        .form(&student_form("Ann Lee", "   ", "CS", ""))
        .send()
        .await
        .unwrap();

    // No redirect: the form is re-rendered with the submitted values
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("roll is required"));
    assert!(body.contains("value=\"Ann Lee\""));
    assert!(body.contains("value=\"CS\""));

    // Nothing was stored
    let list = client.get(&base).send().await.unwrap().text().await.unwrap();
    assert!(list.contains("No students found"));
}

#[tokio::test]
async fn add_student_duplicate_roll_rejected() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    add_student(&client, &base, "Ann", "R100", "CS").await;

    let resp = client
        .post(format!("{base}/students/new"))
        .form(&student_form("Bob", "R100", "EE", ""))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("already exists"));
    assert!(body.contains("value=\"Bob\""));

    // Still exactly one student
    let list = client.get(&base).send().await.unwrap().text().await.unwrap();
    assert!(list.contains("Ann"));
    assert!(!list.contains("Bob"));
}

#[tokio::test]
async fn search_filters_and_echoes_term() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    add_student(&client, &base, "Ann", "R1", "Engineering").await;
    add_student(&client, &base, "Bob", "R2", "English").await;
    add_student(&client, &base, "Cid", "R3", "Math").await;

    let resp = client
        .get(format!("{base}/?q=eng"))
        .send()
        .await
        .unwrap();
    let body = resp.text().await.unwrap();

    assert!(body.contains("Ann"));
    assert!(body.contains("Bob"));
    assert!(!body.contains("Cid"));
    // The search term is carried back into the input field
    assert!(body.contains("value=\"eng\""));
}

#[tokio::test]
async fn edit_student_prefills_and_updates() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    add_student(&client, &base, "Ann", "R100", "CS").await;

    // Fresh database, so the first row has id 1
    let page = client
        .get(format!("{base}/students/1/edit"))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), 200);
    let body = page.text().await.unwrap();
    assert!(body.contains("value=\"Ann\""));
    assert!(body.contains("value=\"R100\""));

    let resp = client
        .post(format!("{base}/students/1/edit"))
        .form(&student_form("Ann Lee", "R101", "CS", "ann@x.com"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Student updated."));
    assert!(body.contains("R101"));
    assert!(!body.contains("R100"));
}

#[tokio::test]
async fn edit_keeps_own_roll() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    add_student(&client, &base, "Ann", "R100", "CS").await;

    let resp = client
        .post(format!("{base}/students/1/edit"))
        .form(&student_form("Ann Lee", "R100", "CS", ""))
        .send()
        .await
        .unwrap();
    let body = resp.text().await.unwrap();
    assert!(body.contains("Student updated."));
}

#[tokio::test]
async fn edit_to_taken_roll_rejected() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    add_student(&client, &base, "Ann", "R1", "").await;
    add_student(&client, &base, "Bob", "R2", "").await;

    let resp = client
        .post(format!("{base}/students/2/edit"))
        .form(&student_form("Bob", "R1", "", ""))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("already exists"));
}

#[tokio::test]
async fn unknown_student_is_not_found() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/students/999/edit"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .post(format!("{base}/students/999/edit"))
        .form(&student_form("Ghost", "R9", "", ""))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .post(format!("{base}/students/999/delete"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn delete_removes_student() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    add_student(&client, &base, "Ann", "R1", "").await;

    let resp = client
        .post(format!("{base}/students/1/delete"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Student deleted successfully."));
    assert!(body.contains("No students found"));

    let resp = client
        .get(format!("{base}/students/1/edit"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn about_page() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client.get(format!("{base}/about")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("About"));
}

#[tokio::test]
async fn contact_form_requires_all_fields() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/contact"))
        .form(&[("name", "Ann"), ("email", "ann@x.com"), ("message", "  ")])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("All contact fields are required."));
    // Submitted values are preserved for correction
    assert!(body.contains("value=\"Ann\""));
}

#[tokio::test]
async fn contact_form_success_redirects_with_notice() {
    let base = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{base}/contact"))
        .form(&[
            ("name", "Ann"),
            ("email", "ann@x.com"),
            ("message", "Hello there"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.url().path(), "/contact");
    let body = resp.text().await.unwrap();
    assert!(body.contains("Thank you for your message."));
}
