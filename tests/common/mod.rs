//! Shared test utilities and fixtures.
//!
//! A wiremock stand-in for the persons collection plus helpers that drive
//! the app the way the terminal loop does.

#![allow(dead_code)]

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::{Value, json};
use tokio::time::timeout;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use phonebook_engine::{App, PersonsClient};
use phonebook_tui::handle_key;

pub const PERSONS_PATH: &str = "/api/persons";
const WAIT: Duration = Duration::from_secs(5);

pub fn sample_contacts() -> Value {
    json!([
        {"id": 1, "name": "Arto Hellas", "number": "040-123456"},
        {"id": 2, "name": "Ada Lovelace", "number": "39-44-5323523"},
        {"id": 3, "name": "Dan Abramov", "number": "12-43-234345"},
        {"id": 4, "name": "Mary Poppendieck", "number": "39-23-6423122"}
    ])
}

/// Start a collection that answers `GET /api/persons` with `contacts`.
pub async fn start_collection(contacts: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PERSONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(contacts))
        .mount(&server)
        .await;
    server
}

pub fn collection_url(server: &MockServer) -> String {
    format!("{}{PERSONS_PATH}", server.uri())
}

/// Modal-backed app with the initial load applied.
pub async fn loaded_app(server: &MockServer) -> App {
    let client = PersonsClient::new(&collection_url(server)).expect("valid mock URL");
    let mut app = App::with_modal_prompter(client);
    app.load_all();
    settle(&mut app).await;
    app
}

/// Wait for the next completion; returns whether it was applied.
pub async fn settle(app: &mut App) -> bool {
    timeout(WAIT, app.wait_for_completion())
        .await
        .expect("completion did not arrive in time")
}

/// Wait for a confirm/alert modal to appear and return its text.
pub async fn modal_text(app: &mut App) -> String {
    let shown = timeout(WAIT, app.wait_for_modal())
        .await
        .expect("modal did not appear in time");
    assert!(shown, "modal queue closed");
    app.active_modal()
        .map(|modal| modal.text().to_string())
        .expect("modal on screen")
}

pub fn press(app: &mut App, code: KeyCode) {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c));
    }
}

pub fn contact_names(app: &App) -> Vec<String> {
    app.session()
        .contacts()
        .iter()
        .map(|c| c.name.clone())
        .collect()
}

pub fn visible_names(app: &App) -> Vec<String> {
    app.session()
        .visible_contacts()
        .into_iter()
        .map(|c| c.name.clone())
        .collect()
}
