//! How failures from the collection surface on screen.

use crossterm::event::KeyCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use phonebook_engine::{App, Focus, LoadState, PersonsClient};

use crate::common::{
    PERSONS_PATH, collection_url, loaded_app, modal_text, press, sample_contacts, settle,
    start_collection, type_text,
};

#[tokio::test]
async fn failed_initial_load_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PERSONS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = PersonsClient::new(&collection_url(&server)).unwrap();
    let mut app = App::with_modal_prompter(client);
    app.load_all();
    assert!(settle(&mut app).await);

    assert_eq!(
        app.session().load_state(),
        &LoadState::Failed("Couldn't load contacts: HTTP 503 Service Unavailable".into())
    );
    assert_eq!(
        app.session().error(),
        Some("Couldn't load contacts: HTTP 503 Service Unavailable")
    );
}

#[tokio::test]
async fn create_error_uses_server_text() {
    let server = start_collection(sample_contacts()).await;
    Mock::given(method("POST"))
        .and(path(PERSONS_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "name must be unique"})),
        )
        .mount(&server)
        .await;

    let mut app = loaded_app(&server).await;
    type_text(&mut app, "Linus");
    press(&mut app, KeyCode::Enter);
    assert!(settle(&mut app).await);

    assert_eq!(app.session().error(), Some("name must be unique"));
    assert_eq!(app.session().contacts().len(), 4);
}

#[tokio::test]
async fn create_error_without_payload_is_generic() {
    let server = start_collection(sample_contacts()).await;
    Mock::given(method("POST"))
        .and(path(PERSONS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("<h1>oops</h1>"))
        .mount(&server)
        .await;

    let mut app = loaded_app(&server).await;
    type_text(&mut app, "Linus");
    press(&mut app, KeyCode::Enter);
    assert!(settle(&mut app).await);

    assert_eq!(
        app.session().error(),
        Some("Couldn't add Linus: HTTP 500 Internal Server Error")
    );
}

#[tokio::test]
async fn update_error_is_generic() {
    let server = start_collection(sample_contacts()).await;
    Mock::given(method("PUT"))
        .and(path("/api/persons/1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "gone"})))
        .mount(&server)
        .await;

    let mut app = loaded_app(&server).await;
    type_text(&mut app, "Arto Hellas");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "1");
    press(&mut app, KeyCode::Enter);
    modal_text(&mut app).await;
    press(&mut app, KeyCode::Char('y'));
    assert!(settle(&mut app).await);

    assert_eq!(
        app.session().error(),
        Some("Couldn't change Arto Hellas's number")
    );
    assert_eq!(app.session().contacts()[0].number, "040-123456");
}

#[tokio::test]
async fn delete_error_is_a_blocking_alert() {
    let server = start_collection(sample_contacts()).await;
    Mock::given(method("DELETE"))
        .and(path("/api/persons/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut app = loaded_app(&server).await;
    app.set_focus(Focus::List);
    press(&mut app, KeyCode::Char('d'));
    modal_text(&mut app).await;
    press(&mut app, KeyCode::Char('y'));
    assert!(settle(&mut app).await);

    let alert = app.active_modal().expect("alert on screen");
    assert!(!alert.is_confirm());
    assert_eq!(alert.text(), "couldn't delete Arto Hellas");
    assert!(app.session().error().is_none());

    // Keys other than the dismiss keys leave the alert up.
    press(&mut app, KeyCode::Char('q'));
    assert!(app.active_modal().is_some());
    assert!(!app.should_quit());

    press(&mut app, KeyCode::Char(' '));
    assert!(app.active_modal().is_none());
    assert_eq!(app.session().contacts().len(), 4);
}
