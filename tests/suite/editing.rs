//! Add, replace and delete driven through key presses.

use crossterm::event::KeyCode;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use phonebook_engine::{Contact, Focus};

use crate::common::{
    PERSONS_PATH, contact_names, loaded_app, modal_text, press, sample_contacts, settle,
    start_collection, type_text,
};

#[tokio::test]
async fn adding_a_new_person_appends_it() {
    let server = start_collection(sample_contacts()).await;
    Mock::given(method("POST"))
        .and(path(PERSONS_PATH))
        .and(body_json(json!({"name": "Grace Hopper", "number": "555-0101"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(
            json!({"id": 17, "name": "Grace Hopper", "number": "555-0101"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = loaded_app(&server).await;
    assert_eq!(app.focus(), Focus::Name);
    type_text(&mut app, "Grace Hopper");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "555-0101");
    press(&mut app, KeyCode::Enter);

    assert!(app.session().draft_name().is_empty());
    assert!(app.session().draft_number().is_empty());
    assert!(app.active_modal().is_none());

    assert!(settle(&mut app).await);
    let contacts = app.session().contacts();
    assert_eq!(contacts.len(), 5);
    assert_eq!(
        contacts.last(),
        Some(&Contact::new(17, "Grace Hopper", "555-0101"))
    );
    assert_eq!(app.session().notification(), Some("Grace Hopper added!"));
}

#[tokio::test]
async fn replacing_a_number_asks_first() {
    let server = start_collection(sample_contacts()).await;
    Mock::given(method("PUT"))
        .and(path("/api/persons/3"))
        .and(body_json(json!({"id": 3, "name": "Dan Abramov", "number": "000"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"id": 3, "name": "Dan Abramov", "number": "000"}),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut app = loaded_app(&server).await;
    type_text(&mut app, "Dan Abramov");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "000");
    press(&mut app, KeyCode::Enter);

    assert_eq!(
        modal_text(&mut app).await,
        "Dan Abramov is already added to phonebook, replace the old number with a new one?"
    );
    press(&mut app, KeyCode::Char('y'));
    assert!(app.active_modal().is_none());

    assert!(settle(&mut app).await);
    let dan = &app.session().contacts()[2];
    assert_eq!(dan, &Contact::new(3, "Dan Abramov", "000"));
    assert_eq!(
        app.session().notification(),
        Some("Dan Abramov number changed!")
    );
}

#[tokio::test]
async fn declining_the_replacement_changes_nothing() {
    let server = start_collection(sample_contacts()).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut app = loaded_app(&server).await;
    let before = app.session().contacts().to_vec();

    type_text(&mut app, "Ada Lovelace");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "123");
    press(&mut app, KeyCode::Enter);

    modal_text(&mut app).await;
    press(&mut app, KeyCode::Esc);

    assert!(settle(&mut app).await);
    assert_eq!(app.session().contacts(), before.as_slice());
    assert!(app.session().notification().is_none());
    // Drafts were cleared at submit time even though nothing was saved.
    assert!(app.session().draft_number().is_empty());
}

#[tokio::test]
async fn deleting_the_selected_person() {
    let server = start_collection(sample_contacts()).await;
    Mock::given(method("DELETE"))
        .and(path("/api/persons/2"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = loaded_app(&server).await;
    app.set_focus(Focus::List);
    press(&mut app, KeyCode::Char('j'));
    assert_eq!(app.selected_contact().map(|c| c.name.as_str()), Some("Ada Lovelace"));

    press(&mut app, KeyCode::Char('d'));
    assert_eq!(modal_text(&mut app).await, "delete Ada Lovelace?");
    press(&mut app, KeyCode::Enter);

    assert!(settle(&mut app).await);
    assert_eq!(
        contact_names(&app),
        vec!["Arto Hellas", "Dan Abramov", "Mary Poppendieck"]
    );
    assert_eq!(app.session().notification(), Some("Ada Lovelace deleted!"));
}

#[tokio::test]
async fn repeated_delete_key_asks_only_once() {
    let server = start_collection(sample_contacts()).await;
    Mock::given(method("DELETE"))
        .and(path("/api/persons/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = loaded_app(&server).await;
    app.set_focus(Focus::List);
    press(&mut app, KeyCode::Char('d'));
    press(&mut app, KeyCode::Char('d'));
    assert_eq!(
        app.session().error(),
        Some("Arto Hellas has a change in progress")
    );

    assert_eq!(modal_text(&mut app).await, "delete Arto Hellas?");
    press(&mut app, KeyCode::Char('y'));
    assert!(settle(&mut app).await);

    assert!(app.active_modal().is_none());
    assert_eq!(
        contact_names(&app),
        vec!["Ada Lovelace", "Dan Abramov", "Mary Poppendieck"]
    );
    assert_eq!(app.session().notification(), Some("Arto Hellas deleted!"));
}

#[tokio::test]
async fn declined_delete_keeps_the_person() {
    let server = start_collection(sample_contacts()).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let mut app = loaded_app(&server).await;
    app.set_focus(Focus::List);
    press(&mut app, KeyCode::Delete);
    assert_eq!(modal_text(&mut app).await, "delete Arto Hellas?");
    press(&mut app, KeyCode::Char('n'));

    assert!(settle(&mut app).await);
    assert_eq!(app.session().contacts().len(), 4);
}

#[tokio::test]
async fn reload_picks_up_remote_changes() {
    let server = start_collection(json!([{"id": 1, "name": "Arto Hellas", "number": "1"}])).await;
    let mut app = loaded_app(&server).await;
    assert_eq!(contact_names(&app), vec!["Arto Hellas"]);

    server.reset().await;
    Mock::given(method("GET"))
        .and(path(PERSONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_contacts()))
        .mount(&server)
        .await;

    app.set_focus(Focus::List);
    press(&mut app, KeyCode::Char('r'));
    assert!(settle(&mut app).await);
    assert_eq!(app.session().contacts().len(), 4);
}
