//! Filter input narrowing the visible list.

use crossterm::event::KeyCode;
use serde_json::json;

use phonebook_engine::Focus;

use crate::common::{loaded_app, press, start_collection, type_text, visible_names};

#[tokio::test]
async fn filter_is_case_insensitive_and_keeps_order() {
    let server = start_collection(json!([
        {"id": 1, "name": "Ann", "number": "1"},
        {"id": 2, "name": "Bob", "number": "2"},
        {"id": 3, "name": "Anders", "number": "3"}
    ]))
    .await;
    let mut app = loaded_app(&server).await;

    press(&mut app, KeyCode::BackTab);
    assert_eq!(app.focus(), Focus::Filter);
    type_text(&mut app, "AN");

    insta::assert_debug_snapshot!(visible_names(&app), @r#"
    [
        "Ann",
        "Anders",
    ]
    "#);
    // The underlying list is untouched.
    assert_eq!(app.session().contacts().len(), 3);
}

#[tokio::test]
async fn clearing_the_filter_shows_everyone_again() {
    let server = start_collection(json!([
        {"id": 1, "name": "Ann", "number": "1"},
        {"id": 2, "name": "Bob", "number": "2"}
    ]))
    .await;
    let mut app = loaded_app(&server).await;

    app.set_focus(Focus::Filter);
    type_text(&mut app, "bo");
    assert_eq!(visible_names(&app), vec!["Bob"]);

    press(&mut app, KeyCode::Backspace);
    press(&mut app, KeyCode::Backspace);
    assert_eq!(visible_names(&app), vec!["Ann", "Bob"]);
}

#[tokio::test]
async fn selection_is_clamped_to_the_filtered_list() {
    let server = start_collection(json!([
        {"id": 1, "name": "Ann", "number": "1"},
        {"id": 2, "name": "Bob", "number": "2"},
        {"id": 3, "name": "Cecil", "number": "3"}
    ]))
    .await;
    let mut app = loaded_app(&server).await;

    app.set_focus(Focus::List);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);
    assert_eq!(app.selected_contact().map(|c| c.name.as_str()), Some("Cecil"));

    app.set_filter("b");
    assert_eq!(app.selected_contact().map(|c| c.name.as_str()), Some("Bob"));
}
