use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_trash_and_restore() {
    let mut app = helper::setup_test_app();

    let access_token = helper::signup_and_signin(&mut app, "user@example.com").await;

    let keep_id = helper::create_note(&mut app, &access_token, "keep", "stays active").await;
    let trash_id = helper::create_note(&mut app, &access_token, "trash", "gets trashed").await;

    // trash one note
    let (status_code, _) = helper::maybe_trash_note(&mut app, &access_token, &trash_id).await;
    assert_eq!(StatusCode::OK, status_code);

    // gone from the active list
    let (_, notes) = helper::list_notes(&mut app, &access_token).await;
    let notes = notes.unwrap();
    assert_eq!(1, notes.len());
    assert_eq!(keep_id, notes[0].id);

    // present in the trash
    let (status_code, trashed) = helper::list_trash(&mut app, &access_token).await;
    assert_eq!(StatusCode::OK, status_code);
    let trashed = trashed.unwrap();
    assert_eq!(1, trashed.len());
    assert_eq!(trash_id, trashed[0].id);

    // restore it
    let (status_code, _) = helper::maybe_restore_note(&mut app, &access_token, &trash_id).await;
    assert_eq!(StatusCode::OK, status_code);

    // back in the active list, trash is empty again
    let (_, notes) = helper::list_notes(&mut app, &access_token).await;
    assert_eq!(2, notes.unwrap().len());

    let (_, trashed) = helper::list_trash(&mut app, &access_token).await;
    assert_eq!(Some(Vec::new()), trashed);
}

#[tokio::test]
async fn test_trash_twice() {
    let mut app = helper::setup_test_app();

    let access_token = helper::signup_and_signin(&mut app, "user@example.com").await;
    let note_id = helper::create_note(&mut app, &access_token, "groceries", "milk, eggs").await;

    let (status_code, _) = helper::maybe_trash_note(&mut app, &access_token, &note_id).await;
    assert_eq!(StatusCode::OK, status_code);

    // an already trashed note cannot be trashed again
    let (status_code, error) = helper::maybe_trash_note(&mut app, &access_token, &note_id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Note not found".to_string()), error);
}

#[tokio::test]
async fn test_restore_active_note() {
    let mut app = helper::setup_test_app();

    let access_token = helper::signup_and_signin(&mut app, "user@example.com").await;
    let note_id = helper::create_note(&mut app, &access_token, "groceries", "milk, eggs").await;

    // an active note has nothing to restore
    let (status_code, error) = helper::maybe_restore_note(&mut app, &access_token, &note_id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Note not found".to_string()), error);
}

#[tokio::test]
async fn test_purge() {
    let mut app = helper::setup_test_app();

    let access_token = helper::signup_and_signin(&mut app, "user@example.com").await;
    let note_id = helper::create_note(&mut app, &access_token, "groceries", "milk, eggs").await;

    let (status_code, _) = helper::maybe_trash_note(&mut app, &access_token, &note_id).await;
    assert_eq!(StatusCode::OK, status_code);

    let (status_code, _) = helper::maybe_purge_note(&mut app, &access_token, &note_id).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    // purged means gone, for every operation
    let (status_code, _) = helper::maybe_restore_note(&mut app, &access_token, &note_id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);

    let (status_code, _) = helper::maybe_purge_note(&mut app, &access_token, &note_id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);

    let (_, trashed) = helper::list_trash(&mut app, &access_token).await;
    assert_eq!(Some(Vec::new()), trashed);
}

#[tokio::test]
async fn test_purge_active_note() {
    let mut app = helper::setup_test_app();

    let access_token = helper::signup_and_signin(&mut app, "user@example.com").await;
    let note_id = helper::create_note(&mut app, &access_token, "groceries", "milk, eggs").await;

    // only trashed notes can be purged
    let (status_code, error) = helper::maybe_purge_note(&mut app, &access_token, &note_id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Note not found".to_string()), error);

    // the note is still there
    let (_, notes) = helper::list_notes(&mut app, &access_token).await;
    assert_eq!(1, notes.unwrap().len());
}
