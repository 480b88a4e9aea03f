use std::net::SocketAddr;

use axum::Router;
use axum::body::Body;
use axum::body::Bytes;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::Method;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;
use http_body_util::BodyExt;
use serde_json::Map;
use serde_json::Value;
use tower::Service;
use uuid::Uuid;

use crate::api::JwtKeys;
use crate::api::RateLimiter;
use crate::create_router;
use crate::storage::Memory;

/// Test helper version of Note struct
#[derive(Debug, PartialEq, Eq)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
}

/// Setup the Jotty app
///
/// In-memory storage, a fixed JWT secret and a fresh rate limiter; the mock
/// connect info stands in for the real socket address
pub fn setup_test_app() -> Router {
    let storage = Memory::new();
    let jwt_keys = JwtKeys::new(b"verysecret");
    let rate_limiter = RateLimiter::new();

    create_router(storage, jwt_keys, rate_limiter)
        .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 3000))))
}

pub async fn signup(
    app: &mut Router,
    email: &str,
    password: &str,
) -> (StatusCode, Option<Uuid>, Option<String>) {
    let mut payload = Map::new();
    payload.insert("email".to_string(), Value::String(email.to_string()));
    payload.insert("password".to_string(), Value::String(password.to_string()));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/user/signup")
        .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (
        status_code,
        if status_code == StatusCode::CREATED {
            Some(get_user_id(&body))
        } else {
            None
        },
        if status_code.is_client_error() {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_signin(
    app: &mut Router,
    email: &str,
    password: &str,
) -> (StatusCode, Option<String>, Option<String>) {
    let mut payload = Map::new();
    payload.insert("email".to_string(), Value::String(email.to_string()));
    payload.insert("password".to_string(), Value::String(password.to_string()));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/user/signin")
        .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_access_token(&body))
        } else {
            None
        },
        if status_code.is_client_error() {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

pub async fn signin(app: &mut Router, email: &str, password: &str) -> String {
    let (status_code, access_token, _) = maybe_signin(app, email, password).await;

    assert_eq!(StatusCode::OK, status_code);

    access_token.unwrap()
}

/// Signup and signin in one go, for tests that just need a user
pub async fn signup_and_signin(app: &mut Router, email: &str) -> String {
    let (status_code, _, _) = signup(app, email, "verysecret").await;
    assert_eq!(StatusCode::CREATED, status_code);

    signin(app, email, "verysecret").await
}

pub async fn maybe_create_note(
    app: &mut Router,
    access_token: &str,
    title: &str,
    content: &str,
) -> (StatusCode, Option<Uuid>, Option<String>) {
    let mut payload = Map::new();
    payload.insert("title".to_string(), Value::String(title.to_string()));
    payload.insert("content".to_string(), Value::String(content.to_string()));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/user/notes")
        .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .header(AUTHORIZATION, access_token)
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (
        status_code,
        if status_code == StatusCode::CREATED {
            Some(get_note_id(&body))
        } else {
            None
        },
        if status_code.is_client_error() {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

pub async fn create_note(app: &mut Router, access_token: &str, title: &str, content: &str) -> Uuid {
    let (status_code, note_id, _) = maybe_create_note(app, access_token, title, content).await;

    assert_eq!(StatusCode::CREATED, status_code);

    note_id.unwrap()
}

pub async fn list_notes_with_query(
    app: &mut Router,
    access_token: &str,
    query: &str,
) -> (StatusCode, Option<Vec<Note>>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri(format!("/user/notes{query}"))
        .header(AUTHORIZATION, access_token)
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_notes(&body))
        } else {
            None
        },
    )
}

pub async fn list_notes(app: &mut Router, access_token: &str) -> (StatusCode, Option<Vec<Note>>) {
    list_notes_with_query(app, access_token, "").await
}

pub async fn list_trash(app: &mut Router, access_token: &str) -> (StatusCode, Option<Vec<Note>>) {
    let request = Request::builder()
        .method(Method::GET)
        .uri("/user/notes/trash")
        .header(AUTHORIZATION, access_token)
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_notes(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_update_note(
    app: &mut Router,
    access_token: &str,
    note_id: &str,
    title: Option<&str>,
    content: Option<&str>,
) -> (StatusCode, Option<Note>, Option<String>) {
    let mut payload = Map::new();

    if let Some(title) = title {
        payload.insert("title".to_string(), Value::String(title.to_string()));
    }

    if let Some(content) = content {
        payload.insert("content".to_string(), Value::String(content.to_string()));
    }

    let request = Request::builder()
        .method(Method::PUT)
        .uri(format!("/user/notes/{note_id}"))
        .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .header(AUTHORIZATION, access_token)
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (
        status_code,
        if status_code == StatusCode::OK {
            Some(get_note(&body))
        } else {
            None
        },
        if status_code.is_client_error() {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_trash_note(
    app: &mut Router,
    access_token: &str,
    note_id: &Uuid,
) -> (StatusCode, Option<String>) {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/user/notes/{note_id}"))
        .header(AUTHORIZATION, access_token)
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (
        status_code,
        if status_code.is_client_error() {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_restore_note(
    app: &mut Router,
    access_token: &str,
    note_id: &Uuid,
) -> (StatusCode, Option<String>) {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(format!("/user/notes/{note_id}/restore"))
        .header(AUTHORIZATION, access_token)
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (
        status_code,
        if status_code.is_client_error() {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

pub async fn maybe_purge_note(
    app: &mut Router,
    access_token: &str,
    note_id: &Uuid,
) -> (StatusCode, Option<String>) {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/user/notes/{note_id}/permanent"))
        .header(AUTHORIZATION, access_token)
        .body(Body::empty())
        .unwrap();

    let response = app.call(request).await.unwrap();
    let status_code = response.status();

    let body = response.into_body().collect().await.unwrap().to_bytes();

    (
        status_code,
        if status_code.is_client_error() {
            Some(get_error_message(&body))
        } else {
            None
        },
    )
}

fn value_to_note(note: &Map<String, Value>) -> Note {
    Note {
        id: note["id"].as_str().map(Uuid::parse_str).unwrap().unwrap(),
        title: note["title"].as_str().map(ToString::to_string).unwrap(),
        content: note["content"].as_str().map(ToString::to_string).unwrap(),
    }
}

fn get_note(body: &Bytes) -> Note {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["note"]
        .as_object()
        .map(value_to_note)
        .unwrap()
}

fn get_notes(body: &Bytes) -> Vec<Note> {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["notes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f.as_object().unwrap())
        .map(value_to_note)
        .collect()
}

fn get_user_id(body: &Bytes) -> Uuid {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["userId"]
        .as_str()
        .map(Uuid::parse_str)
        .unwrap()
        .unwrap()
}

fn get_note_id(body: &Bytes) -> Uuid {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["noteId"]
        .as_str()
        .map(Uuid::parse_str)
        .unwrap()
        .unwrap()
}

fn get_error_message(body: &Bytes) -> String {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["error"]
        .as_str()
        .map(ToString::to_string)
        .unwrap()
}

fn get_access_token(body: &Bytes) -> String {
    serde_json::from_slice::<Value>(&body[..]).unwrap()["token"]
        .as_str()
        .map(|token| format!("Bearer {token}"))
        .unwrap()
}
