//! Note management
//!
//! Every operation is scoped to the authenticated owner; the owner constraint
//! comes from the token claims, never from the client payload. The state
//! precondition and the transition are applied by the storage in one go, a
//! note in the wrong state reads as not found.

use axum::Extension;
use axum::extract::Query;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::notes::Note;
use crate::storage::CreateNoteValues;
use crate::storage::Storage;
use crate::storage::UpdateNoteValues;

use super::CurrentUser;
use super::Error;
use super::Form;
use super::PathParameters;
use super::Success;
use super::validate::ListQuery;
use super::validate::parse_content;
use super::validate::parse_title;

/// The note response information
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NoteResponse {
    fn from_note(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            content: note.content,
            deleted_at: note.deleted_at,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }

    fn from_note_multiple(mut notes: Vec<Note>) -> Vec<Self> {
        notes.drain(..).map(Self::from_note).collect::<Vec<Self>>()
    }
}

/// A list of notes
#[derive(Debug, Serialize)]
pub struct NoteListResponse {
    pub notes: Vec<NoteResponse>,
}

/// Confirmation of a created note
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCreatedResponse {
    pub note_id: Uuid,
}

/// A single (updated) note
#[derive(Debug, Serialize)]
pub struct SingleNoteResponse {
    pub note: NoteResponse,
}

/// List active notes, newest first
///
/// Request:
/// ```sh
/// curl -v -H 'Authorization: Bearer tokentokentoken' \
///     'http://localhost:3000/user/notes?page=1&limit=20'
/// ```
///
/// Response:
/// ```json
/// { "notes": [ { "id": "<uuid>", "title": "groceries", ... } ] }
/// ```
pub async fn list<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> Result<Success<NoteListResponse>, Error> {
    let notes = storage
        .find_active_notes(&current_user.id, &query.clamp())
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(NoteListResponse {
        notes: NoteResponse::from_note_multiple(notes),
    }))
}

/// Create note form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteForm {
    /// Title of the note, 1 to 100 characters
    title: String,

    /// Content of the note, 1 to 5000 characters
    content: String,
}

/// Create a note based on the [`CreateNoteForm`](CreateNoteForm) form
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "title": "groceries", "content": "milk, eggs" }' \
///     http://localhost:3000/user/notes
/// ```
///
/// Response:
/// ```json
/// { "noteId": "<uuid>" }
/// ```
pub async fn create<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    Form(form): Form<CreateNoteForm>,
) -> Result<Success<NoteCreatedResponse>, Error> {
    let title = parse_title(&form.title)?;
    let content = parse_content(&form.content)?;

    let values = CreateNoteValues {
        user: &current_user.id,
        title,
        content,
    };

    let note = storage
        .create_note(&values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::created(NoteCreatedResponse { note_id: note.id }))
}

/// Update note form
///
/// Both fields are optional, but at least one must be present
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNoteForm {
    /// New title of the note
    title: Option<String>,

    /// New content of the note
    content: Option<String>,
}

/// Update an active note, merging only the provided fields
///
/// Request:
/// ```sh
/// curl -v -XPUT -H 'Content-Type: application/json' \
///     -H 'Authorization: Bearer tokentokentoken' \
///     -d '{ "title": "groceries (urgent)" }' \
///     http://localhost:3000/user/notes/<uuid>
/// ```
///
/// Response:
/// ```json
/// { "note": { "id": "<uuid>", "title": "groceries (urgent)", ... } }
/// ```
pub async fn update<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<Uuid>,
    Form(form): Form<UpdateNoteForm>,
) -> Result<Success<SingleNoteResponse>, Error> {
    if form.title.is_none() && form.content.is_none() {
        return Err(Error::bad_request("Nothing to update"));
    }

    if let Some(title) = &form.title {
        parse_title(title)?;
    }

    if let Some(content) = &form.content {
        parse_content(content)?;
    }

    let values = UpdateNoteValues {
        title: form.title.as_ref(),
        content: form.content.as_ref(),
    };

    let note = storage
        .update_note(&current_user.id, &note_id, &values)
        .await
        .map_err(Error::internal_server_error)?;

    note.map_or_else(
        || Err(Error::not_found("Note not found")),
        |note| {
            Ok(Success::ok(SingleNoteResponse {
                note: NoteResponse::from_note(note),
            }))
        },
    )
}

/// Move an active note to the trash
///
/// Trashing an already trashed note reads as not found, the transition only
/// exists for active notes
pub async fn trash<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<Uuid>,
) -> Result<Success<SingleNoteResponse>, Error> {
    let note = storage
        .trash_note(&current_user.id, &note_id)
        .await
        .map_err(Error::internal_server_error)?;

    note.map_or_else(
        || Err(Error::not_found("Note not found")),
        |note| {
            Ok(Success::ok(SingleNoteResponse {
                note: NoteResponse::from_note(note),
            }))
        },
    )
}

/// List trashed notes, newest first
pub async fn list_trash<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
) -> Result<Success<NoteListResponse>, Error> {
    let notes = storage
        .find_trashed_notes(&current_user.id)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::ok(NoteListResponse {
        notes: NoteResponse::from_note_multiple(notes),
    }))
}

/// Restore a trashed note
///
/// Restoring an active note reads as not found, the transition only exists
/// for trashed notes
pub async fn restore<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<Uuid>,
) -> Result<Success<SingleNoteResponse>, Error> {
    let note = storage
        .restore_note(&current_user.id, &note_id)
        .await
        .map_err(Error::internal_server_error)?;

    note.map_or_else(
        || Err(Error::not_found("Note not found")),
        |note| {
            Ok(Success::ok(SingleNoteResponse {
                note: NoteResponse::from_note(note),
            }))
        },
    )
}

/// Permanently delete a trashed note
///
/// Request:
/// ```sh
/// curl -v -XDELETE \
///     -H 'Authorization: Bearer tokentokentoken' \
///     http://localhost:3000/user/notes/<uuid>/permanent
/// ```
pub async fn purge<S: Storage>(
    Extension(storage): Extension<S>,
    current_user: CurrentUser,
    PathParameters(note_id): PathParameters<Uuid>,
) -> Result<Success<&'static str>, Error> {
    let note = storage
        .purge_note(&current_user.id, &note_id)
        .await
        .map_err(Error::internal_server_error)?;

    note.map_or_else(
        || Err(Error::not_found("Note not found")),
        |_| Ok(Success::<&'static str>::no_content()),
    )
}
