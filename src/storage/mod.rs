//! All things related to the storage of users and notes

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::notes::Note;
use crate::users::User;

pub use memory::Memory;
#[cfg(feature = "postgres")]
pub use postgres::Postgres;

mod memory;
#[cfg(feature = "postgres")]
mod postgres;

/// Setup the storage
#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn setup() -> Memory {
    Memory::new()
}

/// Setup the storage
#[cfg(feature = "postgres")]
pub async fn setup() -> Postgres {
    Postgres::new().await
}

/// Storage errors
#[derive(Debug, Error)]
pub enum Error {
    /// A connection error with the storage
    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for all storage interactions
pub type Result<T> = core::result::Result<T, Error>;

/// Values to create a User
pub struct CreateUserValues<'a> {
    /// The email address, unique over all users
    pub email: &'a str,

    /// The hashed password
    pub hashed_password: &'a str,
}

/// Values to create a Note
pub struct CreateNoteValues<'a> {
    /// The owner of the note
    pub user: &'a Uuid,

    /// Title of the note
    pub title: &'a str,

    /// Content of the note
    pub content: &'a str,
}

/// Values to update a Note
///
/// Only fields that are present are written, the rest is left untouched
pub struct UpdateNoteValues<'a> {
    /// New title of the note
    pub title: Option<&'a String>,

    /// New content of the note
    pub content: Option<&'a String>,
}

/// A page of a note listing
#[derive(Clone, Copy, Debug)]
pub struct Page {
    /// Number of notes to skip
    pub offset: u64,

    /// Maximum number of notes to return
    pub limit: u64,
}

/// Storage with all supported operations
///
/// Every note operation is scoped by the owning user AND the deletion state
/// the operation expects. The state check and the mutation are a single
/// operation on the backend; `None` means no note matched in the required
/// state, the caller cannot tell "never existed" and "wrong state" apart.
#[async_trait]
pub trait Storage: Clone + Send + Sync + 'static {
    /// Find a single user by its email address
    async fn find_single_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Create a single user
    async fn create_user(&self, values: &CreateUserValues) -> Result<User>;

    /// Find active notes of a user, newest first
    async fn find_active_notes(&self, user_id: &Uuid, page: &Page) -> Result<Vec<Note>>;

    /// Find trashed notes of a user, newest first
    async fn find_trashed_notes(&self, user_id: &Uuid) -> Result<Vec<Note>>;

    /// Create a note, active by default
    async fn create_note(&self, values: &CreateNoteValues) -> Result<Note>;

    /// Update an active note of a user
    ///
    /// Only matches active notes
    async fn update_note(
        &self,
        user_id: &Uuid,
        note_id: &Uuid,
        values: &UpdateNoteValues<'_>,
    ) -> Result<Option<Note>>;

    /// Move an active note of a user to the trash
    ///
    /// Only matches active notes, trashing twice does not match
    async fn trash_note(&self, user_id: &Uuid, note_id: &Uuid) -> Result<Option<Note>>;

    /// Restore a trashed note of a user
    ///
    /// Only matches trashed notes
    async fn restore_note(&self, user_id: &Uuid, note_id: &Uuid) -> Result<Option<Note>>;

    /// Permanently delete a trashed note of a user
    ///
    /// Only matches trashed notes, there is no way back after this
    async fn purge_note(&self, user_id: &Uuid, note_id: &Uuid) -> Result<Option<Note>>;
}
