//! Postgres storage

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::notes::Note;
use crate::users::User;

use super::CreateNoteValues;
use super::CreateUserValues;
use super::Error;
use super::Page;
use super::Result;
use super::Storage;
use super::UpdateNoteValues;

/// Migrator to run migrations on startup
static MIGRATOR: Migrator = sqlx::migrate!();

/// Postgres storage
#[derive(Clone)]
pub struct Postgres {
    /// Pool of connections
    connection_pool: PgPool,
}

impl Postgres {
    /// Create Postgres storage
    ///
    /// Use the `DATABASE_URL` environment variable
    ///
    /// Migrations will be run
    pub async fn new() -> Self {
        let database_connection_string = std::env::var("DATABASE_URL").expect("Valid DATABASE_URL");

        let connection_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_connection_string)
            .await
            .expect("Valid connection");

        Self::new_with_pool(connection_pool).await
    }

    /// Create Postgres storage with existing pool
    ///
    /// Migrations will be run
    pub async fn new_with_pool(connection_pool: PgPool) -> Self {
        let migration_result = MIGRATOR.run(&connection_pool).await;

        if let Err(err) = migration_result {
            panic!("Migrations could not run: {err}");
        }

        Self { connection_pool }
    }
}

/// Postgres version of user
#[derive(sqlx::FromRow)]
struct PostgresUser {
    /// User ID
    id: Uuid,

    /// Email address
    email: String,

    /// Hashed password
    hashed_password: String,

    /// Creation date
    created_at: NaiveDateTime,

    /// Last updated at
    updated_at: NaiveDateTime,
}

impl User {
    /// Create user from postgres version
    fn from_postgres_user(user: PostgresUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            hashed_password: user.hashed_password,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }

    /// Maybe create user from postgres version
    fn from_postgres_user_optional(user: Option<PostgresUser>) -> Option<Self> {
        user.map(Self::from_postgres_user)
    }
}

/// Postgres version of note
#[derive(sqlx::FromRow)]
struct PostgresNote {
    /// Note ID
    id: Uuid,

    /// Owner of the note
    user_id: Uuid,

    /// Title of the note
    title: String,

    /// Content of the note
    content: String,

    /// Whether the note is in the trash
    is_deleted: bool,

    /// Trashed at
    deleted_at: Option<NaiveDateTime>,

    /// Creation date
    created_at: NaiveDateTime,

    /// Last updated at
    updated_at: NaiveDateTime,
}

impl Note {
    /// Create note from postgres version
    fn from_postgres_note(note: PostgresNote) -> Self {
        Self {
            id: note.id,
            user_id: note.user_id,
            title: note.title,
            content: note.content,
            is_deleted: note.is_deleted,
            deleted_at: note.deleted_at,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }

    /// Maybe create note from postgres version
    fn from_postgres_note_optional(note: Option<PostgresNote>) -> Option<Self> {
        note.map(Self::from_postgres_note)
    }

    /// Create multiple notes from postgres version
    fn from_postgres_note_multiple(mut notes: Vec<PostgresNote>) -> Vec<Self> {
        notes
            .drain(..)
            .map(Self::from_postgres_note)
            .collect::<Vec<Self>>()
    }
}

#[async_trait]
impl Storage for Postgres {
    async fn find_single_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, PostgresUser>(
            r"
            SELECT id, email, hashed_password, created_at, updated_at
            FROM users
            WHERE email = $1
            LIMIT 1
            ",
        )
        .bind(email)
        .fetch_optional(&self.connection_pool)
        .await
        .map(User::from_postgres_user_optional)
        .map_err(connection_error)?;

        Ok(user)
    }

    async fn create_user(&self, values: &CreateUserValues) -> Result<User> {
        let user = sqlx::query_as::<_, PostgresUser>(
            r"
            INSERT INTO users (id, email, hashed_password)
            VALUES ($1, $2, $3)
            RETURNING id, email, hashed_password, created_at, updated_at
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.email)
        .bind(values.hashed_password)
        .fetch_one(&self.connection_pool)
        .await
        .map(User::from_postgres_user)
        .map_err(connection_error)?;

        Ok(user)
    }

    async fn find_active_notes(&self, user_id: &Uuid, page: &Page) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, PostgresNote>(
            r"
            SELECT id, user_id, title, content, is_deleted, deleted_at, created_at, updated_at
            FROM notes
            WHERE user_id = $1
                AND is_deleted = FALSE
            ORDER BY created_at DESC
            OFFSET $2
            LIMIT $3
            ",
        )
        .bind(user_id)
        .bind(i64::try_from(page.offset).unwrap_or(i64::MAX))
        .bind(i64::try_from(page.limit).unwrap_or(i64::MAX))
        .fetch_all(&self.connection_pool)
        .await
        .map(Note::from_postgres_note_multiple)
        .map_err(connection_error)?;

        Ok(notes)
    }

    async fn find_trashed_notes(&self, user_id: &Uuid) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, PostgresNote>(
            r"
            SELECT id, user_id, title, content, is_deleted, deleted_at, created_at, updated_at
            FROM notes
            WHERE user_id = $1
                AND is_deleted = TRUE
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await
        .map(Note::from_postgres_note_multiple)
        .map_err(connection_error)?;

        Ok(notes)
    }

    async fn create_note(&self, values: &CreateNoteValues) -> Result<Note> {
        let note = sqlx::query_as::<_, PostgresNote>(
            r"
            INSERT INTO notes (id, user_id, title, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, content, is_deleted, deleted_at, created_at, updated_at
            ",
        )
        .bind(Uuid::new_v4())
        .bind(values.user)
        .bind(values.title)
        .bind(values.content)
        .fetch_one(&self.connection_pool)
        .await
        .map(Note::from_postgres_note)
        .map_err(connection_error)?;

        Ok(note)
    }

    async fn update_note(
        &self,
        user_id: &Uuid,
        note_id: &Uuid,
        values: &UpdateNoteValues<'_>,
    ) -> Result<Option<Note>> {
        // the owner/state filter and the write are a single statement
        let note = sqlx::query_as::<_, PostgresNote>(
            r"
            UPDATE notes
            SET title = COALESCE($3, title),
                content = COALESCE($4, content),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
                AND user_id = $2
                AND is_deleted = FALSE
            RETURNING id, user_id, title, content, is_deleted, deleted_at, created_at, updated_at
            ",
        )
        .bind(note_id)
        .bind(user_id)
        .bind(values.title)
        .bind(values.content)
        .fetch_optional(&self.connection_pool)
        .await
        .map(Note::from_postgres_note_optional)
        .map_err(connection_error)?;

        Ok(note)
    }

    async fn trash_note(&self, user_id: &Uuid, note_id: &Uuid) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, PostgresNote>(
            r"
            UPDATE notes
            SET is_deleted = TRUE,
                deleted_at = CURRENT_TIMESTAMP,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
                AND user_id = $2
                AND is_deleted = FALSE
            RETURNING id, user_id, title, content, is_deleted, deleted_at, created_at, updated_at
            ",
        )
        .bind(note_id)
        .bind(user_id)
        .fetch_optional(&self.connection_pool)
        .await
        .map(Note::from_postgres_note_optional)
        .map_err(connection_error)?;

        Ok(note)
    }

    async fn restore_note(&self, user_id: &Uuid, note_id: &Uuid) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, PostgresNote>(
            r"
            UPDATE notes
            SET is_deleted = FALSE,
                deleted_at = NULL,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
                AND user_id = $2
                AND is_deleted = TRUE
            RETURNING id, user_id, title, content, is_deleted, deleted_at, created_at, updated_at
            ",
        )
        .bind(note_id)
        .bind(user_id)
        .fetch_optional(&self.connection_pool)
        .await
        .map(Note::from_postgres_note_optional)
        .map_err(connection_error)?;

        Ok(note)
    }

    async fn purge_note(&self, user_id: &Uuid, note_id: &Uuid) -> Result<Option<Note>> {
        let note = sqlx::query_as::<_, PostgresNote>(
            r"
            DELETE FROM notes
            WHERE id = $1
                AND user_id = $2
                AND is_deleted = TRUE
            RETURNING id, user_id, title, content, is_deleted, deleted_at, created_at, updated_at
            ",
        )
        .bind(note_id)
        .bind(user_id)
        .fetch_optional(&self.connection_pool)
        .await
        .map(Note::from_postgres_note_optional)
        .map_err(connection_error)?;

        Ok(note)
    }
}

/// Create a [`Error::Connection`](Error::Connection) from a sqlx error
fn connection_error(err: sqlx::Error) -> Error {
    Error::Connection(err.to_string())
}
