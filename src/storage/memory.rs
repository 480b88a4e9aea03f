//! Memory storage
//!
//! Will be destroyed on system shutdown

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::notes::Note;
use crate::users::User;

use super::CreateNoteValues;
use super::CreateUserValues;
use super::Page;
use super::Result;
use super::Storage;
use super::UpdateNoteValues;

/// An in-memory storage
///
/// Will be destroyed on system shutdown
///
/// Every note transition takes the notes lock once; checking the owner/state
/// precondition and applying the mutation happen under that single lock
#[derive(Clone, Debug)]
pub struct Memory {
    /// All users in storage
    users: Arc<Mutex<HashMap<Uuid, User>>>,

    /// All notes in storage
    notes: Arc<Mutex<HashMap<Uuid, Note>>>,
}

impl Memory {
    /// Create a new empty Memory storage
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            notes: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Storage for Memory {
    async fn find_single_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn create_user(&self, values: &CreateUserValues) -> Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            email: values.email.to_string(),
            hashed_password: values.hashed_password.to_string(),
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        };

        self.users.lock().await.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_active_notes(&self, user_id: &Uuid, page: &Page) -> Result<Vec<Note>> {
        let mut notes = self
            .notes
            .lock()
            .await
            .values()
            .filter(|note| &note.user_id == user_id && !note.is_deleted)
            .cloned()
            .collect::<Vec<Note>>();

        notes.sort_by(|left, right| right.created_at.cmp(&left.created_at));

        Ok(notes
            .into_iter()
            .skip(usize::try_from(page.offset).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn find_trashed_notes(&self, user_id: &Uuid) -> Result<Vec<Note>> {
        let mut notes = self
            .notes
            .lock()
            .await
            .values()
            .filter(|note| &note.user_id == user_id && note.is_deleted)
            .cloned()
            .collect::<Vec<Note>>();

        notes.sort_by(|left, right| right.created_at.cmp(&left.created_at));

        Ok(notes)
    }

    async fn create_note(&self, values: &CreateNoteValues) -> Result<Note> {
        let note = Note {
            id: Uuid::new_v4(),
            user_id: *values.user,
            title: values.title.to_string(),
            content: values.content.to_string(),
            is_deleted: false,
            deleted_at: None,
            created_at: Utc::now().naive_utc(),
            updated_at: Utc::now().naive_utc(),
        };

        self.notes.lock().await.insert(note.id, note.clone());

        Ok(note)
    }

    async fn update_note(
        &self,
        user_id: &Uuid,
        note_id: &Uuid,
        values: &UpdateNoteValues<'_>,
    ) -> Result<Option<Note>> {
        Ok(self
            .notes
            .lock()
            .await
            .get_mut(note_id)
            .filter(|note| &note.user_id == user_id && !note.is_deleted)
            .map(|note| {
                if let Some(title) = values.title {
                    note.title = title.to_string();
                }

                if let Some(content) = values.content {
                    note.content = content.to_string();
                }

                note.updated_at = Utc::now().naive_utc();

                note.clone()
            }))
    }

    async fn trash_note(&self, user_id: &Uuid, note_id: &Uuid) -> Result<Option<Note>> {
        Ok(self
            .notes
            .lock()
            .await
            .get_mut(note_id)
            .filter(|note| &note.user_id == user_id && !note.is_deleted)
            .map(|note| {
                note.is_deleted = true;
                note.deleted_at = Some(Utc::now().naive_utc());
                note.updated_at = Utc::now().naive_utc();

                note.clone()
            }))
    }

    async fn restore_note(&self, user_id: &Uuid, note_id: &Uuid) -> Result<Option<Note>> {
        Ok(self
            .notes
            .lock()
            .await
            .get_mut(note_id)
            .filter(|note| &note.user_id == user_id && note.is_deleted)
            .map(|note| {
                note.is_deleted = false;
                note.deleted_at = None;
                note.updated_at = Utc::now().naive_utc();

                note.clone()
            }))
    }

    async fn purge_note(&self, user_id: &Uuid, note_id: &Uuid) -> Result<Option<Note>> {
        let mut notes = self.notes.lock().await;

        let matches = notes
            .get(note_id)
            .is_some_and(|note| &note.user_id == user_id && note.is_deleted);

        if matches {
            Ok(notes.remove(note_id))
        } else {
            Ok(None)
        }
    }
}
