use chrono::naive::NaiveDateTime;
use uuid::Uuid;

/// A note, owned by a single user
///
/// A note is either active or trashed; `is_deleted` and `deleted_at` move
/// together, a trashed note always has a `deleted_at`
#[derive(Clone, Debug)]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub is_deleted: bool,
    pub deleted_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
