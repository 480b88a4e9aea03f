use chrono::naive::NaiveDateTime;
use uuid::Uuid;

/// A registered user
///
/// Only ever created through signup, immutable after that
#[derive(Clone, Debug)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
