//! All API endpoint setup

use axum::Router;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::routing::put;

pub use current_user::CurrentUser;
pub use current_user::JwtKeys;
pub use rate_limit::RateLimiter;
pub use request::Form;
pub use request::PathParameters;
pub use response::Error;
pub use response::Success;

use crate::storage::Storage;

mod current_user;
mod notes;
mod rate_limit;
mod request;
mod response;
mod users;
mod validate;

/// Get the Axum router for all API routes
///
/// Meant to be nested under `/user`
pub fn router<S: Storage>() -> Router {
    let notes = Router::new()
        .route("/", get(notes::list::<S>))
        .route("/", post(notes::create::<S>))
        .route("/trash", get(notes::list_trash::<S>))
        .route("/{note}", put(notes::update::<S>))
        .route("/{note}", delete(notes::trash::<S>))
        .route("/{note}/restore", patch(notes::restore::<S>))
        .route("/{note}/permanent", delete(notes::purge::<S>));

    Router::new()
        .route("/signup", post(users::signup::<S>))
        .route("/signin", post(users::signin::<S>))
        .nest("/notes", notes)
}
