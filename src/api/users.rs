//! Signup and signin

use axum::Extension;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::password::hash;
use crate::password::verify;
use crate::storage::CreateUserValues;
use crate::storage::Storage;

use super::Error;
use super::Form;
use super::JwtKeys;
use super::Success;
use super::current_user::Token;
use super::current_user::generate_token;
use super::rate_limit::SigninLimit;
use super::rate_limit::SignupLimit;
use super::validate::parse_credentials;

/// Signup/signin form
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsForm {
    /// Email address of the user
    email: String,

    /// Password of the user
    password: String,
}

/// The signup response information
///
/// Deliberately sparse, nothing sensitive is echoed back
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    /// The ID of the new user
    pub user_id: Uuid,
}

/// Register a new user
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "email": "user@example.com", "password": "verysecret" }' \
///     http://localhost:3000/user/signup
/// ```
///
/// Response:
/// ```json
/// { "userId": "<uuid>" }
/// ```
pub async fn signup<S: Storage>(
    _rate_limit: SignupLimit,
    Extension(storage): Extension<S>,
    Form(form): Form<CredentialsForm>,
) -> Result<Success<SignupResponse>, Error> {
    let (email, password) = parse_credentials(&form.email, &form.password)?;

    let user = storage
        .find_single_user_by_email(email)
        .await
        .map_err(Error::internal_server_error)?;

    if user.is_some() {
        return Err(Error::conflict("User already exists"));
    }

    let hashed_password = hash(password);

    let values = CreateUserValues {
        email,
        hashed_password: &hashed_password,
    };

    let user = storage
        .create_user(&values)
        .await
        .map_err(Error::internal_server_error)?;

    Ok(Success::created(SignupResponse { user_id: user.id }))
}

/// Get a token for a user "session"
///
/// The token can then be used to access the notes routes by using it in the
/// `Authorization` header. Unknown email and wrong password are deliberately
/// indistinguishable.
///
/// Request:
/// ```sh
/// curl -v -H 'Content-Type: application/json' \
///     -d '{ "email": "user@example.com", "password": "verysecret" }' \
///     http://localhost:3000/user/signin
/// ```
///
/// Response:
/// ```json
/// { "token": "some token" }
/// ```
pub async fn signin<S: Storage>(
    _rate_limit: SigninLimit,
    Extension(jwt_keys): Extension<JwtKeys>,
    Extension(storage): Extension<S>,
    Form(form): Form<CredentialsForm>,
) -> Result<Success<Token>, Error> {
    let (email, password) = parse_credentials(&form.email, &form.password)?;

    let user = storage
        .find_single_user_by_email(email)
        .await
        .map_err(Error::internal_server_error)?;

    if let Some(user) = user {
        if verify(&user.hashed_password, password) {
            let token = generate_token(&jwt_keys, &user)?;

            Ok(Success::ok(token))
        } else {
            Err(Error::unauthorized("Invalid credentials"))
        }
    } else {
        Err(Error::unauthorized("Invalid credentials"))
    }
}
