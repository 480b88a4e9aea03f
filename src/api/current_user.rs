//! Current user service
//!
//! Get the current user from the request based on the Authorization header.
//! The identity comes straight from the verified token claims and is threaded
//! through handlers as an explicit value, the request itself is never touched.

use axum::Extension;
use axum::RequestPartsExt;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::api::Error;
use crate::users::User;

/// Token lifetime: 7 days
const TOKEN_LIFETIME_SECONDS: i64 = 7 * 24 * 60 * 60;

/// The keys used for encoding/decoding JWT tokens
#[derive(Clone)]
pub struct JwtKeys {
    /// The encoding key
    encoding: EncodingKey,

    /// The decoding key
    decoding: DecodingKey,
}

impl JwtKeys {
    /// Create new encoding/decoding keys, derived from a secret
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// The JWT claims that identify a user
#[derive(Debug, Deserialize, Serialize)]
struct Claims {
    /// The user ID
    sub: Uuid,

    /// The email address of the user
    email: String,

    /// Expiration, as a unix timestamp
    exp: i64,
}

/// Token information served to the user
#[derive(Debug, Serialize)]
pub struct Token {
    /// The token to provide on follow up requests in the Authorization header
    token: String,
}

/// The authenticated identity, as embedded in the token claims
#[derive(Clone, Debug)]
pub struct CurrentUser {
    /// The user ID
    pub id: Uuid,

    /// The email address of the user
    #[allow(dead_code)] // part of the claims contract
    pub email: String,
}

/// Generate a token for the outside world for a given user
pub fn generate_token(jwt_keys: &JwtKeys, user: &User) -> Result<Token, Error> {
    use jsonwebtoken::Header;
    use jsonwebtoken::encode;

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        exp: chrono::Utc::now().timestamp() + TOKEN_LIFETIME_SECONDS,
    };

    let token = encode(&Header::default(), &claims, &jwt_keys.encoding)
        .map_err(Error::internal_server_error)?;

    Ok(Token { token })
}

impl<B> FromRequestParts<B> for CurrentUser
where
    B: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &B) -> Result<Self, Self::Rejection> {
        use jsonwebtoken::Validation;
        use jsonwebtoken::decode;

        // Extract the token from the authorization header
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| Error::unauthorized("Token missing"))?;

        let Extension(jwt_keys) = parts
            .extract::<Extension<JwtKeys>>()
            .await
            .map_err(|_| Error::internal_server_error("Could not get JWT keys"))?;

        let validation = Validation::default();

        // Decode the identity claims; signature and expiry are checked here
        let token_data = decode::<Claims>(bearer.token(), &jwt_keys.decoding, &validation)
            .map_err(|_| Error::unauthorized("Invalid token"))?;

        let claims = token_data.claims;

        Ok(CurrentUser {
            id: claims.sub,
            email: claims.email,
        })
    }
}
