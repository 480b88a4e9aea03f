//! Fixed window rate limiting for the auth routes
//!
//! Counters are keyed by client address and scope, each scope has its own
//! budget. A window starts at the first request for a key and expires on its
//! own through the cache TTL. Over-budget requests are rejected before any
//! validation or storage work happens.

use std::net::IpAddr;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use std::time::Duration;

use axum::Extension;
use axum::RequestPartsExt;
use axum::extract::ConnectInfo;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use moka::future::Cache;

use super::Error;

/// Length of a rate limit window
const WINDOW: Duration = Duration::from_secs(60);

/// Signup attempts allowed per window
const SIGNUP_BUDGET: u32 = 5;

/// Signin attempts allowed per window
const SIGNIN_BUDGET: u32 = 10;

/// The throttled operations
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum Scope {
    Signup,
    Signin,
}

impl Scope {
    /// Requests allowed per window for this scope
    fn budget(self) -> u32 {
        match self {
            Scope::Signup => SIGNUP_BUDGET,
            Scope::Signin => SIGNIN_BUDGET,
        }
    }
}

/// Fixed window counters, one per client address and scope
///
/// Counters live in a TTL cache; an expired entry IS the window reset. The
/// increments are atomic, concurrent bursts never undercount.
#[derive(Clone)]
pub struct RateLimiter {
    /// The counter per window
    counters: Cache<(Scope, IpAddr), Arc<AtomicU32>>,
}

impl RateLimiter {
    /// Create a rate limiter with fresh windows
    pub fn new() -> Self {
        Self {
            counters: Cache::builder().time_to_live(WINDOW).build(),
        }
    }

    /// Count a request against a scope budget
    async fn try_acquire(&self, scope: Scope, address: IpAddr) -> Result<(), Error> {
        let counter = self
            .counters
            .get_with((scope, address), async { Arc::new(AtomicU32::new(0)) })
            .await;

        let count = counter.fetch_add(1, Ordering::Relaxed) + 1;

        if count > scope.budget() {
            Err(Error::too_many_requests(
                "Too many requests. Please try again later",
            ))
        } else {
            Ok(())
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

async fn check(parts: &mut Parts, scope: Scope) -> Result<(), Error> {
    let ConnectInfo(address) = parts
        .extract::<ConnectInfo<SocketAddr>>()
        .await
        .map_err(|_| Error::internal_server_error("Missing client address"))?;

    let Extension(rate_limiter) = parts
        .extract::<Extension<RateLimiter>>()
        .await
        .map_err(|_| Error::internal_server_error("Could not get the rate limiter"))?;

    rate_limiter.try_acquire(scope, address.ip()).await
}

/// Guard for the signup route: 5 attempts per minute per client
pub struct SignupLimit;

impl<B> FromRequestParts<B> for SignupLimit
where
    B: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &B) -> Result<Self, Self::Rejection> {
        check(parts, Scope::Signup).await?;

        Ok(SignupLimit)
    }
}

/// Guard for the signin route: 10 attempts per minute per client
pub struct SigninLimit;

impl<B> FromRequestParts<B> for SigninLimit
where
    B: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &B) -> Result<Self, Self::Rejection> {
        check(parts, Scope::Signin).await?;

        Ok(SigninLimit)
    }
}
