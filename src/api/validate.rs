//! Input validation
//!
//! Pure functions: raw input in, typed value or a Bad Request out. A failed
//! validation never reaches the storage layer.

use serde::Deserialize;

use crate::storage::Page;

use super::Error;

/// Maximum length of a note title, in characters
const MAX_TITLE_LENGTH: usize = 100;

/// Maximum length of a note content, in characters
const MAX_CONTENT_LENGTH: usize = 5000;

/// First page when none is requested
const DEFAULT_PAGE: u32 = 1;

/// Page size when none is requested
const DEFAULT_LIMIT: u32 = 20;

/// Upper clamp on the requested page size
const MAX_LIMIT: u32 = 50;

/// Validate signup/signin credentials
///
/// Both the email and the password just need to be non-empty, anything
/// stricter is not this layer's call
pub fn parse_credentials<'c>(email: &'c str, password: &'c str) -> Result<(&'c str, &'c str), Error> {
    if email.is_empty() || password.is_empty() {
        return Err(Error::bad_request("Missing credentials"));
    }

    Ok((email, password))
}

/// Validate a note title: 1 up to 100 characters
pub fn parse_title(title: &str) -> Result<&str, Error> {
    let length = title.chars().count();

    if length == 0 || length > MAX_TITLE_LENGTH {
        return Err(Error::bad_request("Title must be 1 to 100 characters"));
    }

    Ok(title)
}

/// Validate a note content: 1 up to 5000 characters
pub fn parse_content(content: &str) -> Result<&str, Error> {
    let length = content.chars().count();

    if length == 0 || length > MAX_CONTENT_LENGTH {
        return Err(Error::bad_request("Content must be 1 to 5000 characters"));
    }

    Ok(content)
}

/// Raw pagination query parameters
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Requested page, 1-based
    page: Option<u32>,

    /// Requested page size
    limit: Option<u32>,
}

impl ListQuery {
    /// Clamp the raw query into an actual page
    ///
    /// Missing values get defaults (page 1, limit 20), the page is clamped to
    /// at least 1 and the limit to 1 up to 50
    pub fn clamp(&self) -> Page {
        let page = self.page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

        Page {
            offset: u64::from(page - 1) * u64::from(limit),
            limit: u64::from(limit),
        }
    }
}
