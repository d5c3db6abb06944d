use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use crate::core::validation::{validate_youtube_url, ValidationError};
use crate::download::variant::Variant;

/// Unique key of one download request.
///
/// Embedded in the staged filename so the produced artifact can be located
/// without guessing, even when the same user has several requests in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(Uuid);

impl RequestToken {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

/// A validated, immutable download request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    url: String,
    variant: Variant,
    user_id: i64,
    token: RequestToken,
    requested_at: DateTime<Utc>,
}

impl DownloadRequest {
    /// Builds a request, rejecting URLs that are not YouTube links.
    pub fn new(url: impl Into<String>, variant: Variant, user_id: i64) -> Result<Self, ValidationError> {
        let url = url.into().trim().to_string();
        validate_youtube_url(&url)?;
        Ok(Self {
            url,
            variant,
            user_id,
            token: RequestToken::new(),
            requested_at: Utc::now(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn token(&self) -> RequestToken {
        self.token
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    /// `{type}_{user_id}_{token}_`, the fixed part of the staged filename
    pub fn file_prefix(&self) -> String {
        format!("{}_{}_{}_", self.variant.kind(), self.user_id, self.token)
    }
}
