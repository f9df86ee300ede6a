// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth token models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Margin before token expiration when we proactively refresh (5 minutes).
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 5 * 60;

/// Token payload returned by the WHOOP token endpoint.
///
/// Every field is required: a payload missing any of them fails the exchange
/// rather than producing a partial token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
    pub scope: String,
}

/// OAuth token persisted between runs.
///
/// Written whole on every exchange or refresh and read back at session start.
/// `expires_at` is stamped from `expires_in` when the token is received, so a
/// later run can tell whether the access token is still usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Bearer token sent on API requests
    pub access_token: String,
    /// Token used to obtain the next access token
    pub refresh_token: String,
    /// Access token lifetime in seconds, as reported by the server
    pub expires_in: i64,
    /// Token type (always "bearer")
    pub token_type: String,
    /// Granted OAuth scopes, space-delimited
    pub scope: String,
    /// When the access token expires
    pub expires_at: DateTime<Utc>,
}

impl Token {
    /// Build a persisted token from a token endpoint response, stamping the
    /// expiry time.
    pub fn from_response(response: TokenResponse, received_at: DateTime<Utc>) -> Self {
        let expires_at = received_at + Duration::seconds(response.expires_in);
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in,
            token_type: response.token_type,
            scope: response.scope,
            expires_at,
        }
    }

    /// True when the access token is expired or expires within the refresh
    /// margin.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) >= self.expires_at
    }
}
