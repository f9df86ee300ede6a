// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::time::Duration as StdDuration;
use whoop_sync::models::{Credentials, Token};
use whoop_sync::services::FetchOptions;

/// Credentials for a fake WHOOP application.
pub fn test_credentials() -> Credentials {
    Credentials {
        client_id: "test_client_id".to_string(),
        client_secret: "test_secret".to_string(),
        redirect_uri: "http://localhost:8080/callback".to_string(),
        scopes: Credentials::default_scopes(),
    }
}

/// A stored token that is still far from expiry.
pub fn test_token() -> Token {
    Token {
        access_token: "test_access_token".to_string(),
        refresh_token: "test_refresh_token".to_string(),
        expires_in: 3600,
        token_type: "bearer".to_string(),
        scope: "offline read:workout read:sleep read:recovery".to_string(),
        expires_at: Utc::now() + Duration::hours(1),
    }
}

/// Fetch options with the backoff and page delay shrunk so tests run in
/// milliseconds. The policy under test is unchanged, only the intervals.
pub fn fast_options() -> FetchOptions {
    FetchOptions {
        rate_limit_backoff: StdDuration::from_millis(5),
        page_delay: StdDuration::from_millis(5),
        ..FetchOptions::default()
    }
}

/// A fixed one-week range used across the fetch tests.
pub fn test_range() -> (DateTime<Utc>, DateTime<Utc>) {
    (
        Utc.with_ymd_and_hms(2025, 1, 8, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap(),
    )
}
