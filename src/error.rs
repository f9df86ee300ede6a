// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.

use chrono::{DateTime, Utc};

/// Application error type covering the token lifecycle and collection fetch.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("WHOOP API error (HTTP {status}): {body}")]
    Fetch { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Token store error: {0}")]
    TokenStore(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// True when the stored token is no longer usable and the user has to
    /// re-run the authorization flow.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, AppError::Auth(_) | AppError::Fetch { status: 401, .. })
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
