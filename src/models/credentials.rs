// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth application credentials.

/// WHOOP OAuth application credentials.
///
/// Immutable once constructed; loaded from the environment at startup.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// OAuth client ID (public)
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Redirect URI registered with the WHOOP application
    pub redirect_uri: String,
    /// OAuth scopes to request
    pub scopes: Vec<String>,
}

impl Credentials {
    /// Offline access plus read access to profile, workouts, sleep and
    /// recovery.
    pub fn default_scopes() -> Vec<String> {
        [
            "offline",
            "read:profile",
            "read:workout",
            "read:sleep",
            "read:recovery",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    /// Space-delimited scope string as sent to the authorization endpoint.
    pub fn scope_param(&self) -> String {
        self.scopes.join(" ")
    }
}
