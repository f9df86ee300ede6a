// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Credentials come from the environment (or a `.env` file) so they never
//! live in the repository; everything else has a sensible default.

use crate::models::Credentials;
use std::env;
use std::path::PathBuf;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// WHOOP OAuth application credentials
    pub credentials: Credentials,
    /// Where the OAuth token is persisted between runs
    pub token_path: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            credentials: Credentials {
                client_id: "test_client_id".to_string(),
                client_secret: "test_secret".to_string(),
                redirect_uri: "http://localhost:8080/callback".to_string(),
                scopes: Credentials::default_scopes(),
            },
            token_path: PathBuf::from("token.json"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `WHOOP_CLIENT_ID` and `WHOOP_CLIENT_SECRET` are required; the redirect
    /// URI, scope list and token file path fall back to defaults matching the
    /// WHOOP app registration used for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let credentials = Credentials {
            client_id: env::var("WHOOP_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("WHOOP_CLIENT_ID"))?,
            client_secret: env::var("WHOOP_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("WHOOP_CLIENT_SECRET"))?,
            redirect_uri: env::var("WHOOP_REDIRECT_URI")
                .unwrap_or_else(|_| "http://localhost:8080/callback".to_string()),
            scopes: match env::var("WHOOP_SCOPES") {
                Ok(list) => list.split_whitespace().map(str::to_string).collect(),
                Err(_) => Credentials::default_scopes(),
            },
        };

        Ok(Self {
            credentials,
            token_path: env::var("WHOOP_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("token.json")),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test since env vars are process-global and tests run in parallel.
    #[test]
    fn test_config_from_env() {
        env::remove_var("WHOOP_CLIENT_ID");
        env::remove_var("WHOOP_CLIENT_SECRET");
        env::remove_var("WHOOP_REDIRECT_URI");
        env::remove_var("WHOOP_SCOPES");
        env::remove_var("WHOOP_TOKEN_FILE");

        // from_env must name the missing variable
        match Config::from_env() {
            Err(ConfigError::Missing(name)) => assert_eq!(name, "WHOOP_CLIENT_ID"),
            other => panic!("expected missing-variable error, got {:?}", other),
        }

        env::set_var("WHOOP_CLIENT_ID", "test_id");
        env::set_var("WHOOP_CLIENT_SECRET", " test_secret ");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.credentials.client_id, "test_id");
        assert_eq!(config.credentials.client_secret, "test_secret");
        assert_eq!(
            config.credentials.redirect_uri,
            "http://localhost:8080/callback"
        );
        assert_eq!(config.credentials.scopes.len(), 5);
        assert_eq!(config.token_path, PathBuf::from("token.json"));
    }
}
