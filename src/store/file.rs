// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed token store.

use crate::error::{AppError, Result};
use crate::models::Token;
use crate::store::TokenStore;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Token store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Token>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::TokenStore(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        let token = serde_json::from_str(&contents).map_err(|e| {
            AppError::TokenStore(format!(
                "corrupt token file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(Some(token))
    }

    fn save(&self, token: &Token) -> Result<()> {
        let json = serde_json::to_string_pretty(token)
            .map_err(|e| AppError::TokenStore(format!("failed to serialize token: {}", e)))?;

        // Atomic write: temp file, fsync, then rename over the real path, so
        // no reader ever sees a half-written token.
        let tmp_path = self.path.with_extension("tmp");

        let mut file = File::create(&tmp_path).map_err(|e| {
            AppError::TokenStore(format!("failed to create {}: {}", tmp_path.display(), e))
        })?;
        file.write_all(json.as_bytes()).map_err(|e| {
            AppError::TokenStore(format!("failed to write {}: {}", tmp_path.display(), e))
        })?;
        file.sync_all().map_err(|e| {
            AppError::TokenStore(format!("failed to sync {}: {}", tmp_path.display(), e))
        })?;

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            AppError::TokenStore(format!(
                "failed to move token into {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %self.path.display(), "Token persisted");
        Ok(())
    }
}
