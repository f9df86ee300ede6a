// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory token store.

use crate::error::{AppError, Result};
use crate::models::Token;
use crate::store::TokenStore;
use std::sync::Mutex;

/// Token store holding the token in process memory only.
///
/// Used by tests and throwaway flows that should not touch the filesystem.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<Token>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Token>> {
        let guard = self
            .token
            .lock()
            .map_err(|_| AppError::TokenStore("token mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, token: &Token) -> Result<()> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| AppError::TokenStore("token mutex poisoned".to_string()))?;
        *guard = Some(token.clone());
        Ok(())
    }
}
