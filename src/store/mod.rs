// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token persistence layer.
//!
//! The token file is the only durable state in the application. Persistence
//! sits behind the `TokenStore` trait so tests can swap in an in-memory
//! store.

pub mod file;
pub mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use crate::error::Result;
use crate::models::Token;

/// Pluggable persistence for the OAuth token.
pub trait TokenStore: Send + Sync {
    /// Read the persisted token. Absence is a normal outcome, not an error;
    /// only unreadable or corrupt state fails.
    fn load(&self) -> Result<Option<Token>>;

    /// Persist the token, replacing any previous one whole.
    fn save(&self, token: &Token) -> Result<()>;
}
