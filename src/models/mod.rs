// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod credentials;
pub mod record;
pub mod token;

pub use credentials::Credentials;
pub use record::{CollectionPage, Record, Resource};
pub use token::{Token, TokenResponse};
