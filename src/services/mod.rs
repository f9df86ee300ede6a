// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - the OAuth flow and the collection fetcher.

pub mod auth;
pub mod fetcher;

pub use auth::{AuthService, AuthorizationRequest, PkcePair};
pub use fetcher::{CancelFlag, CollectionFetcher, FetchOptions, UserProfile};
