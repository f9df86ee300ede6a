// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! whoop-sync: pull workout, sleep and recovery data from the WHOOP API
//!
//! This crate drives the OAuth2 authorization-code flow with PKCE against
//! the WHOOP auth server, persists the resulting token, and pages through
//! the v2 developer API collection endpoints with rate-limit backoff.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod time_utils;
