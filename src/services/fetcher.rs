// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! WHOOP collection fetcher with cursor pagination and rate-limit backoff.
//!
//! Handles:
//! - Paginated record fetching for the workout/sleep/recovery collections
//! - Fixed-interval retry on 429 without losing accumulated records
//! - Exact truncation at a caller-supplied record cap
//! - Cooperative cancellation that returns what was fetched so far

use crate::error::{AppError, Result};
use crate::models::{CollectionPage, Record, Resource, Token};
use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// WHOOP v2 developer API base URL.
const BASE_URL: &str = "https://api.prod.whoop.com/developer/v2";

/// Bound on any single collection request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fixed sleep before retrying a rate-limited request.
const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(30);

/// Courtesy pause between successful pages.
const PAGE_DELAY: Duration = Duration::from_secs(1);

/// Records requested per page (the server caps collection pages at 25).
const DEFAULT_PAGE_LIMIT: u32 = 25;

/// Consecutive 429s tolerated for one request before giving up: an hour at
/// the fixed backoff. Normal runs never get close.
const MAX_RATE_LIMIT_RETRIES: u32 = 120;

/// Shared flag for cooperative cancellation of a fetch in progress.
///
/// The fetcher checks it before each request; once set, no further requests
/// are issued and the records accumulated so far are returned.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Knobs for one fetch call.
///
/// The defaults reproduce the behavior the WHOOP API is known to tolerate:
/// pages of 25, no record cap, 30 s backoff on 429, 1 s between pages, and
/// failures discard accumulated records.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Records requested per page
    pub page_limit: u32,
    /// Hard cap on returned records; None fetches everything in range
    pub max_records: Option<usize>,
    /// Return accumulated records instead of failing when a page errors
    pub keep_partial: bool,
    /// Sleep before retrying a rate-limited request
    pub rate_limit_backoff: Duration,
    /// Pause between successful pages
    pub page_delay: Duration,
    /// Consecutive 429s tolerated per request before giving up
    pub max_rate_limit_retries: u32,
    /// Cooperative cancellation flag, checked before each request
    pub cancel: Option<CancelFlag>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_limit: DEFAULT_PAGE_LIMIT,
            max_records: None,
            keep_partial: false,
            rate_limit_backoff: RATE_LIMIT_BACKOFF,
            page_delay: PAGE_DELAY,
            max_rate_limit_retries: MAX_RATE_LIMIT_RETRIES,
            cancel: None,
        }
    }
}

/// Client for the paginated collection endpoints.
#[derive(Clone)]
pub struct CollectionFetcher {
    http: reqwest::Client,
    base_url: String,
}

impl Default for CollectionFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionFetcher {
    /// Create a fetcher against the real WHOOP developer API.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Create a fetcher with a custom base URL (for testing with a mock server).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetch every record of `resource` between `start` and `end`.
    ///
    /// Pages through the collection with the server's cursor, accumulating
    /// records in server order. Stops at the page without a cursor, at
    /// `options.max_records` (truncating exactly), or when the cancel flag is
    /// set (returning what was accumulated). A 429 sleeps the fixed backoff
    /// and retries the identical request; any other non-success status fails
    /// the fetch.
    pub async fn fetch(
        &self,
        resource: Resource,
        token: &Token,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        options: &FetchOptions,
    ) -> Result<Vec<Record>> {
        if start > end {
            return Err(AppError::InvalidRange { start, end });
        }

        let url = format!("{}/{}", self.base_url, resource.path());
        let start_param = format_utc_rfc3339(start);
        let end_param = format_utc_rfc3339(end);

        let mut records: Vec<Record> = Vec::new();
        let mut next_token: Option<String> = None;
        let mut rate_limit_hits: u32 = 0;

        loop {
            if let Some(cancel) = &options.cancel {
                if cancel.is_cancelled() {
                    tracing::warn!(
                        resource = %resource,
                        fetched = records.len(),
                        "Fetch cancelled, returning records accumulated so far"
                    );
                    return Ok(records);
                }
            }

            let mut query: Vec<(&str, String)> = vec![
                ("start", start_param.clone()),
                ("end", end_param.clone()),
                ("limit", options.page_limit.to_string()),
            ];
            if let Some(cursor) = &next_token {
                query.push(("nextToken", cursor.clone()));
            }

            let response = match self
                .http
                .get(&url)
                .bearer_auth(&token.access_token)
                .query(&query)
                .timeout(REQUEST_TIMEOUT)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => return apply_partial_policy(records, AppError::Request(e), options),
            };

            if response.status().as_u16() == 429 {
                rate_limit_hits += 1;
                if rate_limit_hits > options.max_rate_limit_retries {
                    let body = response.text().await.unwrap_or_default();
                    tracing::error!(
                        resource = %resource,
                        retries = options.max_rate_limit_retries,
                        "Rate limited for too long, giving up"
                    );
                    return apply_partial_policy(
                        records,
                        AppError::Fetch { status: 429, body },
                        options,
                    );
                }

                tracing::warn!(
                    resource = %resource,
                    attempt = rate_limit_hits,
                    "WHOOP rate limit hit (429), backing off"
                );
                tokio::time::sleep(options.rate_limit_backoff).await;
                continue; // retry the same request, same cursor
            }

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                tracing::error!(
                    resource = %resource,
                    status,
                    body = %body,
                    "Collection request failed"
                );
                return apply_partial_policy(records, AppError::Fetch { status, body }, options);
            }

            rate_limit_hits = 0;

            let page: CollectionPage = match response.json().await {
                Ok(page) => page,
                Err(e) => return apply_partial_policy(records, AppError::Request(e), options),
            };

            let page_records = page.records.len();
            records.extend(page.records);
            tracing::info!(
                resource = %resource,
                page_records,
                total = records.len(),
                "Page fetched"
            );

            if let Some(max) = options.max_records {
                if records.len() >= max {
                    records.truncate(max); // never return more than asked for
                    break;
                }
            }

            match page.next_token {
                Some(cursor) => {
                    next_token = Some(cursor);
                    tokio::time::sleep(options.page_delay).await;
                }
                None => break,
            }
        }

        Ok(records)
    }

    /// Fetch the authenticated user's basic profile.
    pub async fn get_profile(&self, token: &Token) -> Result<UserProfile> {
        let url = format!("{}/user/profile/basic", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token.access_token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Fetch { status, body });
        }

        response.json().await.map_err(AppError::Request)
    }
}

/// Apply the partial-results policy to a failed fetch.
///
/// With `keep_partial` set and something already accumulated, the failure is
/// logged and the partial list returned; otherwise the error propagates and
/// the accumulated records are dropped.
fn apply_partial_policy(
    records: Vec<Record>,
    error: AppError,
    options: &FetchOptions,
) -> Result<Vec<Record>> {
    if options.keep_partial && !records.is_empty() {
        tracing::warn!(
            error = %error,
            kept = records.len(),
            "Fetch failed, keeping partial results"
        );
        return Ok(records);
    }
    Err(error)
}

/// Basic profile for the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: u64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}
