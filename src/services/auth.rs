// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth2 authorization-code flow with PKCE against the WHOOP auth server.
//!
//! Handles:
//! - Authorization URL construction with a fresh PKCE pair and state
//! - Code exchange from the pasted redirect URL
//! - Token refresh
//! - Persisting every successful token through the configured store

use crate::error::{AppError, Result};
use crate::models::{Credentials, Token, TokenResponse};
use crate::store::TokenStore;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;

/// WHOOP OAuth endpoints.
const AUTH_URL: &str = "https://api.prod.whoop.com/oauth/oauth2/auth";
const TOKEN_URL: &str = "https://api.prod.whoop.com/oauth/oauth2/token";

/// Bound on any single token endpoint request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Characters allowed in a PKCE code verifier (the RFC 7636 unreserved set).
const VERIFIER_CHARS: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// Verifier length in characters (RFC 7636 allows 43 to 128).
const VERIFIER_LEN: usize = 64;

// ─────────────────────────────────────────────────────────────────────────────
// PKCE
// ─────────────────────────────────────────────────────────────────────────────

/// PKCE verifier/challenge pair for one authorization attempt.
///
/// The verifier stays with the client until the code exchange and is used
/// exactly once; the challenge is what goes into the authorization URL.
#[derive(Debug, Clone)]
pub struct PkcePair {
    pub code_verifier: String,
    pub code_challenge: String,
}

impl PkcePair {
    /// Generate a fresh pair with a cryptographically random verifier.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code_verifier: String = (0..VERIFIER_LEN)
            .map(|_| {
                let idx = rng.gen_range(0..VERIFIER_CHARS.len());
                VERIFIER_CHARS[idx] as char
            })
            .collect();

        let code_challenge = challenge_for(&code_verifier);

        Self {
            code_verifier,
            code_challenge,
        }
    }
}

/// base64url(SHA-256(verifier)) with padding stripped.
fn challenge_for(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Random opaque state parameter tying a redirect back to this attempt.
fn generate_state() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Everything one authorization attempt needs: the URL to open in a browser,
/// the state the redirect must echo, and the PKCE pair for the exchange.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
    pub pkce: PkcePair,
}

// ─────────────────────────────────────────────────────────────────────────────
// AuthService - OAuth flow with token persistence
// ─────────────────────────────────────────────────────────────────────────────

/// Drives the OAuth2 flow and owns token persistence.
///
/// Every successful exchange or refresh overwrites the stored token whole;
/// no partial token ever survives.
pub struct AuthService {
    http: reqwest::Client,
    token_url: String,
    auth_url: String,
    credentials: Credentials,
    store: Arc<dyn TokenStore>,
}

impl AuthService {
    /// Create a service talking to the real WHOOP endpoints.
    pub fn new(credentials: Credentials, store: Arc<dyn TokenStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url: TOKEN_URL.to_string(),
            auth_url: AUTH_URL.to_string(),
            credentials,
            store,
        }
    }

    /// Create a service with custom endpoints (for testing with a mock server).
    pub fn with_endpoints(
        credentials: Credentials,
        store: Arc<dyn TokenStore>,
        auth_url: String,
        token_url: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            token_url,
            auth_url,
            credentials,
            store,
        }
    }

    /// Build the authorization URL for the user to open in a browser.
    ///
    /// Pure construction: a fresh PKCE pair and state each call, no network.
    pub fn begin_authorization(&self) -> AuthorizationRequest {
        let pkce = PkcePair::generate();
        let state = generate_state();

        let url = format!(
            "{}?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             scope={}&\
             code_challenge={}&\
             code_challenge_method=S256&\
             state={}",
            self.auth_url,
            self.credentials.client_id,
            urlencoding::encode(&self.credentials.redirect_uri),
            urlencoding::encode(&self.credentials.scope_param()),
            pkce.code_challenge,
            state,
        );

        AuthorizationRequest { url, state, pkce }
    }

    /// Exchange the authorization code for a token.
    ///
    /// `redirect_url` is the full URL the browser landed on after consent.
    /// Verifies the echoed state, rejects provider errors, POSTs the code
    /// with the PKCE verifier, and persists the token on success.
    pub async fn exchange_code(
        &self,
        request: &AuthorizationRequest,
        redirect_url: &str,
    ) -> Result<Token> {
        let code = parse_redirect(redirect_url, &request.state)?;

        let response = self
            .http
            .post(&self.token_url)
            .timeout(REQUEST_TIMEOUT)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code.as_str()),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("code_verifier", request.pkce.code_verifier.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Token exchange request failed: {}", e)))?;

        let token = self.token_from_response(response, "Token exchange").await?;
        self.store.save(&token)?;

        tracing::info!(scope = %token.scope, "Authorization complete, token stored");
        Ok(token)
    }

    /// Refresh an expiring token.
    ///
    /// The persisted token is replaced whole on success; no field of the old
    /// token survives.
    pub async fn refresh(&self, token: &Token) -> Result<Token> {
        let response = self
            .http
            .post(&self.token_url)
            .timeout(REQUEST_TIMEOUT)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", token.refresh_token.as_str()),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Token refresh request failed: {}", e)))?;

        let refreshed = self.token_from_response(response, "Token refresh").await?;
        self.store.save(&refreshed)?;

        tracing::info!("Access token refreshed");
        Ok(refreshed)
    }

    /// Read the persisted token, if any.
    pub fn load_token(&self) -> Result<Option<Token>> {
        self.store.load()
    }

    /// Load the stored token, refreshing it when it is expired or inside the
    /// refresh margin.
    ///
    /// Fails with an auth error when no token is stored at all.
    pub async fn valid_access_token(&self) -> Result<Token> {
        let token = self
            .store
            .load()?
            .ok_or_else(|| {
                AppError::Auth("No stored token; run `whoop-sync auth` first".to_string())
            })?;

        if !token.needs_refresh(Utc::now()) {
            return Ok(token);
        }

        tracing::info!("Access token expired or expiring soon, refreshing");
        self.refresh(&token).await
    }

    /// Check a token endpoint response and build the persisted token.
    async fn token_from_response(
        &self,
        response: reqwest::Response,
        operation: &str,
    ) -> Result<Token> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "{} failed", operation);
            return Err(AppError::Auth(format!(
                "{} failed with status {}: {}",
                operation, status, body
            )));
        }

        let parsed: TokenResponse = response.json().await.map_err(|e| {
            AppError::Auth(format!(
                "{} returned an incomplete token payload: {}",
                operation, e
            ))
        })?;

        Ok(Token::from_response(parsed, Utc::now()))
    }
}

/// Extract the authorization code from the pasted redirect URL.
///
/// Rejects provider `error` responses and a state echo that does not match
/// the one we sent.
fn parse_redirect(redirect_url: &str, expected_state: &str) -> Result<String> {
    let url = url::Url::parse(redirect_url)
        .map_err(|e| AppError::Auth(format!("Invalid redirect URL: {}", e)))?;

    let mut code = None;
    let mut state = None;
    let mut error = None;

    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(AppError::Auth(format!(
            "Authorization was denied: {}",
            error
        )));
    }

    match state {
        Some(echoed) if echoed == expected_state => {}
        Some(_) => {
            return Err(AppError::Auth(
                "State in redirect URL does not match this authorization attempt".to_string(),
            ))
        }
        None => {
            return Err(AppError::Auth(
                "Redirect URL is missing the state parameter".to_string(),
            ))
        }
    }

    code.ok_or_else(|| AppError::Auth("Redirect URL is missing the code parameter".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryTokenStore;
    use std::collections::HashMap;

    fn test_service() -> AuthService {
        let credentials = Credentials {
            client_id: "test_client_id".to_string(),
            client_secret: "test_secret".to_string(),
            redirect_uri: "http://localhost:8080/callback".to_string(),
            scopes: Credentials::default_scopes(),
        };
        AuthService::new(credentials, Arc::new(MemoryTokenStore::new()))
    }

    #[test]
    fn test_challenge_matches_rfc_7636_vector() {
        // Appendix B of RFC 7636
        let challenge = challenge_for("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
        assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    }

    #[test]
    fn test_verifier_charset_and_length() {
        let pair = PkcePair::generate();
        assert_eq!(pair.code_verifier.len(), VERIFIER_LEN);
        assert!(pair
            .code_verifier
            .bytes()
            .all(|b| VERIFIER_CHARS.contains(&b)));
        // Challenge is unpadded base64url of a 32-byte digest
        assert_eq!(pair.code_challenge.len(), 43);
        assert!(!pair.code_challenge.contains('='));
    }

    #[test]
    fn test_verifiers_are_not_reused() {
        let service = test_service();
        let first = service.begin_authorization();
        let second = service.begin_authorization();
        assert_ne!(first.pkce.code_verifier, second.pkce.code_verifier);
        assert_ne!(first.state, second.state);
    }

    #[test]
    fn test_authorization_url_parameters() {
        let service = test_service();
        let request = service.begin_authorization();

        let url = url::Url::parse(&request.url).expect("authorization URL should parse");
        let params: HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(params["client_id"], "test_client_id");
        assert_eq!(params["redirect_uri"], "http://localhost:8080/callback");
        assert_eq!(params["response_type"], "code");
        assert_eq!(
            params["scope"],
            "offline read:profile read:workout read:sleep read:recovery"
        );
        assert_eq!(params["code_challenge"], request.pkce.code_challenge);
        assert_eq!(params["code_challenge_method"], "S256");
        assert_eq!(params["state"], request.state);
    }

    #[test]
    fn test_parse_redirect_extracts_code() {
        let code = parse_redirect(
            "http://localhost:8080/callback?code=abc123&state=xyz",
            "xyz",
        )
        .unwrap();
        assert_eq!(code, "abc123");
    }

    #[test]
    fn test_parse_redirect_rejects_state_mismatch() {
        let err = parse_redirect(
            "http://localhost:8080/callback?code=abc123&state=other",
            "xyz",
        )
        .unwrap_err();
        assert!(err.to_string().contains("State"));
    }

    #[test]
    fn test_parse_redirect_rejects_provider_error() {
        let err = parse_redirect(
            "http://localhost:8080/callback?error=access_denied&state=xyz",
            "xyz",
        )
        .unwrap_err();
        assert!(err.to_string().contains("access_denied"));
    }

    #[test]
    fn test_parse_redirect_requires_code_and_state() {
        assert!(parse_redirect("http://localhost:8080/callback?state=xyz", "xyz").is_err());
        assert!(parse_redirect("http://localhost:8080/callback?code=abc123", "xyz").is_err());
        assert!(parse_redirect("not a url", "xyz").is_err());
    }
}
