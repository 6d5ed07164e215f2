// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google Fit REST client for fetching sessions and their distance buckets.
//!
//! Handles:
//! - OAuth access token refresh
//! - Time-windowed session listing filtered by activity type
//! - Per-session aggregate queries bucketed by session
//! - Rate limit and token error detection

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::FitCredentials;
use crate::error::AppError;
use crate::models::fit::{AggregateRequest, AggregateResponse, SessionListResponse};
use crate::models::{Session, SessionRecords};
use crate::time_utils::format_utc_rfc3339;

const FITNESS_BASE_URL: &str = "https://www.googleapis.com/fitness/v1/users/me";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Google Fit API client.
#[derive(Clone)]
pub struct GoogleFitClient {
    http: reqwest::Client,
    base_url: String,
    token_url: String,
}

impl Default for GoogleFitClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleFitClient {
    pub fn new() -> Self {
        Self::with_base_urls(FITNESS_BASE_URL, TOKEN_URL)
    }

    /// Client pointed at alternate endpoints (e.g. a local stub server).
    pub fn with_base_urls(base_url: &str, token_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token_url: token_url.to_string(),
        }
    }

    /// Exchange a refresh token for a fresh access token.
    pub async fn refresh_token(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<TokenRefreshResponse, AppError> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Token refresh request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("JSON parse error: {}", e)))
    }

    /// List the sessions in the query window.
    ///
    /// A windowed listing is complete in one response. Its `nextPageToken`
    /// is a sync token for later incremental listings and the API ignores
    /// `pageToken` whenever `startTime` is sent.
    pub async fn list_sessions(
        &self,
        access_token: &str,
        query: &SessionQuery,
    ) -> Result<SessionListResponse, AppError> {
        let url = format!("{}/sessions", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| AppError::FitApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Aggregate distance for one session, bucketed by session.
    pub async fn aggregate_by_session(
        &self,
        access_token: &str,
        session: &Session,
    ) -> Result<AggregateResponse, AppError> {
        let url = format!("{}/dataset:aggregate", self.base_url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(&AggregateRequest::for_session(session))
            .send()
            .await
            .map_err(|e| AppError::FitApi(e.to_string()))?;

        self.check_response_json(response).await
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Google Fit rate limit hit (429)");
                return Err(AppError::FitApi(AppError::FIT_RATE_LIMIT.to_string()));
            }

            if status.as_u16() == 401 {
                return Err(AppError::FitApi(AppError::FIT_TOKEN_ERROR.to_string()));
            }

            return Err(AppError::FitApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::FitApi(format!("JSON parse error: {}", e)))
    }
}

/// Token response from Google's OAuth endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefreshResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: i64,
}

/// Session listing window and activity filter.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionQuery {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub activity_types: Vec<i32>,
}

impl SessionQuery {
    /// Query string parameters for `users/me/sessions`.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("startTime", format_utc_rfc3339(self.start))];
        if let Some(end) = self.end {
            params.push(("endTime", format_utc_rfc3339(end)));
        }
        params.extend(
            self.activity_types
                .iter()
                .map(|t| ("activityType", t.to_string())),
        );
        params
    }
}

/// Human-readable name for the activity types this tool charts by default.
pub fn activity_type_name(code: i32) -> Option<&'static str> {
    match code {
        1 => Some("Biking"),
        7 => Some("Walking"),
        8 => Some("Running"),
        15 => Some("Mountain biking"),
        16 => Some("Road biking"),
        17 => Some("Spinning"),
        18 => Some("Stationary biking"),
        19 => Some("Utility biking"),
        35 => Some("Hiking"),
        93 => Some("Walking (fitness)"),
        _ => None,
    }
}

/// Drop repeated sessions, keeping the first. Sessions are keyed by id, or
/// by their time span when the id is missing.
pub fn unique_sessions(sessions: Vec<Session>) -> Vec<Session> {
    let mut seen = HashSet::new();
    let before = sessions.len();

    let unique: Vec<Session> = sessions
        .into_iter()
        .filter(|s| {
            let key = if s.id.is_empty() {
                format!("{}-{}", s.start_time_millis, s.end_time_millis)
            } else {
                s.id.clone()
            };
            seen.insert(key)
        })
        .collect();

    if unique.len() < before {
        tracing::warn!(
            dropped = before - unique.len(),
            "Duplicate sessions in listing"
        );
    }
    unique
}

// ─────────────────────────────────────────────────────────────────────────────
// GoogleFitService - High-level fetch with credential handling
// ─────────────────────────────────────────────────────────────────────────────

/// Fetches every session in a window together with its buckets.
#[derive(Clone)]
pub struct GoogleFitService {
    client: GoogleFitClient,
    credentials: FitCredentials,
}

impl GoogleFitService {
    pub fn new(credentials: FitCredentials) -> Self {
        Self::with_client(GoogleFitClient::new(), credentials)
    }

    pub fn with_client(client: GoogleFitClient, credentials: FitCredentials) -> Self {
        Self {
            client,
            credentials,
        }
    }

    /// Resolve a usable access token from the configured credentials.
    pub async fn access_token(&self) -> Result<String, AppError> {
        match &self.credentials {
            FitCredentials::AccessToken(token) => Ok(token.clone()),
            FitCredentials::RefreshToken {
                client_id,
                client_secret,
                refresh_token,
            } => {
                let refreshed = self
                    .client
                    .refresh_token(client_id, client_secret, refresh_token)
                    .await?;
                tracing::info!(expires_in = refreshed.expires_in, "Access token refreshed");
                Ok(refreshed.access_token)
            }
        }
    }

    /// List all sessions matching `query`, each at most once.
    pub async fn list_all_sessions(
        &self,
        access_token: &str,
        query: &SessionQuery,
    ) -> Result<Vec<Session>, AppError> {
        let response = self.client.list_sessions(access_token, query).await?;

        tracing::debug!(
            count = response.session.len(),
            sync_token = response.next_page_token.is_some(),
            "Fetched session listing"
        );

        Ok(unique_sessions(response.session))
    }

    /// Fetch all sessions and their aggregate buckets. Any failure aborts.
    pub async fn fetch_records(&self, query: &SessionQuery) -> Result<Vec<SessionRecords>, AppError> {
        let access_token = self.access_token().await?;

        let sessions = self.list_all_sessions(&access_token, query).await?;
        tracing::info!(
            sessions = sessions.len(),
            start = %format_utc_rfc3339(query.start),
            "Fetched sessions"
        );

        let mut records = Vec::with_capacity(sessions.len());
        for session in sessions {
            let aggregate = self
                .client
                .aggregate_by_session(&access_token, &session)
                .await?;

            tracing::debug!(
                session = %session.name,
                activity_type = session.activity_type,
                kind = activity_type_name(session.activity_type).unwrap_or("other"),
                buckets = aggregate.bucket.len(),
                "Fetched session buckets"
            );

            records.push(SessionRecords {
                session,
                buckets: aggregate.bucket,
            });
        }

        Ok(records)
    }
}
