// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.

use crate::config::ConfigError;

/// Application error type. Every variant aborts the run.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Google Fit API error: {0}")]
    FitApi(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Message carried by `FitApi` when Google returns 429.
    pub const FIT_RATE_LIMIT: &'static str = "Rate limit exceeded";

    /// Message carried by `FitApi` when Google rejects the access token.
    pub const FIT_TOKEN_ERROR: &'static str = "Access token invalid or expired";

    /// Whether this error means the access token needs replacing.
    pub fn is_fit_token_error(&self) -> bool {
        match self {
            AppError::Auth(_) => true,
            AppError::FitApi(msg) => {
                msg == Self::FIT_TOKEN_ERROR
                    || msg.contains("Token expired")
                    || msg.contains("invalid_grant")
                    || msg.contains("Invalid Credentials")
            }
            _ => false,
        }
    }

    /// Whether this error is a Google Fit rate limit.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::FitApi(msg) if msg == Self::FIT_RATE_LIMIT)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
