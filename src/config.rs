//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local runs. Google OAuth client credentials
//! may come from individual variables or from the client secret JSON file
//! downloaded from the Google Cloud console.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::services::chart::last_tick_date;

/// Activity types charted by default: biking variants, running, walking, hiking.
pub const DEFAULT_ACTIVITY_TYPES: [i32; 10] = [1, 15, 16, 17, 18, 19, 8, 7, 35, 93];

const DEFAULT_QUERY_START: &str = "2020-01-01T00:00:00Z";
const DEFAULT_CHART_ANCHOR: &str = "2020-01-01";

/// How the binary authenticates to Google Fit.
#[derive(Debug, Clone, PartialEq)]
pub enum FitCredentials {
    /// Pre-issued bearer token, used as-is.
    AccessToken(String),
    /// OAuth refresh token exchanged for an access token at startup.
    RefreshToken {
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },
}

/// Output encoding written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(OutputFormat::Svg),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::Invalid("OUTPUT_FORMAT", other.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google Fit credentials
    pub credentials: FitCredentials,
    /// Start of the session query window
    pub query_start: DateTime<Utc>,
    /// End of the session query window (open-ended if unset)
    pub query_end: Option<DateTime<Utc>>,
    /// Activity type codes to request
    pub activity_types: Vec<i32>,
    /// First X-axis tick (local midnight)
    pub chart_anchor: NaiveDate,
    /// SVG width in pixels
    pub chart_width: u32,
    /// SVG height in pixels
    pub chart_height: u32,
    /// Output encoding
    pub output_format: OutputFormat,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            credentials: FitCredentials::AccessToken("test_access_token".to_string()),
            query_start: DateTime::parse_from_rfc3339(DEFAULT_QUERY_START)
                .map(|d| d.with_timezone(&Utc))
                .unwrap_or_default(),
            query_end: None,
            activity_types: DEFAULT_ACTIVITY_TYPES.to_vec(),
            chart_anchor: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            chart_width: 1024,
            chart_height: 400,
            output_format: OutputFormat::Svg,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let credentials = load_credentials(&var)?;

        let query_start = parse_rfc3339(
            "FIT_QUERY_START",
            &var("FIT_QUERY_START").unwrap_or_else(|| DEFAULT_QUERY_START.to_string()),
        )?;
        let query_end = var("FIT_QUERY_END")
            .map(|v| parse_rfc3339("FIT_QUERY_END", &v))
            .transpose()?;
        if let Some(end) = query_end {
            if end <= query_start {
                return Err(ConfigError::Invalid(
                    "FIT_QUERY_END",
                    "must be after FIT_QUERY_START".to_string(),
                ));
            }
        }

        let activity_types = match var("FIT_ACTIVITY_TYPES") {
            Some(list) => parse_activity_types(&list)?,
            None => DEFAULT_ACTIVITY_TYPES.to_vec(),
        };

        let anchor = var("CHART_ANCHOR").unwrap_or_else(|| DEFAULT_CHART_ANCHOR.to_string());
        let chart_anchor = NaiveDate::parse_from_str(&anchor, "%Y-%m-%d")
            .map_err(|e| ConfigError::Invalid("CHART_ANCHOR", e.to_string()))?;
        if last_tick_date(chart_anchor).is_none() {
            return Err(ConfigError::Invalid(
                "CHART_ANCHOR",
                "too late for a twelve month axis".to_string(),
            ));
        }

        Ok(Self {
            credentials,
            query_start,
            query_end,
            activity_types,
            chart_anchor,
            chart_width: parse_dimension("CHART_WIDTH", var("CHART_WIDTH"), 1024)?,
            chart_height: parse_dimension("CHART_HEIGHT", var("CHART_HEIGHT"), 400)?,
            output_format: match var("OUTPUT_FORMAT") {
                Some(v) => v.parse()?,
                None => OutputFormat::Svg,
            },
        })
    }
}

/// Google "installed app" client secret file.
#[derive(Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

#[derive(Deserialize)]
struct ClientSecret {
    client_id: String,
    client_secret: String,
}

/// Read client id and secret from a Google client secret JSON file.
pub fn load_client_secret_file<P: AsRef<Path>>(path: P) -> Result<(String, String), ConfigError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .map_err(|e| ConfigError::CredentialsFile(format!("{}: {}", path.display(), e)))?;
    parse_client_secret(&data)
}

fn parse_client_secret(data: &str) -> Result<(String, String), ConfigError> {
    let file: ClientSecretFile =
        serde_json::from_str(data).map_err(|e| ConfigError::CredentialsFile(e.to_string()))?;
    let secret = file.installed.or(file.web).ok_or_else(|| {
        ConfigError::CredentialsFile("expected an \"installed\" or \"web\" client".to_string())
    })?;
    Ok((secret.client_id, secret.client_secret))
}

fn load_credentials<F>(var: &F) -> Result<FitCredentials, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = var("GOOGLE_FIT_ACCESS_TOKEN") {
        return Ok(FitCredentials::AccessToken(token));
    }

    let refresh_token =
        var("GOOGLE_FIT_REFRESH_TOKEN").ok_or(ConfigError::Missing("GOOGLE_FIT_REFRESH_TOKEN"))?;

    let (client_id, client_secret) = match var("GOOGLE_FIT_CLIENT_SECRET_FILE") {
        Some(path) => load_client_secret_file(path)?,
        None => (
            var("GOOGLE_FIT_CLIENT_ID").ok_or(ConfigError::Missing("GOOGLE_FIT_CLIENT_ID"))?,
            var("GOOGLE_FIT_CLIENT_SECRET")
                .ok_or(ConfigError::Missing("GOOGLE_FIT_CLIENT_SECRET"))?,
        ),
    };

    Ok(FitCredentials::RefreshToken {
        client_id,
        client_secret,
        refresh_token,
    })
}

fn parse_rfc3339(key: &'static str, value: &str) -> Result<DateTime<Utc>, ConfigError> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| ConfigError::Invalid(key, format!("{}: {}", value, e)))
}

fn parse_activity_types(list: &str) -> Result<Vec<i32>, ConfigError> {
    let types = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>()
                .map_err(|_| ConfigError::Invalid("FIT_ACTIVITY_TYPES", s.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if types.is_empty() {
        return Err(ConfigError::Invalid(
            "FIT_ACTIVITY_TYPES",
            "no activity types given".to_string(),
        ));
    }
    Ok(types)
}

fn parse_dimension(
    key: &'static str,
    value: Option<String>,
    default: u32,
) -> Result<u32, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => match v.parse::<u32>() {
            Ok(px) if px > 0 => Ok(px),
            _ => Err(ConfigError::Invalid(key, v)),
        },
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),

    #[error("Unreadable client secret file: {0}")]
    CredentialsFile(String),
}
