// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Google Fit REST API wire models.
//!
//! Google encodes int64 fields as JSON strings, so the millisecond
//! timestamps accept either a string or a number.

use serde::{Deserialize, Deserializer, Serialize};

/// Data source id of the merged distance stream in aggregate responses.
pub const DISTANCE_DELTA_SOURCE_ID: &str =
    "derived:com.google.distance.delta:com.google.android.gms:aggregated";

/// Data type for activity segments.
pub const ACTIVITY_SEGMENT_TYPE: &str = "com.google.activity.segment";

/// Data type for distance deltas.
pub const DISTANCE_DELTA_TYPE: &str = "com.google.distance.delta";

/// A Google Fit session (one recorded workout).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "int64_string")]
    pub start_time_millis: i64,
    #[serde(deserialize_with = "int64_string")]
    pub end_time_millis: i64,
    #[serde(default)]
    pub activity_type: i32,
}

/// One page of `users/me/sessions`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionListResponse {
    #[serde(default)]
    pub session: Vec<Session>,
    /// Sync token for a later incremental listing, not a continuation.
    pub next_page_token: Option<String>,
}

/// Body of `users/me/dataset:aggregate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRequest {
    pub aggregate_by: Vec<AggregateBy>,
    pub bucket_by_session: BucketBySession,
    pub start_time_millis: i64,
    pub end_time_millis: i64,
}

impl AggregateRequest {
    /// Activity segment + distance aggregation bucketed by session.
    pub fn for_session(session: &Session) -> Self {
        Self {
            aggregate_by: vec![
                AggregateBy {
                    data_type_name: ACTIVITY_SEGMENT_TYPE.to_string(),
                },
                AggregateBy {
                    data_type_name: DISTANCE_DELTA_TYPE.to_string(),
                },
            ],
            bucket_by_session: BucketBySession {
                min_duration_millis: 100,
            },
            start_time_millis: session.start_time_millis,
            end_time_millis: session.end_time_millis,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateBy {
    pub data_type_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketBySession {
    pub min_duration_millis: i64,
}

/// Response of `users/me/dataset:aggregate`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AggregateResponse {
    #[serde(default)]
    pub bucket: Vec<Bucket>,
}

/// A time-sliced aggregation window carrying measurement datasets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    #[serde(deserialize_with = "int64_string")]
    pub start_time_millis: i64,
    #[serde(deserialize_with = "int64_string")]
    pub end_time_millis: i64,
    pub session: Option<Session>,
    #[serde(default)]
    pub dataset: Vec<Dataset>,
}

impl Bucket {
    /// Description of the session this bucket was cut from.
    pub fn description(&self) -> &str {
        self.session
            .as_ref()
            .map(|s| s.description.as_str())
            .unwrap_or("")
    }
}

/// A named stream of point samples.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub data_source_id: String,
    #[serde(default)]
    pub point: Vec<DataPoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataPoint {
    #[serde(default)]
    pub value: Vec<Value>,
}

/// A single sample value. Integer samples (activity codes) leave
/// `fp_val` unset and are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    pub fp_val: Option<f64>,
}

/// A session together with the buckets its aggregate query returned.
#[derive(Debug, Clone, Default)]
pub struct SessionRecords {
    pub session: Session,
    pub buckets: Vec<Bucket>,
}

/// Accept an int64 encoded either as a JSON string or a number.
fn int64_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64 {
        Num(i64),
        Str(String),
    }

    match Int64::deserialize(deserializer)? {
        Int64::Num(n) => Ok(n),
        Int64::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
