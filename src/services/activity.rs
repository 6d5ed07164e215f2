// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity processing pipeline.
//!
//! Handles the core workflow:
//! 1. Normalize each session bucket into an `Activity`
//! 2. Drop activities whose start second was already seen
//! 3. Sort chronologically
//! 4. Fold distance-bearing activities into a running mileage total

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::fit::DISTANCE_DELTA_SOURCE_ID;
use crate::models::{Activity, Bucket, CumulativePoint, Session, SessionRecords};
use crate::time_utils::millis_to_utc_seconds;
use crate::units::meters_to_miles_rounded;

/// Build an `Activity` from one session and one of its buckets.
///
/// Never fails: a bucket without a usable distance sample becomes a
/// zero-distance activity.
pub fn normalize(session: &Session, bucket: &Bucket) -> Activity {
    let timestamp = millis_to_utc_seconds(bucket.start_time_millis).unwrap_or_else(|| {
        tracing::warn!(
            start_time_millis = bucket.start_time_millis,
            session = %session.name,
            "Bucket start out of range, using epoch"
        );
        DateTime::<Utc>::UNIX_EPOCH
    });

    let duration_minutes = bucket
        .end_time_millis
        .saturating_sub(bucket.start_time_millis)
        / 1000
        / 60;

    let distance_miles = match last_distance_meters(bucket) {
        Some(meters) if meters.is_finite() && meters >= 0.0 => meters_to_miles_rounded(meters),
        Some(meters) => {
            tracing::warn!(
                meters,
                timestamp = %timestamp,
                "Ignoring unusable distance sample"
            );
            0.0
        }
        None => 0.0,
    };

    Activity {
        name: session.name.clone(),
        duration_minutes,
        distance_miles,
        description: bucket.description().to_string(),
        timestamp,
        activity_class: session.activity_type,
    }
}

/// Last floating-point value in the aggregated distance-delta dataset.
///
/// A bucket normally carries a single value; if there are more, the last
/// one in dataset/point/value order wins.
fn last_distance_meters(bucket: &Bucket) -> Option<f64> {
    bucket
        .dataset
        .iter()
        .filter(|ds| ds.data_source_id == DISTANCE_DELTA_SOURCE_ID)
        .flat_map(|ds| ds.point.iter())
        .flat_map(|point| point.value.iter())
        .filter_map(|value| value.fp_val)
        .last()
}

/// Keep only the first activity for each start second, in input order.
pub fn dedup_by_timestamp(activities: Vec<Activity>) -> Vec<Activity> {
    let mut seen = HashSet::with_capacity(activities.len());
    activities
        .into_iter()
        .filter(|a| seen.insert(a.timestamp))
        .collect()
}

/// Stable ascending sort by start time.
pub fn sort_chronologically(mut activities: Vec<Activity>) -> Vec<Activity> {
    activities.sort_by_key(|a| a.timestamp);
    activities
}

/// Running mileage total over distance-bearing activities.
///
/// Zero-distance activities (e.g. spinning with no GPS track) emit no point
/// and leave the total unchanged.
pub fn cumulative_series(activities: &[Activity]) -> Vec<CumulativePoint> {
    activities
        .iter()
        .filter(|a| a.distance_miles != 0.0)
        .scan(0.0, |total, a| {
            *total += a.distance_miles;
            Some(CumulativePoint {
                timestamp: a.timestamp,
                cumulative_distance_miles: *total,
            })
        })
        .collect()
}

/// Result of running the pipeline over fetched records.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    /// Deduplicated activities in chronological order
    pub activities: Vec<Activity>,
    /// Cumulative mileage series
    pub points: Vec<CumulativePoint>,
    /// Number of activities dropped as timestamp duplicates
    pub duplicates_dropped: usize,
}

impl PipelineOutput {
    /// Final running total, or 0 when nothing had distance.
    pub fn total_miles(&self) -> f64 {
        self.points
            .last()
            .map(|p| p.cumulative_distance_miles)
            .unwrap_or(0.0)
    }
}

/// Normalize every bucket of every session, then dedup, sort and fold.
pub fn process_records(records: &[SessionRecords]) -> PipelineOutput {
    let normalized: Vec<Activity> = records
        .iter()
        .flat_map(|r| r.buckets.iter().map(move |b| normalize(&r.session, b)))
        .collect();
    let normalized_count = normalized.len();

    let deduped = dedup_by_timestamp(normalized);
    let duplicates_dropped = normalized_count - deduped.len();
    let activities = sort_chronologically(deduped);
    let points = cumulative_series(&activities);

    let output = PipelineOutput {
        activities,
        points,
        duplicates_dropped,
    };

    tracing::info!(
        sessions = records.len(),
        activities = output.activities.len(),
        duplicates_dropped,
        distance_points = output.points.len(),
        total_miles = output.total_miles(),
        "Activities processed"
    );

    output
}
