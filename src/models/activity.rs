// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Normalized activity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One exercise bucket normalized from a Google Fit session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Session name/title (not unique)
    pub name: String,
    /// Bucket length in whole minutes
    pub duration_minutes: i64,
    /// Distance in miles, two decimals; 0.0 when no distance sample exists
    pub distance_miles: f64,
    /// Session description, may be empty
    pub description: String,
    /// Bucket start time, truncated to the second
    pub timestamp: DateTime<Utc>,
    /// Google Fit activity type code
    pub activity_class: i32,
}

/// Running mileage total at the time of one distance-bearing activity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub timestamp: DateTime<Utc>,
    pub cumulative_distance_miles: f64,
}
