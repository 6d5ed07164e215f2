// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! End-to-end pipeline tests: activities in, cumulative series out.

use chrono::DateTime;
use fit_mileage::models::Activity;
use fit_mileage::services::activity::{
    cumulative_series, dedup_by_timestamp, sort_chronologically,
};

fn make_activity(name: &str, secs: i64, miles: f64) -> Activity {
    Activity {
        name: name.to_string(),
        duration_minutes: 60,
        distance_miles: miles,
        description: String::new(),
        timestamp: DateTime::from_timestamp(secs, 0).unwrap(),
        activity_class: 1,
    }
}

#[test]
fn test_dedup_sort_fold_scenario() {
    let activities = vec![
        make_activity("A", 100, 0.5),
        make_activity("B", 50, 0.0),
        make_activity("C", 100, 0.5),
        make_activity("D", 200, 1.0),
    ];

    let deduped = dedup_by_timestamp(activities);
    let names: Vec<&str> = deduped.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B", "D"]);

    let sorted = sort_chronologically(deduped);
    let names: Vec<&str> = sorted.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A", "D"]);

    let points = cumulative_series(&sorted);
    let pairs: Vec<(i64, f64)> = points
        .iter()
        .map(|p| (p.timestamp.timestamp(), p.cumulative_distance_miles))
        .collect();
    assert_eq!(pairs, vec![(100, 0.5), (200, 1.5)]);
}

#[test]
fn test_zero_distance_does_not_move_total() {
    let with_zero = sort_chronologically(vec![
        make_activity("ride", 10, 2.0),
        make_activity("spin", 20, 0.0),
        make_activity("run", 30, 3.0),
    ]);
    let without_zero = sort_chronologically(vec![
        make_activity("ride", 10, 2.0),
        make_activity("run", 30, 3.0),
    ]);

    assert_eq!(
        cumulative_series(&with_zero),
        cumulative_series(&without_zero)
    );
}

#[test]
fn test_already_sorted_is_noop() {
    let sorted = vec![
        make_activity("a", 1, 1.0),
        make_activity("b", 2, 0.0),
        make_activity("c", 3, 2.0),
    ];
    assert_eq!(sort_chronologically(sorted.clone()), sorted);
}

#[test]
fn test_monotonic_over_mixed_input() {
    let activities: Vec<Activity> = (0..200)
        .map(|i| {
            // scrambled timestamps with repeats, every fifth entry has no distance
            let secs = (i * 7919) % 97;
            let miles = if i % 5 == 0 { 0.0 } else { (i % 13) as f64 * 0.25 + 0.01 };
            make_activity("mixed", secs, miles)
        })
        .collect();

    let series = sort_chronologically(dedup_by_timestamp(activities));
    assert!(series.windows(2).all(|w| w[0].timestamp < w[1].timestamp));

    let points = cumulative_series(&series);
    let nonzero = series.iter().filter(|a| a.distance_miles > 0.0).count();
    assert_eq!(points.len(), nonzero);
    assert!(points
        .windows(2)
        .all(|w| w[0].cumulative_distance_miles < w[1].cumulative_distance_miles));
}
