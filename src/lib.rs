// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fit-Mileage: chart cumulative exercise distance from Google Fit
//!
//! This crate fetches sessions from the Google Fit REST API, normalizes their
//! distance buckets into activities, folds them into a running mileage total
//! and renders the result as an SVG line chart.

pub mod config;
pub mod error;
pub mod models;
pub mod render;
pub mod services;
pub mod time_utils;
pub mod units;
