// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod chart;
pub mod google_fit;

pub use activity::{process_records, PipelineOutput};
pub use chart::build_chart;
pub use google_fit::{GoogleFitClient, GoogleFitService, SessionQuery};
