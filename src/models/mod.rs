// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod chart;
pub mod fit;

pub use activity::{Activity, CumulativePoint};
pub use chart::{Axis, ChartDescriptor, Series, Tick};
pub use fit::{Bucket, Dataset, Session, SessionRecords};
