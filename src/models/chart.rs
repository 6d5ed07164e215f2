// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Chart description handed to the renderer.

use serde::{Deserialize, Serialize};

use crate::models::CumulativePoint;

/// A labeled axis position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// Axis name plus its fixed tick positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub name: String,
    pub ticks: Vec<Tick>,
}

impl Axis {
    /// Smallest and largest tick value, if any ticks exist.
    pub fn tick_range(&self) -> Option<(f64, f64)> {
        self.ticks.iter().fold(None, |range, tick| match range {
            None => Some((tick.value, tick.value)),
            Some((lo, hi)) => Some((lo.min(tick.value), hi.max(tick.value))),
        })
    }
}

/// Continuous line series as parallel coordinate arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Epoch seconds
    pub x: Vec<f64>,
    /// Cumulative miles
    pub y: Vec<f64>,
}

impl Series {
    pub fn from_points(points: &[CumulativePoint]) -> Self {
        let (x, y) = points
            .iter()
            .map(|p| (p.timestamp.timestamp() as f64, p.cumulative_distance_miles))
            .unzip();
        Self { x, y }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Everything the renderer needs to draw the mileage chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescriptor {
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Series,
}
