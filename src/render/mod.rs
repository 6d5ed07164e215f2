// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chart serialization to SVG or JSON.
//!
//! Both renderers return a `String`; the caller owns the output sink.

mod backend;

use std::ops::Range;

use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use crate::error::AppError;
use crate::models::{Axis, ChartDescriptor};

pub use backend::FontSafeBackend;

const SERIES_COLOR: RGBColor = RGBColor(31, 119, 180);
const GRID_COLOR: RGBColor = RGBColor(224, 224, 224);

/// One chart axis whose grid lines and labels sit exactly on the
/// descriptor's ticks instead of plotters' computed round numbers.
#[derive(Clone)]
struct TickedAxis {
    inner: RangedCoordf64,
    ticks: Vec<f64>,
}

impl TickedAxis {
    /// Axis spanning both the ticks and the series values.
    fn covering(axis: &Axis, values: &[f64]) -> Self {
        Self {
            inner: data_range(axis, values).into(),
            ticks: axis.ticks.iter().map(|t| t.value).collect(),
        }
    }
}

impl Ranged for TickedAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.inner.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        // Ticks are bold lines only; no light subdivisions
        if hint.weight().allow_light_points() {
            Vec::new()
        } else {
            self.ticks.clone()
        }
    }

    fn range(&self) -> Range<f64> {
        self.inner.range()
    }
}

/// Data range covering the axis ticks and every finite series value.
/// Degenerate ranges are widened by one unit on each side.
fn data_range(axis: &Axis, values: &[f64]) -> Range<f64> {
    let range = values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(axis.tick_range(), |range, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });

    match range {
        Some((lo, hi)) if hi > lo => lo..hi,
        Some((lo, _)) => (lo - 1.0)..(lo + 1.0),
        None => 0.0..1.0,
    }
}

/// Label of the tick at `value`, or the plain number between ticks.
fn tick_label(axis: &Axis, value: f64) -> String {
    axis.ticks
        .iter()
        .find(|t| t.value == value)
        .map_or_else(|| value.to_string(), |t| t.label.clone())
}

/// Render the chart as a standalone SVG document.
///
/// Every tick gets a grid line and its label, both axes carry their names,
/// and the series is one line. An empty series leaves only the axes.
pub fn render_svg(chart: &ChartDescriptor, width: u32, height: u32) -> Result<String, AppError> {
    let mut buf = String::new();
    {
        let backend = SVGBackend::with_string(&mut buf, (width, height));
        let root = FontSafeBackend::new(backend).into_drawing_area();
        draw_chart(&root, chart).map_err(|e| AppError::Render(e.to_string()))?;
    }
    tracing::debug!(bytes = buf.len(), points = chart.series.len(), "SVG rendered");
    Ok(buf)
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    chart: &ChartDescriptor,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let x_axis = TickedAxis::covering(&chart.x_axis, &chart.series.x);
    let y_axis = TickedAxis::covering(&chart.y_axis, &chart.series.y);

    let mut ctx = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_axis, y_axis)?;

    let x_label = |v: &f64| tick_label(&chart.x_axis, *v);
    let y_label = |v: &f64| tick_label(&chart.y_axis, *v);

    ctx.configure_mesh()
        .x_desc(chart.x_axis.name.as_str())
        .y_desc(chart.y_axis.name.as_str())
        .x_labels(chart.x_axis.ticks.len())
        .y_labels(chart.y_axis.ticks.len())
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .bold_line_style(GRID_COLOR)
        .draw()?;

    let points: Vec<(f64, f64)> = chart
        .series
        .x
        .iter()
        .zip(&chart.series.y)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(x, y)| (*x, *y))
        .collect();

    if !points.is_empty() {
        ctx.draw_series(LineSeries::new(points, SERIES_COLOR.stroke_width(2)))?;
    }

    root.present()?;
    Ok(())
}

/// Render the chart descriptor as pretty-printed JSON.
pub fn render_json(chart: &ChartDescriptor) -> Result<String, AppError> {
    serde_json::to_string_pretty(chart).map_err(|e| AppError::Render(e.to_string()))
}
