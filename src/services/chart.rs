// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chart descriptor assembly: fixed axes around the cumulative series.

use chrono::{NaiveDate, TimeZone};

use crate::models::{Axis, ChartDescriptor, CumulativePoint, Series, Tick};
use crate::time_utils::{add_months, local_midnight_epoch, month_label};

/// Y-axis tick spacing in miles.
pub const MILES_TICK_STEP: u32 = 100;

/// Largest Y-axis tick in miles.
pub const MILES_TICK_MAX: u32 = 1000;

/// Months covered by the X axis after the anchor month.
pub const MONTHS_SPANNED: u32 = 12;

/// Date of the last X tick, or `None` when the anchor is too close to the
/// end of the calendar for a full axis.
pub fn last_tick_date(anchor: NaiveDate) -> Option<NaiveDate> {
    add_months(anchor, MONTHS_SPANNED)
}

/// Build the mileage chart around `points`.
///
/// X ticks sit at local midnight (in `tz`) of the anchor date and of the
/// same day in each of the following twelve months. Points outside the axis
/// range are passed through untouched. Anchors should be checked with
/// [`last_tick_date`] first; ticks past the end of the calendar are omitted.
pub fn build_chart<Tz: TimeZone>(
    anchor: NaiveDate,
    tz: &Tz,
    points: &[CumulativePoint],
) -> ChartDescriptor {
    ChartDescriptor {
        x_axis: month_axis(anchor, tz),
        y_axis: miles_axis(),
        series: Series::from_points(points),
    }
}

fn miles_axis() -> Axis {
    let ticks = (0..=MILES_TICK_MAX)
        .step_by(MILES_TICK_STEP as usize)
        .map(|miles| Tick {
            value: f64::from(miles),
            label: miles.to_string(),
        })
        .collect();

    Axis {
        name: "Miles".to_string(),
        ticks,
    }
}

fn month_axis<Tz: TimeZone>(anchor: NaiveDate, tz: &Tz) -> Axis {
    let ticks: Vec<Tick> = (0..=MONTHS_SPANNED)
        .map_while(|offset| add_months(anchor, offset))
        .map(|date| Tick {
            value: local_midnight_epoch(date, tz) as f64,
            label: month_label(date),
        })
        .collect();

    if ticks.len() <= MONTHS_SPANNED as usize {
        tracing::warn!(
            %anchor,
            ticks = ticks.len(),
            "Chart anchor too late for a full date axis"
        );
    }

    Axis {
        name: "Date".to_string(),
        ticks,
    }
}
