// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Distance unit conversion.

/// Meters in one statute mile.
pub const METERS_PER_MILE: f64 = 1609.344;

/// Convert meters to miles, rounded to two decimals (round half up).
///
/// The scaled value's fractional part decides the direction, so an exact
/// half at the second decimal always rounds up.
pub fn meters_to_miles_rounded(meters: f64) -> f64 {
    let scaled = 100.0 * (meters / METERS_PER_MILE);
    let rounded = if scaled.fract() >= 0.5 {
        scaled.ceil()
    } else {
        scaled.floor()
    };
    rounded / 100.0
}
