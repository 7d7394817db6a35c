// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tick label formatting.
//!
//! Numeric ticks are formatted with just enough decimals for the tick step;
//! temporal ticks (numeric seconds) render as `h:mm` / `h:mm:ss` depending
//! on the step granularity.

extern crate alloc;

use alloc::format;
use alloc::string::String;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Formats a numeric tick value given the tick step (best effort).
///
/// A zero or non-finite step falls back to the value's shortest
/// representation.
pub fn format_tick(v: f64, step: f64) -> String {
    if !v.is_finite() || !step.is_finite() || step <= 0.0 {
        return format!("{v}");
    }
    let decimals = decimals_for_step(step);
    if decimals == 0 {
        format!("{:.0}", v.round())
    } else {
        format!("{v:.decimals$}")
    }
}

/// Decimal places needed so consecutive ticks at `step` stay distinct.
fn decimals_for_step(step: f64) -> usize {
    if step >= 1.0 {
        return 0;
    }
    let exp = step.log10().floor();
    let d = -exp;
    if d.is_finite() && d > 0.0 {
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "clamped to a small positive decimal count"
        )]
        {
            d.min(9.0) as usize
        }
    } else {
        0
    }
}

/// Formats a temporal tick value (seconds) given the tick step (seconds).
pub fn format_time(v: f64, step: f64) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let sign = if v < 0.0 { "-" } else { "" };
    let secs = {
        let secs_f = v.abs().round().clamp(0.0, i64::MAX as f64);
        #[allow(clippy::cast_possible_truncation, reason = "clamped to the i64 range")]
        {
            secs_f as i64
        }
    };
    let step = step.abs();

    let h = secs / 3600;
    let m = (secs / 60) % 60;
    let s = secs % 60;

    if step >= 3600.0 && m == 0 && s == 0 {
        format!("{sign}{h}:00")
    } else if step >= 60.0 && s == 0 {
        format!("{sign}{h}:{m:02}")
    } else {
        format!("{sign}{h}:{m:02}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn integral_steps_format_as_integers() {
        assert_eq!(format_tick(2000.0, 500.0), "2000");
        assert_eq!(format_tick(3.000000001, 1.0), "3");
    }

    #[test]
    fn fractional_steps_keep_enough_decimals() {
        assert_eq!(format_tick(0.5, 0.5), "0.5");
        assert_eq!(format_tick(0.25, 0.05), "0.25");
    }

    #[test]
    fn time_formatting_follows_the_step() {
        assert_eq!(format_time(3600.0, 3600.0), "1:00");
        assert_eq!(format_time(90.0, 30.0), "0:01:30");
        assert_eq!(format_time(120.0, 60.0), "0:02");
    }
}
