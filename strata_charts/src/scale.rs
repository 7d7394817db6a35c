// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales: coordinate mappings for axes and visual-value mappings for
//! channels.
//!
//! Axis scales ([`ScaleLinear`], [`ScaleTime`], [`BandScale`]) map data
//! values into pixel spans and generate tick values. Their ranges are
//! mutable because extras re-map themselves onto the final plot span during
//! layout placement. Channel scales ([`ChannelScale`]) map row values into
//! [`ChannelValue`]s (colors, numbers, text).

extern crate alloc;

use alloc::string::ToString;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use strata_core::Value;

use crate::channel::ChannelValue;
use crate::theme::lerp_color;

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// The configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// The configured range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Replaces the output range.
    pub fn set_range(&mut self, range: (f64, f64)) {
        self.range = range;
    }

    /// Forces the domain lower bound down to `lo` if it is above it.
    pub fn clamp_lower(&mut self, lo: f64) {
        if self.domain.0 > lo {
            self.domain.0 = lo;
        }
    }

    /// Widens the domain upper bound up to `hi` if it is below it.
    pub fn widen_upper(&mut self, hi: f64) {
        if self.domain.1 < hi {
            self.domain.1 = hi;
        }
    }

    /// Returns "nice-ish" tick values for the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

/// A time scale: a linear scale over numeric seconds with time-aware ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTime {
    inner: ScaleLinear,
}

impl ScaleTime {
    /// Creates a time scale over a `(seconds, seconds)` domain.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: ScaleLinear::new(domain, range),
        }
    }

    /// Maps a timestamp into range space.
    pub fn map(&self, t: f64) -> f64 {
        self.inner.map(t)
    }

    /// The configured domain.
    pub fn domain(&self) -> (f64, f64) {
        self.inner.domain()
    }

    /// Replaces the output range.
    pub fn set_range(&mut self, range: (f64, f64)) {
        self.inner.set_range(range);
    }

    /// Forces the domain lower bound down to `lo` if it is above it.
    pub fn clamp_lower(&mut self, lo: f64) {
        self.inner.clamp_lower(lo);
    }

    /// Widens the domain upper bound up to `hi` if it is below it.
    pub fn widen_upper(&mut self, hi: f64) {
        self.inner.widen_upper(hi);
    }

    /// Returns tick values aligned to second/minute/hour/day steps.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut min, mut max) = self.inner.domain();
        if count == 0 || !min.is_finite() || !max.is_finite() {
            return Vec::new();
        }
        if min == max {
            return alloc::vec![min];
        }
        if min > max {
            core::mem::swap(&mut min, &mut max);
        }
        let step = nice_time_step((max - min) / count.max(1) as f64);
        if step == 0.0 {
            return alloc::vec![min, max];
        }
        ticks_at_step(min, max, step)
    }
}

/// A discrete band scale over an ordinal domain.
#[derive(Clone, Debug, PartialEq)]
pub struct BandScale {
    domain: Vec<Value>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
}

impl BandScale {
    /// Creates a band scale covering `domain` over `range`.
    pub fn new(domain: Vec<Value>, range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }

    /// Sets inner and outer padding in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.max(0.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// The number of bands.
    pub fn count(&self) -> usize {
        self.domain.len()
    }

    /// The band domain.
    pub fn domain(&self) -> &[Value] {
        &self.domain
    }

    /// The configured range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Replaces the output range.
    pub fn set_range(&mut self, range: (f64, f64)) {
        self.range = range;
    }

    /// The computed band width.
    pub fn band_width(&self) -> f64 {
        let n = self.domain.len() as f64;
        if n <= 0.0 {
            return 0.0;
        }
        let span = (self.range.1 - self.range.0).abs();
        let denom = n + self.padding_inner * (n - 1.0) + 2.0 * self.padding_outer;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// The distance between consecutive band starts.
    pub fn step(&self) -> f64 {
        self.band_width() * (1.0 + self.padding_inner)
    }

    /// The index of a domain value.
    pub fn index(&self, value: &Value) -> Option<usize> {
        self.domain.iter().position(|d| d == value)
    }

    /// The start position of the band at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let start = self.range.0.min(self.range.1);
        start + self.band_width() * self.padding_outer + self.step() * index as f64
    }

    /// The start position of the band for a domain value.
    pub fn position(&self, value: &Value) -> Option<f64> {
        self.index(value).map(|i| self.x(i))
    }
}

/// The scale behind one plot axis.
#[derive(Clone, Debug, PartialEq)]
pub enum AxisScale {
    /// Continuous numeric axis.
    Linear(ScaleLinear),
    /// Temporal axis (numeric seconds).
    Time(ScaleTime),
    /// Categorical band axis.
    Band(BandScale),
}

impl AxisScale {
    /// Maps a data value into range space (band values map to band starts).
    pub fn map_value(&self, value: &Value) -> Option<f64> {
        match self {
            Self::Linear(s) => value.as_f64().map(|v| s.map(v)),
            Self::Time(s) => value.as_f64().map(|v| s.map(v)),
            Self::Band(s) => s.position(value),
        }
    }

    /// Tick values plus the tick step (zero when steps are irregular).
    pub fn tick_values(&self, count: usize) -> (Vec<Value>, f64) {
        match self {
            Self::Linear(s) => {
                let ticks = s.ticks(count);
                let step = tick_step(&ticks);
                (ticks.into_iter().map(Value::Num).collect(), step)
            }
            Self::Time(s) => {
                let ticks = s.ticks(count);
                let step = tick_step(&ticks);
                (ticks.into_iter().map(Value::Time).collect(), step)
            }
            Self::Band(s) => (s.domain().to_vec(), 0.0),
        }
    }

    /// Replaces the output range.
    pub fn set_range(&mut self, range: (f64, f64)) {
        match self {
            Self::Linear(s) => s.set_range(range),
            Self::Time(s) => s.set_range(range),
            Self::Band(s) => s.set_range(range),
        }
    }

    /// The configured range.
    pub fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(s) => s.range(),
            Self::Time(s) => s.inner.range(),
            Self::Band(s) => s.range(),
        }
    }

    /// The absolute length of the output range.
    pub fn span(&self) -> f64 {
        let (r0, r1) = self.range();
        (r1 - r0).abs()
    }

    /// The band scale, when the axis is categorical.
    pub fn band(&self) -> Option<&BandScale> {
        match self {
            Self::Band(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the axis is categorical.
    pub fn is_band(&self) -> bool {
        matches!(self, Self::Band(_))
    }

    /// The continuous domain, if the axis has one.
    pub fn domain(&self) -> Option<(f64, f64)> {
        match self {
            Self::Linear(s) => Some(s.domain()),
            Self::Time(s) => Some(s.domain()),
            Self::Band(_) => None,
        }
    }

    /// Forces the continuous domain lower bound down to `lo`.
    pub fn clamp_lower(&mut self, lo: f64) {
        match self {
            Self::Linear(s) => s.clamp_lower(lo),
            Self::Time(s) => s.clamp_lower(lo),
            Self::Band(_) => {}
        }
    }

    /// Widens the continuous domain upper bound up to `hi`.
    pub fn widen_upper(&mut self, hi: f64) {
        match self {
            Self::Linear(s) => s.widen_upper(hi),
            Self::Time(s) => s.widen_upper(hi),
            Self::Band(_) => {}
        }
    }
}

/// A visual-value scale for one channel.
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelScale {
    /// Ordinal domain → palette entries (cycled past the palette length).
    Ordinal {
        /// Domain values, in definition or first-occurrence order.
        domain: Vec<Value>,
        /// Output values.
        range: Vec<ChannelValue>,
    },
    /// Ordinal domain → evenly spread numbers across `limits`.
    Spread {
        /// Domain values.
        domain: Vec<Value>,
        /// Numeric output limits.
        limits: (f64, f64),
    },
    /// Continuous domain → interpolated numbers or colors.
    Ramp {
        /// Numeric domain extent.
        domain: (f64, f64),
        /// Output at the domain minimum.
        from: ChannelValue,
        /// Output at the domain maximum.
        to: ChannelValue,
    },
    /// The mapped field's own values, rendered as text (label channels).
    Identity,
}

impl ChannelScale {
    /// Maps one row value to its visual value.
    pub fn apply(&self, value: &Value) -> ChannelValue {
        match self {
            Self::Ordinal { domain, range } => {
                if range.is_empty() {
                    return ChannelValue::Absent;
                }
                match domain.iter().position(|d| d == value) {
                    Some(i) => range[i % range.len()].clone(),
                    None => ChannelValue::Absent,
                }
            }
            Self::Spread { domain, limits } => {
                let Some(i) = domain.iter().position(|d| d == value) else {
                    return ChannelValue::Absent;
                };
                let n = domain.len();
                let t = if n <= 1 {
                    0.5
                } else {
                    i as f64 / (n - 1) as f64
                };
                ChannelValue::Float(limits.0 + (limits.1 - limits.0) * t)
            }
            Self::Ramp { domain, from, to } => {
                let Some(v) = value.as_f64() else {
                    return ChannelValue::Absent;
                };
                let denom = domain.1 - domain.0;
                let t = if denom == 0.0 {
                    0.0
                } else {
                    (v - domain.0) / denom
                };
                match (from, to) {
                    (ChannelValue::Float(a), ChannelValue::Float(b)) => {
                        ChannelValue::Float(a + (b - a) * t)
                    }
                    (ChannelValue::Color(a), ChannelValue::Color(b)) => {
                        ChannelValue::Color(lerp_color(*a, *b, t))
                    }
                    _ => from.clone(),
                }
            }
            Self::Identity => {
                if value.is_null() {
                    ChannelValue::Absent
                } else {
                    ChannelValue::Text(value.to_string())
                }
            }
        }
    }
}

fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let step = nice_step((max - min) / count.max(1) as f64);
    if step == 0.0 {
        return alloc::vec![min, max];
    }
    ticks_at_step(min, max, step)
}

fn ticks_at_step(min: f64, max: f64, step: f64) -> Vec<f64> {
    let start = (min / step).ceil() * step;
    let stop = (max / step).floor() * step;
    let n_f = ((stop - start) / step).round();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        return Vec::new();
    };
    (0..=n).map(|i| start + step * i as f64).collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

fn nice_time_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    const MINUTE: f64 = 60.0;
    const HOUR: f64 = 60.0 * MINUTE;
    const DAY: f64 = 24.0 * HOUR;
    const STEPS: &[f64] = &[
        1.0,
        2.0,
        5.0,
        10.0,
        15.0,
        30.0,
        MINUTE,
        2.0 * MINUTE,
        5.0 * MINUTE,
        10.0 * MINUTE,
        15.0 * MINUTE,
        30.0 * MINUTE,
        HOUR,
        2.0 * HOUR,
        3.0 * HOUR,
        6.0 * HOUR,
        12.0 * HOUR,
        DAY,
        2.0 * DAY,
        7.0 * DAY,
    ];
    for &s in STEPS {
        if s >= step {
            return s;
        }
    }
    (step / DAY).ceil().max(1.0) * DAY
}

fn tick_step(ticks: &[f64]) -> f64 {
    let step = ticks
        .windows(2)
        .map(|w| (w[1] - w[0]).abs())
        .fold(f64::INFINITY, f64::min);
    if step.is_finite() { step } else { 0.0 }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn linear_maps_domain_endpoints_to_range_endpoints() {
        let s = ScaleLinear::new((0.0, 10.0), (100.0, 0.0));
        assert!(close(s.map(0.0), 100.0));
        assert!(close(s.map(10.0), 0.0));
        assert!(close(s.map(5.0), 50.0));
    }

    #[test]
    fn linear_ticks_stay_inside_the_domain() {
        let s = ScaleLinear::new((0.0, 3.29), (0.0, 1.0));
        let ticks = s.ticks(5);
        assert!(!ticks.is_empty());
        for t in &ticks {
            assert!(*t >= -1e-9 && *t <= 3.29 + 1e-9, "tick {t} out of domain");
        }
    }

    #[test]
    fn clamp_and_widen_only_move_bounds_outward() {
        let mut s = ScaleLinear::new((800.0, 5000.0), (0.0, 1.0));
        s.clamp_lower(0.0);
        s.widen_upper(6890.0);
        assert_eq!(s.domain(), (0.0, 6890.0));
        s.clamp_lower(100.0);
        s.widen_upper(10.0);
        assert_eq!(s.domain(), (0.0, 6890.0));
    }

    #[test]
    fn band_positions_partition_the_range() {
        let band = BandScale::new(vec![Value::from("A"), Value::from("B")], (0.0, 100.0));
        let a = band.position(&Value::from("A")).expect("A in domain");
        let b = band.position(&Value::from("B")).expect("B in domain");
        assert!(a < b);
        assert!(b + band.band_width() <= 100.0 + 1e-9);
        assert!(band.position(&Value::from("C")).is_none());
    }

    #[test]
    fn time_ticks_align_to_minute_steps() {
        let s = ScaleTime::new((0.0, 300.0), (0.0, 1.0));
        let ticks = s.ticks(5);
        assert!(ticks.contains(&60.0), "ticks were {ticks:?}");
        for t in &ticks {
            assert!(close(t % 60.0, 0.0), "tick {t} not minute-aligned");
        }
    }

    #[test]
    fn ordinal_channel_scale_cycles_its_palette() {
        let scale = ChannelScale::Ordinal {
            domain: vec![Value::from("a"), Value::from("b"), Value::from("c")],
            range: vec![ChannelValue::from(1.0), ChannelValue::from(2.0)],
        };
        assert_eq!(scale.apply(&Value::from("c")), ChannelValue::from(1.0));
        assert_eq!(scale.apply(&Value::from("zzz")), ChannelValue::Absent);
    }

    #[test]
    fn ramp_interpolates_floats_across_the_domain() {
        let scale = ChannelScale::Ramp {
            domain: (0.0, 10.0),
            from: ChannelValue::from(0.1),
            to: ChannelValue::from(1.0),
        };
        assert_eq!(scale.apply(&Value::from(0.0)), ChannelValue::from(0.1));
        assert_eq!(scale.apply(&Value::from(10.0)), ChannelValue::from(1.0));
    }

    #[test]
    fn spread_centers_a_single_point() {
        let scale = ChannelScale::Spread {
            domain: vec![Value::from("only")],
            limits: (2.0, 6.0),
        };
        assert_eq!(scale.apply(&Value::from("only")), ChannelValue::from(4.0));
    }
}
