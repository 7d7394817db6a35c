// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A declarative charting layer over `strata_core`.
//!
//! Callers supply tabular rows, declare which fields map to which visual
//! channels (axis position, fill, size, stroke, dash, label, …), and the
//! crate computes a geometric layout and renders marks through the narrow
//! `strata_core::Surface` interface. The two load-bearing subsystems are:
//!
//! - **Parameter resolution**: turning declared channel mappings into
//!   per-row visual-value accessors (with validation, palettes and
//!   categorical grouping/stacking), and
//! - **Extras layout**: negotiating space among axes, titles, subtitles and
//!   facet labels around a shrinking plot area with a two-pass
//!   measure/place box model and optional centering.
//!
//! Rendering, text metrics and transitions live behind the surface; this
//! crate never talks to a concrete renderer.

#![no_std]

extern crate alloc;

mod axis;
mod channel;
mod chart;
#[cfg(test)]
mod chart_tests;
mod error;
mod extra;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod grouping;
mod layout;
mod list;
mod mapping;
mod mark;
mod resolve;
mod scale;
mod theme;

pub use axis::{AxisDefinition, AxisId, AxisOptions, TickFormatter};
pub use channel::{ChannelSpec, ChannelValue, ContinuousChannel, OrdinalChannel, StaticChannel};
pub use chart::{AnimationOptions, Chart, ChartOptions};
pub use error::ChartError;
pub use extra::{
    AxisExtra, EdgeOffsets, Extra, ExtraSize, FacetLabelsExtra, Side, SidePresence, TitleExtra,
};
pub use format::{format_tick, format_time};
pub use grouping::{Grouping, OuterGroup, Stacking};
pub use layout::{Centering, ExtraSet, PlotFrame, layout};
pub use mapping::{Definition, Mapping};
pub use mark::{BarMark, ColumnMark, LineMark, Mark, PointMark, StackedColumnMark, TextMark};
pub use resolve::{Accessor, ChannelArg, ChannelArgs, ResolvedChannels, resolve_channels};
pub use scale::{AxisScale, BandScale, ChannelScale, ScaleLinear, ScaleTime};
pub use theme::Theme;
