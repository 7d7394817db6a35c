// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis resolution.
//!
//! `resolve_axis` turns an axis's mappings and options into an immutable
//! [`AxisDefinition`]: the domain scale built from the mapped field's kind,
//! the tick count and formatter, the side the axis band occupies, and the
//! pseudo-ordinal flag for band-centered tick placement on continuous
//! fields. Surplus mappings on an axis do not re-layout the plot; they only
//! register flat facet-label bands on the cross side.
//!
//! Definitions are only mutated during the resolution pass (zero-baseline
//! clamping, stack widening); afterwards they are read-only until the next
//! draw rebuilds them.

extern crate alloc;

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use strata_core::{Dataset, FieldKind, Value};

use crate::error::ChartError;
use crate::extra::{AxisExtra, Side};
use crate::mapping::Mapping;
use crate::scale::{AxisScale, BandScale, ScaleLinear, ScaleTime};

/// A tick label formatter.
pub type TickFormatter = Rc<dyn Fn(&Value) -> String>;

/// Which plot axis a definition belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisId {
    /// The horizontal axis.
    X,
    /// The vertical axis.
    Y,
}

impl AxisId {
    /// The axis name used in error messages ("x"/"y").
    pub fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

/// Caller-facing axis options, merged over per-axis defaults.
#[derive(Clone, Default)]
pub struct AxisOptions {
    /// Approximate tick count (default 5). Zero falls back to the default.
    pub ticks: usize,
    /// Tick label formatter. `None` uses step-aware numeric/temporal
    /// formatting.
    pub format: Option<TickFormatter>,
    /// Axis title. `None` falls back to the capitalized field name.
    pub title: Option<String>,
    /// Axis subtitle.
    pub subtitle: Option<String>,
    /// Flips the axis to the far side (x: top, y: right).
    pub other_side: bool,
    /// An externally supplied scale, used verbatim instead of building one
    /// from the field.
    pub scale: Option<AxisScale>,
}

impl AxisOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the approximate tick count.
    pub fn with_ticks(mut self, ticks: usize) -> Self {
        self.ticks = ticks;
        self
    }

    /// Sets the tick label formatter.
    pub fn with_format(mut self, f: impl Fn(&Value) -> String + 'static) -> Self {
        self.format = Some(Rc::new(f));
        self
    }

    /// Sets the axis title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the axis subtitle.
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Moves the axis to the far side.
    pub fn flipped(mut self) -> Self {
        self.other_side = true;
        self
    }

    /// Supplies an external scale override.
    pub fn with_scale(mut self, scale: AxisScale) -> Self {
        self.scale = Some(scale);
        self
    }
}

impl core::fmt::Debug for AxisOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AxisOptions")
            .field("ticks", &self.ticks)
            .field("format", &self.format.is_some())
            .field("title", &self.title)
            .field("subtitle", &self.subtitle)
            .field("other_side", &self.other_side)
            .field("scale", &self.scale)
            .finish()
    }
}

/// A resolved plot axis.
#[derive(Clone)]
pub struct AxisDefinition {
    /// Which axis this is.
    pub id: AxisId,
    /// The effective scale field (the first mapping).
    pub field: String,
    /// The domain scale.
    pub scale: AxisScale,
    /// Tick count.
    pub tick_count: usize,
    /// Tick label formatter (`None`: step-aware default).
    pub formatter: Option<TickFormatter>,
    /// The side the axis band occupies.
    pub side: Side,
    /// Axis title.
    pub title: Option<String>,
    /// Axis subtitle.
    pub subtitle: Option<String>,
    /// Band-centered tick placement on a continuous field.
    pub pseudo_ordinal: bool,
}

impl AxisDefinition {
    /// Builds the axis band extra for this definition.
    pub fn extra(&self, label_gap: f64) -> AxisExtra {
        AxisExtra::new(
            self.side,
            self.scale.clone(),
            self.tick_count,
            self.formatter.clone(),
            self.pseudo_ordinal,
            label_gap,
        )
    }
}

impl core::fmt::Debug for AxisDefinition {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AxisDefinition")
            .field("id", &self.id)
            .field("field", &self.field)
            .field("scale", &self.scale)
            .field("tick_count", &self.tick_count)
            .field("formatter", &self.formatter.is_some())
            .field("side", &self.side)
            .field("title", &self.title)
            .field("subtitle", &self.subtitle)
            .field("pseudo_ordinal", &self.pseudo_ordinal)
            .finish()
    }
}

/// What the registered marks require of the axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct MarkDemands {
    pub(crate) zero_x: bool,
    pub(crate) zero_y: bool,
    pub(crate) band_x: bool,
    pub(crate) band_y: bool,
}

/// A resolved axis plus the facet-label bands of its surplus mappings.
pub(crate) struct ResolvedAxis {
    pub(crate) definition: AxisDefinition,
    pub(crate) facet_labels: Vec<Vec<String>>,
}

const DEFAULT_TICKS: usize = 5;

/// Resolves one axis from its mappings and options.
pub(crate) fn resolve_axis(
    id: AxisId,
    mappings: &[Mapping],
    options: &AxisOptions,
    data: &Dataset,
    demands: &MarkDemands,
    provisional: (f64, f64),
) -> Result<ResolvedAxis, ChartError> {
    let Some(primary) = mappings.first() else {
        return Err(ChartError::MissingAxisMapping { axis: id });
    };
    let field = data
        .field(&primary.field)
        .ok_or_else(|| ChartError::UnknownField {
            field: primary.field.clone(),
        })?;

    // Surplus mappings become flat facet-label bands on the cross side.
    let mut facet_labels = Vec::new();
    for extra_mapping in &mappings[1..] {
        let labels = data
            .distinct(&extra_mapping.field)
            .ok_or_else(|| ChartError::UnknownField {
                field: extra_mapping.field.clone(),
            })?
            .iter()
            .map(ToString::to_string)
            .collect();
        facet_labels.push(labels);
    }

    let wants_band = match id {
        AxisId::X => demands.band_x,
        AxisId::Y => demands.band_y,
    };
    let wants_zero = match id {
        AxisId::X => demands.zero_x,
        AxisId::Y => demands.zero_y,
    };

    let span = (provisional.1 - provisional.0).abs();
    let scale = match &options.scale {
        Some(s) => {
            let mut s = s.clone();
            s.set_range(provisional);
            s
        }
        None => match field.kind() {
            FieldKind::Ordinal => AxisScale::Band(BandScale::new(
                field.distinct_values(data.rows()).to_vec(),
                (0.0, span),
            )),
            FieldKind::Continuous => {
                let extent = data.extent(&primary.field).unwrap_or((0.0, 0.0));
                let mut s = ScaleLinear::new(extent, provisional);
                if wants_zero {
                    s.clamp_lower(0.0);
                }
                AxisScale::Linear(s)
            }
            FieldKind::Temporal => {
                let extent = data.extent(&primary.field).unwrap_or((0.0, 0.0));
                AxisScale::Time(ScaleTime::new(extent, provisional))
            }
        },
    };
    let pseudo_ordinal = wants_band && !scale.is_band();

    let side = match (id, options.other_side) {
        (AxisId::X, false) => Side::Bottom,
        (AxisId::X, true) => Side::Top,
        (AxisId::Y, false) => Side::Left,
        (AxisId::Y, true) => Side::Right,
    };

    let tick_count = if options.ticks == 0 {
        DEFAULT_TICKS
    } else {
        options.ticks
    };

    Ok(ResolvedAxis {
        definition: AxisDefinition {
            id,
            field: primary.field.clone(),
            scale,
            tick_count,
            formatter: options.format.clone(),
            side,
            title: options
                .title
                .clone()
                .or_else(|| Some(capitalize(&primary.field))),
            subtitle: options.subtitle.clone(),
            pseudo_ordinal,
        },
        facet_labels,
    })
}

/// Uppercases the first character (default axis titles).
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
