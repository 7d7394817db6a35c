// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Peripheral chart furniture ("extras").
//!
//! An extra is any non-mark visual element positioned around the plot area:
//! axes, chart and axis titles, and facet-label bands. Extras are a closed
//! set of variants dispatched by match; each carries only its own state and
//! supports three operations against the rendering surface:
//!
//! - `draw`: render unpositioned so the measure pass can read bounds;
//! - `footprint`: report the thickness consumed on the extra's side, plus
//!   any top/left overflow an absorbing side must account for;
//! - `place`: receive the final four-direction offset and plot size, re-map
//!   the internal scale onto the final span, and reposition.
//!
//! Extras are created during axis/title resolution and rebuilt on every
//! draw; nothing here survives across draw calls.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use peniko::color::palette::css;
use strata_core::{Attrs, NodeId, ShapeKind, Surface, TextAnchor, TextBaseline, Value};

use crate::axis::TickFormatter;
use crate::format::{format_tick, format_time};
use crate::scale::AxisScale;

const TICK_SIZE: f64 = 6.0;
const LABEL_FONT_SIZE: f64 = 10.0;

/// The side of the plot an extra occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Above the plot.
    Top,
    /// Right of the plot.
    Right,
    /// Below the plot.
    Bottom,
    /// Left of the plot.
    Left,
}

impl Side {
    /// Whether the side stacks vertically (top/bottom bands).
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    pub(crate) fn idx(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Right => 1,
            Self::Bottom => 2,
            Self::Left => 3,
        }
    }
}

/// A measured footprint: primary thickness plus auxiliary overflow.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExtraSize {
    /// Thickness along the side's normal (height for top/bottom, width for
    /// left/right).
    pub size: f64,
    /// Overflow past the plot's top edge (vertical axes' outermost label).
    pub top_overflow: f64,
    /// Overflow past the plot's left edge (horizontal axes' first label).
    pub left_overflow: f64,
}

/// A four-direction placement offset.
///
/// On the side an extra occupies this is its stacking slot; on the other
/// sides it is the total thickness those sides consumed, so the extra knows
/// where the plot's edges begin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeOffsets {
    /// Offset from the canvas top.
    pub top: f64,
    /// Offset beyond the plot's right edge.
    pub right: f64,
    /// Offset beyond the plot's bottom edge.
    pub bottom: f64,
    /// Offset from the canvas left.
    pub left: f64,
}

/// Which sides already hold at least one extra.
///
/// Axis label overflow is only counted on a side with no sibling extra to
/// absorb it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SidePresence {
    /// Any extras at the top.
    pub top: bool,
    /// Any extras at the right.
    pub right: bool,
    /// Any extras at the bottom.
    pub bottom: bool,
    /// Any extras at the left.
    pub left: bool,
}

/// A peripheral chart element.
#[derive(Debug)]
pub enum Extra {
    /// An axis band: rule, ticks and tick labels.
    Axis(AxisExtra),
    /// A single line of descriptive text (chart or axis title/subtitle).
    Title(TitleExtra),
    /// A minimal facet-label band (flat placeholder, no re-layout).
    FacetLabels(FacetLabelsExtra),
}

impl Extra {
    /// The side this extra occupies.
    pub fn side(&self) -> Side {
        match self {
            Self::Axis(e) => e.side,
            Self::Title(e) => e.side,
            Self::FacetLabels(e) => e.side,
        }
    }

    /// Whether this extra is an axis (partial centering skips axes).
    pub fn is_axis(&self) -> bool {
        matches!(self, Self::Axis(_))
    }

    /// Renders the extra unpositioned so its bounds can be measured.
    pub fn draw(&mut self, surface: &mut dyn Surface, parent: NodeId) {
        match self {
            Self::Axis(e) => e.draw(surface, parent),
            Self::Title(e) => e.draw(surface, parent),
            Self::FacetLabels(e) => e.draw(surface, parent),
        }
    }

    /// Measures the rendered footprint.
    pub fn footprint(&self, surface: &dyn Surface, neighbors: SidePresence) -> ExtraSize {
        match self {
            Self::Axis(e) => e.footprint(surface, neighbors),
            Self::Title(e) => e.footprint(surface),
            Self::FacetLabels(e) => e.footprint(surface),
        }
    }

    /// Moves the extra into its final slot around the plot.
    pub fn place(
        &mut self,
        surface: &mut dyn Surface,
        offset: EdgeOffsets,
        plot_w: f64,
        plot_h: f64,
    ) {
        match self {
            Self::Axis(e) => e.place(surface, offset, plot_w, plot_h),
            Self::Title(e) => e.place(surface, offset, plot_w, plot_h),
            Self::FacetLabels(e) => e.place(surface, offset, plot_w, plot_h),
        }
    }
}

/// An axis extra: domain rule, tick marks and tick labels.
pub struct AxisExtra {
    side: Side,
    scale: AxisScale,
    tick_count: usize,
    formatter: Option<TickFormatter>,
    pseudo_ordinal: bool,
    label_gap: f64,
    group: Option<NodeId>,
    rule: Option<NodeId>,
    tick_nodes: Vec<NodeId>,
    label_nodes: Vec<NodeId>,
}

impl core::fmt::Debug for AxisExtra {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AxisExtra")
            .field("side", &self.side)
            .field("scale", &self.scale)
            .field("tick_count", &self.tick_count)
            .field("formatter", &self.formatter.is_some())
            .field("pseudo_ordinal", &self.pseudo_ordinal)
            .field("label_gap", &self.label_gap)
            .field("group", &self.group)
            .field("rule", &self.rule)
            .field("tick_nodes", &self.tick_nodes)
            .field("label_nodes", &self.label_nodes)
            .finish()
    }
}

impl AxisExtra {
    /// Creates an axis extra from resolved axis state.
    pub fn new(
        side: Side,
        scale: AxisScale,
        tick_count: usize,
        formatter: Option<TickFormatter>,
        pseudo_ordinal: bool,
        label_gap: f64,
    ) -> Self {
        Self {
            side,
            scale,
            tick_count,
            formatter,
            pseudo_ordinal,
            label_gap: label_gap.max(0.0),
            group: None,
            rule: None,
            tick_nodes: Vec::new(),
            label_nodes: Vec::new(),
        }
    }

    fn format_value(&self, v: &Value, step: f64) -> String {
        match &self.formatter {
            Some(f) => f(v),
            None => match v {
                Value::Num(n) => format_tick(*n, step),
                Value::Time(n) => format_time(*n, step),
                other => other.to_string(),
            },
        }
    }

    /// Tick positions (along the axis, in range space) and labels.
    fn tick_data(&self) -> Vec<(f64, String)> {
        let (values, step) = self.scale.tick_values(self.tick_count);
        match &self.scale {
            AxisScale::Band(band) => values
                .iter()
                .map(|v| {
                    let pos = band.position(v).unwrap_or(0.0) + 0.5 * band.band_width();
                    (pos, self.format_value(v, step))
                })
                .collect(),
            _ => {
                // Pseudo-ordinal axes center labels between gridlines by
                // shifting half a synthetic band (span / visible ticks).
                let shift = if self.pseudo_ordinal && !values.is_empty() {
                    let (r0, r1) = self.scale.range();
                    let band = self.scale.span() / values.len() as f64;
                    if r1 >= r0 { 0.5 * band } else { -0.5 * band }
                } else {
                    0.0
                };
                values
                    .iter()
                    .map(|v| {
                        let pos = self.scale.map_value(v).unwrap_or(0.0) + shift;
                        (pos, self.format_value(v, step))
                    })
                    .collect()
            }
        }
    }

    fn draw(&mut self, surface: &mut dyn Surface, parent: NodeId) {
        let group = surface.append(parent, ShapeKind::Group);
        self.group = Some(group);

        let len = self.scale.span();
        let rule = surface.append(group, ShapeKind::Line);
        let rule_attrs = match self.side {
            Side::Top | Side::Bottom => Attrs::new().with_line(0.0, 0.0, len, 0.0),
            Side::Left | Side::Right => Attrs::new().with_line(0.0, 0.0, 0.0, len),
        };
        surface.set(
            rule,
            &rule_attrs.with_stroke(css::BLACK).with_stroke_width(1.0),
        );
        self.rule = Some(rule);

        for (pos, label) in self.tick_data() {
            let tick = surface.append(group, ShapeKind::Line);
            let text = surface.append(group, ShapeKind::Text);
            let (tick_attrs, label_attrs) = self.tick_attrs(pos, &label);
            surface.set(
                tick,
                &tick_attrs.with_stroke(css::BLACK).with_stroke_width(1.0),
            );
            surface.set(
                text,
                &label_attrs
                    .with_font_size(LABEL_FONT_SIZE)
                    .with_fill(css::BLACK),
            );
            self.tick_nodes.push(tick);
            self.label_nodes.push(text);
        }
    }

    /// Positional attributes for one tick mark and its label.
    ///
    /// Local coordinates put the axis rule through the origin, with labels
    /// extending away from the plot.
    fn tick_attrs(&self, pos: f64, label: &str) -> (Attrs, Attrs) {
        let gap = TICK_SIZE + self.label_gap;
        match self.side {
            Side::Bottom => (
                Attrs::new().with_line(pos, 0.0, pos, TICK_SIZE),
                Attrs::new()
                    .with_pos(pos, gap)
                    .with_text(label)
                    .with_anchor(TextAnchor::Middle)
                    .with_baseline(TextBaseline::Hanging),
            ),
            Side::Top => (
                Attrs::new().with_line(pos, 0.0, pos, -TICK_SIZE),
                Attrs::new()
                    .with_pos(pos, -gap)
                    .with_text(label)
                    .with_anchor(TextAnchor::Middle)
                    .with_baseline(TextBaseline::Alphabetic),
            ),
            Side::Left => (
                Attrs::new().with_line(0.0, pos, -TICK_SIZE, pos),
                Attrs::new()
                    .with_pos(-gap, pos)
                    .with_text(label)
                    .with_anchor(TextAnchor::End)
                    .with_baseline(TextBaseline::Middle),
            ),
            Side::Right => (
                Attrs::new().with_line(0.0, pos, TICK_SIZE, pos),
                Attrs::new()
                    .with_pos(gap, pos)
                    .with_text(label)
                    .with_anchor(TextAnchor::Start)
                    .with_baseline(TextBaseline::Middle),
            ),
        }
    }

    fn footprint(&self, surface: &dyn Surface, neighbors: SidePresence) -> ExtraSize {
        let Some(group) = self.group else {
            return ExtraSize::default();
        };
        let b = surface.bounds(group);
        let size = if self.side.is_horizontal() {
            b.height()
        } else {
            b.width()
        };

        // Outermost tick labels can extend past the plot's own edge; that
        // overhang must be absorbed by the perpendicular side when nothing
        // else already occupies it.
        let mut top_overflow = 0.0;
        let mut left_overflow = 0.0;
        if let (Some(rule), Some(first), Some(last)) = (
            self.rule,
            self.label_nodes.first().copied(),
            self.label_nodes.last().copied(),
        ) {
            let rule_b = surface.bounds(rule);
            let first_b = surface.bounds(first);
            let last_b = surface.bounds(last);
            if self.side.is_horizontal() && !neighbors.left {
                let extreme = first_b.x0.min(last_b.x0);
                left_overflow = (rule_b.x0 - extreme).max(0.0);
            }
            if !self.side.is_horizontal() && !neighbors.top {
                let extreme = first_b.y0.min(last_b.y0);
                top_overflow = (rule_b.y0 - extreme).max(0.0);
            }
        }

        ExtraSize {
            size: size.max(0.0),
            top_overflow,
            left_overflow,
        }
    }

    fn place(&mut self, surface: &mut dyn Surface, offset: EdgeOffsets, plot_w: f64, plot_h: f64) {
        match self.side {
            Side::Top | Side::Bottom => self.scale.set_range((0.0, plot_w)),
            Side::Left | Side::Right => self.scale.set_range((plot_h, 0.0)),
        }
        if self.scale.is_band() {
            // Band positions grow from the range minimum; keep the first
            // category at the plot start for vertical axes too.
            self.scale.set_range(if self.side.is_horizontal() {
                (0.0, plot_w)
            } else {
                (0.0, plot_h)
            });
        }

        let Some(group) = self.group else {
            return;
        };

        let len = self.scale.span();
        if let Some(rule) = self.rule {
            let attrs = match self.side {
                Side::Top | Side::Bottom => Attrs::new().with_line(0.0, 0.0, len, 0.0),
                Side::Left | Side::Right => Attrs::new().with_line(0.0, 0.0, 0.0, len),
            };
            surface.set(rule, &attrs);
        }
        for (i, (pos, label)) in self.tick_data().into_iter().enumerate() {
            let (tick_attrs, label_attrs) = self.tick_attrs(pos, &label);
            if let Some(tick) = self.tick_nodes.get(i) {
                surface.set(*tick, &tick_attrs);
            }
            if let Some(text) = self.label_nodes.get(i) {
                surface.set(*text, &label_attrs);
            }
        }

        let b = surface.bounds(group);
        let translate = match self.side {
            Side::Bottom => (offset.left, offset.top + plot_h + offset.bottom),
            Side::Top => (offset.left, offset.top + b.height()),
            Side::Left => (offset.left + b.width(), offset.top),
            Side::Right => (offset.left + plot_w + offset.right, offset.top),
        };
        surface.set(group, &Attrs::new().with_pos(translate.0, translate.1));
    }
}

/// A single line of descriptive text beside the plot.
#[derive(Debug)]
pub struct TitleExtra {
    side: Side,
    text: String,
    padding: f64,
    font_size: f64,
    node: Option<NodeId>,
}

impl TitleExtra {
    /// Creates a title extra.
    pub fn new(side: Side, text: impl Into<String>, padding: f64, font_size: f64) -> Self {
        Self {
            side,
            text: text.into(),
            padding: padding.max(0.0),
            font_size,
            node: None,
        }
    }

    fn draw(&mut self, surface: &mut dyn Surface, parent: NodeId) {
        let node = surface.append(parent, ShapeKind::Text);
        let mut attrs = Attrs::new()
            .with_pos(0.0, 0.0)
            .with_text(self.text.clone())
            .with_font_size(self.font_size)
            .with_anchor(TextAnchor::Middle)
            .with_baseline(TextBaseline::Hanging)
            .with_fill(css::BLACK);
        if !self.side.is_horizontal() {
            attrs = attrs.with_angle(270.0);
        }
        surface.set(node, &attrs);
        self.node = Some(node);
    }

    fn footprint(&self, surface: &dyn Surface) -> ExtraSize {
        let Some(node) = self.node else {
            return ExtraSize::default();
        };
        let b = surface.bounds(node);
        // Rotated vertical titles consume their line height as width.
        let size = if self.side.is_horizontal() {
            b.height()
        } else {
            b.width()
        };
        ExtraSize {
            size: size + 2.0 * self.padding,
            ..ExtraSize::default()
        }
    }

    fn place(&mut self, surface: &mut dyn Surface, offset: EdgeOffsets, plot_w: f64, plot_h: f64) {
        let Some(node) = self.node else {
            return;
        };
        let centred_x = offset.left + 0.5 * plot_w;
        let centred_y = offset.top + 0.5 * plot_h;
        let attrs = match self.side {
            Side::Top => Attrs::new().with_pos(centred_x, offset.top + self.padding),
            Side::Bottom => {
                Attrs::new().with_pos(centred_x, offset.top + plot_h + offset.bottom + self.padding)
            }
            Side::Left => Attrs::new().with_pos(offset.left + self.padding, centred_y),
            Side::Right => {
                Attrs::new().with_pos(offset.left + plot_w + offset.right + self.padding, centred_y)
            }
        };
        surface.set(node, &attrs);
    }
}

/// A flat facet-label band: one label per facet, evenly spaced.
#[derive(Debug)]
pub struct FacetLabelsExtra {
    side: Side,
    labels: Vec<String>,
    font_size: f64,
    group: Option<NodeId>,
    nodes: Vec<NodeId>,
}

impl FacetLabelsExtra {
    /// Creates a facet-label band.
    pub fn new(side: Side, labels: Vec<String>, font_size: f64) -> Self {
        Self {
            side,
            labels,
            font_size,
            group: None,
            nodes: Vec::new(),
        }
    }

    fn draw(&mut self, surface: &mut dyn Surface, parent: NodeId) {
        let group = surface.append(parent, ShapeKind::Group);
        self.group = Some(group);
        for label in &self.labels {
            let node = surface.append(group, ShapeKind::Text);
            let mut attrs = Attrs::new()
                .with_pos(0.0, 0.0)
                .with_text(label.clone())
                .with_font_size(self.font_size)
                .with_anchor(TextAnchor::Middle)
                .with_baseline(TextBaseline::Hanging)
                .with_fill(css::BLACK);
            if !self.side.is_horizontal() {
                attrs = attrs.with_angle(270.0);
            }
            surface.set(node, &attrs);
            self.nodes.push(node);
        }
    }

    fn footprint(&self, surface: &dyn Surface) -> ExtraSize {
        let Some(group) = self.group else {
            return ExtraSize::default();
        };
        let b = surface.bounds(group);
        let size = if self.side.is_horizontal() {
            b.height()
        } else {
            b.width()
        };
        ExtraSize {
            size: size.max(0.0),
            ..ExtraSize::default()
        }
    }

    fn place(&mut self, surface: &mut dyn Surface, offset: EdgeOffsets, plot_w: f64, plot_h: f64) {
        let n = self.labels.len().max(1) as f64;
        for (i, node) in self.nodes.iter().enumerate() {
            let attrs = if self.side.is_horizontal() {
                let slot = plot_w / n;
                let x = offset.left + (i as f64 + 0.5) * slot;
                let y = match self.side {
                    Side::Top => offset.top,
                    _ => offset.top + plot_h + offset.bottom,
                };
                Attrs::new().with_pos(x, y)
            } else {
                let slot = plot_h / n;
                let y = offset.top + (i as f64 + 0.5) * slot;
                let x = match self.side {
                    Side::Right => offset.left + plot_w + offset.right,
                    _ => offset.left,
                };
                Attrs::new().with_pos(x, y)
            };
            surface.set(*node, &attrs);
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use strata_core::Scene;

    use super::*;
    use crate::scale::{BandScale, ScaleLinear};

    fn scene_root(scene: &mut Scene) -> NodeId {
        scene.attach_root().expect("scene hosts a root")
    }

    #[test]
    fn bottom_axis_consumes_height_not_width() {
        let mut scene = Scene::new();
        let root = scene_root(&mut scene);
        let scale = AxisScale::Linear(ScaleLinear::new((0.0, 10.0), (0.0, 200.0)));
        let mut axis = AxisExtra::new(Side::Bottom, scale, 5, None, false, 4.0);
        axis.draw(&mut scene, root);
        let size = axis.footprint(&scene, SidePresence::default());
        assert!(size.size > TICK_SIZE, "footprint was {size:?}");
        assert!(size.size < 60.0, "footprint was {size:?}");
    }

    #[test]
    fn first_label_overflow_is_absorbed_only_without_left_neighbors() {
        let mut scene = Scene::new();
        let root = scene_root(&mut scene);
        let scale = AxisScale::Linear(ScaleLinear::new((0.0, 1000.0), (0.0, 200.0)));
        let mut axis = AxisExtra::new(Side::Bottom, scale, 5, None, false, 4.0);
        axis.draw(&mut scene, root);

        let absorbed = axis.footprint(&scene, SidePresence::default());
        // A centered "0" label at x=0 extends half its width past the rule.
        assert!(absorbed.left_overflow > 0.0, "footprint was {absorbed:?}");

        let with_neighbor = axis.footprint(
            &scene,
            SidePresence {
                left: true,
                ..SidePresence::default()
            },
        );
        assert_eq!(with_neighbor.left_overflow, 0.0);
    }

    #[test]
    fn pseudo_ordinal_axes_shift_ticks_by_half_a_band() {
        let scale = AxisScale::Linear(ScaleLinear::new((0.0, 4.0), (0.0, 100.0)));
        let plain = AxisExtra::new(Side::Bottom, scale.clone(), 5, None, false, 4.0);
        let shifted = AxisExtra::new(Side::Bottom, scale, 5, None, true, 4.0);
        let plain_ticks = plain.tick_data();
        let shifted_ticks = shifted.tick_data();
        assert_eq!(plain_ticks.len(), shifted_ticks.len());
        let band = 100.0 / plain_ticks.len() as f64;
        for (p, s) in plain_ticks.iter().zip(&shifted_ticks) {
            assert!(
                ((s.0 - p.0) - 0.5 * band).abs() < 1e-9,
                "expected half-band shift, got {} vs {}",
                p.0,
                s.0
            );
        }
    }

    #[test]
    fn band_axis_labels_sit_at_band_centers() {
        let band = BandScale::new(vec![Value::from("A"), Value::from("B")], (0.0, 100.0));
        let width = band.band_width();
        let a_start = band.position(&Value::from("A")).expect("A in domain");
        let axis = AxisExtra::new(Side::Bottom, AxisScale::Band(band), 5, None, false, 4.0);
        let ticks = axis.tick_data();
        assert_eq!(ticks.len(), 2);
        assert!((ticks[0].0 - (a_start + 0.5 * width)).abs() < 1e-9);
        assert_eq!(ticks[0].1, "A");
    }

    #[test]
    fn vertical_title_consumes_width() {
        let mut scene = Scene::new();
        let root = scene_root(&mut scene);
        let mut title = TitleExtra::new(Side::Left, "Sales", 8.0, 11.0);
        title.draw(&mut scene, root);
        let size = title.footprint(&scene);
        // Rotated: thickness is one line height plus padding, not the
        // advance width of "Sales".
        assert!(size.size < 11.0 * 2.0 + 16.0 + 1e-9, "footprint was {size:?}");
        assert!(size.size >= 11.0, "footprint was {size:?}");
    }

    #[test]
    fn empty_facet_band_contributes_zero() {
        let mut scene = Scene::new();
        let root = scene_root(&mut scene);
        let mut facet = FacetLabelsExtra::new(Side::Top, vec![], 10.0);
        facet.draw(&mut scene, root);
        assert_eq!(facet.footprint(&scene), ExtraSize::default());
    }
}
