// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mark variants and their draw logic.
//!
//! Marks are a closed set dispatched by match: points, lines, columns,
//! stacked columns, horizontal bars and text. Each variant owns only the
//! channel declarations the caller registered; accessors are resolved
//! against the variant's channel table at draw time, and geometry is issued
//! through the rendering surface into the plot container.
//!
//! Entry animation, when enabled on the chart, first places zero-baseline
//! geometry and then transitions every primitive to its final position;
//! each transition carries a join ticket so the draw's aggregate handle
//! settles only after the surface reports completion.

extern crate alloc;

use alloc::vec::Vec;

use kurbo::Point;
use strata_core::{
    Attrs, Dataset, DrawJoin, NodeId, Row, ShapeKind, Surface, TextAnchor, TextBaseline, Timing,
    Value,
};

use crate::axis::AxisDefinition;
use crate::channel::{ChannelSpec, ChannelValue};
use crate::chart::AnimationOptions;
use crate::error::ChartError;
use crate::grouping::Grouping;
use crate::resolve::{ChannelArgs, ResolvedChannels, resolve_channels};
use crate::scale::{AxisScale, BandScale};
use crate::theme::Theme;

/// A geometry-producing chart layer.
#[derive(Clone, Debug)]
pub enum Mark {
    /// One circle per row.
    Point(PointMark),
    /// One polyline per series.
    Line(LineMark),
    /// Vertical columns on a band x-axis (side-by-side when grouped).
    Column(ColumnMark),
    /// Vertical columns stacked within each category.
    StackedColumn(StackedColumnMark),
    /// Horizontal bars on a band y-axis.
    Bar(BarMark),
    /// One text label per row.
    Text(TextMark),
}

/// State for [`Mark::Point`].
#[derive(Clone, Debug, Default)]
pub struct PointMark {
    /// Declared channel values.
    pub channels: ChannelArgs,
}

/// State for [`Mark::Line`].
#[derive(Clone, Debug, Default)]
pub struct LineMark {
    /// Declared channel values.
    pub channels: ChannelArgs,
}

/// State for [`Mark::Column`].
#[derive(Clone, Debug, Default)]
pub struct ColumnMark {
    /// Declared channel values.
    pub channels: ChannelArgs,
}

/// State for [`Mark::StackedColumn`].
#[derive(Clone, Debug, Default)]
pub struct StackedColumnMark {
    /// Declared channel values.
    pub channels: ChannelArgs,
}

/// State for [`Mark::Bar`].
#[derive(Clone, Debug, Default)]
pub struct BarMark {
    /// Declared channel values.
    pub channels: ChannelArgs,
}

/// State for [`Mark::Text`].
#[derive(Clone, Debug, Default)]
pub struct TextMark {
    /// Declared channel values.
    pub channels: ChannelArgs,
}

/// Everything one mark needs to draw itself, valid for a single draw call.
pub(crate) struct DrawContext<'a> {
    pub(crate) surface: &'a mut dyn Surface,
    pub(crate) plot_node: NodeId,
    pub(crate) plot_w: f64,
    pub(crate) plot_h: f64,
    pub(crate) x: &'a AxisDefinition,
    pub(crate) y: &'a AxisDefinition,
    pub(crate) data: &'a Dataset,
    pub(crate) theme: &'a Theme,
    pub(crate) animation: Option<&'a AnimationOptions>,
    pub(crate) join: &'a DrawJoin,
    pub(crate) mark_index: usize,
}

impl DrawContext<'_> {
    fn timing(&self) -> Option<Timing> {
        self.animation.map(|a| Timing {
            duration_ms: a.duration_ms,
            delay_ms: a.delay_ms * self.mark_index as f64,
            easing: a.easing,
        })
    }

    /// Sets final attributes, transitioning from already-set initial
    /// geometry when animation is enabled.
    fn settle(&mut self, node: NodeId, attrs: &Attrs) {
        match self.timing() {
            Some(timing) => {
                self.surface
                    .transition(node, attrs, timing, self.join.ticket());
            }
            None => self.surface.set(node, attrs),
        }
    }
}

impl Mark {
    /// The mark kind name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Point(_) => "points",
            Self::Line(_) => "lines",
            Self::Column(_) => "columns",
            Self::StackedColumn(_) => "stacked-columns",
            Self::Bar(_) => "bars",
            Self::Text(_) => "text",
        }
    }

    /// Whether the mark needs a zero-anchored horizontal axis.
    pub fn zero_x(&self) -> bool {
        matches!(self, Self::Bar(_))
    }

    /// Whether the mark needs a zero-anchored vertical axis.
    pub fn zero_y(&self) -> bool {
        matches!(self, Self::Column(_) | Self::StackedColumn(_))
    }

    /// Whether the mark needs band (category) treatment on x.
    pub fn band_x(&self) -> bool {
        matches!(self, Self::Column(_) | Self::StackedColumn(_))
    }

    /// Whether the mark needs band (category) treatment on y.
    pub fn band_y(&self) -> bool {
        matches!(self, Self::Bar(_))
    }

    /// Whether the mark stacks within categories.
    pub fn is_stacked(&self) -> bool {
        matches!(self, Self::StackedColumn(_))
    }

    /// The declared channel values.
    pub fn channels(&self) -> &ChannelArgs {
        match self {
            Self::Point(m) => &m.channels,
            Self::Line(m) => &m.channels,
            Self::Column(m) => &m.channels,
            Self::StackedColumn(m) => &m.channels,
            Self::Bar(m) => &m.channels,
            Self::Text(m) => &m.channels,
        }
    }

    /// The channel table this mark resolves against.
    pub(crate) fn channel_table(&self, theme: &Theme) -> Vec<(&'static str, ChannelSpec)> {
        let fill = || ChannelSpec::ordinal(theme.swatch_color(1), palette(theme), gradient(theme));
        let stroke = || ChannelSpec::ordinal(ChannelValue::Absent, palette(theme), gradient(theme));
        let opacity = |floor: f64| ChannelSpec::continuous(1.0, (floor, 1.0));
        match self {
            Self::Point(_) => alloc::vec![
                ("size", ChannelSpec::continuous(4.0, (2.0, 6.0))),
                ("fill", fill()),
                ("opacity", opacity(0.1)),
                ("stroke", stroke()),
            ],
            Self::Line(_) => alloc::vec![
                ("thickness", ChannelSpec::continuous(2.0, (1.0, 10.0))),
                (
                    "dash",
                    ChannelSpec::ordinal(
                        ChannelValue::from(""),
                        alloc::vec!["".into(), "4, 4".into(), "2, 2".into()],
                        ("".into(), "4, 4".into()),
                    ),
                ),
                (
                    "interpolate",
                    ChannelSpec::fixed(
                        "linear",
                        alloc::vec![
                            "linear".into(),
                            "step-before".into(),
                            "step-after".into(),
                            "monotone".into(),
                        ],
                    ),
                ),
                ("opacity", opacity(0.1)),
                ("stroke", fill()),
            ],
            Self::Column(_) | Self::Bar(_) => alloc::vec![
                ("fill", fill()),
                ("opacity", opacity(0.1)),
                ("stroke", stroke()),
            ],
            Self::StackedColumn(_) => alloc::vec![
                ("fill", fill()),
                ("opacity", opacity(0.2)),
                ("stroke", stroke()),
            ],
            Self::Text(_) => alloc::vec![
                ("size", ChannelSpec::continuous(20.0, (2.0, 6.0))),
                ("fill", fill()),
                ("opacity", opacity(0.1)),
                ("stroke", stroke()),
                (
                    "label",
                    ChannelSpec::ordinal(
                        ChannelValue::Absent,
                        Vec::new(),
                        (ChannelValue::Absent, ChannelValue::Absent),
                    ),
                ),
            ],
        }
    }

    /// Resolves accessors and renders this mark into the plot container.
    pub(crate) fn draw(&self, ctx: &mut DrawContext<'_>) -> Result<(), ChartError> {
        let table = self.channel_table(ctx.theme);
        let resolved = resolve_channels(self.name(), &table, self.channels(), ctx.data)?;
        match self {
            Self::Point(_) => draw_points(ctx, &resolved),
            Self::Line(_) => draw_lines(ctx, &resolved),
            Self::Column(_) => draw_columns(ctx, &resolved, false),
            Self::StackedColumn(_) => draw_columns(ctx, &resolved, true),
            Self::Bar(_) => draw_bars(ctx, &resolved),
            Self::Text(_) => draw_text(ctx, &resolved),
        }
    }
}

fn palette(theme: &Theme) -> Vec<ChannelValue> {
    theme.swatch.iter().map(|c| ChannelValue::Color(*c)).collect()
}

fn gradient(theme: &Theme) -> (ChannelValue, ChannelValue) {
    (
        ChannelValue::Color(theme.gradient.0),
        ChannelValue::Color(theme.gradient.1),
    )
}

/// The axis scale re-ranged onto the final plot span.
fn plot_scale(axis: &AxisDefinition, plot_w: f64, plot_h: f64) -> AxisScale {
    let mut scale = axis.scale.clone();
    let horizontal = matches!(axis.id, crate::axis::AxisId::X);
    if horizontal {
        scale.set_range((0.0, plot_w));
    } else if scale.is_band() {
        scale.set_range((0.0, plot_h));
    } else {
        scale.set_range((plot_h, 0.0));
    }
    scale
}

/// A point-like position on an axis (band values map to band centers).
fn point_position(scale: &AxisScale, value: &Value) -> Option<f64> {
    match scale {
        AxisScale::Band(b) => b.position(value).map(|p| p + 0.5 * b.band_width()),
        _ => scale.map_value(value),
    }
}

/// The category band for a column/bar mark: the axis band itself, or a
/// synthetic band over the field's distinct values on a pseudo-ordinal axis.
fn category_band(axis: &AxisDefinition, data: &Dataset, span: f64) -> BandScale {
    match &axis.scale {
        AxisScale::Band(b) => {
            let mut b = b.clone();
            b.set_range((0.0, span));
            b
        }
        _ => {
            let domain = data
                .distinct(&axis.field)
                .map(<[Value]>::to_vec)
                .unwrap_or_default();
            BandScale::new(domain, (0.0, span))
        }
    }
}

/// Fill/stroke/opacity attributes for one row.
fn paint_attrs(resolved: &ResolvedChannels, row: &Row) -> Attrs {
    let mut attrs = Attrs::new();
    if let Some(c) = resolved.value("fill", row).as_color() {
        attrs = attrs.with_fill(c);
    }
    if let Some(c) = resolved.value("stroke", row).as_color() {
        attrs = attrs.with_stroke(c);
    }
    if let Some(o) = resolved.value("opacity", row).as_f64() {
        attrs = attrs.with_opacity(o);
    }
    attrs
}

fn draw_points(ctx: &mut DrawContext<'_>, resolved: &ResolvedChannels) -> Result<(), ChartError> {
    let x_scale = plot_scale(ctx.x, ctx.plot_w, ctx.plot_h);
    let y_scale = plot_scale(ctx.y, ctx.plot_w, ctx.plot_h);
    let container = ctx.surface.append(ctx.plot_node, ShapeKind::Group);

    for row in ctx.data.rows() {
        let Some(cx) = point_position(&x_scale, row.get(&ctx.x.field)) else {
            continue;
        };
        let Some(cy) = point_position(&y_scale, row.get(&ctx.y.field)) else {
            continue;
        };
        let r = resolved.value("size", row).as_f64().unwrap_or(4.0);
        let node = ctx.surface.append(container, ShapeKind::Circle);
        let base = paint_attrs(resolved, row).with_radius(r);
        if ctx.animation.is_some() {
            ctx.surface.set(node, &base.clone().with_pos(cx, ctx.plot_h));
        } else {
            ctx.surface.set(node, &base);
        }
        ctx.settle(node, &Attrs::new().with_pos(cx, cy));
    }
    Ok(())
}

fn draw_lines(ctx: &mut DrawContext<'_>, resolved: &ResolvedChannels) -> Result<(), ChartError> {
    let x_scale = plot_scale(ctx.x, ctx.plot_w, ctx.plot_h);
    let y_scale = plot_scale(ctx.y, ctx.plot_w, ctx.plot_h);
    let container = ctx.surface.append(ctx.plot_node, ShapeKind::Group);

    // A mapped stroke splits rows into one series per stroke-field value.
    let series: Vec<Vec<usize>> = match resolved.mapped_field("stroke") {
        Some(field) => {
            let mut groups: Vec<(Value, Vec<usize>)> = Vec::new();
            for (i, row) in ctx.data.rows().iter().enumerate() {
                let v = row.get(field);
                match groups.iter_mut().find(|(g, _)| *g == *v) {
                    Some((_, rows)) => rows.push(i),
                    None => groups.push((v.clone(), alloc::vec![i])),
                }
            }
            groups.into_iter().map(|(_, rows)| rows).collect()
        }
        None => alloc::vec![(0..ctx.data.rows().len()).collect()],
    };

    for rows in series {
        let mut flat: Vec<Point> = Vec::new();
        let mut grounded: Vec<Point> = Vec::new();
        for &i in &rows {
            let row = &ctx.data.rows()[i];
            let Some(px) = point_position(&x_scale, row.get(&ctx.x.field)) else {
                continue;
            };
            let Some(py) = point_position(&y_scale, row.get(&ctx.y.field)) else {
                continue;
            };
            flat.push(Point::new(px, py));
            grounded.push(Point::new(px, ctx.plot_h));
        }
        if flat.is_empty() {
            continue;
        }

        // Style comes from the first row of the series.
        let first = &ctx.data.rows()[rows[0]];
        let mut style = Attrs::new();
        if let Some(c) = resolved.value("stroke", first).as_color() {
            style = style.with_stroke(c);
        }
        if let Some(t) = resolved.value("thickness", first).as_f64() {
            style = style.with_stroke_width(t);
        }
        if let Some(d) = resolved.value("dash", first).as_text() {
            style = style.with_dash(d);
        }
        if let Some(o) = resolved.value("opacity", first).as_f64() {
            style = style.with_opacity(o);
        }

        let node = ctx.surface.append(container, ShapeKind::Path);
        if ctx.animation.is_some() {
            ctx.surface.set(node, &style.clone().with_points(grounded));
        } else {
            ctx.surface.set(node, &style);
        }
        ctx.settle(node, &Attrs::new().with_points(flat));
    }
    Ok(())
}

fn draw_columns(
    ctx: &mut DrawContext<'_>,
    resolved: &ResolvedChannels,
    stacked: bool,
) -> Result<(), ChartError> {
    let outer = category_band(ctx.x, ctx.data, ctx.plot_w);
    let y_scale = plot_scale(ctx.y, ctx.plot_w, ctx.plot_h);
    let grouping = Grouping::compute(ctx.data, resolved, &ctx.x.field);
    let container = ctx.surface.append(ctx.plot_node, ShapeKind::Group);

    let stacking = if stacked {
        Some(grouping.stack(ctx.data, &ctx.y.field)?)
    } else {
        None
    };
    let inner = grouping.inner_scale(outer.band_width());

    for (i, row) in ctx.data.rows().iter().enumerate() {
        let Some(band_x) = outer.position(row.get(&ctx.x.field)) else {
            continue;
        };
        let Some(value) = row.get(&ctx.y.field).as_f64() else {
            continue;
        };
        let (x, width) = match &stacking {
            // Stacked segments overlay the full category band.
            Some(_) => (band_x, outer.band_width()),
            None => {
                let Some(slot) = grouping.slot(i) else {
                    continue;
                };
                (band_x + inner.x(slot), inner.band_width())
            }
        };
        let top = match &stacking {
            Some(s) => s.tops[i],
            None => value,
        };
        let y = y_scale.map_value(&Value::Num(top)).unwrap_or(0.0);
        let height = ctx.plot_h - y_scale.map_value(&Value::Num(value)).unwrap_or(0.0);

        let node = ctx.surface.append(container, ShapeKind::Rect);
        let base = paint_attrs(resolved, row).with_x(x);
        if ctx.animation.is_some() {
            ctx.surface
                .set(node, &base.clone().with_y(ctx.plot_h).with_size(width, 0.0));
        } else {
            ctx.surface.set(node, &base);
        }
        ctx.settle(node, &Attrs::new().with_y(y).with_size(width, height));
    }
    Ok(())
}

fn draw_bars(ctx: &mut DrawContext<'_>, resolved: &ResolvedChannels) -> Result<(), ChartError> {
    let outer = category_band(ctx.y, ctx.data, ctx.plot_h);
    let x_scale = plot_scale(ctx.x, ctx.plot_w, ctx.plot_h);
    let grouping = Grouping::compute(ctx.data, resolved, &ctx.y.field);
    let container = ctx.surface.append(ctx.plot_node, ShapeKind::Group);
    let inner = grouping.inner_scale(outer.band_width());

    for (i, row) in ctx.data.rows().iter().enumerate() {
        let Some(band_y) = outer.position(row.get(&ctx.y.field)) else {
            continue;
        };
        let Some(slot) = grouping.slot(i) else {
            continue;
        };
        let Some(value) = row.get(&ctx.x.field).as_f64() else {
            continue;
        };
        let width = x_scale.map_value(&Value::Num(value)).unwrap_or(0.0);
        let y = band_y + inner.x(slot);

        let node = ctx.surface.append(container, ShapeKind::Rect);
        let base = paint_attrs(resolved, row)
            .with_y(y)
            .with_x(0.0);
        if ctx.animation.is_some() {
            ctx.surface
                .set(node, &base.clone().with_size(0.0, inner.band_width()));
        } else {
            ctx.surface.set(node, &base);
        }
        ctx.settle(
            node,
            &Attrs::new().with_size(width, inner.band_width()),
        );
    }
    Ok(())
}

fn draw_text(ctx: &mut DrawContext<'_>, resolved: &ResolvedChannels) -> Result<(), ChartError> {
    let x_scale = plot_scale(ctx.x, ctx.plot_w, ctx.plot_h);
    let y_scale = plot_scale(ctx.y, ctx.plot_w, ctx.plot_h);
    let container = ctx.surface.append(ctx.plot_node, ShapeKind::Group);

    for row in ctx.data.rows() {
        let Some(px) = point_position(&x_scale, row.get(&ctx.x.field)) else {
            continue;
        };
        let Some(py) = point_position(&y_scale, row.get(&ctx.y.field)) else {
            continue;
        };
        let Some(label) = resolved.value("label", row).as_text().map(alloc::string::String::from)
        else {
            continue;
        };
        let size = resolved.value("size", row).as_f64().unwrap_or(20.0);
        let node = ctx.surface.append(container, ShapeKind::Text);
        let base = paint_attrs(resolved, row)
            .with_text(label)
            .with_font_size(size)
            .with_anchor(TextAnchor::Middle)
            .with_baseline(TextBaseline::Middle);
        if ctx.animation.is_some() {
            ctx.surface.set(node, &base.clone().with_pos(px, ctx.plot_h));
        } else {
            ctx.surface.set(node, &base);
        }
        ctx.settle(node, &Attrs::new().with_pos(px, py));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn axis_demands_follow_the_mark_kind() {
        let column = Mark::Column(ColumnMark::default());
        assert!(column.zero_y() && column.band_x());
        assert!(!column.zero_x() && !column.band_y());

        let bar = Mark::Bar(BarMark::default());
        assert!(bar.zero_x() && bar.band_y());

        let stacked = Mark::StackedColumn(StackedColumnMark::default());
        assert!(stacked.is_stacked() && stacked.zero_y());

        assert!(!Mark::Point(PointMark::default()).band_x());
    }

    #[test]
    fn stacked_columns_share_the_column_channel_set() {
        let theme = Theme::default();
        let stacked = Mark::StackedColumn(StackedColumnMark::default());
        let names: Vec<&str> = stacked
            .channel_table(&theme)
            .iter()
            .map(|(n, _)| *n)
            .collect();
        assert_eq!(names, ["fill", "opacity", "stroke"]);
    }
}
