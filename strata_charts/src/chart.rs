// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart composition root.
//!
//! A [`Chart`] owns the dataset, axis mappings and options, titles, theme,
//! animation settings and the mark list. `draw` runs the full pipeline in a
//! fixed order: validate → resolve axes (stacked marks widen the vertical
//! domain here, while definitions are still mutable) → build the per-draw
//! extras → run the extras layout → draw each mark with its resolved
//! accessors → return one aggregate completion handle.
//!
//! Everything built during a draw (axis definitions, extras, the plot
//! frame) lives in that call's stack frame and is rebuilt from scratch on
//! the next draw; a failed draw leaves no half-built state behind to leak
//! into a retry.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use strata_core::{Dataset, DrawHandle, DrawJoin, Easing, Surface as _, SurfaceTarget};

use crate::axis::{AxisDefinition, AxisId, AxisOptions, MarkDemands, ResolvedAxis, resolve_axis};
use crate::error::ChartError;
use crate::extra::{Extra, FacetLabelsExtra, Side, TitleExtra};
use crate::grouping::Grouping;
use crate::layout::{Centering, ExtraSet, layout};
use crate::mapping::Mapping;
use crate::mark::{
    BarMark, ColumnMark, DrawContext, LineMark, Mark, PointMark, StackedColumnMark, TextMark,
};
use crate::resolve::{ChannelArgs, resolve_channels};
use crate::theme::Theme;

const TITLE_FONT_SIZE: f64 = 14.0;
const SUBTITLE_FONT_SIZE: f64 = 12.0;
const AXIS_TITLE_FONT_SIZE: f64 = 11.0;
const FACET_LABEL_FONT_SIZE: f64 = 10.0;

/// Chart-level layout options.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartOptions {
    /// Vertical padding around the chart title.
    pub title_padding: f64,
    /// Padding around axis titles.
    pub axis_title_padding: f64,
    /// Gap between tick marks and tick labels.
    pub axis_padding: f64,
    /// Centering strategy between the top and bottom extras stacks.
    pub centre_vertical: Centering,
    /// Centering strategy between the left and right extras stacks.
    pub centre_horizontal: Centering,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title_padding: 8.0,
            axis_title_padding: 8.0,
            axis_padding: 4.0,
            centre_vertical: Centering::None,
            centre_horizontal: Centering::None,
        }
    }
}

/// Entry-animation settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationOptions {
    /// Transition duration in milliseconds.
    pub duration_ms: f64,
    /// Per-mark stagger: mark `i` starts after `i × delay_ms`.
    pub delay_ms: f64,
    /// Easing curve.
    pub easing: Easing,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            duration_ms: 800.0,
            delay_ms: 0.0,
            easing: Easing::CubicInOut,
        }
    }
}

/// A declarative chart over one dataset.
#[derive(Debug, Default)]
pub struct Chart {
    data: Dataset,
    x: Vec<Mapping>,
    y: Vec<Mapping>,
    x_options: AxisOptions,
    y_options: AxisOptions,
    title: Option<String>,
    subtitle: Option<String>,
    options: ChartOptions,
    theme: Theme,
    animation: Option<AnimationOptions>,
    marks: Vec<Mark>,
}

impl Chart {
    /// Creates a chart over a dataset with default options and theme.
    pub fn new(data: Dataset) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Replaces the chart options.
    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Maps a field to the horizontal axis. Subsequent calls register
    /// facet-label placeholders instead of re-scaling.
    pub fn map_x(mut self, mapping: impl Into<Mapping>) -> Self {
        self.x.push(mapping.into());
        self
    }

    /// Maps a field to the vertical axis.
    pub fn map_y(mut self, mapping: impl Into<Mapping>) -> Self {
        self.y.push(mapping.into());
        self
    }

    /// Replaces the horizontal axis options.
    pub fn x_axis(mut self, options: AxisOptions) -> Self {
        self.x_options = options;
        self
    }

    /// Replaces the vertical axis options.
    pub fn y_axis(mut self, options: AxisOptions) -> Self {
        self.y_options = options;
        self
    }

    /// Sets the chart title.
    pub fn title(mut self, text: impl Into<String>) -> Self {
        self.title = Some(text.into());
        self
    }

    /// Sets the chart subtitle.
    pub fn subtitle(mut self, text: impl Into<String>) -> Self {
        self.subtitle = Some(text.into());
        self
    }

    /// Enables entry animation for every mark.
    pub fn animate(mut self, animation: AnimationOptions) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Disables entry animation.
    pub fn without_animation(mut self) -> Self {
        self.animation = None;
        self
    }

    /// Adds a point mark.
    pub fn points(mut self, channels: ChannelArgs) -> Self {
        self.marks.push(Mark::Point(PointMark { channels }));
        self
    }

    /// Adds a line mark.
    pub fn lines(mut self, channels: ChannelArgs) -> Self {
        self.marks.push(Mark::Line(LineMark { channels }));
        self
    }

    /// Adds a column mark.
    pub fn columns(mut self, channels: ChannelArgs) -> Self {
        self.marks.push(Mark::Column(ColumnMark { channels }));
        self
    }

    /// Adds a stacked-column mark.
    pub fn stacked_columns(mut self, channels: ChannelArgs) -> Self {
        self.marks.push(Mark::StackedColumn(StackedColumnMark { channels }));
        self
    }

    /// Adds a horizontal bar mark.
    pub fn bars(mut self, channels: ChannelArgs) -> Self {
        self.marks.push(Mark::Bar(BarMark { channels }));
        self
    }

    /// Adds a text mark.
    pub fn text(mut self, channels: ChannelArgs) -> Self {
        self.marks.push(Mark::Text(TextMark { channels }));
        self
    }

    /// The registered marks.
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Removes one mark by index.
    pub fn remove_mark(&mut self, index: usize) -> Option<Mark> {
        if index < self.marks.len() {
            Some(self.marks.remove(index))
        } else {
            None
        }
    }

    /// Removes every mark (required before drawing again).
    pub fn clear_marks(&mut self) {
        self.marks.clear();
    }

    /// The dataset this chart draws.
    pub fn data(&self) -> &Dataset {
        &self.data
    }

    /// Resolves the target, lays out extras, draws every mark and returns
    /// the aggregate completion handle.
    ///
    /// Fails if either axis is unmapped, no marks are registered, the
    /// selector does not resolve to exactly one surface, or the surface
    /// refuses a drawing root. A second draw without removing marks first
    /// is unsupported.
    pub fn draw(
        &self,
        target: &mut dyn SurfaceTarget,
        selector: &str,
    ) -> Result<DrawHandle, ChartError> {
        if self.x.is_empty() {
            return Err(ChartError::MissingAxisMapping { axis: AxisId::X });
        }
        if self.y.is_empty() {
            return Err(ChartError::MissingAxisMapping { axis: AxisId::Y });
        }
        if self.marks.is_empty() {
            return Err(ChartError::NoMarks);
        }

        let surface = target.resolve(selector)?;
        let root = surface.attach_root().ok_or(ChartError::RootRejected)?;
        let viewport = surface.viewport();
        let (total_w, total_h) = (viewport.width(), viewport.height());

        let demands = MarkDemands {
            zero_x: self.marks.iter().any(Mark::zero_x),
            zero_y: self.marks.iter().any(Mark::zero_y),
            band_x: self.marks.iter().any(Mark::band_x),
            band_y: self.marks.iter().any(Mark::band_y),
        };
        let x_axis = resolve_axis(
            AxisId::X,
            &self.x,
            &self.x_options,
            &self.data,
            &demands,
            (0.0, total_w),
        )?;
        let mut y_axis = resolve_axis(
            AxisId::Y,
            &self.y,
            &self.y_options,
            &self.data,
            &demands,
            (total_h, 0.0),
        )?;

        // Stacked marks widen the vertical domain to the largest cumulative
        // value while the definition is still mutable.
        for mark in self.marks.iter().filter(|m| m.is_stacked()) {
            let table = mark.channel_table(&self.theme);
            let resolved = resolve_channels(mark.name(), &table, mark.channels(), &self.data)?;
            let grouping = Grouping::compute(&self.data, &resolved, &x_axis.definition.field);
            let stacking = grouping.stack(&self.data, &y_axis.definition.field)?;
            y_axis.definition.scale.widen_upper(stacking.max_top);
        }

        let mut extras = self.build_extras(&x_axis, &y_axis);
        let x_def = x_axis.definition;
        let y_def = y_axis.definition;

        let (frame, plot_node) = layout(
            &mut extras,
            &mut *surface,
            root,
            total_w,
            total_h,
            self.options.centre_horizontal,
            self.options.centre_vertical,
        );

        let join = DrawJoin::new();
        for (i, mark) in self.marks.iter().enumerate() {
            let ticket = join.ticket();
            let mut ctx = DrawContext {
                surface: &mut *surface,
                plot_node,
                plot_w: frame.width,
                plot_h: frame.height,
                x: &x_def,
                y: &y_def,
                data: &self.data,
                theme: &self.theme,
                animation: self.animation.as_ref(),
                join: &join,
                mark_index: i,
            };
            mark.draw(&mut ctx)?;
            ticket.complete();
        }

        Ok(join.handle())
    }

    /// Builds the per-draw extras lists.
    ///
    /// Stacking slots accumulate from the canvas edge on Top/Left and from
    /// the plot edge on Bottom/Right, so Top/Left lists are built
    /// outermost-first (titles, then the axis) and Bottom/Right lists
    /// innermost-first (the axis, then titles). Facet-label bands sit
    /// between the titles and the plot on the cross side.
    fn build_extras(&self, x_axis: &ResolvedAxis, y_axis: &ResolvedAxis) -> ExtraSet {
        let mut extras = ExtraSet::new();
        let title_pad = self.options.title_padding;
        let axis_pad = self.options.axis_title_padding;

        if let Some(text) = &self.title {
            extras.push(Extra::Title(TitleExtra::new(
                Side::Top,
                text.clone(),
                title_pad,
                TITLE_FONT_SIZE,
            )));
        }
        if let Some(text) = &self.subtitle {
            extras.push(Extra::Title(TitleExtra::new(
                Side::Top,
                text.clone(),
                title_pad,
                SUBTITLE_FONT_SIZE,
            )));
        }

        self.push_axis_extras(&mut extras, &x_axis.definition, axis_pad);

        // Surplus x mappings label the top band, innermost so the labels
        // sit directly above the plot columns they name.
        for labels in &x_axis.facet_labels {
            extras.push(Extra::FacetLabels(FacetLabelsExtra::new(
                Side::Top,
                labels.clone(),
                FACET_LABEL_FONT_SIZE,
            )));
        }

        self.push_axis_extras(&mut extras, &y_axis.definition, axis_pad);
        for labels in &y_axis.facet_labels {
            extras.push(Extra::FacetLabels(FacetLabelsExtra::new(
                Side::Right,
                labels.clone(),
                FACET_LABEL_FONT_SIZE,
            )));
        }

        extras
    }

    fn push_axis_extras(&self, extras: &mut ExtraSet, def: &AxisDefinition, axis_pad: f64) {
        let titles = |extras: &mut ExtraSet| {
            if let Some(text) = &def.title {
                extras.push(Extra::Title(TitleExtra::new(
                    def.side,
                    text.clone(),
                    axis_pad,
                    AXIS_TITLE_FONT_SIZE,
                )));
            }
            if let Some(text) = &def.subtitle {
                extras.push(Extra::Title(TitleExtra::new(
                    def.side,
                    text.clone(),
                    axis_pad,
                    AXIS_TITLE_FONT_SIZE,
                )));
            }
        };
        match def.side {
            // Canvas-origin sides: titles first (outermost), axis last.
            Side::Top | Side::Left => {
                titles(extras);
                extras.push(Extra::Axis(def.extra(self.options.axis_padding)));
            }
            // Plot-origin sides: axis first (innermost), titles after.
            Side::Bottom | Side::Right => {
                extras.push(Extra::Axis(def.extra(self.options.axis_padding)));
                titles(extras);
            }
        }
    }
}
