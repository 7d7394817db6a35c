// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The extras layout engine.
//!
//! Layout runs two sequential passes per draw over the four per-side extras
//! lists, with no state surviving across draws:
//!
//! 1. **Measure**: every extra is rendered unpositioned and its footprint
//!    read back from the surface. Each side accumulates a prefix-sum slot
//!    list (one entry per extra) and a total consumed thickness; the inner
//!    plot shrinks by every primary size and by axis label overflows that
//!    land on sides with no extras of their own.
//! 2. **Place**: every extra receives a four-direction offset — its own
//!    prefix slot on the side it occupies, the perpendicular totals
//!    elsewhere — plus the final plot size, and repositions itself.
//!
//! Between the passes an optional centering adjustment runs per axis:
//! *full* shrinks the plot so the two opposite stacks consume equal
//! thickness, *partial* shifts only descriptive (non-axis) extras so text
//! appears centered while axis spans stay maximal.
//!
//! Offsets accumulate from the canvas edge on Top/Left and from the plot
//! edge on Bottom/Right, so the first extra in a Top/Left list is the
//! outermost and the first in a Bottom/Right list the innermost.

extern crate alloc;

use alloc::vec::Vec;

use peniko::color::palette::css;
use smallvec::SmallVec;
use strata_core::{Attrs, NodeId, ShapeKind, Surface};

use crate::extra::{EdgeOffsets, Extra, Side, SidePresence};

const SIDES: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

/// Centering strategy for one plot axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Centering {
    /// No adjustment.
    #[default]
    None,
    /// Center descriptive text only; axis spans stay maximal.
    Partial,
    /// Shrink the plot until opposite sides consume equal thickness.
    Full,
}

/// The per-side extras lists for one draw.
#[derive(Debug, Default)]
pub struct ExtraSet {
    sides: [SmallVec<[Extra; 4]>; 4],
}

impl ExtraSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an extra to its side's list (stacking order = push order).
    pub fn push(&mut self, extra: Extra) {
        self.sides[extra.side().idx()].push(extra);
    }

    /// The extras on one side, in stacking order.
    pub fn side(&self, side: Side) -> &[Extra] {
        &self.sides[side.idx()]
    }

    fn side_mut(&mut self, side: Side) -> &mut [Extra] {
        &mut self.sides[side.idx()]
    }

    /// Which sides currently hold extras.
    pub fn presence(&self) -> SidePresence {
        SidePresence {
            top: !self.sides[Side::Top.idx()].is_empty(),
            right: !self.sides[Side::Right.idx()].is_empty(),
            bottom: !self.sides[Side::Bottom.idx()].is_empty(),
            left: !self.sides[Side::Left.idx()].is_empty(),
        }
    }
}

/// The final plot rectangle plus per-side consumed thickness.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotFrame {
    /// Plot left edge.
    pub x: f64,
    /// Plot top edge.
    pub y: f64,
    /// Inner plot width.
    pub width: f64,
    /// Inner plot height.
    pub height: f64,
    consumed: [f64; 4],
}

impl PlotFrame {
    /// Total thickness consumed on one side (extras, overflow and
    /// centering slack).
    pub fn consumed(&self, side: Side) -> f64 {
        self.consumed[side.idx()]
    }
}

/// Measures, centers and places all extras, returning the plot frame and
/// the mark-drawing container node.
pub fn layout(
    extras: &mut ExtraSet,
    surface: &mut dyn Surface,
    parent: NodeId,
    total_width: f64,
    total_height: f64,
    centre_horizontal: Centering,
    centre_vertical: Centering,
) -> (PlotFrame, NodeId) {
    let presence = extras.presence();
    let mut consumed = [0.0_f64; 4];
    let mut prefixes: [Vec<f64>; 4] = Default::default();
    let mut sizes: [Vec<f64>; 4] = Default::default();
    let mut is_axis: [Vec<bool>; 4] = Default::default();
    let mut inner_w = total_width;
    let mut inner_h = total_height;

    // Measure.
    for side in SIDES {
        let i = side.idx();
        let mut running = 0.0;
        for extra in extras.side_mut(side) {
            extra.draw(surface, parent);
            let fp = extra.footprint(&*surface, presence);
            prefixes[i].push(running);
            sizes[i].push(fp.size);
            is_axis[i].push(extra.is_axis());
            running += fp.size;
            if fp.left_overflow > 0.0 {
                consumed[Side::Left.idx()] += fp.left_overflow;
                inner_w -= fp.left_overflow;
            }
            if fp.top_overflow > 0.0 {
                consumed[Side::Top.idx()] += fp.top_overflow;
                inner_h -= fp.top_overflow;
            }
        }
        consumed[i] += running;
        if side.is_horizontal() {
            inner_h -= running;
        } else {
            inner_w -= running;
        }
        // A side with no extras still offers one zero-width stacking slot.
        if prefixes[i].is_empty() {
            prefixes[i].push(0.0);
        }
    }

    // Centering, independently per axis.
    centre(
        centre_horizontal,
        Side::Left,
        Side::Right,
        &mut consumed,
        &mut prefixes,
        &sizes,
        &is_axis,
        &mut inner_w,
    );
    centre(
        centre_vertical,
        Side::Top,
        Side::Bottom,
        &mut consumed,
        &mut prefixes,
        &sizes,
        &is_axis,
        &mut inner_h,
    );

    // Place.
    for side in SIDES {
        let i = side.idx();
        let mut slots = prefixes[i].iter().copied();
        for extra in extras.side_mut(side) {
            let own = slots.next().unwrap_or(0.0);
            let offset = EdgeOffsets {
                top: pick(side, Side::Top, own, &consumed),
                right: pick(side, Side::Right, own, &consumed),
                bottom: pick(side, Side::Bottom, own, &consumed),
                left: pick(side, Side::Left, own, &consumed),
            };
            extra.place(surface, offset, inner_w, inner_h);
        }
    }

    // Finalize: plot background and the mark-drawing container.
    let x = consumed[Side::Left.idx()];
    let y = consumed[Side::Top.idx()];
    let background = surface.append(parent, ShapeKind::Rect);
    surface.set(
        background,
        &Attrs::new()
            .with_pos(x, y)
            .with_size(inner_w, inner_h)
            .with_fill(css::WHITE),
    );
    let container = surface.append(parent, ShapeKind::Group);
    surface.set(container, &Attrs::new().with_pos(x, y));

    (
        PlotFrame {
            x,
            y,
            width: inner_w,
            height: inner_h,
            consumed,
        },
        container,
    )
}

fn pick(own_side: Side, side: Side, own: f64, consumed: &[f64; 4]) -> f64 {
    if own_side == side {
        own
    } else {
        consumed[side.idx()]
    }
}

/// Applies one axis's centering between a canvas-origin side (`a`: Top or
/// Left) and the opposite plot-origin side (`b`: Bottom or Right).
fn centre(
    mode: Centering,
    a: Side,
    b: Side,
    consumed: &mut [f64; 4],
    prefixes: &mut [Vec<f64>; 4],
    sizes: &[Vec<f64>; 4],
    is_axis: &[Vec<bool>; 4],
    inner: &mut f64,
) {
    match mode {
        Centering::None => {}
        Centering::Full => {
            let d = consumed[a.idx()] - consumed[b.idx()];
            if d > 0.0 {
                // `b` consumes less: shrink the plot and keep the `b` stack
                // pinned to the canvas edge by widening its slots.
                *inner -= d;
                consumed[b.idx()] += d;
                for slot in &mut prefixes[b.idx()] {
                    *slot += d;
                }
            } else if d < 0.0 {
                // `a` consumes less: the slack lands between the `a` stack
                // and the plot; `a` slots measure from the canvas edge and
                // stay put.
                *inner += d;
                consumed[a.idx()] -= d;
            }
        }
        Centering::Partial => {
            let text_total = |side: Side| -> f64 {
                sizes[side.idx()]
                    .iter()
                    .zip(&is_axis[side.idx()])
                    .filter(|(_, axis)| !**axis)
                    .map(|(s, _)| *s)
                    .sum()
            };
            let d = text_total(a) - text_total(b);
            if d > 0.0 {
                for slot in &mut prefixes[b.idx()] {
                    *slot += d;
                }
            } else if d < 0.0 {
                for slot in &mut prefixes[a.idx()] {
                    *slot -= d;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use strata_core::Scene;

    use super::*;
    use crate::extra::{AxisExtra, TitleExtra};
    use crate::scale::{AxisScale, ScaleLinear};

    fn title(side: Side) -> Extra {
        Extra::Title(TitleExtra::new(side, "Title", 8.0, 12.0))
    }

    fn axis(side: Side) -> Extra {
        let range = if side.is_horizontal() {
            (0.0, 400.0)
        } else {
            (300.0, 0.0)
        };
        Extra::Axis(AxisExtra::new(
            side,
            AxisScale::Linear(ScaleLinear::new((0.0, 10.0), range)),
            5,
            None,
            false,
            4.0,
        ))
    }

    fn run(
        extras: &mut ExtraSet,
        centre_h: Centering,
        centre_v: Centering,
    ) -> (PlotFrame, Scene) {
        let mut scene = Scene::new();
        let root = scene.attach_root().expect("scene hosts a root");
        let (frame, _container) = layout(extras, &mut scene, root, 400.0, 300.0, centre_h, centre_v);
        (frame, scene)
    }

    fn assert_conservation(frame: &PlotFrame) {
        let w = frame.width + frame.consumed(Side::Left) + frame.consumed(Side::Right);
        let h = frame.height + frame.consumed(Side::Top) + frame.consumed(Side::Bottom);
        assert!((w - 400.0).abs() < 1e-9, "width identity broke: {frame:?}");
        assert!((h - 300.0).abs() < 1e-9, "height identity broke: {frame:?}");
    }

    #[test]
    fn conservation_holds_for_every_centering_combination() {
        let modes = [Centering::None, Centering::Partial, Centering::Full];
        for centre_h in modes {
            for centre_v in modes {
                let mut extras = ExtraSet::new();
                extras.push(title(Side::Top));
                extras.push(axis(Side::Bottom));
                extras.push(axis(Side::Left));
                extras.push(title(Side::Bottom));
                let (frame, _) = run(&mut extras, centre_h, centre_v);
                assert_conservation(&frame);
            }
        }
    }

    #[test]
    fn full_centering_equalizes_opposite_sides() {
        let mut extras = ExtraSet::new();
        extras.push(axis(Side::Left));
        extras.push(title(Side::Left));
        let (frame, _) = run(&mut extras, Centering::Full, Centering::None);
        assert!(
            (frame.consumed(Side::Left) - frame.consumed(Side::Right)).abs() < 1e-9,
            "sides stayed unequal: {frame:?}"
        );
        assert_conservation(&frame);
    }

    #[test]
    fn empty_sides_consume_nothing_without_centering() {
        let mut extras = ExtraSet::new();
        extras.push(title(Side::Top));
        let (frame, _) = run(&mut extras, Centering::None, Centering::None);
        assert_eq!(frame.consumed(Side::Left), 0.0);
        assert_eq!(frame.consumed(Side::Right), 0.0);
        assert_eq!(frame.consumed(Side::Bottom), 0.0);
        assert!(frame.consumed(Side::Top) > 0.0);
        assert_conservation(&frame);
    }

    #[test]
    fn partial_centering_shifts_text_but_not_the_plot() {
        let mut extras = ExtraSet::new();
        extras.push(axis(Side::Left));
        extras.push(title(Side::Left));
        let mut plain = ExtraSet::new();
        plain.push(axis(Side::Left));
        plain.push(title(Side::Left));

        let (centred, _) = run(&mut extras, Centering::Partial, Centering::None);
        let (uncentred, _) = run(&mut plain, Centering::None, Centering::None);

        // The plot rectangle is identical; only right-side slots moved.
        assert_eq!(centred.width, uncentred.width);
        assert_eq!(centred.x, uncentred.x);
        assert_conservation(&centred);
    }

    #[test]
    fn axis_overflow_is_charged_to_the_empty_left_side() {
        let mut extras = ExtraSet::new();
        extras.push(axis(Side::Bottom));
        let (frame, _) = run(&mut extras, Centering::None, Centering::None);
        // The bottom axis's first tick label overhangs the plot's left edge;
        // with no left extras, the overflow is consumed on the left.
        assert!(frame.consumed(Side::Left) > 0.0, "frame was {frame:?}");
        assert_conservation(&frame);
    }

    #[test]
    fn stacked_extras_each_consume_their_own_slot() {
        let mut extras = ExtraSet::new();
        extras.push(title(Side::Bottom));
        extras.push(title(Side::Bottom));
        let (frame, _) = run(&mut extras, Centering::None, Centering::None);
        // Each title consumes its line height plus padding; the band holds
        // both without overlap.
        let both = 2.0 * (12.0 + 2.0 * 8.0);
        assert!(
            (frame.consumed(Side::Bottom) - both).abs() < 1e-9,
            "frame was {frame:?}"
        );
        assert_conservation(&frame);
    }
}
