// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The narrow rendering-surface interface.
//!
//! Chart code treats the underlying 2D renderer as a capability with five
//! operations: append a typed primitive, set attributes, query realized
//! bounds, run a timed transition, and remove a primitive. Everything a
//! renderer needs to know travels through [`Attrs`], a partial attribute
//! set; unset fields keep their current value.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use peniko::Color;

use crate::join::CompletionTicket;

/// Identifier for a primitive node on a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// The primitive vocabulary a surface must support.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    /// A container; its `x`/`y` attributes translate all children.
    Group,
    /// An axis-aligned rectangle (`x`, `y`, `width`, `height`).
    Rect,
    /// A line segment (`x`, `y`, `x2`, `y2`).
    Line,
    /// A polyline (`points`).
    Path,
    /// A circle (`x`, `y` center, `radius`).
    Circle,
    /// A single line of text (`x`, `y`, `text`, `font_size`, `anchor`,
    /// `baseline`, `angle`).
    Text,
}

/// Horizontal text anchoring relative to the text position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    /// The position is the start of the text.
    Start,
    /// The position is the middle of the text.
    Middle,
    /// The position is the end of the text.
    End,
}

/// Vertical text baseline relative to the text position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    /// Normal latin baseline (most of the glyph sits above the position).
    Alphabetic,
    /// The position is the vertical middle of the glyphs.
    Middle,
    /// The glyphs hang below the position.
    Hanging,
}

/// A partial attribute set for [`Surface::set`] and [`Surface::transition`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attrs {
    /// X position (rect/text origin, circle center, group translation).
    pub x: Option<f64>,
    /// Y position.
    pub y: Option<f64>,
    /// Rect width.
    pub width: Option<f64>,
    /// Rect height.
    pub height: Option<f64>,
    /// Line end x.
    pub x2: Option<f64>,
    /// Line end y.
    pub y2: Option<f64>,
    /// Circle radius.
    pub radius: Option<f64>,
    /// Polyline vertices.
    pub points: Option<Vec<Point>>,
    /// Text content.
    pub text: Option<String>,
    /// Font size.
    pub font_size: Option<f64>,
    /// Fill color.
    pub fill: Option<Color>,
    /// Stroke color.
    pub stroke: Option<Color>,
    /// Stroke width.
    pub stroke_width: Option<f64>,
    /// Opacity in `0..=1`.
    pub opacity: Option<f64>,
    /// Dash pattern (SVG `stroke-dasharray` syntax; empty = solid).
    pub dash: Option<String>,
    /// Text anchor.
    pub anchor: Option<TextAnchor>,
    /// Text baseline.
    pub baseline: Option<TextBaseline>,
    /// Rotation in degrees about the node position.
    pub angle: Option<f64>,
}

impl Attrs {
    /// Creates an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the x position.
    pub fn with_x(mut self, x: f64) -> Self {
        self.x = Some(x);
        self
    }

    /// Sets the y position.
    pub fn with_y(mut self, y: f64) -> Self {
        self.y = Some(y);
        self
    }

    /// Sets the position.
    pub fn with_pos(self, x: f64, y: f64) -> Self {
        self.with_x(x).with_y(y)
    }

    /// Sets the rect size.
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Sets the rect height.
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Sets both line endpoints.
    pub fn with_line(mut self, x: f64, y: f64, x2: f64, y2: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self.x2 = Some(x2);
        self.y2 = Some(y2);
        self
    }

    /// Sets the circle radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Sets polyline vertices.
    pub fn with_points(mut self, points: Vec<Point>) -> Self {
        self.points = Some(points);
        self
    }

    /// Sets the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the font size.
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = Some(font_size);
        self
    }

    /// Sets the fill color.
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Sets the stroke color.
    pub fn with_stroke(mut self, stroke: Color) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Sets the stroke width.
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = Some(stroke_width);
        self
    }

    /// Sets the opacity.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Sets the dash pattern.
    pub fn with_dash(mut self, dash: impl Into<String>) -> Self {
        self.dash = Some(dash.into());
        self
    }

    /// Sets the text anchor.
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Sets the text baseline.
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Sets the rotation angle in degrees.
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = Some(angle);
        self
    }

    /// Merges `other` over `self` (set fields win).
    pub fn merge(&mut self, other: &Self) {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() {
                    self.$field = other.$field.clone();
                })*
            };
        }
        take!(
            x, y, width, height, x2, y2, radius, points, text, font_size, fill, stroke,
            stroke_width, opacity, dash, anchor, baseline, angle
        );
    }
}

/// Easing curves for timed transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// Constant-rate interpolation.
    Linear,
    /// Accelerating start.
    CubicIn,
    /// Decelerating end.
    CubicOut,
    /// Ease in and out.
    #[default]
    CubicInOut,
}

/// Timing parameters for a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    /// Transition duration in milliseconds.
    pub duration_ms: f64,
    /// Delay before the transition starts, in milliseconds.
    pub delay_ms: f64,
    /// Easing curve.
    pub easing: Easing,
}

/// A retained 2D rendering surface.
///
/// Implementations may schedule transitions however they like (the chart
/// core never blocks on them), but must complete the provided ticket when a
/// transition settles.
pub trait Surface {
    /// The surface's own bounding rectangle (the total drawable area).
    fn viewport(&self) -> Rect;

    /// Appends a drawing root, or `None` if the surface cannot host one.
    fn attach_root(&mut self) -> Option<NodeId>;

    /// Appends a primitive under `parent` and returns its id.
    fn append(&mut self, parent: NodeId, shape: ShapeKind) -> NodeId;

    /// Applies a partial attribute update.
    fn set(&mut self, node: NodeId, attrs: &Attrs);

    /// The realized bounding box of a node (groups: union of children,
    /// offset by the group translation).
    fn bounds(&self, node: NodeId) -> Rect;

    /// Transitions a node toward `to`, completing `ticket` when settled.
    fn transition(&mut self, node: NodeId, to: &Attrs, timing: Timing, ticket: CompletionTicket);

    /// Removes a node and its children.
    fn remove(&mut self, node: NodeId);
}

/// Errors from resolving a draw target selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetError {
    /// The selector matched no surface.
    NotFound(String),
    /// The selector matched more than one surface.
    Ambiguous {
        /// The offending selector.
        selector: String,
        /// How many surfaces matched.
        matches: usize,
    },
}

impl core::fmt::Display for TargetError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound(selector) => {
                write!(f, "draw target \"{selector}\" did not match any surface")
            }
            Self::Ambiguous { selector, matches } => write!(
                f,
                "draw target \"{selector}\" matched {matches} surfaces; exactly one is required"
            ),
        }
    }
}

impl core::error::Error for TargetError {}

/// Resolves selectors to rendering surfaces.
///
/// A chart's `draw` call requires the selector to resolve to exactly one
/// surface; hosts with multiple surfaces report [`TargetError::Ambiguous`].
pub trait SurfaceTarget {
    /// Resolves `selector` to exactly one surface.
    fn resolve(&mut self, selector: &str) -> Result<&mut dyn Surface, TargetError>;
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;

    use super::*;

    #[test]
    fn merge_keeps_unset_fields() {
        let mut a = Attrs::new().with_pos(1.0, 2.0).with_opacity(0.5);
        let b = Attrs::new().with_x(9.0).with_text("hi");
        a.merge(&b);
        assert_eq!(a.x, Some(9.0));
        assert_eq!(a.y, Some(2.0));
        assert_eq!(a.opacity, Some(0.5));
        assert_eq!(a.text.as_deref(), Some("hi"));
    }

    #[test]
    fn target_errors_name_the_selector() {
        let err = TargetError::Ambiguous {
            selector: ".chart".to_string(),
            matches: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains(".chart"), "message was {msg:?}");
        assert!(msg.contains('3'), "message was {msg:?}");
    }
}
