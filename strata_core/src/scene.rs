// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A retained reference surface for tests and demos.
//!
//! [`Scene`] keeps an ordered node tree and implements [`Surface`] with:
//! - heuristic text metrics (~0.6 em advance per glyph, 0.8 em ascent,
//!   0.2 em descent), adequate for layout tests and SVG demos;
//! - synchronous transitions: target attributes apply immediately and the
//!   ticket completes before `transition` returns;
//! - group bounds as the union of child bounds offset by the group
//!   translation.
//!
//! Real renderers implement [`Surface`] with their own metrics and
//! scheduling; nothing in the chart core depends on `Scene`.

extern crate alloc;

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Rect;

use crate::join::CompletionTicket;
use crate::surface::{Attrs, NodeId, ShapeKind, Surface, TextAnchor, TextBaseline, Timing};

/// Average glyph advance as a fraction of the font size.
const GLYPH_ADVANCE_EM: f64 = 0.6;
/// Baseline-to-top as a fraction of the font size.
const ASCENT_EM: f64 = 0.8;
/// Baseline-to-bottom as a fraction of the font size.
const DESCENT_EM: f64 = 0.2;
const DEFAULT_FONT_SIZE: f64 = 12.0;

#[derive(Clone, Debug)]
struct SceneNode {
    shape: ShapeKind,
    attrs: Attrs,
    children: Vec<NodeId>,
}

/// A retained node tree implementing [`Surface`].
#[derive(Clone, Debug)]
pub struct Scene {
    width: f64,
    height: f64,
    nodes: HashMap<u64, SceneNode>,
    roots: Vec<NodeId>,
    next_id: u64,
    transitions: usize,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Creates an empty scene with the default 960×540 viewport.
    pub fn new() -> Self {
        Self::with_size(960.0, 540.0)
    }

    /// Creates an empty scene with an explicit viewport size.
    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            nodes: HashMap::new(),
            roots: Vec::new(),
            next_id: 0,
            transitions: 0,
        }
    }

    /// Root nodes in attach order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// A node's shape, if it exists.
    pub fn shape(&self, node: NodeId) -> Option<ShapeKind> {
        self.nodes.get(&node.0).map(|n| n.shape)
    }

    /// A node's accumulated attributes, if it exists.
    pub fn attrs(&self, node: NodeId) -> Option<&Attrs> {
        self.nodes.get(&node.0).map(|n| &n.attrs)
    }

    /// A node's children in append order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(&node.0).map_or(&[], |n| &n.children)
    }

    /// How many transitions have been applied so far.
    pub fn transition_count(&self) -> usize {
        self.transitions
    }

    /// Depth-first traversal of a subtree, parents before children.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![node];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(n) = self.nodes.get(&id.0) {
                for child in n.children.iter().rev() {
                    stack.push(*child);
                }
            }
        }
        out
    }

    fn alloc_node(&mut self, shape: ShapeKind) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id.0,
            SceneNode {
                shape,
                attrs: Attrs::default(),
                children: Vec::new(),
            },
        );
        id
    }

    fn node_bounds(&self, id: NodeId) -> Option<Rect> {
        let node = self.nodes.get(&id.0)?;
        let a = &node.attrs;
        let x = a.x.unwrap_or(0.0);
        let y = a.y.unwrap_or(0.0);
        match node.shape {
            ShapeKind::Group => {
                let mut acc: Option<Rect> = None;
                for child in &node.children {
                    let Some(b) = self.node_bounds(*child) else {
                        continue;
                    };
                    acc = Some(match acc {
                        Some(prev) => prev.union(b),
                        None => b,
                    });
                }
                acc.map(|b| Rect::new(b.x0 + x, b.y0 + y, b.x1 + x, b.y1 + y))
            }
            ShapeKind::Rect => {
                let w = a.width.unwrap_or(0.0);
                let h = a.height.unwrap_or(0.0);
                Some(Rect::new(x, y, x + w, y + h).abs())
            }
            ShapeKind::Line => {
                let x2 = a.x2.unwrap_or(x);
                let y2 = a.y2.unwrap_or(y);
                Some(Rect::new(x, y, x2, y2).abs())
            }
            ShapeKind::Path => {
                let points = a.points.as_deref().unwrap_or(&[]);
                let mut it = points.iter();
                let first = it.next()?;
                let mut b = Rect::new(first.x, first.y, first.x, first.y);
                for p in it {
                    b = b.union_pt(*p);
                }
                Some(b)
            }
            ShapeKind::Circle => {
                let r = a.radius.unwrap_or(0.0).abs();
                Some(Rect::new(x - r, y - r, x + r, y + r))
            }
            ShapeKind::Text => Some(self.text_bounds(a, x, y)),
        }
    }

    fn text_bounds(&self, a: &Attrs, x: f64, y: f64) -> Rect {
        let font_size = a.font_size.unwrap_or(DEFAULT_FONT_SIZE);
        let text = a.text.as_deref().unwrap_or("");
        let width = GLYPH_ADVANCE_EM * font_size * text.chars().count() as f64;
        let ascent = ASCENT_EM * font_size;
        let descent = DESCENT_EM * font_size;

        let (dx0, dx1) = match a.anchor.unwrap_or(TextAnchor::Start) {
            TextAnchor::Start => (0.0, width),
            TextAnchor::Middle => (-0.5 * width, 0.5 * width),
            TextAnchor::End => (-width, 0.0),
        };
        let (dy0, dy1) = match a.baseline.unwrap_or(TextBaseline::Alphabetic) {
            TextBaseline::Alphabetic => (-ascent, descent),
            TextBaseline::Middle => {
                let half = 0.5 * (ascent + descent);
                (-half, half)
            }
            TextBaseline::Hanging => (0.0, ascent + descent),
        };

        // Quarter-turn rotations only: good enough for rotated axis titles,
        // and it keeps this backend free of trig.
        let quarter = {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "angles are authored as small whole degrees"
            )]
            let deg = a.angle.unwrap_or(0.0) as i64;
            deg.rem_euclid(360)
        };
        let corners = [(dx0, dy0), (dx1, dy0), (dx0, dy1), (dx1, dy1)];
        let rotate = |(dx, dy): (f64, f64)| -> (f64, f64) {
            match quarter {
                90 => (-dy, dx),
                180 => (-dx, -dy),
                270 => (dy, -dx),
                _ => (dx, dy),
            }
        };
        let mut b: Option<Rect> = None;
        for c in corners {
            let (dx, dy) = rotate(c);
            let p = kurbo::Point::new(x + dx, y + dy);
            b = Some(match b {
                Some(prev) => prev.union_pt(p),
                None => Rect::new(p.x, p.y, p.x, p.y),
            });
        }
        b.unwrap_or(Rect::ZERO)
    }
}

impl Surface for Scene {
    fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    fn attach_root(&mut self) -> Option<NodeId> {
        let id = self.alloc_node(ShapeKind::Group);
        self.roots.push(id);
        Some(id)
    }

    fn append(&mut self, parent: NodeId, shape: ShapeKind) -> NodeId {
        let id = self.alloc_node(shape);
        if let Some(p) = self.nodes.get_mut(&parent.0) {
            p.children.push(id);
        }
        id
    }

    fn set(&mut self, node: NodeId, attrs: &Attrs) {
        if let Some(n) = self.nodes.get_mut(&node.0) {
            n.attrs.merge(attrs);
        }
    }

    fn bounds(&self, node: NodeId) -> Rect {
        self.node_bounds(node).unwrap_or(Rect::ZERO)
    }

    fn transition(&mut self, node: NodeId, to: &Attrs, _timing: Timing, ticket: CompletionTicket) {
        self.set(node, to);
        self.transitions += 1;
        ticket.complete();
    }

    fn remove(&mut self, node: NodeId) {
        for id in self.descendants(node) {
            self.nodes.remove(&id.0);
        }
        self.roots.retain(|r| *r != node);
        for n in self.nodes.values_mut() {
            n.children.retain(|c| *c != node);
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use crate::join::DrawJoin;

    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn group_bounds_union_children_with_translation() {
        let mut scene = Scene::new();
        let root = scene.attach_root().expect("scene hosts a root");
        let group = scene.append(root, ShapeKind::Group);
        scene.set(group, &Attrs::new().with_pos(10.0, 20.0));
        let rect = scene.append(group, ShapeKind::Rect);
        scene.set(rect, &Attrs::new().with_pos(1.0, 2.0).with_size(5.0, 6.0));

        let b = scene.bounds(group);
        assert!(close(b.x0, 11.0) && close(b.y0, 22.0), "bounds were {b:?}");
        assert!(close(b.width(), 5.0) && close(b.height(), 6.0));
    }

    #[test]
    fn rotated_text_swaps_extents() {
        let mut scene = Scene::new();
        let root = scene.attach_root().expect("scene hosts a root");
        let text = scene.append(root, ShapeKind::Text);
        scene.set(
            text,
            &Attrs::new()
                .with_pos(0.0, 0.0)
                .with_text("hello")
                .with_font_size(10.0),
        );
        let flat = scene.bounds(text);
        scene.set(text, &Attrs::new().with_angle(270.0));
        let rotated = scene.bounds(text);
        assert!(close(flat.width(), rotated.height()), "{flat:?} vs {rotated:?}");
        assert!(close(flat.height(), rotated.width()));
    }

    #[test]
    fn transitions_apply_immediately_and_complete_their_ticket() {
        let mut scene = Scene::new();
        let root = scene.attach_root().expect("scene hosts a root");
        let rect = scene.append(root, ShapeKind::Rect);
        let join = DrawJoin::new();
        let handle = join.handle();
        scene.transition(
            rect,
            &Attrs::new().with_height(42.0),
            Timing {
                duration_ms: 500.0,
                delay_ms: 0.0,
                easing: crate::surface::Easing::CubicInOut,
            },
            join.ticket(),
        );
        assert!(handle.is_settled());
        assert_eq!(scene.attrs(rect).and_then(|a| a.height), Some(42.0));
        assert_eq!(scene.transition_count(), 1);
    }

    #[test]
    fn empty_group_has_zero_bounds() {
        let mut scene = Scene::new();
        let root = scene.attach_root().expect("scene hosts a root");
        let group = scene.append(root, ShapeKind::Group);
        assert_eq!(scene.bounds(group), Rect::ZERO);
    }
}
