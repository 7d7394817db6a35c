// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiny SVG serializer for `strata_core::Scene` trees.

use std::fmt::Write as _;

use peniko::Color;
use strata_core::{Attrs, NodeId, Scene, ShapeKind, TextAnchor, TextBaseline};

/// Serializes a scene into a standalone SVG document.
pub fn scene_to_svg(scene: &Scene) -> String {
    let viewport = strata_core::Surface::viewport(scene);
    let mut out = String::new();
    let _ = write!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {} {}\" \
         font-family=\"sans-serif\">\n",
        viewport.width(),
        viewport.height()
    );
    for root in scene.roots() {
        write_node(scene, *root, &mut out);
    }
    out.push_str("</svg>\n");
    out
}

fn write_node(scene: &Scene, id: NodeId, out: &mut String) {
    let Some(shape) = scene.shape(id) else {
        return;
    };
    let attrs = scene.attrs(id).cloned().unwrap_or_default();
    let x = attrs.x.unwrap_or(0.0);
    let y = attrs.y.unwrap_or(0.0);

    match shape {
        ShapeKind::Group => {
            let _ = write!(out, "<g transform=\"translate({x}, {y})\">\n");
            for child in scene.children(id) {
                write_node(scene, *child, out);
            }
            out.push_str("</g>\n");
        }
        ShapeKind::Rect => {
            let _ = write!(
                out,
                "<rect x=\"{x}\" y=\"{y}\" width=\"{}\" height=\"{}\"{}/>\n",
                attrs.width.unwrap_or(0.0),
                attrs.height.unwrap_or(0.0),
                style(&attrs),
            );
        }
        ShapeKind::Line => {
            let _ = write!(
                out,
                "<line x1=\"{x}\" y1=\"{y}\" x2=\"{}\" y2=\"{}\"{}/>\n",
                attrs.x2.unwrap_or(x),
                attrs.y2.unwrap_or(y),
                style(&attrs),
            );
        }
        ShapeKind::Path => {
            let points = attrs
                .points
                .as_deref()
                .unwrap_or(&[])
                .iter()
                .map(|p| format!("{},{}", p.x, p.y))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(out, "<polyline points=\"{points}\" fill=\"none\"{}/>\n", style(&attrs));
        }
        ShapeKind::Circle => {
            let _ = write!(
                out,
                "<circle cx=\"{x}\" cy=\"{y}\" r=\"{}\"{}/>\n",
                attrs.radius.unwrap_or(0.0),
                style(&attrs),
            );
        }
        ShapeKind::Text => {
            let anchor = match attrs.anchor.unwrap_or(TextAnchor::Start) {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let baseline = match attrs.baseline.unwrap_or(TextBaseline::Alphabetic) {
                TextBaseline::Alphabetic => "alphabetic",
                TextBaseline::Middle => "central",
                TextBaseline::Hanging => "hanging",
            };
            let rotate = match attrs.angle {
                Some(a) if a != 0.0 => format!(" transform=\"rotate({a}, {x}, {y})\""),
                _ => String::new(),
            };
            let _ = write!(
                out,
                "<text x=\"{x}\" y=\"{y}\" font-size=\"{}\" text-anchor=\"{anchor}\" \
                 dominant-baseline=\"{baseline}\"{rotate}{}>{}</text>\n",
                attrs.font_size.unwrap_or(12.0),
                style(&attrs),
                escape(attrs.text.as_deref().unwrap_or("")),
            );
        }
    }
}

fn style(attrs: &Attrs) -> String {
    let mut out = String::new();
    if let Some(fill) = attrs.fill {
        let _ = write!(out, " fill=\"{}\"", hex(fill));
    }
    if let Some(stroke) = attrs.stroke {
        let _ = write!(out, " stroke=\"{}\"", hex(stroke));
    }
    if let Some(width) = attrs.stroke_width {
        let _ = write!(out, " stroke-width=\"{width}\"");
    }
    if let Some(opacity) = attrs.opacity {
        let _ = write!(out, " opacity=\"{opacity}\"");
    }
    if let Some(dash) = &attrs.dash
        && !dash.is_empty()
    {
        let _ = write!(out, " stroke-dasharray=\"{dash}\"");
    }
    out
}

fn hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
