// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart themes.
//!
//! A theme is an explicit value threaded into [`crate::Chart`] construction
//! and passed down to every component that needs a palette: there are no
//! global defaults. The swatch feeds categorical channels; the gradient is
//! the fallback ramp used when a continuous field drives a categorical
//! channel.

extern crate alloc;

use alloc::vec::Vec;

use peniko::Color;

/// A categorical swatch plus a two-stop gradient for continuous fallbacks.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    /// Categorical palette, cycled when a domain is larger than the swatch.
    pub swatch: Vec<Color>,
    /// Gradient endpoints for continuous fields on categorical channels.
    pub gradient: (Color, Color),
}

impl Theme {
    /// Creates a theme from an explicit swatch and gradient.
    pub fn new(swatch: Vec<Color>, gradient: (Color, Color)) -> Self {
        Self { swatch, gradient }
    }

    /// The swatch color at `index`, cycling past the end.
    pub fn swatch_color(&self, index: usize) -> Color {
        if self.swatch.is_empty() {
            Color::BLACK
        } else {
            self.swatch[index % self.swatch.len()]
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            swatch: alloc::vec![
                Color::from_rgb8(0x29, 0x80, 0xb9),
                Color::from_rgb8(0x27, 0xae, 0x60),
                Color::from_rgb8(0xe7, 0x4c, 0x3c),
                Color::from_rgb8(0x9b, 0x59, 0xb6),
                Color::from_rgb8(0x1c, 0xcc, 0xaa),
                Color::from_rgb8(0xf3, 0x9c, 0x12),
            ],
            gradient: (
                Color::from_rgb8(0xf1, 0xc4, 0x0f),
                Color::from_rgb8(0xf3, 0x9c, 0x12),
            ),
        }
    }
}

/// Componentwise interpolation between two colors, `t` in `0..=1`.
pub(crate) fn lerp_color(a: Color, b: Color, t: f64) -> Color {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "color components are low-precision by nature"
    )]
    let t = t as f32;
    let ca = a.components;
    let cb = b.components;
    Color::new([
        ca[0] + (cb[0] - ca[0]) * t,
        ca[1] + (cb[1] - ca[1]) * t,
        ca[2] + (cb[2] - ca[2]) * t,
        ca[3] + (cb[3] - ca[3]) * t,
    ])
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn swatch_cycles_past_the_end() {
        let theme = Theme::default();
        let n = theme.swatch.len();
        assert_eq!(theme.swatch_color(n + 1), theme.swatch_color(1));
    }

    #[test]
    fn lerp_endpoints_roundtrip() {
        let (a, b) = Theme::default().gradient;
        assert_eq!(lerp_color(a, b, 0.0).components, a.components);
        assert_eq!(lerp_color(a, b, 1.0).components, b.components);
    }
}
