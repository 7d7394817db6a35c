// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-channel contracts.
//!
//! Every visual channel a mark supports is described by a [`ChannelSpec`]:
//! a default value plus either a categorical palette (with a continuous
//! fallback ramp), a numeric output range, or an enumerated allowed-value
//! set for channels that can never be data-driven.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use peniko::Color;

/// A resolved visual value for one channel of one row.
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelValue {
    /// No value; the renderer leaves the attribute unset.
    Absent,
    /// A color (fill, stroke, …).
    Color(Color),
    /// A number (opacity, size, thickness, …).
    Float(f64),
    /// A string (dash pattern, label, interpolation mode, …).
    Text(String),
}

impl ChannelValue {
    /// Returns the numeric content, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the color content, if any.
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns the text content, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` for [`ChannelValue::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl core::fmt::Display for ChannelValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Absent => f.write_str("none"),
            Self::Color(c) => {
                let rgba = c.to_rgba8();
                write!(f, "#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
            }
            Self::Float(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for ChannelValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<i32> for ChannelValue {
    fn from(n: i32) -> Self {
        Self::Float(n.into())
    }
}

impl From<&str> for ChannelValue {
    fn from(s: &str) -> Self {
        Self::Text(String::from(s))
    }
}

impl From<Color> for ChannelValue {
    fn from(c: Color) -> Self {
        Self::Color(c)
    }
}

/// A categorical channel: palette plus a continuous fallback ramp.
#[derive(Clone, Debug, PartialEq)]
pub struct OrdinalChannel {
    /// Value used when the channel is not set.
    pub default: ChannelValue,
    /// Categorical output palette, cycled over the domain. An empty palette
    /// marks an identity channel (the mapped field's own values, as text).
    pub palette: Vec<ChannelValue>,
    /// Ramp endpoints used when the mapped field is continuous.
    pub fallback: (ChannelValue, ChannelValue),
}

/// A numeric channel with a continuous output range.
#[derive(Clone, Debug, PartialEq)]
pub struct ContinuousChannel {
    /// Value used when the channel is not set.
    pub default: ChannelValue,
    /// Output range endpoints.
    pub limits: (f64, f64),
}

/// A static-only channel: an enumerated allowed-value set, never data-driven.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticChannel {
    /// Value used when the channel is not set.
    pub default: ChannelValue,
    /// The values a caller may fix this channel to.
    pub allowed: Vec<ChannelValue>,
}

/// The contract for one visual channel of one mark kind.
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelSpec {
    /// Categorical output (fill, stroke, dash, label).
    Ordinal(OrdinalChannel),
    /// Numeric output (opacity, size, thickness).
    Continuous(ContinuousChannel),
    /// Fixed-value-only (interpolation mode).
    Static(StaticChannel),
}

impl ChannelSpec {
    /// A categorical channel.
    pub fn ordinal(
        default: impl Into<ChannelValue>,
        palette: Vec<ChannelValue>,
        fallback: (ChannelValue, ChannelValue),
    ) -> Self {
        Self::Ordinal(OrdinalChannel {
            default: default.into(),
            palette,
            fallback,
        })
    }

    /// A numeric channel.
    pub fn continuous(default: impl Into<ChannelValue>, limits: (f64, f64)) -> Self {
        Self::Continuous(ContinuousChannel {
            default: default.into(),
            limits,
        })
    }

    /// A static-only channel.
    pub fn fixed(default: impl Into<ChannelValue>, allowed: Vec<ChannelValue>) -> Self {
        Self::Static(StaticChannel {
            default: default.into(),
            allowed,
        })
    }

    /// The default value used when the channel is unmapped.
    pub fn default_value(&self) -> &ChannelValue {
        match self {
            Self::Ordinal(c) => &c.default,
            Self::Continuous(c) => &c.default,
            Self::Static(c) => &c.default,
        }
    }

    /// Whether the channel is static-only.
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static(_))
    }

    /// The allowed values of a static channel, rendered for error messages.
    pub(crate) fn allowed_labels(&self) -> Vec<String> {
        match self {
            Self::Static(c) => c.allowed.iter().map(ToString::to_string).collect(),
            _ => Vec::new(),
        }
    }
}
