// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parameter resolution: declared channel values → per-row accessors.
//!
//! Given a mark's channel table and the caller's declarations, resolution
//! produces one [`Accessor`] per supported channel:
//!
//! - function values are used verbatim;
//! - field mappings build a [`ChannelScale`] from the field's kind and the
//!   channel's spec (with custom-definition overrides);
//! - literal constants are validated against static channels;
//! - unset channels fall back to the spec's default as a constant.
//!
//! All validation failures raise immediately; nothing is retried.

extern crate alloc;

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use strata_core::{Dataset, Row, TypedField};

use crate::channel::{ChannelSpec, ChannelValue};
use crate::error::ChartError;
use crate::mapping::{Definition, Mapping};
use crate::scale::ChannelScale;

/// A per-row channel value function.
type RowFn = dyn Fn(&Row) -> ChannelValue;

/// One declared channel value.
#[derive(Clone)]
pub enum ChannelArg {
    /// A data-driven field mapping.
    Map(Mapping),
    /// A fixed literal value.
    Value(ChannelValue),
    /// An arbitrary per-row function, used verbatim.
    Func(Rc<RowFn>),
}

impl core::fmt::Debug for ChannelArg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Map(m) => f.debug_tuple("Map").field(m).finish(),
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl From<Mapping> for ChannelArg {
    fn from(m: Mapping) -> Self {
        Self::Map(m)
    }
}

impl From<ChannelValue> for ChannelArg {
    fn from(v: ChannelValue) -> Self {
        Self::Value(v)
    }
}

impl From<f64> for ChannelArg {
    fn from(v: f64) -> Self {
        Self::Value(v.into())
    }
}

impl From<i32> for ChannelArg {
    fn from(v: i32) -> Self {
        Self::Value(v.into())
    }
}

impl From<&str> for ChannelArg {
    fn from(v: &str) -> Self {
        Self::Value(v.into())
    }
}

impl From<peniko::Color> for ChannelArg {
    fn from(v: peniko::Color) -> Self {
        Self::Value(v.into())
    }
}

/// The channel declarations a caller attaches to one mark.
#[derive(Clone, Debug, Default)]
pub struct ChannelArgs {
    entries: Vec<(String, ChannelArg)>,
}

impl ChannelArgs {
    /// Creates an empty declaration set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a channel value, builder style.
    pub fn with(mut self, channel: &str, arg: impl Into<ChannelArg>) -> Self {
        self.set(channel, arg);
        self
    }

    /// Declares a per-row function for a channel, builder style.
    pub fn with_fn(mut self, channel: &str, f: impl Fn(&Row) -> ChannelValue + 'static) -> Self {
        self.set(channel, ChannelArg::Func(Rc::new(f)));
        self
    }

    /// Declares (or replaces) a channel value.
    pub fn set(&mut self, channel: &str, arg: impl Into<ChannelArg>) {
        let arg = arg.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n.as_str() == channel) {
            entry.1 = arg;
        } else {
            self.entries.push((String::from(channel), arg));
        }
    }

    /// The declaration for one channel.
    pub fn get(&self, channel: &str) -> Option<&ChannelArg> {
        self.entries
            .iter()
            .find(|(n, _)| n == channel)
            .map(|(_, a)| a)
    }

    /// Declared channel names, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Whether no channels were declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A resolved per-row value function for one channel.
#[derive(Clone)]
pub enum Accessor {
    /// A constant (defaults and literals).
    Const(ChannelValue),
    /// A caller-supplied function.
    Func(Rc<RowFn>),
    /// A field mapping through a channel scale.
    Scaled {
        /// The mapped field name.
        field: String,
        /// The scale applied to the field's values.
        scale: ChannelScale,
    },
}

impl Accessor {
    /// The channel value for one row.
    pub fn value(&self, row: &Row) -> ChannelValue {
        match self {
            Self::Const(v) => v.clone(),
            Self::Func(f) => f(row),
            Self::Scaled { field, scale } => scale.apply(row.get(field)),
        }
    }

    /// The mapped field name, when the accessor is data-driven.
    pub fn mapped_field(&self) -> Option<&str> {
        match self {
            Self::Scaled { field, .. } => Some(field),
            _ => None,
        }
    }
}

impl core::fmt::Debug for Accessor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Const(v) => f.debug_tuple("Const").field(v).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
            Self::Scaled { field, scale } => f
                .debug_struct("Scaled")
                .field("field", field)
                .field("scale", scale)
                .finish(),
        }
    }
}

/// The accessor set produced for one mark.
#[derive(Clone, Debug, Default)]
pub struct ResolvedChannels {
    entries: Vec<(String, Accessor)>,
}

impl ResolvedChannels {
    /// The accessor for one channel.
    pub fn get(&self, channel: &str) -> Option<&Accessor> {
        self.entries
            .iter()
            .find(|(n, _)| n == channel)
            .map(|(_, a)| a)
    }

    /// The channel value for one row (`Absent` for unknown channels).
    pub fn value(&self, channel: &str, row: &Row) -> ChannelValue {
        self.get(channel)
            .map_or(ChannelValue::Absent, |a| a.value(row))
    }

    /// The mapped field behind a channel, when it is data-driven.
    pub fn mapped_field(&self, channel: &str) -> Option<&str> {
        self.get(channel).and_then(Accessor::mapped_field)
    }
}

/// Channels the `color` convenience alias expands to.
const COLOR_ALIAS: &str = "color";
const COLOR_EXPANSION: [&str; 2] = ["fill", "stroke"];

/// Resolves a mark's declared channels against its channel table.
pub fn resolve_channels(
    mark: &str,
    table: &[(&str, ChannelSpec)],
    args: &ChannelArgs,
    data: &Dataset,
) -> Result<ResolvedChannels, ChartError> {
    let mut declared: Vec<(String, ChannelArg)> = Vec::new();
    for name in args.names() {
        let arg = args.get(name).cloned().unwrap_or(ChannelArg::Value(ChannelValue::Absent));
        if name == COLOR_ALIAS && table.iter().any(|(n, _)| COLOR_EXPANSION.contains(n)) {
            let clash: Vec<String> = COLOR_EXPANSION
                .iter()
                .filter(|c| args.get(c).is_some())
                .map(ToString::to_string)
                .collect();
            if !clash.is_empty() {
                return Err(ChartError::ColorAliasConflict { channels: clash });
            }
            for expanded in COLOR_EXPANSION {
                if table.iter().any(|(n, _)| *n == expanded) {
                    declared.push((String::from(expanded), arg.clone()));
                }
            }
        } else {
            declared.push((String::from(name), arg));
        }
    }

    let mut surplus: Vec<String> = declared
        .iter()
        .map(|(n, _)| n.clone())
        .filter(|n| !table.iter().any(|(t, _)| t == n))
        .collect();
    if !surplus.is_empty() {
        surplus.sort();
        let mut valid: Vec<String> = table.iter().map(|(n, _)| String::from(*n)).collect();
        valid.sort();
        return Err(ChartError::UnknownChannels {
            mark: String::from(mark),
            channels: surplus,
            valid,
        });
    }

    let mut entries: Vec<(String, Accessor)> = Vec::new();
    for (name, spec) in table {
        let accessor = match declared.iter().find(|(n, _)| n == name) {
            Some((_, ChannelArg::Func(f))) => Accessor::Func(Rc::clone(f)),
            Some((_, ChannelArg::Value(v))) => {
                if let ChannelSpec::Static(s) = spec
                    && !s.allowed.contains(v)
                {
                    return Err(ChartError::InvalidStaticValue {
                        channel: String::from(*name),
                        value: v.to_string(),
                        allowed: spec.allowed_labels(),
                    });
                }
                Accessor::Const(v.clone())
            }
            Some((_, ChannelArg::Map(mapping))) => {
                resolve_field_mapping(name, spec, mapping, data)?
            }
            None => Accessor::Const(spec.default_value().clone()),
        };
        entries.push((String::from(*name), accessor));
    }

    Ok(ResolvedChannels { entries })
}

fn resolve_field_mapping(
    channel: &str,
    spec: &ChannelSpec,
    mapping: &Mapping,
    data: &Dataset,
) -> Result<Accessor, ChartError> {
    if spec.is_static() {
        return Err(ChartError::StaticChannelMapped {
            channel: String::from(channel),
            field: mapping.field.clone(),
            allowed: spec.allowed_labels(),
        });
    }
    let field = data
        .field(&mapping.field)
        .ok_or_else(|| ChartError::UnknownField {
            field: mapping.field.clone(),
        })?;

    let scale = if field.is_ordinal() {
        resolve_ordinal_field(channel, spec, mapping, field, data)?
    } else {
        resolve_continuous_field(channel, spec, mapping, data)?
    };

    Ok(Accessor::Scaled {
        field: mapping.field.clone(),
        scale,
    })
}

fn resolve_ordinal_field(
    channel: &str,
    spec: &ChannelSpec,
    mapping: &Mapping,
    field: &TypedField,
    data: &Dataset,
) -> Result<ChannelScale, ChartError> {
    let distinct = field.distinct_values(data.rows());
    match spec {
        ChannelSpec::Ordinal(c) => match &mapping.definition {
            Some(Definition::Table(table)) => {
                if !Mapping::table_covers(table, distinct) {
                    return Err(ChartError::OrdinalDefinitionInvalid {
                        channel: String::from(channel),
                        field: mapping.field.clone(),
                    });
                }
                // Domain order follows the definition so the caller's values
                // line up with the keys they wrote.
                Ok(ChannelScale::Ordinal {
                    domain: table.iter().map(|(k, _)| k.clone()).collect(),
                    range: table.iter().map(|(_, v)| v.clone()).collect(),
                })
            }
            Some(Definition::Range(..)) => Err(ChartError::OrdinalDefinitionInvalid {
                channel: String::from(channel),
                field: mapping.field.clone(),
            }),
            None if c.palette.is_empty() => Ok(ChannelScale::Identity),
            None => Ok(ChannelScale::Ordinal {
                domain: distinct.to_vec(),
                range: c.palette.clone(),
            }),
        },
        ChannelSpec::Continuous(c) => {
            let limits = match &mapping.definition {
                Some(Definition::Range(lo, hi)) => (*lo, *hi),
                Some(Definition::Table(_)) => {
                    return Err(ChartError::ContinuousDefinitionInvalid {
                        channel: String::from(channel),
                        field: mapping.field.clone(),
                    });
                }
                None => c.limits,
            };
            Ok(ChannelScale::Spread {
                domain: distinct.to_vec(),
                limits,
            })
        }
        ChannelSpec::Static(_) => unreachable!("static channels are rejected before kind dispatch"),
    }
}

fn resolve_continuous_field(
    channel: &str,
    spec: &ChannelSpec,
    mapping: &Mapping,
    data: &Dataset,
) -> Result<ChannelScale, ChartError> {
    let extent = data.extent(&mapping.field).unwrap_or((0.0, 0.0));
    // A custom definition on a continuous field overrides the domain.
    let domain = match &mapping.definition {
        Some(Definition::Range(lo, hi)) => (*lo, *hi),
        Some(Definition::Table(_)) => {
            return Err(ChartError::ContinuousDefinitionInvalid {
                channel: String::from(channel),
                field: mapping.field.clone(),
            });
        }
        None => extent,
    };
    let (from, to) = match spec {
        ChannelSpec::Ordinal(c) => (c.fallback.0.clone(), c.fallback.1.clone()),
        ChannelSpec::Continuous(c) => (
            ChannelValue::Float(c.limits.0),
            ChannelValue::Float(c.limits.1),
        ),
        ChannelSpec::Static(_) => unreachable!("static channels are rejected before kind dispatch"),
    };
    Ok(ChannelScale::Ramp { domain, from, to })
}
