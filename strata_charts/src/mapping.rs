// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Field-to-channel mappings.
//!
//! A [`Mapping`] names a dataset field and may carry a custom definition:
//! an ordered value table for ordinal fields, or a two-element numeric
//! range for continuous fields. Validity is checked against the field's
//! actual domain during parameter resolution.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use strata_core::Value;

use crate::channel::ChannelValue;

/// A custom definition attached to a mapping.
#[derive(Clone, Debug, PartialEq)]
pub enum Definition {
    /// Ordered domain-value → channel-value table for ordinal fields.
    Table(Vec<(Value, ChannelValue)>),
    /// A numeric range for continuous fields.
    Range(f64, f64),
}

/// A data-driven channel or axis binding.
#[derive(Clone, Debug, PartialEq)]
pub struct Mapping {
    /// The mapped field name.
    pub field: String,
    /// Optional custom definition.
    pub definition: Option<Definition>,
}

impl Mapping {
    /// Maps a field with no custom definition.
    pub fn field(name: &str) -> Self {
        Self {
            field: String::from(name),
            definition: None,
        }
    }

    /// Attaches an ordered value table (for ordinal fields).
    pub fn with_table(
        mut self,
        entries: impl IntoIterator<Item = (impl Into<Value>, impl Into<ChannelValue>)>,
    ) -> Self {
        self.definition = Some(Definition::Table(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ));
        self
    }

    /// Attaches a numeric range (for continuous fields).
    pub fn with_range(mut self, lo: f64, hi: f64) -> Self {
        self.definition = Some(Definition::Range(lo, hi));
        self
    }

    /// Whether a custom definition is attached.
    pub fn has_definition(&self) -> bool {
        self.definition.is_some()
    }

    /// Exact-cover check for an ordinal table against the field's domain.
    ///
    /// Both directions are required: every distinct value must have a key,
    /// and every key must name a distinct value. (The weaker one-directional
    /// check silently accepts definitions that miss part of the domain.)
    pub(crate) fn table_covers(table: &[(Value, ChannelValue)], distinct: &[Value]) -> bool {
        distinct.iter().all(|v| table.iter().any(|(k, _)| k == v))
            && table.iter().all(|(k, _)| distinct.contains(k))
    }
}

impl From<&str> for Mapping {
    fn from(name: &str) -> Self {
        Self::field(name)
    }
}
