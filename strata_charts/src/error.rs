// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart error taxonomy.
//!
//! Every error is raised synchronously, none are retried, and all are fatal
//! to the triggering configuration or draw call. There is no partial-draw
//! recovery: callers remove marks and retry from a clean chart.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use strata_core::TargetError;

use crate::axis::AxisId;
use crate::list::{and_list, or_list};

/// Errors raised by chart configuration, resolution, grouping and drawing.
#[derive(Clone, Debug, PartialEq)]
pub enum ChartError {
    /// A declared channel name is not in the mark's channel table.
    UnknownChannels {
        /// The mark kind name.
        mark: String,
        /// The unrecognized channel names.
        channels: Vec<String>,
        /// All channel names the mark supports.
        valid: Vec<String>,
    },
    /// The `color` alias was combined with one of its expanded channels.
    ColorAliasConflict {
        /// The conflicting expanded channel names.
        channels: Vec<String>,
    },
    /// A field was mapped to a static-only channel.
    StaticChannelMapped {
        /// The channel name.
        channel: String,
        /// The offending field name.
        field: String,
        /// The fixed values the channel accepts.
        allowed: Vec<String>,
    },
    /// A literal value is outside a static channel's allowed set.
    InvalidStaticValue {
        /// The channel name.
        channel: String,
        /// The rejected value, rendered.
        value: String,
        /// The fixed values the channel accepts.
        allowed: Vec<String>,
    },
    /// A custom ordinal definition does not exactly cover the field domain.
    OrdinalDefinitionInvalid {
        /// The channel name.
        channel: String,
        /// The mapped field name.
        field: String,
    },
    /// A custom continuous definition is not a two-element numeric range.
    ContinuousDefinitionInvalid {
        /// The channel name.
        channel: String,
        /// The mapped field name.
        field: String,
    },
    /// A mapping names a field absent from the dataset (or empty throughout).
    UnknownField {
        /// The field name.
        field: String,
    },
    /// Two rows in one category share an inner group key during stacking.
    DuplicateStackKey {
        /// The offending category, rendered.
        category: String,
        /// The duplicated inner key.
        key: String,
    },
    /// `draw` was called before mapping this axis.
    MissingAxisMapping {
        /// The unmapped axis.
        axis: AxisId,
    },
    /// `draw` was called with no marks registered.
    NoMarks,
    /// The draw target did not resolve to exactly one surface.
    Target(TargetError),
    /// The resolved surface refused to host a drawing root.
    RootRejected,
}

impl From<TargetError> for ChartError {
    fn from(err: TargetError) -> Self {
        Self::Target(err)
    }
}

impl core::fmt::Display for ChartError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownChannels {
                mark,
                channels,
                valid,
            } => write!(
                f,
                "unused channel(s) {} passed to the \"{mark}\" mark; valid channels are {}",
                and_list(channels),
                and_list(valid)
            ),
            Self::ColorAliasConflict { channels } => write!(
                f,
                "cannot set {} because \"color\" is set",
                or_list(channels)
            ),
            Self::StaticChannelMapped {
                channel,
                field,
                allowed,
            } => write!(
                f,
                "field \"{field}\" cannot drive the \"{channel}\" channel; only a fixed value is \
                 allowed (one of: {})",
                or_list(allowed)
            ),
            Self::InvalidStaticValue {
                channel,
                value,
                allowed,
            } => write!(
                f,
                "\"{value}\" is not a valid value for \"{channel}\" (one of: {})",
                or_list(allowed)
            ),
            Self::OrdinalDefinitionInvalid { channel, field } => write!(
                f,
                "the custom definition for channel \"{channel}\" must supply a value for every \
                 distinct value of field \"{field}\", and nothing else"
            ),
            Self::ContinuousDefinitionInvalid { channel, field } => write!(
                f,
                "the custom definition for channel \"{channel}\" mapped to continuous field \
                 \"{field}\" must be a numeric range of length two"
            ),
            Self::UnknownField { field } => write!(
                f,
                "field \"{field}\" is not present in the data (or is empty in every row)"
            ),
            Self::DuplicateStackKey { category, key } => write!(
                f,
                "invalid grouping: where the category axis is \"{category}\", there are \
                 duplicate \"{key}\" values, so segments cannot stack"
            ),
            Self::MissingAxisMapping { axis } => write!(
                f,
                "no {} mapping has been set; map a field to each axis before drawing",
                axis.name()
            ),
            Self::NoMarks => f.write_str("no marks registered in the chart"),
            Self::Target(err) => err.fmt(f),
            Self::RootRejected => f.write_str("the resolved surface cannot host a drawing root"),
        }
    }
}

impl core::error::Error for ChartError {}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;
    use alloc::vec;

    use super::*;

    #[test]
    fn unknown_channel_message_lists_the_valid_set() {
        let err = ChartError::UnknownChannels {
            mark: "points".to_string(),
            channels: vec!["weight".to_string()],
            valid: vec!["fill".to_string(), "opacity".to_string(), "stroke".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("\"weight\""), "message was {msg:?}");
        assert!(
            msg.contains("\"fill\", \"opacity\" and \"stroke\""),
            "message was {msg:?}"
        );
    }

    #[test]
    fn duplicate_stack_key_names_category_and_key() {
        let err = ChartError::DuplicateStackKey {
            category: "X".to_string(),
            key: "a".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("\"X\"") && msg.contains("\"a\""), "message was {msg:?}");
    }
}
