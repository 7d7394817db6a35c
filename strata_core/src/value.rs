// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell values and inferred field kinds.

extern crate alloc;

use alloc::string::String;

/// The inferred kind of a dataset field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Categorical values (strings).
    Ordinal,
    /// Numeric values.
    Continuous,
    /// Timestamps (numeric seconds since an arbitrary epoch).
    Temporal,
}

/// A single cell value in a dataset row.
///
/// Timestamps are modeled as numeric seconds, matching the scale layer; a
/// richer calendar representation belongs upstream of the chart core.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// An empty cell. Fields that are empty in every row stay untyped.
    Null,
    /// A numeric value.
    Num(f64),
    /// A categorical value.
    Str(String),
    /// A timestamp in seconds.
    Time(f64),
}

impl Value {
    /// Returns the field kind this value would infer, or `None` for `Null`.
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            Self::Null => None,
            Self::Num(_) => Some(FieldKind::Continuous),
            Self::Str(_) => Some(FieldKind::Ordinal),
            Self::Time(_) => Some(FieldKind::Temporal),
        }
    }

    /// Returns the numeric content of `Num`/`Time` values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Num(n) | Self::Time(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns `true` for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Null => Ok(()),
            // Rust's shortest-roundtrip float formatting already drops a
            // trailing `.0`, which is what tick and key labels want.
            Self::Num(n) | Self::Time(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(String::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Num(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Num(n.into())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;

    use super::*;

    #[test]
    fn labels_drop_trailing_zero_fraction() {
        assert_eq!(Value::Num(2010.0).to_string(), "2010");
        assert_eq!(Value::Num(0.5).to_string(), "0.5");
        assert_eq!(Value::from("A").to_string(), "A");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn kinds_follow_the_value_variant() {
        assert_eq!(Value::from(1.0).kind(), Some(FieldKind::Continuous));
        assert_eq!(Value::from("x").kind(), Some(FieldKind::Ordinal));
        assert_eq!(Value::Time(60.0).kind(), Some(FieldKind::Temporal));
        assert_eq!(Value::Null.kind(), None);
    }
}
