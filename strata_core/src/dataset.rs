// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tabular rows and typed-field inference.
//!
//! A [`Dataset`] owns an ordered sequence of rows and derives one
//! [`TypedField`] per field name. A field's kind is fixed by the first row in
//! which it holds a non-empty value; fields that are empty everywhere stay
//! untyped and are absent from the field table.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::cell::OnceCell;

use crate::value::{FieldKind, Value};

const NULL: Value = Value::Null;

/// One data row: an ordered field-name → value mapping.
///
/// Rows keep their field declaration order so field discovery (and therefore
/// typed-field order) is deterministic. Lookups are linear, which is fine for
/// the handful of fields a chart row carries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    cells: Vec<(String, Value)>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a field value, builder style.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Adds (or replaces) a field value.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let value = value.into();
        if let Some(cell) = self.cells.iter_mut().find(|(n, _)| n.as_str() == name) {
            cell.1 = value;
        } else {
            self.cells.push((String::from(name), value));
        }
    }

    /// Returns the value for `name`, or `Null` when the field is absent.
    pub fn get(&self, name: &str) -> &Value {
        self.cells
            .iter()
            .find(|(n, _)| n == name)
            .map_or(&NULL, |(_, v)| v)
    }

    /// Iterates over `(name, value)` cells in declaration order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.cells.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<S: Into<String>, V: Into<Value>> FromIterator<(S, V)> for Row {
    fn from_iter<T: IntoIterator<Item = (S, V)>>(iter: T) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        }
    }
}

/// A named field with an inferred kind and memoized distinct values.
#[derive(Clone, Debug)]
pub struct TypedField {
    name: String,
    kind: FieldKind,
    distinct: OnceCell<Vec<Value>>,
}

impl TypedField {
    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The inferred kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Whether the field is categorical.
    pub fn is_ordinal(&self) -> bool {
        self.kind == FieldKind::Ordinal
    }

    /// Whether the field is numeric.
    pub fn is_continuous(&self) -> bool {
        self.kind == FieldKind::Continuous
    }

    /// Whether the field holds timestamps.
    pub fn is_temporal(&self) -> bool {
        self.kind == FieldKind::Temporal
    }

    /// Distinct non-null values in first-occurrence order.
    ///
    /// Computed on first use and memoized for the dataset's lifetime.
    pub fn distinct_values(&self, rows: &[Row]) -> &[Value] {
        self.distinct.get_or_init(|| {
            let mut out: Vec<Value> = Vec::new();
            for row in rows {
                let v = row.get(&self.name);
                if !v.is_null() && !out.contains(v) {
                    out.push(v.clone());
                }
            }
            out
        })
    }
}

/// An ordered sequence of rows plus the typed fields inferred from them.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    rows: Vec<Row>,
    fields: Vec<TypedField>,
}

impl Dataset {
    /// Builds a dataset, inferring one typed field per named column.
    ///
    /// Inference walks rows in order and, within a row, cells in declaration
    /// order. The first non-empty value a field holds fixes its kind.
    pub fn new(rows: Vec<Row>) -> Self {
        let mut fields: Vec<TypedField> = Vec::new();
        for row in &rows {
            for (name, value) in row.cells() {
                if fields.iter().any(|f| f.name == name) {
                    continue;
                }
                if let Some(kind) = value.kind() {
                    fields.push(TypedField {
                        name: String::from(name),
                        kind,
                        distinct: OnceCell::new(),
                    });
                }
            }
        }
        Self { rows, fields }
    }

    /// The rows, in input order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// All typed fields, in discovery order.
    pub fn fields(&self) -> &[TypedField] {
        &self.fields
    }

    /// Looks up a typed field by name. Untyped fields are absent.
    pub fn field(&self, name: &str) -> Option<&TypedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Distinct values of a field, in first-occurrence order.
    pub fn distinct(&self, name: &str) -> Option<&[Value]> {
        self.field(name).map(|f| f.distinct_values(&self.rows))
    }

    /// `(min, max)` over the finite numeric values of a field.
    ///
    /// Returns `None` if the field is untyped or holds no finite values.
    pub fn extent(&self, name: &str) -> Option<(f64, f64)> {
        self.field(name)?;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for row in &self.rows {
            let Some(v) = row.get(name).as_f64() else {
                continue;
            };
            if !v.is_finite() {
                continue;
            }
            min = min.min(v);
            max = max.max(v);
        }
        if min.is_finite() && max.is_finite() {
            Some((min, max))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use super::*;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Row::new().with("year", 2010).with("dept", "A"),
            Row::new().with("year", 2011).with("dept", "B"),
            Row::new().with("year", 2010).with("dept", "A"),
        ])
    }

    #[test]
    fn kinds_come_from_the_first_non_empty_value() {
        let data = Dataset::new(vec![
            Row::new().with("a", Value::Null).with("b", 1.0),
            Row::new().with("a", "late").with("c", Value::Null),
        ]);
        assert_eq!(data.field("a").map(TypedField::kind), Some(FieldKind::Ordinal));
        assert_eq!(
            data.field("b").map(TypedField::kind),
            Some(FieldKind::Continuous)
        );
        // Empty in every row: stays untyped.
        assert!(data.field("c").is_none());
    }

    #[test]
    fn inference_is_stable_across_rederivation() {
        let rows = sample().rows.clone();
        let a = Dataset::new(rows.clone());
        let b = Dataset::new(rows);
        let kinds = |d: &Dataset| -> Vec<(String, FieldKind)> {
            d.fields()
                .iter()
                .map(|f| (String::from(f.name()), f.kind()))
                .collect()
        };
        assert_eq!(kinds(&a), kinds(&b));
    }

    #[test]
    fn distinct_values_keep_first_occurrence_order() {
        let data = sample();
        let distinct = data.distinct("dept").expect("dept is typed");
        assert_eq!(distinct, [Value::from("A"), Value::from("B")]);
        // Memoized: a second call sees the same slice.
        assert_eq!(data.distinct("dept").expect("dept is typed").len(), 2);
    }

    #[test]
    fn extent_ignores_non_finite_values() {
        let data = Dataset::new(vec![
            Row::new().with("v", f64::NAN),
            Row::new().with("v", 3.0),
            Row::new().with("v", -1.0),
        ]);
        assert_eq!(data.extent("v"), Some((-1.0, 3.0)));
    }

    #[test]
    fn absent_fields_read_as_null() {
        let row = Row::new().with("x", 1.0);
        assert!(row.get("missing").is_null());
    }
}
