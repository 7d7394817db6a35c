// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Categorical grouping and stacking.
//!
//! Marks on a band axis may be sub-divided within each category: the outer
//! partition groups rows by the category axis field, the inner partition
//! groups by whichever of the `fill`/`stroke`/`opacity` channels were mapped
//! to fields. With two or more grouping channels a composite key is
//! synthesized per row; keys live in a side table indexed by row position,
//! so the caller's rows are never mutated.
//!
//! Stacked marks additionally accumulate a running top per category; the
//! maximum cumulative value feeds back into the vertical axis domain.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use hashbrown::HashSet;
use strata_core::{Dataset, Value};

use crate::error::ChartError;
use crate::resolve::ResolvedChannels;
use crate::scale::BandScale;

/// The channels whose field mappings partition marks within a category.
const GROUPING_CHANNELS: [&str; 3] = ["fill", "stroke", "opacity"];

/// Separator joining grouping field values into a composite key.
const KEY_SEPARATOR: &str = "-";

/// Inner-band padding used when a composite of several grouping channels
/// shares one category band.
const COMPOSITE_INNER_PADDING: f64 = 0.1;

/// One category of the outer partition.
#[derive(Clone, Debug, PartialEq)]
pub struct OuterGroup {
    /// The category axis value.
    pub category: Value,
    /// Row indices in original order.
    pub rows: Vec<usize>,
}

/// The grouped layout of one mark's rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Grouping {
    /// Distinct inner keys across *all* rows, sorted, so every category
    /// reserves identical slots even when some are empty for it.
    pub keys: Vec<String>,
    /// Side table: row index → inner key ("" when nothing groups).
    pub row_keys: Vec<String>,
    /// Outer partition in category first-occurrence order.
    pub outer: Vec<OuterGroup>,
    grouped_channels: usize,
}

impl Grouping {
    /// Partitions rows by the category field and the mapped grouping
    /// channels.
    pub fn compute(data: &Dataset, channels: &ResolvedChannels, category_field: &str) -> Self {
        let grouping_fields: Vec<&str> = GROUPING_CHANNELS
            .iter()
            .filter_map(|c| channels.mapped_field(c))
            .collect();

        let rows = data.rows();
        let row_keys: Vec<String> = rows
            .iter()
            .map(|row| {
                let mut parts: Vec<String> = Vec::new();
                for field in &grouping_fields {
                    parts.push(row.get(field).to_string());
                }
                parts.join(KEY_SEPARATOR)
            })
            .collect();

        let mut keys: Vec<String> = Vec::new();
        for key in &row_keys {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
        keys.sort();

        let mut outer: Vec<OuterGroup> = Vec::new();
        for (i, row) in rows.iter().enumerate() {
            let category = row.get(category_field);
            if category.is_null() {
                continue;
            }
            match outer.iter_mut().find(|g| g.category == *category) {
                Some(group) => group.rows.push(i),
                None => outer.push(OuterGroup {
                    category: category.clone(),
                    rows: alloc::vec![i],
                }),
            }
        }

        Self {
            keys,
            row_keys,
            outer,
            grouped_channels: grouping_fields.len(),
        }
    }

    /// Whether any grouping channel was mapped.
    pub fn is_grouped(&self) -> bool {
        self.grouped_channels > 0
    }

    /// Inner padding fraction: non-zero only for composite grouping.
    pub fn inner_padding(&self) -> f64 {
        if self.grouped_channels >= 2 {
            COMPOSITE_INNER_PADDING
        } else {
            0.0
        }
    }

    /// The inner band scale shared by every category.
    pub fn inner_scale(&self, band_width: f64) -> BandScale {
        let domain = self.keys.iter().map(|k| Value::from(k.clone())).collect();
        BandScale::new(domain, (0.0, band_width)).with_padding(self.inner_padding(), 0.0)
    }

    /// The inner slot index for a row.
    pub fn slot(&self, row: usize) -> Option<usize> {
        let key = self.row_keys.get(row)?;
        self.keys.iter().position(|k| k == key)
    }

    /// Stacks each category's rows and returns per-row cumulative tops.
    ///
    /// Rows stack in inner-key sort order. A duplicate inner key within one
    /// category is a configuration error (stacking needs a 1:1 mapping).
    pub fn stack(&self, data: &Dataset, value_field: &str) -> Result<Stacking, ChartError> {
        let rows = data.rows();
        let mut tops = alloc::vec![0.0_f64; rows.len()];
        let mut max_top = 0.0_f64;

        for group in &self.outer {
            let mut ordered: Vec<usize> = group.rows.clone();
            ordered.sort_by(|a, b| self.row_keys[*a].cmp(&self.row_keys[*b]));

            let mut running = 0.0;
            let mut seen: HashSet<&str> = HashSet::new();
            for &i in &ordered {
                let key = self.row_keys[i].as_str();
                if !seen.insert(key) {
                    return Err(ChartError::DuplicateStackKey {
                        category: group.category.to_string(),
                        key: String::from(key),
                    });
                }
                running += rows[i].get(value_field).as_f64().unwrap_or(0.0);
                tops[i] = running;
            }
            max_top = max_top.max(running);
        }

        Ok(Stacking { tops, max_top })
    }
}

/// Per-row cumulative stack tops.
#[derive(Clone, Debug, PartialEq)]
pub struct Stacking {
    /// Cumulative top value per row index (zero for unstacked rows).
    pub tops: Vec<f64>,
    /// The maximum cumulative value across all categories.
    pub max_top: f64,
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use strata_core::Row;

    use super::*;
    use crate::channel::{ChannelSpec, ChannelValue};
    use crate::mapping::Mapping;
    use crate::resolve::{ChannelArgs, resolve_channels};

    fn palette_spec() -> ChannelSpec {
        ChannelSpec::ordinal(
            ChannelValue::Absent,
            vec![ChannelValue::from(1.0), ChannelValue::from(2.0)],
            (ChannelValue::Absent, ChannelValue::Absent),
        )
    }

    fn table() -> Vec<(&'static str, ChannelSpec)> {
        vec![
            ("fill", palette_spec()),
            ("stroke", palette_spec()),
            ("opacity", ChannelSpec::continuous(1.0, (0.1, 1.0))),
        ]
    }

    fn sales_data() -> Dataset {
        Dataset::new(vec![
            Row::new().with("year", 2010).with("sales", 1000).with("dept", "A"),
            Row::new().with("year", 2010).with("sales", 5000).with("dept", "B"),
            Row::new().with("year", 2011).with("sales", 2000).with("dept", "A"),
            Row::new().with("year", 2011).with("sales", 1890).with("dept", "B"),
        ])
    }

    fn resolved(args: ChannelArgs) -> ResolvedChannels {
        resolve_channels("columns", &table(), &args, &sales_data()).expect("resolves")
    }

    #[test]
    fn no_grouping_channel_means_one_slot_per_category() {
        let data = sales_data();
        let grouping = Grouping::compute(&data, &resolved(ChannelArgs::new()), "year");
        assert!(!grouping.is_grouped());
        assert_eq!(grouping.keys.len(), 1);
        assert_eq!(grouping.inner_padding(), 0.0);
        assert_eq!(grouping.outer.len(), 2);
    }

    #[test]
    fn one_grouping_channel_keys_rows_by_its_field() {
        let data = sales_data();
        let args = ChannelArgs::new().with("fill", Mapping::field("dept"));
        let grouping = Grouping::compute(&data, &resolved(args), "year");
        assert_eq!(grouping.keys, ["A", "B"]);
        assert_eq!(grouping.row_keys, ["A", "B", "A", "B"]);
        assert_eq!(grouping.inner_padding(), 0.0);
    }

    #[test]
    fn composite_keys_join_grouping_fields_and_pad_slots() {
        let data = Dataset::new(vec![
            Row::new().with("cat", "X").with("g", "a").with("h", "p").with("v", 1),
            Row::new().with("cat", "X").with("g", "b").with("h", "q").with("v", 2),
        ]);
        let args = ChannelArgs::new()
            .with("fill", Mapping::field("g"))
            .with("stroke", Mapping::field("h"));
        let channels = resolve_channels("columns", &table(), &args, &data).expect("resolves");
        let grouping = Grouping::compute(&data, &channels, "cat");
        assert_eq!(grouping.row_keys, ["a-p", "b-q"]);
        assert!(grouping.inner_padding() > 0.0);
    }

    #[test]
    fn every_category_reserves_identical_inner_slots() {
        let data = Dataset::new(vec![
            Row::new().with("cat", "X").with("g", "a").with("v", 1),
            Row::new().with("cat", "X").with("g", "b").with("v", 2),
            // Category Y only has "a" rows; it still reserves a "b" slot.
            Row::new().with("cat", "Y").with("g", "a").with("v", 3),
        ]);
        let args = ChannelArgs::new().with("fill", Mapping::field("g"));
        let channels = resolve_channels("columns", &table(), &args, &data).expect("resolves");
        let grouping = Grouping::compute(&data, &channels, "cat");
        assert_eq!(grouping.keys, ["a", "b"]);
        let inner = grouping.inner_scale(60.0);
        assert_eq!(inner.count(), 2);
    }

    #[test]
    fn stacking_accumulates_in_key_order() {
        let data = sales_data();
        let args = ChannelArgs::new().with("fill", Mapping::field("dept"));
        let grouping = Grouping::compute(&data, &resolved(args), "year");
        let stacking = grouping.stack(&data, "sales").expect("stacks");
        // 2010: A=1000 then B on top at 6000; 2011: A=2000, B at 3890.
        assert_eq!(stacking.tops, [1000.0, 6000.0, 2000.0, 3890.0]);
        assert_eq!(stacking.max_top, 6000.0);
    }

    #[test]
    fn stacking_is_idempotent() {
        let data = sales_data();
        let args = ChannelArgs::new().with("fill", Mapping::field("dept"));
        let grouping = Grouping::compute(&data, &resolved(args), "year");
        let a = grouping.stack(&data, "sales").expect("stacks");
        let b = grouping.stack(&data, "sales").expect("stacks");
        assert_eq!(a, b);
    }

    #[test]
    fn duplicate_inner_keys_fail_naming_category_and_key() {
        let data = Dataset::new(vec![
            Row::new().with("cat", "X").with("g", "a").with("v", 1),
            Row::new().with("cat", "X").with("g", "a").with("v", 2),
        ]);
        let args = ChannelArgs::new().with("fill", Mapping::field("g"));
        let channels = resolve_channels("columns", &table(), &args, &data).expect("resolves");
        let grouping = Grouping::compute(&data, &channels, "cat");
        let err = grouping.stack(&data, "v").expect_err("duplicate keys");
        assert_eq!(
            err,
            ChartError::DuplicateStackKey {
                category: "X".into(),
                key: "a".into(),
            }
        );
    }
}
