// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end draw scenarios against the reference `Scene` surface.

extern crate std;

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use strata_core::{
    Attrs, Dataset, Row, Scene, ShapeKind, Surface, SurfaceTarget, TargetError, Value,
};

use crate::axis::{AxisId, AxisOptions, MarkDemands, resolve_axis};
use crate::chart::{AnimationOptions, Chart};
use crate::error::ChartError;
use crate::grouping::Grouping;
use crate::mapping::Mapping;
use crate::mark::{ColumnMark, Mark};
use crate::resolve::{ChannelArgs, resolve_channels};
use crate::theme::Theme;

/// A host with named scenes; selectors may match zero, one or many.
struct Host {
    surfaces: Vec<(String, Scene)>,
}

impl Host {
    fn single(name: &str) -> Self {
        Self {
            surfaces: vec![(String::from(name), Scene::with_size(400.0, 300.0))],
        }
    }

    fn scene(&self, name: &str) -> &Scene {
        &self
            .surfaces
            .iter()
            .find(|(n, _)| n == name)
            .expect("scene exists")
            .1
    }
}

impl SurfaceTarget for Host {
    fn resolve(&mut self, selector: &str) -> Result<&mut dyn Surface, TargetError> {
        let matches = self
            .surfaces
            .iter()
            .filter(|(n, _)| n == selector)
            .count();
        match matches {
            0 => Err(TargetError::NotFound(String::from(selector))),
            1 => {
                let (_, scene) = self
                    .surfaces
                    .iter_mut()
                    .find(|(n, _)| n.as_str() == selector)
                    .expect("counted above");
                Ok(scene)
            }
            n => Err(TargetError::Ambiguous {
                selector: String::from(selector),
                matches: n,
            }),
        }
    }
}

/// A surface that refuses to host a drawing root.
struct Rootless(Scene);

impl Surface for Rootless {
    fn viewport(&self) -> kurbo::Rect {
        self.0.viewport()
    }

    fn attach_root(&mut self) -> Option<strata_core::NodeId> {
        None
    }

    fn append(&mut self, parent: strata_core::NodeId, shape: ShapeKind) -> strata_core::NodeId {
        self.0.append(parent, shape)
    }

    fn set(&mut self, node: strata_core::NodeId, attrs: &Attrs) {
        self.0.set(node, attrs);
    }

    fn bounds(&self, node: strata_core::NodeId) -> kurbo::Rect {
        self.0.bounds(node)
    }

    fn transition(
        &mut self,
        node: strata_core::NodeId,
        to: &Attrs,
        timing: strata_core::Timing,
        ticket: strata_core::CompletionTicket,
    ) {
        self.0.transition(node, to, timing, ticket);
    }

    fn remove(&mut self, node: strata_core::NodeId) {
        self.0.remove(node);
    }
}

struct RootlessHost(Rootless);

impl SurfaceTarget for RootlessHost {
    fn resolve(&mut self, _selector: &str) -> Result<&mut dyn Surface, TargetError> {
        Ok(&mut self.0)
    }
}

fn sales_rows() -> Vec<Row> {
    vec![
        Row::new().with("year", 2010).with("sales", 1000).with("dept", "A"),
        Row::new().with("year", 2010).with("sales", 5000).with("dept", "B"),
        Row::new().with("year", 2011).with("sales", 2000).with("dept", "A"),
        Row::new().with("year", 2011).with("sales", 1890).with("dept", "B"),
    ]
}

fn sales_chart() -> Chart {
    Chart::new(Dataset::new(sales_rows()))
        .map_x(Mapping::field("year"))
        .map_y(Mapping::field("sales"))
}

/// All `(shape, attrs)` pairs in the scene, depth first.
fn nodes(scene: &Scene) -> Vec<(ShapeKind, Attrs)> {
    let mut out = Vec::new();
    for root in scene.roots() {
        for id in scene.descendants(*root) {
            if let (Some(shape), Some(attrs)) = (scene.shape(id), scene.attrs(id)) {
                out.push((shape, attrs.clone()));
            }
        }
    }
    out
}

#[test]
fn grouped_columns_reserve_two_slots_per_category() {
    // The canonical scenario: x = year (continuous, forced band treatment),
    // y = sales (zero baseline from the column mark), fill = dept.
    let data = Dataset::new(sales_rows());
    let mark = Mark::Column(ColumnMark {
        channels: ChannelArgs::new().with("fill", Mapping::field("dept")),
    });
    let theme = Theme::default();
    let table = mark.channel_table(&theme);
    let resolved = resolve_channels(mark.name(), &table, mark.channels(), &data).expect("resolves");

    let grouping = Grouping::compute(&data, &resolved, "year");
    assert_eq!(grouping.outer.len(), 2);
    assert_eq!(grouping.outer[0].category, Value::from(2010));
    assert_eq!(grouping.outer[1].category, Value::from(2011));
    assert_eq!(grouping.keys, ["A", "B"]);

    let demands = MarkDemands {
        zero_y: mark.zero_y(),
        band_x: mark.band_x(),
        ..MarkDemands::default()
    };
    let y = resolve_axis(
        AxisId::Y,
        &[Mapping::field("sales")],
        &AxisOptions::new(),
        &data,
        &demands,
        (300.0, 0.0),
    )
    .expect("resolves");
    let (lo, hi) = y.definition.scale.domain().expect("continuous");
    assert_eq!(lo, 0.0);
    assert!(hi >= 5000.0);

    let x = resolve_axis(
        AxisId::X,
        &[Mapping::field("year")],
        &AxisOptions::new(),
        &data,
        &demands,
        (0.0, 400.0),
    )
    .expect("resolves");
    assert!(x.definition.pseudo_ordinal);
}

#[test]
fn drawing_grouped_columns_emits_one_rect_per_row() {
    let mut host = Host::single(".chart");
    let chart = sales_chart().columns(ChannelArgs::new().with("fill", Mapping::field("dept")));
    let handle = chart.draw(&mut host, ".chart").expect("draws");
    assert!(handle.is_settled());

    let rects: Vec<_> = nodes(host.scene(".chart"))
        .into_iter()
        .filter(|(shape, _)| *shape == ShapeKind::Rect)
        .collect();
    // One per row plus the plot background.
    assert_eq!(rects.len(), sales_rows().len() + 1);
}

#[test]
fn stacked_columns_reach_the_widened_domain_top() {
    let mut host = Host::single(".chart");
    let chart =
        sales_chart().stacked_columns(ChannelArgs::new().with("fill", Mapping::field("dept")));
    chart.draw(&mut host, ".chart").expect("draws");

    // 2010 stacks to 6000, the widened domain maximum, so its top segment's
    // y lands at the top of the plot (0 in plot coordinates).
    let top_rect = nodes(host.scene(".chart"))
        .into_iter()
        .filter(|(shape, a)| *shape == ShapeKind::Rect && a.height.is_some())
        .filter_map(|(_, a)| a.y)
        .fold(f64::INFINITY, f64::min);
    assert!(top_rect.abs() < 1e-9, "stack top was {top_rect}");
}

#[test]
fn stacking_rejects_duplicate_inner_keys_at_draw_time() {
    let data = Dataset::new(vec![
        Row::new().with("cat", "X").with("g", "a").with("v", 1),
        Row::new().with("cat", "X").with("g", "a").with("v", 2),
    ]);
    let chart = Chart::new(data)
        .map_x(Mapping::field("cat"))
        .map_y(Mapping::field("v"))
        .stacked_columns(ChannelArgs::new().with("fill", Mapping::field("g")));
    let mut host = Host::single(".chart");
    let err = chart.draw(&mut host, ".chart").expect_err("duplicates");
    assert_eq!(
        err,
        ChartError::DuplicateStackKey {
            category: "X".into(),
            key: "a".into(),
        }
    );
}

#[test]
fn unknown_channel_fails_the_draw_with_the_valid_set() {
    let mut host = Host::single(".chart");
    let chart = sales_chart().stacked_columns(ChannelArgs::new().with("weight", 2.0));
    let err = chart.draw(&mut host, ".chart").expect_err("weight unknown");
    match err {
        ChartError::UnknownChannels { valid, .. } => {
            assert_eq!(valid, ["fill", "opacity", "stroke"]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn draw_requires_mappings_and_marks() {
    let mut host = Host::single(".chart");
    let no_x = Chart::new(Dataset::new(sales_rows()))
        .map_y(Mapping::field("sales"))
        .points(ChannelArgs::new());
    assert_eq!(
        no_x.draw(&mut host, ".chart").expect_err("x unmapped"),
        ChartError::MissingAxisMapping { axis: AxisId::X }
    );

    let no_marks = sales_chart();
    assert_eq!(
        no_marks.draw(&mut host, ".chart").expect_err("no marks"),
        ChartError::NoMarks
    );
}

#[test]
fn target_resolution_must_be_unique() {
    let chart = sales_chart().points(ChannelArgs::new());

    let mut missing = Host::single(".chart");
    assert!(matches!(
        chart.draw(&mut missing, ".other").expect_err("not found"),
        ChartError::Target(TargetError::NotFound(_))
    ));

    let mut ambiguous = Host {
        surfaces: vec![
            (String::from(".chart"), Scene::new()),
            (String::from(".chart"), Scene::new()),
        ],
    };
    assert!(matches!(
        chart.draw(&mut ambiguous, ".chart").expect_err("ambiguous"),
        ChartError::Target(TargetError::Ambiguous { matches: 2, .. })
    ));

    let mut rootless = RootlessHost(Rootless(Scene::new()));
    assert_eq!(
        chart.draw(&mut rootless, ".chart").expect_err("no root"),
        ChartError::RootRejected
    );
}

#[test]
fn animated_draw_settles_synchronously_on_the_scene() {
    let mut host = Host::single(".chart");
    let chart = sales_chart()
        .points(ChannelArgs::new().with("fill", Mapping::field("dept")))
        .lines(ChannelArgs::new().with("stroke", Mapping::field("dept")))
        .animate(AnimationOptions {
            delay_ms: 100.0,
            ..AnimationOptions::default()
        });
    let handle = chart.draw(&mut host, ".chart").expect("draws");
    // The scene applies transitions immediately and completes each ticket,
    // so the aggregate handle is already settled.
    assert!(handle.is_settled());
    assert!(host.scene(".chart").transition_count() > 0);
}

#[test]
fn default_axis_titles_appear_capitalized_in_the_scene() {
    let mut host = Host::single(".chart");
    let chart = sales_chart()
        .title("Sales by year")
        .points(ChannelArgs::new());
    chart.draw(&mut host, ".chart").expect("draws");

    let texts: Vec<String> = nodes(host.scene(".chart"))
        .into_iter()
        .filter_map(|(_, a)| a.text)
        .collect();
    assert!(texts.iter().any(|t| t == "Year"), "texts were {texts:?}");
    assert!(texts.iter().any(|t| t == "Sales"), "texts were {texts:?}");
    assert!(
        texts.iter().any(|t| t == "Sales by year"),
        "texts were {texts:?}"
    );
}

#[test]
fn facet_mappings_render_their_label_band() {
    let mut host = Host::single(".chart");
    let chart = Chart::new(Dataset::new(sales_rows()))
        .map_x(Mapping::field("year"))
        .map_x(Mapping::field("dept"))
        .map_y(Mapping::field("sales"))
        .points(ChannelArgs::new());
    chart.draw(&mut host, ".chart").expect("draws");

    let texts: Vec<String> = nodes(host.scene(".chart"))
        .into_iter()
        .filter_map(|(_, a)| a.text)
        .collect();
    assert!(texts.iter().any(|t| t == "A"), "texts were {texts:?}");
    assert!(texts.iter().any(|t| t == "B"), "texts were {texts:?}");
}
