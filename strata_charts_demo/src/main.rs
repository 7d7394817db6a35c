// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart demos for `strata_charts`, rendered through the reference scene
//! surface and serialized to SVG.

mod svg;

use strata_charts::{
    AnimationOptions, AxisOptions, Centering, ChannelArgs, Chart, ChartOptions, Mapping,
};
use strata_core::{Dataset, Row, Scene, Surface, SurfaceTarget, TargetError, Value};

/// A host with exactly one scene behind the `.chart` selector.
struct SceneHost {
    scene: Scene,
}

impl SceneHost {
    fn new() -> Self {
        Self {
            scene: Scene::with_size(640.0, 400.0),
        }
    }
}

impl SurfaceTarget for SceneHost {
    fn resolve(&mut self, selector: &str) -> Result<&mut dyn Surface, TargetError> {
        if selector == ".chart" {
            Ok(&mut self.scene)
        } else {
            Err(TargetError::NotFound(String::from(selector)))
        }
    }
}

fn sales_data() -> Dataset {
    let rows = [
        (2010, 1000, "A"),
        (2011, 2000, "A"),
        (2012, 3000, "A"),
        (2013, 800, "A"),
        (2014, 1250, "A"),
        (2015, 250, "A"),
        (2010, 5000, "B"),
        (2011, 1890, "B"),
        (2012, 2800, "B"),
        (2013, 2800, "B"),
        (2014, 2175, "B"),
        (2015, 1276, "B"),
    ];
    Dataset::new(
        rows.iter()
            .map(|(year, sales, dept)| {
                Row::new()
                    .with("year", *year)
                    .with("sales", *sales)
                    .with("department", *dept)
            })
            .collect(),
    )
}

fn integer_format(v: &Value) -> String {
    match v.as_f64() {
        Some(n) => format!("{n:.0}"),
        None => v.to_string(),
    }
}

fn grouped_columns() -> Chart {
    Chart::new(sales_data())
        .map_x(Mapping::field("year"))
        .map_y(Mapping::field("sales"))
        .x_axis(AxisOptions::new().with_format(integer_format))
        .title("Sales by year")
        .subtitle("Grouped by department")
        .columns(ChannelArgs::new().with("fill", Mapping::field("department")))
}

fn stacked_columns() -> Chart {
    Chart::new(sales_data())
        .map_x(Mapping::field("year"))
        .map_y(Mapping::field("sales"))
        .x_axis(AxisOptions::new().with_format(integer_format))
        .with_options(ChartOptions {
            centre_horizontal: Centering::Full,
            ..ChartOptions::default()
        })
        .title("Sales by year, stacked")
        .stacked_columns(ChannelArgs::new().with("fill", Mapping::field("department")))
        .animate(AnimationOptions {
            delay_ms: 120.0,
            ..AnimationOptions::default()
        })
}

fn lines_and_points() -> Chart {
    Chart::new(sales_data())
        .map_x(Mapping::field("year"))
        .map_y(Mapping::field("sales"))
        .x_axis(AxisOptions::new().with_format(integer_format))
        .y_axis(AxisOptions::new().with_title("Total sales"))
        .lines(ChannelArgs::new().with("stroke", Mapping::field("department")))
        .points(ChannelArgs::new().with("fill", Mapping::field("department")))
}

fn render(name: &str, chart: &Chart) {
    let mut host = SceneHost::new();
    let handle = chart.draw(&mut host, ".chart").expect("chart draws");
    assert!(handle.is_settled(), "scene transitions settle synchronously");
    let path = format!("{name}.svg");
    std::fs::write(&path, svg::scene_to_svg(&host.scene)).expect("write svg");
    println!("wrote {path}");
}

fn main() {
    render("grouped_columns", &grouped_columns());
    render("stacked_columns", &stacked_columns());
    render("lines_and_points", &lines_and_points());
}
