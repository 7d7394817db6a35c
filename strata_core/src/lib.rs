// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core building blocks for the `strata` charting stack.
//!
//! This crate is deliberately small and renderer-agnostic:
//! - **Values and datasets**: tabular rows, typed fields, distinct-value and
//!   extent queries.
//! - **The rendering surface**: a narrow interface over a retained 2D
//!   surface (append primitives, set attributes, query realized bounds, run
//!   timed transitions, remove primitives). Chart code never talks to a
//!   concrete renderer directly.
//! - **Draw joins**: a counter barrier that turns N per-mark completion
//!   signals into one aggregate handle.
//!
//! A reference [`Scene`] surface (retained node tree, heuristic text
//! metrics, synchronous transitions) is included for tests and demos.

#![no_std]

extern crate alloc;

mod dataset;
mod join;
mod scene;
mod surface;
mod value;

pub use dataset::{Dataset, Row, TypedField};
pub use join::{CompletionTicket, DrawHandle, DrawJoin};
pub use scene::Scene;
pub use surface::{
    Attrs, Easing, NodeId, ShapeKind, Surface, SurfaceTarget, TargetError, TextAnchor,
    TextBaseline, Timing,
};
pub use value::{FieldKind, Value};
