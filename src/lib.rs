// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tie Rod Kernel
//!
//! Parametric solid model of a two-ended tie rod: DOM tube, press-fit
//! inserts, weld beads, heim joints and jam nuts. Nominal dimensions are
//! resolved and fit-checked once, then a staged builder produces every part
//! with boolean CSG, mirrored about the tube midpoint.

pub mod assembly;
pub mod cli;
pub mod config;
pub mod dimensions;
pub mod error;
pub mod geometry;
pub mod io;
pub mod utils;

pub use assembly::{
    Assembly, AssemblyBuilder, BuildStage, MaterialTag, PartKind, PlacedSolid, Side, Tessellation,
};
pub use config::RodConfig;
pub use dimensions::{resolve, DerivedDimensions, DimensionResolver, FitCheck, NominalSpec};
pub use error::{Error, Result};
pub use geometry::{CsgConfig, CsgEngine, Mesh, Primitive, Solid};
pub use io::{export, GeometrySink};

/// Build the assembly for `spec` (inches) with default allowances,
/// tessellation and boolean rules
pub fn build(spec: &NominalSpec) -> Result<Assembly> {
    AssemblyBuilder::from_spec(spec)?.run()
}

/// Build the assembly described by a full configuration
pub fn build_with_config(config: &RodConfig) -> Result<Assembly> {
    config.builder()?.run()
}
