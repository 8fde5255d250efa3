// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Placed primitive construction

use super::{Placement, Primitive, Solid};
use crate::error::Result;
use tracing::debug;

/// Creates validated, placed primitive solids. Holds no state.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveFactory;

impl PrimitiveFactory {
    pub fn new() -> Self {
        Self
    }

    /// Build any primitive after validating its configuration
    pub fn create(&self, primitive: Primitive, placement: Placement) -> Result<Solid> {
        primitive.validate()?;
        debug!(
            primitive = primitive.name(),
            offset = placement.offset,
            axis = %placement.axis,
            "creating primitive"
        );
        Ok(Solid::from_primitive(primitive, placement))
    }

    pub fn cylinder(
        &self,
        radius: f64,
        length: f64,
        segments: u32,
        placement: Placement,
    ) -> Result<Solid> {
        self.create(Primitive::cylinder(radius, length, segments), placement)
    }

    /// Six-sided prism sized across the flats
    pub fn hex_prism(&self, across_flats: f64, length: f64, placement: Placement) -> Result<Solid> {
        self.cylinder(across_flats / 3f64.sqrt(), length, 6, placement)
    }

    pub fn torus(
        &self,
        major_radius: f64,
        minor_radius: f64,
        major_segments: u32,
        minor_segments: u32,
        placement: Placement,
    ) -> Result<Solid> {
        self.create(
            Primitive::torus(major_radius, minor_radius, major_segments, minor_segments),
            placement,
        )
    }

    pub fn sphere(
        &self,
        radius: f64,
        segments: u32,
        rings: u32,
        placement: Placement,
    ) -> Result<Solid> {
        self.create(Primitive::sphere(radius, segments, rings), placement)
    }
}
