// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Dependent dimension derivation and fit validation.
//!
//! Every placement value here is an unsigned distance from the tube midpoint.
//! The assembly builder multiplies it by the side sign, so the left and right
//! ends share one number and stay exact mirror images.

use super::{FitAllowances, NominalSpec, OvercutMargins};
use crate::error::{Error, Result};
use crate::utils::{Unit, UnitConverter};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Physical-fit inequalities, in the order they are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FitCheck {
    TubeWall,
    TubeBore,
    InsertSlipFit,
    InsertWall,
    ShankFit,
    PositiveLength,
    InsertEngagement,
    EyeBore,
    NutBore,
    NutOnShank,
    WeldBead,
}

impl fmt::Display for FitCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TubeWall => "wall thickness > 0",
            Self::TubeBore => "tube_id > 0",
            Self::InsertSlipFit => "insert_od < tube_id",
            Self::InsertWall => "0 < insert_id < insert_od",
            Self::ShankFit => "heim_shank_od <= insert_id",
            Self::PositiveLength => "nominal lengths > 0",
            Self::InsertEngagement => "0 <= insert_engagement <= insert_length",
            Self::EyeBore => "heim_eye_id < heim_ball_od",
            Self::NutBore => "nut bore < nut across-flats",
            Self::NutOnShank => "jam nut lies on the shank",
            Self::WeldBead => "weld bead radius < weld ring radius",
        };
        f.write_str(text)
    }
}

/// Every dimension the builder needs, in meters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedDimensions {
    pub tube_od: f64,
    pub tube_id: f64,
    pub tube_length: f64,
    pub tube_bore_length: f64,

    pub insert_od: f64,
    pub insert_id: f64,
    pub insert_length: f64,
    pub insert_center: f64,
    pub insert_bore_length: f64,

    pub shoulder_od: f64,
    pub shoulder_length: f64,
    pub shoulder_center: f64,
    pub shoulder_bore_length: f64,

    pub weld_major_radius: f64,
    pub weld_minor_radius: f64,
    pub weld_center: f64,

    pub shank_od: f64,
    pub shank_length: f64,
    pub shank_center: f64,

    pub body_od: f64,
    pub body_length: f64,
    pub body_center: f64,

    pub ball_od: f64,
    pub ball_center: f64,
    pub eye_id: f64,
    pub eye_bore_length: f64,

    pub nut_af: f64,
    pub nut_circumradius: f64,
    pub nut_thickness: f64,
    pub nut_center: f64,
    pub nut_bore_radius: f64,
    pub nut_bore_length: f64,
}

impl DerivedDimensions {
    /// Distance from the midpoint to either tube end face
    pub fn tube_end(&self) -> f64 {
        self.tube_length / 2.0
    }

    /// Where the exposed shank starts, just past the shoulder
    pub fn shank_start(&self) -> f64 {
        self.tube_end() + self.shoulder_length
    }

    /// Overall length from heim body end to heim body end
    pub fn overall_length(&self) -> f64 {
        2.0 * (self.body_center + self.body_length / 2.0)
    }
}

/// Turns a [`NominalSpec`] into [`DerivedDimensions`]
#[derive(Debug, Clone, Default)]
pub struct DimensionResolver {
    converter: UnitConverter,
    allowances: FitAllowances,
    margins: OvercutMargins,
}

impl DimensionResolver {
    /// Resolver for nominals written in `unit`, with the default allowances
    /// and margins expressed in that unit as well
    pub fn new(unit: Unit) -> Self {
        Self {
            converter: UnitConverter::new(unit),
            allowances: FitAllowances::in_unit(unit),
            margins: OvercutMargins::in_unit(unit),
        }
    }

    pub fn with_allowances(mut self, allowances: FitAllowances) -> Self {
        self.allowances = allowances;
        self
    }

    pub fn with_margins(mut self, margins: OvercutMargins) -> Self {
        self.margins = margins;
        self
    }

    pub fn unit(&self) -> Unit {
        self.converter.unit()
    }

    /// Derive and validate. Pure: the same spec always yields the same value.
    pub fn resolve(&self, spec: &NominalSpec) -> Result<DerivedDimensions> {
        let m = |v: f64| self.converter.to_meters(v);
        let show = |v: f64| format!("{:.4} {}", self.converter.from_meters(v), self.unit());

        let tube_od = m(spec.tube_od);
        let wall = m(spec.tube_wall);
        let tube_id = tube_od - 2.0 * wall;
        let insert_od = tube_id - m(self.allowances.slip_clearance);
        let insert_id = m(spec.insert_id);
        let shank_od = m(spec.heim_shank_od);

        if !(wall > 0.0) {
            return Err(Error::invalid(
                FitCheck::TubeWall,
                format!("wall = {}", show(wall)),
            ));
        }
        if !(tube_id > 0.0) {
            return Err(Error::invalid(
                FitCheck::TubeBore,
                format!(
                    "tube_od {} - 2 x wall {} = {}",
                    show(tube_od),
                    show(wall),
                    show(tube_id)
                ),
            ));
        }
        if !(insert_od < tube_id) {
            return Err(Error::invalid(
                FitCheck::InsertSlipFit,
                format!("insert_od {} vs tube_id {}", show(insert_od), show(tube_id)),
            ));
        }
        if !(insert_id > 0.0 && insert_id < insert_od) {
            return Err(Error::invalid(
                FitCheck::InsertWall,
                format!(
                    "insert_id {} vs insert_od {}",
                    show(insert_id),
                    show(insert_od)
                ),
            ));
        }
        if !(shank_od <= insert_id) {
            return Err(Error::invalid(
                FitCheck::ShankFit,
                format!(
                    "heim_shank_od {} vs insert_id {}",
                    show(shank_od),
                    show(insert_id)
                ),
            ));
        }

        let lengths = [
            ("tube_length", spec.tube_length),
            ("insert_length", spec.insert_length),
            ("shoulder_length", spec.shoulder_length),
            ("heim_body_od", spec.heim_body_od),
            ("heim_body_length", spec.heim_body_length),
            ("heim_shank_od", spec.heim_shank_od),
            ("heim_shank_length", spec.heim_shank_length),
            ("heim_ball_od", spec.heim_ball_od),
            ("heim_eye_id", spec.heim_eye_id),
            ("nut_af", spec.nut_af),
            ("nut_thickness", spec.nut_thickness),
            ("weld_bead", spec.weld_bead),
        ];
        if let Some((name, value)) = lengths.iter().find(|(_, v)| !(v.is_finite() && *v > 0.0)) {
            return Err(Error::invalid(
                FitCheck::PositiveLength,
                format!("{name} = {value} {}", self.unit()),
            ));
        }

        let tube_length = m(spec.tube_length);
        let insert_length = m(spec.insert_length);
        let engagement = m(spec.insert_engagement);
        if !(engagement >= 0.0 && engagement <= insert_length) {
            return Err(Error::invalid(
                FitCheck::InsertEngagement,
                format!(
                    "insert_engagement {} vs insert_length {}",
                    show(engagement),
                    show(insert_length)
                ),
            ));
        }

        let ball_od = m(spec.heim_ball_od);
        let eye_id = m(spec.heim_eye_id);
        if !(eye_id < ball_od) {
            return Err(Error::invalid(
                FitCheck::EyeBore,
                format!(
                    "heim_eye_id {} vs heim_ball_od {}",
                    show(eye_id),
                    show(ball_od)
                ),
            ));
        }

        let nut_af = m(spec.nut_af);
        let nut_bore_radius = shank_od / 2.0 + m(self.allowances.nut_bore_clearance);
        if !(2.0 * nut_bore_radius < nut_af) {
            return Err(Error::invalid(
                FitCheck::NutBore,
                format!(
                    "nut bore {} vs across-flats {}",
                    show(2.0 * nut_bore_radius),
                    show(nut_af)
                ),
            ));
        }

        let shank_length = m(spec.heim_shank_length);
        let nut_thickness = m(spec.nut_thickness);
        let nut_offset = m(spec.nut_offset);
        let nut_inner = nut_offset - nut_thickness / 2.0;
        let nut_outer = nut_offset + nut_thickness / 2.0;
        if !(nut_inner >= 0.0 && nut_outer <= shank_length) {
            return Err(Error::invalid(
                FitCheck::NutOnShank,
                format!(
                    "nut spans {}..{} on a {} shank",
                    show(nut_inner),
                    show(nut_outer),
                    show(shank_length)
                ),
            ));
        }

        let weld_major_radius = tube_od / 2.0 + m(spec.weld_buildup);
        let weld_minor_radius = m(spec.weld_bead);
        if !(weld_minor_radius < weld_major_radius) {
            return Err(Error::invalid(
                FitCheck::WeldBead,
                format!(
                    "bead {} vs ring {}",
                    show(weld_minor_radius),
                    show(weld_major_radius)
                ),
            ));
        }

        let tube_end = tube_length / 2.0;
        let shoulder_length = m(spec.shoulder_length);
        let shank_start = tube_end + shoulder_length;
        let body_length = m(spec.heim_body_length);
        let body_od = m(spec.heim_body_od);
        let body_center = shank_start + shank_length + body_length / 2.0;

        let dims = DerivedDimensions {
            tube_od,
            tube_id,
            tube_length,
            tube_bore_length: tube_length + m(self.margins.tube),

            insert_od,
            insert_id,
            insert_length,
            insert_center: tube_end + insert_length / 2.0 - engagement,
            insert_bore_length: insert_length + m(self.margins.insert),

            shoulder_od: tube_od,
            shoulder_length,
            shoulder_center: tube_end + shoulder_length / 2.0,
            shoulder_bore_length: shoulder_length + m(self.margins.shoulder),

            weld_major_radius,
            weld_minor_radius,
            weld_center: shank_start,

            shank_od,
            shank_length,
            shank_center: shank_start + shank_length / 2.0,

            body_od,
            body_length,
            body_center,

            ball_od,
            ball_center: body_center,
            eye_id,
            eye_bore_length: body_od + m(self.margins.eye),

            nut_af,
            nut_circumradius: nut_af / 3f64.sqrt(),
            nut_thickness,
            nut_center: shank_start + nut_offset,
            nut_bore_radius,
            nut_bore_length: nut_thickness + m(self.margins.nut),
        };

        debug!(
            tube_id = dims.tube_id,
            insert_od = dims.insert_od,
            overall_length = dims.overall_length(),
            "resolved tie rod dimensions"
        );
        Ok(dims)
    }
}

/// Resolve with inch units and default allowances and margins
pub fn resolve(spec: &NominalSpec) -> Result<DerivedDimensions> {
    DimensionResolver::default().resolve(spec)
}
