// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Nominal tie rod dimensions as a fabricator would write them down.
//!
//! Values are in the unit chosen by the caller (inches unless configured
//! otherwise); conversion to meters happens in the resolver.

use crate::utils::Unit;
use serde::{Deserialize, Serialize};

/// Input dimensions for one tie rod. Defaults describe a 2001 Ford Ranger
/// tie rod: 1.25" x 0.120" DOM tube, weld-in inserts, 3/4-16 heim joints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NominalSpec {
    /// DOM tube outer diameter
    pub tube_od: f64,
    /// DOM tube wall thickness
    pub tube_wall: f64,
    /// Tube length, end face to end face
    pub tube_length: f64,
    /// Thread bore through the insert, fixed by the heim shank
    pub insert_id: f64,
    pub insert_length: f64,
    /// How far the insert body reaches back past the tube end face
    pub insert_engagement: f64,
    /// Lip flush with the tube end face; its OD equals the tube OD
    pub shoulder_length: f64,
    pub heim_body_od: f64,
    pub heim_body_length: f64,
    pub heim_shank_od: f64,
    pub heim_shank_length: f64,
    pub heim_ball_od: f64,
    pub heim_eye_id: f64,
    /// Jam nut size across flats
    pub nut_af: f64,
    pub nut_thickness: f64,
    /// Nut center measured from the start of the exposed shank
    pub nut_offset: f64,
    /// Fillet weld bead radius (torus minor radius)
    pub weld_bead: f64,
    /// Extra radius added to the weld ring beyond the tube OD
    pub weld_buildup: f64,
}

impl Default for NominalSpec {
    fn default() -> Self {
        Self {
            tube_od: 1.25,
            tube_wall: 0.120,
            tube_length: 22.0,
            insert_id: 0.750,
            insert_length: 1.5,
            insert_engagement: 0.25,
            shoulder_length: 0.125,
            heim_body_od: 1.25,
            heim_body_length: 1.125,
            heim_shank_od: 0.750,
            heim_shank_length: 1.0,
            heim_ball_od: 0.875,
            heim_eye_id: 0.750,
            nut_af: 1.125,
            nut_thickness: 0.453,
            nut_offset: 0.25,
            weld_bead: 0.05,
            weld_buildup: 0.0,
        }
    }
}

/// Fit clearances applied while deriving mating dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitAllowances {
    /// Diametral clearance between tube bore and insert OD
    pub slip_clearance: f64,
    /// Radial clearance between shank and nut bore
    pub nut_bore_clearance: f64,
}

impl Default for FitAllowances {
    fn default() -> Self {
        Self {
            slip_clearance: 0.002,
            nut_bore_clearance: 0.005,
        }
    }
}

/// Extra cutter length beyond the feature being bored
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OvercutMargins {
    pub tube: f64,
    pub insert: f64,
    pub shoulder: f64,
    /// Added to the heim body OD, not the ball OD
    pub eye: f64,
    pub nut: f64,
}

impl Default for OvercutMargins {
    fn default() -> Self {
        Self {
            tube: 0.5,
            insert: 0.2,
            shoulder: 0.1,
            eye: 0.3,
            nut: 0.1,
        }
    }
}

impl NominalSpec {
    /// The default rod written in `unit`
    pub fn in_unit(unit: Unit) -> Self {
        Self::default().scaled(unit.per_inch())
    }

    fn scaled(self, k: f64) -> Self {
        Self {
            tube_od: self.tube_od * k,
            tube_wall: self.tube_wall * k,
            tube_length: self.tube_length * k,
            insert_id: self.insert_id * k,
            insert_length: self.insert_length * k,
            insert_engagement: self.insert_engagement * k,
            shoulder_length: self.shoulder_length * k,
            heim_body_od: self.heim_body_od * k,
            heim_body_length: self.heim_body_length * k,
            heim_shank_od: self.heim_shank_od * k,
            heim_shank_length: self.heim_shank_length * k,
            heim_ball_od: self.heim_ball_od * k,
            heim_eye_id: self.heim_eye_id * k,
            nut_af: self.nut_af * k,
            nut_thickness: self.nut_thickness * k,
            nut_offset: self.nut_offset * k,
            weld_bead: self.weld_bead * k,
            weld_buildup: self.weld_buildup * k,
        }
    }
}

impl FitAllowances {
    /// Default clearances written in `unit`
    pub fn in_unit(unit: Unit) -> Self {
        let k = unit.per_inch();
        let d = Self::default();
        Self {
            slip_clearance: d.slip_clearance * k,
            nut_bore_clearance: d.nut_bore_clearance * k,
        }
    }
}

impl OvercutMargins {
    /// Default margins written in `unit`
    pub fn in_unit(unit: Unit) -> Self {
        let k = unit.per_inch();
        let d = Self::default();
        Self {
            tube: d.tube * k,
            insert: d.insert * k,
            shoulder: d.shoulder * k,
            eye: d.eye * k,
            nut: d.nut * k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let spec: NominalSpec = toml::from_str("tube_length = 18.5").unwrap();
        assert_eq!(spec.tube_length, 18.5);
        assert_eq!(spec.tube_od, 1.25);
        assert_eq!(spec.nut_af, 1.125);
    }

    #[test]
    fn test_defaults_follow_unit() {
        assert_eq!(NominalSpec::in_unit(Unit::In), NominalSpec::default());
        assert_eq!(OvercutMargins::in_unit(Unit::In), OvercutMargins::default());

        let spec = NominalSpec::in_unit(Unit::Mm);
        assert!((spec.tube_od - 31.75).abs() < 1e-12);
        assert!((spec.tube_length - 558.8).abs() < 1e-9);
        let margins = OvercutMargins::in_unit(Unit::Mm);
        assert!((margins.nut - 2.54).abs() < 1e-12);
        let allowances = FitAllowances::in_unit(Unit::Mm);
        assert!((allowances.slip_clearance - 0.0508).abs() < 1e-12);
    }
}
