// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Staged assembly builder.
//!
//! Each [`AssemblyBuilder::step`] performs exactly one stage. Every end part
//! is produced by one side-parametrized function called for LH then RH; the
//! functions take unsigned magnitudes from [`DerivedDimensions`] and apply
//! [`Side::offset`] at the point of placement.

use super::{Assembly, BuildStage, PartKind, PlacedSolid, Side};
use crate::dimensions::{DerivedDimensions, DimensionResolver, NominalSpec};
use crate::error::{Error, Result};
use crate::geometry::{
    BooleanKernel, BspKernel, CsgConfig, CsgEngine, Placement, PrimitiveFactory, Solid,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Segment counts per feature class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tessellation {
    /// Tube, insert and shoulder stock plus their bores
    pub round: u32,
    /// Heim shank and body, eye bore, nut bore
    pub hardware: u32,
    pub torus_major: u32,
    pub torus_minor: u32,
    pub sphere_segments: u32,
    pub sphere_rings: u32,
}

impl Default for Tessellation {
    fn default() -> Self {
        Self {
            round: 64,
            hardware: 48,
            torus_major: 64,
            torus_minor: 12,
            sphere_segments: 48,
            sphere_rings: 24,
        }
    }
}

/// Builds the tie rod one stage at a time
#[derive(Debug)]
pub struct AssemblyBuilder<K: BooleanKernel = BspKernel> {
    dims: DerivedDimensions,
    tessellation: Tessellation,
    factory: PrimitiveFactory,
    engine: CsgEngine<K>,
    stage: BuildStage,
    parts: Vec<PlacedSolid>,
}

impl AssemblyBuilder<BspKernel> {
    pub fn new(dims: DerivedDimensions) -> Self {
        Self::with_engine(dims, CsgEngine::new(CsgConfig::default()))
    }

    /// Resolve `spec` in inches with default allowances, then start a builder
    pub fn from_spec(spec: &NominalSpec) -> Result<Self> {
        Ok(Self::new(DimensionResolver::default().resolve(spec)?))
    }
}

impl<K: BooleanKernel> AssemblyBuilder<K> {
    pub fn with_engine(dims: DerivedDimensions, engine: CsgEngine<K>) -> Self {
        Self {
            dims,
            tessellation: Tessellation::default(),
            factory: PrimitiveFactory::new(),
            engine,
            stage: BuildStage::Idle,
            parts: Vec::new(),
        }
    }

    pub fn with_tessellation(mut self, tessellation: Tessellation) -> Self {
        self.tessellation = tessellation;
        self
    }

    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    pub fn dimensions(&self) -> &DerivedDimensions {
        &self.dims
    }

    pub fn engine(&self) -> &CsgEngine<K> {
        &self.engine
    }

    /// Parts made so far; empty after an abort
    pub fn parts(&self) -> &[PlacedSolid] {
        &self.parts
    }

    /// Advance exactly one stage. On failure the builder is `Aborted`, every
    /// part made so far is dropped and the error names the stage and part.
    pub fn step(&mut self) -> Result<BuildStage> {
        let Some(next) = self.stage.next() else {
            return Err(Error::BuilderState {
                stage: self.stage,
                reason: "no further steps",
            });
        };

        let made = match next {
            BuildStage::TubeBuilt => self.build_tube().map(|p| vec![p]),
            BuildStage::InsertsPlaced => self.per_side(Self::build_insert_pair),
            BuildStage::WeldsPlaced => self.per_side(|b, side| b.build_weld(side).map(|p| vec![p])),
            BuildStage::HeimsPlaced => self.per_side(Self::build_heim),
            BuildStage::NutsPlaced => self.per_side(|b, side| b.build_nut(side).map(|p| vec![p])),
            BuildStage::Complete => Ok(Vec::new()),
            BuildStage::Idle | BuildStage::Aborted => Err(Error::BuilderState {
                stage: self.stage,
                reason: "invalid transition",
            }),
        };

        match made {
            Ok(parts) => {
                self.parts.extend(parts);
                self.stage = next;
                info!(stage = %next, parts = self.parts.len(), "stage complete");
                Ok(next)
            }
            Err(err) => {
                warn!(stage = %next, error = %err, "build aborted");
                self.parts.clear();
                self.stage = BuildStage::Aborted;
                Err(err)
            }
        }
    }

    /// Take the finished assembly; only valid once `Complete`
    pub fn finish(self) -> Result<Assembly> {
        if self.stage != BuildStage::Complete {
            return Err(Error::BuilderState {
                stage: self.stage,
                reason: "assembly is not complete",
            });
        }
        Ok(Assembly::new(self.parts, self.dims))
    }

    /// Step through every remaining stage, then finish
    pub fn run(mut self) -> Result<Assembly> {
        while !self.stage.is_terminal() {
            self.step()?;
        }
        self.finish()
    }

    fn per_side<F>(&self, make: F) -> Result<Vec<PlacedSolid>>
    where
        F: Fn(&Self, Side) -> Result<Vec<PlacedSolid>>,
    {
        let mut parts = Vec::new();
        for side in Side::ALL {
            parts.extend(make(self, side)?);
        }
        Ok(parts)
    }

    /// Make one part, tagging any failure with the stage being entered
    fn part<F>(&self, kind: PartKind, side: Option<Side>, make: F) -> Result<PlacedSolid>
    where
        F: FnOnce() -> Result<Solid>,
    {
        let name = kind.part_name(side);
        let stage = self.stage.next().unwrap_or(self.stage);
        let solid = make().map_err(|e| e.at_stage(stage, name.clone()))?;
        debug!(part = %name, volume = solid.volume(), "part made");
        Ok(PlacedSolid::new(kind, side, solid))
    }

    fn build_tube(&self) -> Result<PlacedSolid> {
        let d = &self.dims;
        let n = self.tessellation.round;
        self.part(PartKind::Tube, None, || {
            let place = Placement::along_x(0.0);
            let stock = self.factory.cylinder(d.tube_od / 2.0, d.tube_length, n, place)?;
            let bore = self.factory.cylinder(d.tube_id / 2.0, d.tube_bore_length, n, place)?;
            self.engine.difference(stock, bore)
        })
    }

    fn build_insert_pair(&self, side: Side) -> Result<Vec<PlacedSolid>> {
        let d = &self.dims;
        let n = self.tessellation.round;

        let insert = self.part(PartKind::Insert, Some(side), || {
            let place = Placement::along_x(side.offset(d.insert_center));
            let body = self.factory.cylinder(d.insert_od / 2.0, d.insert_length, n, place)?;
            let bore = self.factory.cylinder(d.insert_id / 2.0, d.insert_bore_length, n, place)?;
            self.engine.difference(body, bore)
        })?;

        let shoulder = self.part(PartKind::InsertShoulder, Some(side), || {
            let place = Placement::along_x(side.offset(d.shoulder_center));
            let ring = self.factory.cylinder(d.shoulder_od / 2.0, d.shoulder_length, n, place)?;
            let bore = self.factory.cylinder(d.insert_id / 2.0, d.shoulder_bore_length, n, place)?;
            self.engine.difference(ring, bore)
        })?;

        Ok(vec![insert, shoulder])
    }

    fn build_weld(&self, side: Side) -> Result<PlacedSolid> {
        let d = &self.dims;
        let t = self.tessellation;
        self.part(PartKind::Weld, Some(side), || {
            self.factory.torus(
                d.weld_major_radius,
                d.weld_minor_radius,
                t.torus_major,
                t.torus_minor,
                Placement::along_x(side.offset(d.weld_center)),
            )
        })
    }

    fn build_heim(&self, side: Side) -> Result<Vec<PlacedSolid>> {
        let d = &self.dims;
        let t = self.tessellation;

        let shank = self.part(PartKind::HeimShank, Some(side), || {
            self.factory.cylinder(
                d.shank_od / 2.0,
                d.shank_length,
                t.hardware,
                Placement::along_x(side.offset(d.shank_center)),
            )
        })?;

        let body = self.part(PartKind::HeimBody, Some(side), || {
            self.factory.cylinder(
                d.body_od / 2.0,
                d.body_length,
                t.hardware,
                Placement::along_x(side.offset(d.body_center)),
            )
        })?;

        // Poles and eye bore both on Z, through the ball center
        let ball = self.part(PartKind::HeimBall, Some(side), || {
            let place = Placement::vertical(side.offset(d.ball_center));
            let ball =
                self.factory.sphere(d.ball_od / 2.0, t.sphere_segments, t.sphere_rings, place)?;
            let eye = self.factory.cylinder(d.eye_id / 2.0, d.eye_bore_length, t.hardware, place)?;
            self.engine.difference(ball, eye)
        })?;

        Ok(vec![shank, body, ball])
    }

    fn build_nut(&self, side: Side) -> Result<PlacedSolid> {
        let d = &self.dims;
        let n = self.tessellation.hardware;
        self.part(PartKind::JamNut, Some(side), || {
            let place = Placement::along_x(side.offset(d.nut_center));
            let hex = self.factory.hex_prism(d.nut_af, d.nut_thickness, place)?;
            let bore = self.factory.cylinder(d.nut_bore_radius, d.nut_bore_length, n, place)?;
            self.engine.difference(hex, bore)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimensions::{resolve, OvercutMargins};

    fn coarse() -> Tessellation {
        Tessellation {
            round: 16,
            hardware: 12,
            torus_major: 16,
            torus_minor: 6,
            sphere_segments: 12,
            sphere_rings: 6,
        }
    }

    #[test]
    fn test_steps_in_order() {
        let dims = resolve(&NominalSpec::default()).unwrap();
        let mut builder = AssemblyBuilder::new(dims).with_tessellation(coarse());
        let expected_parts = [1, 5, 7, 13, 15, 15];
        for (stage, count) in BuildStage::SEQUENCE[1..].iter().zip(expected_parts) {
            assert_eq!(builder.step().unwrap(), *stage);
            assert_eq!(builder.parts().len(), count);
        }
        assert!(builder.step().is_err());
        assert_eq!(builder.stage(), BuildStage::Complete);
    }

    #[test]
    fn test_finish_before_complete_fails() {
        let mut builder = AssemblyBuilder::from_spec(&NominalSpec::default())
            .unwrap()
            .with_tessellation(coarse());
        builder.step().unwrap();
        let err = builder.finish().unwrap_err();
        assert!(matches!(
            err,
            Error::BuilderState {
                stage: BuildStage::TubeBuilt,
                ..
            }
        ));
    }

    #[test]
    fn test_failed_step_aborts_and_drops_parts() {
        let margins = OvercutMargins {
            nut: 0.0,
            ..OvercutMargins::default()
        };
        let dims = DimensionResolver::default()
            .with_margins(margins)
            .resolve(&NominalSpec::default())
            .unwrap();
        let mut builder = AssemblyBuilder::new(dims).with_tessellation(coarse());
        for _ in 0..4 {
            builder.step().unwrap();
        }
        assert_eq!(builder.parts().len(), 13);

        let err = builder.step().unwrap_err();
        assert!(err.is_degenerate_boolean());
        assert_eq!(err.stage(), Some(BuildStage::NutsPlaced));
        assert!(err.to_string().contains("jam_nut_lh"));
        assert_eq!(builder.stage(), BuildStage::Aborted);
        assert!(builder.parts().is_empty());
        assert!(builder.step().is_err());
    }
}
