// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end assembly build tests

use anyhow::Result;
use approx::assert_relative_eq;
use std::cell::RefCell;
use tierod::dimensions::{DimensionResolver, OvercutMargins};
use tierod::geometry::{Axis, BooleanKernel, BspKernel, CsgConfig, CsgEngine, Mesh};
use tierod::utils::units::in_to_m;
use tierod::utils::Unit;
use tierod::{
    AssemblyBuilder, BuildStage, FitCheck, MaterialTag, NominalSpec, RodConfig, Side, Tessellation,
};

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

fn coarse_config() -> RodConfig {
    RodConfig {
        tessellation: coarse(),
        ..RodConfig::default()
    }
}

const PART_ORDER: [&str; 15] = [
    "tube",
    "insert_lh",
    "insert_shoulder_lh",
    "insert_rh",
    "insert_shoulder_rh",
    "weld_lh",
    "weld_rh",
    "heim_shank_lh",
    "heim_body_lh",
    "heim_ball_lh",
    "heim_shank_rh",
    "heim_body_rh",
    "heim_ball_rh",
    "jam_nut_lh",
    "jam_nut_rh",
];

#[test]
fn test_default_rod_has_fifteen_parts_in_order() -> Result<()> {
    let assembly = tierod::build_with_config(&coarse_config())?;
    let names: Vec<&str> = assembly.parts().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, PART_ORDER);

    for part in assembly.parts() {
        assert!(part.solid.volume() > 0.0, "{} has no volume", part.name);
    }
    assert_eq!(
        assembly.part("tube").map(|p| p.material),
        Some(MaterialTag::SteelTube)
    );
    assert_eq!(
        assembly.part("weld_rh").map(|p| p.material),
        Some(MaterialTag::WeldBead)
    );
    assert_eq!(
        assembly.part("heim_ball_lh").map(|p| p.material),
        Some(MaterialTag::ChromeHeim)
    );
    Ok(())
}

#[test]
fn test_full_tessellation_build() -> Result<()> {
    let assembly = tierod::build(&NominalSpec::default())?;
    assert_eq!(assembly.len(), 15);

    let tube = assembly
        .part("tube")
        .map(|p| p.solid.volume())
        .unwrap_or_default();
    let d = assembly.dimensions();
    let annulus =
        std::f64::consts::PI / 4.0 * (d.tube_od.powi(2) - d.tube_id.powi(2)) * d.tube_length;
    // 64-gon is inscribed: slightly under the round annulus
    assert!(
        tube < annulus && tube > annulus * 0.99,
        "tube volume {tube} vs {annulus}"
    );
    Ok(())
}

#[test]
fn test_left_and_right_ends_mirror_exactly() -> Result<()> {
    let assembly = tierod::build_with_config(&coarse_config())?;

    for lh in assembly.parts().iter().filter(|p| p.side == Some(Side::Lh)) {
        let rh_name = lh.kind.part_name(Some(Side::Rh));
        let rh = assembly
            .part(&rh_name)
            .ok_or_else(|| anyhow::anyhow!("missing {rh_name}"))?;

        assert_eq!(lh.placement().offset, -rh.placement().offset, "{}", lh.name);
        assert_eq!(lh.placement().axis, rh.placement().axis);
        assert_eq!(
            lh.solid.mesh(),
            rh.solid.mesh(),
            "{} local mesh differs",
            lh.name
        );

        let (l0, l1) = lh.solid.world_bounds().span(Axis::X);
        let (r0, r1) = rh.solid.world_bounds().span(Axis::X);
        assert_relative_eq!(l0, -r1, epsilon = 1e-12);
        assert_relative_eq!(l1, -r0, epsilon = 1e-12);
    }
    Ok(())
}

#[test]
fn test_insert_center_with_zero_engagement() -> Result<()> {
    let config = RodConfig {
        nominal: NominalSpec {
            insert_engagement: 0.0,
            ..NominalSpec::default()
        },
        ..coarse_config()
    };
    let assembly = tierod::build_with_config(&config)?;
    let rh = assembly
        .part("insert_rh")
        .map(|p| p.placement().offset)
        .unwrap_or_default();
    assert_relative_eq!(rh, in_to_m(11.75), epsilon = 1e-12);
    Ok(())
}

#[test]
fn test_millimeter_rod_matches_inch_rod() -> Result<()> {
    // Only the nominal section is written; allowances and margins default in mm
    let text = format!(
        "unit = \"mm\"\n\n[nominal]\n{}",
        toml::to_string(&NominalSpec::in_unit(Unit::Mm))?
    );
    let mut config: RodConfig = toml::from_str(&text)?;
    config.tessellation = coarse();

    let mm = tierod::build_with_config(&config)?;
    let inch = tierod::build_with_config(&coarse_config())?;
    assert_eq!(mm.len(), 15);
    for (a, b) in mm.parts().iter().zip(inch.parts()) {
        assert_eq!(a.name, b.name);
        assert_relative_eq!(a.placement().offset, b.placement().offset, epsilon = 1e-12);
        assert_relative_eq!(a.solid.volume(), b.solid.volume(), max_relative = 1e-6);
    }
    Ok(())
}

#[test]
fn test_rebuilds_are_identical() -> Result<()> {
    let config = coarse_config();
    let first = tierod::build_with_config(&config)?;
    let second = tierod::build_with_config(&config)?;
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.manifest(), second.manifest());
    assert_eq!(first.fingerprint().len(), 64);
    Ok(())
}

#[test]
fn test_different_specs_fingerprint_differently() -> Result<()> {
    let base = tierod::build_with_config(&coarse_config())?;
    let mut longer = coarse_config();
    longer.nominal.tube_length = 24.0;
    let longer = tierod::build_with_config(&longer)?;
    assert_ne!(base.fingerprint(), longer.fingerprint());
    Ok(())
}

#[test]
fn test_zero_wall_is_rejected_before_any_geometry() {
    let spec = NominalSpec {
        tube_wall: 0.0,
        ..NominalSpec::default()
    };
    let err = tierod::build(&spec).unwrap_err();
    assert!(err.is_invalid_dimension());
    assert_eq!(err.fit_check(), Some(FitCheck::TubeWall));
    assert!(err.stage().is_none());
}

#[test]
fn test_missing_shank_is_rejected_before_any_geometry() {
    let spec = NominalSpec {
        heim_shank_od: 0.0,
        ..NominalSpec::default()
    };
    let err = tierod::build(&spec).unwrap_err();
    assert!(err.is_invalid_dimension());
    assert_eq!(err.fit_check(), Some(FitCheck::PositiveLength));
    assert!(err.stage().is_none());
}

#[test]
fn test_flush_tube_bore_aborts_first_stage() {
    let mut config = coarse_config();
    config.margins.tube = 0.0;
    let mut builder = config.builder().unwrap();

    let err = builder.step().unwrap_err();
    assert!(err.is_degenerate_boolean());
    assert_eq!(err.stage(), Some(BuildStage::TubeBuilt));
    assert!(err.to_string().contains("`tube`"));
    assert_eq!(builder.stage(), BuildStage::Aborted);
    assert!(builder.parts().is_empty());
    assert!(builder.finish().is_err());
}

/// Records every boolean it is handed and checks the cutter runs through
/// the target along the local primitive axis
#[derive(Default)]
struct RecordingKernel {
    overcuts: RefCell<Vec<f64>>,
}

impl BooleanKernel for RecordingKernel {
    fn difference(&self, target: &Mesh, cutter: &Mesh) -> tierod::Result<Mesh> {
        let t = target.bounding_box();
        let c = cutter.bounding_box();
        assert!(
            c.min.z < t.min.z && c.max.z > t.max.z,
            "cutter does not pass through"
        );
        self.overcuts
            .borrow_mut()
            .push(c.extent(Axis::Z) - t.extent(Axis::Z));
        BspKernel::default().difference(target, cutter)
    }
}

fn recording_builder(margins: OvercutMargins) -> AssemblyBuilder<RecordingKernel> {
    let dims = DimensionResolver::default()
        .with_margins(margins)
        .resolve(&NominalSpec::default())
        .unwrap();
    let engine = CsgEngine::with_kernel(RecordingKernel::default(), CsgConfig::default());
    AssemblyBuilder::with_engine(dims, engine)
        .with_tessellation(coarse())
}

#[test]
fn test_every_cutter_overcuts_its_target() {
    let mut builder = recording_builder(OvercutMargins::default());
    while !builder.stage().is_terminal() {
        builder.step().unwrap();
    }
    assert_eq!(builder.stage(), BuildStage::Complete);

    let overcuts = builder.engine().kernel().overcuts.borrow().clone();
    // tube, 2 x (insert, shoulder), 2 x ball, 2 x nut
    assert_eq!(overcuts.len(), 9);
    let min_overcut = CsgConfig::default().min_overcut;
    for overcut in overcuts {
        assert!(overcut >= min_overcut - 1e-9, "overcut {overcut}");
    }
}

#[test]
fn test_undercut_never_reaches_the_kernel() {
    let margins = OvercutMargins {
        insert: 0.05,
        ..OvercutMargins::default()
    };
    let mut builder = recording_builder(margins);
    builder.step().unwrap();

    let err = builder.step().unwrap_err();
    assert!(err.is_degenerate_boolean());
    assert_eq!(err.stage(), Some(BuildStage::InsertsPlaced));
    assert!(err.to_string().contains("insert_lh"));
    // Only the tube bore was handed over
    assert_eq!(builder.engine().kernel().overcuts.borrow().len(), 1);
    assert!(builder.parts().is_empty());
}
