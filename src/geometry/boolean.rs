// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boolean difference with overcut and containment rules.
//!
//! [`CsgEngine`] owns the rules; the mesh arithmetic sits behind
//! [`BooleanKernel`] so tests can swap in a recording double.

use super::analytics::signed_volume;
use super::csg::csg_difference;
use super::{Axis, BoundingBox, Mesh, Solid};
use crate::error::{Error, Result};
use crate::utils::units::in_to_m;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Mesh-level difference
pub trait BooleanKernel {
    /// `target - cutter`, both meshes in the same frame
    fn difference(&self, target: &Mesh, cutter: &Mesh) -> Result<Mesh>;
}

/// BSP-tree kernel
#[derive(Debug, Clone, Copy)]
pub struct BspKernel {
    pub epsilon: f64,
}

impl Default for BspKernel {
    fn default() -> Self {
        Self { epsilon: 1e-9 }
    }
}

impl BooleanKernel for BspKernel {
    fn difference(&self, target: &Mesh, cutter: &Mesh) -> Result<Mesh> {
        Ok(csg_difference(target, cutter, self.epsilon))
    }
}

/// Boolean rule settings, meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsgConfig {
    /// Minimum by which a cutter must outgrow its target along its axis
    pub min_overcut: f64,
    /// Slack applied to every span comparison
    pub tolerance: f64,
}

impl Default for CsgConfig {
    fn default() -> Self {
        Self {
            min_overcut: in_to_m(0.1),
            tolerance: 1e-9,
        }
    }
}

/// Why a boolean was refused
#[derive(Debug, Clone, PartialEq)]
pub enum DegenerateReason {
    /// Cutter does not pass through the target on its own axis
    Undercut {
        axis: Axis,
        cutter: (f64, f64),
        target: (f64, f64),
        min_overcut: f64,
    },
    /// Cutter breaks out of the target's side walls
    Uncontained {
        axis: Axis,
        cutter: (f64, f64),
        target: (f64, f64),
    },
    EmptyResult,
    NothingRemoved {
        target_volume: f64,
        result_volume: f64,
    },
}

impl fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undercut {
                axis,
                cutter,
                target,
                min_overcut,
            } => write!(
                f,
                "undercut on {axis}: cutter [{:.6}, {:.6}] must clear target [{:.6}, {:.6}] by {:.6} m in total",
                cutter.0, cutter.1, target.0, target.1, min_overcut
            ),
            Self::Uncontained { axis, cutter, target } => write!(
                f,
                "cutter [{:.6}, {:.6}] leaves target [{:.6}, {:.6}] on {axis}",
                cutter.0, cutter.1, target.0, target.1
            ),
            Self::EmptyResult => f.write_str("result is empty"),
            Self::NothingRemoved {
                target_volume,
                result_volume,
            } => write!(
                f,
                "nothing removed (target {target_volume:.9} m^3, result {result_volume:.9} m^3)"
            ),
        }
    }
}

/// Checked boolean difference over solids
#[derive(Debug, Clone, Default)]
pub struct CsgEngine<K: BooleanKernel = BspKernel> {
    kernel: K,
    config: CsgConfig,
}

impl CsgEngine<BspKernel> {
    pub fn new(config: CsgConfig) -> Self {
        Self::with_kernel(BspKernel::default(), config)
    }
}

impl<K: BooleanKernel> CsgEngine<K> {
    pub fn with_kernel(kernel: K, config: CsgConfig) -> Self {
        Self { kernel, config }
    }

    pub fn config(&self) -> &CsgConfig {
        &self.config
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// `target - cutter`. Both operands are consumed; the result keeps the
    /// target's placement.
    pub fn difference(&self, target: Solid, cutter: Solid) -> Result<Solid> {
        let operation = format!(
            "{} - {}",
            target.descriptor().summary(),
            cutter.descriptor().summary()
        );

        let (target_bounds, cutter_bounds) = (target.world_bounds(), cutter.world_bounds());
        let axis = cutter.placement().axis;
        if let Err(reason) = self.check_operands(&target_bounds, &cutter_bounds, axis) {
            warn!(%operation, %reason, "boolean rejected");
            return Err(Error::DegenerateBoolean { operation, reason });
        }

        // Run in the target's frame so its mesh is used untouched
        let to_local = target.transform().inverse();
        let cutter_local = cutter.mesh().transformed(&(to_local * cutter.transform()));
        let result = self.kernel.difference(target.mesh(), &cutter_local)?;

        let target_volume = target.volume();
        let result_volume = signed_volume(&result);
        debug!(
            %operation,
            target_volume,
            result_volume,
            triangles = result.triangle_count(),
            "boolean difference"
        );

        let tolerance = self.config.tolerance;
        let reason = if result.is_empty() || result_volume <= target_volume * tolerance {
            Some(DegenerateReason::EmptyResult)
        } else if result_volume >= target_volume * (1.0 - tolerance) {
            Some(DegenerateReason::NothingRemoved {
                target_volume,
                result_volume,
            })
        } else {
            None
        };
        if let Some(reason) = reason {
            warn!(%operation, %reason, "boolean rejected");
            return Err(Error::DegenerateBoolean { operation, reason });
        }

        Ok(Solid::from_difference(target, cutter, result))
    }

    /// Overcut along `axis`, then containment across it
    fn check_operands(
        &self,
        target: &BoundingBox,
        cutter: &BoundingBox,
        axis: Axis,
    ) -> std::result::Result<(), DegenerateReason> {
        let tol = self.config.tolerance;

        let (c0, c1) = cutter.span(axis);
        let (t0, t1) = target.span(axis);
        let overcut = (c1 - c0) - (t1 - t0);
        if !(c0 < t0 && c1 > t1 && overcut >= self.config.min_overcut - tol) {
            return Err(DegenerateReason::Undercut {
                axis,
                cutter: (c0, c1),
                target: (t0, t1),
                min_overcut: self.config.min_overcut,
            });
        }

        for side in axis.perpendicular() {
            let (c0, c1) = cutter.span(side);
            let (t0, t1) = target.span(side);
            if !(c0 > t0 + tol && c1 < t1 - tol) {
                return Err(DegenerateReason::Uncontained {
                    axis: side,
                    cutter: (c0, c1),
                    target: (t0, t1),
                });
            }
        }

        Ok(())
    }
}
