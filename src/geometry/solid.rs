// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Immutable solid handles.
//!
//! A [`Solid`] owns its mesh in local coordinates plus the [`Placement`] that
//! puts it on the tie rod axis. Solids are not `Clone`: a boolean consumes its
//! operands, so a cutter cannot be reused by accident.

use super::analytics::signed_volume;
use super::{BoundingBox, Mesh, Primitive};
use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// Principal axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    pub fn unit_vector(self) -> Unit<Vector3<f64>> {
        match self {
            Self::X => Vector3::x_axis(),
            Self::Y => Vector3::y_axis(),
            Self::Z => Vector3::z_axis(),
        }
    }

    /// The two axes orthogonal to this one
    pub fn perpendicular(self) -> [Axis; 2] {
        match self {
            Self::X => [Self::Y, Self::Z],
            Self::Y => [Self::X, Self::Z],
            Self::Z => [Self::X, Self::Y],
        }
    }

    /// Rotation taking the canonical primitive axis (+Z) onto this axis
    pub fn rotation_from_z(self) -> UnitQuaternion<f64> {
        match self {
            Self::X => UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2),
            Self::Y => UnitQuaternion::from_axis_angle(&Vector3::x_axis(), -FRAC_PI_2),
            Self::Z => UnitQuaternion::identity(),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("X"),
            Self::Y => f.write_str("Y"),
            Self::Z => f.write_str("Z"),
        }
    }
}

/// Position on the shared longitudinal X axis plus primitive orientation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Center along X, meters from the tube midpoint
    pub offset: f64,
    /// World axis the primitive's own axis is turned onto
    pub axis: Axis,
}

impl Placement {
    pub fn new(offset: f64, axis: Axis) -> Self {
        Self { offset, axis }
    }

    /// Round stock lying along the tie rod
    pub fn along_x(offset: f64) -> Self {
        Self::new(offset, Axis::X)
    }

    /// Cross-drilled features such as the heim eye
    pub fn vertical(offset: f64) -> Self {
        Self::new(offset, Axis::Z)
    }

    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.axis.rotation_from_z()
    }

    /// Local to world transform
    pub fn isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::new(self.offset, 0.0, 0.0), self.rotation())
    }
}

/// Parametric record of how a solid was made
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SolidDescriptor {
    Primitive {
        primitive: Primitive,
        placement: Placement,
    },
    Difference {
        target: Box<SolidDescriptor>,
        cutter: Box<SolidDescriptor>,
    },
}

impl SolidDescriptor {
    /// One-line form used in logs and error messages
    pub fn summary(&self) -> String {
        match self {
            Self::Primitive {
                primitive,
                placement,
            } => {
                let shape = match primitive {
                    Primitive::Cylinder {
                        radius,
                        length,
                        segments,
                    } => format!("cylinder(r={radius:.6}, l={length:.6}, n={segments})"),
                    Primitive::Torus {
                        major_radius,
                        minor_radius,
                        ..
                    } => format!("torus(R={major_radius:.6}, r={minor_radius:.6})"),
                    Primitive::Sphere { radius, .. } => format!("sphere(r={radius:.6})"),
                };
                format!("{shape}@{}{:+.6}", placement.axis, placement.offset)
            }
            Self::Difference { target, cutter } => {
                format!("({} - {})", target.summary(), cutter.summary())
            }
        }
    }

    /// Number of boolean operations in the history
    pub fn boolean_depth(&self) -> usize {
        match self {
            Self::Primitive { .. } => 0,
            Self::Difference { target, cutter } => {
                1 + target.boolean_depth() + cutter.boolean_depth()
            }
        }
    }
}

/// Opaque, immutable solid body
#[derive(Debug)]
pub struct Solid {
    descriptor: SolidDescriptor,
    placement: Placement,
    mesh: Mesh,
}

impl Solid {
    pub(crate) fn from_primitive(primitive: Primitive, placement: Placement) -> Self {
        let mesh = primitive.to_mesh();
        Self {
            descriptor: SolidDescriptor::Primitive {
                primitive,
                placement,
            },
            placement,
            mesh,
        }
    }

    /// Result of `target - cutter`; `local_mesh` is in the target's frame.
    /// Both operands are consumed here.
    pub(crate) fn from_difference(target: Solid, cutter: Solid, local_mesh: Mesh) -> Self {
        Self {
            descriptor: SolidDescriptor::Difference {
                target: Box::new(target.descriptor),
                cutter: Box::new(cutter.descriptor),
            },
            placement: target.placement,
            mesh: local_mesh,
        }
    }

    pub fn descriptor(&self) -> &SolidDescriptor {
        &self.descriptor
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Mesh in local coordinates
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn transform(&self) -> Isometry3<f64> {
        self.placement.isometry()
    }

    /// Mesh in world coordinates
    pub fn world_mesh(&self) -> Mesh {
        self.mesh.transformed(&self.transform())
    }

    pub fn world_bounds(&self) -> BoundingBox {
        let iso = self.transform();
        let mut bbox = BoundingBox::empty();
        for vertex in &self.mesh.vertices {
            bbox.expand_to_include(&(iso * vertex.position));
        }
        bbox
    }

    /// Enclosed volume; rigid placement does not change it
    pub fn volume(&self) -> f64 {
        signed_volume(&self.mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_x_rotation_maps_z_onto_x() {
        let v = Axis::X.rotation_from_z() * Vector3::z();
        assert!((v - Vector3::x()).norm() < 1e-12);
        let v = Axis::Y.rotation_from_z() * Vector3::z();
        assert!((v - Vector3::y()).norm() < 1e-12);
    }

    #[test]
    fn test_world_bounds_follow_placement() {
        let solid =
            Solid::from_primitive(Primitive::cylinder(1.0, 4.0, 32), Placement::along_x(-10.0));
        let bbox = solid.world_bounds();
        assert!((bbox.min.x + 12.0).abs() < 1e-9);
        assert!((bbox.max.x + 8.0).abs() < 1e-9);
        assert!((bbox.extent(Axis::Y) - 2.0).abs() < 1e-2);
    }

    #[test]
    fn test_descriptor_summary() {
        let solid = Solid::from_primitive(Primitive::sphere(0.5, 8, 4), Placement::vertical(1.5));
        let summary = solid.descriptor().summary();
        assert!(summary.starts_with("sphere(r=0.500000)@Z+1.5"), "{summary}");
        assert_eq!(solid.descriptor().boolean_depth(), 0);
    }
}
