// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometric primitives generator.
//!
//! Every primitive is built centered on the origin with its axis on +Z and
//! shares vertices between faces, so the meshes are closed and manifold.

use super::{Mesh, Triangle};
use crate::error::{Error, Result};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Geometric primitives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    Cylinder {
        radius: f64,
        length: f64,
        segments: u32,
    },
    Torus {
        major_radius: f64,
        minor_radius: f64,
        major_segments: u32,
        minor_segments: u32,
    },
    Sphere {
        radius: f64,
        segments: u32,
        rings: u32,
    },
}

impl Primitive {
    pub fn cylinder(radius: f64, length: f64, segments: u32) -> Self {
        Self::Cylinder {
            radius,
            length,
            segments,
        }
    }

    pub fn torus(
        major_radius: f64,
        minor_radius: f64,
        major_segments: u32,
        minor_segments: u32,
    ) -> Self {
        Self::Torus {
            major_radius,
            minor_radius,
            major_segments,
            minor_segments,
        }
    }

    pub fn sphere(radius: f64, segments: u32, rings: u32) -> Self {
        Self::Sphere {
            radius,
            segments,
            rings,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cylinder { .. } => "cylinder",
            Self::Torus { .. } => "torus",
            Self::Sphere { .. } => "sphere",
        }
    }

    /// Reject configurations that cannot produce a closed solid
    pub fn validate(&self) -> Result<()> {
        let name = self.name();
        let positive = |label: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::unsupported(
                    name,
                    format!("{label} must be positive, got {value}"),
                ))
            }
        };
        let at_least = |label: &str, value: u32, min: u32| {
            if value >= min {
                Ok(())
            } else {
                Err(Error::unsupported(name, format!("{label} {value} < {min}")))
            }
        };

        match *self {
            Self::Cylinder {
                radius,
                length,
                segments,
            } => {
                positive("radius", radius)?;
                positive("length", length)?;
                at_least("segment count", segments, 3)
            }
            Self::Torus {
                major_radius,
                minor_radius,
                major_segments,
                minor_segments,
            } => {
                positive("major radius", major_radius)?;
                positive("minor radius", minor_radius)?;
                at_least("major segment count", major_segments, 3)?;
                at_least("minor segment count", minor_segments, 3)?;
                if minor_radius >= major_radius {
                    return Err(Error::unsupported(
                        name,
                        format!(
                            "minor radius {minor_radius} >= major radius {major_radius} \
                             self-intersects"
                        ),
                    ));
                }
                Ok(())
            }
            Self::Sphere {
                radius,
                segments,
                rings,
            } => {
                positive("radius", radius)?;
                at_least("segment count", segments, 3)?;
                at_least("ring count", rings, 2)
            }
        }
    }

    pub fn to_mesh(&self) -> Mesh {
        let mut mesh = match *self {
            Self::Cylinder {
                radius,
                length,
                segments,
            } => generate_cylinder_mesh(radius, length, segments),
            Self::Torus {
                major_radius,
                minor_radius,
                major_segments,
                minor_segments,
            } => generate_torus_mesh(major_radius, minor_radius, major_segments, minor_segments),
            Self::Sphere {
                radius,
                segments,
                rings,
            } => generate_sphere_mesh(radius, segments, rings),
        };
        mesh.recompute_normals();
        mesh
    }
}

fn generate_cylinder_mesh(radius: f64, length: f64, segments: u32) -> Mesh {
    let n = segments as usize;
    let half = length / 2.0;
    let mut mesh = Mesh::with_capacity(2 + 2 * n, 4 * n);

    let bottom_center = mesh.add_position(Point3::new(0.0, 0.0, -half));
    let top_center = mesh.add_position(Point3::new(0.0, 0.0, half));

    let mut bottom = Vec::with_capacity(n);
    let mut top = Vec::with_capacity(n);
    for i in 0..n {
        let angle = 2.0 * PI * i as f64 / n as f64;
        let (sin, cos) = angle.sin_cos();
        let (x, y) = (radius * cos, radius * sin);
        bottom.push(mesh.add_position(Point3::new(x, y, -half)));
        top.push(mesh.add_position(Point3::new(x, y, half)));
    }

    for i in 0..n {
        let next = (i + 1) % n;
        let (bi, bn, ti, tn) = (bottom[i], bottom[next], top[i], top[next]);

        mesh.add_triangle(Triangle::new([bottom_center, bn, bi]));
        mesh.add_triangle(Triangle::new([top_center, ti, tn]));

        // Side quad, wound outward
        mesh.add_triangle(Triangle::new([bi, bn, ti]));
        mesh.add_triangle(Triangle::new([ti, bn, tn]));
    }

    mesh
}

fn generate_torus_mesh(
    major_radius: f64,
    minor_radius: f64,
    major_segments: u32,
    minor_segments: u32,
) -> Mesh {
    let (m, n) = (major_segments as usize, minor_segments as usize);
    let mut mesh = Mesh::with_capacity(m * n, 2 * m * n);

    for i in 0..m {
        let theta = 2.0 * PI * i as f64 / m as f64;
        let (sin_t, cos_t) = theta.sin_cos();
        for j in 0..n {
            let phi = 2.0 * PI * j as f64 / n as f64;
            let (sin_p, cos_p) = phi.sin_cos();
            let ring = major_radius + minor_radius * cos_p;
            let z = minor_radius * sin_p;
            mesh.add_position(Point3::new(ring * cos_t, ring * sin_t, z));
        }
    }

    let index = |i: usize, j: usize| (i % m) * n + (j % n);
    for i in 0..m {
        for j in 0..n {
            let a = index(i, j);
            let b = index(i + 1, j);
            let c = index(i + 1, j + 1);
            let d = index(i, j + 1);
            mesh.add_triangle(Triangle::new([a, b, c]));
            mesh.add_triangle(Triangle::new([a, c, d]));
        }
    }

    mesh
}

fn generate_sphere_mesh(radius: f64, segments: u32, rings: u32) -> Mesh {
    let (n, m) = (segments as usize, rings as usize);
    let mut mesh = Mesh::with_capacity(2 + (m - 1) * n, 2 * n * (m - 1));

    let north = mesh.add_position(Point3::new(0.0, 0.0, radius));
    for k in 1..m {
        let phi = PI * k as f64 / m as f64;
        let (rho, z) = (radius * phi.sin(), radius * phi.cos());
        for j in 0..n {
            let theta = 2.0 * PI * j as f64 / n as f64;
            let (sin, cos) = theta.sin_cos();
            mesh.add_position(Point3::new(rho * cos, rho * sin, z));
        }
    }
    let south = mesh.add_position(Point3::new(0.0, 0.0, -radius));

    // Ring k (1-based) vertex j
    let ring = |k: usize, j: usize| 1 + (k - 1) * n + (j % n);

    for j in 0..n {
        mesh.add_triangle(Triangle::new([north, ring(1, j), ring(1, j + 1)]));
    }
    for k in 1..m - 1 {
        for j in 0..n {
            let a = ring(k, j);
            let b = ring(k + 1, j);
            let c = ring(k + 1, j + 1);
            let d = ring(k, j + 1);
            mesh.add_triangle(Triangle::new([a, b, c]));
            mesh.add_triangle(Triangle::new([a, c, d]));
        }
    }
    for j in 0..n {
        mesh.add_triangle(Triangle::new([south, ring(m - 1, j + 1), ring(m - 1, j)]));
    }

    mesh
}
