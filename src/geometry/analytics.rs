// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry analytics and statistics

use super::mesh_utils::is_closed;
use super::{BoundingBox, Mesh};
use crate::utils::math::triangle_area;
use serde::{Deserialize, Serialize};

/// Geometry statistics and analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryStats {
    /// Enclosed volume in cubic meters
    pub volume: f64,
    /// Total surface area in square meters
    pub surface_area: f64,
    pub bbox: BoundingBox,
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Every edge shared by exactly two triangles. Boolean results keep
    /// T-junctions from polygon splitting, so they usually report false.
    pub is_watertight: bool,
}

impl GeometryStats {
    pub fn empty() -> Self {
        Self {
            volume: 0.0,
            surface_area: 0.0,
            bbox: BoundingBox::empty(),
            vertex_count: 0,
            triangle_count: 0,
            is_watertight: false,
        }
    }
}

/// Analyze mesh geometry and compute statistics
pub fn analyze(mesh: &Mesh) -> GeometryStats {
    if mesh.vertices.is_empty() || mesh.triangles.is_empty() {
        return GeometryStats::empty();
    }

    GeometryStats {
        volume: signed_volume(mesh),
        surface_area: surface_area(mesh),
        bbox: mesh.bounding_box(),
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
        is_watertight: is_closed(mesh),
    }
}

/// Signed volume from the divergence theorem; positive for outward winding
pub fn signed_volume(mesh: &Mesh) -> f64 {
    mesh.triangles
        .iter()
        .map(|triangle| {
            let [v0, v1, v2] = mesh.triangle_positions(triangle);
            v0.coords.dot(&v1.coords.cross(&v2.coords)) / 6.0
        })
        .sum()
}

/// Calculate total surface area
pub fn surface_area(mesh: &Mesh) -> f64 {
    mesh.triangles
        .iter()
        .map(|triangle| {
            let [v0, v1, v2] = mesh.triangle_positions(triangle);
            triangle_area(&v0, &v1, &v2)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;
    use crate::utils::math::regular_polygon_area;

    #[test]
    fn test_analyze_hex_prism() {
        let mesh = Primitive::cylinder(1.0, 2.0, 6).to_mesh();
        let stats = analyze(&mesh);

        let cap = regular_polygon_area(1.0, 6);
        assert!((stats.volume - 2.0 * cap).abs() < 1e-9);
        // Two caps plus six 1 x 2 side faces
        assert!((stats.surface_area - (2.0 * cap + 12.0)).abs() < 1e-9);
        assert!(stats.is_watertight);
        assert_eq!(stats.triangle_count, 24);
    }

    #[test]
    fn test_empty_mesh() {
        let stats = analyze(&Mesh::empty());
        assert_eq!(stats, GeometryStats::empty());
    }
}
