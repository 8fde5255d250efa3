// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities

use nalgebra::{Point3, Vector3};

/// Calculate the normal of a triangle given three vertices
pub fn calculate_triangle_normal(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    p2: &Point3<f64>,
) -> Vector3<f64> {
    let v1 = p1 - p0;
    let v2 = p2 - p0;
    let n = v1.cross(&v2);
    let len = n.norm();
    if len > f64::EPSILON {
        n / len
    } else {
        Vector3::zeros()
    }
}

/// Area of a triangle
pub fn triangle_area(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> f64 {
    (p1 - p0).cross(&(p2 - p0)).norm() * 0.5
}

/// Area of a regular polygon with `segments` sides inscribed in `radius`
pub fn regular_polygon_area(radius: f64, segments: u32) -> f64 {
    let n = segments as f64;
    0.5 * n * radius * radius * (2.0 * std::f64::consts::PI / n).sin()
}
