// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! STL sink

use super::GeometrySink;
use crate::assembly::Assembly;
use crate::utils::math::calculate_triangle_normal;
use crate::utils::units::METERS_PER_MILLIMETER;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};

/// Writes every part, placed in world space, to one binary STL in millimeters
#[derive(Debug, Clone)]
pub struct StlSink {
    path: PathBuf,
}

impl StlSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GeometrySink for StlSink {
    fn accept(&mut self, assembly: &Assembly) -> Result<()> {
        let scale = 1.0 / METERS_PER_MILLIMETER;
        let mut triangles = Vec::new();

        for part in assembly.parts() {
            let mesh = part.solid.world_mesh();
            for tri in &mesh.triangles {
                let [p0, p1, p2] = mesh.triangle_positions(tri);
                let n = calculate_triangle_normal(&p0, &p1, &p2);
                let vertex = |p: nalgebra::Point3<f64>| {
                    let p = p * scale;
                    StlVertex::new([p.x as f32, p.y as f32, p.z as f32])
                };
                triangles.push(StlTriangle {
                    normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                    vertices: [vertex(p0), vertex(p1), vertex(p2)],
                });
            }
        }

        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create STL file: {:?}", self.path))?;
        let mut writer = BufWriter::new(file);
        stl_io::write_stl(&mut writer, triangles.iter()).context("Failed to write STL file")?;
        tracing::info!(path = ?self.path, triangles = triangles.len(), "wrote stl");
        Ok(())
    }
}
