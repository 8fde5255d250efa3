// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Finished assembly and its serializable manifest

use super::{MaterialTag, PartKind, PlacedSolid, Side};
use crate::dimensions::DerivedDimensions;
use crate::geometry::{analyze, BoundingBox, GeometryStats, Placement, SolidDescriptor};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Ordered, complete part list produced by a successful build
#[derive(Debug)]
pub struct Assembly {
    parts: Vec<PlacedSolid>,
    dimensions: DerivedDimensions,
}

impl Assembly {
    pub(crate) fn new(parts: Vec<PlacedSolid>, dimensions: DerivedDimensions) -> Self {
        Self { parts, dimensions }
    }

    pub fn parts(&self) -> &[PlacedSolid] {
        &self.parts
    }

    pub fn part(&self, name: &str) -> Option<&PlacedSolid> {
        self.parts.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn dimensions(&self) -> &DerivedDimensions {
        &self.dimensions
    }

    /// World-space bounds of every part
    pub fn bounds(&self) -> BoundingBox {
        self.parts
            .iter()
            .fold(BoundingBox::empty(), |acc, p| {
                acc.union(&p.solid.world_bounds())
            })
    }

    /// SHA-256 over names, tags, placements and the exact bits of every mesh.
    /// Two builds from one spec produce the same digest.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for part in &self.parts {
            hasher.update(part.name.as_bytes());
            hasher.update(part.material.as_str().as_bytes());
            let placement = part.placement();
            hasher.update(placement.offset.to_le_bytes());
            hasher.update([placement.axis.index() as u8]);

            let mesh = part.solid.mesh();
            hasher.update((mesh.vertex_count() as u64).to_le_bytes());
            for vertex in &mesh.vertices {
                for c in vertex.position.coords.iter() {
                    hasher.update(c.to_le_bytes());
                }
            }
            for tri in &mesh.triangles {
                for i in tri.indices {
                    hasher.update((i as u64).to_le_bytes());
                }
            }
        }

        hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    pub fn manifest(&self) -> AssemblyManifest {
        AssemblyManifest {
            fingerprint: self.fingerprint(),
            dimensions: self.dimensions.clone(),
            parts: self
                .parts
                .iter()
                .map(|p| PartRecord {
                    name: p.name.clone(),
                    kind: p.kind,
                    side: p.side,
                    material: p.material,
                    placement: p.placement(),
                    descriptor: p.solid.descriptor().clone(),
                    stats: analyze(&p.solid.world_mesh()),
                })
                .collect(),
        }
    }
}

/// Manifest entry for one part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRecord {
    pub name: String,
    pub kind: PartKind,
    pub side: Option<Side>,
    pub material: MaterialTag,
    pub placement: Placement,
    pub descriptor: SolidDescriptor,
    pub stats: GeometryStats,
}

/// Serializable description of a build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyManifest {
    pub fingerprint: String,
    pub dimensions: DerivedDimensions,
    pub parts: Vec<PartRecord>,
}
