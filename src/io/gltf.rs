// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! GLTF/GLB sink with PBR materials

use super::GeometrySink;
use crate::assembly::{Assembly, MaterialTag};
use crate::geometry::Mesh;
use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

const GLB_MAGIC: u32 = 0x46546C67; // "glTF"
const CHUNK_JSON: u32 = 0x4E4F534A; // "JSON"
const CHUNK_BIN: u32 = 0x004E4942; // "BIN\0"

const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// Metallic-roughness material
#[derive(Debug, Clone, PartialEq)]
pub struct PbrMaterial {
    pub name: String,
    pub base_color: [f32; 3],
    pub metallic: f32,
    pub roughness: f32,
}

impl PbrMaterial {
    pub fn new(
        name: impl Into<String>,
        base_color: [f32; 3],
        metallic: f32,
        roughness: f32,
    ) -> Self {
        Self {
            name: name.into(),
            base_color,
            metallic,
            roughness,
        }
    }

    fn to_json(&self) -> Value {
        let [r, g, b] = self.base_color;
        json!({
            "name": self.name,
            "pbrMetallicRoughness": {
                "baseColorFactor": [r, g, b, 1.0],
                "metallicFactor": self.metallic,
                "roughnessFactor": self.roughness
            }
        })
    }
}

/// Resolves material tags to appearance
#[derive(Debug, Clone)]
pub struct MaterialLibrary {
    materials: HashMap<MaterialTag, PbrMaterial>,
}

impl Default for MaterialLibrary {
    /// Studio look: dark DOM steel, chrome heims, rough weld
    fn default() -> Self {
        let mut library = Self {
            materials: HashMap::new(),
        };
        let presets = [
            (MaterialTag::SteelTube, "DOM_Steel", [0.32, 0.34, 0.37], 1.0, 0.28),
            (MaterialTag::InsertSteel, "Insert_Steel", [0.22, 0.24, 0.27], 1.0, 0.35),
            (MaterialTag::ChromeHeim, "Heim_Chrome", [0.55, 0.57, 0.60], 1.0, 0.12),
            (MaterialTag::WeldBead, "Weld_Bead", [0.28, 0.26, 0.23], 0.85, 0.65),
            (MaterialTag::NutSteel, "Nut_Steel", [0.20, 0.22, 0.25], 1.0, 0.4),
        ];
        for (tag, name, color, metallic, roughness) in presets {
            library.set(tag, PbrMaterial::new(name, color, metallic, roughness));
        }
        library
    }
}

impl MaterialLibrary {
    pub fn set(&mut self, tag: MaterialTag, material: PbrMaterial) {
        self.materials.insert(tag, material);
    }

    /// Material for `tag`, or a neutral grey named after the tag
    pub fn get(&self, tag: MaterialTag) -> PbrMaterial {
        self.materials
            .get(&tag)
            .cloned()
            .unwrap_or_else(|| PbrMaterial::new(tag.as_str(), [0.5, 0.5, 0.5], 0.0, 0.5))
    }
}

/// Writes `.gltf` with an embedded base64 buffer, or `.glb`
#[derive(Debug, Clone)]
pub struct GltfSink {
    path: PathBuf,
    binary: bool,
    library: MaterialLibrary,
}

impl GltfSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            binary: false,
            library: MaterialLibrary::default(),
        }
    }

    pub fn binary(path: impl Into<PathBuf>) -> Self {
        Self {
            binary: true,
            ..Self::new(path)
        }
    }

    pub fn with_materials(mut self, library: MaterialLibrary) -> Self {
        self.library = library;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GeometrySink for GltfSink {
    fn accept(&mut self, assembly: &Assembly) -> Result<()> {
        let (mut document, buffer) = build_document(assembly, &self.library);

        let bytes = if self.binary {
            document["buffers"] = json!([{ "byteLength": buffer.len() }]);
            encode_glb(&document, &buffer)?
        } else {
            document["buffers"] = json!([{
                "byteLength": buffer.len(),
                "uri": format!("data:application/octet-stream;base64,{}", STANDARD.encode(&buffer))
            }]);
            serde_json::to_vec_pretty(&document).context("Failed to serialize GLTF")?
        };

        std::fs::write(&self.path, bytes)
            .with_context(|| format!("Failed to write GLTF file: {:?}", self.path))?;
        tracing::info!(path = ?self.path, parts = assembly.len(), "wrote gltf");
        Ok(())
    }
}

/// Views written for one mesh, as accessor indices
struct MeshAccessors {
    position: usize,
    normal: usize,
    indices: usize,
}

fn push_mesh(
    mesh: &Mesh,
    buffer: &mut Vec<u8>,
    views: &mut Vec<Value>,
    accessors: &mut Vec<Value>,
) -> MeshAccessors {
    let bbox = mesh.bounding_box();
    let mut view = |buffer: &mut Vec<u8>, start: usize, target: u32| {
        views.push(json!({
            "buffer": 0,
            "byteOffset": start,
            "byteLength": buffer.len() - start,
            "target": target
        }));
        views.len() - 1
    };

    let start = buffer.len();
    for v in &mesh.vertices {
        for c in v.position.coords.iter() {
            buffer.extend_from_slice(&(*c as f32).to_le_bytes());
        }
    }
    let position_view = view(buffer, start, ARRAY_BUFFER);

    let start = buffer.len();
    for v in &mesh.vertices {
        for c in v.normal.iter() {
            buffer.extend_from_slice(&(*c as f32).to_le_bytes());
        }
    }
    let normal_view = view(buffer, start, ARRAY_BUFFER);

    let start = buffer.len();
    for tri in &mesh.triangles {
        for i in tri.indices {
            buffer.extend_from_slice(&(i as u32).to_le_bytes());
        }
    }
    let index_view = view(buffer, start, ELEMENT_ARRAY_BUFFER);

    accessors.push(json!({
        "bufferView": position_view,
        "componentType": FLOAT,
        "count": mesh.vertex_count(),
        "type": "VEC3",
        "min": [bbox.min.x as f32, bbox.min.y as f32, bbox.min.z as f32],
        "max": [bbox.max.x as f32, bbox.max.y as f32, bbox.max.z as f32]
    }));
    accessors.push(json!({
        "bufferView": normal_view,
        "componentType": FLOAT,
        "count": mesh.vertex_count(),
        "type": "VEC3"
    }));
    accessors.push(json!({
        "bufferView": index_view,
        "componentType": UNSIGNED_INT,
        "count": mesh.triangle_count() * 3,
        "type": "SCALAR"
    }));

    let base = accessors.len() - 3;
    MeshAccessors {
        position: base,
        normal: base + 1,
        indices: base + 2,
    }
}

/// GLTF JSON minus `buffers`, plus the binary payload. Meshes stay in local
/// coordinates; each node carries the part's placement.
fn build_document(assembly: &Assembly, library: &MaterialLibrary) -> (Value, Vec<u8>) {
    let mut buffer = Vec::new();
    let mut views = Vec::new();
    let mut accessors = Vec::new();
    let mut meshes = Vec::new();
    let mut nodes = Vec::new();

    let mut material_slots: Vec<MaterialTag> = Vec::new();
    let mut materials = Vec::new();

    for (i, part) in assembly.parts().iter().enumerate() {
        let material = match material_slots.iter().position(|t| *t == part.material) {
            Some(slot) => slot,
            None => {
                material_slots.push(part.material);
                materials.push(library.get(part.material).to_json());
                material_slots.len() - 1
            }
        };

        let acc = push_mesh(part.solid.mesh(), &mut buffer, &mut views, &mut accessors);
        meshes.push(json!({
            "name": part.name,
            "primitives": [{
                "attributes": { "POSITION": acc.position, "NORMAL": acc.normal },
                "indices": acc.indices,
                "material": material,
                "mode": 4
            }]
        }));

        let iso = part.transform();
        let t = iso.translation.vector;
        let q = iso.rotation.coords;
        nodes.push(json!({
            "name": part.name,
            "mesh": i,
            "translation": [t.x, t.y, t.z],
            "rotation": [q.x, q.y, q.z, q.w],
            "extras": { "material_tag": part.material.as_str() }
        }));
    }

    let scene_nodes: Vec<usize> = (0..nodes.len()).collect();
    let document = json!({
        "asset": {
            "generator": concat!("tierod ", env!("CARGO_PKG_VERSION")),
            "version": "2.0"
        },
        "scene": 0,
        "scenes": [{ "nodes": scene_nodes }],
        "nodes": nodes,
        "meshes": meshes,
        "materials": materials,
        "accessors": accessors,
        "bufferViews": views,
    });

    (document, buffer)
}

fn encode_glb(document: &Value, buffer: &[u8]) -> Result<Vec<u8>> {
    let mut json_bytes = serde_json::to_vec(document).context("Failed to serialize GLTF")?;
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }
    let mut bin = buffer.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total = 12 + 8 + json_bytes.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.write_all(&GLB_MAGIC.to_le_bytes())?;
    out.write_all(&2u32.to_le_bytes())?;
    out.write_all(&(total as u32).to_le_bytes())?;

    out.write_all(&(json_bytes.len() as u32).to_le_bytes())?;
    out.write_all(&CHUNK_JSON.to_le_bytes())?;
    out.write_all(&json_bytes)?;

    out.write_all(&(bin.len() as u32).to_le_bytes())?;
    out.write_all(&CHUNK_BIN.to_le_bytes())?;
    out.write_all(&bin)?;

    Ok(out)
}
