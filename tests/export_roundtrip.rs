// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export sink tests

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use std::fs::File;
use tempfile::TempDir;
use tierod::io::{
    export, GeometrySink, GltfSink, ManifestSink, MaterialLibrary, PbrMaterial, StlSink,
};
use tierod::{Assembly, MaterialTag, RodConfig, Tessellation};

fn coarse_assembly() -> Result<Assembly> {
    let config = RodConfig {
        tessellation: Tessellation {
            round: 16,
            hardware: 12,
            torus_major: 16,
            torus_minor: 6,
            sphere_segments: 12,
            sphere_rings: 6,
        },
        ..RodConfig::default()
    };
    Ok(tierod::build_with_config(&config)?)
}

fn read_u32(bytes: &[u8], at: usize) -> usize {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]) as usize
}

#[test]
fn test_glb_nodes_carry_placements() -> Result<()> {
    let assembly = coarse_assembly()?;
    let dir = TempDir::new()?;
    let path = dir.path().join("rod.glb");
    GltfSink::binary(&path).accept(&assembly)?;

    let bytes = std::fs::read(&path)?;
    assert_eq!(&bytes[0..4], b"glTF");
    assert_eq!(read_u32(&bytes, 8), bytes.len());

    let json_len = read_u32(&bytes, 12);
    let doc: Value = serde_json::from_slice(&bytes[20..20 + json_len])?;
    let nodes = doc["nodes"].as_array().cloned().unwrap_or_default();
    assert_eq!(nodes.len(), 15);
    assert_eq!(doc["materials"].as_array().map(|m| m.len()), Some(5));

    let bin_len = read_u32(&bytes, 20 + json_len);
    assert_eq!(&bytes[24 + json_len..28 + json_len], b"BIN\0");
    let byte_length = doc["buffers"][0]["byteLength"].as_u64().unwrap_or(0) as usize;
    assert!(byte_length <= bin_len);

    let insert = nodes
        .iter()
        .find(|n| n["name"] == "insert_rh")
        .cloned()
        .unwrap_or_default();
    let offset = assembly
        .part("insert_rh")
        .map(|p| p.placement().offset)
        .unwrap_or_default();
    let x = insert["translation"][0].as_f64().unwrap_or(f64::NAN);
    assert!((x - offset).abs() < 1e-12, "translation {x} vs {offset}");
    assert_eq!(insert["extras"]["material_tag"], "insert_steel");
    Ok(())
}

#[test]
fn test_custom_material_library() -> Result<()> {
    let assembly = coarse_assembly()?;
    let dir = TempDir::new()?;
    let path = dir.path().join("rod.gltf");

    let mut library = MaterialLibrary::default();
    let black_oxide = PbrMaterial::new("Black_Oxide", [0.05, 0.05, 0.06], 0.9, 0.5);
    library.set(MaterialTag::ChromeHeim, black_oxide);
    GltfSink::new(&path).with_materials(library).accept(&assembly)?;

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    let materials = doc["materials"].as_array().cloned().unwrap_or_default();
    let names: Vec<&str> = materials
        .iter()
        .filter_map(|m| m["name"].as_str())
        .collect();
    assert!(names.contains(&"Black_Oxide"), "{names:?}");
    assert!(!names.contains(&"Heim_Chrome"), "{names:?}");
    assert!(names.contains(&"DOM_Steel"), "{names:?}");
    Ok(())
}

#[test]
fn test_gltf_embeds_buffer() -> Result<()> {
    let assembly = coarse_assembly()?;
    let dir = TempDir::new()?;
    let path = dir.path().join("rod.gltf");
    export(&assembly, &path)?;

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
    let uri = doc["buffers"][0]["uri"].as_str().unwrap_or_default();
    let payload = uri
        .strip_prefix("data:application/octet-stream;base64,")
        .expect("embedded data uri");
    let data = STANDARD.decode(payload)?;
    assert_eq!(
        Some(data.len() as u64),
        doc["buffers"][0]["byteLength"].as_u64()
    );

    let triangles: usize = assembly
        .parts()
        .iter()
        .map(|p| p.solid.mesh().triangle_count())
        .sum();
    let index_count: u64 = doc["accessors"]
        .as_array()
        .map(|a| {
            a.iter()
                .filter(|acc| acc["type"] == "SCALAR")
                .filter_map(|acc| acc["count"].as_u64())
                .sum()
        })
        .unwrap_or(0);
    assert_eq!(index_count as usize, triangles * 3);
    Ok(())
}

#[test]
fn test_stl_is_world_space_millimeters() -> Result<()> {
    let assembly = coarse_assembly()?;
    let dir = TempDir::new()?;
    let path = dir.path().join("rod.stl");
    StlSink::new(&path).accept(&assembly)?;

    let mut file = File::open(&path)?;
    let stl = stl_io::read_stl(&mut file)?;
    let triangles: usize = assembly
        .parts()
        .iter()
        .map(|p| p.solid.mesh().triangle_count())
        .sum();
    assert_eq!(stl.faces.len(), triangles);

    let max_x = stl.vertices.iter().map(|v| v[0]).fold(f32::MIN, f32::max);
    let min_x = stl.vertices.iter().map(|v| v[0]).fold(f32::MAX, f32::min);
    let half_mm = (assembly.dimensions().overall_length() / 2.0 * 1000.0) as f32;
    assert!((max_x - half_mm).abs() < 1e-2, "max x {max_x} vs {half_mm}");
    assert!((min_x + half_mm).abs() < 1e-2, "min x {min_x} vs {half_mm}");
    Ok(())
}

#[test]
fn test_manifest_round_trips() -> Result<()> {
    let assembly = coarse_assembly()?;
    let dir = TempDir::new()?;
    let path = dir.path().join("rod.json");
    ManifestSink::new(&path).accept(&assembly)?;

    let manifest = ManifestSink::read(&path)?;
    assert_eq!(manifest.fingerprint, assembly.fingerprint());
    assert_eq!(manifest.parts.len(), 15);
    assert_eq!(manifest.parts[0].name, "tube");
    assert_eq!(manifest.parts[0].descriptor.boolean_depth(), 1);
    let tube_length = assembly.dimensions().tube_length;
    let drift = (manifest.dimensions.tube_length - tube_length).abs();
    assert!(drift < 1e-12);
    Ok(())
}

#[test]
fn test_unknown_extension_is_an_error() -> Result<()> {
    let assembly = coarse_assembly()?;
    let dir = TempDir::new()?;
    assert!(export(&assembly, dir.path().join("rod.step")).is_err());
    Ok(())
}
