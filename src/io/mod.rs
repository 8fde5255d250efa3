// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - export sinks for finished assemblies

mod gltf;
mod manifest;
mod sink;
mod stl;

pub use gltf::{GltfSink, MaterialLibrary, PbrMaterial};
pub use manifest::ManifestSink;
pub use sink::{export, sink_for, ExportFormat, GeometrySink};
pub use stl::StlSink;
