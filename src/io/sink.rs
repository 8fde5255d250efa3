// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export boundary

use crate::assembly::Assembly;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use super::{GltfSink, ManifestSink, StlSink};

/// Receives a finished assembly. Appearance and file layout belong to the
/// sink; the assembly only carries geometry, placements and material tags.
pub trait GeometrySink {
    fn accept(&mut self, assembly: &Assembly) -> Result<()>;
}

/// Output formats selectable from the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Gltf,
    Glb,
    Stl,
    Json,
}

impl ExportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "gltf" => Some(Self::Gltf),
            "glb" => Some(Self::Glb),
            "stl" => Some(Self::Stl),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Gltf => "gltf",
            Self::Glb => "glb",
            Self::Stl => "stl",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Build the sink for `format` writing to `path`
pub fn sink_for(format: ExportFormat, path: impl Into<PathBuf>) -> Box<dyn GeometrySink> {
    let path = path.into();
    match format {
        ExportFormat::Gltf => Box::new(GltfSink::new(path)),
        ExportFormat::Glb => Box::new(GltfSink::binary(path)),
        ExportFormat::Stl => Box::new(StlSink::new(path)),
        ExportFormat::Json => Box::new(ManifestSink::new(path)),
    }
}

/// Export an assembly, picking the format from the extension
pub fn export(assembly: &Assembly, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let Some(format) = ExportFormat::from_path(path) else {
        bail!("Unsupported export format: {:?}", path);
    };
    sink_for(format, path).accept(assembly)
}
