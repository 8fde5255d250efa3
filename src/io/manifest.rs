// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! JSON manifest sink

use super::GeometrySink;
use crate::assembly::{Assembly, AssemblyManifest};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Writes the assembly manifest as pretty JSON
#[derive(Debug, Clone)]
pub struct ManifestSink {
    path: PathBuf,
}

impl ManifestSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a manifest written by this sink
    pub fn read(path: impl AsRef<Path>) -> Result<AssemblyManifest> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read manifest: {:?}", path.as_ref()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse manifest: {:?}", path.as_ref()))
    }
}

impl GeometrySink for ManifestSink {
    fn accept(&mut self, assembly: &Assembly) -> Result<()> {
        let json = serde_json::to_string_pretty(&assembly.manifest())
            .context("Failed to serialize manifest")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write manifest: {:?}", self.path))?;
        tracing::info!(path = ?self.path, "wrote manifest");
        Ok(())
    }
}
