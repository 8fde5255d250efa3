// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Build and export runner used by the `tierod` binary

use crate::assembly::{Assembly, BuildStage};
use crate::config::RodConfig;
use crate::io::{sink_for, ExportFormat};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::{Duration, Instant};

/// Result of a build
pub struct BuildResult {
    pub assembly: Assembly,
    pub duration: Duration,
}

/// Runs builds from a [`RodConfig`]
pub struct Runner {
    config: RodConfig,
    progress: bool,
}

impl Runner {
    pub fn new(config: RodConfig) -> Self {
        Self {
            config,
            progress: false,
        }
    }

    /// Show a stage progress bar on stderr
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &RodConfig {
        &self.config
    }

    /// Resolve and build, one stage at a time
    pub fn build(&self) -> Result<BuildResult> {
        let start = Instant::now();
        let mut builder = self.config.builder().context("Dimension check failed")?;

        let pb = if self.progress {
            let p = ProgressBar::new((BuildStage::SEQUENCE.len() - 1) as u64);
            p.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .context("Invalid progress template")?
                    .progress_chars("#>-"),
            );
            Some(p)
        } else {
            None
        };

        while !builder.stage().is_terminal() {
            let stage = builder.step().context("Build failed")?;
            if let Some(pb) = &pb {
                pb.set_message(stage.to_string());
                pb.inc(1);
            }
        }
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        let assembly = builder.finish()?;
        Ok(BuildResult {
            assembly,
            duration: start.elapsed(),
        })
    }

    /// Write `assembly` to `output` in `format`
    pub fn export(
        &self,
        assembly: &Assembly,
        output: &Path,
        format: ExportFormat,
    ) -> Result<Duration> {
        let start = Instant::now();
        sink_for(format, output)
            .accept(assembly)
            .with_context(|| format!("Failed to export {format} to {:?}", output))?;
        Ok(start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::Tessellation;

    #[test]
    fn test_runner_builds_default_rod() {
        let mut config = RodConfig::default();
        config.tessellation = Tessellation {
            round: 16,
            hardware: 12,
            torus_major: 16,
            torus_minor: 6,
            sphere_segments: 12,
            sphere_rings: 6,
        };
        let result = Runner::new(config).build().unwrap();
        assert_eq!(result.assembly.len(), 15);
    }

    #[test]
    fn test_runner_reports_invalid_dimension() {
        let mut config = RodConfig::default();
        config.nominal.tube_wall = 0.0;
        let err = Runner::new(config).build().err().unwrap();
        assert!(format!("{err:#}").contains("wall thickness"));
    }
}
