// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Build state machine stages

use serde::{Deserialize, Serialize};
use std::fmt;

/// Builder state. Stages advance one at a time and never go back;
/// `Complete` and `Aborted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BuildStage {
    Idle,
    TubeBuilt,
    InsertsPlaced,
    WeldsPlaced,
    HeimsPlaced,
    NutsPlaced,
    Complete,
    Aborted,
}

impl BuildStage {
    /// Forward stages in order, excluding `Aborted`
    pub const SEQUENCE: [BuildStage; 7] = [
        BuildStage::Idle,
        BuildStage::TubeBuilt,
        BuildStage::InsertsPlaced,
        BuildStage::WeldsPlaced,
        BuildStage::HeimsPlaced,
        BuildStage::NutsPlaced,
        BuildStage::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStage::Idle => "Idle",
            BuildStage::TubeBuilt => "TubeBuilt",
            BuildStage::InsertsPlaced => "InsertsPlaced",
            BuildStage::WeldsPlaced => "WeldsPlaced",
            BuildStage::HeimsPlaced => "HeimsPlaced",
            BuildStage::NutsPlaced => "NutsPlaced",
            BuildStage::Complete => "Complete",
            BuildStage::Aborted => "Aborted",
        }
    }

    /// The stage a successful step from here lands on
    pub fn next(self) -> Option<BuildStage> {
        match self {
            BuildStage::Idle => Some(BuildStage::TubeBuilt),
            BuildStage::TubeBuilt => Some(BuildStage::InsertsPlaced),
            BuildStage::InsertsPlaced => Some(BuildStage::WeldsPlaced),
            BuildStage::WeldsPlaced => Some(BuildStage::HeimsPlaced),
            BuildStage::HeimsPlaced => Some(BuildStage::NutsPlaced),
            BuildStage::NutsPlaced => Some(BuildStage::Complete),
            BuildStage::Complete | BuildStage::Aborted => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
