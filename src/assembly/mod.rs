// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Tie rod assembly: sides, stages, parts and the staged builder

mod builder;
mod model;
mod part;
mod stage;

pub use builder::{AssemblyBuilder, Tessellation};
pub use model::{Assembly, AssemblyManifest, PartRecord};
pub use part::{MaterialTag, PartKind, PlacedSolid, Side};
pub use stage::BuildStage;
