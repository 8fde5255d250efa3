// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Placed parts, sides and material tags

use crate::geometry::{Placement, Solid};
use nalgebra::Isometry3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// End of the tie rod
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Lh,
    Rh,
}

impl Side {
    /// Build order: left end first
    pub const ALL: [Side; 2] = [Side::Lh, Side::Rh];

    pub fn sign(self) -> f64 {
        match self {
            Side::Lh => -1.0,
            Side::Rh => 1.0,
        }
    }

    /// Signed offset for an unsigned magnitude. The two sides differ only
    /// in sign, so `Lh.offset(m) == -Rh.offset(m)` holds bit for bit.
    pub fn offset(self, magnitude: f64) -> f64 {
        self.sign() * magnitude
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Lh => "lh",
            Side::Rh => "rh",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appearance tag carried to the sinks; the core never interprets it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialTag {
    SteelTube,
    InsertSteel,
    ChromeHeim,
    WeldBead,
    NutSteel,
}

impl MaterialTag {
    pub const ALL: [MaterialTag; 5] = [
        MaterialTag::SteelTube,
        MaterialTag::InsertSteel,
        MaterialTag::ChromeHeim,
        MaterialTag::WeldBead,
        MaterialTag::NutSteel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialTag::SteelTube => "steel_tube",
            MaterialTag::InsertSteel => "insert_steel",
            MaterialTag::ChromeHeim => "chrome_heim",
            MaterialTag::WeldBead => "weld_bead",
            MaterialTag::NutSteel => "nut_steel",
        }
    }
}

impl fmt::Display for MaterialTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartKind {
    Tube,
    Insert,
    InsertShoulder,
    Weld,
    HeimShank,
    HeimBody,
    HeimBall,
    JamNut,
}

impl PartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartKind::Tube => "tube",
            PartKind::Insert => "insert",
            PartKind::InsertShoulder => "insert_shoulder",
            PartKind::Weld => "weld",
            PartKind::HeimShank => "heim_shank",
            PartKind::HeimBody => "heim_body",
            PartKind::HeimBall => "heim_ball",
            PartKind::JamNut => "jam_nut",
        }
    }

    pub fn material(&self) -> MaterialTag {
        match self {
            PartKind::Tube => MaterialTag::SteelTube,
            PartKind::Insert | PartKind::InsertShoulder => MaterialTag::InsertSteel,
            PartKind::Weld => MaterialTag::WeldBead,
            PartKind::HeimShank | PartKind::HeimBody | PartKind::HeimBall => {
                MaterialTag::ChromeHeim
            }
            PartKind::JamNut => MaterialTag::NutSteel,
        }
    }

    /// Part name, suffixed with the side for end parts
    pub fn part_name(&self, side: Option<Side>) -> String {
        match side {
            Some(side) => format!("{}_{}", self.as_str(), side),
            None => self.as_str().to_string(),
        }
    }
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finished part of the assembly
#[derive(Debug)]
pub struct PlacedSolid {
    pub name: String,
    pub kind: PartKind,
    pub side: Option<Side>,
    pub solid: Solid,
    pub material: MaterialTag,
}

impl PlacedSolid {
    pub fn new(kind: PartKind, side: Option<Side>, solid: Solid) -> Self {
        Self {
            name: kind.part_name(side),
            kind,
            side,
            solid,
            material: kind.material(),
        }
    }

    pub fn placement(&self) -> Placement {
        self.solid.placement()
    }

    /// Local to world transform handed to sinks
    pub fn transform(&self) -> Isometry3<f64> {
        self.solid.transform()
    }
}
