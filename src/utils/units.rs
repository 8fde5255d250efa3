// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Linear unit conversion. Everything past the config layer is in meters.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const METERS_PER_INCH: f64 = 0.0254;
pub const METERS_PER_MILLIMETER: f64 = 0.001;

/// Unit the nominal dimensions are written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    #[serde(alias = "inch", alias = "inches")]
    In,
    #[serde(alias = "millimeter", alias = "millimeters")]
    Mm,
}

impl Unit {
    pub fn meters_per_unit(self) -> f64 {
        match self {
            Self::In => METERS_PER_INCH,
            Self::Mm => METERS_PER_MILLIMETER,
        }
    }

    /// How many of this unit make one inch
    pub fn per_inch(self) -> f64 {
        match self {
            Self::In => 1.0,
            Self::Mm => 25.4,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "in"),
            Self::Mm => write!(f, "mm"),
        }
    }
}

/// Converts nominal values into meters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitConverter {
    unit: Unit,
}

impl UnitConverter {
    pub fn new(unit: Unit) -> Self {
        Self { unit }
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn to_meters(&self, value: f64) -> f64 {
        value * self.unit.meters_per_unit()
    }

    pub fn from_meters(&self, meters: f64) -> f64 {
        meters / self.unit.meters_per_unit()
    }
}

/// Inches to meters
pub fn in_to_m(inches: f64) -> f64 {
    inches * METERS_PER_INCH
}

/// Meters to inches
pub fn m_to_in(meters: f64) -> f64 {
    meters / METERS_PER_INCH
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inch_conversion() {
        assert_relative_eq!(in_to_m(1.0), 0.0254);
        assert_relative_eq!(in_to_m(1.01), 0.025654, epsilon = 1e-12);
        assert_relative_eq!(m_to_in(in_to_m(22.0)), 22.0, epsilon = 1e-12);
    }

    #[test]
    fn test_converter_units() {
        let inches = UnitConverter::new(Unit::In);
        let mm = UnitConverter::new(Unit::Mm);
        assert_relative_eq!(inches.to_meters(1.25), 0.03175, epsilon = 1e-12);
        assert_relative_eq!(mm.to_meters(31.75), 0.03175, epsilon = 1e-12);
        assert_relative_eq!(mm.from_meters(0.03175), 31.75, epsilon = 1e-9);
        assert_relative_eq!(
            mm.to_meters(Unit::Mm.per_inch()),
            METERS_PER_INCH,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_unit_aliases() {
        #[derive(Deserialize)]
        struct Wrapper {
            unit: Unit,
        }
        let w: Wrapper = toml::from_str("unit = \"inches\"").unwrap();
        assert_eq!(w.unit, Unit::In);
        let w: Wrapper = toml::from_str("unit = \"mm\"").unwrap();
        assert_eq!(w.unit, Unit::Mm);
    }
}
