// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Nominal inputs and the fit-checked derived dimension set

mod nominal;
mod resolver;

pub use nominal::{FitAllowances, NominalSpec, OvercutMargins};
pub use resolver::{resolve, DerivedDimensions, DimensionResolver, FitCheck};
