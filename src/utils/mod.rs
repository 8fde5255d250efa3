// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Shared numeric helpers

pub mod math;
pub mod units;

pub use units::{Unit, UnitConverter, METERS_PER_INCH};
