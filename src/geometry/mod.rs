// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation, primitives and booleans

pub mod analytics;
mod bbox;
mod boolean;
mod csg;
mod factory;
mod mesh;
pub mod mesh_utils;
mod primitives;
mod solid;

pub use analytics::{analyze, GeometryStats};
pub use bbox::BoundingBox;
pub use boolean::{BooleanKernel, BspKernel, CsgConfig, CsgEngine, DegenerateReason};
pub use factory::PrimitiveFactory;
pub use mesh::{Mesh, Triangle, Vertex};
pub use primitives::Primitive;
pub use solid::{Axis, Placement, Solid, SolidDescriptor};
