// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for dimension resolution, primitive generation and booleans

use crate::assembly::BuildStage;
use crate::dimensions::FitCheck;
use crate::geometry::DegenerateReason;
use thiserror::Error;

/// Result type for kernel operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building an assembly
#[derive(Debug, Error)]
pub enum Error {
    /// A derived dimension violates a physical-fit inequality.
    #[error("invalid dimension: {check} violated ({detail})")]
    InvalidDimension {
        /// The inequality that failed.
        check: FitCheck,
        /// The offending values.
        detail: String,
    },

    /// A boolean operand broke the overcut or containment rule, or the
    /// result came out empty.
    #[error("degenerate boolean `{operation}`: {reason}")]
    DegenerateBoolean {
        /// Descriptor of the operation (`target - cutter`).
        operation: String,
        reason: DegenerateReason,
    },

    /// Invalid tessellation or primitive configuration.
    #[error("unsupported {primitive}: {reason}")]
    UnsupportedPrimitive {
        primitive: &'static str,
        reason: String,
    },

    /// A build step failed; wraps the underlying error with its location.
    #[error("build aborted at stage {stage} while making `{part}`: {source}")]
    Stage {
        stage: BuildStage,
        part: String,
        #[source]
        source: Box<Error>,
    },

    /// The builder was asked for output or another step in the wrong state.
    #[error("assembly builder is {stage}: {reason}")]
    BuilderState {
        stage: BuildStage,
        reason: &'static str,
    },
}

impl Error {
    pub(crate) fn invalid(check: FitCheck, detail: impl Into<String>) -> Self {
        Self::InvalidDimension {
            check,
            detail: detail.into(),
        }
    }

    pub(crate) fn unsupported(primitive: &'static str, reason: impl Into<String>) -> Self {
        Self::UnsupportedPrimitive {
            primitive,
            reason: reason.into(),
        }
    }

    pub(crate) fn at_stage(self, stage: BuildStage, part: impl Into<String>) -> Self {
        Self::Stage {
            stage,
            part: part.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping stage wrappers
    pub fn root(&self) -> &Error {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    /// Stage the failure happened in, if it was raised during a build step
    pub fn stage(&self) -> Option<BuildStage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            Self::BuilderState { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn is_invalid_dimension(&self) -> bool {
        matches!(self.root(), Self::InvalidDimension { .. })
    }

    pub fn is_degenerate_boolean(&self) -> bool {
        matches!(self.root(), Self::DegenerateBoolean { .. })
    }

    pub fn is_unsupported_primitive(&self) -> bool {
        matches!(self.root(), Self::UnsupportedPrimitive { .. })
    }

    /// Failed fit check, when the root cause is an invalid dimension
    pub fn fit_check(&self) -> Option<FitCheck> {
        match self.root() {
            Self::InvalidDimension { check, .. } => Some(*check),
            _ => None,
        }
    }
}
