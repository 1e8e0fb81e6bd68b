// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Reportwerk.

use thiserror::Error;

/// Top-level error type for all Reportwerk operations.
///
/// Generation is one-shot: none of these errors is resumable. Callers retry
/// the whole pipeline, never a single pass.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid input detected before anything is rendered (column widths,
    /// merge keys, spans, blank titles, malformed config).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Failure inside the rendering engine or while writing the artifact.
    #[error("rendering engine error: {0}")]
    Rendering(String),

    /// An ordering precondition was violated by the caller.
    #[error("logic error: {0}")]
    Logic(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReportError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn rendering(message: impl Into<String>) -> Self {
        Self::Rendering(message.into())
    }

    pub fn logic(message: impl Into<String>) -> Self {
        Self::Logic(message.into())
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ReportError>;
