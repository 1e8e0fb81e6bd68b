// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Assembly module — the numbered chapter/section tree and the content
// attached to it.

pub mod assembler;
pub mod node;

pub use assembler::{NodeHandle, ReportAssembler};
pub use node::{Content, DocumentNode, NodeChild, NodeKind};
