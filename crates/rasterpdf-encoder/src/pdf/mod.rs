// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — document object graph, ICC embedding.

pub mod icc;
pub mod writer;

pub use writer::{DocumentInfo, DocumentWriter, format_number};
