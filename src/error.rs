// Copyright (c) 2023, 2024 Frank Fischer <frank-fischer@shadow-soft.de>
// Copyright (c) 2026 The rs-netopt developers
//
// This program is free software: you can redistribute it and/or
// modify it under the terms of the GNU General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful, but
// WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see  <http://www.gnu.org/licenses/>
//

//! The error type shared by all modules.

use std::io;

/// Errors raised while building or solving a problem.
///
/// Note that an infeasible or unbounded model is *not* an error, this is
/// reported by [`SolutionState`](crate::mcf::SolutionState).
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unknown node '{0}'")]
    UnknownNode(String),

    #[error("duplicate node '{0}'")]
    DuplicateNode(String),

    #[error("invalid node index {index} (network has {count} nodes)")]
    InvalidNode { index: usize, count: usize },

    #[error("loop at node '{0}' is not allowed")]
    Loop(String),

    #[error("edge {edge} has negative weight")]
    NegativeWeight { edge: usize },

    #[error("source and sink must be different nodes")]
    SameSourceSink,

    #[error("{context}: expected {expected} entries, got {found}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid bounds for '{name}': [{lower}, {upper}]")]
    InvalidBounds { name: String, lower: f64, upper: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("{what}: iteration limit of {limit} reached")]
    IterationLimit { what: &'static str, limit: usize },

    #[error("{what} too large for enumeration ({size} > {limit})")]
    TooLarge {
        what: &'static str,
        size: usize,
        limit: usize,
    },

    #[error("unknown instance '{0}'")]
    UnknownInstance(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
