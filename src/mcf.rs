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

//! Minimum Cost Flow algorithms.

use serde_derive::{Deserialize, Serialize};
use std::fmt;

pub mod ssp;
pub use self::ssp::{min_cost_flow, MinCostFlow};

/// The outcome of an optimization run.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SolutionState {
    /// Unknown state, the problem has not been solved, yet
    Unknown,
    /// The problem has been solved to optimality
    Optimal,
    /// The problem is infeasible
    Infeasible,
    /// The problem is unbounded
    Unbounded,
}

impl Default for SolutionState {
    fn default() -> Self {
        SolutionState::Unknown
    }
}

impl fmt::Display for SolutionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            SolutionState::Unknown => "unknown",
            SolutionState::Optimal => "optimal",
            SolutionState::Infeasible => "infeasible",
            SolutionState::Unbounded => "unbounded",
        };
        write!(f, "{}", s)
    }
}
