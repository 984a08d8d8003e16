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

//#![forbid(unsafe_code)]

//! Network optimization and assignment models.
//!
//! The crate contains the classical network problems (minimum spanning
//! tree, maximum flow, shortest path and minimum cost flow) on a small
//! [`Network`] type, a linear programming solver used for the assignment,
//! transportation and transshipment models, and brute force methods
//! to double check results on small instances.
//!
//! Problems can be described as JSON [instances](crate::instance). A
//! [catalog](crate::catalog) of worked instances is included.

pub mod error;
pub use self::error::{Error, Result};

// # Data structures

pub mod network;
pub use self::network::{Edge, Network, NetworkBuilder, Node};

pub mod collections;
pub mod unionfind;

// # Algorithms

pub mod lp;
pub mod maxflow;
pub mod mcf;
pub mod mst;
pub mod shortestpath;
pub mod verify;

pub use self::mcf::SolutionState;

// # Models

pub mod assignment;
pub mod transport;
pub mod transship;

// # Instances

pub mod catalog;
pub mod instance;
pub mod report;
