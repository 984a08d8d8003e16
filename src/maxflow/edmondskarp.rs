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

//! This module implements the max flow algorithm of Edmonds-Karp.
//!
//! # Example
//!
//! ```
//! use rs_netopt::Network;
//! use rs_netopt::maxflow::edmondskarp;
//!
//! let mut upper = vec![];
//! let g = Network::new_with(|b| {
//!     for &(u, v, c) in &[
//!         ("s", "a", 5), ("s", "c", 5), ("a", "b", 2), ("a", "c", 1), ("a", "d", 1),
//!         ("c", "d", 2), ("d", "b", 2), ("b", "t", 4), ("d", "t", 5),
//!     ] {
//!         let (u, v) = (b.node(u), b.node(v));
//!         b.add_edge(u, v)?;
//!         upper.push(c);
//!     }
//!     Ok(())
//! })
//! .unwrap();
//!
//! let s = g.node("s").unwrap();
//! let t = g.node("t").unwrap();
//! let (value, flow, mut mincut) = edmondskarp(&g, s, t, |e| upper[e.index()]).unwrap();
//!
//! assert_eq!(value, 5);
//! assert!(flow.iter().all(|&(e, f)| f >= 0 && f <= upper[e.index()]));
//! assert!(g.nodes().filter(|&u| u != s && u != t).all(|u| {
//!     g.outedges(u).map(|(e, _)| flow[e.index()].1).sum::<i32>() ==
//!     g.inedges(u).map(|(e, _)| flow[e.index()].1).sum::<i32>()
//! }));
//!
//! mincut.sort();
//! assert_eq!(mincut.iter().map(|&u| g.name(u)).collect::<Vec<_>>(), vec!["s", "a", "c"]);
//! ```

use crate::error::{Error, Result};
use crate::network::{Edge, Network, Node};

use num_traits::NumAssign;
use std::collections::VecDeque;
use tracing::debug;

/// Which arcs of the residual network the path search may use.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ResidualPolicy {
    /// Forward arcs with remaining capacity and backward arcs carrying
    /// flow. This computes a maximum flow.
    Full,
    /// Only forward arcs with remaining capacity.
    ///
    /// Flow, once sent, is never redirected, so the computed value is a
    /// lower bound on the maximum flow, and the returned "cut" is just
    /// the set of nodes reachable from the source.
    ForwardOnly,
}

impl Default for ResidualPolicy {
    fn default() -> Self {
        ResidualPolicy::Full
    }
}

/// A single augmenting path.
#[derive(Clone, Debug, PartialEq)]
pub struct Augmentation<F> {
    /// The nodes on the path from the source to the sink.
    pub nodes: Vec<Node>,
    /// The amount of flow sent along the path.
    pub amount: F,
}

const UNREACHED: usize = usize::MAX;

/// Max-flow algorithm of Edmonds and Karp.
pub struct EdmondsKarp<'a, F> {
    g: &'a Network,
    /// Residual arcs `(arc, node)` of each node.
    ///
    /// Arc `2e` is the forward arc of edge `e`, arc `2e + 1` the backward arc.
    neighs: Vec<Vec<(usize, usize)>>,
    pred: Vec<(usize, usize)>,
    /// `flow[2e]` is the flow on `e`, `flow[2e + 1]` its residual capacity.
    flow: Vec<F>,
    queue: VecDeque<usize>,
    value: F,
    policy: ResidualPolicy,
    augmentations: Vec<Augmentation<F>>,
}

impl<'a, F> EdmondsKarp<'a, F>
where
    F: NumAssign + PartialOrd + Copy,
{
    /// Create a new Edmonds-Karp algorithm instance for a network.
    pub fn new(g: &'a Network) -> Self {
        EdmondsKarp {
            g,
            neighs: g
                .nodes()
                .map(|u| {
                    g.outedges(u)
                        .map(|(e, v)| (e.index() << 1, v.index()))
                        .chain(g.inedges(u).map(|(e, v)| ((e.index() << 1) | 1, v.index())))
                        .collect()
                })
                .collect(),
            pred: vec![(UNREACHED, UNREACHED); g.num_nodes()],
            flow: vec![F::zero(); g.num_edges() * 2],
            queue: VecDeque::with_capacity(g.num_nodes()),
            value: F::zero(),
            policy: ResidualPolicy::Full,
            augmentations: vec![],
        }
    }

    /// Set the arcs the path search may use.
    pub fn with_policy(mut self, policy: ResidualPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Return the underlying network.
    pub fn as_network(&self) -> &'a Network {
        self.g
    }

    /// Return the value of the latest computed flow.
    pub fn value(&self) -> F {
        self.value
    }

    /// Return the flow value on edge `e`
    pub fn flow(&self, e: Edge) -> F {
        self.flow[e.index() << 1]
    }

    /// The augmenting paths of the latest run in the order they were found.
    pub fn augmentations(&self) -> &[Augmentation<F>] {
        &self.augmentations
    }

    /// Compute a flow from `src` to `snk` with the given `upper` bounds.
    pub fn solve<Us>(&mut self, src: Node, snk: Node, upper: Us) -> Result<()>
    where
        Us: Fn(Edge) -> F,
    {
        if src == snk {
            return Err(Error::SameSourceSink);
        }
        let src = src.index();
        let snk = snk.index();

        // initialize network flow
        for (e, flw) in self.flow.iter_mut().enumerate() {
            *flw = if (e & 1) == 0 {
                F::zero()
            } else {
                upper(self.g.id2edge(e >> 1))
            };
        }
        self.value = F::zero();
        self.augmentations.clear();

        loop {
            // do bfs from source to sink
            for p in self.pred.iter_mut() {
                *p = (UNREACHED, UNREACHED);
            }

            // just some dummy arc
            self.pred[src] = (0, src);
            self.queue.clear();
            self.queue.push_back(src);
            'bfs: while let Some(u) = self.queue.pop_front() {
                for &(e, v) in &self.neighs[u] {
                    if self.policy == ResidualPolicy::ForwardOnly && (e & 1) == 1 {
                        continue;
                    }
                    if self.pred[v].0 == UNREACHED && self.flow[e ^ 1] > F::zero() {
                        self.pred[v] = (e, u);
                        self.queue.push_back(v);
                        if v == snk {
                            break 'bfs;
                        }
                    }
                }
            }

            // sink cannot be reached -> stop
            if self.pred[snk].0 == UNREACHED {
                break;
            }

            // compute augmentation value and collect the path
            let mut path = vec![snk];
            let mut v = snk;
            let mut df = self.flow[self.pred[v].0 ^ 1];
            while v != src {
                let (e, u) = self.pred[v];
                if self.flow[e ^ 1] < df {
                    df = self.flow[e ^ 1];
                }
                path.push(u);
                v = u;
            }
            path.reverse();

            // now augment the flow
            let mut v = snk;
            while v != src {
                let (e, u) = self.pred[v];
                self.flow[e] += df;
                self.flow[e ^ 1] -= df;
                v = u;
            }

            let nodes: Vec<_> = path.into_iter().map(|u| self.g.id2node(u)).collect();
            debug!(
                path = ?nodes.iter().map(|&u| self.g.name(u)).collect::<Vec<_>>(),
                "augmenting path"
            );
            self.augmentations.push(Augmentation { nodes, amount: df });
            self.value += df;
        }

        Ok(())
    }

    /// Return the minimal cut associated with the last maximum flow.
    ///
    /// These are the nodes reachable from the source in the final
    /// residual network.
    pub fn mincut(&self) -> Vec<Node> {
        self.g
            .nodes()
            .filter(|&u| self.pred[u.index()].0 != UNREACHED)
            .collect()
    }
}

/// Solve the maxflow problem using the algorithm of Edmonds-Karp.
///
/// The function solves the max flow problem from the source nodes
/// `src` to the sink node `snk` with the given `upper` bounds on
/// the edges.
///
/// The function returns the flow value, the flow on each edge and the
/// nodes in a minimal cut.
pub fn edmondskarp<F, Us>(g: &Network, src: Node, snk: Node, upper: Us) -> Result<(F, Vec<(Edge, F)>, Vec<Node>)>
where
    F: NumAssign + PartialOrd + Copy,
    Us: Fn(Edge) -> F,
{
    let mut maxflow = EdmondsKarp::new(g);
    maxflow.solve(src, snk, upper)?;
    Ok((
        maxflow.value(),
        g.edges().map(|e| (e, maxflow.flow(e))).collect(),
        maxflow.mincut(),
    ))
}
