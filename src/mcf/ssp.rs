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

//! Successive shortest path algorithm for minimum cost flows.
//!
//! Flow is sent from the source to the sink along cheapest paths in the
//! residual network until the requested amount has been routed or the
//! sink is no longer reachable. Shortest paths are computed by
//! Bellman-Ford, so negative costs are allowed. Negative cycles in the
//! residual network are cancelled when found; a negative cycle without
//! capacity bound makes the problem unbounded.
//!
//! # Example
//!
//! ```
//! use rs_netopt::Network;
//! use rs_netopt::mcf::{min_cost_flow, SolutionState};
//!
//! let arcs = [("s", "a", 3, 1), ("s", "b", 2, 2), ("a", "b", 2, 1), ("a", "t", 2, 3), ("b", "t", 3, 1)];
//! let g = Network::from_arcs(&arcs.iter().map(|a| (a.0, a.1)).collect::<Vec<_>>()).unwrap();
//! let s = g.node("s").unwrap();
//! let t = g.node("t").unwrap();
//!
//! let (state, cost, flows) = min_cost_flow(
//!     &g, s, t, Some(4),
//!     |e| arcs[e.index()].3,
//!     |e| Some(arcs[e.index()].2),
//! ).unwrap();
//!
//! assert_eq!(state, SolutionState::Optimal);
//! assert_eq!(cost, 13);
//! assert_eq!(flows.iter().filter(|&&(e, _)| g.snk(e) == t).map(|&(_, f)| f).sum::<i32>(), 4);
//! ```

use super::SolutionState;
use crate::error::{Error, Result};
use crate::network::{Edge, Network, Node};

use num_traits::NumAssign;
use tracing::{debug, trace};

/// Result of a shortest path search in the residual network.
enum Search {
    /// Shortest paths have been found, see `pred`.
    Done,
    /// A negative cycle through the given node.
    NegativeCycle(usize),
}

/// Min-cost flow by successive shortest paths.
pub struct MinCostFlow<'a, F> {
    g: &'a Network,
    /// Residual arcs `(arc, node)` of each node.
    ///
    /// Arc `2e` is the forward arc of edge `e`, arc `2e + 1` the backward arc.
    neighs: Vec<Vec<(usize, usize)>>,
    cost: Vec<F>,
    /// Upper bounds, `None` is unbounded.
    upper: Vec<Option<F>>,
    flow: Vec<F>,
    routed: F,
    state: SolutionState,
    dist: Vec<Option<F>>,
    pred: Vec<Option<(usize, usize)>>,
}

impl<'a, F> MinCostFlow<'a, F>
where
    F: NumAssign + PartialOrd + Copy,
{
    /// Create a new instance with the given edge costs and upper bounds.
    pub fn new<Cs, Us>(g: &'a Network, cost: Cs, upper: Us) -> Self
    where
        Cs: Fn(Edge) -> F,
        Us: Fn(Edge) -> Option<F>,
    {
        MinCostFlow {
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
            cost: g.edges().map(&cost).collect(),
            upper: g.edges().map(&upper).collect(),
            flow: vec![F::zero(); g.num_edges()],
            routed: F::zero(),
            state: SolutionState::Unknown,
            dist: vec![None; g.num_nodes()],
            pred: vec![None; g.num_nodes()],
        }
    }

    /// Return the underlying network.
    pub fn as_network(&self) -> &'a Network {
        self.g
    }

    /// The state of the latest run.
    pub fn state(&self) -> SolutionState {
        self.state
    }

    /// The flow on edge `e`.
    pub fn flow(&self, e: Edge) -> F {
        self.flow[e.index()]
    }

    /// The amount of flow sent from the source to the sink.
    pub fn routed(&self) -> F {
        self.routed
    }

    /// The total cost of the current flow.
    pub fn value(&self) -> F {
        let mut v = F::zero();
        for (&f, &c) in self.flow.iter().zip(self.cost.iter()) {
            v += f * c;
        }
        v
    }

    /// Send `amount` units of flow from `src` to `snk` at minimal cost.
    ///
    /// If `amount` is `None` as much flow as possible is sent, i.e. a
    /// minimum cost maximum flow is computed. If less than `amount` can be
    /// sent, the state is `Infeasible` and the flow is a cheapest flow of
    /// maximal value.
    pub fn solve(&mut self, src: Node, snk: Node, amount: Option<F>) -> Result<SolutionState> {
        if src == snk {
            return Err(Error::SameSourceSink);
        }
        for f in self.flow.iter_mut() {
            *f = F::zero();
        }
        self.routed = F::zero();
        self.state = self.run(src.index(), snk.index(), amount)?;
        debug!(state = %self.state, "min cost flow finished");
        Ok(self.state)
    }

    fn run(&mut self, src: usize, snk: usize, amount: Option<F>) -> Result<SolutionState> {
        loop {
            let mut df = match amount {
                Some(a) if self.routed >= a => break,
                Some(a) => Some(a - self.routed),
                None => None,
            };

            if let Search::NegativeCycle(u) = self.search(&[src]) {
                if !self.cancel_cycle(u)? {
                    return Ok(SolutionState::Unbounded);
                }
                continue;
            }

            if self.dist[snk].is_none() {
                break;
            }

            let mut path = vec![];
            let mut v = snk;
            while v != src {
                let (a, u) = match self.pred[v] {
                    Some(p) => p,
                    None => break,
                };
                df = min_residual(df, self.residual(a));
                path.push(a);
                v = u;
            }

            let df = match df {
                Some(df) => df,
                None => return Ok(SolutionState::Unbounded),
            };
            for &a in &path {
                self.push(a, df);
            }
            self.routed += df;
            debug!(arcs = path.len(), "augment along shortest path");
        }

        // remaining negative cycles are not reachable from the source
        let all: Vec<usize> = (0..self.g.num_nodes()).collect();
        while let Search::NegativeCycle(u) = self.search(&all) {
            if !self.cancel_cycle(u)? {
                return Ok(SolutionState::Unbounded);
            }
        }

        Ok(match amount {
            Some(a) if self.routed < a => SolutionState::Infeasible,
            _ => SolutionState::Optimal,
        })
    }

    /// Remaining capacity of a residual arc, `None` if unbounded.
    fn residual(&self, a: usize) -> Option<F> {
        let e = a >> 1;
        if a & 1 == 0 {
            self.upper[e].map(|u| u - self.flow[e])
        } else {
            Some(self.flow[e])
        }
    }

    fn arc_cost(&self, a: usize) -> F {
        let c = self.cost[a >> 1];
        if a & 1 == 0 {
            c
        } else {
            F::zero() - c
        }
    }

    fn push(&mut self, a: usize, df: F) {
        if a & 1 == 0 {
            self.flow[a >> 1] += df;
        } else {
            self.flow[a >> 1] -= df;
        }
    }

    /// Bellman-Ford from all nodes in `starts`.
    fn search(&mut self, starts: &[usize]) -> Search {
        let n = self.g.num_nodes();
        for d in self.dist.iter_mut() {
            *d = None;
        }
        for p in self.pred.iter_mut() {
            *p = None;
        }
        for &s in starts {
            self.dist[s] = Some(F::zero());
        }

        for round in 0..n {
            let mut last = None;
            for u in 0..n {
                let du = match self.dist[u] {
                    Some(d) => d,
                    None => continue,
                };
                for &(a, v) in &self.neighs[u] {
                    if self.residual(a).map_or(false, |r| r <= F::zero()) {
                        continue;
                    }
                    let dv = du + self.arc_cost(a);
                    if self.dist[v].map_or(true, |d| dv < d) {
                        self.dist[v] = Some(dv);
                        self.pred[v] = Some((a, u));
                        last = Some(v);
                    }
                }
            }
            match last {
                None => return Search::Done,
                Some(v) if round + 1 == n => return Search::NegativeCycle(v),
                Some(_) => {}
            }
        }
        Search::Done
    }

    /// Cancel the negative cycle reachable backwards from `u`.
    ///
    /// Returns `false` if the cycle has unbounded capacity. Fails if the
    /// predecessors of `u` do not lead into a cycle.
    fn cancel_cycle(&mut self, u: usize) -> Result<bool> {
        let broken = || Error::InvalidData(format!("no negative cycle through node {}", u));
        // walk back n steps to be sure to be on the cycle
        let mut c = u;
        for _ in 0..self.g.num_nodes() {
            match self.pred[c] {
                Some((_, p)) => c = p,
                None => return Err(broken()),
            }
        }

        let mut arcs = vec![];
        let mut v = c;
        loop {
            let (a, p) = match self.pred[v] {
                Some(x) => x,
                None => return Err(broken()),
            };
            arcs.push(a);
            v = p;
            if v == c {
                break;
            }
        }

        let mut df = None;
        for &a in &arcs {
            df = min_residual(df, self.residual(a));
        }
        match df {
            Some(df) => {
                trace!(arcs = arcs.len(), "cancel negative cycle");
                for &a in &arcs {
                    self.push(a, df);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Minimum of two capacities where `None` is unbounded.
fn min_residual<F: PartialOrd>(a: Option<F>, b: Option<F>) -> Option<F> {
    match (a, b) {
        (Some(x), Some(y)) => Some(if y < x { y } else { x }),
        (Some(x), None) => Some(x),
        (None, y) => y,
    }
}

/// Solve a min-cost flow problem with successive shortest paths.
///
/// Returns the solution state, the total cost and the flow on each edge.
pub fn min_cost_flow<F, Cs, Us>(
    g: &Network,
    src: Node,
    snk: Node,
    amount: Option<F>,
    cost: Cs,
    upper: Us,
) -> Result<(SolutionState, F, Vec<(Edge, F)>)>
where
    F: NumAssign + PartialOrd + Copy,
    Cs: Fn(Edge) -> F,
    Us: Fn(Edge) -> Option<F>,
{
    let mut mcf = MinCostFlow::new(g, cost, upper);
    let state = mcf.solve(src, snk, amount)?;
    Ok((state, mcf.value(), g.edges().map(|e| (e, mcf.flow(e))).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARCS: [(&str, &str, i32, i32); 5] = [
        ("s", "a", 3, 1),
        ("s", "b", 2, 2),
        ("a", "b", 2, 1),
        ("a", "t", 2, 3),
        ("b", "t", 3, 1),
    ];

    fn network(arcs: &[(&str, &str, i32, i32)]) -> Network {
        Network::from_arcs(&arcs.iter().map(|a| (a.0, a.1)).collect::<Vec<_>>()).unwrap()
    }

    fn check_conservation(g: &Network, mcf: &MinCostFlow<i32>, s: Node, t: Node) {
        for u in g.nodes() {
            let out: i32 = g.outedges(u).map(|(e, _)| mcf.flow(e)).sum();
            let inn: i32 = g.inedges(u).map(|(e, _)| mcf.flow(e)).sum();
            if u == s {
                assert_eq!(out - inn, mcf.routed());
            } else if u == t {
                assert_eq!(inn - out, mcf.routed());
            } else {
                assert_eq!(out, inn);
            }
        }
    }

    #[test]
    fn test_amount() {
        let g = network(&ARCS);
        let s = g.node("s").unwrap();
        let t = g.node("t").unwrap();
        let mut mcf = MinCostFlow::new(&g, |e| ARCS[e.index()].3, |e| Some(ARCS[e.index()].2));
        assert_eq!(mcf.solve(s, t, Some(4)).unwrap(), SolutionState::Optimal);
        assert_eq!(mcf.routed(), 4);
        assert_eq!(mcf.value(), 13);
        check_conservation(&g, &mcf, s, t);
    }

    #[test]
    fn test_too_much() {
        let g = network(&ARCS);
        let s = g.node("s").unwrap();
        let t = g.node("t").unwrap();
        let mut mcf = MinCostFlow::new(&g, |e| ARCS[e.index()].3, |e| Some(ARCS[e.index()].2));
        assert_eq!(mcf.solve(s, t, Some(6)).unwrap(), SolutionState::Infeasible);
        assert_eq!(mcf.routed(), 5);
        assert_eq!(mcf.value(), 17);

        assert_eq!(mcf.solve(s, t, None).unwrap(), SolutionState::Optimal);
        assert_eq!(mcf.routed(), 5);
        assert_eq!(mcf.value(), 17);
        check_conservation(&g, &mcf, s, t);
    }

    #[test]
    fn test_cancel_unreachable_cycle() {
        let mut arcs = ARCS.to_vec();
        arcs.push(("x", "y", 1, -3));
        arcs.push(("y", "x", 1, 1));
        let g = network(&arcs);
        let s = g.node("s").unwrap();
        let t = g.node("t").unwrap();
        let mut mcf = MinCostFlow::new(&g, |e| arcs[e.index()].3, |e| Some(arcs[e.index()].2));
        assert_eq!(mcf.solve(s, t, Some(4)).unwrap(), SolutionState::Optimal);
        assert_eq!(mcf.value(), 11);
        check_conservation(&g, &mcf, s, t);
    }

    #[test]
    fn test_cancel_without_cycle() {
        let g = network(&ARCS);
        let mut mcf = MinCostFlow::new(&g, |e| ARCS[e.index()].3, |e| Some(ARCS[e.index()].2));
        // no search has run, there are no predecessors
        assert!(matches!(mcf.cancel_cycle(0), Err(Error::InvalidData(_))));
        assert!(mcf.flow.iter().all(|&f| f == 0));
    }

    #[test]
    fn test_unbounded() {
        let arcs = [("s", "a", 1, 1), ("a", "b", 0, -1), ("b", "a", 0, 0), ("b", "t", 1, 1)];
        let g = network(&arcs);
        let s = g.node("s").unwrap();
        let t = g.node("t").unwrap();
        // arcs a-b and b-a are uncapacitated
        let (state, _, _) = min_cost_flow(
            &g,
            s,
            t,
            Some(1),
            |e| arcs[e.index()].3,
            |e| if arcs[e.index()].2 > 0 { Some(arcs[e.index()].2) } else { None },
        )
        .unwrap();
        assert_eq!(state, SolutionState::Unbounded);
    }

    #[test]
    fn test_float_costs() {
        let g = network(&ARCS);
        let s = g.node("s").unwrap();
        let t = g.node("t").unwrap();
        let (state, cost, _) = min_cost_flow(
            &g,
            s,
            t,
            Some(2.0),
            |e| ARCS[e.index()].3 as f64 * 0.5,
            |e| Some(ARCS[e.index()].2 as f64),
        )
        .unwrap();
        assert_eq!(state, SolutionState::Optimal);
        // two units along s-a-b-t
        assert!((cost - 3.0).abs() < 1e-9);
    }
}
