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

//! Transshipment problems.
//!
//! A transshipment problem is a network where some nodes supply goods
//! (positive balance), some demand goods (negative balance) and the
//! remaining nodes are transit points. Goods are shipped along arcs with a
//! unit cost and an optional capacity.
//!
//! The problem can be solved either as a linear program with one variable
//! per arc or as a min-cost flow from a super source to a super sink, see
//! [`Method`].
//!
//! # Example
//!
//! ```
//! use rs_netopt::transship::{Method, TransshipmentProblem};
//!
//! let p = TransshipmentProblem::new(&[("plant", 10.0), ("hub", 0.0), ("shop", -10.0)])
//!     .arc("plant", "hub", 1.0)
//!     .arc("hub", "shop", 2.0)
//!     .arc("plant", "shop", 4.0);
//! let plan = p.solve(Method::NetworkFlow).unwrap();
//! assert_eq!(plan.cost, 30.0);
//! assert_eq!(plan.flows, vec![10.0, 10.0, 0.0]);
//! ```

use crate::error::{Error, Result};
use crate::lp::{Problem, Relation, Sense, SolutionState, Var};
use crate::mcf::MinCostFlow;
use crate::network::{Network, NetworkBuilder, Node};
use crate::transport::RowCheck;

use serde_derive::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

const EPS: f64 = 1e-6;

/// An arc of a transshipment network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub from: String,
    pub to: String,
    pub cost: f64,
    /// No capacity bound if `None`.
    #[serde(default)]
    pub capacity: Option<f64>,
}

/// Solution method of a transshipment problem.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    LinearProgram,
    NetworkFlow,
}

impl Default for Method {
    fn default() -> Self {
        Method::LinearProgram
    }
}

/// A transshipment problem.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TransshipmentProblem {
    /// Nodes with their balance, positive for supply and negative for demand.
    pub nodes: Vec<(String, f64)>,
    pub arcs: Vec<Arc>,
}

/// The solution of a [`TransshipmentProblem`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransshipmentPlan {
    pub state: SolutionState,
    pub cost: f64,
    /// The flow on each arc, empty unless the state is `Optimal`.
    pub flows: Vec<f64>,
}

impl TransshipmentPlan {
    fn empty(state: SolutionState) -> Self {
        TransshipmentPlan {
            state,
            cost: 0.0,
            flows: vec![],
        }
    }

    /// The flow on arc `a`.
    pub fn flow(&self, a: usize) -> f64 {
        self.flows.get(a).copied().unwrap_or(0.0)
    }

    /// Outflow minus inflow of the node with the given name.
    pub fn net_outflow(&self, problem: &TransshipmentProblem, name: &str) -> f64 {
        let mut net = 0.0;
        for (a, arc) in problem.arcs.iter().enumerate() {
            if arc.from == name {
                net += self.flow(a);
            }
            if arc.to == name {
                net -= self.flow(a);
            }
        }
        net
    }

    /// Compare the net outflow of every node with its balance.
    pub fn check(&self, problem: &TransshipmentProblem) -> Vec<RowCheck> {
        let excess = problem.total_supply() > problem.total_demand() + EPS;
        let mut checks: Vec<RowCheck> = problem
            .nodes
            .iter()
            .map(|(name, b)| {
                let actual = self.net_outflow(problem, name);
                let relation = if excess && *b > 0.0 { Relation::Le } else { Relation::Eq };
                let ok = match relation {
                    Relation::Le => actual <= b + EPS && actual >= -EPS,
                    _ => (actual - b).abs() <= EPS,
                };
                RowCheck {
                    name: name.clone(),
                    relation,
                    limit: *b,
                    actual,
                    ok,
                }
            })
            .collect();
        for (a, arc) in problem.arcs.iter().enumerate() {
            let x = self.flow(a);
            if x < -EPS || arc.capacity.map_or(false, |cap| x > cap + EPS) {
                checks.push(RowCheck {
                    name: format!("{} -> {}", arc.from, arc.to),
                    relation: Relation::Le,
                    limit: arc.capacity.unwrap_or(f64::INFINITY),
                    actual: x,
                    ok: false,
                });
            }
        }
        checks
    }
}

impl TransshipmentProblem {
    /// Create a problem without arcs.
    pub fn new<S: AsRef<str>>(nodes: &[(S, f64)]) -> Self {
        TransshipmentProblem {
            nodes: nodes.iter().map(|(n, b)| (n.as_ref().to_string(), *b)).collect(),
            arcs: vec![],
        }
    }

    /// Add an uncapacitated arc.
    pub fn arc(self, from: &str, to: &str, cost: f64) -> Self {
        self.push_arc(from, to, cost, None)
    }

    /// Add an arc with a capacity.
    pub fn capacitated_arc(self, from: &str, to: &str, cost: f64, capacity: f64) -> Self {
        self.push_arc(from, to, cost, Some(capacity))
    }

    fn push_arc(mut self, from: &str, to: &str, cost: f64, capacity: Option<f64>) -> Self {
        self.arcs.push(Arc {
            from: from.to_string(),
            to: to.to_string(),
            cost,
            capacity,
        });
        self
    }

    pub fn total_supply(&self) -> f64 {
        self.nodes.iter().map(|n| n.1).filter(|&b| b > 0.0).sum()
    }

    pub fn total_demand(&self) -> f64 {
        -self.nodes.iter().map(|n| n.1).filter(|&b| b < 0.0).sum::<f64>()
    }

    /// Map node names to indices and check the data.
    fn indices(&self) -> Result<(HashMap<&str, usize>, Vec<(usize, usize)>)> {
        let mut index = HashMap::with_capacity(self.nodes.len());
        for (i, (name, b)) in self.nodes.iter().enumerate() {
            if index.insert(name.as_str(), i).is_some() {
                return Err(Error::DuplicateNode(name.clone()));
            }
            if !b.is_finite() {
                return Err(Error::InvalidData(format!("balance of '{}' is not finite", name)));
            }
        }
        let mut ends = Vec::with_capacity(self.arcs.len());
        for arc in &self.arcs {
            let u = *index
                .get(arc.from.as_str())
                .ok_or_else(|| Error::UnknownNode(arc.from.clone()))?;
            let v = *index.get(arc.to.as_str()).ok_or_else(|| Error::UnknownNode(arc.to.clone()))?;
            if u == v {
                return Err(Error::Loop(arc.from.clone()));
            }
            if !arc.cost.is_finite() || arc.capacity.map_or(false, |c| c.is_nan() || c < 0.0) {
                return Err(Error::InvalidData(format!(
                    "arc '{}' -> '{}' needs a finite cost and a non-negative capacity",
                    arc.from, arc.to
                )));
            }
            ends.push((u, v));
        }
        Ok((index, ends))
    }

    /// Check node names and arc data.
    pub fn validate(&self) -> Result<()> {
        self.indices().map(|_| ())
    }

    /// Build the network of the problem.
    ///
    /// Nodes and edges have the same indices as in the problem.
    pub fn network(&self) -> Result<Network> {
        let (_, ends) = self.indices()?;
        Network::new_with(|b| self.build(b, &ends).map(|_| ()))
    }

    fn build(&self, b: &mut NetworkBuilder, ends: &[(usize, usize)]) -> Result<Vec<Node>> {
        let nodes = self
            .nodes
            .iter()
            .map(|(name, _)| b.add_node(name))
            .collect::<Result<Vec<_>>>()?;
        for &(u, v) in ends {
            b.add_edge(nodes[u], nodes[v])?;
        }
        Ok(nodes)
    }

    /// Solve the problem with the given method.
    pub fn solve(&self, method: Method) -> Result<TransshipmentPlan> {
        let (_, ends) = self.indices()?;
        debug!(
            nodes = self.nodes.len(),
            arcs = self.arcs.len(),
            supply = self.total_supply(),
            demand = self.total_demand(),
            ?method,
            "transshipment model"
        );
        match method {
            Method::LinearProgram => self.solve_lp(&ends),
            Method::NetworkFlow => self.solve_flow(&ends),
        }
    }

    fn solve_lp(&self, ends: &[(usize, usize)]) -> Result<TransshipmentPlan> {
        let mut lp = Problem::new(Sense::Minimize);
        let mut vars: Vec<Var> = Vec::with_capacity(self.arcs.len());
        for (a, arc) in self.arcs.iter().enumerate() {
            let upper = arc.capacity.unwrap_or(f64::INFINITY);
            vars.push(lp.add_var(&format!("x_{}_{}_{}", a, arc.from, arc.to), 0.0, upper, false)?);
        }

        // supply nodes may keep part of their supply if there is an excess
        let excess = self.total_supply() > self.total_demand() + EPS;
        for (i, (name, b)) in self.nodes.iter().enumerate() {
            let mut terms: Vec<(Var, f64)> = vec![];
            for (a, &(u, v)) in ends.iter().enumerate() {
                if u == i {
                    terms.push((vars[a], 1.0));
                } else if v == i {
                    terms.push((vars[a], -1.0));
                }
            }
            if excess && *b > 0.0 {
                let used = lp.add_var(&format!("supply_{}", name), 0.0, *b, false)?;
                terms.push((used, -1.0));
                lp.add_constraint(terms, Relation::Eq, 0.0)?;
            } else {
                lp.add_constraint(terms, Relation::Eq, *b)?;
            }
        }
        lp.set_objective(vars.iter().zip(&self.arcs).map(|(&x, arc)| (x, arc.cost)).collect())?;

        let sol = lp.solve()?;
        if !sol.is_optimal() {
            return Ok(TransshipmentPlan::empty(sol.state));
        }
        Ok(TransshipmentPlan {
            state: SolutionState::Optimal,
            cost: sol.objective,
            flows: vars.iter().map(|&x| sol.value(x)).collect(),
        })
    }

    fn solve_flow(&self, ends: &[(usize, usize)]) -> Result<TransshipmentPlan> {
        let m = self.arcs.len();
        // upper bounds of the edges from the super source and to the super sink
        let mut terminal = vec![];
        let (g, src, snk) = {
            let mut b = NetworkBuilder::with_capacities(self.nodes.len() + 2, m + self.nodes.len());
            let nodes = self.build(&mut b, ends)?;
            let src = b.add_node("*source*")?;
            let snk = b.add_node("*sink*")?;
            for (u, &(_, bal)) in nodes.iter().zip(self.nodes.iter()) {
                if bal > 0.0 {
                    b.add_edge(src, *u)?;
                    terminal.push(bal);
                } else if bal < 0.0 {
                    b.add_edge(*u, snk)?;
                    terminal.push(-bal);
                }
            }
            (b.into_network(), src, snk)
        };

        let mut mcf = MinCostFlow::new(
            &g,
            |e| self.arcs.get(e.index()).map_or(0.0, |arc| arc.cost),
            |e| match self.arcs.get(e.index()) {
                Some(arc) => arc.capacity,
                None => Some(terminal[e.index() - m]),
            },
        );
        let state = mcf.solve(src, snk, Some(self.total_demand()))?;
        if state != SolutionState::Optimal {
            return Ok(TransshipmentPlan::empty(state));
        }
        Ok(TransshipmentPlan {
            state,
            cost: mcf.value(),
            flows: g.edges().take(m).map(|e| mcf.flow(e)).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fuel() -> TransshipmentProblem {
        TransshipmentProblem::new(&[
            ("1", 5000.0),
            ("2", 6000.0),
            ("3", 0.0),
            ("4", 0.0),
            ("5", 0.0),
            ("6", -2000.0),
            ("7", -9000.0),
        ])
        .arc("1", "7", 20.0)
        .arc("1", "3", 3.0)
        .arc("2", "3", 9.0)
        .arc("2", "6", 30.0)
        .arc("3", "7", 40.0)
        .arc("3", "5", 10.0)
        .arc("4", "7", 8.0)
        .arc("5", "4", 7.0)
        .arc("5", "6", 2.0)
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{} != {}", a, b);
    }

    #[test]
    fn test_both_methods() {
        let p = fuel();
        for &method in &[Method::LinearProgram, Method::NetworkFlow] {
            let plan = p.solve(method).unwrap();
            assert_eq!(plan.state, SolutionState::Optimal);
            assert_close(plan.cost, 278_000.0);
            assert_close(plan.flow(0), 5000.0);
            assert_close(plan.net_outflow(&p, "5"), 0.0);
            assert!(plan.check(&p).iter().all(|c| c.ok));
        }
    }

    #[test]
    fn test_capacity() {
        let mut p = fuel();
        p.arcs[7].capacity = Some(3000.0);
        for &method in &[Method::LinearProgram, Method::NetworkFlow] {
            let plan = p.solve(method).unwrap();
            assert_close(plan.cost, 293_000.0);
            assert!(plan.flow(7) <= 3000.0 + 1e-9);
        }
    }

    #[test]
    fn test_excess_supply() {
        let mut p = fuel();
        p.nodes[0].1 = 6000.0;
        for &method in &[Method::LinearProgram, Method::NetworkFlow] {
            let plan = p.solve(method).unwrap();
            assert_eq!(plan.state, SolutionState::Optimal);
            assert_close(plan.cost, 264_000.0);
            let shipped = plan.net_outflow(&p, "1") + plan.net_outflow(&p, "2");
            assert_close(shipped, 11_000.0);
        }
    }

    #[test]
    fn test_shortage() {
        let mut p = fuel();
        p.nodes[6].1 = -10_000.0;
        for &method in &[Method::LinearProgram, Method::NetworkFlow] {
            assert_eq!(p.solve(method).unwrap().state, SolutionState::Infeasible);
        }
    }

    #[test]
    fn test_invalid() {
        let p = fuel().arc("1", "8", 1.0);
        assert!(matches!(p.solve(Method::LinearProgram), Err(Error::UnknownNode(ref n)) if n == "8"));
        let p = fuel().arc("3", "3", 1.0);
        assert!(matches!(p.validate(), Err(Error::Loop(_))));
        let g = fuel().network().unwrap();
        assert_eq!(g.num_edges(), 9);
        assert_eq!(g.edge_names(g.id2edge(7)), ("5", "4"));
    }
}
