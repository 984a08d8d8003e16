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

//! Problem instances and their JSON format.
//!
//! An [`Instance`] is one of the supported problem types together with its
//! data. Instances are read from and written to JSON. The problem type is
//! given by the field `problem`:
//!
//! ```json
//! {
//!   "problem": "max-flow",
//!   "arcs": [["s", "a", 4], ["a", "t", 3], ["s", "t", 1]],
//!   "source": "s",
//!   "sink": "t"
//! }
//! ```
//!
//! Edges and arcs are triples `[from, to, weight]` where the weight is a
//! length, a cost or a capacity depending on the problem. The remaining
//! problem types take the fields of [`AssignmentProblem`],
//! [`TransportationProblem`] and [`TransshipmentProblem`].
//!
//! [`Instance::solve`] computes an [`Outcome`], [`Instance::verify`]
//! double checks an outcome with the brute force methods of
//! [`verify`](crate::verify).

use crate::assignment::{AssignmentProblem, AssignmentSolution, Deficit, ScheduleProblem, ScheduleSolution};
use crate::error::{Error, Result};
use crate::maxflow::{EdmondsKarp, ResidualPolicy};
use crate::mst::minimum_spanning_tree;
use crate::network::{Edge, Network, Node};
use crate::shortestpath::{dijkstra, Direction};
use crate::transport::{Balance, DemandMode, RowCheck, SupplyMode, TransportPlan, TransportationProblem};
use crate::transship::{Method, TransshipmentPlan, TransshipmentProblem};
use crate::verify;
use crate::SolutionState;

use serde_derive::{Deserialize, Serialize};
use std::io::Read;
use tracing::{debug, info};

/// Tolerance for comparing objective values.
const EPS: f64 = 1e-6;

/// An edge or arc `(from, to, weight)` given by node names.
pub type WeightedArc = (String, String, f64);

/// A problem instance.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "problem", rename_all = "kebab-case")]
pub enum Instance {
    /// Minimum spanning tree of an undirected network.
    SpanningTree { edges: Vec<WeightedArc> },
    /// Maximum flow, the weights are capacities.
    MaxFlow {
        arcs: Vec<WeightedArc>,
        source: String,
        sink: String,
        /// Search augmenting paths on forward arcs only.
        #[serde(default)]
        forward_only: bool,
    },
    /// Shortest path, optionally through intermediate stops.
    ShortestPath {
        arcs: Vec<WeightedArc>,
        source: String,
        target: String,
        #[serde(default)]
        via: Vec<String>,
        #[serde(default)]
        undirected: bool,
    },
    Assignment(AssignmentProblem),
    /// Assignments over several periods without repeated pairs.
    Schedule(ScheduleProblem),
    Transportation(TransportationProblem),
    Transshipment(TransshipmentProblem),
}

/// The result of a minimum spanning tree computation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreeOutcome {
    pub edges: Vec<WeightedArc>,
    pub weight: f64,
    /// `false` if the network is not connected.
    pub spanning: bool,
}

/// An augmenting path of a max-flow computation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AugmentingPath {
    pub nodes: Vec<String>,
    pub amount: f64,
}

/// The result of a max-flow computation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowOutcome {
    pub value: f64,
    /// Flow on every arc.
    pub flows: Vec<WeightedArc>,
    /// Source side of the cut.
    pub cut: Vec<String>,
    pub augmentations: Vec<AugmentingPath>,
    pub forward_only: bool,
}

/// The result of a shortest path computation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PathOutcome {
    /// The stops the path must visit, source and target included.
    pub stops: Vec<String>,
    /// The nodes on the path, `None` if there is no path.
    pub nodes: Option<Vec<String>>,
    pub length: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssignmentOutcome {
    pub agents: Vec<String>,
    pub tasks: Vec<String>,
    pub solution: AssignmentSolution,
    /// Scenarios with one task minimum reduced, only if the problem is
    /// infeasible.
    #[serde(default)]
    pub deficits: Vec<Deficit>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduleOutcome {
    pub agents: Vec<String>,
    pub tasks: Vec<String>,
    pub periods: Vec<String>,
    pub solution: ScheduleSolution,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransportOutcome {
    pub sources: Vec<String>,
    pub destinations: Vec<String>,
    pub balance: Balance,
    pub plan: TransportPlan,
    pub checks: Vec<RowCheck>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransshipOutcome {
    /// The arcs as `(from, to)`.
    pub arcs: Vec<(String, String)>,
    pub plan: TransshipmentPlan,
    pub checks: Vec<RowCheck>,
}

/// The solution of an [`Instance`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "problem", rename_all = "kebab-case")]
pub enum Outcome {
    SpanningTree(TreeOutcome),
    MaxFlow(FlowOutcome),
    ShortestPath(PathOutcome),
    Assignment(AssignmentOutcome),
    Schedule(ScheduleOutcome),
    Transportation(TransportOutcome),
    Transshipment(TransshipOutcome),
}

impl Outcome {
    /// The main objective value (weight, flow value, length or cost).
    pub fn value(&self) -> Option<f64> {
        match self {
            Outcome::SpanningTree(t) => Some(t.weight),
            Outcome::MaxFlow(f) => Some(f.value),
            Outcome::ShortestPath(p) => p.length,
            Outcome::Assignment(a) => optimal(a.solution.state, a.solution.cost),
            Outcome::Schedule(s) => optimal(s.solution.state, s.solution.cost),
            Outcome::Transportation(t) => optimal(t.plan.state, t.plan.cost),
            Outcome::Transshipment(t) => optimal(t.plan.state, t.plan.cost),
        }
    }
}

fn optimal(state: SolutionState, value: f64) -> Option<f64> {
    if state == SolutionState::Optimal {
        Some(value)
    } else {
        None
    }
}

/// The result of the verification of an [`Outcome`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Verification {
    /// The method used for verification.
    pub method: String,
    /// The objective value found by the verification.
    pub value: Option<f64>,
    /// `true` if the value equals the one of the outcome.
    pub agrees: bool,
    pub notes: Vec<String>,
}

impl Verification {
    fn compare(method: &str, value: Option<f64>, outcome: &Outcome) -> Self {
        let agrees = match (value, outcome.value()) {
            (Some(x), Some(y)) => (x - y).abs() <= EPS * (1.0 + y.abs()),
            (None, None) => true,
            _ => false,
        };
        Verification {
            method: method.to_string(),
            value,
            agrees,
            notes: vec![],
        }
    }

    /// The exit status of a program that verified an outcome, `2` if
    /// the verification disagrees.
    pub fn exit_status(&self) -> i32 {
        if self.agrees {
            0
        } else {
            2
        }
    }

    fn note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }
}

/// Build the network of a list of arcs and return it with the weights.
fn network(arcs: &[WeightedArc]) -> Result<(Network, Vec<f64>)> {
    if let Some(a) = arcs.iter().find(|a| !a.2.is_finite()) {
        return Err(Error::InvalidData(format!("weight of '{}' - '{}' is not finite", a.0, a.1)));
    }
    let g = Network::from_arcs(&arcs.iter().map(|a| (&a.0, &a.1)).collect::<Vec<_>>())?;
    Ok((g, arcs.iter().map(|a| a.2).collect()))
}

fn named_arcs(g: &Network, values: impl Iterator<Item = (Edge, f64)>) -> Vec<WeightedArc> {
    values
        .map(|(e, x)| {
            let (u, v) = g.edge_names(e);
            (u.to_string(), v.to_string(), x)
        })
        .collect()
}

fn names(g: &Network, nodes: &[Node]) -> Vec<String> {
    nodes.iter().map(|&u| g.name(u).to_string()).collect()
}

impl Instance {
    /// Read an instance from JSON.
    pub fn from_reader<R: Read>(r: R) -> Result<Instance> {
        Ok(serde_json::from_reader(r)?)
    }

    /// Read an instance from a JSON file.
    pub fn from_file(filename: &str) -> Result<Instance> {
        Instance::from_reader(std::io::BufReader::new(std::fs::File::open(filename)?))
    }

    /// Write the instance as pretty printed JSON.
    pub fn to_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The problem type as used in the JSON format.
    pub fn kind(&self) -> &'static str {
        match self {
            Instance::SpanningTree { .. } => "spanning-tree",
            Instance::MaxFlow { .. } => "max-flow",
            Instance::ShortestPath { .. } => "shortest-path",
            Instance::Assignment(_) => "assignment",
            Instance::Schedule(_) => "schedule",
            Instance::Transportation(_) => "transportation",
            Instance::Transshipment(_) => "transshipment",
        }
    }

    /// Solve the instance.
    pub fn solve(&self) -> Result<Outcome> {
        info!(problem = self.kind(), "solving instance");
        match self {
            Instance::SpanningTree { edges } => {
                let (g, w) = network(edges)?;
                let tree = minimum_spanning_tree(&g, |e| w[e.index()]);
                Ok(Outcome::SpanningTree(TreeOutcome {
                    edges: named_arcs(&g, tree.edges.iter().map(|&e| (e, w[e.index()]))),
                    weight: tree.weight,
                    spanning: tree.is_spanning(&g),
                }))
            }
            Instance::MaxFlow {
                arcs,
                source,
                sink,
                forward_only,
            } => {
                let (g, w) = network(arcs)?;
                let (s, t) = (g.node_or_err(source)?, g.node_or_err(sink)?);
                let policy = if *forward_only {
                    ResidualPolicy::ForwardOnly
                } else {
                    ResidualPolicy::Full
                };
                let mut maxflow = EdmondsKarp::new(&g).with_policy(policy);
                maxflow.solve(s, t, |e| w[e.index()])?;
                Ok(Outcome::MaxFlow(FlowOutcome {
                    value: maxflow.value(),
                    flows: named_arcs(&g, g.edges().map(|e| (e, maxflow.flow(e)))),
                    cut: names(&g, &maxflow.mincut()),
                    augmentations: maxflow
                        .augmentations()
                        .iter()
                        .map(|a| AugmentingPath {
                            nodes: names(&g, &a.nodes),
                            amount: a.amount,
                        })
                        .collect(),
                    forward_only: *forward_only,
                }))
            }
            Instance::ShortestPath {
                arcs,
                source,
                target,
                via,
                undirected,
            } => {
                let (g, w) = network(arcs)?;
                let dir = direction(*undirected);
                let stops = std::iter::once(source)
                    .chain(via.iter())
                    .chain(std::iter::once(target))
                    .map(|name| g.node_or_err(name))
                    .collect::<Result<Vec<_>>>()?;
                let path = dijkstra::find_path_via(&g, &stops, |e| w[e.index()], dir)?;
                Ok(Outcome::ShortestPath(PathOutcome {
                    stops: names(&g, &stops),
                    nodes: path.as_ref().map(|p| names(&g, &p.nodes)),
                    length: path.map(|p| p.length),
                }))
            }
            Instance::Assignment(p) => {
                let solution = p.solve()?;
                let deficits = if solution.state == SolutionState::Infeasible {
                    p.deficit_scenarios()?
                } else {
                    vec![]
                };
                Ok(Outcome::Assignment(AssignmentOutcome {
                    agents: p.agents.clone(),
                    tasks: p.tasks.clone(),
                    solution,
                    deficits,
                }))
            }
            Instance::Schedule(p) => Ok(Outcome::Schedule(ScheduleOutcome {
                agents: p.agents().to_vec(),
                tasks: p.tasks().to_vec(),
                periods: p.periods.iter().map(|q| q.name.clone()).collect(),
                solution: p.solve()?,
            })),
            Instance::Transportation(p) => {
                let plan = p.solve()?;
                let checks = if plan.state == SolutionState::Optimal {
                    plan.check(p)
                } else {
                    vec![]
                };
                Ok(Outcome::Transportation(TransportOutcome {
                    sources: p.sources.iter().map(|s| s.0.clone()).collect(),
                    destinations: p.destinations.iter().map(|d| d.0.clone()).collect(),
                    balance: p.balance(),
                    plan,
                    checks,
                }))
            }
            Instance::Transshipment(p) => {
                let plan = p.solve(Method::LinearProgram)?;
                let checks = if plan.state == SolutionState::Optimal {
                    plan.check(p)
                } else {
                    vec![]
                };
                Ok(Outcome::Transshipment(TransshipOutcome {
                    arcs: p.arcs.iter().map(|a| (a.from.clone(), a.to.clone())).collect(),
                    plan,
                    checks,
                }))
            }
        }
    }

    /// Verify an outcome of this instance by an independent method.
    pub fn verify(&self, outcome: &Outcome) -> Result<Verification> {
        let ver = match (self, outcome) {
            (Instance::SpanningTree { edges }, Outcome::SpanningTree(_)) => {
                let (g, w) = network(edges)?;
                let best = verify::spanning_trees(&g, |e| w[e.index()])?;
                Verification::compare("enumeration of spanning trees", best.map(|t| t.weight), outcome)
            }
            (Instance::MaxFlow { arcs, source, sink, .. }, Outcome::MaxFlow(flow)) => {
                let (g, w) = network(arcs)?;
                let (s, t) = (g.node_or_err(source)?, g.node_or_err(sink)?);
                let ver = match verify::min_cut(&g, s, t, |e| w[e.index()]) {
                    Ok((cap, cut)) => Verification::compare("enumeration of cuts", Some(cap), outcome)
                        .note(format!("minimum cut {{{}}}", names(&g, &cut).join(", "))),
                    Err(Error::TooLarge { .. }) => {
                        let mut maxflow = EdmondsKarp::new(&g);
                        maxflow.solve(s, t, |e| w[e.index()])?;
                        Verification::compare("edmonds-karp on the full residual network", Some(maxflow.value()), outcome)
                    }
                    Err(err) => return Err(err),
                };
                if flow.forward_only {
                    ver.note("augmenting paths used forward arcs only, the value is a lower bound".to_string())
                } else {
                    ver
                }
            }
            (
                Instance::ShortestPath {
                    arcs, via, undirected, ..
                },
                Outcome::ShortestPath(path),
            ) => {
                let (g, w) = network(arcs)?;
                let dir = direction(*undirected);
                let stops = path
                    .stops
                    .iter()
                    .map(|name| g.node_or_err(name))
                    .collect::<Result<Vec<_>>>()?;
                let mut length = Some(0.0);
                for leg in stops.windows(2) {
                    let l = verify::shortest_path_lp(&g, leg[0], leg[1], |e| w[e.index()], dir)?;
                    length = match (length, l) {
                        (Some(x), Some((y, _))) => Some(x + y),
                        _ => None,
                    };
                }
                let ver = Verification::compare("linear program", length, outcome);
                if via.is_empty() && stops.len() == 2 {
                    let paths = verify::simple_paths(&g, stops[0], stops[1], |e| w[e.index()], dir)?;
                    ver.note(format!("{} simple paths enumerated", paths.len()))
                } else {
                    ver
                }
            }
            (Instance::Assignment(p), Outcome::Assignment(_)) => {
                let best = verify::assignments(p)?;
                Verification::compare("enumeration of assignments", optimal(best.state, best.cost), outcome)
            }
            (Instance::Schedule(p), Outcome::Schedule(_)) => {
                let best = verify::schedules(p)?;
                Verification::compare("enumeration of schedules", optimal(best.state, best.cost), outcome)
            }
            (Instance::Transportation(p), Outcome::Transportation(t)) => {
                let plan = transport_network(p).solve(Method::NetworkFlow)?;
                let ver = Verification::compare("min cost flow", optimal(plan.state, plan.cost), outcome);
                let failed = t.checks.iter().filter(|c| !c.ok).count();
                ver.note(format!("{} of {} rows violated", failed, t.checks.len()))
            }
            (Instance::Transshipment(p), Outcome::Transshipment(t)) => {
                let plan = p.solve(Method::NetworkFlow)?;
                let ver = Verification::compare("min cost flow", optimal(plan.state, plan.cost), outcome);
                let failed = t.checks.iter().filter(|c| !c.ok).count();
                ver.note(format!("{} of {} rows violated", failed, t.checks.len()))
            }
            _ => {
                return Err(Error::InvalidData(format!(
                    "outcome does not belong to a {} instance",
                    self.kind()
                )))
            }
        };
        debug!(method = %ver.method, agrees = ver.agrees, "verification");
        Ok(ver)
    }
}

fn direction(undirected: bool) -> Direction {
    if undirected {
        Direction::Undirected
    } else {
        Direction::Directed
    }
}

/// Formulate a transportation problem as a transshipment network.
///
/// Unused supply and extra deliveries flow to an additional node whose
/// demand is the difference of total supply and total demand.
fn transport_network(p: &TransportationProblem) -> TransshipmentProblem {
    const EXTRA: &str = "*extra*";
    let src = |i: usize| format!("s{}:{}", i, p.sources[i].0);
    let dst = |j: usize| format!("d{}:{}", j, p.destinations[j].0);

    let mut nodes: Vec<(String, f64)> = (0..p.sources.len()).map(|i| (src(i), p.sources[i].1)).collect();
    nodes.extend((0..p.destinations.len()).map(|j| (dst(j), -p.destinations[j].1)));
    let surplus = p.total_supply() - p.total_demand();
    if surplus > 0.0 {
        nodes.push((EXTRA.to_string(), -surplus));
    }
    let mut t = TransshipmentProblem::new(&nodes);

    for (i, row) in p.costs.iter().enumerate() {
        for (j, c) in row.iter().enumerate() {
            if let Some(c) = *c {
                t = match p.route_limit(i, j) {
                    Some(max) => t.capacitated_arc(&src(i), &dst(j), c, max),
                    None => t.arc(&src(i), &dst(j), c),
                };
            }
        }
    }
    if surplus > 0.0 {
        if p.supply == SupplyMode::AtMost {
            for i in 0..p.sources.len() {
                t = t.arc(&src(i), EXTRA, 0.0);
            }
        }
        if p.demand == DemandMode::AtLeast {
            for j in 0..p.destinations.len() {
                t = t.arc(&dst(j), EXTRA, 0.0);
            }
        }
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAXFLOW: &str = r#"{
        "problem": "max-flow",
        "arcs": [["s", "a", 1], ["s", "b", 1], ["a", "b", 1], ["a", "t", 1], ["b", "t", 1]],
        "source": "s",
        "sink": "t"
    }"#;

    #[test]
    fn test_read_max_flow() {
        let inst = Instance::from_reader(MAXFLOW.as_bytes()).unwrap();
        assert_eq!(inst.kind(), "max-flow");
        let out = inst.solve().unwrap();
        assert_eq!(out.value(), Some(2.0));
        let ver = inst.verify(&out).unwrap();
        assert!(ver.agrees);
        assert_eq!(ver.value, Some(2.0));
    }

    #[test]
    fn test_json_roundtrip() {
        let inst = Instance::from_reader(MAXFLOW.as_bytes()).unwrap();
        let text = inst.to_string().unwrap();
        assert!(text.contains("\"problem\": \"max-flow\""));
        assert!(text.contains("\"forward_only\": false"));
        let again = Instance::from_reader(text.as_bytes()).unwrap();
        assert_eq!(again.solve().unwrap().value(), Some(2.0));
    }

    #[test]
    fn test_shortest_path_via() {
        let inst = Instance::ShortestPath {
            arcs: vec![
                ("a".to_string(), "b".to_string(), 1.0),
                ("b".to_string(), "c".to_string(), 1.0),
                ("a".to_string(), "c".to_string(), 5.0),
            ],
            source: "a".to_string(),
            target: "c".to_string(),
            via: vec![],
            undirected: false,
        };
        let out = inst.solve().unwrap();
        match out {
            Outcome::ShortestPath(ref p) => {
                assert_eq!(p.length, Some(2.0));
                assert_eq!(p.nodes.as_ref().map(|n| n.len()), Some(3));
            }
            _ => panic!("wrong outcome"),
        }
        let ver = inst.verify(&out).unwrap();
        assert!(ver.agrees);
        assert_eq!(ver.notes, vec!["2 simple paths enumerated".to_string()]);
    }

    #[test]
    fn test_transport_network() {
        let p = TransportationProblem::new(
            &[("x", 5.0), ("y", 5.0)],
            &[("u", 3.0), ("v", 3.0)],
            vec![vec![1.0, 2.0], vec![3.0, 1.0]],
        );
        let inst = Instance::Transportation(p.clone());
        let out = inst.solve().unwrap();
        assert_eq!(out.value(), Some(6.0));
        assert!(inst.verify(&out).unwrap().agrees);

        // all supply must be shipped, the cheapest cells take the surplus
        let q = p.with_demand(DemandMode::AtLeast).with_supply(SupplyMode::Exact);
        let inst = Instance::Transportation(q);
        let out = inst.solve().unwrap();
        assert_eq!(out.value(), Some(10.0));
        assert!(inst.verify(&out).unwrap().agrees);
    }

    #[test]
    fn test_mismatch() {
        let inst = Instance::from_reader(MAXFLOW.as_bytes()).unwrap();
        let other = Instance::SpanningTree {
            edges: vec![("a".to_string(), "b".to_string(), 1.0)],
        };
        let out = other.solve().unwrap();
        assert!(matches!(inst.verify(&out), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_exit_status() {
        let inst = Instance::from_reader(MAXFLOW.as_bytes()).unwrap();
        let out = inst.solve().unwrap();
        let mut ver = inst.verify(&out).unwrap();
        assert_eq!(ver.exit_status(), 0);
        ver.agrees = false;
        assert_eq!(ver.exit_status(), 2);
    }

    #[test]
    fn test_unknown_node() {
        let text = MAXFLOW.replace("\"sink\": \"t\"", "\"sink\": \"z\"");
        let inst = Instance::from_reader(text.as_bytes()).unwrap();
        assert!(matches!(inst.solve(), Err(Error::UnknownNode(ref n)) if n == "z"));
    }
}
