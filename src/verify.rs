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

//! Brute force verification.
//!
//! The functions in this module solve small problems by complete
//! enumeration (or, for shortest paths, by an independent linear program).
//! They are used to double check the results of the real algorithms. Each
//! enumeration refuses to run if the search space exceeds a fixed limit
//! and returns [`Error::TooLarge`] instead.

use crate::assignment::{AssignmentProblem, AssignmentSolution, Pair, ScheduleProblem, ScheduleSolution};
use crate::error::{Error, Result};
use crate::lp::{Problem, Relation, Sense, SolutionState, Var};
use crate::mst::SpanningTree;
use crate::network::{Edge, Network, Node};
use crate::shortestpath::{Direction, Path};
use crate::unionfind::DisjointSets;

use num_traits::NumAssign;
use std::cmp::Ordering;
use tracing::debug;

/// Maximal number of edge subsets or paths to enumerate.
pub const MAX_COMBINATIONS: usize = 1 << 20;

/// Maximal number of nodes besides source and sink for cut enumeration.
pub const MAX_CUT_NODES: usize = 20;

/// Maximal number of allowed pairs for assignment enumeration.
pub const MAX_PAIRS: usize = 20;

/// Number of `k` element subsets of an `n` element set, saturating at
/// `usize::MAX`.
fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut r: usize = 1;
    for i in 0..k {
        // r * (n - i) / (i + 1) is always integral
        r = match r.checked_mul(n - i) {
            Some(x) => x / (i + 1),
            None => return usize::MAX,
        };
    }
    r
}

/// Find a minimum spanning tree by trying every subset of `n - 1` edges.
///
/// Returns `None` if the network is not connected. Among trees of equal
/// weight the one with lexicographically smallest edge indices is returned.
pub fn spanning_trees<W, F>(g: &Network, weights: F) -> Result<Option<SpanningTree<W>>>
where
    W: NumAssign + PartialOrd + Copy,
    F: Fn(Edge) -> W,
{
    let n = g.num_nodes();
    if n <= 1 {
        return Ok(Some(SpanningTree {
            edges: vec![],
            weight: W::zero(),
        }));
    }
    let m = g.num_edges();
    let k = n - 1;
    let size = binomial(m, k);
    if size > MAX_COMBINATIONS {
        return Err(Error::TooLarge {
            what: "spanning tree enumeration",
            size,
            limit: MAX_COMBINATIONS,
        });
    }
    if m < k {
        return Ok(None);
    }

    let edges: Vec<Edge> = g.edges().collect();
    let mut best: Option<SpanningTree<W>> = None;
    let mut trees = 0;
    let mut idx: Vec<usize> = (0..k).collect();
    loop {
        let mut comps = DisjointSets::new(n);
        let is_tree = idx.iter().all(|&i| {
            let (u, v) = g.enodes(edges[i]);
            comps.union(u.index(), v.index())
        });
        if is_tree {
            trees += 1;
            let mut weight = W::zero();
            for &i in &idx {
                weight += weights(edges[i]);
            }
            if best.as_ref().map_or(true, |b| weight < b.weight) {
                best = Some(SpanningTree {
                    edges: idx.iter().map(|&i| edges[i]).collect(),
                    weight,
                });
            }
        }

        // next combination in lexicographic order
        let mut i = k;
        while i > 0 && idx[i - 1] == m - k + i - 1 {
            i -= 1;
        }
        if i == 0 {
            break;
        }
        idx[i - 1] += 1;
        for j in i..k {
            idx[j] = idx[j - 1] + 1;
        }
    }
    debug!(subsets = size, trees, "spanning trees enumerated");
    Ok(best)
}

/// Enumerate all simple paths from `src` to `snk` sorted by length.
///
/// Paths of equal length keep the order in which the depth first search
/// found them.
pub fn simple_paths<D, W>(g: &Network, src: Node, snk: Node, weights: W, dir: Direction) -> Result<Vec<Path<D>>>
where
    D: NumAssign + PartialOrd + Copy,
    W: Fn(Edge) -> D,
{
    struct Search<'a, D, W> {
        g: &'a Network,
        snk: Node,
        weights: W,
        dir: Direction,
        visited: Vec<bool>,
        nodes: Vec<Node>,
        edges: Vec<Edge>,
        paths: Vec<Path<D>>,
    }

    impl<'a, D, W> Search<'a, D, W>
    where
        D: NumAssign + PartialOrd + Copy,
        W: Fn(Edge) -> D,
    {
        fn extend(&mut self, u: Node) -> Result<()> {
            if u == self.snk {
                if self.paths.len() >= MAX_COMBINATIONS {
                    return Err(Error::TooLarge {
                        what: "path enumeration",
                        size: self.paths.len() + 1,
                        limit: MAX_COMBINATIONS,
                    });
                }
                let mut length = D::zero();
                for &e in &self.edges {
                    length += (self.weights)(e);
                }
                self.paths.push(Path {
                    nodes: self.nodes.clone(),
                    edges: self.edges.clone(),
                    length,
                });
                return Ok(());
            }
            let next: Vec<(Edge, Node)> = match self.dir {
                Direction::Directed => self.g.outedges(u).collect(),
                Direction::Undirected => self.g.neighs(u).collect(),
            };
            for (e, v) in next {
                if self.visited[v.index()] {
                    continue;
                }
                self.visited[v.index()] = true;
                self.nodes.push(v);
                self.edges.push(e);
                self.extend(v)?;
                self.edges.pop();
                self.nodes.pop();
                self.visited[v.index()] = false;
            }
            Ok(())
        }
    }

    let mut search = Search {
        g,
        snk,
        weights,
        dir,
        visited: vec![false; g.num_nodes()],
        nodes: vec![src],
        edges: vec![],
        paths: vec![],
    };
    search.visited[src.index()] = true;
    search.extend(src)?;

    let mut paths = search.paths;
    paths.sort_by(|p, q| p.length.partial_cmp(&q.length).unwrap_or(Ordering::Equal));
    debug!(paths = paths.len(), "simple paths enumerated");
    Ok(paths)
}

/// Find a minimum `src`-`snk` cut by trying every node subset.
///
/// Returns the capacity of the cut and the nodes on the source side.
pub fn min_cut<F, Us>(g: &Network, src: Node, snk: Node, upper: Us) -> Result<(F, Vec<Node>)>
where
    F: NumAssign + PartialOrd + Copy,
    Us: Fn(Edge) -> F,
{
    if src == snk {
        return Err(Error::SameSourceSink);
    }
    let free: Vec<Node> = g.nodes().filter(|&u| u != src && u != snk).collect();
    if free.len() > MAX_CUT_NODES {
        return Err(Error::TooLarge {
            what: "cut enumeration",
            size: free.len(),
            limit: MAX_CUT_NODES,
        });
    }

    let upper: Vec<F> = g.edges().map(upper).collect();
    let mut inside = vec![false; g.num_nodes()];
    let mut best: Option<(F, u32)> = None;
    for mask in 0u32..(1 << free.len()) {
        inside[src.index()] = true;
        for (i, u) in free.iter().enumerate() {
            inside[u.index()] = mask & (1 << i) != 0;
        }
        let mut cap = F::zero();
        for e in g.edges() {
            let (u, v) = g.enodes(e);
            if inside[u.index()] && !inside[v.index()] {
                cap += upper[e.index()];
            }
        }
        if best.map_or(true, |(b, _)| cap < b) {
            best = Some((cap, mask));
        }
    }

    match best {
        Some((cap, mask)) => {
            let mut cut = vec![src];
            cut.extend(free.iter().enumerate().filter(|&(i, _)| mask & (1 << i) != 0).map(|(_, &u)| u));
            cut.sort();
            Ok((cap, cut))
        }
        None => Ok((F::zero(), vec![src])),
    }
}

/// All feasible sets of pairs of an assignment problem.
fn feasible_assignments(problem: &AssignmentProblem) -> Result<Vec<Vec<(usize, usize)>>> {
    problem.validate()?;
    let pairs = problem.allowed_pairs();
    if pairs.len() > MAX_PAIRS {
        return Err(Error::TooLarge {
            what: "assignment enumeration",
            size: pairs.len(),
            limit: MAX_PAIRS,
        });
    }
    let mut feasible = vec![];
    for mask in 0u32..(1 << pairs.len()) {
        let chosen: Vec<_> = pairs
            .iter()
            .enumerate()
            .filter(|&(i, _)| mask & (1 << i) != 0)
            .map(|(_, &p)| p)
            .collect();
        if problem.is_feasible(&chosen) {
            feasible.push(chosen);
        }
    }
    debug!(pairs = pairs.len(), feasible = feasible.len(), "assignments enumerated");
    Ok(feasible)
}

fn better(sense: Sense, a: f64, b: f64) -> bool {
    match sense {
        Sense::Minimize => a < b,
        Sense::Maximize => a > b,
    }
}

fn assignment_solution(problem: &AssignmentProblem, mut chosen: Vec<(usize, usize)>) -> AssignmentSolution {
    chosen.sort();
    let pairs: Vec<_> = chosen
        .into_iter()
        .filter_map(|(i, j)| problem.costs[i][j].map(|cost| Pair { agent: i, task: j, cost }))
        .collect();
    AssignmentSolution {
        state: SolutionState::Optimal,
        cost: pairs.iter().map(|p| p.cost).sum(),
        pairs,
    }
}

/// Solve an assignment problem by trying every subset of allowed pairs.
pub fn assignments(problem: &AssignmentProblem) -> Result<AssignmentSolution> {
    let mut best: Option<(f64, Vec<(usize, usize)>)> = None;
    for chosen in feasible_assignments(problem)? {
        let cost = problem.cost_of(&chosen);
        if best.as_ref().map_or(true, |(b, _)| better(problem.sense, cost, *b)) {
            best = Some((cost, chosen));
        }
    }

    Ok(match best {
        Some((_, chosen)) => assignment_solution(problem, chosen),
        None => AssignmentSolution {
            state: SolutionState::Infeasible,
            cost: 0.0,
            pairs: vec![],
        },
    })
}

/// Solve a schedule by combining the feasible assignments of all periods.
///
/// Combinations in which an agent does a task in two periods are skipped.
pub fn schedules(problem: &ScheduleProblem) -> Result<ScheduleSolution> {
    problem.validate()?;
    let options = problem
        .periods
        .iter()
        .map(|p| feasible_assignments(&p.problem))
        .collect::<Result<Vec<_>>>()?;
    let size = options.iter().try_fold(1usize, |n, o| n.checked_mul(o.len().max(1)));
    let size = match size {
        Some(size) if size <= MAX_COMBINATIONS => size,
        _ => {
            return Err(Error::TooLarge {
                what: "schedule enumeration",
                size: size.unwrap_or(usize::MAX),
                limit: MAX_COMBINATIONS,
            })
        }
    };

    let sense = problem.sense();
    let mut best: Option<(f64, Vec<usize>)> = None;
    let mut valid = 0;
    // odometer over one choice per period
    let mut index = vec![0; options.len()];
    if options.iter().all(|o| !o.is_empty()) {
        loop {
            let chosen: Vec<_> = index.iter().zip(&options).map(|(&k, o)| o[k].clone()).collect();
            if problem.is_feasible(&chosen) {
                valid += 1;
                let cost: f64 = problem
                    .periods
                    .iter()
                    .zip(&chosen)
                    .map(|(p, pairs)| p.problem.cost_of(pairs))
                    .sum();
                if best.as_ref().map_or(true, |(b, _)| better(sense, cost, *b)) {
                    best = Some((cost, index.clone()));
                }
            }

            let mut pos = 0;
            while pos < index.len() {
                index[pos] += 1;
                if index[pos] < options[pos].len() {
                    break;
                }
                index[pos] = 0;
                pos += 1;
            }
            if pos == index.len() {
                break;
            }
        }
    }
    debug!(combinations = size, valid, "schedules enumerated");

    Ok(match best {
        Some((_, index)) => {
            let periods: Vec<_> = problem
                .periods
                .iter()
                .zip(index.into_iter().zip(&options))
                .map(|(p, (k, o))| assignment_solution(&p.problem, o[k].clone()))
                .collect();
            ScheduleSolution {
                state: SolutionState::Optimal,
                cost: periods.iter().map(|p| p.cost).sum(),
                periods,
            }
        }
        None => ScheduleSolution {
            state: SolutionState::Infeasible,
            cost: 0.0,
            periods: vec![],
        },
    })
}

/// Compute a shortest path as a linear program.
///
/// The path is modelled as one unit of flow from `src` to `snk`. Each edge
/// gets a variable in `[0, 1]` per usable direction. Returns the length
/// and the edges of the path, sorted by index, or `None` if `snk` is not
/// reachable.
pub fn shortest_path_lp<W>(g: &Network, src: Node, snk: Node, weights: W, dir: Direction) -> Result<Option<(f64, Vec<Edge>)>>
where
    W: Fn(Edge) -> f64,
{
    if src == snk {
        return Ok(Some((0.0, vec![])));
    }
    let mut lp = Problem::new(Sense::Minimize);
    // (edge, tail, head, variable)
    let mut arcs: Vec<(Edge, Node, Node, Var)> = vec![];
    for e in g.edges() {
        let (u, v) = g.enodes(e);
        arcs.push((e, u, v, lp.add_var(&format!("x_{}", e.index()), 0.0, 1.0, false)?));
        if dir == Direction::Undirected {
            arcs.push((e, v, u, lp.add_var(&format!("y_{}", e.index()), 0.0, 1.0, false)?));
        }
    }
    for u in g.nodes() {
        let terms = arcs
            .iter()
            .filter_map(|&(_, a, b, x)| {
                if a == u {
                    Some((x, 1.0))
                } else if b == u {
                    Some((x, -1.0))
                } else {
                    None
                }
            })
            .collect();
        let rhs = if u == src {
            1.0
        } else if u == snk {
            -1.0
        } else {
            0.0
        };
        lp.add_constraint(terms, Relation::Eq, rhs)?;
    }
    lp.set_objective(arcs.iter().map(|&(e, _, _, x)| (x, weights(e))).collect())?;

    let sol = lp.solve()?;
    if !sol.is_optimal() {
        return Ok(None);
    }
    let mut edges: Vec<Edge> = arcs
        .iter()
        .filter(|&&(_, _, _, x)| sol.value(x) > 0.5)
        .map(|&(e, _, _, _)| e)
        .collect();
    edges.sort();
    edges.dedup();
    Ok(Some((sol.objective, edges)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::Limits;
    use crate::maxflow::edmondskarp;
    use crate::mst::minimum_spanning_tree;
    use crate::shortestpath::dijkstra;

    const ARCS: [(&str, &str, i32); 9] = [
        ("a", "b", 9),
        ("a", "c", 2),
        ("a", "e", 14),
        ("b", "d", 6),
        ("c", "d", 8),
        ("c", "e", 9),
        ("c", "f", 10),
        ("d", "f", 15),
        ("e", "f", 7),
    ];

    fn network() -> Network {
        Network::from_arcs(&ARCS.iter().map(|a| (a.0, a.1)).collect::<Vec<_>>()).unwrap()
    }

    fn weight(e: Edge) -> i32 {
        ARCS[e.index()].2
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(9, 5), 126);
        assert_eq!(binomial(4, 0), 1);
        assert_eq!(binomial(3, 4), 0);
        assert_eq!(binomial(200, 100), usize::MAX);
    }

    #[test]
    fn test_spanning_trees() {
        let g = network();
        let tree = spanning_trees(&g, weight).unwrap().unwrap();
        assert_eq!(tree.weight, 32);
        assert!(tree.is_spanning(&g));
        assert_eq!(tree.weight, minimum_spanning_tree(&g, weight).weight);

        let g = Network::from_arcs(&[("a", "b"), ("c", "d"), ("a", "d")]).unwrap();
        assert!(spanning_trees(&Network::from_arcs(&[("a", "b"), ("c", "d")]).unwrap(), |_| 1)
            .unwrap()
            .is_none());
        assert_eq!(spanning_trees(&g, |_| 1).unwrap().map(|t| t.weight), Some(3));
    }

    #[test]
    fn test_simple_paths() {
        let g = network();
        let (a, f) = (g.node("a").unwrap(), g.node("f").unwrap());
        let paths = simple_paths(&g, a, f, weight, Direction::Directed).unwrap();
        assert_eq!(paths.iter().map(|p| p.length).collect::<Vec<_>>(), vec![12, 18, 21, 25, 30]);
        assert_eq!(paths[1].names(&g), vec!["a", "c", "e", "f"]);

        let shortest = dijkstra::find_path(&g, a, f, weight, Direction::Directed).unwrap().unwrap();
        assert_eq!(shortest.length, paths[0].length);

        let undirected = simple_paths(&g, f, a, weight, Direction::Undirected).unwrap();
        assert!(undirected.len() > paths.len());
        assert_eq!(undirected[0].length, 12);
    }

    #[test]
    fn test_min_cut() {
        let g = network();
        let (a, f) = (g.node("a").unwrap(), g.node("f").unwrap());
        let (cap, cut) = min_cut(&g, a, f, weight).unwrap();
        assert_eq!(cap, 15);
        assert!(cut.contains(&a) && !cut.contains(&f));
        let (value, _, _) = edmondskarp(&g, a, f, weight).unwrap();
        assert_eq!(value, cap);
    }

    #[test]
    fn test_assignments() {
        let p = AssignmentProblem::classic(
            &["s1", "s2", "s3"],
            &["computer", "printer", "iron"],
            vec![vec![15.0, 10.0, 8.0], vec![1.0, 8.0, 3.0], vec![1.0, 3.0, 7.0]],
        );
        let brute = assignments(&p).unwrap();
        assert_eq!(brute.state, SolutionState::Optimal);
        assert_eq!(brute.cost, 12.0);
        assert_eq!(brute.cost, p.solve().unwrap().cost);

        let p = p.with_task_limits(Limits::exactly(2));
        assert_eq!(assignments(&p).unwrap().state, SolutionState::Infeasible);

        let big = AssignmentProblem::classic(&["a"; 5], &["t"; 5], vec![vec![1.0; 5]; 5]);
        assert!(matches!(assignments(&big), Err(Error::TooLarge { size: 25, .. })));
    }

    #[test]
    fn test_shortest_path_lp() {
        let g = network();
        let (a, f) = (g.node("a").unwrap(), g.node("f").unwrap());
        let w = |e| f64::from(weight(e));
        let (len, edges) = shortest_path_lp(&g, a, f, w, Direction::Directed).unwrap().unwrap();
        assert_eq!(len, 12.0);
        assert_eq!(edges.iter().map(|&e| g.edge_names(e)).collect::<Vec<_>>(), vec![("a", "c"), ("c", "f")]);

        assert!(shortest_path_lp(&g, f, a, w, Direction::Directed).unwrap().is_none());
        let (len, _) = shortest_path_lp(&g, f, a, w, Direction::Undirected).unwrap().unwrap();
        assert_eq!(len, 12.0);
    }

    #[test]
    fn test_schedules() {
        let day = |costs| AssignmentProblem::classic(&["a", "b", "c"], &["x", "y", "z"], costs);
        let p = ScheduleProblem::new(vec![
            ("mon", day(vec![vec![1.0, 9.0, 9.0], vec![9.0, 1.0, 9.0], vec![9.0, 9.0, 1.0]])),
            ("tue", day(vec![vec![1.0, 2.0, 9.0], vec![9.0, 1.0, 2.0], vec![2.0, 9.0, 1.0]])),
        ]);
        let brute = schedules(&p).unwrap();
        assert_eq!(brute.state, SolutionState::Optimal);
        // the diagonal is taken on monday, tuesday shifts by one
        assert_eq!(brute.cost, 9.0);
        assert_eq!(brute.cost, p.solve().unwrap().cost);
        assert_eq!(brute.periods[1].agent_tasks(0), vec![1]);

        let mut three = p.clone();
        for _ in 0..2 {
            let again = three.periods[0].clone();
            three.periods.push(again);
        }
        assert_eq!(schedules(&three).unwrap().state, SolutionState::Infeasible);
    }
}
