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

//! Dijkstra's shortest path algorithm.
//!
//! Dijkstra's algorithm computes the shortest path from some start node $s \in
//! V$ to all other nodes in a (directed or undirected) network. Each edge is
//! assigned a non-negative weight (or length) $w \colon E \to \mathbb{R}_+$.
//!
//! # Example
//!
//! ```
//! use rs_netopt::Network;
//! use rs_netopt::shortestpath::{dijkstra, Direction};
//!
//! let arcs = [
//!     ("a", "b", 9), ("a", "c", 2), ("a", "e", 14), ("b", "d", 6), ("c", "d", 8),
//!     ("c", "e", 9), ("c", "f", 10), ("d", "f", 15), ("e", "f", 7),
//! ];
//! let g = Network::from_arcs(&arcs.iter().map(|a| (a.0, a.1)).collect::<Vec<_>>()).unwrap();
//! let weights = |e: rs_netopt::Edge| arcs[e.index()].2;
//!
//! let e = g.node("e").unwrap();
//! let b = g.node("b").unwrap();
//! let path = dijkstra::find_path(&g, e, b, weights, Direction::Undirected)
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(path.length, 20);
//! assert_eq!(path.nodes.iter().map(|&u| g.name(u)).collect::<Vec<_>>(), vec!["e", "c", "a", "b"]);
//!
//! // in the directed network there is no way back from `e`
//! assert!(dijkstra::find_path(&g, e, b, weights, Direction::Directed).unwrap().is_none());
//! ```

use crate::collections::BinHeap;
use crate::error::{Error, Result};
use crate::network::{Edge, Network, Node};

use num_traits::NumAssign;
use tracing::trace;

/// How edges may be traversed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    /// Only from source to sink.
    Directed,
    /// In both directions.
    Undirected,
}

/// A path through a network.
#[derive(Clone, Debug, PartialEq)]
pub struct Path<D> {
    /// The nodes along the path, starting with the source.
    pub nodes: Vec<Node>,
    /// The edges along the path, one fewer than nodes.
    pub edges: Vec<Edge>,
    /// The total length.
    pub length: D,
}

impl<D> Path<D> {
    /// Return the node names along the path.
    pub fn names<'a>(&self, g: &'a Network) -> Vec<&'a str> {
        self.nodes.iter().map(|&u| g.name(u)).collect()
    }
}

/// The result of a Dijkstra run from a single source.
#[derive(Clone, Debug)]
pub struct ShortestPathTree<D> {
    src: Node,
    dist: Vec<Option<D>>,
    pred: Vec<Option<(Edge, Node)>>,
}

impl<D> ShortestPathTree<D>
where
    D: NumAssign + PartialOrd + Copy,
{
    /// The start node.
    pub fn source(&self) -> Node {
        self.src
    }

    /// The distance of `u` from the source, `None` if `u` is unreachable
    /// (or has not been settled before the search stopped).
    pub fn dist(&self, u: Node) -> Option<D> {
        self.dist[u.index()]
    }

    /// The incoming tree edge of `u` and its predecessor node.
    pub fn pred(&self, u: Node) -> Option<(Edge, Node)> {
        self.pred[u.index()]
    }

    /// Return the tree path from the source to `u`.
    pub fn path_to(&self, u: Node) -> Option<Path<D>> {
        let length = self.dist(u)?;
        let mut nodes = vec![u];
        let mut edges = vec![];
        let mut v = u;
        while let Some((e, w)) = self.pred(v) {
            edges.push(e);
            nodes.push(w);
            v = w;
        }
        nodes.reverse();
        edges.reverse();
        Some(Path { nodes, edges, length })
    }
}

/// Compute shortest paths from `src` to all reachable nodes.
pub fn tree<D, W>(g: &Network, src: Node, weights: W, dir: Direction) -> Result<ShortestPathTree<D>>
where
    D: NumAssign + PartialOrd + Copy,
    W: Fn(Edge) -> D,
{
    run(g, src, None, weights, dir)
}

/// Compute a shortest path from `src` to `snk`.
///
/// The search stops as soon as `snk` has been settled. Returns `None` if
/// there is no path.
pub fn find_path<D, W>(g: &Network, src: Node, snk: Node, weights: W, dir: Direction) -> Result<Option<Path<D>>>
where
    D: NumAssign + PartialOrd + Copy,
    W: Fn(Edge) -> D,
{
    Ok(run(g, src, Some(snk), weights, dir)?.path_to(snk))
}

/// Compute a shortest path visiting the `stops` in the given order.
///
/// The result is the concatenation of shortest paths between consecutive
/// stops. Returns `None` if one of the legs has no path.
pub fn find_path_via<D, W>(g: &Network, stops: &[Node], weights: W, dir: Direction) -> Result<Option<Path<D>>>
where
    D: NumAssign + PartialOrd + Copy,
    W: Fn(Edge) -> D,
{
    let first = match stops.first() {
        Some(&u) => u,
        None => return Err(Error::InvalidData("path needs at least one stop".to_string())),
    };
    let mut path = Path {
        nodes: vec![first],
        edges: vec![],
        length: D::zero(),
    };
    for leg in stops.windows(2) {
        match find_path(g, leg[0], leg[1], &weights, dir)? {
            Some(p) => {
                path.nodes.extend_from_slice(&p.nodes[1..]);
                path.edges.extend(p.edges);
                path.length += p.length;
            }
            None => return Ok(None),
        }
    }
    Ok(Some(path))
}

fn run<D, W>(g: &Network, src: Node, snk: Option<Node>, weights: W, dir: Direction) -> Result<ShortestPathTree<D>>
where
    D: NumAssign + PartialOrd + Copy,
    W: Fn(Edge) -> D,
{
    if let Some(e) = g.edges().find(|&e| weights(e) < D::zero()) {
        return Err(Error::NegativeWeight { edge: e.index() });
    }

    let n = g.num_nodes();
    let mut spt = ShortestPathTree {
        src,
        dist: vec![None; n],
        pred: vec![None; n],
    };
    // tentative distances of labelled nodes
    let mut label: Vec<Option<(D, Option<(Edge, Node)>)>> = vec![None; n];
    let mut items = vec![None; n];
    let mut heap = BinHeap::new();

    label[src.index()] = Some((D::zero(), None));
    items[src.index()] = Some(heap.push(src, D::zero()));

    while let Some((u, d)) = heap.pop_min() {
        spt.dist[u.index()] = Some(d);
        spt.pred[u.index()] = label[u.index()].and_then(|l| l.1);
        trace!(node = g.name(u), "settled");
        if Some(u) == snk {
            break;
        }

        let neighs: Box<dyn Iterator<Item = (Edge, Node)> + '_> = match dir {
            Direction::Directed => Box::new(g.outedges(u)),
            Direction::Undirected => Box::new(g.neighs(u)),
        };
        for (e, v) in neighs {
            if spt.dist[v.index()].is_some() {
                continue;
            }
            let dv = d + weights(e);
            match items[v.index()] {
                Some(item) => {
                    if heap.decrease_key(item, dv) {
                        label[v.index()] = Some((dv, Some((e, u))));
                    }
                }
                None => {
                    label[v.index()] = Some((dv, Some((e, u))));
                    items[v.index()] = Some(heap.push(v, dv));
                }
            }
        }
    }

    Ok(spt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn streets() -> (Network, Vec<f64>) {
        let arcs = [
            ("a", "b", 9.0),
            ("a", "c", 2.0),
            ("a", "e", 14.0),
            ("b", "d", 6.0),
            ("c", "d", 8.0),
            ("c", "e", 9.0),
            ("c", "f", 10.0),
            ("d", "f", 15.0),
            ("e", "f", 7.0),
        ];
        let g = Network::from_arcs(&arcs.iter().map(|a| (a.0, a.1)).collect::<Vec<_>>()).unwrap();
        (g, arcs.iter().map(|a| a.2).collect())
    }

    #[test]
    fn test_undirected_tree() {
        let (g, w) = streets();
        let e = g.node("e").unwrap();
        let spt = tree(&g, e, |x| w[x.index()], Direction::Undirected).unwrap();
        let dists: Vec<_> = g.nodes().map(|u| (g.name(u), spt.dist(u).unwrap())).collect();
        assert_eq!(
            dists,
            vec![("a", 11.0), ("b", 20.0), ("c", 9.0), ("e", 0.0), ("d", 17.0), ("f", 7.0)]
        );
        assert_eq!(spt.pred(e), None);
        for u in g.nodes().filter(|&u| u != e) {
            let (edge, p) = spt.pred(u).unwrap();
            let (x, y) = g.enodes(edge);
            assert!((x == u && y == p) || (x == p && y == u));
            assert_eq!(spt.dist(p).unwrap() + w[edge.index()], spt.dist(u).unwrap());
        }
    }

    #[test]
    fn test_directed() {
        let (g, w) = streets();
        let a = g.node("a").unwrap();
        let f = g.node("f").unwrap();
        let path = find_path(&g, a, f, |x| w[x.index()], Direction::Directed)
            .unwrap()
            .unwrap();
        assert_eq!(path.length, 12.0);
        assert_eq!(path.names(&g), vec!["a", "c", "f"]);
        assert_eq!(path.edges.len(), 2);
    }

    #[test]
    fn test_trivial_and_unreachable() {
        let (g, w) = streets();
        let d = g.node("d").unwrap();
        let a = g.node("a").unwrap();
        let p = find_path(&g, d, d, |x| w[x.index()], Direction::Directed).unwrap().unwrap();
        assert_eq!(p.length, 0.0);
        assert_eq!(p.nodes, vec![d]);
        assert!(p.edges.is_empty());
        assert!(find_path(&g, d, a, |x| w[x.index()], Direction::Directed).unwrap().is_none());
    }

    #[test]
    fn test_via() {
        let (g, w) = streets();
        let stops: Vec<_> = ["a", "d", "e"].iter().map(|n| g.node(n).unwrap()).collect();
        let path = find_path_via(&g, &stops, |x| w[x.index()], Direction::Undirected)
            .unwrap()
            .unwrap();
        // a-c-d (10) and d-c-e (17)
        assert_eq!(path.length, 27.0);
        assert_eq!(path.names(&g), vec!["a", "c", "d", "c", "e"]);
        assert_eq!(path.edges.len(), 4);
    }

    #[test]
    fn test_negative_weight() {
        let (g, mut w) = streets();
        w[3] = -1.0;
        let a = g.node("a").unwrap();
        assert!(matches!(
            tree(&g, a, |x| w[x.index()], Direction::Directed),
            Err(Error::NegativeWeight { edge: 3 })
        ));
    }
}
