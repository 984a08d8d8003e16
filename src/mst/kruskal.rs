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

//! Implementation of Kruskal's algorithm

use crate::network::{Edge, Network};
use crate::unionfind::DisjointSets;

use num_traits::NumAssign;
use std::cmp::Ordering;
use tracing::debug;

/// Run Kruskal's algorithm to solve the *Minimum Spanning Tree*
/// problem on a network.
///
/// * `g` is the network, the direction of its edges is ignored,
/// * `weights` are the edge weights.
///
/// Edges are sorted by weight with a stable sort, hence of several edges
/// with equal weight the one added first to the network is considered
/// first.
///
/// The algorithm actually solves a minimum spanning *forest* problem
/// if the graph is not connected. This can easily be verified by
/// checking the number of returned edges.
///
/// # Example
///
/// ```
/// use rs_netopt::Network;
/// use rs_netopt::mst::kruskal;
///
/// let g = Network::from_arcs(&[("a", "b"), ("b", "c"), ("a", "c"), ("c", "d")]).unwrap();
/// let weights = [1, 2, 2, 5];
/// let tree = kruskal(&g, |e| weights[e.index()]);
///
/// assert_eq!(tree.iter().map(|e| e.index()).collect::<Vec<_>>(), vec![0, 1, 3]);
/// ```
pub fn kruskal<W, F>(g: &Network, weights: F) -> Vec<Edge>
where
    W: PartialOrd,
    F: Fn(Edge) -> W,
{
    let mut edges: Vec<_> = g.edges().collect();
    edges.sort_by(|&e, &f| weights(e).partial_cmp(&weights(f)).unwrap_or(Ordering::Equal));

    let n = g.num_nodes();
    let mut comps = DisjointSets::new(n);
    let mut tree = Vec::with_capacity(n.saturating_sub(1));

    for e in edges {
        if tree.len() + 1 >= n {
            break;
        }
        let (u, v) = g.enodes(e);
        if comps.union(u.index(), v.index()) {
            debug!(edge = e.index(), src = g.name(u), snk = g.name(v), "add tree edge");
            tree.push(e);
        }
    }

    tree
}

/// A spanning tree (or forest) together with its total weight.
#[derive(Clone, Debug)]
pub struct SpanningTree<W> {
    /// The tree edges in the order they have been chosen.
    pub edges: Vec<Edge>,
    /// The total weight of the tree edges.
    pub weight: W,
}

impl<W> SpanningTree<W> {
    /// Return `true` if the edges connect all nodes of `g`.
    pub fn is_spanning(&self, g: &Network) -> bool {
        self.edges.len() + 1 == g.num_nodes() || g.num_nodes() == 0
    }
}

/// Compute a minimum spanning tree and its weight with Kruskal's algorithm.
pub fn minimum_spanning_tree<W, F>(g: &Network, weights: F) -> SpanningTree<W>
where
    W: NumAssign + PartialOrd + Copy,
    F: Fn(Edge) -> W,
{
    let edges = kruskal(g, &weights);
    let mut weight = W::zero();
    for &e in &edges {
        weight += weights(e);
    }
    SpanningTree { edges, weight }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> (Network, Vec<u32>) {
        // 3x3 grid, horizontal edges first
        let mut arcs = vec![];
        let mut weights = vec![];
        let name = |r: usize, c: usize| format!("{}{}", r, c);
        for r in 0..3 {
            for c in 0..2 {
                arcs.push((name(r, c), name(r, c + 1)));
                weights.push((3 * r + c) as u32 % 4 + 1);
            }
        }
        for r in 0..2 {
            for c in 0..3 {
                arcs.push((name(r, c), name(r + 1, c)));
                weights.push((r + 2 * c) as u32 % 3 + 2);
            }
        }
        (Network::from_arcs(&arcs).unwrap(), weights)
    }

    #[test]
    fn test_grid() {
        let (g, weights) = grid();
        let tree = minimum_spanning_tree(&g, |e| weights[e.index()]);
        assert!(tree.is_spanning(&g));
        assert_eq!(tree.edges.len(), 8);

        // no cycles
        let mut sets = DisjointSets::new(g.num_nodes());
        for &e in &tree.edges {
            let (u, v) = g.enodes(e);
            assert!(sets.union(u.index(), v.index()));
        }
        assert_eq!(
            tree.weight,
            tree.edges.iter().map(|e| weights[e.index()]).sum::<u32>()
        );
    }

    #[test]
    fn test_ties_keep_input_order() {
        let g = Network::from_arcs(&[("a", "b"), ("b", "c"), ("a", "c")]).unwrap();
        let tree = kruskal(&g, |_| 1.0);
        assert_eq!(tree, vec![g.id2edge(0), g.id2edge(1)]);
    }

    #[test]
    fn test_forest() {
        let g = Network::from_arcs(&[("a", "b"), ("c", "d"), ("d", "e")]).unwrap();
        let tree = minimum_spanning_tree(&g, |e| [4.0, 2.5, 1.0][e.index()]);
        assert!(!tree.is_spanning(&g));
        assert_eq!(tree.edges.len(), 3);
        assert_eq!(tree.weight, 7.5);
    }

    #[test]
    fn test_single_node() {
        let g = Network::new_with(|b| {
            b.node("lonely");
            Ok(())
        })
        .unwrap();
        let tree = minimum_spanning_tree(&g, |_| 1);
        assert!(tree.edges.is_empty());
        assert!(tree.is_spanning(&g));
    }
}
