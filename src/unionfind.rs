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

//! Disjoint sets over the elements `0..n`.
//!
//! Union by rank and path compression, as used by
//! [Kruskal's algorithm](crate::mst::kruskal).

/// A disjoint-set forest.
///
/// # Example
///
/// ```
/// use rs_netopt::unionfind::DisjointSets;
///
/// let mut sets = DisjointSets::new(4);
/// assert!(sets.union(0, 1));
/// assert!(sets.union(2, 3));
/// assert!(!sets.union(1, 0));
/// assert!(sets.same(0, 1));
/// assert!(!sets.same(1, 2));
/// assert_eq!(sets.num_sets(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u32>,
    nsets: usize,
}

impl DisjointSets {
    /// Create `n` singleton sets.
    pub fn new(n: usize) -> Self {
        DisjointSets {
            parent: (0..n).collect(),
            rank: vec![0; n],
            nsets: n,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Return the representative of the set containing `x`.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // compress the path
        let mut x = x;
        while self.parent[x] != root {
            let next = self.parent[x];
            self.parent[x] = root;
            x = next;
        }
        root
    }

    /// Join the sets containing `x` and `y`.
    ///
    /// Returns `false` if both already are in the same set.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let xroot = self.find(x);
        let yroot = self.find(y);
        if xroot == yroot {
            return false;
        }
        if self.rank[xroot] < self.rank[yroot] {
            self.parent[xroot] = yroot;
        } else {
            self.parent[yroot] = xroot;
            if self.rank[xroot] == self.rank[yroot] {
                self.rank[xroot] += 1;
            }
        }
        self.nsets -= 1;
        true
    }

    /// Return `true` if `x` and `y` are in the same set.
    pub fn same(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }

    /// Number of disjoint sets.
    pub fn num_sets(&self) -> usize {
        self.nsets
    }
}
