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

//! A vector based network with named nodes.
//!
//! The network is a directed multigraph. Each edge has a designated
//! source and sink node, algorithms on undirected graphs (e.g.
//! [Kruskal](crate::mst::kruskal)) simply ignore the direction.
//!
//! Networks are static objects. They are constructed with a
//! [`NetworkBuilder`] and, once the construction is complete, converted
//! into a [`Network`].
//!
//! # Example
//!
//! ```
//! use rs_netopt::Network;
//!
//! let g = Network::new_with(|b| {
//!     let s = b.node("s");
//!     let t = b.node("t");
//!     let u = b.node("u");
//!     b.add_edge(s, u)?;
//!     b.add_edge(u, t)?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! assert_eq!(g.num_nodes(), 3);
//! assert_eq!(g.num_edges(), 2);
//! let u = g.node("u").unwrap();
//! assert_eq!(g.outedges(u).map(|(_, v)| g.name(v)).collect::<Vec<_>>(), vec!["t"]);
//! ```

use crate::error::{Error, Result};

use std::collections::HashMap;
use std::fmt;

/// Node of a network.
///
/// This is basically a newtype of the node index.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub struct Node(u32);

impl Node {
    /// Return the index of this node.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Edge of a network.
///
/// This is basically a newtype of the edge index.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub struct Edge(u32);

impl Edge {
    /// Return the index of this edge.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Data for a node in a network.
struct NodeData {
    name: String,
    outs: Vec<Edge>,
    ins: Vec<Edge>,
}

/// A directed multigraph with named nodes.
#[derive(Default)]
pub struct Network {
    nodes: Vec<NodeData>,
    // source and sink of each edge
    edges: Vec<[Node; 2]>,
    names: HashMap<String, Node>,
}

impl Network {
    /// Create a new network by passing a builder to the callback `f`.
    pub fn new_with<F>(f: F) -> Result<Network>
    where
        F: FnOnce(&mut NetworkBuilder) -> Result<()>,
    {
        let mut b = NetworkBuilder::new();
        f(&mut b)?;
        Ok(b.into_network())
    }

    /// Create a network from a list of arcs given by node names.
    ///
    /// Nodes are created in order of their first appearance.
    pub fn from_arcs<S: AsRef<str>>(arcs: &[(S, S)]) -> Result<Network> {
        Network::new_with(|b| {
            for (u, v) in arcs {
                let u = b.node(u.as_ref());
                let v = b.node(v.as_ref());
                b.add_edge(u, v)?;
            }
            Ok(())
        })
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Return an iterator over all nodes in index order.
    pub fn nodes(&self) -> impl Iterator<Item = Node> + Clone {
        (0..self.nodes.len() as u32).map(Node)
    }

    /// Return an iterator over all edges in index order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + Clone {
        (0..self.edges.len() as u32).map(Edge)
    }

    /// Return the node with the given index.
    pub fn id2node(&self, id: usize) -> Node {
        debug_assert!(id < self.num_nodes());
        Node(id as u32)
    }

    /// Return the edge with the given index.
    pub fn id2edge(&self, id: usize) -> Edge {
        debug_assert!(id < self.num_edges());
        Edge(id as u32)
    }

    /// The source node of an edge.
    pub fn src(&self, e: Edge) -> Node {
        self.edges[e.index()][0]
    }

    /// The sink node of an edge.
    pub fn snk(&self, e: Edge) -> Node {
        self.edges[e.index()][1]
    }

    /// Both end nodes of an edge as `(source, sink)`.
    pub fn enodes(&self, e: Edge) -> (Node, Node) {
        let [u, v] = self.edges[e.index()];
        (u, v)
    }

    /// Outgoing edges of `u` together with their sink nodes.
    pub fn outedges(&self, u: Node) -> impl Iterator<Item = (Edge, Node)> + '_ {
        self.nodes[u.index()].outs.iter().map(move |&e| (e, self.snk(e)))
    }

    /// Incoming edges of `u` together with their source nodes.
    pub fn inedges(&self, u: Node) -> impl Iterator<Item = (Edge, Node)> + '_ {
        self.nodes[u.index()].ins.iter().map(move |&e| (e, self.src(e)))
    }

    /// All incident edges of `u` together with the respective other end node.
    ///
    /// Outgoing edges come first.
    pub fn neighs(&self, u: Node) -> impl Iterator<Item = (Edge, Node)> + '_ {
        self.outedges(u).chain(self.inedges(u))
    }

    /// The name of a node.
    pub fn name(&self, u: Node) -> &str {
        &self.nodes[u.index()].name
    }

    /// Return the node with the given name.
    pub fn node(&self, name: &str) -> Option<Node> {
        self.names.get(name).copied()
    }

    /// Return the node with the given name or an error if there is none.
    pub fn node_or_err(&self, name: &str) -> Result<Node> {
        self.node(name).ok_or_else(|| Error::UnknownNode(name.to_string()))
    }

    /// Return `(source name, sink name)` of an edge.
    pub fn edge_names(&self, e: Edge) -> (&str, &str) {
        let (u, v) = self.enodes(e);
        (self.name(u), self.name(v))
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Network")
            .field("nodes", &self.nodes.iter().map(|u| &u.name).collect::<Vec<_>>())
            .field(
                "edges",
                &self.edges().map(|e| self.edge_names(e)).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// A builder for a [`Network`].
#[derive(Default)]
pub struct NetworkBuilder {
    net: Network,
}

impl NetworkBuilder {
    /// Create a new, empty builder.
    pub fn new() -> Self {
        Self::with_capacities(0, 0)
    }

    /// Create a new, empty builder reserving memory for some nodes and edges.
    pub fn with_capacities(nnodes: usize, nedges: usize) -> Self {
        NetworkBuilder {
            net: Network {
                nodes: Vec::with_capacity(nnodes),
                edges: Vec::with_capacity(nedges),
                names: HashMap::with_capacity(nnodes),
            },
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.net.num_nodes()
    }

    pub fn num_edges(&self) -> usize {
        self.net.num_edges()
    }

    /// Add a new node with a unique name.
    pub fn add_node(&mut self, name: &str) -> Result<Node> {
        if self.net.names.contains_key(name) {
            return Err(Error::DuplicateNode(name.to_string()));
        }
        Ok(self.insert(name))
    }

    /// Return the node with the given name, adding it if necessary.
    pub fn node(&mut self, name: &str) -> Node {
        match self.net.node(name) {
            Some(u) => u,
            None => self.insert(name),
        }
    }

    fn insert(&mut self, name: &str) -> Node {
        let u = Node(self.net.nodes.len() as u32);
        self.net.nodes.push(NodeData {
            name: name.to_string(),
            outs: vec![],
            ins: vec![],
        });
        self.net.names.insert(name.to_string(), u);
        u
    }

    /// Add a new edge from `u` to `v`.
    pub fn add_edge(&mut self, u: Node, v: Node) -> Result<Edge> {
        let n = self.net.num_nodes();
        for x in [u, v].iter() {
            if x.index() >= n {
                return Err(Error::InvalidNode { index: x.index(), count: n });
            }
        }
        if u == v {
            return Err(Error::Loop(self.net.name(u).to_string()));
        }
        let e = Edge(self.net.edges.len() as u32);
        self.net.edges.push([u, v]);
        self.net.nodes[u.index()].outs.push(e);
        self.net.nodes[v.index()].ins.push(e);
        Ok(e)
    }

    /// Turn the builder into a network.
    pub fn into_network(self) -> Network {
        self.net
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Network {
        Network::from_arcs(&[("s", "a"), ("s", "b"), ("a", "t"), ("b", "t"), ("a", "b")]).unwrap()
    }

    #[test]
    fn test_adjacencies() {
        let g = diamond();
        assert_eq!(g.num_nodes(), 4);
        assert_eq!(g.num_edges(), 5);

        for u in g.nodes() {
            for (e, v) in g.outedges(u) {
                assert_eq!(g.src(e), u);
                assert_eq!(g.snk(e), v);
            }
            for (e, v) in g.inedges(u) {
                assert_eq!(g.src(e), v);
                assert_eq!(g.snk(e), u);
            }
        }

        let a = g.node("a").unwrap();
        let neighs: Vec<_> = g.neighs(a).map(|(_, v)| g.name(v)).collect();
        assert_eq!(neighs, vec!["t", "b", "s"]);
    }

    #[test]
    fn test_names() {
        let g = diamond();
        assert_eq!(g.nodes().map(|u| g.name(u)).collect::<Vec<_>>(), vec!["s", "a", "b", "t"]);
        assert!(g.node("x").is_none());
        assert!(matches!(g.node_or_err("x"), Err(Error::UnknownNode(ref n)) if n == "x"));
        assert_eq!(g.edge_names(g.id2edge(4)), ("a", "b"));
    }

    #[test]
    fn test_parallel_edges() {
        let g = Network::from_arcs(&[("1", "3"), ("1", "3")]).unwrap();
        assert_eq!(g.num_edges(), 2);
        let u = g.node("1").unwrap();
        assert_eq!(g.outedges(u).count(), 2);
    }

    #[test]
    fn test_builder_errors() {
        let mut b = NetworkBuilder::new();
        let u = b.add_node("u").unwrap();
        assert!(matches!(b.add_node("u"), Err(Error::DuplicateNode(_))));
        assert!(matches!(b.add_edge(u, u), Err(Error::Loop(_))));
        assert!(matches!(
            b.add_edge(u, Node(7)),
            Err(Error::InvalidNode { index: 7, count: 1 })
        ));
    }
}
