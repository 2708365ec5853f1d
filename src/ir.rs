use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// Capability interface a host graph exposes to the adapter.
///
/// Vertices are opaque: the adapter only clones them, uses them as lookup
/// keys while resolving edges, and asks the graph for their display string.
pub trait HostGraph {
    type Vertex: Clone + Eq + Hash;

    /// Vertices in the order nodes should be emitted.
    fn vertices(&self) -> impl Iterator<Item = Self::Vertex> + '_;

    /// Edges as `(source, target)` pairs in emission order.
    fn edges(&self) -> impl Iterator<Item = (Self::Vertex, Self::Vertex)> + '_;

    /// `None` when the graph cannot tell whether it is directed.
    fn is_directed(&self) -> Option<bool> {
        None
    }

    /// Default title of the node built for `vertex`.
    fn display(&self, vertex: &Self::Vertex) -> String;

    /// Parent declared by the vertex itself, consulted for tree graphs.
    fn parent(&self, _vertex: &Self::Vertex) -> Option<Self::Vertex> {
        None
    }
}

/// Insertion-ordered graph over displayable vertices.
#[derive(Debug, Clone)]
pub struct SimpleGraph<V> {
    pub directed: Option<bool>,
    vertices: Vec<V>,
    index: HashMap<V, usize>,
    edges: Vec<(V, V)>,
    parents: HashMap<V, V>,
}

impl<V: Clone + Eq + Hash> SimpleGraph<V> {
    pub fn new() -> Self {
        Self {
            directed: None,
            vertices: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            parents: HashMap::new(),
        }
    }

    pub fn directed() -> Self {
        Self {
            directed: Some(true),
            ..Self::new()
        }
    }

    pub fn undirected() -> Self {
        Self {
            directed: Some(false),
            ..Self::new()
        }
    }

    /// Build a graph from an edge list, registering endpoints in first-seen
    /// order.
    pub fn from_edges<I>(directed: bool, edges: I) -> Self
    where
        I: IntoIterator<Item = (V, V)>,
    {
        let mut graph = if directed {
            Self::directed()
        } else {
            Self::undirected()
        };
        for (source, target) in edges {
            graph.add_edge(source, target);
        }
        graph
    }

    pub fn ensure_vertex(&mut self, vertex: V) {
        if !self.index.contains_key(&vertex) {
            self.index.insert(vertex.clone(), self.vertices.len());
            self.vertices.push(vertex);
        }
    }

    pub fn add_edge(&mut self, source: V, target: V) {
        self.ensure_vertex(source.clone());
        self.ensure_vertex(target.clone());
        self.edges.push((source, target));
    }

    /// Record an edge without registering its endpoints.
    pub fn push_raw_edge(&mut self, source: V, target: V) {
        self.edges.push((source, target));
    }

    pub fn set_parent(&mut self, child: V, parent: V) {
        self.ensure_vertex(child.clone());
        self.ensure_vertex(parent.clone());
        self.parents.insert(child, parent);
    }

    pub fn contains(&self, vertex: &V) -> bool {
        self.index.contains_key(vertex)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl<V: Clone + Eq + Hash> Default for SimpleGraph<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Eq + Hash + Display> HostGraph for SimpleGraph<V> {
    type Vertex = V;

    fn vertices(&self) -> impl Iterator<Item = V> + '_ {
        self.vertices.iter().cloned()
    }

    fn edges(&self) -> impl Iterator<Item = (V, V)> + '_ {
        self.edges.iter().cloned()
    }

    fn is_directed(&self) -> Option<bool> {
        self.directed
    }

    fn display(&self, vertex: &V) -> String {
        vertex.to_string()
    }

    fn parent(&self, vertex: &V) -> Option<V> {
        self.parents.get(vertex).cloned()
    }
}

#[cfg(feature = "petgraph")]
mod petgraph_host {
    use std::fmt::Display;

    use petgraph::EdgeType;
    use petgraph::graph::{Graph, NodeIndex};
    use petgraph::visit::EdgeRef;

    use super::HostGraph;

    impl<N: Display, E, Ty: EdgeType> HostGraph for Graph<N, E, Ty> {
        type Vertex = NodeIndex;

        fn vertices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
            self.node_indices()
        }

        fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
            self.edge_references()
                .map(|edge| (edge.source(), edge.target()))
        }

        fn is_directed(&self) -> Option<bool> {
            Some(Ty::is_directed())
        }

        fn display(&self, vertex: &NodeIndex) -> String {
            self[*vertex].to_string()
        }
    }

}
