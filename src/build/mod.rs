//! Graph pass: turns a host graph into node and link records.
//!
//! Nodes are built first, in vertex order, so every edge can resolve its
//! endpoints through the vertex lookup. For tree graphs, parents come from
//! the vertices' own declarations and then from edge order, where the first
//! edge into a node wins.

pub mod edge;
pub mod menu;
pub mod node;

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use log::{debug, warn};

use crate::document::{GraphDocument, GraphType, NodeType};
use crate::error::{AdapterError, Result};
use crate::ids::{EntityKind, IdAllocator};
use crate::ir::HostGraph;

pub use edge::EdgeOptions;
pub use node::NodeOptions;

/// Graph-level settings that seed every node and edge.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphSettings {
    /// Inferred from the host graph when unset.
    pub graph_type: Option<GraphType>,
    pub simulation: bool,
    pub collapsed: bool,
    pub drag: bool,
    pub show_neighbours: bool,
    pub node_type: NodeType,
    pub node_size: u32,
    pub color: String,
    pub highlight: bool,
    pub weight: u32,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            graph_type: None,
            simulation: true,
            collapsed: true,
            drag: false,
            show_neighbours: false,
            node_type: NodeType::Circle,
            node_size: 10,
            color: String::new(),
            highlight: true,
            weight: 1,
        }
    }
}

impl GraphSettings {
    pub fn resolve_type<G: HostGraph>(&self, graph: &G) -> GraphType {
        self.graph_type.unwrap_or(match graph.is_directed() {
            Some(true) => GraphType::Directed,
            _ => GraphType::Undirected,
        })
    }
}

pub type NodeOptionsFn<'a, V> = Box<dyn Fn(&V) -> Result<NodeOptions> + 'a>;
pub type LinkOptionsFn<'a, V> = Box<dyn Fn(&V, &V) -> Result<EdgeOptions> + 'a>;

/// Caller-supplied option functions, invoked once per vertex and once per
/// edge. An error returned by either aborts the export unchanged.
pub struct OptionHooks<'a, V> {
    node_options: Option<NodeOptionsFn<'a, V>>,
    link_options: Option<LinkOptionsFn<'a, V>>,
}

impl<V> Default for OptionHooks<'_, V> {
    fn default() -> Self {
        Self {
            node_options: None,
            link_options: None,
        }
    }
}

impl<V> fmt::Debug for OptionHooks<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionHooks")
            .field("node_options", &self.node_options.is_some())
            .field("link_options", &self.link_options.is_some())
            .finish()
    }
}

impl<'a, V> OptionHooks<'a, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node_options<F>(mut self, f: F) -> Self
    where
        F: Fn(&V) -> Result<NodeOptions> + 'a,
    {
        self.node_options = Some(Box::new(f));
        self
    }

    pub fn with_link_options<F>(mut self, f: F) -> Self
    where
        F: Fn(&V, &V) -> Result<EdgeOptions> + 'a,
    {
        self.link_options = Some(Box::new(f));
        self
    }

    pub fn has_node_options(&self) -> bool {
        self.node_options.is_some()
    }

    pub(crate) fn node_options(&self, vertex: &V) -> Result<NodeOptions> {
        match &self.node_options {
            Some(f) => f(vertex),
            None => Ok(NodeOptions::default()),
        }
    }

    pub(crate) fn link_options(&self, source: &V, target: &V) -> Result<EdgeOptions> {
        match &self.link_options {
            Some(f) => f(source, target),
            None => Ok(EdgeOptions::default()),
        }
    }
}

/// One-shot builder for the graph record of a canvas.
pub struct GraphBuilder<'a, G> {
    graph: &'a G,
    settings: &'a GraphSettings,
}

impl<'a, G: HostGraph> GraphBuilder<'a, G> {
    pub fn new(graph: &'a G, settings: &'a GraphSettings) -> Self {
        Self { graph, settings }
    }

    pub fn compute(self, hooks: &OptionHooks<'_, G::Vertex>, ids: &mut IdAllocator) -> Result<GraphDocument> {
        let Self { graph, settings } = self;
        let id = ids.next(EntityKind::Graph);
        let graph_type = settings.resolve_type(graph);
        let is_tree = graph_type == GraphType::Tree;

        let mut node_ids: HashMap<G::Vertex, String> = HashMap::new();
        let mut nodes = IndexMap::new();
        let mut declared = Vec::new();
        for vertex in graph.vertices() {
            let options = hooks.node_options(&vertex)?;
            let node = node::build_node(options, || graph.display(&vertex), settings, ids)?;
            if is_tree && let Some(parent) = graph.parent(&vertex) {
                declared.push((node.id.clone(), parent));
            }
            node_ids.insert(vertex, node.id.clone());
            nodes.insert(node.id.clone(), node);
        }

        for (child, parent) in declared {
            match node_ids.get(&parent) {
                Some(parent_id) => {
                    if let Some(node) = nodes.get_mut(&child) {
                        node.parent = parent_id.clone();
                    }
                }
                None => {
                    let parent = graph.display(&parent);
                    warn!(node = child.as_str(), parent = parent.as_str(); "Declared parent is not a vertex of the graph");
                }
            }
        }

        let mut links = IndexMap::new();
        for (source, target) in graph.edges() {
            let source_id = lookup(&node_ids, graph, &source)?;
            let target_id = lookup(&node_ids, graph, &target)?;
            let options = hooks.link_options(&source, &target)?;
            if is_tree
                && let Some(node) = nodes.get_mut(&target_id)
                && node.parent.is_empty()
            {
                node.parent = source_id.clone();
            }
            let edge = edge::build_edge(source_id, target_id, options, settings, ids)?;
            links.insert(edge.id.clone(), edge);
        }

        debug!(
            graph = id.as_str(),
            graph_type = graph_type.as_str(),
            nodes = nodes.len(),
            links = links.len();
            "Computed graph"
        );

        Ok(GraphDocument {
            id,
            graph_type,
            simulation: settings.simulation,
            collapsed: settings.collapsed,
            drag: settings.drag,
            show_neighbours: settings.show_neighbours,
            nodes,
            links,
        })
    }
}

fn lookup<G: HostGraph>(node_ids: &HashMap<G::Vertex, String>, graph: &G, vertex: &G::Vertex) -> Result<String> {
    node_ids
        .get(vertex)
        .cloned()
        .ok_or_else(|| AdapterError::Reference(graph.display(vertex)))
}
