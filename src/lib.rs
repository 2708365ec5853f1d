//! Converts in-memory graphs into Francy JSON documents.
//!
//! ```
//! use francy_adapter::{Adapter, ExportOptions, SimpleGraph};
//!
//! let graph = SimpleGraph::from_edges(false, [(1, 2), (2, 3)]);
//! let document = Adapter::new().export(&graph, &ExportOptions::default()).unwrap();
//! let graph = document.canvas.graph.as_ref().unwrap();
//! assert_eq!(graph.nodes.len(), 3);
//! assert_eq!(graph.links.len(), 2);
//! ```

pub mod adapter;
pub mod build;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod ids;
pub mod ir;
pub mod parser;
pub mod render;
pub mod sparse;

pub use adapter::{Adapter, Canvas, CanvasSettings};
pub use build::menu::{CallbackSpec, MenuSpec, MessageSpec};
pub use build::{EdgeOptions, GraphBuilder, GraphSettings, NodeOptions, OptionHooks};
pub use config::{ExportOptions, load_options};
pub use document::{
    AdapterDocument, CallbackDescriptor, CanvasDocument, GraphDocument, GraphEdge, GraphNode, GraphType,
    MenuDescriptor, MessageDescriptor, NodeType, ToRecord,
};
pub use error::{AdapterError, Result};
pub use ids::{EntityKind, IdAllocator};
pub use ir::{HostGraph, SimpleGraph};
pub use parser::{parse_edge_list, parse_graph_json};
pub use sparse::SparseRecord;
