//! Output records of the Francy protocol and their conversion to JSON.
//!
//! Every record is turned into a [`SparseRecord`] on the way out, so absent
//! optional fields are omitted instead of serialized as `null`. Conversion
//! borrows the document, so serializing twice yields identical output.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::error::{AdapterError, Result};
use crate::sparse::{SparseRecord, json_kind};

pub const FRANCY_MIME: &str = "application/vnd.francy+json";
pub const PROTOCOL_VERSION: &str = "1.1.3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum NodeType {
    #[default]
    Circle,
    Diamond,
    Square,
}

impl NodeType {
    pub const NAMES: [&'static str; 3] = ["circle", "diamond", "square"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Diamond => "diamond",
            Self::Square => "square",
        }
    }
}

impl FromStr for NodeType {
    type Err = AdapterError;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "circle" => Ok(Self::Circle),
            "diamond" => Ok(Self::Diamond),
            "square" => Ok(Self::Square),
            _ => Err(AdapterError::invalid_choice("node type", token, &Self::NAMES)),
        }
    }
}

impl TryFrom<String> for NodeType {
    type Error = AdapterError;

    fn try_from(token: String) -> Result<Self> {
        token.parse()
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum GraphType {
    Directed,
    Undirected,
    Tree,
}

impl GraphType {
    pub const NAMES: [&'static str; 3] = ["directed", "undirected", "tree"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Directed => "directed",
            Self::Undirected => "undirected",
            Self::Tree => "tree",
        }
    }
}

impl FromStr for GraphType {
    type Err = AdapterError;

    fn from_str(token: &str) -> Result<Self> {
        match token {
            "directed" => Ok(Self::Directed),
            "undirected" => Ok(Self::Undirected),
            "tree" => Ok(Self::Tree),
            _ => Err(AdapterError::invalid_choice("graph type", token, &Self::NAMES)),
        }
    }
}

impl TryFrom<String> for GraphType {
    type Error = AdapterError;

    fn try_from(token: String) -> Result<Self> {
        token.parse()
    }
}

impl fmt::Display for GraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallbackDescriptor {
    pub id: String,
    pub funcname: Option<String>,
    /// Whether the function is a method of the first known argument. Never
    /// emitted.
    pub is_method: bool,
    pub trigger: String,
    pub known_args: Vec<String>,
    pub required_args: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageDescriptor {
    pub id: String,
    pub message_type: String,
    pub title: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuDescriptor {
    pub id: String,
    pub title: String,
    pub callback: Option<CallbackDescriptor>,
    pub menus: IndexMap<String, MenuDescriptor>,
    pub messages: IndexMap<String, MessageDescriptor>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: String,
    pub x: i64,
    pub y: i64,
    pub node_type: NodeType,
    pub size: u32,
    pub title: String,
    pub conjugate: Option<i64>,
    pub color: String,
    pub highlight: bool,
    pub layer: i64,
    pub parent: String,
    pub menus: IndexMap<String, MenuDescriptor>,
    pub messages: IndexMap<String, MessageDescriptor>,
    pub callbacks: IndexMap<String, CallbackDescriptor>,
    /// Caller pass-through fields appended to the record. They may not
    /// name any of the record's own fields.
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub weight: u32,
    pub color: String,
    pub length: Option<f64>,
    pub invisible: Option<bool>,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphDocument {
    pub id: String,
    pub graph_type: GraphType,
    pub simulation: bool,
    pub collapsed: bool,
    pub drag: bool,
    pub show_neighbours: bool,
    pub nodes: IndexMap<String, GraphNode>,
    pub links: IndexMap<String, GraphEdge>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasDocument {
    pub id: String,
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub zoom_to_fit: bool,
    pub tex_typesetting: bool,
    pub graph: Option<GraphDocument>,
    pub menus: IndexMap<String, MenuDescriptor>,
    pub messages: IndexMap<String, MessageDescriptor>,
}

/// Root of an exported document.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterDocument {
    pub version: String,
    pub mime: String,
    pub canvas: CanvasDocument,
}

/// Fields a node record sets itself; pass-through keys may not name them.
pub const NODE_FIELDS: [&str; 14] = [
    "id", "x", "y", "type", "size", "title", "conjugate", "color", "highlight", "layer", "parent", "menus",
    "messages", "callbacks",
];

/// Fields an edge record sets itself.
pub const EDGE_FIELDS: [&str; 7] = ["source", "weight", "color", "invisible", "length", "target", "id"];

const MAPPING_FIELDS: [&str; 3] = ["menus", "messages", "callbacks"];

/// Reject pass-through keys that collide with a record's own fields. A
/// collision on a mapping field with a non-mapping value is a shape error.
pub(crate) fn check_extra(
    record: &'static str,
    id: &str,
    extra: &Map<String, Value>,
    reserved: &[&'static str],
) -> Result<()> {
    for (key, value) in extra {
        let Some(field) = reserved.iter().copied().find(|field| field == key) else {
            continue;
        };
        if MAPPING_FIELDS.contains(&field) && !value.is_object() {
            return Err(AdapterError::Shape {
                record,
                id: id.to_string(),
                field,
                found: json_kind(value),
            });
        }
        return Err(AdapterError::Validation {
            field: "pass-through key",
            value: key.clone(),
            expected: format!("a name not set by the {record} record"),
        });
    }
    Ok(())
}

/// Conversion into the plain ordered mapping that gets serialized.
pub trait ToRecord {
    fn to_record(&self) -> Result<SparseRecord>;
}

fn mapping<T: ToRecord>(entries: &IndexMap<String, T>) -> Result<Value> {
    let mut map = Map::with_capacity(entries.len());
    for (id, entry) in entries {
        map.insert(id.clone(), entry.to_record()?.into_value());
    }
    Ok(Value::Object(map))
}

impl ToRecord for CallbackDescriptor {
    fn to_record(&self) -> Result<SparseRecord> {
        Ok(SparseRecord::new([
            ("id", json!(self.id)),
            ("funcname", json!(self.funcname)),
            ("trigger", json!(self.trigger)),
            ("knownArgs", json!(self.known_args)),
            ("requiredArgs", json!(self.required_args)),
        ]))
    }
}

impl ToRecord for MessageDescriptor {
    fn to_record(&self) -> Result<SparseRecord> {
        Ok(SparseRecord::new([
            ("id", json!(self.id)),
            ("type", json!(self.message_type)),
            ("title", json!(self.title)),
            ("text", json!(self.text)),
        ]))
    }
}

impl ToRecord for MenuDescriptor {
    fn to_record(&self) -> Result<SparseRecord> {
        let callback = match &self.callback {
            Some(callback) => callback.to_record()?.into_value(),
            None => Value::Null,
        };
        Ok(SparseRecord::new([
            ("id", json!(self.id)),
            ("title", json!(self.title)),
            ("callback", callback),
            ("menus", mapping(&self.menus)?),
            ("messages", mapping(&self.messages)?),
        ]))
    }
}

impl ToRecord for GraphNode {
    fn to_record(&self) -> Result<SparseRecord> {
        let mut record = SparseRecord::new([
            ("id", json!(self.id)),
            ("x", json!(self.x)),
            ("y", json!(self.y)),
            ("type", json!(self.node_type.as_str())),
            ("size", json!(self.size)),
            ("title", json!(self.title)),
            ("conjugate", json!(self.conjugate)),
            ("color", json!(self.color)),
            ("highlight", json!(self.highlight)),
            ("layer", json!(self.layer)),
            ("parent", json!(self.parent)),
            ("menus", mapping(&self.menus)?),
            ("messages", mapping(&self.messages)?),
            ("callbacks", mapping(&self.callbacks)?),
        ]);
        check_extra("node", &self.id, &self.extra, &NODE_FIELDS)?;
        record.extend(self.extra.clone());
        for field in MAPPING_FIELDS {
            record.require_mapping("node", field)?;
        }
        Ok(record)
    }
}

impl ToRecord for GraphEdge {
    fn to_record(&self) -> Result<SparseRecord> {
        let mut record = SparseRecord::new([
            ("source", json!(self.source)),
            ("weight", json!(self.weight)),
            ("color", json!(self.color)),
            ("invisible", json!(self.invisible)),
            ("length", json!(self.length)),
            ("target", json!(self.target)),
            ("id", json!(self.id)),
        ]);
        check_extra("edge", &self.id, &self.extra, &EDGE_FIELDS)?;
        record.extend(self.extra.clone());
        Ok(record)
    }
}

impl ToRecord for GraphDocument {
    fn to_record(&self) -> Result<SparseRecord> {
        Ok(SparseRecord::new([
            ("id", json!(self.id)),
            ("simulation", json!(self.simulation)),
            ("collapsed", json!(self.collapsed)),
            ("drag", json!(self.drag)),
            ("showNeighbours", json!(self.show_neighbours)),
            ("nodes", mapping(&self.nodes)?),
            ("links", mapping(&self.links)?),
            ("type", json!(self.graph_type.as_str())),
        ]))
    }
}

impl ToRecord for CanvasDocument {
    fn to_record(&self) -> Result<SparseRecord> {
        let graph = match &self.graph {
            Some(graph) => graph.to_record()?.into_value(),
            None => Value::Null,
        };
        Ok(SparseRecord::new([
            ("id", json!(self.id)),
            ("title", json!(self.title)),
            ("width", json!(self.width)),
            ("height", json!(self.height)),
            ("zoomToFit", json!(self.zoom_to_fit)),
            ("texTypesetting", json!(self.tex_typesetting)),
            ("graph", graph),
            ("menus", mapping(&self.menus)?),
            ("messages", mapping(&self.messages)?),
        ]))
    }
}

impl ToRecord for AdapterDocument {
    fn to_record(&self) -> Result<SparseRecord> {
        Ok(SparseRecord::new([
            ("version", json!(self.version)),
            ("mime", json!(self.mime)),
            ("canvas", self.canvas.to_record()?.into_value()),
        ]))
    }
}

impl AdapterDocument {
    pub fn to_value(&self) -> Result<Value> {
        Ok(self.to_record()?.into_value())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_record()?)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_record()?)?)
    }
}
