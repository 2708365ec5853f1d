use crate::adapter::CanvasSettings;
use crate::build::GraphSettings;
use crate::build::menu::{MenuSpec, MessageSpec};
use crate::document::{GraphType, NodeType};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

pub const DEFAULT_EXPORT_TITLE: &str = "A Francy graph representation";

/// Everything a caller can configure for one export, except the option
/// functions, which travel in [`crate::OptionHooks`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ExportOptions {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub zoom_to_fit: bool,
    pub tex_typesetting: bool,
    pub base_id: Option<String>,
    pub version: Option<String>,
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
    pub menus: Vec<MenuSpec>,
    pub messages: Vec<MessageSpec>,
    /// Per-vertex option maps keyed by the vertex display string. Used when
    /// no `node_options` function is supplied.
    pub nodes: IndexMap<String, Value>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        let canvas = CanvasSettings::default();
        let graph = GraphSettings::default();
        Self {
            title: DEFAULT_EXPORT_TITLE.to_string(),
            width: canvas.width,
            height: canvas.height,
            zoom_to_fit: canvas.zoom_to_fit,
            tex_typesetting: canvas.tex_typesetting,
            base_id: None,
            version: None,
            graph_type: graph.graph_type,
            simulation: graph.simulation,
            collapsed: graph.collapsed,
            drag: graph.drag,
            show_neighbours: graph.show_neighbours,
            node_type: graph.node_type,
            node_size: graph.node_size,
            color: graph.color,
            highlight: graph.highlight,
            weight: graph.weight,
            menus: Vec::new(),
            messages: Vec::new(),
            nodes: IndexMap::new(),
        }
    }
}

impl ExportOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_base_id(mut self, base_id: impl Into<String>) -> Self {
        self.base_id = Some(base_id.into());
        self
    }

    pub fn with_graph_type(mut self, graph_type: GraphType) -> Self {
        self.graph_type = Some(graph_type);
        self
    }

    pub fn with_menu(mut self, menu: MenuSpec) -> Self {
        self.menus.push(menu);
        self
    }

    pub fn with_message(mut self, message: MessageSpec) -> Self {
        self.messages.push(message);
        self
    }

    pub fn canvas_settings(&self) -> CanvasSettings {
        CanvasSettings {
            title: self.title.clone(),
            width: self.width,
            height: self.height,
            zoom_to_fit: self.zoom_to_fit,
            tex_typesetting: self.tex_typesetting,
        }
    }

    pub fn graph_settings(&self) -> GraphSettings {
        GraphSettings {
            graph_type: self.graph_type,
            simulation: self.simulation,
            collapsed: self.collapsed,
            drag: self.drag,
            show_neighbours: self.show_neighbours,
            node_type: self.node_type,
            node_size: self.node_size,
            color: self.color.clone(),
            highlight: self.highlight,
            weight: self.weight,
        }
    }
}

/// Loosely typed scalar: option maps may carry numbers as strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum NumberOrString {
    Integer(i64),
    Float(f64),
    String(String),
}

impl NumberOrString {
    /// Integer value, truncating fractions.
    pub(crate) fn as_i64(&self) -> Option<i64> {
        match self {
            NumberOrString::Integer(val) => Some(*val),
            NumberOrString::Float(val) if val.is_finite() => Some(val.trunc() as i64),
            NumberOrString::Float(_) => None,
            NumberOrString::String(val) => {
                let val = val.trim();
                val.parse::<i64>().ok().or_else(|| {
                    val.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .map(|v| v.trunc() as i64)
                })
            }
        }
    }

    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            NumberOrString::Integer(val) => Some(*val as f64),
            NumberOrString::Float(val) => Some(*val),
            NumberOrString::String(val) => val.trim().parse::<f64>().ok(),
        }
    }

    pub(crate) fn as_string(&self) -> String {
        match self {
            NumberOrString::Integer(val) => val.to_string(),
            NumberOrString::Float(val) => format!("{}", val),
            NumberOrString::String(val) => val.clone(),
        }
    }
}

/// Load export options from a JSON5 file, falling back to defaults when no
/// path is given.
pub fn load_options(path: Option<&Path>) -> anyhow::Result<ExportOptions> {
    let Some(path) = path else {
        return Ok(ExportOptions::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_options(&contents)
}

pub fn parse_options(contents: &str) -> anyhow::Result<ExportOptions> {
    let parsed: ExportOptions = json5::from_str(contents)?;
    Ok(parsed)
}
