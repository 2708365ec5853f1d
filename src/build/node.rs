use serde::Deserialize;
use serde_json::{Map, Value};

use super::GraphSettings;
use super::menu::{CallbackSpec, MenuSpec, MessageSpec, build_callbacks, build_menus, build_messages};
use crate::config::NumberOrString;
use crate::document::{GraphNode, NODE_FIELDS, NodeType, check_extra};
use crate::error::{AdapterError, Result};
use crate::ids::{EntityKind, IdAllocator};

/// Per-node overrides returned by a caller's `node_options` function.
/// Unset fields fall back to the graph-level settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeOptions {
    pub node_type: Option<NodeType>,
    pub size: Option<u32>,
    pub title: Option<String>,
    pub color: Option<String>,
    pub highlight: Option<bool>,
    pub layer: Option<i64>,
    pub conjugate: Option<i64>,
    pub modal_menus: Vec<MenuSpec>,
    pub messages: Vec<MessageSpec>,
    pub callbacks: Vec<CallbackSpec>,
    pub extra: Map<String, Value>,
}

impl NodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.node_type = Some(node_type);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = Some(highlight);
        self
    }

    pub fn with_layer(mut self, layer: i64) -> Self {
        self.layer = Some(layer);
        self
    }

    pub fn with_conjugate(mut self, conjugate: i64) -> Self {
        self.conjugate = Some(conjugate);
        self
    }

    pub fn with_modal_menu(mut self, menu: MenuSpec) -> Self {
        self.modal_menus.push(menu);
        self
    }

    pub fn with_message(mut self, message: MessageSpec) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_callback(mut self, callback: CallbackSpec) -> Self {
        self.callbacks.push(callback);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read options from a loosely typed map, coercing `layer`, `conjugate`
    /// and `size` to integers and `title` to a string. `type` must name a
    /// known node type; unrecognized keys are passed through to the record.
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawNodeOptions = serde_json::from_value(value)?;
        Ok(Self {
            node_type: raw.node_type.as_deref().map(str::parse::<NodeType>).transpose()?,
            size: coerce_int("size", raw.size.as_ref())?
                .map(|size| positive("size", size))
                .transpose()?,
            title: raw.title.as_ref().map(NumberOrString::as_string),
            color: raw.color,
            highlight: raw.highlight,
            layer: coerce_int("layer", raw.layer.as_ref())?,
            conjugate: coerce_int("conjugate", raw.conjugate.as_ref())?,
            modal_menus: raw.modal_menus,
            messages: raw.messages,
            callbacks: raw.callbacks,
            extra: raw.extra,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawNodeOptions {
    #[serde(rename = "type")]
    node_type: Option<String>,
    size: Option<NumberOrString>,
    title: Option<NumberOrString>,
    color: Option<String>,
    highlight: Option<bool>,
    layer: Option<NumberOrString>,
    conjugate: Option<NumberOrString>,
    #[serde(default)]
    modal_menus: Vec<MenuSpec>,
    #[serde(default)]
    messages: Vec<MessageSpec>,
    #[serde(default)]
    callbacks: Vec<CallbackSpec>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

pub(crate) fn coerce_int(field: &'static str, value: Option<&NumberOrString>) -> Result<Option<i64>> {
    value
        .map(|v| v.as_i64().ok_or_else(|| AdapterError::not_integer(field, v.as_string())))
        .transpose()
}

/// `value` as a `u32` of at least 1.
pub(crate) fn positive(field: &'static str, value: i64) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|value| *value > 0)
        .ok_or_else(|| AdapterError::not_positive(field, value.to_string()))
}

/// Build the record for one vertex.
///
/// The node id is allocated first; the node's own menus, messages and
/// callbacks follow it in allocation order. `layer` defaults to the node's
/// ordinal and `title` to `default_title` when the options leave them unset
/// or empty. `parent` is left empty for the graph pass to fill in.
pub(crate) fn build_node(
    options: NodeOptions,
    default_title: impl FnOnce() -> String,
    settings: &GraphSettings,
    ids: &mut IdAllocator,
) -> Result<GraphNode> {
    let id = ids.next(EntityKind::Node);
    let ordinal = ids.ordinal();
    check_extra("node", &id, &options.extra, &NODE_FIELDS)?;
    let size = options.size.unwrap_or(settings.node_size);
    if size == 0 {
        return Err(AdapterError::not_positive("size", "0"));
    }

    let menus = build_menus(&options.modal_menus, ids)?;
    let messages = build_messages(&options.messages, ids);
    let callbacks = build_callbacks(&options.callbacks, ids);

    let title = match options.title {
        Some(title) if !title.is_empty() => title,
        _ => default_title(),
    };

    Ok(GraphNode {
        id,
        x: 0,
        y: 0,
        node_type: options.node_type.unwrap_or(settings.node_type),
        size,
        title,
        conjugate: options.conjugate,
        color: options.color.unwrap_or_else(|| settings.color.clone()),
        highlight: options.highlight.unwrap_or(settings.highlight),
        layer: options.layer.unwrap_or(ordinal as i64),
        parent: String::new(),
        menus,
        messages,
        callbacks,
        extra: options.extra,
    })
}
