use serde::Deserialize;
use serde_json::{Map, Value};

use super::GraphSettings;
use super::node::{coerce_int, positive};
use crate::config::NumberOrString;
use crate::document::{EDGE_FIELDS, GraphEdge, check_extra};
use crate::error::{AdapterError, Result};
use crate::ids::{EntityKind, IdAllocator};

/// Per-edge overrides returned by a caller's `link_options` function.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeOptions {
    pub color: Option<String>,
    pub weight: Option<u32>,
    pub length: Option<f64>,
    pub invisible: Option<bool>,
    pub extra: Map<String, Value>,
}

impl EdgeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_length(mut self, length: f64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn invisible(mut self) -> Self {
        self.invisible = Some(true);
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read options from a loosely typed map; `weight` is coerced to an
    /// integer and `length` to a float.
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawEdgeOptions = serde_json::from_value(value)?;
        let weight = coerce_int("weight", raw.weight.as_ref())?
            .map(|w| positive("weight", w))
            .transpose()?;
        let length = raw
            .length
            .as_ref()
            .map(|l| {
                l.as_f64()
                    .filter(|l| l.is_finite())
                    .ok_or_else(|| AdapterError::not_finite("length", l.as_string()))
            })
            .transpose()?;
        Ok(Self {
            color: raw.color,
            weight,
            length,
            invisible: raw.invisible,
            extra: raw.extra,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RawEdgeOptions {
    color: Option<String>,
    weight: Option<NumberOrString>,
    length: Option<NumberOrString>,
    invisible: Option<bool>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Build the record for one edge whose endpoints already have node ids.
pub(crate) fn build_edge(
    source: String,
    target: String,
    options: EdgeOptions,
    settings: &GraphSettings,
    ids: &mut IdAllocator,
) -> Result<GraphEdge> {
    let id = ids.next(EntityKind::Edge);
    check_extra("edge", &id, &options.extra, &EDGE_FIELDS)?;
    let weight = options.weight.unwrap_or(settings.weight);
    if weight == 0 {
        return Err(AdapterError::not_positive("weight", "0"));
    }
    if let Some(length) = options.length.filter(|l| !l.is_finite()) {
        return Err(AdapterError::not_finite("length", length.to_string()));
    }
    Ok(GraphEdge {
        id,
        source,
        target,
        weight,
        color: options.color.unwrap_or_else(|| settings.color.clone()),
        length: options.length,
        invisible: options.invisible,
        extra: options.extra,
    })
}
