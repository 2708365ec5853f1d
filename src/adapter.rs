//! Canvas assembly and the export entry point.

use indexmap::IndexMap;
use log::info;

use crate::build::menu::{MenuSpec, MessageSpec, build_menu, build_message};
use crate::build::{GraphBuilder, GraphSettings, NodeOptions, OptionHooks};
use crate::config::ExportOptions;
use crate::document::{AdapterDocument, CanvasDocument, FRANCY_MIME, GraphDocument, PROTOCOL_VERSION};
use crate::error::Result;
use crate::ids::{EntityKind, IdAllocator};
use crate::ir::HostGraph;
use crate::render::render_json;

pub const DEFAULT_CANVAS_TITLE: &str = "My Canvas";

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSettings {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub zoom_to_fit: bool,
    pub tex_typesetting: bool,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_CANVAS_TITLE.to_string(),
            width: 800.0,
            height: 100.0,
            zoom_to_fit: true,
            tex_typesetting: false,
        }
    }
}

/// Top-level drawing surface holding at most one graph plus its own menus
/// and messages.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    document: CanvasDocument,
}

impl Canvas {
    pub fn new(settings: CanvasSettings, ids: &mut IdAllocator) -> Self {
        Self {
            document: CanvasDocument {
                id: ids.next(EntityKind::Canvas),
                title: settings.title,
                width: settings.width,
                height: settings.height,
                zoom_to_fit: settings.zoom_to_fit,
                tex_typesetting: settings.tex_typesetting,
                graph: None,
                menus: IndexMap::new(),
                messages: IndexMap::new(),
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.document.id
    }

    /// Attach a top-level menu, returning its identifier.
    pub fn add_menu(&mut self, spec: &MenuSpec, ids: &mut IdAllocator) -> Result<String> {
        let menu = build_menu(spec, ids)?;
        let id = menu.id.clone();
        self.document.menus.insert(id.clone(), menu);
        Ok(id)
    }

    pub fn add_message(&mut self, spec: &MessageSpec, ids: &mut IdAllocator) -> String {
        let message = build_message(spec, ids);
        let id = message.id.clone();
        self.document.messages.insert(id.clone(), message);
        id
    }

    /// Build the graph record for `graph` and place it on the canvas,
    /// replacing any previous one.
    pub fn set_graph<G: HostGraph>(
        &mut self,
        graph: &G,
        settings: &GraphSettings,
        hooks: &OptionHooks<'_, G::Vertex>,
        ids: &mut IdAllocator,
    ) -> Result<&GraphDocument> {
        let computed = GraphBuilder::new(graph, settings).compute(hooks, ids)?;
        Ok(self.document.graph.insert(computed))
    }

    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    pub fn into_document(self) -> CanvasDocument {
        self.document
    }
}

/// Exports host graphs as Francy documents.
///
/// The adapter owns the identifier counter. It carries forward from one
/// export to the next, so documents produced by the same adapter never share
/// an identifier. A failed export leaves the counter where it was.
#[derive(Debug, Clone)]
pub struct Adapter {
    version: String,
    ids: IdAllocator,
}

impl Default for Adapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter {
    pub fn new() -> Self {
        Self::with_allocator(IdAllocator::new())
    }

    pub fn with_allocator(ids: IdAllocator) -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            ids,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn allocator(&self) -> &IdAllocator {
        &self.ids
    }

    /// Export with per-vertex options taken from `options.nodes`, keyed by
    /// the vertex display string.
    pub fn export<G: HostGraph>(&mut self, graph: &G, options: &ExportOptions) -> Result<AdapterDocument> {
        if options.nodes.is_empty() {
            return self.export_with(graph, options, &OptionHooks::new());
        }
        let hooks = OptionHooks::new().with_node_options(|vertex: &G::Vertex| {
            match options.nodes.get(&graph.display(vertex)) {
                Some(value) => NodeOptions::from_value(value.clone()),
                None => Ok(NodeOptions::default()),
            }
        });
        self.export_with(graph, options, &hooks)
    }

    /// Export with caller-supplied option functions. When `hooks` carries a
    /// node function, the static `options.nodes` table is ignored.
    pub fn export_with<G: HostGraph>(
        &mut self,
        graph: &G,
        options: &ExportOptions,
        hooks: &OptionHooks<'_, G::Vertex>,
    ) -> Result<AdapterDocument> {
        let mut ids = self.ids.clone();
        if options.base_id.is_some() {
            ids.set_base_id(options.base_id.clone());
        }
        let start = ids.ordinal();
        info!(title = options.title.as_str(), start = start; "Exporting graph");

        let mut canvas = Canvas::new(options.canvas_settings(), &mut ids);
        for menu in &options.menus {
            canvas.add_menu(menu, &mut ids)?;
        }
        for message in &options.messages {
            canvas.add_message(message, &mut ids);
        }
        let computed = canvas.set_graph(graph, &options.graph_settings(), hooks, &mut ids)?;
        let (nodes, links) = (computed.nodes.len(), computed.links.len());

        info!(
            canvas = canvas.id(),
            nodes = nodes,
            links = links,
            identifiers = ids.ordinal() - start;
            "Exported graph"
        );

        ids.set_base_id(self.ids.base_id().map(str::to_owned));
        self.ids = ids;
        Ok(AdapterDocument {
            version: options.version.clone().unwrap_or_else(|| self.version.clone()),
            mime: FRANCY_MIME.to_string(),
            canvas: canvas.into_document(),
        })
    }

    pub fn to_json<G: HostGraph>(&mut self, graph: &G, options: &ExportOptions, pretty: bool) -> Result<String> {
        let document = self.export(graph, options)?;
        render_json(&document, pretty)
    }
}
