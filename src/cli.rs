use crate::adapter::Adapter;
use crate::config::load_options;
use crate::document::GraphType;
use crate::ids::IdAllocator;
use crate::ir::SimpleGraph;
use crate::parser::{parse_edge_list, parse_graph_json};
use crate::render::{render_json, write_output_json};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::debug;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "francy", version, about = "Export graphs as Francy JSON documents")]
pub struct Args {
    /// Input graph file (edge list or .json) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Input format; guessed from the file extension when omitted
    #[arg(short = 'f', long = "format", value_enum)]
    pub format: Option<InputFormat>,

    /// Export options file (JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Canvas title
    #[arg(short = 't', long = "title")]
    pub title: Option<String>,

    /// Graph type; inferred from the input when omitted
    #[arg(short = 'g', long = "graphType")]
    pub graph_type: Option<GraphType>,

    /// Prefix for every identifier in the document
    #[arg(long = "base-id")]
    pub base_id: Option<String>,

    /// Counter value to start allocating identifiers after
    #[arg(long = "start", default_value_t = 0)]
    pub start: u64,

    /// Pretty-print the JSON output
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,

    /// Shorthand for --log-level debug
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Edges,
    Json,
}

impl Args {
    pub fn effective_log_level(&self) -> &str {
        if self.verbose { "debug" } else { &self.log_level }
    }
}

pub fn run(args: &Args) -> Result<()> {
    let mut options = load_options(args.config.as_deref())?;
    if let Some(title) = &args.title {
        options.title = title.clone();
    }
    if let Some(graph_type) = args.graph_type {
        options.graph_type = Some(graph_type);
    }
    if let Some(base_id) = &args.base_id {
        options.base_id = Some(base_id.clone());
    }

    let (input, guessed) = read_input(args.input.as_deref())?;
    let graph = parse_input(&input, args.format.unwrap_or(guessed))?;
    debug!(vertices = graph.vertex_count(), edges = graph.edge_count(); "Parsed input graph");

    let mut adapter = Adapter::with_allocator(IdAllocator::starting_at(args.start));
    let document = adapter.export(&graph, &options)?;
    let json = render_json(&document, args.pretty)?;
    write_output_json(&json, args.output.as_deref())?;
    Ok(())
}

fn parse_input(input: &str, format: InputFormat) -> Result<SimpleGraph<String>> {
    match format {
        InputFormat::Edges => parse_edge_list(input),
        InputFormat::Json => parse_graph_json(input),
    }
}

fn read_input(path: Option<&Path>) -> Result<(String, InputFormat)> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok((buf, InputFormat::Edges));
        }
        let content = std::fs::read_to_string(path)?;
        return Ok((content, guess_format(path)));
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok((buf, InputFormat::Edges))
}

fn guess_format(path: &Path) -> InputFormat {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|ext| matches!(ext, "json" | "json5"))
        .unwrap_or(false);
    if is_json { InputFormat::Json } else { InputFormat::Edges }
}
