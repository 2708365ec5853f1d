use crate::ir::SimpleGraph;
use anyhow::{Result, anyhow};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)(directed|undirected|digraph|graph)\s*$").unwrap());
static EDGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<left>.+?)\s*(?P<arrow>-->|->|---|--)\s*(?P<right>.+)$").unwrap()
});
static PARENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^parent\s+(?P<child>.+?)\s*:\s*(?P<parent>.+)$").unwrap());

/// Parse a plain-text edge list.
///
/// ```text
/// directed
/// a -> b
/// b -> c   # trailing comments are stripped
/// lonely
/// parent c : a
/// ```
///
/// `--`/`---` lines make the graph undirected, `->`/`-->` directed, unless a
/// header line fixed the kind first. A bare token declares an isolated vertex.
pub fn parse_edge_list(input: &str) -> Result<SimpleGraph<String>> {
    let mut graph = SimpleGraph::new();
    let mut header_seen = false;

    for (lineno, raw_line) in input.lines().enumerate() {
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = HEADER_RE.captures(line) {
            if header_seen || graph.vertex_count() > 0 {
                return Err(anyhow!(
                    "line {}: graph kind must be declared before any vertex",
                    lineno + 1
                ));
            }
            let kind = caps[1].to_ascii_lowercase();
            graph.directed = Some(matches!(kind.as_str(), "directed" | "digraph"));
            header_seen = true;
            continue;
        }
        if let Some(caps) = PARENT_RE.captures(line) {
            graph.set_parent(unquote(&caps["child"]), unquote(&caps["parent"]));
            continue;
        }
        if let Some(caps) = EDGE_RE.captures(line) {
            let directed = caps["arrow"].ends_with('>');
            match graph.directed {
                None => graph.directed = Some(directed),
                Some(kind) if kind != directed && !header_seen => {
                    return Err(anyhow!(
                        "line {}: mixes directed and undirected edges",
                        lineno + 1
                    ));
                }
                _ => {}
            }
            graph.add_edge(unquote(&caps["left"]), unquote(&caps["right"]));
            continue;
        }
        if line.split_whitespace().count() > 1 && !is_quoted(line) {
            return Err(anyhow!("line {}: cannot parse `{}`", lineno + 1, line));
        }
        graph.ensure_vertex(unquote(line));
    }

    Ok(graph)
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VertexToken {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl VertexToken {
    fn into_label(self) -> String {
        match self {
            VertexToken::Text(val) => val,
            VertexToken::Integer(val) => val.to_string(),
            VertexToken::Float(val) => val.to_string(),
            VertexToken::Bool(val) => val.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GraphFile {
    directed: Option<bool>,
    #[serde(default)]
    nodes: Vec<VertexToken>,
    #[serde(default)]
    edges: Vec<(VertexToken, VertexToken)>,
    #[serde(default)]
    parents: IndexMap<String, VertexToken>,
}

/// Parse a JSON (or JSON5) graph description:
/// `{"directed": false, "nodes": [1, 2], "edges": [[1, 2]], "parents": {"2": 1}}`.
///
/// Listed nodes come first in their given order; edge endpoints not listed
/// are appended as they appear.
pub fn parse_graph_json(input: &str) -> Result<SimpleGraph<String>> {
    let parsed: GraphFile = json5::from_str(input)?;
    let mut graph = SimpleGraph::new();
    graph.directed = parsed.directed;
    for node in parsed.nodes {
        graph.ensure_vertex(node.into_label());
    }
    for (source, target) in parsed.edges {
        graph.add_edge(source.into_label(), target.into_label());
    }
    for (child, parent) in parsed.parents {
        if !graph.contains(&child) {
            return Err(anyhow!("parent declared for unknown vertex `{}`", child));
        }
        graph.set_parent(child, parent.into_label());
    }
    Ok(graph)
}

fn strip_comment(line: &str) -> &str {
    let line = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };
    match line.find("%%") {
        Some(idx) => &line[..idx],
        None => line,
    }
}

fn is_quoted(token: &str) -> bool {
    token.len() >= 2 && token.starts_with('"') && token.ends_with('"')
}

fn unquote(token: &str) -> String {
    let token = token.trim();
    if is_quoted(token) {
        token[1..token.len() - 1].to_string()
    } else {
        token.to_string()
    }
}
