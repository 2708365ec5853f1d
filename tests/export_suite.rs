use std::collections::HashSet;
use std::path::{Path, PathBuf};

use francy_adapter::{
    Adapter, AdapterError, EdgeOptions, ExportOptions, GraphType, IdAllocator, MenuSpec, NodeOptions, OptionHooks,
    SimpleGraph,
    load_options, parse_edge_list, parse_graph_json,
};
use serde_json::{Value, json};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).expect("fixture read failed")
}

fn path_graph() -> SimpleGraph<i32> {
    SimpleGraph::from_edges(false, [(1, 2), (2, 3), (3, 4)])
}

/// Every string found under an `id` key, anywhere in the document.
fn collect_ids(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == "id" {
                    if let Some(id) = child.as_str() {
                        out.push(id.to_string());
                    }
                } else {
                    collect_ids(child, out);
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_ids(item, out)),
        _ => {}
    }
}

fn assert_no_nulls(value: &Value, at: &str) {
    match value {
        Value::Null => panic!("null at {at}"),
        Value::Object(map) => map.iter().for_each(|(key, child)| assert_no_nulls(child, &format!("{at}.{key}"))),
        Value::Array(items) => items.iter().for_each(|item| assert_no_nulls(item, at)),
        _ => {}
    }
}

fn node(id: &str, title: &str, layer: i64) -> Value {
    json!({
        "id": id, "x": 0, "y": 0, "type": "circle", "size": 10, "title": title,
        "color": "", "highlight": true, "layer": layer, "parent": "",
        "menus": {}, "messages": {}, "callbacks": {}
    })
}

fn link(id: &str, source: &str, target: &str) -> Value {
    json!({"source": source, "weight": 1, "color": "", "target": target, "id": id})
}

#[test]
fn path_graph_with_base_id() {
    let options = ExportOptions::default().with_base_id("mycanvas");
    let document = Adapter::new().export(&path_graph(), &options).unwrap();
    let expected = json!({
        "version": "1.1.3",
        "mime": "application/vnd.francy+json",
        "canvas": {
            "id": "mycanvas",
            "title": "A Francy graph representation",
            "width": 800.0,
            "height": 100.0,
            "zoomToFit": true,
            "texTypesetting": false,
            "graph": {
                "id": "mycanvas_graph2",
                "simulation": true,
                "collapsed": true,
                "drag": false,
                "showNeighbours": false,
                "nodes": {
                    "mycanvas_node3": node("mycanvas_node3", "1", 3),
                    "mycanvas_node4": node("mycanvas_node4", "2", 4),
                    "mycanvas_node5": node("mycanvas_node5", "3", 5),
                    "mycanvas_node6": node("mycanvas_node6", "4", 6),
                },
                "links": {
                    "mycanvas_edge7": link("mycanvas_edge7", "mycanvas_node3", "mycanvas_node4"),
                    "mycanvas_edge8": link("mycanvas_edge8", "mycanvas_node4", "mycanvas_node5"),
                    "mycanvas_edge9": link("mycanvas_edge9", "mycanvas_node5", "mycanvas_node6"),
                },
                "type": "undirected"
            },
            "menus": {},
            "messages": {}
        }
    });
    assert_eq!(document.to_value().unwrap(), expected);
}

#[test]
fn default_prefix_ids() {
    let document = Adapter::new().export(&path_graph(), &ExportOptions::default()).unwrap();
    let graph = document.canvas.graph.as_ref().unwrap();
    assert_eq!(document.canvas.id, "F1");
    assert_eq!(graph.nodes.keys().collect::<Vec<_>>(), vec!["F3", "F4", "F5", "F6"]);
    assert_eq!(graph.links.len(), 3);
    for (link, (source, target)) in graph.links.values().zip([("F3", "F4"), ("F4", "F5"), ("F5", "F6")]) {
        assert_eq!((link.source.as_str(), link.target.as_str()), (source, target));
    }
    assert!(graph
        .nodes
        .values()
        .all(|n| n.menus.is_empty() && n.messages.is_empty() && n.callbacks.is_empty()));
}

#[test]
fn json_key_order_is_stable() {
    let json = Adapter::new()
        .to_json(&path_graph(), &ExportOptions::default(), false)
        .unwrap();
    let node = r#""F3":{"id":"F3","x":0,"y":0,"type":"circle","size":10,"title":"1","color":"","highlight":true,"layer":3,"parent":"","menus":{},"messages":{},"callbacks":{}}"#;
    let link = r#""F7":{"source":"F3","weight":1,"color":"","target":"F4","id":"F7"}"#;
    assert!(json.contains(node), "{json}");
    assert!(json.contains(link), "{json}");
    assert!(json.ends_with(r#""type":"undirected"},"menus":{},"messages":{}}}"#));
}

#[test]
fn ids_unique_and_links_resolve() {
    let options = load_options(Some(&fixture("options.json5"))).unwrap();
    let graph = parse_graph_json(&read_fixture("genealogy.json")).unwrap();
    let hooks = OptionHooks::new()
        .with_node_options(|v: &String| Ok(NodeOptions::new().with_extra("label", json!(v.to_uppercase()))))
        .with_link_options(|_: &String, _: &String| Ok(EdgeOptions::new().with_length(30.0)));
    let value = Adapter::new().export_with(&graph, &options, &hooks).unwrap().to_value().unwrap();

    let mut ids = Vec::new();
    collect_ids(&value, &mut ids);
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "duplicate ids in {ids:?}");

    let graph = &value["canvas"]["graph"];
    let nodes = graph["nodes"].as_object().unwrap();
    for link in graph["links"].as_object().unwrap().values() {
        assert!(nodes.contains_key(link["source"].as_str().unwrap()));
        assert!(nodes.contains_key(link["target"].as_str().unwrap()));
        assert_eq!(link["length"], 30.0);
    }
    assert_no_nulls(&value, "$");
}

#[test]
fn configured_export_from_fixtures() {
    let options = load_options(Some(&fixture("options.json5"))).unwrap();
    let graph = parse_graph_json(&read_fixture("genealogy.json")).unwrap();
    let document = Adapter::new().export(&graph, &options).unwrap();
    let canvas = &document.canvas;

    assert_eq!(canvas.id, "family");
    assert_eq!(canvas.title, "Genealogy");
    assert_eq!(canvas.menus.keys().collect::<Vec<_>>(), vec!["family_menu2", "family_menu4"]);
    let browse = &canvas.menus["family_menu4"];
    assert!(browse.callback.is_none());
    assert_eq!(browse.menus["family_menu5"].callback.as_ref().unwrap().id, "family_callback6");
    assert_eq!(canvas.messages["family_message7"].message_type, "info");

    let graph = canvas.graph.as_ref().unwrap();
    assert_eq!(graph.id, "family_graph8");
    assert_eq!(graph.graph_type, GraphType::Tree);
    let ada = &graph.nodes["family_node9"];
    assert_eq!(ada.title, "Ada");
    assert_eq!(ada.color, "gold");
    assert_eq!(ada.size, 14);
    // Declared parent wins over the earlier Byron -> Ada edge.
    assert_eq!(ada.parent, "family_node12");
    assert_eq!(graph.nodes["family_node11"].parent, "family_node9");
    assert_eq!(graph.nodes["family_node10"].parent, "");
    assert_eq!(graph.links.keys().last().map(String::as_str), Some("family_edge15"));
}

#[test]
fn tree_parent_first_writer_wins() {
    let graph = parse_edge_list(&read_fixture("tree.edges")).unwrap();
    let options = ExportOptions::default().with_graph_type(GraphType::Tree);
    let document = Adapter::new().export(&graph, &options).unwrap();
    let graph = document.canvas.graph.unwrap();
    let by_title = |title: &str| graph.nodes.values().find(|n| n.title == title).unwrap();
    assert_eq!(by_title("B").parent, by_title("A").id);
    assert_eq!(by_title("D").parent, by_title("B").id);
    assert_eq!(by_title("A").parent, "");
    assert_eq!(by_title("C").parent, "");
}

#[test]
fn edge_list_fixture_infers_type() {
    let graph = parse_edge_list(&read_fixture("path.edges")).unwrap();
    let value = Adapter::new()
        .export(&graph, &ExportOptions::default())
        .unwrap()
        .to_value()
        .unwrap();
    assert_eq!(value["canvas"]["graph"]["type"], "undirected");

    let graph = parse_edge_list(&read_fixture("tree.edges")).unwrap();
    let value = Adapter::new()
        .export(&graph, &ExportOptions::default())
        .unwrap()
        .to_value()
        .unwrap();
    assert_eq!(value["canvas"]["graph"]["type"], "directed");
}

#[test]
fn default_title_is_vertex_display() {
    let mut graph = SimpleGraph::undirected();
    graph.ensure_vertex(42);
    let document = Adapter::new().export(&graph, &ExportOptions::default()).unwrap();
    let node = document.canvas.graph.unwrap().nodes.into_values().next().unwrap();
    assert_eq!(node.title, "42");
}

#[test]
fn invalid_node_type_aborts_export() {
    let mut adapter = Adapter::new();
    let hooks = OptionHooks::new().with_node_options(|_: &i32| NodeOptions::from_value(json!({"type": "hexagon"})));
    let result = adapter.export_with(&path_graph(), &ExportOptions::default(), &hooks);
    assert!(matches!(result, Err(AdapterError::Validation { field: "node type", .. })));
    assert_eq!(adapter.allocator().ordinal(), 0);
}

#[test]
fn missing_menu_title_aborts_export() {
    let options: ExportOptions = francy_adapter::config::parse_options(r#"{menus: [{funcname: "f"}]}"#).unwrap();
    let err = Adapter::new().export(&path_graph(), &options).unwrap_err();
    assert!(matches!(err, AdapterError::MissingField { field: "title", .. }));
}

#[test]
fn pass_through_field_cannot_break_mappings() {
    let mut adapter = Adapter::new();
    let hooks = OptionHooks::new().with_node_options(|_: &i32| NodeOptions::from_value(json!({"menus": null, "x": 99})));
    let err = adapter
        .export_with(&path_graph(), &ExportOptions::default(), &hooks)
        .unwrap_err();
    assert!(matches!(err, AdapterError::Shape { record: "node", field: "menus", found: "null", .. }));
    assert_eq!(adapter.allocator().ordinal(), 0);
}

#[test]
fn pass_through_field_cannot_redirect_links() {
    let hooks = OptionHooks::new()
        .with_link_options(|_: &i32, _: &i32| EdgeOptions::from_value(json!({"target": "ghost", "label": "next"})));
    let err = Adapter::new()
        .export_with(&path_graph(), &ExportOptions::default(), &hooks)
        .unwrap_err();
    assert!(matches!(err, AdapterError::Validation { field: "pass-through key", ref value, .. } if value == "target"));
}

#[test]
fn nested_nulls_never_reach_the_output() {
    let options = ExportOptions::default()
        .with_menu(MenuSpec::new("m").with_required_arg("n", json!(null)).with_required_arg("k", json!({"default": null})));
    let hooks = OptionHooks::new().with_node_options(|_: &i32| Ok(NodeOptions::new().with_extra("meta", json!({"note": null}))));
    let document = Adapter::new().export_with(&path_graph(), &options, &hooks).unwrap();
    let value = document.to_value().unwrap();
    assert_no_nulls(&value, "$");
    assert_eq!(value["canvas"]["menus"]["F2"]["callback"]["requiredArgs"], json!({"k": {}}));
    assert!(!document.to_json().unwrap().contains("null"));
}

#[test]
fn zero_node_size_is_rejected() {
    let options: ExportOptions = francy_adapter::config::parse_options("{nodeSize: 0}").unwrap();
    let err = Adapter::new().export(&path_graph(), &options).unwrap_err();
    assert!(matches!(err, AdapterError::Validation { field: "size", .. }));
}

#[test]
fn serialization_is_idempotent() {
    let document = Adapter::new().export(&path_graph(), &ExportOptions::default()).unwrap();
    assert_eq!(document.to_json().unwrap(), document.to_json().unwrap());
    assert_eq!(document.to_json_pretty().unwrap(), document.to_json_pretty().unwrap());
}

#[test]
fn counter_carries_forward() {
    let mut adapter = Adapter::with_allocator(IdAllocator::starting_at(100));
    let first = adapter.export(&path_graph(), &ExportOptions::default()).unwrap();
    let second = adapter.export(&path_graph(), &ExportOptions::default()).unwrap();
    assert_eq!(first.canvas.id, "F101");
    assert_eq!(second.canvas.id, "F110");

    let mut ids = Vec::new();
    collect_ids(&first.to_value().unwrap(), &mut ids);
    collect_ids(&second.to_value().unwrap(), &mut ids);
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
}
