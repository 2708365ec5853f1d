use crate::document::AdapterDocument;
use crate::error::Result;
use std::path::Path;

pub fn render_json(document: &AdapterDocument, pretty: bool) -> Result<String> {
    if pretty {
        document.to_json_pretty()
    } else {
        document.to_json()
    }
}

pub fn write_output_json(json: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
        }
        None => {
            println!("{}", json);
        }
    }
    Ok(())
}
