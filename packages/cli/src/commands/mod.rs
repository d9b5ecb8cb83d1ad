pub mod convert;
pub mod init;
pub mod paste;
pub mod template;

pub use convert::{convert, ConvertArgs};
pub use init::{init, InitArgs};
pub use paste::{paste, PasteArgs};
pub use template::{template, TemplateArgs};

use anyhow::{anyhow, Result};
use tabula_editor::{Node, SerializeOptions};
use tabula_schema::serialize_node;

/// Render a node in one of the output formats (json, html)
pub fn render(node: &Node, format: &str, pretty: bool) -> Result<String> {
    match format {
        "json" if pretty => Ok(serde_json::to_string_pretty(node)?),
        "json" => Ok(serde_json::to_string(node)?),
        "html" => {
            let options = if pretty {
                SerializeOptions::pretty()
            } else {
                SerializeOptions::default()
            };
            Ok(serialize_node(node, options))
        }
        other => Err(anyhow!("Unknown format: {}. Use: json or html", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_schema::{DomParser, Schema};

    #[test]
    fn test_render_formats() {
        let doc = DomParser::from_schema(Schema::standard().unwrap()).parse_html("<p>hi</p>");

        assert_eq!(render(&doc, "html", false).unwrap(), "<p>hi</p>");
        assert!(render(&doc, "json", false).unwrap().starts_with("{\"type\":\"doc\""));
        assert!(render(&doc, "json", true).unwrap().contains('\n'));
        assert!(render(&doc, "xml", false).is_err());
    }
}
