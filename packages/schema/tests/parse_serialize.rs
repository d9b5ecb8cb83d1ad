//! Parser and serializer working together on realistic markup

use tabula_schema::{
    serialize_node, DomParser, MarkKind, Node, NodeKind, Schema, SchemaError, SerializeOptions,
};

fn parse(html: &str) -> Node {
    DomParser::from_schema(Schema::standard().unwrap()).parse_html(html)
}

#[test]
fn test_parsed_documents_pass_deep_validation() {
    let inputs = [
        "",
        "plain text",
        "<p>a<br>b</p><hr><blockquote><p>q</p></blockquote>",
        "<div>loose <b>bold</b><table><tr><td>x</td></tr></table></div>",
        r#"<table><tbody><tr><th>H</th></tr><tr><td><table><tr><td></td></tr></table></td></tr></tbody></table>"#,
        "<pre>code <b>not bold</b></pre>",
        "<table></table><p>after empty table</p>",
        "<span>outside block</span>",
    ];

    let schema = Schema::standard().unwrap();
    for html in inputs {
        let doc = parse(html);
        assert_eq!(schema.check(&doc), Ok(()), "invalid tree for {:?}", html);
    }
}

#[test]
fn test_empty_table_is_dropped() {
    let doc = parse("<table></table><p>after empty table</p>");
    assert_eq!(doc.count(NodeKind::Table), 0);
    assert_eq!(doc.content[0].text_content(), "after empty table");
}

#[test]
fn test_code_block_drops_marks() {
    let doc = parse("<pre>code <b>not bold</b></pre>");
    let code = &doc.content[0];
    assert_eq!(code.kind, NodeKind::CodeBlock);
    assert_eq!(code.child_count(), 1);
    assert!(code.content[0].marks.is_empty());
}

#[test]
fn test_serialized_document_parses_back_to_same_tree() {
    let html = r#"
        <h2>Report</h2>
        <p>Some <em>styled</em> <a href="https://example.com" title="site">text</a></p>
        <div class="note" style="color: gray">Photos: <span class="count">3</span></div>
        <table>
          <tr><th colspan="2" data-colwidth="120,80">Header</th></tr>
          <tr><td align="left">A</td><td><table><tr><td>inner</td></tr></table></td></tr>
        </table>
    "#;

    let first = parse(html);
    let rendered = serialize_node(&first, SerializeOptions::default());
    let second = parse(&rendered);
    assert_eq!(first, second);

    // Pretty output is whitespace-only different
    let pretty = serialize_node(&first, SerializeOptions::pretty());
    assert_eq!(parse(&pretty), first);
}

#[test]
fn test_link_mark_attrs_in_json() {
    let doc = parse(r#"<p><a href="/x">go</a></p>"#);
    let text = &doc.content[0].content[0];
    assert_eq!(text.marks[0].kind, MarkKind::Link);

    let json = serde_json::to_value(text).unwrap();
    assert_eq!(json["type"], "text");
    assert_eq!(json["marks"][0]["type"], "link");
    assert_eq!(json["marks"][0]["attrs"]["href"], "/x");
}

#[test]
fn test_document_json_deserializes_and_checks() {
    let json = serde_json::json!({
        "type": "doc",
        "content": [{
            "type": "table",
            "content": [{
                "type": "table_row",
                "content": []
            }]
        }]
    });

    let doc: Node = serde_json::from_value(json).unwrap();
    let err = Schema::standard().unwrap().check(&doc).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidContent { kind: NodeKind::TableRow, .. }));
}
