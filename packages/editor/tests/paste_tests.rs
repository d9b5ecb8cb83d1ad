//! Pasting HTML tables into the editor

use tabula_editor::{
    ClipboardData, EditorConfig, EditorView, Node, NodeKind, PasteOutcome, Position, Schema,
    Selection, SerializeOptions, TableConverter,
};
use tabula_schema::html::{find_first_element, parse_html};
use tabula_schema::serialize_node;

fn convert(html: &str) -> Option<Node> {
    let dom = parse_html(html);
    let table = find_first_element(&dom.document, "table")?;
    TableConverter::new(Schema::standard().unwrap()).convert(&table)
}

/// View with the caret in the first cell of a one-cell table
fn view_in_cell() -> EditorView {
    EditorView::mount("cell", "<table><tr><td></td></tr></table>", EditorConfig::default()).unwrap()
}

fn html_clipboard(html: &str) -> ClipboardData {
    ClipboardData::from_parts(Some(html), Some("plain fallback"))
}

/// Row/cell shape of a table and all tables nested in its cells
fn shape(table: &Node) -> Vec<Vec<usize>> {
    let mut shapes = vec![table.content.iter().map(Node::child_count).collect()];
    for row in &table.content {
        for cell in &row.content {
            for block in &cell.content {
                if block.kind == NodeKind::Table {
                    shapes.extend(shape(block));
                }
            }
        }
    }
    shapes
}

#[test]
fn test_paste_table_in_cell_is_handled() {
    let mut view = view_in_cell();
    let outcome = view
        .paste(&html_clipboard("<table><tr><td>A</td><td>B</td></tr></table>"))
        .unwrap();

    assert_eq!(outcome, PasteOutcome::Plugin("nested-table-paste".to_string()));
    assert_eq!(view.history().undo_levels(), 1);

    // The empty paragraph in the cell was replaced by the table
    let cell = &view.state().doc.content[0].content[0].content[0];
    assert_eq!(cell.child_count(), 1);
    let pasted = &cell.content[0];
    assert_eq!(pasted.kind, NodeKind::Table);
    assert_eq!(pasted.child_count(), 1);

    let cells: Vec<String> = pasted.content[0].content.iter().map(Node::text_content).collect();
    assert_eq!(cells, vec!["A", "B"]);
    assert!(pasted.content[0]
        .content
        .iter()
        .all(|cell| cell.kind == NodeKind::TableCell));
}

#[test]
fn test_paste_outside_table_falls_through() {
    let mut view = EditorView::mount("plain", "<p></p>", EditorConfig::default()).unwrap();
    let html = "<table><tr><td>1</td><td>2</td></tr><tr><td>3</td><td>4</td></tr></table>";

    let outcome = view.paste(&html_clipboard(html)).unwrap();
    assert_eq!(outcome, PasteOutcome::Default);
}

#[test]
fn test_paste_without_table_falls_through() {
    let mut view = view_in_cell();
    let outcome = view.paste(&html_clipboard("<p>hello</p>")).unwrap();

    assert!(!outcome.handled_by_plugin());
    assert_eq!(outcome, PasteOutcome::Default);
    assert_eq!(view.state().doc.text_content(), "hello");
}

#[test]
fn test_paste_without_html_falls_through() {
    let mut view = view_in_cell();
    let clipboard = ClipboardData::from_parts(None, Some("<table><tr><td>x</td></tr></table>"));

    let outcome = view.paste(&clipboard).unwrap();
    assert_eq!(outcome, PasteOutcome::Default);
    // Plain text is inserted verbatim
    assert_eq!(view.state().doc.count(NodeKind::Table), 1);
}

#[test]
fn test_paste_empty_table_falls_through() {
    let mut view = view_in_cell();
    let outcome = view.paste(&html_clipboard("<table></table>")).unwrap();
    assert!(!outcome.handled_by_plugin());
}

#[test]
fn test_paste_into_header_cell() {
    let mut view = EditorView::mount(
        "header",
        "<table><tr><th>Head</th></tr></table>",
        EditorConfig::default(),
    )
    .unwrap();
    view.set_selection(Selection::caret(Position::new(vec![0, 0, 0, 0], 4)))
        .unwrap();

    let outcome = view
        .paste(&html_clipboard("<table><tr><td>x</td></tr></table>"))
        .unwrap();
    assert!(outcome.handled_by_plugin());

    let header = &view.state().doc.content[0].content[0].content[0];
    assert_eq!(header.kind, NodeKind::TableHeader);
    assert_eq!(header.content[0].text_content(), "Head");
    assert_eq!(header.content[1].kind, NodeKind::Table);
}

#[test]
fn test_first_table_of_clipboard_markup_is_used() {
    let mut view = view_in_cell();
    let html = r#"<html><body><!--StartFragment--><p>intro</p><table><tr><td>first</td></tr></table><table><tr><td>second</td></tr></table><!--EndFragment--></body></html>"#;

    assert!(view.paste(&html_clipboard(html)).unwrap().handled_by_plugin());
    let text = view.state().doc.text_content();
    assert_eq!(text, "first");
}

#[test]
fn test_pasted_table_is_one_undo_step() {
    let mut view = view_in_cell();
    let before = view.state().doc.clone();

    view.paste(&html_clipboard("<table><tr><td>A</td></tr></table>"))
        .unwrap();
    assert_ne!(view.state().doc, before);

    assert!(view.undo().unwrap());
    assert_eq!(view.state().doc, before);

    assert!(view.redo().unwrap());
    assert_eq!(view.state().doc.count(NodeKind::Table), 2);
}

#[test]
fn test_row_and_cell_counts_never_exceed_source() {
    let html = "<table><tr><td>a</td><td>b</td><td>c</td></tr><tr></tr><tr><td>d</td></tr></table>";
    let table = convert(html).unwrap();

    // Source has 3 rows with 3, 0 and 1 cells
    assert!(table.child_count() <= 3);
    assert_eq!(shape(&table), vec![vec![3, 1]]);
}

#[test]
fn test_nested_tables_keep_shape() {
    let html = "
        <table>
          <tr>
            <td>
              <table>
                <tr><td>1</td><td>2</td></tr>
                <tr>
                  <td>
                    <table><tr><td>x</td></tr><tr><td>y</td></tr></table>
                  </td>
                  <td>3</td>
                </tr>
              </table>
            </td>
            <td>side</td>
          </tr>
        </table>";

    let table = convert(html).unwrap();
    assert_eq!(table.count(NodeKind::Table), 3);
    assert_eq!(shape(&table), vec![vec![2], vec![2, 2], vec![1, 1]]);
    assert_eq!(Schema::standard().unwrap().check(&table), Ok(()));
}

#[test]
fn test_convert_serialize_convert_is_stable() {
    let html = r#"<table><tbody>
        <tr><th align="left" valign="top">Name</th><th>Value</th></tr>
        <tr><td style="color: red">a</td><td><table><tr><td>nested</td><td></td></tr></table></td></tr>
        <tr><td colspan="2"><p>para <em>em</em></p></td></tr>
    </tbody></table>"#;

    let first = convert(html).unwrap();
    let rendered = serialize_node(&first, SerializeOptions::default());
    let second = convert(&rendered).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_empty_cell_has_one_empty_paragraph() {
    let table = convert("<table><tr><td></td></tr></table>").unwrap();
    let cell = &table.content[0].content[0];
    assert_eq!(cell.kind, NodeKind::TableCell);
    assert_eq!(cell.content.len(), 1);
    assert_eq!(cell.content[0].kind, NodeKind::Paragraph);
    assert!(cell.content[0].content.is_empty());
}

#[test]
fn test_configured_depth_limit_applies_to_paste() {
    let config = EditorConfig {
        max_table_depth: 0,
        ..Default::default()
    };
    let mut view = EditorView::mount("shallow", "<table><tr><td></td></tr></table>", config).unwrap();
    let html = "<table><tr><td><table><tr><td>inner</td></tr></table></td></tr></table>";

    assert!(view.paste(&html_clipboard(html)).unwrap().handled_by_plugin());
    // Existing table + pasted root; the nested one was skipped
    assert_eq!(view.state().doc.count(NodeKind::Table), 2);
    assert!(!view.state().doc.text_content().contains("inner"));
}

#[test]
fn test_paste_across_cells_leaves_document_untouched() {
    let mut view = EditorView::mount(
        "cells",
        "<table><tr><td>a</td><td>b</td></tr></table>",
        EditorConfig::default(),
    )
    .unwrap();
    view.set_selection(Selection::new(
        Position::new(vec![0, 0, 0, 0], 0),
        Position::new(vec![0, 0, 1, 0], 1),
    ))
    .unwrap();
    let before = view.state().doc.clone();

    let outcome = view
        .paste(&html_clipboard("<table><tr><td>x</td></tr></table>"))
        .unwrap();
    assert_eq!(outcome, PasteOutcome::Ignored);
    assert_eq!(view.state().doc, before);
    assert!(!view.history().can_undo());
}

#[test]
fn test_paste_deeply_wrapped_table_into_cell() {
    let mut view = view_in_cell();
    let html = format!("{}<table><tr><td>x</td></tr></table>", "<div>".repeat(20_000));

    let outcome = view.paste(&html_clipboard(&html)).unwrap();
    assert!(outcome.handled_by_plugin());
    assert_eq!(view.state().doc.count(NodeKind::Table), 2);
    assert_eq!(view.state().doc.text_content(), "x");
}

#[test]
fn test_paste_deep_markup_without_table_into_cell() {
    let mut view = view_in_cell();
    let html = format!("{}deep text", "<blockquote>".repeat(20_000));

    let outcome = view.paste(&html_clipboard(&html)).unwrap();
    assert_eq!(outcome, PasteOutcome::Default);
    assert_eq!(view.state().doc.text_content(), "deep text");
    assert_eq!(Schema::standard().unwrap().check(&view.state().doc), Ok(()));
}

#[test]
fn test_configured_depth_limit_applies_to_wrapped_tables() {
    let config = EditorConfig {
        max_table_depth: 0,
        ..Default::default()
    };
    let mut view = EditorView::mount("wrapped", "<table><tr><td></td></tr></table>", config).unwrap();
    let html = "<table><tr><td><center><table><tr><td>inner</td></tr></table></center></td></tr></table>";

    assert!(view.paste(&html_clipboard(html)).unwrap().handled_by_plugin());
    assert_eq!(view.state().doc.count(NodeKind::Table), 2);
    assert!(!view.state().doc.text_content().contains("inner"));
}
