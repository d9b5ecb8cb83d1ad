//! HTML parsing helpers on top of html5ever.
//!
//! The parser is lenient: malformed markup never fails, it produces a
//! best-effort tree the same way browsers do.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse a full HTML document (fragments are wrapped in html/body)
pub fn parse_html(html: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(html)
}

/// The `<body>` element of a parsed document, or the document itself
pub fn body(dom: &RcDom) -> Handle {
    find_first_element(&dom.document, "body").unwrap_or_else(|| dom.document.clone())
}

/// Lowercase local name of an element node
pub fn element_name(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref().to_ascii_lowercase()),
        _ => None,
    }
}

pub fn is_element(handle: &Handle, tag: &str) -> bool {
    match &handle.data {
        NodeData::Element { name, .. } => name.local.as_ref().eq_ignore_ascii_case(tag),
        _ => false,
    }
}

/// Attribute value of an element
pub fn attr(handle: &Handle, attr_name: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| a.name.local.as_ref().eq_ignore_ascii_case(attr_name))
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// Contents of a text node
pub fn text(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

/// Direct children, in document order
pub fn children(handle: &Handle) -> Vec<Handle> {
    handle.children.borrow().clone()
}

/// Direct element children with one of the given tag names
pub fn child_elements(handle: &Handle, tags: &[&str]) -> Vec<Handle> {
    handle
        .children
        .borrow()
        .iter()
        .filter(|child| tags.iter().any(|tag| is_element(child, tag)))
        .cloned()
        .collect()
}

/// First element with the tag name in document order, including `handle`.
/// Walks with an explicit stack, so nesting depth is unbounded.
pub fn find_first_element(handle: &Handle, tag: &str) -> Option<Handle> {
    let mut pending = vec![handle.clone()];
    while let Some(node) = pending.pop() {
        if is_element(&node, tag) {
            return Some(node);
        }
        pending.extend(node.children.borrow().iter().rev().cloned());
    }
    None
}
