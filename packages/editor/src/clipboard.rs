//! Clipboard payload of a paste event, keyed by MIME type.

use std::collections::BTreeMap;

pub const TEXT_HTML: &str = "text/html";
pub const TEXT_PLAIN: &str = "text/plain";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardData {
    items: BTreeMap<String, String>,
}

impl ClipboardData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Payload with optional HTML and plain-text representations
    pub fn from_parts(html: Option<&str>, text: Option<&str>) -> Self {
        let mut data = Self::new();
        if let Some(html) = html {
            data.set_data(TEXT_HTML, html);
        }
        if let Some(text) = text {
            data.set_data(TEXT_PLAIN, text);
        }
        data
    }

    pub fn with_data(mut self, mime: &str, data: impl Into<String>) -> Self {
        self.set_data(mime, data);
        self
    }

    pub fn set_data(&mut self, mime: &str, data: impl Into<String>) {
        self.items.insert(mime.to_ascii_lowercase(), data.into());
    }

    /// Data for a MIME type; empty payloads count as missing
    pub fn get_data(&self, mime: &str) -> Option<&str> {
        self.items
            .get(&mime.to_ascii_lowercase())
            .map(String::as_str)
            .filter(|data| !data.is_empty())
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_counts_as_missing() {
        let data = ClipboardData::from_parts(Some(""), Some("text"));
        assert_eq!(data.get_data(TEXT_HTML), None);
        assert_eq!(data.get_data(TEXT_PLAIN), Some("text"));
        assert_eq!(data.types().collect::<Vec<_>>(), vec![TEXT_HTML, TEXT_PLAIN]);
    }

    #[test]
    fn test_mime_lookup_ignores_case() {
        let data = ClipboardData::new().with_data("Text/HTML", "<p>x</p>");
        assert_eq!(data.get_data(TEXT_HTML), Some("<p>x</p>"));
    }
}
