use std::fmt::Display;
use tabula_editor::{
    insert_email_template, ClipboardData, EditorConfig, EditorView, Position, Schema, Selection,
    SerializeOptions, TableConverter,
};
use tabula_schema::html::{find_first_element, parse_html};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(prefix: &str, err: impl Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", prefix, err))
}

/// Editor instance owned by the JavaScript side. DOM events stay in
/// JavaScript; they call into this object with clipboard payloads and
/// caret positions.
#[wasm_bindgen]
pub struct Editor {
    view: EditorView,
}

#[wasm_bindgen]
impl Editor {
    /// Mount an editor over `html`, with an optional JSON config
    #[wasm_bindgen(constructor)]
    pub fn new(html: &str, config_json: Option<String>) -> Result<Editor, JsValue> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json).map_err(|e| js_error("Config error", e))?,
            None => EditorConfig::default(),
        };
        let view = EditorView::mount("wasm", html, config).map_err(|e| js_error("Mount error", e))?;
        Ok(Editor { view })
    }

    /// Feed a paste event. Returns `true` when a plugin handled it, so the
    /// host should suppress its own paste handling.
    #[wasm_bindgen(js_name = handlePaste)]
    pub fn handle_paste(&mut self, html: Option<String>, text: Option<String>) -> Result<bool, JsValue> {
        let clipboard = ClipboardData::from_parts(html.as_deref(), text.as_deref());
        let outcome = self
            .view
            .paste(&clipboard)
            .map_err(|e| js_error("Paste error", e))?;
        Ok(outcome.handled_by_plugin())
    }

    #[wasm_bindgen(js_name = setCursor)]
    pub fn set_cursor(&mut self, path: Vec<u32>, offset: u32) -> Result<(), JsValue> {
        let path = path.into_iter().map(|index| index as usize).collect();
        let caret = Selection::caret(Position::new(path, offset as usize));
        self.view
            .set_selection(caret)
            .map_err(|e| js_error("Selection error", e))
    }

    pub fn undo(&mut self) -> Result<bool, JsValue> {
        self.view.undo().map_err(|e| js_error("Undo error", e))
    }

    pub fn redo(&mut self) -> Result<bool, JsValue> {
        self.view.redo().map_err(|e| js_error("Redo error", e))
    }

    #[wasm_bindgen(js_name = toHtml)]
    pub fn to_html(&self, pretty: bool) -> String {
        let options = if pretty {
            SerializeOptions::pretty()
        } else {
            SerializeOptions::default()
        };
        self.view.to_html(options)
    }

    /// Document as JSON
    #[wasm_bindgen(js_name = toJson)]
    pub fn to_json(&self) -> Result<String, JsValue> {
        self.view
            .to_json()
            .map_err(|e| js_error("Serialization error", e))
    }

    #[wasm_bindgen(js_name = insertEmailTemplate)]
    pub fn insert_email_template(&mut self) -> Result<(), JsValue> {
        insert_email_template(&mut self.view).map_err(|e| js_error("Template error", e))
    }
}

/// Convert the first table in `html` and return it as JSON, or `undefined`
/// when there is no convertible table
#[wasm_bindgen(js_name = convertTable)]
pub fn convert_table_js(html: &str) -> Result<Option<String>, JsValue> {
    let schema = Schema::standard().map_err(|e| js_error("Schema error", e))?;
    let dom = parse_html(html);
    let Some(table) = find_first_element(&dom.document, "table") else {
        return Ok(None);
    };

    TableConverter::new(schema)
        .convert(&table)
        .map(|node| serde_json::to_string(&node))
        .transpose()
        .map_err(|e| js_error("Serialization error", e))
}
