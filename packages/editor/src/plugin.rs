//! # Plugins
//!
//! Plugins hook into view events before the default behaviour runs. Hooks
//! are tried in registration order; the first one that reports the event as
//! handled stops the chain.

use crate::clipboard::ClipboardData;
use crate::view::EditorView;
use std::fmt;

pub trait Plugin: fmt::Debug {
    fn name(&self) -> &str;

    /// Called on every paste. Return `true` when the paste was handled and
    /// the default paste must not run.
    fn handle_paste(&self, _view: &mut EditorView, _clipboard: &ClipboardData) -> bool {
        false
    }
}
