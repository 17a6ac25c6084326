//! Terminal rendering of view states.
//!
//! The screen has four mutually exclusive regions (progress, list, empty
//! notice, error notice); each state shows exactly one of them.

use std::cell::RefCell;
use std::io::Write;

use animals_core::{MessageKey, View, ViewState};

/// Resolve a message key to display text.
pub fn message_text(key: MessageKey) -> &'static str {
    match key {
        MessageKey::Empty => "No animals to show.",
        MessageKey::Error => "Something went wrong loading animals.",
    }
}

/// Lines shown for `state`.
pub fn render_lines(state: &ViewState) -> Vec<String> {
    match state {
        ViewState::Loading => vec!["Loading animals...".to_string()],
        ViewState::Loaded(animals) => animals
            .iter()
            .map(|animal| format!("{:<12} [{}]", animal.name, animal.image_key))
            .collect(),
        ViewState::Empty(key) | ViewState::Error(key) => vec![message_text(*key).to_string()],
    }
}

/// Writes each state to `out` and remembers the last one.
pub struct TerminalView<W: Write> {
    out: RefCell<W>,
    last: RefCell<Option<ViewState>>,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
            last: RefCell::new(None),
        }
    }

    pub fn last_state(&self) -> Option<ViewState> {
        self.last.borrow().clone()
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> View for TerminalView<W> {
    fn set_view_state(&self, state: ViewState) {
        {
            let mut out = self.out.borrow_mut();
            for line in render_lines(&state) {
                if let Err(e) = writeln!(out, "{line}") {
                    tracing::warn!(error = %e, "could not write to terminal");
                    break;
                }
            }
        }
        *self.last.borrow_mut() = Some(state);
    }
}
