//! The four states a screen can be in, and the view that renders them.

use crate::error::ApiError;
use crate::types::{Animal, ServiceResponse};

/// Resource key for a user-facing message. The host resolves the key to
/// localized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    Empty,
    Error,
}

impl MessageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::Empty => "empty_message",
            MessageKey::Error => "error_message",
        }
    }
}

/// Exactly one of these is shown at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Loaded(Vec<Animal>),
    Empty(MessageKey),
    Error(MessageKey),
}

impl ViewState {
    /// Map the outcome of a fetch to the terminal state it should render.
    pub fn from_outcome(outcome: Result<ServiceResponse, ApiError>) -> Self {
        match outcome {
            Ok(response) if response.animals.is_empty() => ViewState::Empty(MessageKey::Empty),
            Ok(response) => ViewState::Loaded(response.animals),
            Err(_) => ViewState::Error(MessageKey::Error),
        }
    }

    pub fn message_key(&self) -> Option<MessageKey> {
        match self {
            ViewState::Empty(key) | ViewState::Error(key) => Some(*key),
            ViewState::Loading | ViewState::Loaded(_) => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ViewState::Loading)
    }
}

/// Renders view states. Called on the thread that drives the presenter.
pub trait View {
    fn set_view_state(&self, state: ViewState);
}
