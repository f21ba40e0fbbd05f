//! Top-level view selection.
//!
//! ```text
//! SignedOut --SignedIn--> Workspace(Documents)
//! Workspace(_) --SignedOut--> SignedOut
//! Workspace(t) --SelectTab(u)--> Workspace(u)
//! ```
//!
//! Everything else leaves the state unchanged. There is no terminal state.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Documents,
    Files,
}

impl Tab {
    /// Tab position in the tab strip.
    pub fn index(self) -> usize {
        match self {
            Tab::Documents => 0,
            Tab::Files => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Tab::Documents),
            1 => Some(Tab::Files),
            _ => None,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Documents => write!(f, "documents"),
            Tab::Files => write!(f, "files"),
        }
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "documents" | "docs" => Ok(Tab::Documents),
            "files" => Ok(Tab::Files),
            other => Err(format!("unknown tab '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewState {
    #[default]
    SignedOut,
    Workspace(Tab),
}

impl ViewState {
    pub fn tab(self) -> Option<Tab> {
        match self {
            ViewState::SignedOut => None,
            ViewState::Workspace(tab) => Some(tab),
        }
    }

    pub fn is_workspace(self) -> bool {
        matches!(self, ViewState::Workspace(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    SignedIn,
    SignInFailed,
    SignedOut,
    SelectTab(Tab),
}

/// Pure transition function.
pub fn transition(state: ViewState, event: ViewEvent) -> ViewState {
    match (state, event) {
        (ViewState::SignedOut, ViewEvent::SignedIn) => ViewState::Workspace(Tab::Documents),
        (ViewState::Workspace(_), ViewEvent::SignedOut) => ViewState::SignedOut,
        (ViewState::Workspace(_), ViewEvent::SelectTab(tab)) => ViewState::Workspace(tab),
        (state, _) => state,
    }
}

/// Holds the current view; [`ViewController::apply`] reports whether a
/// re-render is needed.
#[derive(Debug, Default)]
pub struct ViewController {
    state: ViewState,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// Apply `event`; returns true when the state changed.
    pub fn apply(&mut self, event: ViewEvent) -> bool {
        let next = transition(self.state, event);
        let changed = next != self.state;
        if changed {
            tracing::debug!(from = ?self.state, to = ?next, ?event, "view transition");
        }
        self.state = next;
        changed
    }
}
