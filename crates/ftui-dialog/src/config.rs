#![forbid(unsafe_code)]

//! Dialog configuration.

use std::time::Duration;

/// Default bound on how long a transition may stay in flight before
/// [`Dialog::tick`](crate::Dialog::tick) finalizes it.
pub const DEFAULT_TRANSITION_TIMEOUT: Duration = Duration::from_millis(1000);

/// Dialog configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DialogConfig {
    /// Label shown in the header; also the accessible name.
    pub label: String,
    /// Disable the header (and its close button). The label is then applied
    /// directly to the panel.
    pub no_header: bool,
    /// Open on mount.
    pub open: bool,
    /// Fallback for a transition whose completion signal never arrives.
    /// `None` waits indefinitely.
    pub transition_timeout: Option<Duration>,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            no_header: false,
            open: false,
            transition_timeout: Some(DEFAULT_TRANSITION_TIMEOUT),
        }
    }
}

impl DialogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }

    pub fn open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    pub fn transition_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.transition_timeout = timeout;
        self
    }
}
