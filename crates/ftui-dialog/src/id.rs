#![forbid(unsafe_code)]

//! Dialog instance identifiers.
//!
//! Every dialog receives a [`DialogId`] at construction. The id binds the
//! header title to the panel's accessible label (`dialog-<n>-title`) and is
//! immutable for the dialog's lifetime.
//!
//! Ids come from an [`IdAllocator`]. The process-wide allocator returned by
//! [`IdAllocator::global`] is the default; tests inject a fresh allocator to
//! get deterministic numbering.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter backing [`IdAllocator::global`].
static GLOBAL_DIALOG_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a dialog instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DialogId(u64);

impl DialogId {
    /// Raw numeric value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Element id of the rendered title, referenced by `aria-labelledby`.
    #[must_use]
    pub fn title_id(self) -> String {
        format!("{self}-title")
    }
}

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dialog-{}", self.0)
    }
}

#[derive(Debug, Clone)]
enum Source {
    Global,
    Local(Arc<AtomicU64>),
}

/// Hands out monotonically increasing [`DialogId`]s.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    source: Source,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::global()
    }
}

impl IdAllocator {
    /// Allocator sharing the process-wide counter.
    pub fn global() -> Self {
        Self {
            source: Source::Global,
        }
    }

    /// Independent allocator starting at 1.
    pub fn new() -> Self {
        Self {
            source: Source::Local(Arc::new(AtomicU64::new(1))),
        }
    }

    /// Allocate the next id.
    pub fn next_id(&self) -> DialogId {
        let counter = match &self.source {
            Source::Global => &GLOBAL_DIALOG_COUNTER,
            Source::Local(counter) => counter.as_ref(),
        };
        DialogId(counter.fetch_add(1, Ordering::Relaxed))
    }
}
