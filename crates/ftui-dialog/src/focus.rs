#![forbid(unsafe_code)]

//! Focus redirection while a dialog is open.
//!
//! A [`FocusTrap`] subscribes to the document-wide focus-in signal and moves
//! focus to a fallback element (the dialog panel) whenever focus lands
//! outside the trap's scope (the dialog host). It does not implement tab
//! order; it only decides *when* focus is pulled back.
//!
//! # Invariants
//!
//! 1. The focus-in subscription lives exactly as long as the trap value;
//!    dropping the trap detaches it.
//! 2. Traps stack LIFO per document. Only the innermost trap redirects, so
//!    two open dialogs never bounce focus between each other.
//! 3. A redirect targets an element inside the scope, so the nested focus-in
//!    it triggers is accepted and the dispatch terminates.

use std::fmt;

use tracing::{trace, warn};

use crate::dom::{Document, ElementId};
use crate::listener::Subscription;

/// RAII focus trap installed on a [`Document`].
#[must_use = "dropping a FocusTrap stops redirecting focus"]
pub struct FocusTrap {
    document: Document,
    token: u64,
    scope: ElementId,
    _focus_in: Subscription,
}

impl FocusTrap {
    /// Redirect focus leaving `scope` to `fallback` until the trap is
    /// dropped.
    pub fn install(document: &Document, scope: ElementId, fallback: ElementId) -> Self {
        let token = document.push_trap(scope);
        let handle = document.clone();
        let focus_in = document.on_focus_in(move |event| {
            if !handle.is_top_trap(token) || handle.contains(scope, event.target) {
                return;
            }
            trace!(
                scope = scope.get(),
                escaped = event.target.get(),
                "redirecting focus into trap"
            );
            if let Err(err) = handle.focus(fallback) {
                warn!(scope = scope.get(), %err, "focus redirect failed");
            }
        });
        Self {
            document: document.clone(),
            token,
            scope,
            _focus_in: focus_in,
        }
    }

    pub fn scope(&self) -> ElementId {
        self.scope
    }

    /// Whether this is the innermost trap of its document.
    pub fn is_active(&self) -> bool {
        self.document.is_top_trap(self.token)
    }
}

impl fmt::Debug for FocusTrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusTrap")
            .field("scope", &self.scope)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl Drop for FocusTrap {
    fn drop(&mut self) {
        self.document.remove_trap(self.token);
    }
}
