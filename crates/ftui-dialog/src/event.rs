#![forbid(unsafe_code)]

//! Lifecycle events emitted by a dialog.
//!
//! | Event             | Cancelable | Emitted                                   |
//! |-------------------|------------|-------------------------------------------|
//! | `show`            | yes        | before the dialog starts opening          |
//! | `after-show`      | no         | after the opening transition completes    |
//! | `hide`            | yes        | before the dialog starts closing          |
//! | `after-hide`      | no         | after the closing transition completes    |
//! | `overlay-dismiss` | yes        | when the backdrop overlay is clicked      |
//!
//! Listeners receive `&mut DialogEvent` and cancel a pre-event with
//! [`DialogEvent::prevent_default`]. Cancellation is evaluated once every
//! listener has run.

use std::fmt;

use crate::id::DialogId;
use crate::listener::{ListenerSet, Subscription};

/// Kind of a dialog lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogEventKind {
    Show,
    AfterShow,
    Hide,
    AfterHide,
    OverlayDismiss,
}

impl DialogEventKind {
    pub const ALL: [Self; 5] = [
        Self::Show,
        Self::AfterShow,
        Self::Hide,
        Self::AfterHide,
        Self::OverlayDismiss,
    ];

    /// Event name as exposed to listeners.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::AfterShow => "after-show",
            Self::Hide => "hide",
            Self::AfterHide => "after-hide",
            Self::OverlayDismiss => "overlay-dismiss",
        }
    }

    /// Whether listeners may prevent the default action.
    pub const fn is_cancelable(self) -> bool {
        matches!(self, Self::Show | Self::Hide | Self::OverlayDismiss)
    }

    /// Whether this event marks the end of a transition.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::AfterShow | Self::AfterHide)
    }

    const fn index(self) -> usize {
        match self {
            Self::Show => 0,
            Self::AfterShow => 1,
            Self::Hide => 2,
            Self::AfterHide => 3,
            Self::OverlayDismiss => 4,
        }
    }
}

impl fmt::Display for DialogEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An emitted event, handed to listeners by mutable reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogEvent {
    kind: DialogEventKind,
    dialog: DialogId,
    default_prevented: bool,
}

impl DialogEvent {
    fn new(kind: DialogEventKind, dialog: DialogId) -> Self {
        Self {
            kind,
            dialog,
            default_prevented: false,
        }
    }

    pub fn kind(&self) -> DialogEventKind {
        self.kind
    }

    /// The dialog that emitted the event.
    pub fn dialog(&self) -> DialogId {
        self.dialog
    }

    /// Cancel the default action. No-op on non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.kind.is_cancelable() {
            self.default_prevented = true;
        }
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Per-kind listener lists for a single dialog.
#[derive(Debug, Clone)]
pub(crate) struct EventEmitter {
    dialog: DialogId,
    listeners: [ListenerSet<DialogEvent>; 5],
}

impl EventEmitter {
    pub(crate) fn new(dialog: DialogId) -> Self {
        Self {
            dialog,
            listeners: Default::default(),
        }
    }

    pub(crate) fn on(
        &self,
        kind: DialogEventKind,
        callback: impl Fn(&mut DialogEvent) + 'static,
    ) -> Subscription {
        self.listeners[kind.index()].subscribe(callback)
    }

    /// Emit `kind` and return the event after every listener has seen it.
    pub(crate) fn emit(&self, kind: DialogEventKind) -> DialogEvent {
        let mut event = DialogEvent::new(kind, self.dialog);
        self.listeners[kind.index()].notify(&mut event);
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::IdAllocator;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn names_and_cancelability() {
        let names: Vec<_> = DialogEventKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(
            names,
            ["show", "after-show", "hide", "after-hide", "overlay-dismiss"]
        );
        for kind in DialogEventKind::ALL {
            assert_ne!(kind.is_cancelable(), kind.is_terminal());
        }
    }

    #[test]
    fn prevent_default_ignored_on_terminal_events() {
        let id = IdAllocator::new().next_id();
        let mut event = DialogEvent::new(DialogEventKind::AfterShow, id);
        event.prevent_default();
        assert!(!event.default_prevented());

        let mut event = DialogEvent::new(DialogEventKind::Hide, id);
        event.prevent_default();
        assert!(event.default_prevented());
    }

    #[test]
    fn emit_routes_by_kind() {
        let id = IdAllocator::new().next_id();
        let emitter = EventEmitter::new(id);
        let shows = Rc::new(Cell::new(0));
        let s = Rc::clone(&shows);
        let _sub = emitter.on(DialogEventKind::Show, move |event| {
            assert_eq!(event.kind(), DialogEventKind::Show);
            s.set(s.get() + 1);
        });

        emitter.emit(DialogEventKind::Hide);
        let event = emitter.emit(DialogEventKind::Show);
        assert_eq!(shows.get(), 1);
        assert_eq!(event.dialog(), id);
        assert!(!event.default_prevented());
    }

    #[test]
    fn any_listener_can_cancel() {
        let emitter = EventEmitter::new(IdAllocator::new().next_id());
        let _a = emitter.on(DialogEventKind::Show, |_| {});
        let _b = emitter.on(DialogEventKind::Show, DialogEvent::prevent_default);
        assert!(emitter.emit(DialogEventKind::Show).default_prevented());
    }
}
