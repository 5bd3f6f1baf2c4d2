#![forbid(unsafe_code)]

//! Minimal document model the dialog coordinates with.
//!
//! [`Document`] is a cloneable handle to a shared element tree. It tracks:
//!
//! - parent links, for containment queries ([`Document::contains`]);
//! - the focused element, with a document-wide focus-in signal;
//! - a layout flush counter, bumped by [`Document::force_layout`];
//! - the stack of active focus traps (see [`crate::focus::FocusTrap`]).
//!
//! The element tree is append-only: nodes are never removed, only hidden by
//! their owners.
//!
//! # Failure Modes
//!
//! - Creating an element under an unknown parent returns
//!   [`DomError::UnknownElement`].
//! - Focusing an unknown element returns [`DomError::UnknownElement`] and
//!   leaves focus unchanged.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use crate::listener::{ListenerSet, Subscription};

/// Identifier of a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    /// Raw numeric value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Structural errors raised by the document model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The element does not belong to this document.
    UnknownElement(ElementId),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownElement(id) => write!(f, "unknown element #{}", id.get()),
        }
    }
}

impl std::error::Error for DomError {}

/// Payload of the document-wide focus-in signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusIn {
    /// Element that just received focus.
    pub target: ElementId,
}

#[derive(Debug)]
struct DocumentInner {
    next_id: u64,
    root: ElementId,
    body: ElementId,
    parents: AHashMap<ElementId, Option<ElementId>>,
    focused: Option<ElementId>,
    layout_flushes: u64,
    /// Active focus traps as `(token, scope)`, most recent last.
    traps: Vec<(u64, ElementId)>,
    next_trap: u64,
}

/// Shared handle to a document.
///
/// Cloning a `Document` yields another handle to the same tree.
#[derive(Clone)]
pub struct Document {
    inner: Rc<RefCell<DocumentInner>>,
    focus_in: ListenerSet<FocusIn>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Document")
            .field("elements", &inner.parents.len())
            .field("focused", &inner.focused)
            .field("layout_flushes", &inner.layout_flushes)
            .field("focus_listeners", &self.focus_in.live_count())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document containing a root element and a body below it.
    pub fn new() -> Self {
        let root = ElementId(0);
        let body = ElementId(1);
        let mut parents = AHashMap::new();
        parents.insert(root, None);
        parents.insert(body, Some(root));
        Self {
            inner: Rc::new(RefCell::new(DocumentInner {
                next_id: 2,
                root,
                body,
                parents,
                focused: None,
                layout_flushes: 0,
                traps: Vec::new(),
                next_trap: 1,
            })),
            focus_in: ListenerSet::new(),
        }
    }

    /// The document's root element.
    pub fn root(&self) -> ElementId {
        self.inner.borrow().root
    }

    /// The body element; the default scroll-lock scope.
    pub fn body(&self) -> ElementId {
        self.inner.borrow().body
    }

    /// Append a new element under `parent`.
    pub fn create_element(&self, parent: ElementId) -> Result<ElementId, DomError> {
        let mut inner = self.inner.borrow_mut();
        if !inner.parents.contains_key(&parent) {
            return Err(DomError::UnknownElement(parent));
        }
        let id = ElementId(inner.next_id);
        inner.next_id += 1;
        inner.parents.insert(id, Some(parent));
        Ok(id)
    }

    /// Whether `id` belongs to this document.
    pub fn exists(&self, id: ElementId) -> bool {
        self.inner.borrow().parents.contains_key(&id)
    }

    /// Parent of `id`, if any.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.inner.borrow().parents.get(&id).copied().flatten()
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: ElementId, node: ElementId) -> bool {
        let inner = self.inner.borrow();
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = inner.parents.get(&current).copied().flatten();
        }
        false
    }

    /// Currently focused element.
    pub fn focused(&self) -> Option<ElementId> {
        self.inner.borrow().focused
    }

    /// Move focus to `target` and emit the focus-in signal.
    ///
    /// Listeners run after focus has been updated and may move focus again.
    pub fn focus(&self, target: ElementId) -> Result<(), DomError> {
        {
            let mut inner = self.inner.borrow_mut();
            if !inner.parents.contains_key(&target) {
                return Err(DomError::UnknownElement(target));
            }
            inner.focused = Some(target);
        }
        self.focus_in.notify(&mut FocusIn { target });
        Ok(())
    }

    /// Clear focus without emitting a signal.
    pub fn blur(&self) {
        self.inner.borrow_mut().focused = None;
    }

    /// Subscribe to the document-wide focus-in signal.
    pub fn on_focus_in(&self, callback: impl Fn(&FocusIn) + 'static) -> Subscription {
        self.focus_in.subscribe(move |event| callback(event))
    }

    /// Number of live focus-in subscriptions.
    pub fn focus_listener_count(&self) -> usize {
        self.focus_in.live_count()
    }

    /// Force a synchronous layout flush.
    pub fn force_layout(&self) {
        self.inner.borrow_mut().layout_flushes += 1;
    }

    /// How many times layout was flushed.
    pub fn layout_flushes(&self) -> u64 {
        self.inner.borrow().layout_flushes
    }

    /// Number of active focus traps.
    pub fn trap_depth(&self) -> usize {
        self.inner.borrow().traps.len()
    }

    /// Scope of the innermost active focus trap.
    pub fn top_trap_scope(&self) -> Option<ElementId> {
        self.inner.borrow().traps.last().map(|(_, scope)| *scope)
    }

    pub(crate) fn push_trap(&self, scope: ElementId) -> u64 {
        let mut inner = self.inner.borrow_mut();
        let token = inner.next_trap;
        inner.next_trap += 1;
        inner.traps.push((token, scope));
        token
    }

    pub(crate) fn remove_trap(&self, token: u64) {
        self.inner.borrow_mut().traps.retain(|(t, _)| *t != token);
    }

    pub(crate) fn is_top_trap(&self, token: u64) -> bool {
        self.inner
            .borrow()
            .traps
            .last()
            .is_some_and(|(t, _)| *t == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn body_sits_under_root() {
        let doc = Document::new();
        assert_eq!(doc.parent(doc.body()), Some(doc.root()));
        assert!(doc.contains(doc.root(), doc.body()));
        assert!(!doc.contains(doc.body(), doc.root()));
    }

    #[test]
    fn contains_walks_ancestors() {
        let doc = Document::new();
        let host = doc.create_element(doc.body()).unwrap();
        let child = doc.create_element(host).unwrap();
        let grandchild = doc.create_element(child).unwrap();
        let sibling = doc.create_element(doc.body()).unwrap();

        assert!(doc.contains(host, host));
        assert!(doc.contains(host, grandchild));
        assert!(!doc.contains(host, sibling));
    }

    #[test]
    fn create_under_unknown_parent_fails() {
        let doc = Document::new();
        let err = doc.create_element(ElementId(999)).unwrap_err();
        assert_eq!(err, DomError::UnknownElement(ElementId(999)));
        assert_eq!(err.to_string(), "unknown element #999");
    }

    #[test]
    fn focus_unknown_keeps_previous_focus() {
        let doc = Document::new();
        let el = doc.create_element(doc.body()).unwrap();
        doc.focus(el).unwrap();
        assert!(doc.focus(ElementId(42)).is_err());
        assert_eq!(doc.focused(), Some(el));
    }

    #[test]
    fn focus_in_listener_sees_target() {
        let doc = Document::new();
        let el = doc.create_element(doc.body()).unwrap();
        let seen = Rc::new(Cell::new(None));
        let s = Rc::clone(&seen);
        let _sub = doc.on_focus_in(move |event| s.set(Some(event.target)));

        doc.focus(el).unwrap();
        assert_eq!(seen.get(), Some(el));
        assert_eq!(doc.focus_listener_count(), 1);
    }

    #[test]
    fn listener_can_redirect_focus() {
        let doc = Document::new();
        let trap = doc.create_element(doc.body()).unwrap();
        let outside = doc.create_element(doc.body()).unwrap();
        let handle = doc.clone();
        let _sub = doc.on_focus_in(move |event| {
            if event.target != trap {
                let _ = handle.focus(trap);
            }
        });

        doc.focus(outside).unwrap();
        assert_eq!(doc.focused(), Some(trap));
    }

    #[test]
    fn force_layout_counts_flushes() {
        let doc = Document::new();
        doc.force_layout();
        doc.force_layout();
        assert_eq!(doc.layout_flushes(), 2);
    }
}
