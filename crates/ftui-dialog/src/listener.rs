#![forbid(unsafe_code)]

//! Weakly-held listener lists with RAII unsubscription.
//!
//! A [`ListenerSet<A>`] stores callbacks as `Weak` references; the strong
//! reference lives in the [`Subscription`] handed back to the caller.
//! Dropping the subscription detaches the callback. Dead entries are pruned
//! lazily during [`ListenerSet::notify`].
//!
//! # Invariants
//!
//! 1. Listeners are invoked in registration order.
//! 2. No `RefCell` borrow is held while a callback runs, so callbacks may
//!    subscribe, unsubscribe, or trigger nested notifications.
//! 3. A callback whose subscription was dropped before `notify` starts is
//!    never invoked.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type CallbackRc<A> = Rc<dyn Fn(&mut A)>;
type CallbackWeak<A> = Weak<dyn Fn(&mut A)>;

/// Shared list of weakly-held callbacks receiving `&mut A`.
pub(crate) struct ListenerSet<A> {
    inner: Rc<RefCell<Vec<CallbackWeak<A>>>>,
}

impl<A> Clone for ListenerSet<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A> Default for ListenerSet<A> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<A: 'static> fmt::Debug for ListenerSet<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("live", &self.live_count())
            .finish()
    }
}

impl<A: 'static> ListenerSet<A> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register a callback. It stays registered while the returned
    /// [`Subscription`] is alive.
    pub(crate) fn subscribe(&self, callback: impl Fn(&mut A) + 'static) -> Subscription {
        let strong: CallbackRc<A> = Rc::new(callback);
        self.inner.borrow_mut().push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Invoke every live callback with `arg`, pruning dead ones.
    pub(crate) fn notify(&self, arg: &mut A) {
        let callbacks: Vec<CallbackRc<A>> = {
            let mut inner = self.inner.borrow_mut();
            inner.retain(|w| w.strong_count() > 0);
            inner.iter().filter_map(Weak::upgrade).collect()
        };
        for callback in callbacks {
            callback(arg);
        }
    }

    /// Number of callbacks whose subscription is still alive.
    pub(crate) fn live_count(&self) -> usize {
        self.inner
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}

/// RAII guard for a registered callback.
///
/// Dropping the subscription detaches the callback.
#[must_use = "dropping a Subscription immediately detaches its callback"]
pub struct Subscription {
    _guard: Box<dyn Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
