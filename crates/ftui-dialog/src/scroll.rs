#![forbid(unsafe_code)]

//! Counter-based background scroll locking.
//!
//! Any number of dialogs may lock the same scope. The lock styling is applied
//! when the count for a scope goes 0 → 1 and removed when it goes 1 → 0.
//!
//! # Invariants
//!
//! - Each [`ScrollLockGuard`] performs exactly one `acquire` on creation and
//!   exactly one `release` on drop.
//! - A release on a scope with a zero count is ignored (logged at `warn`), so
//!   an unbalanced caller can never push the count below zero and unlock a
//!   scope another dialog still holds.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use tracing::{debug, warn};

use crate::dom::ElementId;

/// Shared scroll-lock utility keyed by a root scope.
pub trait ScrollLock {
    /// Increment the lock count for `scope`.
    fn acquire(&self, scope: ElementId);

    /// Decrement the lock count for `scope`.
    fn release(&self, scope: ElementId);
}

/// Default [`ScrollLock`]: per-scope counters behind a shared handle.
///
/// Cloning yields another handle to the same counters.
#[derive(Clone, Default)]
pub struct ScrollLockRegistry {
    counts: Rc<RefCell<AHashMap<ElementId, u32>>>,
}

impl fmt::Debug for ScrollLockRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLockRegistry")
            .field("locked_scopes", &self.counts.borrow().len())
            .finish()
    }
}

thread_local! {
    static SHARED_REGISTRY: ScrollLockRegistry = ScrollLockRegistry::new();
}

impl ScrollLockRegistry {
    /// A private registry. Dialogs only share counts if they share a handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the registry shared by every dialog built with a default
    /// [`DialogEnv`](crate::DialogEnv) on this thread.
    pub fn shared() -> Self {
        SHARED_REGISTRY.with(Clone::clone)
    }

    /// Current lock count for `scope`.
    pub fn count(&self, scope: ElementId) -> u32 {
        self.counts.borrow().get(&scope).copied().unwrap_or(0)
    }

    /// Whether scroll-suppressing styling is applied to `scope`.
    pub fn is_locked(&self, scope: ElementId) -> bool {
        self.count(scope) > 0
    }
}

impl ScrollLock for ScrollLockRegistry {
    fn acquire(&self, scope: ElementId) {
        let mut counts = self.counts.borrow_mut();
        let count = counts.entry(scope).or_insert(0);
        *count += 1;
        if *count == 1 {
            debug!(scope = scope.get(), "scroll lock applied");
        }
    }

    fn release(&self, scope: ElementId) {
        let mut counts = self.counts.borrow_mut();
        match counts.get_mut(&scope) {
            Some(count) if *count > 1 => *count -= 1,
            Some(_) => {
                counts.remove(&scope);
                debug!(scope = scope.get(), "scroll lock removed");
            }
            None => warn!(scope = scope.get(), "scroll lock released while not held"),
        }
    }
}

/// RAII hold on a [`ScrollLock`] scope. Releases on drop.
#[must_use = "dropping a ScrollLockGuard releases the lock immediately"]
pub struct ScrollLockGuard {
    lock: Rc<dyn ScrollLock>,
    scope: ElementId,
}

impl ScrollLockGuard {
    /// Acquire `scope` on `lock`.
    pub fn acquire(lock: Rc<dyn ScrollLock>, scope: ElementId) -> Self {
        lock.acquire(scope);
        Self { lock, scope }
    }

    /// The locked scope.
    pub fn scope(&self) -> ElementId {
        self.scope
    }
}

impl fmt::Debug for ScrollLockGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLockGuard")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.lock.release(self.scope);
    }
}
