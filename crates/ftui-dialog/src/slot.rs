#![forbid(unsafe_code)]

//! Content projection slots.
//!
//! A dialog projects two regions: the default slot (body) and the
//! [`FOOTER_SLOT`]. Which slots currently have content is answered by a
//! [`SlotProbe`]; the probe also signals whenever the projected content set
//! changes so derived state can be refreshed.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use crate::dom::ElementId;
use crate::listener::{ListenerSet, Subscription};

/// Name of the footer slot.
pub const FOOTER_SLOT: &str = "footer";

/// Payload of a slot-change signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotChange {
    /// Slot whose content changed. `None` is the default slot.
    pub slot: Option<String>,
}

/// Slot-presence detection utility.
pub trait SlotProbe {
    /// Whether any content is assigned to `slot` (`None` = default slot).
    fn has_slot(&self, slot: Option<&str>) -> bool;

    /// Subscribe to changes of the projected content set.
    fn on_slot_change(&self, callback: Box<dyn Fn(&SlotChange)>) -> Subscription;
}

type SlotKey = Option<String>;

/// Default [`SlotProbe`]: explicit node-to-slot assignments.
///
/// Cloning yields another handle to the same assignments.
#[derive(Clone, Default)]
pub struct SlotAssignments {
    assigned: Rc<RefCell<AHashMap<SlotKey, Vec<ElementId>>>>,
    changes: ListenerSet<SlotChange>,
}

impl fmt::Debug for SlotAssignments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotAssignments")
            .field("assigned", &self.assigned.borrow())
            .finish()
    }
}

impl SlotAssignments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Project `node` into `slot`, moving it out of any previous slot.
    pub fn assign(&self, slot: Option<&str>, node: ElementId) {
        let key: SlotKey = slot.map(str::to_owned);
        let previous = self.detach(node);
        self.assigned
            .borrow_mut()
            .entry(key.clone())
            .or_default()
            .push(node);
        if let Some(previous) = previous
            && previous != key
        {
            self.changes.notify(&mut SlotChange { slot: previous });
        }
        self.changes.notify(&mut SlotChange { slot: key });
    }

    /// Remove `node` from whichever slot holds it. Returns whether it was
    /// projected at all.
    pub fn unassign(&self, node: ElementId) -> bool {
        match self.detach(node) {
            Some(slot) => {
                self.changes.notify(&mut SlotChange { slot });
                true
            }
            None => false,
        }
    }

    /// Nodes currently projected into `slot`, in assignment order.
    pub fn assigned(&self, slot: Option<&str>) -> Vec<ElementId> {
        let key: SlotKey = slot.map(str::to_owned);
        self.assigned
            .borrow()
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }

    fn detach(&self, node: ElementId) -> Option<SlotKey> {
        let mut assigned = self.assigned.borrow_mut();
        let key = assigned
            .iter()
            .find(|(_, nodes)| nodes.contains(&node))
            .map(|(key, _)| key.clone())?;
        if let Some(nodes) = assigned.get_mut(&key) {
            nodes.retain(|n| *n != node);
            if nodes.is_empty() {
                assigned.remove(&key);
            }
        }
        Some(key)
    }
}

impl SlotProbe for SlotAssignments {
    fn has_slot(&self, slot: Option<&str>) -> bool {
        let key: SlotKey = slot.map(str::to_owned);
        self.assigned
            .borrow()
            .get(&key)
            .is_some_and(|nodes| !nodes.is_empty())
    }

    fn on_slot_change(&self, callback: Box<dyn Fn(&SlotChange)>) -> Subscription {
        self.changes.subscribe(move |change| callback(change))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use std::cell::Cell;

    #[test]
    fn empty_slots_report_absent() {
        let slots = SlotAssignments::new();
        assert!(!slots.has_slot(None));
        assert!(!slots.has_slot(Some(FOOTER_SLOT)));
    }

    #[test]
    fn assign_and_unassign_footer() {
        let doc = Document::new();
        let button = doc.create_element(doc.body()).unwrap();
        let slots = SlotAssignments::new();

        slots.assign(Some(FOOTER_SLOT), button);
        assert!(slots.has_slot(Some(FOOTER_SLOT)));
        assert!(!slots.has_slot(None));
        assert_eq!(slots.assigned(Some(FOOTER_SLOT)), vec![button]);

        assert!(slots.unassign(button));
        assert!(!slots.has_slot(Some(FOOTER_SLOT)));
        assert!(!slots.unassign(button));
    }

    #[test]
    fn reassign_moves_between_slots_and_signals_both() {
        let doc = Document::new();
        let node = doc.create_element(doc.body()).unwrap();
        let slots = SlotAssignments::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = slots.on_slot_change(Box::new(move |change: &SlotChange| {
            s.borrow_mut().push(change.slot.clone());
        }));

        slots.assign(None, node);
        slots.assign(Some(FOOTER_SLOT), node);

        assert!(!slots.has_slot(None));
        assert!(slots.has_slot(Some(FOOTER_SLOT)));
        assert_eq!(
            *seen.borrow(),
            vec![None, None, Some(FOOTER_SLOT.to_owned())]
        );
    }

    #[test]
    fn dropped_subscription_stops_signals() {
        let doc = Document::new();
        let node = doc.create_element(doc.body()).unwrap();
        let slots = SlotAssignments::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = slots.on_slot_change(Box::new(move |_: &SlotChange| h.set(h.get() + 1)));

        slots.assign(None, node);
        drop(sub);
        slots.unassign(node);
        assert_eq!(hits.get(), 1);
    }
}
