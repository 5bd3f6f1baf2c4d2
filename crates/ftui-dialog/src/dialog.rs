#![forbid(unsafe_code)]

//! The dialog state owner.
//!
//! A [`Dialog`] drives a cancelable show/hide lifecycle and coordinates its
//! collaborators:
//!
//! - **Visibility**: [`Dialog::show`], [`Dialog::hide`] and the explicit
//!   state setter [`Dialog::set_open`]. Pre-events (`show`, `hide`) are
//!   emitted and checked for cancellation before anything is mutated.
//! - **Transitions**: the renderer reports the end of the panel's opacity
//!   transition through [`Dialog::transition_finished`]. That call (or the
//!   [`Dialog::tick`] fallback) is what finalizes a phase and emits
//!   `after-show` / `after-hide`.
//! - **Focus**: while open, a [`FocusTrap`] pulls focus that lands outside
//!   the host back onto the panel.
//! - **Scroll lock**: a [`ScrollLockGuard`] is held while open.
//! - **Slots**: `has_footer` tracks the footer slot through the
//!   [`SlotProbe`] change signal.
//!
//! # Phases
//!
//! ```text
//!            show()            animation_frame()        transition_finished()
//!  Closed ───────────▶ Opening ─────────────────▶ Opening ─────────────────▶ Open
//!    ▲    (unhidden,            (is_open = true,                               │
//!    │     frame pending)        in flight)                                    │ hide()
//!    │                                                                         ▼
//!    └──────────────────────────── transition_finished() ◀──────────────── Closing
//!                                  (re-hidden)
//! ```
//!
//! # Invariants
//!
//! 1. At most one scroll lock and one focus-in subscription per dialog;
//!    every acquisition is released exactly once (hide, unmount, or drop).
//! 2. Terminal events fire exactly once per cycle: a completion signal is
//!    accepted only while a transition is in flight.
//! 3. The animation-frame flip writes the open flag directly and never
//!    re-enters [`Dialog::set_open`].
//!
//! # Failure Modes
//!
//! - A canceled pre-event returns [`LifecycleOutcome::Canceled`]; nothing
//!   changes.
//! - A completion signal for another part or property is ignored.
//! - If no completion signal ever arrives and `transition_timeout` is
//!   `None`, the dialog stays in its transitional phase.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, debug_span, trace, warn};
use web_time::Instant;

use crate::config::DialogConfig;
use crate::dom::{Document, DomError, ElementId};
use crate::event::{DialogEvent, DialogEventKind, EventEmitter};
use crate::focus::FocusTrap;
use crate::id::{DialogId, IdAllocator};
use crate::input::Event;
use crate::listener::Subscription;
use crate::scroll::{ScrollLock, ScrollLockGuard, ScrollLockRegistry};
use crate::slot::{FOOTER_SLOT, SlotAssignments, SlotChange, SlotProbe};
use crate::view::{DialogPart, DialogView, TransitionProperty};

/// Result of a lifecycle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum LifecycleOutcome {
    /// The pre-event was not canceled; side effects were applied.
    Proceeded,
    /// A listener canceled the pre-event; nothing changed.
    Canceled,
}

impl LifecycleOutcome {
    pub fn is_canceled(self) -> bool {
        matches!(self, Self::Canceled)
    }
}

/// Visual phase of the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogPhase {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl DialogPhase {
    /// Whether the container is laid out.
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn is_animating(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }
}

/// What triggered a hide from [`Dialog::handle_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HideTrigger {
    EscapePressed,
    OverlayClicked,
    CloseButton,
}

/// Action taken by [`Dialog::handle_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    /// `hide()` was requested.
    Hide {
        trigger: HideTrigger,
        outcome: LifecycleOutcome,
    },
    /// The overlay was clicked but `overlay-dismiss` was canceled.
    OverlayDismissCanceled,
}

/// Collaborators a dialog is wired to.
#[derive(Clone)]
pub struct DialogEnv {
    pub document: Document,
    pub scroll_lock: Rc<dyn ScrollLock>,
    /// Scope passed to the scroll lock. Defaults to the document body.
    pub scroll_scope: ElementId,
    pub slots: Rc<dyn SlotProbe>,
    pub ids: IdAllocator,
}

impl fmt::Debug for DialogEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogEnv")
            .field("document", &self.document)
            .field("scroll_scope", &self.scroll_scope)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

impl DialogEnv {
    /// Environment with the thread's shared scroll-lock registry, empty slots
    /// and the process-wide id allocator.
    pub fn new(document: Document) -> Self {
        let scroll_scope = document.body();
        Self {
            document,
            scroll_lock: Rc::new(ScrollLockRegistry::shared()),
            scroll_scope,
            slots: Rc::new(SlotAssignments::new()),
            ids: IdAllocator::global(),
        }
    }

    pub fn with_scroll_lock(mut self, lock: Rc<dyn ScrollLock>) -> Self {
        self.scroll_lock = lock;
        self
    }

    pub fn with_scroll_scope(mut self, scope: ElementId) -> Self {
        self.scroll_scope = scope;
        self
    }

    pub fn with_slots(mut self, slots: Rc<dyn SlotProbe>) -> Self {
        self.slots = slots;
        self
    }

    pub fn with_ids(mut self, ids: IdAllocator) -> Self {
        self.ids = ids;
        self
    }
}

/// Modal dialog state machine.
pub struct Dialog {
    id: DialogId,
    config: DialogConfig,
    document: Document,
    host: ElementId,
    parts: [ElementId; DialogPart::ALL.len()],
    scroll_lock: Rc<dyn ScrollLock>,
    scroll_scope: ElementId,
    slots: Rc<dyn SlotProbe>,
    events: EventEmitter,
    open: bool,
    base_hidden: bool,
    frame_pending: bool,
    /// Start of the in-flight transition, if any.
    transition_started: Option<Instant>,
    has_footer: Rc<Cell<bool>>,
    scroll_guard: Option<ScrollLockGuard>,
    focus_trap: Option<FocusTrap>,
    slot_watch: Option<Subscription>,
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("id", &self.id)
            .field("phase", &self.phase())
            .field("open", &self.open)
            .field("has_footer", &self.has_footer.get())
            .field("scroll_locked", &self.scroll_guard.is_some())
            .field("redirecting_focus", &self.focus_trap.is_some())
            .finish_non_exhaustive()
    }
}

impl Dialog {
    /// Create a closed dialog whose host element is appended under `parent`.
    ///
    /// The dialog is inert until [`Dialog::mount`] is called.
    pub fn new(env: &DialogEnv, parent: ElementId, config: DialogConfig) -> Result<Self, DomError> {
        let document = env.document.clone();
        let host = document.create_element(parent)?;
        let parts = create_parts(&document, host)?;
        let id = env.ids.next_id();
        debug!(dialog = %id, host = host.get(), "dialog created");

        Ok(Self {
            id,
            config,
            document,
            host,
            parts,
            scroll_lock: Rc::clone(&env.scroll_lock),
            scroll_scope: env.scroll_scope,
            slots: Rc::clone(&env.slots),
            events: EventEmitter::new(id),
            open: false,
            base_hidden: true,
            frame_pending: false,
            transition_started: None,
            has_footer: Rc::new(Cell::new(false)),
            scroll_guard: None,
            focus_trap: None,
            slot_watch: None,
        })
    }

    // --- Lifecycle ---

    /// Attach slot tracking and run the initial `show()` if the dialog was
    /// configured open. Returns the outcome of that initial show.
    ///
    /// Mounting an already mounted dialog does nothing.
    pub fn mount(&mut self) -> Option<LifecycleOutcome> {
        if self.slot_watch.is_some() {
            return None;
        }

        let slots = Rc::clone(&self.slots);
        let has_footer = Rc::clone(&self.has_footer);
        self.slot_watch = Some(self.slots.on_slot_change(Box::new(move |_: &SlotChange| {
            has_footer.set(slots.has_slot(Some(FOOTER_SLOT)));
        })));
        self.update_slots();
        debug!(dialog = %self.id, has_footer = self.has_footer(), "dialog mounted");

        self.config.open.then(|| self.show())
    }

    /// Release the scroll lock and every subscription.
    ///
    /// Safe to call repeatedly; also runs on drop.
    pub fn unmount(&mut self) {
        let held_lock = self.scroll_guard.take().is_some();
        let held_focus = self.focus_trap.take().is_some();
        self.slot_watch = None;
        if held_lock || held_focus {
            debug!(dialog = %self.id, held_lock, held_focus, "dialog torn down while open");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.slot_watch.is_some()
    }

    // --- Visibility ---

    /// Request the dialog to open.
    ///
    /// Emits `show`. Unless canceled: un-hides the container, flushes layout,
    /// requests an animation frame that sets the open flag, acquires the
    /// scroll lock and starts redirecting focus.
    pub fn show(&mut self) -> LifecycleOutcome {
        let _span = debug_span!("dialog_show", dialog = %self.id).entered();

        if self.events.emit(DialogEventKind::Show).default_prevented() {
            debug!("show canceled");
            return LifecycleOutcome::Canceled;
        }

        if !self.open {
            // A closing transition in flight is abandoned.
            self.transition_started = None;
        }
        self.base_hidden = false;
        self.document.force_layout();
        self.frame_pending = true;

        self.acquire_scroll_lock();
        self.start_focus_redirect();

        debug!(phase = ?self.phase(), "show accepted");
        LifecycleOutcome::Proceeded
    }

    /// Request the dialog to close.
    ///
    /// Emits `hide`. Unless canceled: clears the open flag, releases the
    /// scroll lock and stops redirecting focus.
    pub fn hide(&mut self) -> LifecycleOutcome {
        let _span = debug_span!("dialog_hide", dialog = %self.id).entered();

        if self.events.emit(DialogEventKind::Hide).default_prevented() {
            debug!("hide canceled");
            return LifecycleOutcome::Canceled;
        }

        let was_open = self.open;
        let frame_was_pending = std::mem::take(&mut self.frame_pending);
        self.open = false;

        self.scroll_guard = None;
        self.focus_trap = None;

        if was_open {
            // The open → closed flip starts (or reverses) the opacity transition.
            self.transition_started = Some(Instant::now());
        } else if frame_was_pending && !self.base_hidden {
            // Opacity never changed and no show cycle completed: re-hide
            // without a terminal event.
            self.transition_started = None;
            self.base_hidden = true;
        }

        debug!(phase = ?self.phase(), "hide accepted");
        LifecycleOutcome::Proceeded
    }

    /// Explicit state setter: `true` runs [`Dialog::show`], `false` runs
    /// [`Dialog::hide`].
    pub fn set_open(&mut self, open: bool) -> LifecycleOutcome {
        if open { self.show() } else { self.hide() }
    }

    /// Animation-frame callback from the host loop.
    ///
    /// Applies the open flag requested by [`Dialog::show`]. Returns whether a
    /// pending request was applied.
    pub fn animation_frame(&mut self) -> bool {
        if !std::mem::take(&mut self.frame_pending) {
            return false;
        }
        if !self.open {
            self.open = true;
            self.transition_started = Some(Instant::now());
            debug!(dialog = %self.id, "opening transition started");
        }
        true
    }

    // --- Transitions ---

    /// Completion signal from the renderer.
    ///
    /// Only the panel's opacity transition counts, and only while a
    /// transition is in flight. Returns whether the signal was accepted.
    pub fn transition_finished(&mut self, part: DialogPart, property: TransitionProperty) -> bool {
        if part != DialogPart::Panel || property != TransitionProperty::Opacity {
            trace!(dialog = %self.id, %part, ?property, "ignoring unrelated transition");
            return false;
        }
        if self.transition_started.is_none() {
            trace!(dialog = %self.id, "no transition in flight");
            return false;
        }
        self.finish_transition();
        true
    }

    /// Finalize a transition whose completion signal is overdue.
    ///
    /// Returns whether a transition was finalized.
    pub fn tick(&mut self, now: Instant) -> bool {
        let (Some(started), Some(timeout)) = (self.transition_started, self.config.transition_timeout)
        else {
            return false;
        };
        if now.saturating_duration_since(started) < timeout {
            return false;
        }
        warn!(dialog = %self.id, ?timeout, "transition completion overdue; finalizing");
        self.finish_transition();
        true
    }

    fn finish_transition(&mut self) {
        self.transition_started = None;
        if self.open {
            debug!(dialog = %self.id, "opened");
            self.events.emit(DialogEventKind::AfterShow);
            let panel = self.element(DialogPart::Panel);
            if let Err(err) = self.document.focus(panel) {
                warn!(dialog = %self.id, %err, "could not focus panel");
            }
        } else {
            self.base_hidden = true;
            debug!(dialog = %self.id, "closed");
            self.events.emit(DialogEventKind::AfterHide);
        }
    }

    // --- Input ---

    /// Handle input routed to the dialog.
    ///
    /// Escape and close-button clicks hide the dialog. Overlay clicks emit
    /// `overlay-dismiss` first and hide only if it was not canceled.
    ///
    /// Escape is honored only while the open flag is set. Clicks are also
    /// honored while an open request waits for its animation frame, since
    /// the overlay is already laid out; they are ignored while closing.
    pub fn handle_event(&mut self, event: &Event) -> Option<DialogAction> {
        if event.is_escape_press() {
            return self.open.then(|| self.hide_for(HideTrigger::EscapePressed));
        }

        if !self.open && !self.frame_pending {
            return None;
        }

        match event.clicked_part()? {
            DialogPart::Overlay => {
                let dismiss = self.events.emit(DialogEventKind::OverlayDismiss);
                if dismiss.default_prevented() {
                    debug!(dialog = %self.id, "overlay dismiss canceled");
                    Some(DialogAction::OverlayDismissCanceled)
                } else {
                    Some(self.hide_for(HideTrigger::OverlayClicked))
                }
            }
            DialogPart::CloseButton if !self.config.no_header => {
                Some(self.hide_for(HideTrigger::CloseButton))
            }
            _ => None,
        }
    }

    fn hide_for(&mut self, trigger: HideTrigger) -> DialogAction {
        DialogAction::Hide {
            trigger,
            outcome: self.hide(),
        }
    }

    // --- Events ---

    /// Listen for `kind`. The listener stays registered while the returned
    /// subscription is alive.
    pub fn on(
        &self,
        kind: DialogEventKind,
        callback: impl Fn(&mut DialogEvent) + 'static,
    ) -> Subscription {
        self.events.on(kind, callback)
    }

    // --- Accessors ---

    pub fn id(&self) -> DialogId {
        self.id
    }

    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    /// The open flag.
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn has_footer(&self) -> bool {
        self.has_footer.get()
    }

    /// Whether the container carries the hidden attribute.
    pub fn is_hidden(&self) -> bool {
        self.base_hidden
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    pub fn phase(&self) -> DialogPhase {
        match (self.open, self.base_hidden) {
            (false, true) => DialogPhase::Closed,
            (false, false) if self.frame_pending => DialogPhase::Opening,
            (false, false) => DialogPhase::Closing,
            (true, _) if self.transition_started.is_some() => DialogPhase::Opening,
            (true, _) => DialogPhase::Open,
        }
    }

    pub fn holds_scroll_lock(&self) -> bool {
        self.scroll_guard.is_some()
    }

    pub fn is_redirecting_focus(&self) -> bool {
        self.focus_trap.is_some()
    }

    /// The host element; focus anywhere inside it is left alone.
    pub fn host(&self) -> ElementId {
        self.host
    }

    /// Element backing `part`.
    pub fn element(&self, part: DialogPart) -> ElementId {
        self.parts[part.index()]
    }

    /// Structural snapshot for the renderer.
    pub fn view(&self) -> DialogView {
        DialogView::build(
            self.id,
            &self.config.label,
            self.config.no_header,
            self.open,
            self.base_hidden,
            self.has_footer(),
        )
    }

    // --- Internals ---

    fn update_slots(&self) {
        self.has_footer
            .set(self.slots.has_slot(Some(FOOTER_SLOT)));
    }

    fn acquire_scroll_lock(&mut self) {
        if self.scroll_guard.is_none() {
            self.scroll_guard = Some(ScrollLockGuard::acquire(
                Rc::clone(&self.scroll_lock),
                self.scroll_scope,
            ));
        }
    }

    fn start_focus_redirect(&mut self) {
        if self.focus_trap.is_none() {
            self.focus_trap = Some(FocusTrap::install(
                &self.document,
                self.host,
                self.element(DialogPart::Panel),
            ));
        }
    }
}

impl Drop for Dialog {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn create_parts(
    document: &Document,
    host: ElementId,
) -> Result<[ElementId; DialogPart::ALL.len()], DomError> {
    let base = document.create_element(host)?;
    let overlay = document.create_element(base)?;
    let panel = document.create_element(base)?;
    let header = document.create_element(panel)?;
    let title = document.create_element(header)?;
    let close_button = document.create_element(header)?;
    let body = document.create_element(panel)?;
    let footer = document.create_element(panel)?;
    Ok([
        base,
        overlay,
        panel,
        header,
        title,
        close_button,
        body,
        footer,
    ])
}
