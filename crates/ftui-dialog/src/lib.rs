#![forbid(unsafe_code)]

//! Headless modal dialog for FrankenTUI.
//!
//! A [`Dialog`] is an overlay panel with a cancelable open/close lifecycle.
//! While open it redirects escaping focus back to its panel and holds a
//! background scroll lock. The renderer is opaque: it reads a [`DialogView`]
//! snapshot, plays the opacity transition, and reports completion back.
//!
//! # Lifecycle
//!
//! | Step | Caller | Effect |
//! |------|--------|--------|
//! | `show()` | app | `show` pre-event, un-hide, layout flush, scroll lock, focus trap |
//! | `animation_frame()` | host loop | open flag set, opening transition starts |
//! | `transition_finished()` | renderer | `after-show`, focus moves to panel |
//! | `hide()` | app / Escape / overlay | `hide` pre-event, open flag cleared, lock + trap released |
//! | `transition_finished()` | renderer | container re-hidden, `after-hide` |
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use ftui_dialog::{
//!     Dialog, DialogConfig, DialogEnv, DialogPart, Document, ScrollLockRegistry,
//!     TransitionProperty,
//! };
//!
//! let document = Document::new();
//! let locks = ScrollLockRegistry::new();
//! let env = DialogEnv::new(document.clone()).with_scroll_lock(Rc::new(locks.clone()));
//!
//! let mut dialog = Dialog::new(&env, document.body(), DialogConfig::new().label("Settings"))?;
//! dialog.mount();
//!
//! assert!(!dialog.show().is_canceled());
//! dialog.animation_frame();
//! dialog.transition_finished(DialogPart::Panel, TransitionProperty::Opacity);
//!
//! assert!(dialog.is_open());
//! assert!(locks.is_locked(document.body()));
//! # Ok::<(), ftui_dialog::DomError>(())
//! ```

pub mod config;
pub mod dialog;
pub mod dom;
pub mod event;
pub mod focus;
pub mod id;
pub mod input;
mod listener;
pub mod scroll;
pub mod slot;
pub mod view;

pub use config::{DEFAULT_TRANSITION_TIMEOUT, DialogConfig};
pub use dialog::{
    Dialog, DialogAction, DialogEnv, DialogPhase, HideTrigger, LifecycleOutcome,
};
pub use dom::{Document, DomError, ElementId, FocusIn};
pub use event::{DialogEvent, DialogEventKind};
pub use focus::FocusTrap;
pub use id::{DialogId, IdAllocator};
pub use input::{Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent};
pub use listener::Subscription;
pub use scroll::{ScrollLock, ScrollLockGuard, ScrollLockRegistry};
pub use slot::{FOOTER_SLOT, SlotAssignments, SlotChange, SlotProbe};
pub use view::{
    DialogClasses, DialogPart, DialogView, HeaderView, PanelAria, TITLE_PLACEHOLDER,
    TransitionProperty,
};
