#![forbid(unsafe_code)]

//! Structural contract between a dialog and its renderer.
//!
//! The renderer is opaque to the dialog: it reads a [`DialogView`] snapshot,
//! draws the named [`DialogPart`]s, plays the opacity transition whenever
//! [`DialogClasses::OPEN`] flips, and reports completion back through
//! [`Dialog::transition_finished`](crate::Dialog::transition_finished).
//!
//! ```text
//! base ─┬─ overlay
//!       └─ panel ─┬─ header ─┬─ title
//!                 │          └─ close-button
//!                 ├─ body     (default slot)
//!                 └─ footer   (footer slot)
//! ```

use std::fmt;

use bitflags::bitflags;

use crate::id::DialogId;

/// Rendered in an empty title so the header row never collapses.
pub const TITLE_PLACEHOLDER: char = '\u{FEFF}';

/// Named styling hooks exposed to external stylesheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogPart {
    Base,
    Overlay,
    Panel,
    Header,
    Title,
    CloseButton,
    Body,
    Footer,
}

impl DialogPart {
    pub const ALL: [Self; 8] = [
        Self::Base,
        Self::Overlay,
        Self::Panel,
        Self::Header,
        Self::Title,
        Self::CloseButton,
        Self::Body,
        Self::Footer,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Overlay => "overlay",
            Self::Panel => "panel",
            Self::Header => "header",
            Self::Title => "title",
            Self::CloseButton => "close-button",
            Self::Body => "body",
            Self::Footer => "footer",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DialogPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Visual property whose transition the renderer reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionProperty {
    Opacity,
    Transform,
    Other,
}

bitflags! {
    /// State classes on the base part.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DialogClasses: u8 {
        /// The open flag is set; the renderer transitions to visible.
        const OPEN       = 0b01;
        /// Footer content is projected.
        const HAS_FOOTER = 0b10;
    }
}

/// Accessibility attributes of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelAria {
    pub role: &'static str,
    pub modal: bool,
    pub hidden: bool,
    /// Literal label, used when the header is disabled.
    pub label: Option<String>,
    /// Id of the rendered title, used when the header is shown.
    pub labelled_by: Option<String>,
    pub tab_index: i32,
}

/// The header region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderView {
    /// Element id of the title.
    pub title_id: String,
    /// Title text, never empty.
    pub title: String,
}

/// Snapshot of everything the renderer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    /// Whether the base part carries the hidden attribute.
    pub hidden: bool,
    pub classes: DialogClasses,
    pub aria: PanelAria,
    /// `None` when the header is disabled.
    pub header: Option<HeaderView>,
    /// Whether the footer region should render.
    pub show_footer: bool,
}

impl DialogView {
    pub(crate) fn build(
        id: DialogId,
        label: &str,
        no_header: bool,
        open: bool,
        hidden: bool,
        has_footer: bool,
    ) -> Self {
        let mut classes = DialogClasses::empty();
        classes.set(DialogClasses::OPEN, open);
        classes.set(DialogClasses::HAS_FOOTER, has_footer);

        let header = (!no_header).then(|| HeaderView {
            title_id: id.title_id(),
            title: if label.is_empty() {
                TITLE_PLACEHOLDER.to_string()
            } else {
                label.to_owned()
            },
        });

        Self {
            hidden,
            classes,
            aria: PanelAria {
                role: "dialog",
                modal: true,
                hidden: !open,
                label: no_header.then(|| label.to_owned()),
                labelled_by: header.as_ref().map(|h| h.title_id.clone()),
                tab_index: 0,
            },
            header,
            show_footer: has_footer,
        }
    }

    pub fn is_open(&self) -> bool {
        self.classes.contains(DialogClasses::OPEN)
    }

    /// Parts present in this snapshot, in document order.
    pub fn parts(&self) -> Vec<DialogPart> {
        DialogPart::ALL
            .into_iter()
            .filter(|part| match part {
                DialogPart::Header | DialogPart::Title | DialogPart::CloseButton => {
                    self.header.is_some()
                }
                DialogPart::Footer => self.show_footer,
                _ => true,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::IdAllocator;

    #[test]
    fn part_names() {
        let names: Vec<_> = DialogPart::ALL.iter().map(|p| p.to_string()).collect();
        assert_eq!(
            names,
            [
                "base",
                "overlay",
                "panel",
                "header",
                "title",
                "close-button",
                "body",
                "footer"
            ]
        );
    }

    #[test]
    fn header_labels_panel_by_title_id() {
        let id = IdAllocator::new().next_id();
        let view = DialogView::build(id, "Settings", false, true, false, false);
        assert_eq!(view.aria.labelled_by.as_deref(), Some("dialog-1-title"));
        assert_eq!(view.aria.label, None);
        assert_eq!(view.header.unwrap().title, "Settings");
        assert!(!view.aria.hidden);
    }

    #[test]
    fn empty_label_uses_placeholder() {
        let id = IdAllocator::new().next_id();
        let view = DialogView::build(id, "", false, false, true, false);
        let header = view.header.unwrap();
        assert_eq!(header.title, TITLE_PLACEHOLDER.to_string());
        assert!(!header.title.is_empty());
    }

    #[test]
    fn no_header_uses_literal_label() {
        let id = IdAllocator::new().next_id();
        let view = DialogView::build(id, "Confirm", true, false, true, false);
        assert!(view.header.is_none());
        assert_eq!(view.aria.label.as_deref(), Some("Confirm"));
        assert_eq!(view.aria.labelled_by, None);
        assert!(view.aria.hidden);
        assert!(!view.parts().contains(&DialogPart::CloseButton));
    }

    #[test]
    fn classes_and_footer_follow_state() {
        let id = IdAllocator::new().next_id();
        let view = DialogView::build(id, "x", false, true, false, true);
        assert!(view.is_open());
        assert!(view.classes.contains(DialogClasses::HAS_FOOTER));
        assert!(view.parts().contains(&DialogPart::Footer));
        assert_eq!(view.aria.role, "dialog");
        assert!(view.aria.modal);
    }
}
