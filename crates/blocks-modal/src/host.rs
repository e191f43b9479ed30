#![forbid(unsafe_code)]

//! Render host seam.
//!
//! The engine never draws. It describes each open modal as a [`ModalView`]
//! and tells the registered [`ModalHost`] when to mount it, lay it out
//! again, refresh it, or drop it.
//!
//! # Failure Modes
//!
//! - Host methods run while the host's `RefCell` is mutably borrowed. A host
//!   that calls back into the service from inside one of them (opening or
//!   closing a modal) panics on the second borrow. Queue such work instead.

use crate::registry::ModalKey;
use crate::types::ModalLayout;

/// Snapshot of what a host needs to render one modal.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalView {
    pub key: ModalKey,
    pub id: String,
    pub z_index: u32,
    pub is_open: bool,
    pub layout: ModalLayout,
    pub is_bottom_sheet: bool,
    /// Current sheet drag offset in pixels.
    pub sheet_offset: f64,
    /// Fixed bottom-sheet height in pixels, when configured.
    pub sheet_height: Option<u32>,
    pub has_backdrop: bool,
    pub has_banner: bool,
    pub banner_text: String,
    pub show_close_button: bool,
    pub animate: bool,
    pub content_wrapper: bool,
    pub wrapper_classes: String,
    pub wrapper_styles: String,
    pub content_classes: String,
    pub content_styles: String,
    pub override_full_height: bool,
    pub header: Option<String>,
    pub footer: Option<String>,
}

/// Renders modals on behalf of the service.
pub trait ModalHost {
    /// Attach a new modal to the render root.
    fn mount(&mut self, view: &ModalView);

    /// The effective layout changed. `reattached` is true when the content
    /// view moved between side and centered containers and must be
    /// reinserted.
    fn relayout(&mut self, view: &ModalView, reattached: bool);

    /// Non-structural change (open flag, sheet offset, templates).
    fn update(&mut self, _view: &ModalView) {}

    /// Remove the modal from the render root.
    fn unmount(&mut self, key: ModalKey);
}
