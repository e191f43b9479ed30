#![forbid(unsafe_code)]

//! Render host seam for toasts.
//!
//! Hosts group toasts by [`ToastView::position`] into one stack per anchor.

use crate::config::ToastPosition;
use crate::toast_ref::ToastId;

/// Snapshot of what a host needs to render one toast.
#[derive(Debug, Clone, PartialEq)]
pub struct ToastView {
    pub id: ToastId,
    pub position: ToastPosition,
    pub visible: bool,
    pub animate: bool,
    /// Drag offset in pixels.
    pub translate_y: f64,
    /// Sliding off toward the anchored edge.
    pub leaving: bool,
    pub wrapper_classes: String,
}

pub trait ToastHost {
    /// Append a new toast to its position's stack.
    fn show(&mut self, view: &ToastView);

    /// Visibility or drag offset changed.
    fn update(&mut self, _view: &ToastView) {}

    /// Remove the toast.
    fn hide(&mut self, id: ToastId);
}
