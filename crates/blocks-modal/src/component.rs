#![forbid(unsafe_code)]

//! Content hosted inside a modal.

use crate::instance::ModalRef;

/// A type that can be opened as modal content.
///
/// The service creates the content from the call's payload, then hands it
/// the [`ModalRef`] through [`ModalComponent::on_modal_init`]. Content that
/// keeps the handle can close itself; the handle is released when the
/// content is dropped at teardown.
pub trait ModalComponent: Sized + 'static {
    /// Payload passed at open.
    type Data: 'static;
    /// Value carried by the close result.
    type Output: Clone + 'static;

    fn create(data: Option<Self::Data>) -> Self;

    /// Called once, after creation and before the modal is mounted.
    fn on_modal_init(&mut self, _modal: ModalRef<Self>) {}

    /// Called when the container is destroyed, before the content is dropped.
    fn on_destroy(&mut self) {}
}
