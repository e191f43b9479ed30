#![forbid(unsafe_code)]

//! Content hosted inside a toast.

use crate::toast_ref::ToastRef;

/// A type that can be queued as toast content.
pub trait ToastComponent: Sized + 'static {
    type Data: 'static;
    type Output: Clone + 'static;

    fn create(data: Option<Self::Data>) -> Self;

    /// Called once, right after creation. Content that keeps the handle can
    /// close itself with a result.
    fn on_toast_init(&mut self, _toast: ToastRef<Self::Output>) {}

    /// Called when the toast is finalized, before the content is dropped.
    fn on_destroy(&mut self) {}
}
