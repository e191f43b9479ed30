#![forbid(unsafe_code)]

//! Handle returned to the caller and handed to the toast content.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use blocks_core::Emitter;
use blocks_core::id::next_id;

/// Process-unique toast identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

impl ToastId {
    pub(crate) fn next() -> Self {
        Self(next_id())
    }

    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast#{}", self.0)
    }
}

type CloseHook = Box<dyn FnOnce()>;

struct RefInner<R> {
    id: ToastId,
    after_closed: Emitter<Option<R>>,
    closed: Cell<bool>,
    on_close: RefCell<Option<CloseHook>>,
}

/// One toast's close channel.
///
/// [`ToastRef::close`] emits the result once on [`ToastRef::after_closed`]
/// and completes the stream. Later calls are ignored.
pub struct ToastRef<R: 'static> {
    inner: Rc<RefInner<R>>,
}

impl<R: 'static> Clone for ToastRef<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<R: 'static> PartialEq for ToastRef<R> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<R: 'static> Eq for ToastRef<R> {}

impl<R: 'static> fmt::Debug for ToastRef<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastRef")
            .field("id", &self.inner.id)
            .field("closed", &self.inner.closed.get())
            .finish()
    }
}

impl<R: 'static> Default for ToastRef<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: 'static> ToastRef<R> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefInner {
                id: ToastId::next(),
                after_closed: Emitter::new(),
                closed: Cell::new(false),
                on_close: RefCell::new(None),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> ToastId {
        self.inner.id
    }

    /// Emits the close result once, then completes.
    #[must_use]
    pub fn after_closed(&self) -> Emitter<Option<R>> {
        self.inner.after_closed.clone()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.get()
    }

    /// Close with an optional result. Only the first call has an effect.
    pub fn close(&self, result: Option<R>) {
        if self.inner.closed.replace(true) {
            return;
        }
        self.inner.after_closed.emit(&result);
        self.inner.after_closed.complete();
        let hook = self.inner.on_close.borrow_mut().take();
        if let Some(hook) = hook {
            hook();
        }
    }

    /// Run `hook` after the result has been delivered.
    pub(crate) fn set_on_close(&self, hook: impl FnOnce() + 'static) {
        *self.inner.on_close.borrow_mut() = Some(Box::new(hook));
    }
}
