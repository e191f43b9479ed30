#![forbid(unsafe_code)]

//! Handle to one modal instance.
//!
//! A [`ModalRef`] is what `ModalService::open` returns and what the content
//! component receives in `on_modal_init`. It exposes the lifecycle state,
//! the close entry points and the single-shot `after_closed` stream.
//!
//! # Lifecycle
//!
//! ```text
//!  Opening --(mounted + registered)--> Open --(close approved)--> Closing
//!                                                                     |
//!                                         (close delay elapsed, teardown)
//!                                                                     v
//!                                                                  Closed
//! ```
//!
//! Teardown runs, in order: the `after_close` hook, container destroy, the
//! `Closed` transition, registry removal, then `after_closed` emits the
//! result once and completes.
//!
//! # Invariants
//!
//! 1. State only moves one step forward at a time.
//! 2. `after_closed` emits at most once per instance.
//! 3. A closed instance is never reopened.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use blocks_core::{Emitter, Observable, PointerEvent, Subscription};
use tracing::{debug, trace};

use crate::component::ModalComponent;
use crate::config::{AfterCloseHook, ResolvedConfig};
use crate::container::ModalContainer;
use crate::host::ModalView;
use crate::registry::{ErasedModal, ModalKey};
use crate::service::WeakModalService;
use crate::sheet::SheetOutcome;
use crate::template::{Template, TemplateTarget};
use crate::types::{CloseMode, CloseResult, ModalLayout, ModalState};

struct PendingTeardown<R> {
    result: CloseResult<R>,
    remaining: Duration,
}

pub(crate) struct RefInner<C: ModalComponent> {
    key: ModalKey,
    state: Observable<ModalState>,
    after_closed: Emitter<CloseResult<C::Output>>,
    container: ModalContainer<C>,
    teardown: RefCell<Option<PendingTeardown<C::Output>>>,
    close_delay: Duration,
    after_close: Option<AfterCloseHook>,
    service: WeakModalService,
}

/// Shared handle to an open (or closing) modal.
pub struct ModalRef<C: ModalComponent> {
    inner: Rc<RefInner<C>>,
}

impl<C: ModalComponent> Clone for ModalRef<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C: ModalComponent> PartialEq for ModalRef<C> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<C: ModalComponent> Eq for ModalRef<C> {}

impl<C: ModalComponent> fmt::Debug for ModalRef<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalRef")
            .field("key", &self.inner.key)
            .field("component", &std::any::type_name::<C>())
            .field("state", &self.inner.state.get())
            .finish()
    }
}

impl<C: ModalComponent> ModalRef<C> {
    pub(crate) fn new(container: ModalContainer<C>, service: WeakModalService) -> Self {
        let config = container.config();
        let inner = Rc::new(RefInner {
            key: container.key(),
            state: Observable::new(ModalState::Opening),
            after_closed: Emitter::new(),
            container: container.clone(),
            teardown: RefCell::new(None),
            close_delay: config.close_delay,
            after_close: config.after_close.clone(),
            service,
        });
        let weak = Rc::downgrade(&inner);
        container.set_on_close(Box::new(move |result| {
            if let Some(inner) = weak.upgrade() {
                inner.handle_close(result);
            }
        }));
        Self { inner }
    }

    pub(crate) fn erased(&self) -> Rc<dyn ErasedModal> {
        let inner: Rc<dyn ErasedModal> = self.inner.clone();
        inner
    }

    pub(crate) fn mark_open(&self) -> bool {
        self.inner.advance_state(ModalState::Open)
    }

    #[must_use]
    pub fn key(&self) -> ModalKey {
        self.inner.key
    }

    /// Resolved id (user supplied or generated).
    #[must_use]
    pub fn id(&self) -> String {
        self.inner.container.config().id.clone()
    }

    #[must_use]
    pub fn state(&self) -> ModalState {
        self.inner.state.get()
    }

    /// Observe state changes. The current state is delivered immediately.
    pub fn on_state_change(&self, f: impl Fn(ModalState) + 'static) -> Subscription {
        self.inner.state.subscribe_current(move |s| f(*s))
    }

    /// Emits the close result once, after teardown, then completes.
    #[must_use]
    pub fn after_closed(&self) -> Emitter<CloseResult<C::Output>> {
        self.inner.after_closed.clone()
    }

    /// Emits on every backdrop click while open.
    #[must_use]
    pub fn backdrop_click(&self) -> Emitter<()> {
        self.inner.container.backdrop_click()
    }

    /// Close with `mode`, running guards.
    pub fn close(&self, mode: CloseMode, data: Option<C::Output>) {
        self.close_with(mode, data, false);
    }

    pub fn confirm(&self, data: C::Output) {
        self.close_with(CloseMode::Confirm, Some(data), false);
    }

    pub fn cancel(&self) {
        self.close_with(CloseMode::Cancel, None, false);
    }

    /// Close immediately, bypassing guards and `disable_close`.
    pub fn force_close(&self) {
        self.close_with(CloseMode::Cancel, None, true);
    }

    pub fn close_with(&self, mode: CloseMode, data: Option<C::Output>, force: bool) {
        self.inner.container.close(mode, data, false, force);
    }

    /// Forward a backdrop click from the host.
    pub fn handle_backdrop_click(&self) {
        self.inner.container.handle_backdrop_click();
    }

    /// Forward a pointer sample on the bottom sheet from the host.
    pub fn handle_sheet_pointer(&self, event: PointerEvent) -> SheetOutcome {
        self.inner.container.handle_sheet_pointer(event)
    }

    /// Run `f` against the content. `None` after teardown.
    pub fn with_content<R>(&self, f: impl FnOnce(&mut C) -> R) -> Option<R> {
        self.inner.container.with_content(f)
    }

    #[must_use]
    pub fn container(&self) -> &ModalContainer<C> {
        &self.inner.container
    }

    #[must_use]
    pub fn config(&self) -> Rc<ResolvedConfig> {
        self.inner.container.config()
    }

    #[must_use]
    pub fn effective_layout(&self) -> ModalLayout {
        self.inner.container.effective_layout()
    }

    #[must_use]
    pub fn is_bottom_sheet_active(&self) -> bool {
        self.inner.container.is_bottom_sheet_active()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.container.is_open()
    }

    #[must_use]
    pub fn is_guard_pending(&self) -> bool {
        self.inner.container.is_guard_pending()
    }

    #[must_use]
    pub fn view(&self) -> ModalView {
        self.inner.container.view()
    }
}

impl<C: ModalComponent> TemplateTarget for ModalRef<C> {
    fn set_header_template(&self, template: Template) {
        self.inner.container.set_header(template);
    }

    fn set_footer_template(&self, template: Template) {
        self.inner.container.set_footer(template);
    }
}

impl<C: ModalComponent> RefInner<C> {
    fn advance_state(&self, next: ModalState) -> bool {
        let current = self.state.get();
        if !current.can_advance_to(next) {
            trace!(modal = %self.key, ?current, ?next, "state transition rejected");
            return false;
        }
        self.state.set(next)
    }

    fn handle_close(self: &Rc<Self>, result: CloseResult<C::Output>) {
        if !self.advance_state(ModalState::Closing) {
            return;
        }
        *self.teardown.borrow_mut() = Some(PendingTeardown {
            result,
            remaining: self.close_delay,
        });
        if self.close_delay.is_zero() {
            self.run_teardown();
            return;
        }
        match self.service.upgrade() {
            Some(service) => {
                let handle: Rc<dyn ErasedModal> = self.clone();
                service.schedule_teardown(handle);
            }
            None => self.run_teardown(),
        }
    }

    fn run_teardown(&self) {
        let Some(pending) = self.teardown.borrow_mut().take() else {
            return;
        };
        if let Some(hook) = &self.after_close {
            hook();
        }
        self.container.destroy();
        self.advance_state(ModalState::Closed);
        if let Some(service) = self.service.upgrade() {
            service.unregister(self.key);
        }
        debug!(modal = %self.key, mode = ?pending.result.mode, "modal torn down");
        self.after_closed.emit(&pending.result);
        self.after_closed.complete();
    }
}

impl<C: ModalComponent> ErasedModal for RefInner<C> {
    fn key(&self) -> ModalKey {
        self.key
    }

    fn disable_close_on_navigation(&self) -> bool {
        self.container.config().disable_close_on_navigation
    }

    fn force_cancel(&self) {
        self.container.close(CloseMode::Cancel, None, false, true);
    }

    fn tick(&self, elapsed: Duration) -> bool {
        let due = {
            let mut teardown = self.teardown.borrow_mut();
            match teardown.as_mut() {
                None => return true,
                Some(pending) if pending.remaining <= elapsed => true,
                Some(pending) => {
                    pending.remaining -= elapsed;
                    false
                }
            }
        };
        if due {
            self.run_teardown();
        }
        due
    }
}
