#![forbid(unsafe_code)]

//! Per-instance modal controller.
//!
//! A [`ModalContainer`] owns the content component, tracks the effective
//! layout against the viewport, runs the close protocol (including close
//! guards) and wires backdrop, keyboard and bottom-sheet input.
//!
//! # Close protocol
//!
//! ```text
//! close(mode, data, from_inside, force)
//!   closed                      -> ignored
//!   force                       -> finalize (pending guard dropped)
//!   disable_close && inside     -> ignored
//!   guard in flight             -> ignored
//!   guard applies               -> can_close() once
//!                                    true  -> finalize
//!                                    false -> stay open
//!   otherwise                   -> finalize
//! ```
//!
//! Finalize flips `is_open`, freezes the sheet gesture and hands the
//! [`CloseResult`] to the close callback exactly once. Resource teardown is
//! separate ([`ModalContainer::destroy`]) and driven by the owning
//! `ModalRef` after its close delay.
//!
//! # Invariants
//!
//! 1. The close callback runs at most once.
//! 2. Layout is recomputed only while open; the resolved config never
//!    changes.
//! 3. The scroll lock is held under this container's scope exactly while the
//!    bottom-sheet layout is active and the container is not destroyed.
//! 4. No internal borrow is held while calling a guard, the host, the
//!    content or the close callback.
//!
//! # Failure Modes
//!
//! - A guard verdict that arrives after a forced close, or after teardown,
//!   is dropped.
//! - If the content is mutably borrowed when teardown runs (a close issued
//!   from inside `with_content`), `on_destroy` is skipped.

use std::any::TypeId;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use blocks_core::{
    Deferred, Emitter, Key, PointerEvent, ScrollLockCoordinator, ScrollLockOptions, Subscription,
    ViewportTracker,
};
use tracing::{debug, trace};

use crate::component::ModalComponent;
use crate::config::ResolvedConfig;
use crate::guard::{CloseVerdict, GuardContext};
use crate::host::{ModalHost, ModalView};
use crate::layout::{ContentSlot, LayoutTransition};
use crate::registry::ModalKey;
use crate::service::WeakModalService;
use crate::sheet::{SheetGesture, SheetOutcome};
use crate::template::Template;
use crate::types::{CloseMode, CloseResult, ModalLayout};

pub(crate) type CloseCallback<R> = Box<dyn FnOnce(CloseResult<R>)>;

/// Everything a container is built from.
pub(crate) struct ContainerParts {
    pub(crate) key: ModalKey,
    pub(crate) z_index: u32,
    pub(crate) config: Rc<ResolvedConfig>,
    pub(crate) viewport: ViewportTracker,
    pub(crate) scroll_lock: ScrollLockCoordinator,
    pub(crate) keyboard: Emitter<Key>,
    pub(crate) host: Rc<RefCell<dyn ModalHost>>,
    pub(crate) service: WeakModalService,
}

struct PendingGuard {
    seq: u64,
    // Keeps the verdict source alive until it settles.
    _verdict: Deferred<bool>,
}

struct ContainerState<C: ModalComponent> {
    is_open: bool,
    mounted: bool,
    destroyed: bool,
    layout: ModalLayout,
    bottom_sheet: bool,
    slot: ContentSlot,
    content: Option<Rc<RefCell<C>>>,
    sheet: SheetGesture,
    pending_guard: Option<PendingGuard>,
    guard_seq: u64,
    on_close: Option<CloseCallback<C::Output>>,
    header: Option<Template>,
    footer: Option<Template>,
    subscriptions: Vec<Subscription>,
}

struct ContainerInner<C: ModalComponent> {
    key: ModalKey,
    z_index: u32,
    config: Rc<ResolvedConfig>,
    lock_scope: String,
    viewport: ViewportTracker,
    scroll_lock: ScrollLockCoordinator,
    host: Rc<RefCell<dyn ModalHost>>,
    service: WeakModalService,
    backdrop: Emitter<()>,
    state: RefCell<ContainerState<C>>,
}

impl<C: ModalComponent> Drop for ContainerInner<C> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if state.bottom_sheet && !state.destroyed {
            self.scroll_lock.release(
                &self.lock_scope,
                self.config.enable_extreme_overflow_handling,
            );
        }
    }
}

/// Controller for one open modal.
pub struct ModalContainer<C: ModalComponent> {
    inner: Rc<ContainerInner<C>>,
}

impl<C: ModalComponent> Clone for ModalContainer<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<C: ModalComponent> fmt::Debug for ModalContainer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("ModalContainer")
            .field("key", &self.inner.key)
            .field("id", &self.inner.config.id)
            .field("is_open", &state.is_open)
            .field("layout", &state.layout)
            .field("bottom_sheet", &state.bottom_sheet)
            .field("guard_pending", &state.pending_guard.is_some())
            .finish()
    }
}

impl<C: ModalComponent> ModalContainer<C> {
    pub(crate) fn new(parts: ContainerParts) -> Self {
        let ContainerParts {
            key,
            z_index,
            config,
            viewport,
            scroll_lock,
            keyboard,
            host,
            service,
        } = parts;

        let initial = config.layout;
        let inner = Rc::new(ContainerInner {
            key,
            z_index,
            lock_scope: format!("{}#{}", config.id, key.id()),
            config: Rc::clone(&config),
            viewport: viewport.clone(),
            scroll_lock,
            host,
            service,
            backdrop: Emitter::new(),
            state: RefCell::new(ContainerState {
                is_open: false,
                mounted: false,
                destroyed: false,
                layout: initial,
                bottom_sheet: false,
                slot: ContentSlot::default(),
                content: None,
                sheet: SheetGesture::new(config.bottom_sheet.divisor()),
                pending_guard: None,
                guard_seq: 0,
                on_close: None,
                header: None,
                footer: None,
                subscriptions: Vec::new(),
            }),
        });

        let weak = Rc::downgrade(&inner);
        let on_resize = viewport.dimensions().subscribe(move |dims| {
            if let Some(inner) = weak.upgrade() {
                Self { inner }.handle_layout(dims.width);
            }
        });
        let weak = Rc::downgrade(&inner);
        let on_key = keyboard.subscribe(move |key| {
            if *key == Key::Escape
                && let Some(inner) = weak.upgrade()
            {
                Self { inner }.handle_escape();
            }
        });
        inner
            .state
            .borrow_mut()
            .subscriptions
            .extend([on_resize, on_key]);

        Self { inner }
    }

    fn from_weak(weak: &Weak<ContainerInner<C>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub(crate) fn set_content(&self, content: C) {
        self.inner.state.borrow_mut().content = Some(Rc::new(RefCell::new(content)));
    }

    pub(crate) fn set_on_close(&self, callback: CloseCallback<C::Output>) {
        self.inner.state.borrow_mut().on_close = Some(callback);
    }

    /// Compute the initial layout, attach the content and hand the view to
    /// the host.
    pub(crate) fn mount(&self) {
        let width = self.inner.viewport.width();
        let layout = self.inner.config.layout_for(width);
        let sheet = {
            let mut state = self.inner.state.borrow_mut();
            if state.mounted || state.destroyed {
                return;
            }
            state.mounted = true;
            state.is_open = true;
            state.layout = layout;
            state.slot.attach(layout.family());
            state.bottom_sheet = layout == ModalLayout::BottomSheet;
            state.bottom_sheet
        };
        if sheet {
            self.acquire_lock();
        }
        let view = self.view();
        self.inner.host.borrow_mut().mount(&view);
        debug!(modal = %self.inner.key, id = %self.inner.config.id, %layout, width, "modal mounted");
    }

    /// Re-resolve the layout for a new viewport width.
    pub(crate) fn handle_layout(&self, width: u32) {
        let (transition, reattached) = {
            let mut state = self.inner.state.borrow_mut();
            if !state.is_open || state.destroyed {
                return;
            }
            let next = self.inner.config.layout_for(width);
            let transition = LayoutTransition::between(state.layout, next);
            if !transition.is_change() {
                return;
            }
            state.layout = next;
            let reattached = state.slot.move_to(next.family());
            state.bottom_sheet = next == ModalLayout::BottomSheet;
            if transition.leave_bottom_sheet {
                state.sheet.reset();
            }
            (transition, reattached)
        };

        if transition.enter_bottom_sheet {
            self.acquire_lock();
        } else if transition.leave_bottom_sheet {
            self.release_lock();
        }

        let view = self.view();
        self.inner.host.borrow_mut().relayout(&view, reattached);
        debug!(
            modal = %self.inner.key,
            from = %transition.from,
            to = %transition.to,
            reattached,
            width,
            "modal layout changed"
        );
    }

    /// Run the close protocol.
    pub(crate) fn close(
        &self,
        mode: CloseMode,
        data: Option<C::Output>,
        from_inside: bool,
        force: bool,
    ) {
        let result = CloseResult { mode, data };
        let guard = {
            let mut state = self.inner.state.borrow_mut();
            if !state.is_open || state.destroyed {
                return;
            }
            if force {
                if state.pending_guard.take().is_some() {
                    debug!(modal = %self.inner.key, "forced close drops pending guard");
                }
                None
            } else if self.inner.config.disable_close && from_inside {
                trace!(modal = %self.inner.key, "close ignored: disable_close");
                return;
            } else if state.pending_guard.is_some() {
                trace!(modal = %self.inner.key, "close ignored: guard in flight");
                return;
            } else {
                let config = &self.inner.config;
                let skip = config.close_guard_only_on_cancel && mode == CloseMode::Confirm;
                match &config.close_guard {
                    Some(guard) if !skip => {
                        state.sheet.reset();
                        Some(Rc::clone(guard))
                    }
                    _ => None,
                }
            }
        };

        let Some(guard) = guard else {
            self.finalize(result);
            return;
        };
        let Some(service) = self.inner.service.upgrade() else {
            debug!(modal = %self.inner.key, "service gone; closing without guard");
            self.finalize(result);
            return;
        };

        let ctx = GuardContext::new(&service, self.inner.key, TypeId::of::<C>(), mode);
        match guard.can_close(&ctx) {
            CloseVerdict::Ready(true) => self.finalize(result),
            CloseVerdict::Ready(false) => {
                trace!(modal = %self.inner.key, "close vetoed by guard");
                self.refresh();
            }
            CloseVerdict::Eventual(verdict) => {
                let seq = {
                    let mut state = self.inner.state.borrow_mut();
                    state.guard_seq += 1;
                    let seq = state.guard_seq;
                    state.pending_guard = Some(PendingGuard {
                        seq,
                        _verdict: verdict.clone(),
                    });
                    seq
                };
                self.refresh();
                let weak = Rc::downgrade(&self.inner);
                verdict.then(move |allowed| {
                    if let Some(container) = Self::from_weak(&weak) {
                        container.settle_guard(seq, allowed, result);
                    }
                });
            }
        }
    }

    fn settle_guard(&self, seq: u64, allowed: bool, result: CloseResult<C::Output>) {
        {
            let mut state = self.inner.state.borrow_mut();
            match &state.pending_guard {
                Some(pending) if pending.seq == seq => state.pending_guard = None,
                _ => {
                    trace!(modal = %self.inner.key, "stale guard verdict dropped");
                    return;
                }
            }
        }
        if allowed {
            self.finalize(result);
        } else {
            trace!(modal = %self.inner.key, "close vetoed by guard");
            self.refresh();
        }
    }

    fn finalize(&self, result: CloseResult<C::Output>) {
        let callback = {
            let mut state = self.inner.state.borrow_mut();
            if !state.is_open {
                return;
            }
            state.is_open = false;
            state.sheet.finish();
            state.on_close.take()
        };
        self.refresh();
        debug!(modal = %self.inner.key, mode = ?result.mode, "modal closed");
        if let Some(callback) = callback {
            callback(result);
        }
    }

    /// Backdrop was clicked.
    pub(crate) fn handle_backdrop_click(&self) {
        if !self.is_open() {
            return;
        }
        self.inner.backdrop.emit(&());
        let config = &self.inner.config;
        if config.has_backdrop && !config.disable_close_on_backdrop_click {
            self.close(CloseMode::Cancel, None, true, false);
        }
    }

    fn handle_escape(&self) {
        if self.is_guard_pending() {
            return;
        }
        self.close(CloseMode::Cancel, None, true, false);
    }

    /// Feed a pointer sample to the bottom-sheet gesture.
    pub(crate) fn handle_sheet_pointer(&self, event: PointerEvent) -> SheetOutcome {
        let height = f64::from(self.inner.viewport.current().height);
        let outcome = {
            let mut state = self.inner.state.borrow_mut();
            if !state.is_open || !state.bottom_sheet {
                return SheetOutcome::Idle;
            }
            state.sheet.handle(event, height)
        };
        match outcome {
            SheetOutcome::Idle => {}
            SheetOutcome::Dragging(_) | SheetOutcome::SnapBack => self.refresh(),
            SheetOutcome::Dismiss => {
                self.close(CloseMode::Cancel, None, true, false);
                let snap_back = {
                    let mut state = self.inner.state.borrow_mut();
                    let still_dragged = state.is_open && state.pending_guard.is_none();
                    if still_dragged {
                        state.sheet.reset();
                    }
                    still_dragged
                };
                if snap_back {
                    self.refresh();
                }
            }
        }
        outcome
    }

    /// Release everything the container holds. Idempotent.
    pub(crate) fn destroy(&self) {
        let (content, was_sheet, subscriptions) = {
            let mut state = self.inner.state.borrow_mut();
            if state.destroyed {
                return;
            }
            state.destroyed = true;
            state.is_open = false;
            state.pending_guard = None;
            state.on_close = None;
            state.slot.detach();
            (
                state.content.take(),
                state.bottom_sheet,
                std::mem::take(&mut state.subscriptions),
            )
        };
        drop(subscriptions);

        if let Some(content) = content {
            match content.try_borrow_mut() {
                Ok(mut content) => content.on_destroy(),
                Err(_) => debug!(modal = %self.inner.key, "content busy; on_destroy skipped"),
            }
        }
        if was_sheet {
            self.release_lock();
        }
        self.inner.host.borrow_mut().unmount(self.inner.key);
        self.inner.backdrop.complete();
        trace!(modal = %self.inner.key, "container destroyed");
    }

    fn acquire_lock(&self) {
        let config = &self.inner.config;
        let options = ScrollLockOptions::default()
            .handle_touch_input(true)
            .mobile_only_touch_prevention(true)
            .handle_extreme_overflow(config.enable_extreme_overflow_handling)
            .animation_duration(config.close_delay);
        self.inner.scroll_lock.acquire(&self.inner.lock_scope, options);
    }

    fn release_lock(&self) {
        self.inner.scroll_lock.release(
            &self.inner.lock_scope,
            self.inner.config.enable_extreme_overflow_handling,
        );
    }

    fn refresh(&self) {
        let (mounted, destroyed) = {
            let state = self.inner.state.borrow();
            (state.mounted, state.destroyed)
        };
        if mounted && !destroyed {
            let view = self.view();
            self.inner.host.borrow_mut().update(&view);
        }
    }

    pub(crate) fn set_header(&self, template: Template) {
        self.inner.state.borrow_mut().header = Some(template);
        self.refresh();
    }

    pub(crate) fn set_footer(&self, template: Template) {
        self.inner.state.borrow_mut().footer = Some(template);
        self.refresh();
    }

    /// Run `f` against the content. `None` once the content is dropped.
    pub fn with_content<R>(&self, f: impl FnOnce(&mut C) -> R) -> Option<R> {
        let content = self.inner.state.borrow().content.clone()?;
        let mut content = content.borrow_mut();
        Some(f(&mut content))
    }

    pub(crate) fn backdrop_click(&self) -> Emitter<()> {
        self.inner.backdrop.clone()
    }

    #[must_use]
    pub fn key(&self) -> ModalKey {
        self.inner.key
    }

    #[must_use]
    pub fn config(&self) -> Rc<ResolvedConfig> {
        Rc::clone(&self.inner.config)
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.state.borrow().is_open
    }

    #[must_use]
    pub fn effective_layout(&self) -> ModalLayout {
        self.inner.state.borrow().layout
    }

    #[must_use]
    pub fn is_bottom_sheet_active(&self) -> bool {
        self.inner.state.borrow().bottom_sheet
    }

    #[must_use]
    pub fn is_guard_pending(&self) -> bool {
        self.inner.state.borrow().pending_guard.is_some()
    }

    /// Cross-family content moves so far.
    #[must_use]
    pub fn reattachments(&self) -> u32 {
        self.inner.state.borrow().slot.reattachments()
    }

    /// Current render description.
    #[must_use]
    pub fn view(&self) -> ModalView {
        let config = &self.inner.config;
        let state = self.inner.state.borrow();
        ModalView {
            key: self.inner.key,
            id: config.id.clone(),
            z_index: self.inner.z_index,
            is_open: state.is_open,
            layout: state.layout,
            is_bottom_sheet: state.bottom_sheet,
            sheet_offset: state.sheet.offset(),
            sheet_height: config.bottom_sheet.custom_height,
            has_backdrop: config.has_backdrop,
            has_banner: config.has_banner(state.header.is_some()),
            banner_text: config.banner_text.clone(),
            show_close_button: config.show_close_button && !config.disable_close,
            animate: config.animate,
            content_wrapper: config.content_wrapper,
            wrapper_classes: config.wrapper_classes.clone(),
            wrapper_styles: config.wrapper_styles.clone(),
            content_classes: config.content_classes.clone(),
            content_styles: config.content_styles.clone(),
            override_full_height: config.override_full_height,
            header: state.header.as_ref().map(|t| t.name().to_owned()),
            footer: state.footer.as_ref().map(|t| t.name().to_owned()),
        }
    }
}
