#![forbid(unsafe_code)]

//! Toast queue with a concurrency limit.
//!
//! [`ToastrService::queue_toast`] resolves the call's config, pushes a
//! builder onto a FIFO queue and drains the queue while fewer than
//! `max_opened` toasts are active. Closing a toast's [`ToastRef`] finalizes
//! it: the host hides it, it leaves the active set, and the queue drains
//! again.
//!
//! # Invariants
//!
//! 1. `active_count() <= max_opened` after every public call, unless
//!    `max_opened` was lowered while more toasts were showing.
//! 2. Queued toasts are shown in the order they were queued.
//! 3. No borrow of service state is held while content or host code runs.
//!
//! # Failure Modes
//!
//! - A host that queues or closes toasts from inside [`ToastHost`] methods
//!   panics on the second borrow of its own `RefCell`.
//! - `max_opened = 0` leaves every toast queued; `update_settings` warns.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use blocks_core::PointerEvent;
use tracing::{debug, warn};

use crate::component::ToastComponent;
use crate::config::{ResolvedToastConfig, ToastConfig, ToastrSettings, ToastrSettingsPatch};
use crate::error::ToastrError;
use crate::host::{ToastHost, ToastView};
use crate::toast_core::{ToastCore, ToastGesture, ToastTick};
use crate::toast_ref::{ToastId, ToastRef};

type Builder = Box<dyn FnOnce(&ToastrService)>;
type Closer = Rc<dyn Fn()>;

trait ErasedContent {
    fn destroy(&mut self);
}

impl<C: ToastComponent> ErasedContent for C {
    fn destroy(&mut self) {
        self.on_destroy();
    }
}

struct ActiveToast {
    id: ToastId,
    core: Rc<RefCell<ToastCore>>,
    content: Box<dyn ErasedContent>,
    close: Closer,
}

#[derive(Default)]
struct ServiceInner {
    settings: RefCell<ToastrSettings>,
    queue: RefCell<VecDeque<Builder>>,
    active: RefCell<Vec<ActiveToast>>,
    host: RefCell<Option<Rc<RefCell<dyn ToastHost>>>>,
}

/// Toast factory and queue owner. Clones share the same queue.
#[derive(Clone, Default)]
pub struct ToastrService {
    inner: Rc<ServiceInner>,
}

impl fmt::Debug for ToastrService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastrService")
            .field("active", &self.active_count())
            .field("queued", &self.queued_count())
            .field("settings", &*self.inner.settings.borrow())
            .finish()
    }
}

impl ToastrService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_settings(settings: ToastrSettings) -> Self {
        let service = Self::default();
        *service.inner.settings.borrow_mut() = settings;
        service
    }

    /// Without a host, toasts still queue, time out and close.
    pub fn register_host(&self, host: Rc<RefCell<dyn ToastHost>>) {
        *self.inner.host.borrow_mut() = Some(host);
    }

    #[must_use]
    pub fn settings(&self) -> ToastrSettings {
        self.inner.settings.borrow().clone()
    }

    /// Update process-wide defaults. Toasts already queued keep the options
    /// they were queued with; a larger `max_opened` takes effect at once.
    pub fn update_settings(&self, patch: ToastrSettingsPatch) {
        let problems = {
            let mut settings = self.inner.settings.borrow_mut();
            settings.update(patch);
            settings.validate()
        };
        for problem in problems {
            warn!(%problem, "toastr settings");
        }
        self.process_queue();
    }

    /// Queue a toast of content type `C` and show it as soon as a slot is
    /// free.
    pub fn queue_toast<C: ToastComponent>(
        &self,
        config: ToastConfig<C::Data>,
    ) -> ToastRef<C::Output> {
        let (resolved, data) = config.resolve(&self.inner.settings.borrow());
        let toast_ref = ToastRef::new();
        let handle = toast_ref.clone();
        self.inner
            .queue
            .borrow_mut()
            .push_back(Box::new(move |service: &ToastrService| {
                service.build::<C>(resolved, data, handle);
            }));
        debug!(toast = %toast_ref.id(), queued = self.queued_count(), "toast queued");
        self.process_queue();
        toast_ref
    }

    #[must_use]
    pub fn active_count(&self) -> usize {
        self.inner.active.borrow().len()
    }

    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.inner.queue.borrow().len()
    }

    /// Shown toasts in the order they were shown.
    #[must_use]
    pub fn active_ids(&self) -> Vec<ToastId> {
        self.inner.active.borrow().iter().map(|t| t.id).collect()
    }

    #[must_use]
    pub fn is_active(&self, id: ToastId) -> bool {
        self.inner.active.borrow().iter().any(|t| t.id == id)
    }

    #[must_use]
    pub fn view(&self, id: ToastId) -> Option<ToastView> {
        let core = self.core_of(id)?;
        let view = view_of(id, &core.borrow());
        Some(view)
    }

    /// Move every toast's timers forward by `elapsed`.
    pub fn advance(&self, elapsed: Duration) {
        let snapshot: Vec<(ToastId, Rc<RefCell<ToastCore>>, Closer)> = self
            .inner
            .active
            .borrow()
            .iter()
            .map(|t| (t.id, Rc::clone(&t.core), Rc::clone(&t.close)))
            .collect();
        for (id, core, close) in snapshot {
            let tick = core.borrow_mut().advance(elapsed);
            self.apply(id, &core, &close, tick);
        }
    }

    /// Hide a toast and let its exit animation run, as a close button would.
    pub fn dismiss(&self, id: ToastId) -> Result<(), ToastrError> {
        let (core, close) = self.parts_of(id).ok_or(ToastrError::UnknownToast(id))?;
        let tick = core.borrow_mut().hide();
        self.apply(id, &core, &close, tick);
        Ok(())
    }

    /// Forward a pointer sample on a toast. `height` is its rendered height.
    pub fn handle_pointer(
        &self,
        id: ToastId,
        event: PointerEvent,
        height: f64,
    ) -> Result<ToastGesture, ToastrError> {
        let (core, close) = self.parts_of(id).ok_or(ToastrError::UnknownToast(id))?;
        let gesture = core.borrow_mut().handle_pointer(event, height);
        match gesture {
            ToastGesture::Idle => {}
            ToastGesture::Dragging(_) | ToastGesture::SnapBack => self.refresh(id, &core),
            ToastGesture::Dismiss => {
                let tick = core.borrow_mut().hide();
                self.apply(id, &core, &close, tick);
            }
        }
        Ok(gesture)
    }

    fn process_queue(&self) {
        loop {
            let max = self.inner.settings.borrow().max_opened;
            if self.active_count() >= max {
                break;
            }
            let next = self.inner.queue.borrow_mut().pop_front();
            let Some(build) = next else {
                break;
            };
            build(self);
        }
    }

    fn build<C: ToastComponent>(
        &self,
        config: ResolvedToastConfig,
        data: Option<C::Data>,
        toast_ref: ToastRef<C::Output>,
    ) {
        let id = toast_ref.id();
        if toast_ref.is_closed() {
            debug!(toast = %id, "toast closed while queued");
            return;
        }
        let mut content = C::create(data);
        content.on_toast_init(toast_ref.clone());
        if toast_ref.is_closed() {
            content.on_destroy();
            debug!(toast = %id, "toast closed during init");
            return;
        }

        let core = Rc::new(RefCell::new(ToastCore::new(config)));
        let closer = toast_ref.clone();
        self.inner.active.borrow_mut().push(ActiveToast {
            id,
            core: Rc::clone(&core),
            content: Box::new(content),
            close: Rc::new(move || closer.close(None)),
        });

        let weak: Weak<ServiceInner> = Rc::downgrade(&self.inner);
        toast_ref.set_on_close(move || {
            if let Some(inner) = weak.upgrade() {
                ToastrService { inner }.finalize(id);
            }
        });

        if let Some(host) = self.host() {
            let view = view_of(id, &core.borrow());
            host.borrow_mut().show(&view);
        }
        debug!(toast = %id, active = self.active_count(), "toast shown");
    }

    fn finalize(&self, id: ToastId) {
        let entry = {
            let mut active = self.inner.active.borrow_mut();
            active
                .iter()
                .position(|t| t.id == id)
                .map(|i| active.remove(i))
        };
        let Some(mut entry) = entry else {
            return;
        };
        if let Some(host) = self.host() {
            host.borrow_mut().hide(id);
        }
        entry.content.destroy();
        drop(entry);
        debug!(toast = %id, active = self.active_count(), "toast finalized");
        self.process_queue();
    }

    fn apply(&self, id: ToastId, core: &Rc<RefCell<ToastCore>>, close: &Closer, tick: ToastTick) {
        match tick {
            ToastTick::Idle => {}
            ToastTick::Hidden => self.refresh(id, core),
            ToastTick::Close => close(),
        }
    }

    fn refresh(&self, id: ToastId, core: &Rc<RefCell<ToastCore>>) {
        if let Some(host) = self.host() {
            let view = view_of(id, &core.borrow());
            host.borrow_mut().update(&view);
        }
    }

    fn host(&self) -> Option<Rc<RefCell<dyn ToastHost>>> {
        self.inner.host.borrow().clone()
    }

    fn core_of(&self, id: ToastId) -> Option<Rc<RefCell<ToastCore>>> {
        self.parts_of(id).map(|(core, _)| core)
    }

    fn parts_of(&self, id: ToastId) -> Option<(Rc<RefCell<ToastCore>>, Closer)> {
        self.inner
            .active
            .borrow()
            .iter()
            .find(|t| t.id == id)
            .map(|t| (Rc::clone(&t.core), Rc::clone(&t.close)))
    }
}

fn view_of(id: ToastId, core: &ToastCore) -> ToastView {
    let config = core.config();
    ToastView {
        id,
        position: config.position,
        visible: core.is_visible(),
        animate: config.animate,
        translate_y: core.translate_y(),
        leaving: core.is_leaving(),
        wrapper_classes: config.wrapper_classes(),
    }
}
