#![allow(dead_code)]

//! Shared fixtures: a recording host, a recording scroll surface and a few
//! content components.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use blocks_core::viewport::DEFAULT_RESIZE_DEBOUNCE;
use blocks_core::{
    BreakpointTable, Dimensions, Emitter, NavigationEnd, ScrollLockCoordinator, ScrollLockOptions,
    ScrollSurface, Subscription, ViewportTracker,
};
use blocks_modal::{
    CloseResult, ModalComponent, ModalEnvironment, ModalHost, ModalKey, ModalLayout, ModalRef,
    ModalService, ModalState, ModalView,
};

// ============================================================================
// Host
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Mount(ModalKey, ModalLayout),
    Relayout(ModalKey, ModalLayout, bool),
    Update(ModalKey),
    Unmount(ModalKey),
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    pub events: Vec<HostEvent>,
    pub last_view: Option<ModalView>,
}

impl ModalHost for RecordingHost {
    fn mount(&mut self, view: &ModalView) {
        self.events.push(HostEvent::Mount(view.key, view.layout));
        self.last_view = Some(view.clone());
    }

    fn relayout(&mut self, view: &ModalView, reattached: bool) {
        self.events
            .push(HostEvent::Relayout(view.key, view.layout, reattached));
        self.last_view = Some(view.clone());
    }

    fn update(&mut self, view: &ModalView) {
        self.events.push(HostEvent::Update(view.key));
        self.last_view = Some(view.clone());
    }

    fn unmount(&mut self, key: ModalKey) {
        self.events.push(HostEvent::Unmount(key));
    }
}

impl RecordingHost {
    pub fn count(&self, pred: impl Fn(&HostEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

// ============================================================================
// Scroll surface
// ============================================================================

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub locks: u32,
    pub unlocks: u32,
    pub last_options: Option<ScrollLockOptions>,
}

impl ScrollSurface for RecordingSurface {
    fn lock(&mut self, options: &ScrollLockOptions) {
        self.locks += 1;
        self.last_options = Some(options.clone());
    }

    fn unlock(&mut self, _release_extreme_overflow: bool) {
        self.unlocks += 1;
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub service: ModalService,
    pub host: Rc<RefCell<RecordingHost>>,
    pub surface: Rc<RefCell<RecordingSurface>>,
    pub navigation: Emitter<NavigationEnd>,
}

impl Harness {
    pub fn new(width: u32) -> Self {
        let surface = Rc::new(RefCell::new(RecordingSurface::default()));
        let viewport = ViewportTracker::with_options(
            Dimensions::new(width, 800),
            BreakpointTable::default(),
            DEFAULT_RESIZE_DEBOUNCE,
        );
        let navigation = Emitter::new();
        let env = ModalEnvironment::new(viewport)
            .with_scroll_lock(ScrollLockCoordinator::with_surface(surface.clone()))
            .with_navigation(navigation.clone());
        let service = ModalService::new(env);
        let host = Rc::new(RefCell::new(RecordingHost::default()));
        service.register_host(host.clone());
        Self {
            service,
            host,
            surface,
            navigation,
        }
    }

    /// Report a resize and let the debounce settle.
    pub fn resize(&self, width: u32) {
        self.service.viewport().report(Dimensions::new(width, 800));
        self.service.advance(DEFAULT_RESIZE_DEBOUNCE);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.service.advance(Duration::from_millis(ms));
    }
}

/// Values collected from a stream, kept alive with its subscription.
pub struct Recorded<T> {
    seen: Rc<RefCell<Vec<T>>>,
    _subscription: Subscription,
}

impl<T: Clone> Recorded<T> {
    pub fn get(&self) -> Vec<T> {
        self.seen.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.seen.borrow().len()
    }
}

/// Every state a modal passes through, starting with the current one.
pub fn record_states<C: ModalComponent>(modal: &ModalRef<C>) -> Recorded<ModalState> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let subscription = modal.on_state_change(move |s| sink.borrow_mut().push(s));
    Recorded {
        seen,
        _subscription: subscription,
    }
}

/// Every result `after_closed` delivers.
pub fn record_results<C: ModalComponent>(
    modal: &ModalRef<C>,
) -> Recorded<CloseResult<C::Output>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let subscription = modal
        .after_closed()
        .subscribe(move |r| sink.borrow_mut().push(r.clone()));
    Recorded {
        seen,
        _subscription: subscription,
    }
}

// ============================================================================
// Content
// ============================================================================

/// Counts `on_destroy` calls through its payload.
pub struct Tracked {
    pub destroyed: Rc<Cell<u32>>,
    pub handle: Option<ModalRef<Tracked>>,
}

impl ModalComponent for Tracked {
    type Data = Rc<Cell<u32>>;
    type Output = String;

    fn create(data: Option<Self::Data>) -> Self {
        Self {
            destroyed: data.unwrap_or_default(),
            handle: None,
        }
    }

    fn on_modal_init(&mut self, modal: ModalRef<Self>) {
        self.handle = Some(modal);
    }

    fn on_destroy(&mut self) {
        self.destroyed.set(self.destroyed.get() + 1);
    }
}

/// Plain content with no payload.
pub struct Plain;

impl ModalComponent for Plain {
    type Data = ();
    type Output = u32;

    fn create(_data: Option<()>) -> Self {
        Plain
    }
}

/// Confirmation dialog used by guard tests.
pub struct ConfirmDialog {
    pub message: String,
}

impl ModalComponent for ConfirmDialog {
    type Data = String;
    type Output = ();

    fn create(data: Option<String>) -> Self {
        Self {
            message: data.unwrap_or_default(),
        }
    }
}
