#![forbid(unsafe_code)]

//! Modal factory and registry owner.
//!
//! One [`ModalService`] per application, passed around by handle. It merges
//! [`GlobalSettings`] into each call's [`ModalConfig`], builds the container
//! and content pair, registers the instance, and drives close-delay timers
//! through [`ModalService::advance`].
//!
//! # Invariants
//!
//! 1. Every registry write goes through the service.
//! 2. `open` either fully succeeds (mounted, registered, `Open`) or creates
//!    nothing.
//! 3. The first navigation event is ignored; later ones close every modal
//!    that did not opt out.
//! 4. Registry subscribers see the key list after each write, never while
//!    the registry is borrowed.
//!
//! # Failure Modes
//!
//! - `open` before `register_host` fails with
//!   [`ModalError::HostNotRegistered`].
//! - `get::<C>` on an entry of another content type fails with
//!   [`ModalError::TypeMismatch`].

use std::any::{TypeId, type_name};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use blocks_core::{
    Dimensions, Emitter, Key, NavigationEnd, Observable, ScrollLockCoordinator, Subscription,
    ViewportTracker,
};
use tracing::{debug, info, warn};

use crate::component::ModalComponent;
use crate::config::{GlobalSettings, ModalConfig, SettingsPatch};
use crate::container::{ContainerParts, ModalContainer};
use crate::error::ModalError;
use crate::host::ModalHost;
use crate::instance::ModalRef;
use crate::registry::{Entry, ErasedModal, ModalKey, ModalRegistry};

/// Shared inputs every modal is wired to.
#[derive(Debug, Clone)]
pub struct ModalEnvironment {
    pub viewport: ViewportTracker,
    pub scroll_lock: ScrollLockCoordinator,
    pub keyboard: Emitter<Key>,
    pub navigation: Option<Emitter<NavigationEnd>>,
}

impl Default for ModalEnvironment {
    fn default() -> Self {
        Self::new(ViewportTracker::new(Dimensions::new(1280, 800)))
    }
}

impl ModalEnvironment {
    #[must_use]
    pub fn new(viewport: ViewportTracker) -> Self {
        Self {
            viewport,
            scroll_lock: ScrollLockCoordinator::new(),
            keyboard: Emitter::new(),
            navigation: None,
        }
    }

    #[must_use]
    pub fn with_scroll_lock(mut self, scroll_lock: ScrollLockCoordinator) -> Self {
        self.scroll_lock = scroll_lock;
        self
    }

    #[must_use]
    pub fn with_keyboard(mut self, keyboard: Emitter<Key>) -> Self {
        self.keyboard = keyboard;
        self
    }

    #[must_use]
    pub fn with_navigation(mut self, navigation: Emitter<NavigationEnd>) -> Self {
        self.navigation = Some(navigation);
        self
    }
}

struct ServiceInner {
    registry: RefCell<ModalRegistry>,
    modals: Observable<Vec<ModalKey>>,
    closing: RefCell<Vec<Rc<dyn ErasedModal>>>,
    host: RefCell<Option<Rc<RefCell<dyn ModalHost>>>>,
    settings: RefCell<GlobalSettings>,
    env: ModalEnvironment,
    navigation: RefCell<Option<Subscription>>,
}

/// Opens, tracks and closes modals.
#[derive(Clone)]
pub struct ModalService {
    inner: Rc<ServiceInner>,
}

impl fmt::Debug for ModalService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalService")
            .field("registry", &self.inner.registry.borrow())
            .field("closing", &self.inner.closing.borrow().len())
            .field("has_host", &self.inner.host.borrow().is_some())
            .field("settings", &self.inner.settings.borrow())
            .finish()
    }
}

#[derive(Clone)]
pub(crate) struct WeakModalService {
    inner: Weak<ServiceInner>,
}

impl WeakModalService {
    pub(crate) fn upgrade(&self) -> Option<ModalService> {
        self.inner.upgrade().map(|inner| ModalService { inner })
    }
}

impl ModalService {
    #[must_use]
    pub fn new(env: ModalEnvironment) -> Self {
        Self::with_settings(env, GlobalSettings::default())
    }

    #[must_use]
    pub fn with_settings(env: ModalEnvironment, settings: GlobalSettings) -> Self {
        let navigation = env.navigation.clone();
        let service = Self {
            inner: Rc::new(ServiceInner {
                registry: RefCell::new(ModalRegistry::new()),
                modals: Observable::new(Vec::new()),
                closing: RefCell::new(Vec::new()),
                host: RefCell::new(None),
                settings: RefCell::new(settings),
                env,
                navigation: RefCell::new(None),
            }),
        };
        if let Some(navigation) = navigation {
            let weak = service.downgrade();
            let seen = Cell::new(0u64);
            let subscription = navigation.subscribe(move |event| {
                let count = seen.get();
                seen.set(count + 1);
                if count == 0 {
                    return;
                }
                if let Some(service) = weak.upgrade()
                    && service.modals_count() > 0
                {
                    debug!(url = %event.url, "navigation closes modals");
                    service.close_all(true);
                }
            });
            *service.inner.navigation.borrow_mut() = Some(subscription);
        }
        service
    }

    pub(crate) fn downgrade(&self) -> WeakModalService {
        WeakModalService {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Install the render host. Replaces any previous host for future opens.
    pub fn register_host(&self, host: Rc<RefCell<dyn ModalHost>>) {
        *self.inner.host.borrow_mut() = Some(host);
    }

    #[must_use]
    pub fn has_host(&self) -> bool {
        self.inner.host.borrow().is_some()
    }

    /// Open content `C` with `config`.
    pub fn open<C: ModalComponent>(
        &self,
        config: ModalConfig<C::Data>,
    ) -> Result<ModalRef<C>, ModalError> {
        let host = self
            .inner
            .host
            .borrow()
            .clone()
            .ok_or(ModalError::HostNotRegistered)?;

        let settings = self.settings();
        let env = &self.inner.env;
        let (config, data) = config.resolve(&settings, env.viewport.table());
        let quiet = config.disable_console_info;
        let id = config.id.clone();

        let key = ModalKey::next();
        let z_index = self.inner.registry.borrow_mut().next_z_index();
        let container = ModalContainer::<C>::new(ContainerParts {
            key,
            z_index,
            config: Rc::new(config),
            viewport: env.viewport.clone(),
            scroll_lock: env.scroll_lock.clone(),
            keyboard: env.keyboard.clone(),
            host,
            service: self.downgrade(),
        });
        container.set_content(C::create(data));

        let modal = ModalRef::new(container.clone(), self.downgrade());
        let handle = modal.clone();
        container.with_content(move |content| content.on_modal_init(handle));
        container.mount();

        self.inner.registry.borrow_mut().insert(Entry {
            key,
            z_index,
            content_type: TypeId::of::<C>(),
            content_type_name: type_name::<C>(),
            handle: modal.erased(),
            typed: Rc::new(modal.clone()),
        });
        self.publish_registry();
        modal.mark_open();

        if !quiet {
            info!(
                modal = %key,
                id = %id,
                component = type_name::<C>(),
                layout = %modal.effective_layout(),
                z_index,
                "modal opened"
            );
        }
        Ok(modal)
    }

    /// Cancel-close `modal`, running its guard.
    pub fn close<C: ModalComponent>(&self, modal: &ModalRef<C>) {
        modal.cancel();
    }

    /// Force-close every registered modal. With `on_navigate`, modals with
    /// `disable_close_on_navigation` are skipped and stay registered.
    /// Returns how many were closed.
    pub fn close_all(&self, on_navigate: bool) -> usize {
        let snapshot = self.inner.registry.borrow().snapshot();
        let mut closed = 0;
        for handle in snapshot {
            if on_navigate && handle.disable_close_on_navigation() {
                continue;
            }
            handle.force_cancel();
            self.inner.registry.borrow_mut().remove(handle.key());
            closed += 1;
        }
        self.publish_registry();
        debug!(closed, on_navigate, "close_all");
        closed
    }

    /// Whether any registered modal holds content of exactly type `C`.
    #[must_use]
    pub fn find<C: ModalComponent>(&self) -> bool {
        self.inner
            .registry
            .borrow()
            .contains_type(TypeId::of::<C>())
    }

    /// Typed handle for `key`. `Ok(None)` when no such modal is registered.
    pub fn get<C: ModalComponent>(
        &self,
        key: ModalKey,
    ) -> Result<Option<ModalRef<C>>, ModalError> {
        let registry = self.inner.registry.borrow();
        let Some(entry) = registry.get(key) else {
            return Ok(None);
        };
        if entry.content_type != TypeId::of::<C>() {
            return Err(ModalError::TypeMismatch {
                expected: type_name::<C>(),
                found: entry.content_type_name,
            });
        }
        Ok(entry.typed.downcast_ref::<ModalRef<C>>().cloned())
    }

    /// Every registered modal of content type `C`, bottom to top.
    #[must_use]
    pub fn all_of<C: ModalComponent>(&self) -> Vec<ModalRef<C>> {
        let registry = self.inner.registry.borrow();
        registry
            .keys_of_type(TypeId::of::<C>())
            .into_iter()
            .filter_map(|key| registry.get(key))
            .filter_map(|entry| entry.typed.downcast_ref::<ModalRef<C>>().cloned())
            .collect()
    }

    #[must_use]
    pub fn modals_count(&self) -> usize {
        self.inner.registry.borrow().len()
    }

    /// Registered keys in z-order.
    #[must_use]
    pub fn keys(&self) -> Vec<ModalKey> {
        self.inner.registry.borrow().keys()
    }

    /// Topmost registered modal.
    #[must_use]
    pub fn top(&self) -> Option<ModalKey> {
        self.inner.registry.borrow().top_key()
    }

    /// Call `f` with the registered keys, in z-order, whenever the registry
    /// changes. Dropping the subscription stops delivery.
    pub fn on_registry_change(&self, f: impl Fn(&[ModalKey]) + 'static) -> Subscription {
        self.inner.modals.subscribe(move |keys| f(keys))
    }

    /// Modals waiting out their close delay.
    #[must_use]
    pub fn pending_teardowns(&self) -> usize {
        self.inner.closing.borrow().len()
    }

    /// Advance the clock: viewport debounce first, then close-delay timers.
    pub fn advance(&self, elapsed: Duration) {
        self.inner.env.viewport.advance(elapsed);

        let due = std::mem::take(&mut *self.inner.closing.borrow_mut());
        let mut waiting: Vec<Rc<dyn ErasedModal>> =
            due.into_iter().filter(|handle| !handle.tick(elapsed)).collect();
        let mut closing = self.inner.closing.borrow_mut();
        waiting.append(&mut closing);
        *closing = waiting;
    }

    /// Snapshot of the process-wide defaults.
    #[must_use]
    pub fn settings(&self) -> GlobalSettings {
        self.inner.settings.borrow().clone()
    }

    /// Patch the process-wide defaults. Affects modals opened afterwards.
    pub fn update_settings(&self, patch: SettingsPatch) {
        let (problems, warnings) = {
            let mut settings = self.inner.settings.borrow_mut();
            settings.apply(patch);
            (settings.validate(), !settings.disable_console_warnings)
        };
        if warnings {
            for problem in &problems {
                warn!(problem = %problem, "modal settings");
            }
        }
    }

    #[must_use]
    pub fn viewport(&self) -> &ViewportTracker {
        &self.inner.env.viewport
    }

    #[must_use]
    pub fn scroll_lock(&self) -> &ScrollLockCoordinator {
        &self.inner.env.scroll_lock
    }

    /// Hosts push key presses here.
    #[must_use]
    pub fn keyboard(&self) -> &Emitter<Key> {
        &self.inner.env.keyboard
    }

    pub(crate) fn unregister(&self, key: ModalKey) -> bool {
        let removed = self.inner.registry.borrow_mut().remove(key);
        if removed {
            self.publish_registry();
        }
        removed
    }

    fn publish_registry(&self) {
        let keys = self.inner.registry.borrow().keys();
        self.inner.modals.set(keys);
    }

    pub(crate) fn schedule_teardown(&self, handle: Rc<dyn ErasedModal>) {
        self.inner.closing.borrow_mut().push(handle);
    }
}
