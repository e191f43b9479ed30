#![forbid(unsafe_code)]

//! Integration tests: open/close lifecycle, result delivery and registry
//! behavior of the modal service.

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use blocks_core::{Key, NavigationEnd};
use blocks_modal::{
    CloseMode, CloseResult, CloseVerdict, GuardContext, ModalComponent, ModalConfig,
    ModalEnvironment, ModalError, ModalLayout, ModalRef, ModalService, ModalState, SettingsPatch,
    Template, attach_header,
};
use common::{
    ConfirmDialog, Harness, HostEvent, Plain, Recorded, Tracked, record_results, record_states,
};

/// Records its own state changes from `on_modal_init` on.
struct Watcher {
    slot: WatchSlot,
}

type WatchSlot = Rc<RefCell<Option<Recorded<ModalState>>>>;

impl ModalComponent for Watcher {
    type Data = WatchSlot;
    type Output = ();

    fn create(data: Option<WatchSlot>) -> Self {
        Self {
            slot: data.unwrap_or_default(),
        }
    }

    fn on_modal_init(&mut self, modal: ModalRef<Self>) {
        *self.slot.borrow_mut() = Some(record_states(&modal));
    }
}

fn plain(service: &ModalService) -> ModalRef<Plain> {
    service
        .open::<Plain>(ModalConfig::new())
        .expect("host registered")
}

// ============================================================================
// Open
// ============================================================================

#[test]
fn open_without_host_fails_and_creates_nothing() {
    let service = ModalService::new(ModalEnvironment::default());
    let err = service.open::<Plain>(ModalConfig::new()).unwrap_err();
    assert_eq!(err, ModalError::HostNotRegistered);
    assert_eq!(service.modals_count(), 0);
}

#[test]
fn open_mounts_registers_and_marks_open() {
    let h = Harness::new(1024);
    let modal = plain(&h.service);

    assert_eq!(modal.state(), ModalState::Open);
    assert!(modal.is_open());
    assert_eq!(h.service.modals_count(), 1);
    assert_eq!(h.service.top(), Some(modal.key()));
    assert_eq!(
        h.host.borrow().events,
        vec![HostEvent::Mount(modal.key(), ModalLayout::Center)]
    );
    assert!(modal.id().starts_with("blocks-modal-"));
}

#[test]
fn stacked_modals_get_increasing_z() {
    let h = Harness::new(1024);
    let a = plain(&h.service);
    let b = plain(&h.service);

    assert!(b.view().z_index > a.view().z_index);
    assert_eq!(h.service.keys(), vec![a.key(), b.key()]);
    assert_eq!(h.service.top(), Some(b.key()));
}

#[test]
fn settings_patch_applies_to_later_opens() {
    let h = Harness::new(1024);
    let before = plain(&h.service);
    h.service.update_settings(SettingsPatch {
        layout: Some(ModalLayout::Right),
        ..SettingsPatch::default()
    });
    let after = plain(&h.service);

    assert_eq!(before.effective_layout(), ModalLayout::Center);
    assert_eq!(after.effective_layout(), ModalLayout::Right);
}

// ============================================================================
// State machine and result delivery
// ============================================================================

#[test]
fn states_advance_one_step_at_a_time() {
    let h = Harness::new(1024);
    let slot: WatchSlot = Rc::new(RefCell::new(None));

    let modal = h
        .service
        .open::<Watcher>(ModalConfig::new().data(slot.clone()))
        .expect("open");
    modal.confirm(());
    h.advance_ms(175);

    let states = slot.borrow().as_ref().map(Recorded::get).unwrap_or_default();
    assert_eq!(
        states,
        vec![
            ModalState::Opening,
            ModalState::Open,
            ModalState::Closing,
            ModalState::Closed
        ]
    );
}

#[test]
fn result_is_delivered_once_and_only_after_closed() {
    let h = Harness::new(1024);
    let modal = plain(&h.service);
    let results = record_results(&modal);

    let seen_state = Rc::new(Cell::new(None));
    let sink = seen_state.clone();
    let observer = modal.clone();
    let _sub = modal
        .after_closed()
        .subscribe(move |_| sink.set(Some(observer.state())));

    modal.confirm(42);
    assert_eq!(modal.state(), ModalState::Closing);
    assert_eq!(results.len(), 0);

    h.advance_ms(100);
    assert_eq!(results.len(), 0);
    assert_eq!(h.service.modals_count(), 1);

    h.advance_ms(75);
    assert_eq!(results.get(), vec![CloseResult::confirmed(Some(42))]);
    assert_eq!(seen_state.get(), Some(ModalState::Closed));
    assert_eq!(h.service.modals_count(), 0);

    modal.cancel();
    modal.force_close();
    h.advance_ms(500);
    assert_eq!(results.len(), 1);
    assert!(modal.after_closed().is_completed());
}

#[test]
fn zero_delay_closes_synchronously() {
    let h = Harness::new(1024);
    let modal = h
        .service
        .open::<Plain>(ModalConfig::new().close_delay(Duration::ZERO))
        .expect("open");
    let results = record_results(&modal);

    modal.cancel();

    assert_eq!(modal.state(), ModalState::Closed);
    assert_eq!(results.get(), vec![CloseResult::cancelled()]);
    assert_eq!(h.service.pending_teardowns(), 0);
}

#[test]
fn teardown_runs_hook_then_destroy_then_emits() {
    let h = Harness::new(1024);
    let log = Rc::new(RefCell::new(Vec::<&'static str>::new()));
    let destroyed = Rc::new(Cell::new(0));

    let hook_log = log.clone();
    let modal = h
        .service
        .open::<Tracked>(
            ModalConfig::new()
                .data(destroyed.clone())
                .after_close(move || hook_log.borrow_mut().push("hook")),
        )
        .expect("open");

    let emit_log = log.clone();
    let watched = destroyed.clone();
    let _sub = modal.after_closed().subscribe(move |_| {
        assert_eq!(watched.get(), 1);
        emit_log.borrow_mut().push("emit");
    });

    modal.cancel();
    h.advance_ms(175);

    assert_eq!(*log.borrow(), vec!["hook", "emit"]);
    assert_eq!(destroyed.get(), 1);
    assert!(modal.with_content(|_| ()).is_none());
    assert_eq!(
        h.host.borrow().events.last(),
        Some(&HostEvent::Unmount(modal.key()))
    );
}

#[test]
fn content_can_close_itself() {
    let h = Harness::new(1024);
    let modal = h
        .service
        .open::<Tracked>(ModalConfig::new())
        .expect("open");
    let results = record_results(&modal);

    let inner = modal
        .with_content(|tracked| tracked.handle.clone())
        .flatten()
        .expect("handle stored in init");
    assert_eq!(inner, modal);
    drop(inner);

    modal.close(CloseMode::Confirm, Some("done".to_string()));
    h.advance_ms(175);
    assert_eq!(results.get(), vec![CloseResult::confirmed(Some("done".to_string()))]);
}

// ============================================================================
// Guards
// ============================================================================

#[test]
fn guard_false_keeps_modal_open_and_registered() {
    let h = Harness::new(1024);
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let modal = h
        .service
        .open::<Plain>(ModalConfig::new().close_guard(move |_: &GuardContext<'_>| {
            counter.set(counter.get() + 1);
            CloseVerdict::Ready(false)
        }))
        .expect("open");

    modal.cancel();
    h.advance_ms(500);

    assert_eq!(calls.get(), 1);
    assert_eq!(modal.state(), ModalState::Open);
    assert!(modal.is_open());
    assert_eq!(h.service.modals_count(), 1);
}

#[test]
fn guard_true_proceeds_to_closed() {
    let h = Harness::new(1024);
    let modal = h
        .service
        .open::<Plain>(
            ModalConfig::new().close_guard(|_: &GuardContext<'_>| CloseVerdict::Ready(true)),
        )
        .expect("open");
    let states = record_states(&modal);

    modal.cancel();
    h.advance_ms(175);

    assert_eq!(
        states.get(),
        vec![ModalState::Open, ModalState::Closing, ModalState::Closed]
    );
    assert_eq!(h.service.modals_count(), 0);
}

#[test]
fn guard_skipped_on_confirm_by_default() {
    let h = Harness::new(1024);
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let guard = move |_: &GuardContext<'_>| {
        counter.set(counter.get() + 1);
        CloseVerdict::Ready(false)
    };
    let modal = h
        .service
        .open::<Plain>(ModalConfig::new().close_guard(guard.clone()))
        .expect("open");
    modal.confirm(1);
    assert_eq!(calls.get(), 0);
    assert_eq!(modal.state(), ModalState::Closing);

    let strict = h
        .service
        .open::<Plain>(
            ModalConfig::new()
                .close_guard(guard)
                .close_guard_only_on_cancel(false),
        )
        .expect("open");
    strict.confirm(1);
    assert_eq!(calls.get(), 1);
    assert_eq!(strict.state(), ModalState::Open);
}

#[test]
fn force_close_bypasses_guard_and_disable_close() {
    let h = Harness::new(1024);
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let modal = h
        .service
        .open::<Plain>(
            ModalConfig::new()
                .disable_close(true)
                .close_guard(move |_: &GuardContext<'_>| {
                    counter.set(counter.get() + 1);
                    CloseVerdict::Ready(false)
                }),
        )
        .expect("open");
    let results = record_results(&modal);

    modal.force_close();
    h.advance_ms(175);

    assert_eq!(calls.get(), 0);
    assert_eq!(modal.state(), ModalState::Closed);
    assert_eq!(results.get(), vec![CloseResult::cancelled()]);
}

// ============================================================================
// Inside/outside close requests
// ============================================================================

#[test]
fn disable_close_blocks_inside_requests_only() {
    let h = Harness::new(1024);
    let modal = h
        .service
        .open::<Plain>(ModalConfig::new().disable_close(true))
        .expect("open");

    modal.handle_backdrop_click();
    h.service.keyboard().emit(&Key::Escape);
    assert!(modal.is_open());
    assert!(!modal.view().show_close_button);

    modal.cancel();
    assert_eq!(modal.state(), ModalState::Closing);
}

#[test]
fn escape_cancels_every_open_modal() {
    let h = Harness::new(1024);
    let a = plain(&h.service);
    let b = plain(&h.service);
    let results = record_results(&b);

    h.service.keyboard().emit(&Key::Other("a".into()));
    assert!(a.is_open() && b.is_open());

    h.service.keyboard().emit(&Key::Escape);
    h.advance_ms(175);
    assert_eq!(a.state(), ModalState::Closed);
    assert_eq!(results.get(), vec![CloseResult::cancelled()]);
}

#[test]
fn backdrop_click_emits_then_closes() {
    let h = Harness::new(1024);
    let modal = plain(&h.service);
    let clicks = Rc::new(Cell::new(0));
    let counter = clicks.clone();
    let _sub = modal
        .backdrop_click()
        .subscribe(move |_| counter.set(counter.get() + 1));

    modal.handle_backdrop_click();
    assert_eq!(clicks.get(), 1);
    assert_eq!(modal.state(), ModalState::Closing);

    modal.handle_backdrop_click();
    assert_eq!(clicks.get(), 1);
}

#[test]
fn backdrop_click_respects_opt_out() {
    let h = Harness::new(1024);
    let modal = h
        .service
        .open::<Plain>(ModalConfig::new().disable_close_on_backdrop_click(true))
        .expect("open");
    let clicks = Rc::new(Cell::new(0));
    let counter = clicks.clone();
    let _sub = modal
        .backdrop_click()
        .subscribe(move |_| counter.set(counter.get() + 1));

    modal.handle_backdrop_click();
    assert_eq!(clicks.get(), 1);
    assert!(modal.is_open());

    let bare = h
        .service
        .open::<Plain>(ModalConfig::new().has_backdrop(false))
        .expect("open");
    bare.handle_backdrop_click();
    assert!(bare.is_open());
}

// ============================================================================
// close_all and navigation
// ============================================================================

#[test]
fn close_all_on_navigate_respects_opt_out() {
    let h = Harness::new(1024);
    let sticky = h
        .service
        .open::<Plain>(ModalConfig::new().disable_close_on_navigation(true))
        .expect("open");
    let transient = plain(&h.service);

    assert_eq!(h.service.close_all(true), 1);
    assert!(sticky.is_open());
    assert!(!transient.is_open());
    assert_eq!(h.service.keys(), vec![sticky.key()]);

    assert_eq!(h.service.close_all(false), 1);
    assert!(!sticky.is_open());
    assert_eq!(h.service.modals_count(), 0);

    h.advance_ms(175);
    assert_eq!(sticky.state(), ModalState::Closed);
    assert_eq!(transient.state(), ModalState::Closed);
}

#[test]
fn close_all_bypasses_guards() {
    let h = Harness::new(1024);
    let modal = h
        .service
        .open::<Plain>(
            ModalConfig::new().close_guard(|_: &GuardContext<'_>| CloseVerdict::Ready(false)),
        )
        .expect("open");

    h.service.close_all(false);
    h.advance_ms(175);
    assert_eq!(modal.state(), ModalState::Closed);
}

#[test]
fn first_navigation_is_ignored() {
    let h = Harness::new(1024);
    let modal = plain(&h.service);

    h.navigation.emit(&NavigationEnd::new(1, "/"));
    assert!(modal.is_open());

    h.navigation.emit(&NavigationEnd::new(2, "/settings"));
    assert!(!modal.is_open());
    assert_eq!(h.service.modals_count(), 0);
}

// ============================================================================
// Lookup
// ============================================================================

#[test]
fn find_uses_exact_content_type() {
    let h = Harness::new(1024);
    let _modal = plain(&h.service);

    assert!(h.service.find::<Plain>());
    assert!(!h.service.find::<ConfirmDialog>());
}

#[test]
fn get_checks_content_type() {
    let h = Harness::new(1024);
    let modal = plain(&h.service);

    let found = h.service.get::<Plain>(modal.key()).expect("same type");
    assert_eq!(found, Some(modal.clone()));

    let err = h.service.get::<ConfirmDialog>(modal.key()).unwrap_err();
    assert!(matches!(err, ModalError::TypeMismatch { .. }));

    modal.force_close();
    h.advance_ms(175);
    assert_eq!(h.service.get::<Plain>(modal.key()), Ok(None));
}

#[test]
fn registry_changes_follow_open_close_and_close_all() {
    let h = Harness::new(1024);
    let seen: Rc<RefCell<Vec<Vec<u64>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let _sub = h.service.on_registry_change(move |keys| {
        sink.borrow_mut().push(keys.iter().map(|k| k.id()).collect());
    });

    let a = plain(&h.service);
    let b = plain(&h.service);
    a.cancel();
    h.advance_ms(175);
    h.service.close_all(false);
    h.advance_ms(175);

    let (a, b) = (a.key().id(), b.key().id());
    assert_eq!(*seen.borrow(), vec![vec![a], vec![a, b], vec![b], vec![]]);
}

// ============================================================================
// Templates
// ============================================================================

#[test]
fn header_template_replaces_close_banner() {
    let h = Harness::new(1024);
    let modal = plain(&h.service);
    assert!(modal.view().has_banner);

    assert!(attach_header(Some(&modal), Template::new("title"), true));
    let view = modal.view();
    assert_eq!(view.header.as_deref(), Some("title"));
    assert!(!view.has_banner);
    assert_eq!(h.host.borrow().last_view.as_ref(), Some(&view));

    assert!(!attach_header(None, Template::new("orphan"), false));
}
