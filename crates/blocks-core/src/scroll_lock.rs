#![forbid(unsafe_code)]

//! Reference-counted background scroll lock.
//!
//! Several overlays may want the page behind them frozen at once. Each holds
//! the lock under its own scope key; the [`ScrollSurface`] sees exactly one
//! `lock` when the first holder arrives and one `unlock` when the last one
//! leaves.
//!
//! # Invariants
//!
//! 1. `is_locked()` is true iff at least one scope holds the lock.
//! 2. Acquiring an already-held scope refreshes its options and does not
//!    count twice.
//! 3. Releasing a scope that holds nothing is a no-op.
//!
//! # Failure Modes
//!
//! - A surface that calls back into the coordinator from `lock`/`unlock`
//!   sees the state after the change; no borrow is held across the call.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use ahash::AHashMap;
use tracing::debug;

/// Options a holder attaches to its lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollLockOptions {
    /// Block touch scrolling as well as wheel/keyboard scrolling.
    pub handle_touch_input: bool,
    /// Only block touch input on narrow (below `sm`) viewports.
    pub mobile_only_touch_prevention: bool,
    /// Also suppress wheel and scroll events at the window level.
    pub handle_extreme_overflow: bool,
    /// Delay before event-level blocking starts, matching the enter animation.
    pub animation_duration: Duration,
    /// Regions (host-defined ids) where touch scrolling stays allowed.
    pub allow_touch_input_on: Vec<String>,
}

impl Default for ScrollLockOptions {
    fn default() -> Self {
        Self {
            handle_touch_input: true,
            mobile_only_touch_prevention: false,
            handle_extreme_overflow: true,
            animation_duration: Duration::ZERO,
            allow_touch_input_on: Vec::new(),
        }
    }
}

impl ScrollLockOptions {
    #[must_use]
    pub fn handle_touch_input(mut self, on: bool) -> Self {
        self.handle_touch_input = on;
        self
    }

    #[must_use]
    pub fn mobile_only_touch_prevention(mut self, on: bool) -> Self {
        self.mobile_only_touch_prevention = on;
        self
    }

    #[must_use]
    pub fn handle_extreme_overflow(mut self, on: bool) -> Self {
        self.handle_extreme_overflow = on;
        self
    }

    #[must_use]
    pub fn animation_duration(mut self, d: Duration) -> Self {
        self.animation_duration = d;
        self
    }

    #[must_use]
    pub fn allow_touch_on(mut self, region: impl Into<String>) -> Self {
        self.allow_touch_input_on.push(region.into());
        self
    }
}

/// The thing that actually stops scrolling (document body, terminal
/// viewport, test recorder).
pub trait ScrollSurface {
    fn lock(&mut self, options: &ScrollLockOptions);
    /// `release_extreme_overflow` is false when window-level listeners must
    /// stay attached.
    fn unlock(&mut self, release_extreme_overflow: bool);
}

/// Input needed to decide whether a touch move should be swallowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchContext<'a> {
    /// Region the touch started in, if the host knows it.
    pub target: Option<&'a str>,
    pub viewport_width: u32,
    /// Width of the `sm` breakpoint.
    pub narrow_below: u32,
}

#[derive(Debug)]
struct Holder {
    options: ScrollLockOptions,
    seq: u64,
}

#[derive(Default)]
struct LockState {
    holders: AHashMap<String, Holder>,
    next_seq: u64,
}

impl LockState {
    fn latest(&self) -> Option<&ScrollLockOptions> {
        self.holders
            .values()
            .max_by_key(|h| h.seq)
            .map(|h| &h.options)
    }
}

/// Shared scroll-lock handle. Clones refer to the same lock.
#[derive(Clone, Default)]
pub struct ScrollLockCoordinator {
    state: Rc<RefCell<LockState>>,
    surface: Option<Rc<RefCell<dyn ScrollSurface>>>,
}

impl fmt::Debug for ScrollLockCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollLockCoordinator")
            .field("holders", &self.holders())
            .field("has_surface", &self.surface.is_some())
            .finish()
    }
}

impl ScrollLockCoordinator {
    /// Coordinator that only counts holders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_surface(surface: Rc<RefCell<dyn ScrollSurface>>) -> Self {
        Self {
            state: Rc::default(),
            surface: Some(surface),
        }
    }

    /// Take the lock for `scope`. Returns true when this call engaged it.
    pub fn acquire(&self, scope: &str, options: ScrollLockOptions) -> bool {
        let engaged = {
            let mut state = self.state.borrow_mut();
            let engaged = state.holders.is_empty();
            state.next_seq += 1;
            let seq = state.next_seq;
            state.holders.insert(
                scope.to_owned(),
                Holder {
                    options: options.clone(),
                    seq,
                },
            );
            engaged
        };
        if engaged {
            debug!(scope, "scroll lock engaged");
            if let Some(surface) = &self.surface {
                surface.borrow_mut().lock(&options);
            }
        }
        engaged
    }

    /// Drop `scope`'s hold. Returns true when this call disengaged the lock.
    pub fn release(&self, scope: &str, release_extreme_overflow: bool) -> bool {
        let disengaged = {
            let mut state = self.state.borrow_mut();
            state.holders.remove(scope).is_some() && state.holders.is_empty()
        };
        if disengaged {
            debug!(scope, "scroll lock released");
            if let Some(surface) = &self.surface {
                surface.borrow_mut().unlock(release_extreme_overflow);
            }
        }
        disengaged
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        !self.state.borrow().holders.is_empty()
    }

    #[must_use]
    pub fn holders(&self) -> usize {
        self.state.borrow().holders.len()
    }

    #[must_use]
    pub fn is_held_by(&self, scope: &str) -> bool {
        self.state.borrow().holders.contains_key(scope)
    }

    /// Whether a touch move should be prevented under the most recent
    /// holder's options.
    #[must_use]
    pub fn should_block_touch(&self, ctx: TouchContext<'_>) -> bool {
        let state = self.state.borrow();
        let Some(options) = state.latest() else {
            return false;
        };
        if !options.handle_touch_input {
            return false;
        }
        let allowed = ctx
            .target
            .is_some_and(|t| options.allow_touch_input_on.iter().any(|r| r == t));
        if allowed {
            return false;
        }
        !options.mobile_only_touch_prevention || ctx.viewport_width < ctx.narrow_below
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl ScrollSurface for Recorder {
        fn lock(&mut self, _options: &ScrollLockOptions) {
            self.calls.push("lock");
        }

        fn unlock(&mut self, _release_extreme_overflow: bool) {
            self.calls.push("unlock");
        }
    }

    fn coordinator() -> (ScrollLockCoordinator, Rc<RefCell<Recorder>>) {
        let rec = Rc::new(RefCell::new(Recorder::default()));
        let surface: Rc<RefCell<dyn ScrollSurface>> = rec.clone();
        (ScrollLockCoordinator::with_surface(surface), rec)
    }

    #[test]
    fn nested_holders_lock_once() {
        let (lock, rec) = coordinator();
        assert!(lock.acquire("a", ScrollLockOptions::default()));
        assert!(!lock.acquire("b", ScrollLockOptions::default()));
        assert!(!lock.release("a", true));
        assert!(lock.is_locked());
        assert!(lock.release("b", true));
        assert!(!lock.is_locked());
        assert_eq!(rec.borrow().calls, vec!["lock", "unlock"]);
    }

    #[test]
    fn reacquire_same_scope_counts_once() {
        let (lock, _rec) = coordinator();
        lock.acquire("a", ScrollLockOptions::default());
        lock.acquire("a", ScrollLockOptions::default());
        assert_eq!(lock.holders(), 1);
        assert!(lock.release("a", true));
    }

    #[test]
    fn unknown_release_is_noop() {
        let (lock, rec) = coordinator();
        assert!(!lock.release("ghost", true));
        assert!(rec.borrow().calls.is_empty());
    }

    #[test]
    fn touch_blocking_rules() {
        let lock = ScrollLockCoordinator::new();
        let ctx = TouchContext {
            target: Some("list"),
            viewport_width: 1000,
            narrow_below: 600,
        };
        assert!(!lock.should_block_touch(ctx));

        lock.acquire("m", ScrollLockOptions::default().allow_touch_on("list"));
        assert!(!lock.should_block_touch(ctx));
        assert!(lock.should_block_touch(TouchContext {
            target: Some("body"),
            ..ctx
        }));

        lock.acquire("n", ScrollLockOptions::default().mobile_only_touch_prevention(true));
        assert!(!lock.should_block_touch(ctx));
        assert!(lock.should_block_touch(TouchContext {
            viewport_width: 400,
            ..ctx
        }));

        lock.acquire("o", ScrollLockOptions::default().handle_touch_input(false));
        assert!(!lock.should_block_touch(TouchContext {
            viewport_width: 400,
            ..ctx
        }));
    }
}
