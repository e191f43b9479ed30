#![forbid(unsafe_code)]

//! Viewport dimension tracking.
//!
//! The host reports raw resize events with [`ViewportTracker::report`]. The
//! tracker holds the latest report until the debounce window (150 ms by
//! default) elapses without another report, then publishes it. Time moves
//! only through [`ViewportTracker::advance`], which keeps the tracker
//! deterministic under test.
//!
//! # Invariants
//!
//! 1. Published dimensions never repeat: equal values are swallowed by the
//!    underlying [`Observable`].
//! 2. Each new report restarts the debounce window.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use crate::breakpoints::{BreakpointTable, DeviceClass};
use crate::reactive::{Binding, Observable, bind_mapped};

/// Default resize debounce.
pub const DEFAULT_RESIZE_DEBOUNCE: Duration = Duration::from_millis(150);

/// Viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug)]
struct PendingResize {
    dims: Dimensions,
    remaining: Duration,
}

struct Tracker {
    dimensions: Observable<Dimensions>,
    table: BreakpointTable,
    debounce: Duration,
    pending: RefCell<Option<PendingResize>>,
}

/// Shared handle to the viewport state.
#[derive(Clone)]
pub struct ViewportTracker {
    inner: Rc<Tracker>,
}

impl std::fmt::Debug for ViewportTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportTracker")
            .field("dimensions", &self.current())
            .field("debounce", &self.inner.debounce)
            .field("pending", &self.inner.pending.borrow())
            .finish()
    }
}

impl ViewportTracker {
    #[must_use]
    pub fn new(initial: Dimensions) -> Self {
        Self::with_options(initial, BreakpointTable::default(), DEFAULT_RESIZE_DEBOUNCE)
    }

    #[must_use]
    pub fn with_options(initial: Dimensions, table: BreakpointTable, debounce: Duration) -> Self {
        Self {
            inner: Rc::new(Tracker {
                dimensions: Observable::new(initial),
                table,
                debounce,
                pending: RefCell::new(None),
            }),
        }
    }

    /// Raw resize event from the host.
    pub fn report(&self, dims: Dimensions) {
        if self.inner.debounce.is_zero() {
            self.set_immediate(dims);
            return;
        }
        *self.inner.pending.borrow_mut() = Some(PendingResize {
            dims,
            remaining: self.inner.debounce,
        });
    }

    /// Move the debounce clock forward, publishing a settled report.
    pub fn advance(&self, elapsed: Duration) {
        let settled = {
            let mut pending = self.inner.pending.borrow_mut();
            let due = match pending.as_mut() {
                Some(p) if elapsed >= p.remaining => true,
                Some(p) => {
                    p.remaining -= elapsed;
                    false
                }
                None => false,
            };
            if due { pending.take().map(|p| p.dims) } else { None }
        };
        if let Some(dims) = settled {
            self.set_immediate(dims);
        }
    }

    /// Publish `dims` now, dropping any pending report.
    pub fn set_immediate(&self, dims: Dimensions) {
        self.inner.pending.borrow_mut().take();
        if self.inner.dimensions.set(dims) {
            trace!(width = dims.width, height = dims.height, "viewport resized");
        }
    }

    /// Whether a report is waiting for its debounce window.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.inner.pending.borrow().is_some()
    }

    #[must_use]
    pub fn dimensions(&self) -> &Observable<Dimensions> {
        &self.inner.dimensions
    }

    #[must_use]
    pub fn current(&self) -> Dimensions {
        self.inner.dimensions.get()
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.current().width
    }

    #[must_use]
    pub fn table(&self) -> &BreakpointTable {
        &self.inner.table
    }

    #[must_use]
    pub fn device_class(&self) -> DeviceClass {
        self.inner.table.classify(self.width())
    }

    pub fn is_mobile(&self) -> Binding<bool> {
        self.class_binding(DeviceClass::Mobile)
    }

    pub fn is_tablet(&self) -> Binding<bool> {
        self.class_binding(DeviceClass::Tablet)
    }

    pub fn is_desktop(&self) -> Binding<bool> {
        self.class_binding(DeviceClass::Desktop)
    }

    fn class_binding(&self, class: DeviceClass) -> Binding<bool> {
        let table = self.inner.table;
        bind_mapped(&self.inner.dimensions, move |d| table.classify(d.width) == class)
    }
}
