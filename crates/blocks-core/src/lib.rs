#![forbid(unsafe_code)]

//! Core services for Blocks.
//!
//! This crate holds everything the overlay components depend on but that is
//! not itself an overlay:
//!
//! - [`breakpoints`]: named responsive widths and device classes.
//! - [`viewport`]: debounced viewport dimensions.
//! - [`scroll_lock`]: reference-counted background scroll lock.
//! - [`device`]: user-agent classification and theme tracking.
//! - [`reactive`]: observables, emitters, deferred values.
//! - [`events`]: host input types.

pub mod breakpoints;
pub mod device;
pub mod events;
pub mod id;
pub mod reactive;
pub mod scroll_lock;
pub mod viewport;

pub use breakpoints::{Breakpoint, BreakpointTable, DeviceClass};
pub use device::{DeviceFlags, DeviceState, Theme, ThemeService};
pub use events::{Key, NavigationEnd, PointerEvent, PointerPhase};
pub use reactive::{Binding, Deferred, Emitter, Observable, Subscription};
pub use scroll_lock::{ScrollLockCoordinator, ScrollLockOptions, ScrollSurface, TouchContext};
pub use viewport::{Dimensions, ViewportTracker};
