#![forbid(unsafe_code)]

//! Host input forwarded into the engine.
//!
//! The engine does not own an event loop. Hosts translate their native
//! keyboard, pointer and router events into these types and push them
//! through an [`Emitter`](crate::reactive::Emitter) or directly into the
//! component that owns the gesture.

use std::time::Duration;

/// Keys the engine reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Other(String),
}

/// Pointer or touch phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// A pointer sample. `at` is host time since an arbitrary origin and only
/// differences between samples matter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub x: f64,
    pub y: f64,
    pub at: Duration,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(phase: PointerPhase, x: f64, y: f64, at: Duration) -> Self {
        Self { phase, x, y, at }
    }

    #[must_use]
    pub const fn down(y: f64, at: Duration) -> Self {
        Self::new(PointerPhase::Down, 0.0, y, at)
    }

    #[must_use]
    pub const fn moved(y: f64, at: Duration) -> Self {
        Self::new(PointerPhase::Move, 0.0, y, at)
    }

    #[must_use]
    pub const fn up(y: f64, at: Duration) -> Self {
        Self::new(PointerPhase::Up, 0.0, y, at)
    }
}

/// Router finished navigating to `url`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NavigationEnd {
    pub id: u64,
    pub url: String,
}

impl NavigationEnd {
    pub fn new(id: u64, url: impl Into<String>) -> Self {
        Self { id, url: url.into() }
    }
}
