#![forbid(unsafe_code)]

//! Close guards.
//!
//! A [`CloseGuard`] is consulted before a non-forced close completes. It
//! answers with a [`CloseVerdict`]: either right away, or eventually through
//! a [`Deferred`]. The guard receives a [`GuardContext`] naming the modal
//! being closed and the service, so it may open another modal and wait for
//! it; [`ConfirmCloseGuard`] does exactly that.
//!
//! # Invariants
//!
//! 1. A guard is invoked at most once per close attempt.
//! 2. A verdict of `false` leaves the guarded modal open with no other side
//!    effects.
//!
//! # Failure Modes
//!
//! - An eventual verdict that never resolves keeps the modal open. Forced
//!   closes still work.

use std::any::TypeId;
use std::fmt;
use std::marker::PhantomData;

use blocks_core::{Deferred, Emitter};
use tracing::warn;

use crate::component::ModalComponent;
use crate::config::ModalConfig;
use crate::registry::ModalKey;
use crate::service::ModalService;
use crate::types::CloseMode;

pub const CONFIRM_NESTING_NOT_SUPPORTED: &str = "Cannot open a confirm modal from within a confirm modal. Enable bypass_self_check on the guard to allow it.";

/// Answer from a guard.
#[derive(Debug, Clone)]
pub enum CloseVerdict {
    Ready(bool),
    Eventual(Deferred<bool>),
}

impl CloseVerdict {
    /// Verdict taken from the first value `stream` emits.
    pub fn from_stream(stream: &Emitter<bool>) -> Self {
        Self::Eventual(Deferred::first_of(stream, |allowed| *allowed))
    }

    #[must_use]
    pub fn into_deferred(self) -> Deferred<bool> {
        match self {
            Self::Ready(allowed) => Deferred::resolved(allowed),
            Self::Eventual(deferred) => deferred,
        }
    }
}

impl From<bool> for CloseVerdict {
    fn from(allowed: bool) -> Self {
        Self::Ready(allowed)
    }
}

impl From<Deferred<bool>> for CloseVerdict {
    fn from(deferred: Deferred<bool>) -> Self {
        Self::Eventual(deferred)
    }
}

/// The close attempt a guard is asked about.
#[derive(Debug, Clone, Copy)]
pub struct GuardContext<'a> {
    service: &'a ModalService,
    key: ModalKey,
    content: TypeId,
    mode: CloseMode,
}

impl<'a> GuardContext<'a> {
    pub(crate) fn new(
        service: &'a ModalService,
        key: ModalKey,
        content: TypeId,
        mode: CloseMode,
    ) -> Self {
        Self {
            service,
            key,
            content,
            mode,
        }
    }

    #[must_use]
    pub fn service(&self) -> &'a ModalService {
        self.service
    }

    /// The modal being closed.
    #[must_use]
    pub fn key(&self) -> ModalKey {
        self.key
    }

    #[must_use]
    pub fn mode(&self) -> CloseMode {
        self.mode
    }

    /// Whether the modal being closed holds content of exactly type `C`.
    #[must_use]
    pub fn is<C: ModalComponent>(&self) -> bool {
        self.content == TypeId::of::<C>()
    }
}

/// Decides whether a modal may close.
pub trait CloseGuard {
    fn can_close(&self, ctx: &GuardContext<'_>) -> CloseVerdict;
}

impl<F> CloseGuard for F
where
    F: Fn(&GuardContext<'_>) -> CloseVerdict,
{
    fn can_close(&self, ctx: &GuardContext<'_>) -> CloseVerdict {
        self(ctx)
    }
}

/// Opens a confirmation modal of type `C` and allows the close only if that
/// modal is closed with [`CloseMode::Confirm`].
///
/// When the modal being closed is itself a `C`, no second confirmation is
/// opened and the close proceeds, unless `bypass_self_check` is set. Other
/// open `C` modals have no bearing on the verdict.
pub struct ConfirmCloseGuard<C: ModalComponent> {
    config: ModalConfig<C::Data>,
    bypass_self_check: bool,
    _content: PhantomData<fn() -> C>,
}

impl<C: ModalComponent> fmt::Debug for ConfirmCloseGuard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmCloseGuard")
            .field("component", &std::any::type_name::<C>())
            .field("config", &self.config)
            .field("bypass_self_check", &self.bypass_self_check)
            .finish()
    }
}

impl<C> ConfirmCloseGuard<C>
where
    C: ModalComponent,
    C::Data: Clone,
{
    #[must_use]
    pub fn new(config: ModalConfig<C::Data>) -> Self {
        Self {
            config,
            bypass_self_check: false,
            _content: PhantomData,
        }
    }

    /// Ask for confirmation even when the closing modal is itself a `C`.
    #[must_use]
    pub fn bypass_self_check(mut self, on: bool) -> Self {
        self.bypass_self_check = on;
        self
    }
}

impl<C> CloseGuard for ConfirmCloseGuard<C>
where
    C: ModalComponent,
    C::Data: Clone,
{
    fn can_close(&self, ctx: &GuardContext<'_>) -> CloseVerdict {
        let service = ctx.service();
        let warnings = !self.config.disable_console_warnings.unwrap_or(false)
            && !service.settings().disable_console_warnings;

        if !self.bypass_self_check && ctx.is::<C>() {
            if warnings {
                warn!(component = std::any::type_name::<C>(), "{CONFIRM_NESTING_NOT_SUPPORTED}");
            }
            return CloseVerdict::Ready(true);
        }

        match service.open::<C>(self.config.clone()) {
            Ok(confirm) => CloseVerdict::Eventual(Deferred::first_of(
                &confirm.after_closed(),
                |result| result.mode == CloseMode::Confirm,
            )),
            Err(err) => {
                if warnings {
                    warn!(error = %err, "confirmation modal failed to open; keeping modal open");
                }
                CloseVerdict::Ready(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_conversions() {
        assert!(matches!(CloseVerdict::from(true), CloseVerdict::Ready(true)));
        let d = Deferred::pending();
        let v = CloseVerdict::from(d.clone());
        let out = v.into_deferred();
        d.resolve(false);
        assert_eq!(out.value(), Some(false));
        assert_eq!(CloseVerdict::Ready(true).into_deferred().value(), Some(true));
    }

    #[test]
    fn stream_verdict_takes_first_value() {
        let stream = Emitter::new();
        let v = CloseVerdict::from_stream(&stream).into_deferred();
        stream.emit(&false);
        stream.emit(&true);
        assert_eq!(v.value(), Some(false));
    }
}
