#![forbid(unsafe_code)]

//! Per-toast state: visibility, auto-close timer, exit animation and swipe.
//!
//! ```text
//!   shown ──(duration elapses | swipe dismiss | dismiss())──▶ hidden
//!   hidden ──(exit animation, 300 ms when animated)──▶ close
//! ```
//!
//! # Invariants
//!
//! 1. [`ToastTick::Close`] is produced at most once.
//! 2. The auto-close timer does not run while a pointer is down.
//! 3. A swipe only moves the toast toward its anchored edge.

use std::time::Duration;

use blocks_core::{PointerEvent, PointerPhase};

use crate::config::ResolvedToastConfig;

/// Exit animation length when animated.
pub const EXIT_ANIMATION: Duration = Duration::from_millis(300);

/// Release velocity (px/ms) that dismisses regardless of distance.
pub const TOAST_SWIPE_VELOCITY: f64 = 0.3;

/// Result of advancing time or hiding a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastTick {
    Idle,
    /// The toast became hidden; the exit animation is running.
    Hidden,
    /// The toast is done and its ref should close.
    Close,
}

/// Result of a pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastGesture {
    Idle,
    Dragging(f64),
    SnapBack,
    Dismiss,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    y: f64,
    at: Duration,
    limit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToastCore {
    config: ResolvedToastConfig,
    visible: bool,
    translate_y: f64,
    swipe_finished: bool,
    auto_close: Option<Duration>,
    exit: Option<Duration>,
    drag: Option<Drag>,
    emitted_close: bool,
}

impl ToastCore {
    /// A visible toast with its auto-close timer armed.
    #[must_use]
    pub fn new(config: ResolvedToastConfig) -> Self {
        let auto_close = config.auto_closes().then_some(config.duration);
        Self {
            config,
            visible: true,
            translate_y: 0.0,
            swipe_finished: false,
            auto_close,
            exit: None,
            drag: None,
            emitted_close: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ResolvedToastConfig {
        &self.config
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn translate_y(&self) -> f64 {
        self.translate_y
    }

    /// Whether the toast is sliding off-screen.
    #[must_use]
    pub fn is_leaving(&self) -> bool {
        self.swipe_finished
    }

    #[must_use]
    pub fn auto_close_remaining(&self) -> Option<Duration> {
        self.auto_close
    }

    /// Hide the toast and start the exit animation.
    pub fn hide(&mut self) -> ToastTick {
        if !self.visible {
            return ToastTick::Idle;
        }
        self.visible = false;
        self.swipe_finished = true;
        self.auto_close = None;
        self.drag = None;
        if self.config.animate {
            self.exit = Some(EXIT_ANIMATION);
            ToastTick::Hidden
        } else {
            self.take_close()
        }
    }

    pub fn advance(&mut self, elapsed: Duration) -> ToastTick {
        if let Some(remaining) = self.exit {
            if elapsed >= remaining {
                self.exit = None;
                return self.take_close();
            }
            self.exit = Some(remaining - elapsed);
            return ToastTick::Idle;
        }
        if self.drag.is_some() {
            return ToastTick::Idle;
        }
        match self.auto_close {
            Some(remaining) if elapsed >= remaining => self.hide(),
            Some(remaining) => {
                self.auto_close = Some(remaining - elapsed);
                ToastTick::Idle
            }
            None => ToastTick::Idle,
        }
    }

    /// Feed a pointer sample. `height` is the rendered toast height in px.
    pub fn handle_pointer(&mut self, event: PointerEvent, height: f64) -> ToastGesture {
        if !self.config.swipe_to_dismiss || !self.visible {
            return ToastGesture::Idle;
        }
        let is_top = self.config.position.is_top();
        match event.phase {
            PointerPhase::Down => {
                self.drag = Some(Drag {
                    y: event.y,
                    at: event.at,
                    limit: height / 3.0,
                });
                self.auto_close = None;
                ToastGesture::Dragging(self.translate_y)
            }
            PointerPhase::Move => {
                let Some(drag) = self.drag else {
                    return ToastGesture::Idle;
                };
                let current = event.y - drag.y;
                if (is_top && current < 0.0) || (!is_top && current > 0.0) {
                    self.translate_y = current;
                }
                ToastGesture::Dragging(self.translate_y)
            }
            PointerPhase::Up | PointerPhase::Cancel => {
                let Some(drag) = self.drag.take() else {
                    return ToastGesture::Idle;
                };
                let delta = event.y - drag.y;
                let ms = event.at.saturating_sub(drag.at).as_secs_f64() * 1000.0;
                let velocity = (delta / if ms > 0.0 { ms } else { 1.0 }).abs();
                let crossed = if is_top {
                    delta < -drag.limit
                } else {
                    delta > drag.limit
                };
                if crossed || velocity > TOAST_SWIPE_VELOCITY {
                    ToastGesture::Dismiss
                } else {
                    self.translate_y = 0.0;
                    if self.config.auto_closes() {
                        self.auto_close = Some(self.config.duration);
                    }
                    ToastGesture::SnapBack
                }
            }
        }
    }

    fn take_close(&mut self) -> ToastTick {
        if self.emitted_close {
            return ToastTick::Idle;
        }
        self.emitted_close = true;
        ToastTick::Close
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ToastConfig, ToastPosition, ToastrSettings};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn core(config: ToastConfig<()>) -> ToastCore {
        ToastCore::new(config.resolve(&ToastrSettings::default()).0)
    }

    #[test]
    fn auto_close_then_exit_animation() {
        let mut t = core(ToastConfig::new().duration(ms(1000)));
        assert_eq!(t.advance(ms(999)), ToastTick::Idle);
        assert_eq!(t.advance(ms(1)), ToastTick::Hidden);
        assert!(!t.is_visible());
        assert_eq!(t.advance(ms(299)), ToastTick::Idle);
        assert_eq!(t.advance(ms(1)), ToastTick::Close);
        assert_eq!(t.advance(ms(1000)), ToastTick::Idle);
    }

    #[test]
    fn unanimated_hide_closes_at_once() {
        let mut t = core(ToastConfig::new().animate(false));
        assert_eq!(t.hide(), ToastTick::Close);
        assert_eq!(t.hide(), ToastTick::Idle);
    }

    #[test]
    fn zero_duration_never_auto_closes() {
        let mut t = core(ToastConfig::new().duration(Duration::ZERO));
        assert_eq!(t.advance(ms(60_000)), ToastTick::Idle);
        assert!(t.is_visible());
    }

    #[test]
    fn pointer_down_pauses_and_snap_back_rearms() {
        let mut t = core(ToastConfig::new().duration(ms(1000)));
        t.advance(ms(900));
        t.handle_pointer(PointerEvent::down(50.0, ms(0)), 90.0);
        assert_eq!(t.advance(ms(5000)), ToastTick::Idle);

        let up = t.handle_pointer(PointerEvent::up(45.0, ms(1000)), 90.0);
        assert_eq!(up, ToastGesture::SnapBack);
        assert_eq!(t.auto_close_remaining(), Some(ms(1000)));
    }

    #[test]
    fn top_toast_swipes_up_only() {
        let mut t = core(ToastConfig::new());
        t.handle_pointer(PointerEvent::down(100.0, ms(0)), 90.0);
        assert_eq!(
            t.handle_pointer(PointerEvent::moved(140.0, ms(100)), 90.0),
            ToastGesture::Dragging(0.0)
        );
        assert_eq!(
            t.handle_pointer(PointerEvent::moved(80.0, ms(200)), 90.0),
            ToastGesture::Dragging(-20.0)
        );
        assert_eq!(
            t.handle_pointer(PointerEvent::up(60.0, ms(1000)), 90.0),
            ToastGesture::Dismiss
        );
    }

    #[test]
    fn bottom_toast_short_slow_swipe_snaps_back() {
        let mut t = core(ToastConfig::new().position(ToastPosition::BottomRight));
        t.handle_pointer(PointerEvent::down(100.0, ms(0)), 90.0);
        t.handle_pointer(PointerEvent::moved(120.0, ms(500)), 90.0);
        assert_eq!(t.translate_y(), 20.0);
        assert_eq!(
            t.handle_pointer(PointerEvent::up(120.0, ms(1000)), 90.0),
            ToastGesture::SnapBack
        );
        assert_eq!(t.translate_y(), 0.0);
    }

    #[test]
    fn fast_flick_dismisses() {
        let mut t = core(ToastConfig::new());
        t.handle_pointer(PointerEvent::down(100.0, ms(0)), 90.0);
        assert_eq!(
            t.handle_pointer(PointerEvent::up(90.0, ms(20)), 90.0),
            ToastGesture::Dismiss
        );
    }

    #[test]
    fn swipe_disabled_ignores_pointer() {
        let mut t = core(ToastConfig::new().swipe_to_dismiss(false));
        assert_eq!(
            t.handle_pointer(PointerEvent::down(0.0, ms(0)), 90.0),
            ToastGesture::Idle
        );
    }
}
