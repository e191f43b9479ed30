#![forbid(unsafe_code)]

//! Bottom-sheet swipe-to-dismiss gesture.
//!
//! While a modal renders as a bottom sheet, vertical pointer drags move the
//! sheet. On release the gesture either dismisses (a long enough or fast
//! enough downward drag) or snaps back to rest.
//!
//! Dismiss when `delta_y > viewport_height / divisor`, or when the downward
//! velocity exceeds [`SWIPE_VELOCITY_THRESHOLD`] px/ms.

use std::time::Duration;

use blocks_core::{PointerEvent, PointerPhase};

/// Downward velocity (px/ms) that dismisses regardless of distance.
pub const SWIPE_VELOCITY_THRESHOLD: f64 = 0.5;

/// What the host should do after a pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetOutcome {
    /// Sample ignored (no drag in progress).
    Idle,
    /// Drag in progress; render the sheet at this offset.
    Dragging(f64),
    /// Released below the threshold; the offset is back at 0.
    SnapBack,
    /// Released past the threshold; the sheet should close.
    Dismiss,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragStart {
    y: f64,
    at: Duration,
}

/// Gesture state for one sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGesture {
    divisor: f64,
    start: Option<DragStart>,
    offset: f64,
    finished: bool,
}

impl SheetGesture {
    #[must_use]
    pub fn new(divisor: f64) -> Self {
        Self {
            divisor,
            start: None,
            offset: 0.0,
            finished: false,
        }
    }

    /// Feed a pointer sample. `viewport_height` scales the dismiss distance.
    pub fn handle(&mut self, event: PointerEvent, viewport_height: f64) -> SheetOutcome {
        if self.finished {
            return SheetOutcome::Idle;
        }
        match event.phase {
            PointerPhase::Down => {
                self.start = Some(DragStart {
                    y: event.y,
                    at: event.at,
                });
                SheetOutcome::Dragging(self.offset())
            }
            PointerPhase::Move => match self.start {
                Some(start) => {
                    self.offset = event.y - start.y;
                    SheetOutcome::Dragging(self.offset())
                }
                None => SheetOutcome::Idle,
            },
            PointerPhase::Up | PointerPhase::Cancel => {
                let Some(start) = self.start.take() else {
                    return SheetOutcome::Idle;
                };
                let delta = event.y - start.y;
                let elapsed_ms = event.at.saturating_sub(start.at).as_secs_f64() * 1000.0;
                let velocity = delta / elapsed_ms.max(1.0);
                let limit = viewport_height / self.divisor;
                if delta > limit || (velocity > SWIPE_VELOCITY_THRESHOLD && delta > 0.0) {
                    SheetOutcome::Dismiss
                } else {
                    self.offset = 0.0;
                    SheetOutcome::SnapBack
                }
            }
        }
    }

    /// Visible offset. Upward drags clamp to 0.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset.max(0.0)
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.start.is_some()
    }

    /// Drop any drag in progress and return to rest.
    pub fn reset(&mut self) {
        self.start = None;
        self.offset = 0.0;
    }

    /// Mark the sheet as leaving; further samples are ignored.
    pub fn finish(&mut self) {
        self.start = None;
        self.finished = true;
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn long_slow_drag_dismisses() {
        let mut g = SheetGesture::new(3.0);
        g.handle(PointerEvent::down(100.0, ms(0)), 900.0);
        assert_eq!(
            g.handle(PointerEvent::moved(350.0, ms(1000)), 900.0),
            SheetOutcome::Dragging(250.0)
        );
        assert_eq!(
            g.handle(PointerEvent::up(420.0, ms(2000)), 900.0),
            SheetOutcome::Dismiss
        );
    }

    #[test]
    fn short_fast_flick_dismisses() {
        let mut g = SheetGesture::new(3.0);
        g.handle(PointerEvent::down(100.0, ms(0)), 900.0);
        assert_eq!(
            g.handle(PointerEvent::up(160.0, ms(50)), 900.0),
            SheetOutcome::Dismiss
        );
    }

    #[test]
    fn short_slow_drag_snaps_back() {
        let mut g = SheetGesture::new(3.0);
        g.handle(PointerEvent::down(100.0, ms(0)), 900.0);
        g.handle(PointerEvent::moved(200.0, ms(500)), 900.0);
        assert_eq!(
            g.handle(PointerEvent::up(200.0, ms(1000)), 900.0),
            SheetOutcome::SnapBack
        );
        assert_eq!(g.offset(), 0.0);
    }

    #[test]
    fn upward_flick_never_dismisses() {
        let mut g = SheetGesture::new(3.0);
        g.handle(PointerEvent::down(500.0, ms(0)), 900.0);
        assert_eq!(
            g.handle(PointerEvent::moved(300.0, ms(10)), 900.0),
            SheetOutcome::Dragging(0.0)
        );
        assert_eq!(
            g.handle(PointerEvent::up(100.0, ms(20)), 900.0),
            SheetOutcome::SnapBack
        );
    }

    #[test]
    fn finished_sheet_ignores_input() {
        let mut g = SheetGesture::new(3.0);
        g.finish();
        assert_eq!(
            g.handle(PointerEvent::down(0.0, ms(0)), 900.0),
            SheetOutcome::Idle
        );
        assert!(g.is_finished());
    }

    #[test]
    fn move_without_down_is_idle() {
        let mut g = SheetGesture::new(3.0);
        assert_eq!(
            g.handle(PointerEvent::moved(10.0, ms(0)), 900.0),
            SheetOutcome::Idle
        );
    }
}
