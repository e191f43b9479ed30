#![forbid(unsafe_code)]

//! Toast positions, per-call config and process-wide settings.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ToastrError;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);
pub const DEFAULT_MAX_OPENED: usize = 4;
pub const DEFAULT_WRAPPER_CLASS: &str = "default-wrapper";

/// Screen anchor for a toast stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToastPosition {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl ToastPosition {
    pub const ALL: [ToastPosition; 6] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    /// Top-anchored toasts swipe up to dismiss; bottom-anchored swipe down.
    #[must_use]
    pub const fn is_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopCenter | Self::TopRight)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for ToastPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToastPosition {
    type Err = ToastrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ToastrError::UnknownPosition(s.to_owned()))
    }
}

/// Per-call toast options. Unset fields fall back to [`ToastrSettings`].
#[derive(Debug, Clone)]
pub struct ToastConfig<D> {
    pub data: Option<D>,
    pub position: Option<ToastPosition>,
    pub wrapper_class: Option<String>,
    /// Auto-close delay. Zero disables auto-close.
    pub duration: Option<Duration>,
    pub swipe_to_dismiss: Option<bool>,
    pub animate: Option<bool>,
}

impl<D> Default for ToastConfig<D> {
    fn default() -> Self {
        Self {
            data: None,
            position: None,
            wrapper_class: None,
            duration: None,
            swipe_to_dismiss: None,
            animate: None,
        }
    }
}

impl<D> ToastConfig<D> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn data(mut self, data: D) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn position(mut self, position: ToastPosition) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn wrapper_class(mut self, class: impl Into<String>) -> Self {
        self.wrapper_class = Some(class.into());
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn swipe_to_dismiss(mut self, on: bool) -> Self {
        self.swipe_to_dismiss = Some(on);
        self
    }

    #[must_use]
    pub fn animate(mut self, on: bool) -> Self {
        self.animate = Some(on);
        self
    }

    /// Split into the payload and the options merged over `settings`.
    pub fn resolve(self, settings: &ToastrSettings) -> (ResolvedToastConfig, Option<D>) {
        let resolved = ResolvedToastConfig {
            position: self.position.unwrap_or(settings.position),
            animate: self.animate.unwrap_or(settings.animate),
            wrapper_class: self
                .wrapper_class
                .or_else(|| settings.wrapper_class.clone()),
            duration: self.duration.unwrap_or(settings.duration),
            swipe_to_dismiss: self.swipe_to_dismiss.unwrap_or(settings.swipe_to_dismiss),
        };
        (resolved, self.data)
    }
}

/// Options fixed for the lifetime of one toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToastConfig {
    pub position: ToastPosition,
    pub animate: bool,
    pub wrapper_class: Option<String>,
    pub duration: Duration,
    pub swipe_to_dismiss: bool,
}

impl ResolvedToastConfig {
    /// Class string for the wrapper: animation direction then wrapper class.
    #[must_use]
    pub fn wrapper_classes(&self) -> String {
        let dir = if self.position.is_top() {
            "anim-dir-top"
        } else {
            "anim-dir-bottom"
        };
        let class = self
            .wrapper_class
            .as_deref()
            .unwrap_or(DEFAULT_WRAPPER_CLASS);
        format!("{dir} {class}")
    }

    #[must_use]
    pub fn auto_closes(&self) -> bool {
        !self.duration.is_zero()
    }
}

/// Process-wide toast defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastrSettings {
    pub position: ToastPosition,
    pub animate: bool,
    pub wrapper_class: Option<String>,
    pub duration: Duration,
    pub swipe_to_dismiss: bool,
    /// Toasts shown at once; the rest wait in the queue.
    pub max_opened: usize,
}

impl Default for ToastrSettings {
    fn default() -> Self {
        Self {
            position: ToastPosition::TopRight,
            animate: true,
            wrapper_class: None,
            duration: DEFAULT_DURATION,
            swipe_to_dismiss: true,
            max_opened: DEFAULT_MAX_OPENED,
        }
    }
}

/// Partial update for [`ToastrSettings`]; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastrSettingsPatch {
    pub position: Option<ToastPosition>,
    pub animate: Option<bool>,
    pub wrapper_class: Option<String>,
    pub duration: Option<Duration>,
    pub swipe_to_dismiss: Option<bool>,
    pub max_opened: Option<usize>,
}

impl ToastrSettings {
    pub fn update(&mut self, patch: ToastrSettingsPatch) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }
        set(&mut self.position, patch.position);
        set(&mut self.animate, patch.animate);
        if patch.wrapper_class.is_some() {
            self.wrapper_class = patch.wrapper_class;
        }
        set(&mut self.duration, patch.duration);
        set(&mut self.swipe_to_dismiss, patch.swipe_to_dismiss);
        set(&mut self.max_opened, patch.max_opened);
    }

    /// Problems with these settings; empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.max_opened == 0 {
            problems.push("max_opened is 0: queued toasts will never show".to_string());
        }
        problems
    }
}
