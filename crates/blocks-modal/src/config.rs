#![forbid(unsafe_code)]

//! Modal configuration.
//!
//! Three layers:
//!
//! - [`GlobalSettings`]: process-wide defaults owned by the service.
//! - [`ModalConfig`]: per-call options. Every field is optional; `None`
//!   inherits the global default.
//! - [`ResolvedConfig`]: the merged, immutable value a container is built
//!   from. Produced once per `open`.
//!
//! With the `settings-file` feature, [`GlobalSettings`] can be loaded from
//! TOML or JSON:
//!
//! ```toml
//! layout = "right"
//! animate = false
//! close_delay_ms = 250
//! disable_close_on_navigation = true
//! ```

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use blocks_core::{Breakpoint, BreakpointTable, id};

use crate::guard::CloseGuard;
use crate::layout::BreakpointOverrides;
use crate::types::ModalLayout;

/// Close animation length used when no delay is configured.
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(175);

/// Divisor applied to the viewport height to get the swipe-dismiss distance.
pub const DEFAULT_DOWN_SWIPE_DIVISOR: f64 = 3.0;

/// Bottom-sheet tuning.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "settings-file", derive(serde::Serialize, serde::Deserialize))]
pub struct BottomSheetConfig {
    /// Viewport height is divided by this to get the dismiss distance.
    /// Values `<= 0` fall back to [`DEFAULT_DOWN_SWIPE_DIVISOR`].
    pub down_swipe_limit: Option<f64>,
    /// Fixed sheet height in pixels.
    pub custom_height: Option<u32>,
}

impl BottomSheetConfig {
    #[must_use]
    pub fn divisor(&self) -> f64 {
        match self.down_swipe_limit {
            Some(limit) if limit > 0.0 => limit,
            _ => DEFAULT_DOWN_SWIPE_DIVISOR,
        }
    }
}

/// Per-call style options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleOptions {
    pub layout: Option<ModalLayout>,
    pub breakpoints: Vec<(Breakpoint, ModalLayout)>,
    pub animate: Option<bool>,
    pub has_backdrop: Option<bool>,
    pub close_delay: Option<Duration>,
    pub show_close_button: Option<bool>,
    pub bottom_sheet: BottomSheetConfig,
    pub content_wrapper: Option<bool>,
    pub wrapper_classes: Option<String>,
    pub wrapper_styles: Option<String>,
    pub override_full_height: Option<bool>,
}

/// Hook run right before a closing modal is torn down.
pub type AfterCloseHook = Rc<dyn Fn()>;

/// Options for one `open` call.
///
/// `D` is the payload handed to the content component on creation.
pub struct ModalConfig<D> {
    pub data: Option<D>,
    pub style: StyleOptions,
    pub disable_close: Option<bool>,
    pub disable_close_on_backdrop_click: Option<bool>,
    pub disable_close_on_navigation: Option<bool>,
    pub close_guard: Option<Rc<dyn CloseGuard>>,
    pub close_guard_only_on_cancel: Option<bool>,
    pub after_close: Option<AfterCloseHook>,
    pub banner_text: Option<String>,
    pub content_classes: Option<String>,
    pub content_styles: Option<String>,
    pub enable_extreme_overflow_handling: Option<bool>,
    pub disable_console_warnings: Option<bool>,
    pub disable_console_info: Option<bool>,
    pub id: Option<String>,
}

impl<D> Default for ModalConfig<D> {
    fn default() -> Self {
        Self {
            data: None,
            style: StyleOptions::default(),
            disable_close: None,
            disable_close_on_backdrop_click: None,
            disable_close_on_navigation: None,
            close_guard: None,
            close_guard_only_on_cancel: None,
            after_close: None,
            banner_text: None,
            content_classes: None,
            content_styles: None,
            enable_extreme_overflow_handling: None,
            disable_console_warnings: None,
            disable_console_info: None,
            id: None,
        }
    }
}

impl<D: Clone> Clone for ModalConfig<D> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            style: self.style.clone(),
            disable_close: self.disable_close,
            disable_close_on_backdrop_click: self.disable_close_on_backdrop_click,
            disable_close_on_navigation: self.disable_close_on_navigation,
            close_guard: self.close_guard.clone(),
            close_guard_only_on_cancel: self.close_guard_only_on_cancel,
            after_close: self.after_close.clone(),
            banner_text: self.banner_text.clone(),
            content_classes: self.content_classes.clone(),
            content_styles: self.content_styles.clone(),
            enable_extreme_overflow_handling: self.enable_extreme_overflow_handling,
            disable_console_warnings: self.disable_console_warnings,
            disable_console_info: self.disable_console_info,
            id: self.id.clone(),
        }
    }
}

impl<D> fmt::Debug for ModalConfig<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalConfig")
            .field("id", &self.id)
            .field("has_data", &self.data.is_some())
            .field("style", &self.style)
            .field("disable_close", &self.disable_close)
            .field("has_close_guard", &self.close_guard.is_some())
            .field("banner_text", &self.banner_text)
            .finish_non_exhaustive()
    }
}

impl<D> ModalConfig<D> {
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
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn layout(mut self, layout: ModalLayout) -> Self {
        self.style.layout = Some(layout);
        self
    }

    /// Use `layout` at or below the width of `bp`.
    #[must_use]
    pub fn breakpoint(mut self, bp: Breakpoint, layout: ModalLayout) -> Self {
        self.style.breakpoints.push((bp, layout));
        self
    }

    #[must_use]
    pub fn animate(mut self, on: bool) -> Self {
        self.style.animate = Some(on);
        self
    }

    #[must_use]
    pub fn has_backdrop(mut self, on: bool) -> Self {
        self.style.has_backdrop = Some(on);
        self
    }

    #[must_use]
    pub fn close_delay(mut self, delay: Duration) -> Self {
        self.style.close_delay = Some(delay);
        self
    }

    #[must_use]
    pub fn show_close_button(mut self, on: bool) -> Self {
        self.style.show_close_button = Some(on);
        self
    }

    #[must_use]
    pub fn bottom_sheet(mut self, sheet: BottomSheetConfig) -> Self {
        self.style.bottom_sheet = sheet;
        self
    }

    #[must_use]
    pub fn style(mut self, style: StyleOptions) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn disable_close(mut self, on: bool) -> Self {
        self.disable_close = Some(on);
        self
    }

    #[must_use]
    pub fn disable_close_on_backdrop_click(mut self, on: bool) -> Self {
        self.disable_close_on_backdrop_click = Some(on);
        self
    }

    #[must_use]
    pub fn disable_close_on_navigation(mut self, on: bool) -> Self {
        self.disable_close_on_navigation = Some(on);
        self
    }

    #[must_use]
    pub fn close_guard(mut self, guard: impl CloseGuard + 'static) -> Self {
        self.close_guard = Some(Rc::new(guard));
        self
    }

    #[must_use]
    pub fn shared_close_guard(mut self, guard: Rc<dyn CloseGuard>) -> Self {
        self.close_guard = Some(guard);
        self
    }

    #[must_use]
    pub fn close_guard_only_on_cancel(mut self, on: bool) -> Self {
        self.close_guard_only_on_cancel = Some(on);
        self
    }

    #[must_use]
    pub fn after_close(mut self, hook: impl Fn() + 'static) -> Self {
        self.after_close = Some(Rc::new(hook));
        self
    }

    #[must_use]
    pub fn banner_text(mut self, text: impl Into<String>) -> Self {
        self.banner_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn content_classes(mut self, classes: impl Into<String>) -> Self {
        self.content_classes = Some(classes.into());
        self
    }

    #[must_use]
    pub fn enable_extreme_overflow_handling(mut self, on: bool) -> Self {
        self.enable_extreme_overflow_handling = Some(on);
        self
    }

    #[must_use]
    pub fn disable_console_warnings(mut self, on: bool) -> Self {
        self.disable_console_warnings = Some(on);
        self
    }

    #[must_use]
    pub fn disable_console_info(mut self, on: bool) -> Self {
        self.disable_console_info = Some(on);
        self
    }

    /// Merge over `settings`, split off the payload.
    pub fn resolve(
        self,
        settings: &GlobalSettings,
        table: &BreakpointTable,
    ) -> (ResolvedConfig, Option<D>) {
        let style = self.style;
        let resolved = ResolvedConfig {
            layout: style.layout.unwrap_or(settings.layout),
            breakpoints: BreakpointOverrides::new(&style.breakpoints, table),
            animate: style.animate.unwrap_or(settings.animate),
            has_backdrop: style.has_backdrop.unwrap_or(settings.has_backdrop),
            close_delay: style.close_delay.unwrap_or_else(|| settings.close_delay()),
            show_close_button: style.show_close_button.unwrap_or(settings.show_close_button),
            bottom_sheet: style.bottom_sheet,
            content_wrapper: style.content_wrapper.unwrap_or(settings.content_wrapper),
            wrapper_classes: style.wrapper_classes.unwrap_or_default(),
            wrapper_styles: style.wrapper_styles.unwrap_or_default(),
            override_full_height: style
                .override_full_height
                .unwrap_or(settings.override_full_height),
            disable_close: self.disable_close.unwrap_or(settings.disable_close),
            disable_close_on_backdrop_click: self
                .disable_close_on_backdrop_click
                .unwrap_or(settings.disable_close_on_backdrop_click),
            disable_close_on_navigation: self
                .disable_close_on_navigation
                .unwrap_or(settings.disable_close_on_navigation),
            close_guard: self.close_guard,
            close_guard_only_on_cancel: self
                .close_guard_only_on_cancel
                .unwrap_or(settings.close_guard_only_on_cancel),
            after_close: self.after_close,
            banner_text: self.banner_text.unwrap_or_default(),
            content_classes: self.content_classes.unwrap_or_default(),
            content_styles: self.content_styles.unwrap_or_default(),
            enable_extreme_overflow_handling: self.enable_extreme_overflow_handling.unwrap_or(false),
            disable_console_warnings: self
                .disable_console_warnings
                .unwrap_or(settings.disable_console_warnings),
            disable_console_info: self
                .disable_console_info
                .unwrap_or(settings.disable_console_info),
            id: self.id.unwrap_or_else(|| id::prefixed("blocks-modal")),
        };
        (resolved, self.data)
    }
}

/// Fully merged configuration. Never mutated after construction.
#[derive(Clone)]
pub struct ResolvedConfig {
    pub layout: ModalLayout,
    pub breakpoints: BreakpointOverrides,
    pub animate: bool,
    pub has_backdrop: bool,
    pub close_delay: Duration,
    pub show_close_button: bool,
    pub bottom_sheet: BottomSheetConfig,
    pub content_wrapper: bool,
    pub wrapper_classes: String,
    pub wrapper_styles: String,
    pub override_full_height: bool,
    pub disable_close: bool,
    pub disable_close_on_backdrop_click: bool,
    pub disable_close_on_navigation: bool,
    pub close_guard: Option<Rc<dyn CloseGuard>>,
    pub close_guard_only_on_cancel: bool,
    pub after_close: Option<AfterCloseHook>,
    pub banner_text: String,
    pub content_classes: String,
    pub content_styles: String,
    pub enable_extreme_overflow_handling: bool,
    pub disable_console_warnings: bool,
    pub disable_console_info: bool,
    pub id: String,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("id", &self.id)
            .field("layout", &self.layout)
            .field("breakpoints", &self.breakpoints)
            .field("has_backdrop", &self.has_backdrop)
            .field("close_delay", &self.close_delay)
            .field("disable_close", &self.disable_close)
            .field("has_close_guard", &self.close_guard.is_some())
            .field("close_guard_only_on_cancel", &self.close_guard_only_on_cancel)
            .finish_non_exhaustive()
    }
}

impl ResolvedConfig {
    /// Layout for a viewport `width`.
    #[must_use]
    pub fn layout_for(&self, width: u32) -> ModalLayout {
        self.breakpoints.resolve(self.layout, width)
    }

    /// Whether a banner row is rendered, given whether a header template
    /// has been supplied.
    #[must_use]
    pub fn has_banner(&self, has_header: bool) -> bool {
        !self.banner_text.is_empty()
            || (!self.disable_close && self.show_close_button && !has_header)
    }
}

/// Process-wide modal defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "settings-file", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "settings-file", serde(default))]
pub struct GlobalSettings {
    pub layout: ModalLayout,
    pub animate: bool,
    pub has_backdrop: bool,
    pub show_close_button: bool,
    pub content_wrapper: bool,
    pub override_full_height: bool,
    pub disable_close: bool,
    pub disable_close_on_backdrop_click: bool,
    pub disable_close_on_navigation: bool,
    pub close_guard_only_on_cancel: bool,
    pub disable_console_warnings: bool,
    pub disable_console_info: bool,
    pub close_delay_ms: u64,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            layout: ModalLayout::Center,
            animate: true,
            has_backdrop: true,
            show_close_button: true,
            content_wrapper: true,
            override_full_height: false,
            disable_close: false,
            disable_close_on_backdrop_click: false,
            disable_close_on_navigation: false,
            close_guard_only_on_cancel: true,
            disable_console_warnings: false,
            disable_console_info: false,
            close_delay_ms: millis(DEFAULT_CLOSE_DELAY),
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Partial update for [`GlobalSettings`]; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub layout: Option<ModalLayout>,
    pub animate: Option<bool>,
    pub has_backdrop: Option<bool>,
    pub show_close_button: Option<bool>,
    pub content_wrapper: Option<bool>,
    pub override_full_height: Option<bool>,
    pub disable_close: Option<bool>,
    pub disable_close_on_backdrop_click: Option<bool>,
    pub disable_close_on_navigation: Option<bool>,
    pub close_guard_only_on_cancel: Option<bool>,
    pub disable_console_warnings: Option<bool>,
    pub disable_console_info: Option<bool>,
    pub close_delay: Option<Duration>,
}

impl GlobalSettings {
    #[must_use]
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }

    /// Apply every field set in `patch`.
    pub fn apply(&mut self, patch: SettingsPatch) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(v) = value {
                *slot = v;
            }
        }
        set(&mut self.layout, patch.layout);
        set(&mut self.animate, patch.animate);
        set(&mut self.has_backdrop, patch.has_backdrop);
        set(&mut self.show_close_button, patch.show_close_button);
        set(&mut self.content_wrapper, patch.content_wrapper);
        set(&mut self.override_full_height, patch.override_full_height);
        set(&mut self.disable_close, patch.disable_close);
        set(
            &mut self.disable_close_on_backdrop_click,
            patch.disable_close_on_backdrop_click,
        );
        set(
            &mut self.disable_close_on_navigation,
            patch.disable_close_on_navigation,
        );
        set(
            &mut self.close_guard_only_on_cancel,
            patch.close_guard_only_on_cancel,
        );
        set(
            &mut self.disable_console_warnings,
            patch.disable_console_warnings,
        );
        set(&mut self.disable_console_info, patch.disable_console_info);
        set(
            &mut self.close_delay_ms,
            patch.close_delay.map(millis),
        );
    }

    /// Problems with these settings; empty when valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.close_delay_ms > 10_000 {
            problems.push(format!(
                "close_delay_ms {} exceeds the 10000 ms ceiling",
                self.close_delay_ms
            ));
        }
        if !self.has_backdrop && self.disable_close_on_backdrop_click {
            problems.push(
                "disable_close_on_backdrop_click has no effect without a backdrop".to_string(),
            );
        }
        problems
    }
}

#[cfg(feature = "settings-file")]
mod file {
    use std::path::Path;

    use super::GlobalSettings;
    use crate::error::SettingsError;

    impl GlobalSettings {
        pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
            let settings: Self = toml::from_str(s)?;
            settings.checked()
        }

        pub fn from_json_str(s: &str) -> Result<Self, SettingsError> {
            let settings: Self = serde_json::from_str(s)?;
            settings.checked()
        }

        /// Load from a `.toml` or `.json` file, chosen by extension.
        pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)?;
            match path.extension().and_then(|e| e.to_str()) {
                Some("json") => Self::from_json_str(&content),
                _ => Self::from_toml_str(&content),
            }
        }

        pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
            toml::to_string_pretty(self)
        }

        fn checked(self) -> Result<Self, SettingsError> {
            let problems = self.validate();
            if problems.is_empty() {
                Ok(self)
            } else {
                Err(SettingsError::Validation(problems))
            }
        }
    }
}
