#![forbid(unsafe_code)]

//! Device and theme capabilities.
//!
//! [`DeviceState::detect`] classifies a user-agent string (plus the host's
//! touch-point count, which separates iPadOS from macOS) into [`DeviceFlags`]
//! and an operating system. [`ThemeService`] tracks the system color scheme
//! and an optional application-level override.

use bitflags::bitflags;

use crate::reactive::{Observable, Subscription};
use crate::viewport::Dimensions;

bitflags! {
    /// Device characteristics.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DeviceFlags: u16 {
        const DESKTOP        = 0b0000_0001;
        const MOBILE         = 0b0000_0010;
        const TABLET         = 0b0000_0100;
        const APPLE          = 0b0000_1000;
        const ANDROID        = 0b0001_0000;
        const WINDOWS        = 0b0010_0000;
        const LINUX_OR_UNIX  = 0b0100_0000;
        const UNKNOWN_MOBILE = 0b1000_0000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DesktopOs {
    Windows,
    MacOs,
    Linux,
    Unix,
    ChromeOs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MobileOs {
    Android,
    Ios,
    WindowsPhone,
    Unknown,
}

/// Detected device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceState {
    pub flags: DeviceFlags,
    pub desktop_os: Option<DesktopOs>,
    pub mobile_os: Option<MobileOs>,
}

impl DeviceState {
    /// Classify `user_agent`. `max_touch_points` is the host's reported
    /// touch capability (0 on most desktops).
    #[must_use]
    pub fn detect(user_agent: &str, max_touch_points: u32) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        let mut flags = DeviceFlags::empty();

        let ipad_as_mac = ua.contains("macintosh") && max_touch_points > 1;
        let tablet = ua.contains("ipad")
            || ipad_as_mac
            || ua.contains("tablet")
            || (ua.contains("android") && !ua.contains("mobile"));

        let mobile_os = if ua.contains("windows phone") {
            Some(MobileOs::WindowsPhone)
        } else if ua.contains("android") {
            Some(MobileOs::Android)
        } else if ua.contains("iphone") || ua.contains("ipad") || ua.contains("ipod") || ipad_as_mac
        {
            Some(MobileOs::Ios)
        } else if ua.contains("mobi") || tablet {
            Some(MobileOs::Unknown)
        } else {
            None
        };

        let desktop_os = if mobile_os.is_some() {
            None
        } else if ua.contains("windows") {
            Some(DesktopOs::Windows)
        } else if ua.contains("cros") {
            Some(DesktopOs::ChromeOs)
        } else if ua.contains("macintosh") || ua.contains("mac os") {
            Some(DesktopOs::MacOs)
        } else if ua.contains("linux") {
            Some(DesktopOs::Linux)
        } else if ua.contains("x11") || ua.contains("bsd") || ua.contains("sunos") {
            Some(DesktopOs::Unix)
        } else {
            None
        };

        match mobile_os {
            Some(os) => {
                flags |= if tablet {
                    DeviceFlags::TABLET
                } else {
                    DeviceFlags::MOBILE
                };
                match os {
                    MobileOs::Android => flags |= DeviceFlags::ANDROID,
                    MobileOs::Ios => flags |= DeviceFlags::APPLE,
                    MobileOs::WindowsPhone => flags |= DeviceFlags::WINDOWS,
                    MobileOs::Unknown => flags |= DeviceFlags::UNKNOWN_MOBILE,
                }
            }
            None => {
                flags |= DeviceFlags::DESKTOP;
                match desktop_os {
                    Some(DesktopOs::Windows) => flags |= DeviceFlags::WINDOWS,
                    Some(DesktopOs::MacOs) => flags |= DeviceFlags::APPLE,
                    Some(DesktopOs::Linux | DesktopOs::Unix | DesktopOs::ChromeOs) => {
                        flags |= DeviceFlags::LINUX_OR_UNIX;
                    }
                    None => {}
                }
            }
        }

        Self {
            flags,
            desktop_os,
            mobile_os,
        }
    }

    #[must_use]
    pub fn is_mobile(&self) -> bool {
        self.flags.contains(DeviceFlags::MOBILE)
    }

    #[must_use]
    pub fn is_tablet(&self) -> bool {
        self.flags.contains(DeviceFlags::TABLET)
    }

    #[must_use]
    pub fn is_desktop(&self) -> bool {
        self.flags.contains(DeviceFlags::DESKTOP)
    }

    #[must_use]
    pub fn is_landscape(dims: Dimensions) -> bool {
        dims.width > dims.height
    }

    #[must_use]
    pub fn is_portrait(dims: Dimensions) -> bool {
        !Self::is_landscape(dims)
    }
}

/// Light or dark color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn from_prefers_dark(dark: bool) -> Self {
        if dark { Self::Dark } else { Self::Light }
    }
}

/// System theme plus an optional application override.
#[derive(Debug, Clone)]
pub struct ThemeService {
    system: Observable<Theme>,
    application: Observable<Option<Theme>>,
}

impl ThemeService {
    #[must_use]
    pub fn new(system: Theme) -> Self {
        Self {
            system: Observable::new(system),
            application: Observable::new(None),
        }
    }

    /// Host reports a `prefers-color-scheme` change.
    pub fn set_system_theme(&self, theme: Theme) {
        self.system.set(theme);
    }

    pub fn set_application_theme(&self, theme: Theme) {
        self.application.set(Some(theme));
    }

    pub fn clear_application_theme(&self) {
        self.application.set(None);
    }

    #[must_use]
    pub fn system_theme(&self) -> Theme {
        self.system.get()
    }

    #[must_use]
    pub fn application_theme(&self) -> Option<Theme> {
        self.application.get()
    }

    /// Application override if set, else the system theme.
    #[must_use]
    pub fn effective(&self) -> Theme {
        self.application_theme().unwrap_or_else(|| self.system_theme())
    }

    pub fn on_system_change(&self, f: impl Fn(&Theme) + 'static) -> Subscription {
        self.system.subscribe(f)
    }

    /// Fires only for explicit application themes.
    pub fn on_application_change(&self, f: impl Fn(&Theme) + 'static) -> Subscription {
        self.application.subscribe(move |t| {
            if let Some(t) = t {
                f(t);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148";
    const PIXEL: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/120 Mobile Safari/537.36";
    const GALAXY_TAB: &str = "Mozilla/5.0 (Linux; Android 13; SM-X700) AppleWebKit/537.36 Chrome/120 Safari/537.36";
    const MAC: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/605.1.15 Safari/605.1.15";
    const WIN: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120 Safari/537.36";
    const LINUX: &str = "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/121.0";

    #[test]
    fn detects_phones_and_tablets() {
        let iphone = DeviceState::detect(IPHONE, 5);
        assert!(iphone.is_mobile());
        assert_eq!(iphone.mobile_os, Some(MobileOs::Ios));
        assert!(iphone.flags.contains(DeviceFlags::APPLE));

        let pixel = DeviceState::detect(PIXEL, 5);
        assert!(pixel.is_mobile());
        assert!(pixel.flags.contains(DeviceFlags::ANDROID));

        let tab = DeviceState::detect(GALAXY_TAB, 5);
        assert!(tab.is_tablet());
        assert!(!tab.is_mobile());
    }

    #[test]
    fn ipad_reporting_as_mac_is_tablet() {
        let ipad = DeviceState::detect(MAC, 5);
        assert!(ipad.is_tablet());
        assert_eq!(ipad.mobile_os, Some(MobileOs::Ios));

        let mac = DeviceState::detect(MAC, 0);
        assert!(mac.is_desktop());
        assert_eq!(mac.desktop_os, Some(DesktopOs::MacOs));
    }

    #[test]
    fn desktop_os_flags() {
        let win = DeviceState::detect(WIN, 0);
        assert!(win.flags.contains(DeviceFlags::DESKTOP | DeviceFlags::WINDOWS));
        let linux = DeviceState::detect(LINUX, 0);
        assert!(linux.flags.contains(DeviceFlags::LINUX_OR_UNIX));
    }

    #[test]
    fn orientation() {
        assert!(DeviceState::is_landscape(Dimensions::new(1200, 800)));
        assert!(DeviceState::is_portrait(Dimensions::new(400, 800)));
    }

    #[test]
    fn application_theme_overrides_system() {
        let themes = ThemeService::new(Theme::Light);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = themes.on_application_change(move |t| s.borrow_mut().push(*t));

        assert_eq!(themes.effective(), Theme::Light);
        themes.set_system_theme(Theme::Dark);
        assert_eq!(themes.effective(), Theme::Dark);
        themes.set_application_theme(Theme::Light);
        assert_eq!(themes.effective(), Theme::Light);
        themes.clear_application_theme();
        assert_eq!(themes.effective(), Theme::Dark);
        assert_eq!(*seen.borrow(), vec![Theme::Light]);
    }
}
