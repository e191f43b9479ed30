#![forbid(unsafe_code)]

//! Small value types shared across the modal crate.

use std::fmt;
use std::str::FromStr;

/// Positional variant of a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "settings-file", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "settings-file", serde(rename_all = "kebab-case"))]
pub enum ModalLayout {
    #[default]
    Center,
    Left,
    Right,
    BottomSheet,
}

/// Structural container a layout renders into. Moving between families
/// requires detaching and reattaching the content view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutFamily {
    Centered,
    Side,
}

impl ModalLayout {
    #[must_use]
    pub const fn family(self) -> LayoutFamily {
        match self {
            Self::Left | Self::Right => LayoutFamily::Side,
            Self::Center | Self::BottomSheet => LayoutFamily::Centered,
        }
    }

    #[must_use]
    pub const fn is_side(self) -> bool {
        matches!(self.family(), LayoutFamily::Side)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Left => "left",
            Self::Right => "right",
            Self::BottomSheet => "bottom-sheet",
        }
    }
}

impl fmt::Display for ModalLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModalLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center" => Ok(Self::Center),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "bottom-sheet" => Ok(Self::BottomSheet),
            other => Err(format!("unknown modal layout `{other}`")),
        }
    }
}

/// How a modal was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CloseMode {
    Confirm,
    #[default]
    Cancel,
}

/// Lifecycle state. Ordered so that a legal transition always moves to a
/// strictly greater value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModalState {
    Opening,
    Open,
    Closing,
    Closed,
}

impl ModalState {
    /// Whether `next` is the immediate successor of `self`.
    #[must_use]
    pub const fn can_advance_to(self, next: ModalState) -> bool {
        matches!(
            (self, next),
            (Self::Opening, Self::Open) | (Self::Open, Self::Closing) | (Self::Closing, Self::Closed)
        )
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// Outcome delivered once through `after_closed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseResult<R> {
    pub mode: CloseMode,
    pub data: Option<R>,
}

impl<R> CloseResult<R> {
    #[must_use]
    pub const fn cancelled() -> Self {
        Self {
            mode: CloseMode::Cancel,
            data: None,
        }
    }

    #[must_use]
    pub const fn confirmed(data: Option<R>) -> Self {
        Self {
            mode: CloseMode::Confirm,
            data,
        }
    }

    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.mode == CloseMode::Confirm
    }
}
