#![forbid(unsafe_code)]

//! Modal error types.

use thiserror::Error;

/// Fatal misuse of the modal service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModalError {
    /// `open` was called before a render host was registered.
    #[error(
        "modal host not registered: call ModalService::register_host before opening a modal"
    )]
    HostNotRegistered,

    /// A registry entry holds a different content type than requested.
    #[error("the modal doesn't match the requested types (expected `{expected}`, found `{found}`)")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Failure loading global settings from a file or string.
#[cfg(feature = "settings-file")]
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML settings: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings failed validation: {}", .0.join("; "))]
    Validation(Vec<String>),
}
