#![forbid(unsafe_code)]

//! Toast error types.

use thiserror::Error;

use crate::toast_ref::ToastId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToastrError {
    /// The toast was never shown or has already been finalized.
    #[error("no active toast with id {0}")]
    UnknownToast(ToastId),

    #[error("unknown toast position `{0}`")]
    UnknownPosition(String),
}
