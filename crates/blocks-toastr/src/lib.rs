#![forbid(unsafe_code)]

//! Headless toast notifications for Blocks.
//!
//! Toasts are queued through [`ToastrService`] and shown while fewer than
//! `max_opened` are active. Each toast auto-closes after its duration,
//! can be swiped toward its anchored edge, and reports its result once
//! through [`ToastRef::after_closed`].
//!
//! ```
//! use std::time::Duration;
//! use blocks_toastr::{ToastComponent, ToastConfig, ToastrService};
//!
//! struct Saved;
//!
//! impl ToastComponent for Saved {
//!     type Data = ();
//!     type Output = ();
//!
//!     fn create(_data: Option<()>) -> Self {
//!         Saved
//!     }
//! }
//!
//! let toastr = ToastrService::new();
//! let toast = toastr.queue_toast::<Saved>(ToastConfig::new().animate(false));
//! assert_eq!(toastr.active_count(), 1);
//!
//! toastr.advance(Duration::from_secs(5));
//! assert!(toast.is_closed());
//! assert_eq!(toastr.active_count(), 0);
//! ```

pub mod component;
pub mod config;
pub mod error;
pub mod host;
pub mod service;
pub mod toast_core;
pub mod toast_ref;

pub use component::ToastComponent;
pub use config::{
    DEFAULT_DURATION, DEFAULT_MAX_OPENED, ResolvedToastConfig, ToastConfig, ToastPosition,
    ToastrSettings, ToastrSettingsPatch,
};
pub use error::ToastrError;
pub use host::{ToastHost, ToastView};
pub use service::ToastrService;
pub use toast_core::{EXIT_ANIMATION, TOAST_SWIPE_VELOCITY, ToastCore, ToastGesture, ToastTick};
pub use toast_ref::{ToastId, ToastRef};
