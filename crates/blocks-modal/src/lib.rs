#![forbid(unsafe_code)]

//! Headless modal engine for Blocks.
//!
//! [`ModalService::open`] turns a [`ModalComponent`] plus a [`ModalConfig`]
//! into a live [`ModalRef`]. The service never draws; a registered
//! [`ModalHost`] receives [`ModalView`] descriptions and renders them.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! use blocks_modal::{
//!     ModalComponent, ModalConfig, ModalEnvironment, ModalHost, ModalKey, ModalService,
//!     ModalState, ModalView,
//! };
//!
//! struct Null;
//! impl ModalHost for Null {
//!     fn mount(&mut self, _: &ModalView) {}
//!     fn relayout(&mut self, _: &ModalView, _: bool) {}
//!     fn unmount(&mut self, _: ModalKey) {}
//! }
//!
//! struct Greeting;
//! impl ModalComponent for Greeting {
//!     type Data = String;
//!     type Output = bool;
//!     fn create(_: Option<String>) -> Self {
//!         Greeting
//!     }
//! }
//!
//! let service = ModalService::new(ModalEnvironment::default());
//! service.register_host(Rc::new(RefCell::new(Null)));
//!
//! let modal = service
//!     .open::<Greeting>(
//!         ModalConfig::new()
//!             .data(String::from("hi"))
//!             .close_delay(Duration::ZERO),
//!     )
//!     .expect("host registered");
//! assert_eq!(modal.state(), ModalState::Open);
//!
//! modal.confirm(true);
//! assert_eq!(modal.state(), ModalState::Closed);
//! assert_eq!(service.modals_count(), 0);
//! ```

pub mod component;
pub mod config;
pub mod container;
pub mod error;
pub mod guard;
pub mod host;
pub mod instance;
pub mod layout;
pub mod registry;
pub mod service;
pub mod sheet;
pub mod template;
pub mod types;

pub use component::ModalComponent;
pub use config::{
    AfterCloseHook, BottomSheetConfig, DEFAULT_CLOSE_DELAY, DEFAULT_DOWN_SWIPE_DIVISOR,
    GlobalSettings, ModalConfig, ResolvedConfig, SettingsPatch, StyleOptions,
};
pub use container::ModalContainer;
#[cfg(feature = "settings-file")]
pub use error::SettingsError;
pub use error::ModalError;
pub use guard::{CloseGuard, CloseVerdict, ConfirmCloseGuard, GuardContext};
pub use host::{ModalHost, ModalView};
pub use instance::ModalRef;
pub use layout::{BreakpointOverrides, ContentSlot, LayoutTransition, needs_reattach};
pub use registry::ModalKey;
pub use service::{ModalEnvironment, ModalService};
pub use sheet::{SWIPE_VELOCITY_THRESHOLD, SheetGesture, SheetOutcome};
pub use template::{Template, TemplateTarget, attach_footer, attach_header};
pub use types::{CloseMode, CloseResult, LayoutFamily, ModalLayout, ModalState};
