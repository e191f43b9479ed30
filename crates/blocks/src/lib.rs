#![forbid(unsafe_code)]

//! Blocks public facade.
//!
//! Re-exports the member crates and a [`prelude`] with the types most
//! applications touch.
//!
//! - [`core`]: viewport, breakpoints, scroll lock, device and theme.
//! - [`modal`] (feature `modal`): modal service and handles.
//! - [`toastr`] (feature `toastr`): toast queue.

pub use blocks_core as core;
#[cfg(feature = "modal")]
pub use blocks_modal as modal;
#[cfg(feature = "toastr")]
pub use blocks_toastr as toastr;

pub mod prelude {
    pub use blocks_core::{
        Breakpoint, BreakpointTable, DeviceState, Dimensions, Emitter, Key, NavigationEnd,
        PointerEvent, ScrollLockCoordinator, Subscription, Theme, ThemeService, ViewportTracker,
    };

    #[cfg(feature = "modal")]
    pub use blocks_modal::{
        CloseGuard, CloseMode, CloseResult, CloseVerdict, ConfirmCloseGuard, GlobalSettings,
        GuardContext, ModalComponent, ModalConfig, ModalEnvironment, ModalError, ModalHost,
        ModalLayout, ModalRef, ModalService, ModalState, ModalView,
    };

    #[cfg(feature = "toastr")]
    pub use blocks_toastr::{
        ToastComponent, ToastConfig, ToastHost, ToastPosition, ToastRef, ToastView, ToastrService,
        ToastrSettings,
    };
}
