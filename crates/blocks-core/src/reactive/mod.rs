#![forbid(unsafe_code)]

//! Single-threaded reactive primitives.
//!
//! - [`Observable`]: current value plus change notification.
//! - [`Emitter`]: discrete event stream with completion.
//! - [`Deferred`]: one-shot value that may resolve later.
//! - [`Binding`]: derived read-only view.
//! - [`Subscription`]: RAII guard shared by observables and emitters.
//!
//! Everything here is `Rc<RefCell<..>>` based. Listeners are held weakly by
//! their source and strongly by the returned [`Subscription`], and no
//! internal borrow is held while user callbacks run.

pub mod binding;
pub mod deferred;
pub mod emitter;
pub mod observable;

pub use binding::{Binding, bind_mapped};
pub use deferred::Deferred;
pub use emitter::Emitter;
pub use observable::{Observable, Subscription};
