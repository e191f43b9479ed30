#![forbid(unsafe_code)]

//! Read-only derived values over [`Observable`] sources.
//!
//! A [`Binding<T>`] re-evaluates its transform on every `get()`, so it never
//! returns a stale value. Viewport breakpoint flags are exposed this way.

use std::fmt;
use std::rc::Rc;

use super::observable::Observable;

/// Lazily evaluated view over one or more observables.
pub struct Binding<T> {
    eval: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            eval: Rc::clone(&self.eval),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding").field("value", &self.get()).finish()
    }
}

impl<T: 'static> Binding<T> {
    pub fn new(f: impl Fn() -> T + 'static) -> Self {
        Self { eval: Rc::new(f) }
    }

    #[must_use]
    pub fn get(&self) -> T {
        (self.eval)()
    }

    /// Compose a further transform.
    pub fn then<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Binding<U> {
        Binding {
            eval: Rc::new(move || f((self.eval)())),
        }
    }
}

/// Binding that reads `source` through `map`.
pub fn bind_mapped<S: Clone + PartialEq + 'static, T: 'static>(
    source: &Observable<S>,
    map: impl Fn(&S) -> T + 'static,
) -> Binding<T> {
    let source = source.clone();
    Binding::new(move || source.with(|v| map(v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapped_binding_tracks_source() {
        let width = Observable::new(500u32);
        let narrow = bind_mapped(&width, |w| *w < 768);
        assert!(narrow.get());
        width.set(1024);
        assert!(!narrow.get());
    }

    #[test]
    fn then_composes() {
        let n = Observable::new(2);
        let label = bind_mapped(&n, |v| v * 10).then(|v| format!("{v}px"));
        assert_eq!(label.get(), "20px");
    }
}
