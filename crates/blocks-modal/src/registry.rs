#![forbid(unsafe_code)]

//! Registry of open modals, in opening (z) order.
//!
//! Entries are keyed by instance identity ([`ModalKey`]), never by the
//! user-facing config id. Each entry keeps a type-erased handle for
//! lifecycle operations and an `Rc<dyn Any>` for typed retrieval.
//!
//! # Invariants
//!
//! - Entries are ordered by z-index, lowest first.
//! - `next_z_index()` is strictly greater than every z-index still
//!   registered. The counter restarts once the registry empties and
//!   saturates instead of overflowing.
//! - A key appears at most once.
//!
//! # Failure Modes
//!
//! - `remove()` of an unknown key returns `false`.
//! - Typed lookups of the wrong content type are reported by the service as
//!   `ModalError::TypeMismatch`; the registry itself only compares `TypeId`s.

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use blocks_core::id;

/// Base z-index for the modal layer.
const BASE_MODAL_Z: u32 = 1000;

/// Gap between stacked modals (room for backdrop and chrome layers).
const Z_INCREMENT: u32 = 10;

/// Identity of one modal instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModalKey(u64);

impl ModalKey {
    pub(crate) fn next() -> Self {
        Self(id::next_id())
    }

    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ModalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "modal#{}", self.0)
    }
}

/// Lifecycle operations the service needs without knowing the content type.
pub(crate) trait ErasedModal {
    fn key(&self) -> ModalKey;
    fn disable_close_on_navigation(&self) -> bool;
    /// Forced cancel close, bypassing guards and `disable_close`.
    fn force_cancel(&self);
    /// Advance the close-delay timer. Returns true once teardown ran.
    fn tick(&self, elapsed: Duration) -> bool;
}

pub(crate) struct Entry {
    pub(crate) key: ModalKey,
    pub(crate) z_index: u32,
    pub(crate) content_type: TypeId,
    pub(crate) content_type_name: &'static str,
    pub(crate) handle: Rc<dyn ErasedModal>,
    pub(crate) typed: Rc<dyn Any>,
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("z_index", &self.z_index)
            .field("content", &self.content_type_name)
            .finish()
    }
}

#[derive(Debug)]
pub(crate) struct ModalRegistry {
    entries: Vec<Entry>,
    next_z: u32,
}

impl Default for ModalRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModalRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_z: 0,
        }
    }

    /// Reserve the z-index for the next modal.
    pub(crate) fn next_z_index(&mut self) -> u32 {
        let z = BASE_MODAL_Z.saturating_add(self.next_z);
        self.next_z = self.next_z.saturating_add(Z_INCREMENT);
        z
    }

    pub(crate) fn insert(&mut self, entry: Entry) {
        if self.contains(entry.key) {
            return;
        }
        let at = self
            .entries
            .iter()
            .position(|e| e.z_index > entry.z_index)
            .unwrap_or(self.entries.len());
        self.entries.insert(at, entry);
    }

    pub(crate) fn remove(&mut self, key: ModalKey) -> bool {
        match self.entries.iter().position(|e| e.key == key) {
            Some(idx) => {
                self.entries.remove(idx);
                if self.is_empty() {
                    self.next_z = 0;
                }
                true
            }
            None => false,
        }
    }

    pub(crate) fn contains(&self, key: ModalKey) -> bool {
        self.entries.iter().any(|e| e.key == key)
    }

    pub(crate) fn contains_type(&self, ty: TypeId) -> bool {
        self.entries.iter().any(|e| e.content_type == ty)
    }

    pub(crate) fn get(&self, key: ModalKey) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }

    /// Keys of entries holding content of type `ty`, bottom to top.
    pub(crate) fn keys_of_type(&self, ty: TypeId) -> Vec<ModalKey> {
        self.entries
            .iter()
            .filter(|e| e.content_type == ty)
            .map(|e| e.key)
            .collect()
    }

    /// Handles in z-order, detached from the registry borrow.
    pub(crate) fn snapshot(&self) -> Vec<Rc<dyn ErasedModal>> {
        self.entries.iter().map(|e| Rc::clone(&e.handle)).collect()
    }

    pub(crate) fn keys(&self) -> Vec<ModalKey> {
        self.entries.iter().map(|e| e.key).collect()
    }

    pub(crate) fn top_key(&self) -> Option<ModalKey> {
        self.entries.last().map(|e| e.key)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
