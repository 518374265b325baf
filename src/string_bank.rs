//! Interning cache for repeated trace strings
//!
//! Command names repeat across millions of scheduler events. The bank hands out
//! a small `StringId` per distinct string so transitions stay `Copy`-sized.
//!
//! The bank is append-only and shared by every worker loading a trace: lookups
//! take a read lock, and only a first sighting of a string takes the write lock.

use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};

/// Stable handle for an interned string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringId(pub u32);

impl StringId {
    /// No string claimed
    pub const UNKNOWN: StringId = StringId(u32::MAX);

    pub fn is_unknown(self) -> bool {
        self == Self::UNKNOWN
    }

    /// True when both handles are known and differ
    pub fn conflicts_with(self, other: StringId) -> bool {
        !self.is_unknown() && !other.is_unknown() && self != other
    }
}

impl Default for StringId {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

#[derive(Debug, Default)]
struct Interned {
    ids: FnvHashMap<Arc<str>, StringId>,
    strings: Vec<Arc<str>>,
}

/// Thread-safe, append-only string interner
#[derive(Debug, Default)]
pub struct StringBank {
    inner: RwLock<Interned>,
}

impl StringBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the handle for `s`, allocating one on first sight.
    ///
    /// Equal strings always map to the same handle, including when two threads
    /// race to intern the same new string.
    pub fn intern(&self, s: &str) -> StringId {
        if let Some(id) = self
            .inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .ids
            .get(s)
        {
            return *id;
        }

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        // Another writer may have won the race between the two locks.
        if let Some(id) = inner.ids.get(s) {
            return *id;
        }
        let id = StringId(inner.strings.len() as u32);
        let shared: Arc<str> = Arc::from(s);
        inner.strings.push(Arc::clone(&shared));
        inner.ids.insert(shared, id);
        id
    }

    /// Resolve a handle back to its text; `None` for unknown or foreign handles.
    pub fn lookup(&self, id: StringId) -> Option<Arc<str>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .strings
            .get(id.0 as usize)
            .cloned()
    }

    /// Number of distinct strings interned so far
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .strings
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
