//! Native Resource Arena
//!
//! Sole owner of native resources associated with managed proxy objects.
//! Callers receive opaque `u64` handles; a handle is what gets stored in
//! the proxy's long field, never a raw address. Retrieval is checked
//! against the stored `TypeId`, so a get/set pair with mismatched types
//! fails loudly instead of misinterpreting memory.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use thiserror::Error;

/// Opaque handle to an arena-owned resource. Never zero.
pub type ResourceHandle = u64;

/// Error type for arena operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArenaError {
    /// The handle was never issued, or the resource was already removed.
    #[error("stale or unknown resource handle {0}")]
    StaleHandle(ResourceHandle),

    /// The resource exists but holds a different type.
    #[error("resource {handle} holds `{actual}`, requested `{requested}`")]
    TypeMismatch {
        handle: ResourceHandle,
        actual: &'static str,
        requested: &'static str,
    },
}

struct Slot {
    type_id: TypeId,
    type_name: &'static str,
    value: Box<dyn Any + Send + Sync>,
}

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

fn next_handle() -> ResourceHandle {
    NEXT_HANDLE.fetch_add(1, Ordering::Relaxed)
}

/// Table mapping opaque handles to natively-owned resources.
pub struct NativeArena {
    slots: RwLock<HashMap<ResourceHandle, Slot>>,
}

impl NativeArena {
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Take ownership of a resource and return its handle.
    pub fn store<T: Any + Send + Sync>(&self, value: T) -> ResourceHandle {
        let handle = next_handle();
        let mut slots = self.slots.write().unwrap();
        slots.insert(
            handle,
            Slot {
                type_id: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
                value: Box::new(value),
            },
        );
        handle
    }

    /// Run `f` against the resource behind `handle`.
    pub fn with<T, R, F>(&self, handle: ResourceHandle, f: F) -> Result<R, ArenaError>
    where
        T: Any + Send + Sync,
        F: FnOnce(&T) -> R,
    {
        let slots = self.slots.read().unwrap();
        let slot = slots.get(&handle).ok_or(ArenaError::StaleHandle(handle))?;
        let value = slot
            .value
            .downcast_ref::<T>()
            .ok_or(ArenaError::TypeMismatch {
                handle,
                actual: slot.type_name,
                requested: std::any::type_name::<T>(),
            })?;
        Ok(f(value))
    }

    /// Mutating counterpart of [`NativeArena::with`].
    pub fn with_mut<T, R, F>(&self, handle: ResourceHandle, f: F) -> Result<R, ArenaError>
    where
        T: Any + Send + Sync,
        F: FnOnce(&mut T) -> R,
    {
        let mut slots = self.slots.write().unwrap();
        let slot = slots
            .get_mut(&handle)
            .ok_or(ArenaError::StaleHandle(handle))?;
        let type_name = slot.type_name;
        let value = slot
            .value
            .downcast_mut::<T>()
            .ok_or(ArenaError::TypeMismatch {
                handle,
                actual: type_name,
                requested: std::any::type_name::<T>(),
            })?;
        Ok(f(value))
    }

    /// Remove the resource and hand ownership back to the caller. The
    /// handle is stale afterwards; a type mismatch leaves the resource in
    /// place.
    pub fn remove<T: Any + Send + Sync>(&self, handle: ResourceHandle) -> Result<T, ArenaError> {
        let mut slots = self.slots.write().unwrap();
        let slot = slots.get(&handle).ok_or(ArenaError::StaleHandle(handle))?;
        if slot.type_id != TypeId::of::<T>() {
            return Err(ArenaError::TypeMismatch {
                handle,
                actual: slot.type_name,
                requested: std::any::type_name::<T>(),
            });
        }
        let slot = slots.remove(&handle).ok_or(ArenaError::StaleHandle(handle))?;
        match slot.value.downcast::<T>() {
            Ok(boxed) => Ok(*boxed),
            Err(_) => Err(ArenaError::StaleHandle(handle)),
        }
    }

    /// True if the handle currently maps to a resource of any type.
    pub fn contains(&self, handle: ResourceHandle) -> bool {
        self.slots.read().unwrap().contains_key(&handle)
    }

    /// Number of live resources.
    pub fn len(&self) -> usize {
        self.slots.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every resource. Outstanding handles all become stale.
    pub fn clear(&self) {
        self.slots.write().unwrap().clear();
    }
}

impl Default for NativeArena {
    fn default() -> Self {
        Self::new()
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_ARENA: NativeArena = NativeArena::new();
}

/// Process-wide arena shared by callers that do not manage their own.
pub fn global() -> &'static NativeArena {
    &GLOBAL_ARENA
}
