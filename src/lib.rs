//! Bridgekit - Managed-Runtime Interop Utilities
//!
//! A utility layer for native code embedded in a managed runtime:
//! marshaling values across the boundary, policing the pending-exception
//! protocol, and owning native resources on behalf of managed proxy
//! objects.
//!
//! # Features
//!
//! - **Type marshaling**: text (with explicit encoding tags), primitive
//!   arrays of every supported width through one generic routine per
//!   direction, string arrays, and ragged 2-D byte arrays
//! - **Condition checking**: every reflective lookup is followed by a
//!   checker that drains the pending-exception flag and reports failure
//! - **Exception reporting**: raising managed exceptions from native
//!   code, and draining exceptions left behind by managed callbacks
//! - **Pointer boxing**: native resources live in a type-checked arena;
//!   managed proxies carry opaque handles, never raw addresses
//! - **System-call wrappers**: allocator introspection and memory locking,
//!   gnu/Linux only, no-ops elsewhere
//!
//! The runtime itself is reached only through the [`runtime::RuntimeEnv`]
//! capability trait; [`runtime::InMemoryRuntime`] is a complete in-process
//! implementation used by the tests and available to embedders.
//!
//! # Example
//!
//! ```rust
//! use bridgekit::interop::marshal;
//! use bridgekit::runtime::InMemoryRuntime;
//!
//! let env = InMemoryRuntime::new();
//!
//! // Native text in, managed string out, native text back.
//! let s = marshal::to_managed_string(&env, "boundary").unwrap();
//! let text = marshal::to_native_string(&env, s).unwrap();
//! assert_eq!(text, "boundary");
//!
//! // Primitive arrays round-trip through one generic routine.
//! let arr = marshal::to_managed_array::<i32, _>(&env, &[3, 1, 4, 1, 5]).unwrap();
//! let native = marshal::to_native_array::<i32, _>(&env, arr).unwrap();
//! assert_eq!(native, vec![3, 1, 4, 1, 5]);
//! ```
//!
//! # Failure policy
//!
//! One policy everywhere: fallible helpers return `Result`, resolution
//! failures are drained through the condition checker before surfacing,
//! and an allocation failure leaves exactly one out-of-memory exception
//! pending on the managed side.

pub mod arena;
pub mod config;
pub mod encoding;
pub mod entry;
pub mod interop;
pub mod runtime;
pub mod syscall;

pub use arena::{ArenaError, NativeArena, ResourceHandle};
pub use config::{BridgeConfig, ConfigError, ConfigResult};
pub use interop::except::ExceptionKind;
pub use interop::{InteropError, InteropResult};
pub use runtime::{
    ClassRef, FieldRef, InMemoryRuntime, JValue, MethodRef, ObjRef, Prim, PrimArray, RuntimeEnv,
};
