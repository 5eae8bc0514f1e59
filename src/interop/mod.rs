//! Interop Utility Layer
//!
//! Helper routines bridging managed-runtime values and native memory:
//!
//! - [`check`]: pending-exception inspection after reflective lookups
//! - [`except`]: raising and draining managed exceptions from native code
//! - [`fields`]: typed scalar field reads
//! - [`pointer`]: boxing native resources into managed proxy objects
//! - [`marshal`]: the type-marshaling core (text, primitive arrays, text
//!   arrays, nested byte arrays)
//!
//! # Failure policy
//!
//! One policy, applied everywhere: helpers return `Result` and nothing is
//! silently swallowed. A resolution failure is drained through the
//! condition checker and surfaces as [`InteropError`]; an allocation
//! failure additionally leaves exactly one out-of-memory exception pending
//! on the managed side. A helper that returns `Err` never hands back a
//! half-valid handle.

pub mod check;
pub mod except;
pub mod fields;
pub mod marshal;
pub mod pointer;


use thiserror::Error;

use crate::arena::ArenaError;

/// Error type for interop operations.
#[derive(Debug, Error)]
pub enum InteropError {
    /// A class lookup did not resolve.
    #[error("failed to resolve class `{0}`")]
    ClassResolution(String),

    /// A method lookup did not resolve.
    #[error("failed to resolve method `{method}` on `{class}`")]
    MethodResolution { class: String, method: String },

    /// A field lookup did not resolve.
    #[error("failed to resolve field `{field}` on `{class}`")]
    FieldResolution { class: String, field: String },

    /// The managed runtime denied an allocation. An out-of-memory
    /// exception is pending when this is returned.
    #[error("managed allocation failed: {0}")]
    AllocationFailed(String),

    /// A callback into managed code raised; the exception was drained
    /// before this error was produced.
    #[error("managed call raised an exception during {0}")]
    ManagedException(&'static str),

    /// A null or stale handle where a live one was required.
    #[error("handle is null or invalid")]
    InvalidHandle,

    /// The encoding tag names no codec this build carries.
    #[error("unsupported encoding `{0}`")]
    UnsupportedEncoding(String),

    /// A native-resource arena failure (stale handle, type mismatch).
    #[error(transparent)]
    Arena(#[from] ArenaError),
}

/// Result alias for interop operations.
pub type InteropResult<T> = Result<T, InteropError>;
