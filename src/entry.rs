//! Probe Entry Points
//!
//! The fixed surface an embedding host calls into. Each entry is a thin
//! round trip through the interop layer with an observable transformation
//! on top, so a host can verify every marshaling path end to end: scalars
//! come back decremented (booleans negated), text and text arrays come
//! back reversed, primitive arrays and byte matrices come back unchanged.
//!
//! Fallible entries return `Result`; whenever an entry returns `Err`, a
//! managed exception is pending so the host sees the failure on both
//! sides of the boundary.

use crate::config::BridgeConfig;
use crate::interop::except::{self, ExceptionKind};
use crate::interop::{fields, marshal, InteropError, InteropResult};
use crate::runtime::{names, JValue, ObjRef, Prim, RuntimeEnv};
use crate::syscall;

/// Names a probe failure to managed code if the lower layers have not
/// already done so.
fn ensure_raised<E: RuntimeEnv>(env: &E, err: InteropError) -> InteropError {
    if !env.exception_pending() {
        except::raise(env, ExceptionKind::Internal, &err.to_string());
    }
    err
}

pub fn negate_bool(v: bool) -> bool {
    !v
}

pub fn decrement_i8(v: i8) -> i8 {
    v.wrapping_sub(1)
}

pub fn decrement_i16(v: i16) -> i16 {
    v.wrapping_sub(1)
}

pub fn decrement_i32(v: i32) -> i32 {
    v.wrapping_sub(1)
}

pub fn decrement_i64(v: i64) -> i64 {
    v.wrapping_sub(1)
}

pub fn decrement_f32(v: f32) -> f32 {
    v - 1.0
}

pub fn decrement_f64(v: f64) -> f64 {
    v - 1.0
}

/// Marshal a managed string to native text under the configured default
/// encoding, reverse its characters, and marshal it back. Drained
/// callback exceptions have their message text resolved only when the
/// diagnostics configuration asks for it.
pub fn reverse_string<E: RuntimeEnv>(
    env: &E,
    config: &BridgeConfig,
    s: ObjRef,
) -> InteropResult<ObjRef> {
    let tag = &config.marshal.default_encoding;
    let print = config.diagnostics.print_exception_messages;
    let text =
        marshal::to_native_string_inner(env, s, tag, print).map_err(|e| ensure_raised(env, e))?;
    let reversed: String = text.chars().rev().collect();
    marshal::to_managed_string_inner(env, &reversed, tag, print)
        .map_err(|e| ensure_raised(env, e))
}

/// [`reverse_string`] under an explicit encoding tag.
pub fn reverse_string_with_encoding<E: RuntimeEnv>(
    env: &E,
    s: ObjRef,
    tag: &str,
) -> InteropResult<ObjRef> {
    let text = marshal::to_native_string_with_encoding(env, s, tag)
        .map_err(|e| ensure_raised(env, e))?;
    let reversed: String = text.chars().rev().collect();
    marshal::to_managed_string_with_encoding(env, &reversed, tag)
        .map_err(|e| ensure_raised(env, e))
}

/// Marshal a managed primitive array out and back. The result is a fresh
/// array with identical contents.
pub fn round_trip_array<T: Prim, E: RuntimeEnv>(env: &E, arr: ObjRef) -> InteropResult<ObjRef> {
    let native = marshal::to_native_array::<T, E>(env, arr).map_err(|e| ensure_raised(env, e))?;
    marshal::to_managed_array::<T, E>(env, &native).map_err(|e| ensure_raised(env, e))
}

/// Marshal a managed string array out, reverse each element's characters,
/// and marshal the results back in index order.
pub fn reverse_string_array<E: RuntimeEnv>(
    env: &E,
    config: &BridgeConfig,
    arr: ObjRef,
) -> InteropResult<ObjRef> {
    let tag = &config.marshal.default_encoding;
    let print = config.diagnostics.print_exception_messages;
    let mut values = marshal::to_native_string_array_inner(env, arr, tag, print)
        .map_err(|e| ensure_raised(env, e))?;
    for value in &mut values {
        *value = value.chars().rev().collect();
    }
    marshal::to_managed_string_array_inner(env, &values, tag, print)
        .map_err(|e| ensure_raised(env, e))
}

/// Marshal a managed 2-D byte array out and back, preserving row lengths.
/// Ragged inputs round-trip as-is.
pub fn round_trip_byte_matrix<E: RuntimeEnv>(env: &E, arr: ObjRef) -> InteropResult<ObjRef> {
    let rows = marshal::to_native_byte_matrix(env, arr).map_err(|e| ensure_raised(env, e))?;
    marshal::to_managed_byte_matrix(env, &rows).map_err(|e| ensure_raised(env, e))
}

/// Leave an exception of the given kind pending, exercising the raise
/// path. Returns true once the exception is pending.
pub fn raise_probe<E: RuntimeEnv>(env: &E, kind: ExceptionKind, message: &str) -> bool {
    except::raise(env, kind, message)
}

/// Read the `_x`/`_y` integer fields of a point-like object and construct
/// a new instance of the same class with both decremented.
pub fn decrement_point<E: RuntimeEnv>(env: &E, obj: ObjRef) -> InteropResult<ObjRef> {
    if obj.is_null() {
        except::raise(env, ExceptionKind::NullPointer, "decrement_point: null object");
        return Err(InteropError::InvalidHandle);
    }
    let class = env.object_class(obj);
    let class_label = env.describe_class(class);

    let x: i32 = fields::get_scalar_field(env, class, obj, "_x");
    let y: i32 = fields::get_scalar_field(env, class, obj, "_y");
    if env.exception_pending() {
        return Err(InteropError::FieldResolution {
            class: class_label,
            field: "_x/_y".to_string(),
        });
    }

    let ctor = env.method_id(class, names::CTOR, "(II)V");
    if !crate::interop::check::check_method(env, &class_label, names::CTOR) || ctor.is_null() {
        let err = InteropError::MethodResolution {
            class: class_label,
            method: names::CTOR.to_string(),
        };
        return Err(ensure_raised(env, err));
    }

    let out = env.new_object(class, ctor, &[JValue::I32(x - 1), JValue::I32(y - 1)]);
    if out.is_null() {
        let err = InteropError::AllocationFailed(class_label);
        return Err(ensure_raised(env, err));
    }
    Ok(out)
}

pub use crate::syscall::{malloc_stats, mallopt, mtrace, muntrace};

/// Lock memory into RAM, using the checked variant when the configuration
/// asks for raised failures.
pub fn lock_memory<E: RuntimeEnv>(env: &E, config: &BridgeConfig, flags: i32) -> i32 {
    if config.syscalls.checked {
        syscall::mlockall_checked(env, flags)
    } else {
        syscall::mlockall(flags)
    }
}

/// Counterpart of [`lock_memory`].
pub fn unlock_memory<E: RuntimeEnv>(env: &E, config: &BridgeConfig) -> i32 {
    if config.syscalls.checked {
        syscall::munlockall_checked(env)
    } else {
        syscall::munlockall()
    }
}
