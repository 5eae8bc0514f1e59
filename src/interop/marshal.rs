//! Type Marshaling Layer
//!
//! Conversions between managed values and native memory. Every routine is
//! a single synchronous pass: pull the data out of managed-owned storage
//! into a fresh native buffer, or populate a newly allocated managed
//! object from a native buffer. Nothing native outlives the call.
//!
//! Text crosses the boundary through the managed text type's own
//! encode/decode operations, so the managed side stays authoritative for
//! its representation; the native side interprets the resulting bytes
//! under the same encoding tag. Round-trip law: decoding what was encoded
//! under tag `E` yields the original text, for any supported `E`.
//!
//! Primitive arrays use one generic routine per direction, parameterized
//! over [`Prim`]; element `i` of the native buffer maps to element `i` of
//! the managed array in both directions.

use super::{check, except, InteropError, InteropResult};
use crate::encoding;
use crate::runtime::{names, JValue, ObjRef, Prim, RuntimeEnv};

pub use crate::encoding::DEFAULT_ENCODING;

/// Copy a managed string into native text under the default encoding.
pub fn to_native_string<E: RuntimeEnv>(env: &E, s: ObjRef) -> InteropResult<String> {
    to_native_string_with_encoding(env, s, DEFAULT_ENCODING)
}

/// Copy a managed string into native text under an explicit encoding tag.
///
/// Invokes the managed text type's encode-to-bytes operation (a callback
/// into managed code that can raise and is drained here), then copies the
/// byte array out and interprets it under the same tag.
pub fn to_native_string_with_encoding<E: RuntimeEnv>(
    env: &E,
    s: ObjRef,
    tag: &str,
) -> InteropResult<String> {
    to_native_string_inner(env, s, tag, true)
}

/// Drain-aware core of the decode path. `print_messages` controls whether
/// a drained callback exception also has its message text resolved and
/// logged; entry points thread the configured value through here.
pub(crate) fn to_native_string_inner<E: RuntimeEnv>(
    env: &E,
    s: ObjRef,
    tag: &str,
    print_messages: bool,
) -> InteropResult<String> {
    if s.is_null() {
        return Err(InteropError::InvalidHandle);
    }
    if !encoding::is_supported(tag) {
        return Err(InteropError::UnsupportedEncoding(tag.to_string()));
    }

    let string_cls = env.find_class(names::STRING);
    if !check::check_class(env, names::STRING) || string_cls.is_null() {
        return Err(InteropError::ClassResolution(names::STRING.to_string()));
    }

    let get_bytes = env.method_id(string_cls, names::GET_BYTES, names::GET_BYTES_SIG);
    if !check::check_method(env, names::STRING, names::GET_BYTES) || get_bytes.is_null() {
        return Err(InteropError::MethodResolution {
            class: names::STRING.to_string(),
            method: names::GET_BYTES.to_string(),
        });
    }

    let tag_obj = env.new_string(tag);
    if tag_obj.is_null() {
        except::raise(
            env,
            except::ExceptionKind::OutOfMemory,
            "to_native_string: encoding tag allocation failed",
        );
        return Err(InteropError::AllocationFailed("encoding tag".to_string()));
    }

    let bytes_arr = env.call_object_method(s, get_bytes, &[JValue::Obj(tag_obj)]);
    if except::drain_pending(env, print_messages) {
        return Err(InteropError::ManagedException("text encode"));
    }
    if bytes_arr.is_null() {
        return Err(InteropError::InvalidHandle);
    }

    let signed = to_native_array::<i8, E>(env, bytes_arr)?;
    let raw: Vec<u8> = signed.iter().map(|&b| b as u8).collect();
    encoding::decode(&raw, tag).ok_or_else(|| InteropError::UnsupportedEncoding(tag.to_string()))
}

/// Construct a managed string from native text under the default encoding.
pub fn to_managed_string<E: RuntimeEnv>(env: &E, text: &str) -> InteropResult<ObjRef> {
    to_managed_string_with_encoding(env, text, DEFAULT_ENCODING)
}

/// Construct a managed string from native text under an explicit encoding
/// tag: allocate a managed byte array, fill it, then invoke the managed
/// text type's construct-from-bytes constructor.
pub fn to_managed_string_with_encoding<E: RuntimeEnv>(
    env: &E,
    text: &str,
    tag: &str,
) -> InteropResult<ObjRef> {
    to_managed_string_inner(env, text, tag, true)
}

/// Drain-aware core of the encode path; see [`to_native_string_inner`].
pub(crate) fn to_managed_string_inner<E: RuntimeEnv>(
    env: &E,
    text: &str,
    tag: &str,
    print_messages: bool,
) -> InteropResult<ObjRef> {
    let raw = encoding::encode(text, tag)
        .ok_or_else(|| InteropError::UnsupportedEncoding(tag.to_string()))?;

    let string_cls = env.find_class(names::STRING);
    if !check::check_class(env, names::STRING) || string_cls.is_null() {
        return Err(InteropError::ClassResolution(names::STRING.to_string()));
    }

    let ctor = env.method_id(string_cls, names::CTOR, names::STRING_CTOR_SIG);
    if !check::check_method(env, names::STRING, names::CTOR) || ctor.is_null() {
        return Err(InteropError::MethodResolution {
            class: names::STRING.to_string(),
            method: names::CTOR.to_string(),
        });
    }

    let signed: Vec<i8> = raw.iter().map(|&b| b as i8).collect();
    let bytes_arr = to_managed_array::<i8, E>(env, &signed)?;

    let tag_obj = env.new_string(tag);
    if tag_obj.is_null() {
        except::raise(
            env,
            except::ExceptionKind::OutOfMemory,
            "to_managed_string: encoding tag allocation failed",
        );
        return Err(InteropError::AllocationFailed("encoding tag".to_string()));
    }

    let s = env.new_object(
        string_cls,
        ctor,
        &[JValue::Obj(bytes_arr), JValue::Obj(tag_obj)],
    );
    if except::drain_pending(env, print_messages) {
        return Err(InteropError::ManagedException("text decode"));
    }
    if s.is_null() {
        except::raise(
            env,
            except::ExceptionKind::OutOfMemory,
            "to_managed_string: string construction failed",
        );
        return Err(InteropError::AllocationFailed("managed string".to_string()));
    }
    Ok(s)
}

/// Copy a managed primitive array into a fresh native buffer. Read-only
/// extraction; the managed array is untouched.
pub fn to_native_array<T: Prim, E: RuntimeEnv>(env: &E, arr: ObjRef) -> InteropResult<Vec<T>> {
    if arr.is_null() {
        return Err(InteropError::InvalidHandle);
    }
    let len = env.array_len(arr);
    let mut out = Vec::with_capacity(len);
    if !env.prim_region::<T>(arr, &mut out) {
        return Err(InteropError::InvalidHandle);
    }
    Ok(out)
}

/// Allocate a managed primitive array and fill it from a native buffer in
/// one bulk region-set. On allocation denial, raises out-of-memory and
/// returns the error with exactly that one exception pending.
pub fn to_managed_array<T: Prim, E: RuntimeEnv>(env: &E, values: &[T]) -> InteropResult<ObjRef> {
    let arr = env.new_prim_array::<T>(values.len());
    if arr.is_null() {
        except::raise(
            env,
            except::ExceptionKind::OutOfMemory,
            &format!("to_managed_array: `{}` allocation failed", T::ARRAY_DESC),
        );
        return Err(InteropError::AllocationFailed(format!(
            "`{}` of length {}",
            T::ARRAY_DESC,
            values.len()
        )));
    }
    if !env.set_prim_region::<T>(arr, values) {
        return Err(InteropError::InvalidHandle);
    }
    Ok(arr)
}

/// Copy a managed string array into native text, element by element in
/// index order, under the default encoding.
pub fn to_native_string_array<E: RuntimeEnv>(env: &E, arr: ObjRef) -> InteropResult<Vec<String>> {
    to_native_string_array_with_encoding(env, arr, DEFAULT_ENCODING)
}

/// Copy a managed string array into native text under an explicit tag.
pub fn to_native_string_array_with_encoding<E: RuntimeEnv>(
    env: &E,
    arr: ObjRef,
    tag: &str,
) -> InteropResult<Vec<String>> {
    to_native_string_array_inner(env, arr, tag, true)
}

pub(crate) fn to_native_string_array_inner<E: RuntimeEnv>(
    env: &E,
    arr: ObjRef,
    tag: &str,
    print_messages: bool,
) -> InteropResult<Vec<String>> {
    if arr.is_null() {
        return Err(InteropError::InvalidHandle);
    }
    let len = env.array_len(arr);
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        let elem = env.object_element(arr, i);
        out.push(to_native_string_inner(env, elem, tag, print_messages)?);
    }
    Ok(out)
}

/// Construct a managed string array from native text under the default
/// encoding.
pub fn to_managed_string_array<E: RuntimeEnv>(
    env: &E,
    values: &[String],
) -> InteropResult<ObjRef> {
    to_managed_string_array_with_encoding(env, values, DEFAULT_ENCODING)
}

/// Construct a managed string array from native text under an explicit
/// tag, encoding and storing each element in index order.
pub fn to_managed_string_array_with_encoding<E: RuntimeEnv>(
    env: &E,
    values: &[String],
    tag: &str,
) -> InteropResult<ObjRef> {
    to_managed_string_array_inner(env, values, tag, true)
}

pub(crate) fn to_managed_string_array_inner<E: RuntimeEnv>(
    env: &E,
    values: &[String],
    tag: &str,
    print_messages: bool,
) -> InteropResult<ObjRef> {
    let string_cls = env.find_class(names::STRING);
    if !check::check_class(env, names::STRING) || string_cls.is_null() {
        return Err(InteropError::ClassResolution(names::STRING.to_string()));
    }

    let arr = env.new_object_array(string_cls, values.len());
    if arr.is_null() {
        except::raise(
            env,
            except::ExceptionKind::OutOfMemory,
            "to_managed_string_array: array allocation failed",
        );
        return Err(InteropError::AllocationFailed(
            "managed string array".to_string(),
        ));
    }

    for (i, value) in values.iter().enumerate() {
        let s = to_managed_string_inner(env, value, tag, print_messages)?;
        if !env.set_object_element(arr, i, s) {
            return Err(InteropError::InvalidHandle);
        }
    }
    Ok(arr)
}

/// Copy a managed 2-D byte array into nested native buffers. Ragged
/// inputs are permitted; no rectangularity check is performed.
pub fn to_native_byte_matrix<E: RuntimeEnv>(env: &E, arr: ObjRef) -> InteropResult<Vec<Vec<i8>>> {
    if arr.is_null() {
        return Err(InteropError::InvalidHandle);
    }
    let outer_len = env.array_len(arr);
    let mut out = Vec::with_capacity(outer_len);
    for i in 0..outer_len {
        let row = env.object_element(arr, i);
        out.push(to_native_array::<i8, E>(env, row)?);
    }
    Ok(out)
}

/// Construct a managed 2-D byte array from nested native buffers, each
/// row through the 1-D byte-array path.
pub fn to_managed_byte_matrix<E: RuntimeEnv>(
    env: &E,
    rows: &[Vec<i8>],
) -> InteropResult<ObjRef> {
    let byte_array_cls = env.find_class(names::BYTE_ARRAY);
    if !check::check_class(env, names::BYTE_ARRAY) || byte_array_cls.is_null() {
        return Err(InteropError::ClassResolution(names::BYTE_ARRAY.to_string()));
    }

    let arr = env.new_object_array(byte_array_cls, rows.len());
    if arr.is_null() {
        except::raise(
            env,
            except::ExceptionKind::OutOfMemory,
            "to_managed_byte_matrix: outer array allocation failed",
        );
        return Err(InteropError::AllocationFailed(
            "managed byte matrix".to_string(),
        ));
    }

    for (i, row) in rows.iter().enumerate() {
        let managed_row = to_managed_array::<i8, E>(env, row)?;
        if !env.set_object_element(arr, i, managed_row) {
            return Err(InteropError::InvalidHandle);
        }
    }
    Ok(arr)
}
