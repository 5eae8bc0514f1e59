//! Pointer Box
//!
//! Associates a native resource with a managed proxy object through the
//! proxy's long-typed `nativePtr` field. The field never carries a raw
//! address: it carries an opaque [`NativeArena`] handle, and the arena
//! stays the sole owner of the resource. Mismatched get/set typing and
//! stale handles fail loudly at retrieval.
//!
//! The field itself is managed-object state and is not synchronized;
//! concurrent box/unbox on the same proxy must be serialized by the
//! caller.

use std::any::Any;

use super::{check, InteropError, InteropResult};
use crate::arena::{NativeArena, ResourceHandle};
use crate::runtime::{FieldRef, ObjRef, RuntimeEnv};

/// Name of the long field carrying the boxed handle.
pub const POINTER_FIELD: &str = "nativePtr";

const LONG_SIG: &str = "J";

/// Resolve the `nativePtr` field on the object's class.
pub fn pointer_field<E: RuntimeEnv>(env: &E, obj: ObjRef) -> InteropResult<FieldRef> {
    if obj.is_null() {
        return Err(InteropError::InvalidHandle);
    }
    let class = env.object_class(obj);
    let class_label = env.describe_class(class);
    let field = env.field_id(class, POINTER_FIELD, LONG_SIG);
    if !check::check_field(env, &class_label, POINTER_FIELD) || field.is_null() {
        return Err(InteropError::FieldResolution {
            class: class_label,
            field: POINTER_FIELD.to_string(),
        });
    }
    Ok(field)
}

/// Move `value` into the arena and store its handle in the proxy's
/// `nativePtr` field.
pub fn box_resource<T, E>(
    env: &E,
    arena: &NativeArena,
    obj: ObjRef,
    value: T,
) -> InteropResult<ResourceHandle>
where
    T: Any + Send + Sync,
    E: RuntimeEnv,
{
    let field = pointer_field(env, obj)?;
    let handle = arena.store(value);
    env.set_long_field(obj, field, handle as i64);
    Ok(handle)
}

/// The handle currently boxed in the proxy, without touching the arena.
pub fn boxed_handle<E: RuntimeEnv>(env: &E, obj: ObjRef) -> InteropResult<ResourceHandle> {
    let field = pointer_field(env, obj)?;
    Ok(env.long_field(obj, field) as ResourceHandle)
}

/// Run `f` against the resource boxed in the proxy.
pub fn with_resource<T, R, F, E>(
    env: &E,
    arena: &NativeArena,
    obj: ObjRef,
    f: F,
) -> InteropResult<R>
where
    T: Any + Send + Sync,
    F: FnOnce(&T) -> R,
    E: RuntimeEnv,
{
    let handle = boxed_handle(env, obj)?;
    Ok(arena.with::<T, R, F>(handle, f)?)
}

/// Mutating counterpart of [`with_resource`].
pub fn with_resource_mut<T, R, F, E>(
    env: &E,
    arena: &NativeArena,
    obj: ObjRef,
    f: F,
) -> InteropResult<R>
where
    T: Any + Send + Sync,
    F: FnOnce(&mut T) -> R,
    E: RuntimeEnv,
{
    let handle = boxed_handle(env, obj)?;
    Ok(arena.with_mut::<T, R, F>(handle, f)?)
}

/// Remove the resource from the arena, zero the proxy's field, and hand
/// ownership back. The proxy is unboxed afterwards.
pub fn unbox_resource<T, E>(env: &E, arena: &NativeArena, obj: ObjRef) -> InteropResult<T>
where
    T: Any + Send + Sync,
    E: RuntimeEnv,
{
    let field = pointer_field(env, obj)?;
    let handle = env.long_field(obj, field) as ResourceHandle;
    let value = arena.remove::<T>(handle)?;
    env.set_long_field(obj, field, 0);
    Ok(value)
}
