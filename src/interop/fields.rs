//! Primitive Field Accessor
//!
//! Typed scalar reads from managed object fields, resolved by name plus
//! the fixed signature character of the element type. A failed resolution
//! raises an internal-error exception naming the field; the read still
//! proceeds against the invalid handle and yields the runtime's value for
//! it: zero, for the in-memory runtime.

use super::{check, except};
use crate::runtime::{ClassRef, FieldScalar, ObjRef, RuntimeEnv};

/// Read a scalar field of type `T` from `obj`, resolving it on `class`
/// by `name`.
pub fn get_scalar_field<T, E>(env: &E, class: ClassRef, obj: ObjRef, name: &str) -> T
where
    T: FieldScalar,
    E: RuntimeEnv,
{
    let sig = T::SIG.to_string();
    let class_label = env.describe_class(class);
    let field = env.field_id(class, name, &sig);
    if !check::check_field(env, &class_label, name) || field.is_null() {
        except::raise(
            env,
            except::ExceptionKind::Internal,
            &format!("cannot resolve {sig} field for {name}"),
        );
    }
    T::from_value(&env.scalar_field(obj, field)).unwrap_or_default()
}
