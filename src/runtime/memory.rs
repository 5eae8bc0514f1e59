//! In-Memory Managed Runtime
//!
//! A complete [`RuntimeEnv`] implementation backed by plain tables. It
//! models the host-runtime contract the interop layer is written against:
//! failed lookups set the pending-exception flag and return invalid
//! handles, denied allocations return null without raising, and text
//! encoding happens on the managed side of the boundary.
//!
//! The runtime boots with the well-known classes of the calling convention
//! (the string type, the byte-array type, the exception classes). Tests
//! and embedders can define further classes, fields, and positional
//! constructors on top.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{debug, error};

use super::{names, ClassRef, FieldRef, JValue, MethodRef, ObjRef, Prim, PrimArray, RuntimeEnv};
use crate::encoding;

#[derive(Debug, Clone)]
enum MethodKind {
    /// `String.getBytes(String)`: encode receiver text under a tag.
    StringGetBytes,
    /// `String(byte[], String)`: decode bytes under a tag.
    StringFromBytes,
    /// `Throwable.getMessage()`.
    ThrowableGetMessage,
    /// User constructor assigning positional arguments to named fields.
    FieldAssign(Vec<String>),
}

#[derive(Debug)]
struct ClassEntry {
    name: String,
    throwable: bool,
}

#[derive(Debug)]
struct MethodEntry {
    class: ClassRef,
    name: String,
    sig: String,
    kind: MethodKind,
}

#[derive(Debug)]
struct FieldEntry {
    class: ClassRef,
    name: String,
    sig: String,
}

#[derive(Debug)]
enum Body {
    Plain(HashMap<FieldRef, JValue>),
    Str(String),
    Prim(PrimArray),
    ObjArray(Vec<ObjRef>),
    Throwable { message: String },
}

#[derive(Debug)]
struct Object {
    class: ClassRef,
    body: Body,
}

#[derive(Default)]
struct Inner {
    classes: Vec<ClassEntry>,
    class_index: HashMap<String, ClassRef>,
    methods: Vec<MethodEntry>,
    fields: Vec<FieldEntry>,
    objects: HashMap<u64, Object>,
    next_obj: u64,
    pending: Option<ObjRef>,
    deny_allocations: bool,
}

impl Inner {
    fn define_class(&mut self, name: &str, throwable: bool) -> ClassRef {
        if let Some(&existing) = self.class_index.get(name) {
            return existing;
        }
        self.classes.push(ClassEntry {
            name: name.to_string(),
            throwable,
        });
        let class = ClassRef(self.classes.len() as u64);
        self.class_index.insert(name.to_string(), class);
        class
    }

    fn define_method(
        &mut self,
        class: ClassRef,
        name: &str,
        sig: &str,
        kind: MethodKind,
    ) -> MethodRef {
        self.methods.push(MethodEntry {
            class,
            name: name.to_string(),
            sig: sig.to_string(),
            kind,
        });
        MethodRef(self.methods.len() as u64)
    }

    fn define_field(&mut self, class: ClassRef, name: &str, sig: &str) -> FieldRef {
        self.fields.push(FieldEntry {
            class,
            name: name.to_string(),
            sig: sig.to_string(),
        });
        FieldRef(self.fields.len() as u64)
    }

    fn class_at(&self, class: ClassRef) -> Option<&ClassEntry> {
        self.classes.get(class.0.checked_sub(1)? as usize)
    }

    fn method_at(&self, method: MethodRef) -> Option<&MethodEntry> {
        self.methods.get(method.0.checked_sub(1)? as usize)
    }

    fn field_at(&self, field: FieldRef) -> Option<&FieldEntry> {
        self.fields.get(field.0.checked_sub(1)? as usize)
    }

    /// Allocate an object, honoring the allocation-denial switch.
    fn alloc(&mut self, class: ClassRef, body: Body) -> ObjRef {
        if self.deny_allocations {
            return ObjRef::NULL;
        }
        self.alloc_unchecked(class, body)
    }

    /// Allocation path that ignores the denial switch. Throwables go
    /// through here: the runtime keeps them constructible even when
    /// ordinary allocation is denied, the way hosts preallocate their
    /// out-of-memory instances.
    fn alloc_unchecked(&mut self, class: ClassRef, body: Body) -> ObjRef {
        self.next_obj += 1;
        let handle = ObjRef(self.next_obj);
        self.objects.insert(handle.0, Object { class, body });
        handle
    }

    /// Construct a throwable of a well-known class and mark it pending.
    fn throw(&mut self, class_name: &str, message: &str) {
        let class = match self.class_index.get(class_name) {
            Some(&c) => c,
            None => {
                error!(class = class_name, "throw target class is not defined");
                return;
            }
        };
        let throwable = self.alloc_unchecked(
            class,
            Body::Throwable {
                message: message.to_string(),
            },
        );
        self.pending = Some(throwable);
    }

    fn zero_value(sig: &str) -> JValue {
        match sig {
            "Z" => JValue::Bool(false),
            "B" => JValue::I8(0),
            "S" => JValue::I16(0),
            "I" => JValue::I32(0),
            "J" => JValue::I64(0),
            "F" => JValue::F32(0.0),
            "D" => JValue::F64(0.0),
            _ => JValue::Obj(ObjRef::NULL),
        }
    }

    fn new_instance(&mut self, class: ClassRef) -> ObjRef {
        let mut fields = HashMap::new();
        for (i, entry) in self.fields.iter().enumerate() {
            if entry.class == class {
                fields.insert(FieldRef(i as u64 + 1), Self::zero_value(&entry.sig));
            }
        }
        self.alloc(class, Body::Plain(fields))
    }

    fn string_body(&self, obj: ObjRef) -> Option<&str> {
        match self.objects.get(&obj.0)?.body {
            Body::Str(ref s) => Some(s),
            _ => None,
        }
    }

    fn find_field_by_name(&self, class: ClassRef, name: &str) -> Option<FieldRef> {
        self.fields
            .iter()
            .position(|f| f.class == class && f.name == name)
            .map(|i| FieldRef(i as u64 + 1))
    }
}

/// In-memory reference implementation of [`RuntimeEnv`].
///
/// Interior mutability behind one lock; every trait call is a single
/// synchronous critical section, so re-entrant use from multiple threads
/// is safe while individual calls stay bounded.
pub struct InMemoryRuntime {
    inner: RwLock<Inner>,
}

impl InMemoryRuntime {
    pub fn new() -> Self {
        let mut inner = Inner::default();

        let string_cls = inner.define_class(names::STRING, false);
        inner.define_method(
            string_cls,
            names::GET_BYTES,
            names::GET_BYTES_SIG,
            MethodKind::StringGetBytes,
        );
        inner.define_method(
            string_cls,
            names::CTOR,
            names::STRING_CTOR_SIG,
            MethodKind::StringFromBytes,
        );
        inner.define_class(names::BYTE_ARRAY, false);

        for fqn in [
            names::OUT_OF_MEMORY_ERROR,
            names::INTERNAL_ERROR,
            names::NULL_POINTER_EXCEPTION,
            names::ILLEGAL_STATE_EXCEPTION,
            names::ILLEGAL_ARGUMENT_EXCEPTION,
            names::UNSUPPORTED_OPERATION_EXCEPTION,
            names::UNSUPPORTED_ENCODING_EXCEPTION,
            names::NO_CLASS_DEF_FOUND_ERROR,
            names::NO_SUCH_METHOD_ERROR,
            names::NO_SUCH_FIELD_ERROR,
        ] {
            let class = inner.define_class(fqn, true);
            inner.define_method(
                class,
                names::GET_MESSAGE,
                names::GET_MESSAGE_SIG,
                MethodKind::ThrowableGetMessage,
            );
        }

        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Define a plain (non-throwable) class.
    pub fn define_class(&self, name: &str) -> ClassRef {
        self.inner.write().unwrap().define_class(name, false)
    }

    /// Declare an instance field on a class.
    pub fn define_field(&self, class: ClassRef, name: &str, sig: &str) -> FieldRef {
        self.inner.write().unwrap().define_field(class, name, sig)
    }

    /// Declare a constructor that assigns its positional arguments to the
    /// named fields, e.g. `define_constructor(point, "(II)V", &["_x", "_y"])`.
    pub fn define_constructor(
        &self,
        class: ClassRef,
        sig: &str,
        field_names: &[&str],
    ) -> MethodRef {
        let kind = MethodKind::FieldAssign(field_names.iter().map(|s| s.to_string()).collect());
        self.inner
            .write()
            .unwrap()
            .define_method(class, names::CTOR, sig, kind)
    }

    /// Instantiate a class with all declared fields zeroed.
    pub fn new_instance(&self, class: ClassRef) -> ObjRef {
        self.inner.write().unwrap().new_instance(class)
    }

    /// Deny or allow managed allocations. While denied, array, string and
    /// object construction return the null handle; throwables still
    /// construct.
    pub fn set_deny_allocations(&self, deny: bool) {
        self.inner.write().unwrap().deny_allocations = deny;
    }

    /// Native copy of a managed string's text, for assertions.
    pub fn string_value(&self, obj: ObjRef) -> Option<String> {
        self.inner
            .read()
            .unwrap()
            .string_body(obj)
            .map(|s| s.to_string())
    }

    /// Number of objects on the managed heap, for assertions.
    pub fn object_count(&self) -> usize {
        self.inner.read().unwrap().objects.len()
    }

    /// Class name of the in-flight throwable, if any.
    pub fn pending_class_name(&self) -> Option<String> {
        let inner = self.inner.read().unwrap();
        let pending = inner.pending?;
        let class = inner.objects.get(&pending.0)?.class;
        inner.class_at(class).map(|c| c.name.clone())
    }

    /// Message of the in-flight throwable, if any.
    pub fn pending_message(&self) -> Option<String> {
        let inner = self.inner.read().unwrap();
        let pending = inner.pending?;
        match inner.objects.get(&pending.0)?.body {
            Body::Throwable { ref message } => Some(message.clone()),
            _ => None,
        }
    }
}

impl Default for InMemoryRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeEnv for InMemoryRuntime {
    fn find_class(&self, name: &str) -> ClassRef {
        let mut inner = self.inner.write().unwrap();
        match inner.class_index.get(name) {
            Some(&class) => class,
            None => {
                inner.throw(names::NO_CLASS_DEF_FOUND_ERROR, name);
                ClassRef::NULL
            }
        }
    }

    fn object_class(&self, obj: ObjRef) -> ClassRef {
        let inner = self.inner.read().unwrap();
        inner
            .objects
            .get(&obj.0)
            .map(|o| o.class)
            .unwrap_or(ClassRef::NULL)
    }

    fn describe_class(&self, class: ClassRef) -> String {
        let inner = self.inner.read().unwrap();
        inner
            .class_at(class)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| "<invalid class>".to_string())
    }

    fn method_id(&self, class: ClassRef, name: &str, sig: &str) -> MethodRef {
        let mut inner = self.inner.write().unwrap();
        let found = inner
            .methods
            .iter()
            .position(|m| m.class == class && m.name == name && m.sig == sig);
        match found {
            Some(i) => MethodRef(i as u64 + 1),
            None => {
                inner.throw(names::NO_SUCH_METHOD_ERROR, &format!("{name}{sig}"));
                MethodRef::NULL
            }
        }
    }

    fn field_id(&self, class: ClassRef, name: &str, sig: &str) -> FieldRef {
        let mut inner = self.inner.write().unwrap();
        let found = inner
            .fields
            .iter()
            .position(|f| f.class == class && f.name == name && f.sig == sig);
        match found {
            Some(i) => FieldRef(i as u64 + 1),
            None => {
                inner.throw(names::NO_SUCH_FIELD_ERROR, &format!("{name}:{sig}"));
                FieldRef::NULL
            }
        }
    }

    fn exception_pending(&self) -> bool {
        self.inner.read().unwrap().pending.is_some()
    }

    fn exception_occurred(&self) -> ObjRef {
        self.inner.read().unwrap().pending.unwrap_or(ObjRef::NULL)
    }

    fn exception_describe(&self) {
        let inner = self.inner.read().unwrap();
        if let Some(pending) = inner.pending {
            let (class, message) = match inner.objects.get(&pending.0) {
                Some(obj) => (
                    inner
                        .class_at(obj.class)
                        .map(|c| c.name.as_str())
                        .unwrap_or("<invalid class>"),
                    match obj.body {
                        Body::Throwable { ref message } => message.as_str(),
                        _ => "<no message>",
                    },
                ),
                None => ("<dangling throwable>", ""),
            };
            error!(class, message, "pending exception");
        }
    }

    fn exception_clear(&self) {
        self.inner.write().unwrap().pending = None;
    }

    fn throw_new(&self, class: ClassRef, message: &str) -> bool {
        let mut inner = self.inner.write().unwrap();
        if inner.class_at(class).is_none() {
            return false;
        }
        let throwable = inner.alloc_unchecked(
            class,
            Body::Throwable {
                message: message.to_string(),
            },
        );
        inner.pending = Some(throwable);
        true
    }

    fn scalar_field(&self, obj: ObjRef, field: FieldRef) -> JValue {
        let inner = self.inner.read().unwrap();
        match inner.objects.get(&obj.0) {
            Some(Object {
                body: Body::Plain(fields),
                ..
            }) => fields.get(&field).copied().unwrap_or(JValue::Obj(ObjRef::NULL)),
            _ => JValue::Obj(ObjRef::NULL),
        }
    }

    fn long_field(&self, obj: ObjRef, field: FieldRef) -> i64 {
        match self.scalar_field(obj, field) {
            JValue::I64(v) => v,
            _ => 0,
        }
    }

    fn set_long_field(&self, obj: ObjRef, field: FieldRef, value: i64) {
        let mut inner = self.inner.write().unwrap();
        if let Some(Object {
            body: Body::Plain(fields),
            ..
        }) = inner.objects.get_mut(&obj.0)
        {
            fields.insert(field, JValue::I64(value));
        }
    }

    fn call_object_method(&self, recv: ObjRef, method: MethodRef, args: &[JValue]) -> ObjRef {
        let mut inner = self.inner.write().unwrap();
        if recv.is_null() {
            inner.throw(names::NULL_POINTER_EXCEPTION, "null receiver");
            return ObjRef::NULL;
        }
        let kind = match inner.method_at(method) {
            Some(entry) => entry.kind.clone(),
            None => {
                inner.throw(names::NO_SUCH_METHOD_ERROR, "stale method handle");
                return ObjRef::NULL;
            }
        };
        match kind {
            MethodKind::StringGetBytes => {
                let text = match inner.string_body(recv) {
                    Some(s) => s.to_string(),
                    None => {
                        inner.throw(names::INTERNAL_ERROR, "receiver is not a string");
                        return ObjRef::NULL;
                    }
                };
                let tag = match args.first() {
                    Some(JValue::Obj(enc)) => {
                        inner.string_body(*enc).map(|s| s.to_string())
                    }
                    _ => None,
                };
                let tag = match tag {
                    Some(t) => t,
                    None => {
                        inner.throw(names::NULL_POINTER_EXCEPTION, "null encoding tag");
                        return ObjRef::NULL;
                    }
                };
                match encoding::encode(&text, &tag) {
                    Some(bytes) => {
                        let signed: Vec<i8> = bytes.iter().map(|&b| b as i8).collect();
                        let byte_array_class = inner.class_index[names::BYTE_ARRAY];
                        let arr = inner.alloc(
                            byte_array_class,
                            Body::Prim(PrimArray::I8(signed)),
                        );
                        if arr.is_null() {
                            inner.throw(
                                names::OUT_OF_MEMORY_ERROR,
                                "getBytes: byte array allocation denied",
                            );
                        }
                        arr
                    }
                    None => {
                        inner.throw(names::UNSUPPORTED_ENCODING_EXCEPTION, &tag);
                        ObjRef::NULL
                    }
                }
            }
            MethodKind::ThrowableGetMessage => {
                let message = match inner.objects.get(&recv.0) {
                    Some(Object {
                        body: Body::Throwable { ref message },
                        ..
                    }) => message.clone(),
                    _ => {
                        inner.throw(names::INTERNAL_ERROR, "receiver is not a throwable");
                        return ObjRef::NULL;
                    }
                };
                let string_cls = inner.class_index[names::STRING];
                let s = inner.alloc(string_cls, Body::Str(message));
                if s.is_null() {
                    inner.throw(
                        names::OUT_OF_MEMORY_ERROR,
                        "getMessage: string allocation denied",
                    );
                }
                s
            }
            MethodKind::StringFromBytes | MethodKind::FieldAssign(_) => {
                debug!("constructor invoked as instance method");
                inner.throw(names::ILLEGAL_STATE_EXCEPTION, "constructor used as method");
                ObjRef::NULL
            }
        }
    }

    fn new_object(&self, class: ClassRef, ctor: MethodRef, args: &[JValue]) -> ObjRef {
        let mut inner = self.inner.write().unwrap();
        let (ctor_class, kind) = match inner.method_at(ctor) {
            Some(entry) => (entry.class, entry.kind.clone()),
            None => {
                inner.throw(names::NO_SUCH_METHOD_ERROR, "stale constructor handle");
                return ObjRef::NULL;
            }
        };
        if ctor_class != class {
            inner.throw(names::INTERNAL_ERROR, "constructor class mismatch");
            return ObjRef::NULL;
        }
        match kind {
            MethodKind::StringFromBytes => {
                let bytes: Vec<u8> = match args.first() {
                    Some(JValue::Obj(arr)) => match inner.objects.get(&arr.0) {
                        Some(Object {
                            body: Body::Prim(PrimArray::I8(ref v)),
                            ..
                        }) => v.iter().map(|&b| b as u8).collect(),
                        _ => {
                            inner.throw(names::INTERNAL_ERROR, "byte array expected");
                            return ObjRef::NULL;
                        }
                    },
                    _ => {
                        inner.throw(names::INTERNAL_ERROR, "byte array expected");
                        return ObjRef::NULL;
                    }
                };
                let tag = match args.get(1) {
                    Some(JValue::Obj(enc)) => inner.string_body(*enc).map(|s| s.to_string()),
                    _ => None,
                };
                let tag = match tag {
                    Some(t) => t,
                    None => {
                        inner.throw(names::NULL_POINTER_EXCEPTION, "null encoding tag");
                        return ObjRef::NULL;
                    }
                };
                match encoding::decode(&bytes, &tag) {
                    Some(text) => inner.alloc(class, Body::Str(text)),
                    None => {
                        inner.throw(names::UNSUPPORTED_ENCODING_EXCEPTION, &tag);
                        ObjRef::NULL
                    }
                }
            }
            MethodKind::FieldAssign(field_names) => {
                let obj = inner.new_instance(class);
                if obj.is_null() {
                    return ObjRef::NULL;
                }
                for (name, value) in field_names.iter().zip(args.iter()) {
                    if let Some(field) = inner.find_field_by_name(class, name) {
                        if let Some(Object {
                            body: Body::Plain(fields),
                            ..
                        }) = inner.objects.get_mut(&obj.0)
                        {
                            fields.insert(field, *value);
                        }
                    }
                }
                obj
            }
            _ => {
                inner.throw(names::ILLEGAL_STATE_EXCEPTION, "method used as constructor");
                ObjRef::NULL
            }
        }
    }

    fn new_string(&self, text: &str) -> ObjRef {
        let mut inner = self.inner.write().unwrap();
        let string_cls = inner.class_index[names::STRING];
        inner.alloc(string_cls, Body::Str(text.to_string()))
    }

    fn array_len(&self, arr: ObjRef) -> usize {
        let inner = self.inner.read().unwrap();
        match inner.objects.get(&arr.0) {
            Some(Object {
                body: Body::Prim(p), ..
            }) => p.len(),
            Some(Object {
                body: Body::ObjArray(items),
                ..
            }) => items.len(),
            _ => 0,
        }
    }

    fn new_prim_array<T: Prim>(&self, len: usize) -> ObjRef {
        let mut inner = self.inner.write().unwrap();
        let class = inner
            .class_index
            .get(T::ARRAY_DESC)
            .copied()
            .unwrap_or_else(|| inner.define_class(T::ARRAY_DESC, false));
        inner.alloc(class, Body::Prim(T::zeroed(len)))
    }

    fn prim_region<T: Prim>(&self, arr: ObjRef, out: &mut Vec<T>) -> bool {
        let inner = self.inner.read().unwrap();
        match inner.objects.get(&arr.0) {
            Some(Object {
                body: Body::Prim(p), ..
            }) => match T::slice_of(p) {
                Some(slice) => {
                    out.extend_from_slice(slice);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn set_prim_region<T: Prim>(&self, arr: ObjRef, src: &[T]) -> bool {
        let mut inner = self.inner.write().unwrap();
        match inner.objects.get_mut(&arr.0) {
            Some(Object {
                body: Body::Prim(p), ..
            }) => match T::slice_of_mut(p) {
                Some(slice) if slice.len() == src.len() => {
                    slice.copy_from_slice(src);
                    true
                }
                _ => false,
            },
            _ => false,
        }
    }

    fn new_object_array(&self, elem_class: ClassRef, len: usize) -> ObjRef {
        let mut inner = self.inner.write().unwrap();
        let elem_name = match inner.class_at(elem_class) {
            Some(entry) => entry.name.clone(),
            None => return ObjRef::NULL,
        };
        // The array object gets its own synthetic array class so that
        // object_class on a string array reports "[Ljava/lang/String;",
        // not the element class.
        let desc = if elem_name.starts_with('[') {
            format!("[{elem_name}")
        } else {
            format!("[L{elem_name};")
        };
        let array_cls = inner.define_class(&desc, false);
        inner.alloc(array_cls, Body::ObjArray(vec![ObjRef::NULL; len]))
    }

    fn object_element(&self, arr: ObjRef, index: usize) -> ObjRef {
        let inner = self.inner.read().unwrap();
        match inner.objects.get(&arr.0) {
            Some(Object {
                body: Body::ObjArray(items),
                ..
            }) => items.get(index).copied().unwrap_or(ObjRef::NULL),
            _ => ObjRef::NULL,
        }
    }

    fn set_object_element(&self, arr: ObjRef, index: usize, value: ObjRef) -> bool {
        let mut inner = self.inner.write().unwrap();
        match inner.objects.get_mut(&arr.0) {
            Some(Object {
                body: Body::ObjArray(items),
                ..
            }) => match items.get_mut(index) {
                Some(slot) => {
                    *slot = value;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_class_miss_sets_pending() {
        let env = InMemoryRuntime::new();
        assert!(env.find_class("no/such/Class").is_null());
        assert!(env.exception_pending());
        assert_eq!(
            env.pending_class_name().as_deref(),
            Some(names::NO_CLASS_DEF_FOUND_ERROR)
        );
        env.exception_clear();
        assert!(!env.exception_pending());
    }

    #[test]
    fn test_instance_fields_default_to_zero() {
        let env = InMemoryRuntime::new();
        let point = env.define_class("test/Point");
        let fx = env.define_field(point, "_x", "I");
        env.define_field(point, "_y", "I");
        let obj = env.new_instance(point);
        assert_eq!(env.scalar_field(obj, fx), JValue::I32(0));
    }

    #[test]
    fn test_positional_constructor_assigns_fields() {
        let env = InMemoryRuntime::new();
        let point = env.define_class("test/Point");
        let fx = env.define_field(point, "_x", "I");
        let fy = env.define_field(point, "_y", "I");
        let ctor = env.define_constructor(point, "(II)V", &["_x", "_y"]);
        let obj = env.new_object(point, ctor, &[JValue::I32(7), JValue::I32(9)]);
        assert!(obj.is_valid());
        assert_eq!(env.scalar_field(obj, fx), JValue::I32(7));
        assert_eq!(env.scalar_field(obj, fy), JValue::I32(9));
    }

    #[test]
    fn test_get_bytes_rejects_unknown_encoding() {
        let env = InMemoryRuntime::new();
        let s = env.new_string("text");
        let string_cls = env.find_class(names::STRING);
        let get_bytes = env.method_id(string_cls, names::GET_BYTES, names::GET_BYTES_SIG);
        let tag = env.new_string("EBCDIC");
        let result = env.call_object_method(s, get_bytes, &[JValue::Obj(tag)]);
        assert!(result.is_null());
        assert_eq!(
            env.pending_class_name().as_deref(),
            Some(names::UNSUPPORTED_ENCODING_EXCEPTION)
        );
    }

    #[test]
    fn test_denied_allocation_returns_null_without_pending() {
        let env = InMemoryRuntime::new();
        env.set_deny_allocations(true);
        assert!(env.new_prim_array::<i32>(4).is_null());
        assert!(!env.exception_pending());
        env.set_deny_allocations(false);
        assert!(env.new_prim_array::<i32>(4).is_valid());
    }

    #[test]
    fn test_object_arrays_report_synthetic_array_class() {
        let env = InMemoryRuntime::new();
        let string_cls = env.find_class(names::STRING);
        let arr = env.new_object_array(string_cls, 2);
        assert_eq!(
            env.describe_class(env.object_class(arr)),
            "[Ljava/lang/String;"
        );

        let byte_array_cls = env.find_class(names::BYTE_ARRAY);
        let matrix = env.new_object_array(byte_array_cls, 1);
        assert_eq!(env.describe_class(env.object_class(matrix)), "[[B");
    }

    #[test]
    fn test_set_object_element_rejects_bad_targets() {
        let env = InMemoryRuntime::new();
        let string_cls = env.find_class(names::STRING);
        let arr = env.new_object_array(string_cls, 1);
        let s = env.new_string("x");
        assert!(env.set_object_element(arr, 0, s));
        // Out-of-range index.
        assert!(!env.set_object_element(arr, 1, s));
        // Receiver is not an object array.
        assert!(!env.set_object_element(s, 0, s));
    }

    #[test]
    fn test_throwables_construct_while_allocation_denied() {
        let env = InMemoryRuntime::new();
        env.set_deny_allocations(true);
        let class = env.find_class(names::OUT_OF_MEMORY_ERROR);
        assert!(env.throw_new(class, "denied"));
        assert!(env.exception_pending());
    }
}
