//! Managed Runtime Capability Interface
//!
//! Everything the interop layer needs from the host runtime (reflective
//! lookup, exception state, object construction, array storage) is reached
//! through the [`RuntimeEnv`] trait. The trait is the only door into managed
//! memory: the interop helpers never hold raw pointers into the host, only
//! opaque handles that are meaningless outside the originating call.
//!
//! # Handles
//!
//! [`ObjRef`], [`ClassRef`], [`MethodRef`] and [`FieldRef`] are opaque
//! newtypes over `u64`. Zero is the invalid (null) handle in all four
//! spaces. A handle returned from a lookup that failed is invalid and must
//! not be passed to any further trait call; the pending-exception flag is
//! set in that case and has to be cleared through the condition checker
//! before the next reflective call.
//!
//! # Pending exceptions
//!
//! The flag is owned by the `RuntimeEnv` implementation and is observable
//! only through `exception_pending` / `exception_occurred` /
//! `exception_clear`. It never leaks as ambient global state.

mod memory;

pub use memory::InMemoryRuntime;

/// Opaque handle to a managed object (plain object, string, array,
/// throwable). Zero is the null handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ObjRef(pub(crate) u64);

/// Opaque handle to a managed class descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClassRef(pub(crate) u64);

/// Opaque handle to a resolved method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MethodRef(pub(crate) u64);

/// Opaque handle to a resolved field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldRef(pub(crate) u64);

macro_rules! handle_impls {
    ($($ty:ident),*) => {
        $(
            impl $ty {
                /// The invalid (null) handle.
                pub const NULL: $ty = $ty(0);

                /// True if this is the null handle.
                pub fn is_null(self) -> bool {
                    self.0 == 0
                }

                /// True if this handle came from a successful lookup.
                pub fn is_valid(self) -> bool {
                    self.0 != 0
                }
            }
        )*
    };
}

handle_impls!(ObjRef, ClassRef, MethodRef, FieldRef);

/// A managed value crossing the boundary as a method or constructor
/// argument, or as a scalar field read result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JValue {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Obj(ObjRef),
}

/// Typed backing storage for a managed primitive array, one variant per
/// supported element width.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimArray {
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl PrimArray {
    /// Element count, independent of element width.
    pub fn len(&self) -> usize {
        match self {
            PrimArray::I8(v) => v.len(),
            PrimArray::I16(v) => v.len(),
            PrimArray::I32(v) => v.len(),
            PrimArray::I64(v) => v.len(),
            PrimArray::F32(v) => v.len(),
            PrimArray::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i8 {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A native element type with a managed primitive-array counterpart.
///
/// One generic conversion routine per direction is parameterized over this
/// trait instead of hand-rolling a near-duplicate function per width.
pub trait Prim: Copy + Default + PartialEq + std::fmt::Debug + sealed::Sealed + 'static {
    /// Fixed type-signature character used in field and array descriptors.
    const SIG: char;

    /// Array-class descriptor, e.g. `"[I"`.
    const ARRAY_DESC: &'static str;

    /// Borrow the typed slice out of backing storage, `None` on a width
    /// mismatch.
    fn slice_of(buf: &PrimArray) -> Option<&[Self]>;

    /// Mutable counterpart of [`Prim::slice_of`].
    fn slice_of_mut(buf: &mut PrimArray) -> Option<&mut [Self]>;

    /// Fresh zeroed backing storage of the given length.
    fn zeroed(len: usize) -> PrimArray;

    /// Narrow a [`JValue`] to this type, `None` on a kind mismatch.
    fn from_value(v: &JValue) -> Option<Self>;

    fn into_value(self) -> JValue;
}

macro_rules! prim_impl {
    ($ty:ty, $variant:ident, $sig:expr, $desc:expr) => {
        impl Prim for $ty {
            const SIG: char = $sig;
            const ARRAY_DESC: &'static str = $desc;

            fn slice_of(buf: &PrimArray) -> Option<&[Self]> {
                match buf {
                    PrimArray::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn slice_of_mut(buf: &mut PrimArray) -> Option<&mut [Self]> {
                match buf {
                    PrimArray::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn zeroed(len: usize) -> PrimArray {
                PrimArray::$variant(vec![<$ty>::default(); len])
            }

            fn from_value(v: &JValue) -> Option<Self> {
                match v {
                    JValue::$variant(x) => Some(*x),
                    _ => None,
                }
            }

            fn into_value(self) -> JValue {
                JValue::$variant(self)
            }
        }
    };
}

prim_impl!(i8, I8, 'B', "[B");
prim_impl!(i16, I16, 'S', "[S");
prim_impl!(i32, I32, 'I', "[I");
prim_impl!(i64, I64, 'J', "[J");
prim_impl!(f32, F32, 'F', "[F");
prim_impl!(f64, F64, 'D', "[D");

/// Marker for the element types allowed in scalar field reads.
pub trait FieldScalar: Prim {}

impl FieldScalar for i8 {}
impl FieldScalar for i16 {}
impl FieldScalar for i32 {}
impl FieldScalar for i64 {}

/// Well-known names in the fixed calling convention the layer exposes.
/// These are lookup strings, not compile-time bindings: a host runtime
/// that spells them differently only needs a different table.
pub mod names {
    pub const STRING: &str = "java/lang/String";
    pub const BYTE_ARRAY: &str = "[B";

    pub const OUT_OF_MEMORY_ERROR: &str = "java/lang/OutOfMemoryError";
    pub const INTERNAL_ERROR: &str = "java/lang/InternalError";
    pub const NULL_POINTER_EXCEPTION: &str = "java/lang/NullPointerException";
    pub const ILLEGAL_STATE_EXCEPTION: &str = "java/lang/IllegalStateException";
    pub const ILLEGAL_ARGUMENT_EXCEPTION: &str = "java/lang/IllegalArgumentException";
    pub const UNSUPPORTED_OPERATION_EXCEPTION: &str =
        "java/lang/UnsupportedOperationException";
    pub const UNSUPPORTED_ENCODING_EXCEPTION: &str = "java/io/UnsupportedEncodingException";

    pub const NO_CLASS_DEF_FOUND_ERROR: &str = "java/lang/NoClassDefFoundError";
    pub const NO_SUCH_METHOD_ERROR: &str = "java/lang/NoSuchMethodError";
    pub const NO_SUCH_FIELD_ERROR: &str = "java/lang/NoSuchFieldError";

    pub const GET_BYTES: &str = "getBytes";
    pub const GET_BYTES_SIG: &str = "(Ljava/lang/String;)[B";
    pub const CTOR: &str = "<init>";
    pub const STRING_CTOR_SIG: &str = "([BLjava/lang/String;)V";
    pub const GET_MESSAGE: &str = "getMessage";
    pub const GET_MESSAGE_SIG: &str = "()Ljava/lang/String;";
}

/// Capability interface to the managed runtime.
///
/// Every method is a single synchronous call. Lookup methods
/// (`find_class`, `method_id`, `field_id`) return the invalid handle *and*
/// set the pending-exception flag on failure; callers must run the
/// condition checker before touching the result. Allocation methods return
/// the invalid handle on denial without setting the flag; raising
/// out-of-memory is the caller's job.
pub trait RuntimeEnv {
    /// Resolve a class by fully-qualified name.
    fn find_class(&self, name: &str) -> ClassRef;

    /// Class descriptor of a live object, invalid for the null handle.
    fn object_class(&self, obj: ObjRef) -> ClassRef;

    /// Human-readable class label, for diagnostics only.
    fn describe_class(&self, class: ClassRef) -> String;

    /// Resolve an instance method or constructor by name and signature.
    fn method_id(&self, class: ClassRef, name: &str, sig: &str) -> MethodRef;

    /// Resolve an instance field by name and signature.
    fn field_id(&self, class: ClassRef, name: &str, sig: &str) -> FieldRef;

    /// True while an exception is in flight.
    fn exception_pending(&self) -> bool;

    /// The in-flight throwable, or null if nothing is pending. Does not
    /// clear the flag.
    fn exception_occurred(&self) -> ObjRef;

    /// Emit a diagnostic dump of the in-flight exception, if any.
    fn exception_describe(&self);

    /// Mark the in-flight exception as handled.
    fn exception_clear(&self);

    /// Construct a throwable of `class` with `message` and mark it
    /// pending. Returns false if the class handle is invalid.
    fn throw_new(&self, class: ClassRef, message: &str) -> bool;

    /// Read a scalar field. An invalid field handle yields `Obj(NULL)`,
    /// which narrows to the zero value of every scalar type.
    fn scalar_field(&self, obj: ObjRef, field: FieldRef) -> JValue;

    fn long_field(&self, obj: ObjRef, field: FieldRef) -> i64;

    fn set_long_field(&self, obj: ObjRef, field: FieldRef, value: i64);

    /// Invoke an instance method returning an object handle. May leave an
    /// exception pending; the caller must drain before further calls.
    fn call_object_method(&self, recv: ObjRef, method: MethodRef, args: &[JValue]) -> ObjRef;

    /// Construct an instance through a resolved constructor.
    fn new_object(&self, class: ClassRef, ctor: MethodRef, args: &[JValue]) -> ObjRef;

    /// Construct a managed string directly from native UTF-8 text.
    fn new_string(&self, text: &str) -> ObjRef;

    /// Element count of a primitive or object array, zero for anything
    /// else.
    fn array_len(&self, arr: ObjRef) -> usize;

    /// Allocate a fixed-length primitive array. Null on denial.
    fn new_prim_array<T: Prim>(&self, len: usize) -> ObjRef
    where
        Self: Sized;

    /// Bulk-copy the whole array out into `out`. False on a type or
    /// handle mismatch.
    fn prim_region<T: Prim>(&self, arr: ObjRef, out: &mut Vec<T>) -> bool
    where
        Self: Sized;

    /// Bulk-copy `src` over the whole array. False on a type, handle, or
    /// length mismatch.
    fn set_prim_region<T: Prim>(&self, arr: ObjRef, src: &[T]) -> bool
    where
        Self: Sized;

    /// Allocate a fixed-length object array with null elements. Null on
    /// denial.
    fn new_object_array(&self, elem_class: ClassRef, len: usize) -> ObjRef;

    fn object_element(&self, arr: ObjRef, index: usize) -> ObjRef;

    fn set_object_element(&self, arr: ObjRef, index: usize, value: ObjRef) -> bool;
}
