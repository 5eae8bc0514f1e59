//! Integration Tests for the Interop Layer
//!
//! Exercises the probe entry points end to end against the in-memory
//! runtime:
//! - Text and text-array reversal round trips
//! - Primitive array and byte-matrix round trips
//! - Object field probes and construction
//! - Exception raise probes
//! - Pointer boxing through the global arena
//! - Configuration-driven encoding selection

use anyhow::Result;

use bridgekit::entry;
use bridgekit::interop::pointer;
use bridgekit::interop::{marshal, InteropError};
use bridgekit::runtime::names;
use bridgekit::{BridgeConfig, ExceptionKind, InMemoryRuntime, JValue, RuntimeEnv};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn define_point(env: &InMemoryRuntime) -> bridgekit::ClassRef {
    let point = env.define_class("probe/Point");
    env.define_field(point, "_x", "I");
    env.define_field(point, "_y", "I");
    env.define_constructor(point, "(II)V", &["_x", "_y"]);
    point
}

// =============================================================================
// Text Probes
// =============================================================================

#[test]
fn test_reverse_string_probe() -> Result<()> {
    init_tracing();
    let env = InMemoryRuntime::new();
    let config = BridgeConfig::default();

    let s = marshal::to_managed_string(&env, "interop")?;
    let reversed = entry::reverse_string(&env, &config, s)?;
    assert_eq!(env.string_value(reversed).as_deref(), Some("poretni"));

    // Reversing twice restores the original.
    let restored = entry::reverse_string(&env, &config, reversed)?;
    assert_eq!(env.string_value(restored).as_deref(), Some("interop"));
    Ok(())
}

#[test]
fn test_reverse_string_honors_configured_encoding() -> Result<()> {
    init_tracing();
    let env = InMemoryRuntime::new();
    let config = BridgeConfig::parse(
        r#"
        [marshal]
        default_encoding = "ISO-8859-1"
        "#,
    )?;

    let s = marshal::to_managed_string_with_encoding(&env, "résumé", "ISO-8859-1")?;
    let reversed = entry::reverse_string(&env, &config, s)?;
    assert_eq!(env.string_value(reversed).as_deref(), Some("émusér"));
    Ok(())
}

#[test]
fn test_reverse_string_array_probe() -> Result<()> {
    init_tracing();
    let env = InMemoryRuntime::new();
    let config = BridgeConfig::default();

    let values = vec!["abc".to_string(), "".to_string(), "xy".to_string()];
    let arr = marshal::to_managed_string_array(&env, &values)?;
    let reversed = entry::reverse_string_array(&env, &config, arr)?;

    let back = marshal::to_native_string_array(&env, reversed)?;
    assert_eq!(back, vec!["cba".to_string(), "".to_string(), "yx".to_string()]);
    Ok(())
}

#[test]
fn test_drain_message_printing_follows_config() {
    init_tracing();
    // A plain object is not a string, so the encode callback raises and
    // reverse_string drains it. Resolving the drained throwable's message
    // text allocates managed objects (the message string and its byte
    // array); with printing disabled none of that may happen.
    let heap_after = |print: bool| {
        let env = InMemoryRuntime::new();
        let point = define_point(&env);
        let obj = env.new_instance(point);
        let config = BridgeConfig::parse(&format!(
            "[diagnostics]\nprint_exception_messages = {print}\n"
        ))
        .unwrap();

        let result = entry::reverse_string(&env, &config, obj);
        assert!(matches!(result, Err(InteropError::ManagedException(_))));
        env.object_count()
    };

    assert!(heap_after(false) < heap_after(true));
}

// =============================================================================
// Array Probes
// =============================================================================

#[test]
fn test_round_trip_array_probe() -> Result<()> {
    init_tracing();
    let env = InMemoryRuntime::new();

    let arr = marshal::to_managed_array::<i32, _>(&env, &[3, 1, 4, 1, 5])?;
    let copy = entry::round_trip_array::<i32, _>(&env, arr)?;

    assert_ne!(arr, copy);
    assert_eq!(
        marshal::to_native_array::<i32, _>(&env, copy)?,
        vec![3, 1, 4, 1, 5]
    );
    Ok(())
}

#[test]
fn test_round_trip_array_probe_under_denial() {
    init_tracing();
    let env = InMemoryRuntime::new();
    let arr = marshal::to_managed_array::<i64, _>(&env, &[1, 2]).unwrap();

    env.set_deny_allocations(true);
    let result = entry::round_trip_array::<i64, _>(&env, arr);
    assert!(matches!(result, Err(InteropError::AllocationFailed(_))));
    assert_eq!(
        env.pending_class_name().as_deref(),
        Some(names::OUT_OF_MEMORY_ERROR)
    );
}

#[test]
fn test_round_trip_byte_matrix_probe() -> Result<()> {
    init_tracing();
    let env = InMemoryRuntime::new();

    let rows = vec![vec![1i8, 2, 3], vec![], vec![-1]];
    let arr = marshal::to_managed_byte_matrix(&env, &rows)?;
    let copy = entry::round_trip_byte_matrix(&env, arr)?;

    assert_eq!(marshal::to_native_byte_matrix(&env, copy)?, rows);
    Ok(())
}

// =============================================================================
// Object Probes
// =============================================================================

#[test]
fn test_decrement_point_probe() -> Result<()> {
    init_tracing();
    let env = InMemoryRuntime::new();
    let point = define_point(&env);
    let ctor = env.method_id(point, "<init>", "(II)V");
    let obj = env.new_object(point, ctor, &[JValue::I32(5), JValue::I32(9)]);

    let moved = entry::decrement_point(&env, obj)?;
    let fx = env.field_id(point, "_x", "I");
    let fy = env.field_id(point, "_y", "I");
    assert_eq!(env.scalar_field(moved, fx), JValue::I32(4));
    assert_eq!(env.scalar_field(moved, fy), JValue::I32(8));
    Ok(())
}

#[test]
fn test_decrement_point_without_constructor_raises() {
    init_tracing();
    let env = InMemoryRuntime::new();
    let class = env.define_class("probe/Bare");
    env.define_field(class, "_x", "I");
    env.define_field(class, "_y", "I");
    let obj = env.new_instance(class);

    let result = entry::decrement_point(&env, obj);
    assert!(matches!(result, Err(InteropError::MethodResolution { .. })));
    assert!(env.exception_pending());
}

#[test]
fn test_decrement_point_null_raises_null_pointer() {
    init_tracing();
    let env = InMemoryRuntime::new();
    let result = entry::decrement_point(&env, bridgekit::ObjRef::NULL);
    assert!(matches!(result, Err(InteropError::InvalidHandle)));
    assert_eq!(
        env.pending_class_name().as_deref(),
        Some(names::NULL_POINTER_EXCEPTION)
    );
}

// =============================================================================
// Exception Probes
// =============================================================================

#[test]
fn test_raise_probes_leave_named_exceptions_pending() {
    init_tracing();
    for (kind, class_name) in [
        (ExceptionKind::OutOfMemory, names::OUT_OF_MEMORY_ERROR),
        (ExceptionKind::Internal, names::INTERNAL_ERROR),
        (ExceptionKind::NullPointer, names::NULL_POINTER_EXCEPTION),
        (ExceptionKind::IllegalState, names::ILLEGAL_STATE_EXCEPTION),
        (
            ExceptionKind::IllegalArgument,
            names::ILLEGAL_ARGUMENT_EXCEPTION,
        ),
        (
            ExceptionKind::UnsupportedOperation,
            names::UNSUPPORTED_OPERATION_EXCEPTION,
        ),
    ] {
        let env = InMemoryRuntime::new();
        assert!(entry::raise_probe(&env, kind, "probe message"));
        assert_eq!(env.pending_class_name().as_deref(), Some(class_name));
        assert_eq!(env.pending_message().as_deref(), Some("probe message"));
    }
}

// =============================================================================
// Pointer Boxing
// =============================================================================

struct Counter {
    hits: u64,
}

#[test]
fn test_pointer_box_through_global_arena() -> Result<()> {
    init_tracing();
    let env = InMemoryRuntime::new();
    let class = env.define_class("probe/CounterProxy");
    env.define_field(class, pointer::POINTER_FIELD, "J");
    let obj = env.new_instance(class);

    let arena = bridgekit::arena::global();
    pointer::box_resource(&env, arena, obj, Counter { hits: 0 })?;
    pointer::with_resource_mut::<Counter, _, _, _>(&env, arena, obj, |c| c.hits += 3)?;
    let hits = pointer::with_resource::<Counter, _, _, _>(&env, arena, obj, |c| c.hits)?;
    assert_eq!(hits, 3);

    let counter: Counter = pointer::unbox_resource(&env, arena, obj)?;
    assert_eq!(counter.hits, 3);
    Ok(())
}
