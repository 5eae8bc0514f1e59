//! Integration Tests for the System-Call Wrappers
//!
//! These run against the real platform, so assertions stay tolerant:
//! locking can legitimately fail under resource limits, and the allocator
//! family only exists on gnu/Linux.

use bridgekit::entry;
use bridgekit::runtime::names;
use bridgekit::syscall;
use bridgekit::{BridgeConfig, InMemoryRuntime, RuntimeEnv};

#[test]
fn test_allocator_probes_do_not_panic() {
    syscall::mtrace();
    syscall::malloc_stats();
    syscall::muntrace();
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
#[test]
fn test_mallopt_reaches_the_allocator() {
    // M_MMAP_THRESHOLD; glibc reports success as 1.
    assert_eq!(syscall::mallopt(-3, 128 * 1024), 1);
}

#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
#[test]
fn test_mallopt_is_a_no_op_off_gnu_linux() {
    assert_eq!(syscall::mallopt(-3, 128 * 1024), -1);
}

#[test]
fn test_lock_unlock_memory_unchecked() {
    let env = InMemoryRuntime::new();
    let config = BridgeConfig::default();

    // Locking may fail under RLIMIT_MEMLOCK; only the protocol is under
    // test, not the platform's limits.
    let locked = entry::lock_memory(&env, &config, syscall::MCL_CURRENT);
    assert!(locked == 0 || locked == -1);
    assert!(!env.exception_pending());

    if locked == 0 {
        assert_eq!(entry::unlock_memory(&env, &config), 0);
    }
    assert!(!env.exception_pending());
}

#[cfg(unix)]
#[test]
fn test_checked_lock_raises_on_invalid_flags() {
    let env = InMemoryRuntime::new();
    let config = BridgeConfig::parse(
        r#"
        [syscalls]
        checked = true
        "#,
    )
    .unwrap();

    // Zero flags are rejected with EINVAL on every Unix.
    let result = entry::lock_memory(&env, &config, 0);
    assert_eq!(result, -1);
    assert_eq!(
        env.pending_class_name().as_deref(),
        Some(names::INTERNAL_ERROR)
    );
    let message = env.pending_message().unwrap();
    assert!(message.contains("mlockall"));
}
