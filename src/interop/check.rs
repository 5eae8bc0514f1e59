//! Condition Checker
//!
//! Reflective lookups signal failure through the pending-exception flag,
//! and most runtime entry points are undefined while that flag is set. The
//! checkers here are called immediately after every lookup: if the flag is
//! set they dump the exception, clear the flag, and report `false`; the
//! caller must then treat the looked-up handle as permanently failed for
//! this call. No retries.

use tracing::warn;

use crate::runtime::RuntimeEnv;

/// Check the outcome of a class lookup. Clears the flag if set.
pub fn check_class<E: RuntimeEnv>(env: &E, class_name: &str) -> bool {
    if env.exception_pending() {
        warn!(class = class_name, "failed to locate class");
        env.exception_describe();
        env.exception_clear();
        false
    } else {
        true
    }
}

/// Check the outcome of a method lookup. Clears the flag if set.
pub fn check_method<E: RuntimeEnv>(env: &E, class_name: &str, method_name: &str) -> bool {
    if env.exception_pending() {
        warn!(
            class = class_name,
            method = method_name,
            "failed to locate method"
        );
        env.exception_describe();
        env.exception_clear();
        false
    } else {
        true
    }
}

/// Check the outcome of a field lookup. Clears the flag if set.
pub fn check_field<E: RuntimeEnv>(env: &E, class_name: &str, field_name: &str) -> bool {
    if env.exception_pending() {
        warn!(
            class = class_name,
            field = field_name,
            "failed to locate field"
        );
        env.exception_describe();
        env.exception_clear();
        false
    } else {
        true
    }
}
