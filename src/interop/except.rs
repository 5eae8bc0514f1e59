//! Exception Reporter
//!
//! Raising managed exceptions from native code, and draining exceptions
//! left pending by callbacks into managed code. A raise can itself fail
//! (the exception class may not resolve), in which case the original
//! failure reason is reduced to a local fatal diagnostic and a `false`
//! return.

use tracing::{debug, error};

use super::check;
use super::marshal;
use crate::runtime::{names, RuntimeEnv};

/// The fixed set of exception kinds native code raises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionKind {
    OutOfMemory,
    Internal,
    NullPointer,
    IllegalState,
    IllegalArgument,
    UnsupportedOperation,
}

impl ExceptionKind {
    /// Fully-qualified class name in the fixed calling convention.
    pub fn class_name(self) -> &'static str {
        match self {
            ExceptionKind::OutOfMemory => names::OUT_OF_MEMORY_ERROR,
            ExceptionKind::Internal => names::INTERNAL_ERROR,
            ExceptionKind::NullPointer => names::NULL_POINTER_EXCEPTION,
            ExceptionKind::IllegalState => names::ILLEGAL_STATE_EXCEPTION,
            ExceptionKind::IllegalArgument => names::ILLEGAL_ARGUMENT_EXCEPTION,
            ExceptionKind::UnsupportedOperation => names::UNSUPPORTED_OPERATION_EXCEPTION,
        }
    }

    /// Short label used in fatal diagnostics when the raise itself fails.
    fn label(self) -> &'static str {
        match self {
            ExceptionKind::OutOfMemory => "OutOfMemory",
            ExceptionKind::Internal => "Internal",
            ExceptionKind::NullPointer => "NullPointer",
            ExceptionKind::IllegalState => "BadState",
            ExceptionKind::IllegalArgument => "BadArgument",
            ExceptionKind::UnsupportedOperation => "Unsupported",
        }
    }
}

/// Raise an exception by fully-qualified class name. Returns true once
/// the exception is pending; false if the class did not resolve (logged
/// as a fatal diagnostic; the caller's original failure reason is lost).
pub fn raise_by_class_name<E: RuntimeEnv>(env: &E, fqn: &str, message: &str) -> bool {
    let class = env.find_class(fqn);
    if !check::check_class(env, fqn) || class.is_null() {
        return false;
    }
    env.throw_new(class, message)
}

/// Raise one of the fixed exception kinds.
pub fn raise<E: RuntimeEnv>(env: &E, kind: ExceptionKind, message: &str) -> bool {
    let raised = raise_by_class_name(env, kind.class_name(), message);
    if !raised {
        error!(kind = kind.label(), "FATAL: exception raise failed");
    }
    raised
}

/// Drain any exception left pending by a callback into managed code.
///
/// Returns false if nothing was pending. Otherwise captures the
/// throwable, dumps it, clears the flag, and, when `print_message`,
/// also resolves the throwable's message text and logs it. The message
/// lookup is itself a reflective call and is guarded like any other.
pub fn drain_pending<E: RuntimeEnv>(env: &E, print_message: bool) -> bool {
    if !env.exception_pending() {
        return false;
    }
    let throwable = env.exception_occurred();
    env.exception_describe();
    env.exception_clear();

    if print_message && throwable.is_valid() {
        print_throwable_message(env, throwable);
    }
    true
}

fn print_throwable_message<E: RuntimeEnv>(env: &E, throwable: crate::runtime::ObjRef) {
    let class = env.object_class(throwable);
    let class_label = env.describe_class(class);

    let get_message = env.method_id(class, names::GET_MESSAGE, names::GET_MESSAGE_SIG);
    if !check::check_method(env, &class_label, names::GET_MESSAGE) || get_message.is_null() {
        return;
    }

    let message_obj = env.call_object_method(throwable, get_message, &[]);
    if drain_pending(env, false) || message_obj.is_null() {
        return;
    }

    match marshal::to_native_string(env, message_obj) {
        Ok(message) if !message.is_empty() => {
            error!(class = %class_label, message = %message, "drained exception");
        }
        Ok(_) => debug!(class = %class_label, "drained exception with empty message"),
        Err(err) => debug!(
            class = %class_label,
            %err,
            "could not marshal drained exception message"
        ),
    }
}
