//! System-Call Wrappers
//!
//! Thin pass-throughs to allocator introspection/tuning and virtual-memory
//! locking. The allocator family exists only on gnu/Linux and compiles to
//! no-ops elsewhere; unsupported platforms never raise at runtime. The
//! checked memory-locking variants translate a negative return into a
//! raised internal-error exception carrying the platform error string.

use tracing::debug;

use crate::interop::except::{self, ExceptionKind};
use crate::runtime::RuntimeEnv;

/// Lock pages currently mapped into the address space.
pub const MCL_CURRENT: i32 = 1;
/// Lock pages mapped in the future.
pub const MCL_FUTURE: i32 = 2;

#[cfg(all(target_os = "linux", target_env = "gnu"))]
mod imp {
    use libc::c_int;

    extern "C" {
        fn malloc_stats();
        fn mallopt(param: c_int, value: c_int) -> c_int;
        fn mtrace();
        fn muntrace();
    }

    pub fn malloc_stats_sys() {
        unsafe { malloc_stats() }
    }

    pub fn mallopt_sys(param: i32, value: i32) -> i32 {
        unsafe { mallopt(param, value) }
    }

    pub fn mtrace_sys() {
        unsafe { mtrace() }
    }

    pub fn muntrace_sys() {
        unsafe { muntrace() }
    }
}

#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
mod imp {
    pub fn malloc_stats_sys() {}

    pub fn mallopt_sys(_param: i32, _value: i32) -> i32 {
        -1
    }

    pub fn mtrace_sys() {}

    pub fn muntrace_sys() {}
}

/// Dump allocator statistics to stderr. No-op off gnu/Linux.
pub fn malloc_stats() {
    imp::malloc_stats_sys()
}

/// Tune an allocator parameter. Returns the allocator's result, or `-1`
/// off gnu/Linux.
pub fn mallopt(param: i32, value: i32) -> i32 {
    let result = imp::mallopt_sys(param, value);
    debug!(param, value, result, "mallopt");
    result
}

/// Start allocation tracing (`MALLOC_TRACE` environment controls the
/// output file). No-op off gnu/Linux.
pub fn mtrace() {
    imp::mtrace_sys()
}

/// Stop allocation tracing. No-op off gnu/Linux.
pub fn muntrace() {
    imp::muntrace_sys()
}

/// Lock memory into RAM. `flags` accepts [`MCL_CURRENT`] and
/// [`MCL_FUTURE`] bits. Returns the raw result, `-1` off Unix.
pub fn mlockall(flags: i32) -> i32 {
    #[cfg(unix)]
    {
        unsafe { libc::mlockall(flags) }
    }
    #[cfg(not(unix))]
    {
        let _ = flags;
        -1
    }
}

/// Unlock all locked memory. Returns the raw result, `-1` off Unix.
pub fn munlockall() -> i32 {
    #[cfg(unix)]
    {
        unsafe { libc::munlockall() }
    }
    #[cfg(not(unix))]
    {
        -1
    }
}

/// [`mlockall`] that raises internal-error with the platform error string
/// on a negative result.
pub fn mlockall_checked<E: RuntimeEnv>(env: &E, flags: i32) -> i32 {
    let result = mlockall(flags);
    if result < 0 {
        let err = std::io::Error::last_os_error();
        except::raise(
            env,
            ExceptionKind::Internal,
            &format!("mlockall({flags}) failed: {err}"),
        );
    }
    result
}

/// [`munlockall`] that raises internal-error with the platform error
/// string on a negative result.
pub fn munlockall_checked<E: RuntimeEnv>(env: &E) -> i32 {
    let result = munlockall();
    if result < 0 {
        let err = std::io::Error::last_os_error();
        except::raise(
            env,
            ExceptionKind::Internal,
            &format!("munlockall failed: {err}"),
        );
    }
    result
}
