//! Global Runtime - One process-wide runtime behind one lock
//!
//! Every access goes through [`with_global`], which holds the lock for the
//! whole closure. Allocation, root registration and collection therefore
//! never interleave, even when several threads share the runtime.

use super::Runtime;
use crate::config::GcConfig;
use crate::error::Result;
use parking_lot::Mutex;

lazy_static::lazy_static! {
    static ref GLOBAL_RUNTIME: Mutex<Runtime> = Mutex::new(Runtime::default());
}

/// Run `f` with exclusive access to the global runtime
///
/// Calling `with_global` again from inside `f` deadlocks.
pub fn with_global<F, T>(f: F) -> T
where
    F: FnOnce(&mut Runtime) -> T,
{
    let mut runtime = GLOBAL_RUNTIME.lock();
    f(&mut runtime)
}

/// Replace the global runtime with a fresh one built from `config`
///
/// The previous runtime is dropped, releasing all of its objects. Handles
/// into it become stale.
///
/// # Errors
/// `Configuration` if `config` does not validate; the current runtime is
/// kept in that case.
pub fn reset_global(config: GcConfig) -> Result<()> {
    let fresh = Runtime::new(config)?;
    let previous = std::mem::replace(&mut *GLOBAL_RUNTIME.lock(), fresh);
    drop(previous);
    Ok(())
}
