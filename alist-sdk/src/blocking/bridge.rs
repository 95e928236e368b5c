//! Sync/async bridge
//!
//! [`block_on`] resolves a future from blocking code. The naive version
//! (build a runtime, block on it) panics when the caller is already
//! inside a tokio runtime, so the bridge picks one of two paths per call:
//!
//! - no ambient runtime: build a fresh current-thread runtime, drive the
//!   future on the calling thread, drop the runtime;
//! - inside a running runtime: blocking that runtime's thread would
//!   deadlock it, so spawn one scoped worker thread, build the fresh
//!   runtime there, and park the caller on the worker's completion.
//!
//! Either way the future's output (or panic) reaches the caller
//! unchanged, and nothing outlives the call.

use std::future::Future;

use tokio::runtime::{Builder, Handle, Runtime};

/// Run `future` to completion, blocking the current thread.
///
/// Safe to call both from plain threads and from within a running tokio
/// runtime; in the latter case the future runs on a short-lived worker
/// thread with its own runtime. Errors returned by the future propagate
/// unchanged; a panic inside the future resumes on the caller.
pub fn block_on<F>(future: F) -> F::Output
where
    F: Future + Send,
    F::Output: Send,
{
    match Handle::try_current() {
        // Plain synchronous caller: drive the future right here.
        Err(_) => isolated_runtime().block_on(future),
        // Already inside a runtime: never block or re-enter it.
        Ok(_) => std::thread::scope(|scope| {
            scope
                .spawn(|| isolated_runtime().block_on(future))
                .join()
                .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
        }),
    }
}

/// One single-threaded runtime per bridged call; torn down on drop.
fn isolated_runtime() -> Runtime {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("failed to build bridge runtime")
}
