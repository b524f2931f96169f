//! `Executor` - the execution contract work is submitted to.
//!
//! Every operation in this crate that actually schedules work
//! ([`Outcome::of`](crate::outcome::Outcome::of),
//! [`zip`](crate::outcome::Outcome::zip),
//! [`sequence`](crate::outcome::Outcome::sequence)) takes an [`Executor`]
//! explicitly; no combinator reads ambient scheduler state. An executor is a
//! cheap, cloneable handle onto a tokio runtime.
//!
//! # Design Philosophy
//!
//! To minimize overhead from runtime initialization, this module provides:
//!
//! 1. **Global Runtime**: a lazily-initialized multi-thread runtime shared
//!    across the whole process, created once and never dropped. It exists
//!    only for top-level driver code; library code should accept an
//!    executor from its caller.
//!
//! 2. **Handle Caching**: [`Executor::global`] caches the global runtime's
//!    handle per thread, and prefers the current runtime's handle when one
//!    is already entered so that the caller's runtime context is preserved.
//!
//! 3. **Blocking Execution**: [`try_block_on`](Executor::try_block_on)
//!    executes a future to completion from synchronous code, using
//!    `block_in_place` when already inside a multi-thread runtime to avoid
//!    nested-runtime panics.
//!
//! # Examples
//!
//! ```rust
//! use resolvent::executor::Executor;
//!
//! let cx = Executor::global();
//! let value = cx.block_on(async { 42 });
//! assert_eq!(value, 42);
//! ```

use std::cell::RefCell;
use std::error::Error;
use std::fmt;
use std::future::Future;
use std::sync::LazyLock;

use tokio::runtime::{Builder, Handle, Runtime, RuntimeFlavor};
use tokio::task::JoinHandle;

// =============================================================================
// Global Runtime
// =============================================================================

/// Global tokio runtime initialized lazily on first access.
///
/// Configured with a multi-thread scheduler and one worker per CPU core.
/// The runtime has static lifetime and is never dropped.
static GLOBAL_RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
    Builder::new_multi_thread()
        .worker_threads(num_cpus::get())
        .enable_all()
        .build()
        .expect("Failed to create global tokio runtime")
});

thread_local! {
    /// Thread-local cached handle to the global runtime.
    ///
    /// Avoids re-fetching the global runtime's handle on every
    /// `Executor::global()` call from the same thread.
    static CACHED_HANDLE: RefCell<Option<Handle>> = const { RefCell::new(None) };
}

// =============================================================================
// Executor
// =============================================================================

/// A handle onto the scheduler that continuations are submitted to.
///
/// Cloning is cheap; an `Executor` is a thin wrapper over a tokio runtime
/// handle. Operations that may schedule new work take one of these
/// explicitly rather than consulting hidden global state, which keeps
/// pipelines testable against whatever runtime the test provides.
///
/// # Examples
///
/// ```rust
/// use resolvent::executor::Executor;
///
/// let cx = Executor::global();
/// let result = cx.block_on(async { 1 + 1 });
/// assert_eq!(result, 2);
/// ```
#[derive(Clone)]
pub struct Executor {
    handle: Handle,
}

impl Executor {
    /// Wraps an existing runtime handle.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use resolvent::executor::Executor;
    ///
    /// let runtime = tokio::runtime::Runtime::new()?;
    /// let cx = Executor::from_handle(runtime.handle().clone());
    /// ```
    #[must_use]
    pub fn from_handle(handle: Handle) -> Self {
        Self { handle }
    }

    /// Returns an executor for the runtime the caller is currently inside,
    /// or `None` when called from outside any runtime.
    #[must_use]
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::from_handle)
    }

    /// Returns an executor for the current or global runtime.
    ///
    /// # Handle Priority
    ///
    /// 1. If inside a tokio runtime: the current runtime's handle, so the
    ///    caller's runtime context (tracing, metrics) is preserved.
    /// 2. Otherwise: a per-thread cached handle to the global runtime,
    ///    initializing the runtime on first use.
    ///
    /// # Note
    ///
    /// This function never panics. The internal `unwrap()` is safe because
    /// the cached value is always set before being accessed.
    #[must_use]
    #[allow(clippy::missing_panics_doc)] // unwrap is safe: we just set the value
    pub fn global() -> Self {
        if let Ok(current) = Handle::try_current() {
            return Self::from_handle(current);
        }

        CACHED_HANDLE.with(|cached| {
            let mut cached = cached.borrow_mut();
            if cached.is_none() {
                *cached = Some(GLOBAL_RUNTIME.handle().clone());
            }
            Self::from_handle(cached.as_ref().unwrap().clone())
        })
    }

    /// Submits a future to the executor, returning its join handle.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle.spawn(future)
    }

    /// Submits a synchronous body to the executor's blocking pool.
    pub fn spawn_blocking<F, T>(&self, body: F) -> JoinHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        self.handle.spawn_blocking(body)
    }

    /// Attempts to execute a future to completion, blocking the current
    /// thread.
    ///
    /// Intended for top-level driver code that needs a resolved value from
    /// synchronous context; the combinators never block.
    ///
    /// - **Inside a multi-thread runtime**: uses `block_in_place` with this
    ///   executor's handle, avoiding nested-runtime panics.
    /// - **Inside a current-thread runtime**: returns
    ///   [`BlockingError::CurrentThreadRuntime`], because `block_in_place`
    ///   is not supported there.
    /// - **Outside any runtime**: uses this executor's `block_on`.
    ///
    /// # Errors
    ///
    /// Returns [`BlockingError::CurrentThreadRuntime`] when called from
    /// within a current-thread tokio runtime, and
    /// [`BlockingError::UnsupportedRuntimeFlavor`] for runtime flavors this
    /// crate does not know how to block inside of.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::executor::Executor;
    ///
    /// let cx = Executor::global();
    /// assert_eq!(cx.try_block_on(async { 42 }), Ok(42));
    /// ```
    pub fn try_block_on<F, T>(&self, future: F) -> Result<T, BlockingError>
    where
        F: Future<Output = T>,
    {
        if let Ok(current) = Handle::try_current() {
            match current.runtime_flavor() {
                RuntimeFlavor::MultiThread => {
                    // block_in_place keeps the caller's runtime context
                    // (tracing, metrics) instead of hopping runtimes.
                    Ok(tokio::task::block_in_place(|| current.block_on(future)))
                }
                RuntimeFlavor::CurrentThread => Err(BlockingError::CurrentThreadRuntime),
                // Flavors added by future tokio versions are rejected
                // rather than guessed at.
                _ => Err(BlockingError::UnsupportedRuntimeFlavor),
            }
        } else {
            Ok(self.handle.block_on(future))
        }
    }

    /// Executes a future to completion, blocking the current thread.
    ///
    /// Convenience wrapper around [`try_block_on`](Self::try_block_on) for
    /// contexts where blocking is known to be possible.
    ///
    /// # Panics
    ///
    /// Panics if called from within a current-thread runtime, or if the
    /// future panics.
    pub fn block_on<F, T>(&self, future: F) -> T
    where
        F: Future<Output = T>,
    {
        self.try_block_on(future).expect("Executor::block_on failed")
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Executor").finish_non_exhaustive()
    }
}

// =============================================================================
// Blocking Error
// =============================================================================

/// Error type for blocking execution failures.
///
/// Returned when [`Executor::try_block_on`] cannot execute a future due to
/// runtime constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingError {
    /// Cannot use `block_in_place` in a current-thread runtime.
    ///
    /// `block_in_place` is only supported in multi-thread runtimes; this
    /// error is returned instead of panicking.
    CurrentThreadRuntime,

    /// The runtime flavor is not supported for blocking execution.
    ///
    /// Returned when blocking from inside a runtime with an unknown flavor
    /// (e.g. one added in a future version of tokio).
    UnsupportedRuntimeFlavor,
}

impl fmt::Display for BlockingError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentThreadRuntime => {
                write!(
                    formatter,
                    "cannot execute blocking operation in current-thread runtime: \
                     block_in_place is only supported in multi-thread runtimes"
                )
            }
            Self::UnsupportedRuntimeFlavor => {
                write!(
                    formatter,
                    "cannot execute blocking operation: \
                     the runtime flavor is not supported for blocking execution"
                )
            }
        }
    }
}

impl Error for BlockingError {}

static_assertions::assert_impl_all!(Executor: Send, Sync, Clone);
static_assertions::assert_impl_all!(BlockingError: Send, Sync, Copy);

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn global_works_from_outside_runtime() {
        let cx = Executor::global();
        assert_eq!(cx.block_on(async { 42 }), 42);
    }

    #[rstest]
    #[tokio::test]
    async fn global_prefers_current_runtime() {
        let cx = Executor::global();
        let value = cx.spawn(async { 42 }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[rstest]
    fn current_is_none_outside_runtime() {
        assert!(Executor::current().is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn current_is_some_inside_runtime() {
        assert!(Executor::current().is_some());
    }

    #[rstest]
    fn global_handle_caching_works() {
        let first = Executor::global();
        let second = Executor::global();
        assert_eq!(first.block_on(async { 1 }), 1);
        assert_eq!(second.block_on(async { 2 }), 2);
    }

    #[rstest]
    fn try_block_on_from_outside_runtime() {
        let cx = Executor::global();
        let result = cx.try_block_on(async {
            let left = async { 10 }.await;
            let right = async { 20 }.await;
            left + right
        });
        assert_eq!(result, Ok(30));
    }

    #[rstest]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn try_block_on_inside_multi_thread_runtime() {
        let cx = Executor::global();
        let result = cx.try_block_on(async { 42 });
        assert_eq!(result, Ok(42));
    }

    #[rstest]
    #[tokio::test(flavor = "current_thread")]
    async fn try_block_on_inside_current_thread_runtime() {
        let cx = Executor::global();
        let result = cx.try_block_on(async { 42 });
        assert_eq!(result, Err(BlockingError::CurrentThreadRuntime));
    }

    #[rstest]
    fn blocking_error_display() {
        let message = BlockingError::CurrentThreadRuntime.to_string();
        assert!(message.contains("current-thread runtime"));
        assert!(message.contains("block_in_place"));

        let message = BlockingError::UnsupportedRuntimeFlavor.to_string();
        assert!(message.contains("runtime flavor"));
        assert!(message.contains("not supported"));
    }

    #[rstest]
    fn blocking_error_variants_are_distinct() {
        assert_ne!(
            BlockingError::CurrentThreadRuntime,
            BlockingError::UnsupportedRuntimeFlavor
        );
    }

    #[rstest]
    fn executor_debug_does_not_expose_internals() {
        let cx = Executor::global();
        assert!(format!("{cx:?}").contains("Executor"));
    }
}
