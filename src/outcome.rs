//! `Outcome` - a typed-error result over a deferred asynchronous
//! computation.
//!
//! An [`Outcome<E, A>`] describes a computation that will eventually
//! produce a success value of type `A` or fail. Failures are split across
//! two channels: the declared, recoverable kind `E`, and the fatal channel
//! whose kind is erased and which bypasses every recovery combinator. The
//! compiler tracks `E` through each composition step.
//!
//! # Design Philosophy
//!
//! Composition is lazy: every combinator wraps the receiver in a new
//! deferred [`Task`] and nothing executes until the outcome is resolved.
//! All actual asynchronous execution is delegated to the host runtime:
//! the operations that submit work ([`of`](Outcome::of),
//! [`zip`](Outcome::zip), [`zip_with`](Outcome::zip_with),
//! [`sequence`](Outcome::sequence)) take an explicit
//! [`Executor`], and sequential combinators are pure composition that runs
//! on whichever executor ultimately drives the outcome.
//!
//! An `Attempt` moves through exactly one transition,
//! `Pending -> Resolved`, and both resolved failure shapes are terminal;
//! the `Success` / `Failed` / `Fatal` variants are constructed already
//! terminal and never change.
//!
//! # Monad Laws
//!
//! `Outcome` satisfies the monad laws on its success channel:
//!
//! 1. **Left Identity**: `Outcome::succeed(a).flat_map(f)` resolves as `f(a)`
//! 2. **Right Identity**: `m.flat_map(Outcome::succeed)` resolves as `m`
//! 3. **Associativity**: `m.flat_map(f).flat_map(g)` resolves as
//!    `m.flat_map(|x| f(x).flat_map(g))`
//!
//! # Examples
//!
//! ```rust
//! use resolvent::prelude::*;
//!
//! let cx = Executor::global();
//! let outcome = Outcome::<&str, i32>::succeed(10)
//!     .fmap(|x| x * 2)
//!     .flat_map(|x| Outcome::<&str, i32>::succeed(x + 1));
//!
//! assert_eq!(cx.block_on(outcome.resolve()).success(), Some(21));
//! ```
//!
//! # Recovery Selectivity
//!
//! ```rust
//! use resolvent::prelude::*;
//!
//! let cx = Executor::global();
//!
//! // A typed failure is recoverable.
//! let recovered = Outcome::<&str, i32>::fail("not found")
//!     .catch_all(|_| Outcome::<&str, i32>::succeed(0));
//! assert_eq!(cx.block_on(recovered.resolve()).success(), Some(0));
//!
//! // A fatal failure bypasses recovery.
//! let fatal = Outcome::<&str, i32>::fatal("corrupted")
//!     .catch_all(|_| Outcome::<&str, i32>::succeed(0));
//! assert!(cx.block_on(fatal.resolve()).is_fatal());
//! ```

use std::fmt;
use std::future::{Future, IntoFuture};
use std::panic::AssertUnwindSafe;
use std::pin::Pin;

use futures::FutureExt;
use tokio::task::JoinError;

use crate::executor::{BlockingError, Executor};
use crate::failure::{CaughtPanic, Classified, ErrorKind, FatalError, classify_join_error};
use crate::task::Task;

// =============================================================================
// Resolved
// =============================================================================

/// The terminal state of an outcome.
///
/// Resolved failures carry a tag distinguishing the recoverable typed
/// channel from the fatal one; the recovery combinators pattern-match this
/// tag rather than trusting the declared type parameter.
#[derive(Debug)]
pub enum Resolved<E, A> {
    /// The computation succeeded.
    Success(A),
    /// The computation failed with an error of the declared kind.
    Failed(E),
    /// The computation failed outside the typed-recovery channel.
    Fatal(FatalError),
}

impl<E, A> Resolved<E, A> {
    /// Whether this is a success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Whether this is a recoverable typed failure.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Whether this is a fatal failure.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// The success value, if any.
    #[must_use]
    pub fn success(self) -> Option<A> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failed(_) | Self::Fatal(_) => None,
        }
    }

    /// The recoverable typed error, if any.
    #[must_use]
    pub fn failure(self) -> Option<E> {
        match self {
            Self::Failed(error) => Some(error),
            Self::Success(_) | Self::Fatal(_) => None,
        }
    }

    /// The fatal error, if any.
    #[must_use]
    pub fn fatal(self) -> Option<FatalError> {
        match self {
            Self::Fatal(fatal) => Some(fatal),
            Self::Success(_) | Self::Failed(_) => None,
        }
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// A computation that will eventually succeed with an `A` or fail.
///
/// The declared error kind `E` is the recoverable channel; fatal failures
/// erase their kind and always propagate. Exactly one of four shapes at any
/// time, and completed shapes are immutable; combinators consume the
/// receiver and produce a new outcome.
///
/// # Type Parameters
///
/// - `E`: the declared error kind, bounded by [`ErrorKind`].
/// - `A`: the success value kind.
pub enum Outcome<E, A> {
    /// A live, in-flight computation; its result is not yet known and is
    /// produced by resolving the underlying task exactly once.
    Attempt(Task<Resolved<E, A>>),
    /// Already resolved, successfully.
    Success(A),
    /// Already resolved, failed with an error of the declared kind.
    Failed(E),
    /// Already resolved, failed outside the typed-recovery channel.
    Fatal(FatalError),
}

// =============================================================================
// Constructors
// =============================================================================

impl<E, A> Outcome<E, A> {
    /// An already-successful outcome.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::prelude::*;
    ///
    /// let outcome = Outcome::<&str, i32>::succeed(42);
    /// ```
    pub const fn succeed(value: A) -> Self {
        Self::Success(value)
    }

    /// An already-failed outcome on the recoverable typed channel.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::prelude::*;
    ///
    /// let outcome = Outcome::<&str, i32>::fail("not found");
    /// ```
    pub const fn fail(error: E) -> Self {
        Self::Failed(error)
    }

    /// An already-failed outcome whose error kind is erased on purpose,
    /// placing it outside the typed-recovery channel regardless of its
    /// runtime type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::prelude::*;
    ///
    /// let outcome = Outcome::<&str, i32>::fatal("corrupted index");
    /// ```
    pub fn fatal(error: impl ErrorKind) -> Self {
        Self::Fatal(FatalError::erased(error))
    }

    /// Lifts an already-resolved `Result` without touching the async
    /// primitive.
    pub fn from_result(result: Result<A, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failed(error),
        }
    }

    /// Lifts an already-resolved state, including the fatal channel.
    pub fn from_resolved(resolved: Resolved<E, A>) -> Self {
        match resolved {
            Resolved::Success(value) => Self::Success(value),
            Resolved::Failed(error) => Self::Failed(error),
            Resolved::Fatal(fatal) => Self::Fatal(fatal),
        }
    }
}

impl<A: Send + 'static> Outcome<CaughtPanic, A> {
    /// Schedules synchronous evaluation of `body` on the executor's
    /// blocking pool.
    ///
    /// A panic raised during evaluation is caught and lifted into a
    /// recoverable failure; the declared error kind defaults to the
    /// broadest one, [`CaughtPanic`]. Use
    /// [`map_error`](Outcome::map_error) to narrow it.
    ///
    /// Evaluation is deferred: nothing is submitted until the outcome is
    /// resolved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::prelude::*;
    ///
    /// let cx = Executor::global();
    /// let outcome = Outcome::of(&cx, || 21 * 2);
    /// assert_eq!(cx.block_on(outcome.resolve()).success(), Some(42));
    /// ```
    pub fn of<F>(cx: &Executor, body: F) -> Self
    where
        F: FnOnce() -> A + Send + 'static,
    {
        let cx = cx.clone();
        Self::Attempt(Task::new(move || async move {
            match cx.spawn_blocking(body).await {
                Ok(value) => Resolved::Success(value),
                Err(join_error) => match classify_join_error(join_error) {
                    Classified::Recoverable(panic) => Resolved::Failed(panic),
                    Classified::Fatal(fatal) => Resolved::Fatal(fatal),
                },
            }
        }))
    }

    /// Wraps an existing async handle as an in-flight attempt.
    ///
    /// The future's failure channel is untyped, so the declared error kind
    /// defaults to the broadest one: a panic escaping the future is caught
    /// and surfaced as a recoverable [`CaughtPanic`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::prelude::*;
    ///
    /// let cx = Executor::global();
    /// let outcome = Outcome::from_future(async { 42 });
    /// assert_eq!(cx.block_on(outcome.resolve()).success(), Some(42));
    /// ```
    pub fn from_future<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = A> + Send + 'static,
    {
        Self::Attempt(Task::new(move || async move {
            match AssertUnwindSafe(future).catch_unwind().await {
                Ok(value) => Resolved::Success(value),
                Err(payload) => Resolved::Failed(CaughtPanic::from_payload(payload)),
            }
        }))
    }
}

impl<E: ErrorKind, A: Send + 'static> Outcome<E, A> {
    /// Wraps a future that already carries a typed failure channel.
    ///
    /// An `Err` lands on the recoverable channel. A panic escaping the
    /// future is outside the declared kind and is classified fatal.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::prelude::*;
    ///
    /// let cx = Executor::global();
    /// let outcome = Outcome::from_try_future(async { Err::<i32, _>("offline") });
    /// assert_eq!(cx.block_on(outcome.resolve()).failure(), Some("offline"));
    /// ```
    pub fn from_try_future<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = Result<A, E>> + Send + 'static,
    {
        Self::Attempt(Task::new(move || async move {
            match AssertUnwindSafe(future).catch_unwind().await {
                Ok(Ok(value)) => Resolved::Success(value),
                Ok(Err(error)) => Resolved::Failed(error),
                Err(payload) => {
                    Resolved::Fatal(FatalError::from(CaughtPanic::from_payload(payload)))
                }
            }
        }))
    }
}

// =============================================================================
// Resolution
// =============================================================================

impl<E: 'static, A: 'static> Outcome<E, A> {
    /// Awaits the outcome's terminal state.
    ///
    /// Resolving consumes the outcome; an `Attempt` runs its underlying
    /// task here and nowhere else.
    pub async fn resolve(self) -> Resolved<E, A> {
        match self {
            Self::Attempt(task) => task.run().await,
            Self::Success(value) => Resolved::Success(value),
            Self::Failed(error) => Resolved::Failed(error),
            Self::Fatal(fatal) => Resolved::Fatal(fatal),
        }
    }

    /// Blocks the current thread until the outcome resolves.
    ///
    /// For top-level driver code only; combinators never block.
    ///
    /// # Errors
    ///
    /// Returns a [`BlockingError`] when blocking is not possible in the
    /// calling context (see [`Executor::try_block_on`]).
    pub fn try_resolve_blocking(self, cx: &Executor) -> Result<Resolved<E, A>, BlockingError> {
        cx.try_block_on(self.resolve())
    }
}

impl<E: ErrorKind, A: Send + 'static> Outcome<E, A> {
    /// Extracts the underlying async handle, for handing the computation
    /// to the surrounding runtime.
    pub fn into_task(self) -> Task<Resolved<E, A>> {
        match self {
            Self::Attempt(task) => task,
            Self::Success(value) => Task::ready(Resolved::Success(value)),
            Self::Failed(error) => Task::ready(Resolved::Failed(error)),
            Self::Fatal(fatal) => Task::ready(Resolved::Fatal(fatal)),
        }
    }
}

impl<E: ErrorKind, A: Send + 'static> IntoFuture for Outcome<E, A> {
    type Output = Resolved<E, A>;
    type IntoFuture = Pin<Box<dyn Future<Output = Resolved<E, A>> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.resolve())
    }
}

// =============================================================================
// Functor / Monad Combinators
// =============================================================================

impl<E: ErrorKind, A: Send + 'static> Outcome<E, A> {
    /// Transforms the success value once the outcome resolves; failures
    /// propagate unchanged.
    ///
    /// Implemented as [`flat_map`](Self::flat_map) with an
    /// immediate-success continuation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::prelude::*;
    ///
    /// let cx = Executor::global();
    /// let outcome = Outcome::<&str, i32>::succeed(21).fmap(|x| x * 2);
    /// assert_eq!(cx.block_on(outcome.resolve()).success(), Some(42));
    /// ```
    pub fn fmap<B, F>(self, function: F) -> Outcome<E, B>
    where
        F: FnOnce(A) -> B + Send + 'static,
        B: Send + 'static,
    {
        self.flat_map(move |value| Outcome::succeed(function(value)))
    }

    /// Sequentially composes this outcome with one derived from its
    /// success value.
    ///
    /// The receiver is awaited first; only on success is `function`
    /// applied and its outcome awaited. Failure of either short-circuits.
    /// The error kind widens to `E2` at the call site (`E: Into<E2>`),
    /// which is how the declared kind's covariance is expressed here.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::prelude::*;
    ///
    /// let cx = Executor::global();
    /// let outcome = Outcome::<&str, i32>::succeed(10)
    ///     .flat_map(|x| Outcome::<String, _>::succeed(x * 2));
    /// assert_eq!(cx.block_on(outcome.resolve()).success(), Some(20));
    /// ```
    pub fn flat_map<E2, B, F>(self, function: F) -> Outcome<E2, B>
    where
        F: FnOnce(A) -> Outcome<E2, B> + Send + 'static,
        E: Into<E2>,
        E2: ErrorKind,
        B: Send + 'static,
    {
        Outcome::Attempt(Task::new(move || async move {
            match self.resolve().await {
                Resolved::Success(value) => function(value).resolve().await,
                Resolved::Failed(error) => Resolved::Failed(error.into()),
                Resolved::Fatal(fatal) => Resolved::Fatal(fatal),
            }
        }))
    }

    /// Alias for [`flat_map`](Self::flat_map), the conventional Rust name
    /// for monadic bind.
    pub fn and_then<E2, B, F>(self, function: F) -> Outcome<E2, B>
    where
        F: FnOnce(A) -> Outcome<E2, B> + Send + 'static,
        E: Into<E2>,
        E2: ErrorKind,
        B: Send + 'static,
    {
        self.flat_map(function)
    }

    /// Transforms the error on the recoverable typed channel; success and
    /// fatal failures pass through unchanged.
    ///
    /// The typed channel is only ever populated through typed constructors
    /// ([`fail`](Self::fail), [`from_try_future`](Self::from_try_future),
    /// [`from_result`](Self::from_result)), so the error handed to
    /// `function` is of the declared kind by construction; no runtime
    /// validation is performed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::prelude::*;
    ///
    /// let cx = Executor::global();
    /// let outcome = Outcome::<i32, i32>::fail(404)
    ///     .map_error(|code| format!("HTTP {code}"));
    /// assert_eq!(
    ///     cx.block_on(outcome.resolve()).failure(),
    ///     Some("HTTP 404".to_string()),
    /// );
    /// ```
    pub fn map_error<E2, F>(self, function: F) -> Outcome<E2, A>
    where
        F: FnOnce(E) -> E2 + Send + 'static,
        E2: ErrorKind,
    {
        Outcome::Attempt(Task::new(move || async move {
            match self.resolve().await {
                Resolved::Success(value) => Resolved::Success(value),
                Resolved::Failed(error) => Resolved::Failed(function(error)),
                Resolved::Fatal(fatal) => Resolved::Fatal(fatal),
            }
        }))
    }
}

// =============================================================================
// Flatten
// =============================================================================

impl<E, E2, B> Outcome<E, Outcome<E2, B>>
where
    E: ErrorKind + Into<E2>,
    E2: ErrorKind,
    B: Send + 'static,
{
    /// Collapses one level of nesting; equivalent to
    /// [`flat_map`](Outcome::flat_map) with the identity continuation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::prelude::*;
    ///
    /// let cx = Executor::global();
    /// let nested = Outcome::<&str, _>::succeed(Outcome::<&str, i32>::succeed(7));
    /// assert_eq!(cx.block_on(nested.flatten().resolve()).success(), Some(7));
    /// ```
    pub fn flatten(self) -> Outcome<E2, B> {
        self.flat_map(|inner| inner)
    }
}

// =============================================================================
// Recovery Combinators
// =============================================================================

impl<E: ErrorKind, A: Send + 'static> Outcome<E, A> {
    /// Substitutes a fallback outcome for a recoverable failure.
    ///
    /// A success passes through unchanged, and a fatal failure bypasses
    /// recovery entirely. Retries are expressed with this combinator by
    /// re-invoking a constructor in `recover`; no retry policy is built in.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::prelude::*;
    ///
    /// let cx = Executor::global();
    /// let outcome = Outcome::<&str, i32>::fail("miss")
    ///     .catch_all(|_| Outcome::<&str, i32>::succeed(0));
    /// assert_eq!(cx.block_on(outcome.resolve()).success(), Some(0));
    /// ```
    pub fn catch_all<E2, F>(self, recover: F) -> Outcome<E2, A>
    where
        F: FnOnce(E) -> Outcome<E2, A> + Send + 'static,
        E2: ErrorKind,
    {
        Outcome::Attempt(Task::new(move || async move {
            match self.resolve().await {
                Resolved::Success(value) => Resolved::Success(value),
                Resolved::Failed(error) => recover(error).resolve().await,
                Resolved::Fatal(fatal) => Resolved::Fatal(fatal),
            }
        }))
    }

    /// Substitutes a fallback outcome for a recoverable failure the
    /// partial `recover` matches.
    ///
    /// `recover` returns `Ok(fallback)` for a matched error, or hands the
    /// unmatched error back as `Err(original)`, in which case the failure
    /// passes through with its kind widened. Fatal failures bypass the
    /// combinator entirely.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::prelude::*;
    ///
    /// let cx = Executor::global();
    /// let outcome = Outcome::<i32, i32>::fail(404).catch_some(|code| {
    ///     if code == 404 {
    ///         Ok(Outcome::<i32, i32>::succeed(0))
    ///     } else {
    ///         Err(code)
    ///     }
    /// });
    /// assert_eq!(cx.block_on(outcome.resolve()).success(), Some(0));
    /// ```
    pub fn catch_some<E2, F>(self, recover: F) -> Outcome<E2, A>
    where
        F: FnOnce(E) -> Result<Outcome<E2, A>, E> + Send + 'static,
        E: Into<E2>,
        E2: ErrorKind,
    {
        Outcome::Attempt(Task::new(move || async move {
            match self.resolve().await {
                Resolved::Success(value) => Resolved::Success(value),
                Resolved::Failed(error) => match recover(error) {
                    Ok(fallback) => fallback.resolve().await,
                    Err(unmatched) => Resolved::Failed(unmatched.into()),
                },
                Resolved::Fatal(fatal) => Resolved::Fatal(fatal),
            }
        }))
    }

    /// Observes a recoverable failure without consuming it; the error
    /// still propagates afterwards.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::prelude::*;
    ///
    /// let cx = Executor::global();
    /// let outcome = Outcome::<&str, i32>::fail("miss")
    ///     .tap_error(|error| assert_eq!(*error, "miss"));
    /// assert_eq!(cx.block_on(outcome.resolve()).failure(), Some("miss"));
    /// ```
    pub fn tap_error<F>(self, observe: F) -> Self
    where
        F: FnOnce(&E) + Send + 'static,
    {
        Self::Attempt(Task::new(move || async move {
            match self.resolve().await {
                Resolved::Failed(error) => {
                    observe(&error);
                    Resolved::Failed(error)
                }
                resolved @ (Resolved::Success(_) | Resolved::Fatal(_)) => resolved,
            }
        }))
    }

    /// Runs an async cleanup after the outcome resolves, regardless of
    /// which channel it resolved on.
    ///
    /// The cleanup runs even when resolution panics, and the original
    /// panic is then resumed. A panic raised by the cleanup itself
    /// propagates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::prelude::*;
    ///
    /// let cx = Executor::global();
    /// let outcome = Outcome::<&str, i32>::succeed(42)
    ///     .finalize(|| async { /* release something */ });
    /// assert_eq!(cx.block_on(outcome.resolve()).success(), Some(42));
    /// ```
    pub fn finalize<F, Cleanup>(self, cleanup: F) -> Self
    where
        F: FnOnce() -> Cleanup + Send + 'static,
        Cleanup: Future<Output = ()> + Send + 'static,
    {
        Self::Attempt(Task::new(move || async move {
            let resolved = AssertUnwindSafe(self.resolve()).catch_unwind().await;
            cleanup().await;
            match resolved {
                Ok(resolved) => resolved,
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }))
    }
}

// =============================================================================
// Pairing
// =============================================================================

impl<E: ErrorKind, A: Send + 'static> Outcome<E, A> {
    /// Combines two outcomes into a pair, resolving both concurrently on
    /// the executor.
    ///
    /// See [`zip_with`](Self::zip_with) for the failure semantics.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::prelude::*;
    ///
    /// let cx = Executor::global();
    /// let outcome = Outcome::<&str, i32>::succeed(1)
    ///     .zip(&cx, Outcome::<&str, &str>::succeed("a"));
    /// assert_eq!(cx.block_on(outcome.resolve()).success(), Some((1, "a")));
    /// ```
    pub fn zip<B>(self, cx: &Executor, other: Outcome<E, B>) -> Outcome<E, (A, B)>
    where
        B: Send + 'static,
    {
        self.zip_with(cx, other, |left, right| (left, right))
    }

    /// Combines two outcomes with `combine`, resolving both concurrently
    /// on the executor.
    ///
    /// Success requires both operands to succeed. If either fails, the
    /// combination fails with that error; when both fail the selection is
    /// left-biased, which callers must treat as unspecified. No
    /// execution-order guarantee exists between the operands.
    ///
    /// An operand task cancelled or panicking inside the combinator
    /// plumbing surfaces on the fatal channel.
    pub fn zip_with<B, C, F>(self, cx: &Executor, other: Outcome<E, B>, combine: F) -> Outcome<E, C>
    where
        F: FnOnce(A, B) -> C + Send + 'static,
        B: Send + 'static,
        C: Send + 'static,
    {
        let cx = cx.clone();
        Outcome::Attempt(Task::new(move || async move {
            let left = cx.spawn(self.resolve());
            let right = cx.spawn(other.resolve());
            let (left, right) = futures::future::join(left, right).await;
            match (flatten_join(left), flatten_join(right)) {
                (Resolved::Success(left), Resolved::Success(right)) => {
                    Resolved::Success(combine(left, right))
                }
                (Resolved::Failed(error), _) => Resolved::Failed(error),
                (Resolved::Fatal(fatal), _) => Resolved::Fatal(fatal),
                (_, Resolved::Failed(error)) => Resolved::Failed(error),
                (_, Resolved::Fatal(fatal)) => Resolved::Fatal(fatal),
            }
        }))
    }
}

// =============================================================================
// Sequence Aggregator
// =============================================================================

impl<E: ErrorKind, A: Send + 'static> Outcome<E, Vec<A>> {
    /// Aggregates an ordered collection of outcomes into one outcome of an
    /// ordered collection.
    ///
    /// Every input is resolved on the executor and awaited. If all
    /// succeed, the output preserves the input order. If one or more fail,
    /// the aggregate fails carrying exactly one of the failing errors:
    /// the first met in a positional scan, which callers must treat as
    /// unspecified. No partial results are exposed on failure.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::prelude::*;
    ///
    /// let cx = Executor::global();
    /// let outcome = Outcome::sequence(
    ///     &cx,
    ///     (1..=3).map(Outcome::<&str, i32>::succeed),
    /// );
    /// assert_eq!(
    ///     cx.block_on(outcome.resolve()).success(),
    ///     Some(vec![1, 2, 3]),
    /// );
    /// ```
    pub fn sequence<I>(cx: &Executor, outcomes: I) -> Self
    where
        I: IntoIterator<Item = Outcome<E, A>> + Send + 'static,
        I::IntoIter: Send,
    {
        let cx = cx.clone();
        Self::Attempt(Task::new(move || async move {
            let handles: Vec<_> = outcomes
                .into_iter()
                .map(|outcome| cx.spawn(outcome.resolve()))
                .collect();

            // Wait for every input before inspecting any of them.
            let resolutions = futures::future::join_all(handles).await;

            let mut values = Vec::with_capacity(resolutions.len());
            for joined in resolutions {
                match flatten_join(joined) {
                    Resolved::Success(value) => values.push(value),
                    Resolved::Failed(error) => return Resolved::Failed(error),
                    Resolved::Fatal(fatal) => return Resolved::Fatal(fatal),
                }
            }
            Resolved::Success(values)
        }))
    }
}

/// Folds a join result back into a resolution, classifying runtime
/// failures of the combinator plumbing onto the fatal channel.
fn flatten_join<E, A>(joined: Result<Resolved<E, A>, JoinError>) -> Resolved<E, A> {
    match joined {
        Ok(resolved) => resolved,
        Err(join_error) => Resolved::Fatal(classify_join_error(join_error).escalate()),
    }
}

// =============================================================================
// Display Implementation
// =============================================================================

impl<E, A> fmt::Display for Outcome<E, A> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            Self::Attempt(_) => "Attempt",
            Self::Success(_) => "Success",
            Self::Failed(_) => "Failed",
            Self::Fatal(_) => "Fatal",
        };
        write!(formatter, "<Outcome::{shape}>")
    }
}

static_assertions::assert_impl_all!(Outcome<String, i32>: Send);
static_assertions::assert_impl_all!(Resolved<String, i32>: Send);

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Display Tests
    // =========================================================================

    #[test]
    fn test_display_outcome_shapes() {
        assert_eq!(
            format!("{}", Outcome::<&str, i32>::succeed(1)),
            "<Outcome::Success>"
        );
        assert_eq!(
            format!("{}", Outcome::<&str, i32>::fail("e")),
            "<Outcome::Failed>"
        );
        assert_eq!(
            format!("{}", Outcome::<&str, i32>::fatal("e")),
            "<Outcome::Fatal>"
        );
        assert_eq!(
            format!("{}", Outcome::from_future(async { 1 })),
            "<Outcome::Attempt>"
        );
    }

    // =========================================================================
    // Resolved Tests
    // =========================================================================

    #[test]
    fn test_resolved_predicates() {
        assert!(Resolved::<&str, i32>::Success(1).is_success());
        assert!(Resolved::<&str, i32>::Failed("e").is_failed());
        assert!(Resolved::<&str, i32>::Fatal(FatalError::interrupted()).is_fatal());
    }

    #[test]
    fn test_resolved_accessors() {
        assert_eq!(Resolved::<&str, i32>::Success(1).success(), Some(1));
        assert_eq!(Resolved::<&str, i32>::Failed("e").failure(), Some("e"));
        assert!(Resolved::<&str, i32>::Success(1).failure().is_none());
        assert!(
            Resolved::<&str, i32>::Fatal(FatalError::interrupted())
                .fatal()
                .is_some()
        );
    }

    // =========================================================================
    // Basic Resolution Tests
    // =========================================================================

    #[tokio::test]
    async fn test_succeed_resolves() {
        let resolved = Outcome::<&str, i32>::succeed(42).resolve().await;
        assert_eq!(resolved.success(), Some(42));
    }

    #[tokio::test]
    async fn test_fail_resolves() {
        let resolved = Outcome::<&str, i32>::fail("miss").resolve().await;
        assert_eq!(resolved.failure(), Some("miss"));
    }

    #[tokio::test]
    async fn test_fatal_resolves() {
        let resolved = Outcome::<&str, i32>::fatal("bad").resolve().await;
        assert!(resolved.is_fatal());
    }

    #[tokio::test]
    async fn test_from_result_round_trip() {
        let success = Outcome::<&str, i32>::from_result(Ok(1)).resolve().await;
        assert_eq!(success.success(), Some(1));

        let failure = Outcome::<&str, i32>::from_result(Err("e")).resolve().await;
        assert_eq!(failure.failure(), Some("e"));
    }

    #[tokio::test]
    async fn test_into_task_resolves_each_shape() {
        let task = Outcome::<&str, i32>::succeed(1).into_task();
        assert_eq!(task.run().await.success(), Some(1));

        let task = Outcome::<&str, i32>::fail("e").into_task();
        assert_eq!(task.run().await.failure(), Some("e"));
    }

    #[tokio::test]
    async fn test_outcome_is_awaitable() {
        let resolved = Outcome::<&str, i32>::succeed(7).fmap(|x| x + 1).await;
        assert_eq!(resolved.success(), Some(8));
    }
}
