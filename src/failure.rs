//! Failure taxonomy for typed outcomes.
//!
//! Failures travel on one of two channels:
//!
//! - the **recoverable typed channel**, carrying the declared error kind
//!   `E` and visible to the recovery combinators
//!   ([`catch_all`](crate::outcome::Outcome::catch_all),
//!   [`catch_some`](crate::outcome::Outcome::catch_some),
//!   [`map_error`](crate::outcome::Outcome::map_error));
//! - the **fatal channel** ([`FatalError`]), whose kind is erased and which
//!   bypasses every recovery combinator.
//!
//! At the boundary with the host runtime, a failure that carries no
//! declared kind must be classified. A panic caught while evaluating a
//! lifted body or a wrapped untyped future enters the typed channel as
//! [`CaughtPanic`], the broadest default kind. A panic escaping a typed
//! pipeline, or a task cancelled out from under an outcome (an
//! interruption-style control signal), is classified fatal.

use std::any::Any;
use std::error::Error;
use std::fmt;

use tokio::task::JoinError;

// =============================================================================
// Error Kind Bound
// =============================================================================

/// Upper bound for declared error kinds.
///
/// Any type that can cross an await point and describe itself qualifies;
/// the blanket implementation makes plain strings, custom enums and
/// `std::error::Error` types all usable as the `E` of an
/// [`Outcome`](crate::outcome::Outcome).
pub trait ErrorKind: fmt::Debug + Send + 'static {}

impl<T: fmt::Debug + Send + 'static> ErrorKind for T {}

// =============================================================================
// Caught Panic
// =============================================================================

/// A panic caught at a construction boundary and lifted into the typed
/// channel.
///
/// Produced by [`Outcome::of`](crate::outcome::Outcome::of) and
/// [`Outcome::from_future`](crate::outcome::Outcome::from_future), where
/// the declared error kind defaults to this broadest type. The original
/// panic payload is retained for downcasting.
///
/// # Examples
///
/// ```rust
/// use resolvent::prelude::*;
///
/// let cx = Executor::global();
/// let outcome: Outcome<CaughtPanic, i32> = Outcome::of(&cx, || panic!("boom"));
/// let resolved = cx.block_on(outcome.resolve());
/// assert_eq!(resolved.failure().unwrap().message(), "boom");
/// ```
pub struct CaughtPanic {
    message: String,
    payload: Box<dyn Any + Send>,
}

impl CaughtPanic {
    /// Wraps a raw panic payload, extracting a printable message when the
    /// payload is a string.
    #[must_use]
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        Self {
            message: panic_message(payload.as_ref()),
            payload,
        }
    }

    /// The panic message, or a placeholder for non-string payloads.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Borrows the original panic payload for downcasting.
    #[must_use]
    pub fn payload(&self) -> &(dyn Any + Send) {
        self.payload.as_ref()
    }

    /// Consumes the error, returning the original panic payload.
    #[must_use]
    pub fn into_payload(self) -> Box<dyn Any + Send> {
        self.payload
    }
}

impl fmt::Debug for CaughtPanic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CaughtPanic")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for CaughtPanic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "panic during evaluation: {}", self.message)
    }
}

impl Error for CaughtPanic {}

/// Extracts a printable message from a panic payload.
///
/// Payloads raised by `panic!` are `&'static str` or `String`; anything
/// else gets a placeholder.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// =============================================================================
// Fatal Error
// =============================================================================

/// A failure outside the typed-recovery channel.
///
/// Fatal errors propagate unchanged through every combinator:
/// [`catch_all`](crate::outcome::Outcome::catch_all),
/// [`catch_some`](crate::outcome::Outcome::catch_some) and
/// [`map_error`](crate::outcome::Outcome::map_error) never observe them.
/// One is produced by
///
/// - [`Outcome::fatal`](crate::outcome::Outcome::fatal), which erases the
///   error's kind on purpose,
/// - a panic escaping a typed pipeline, or
/// - a task being cancelled before it resolved.
pub struct FatalError {
    kind: FatalKind,
}

enum FatalKind {
    /// Explicitly constructed; the original value is kept for downcasting.
    Erased {
        message: String,
        payload: Box<dyn Any + Send>,
    },
    /// A panic that surfaced where only errors of the declared kind were
    /// expected.
    Panic(CaughtPanic),
    /// The underlying task was cancelled before resolving.
    Interrupted,
}

impl FatalError {
    /// Erases `error`'s kind, marking it as outside the typed-recovery
    /// channel regardless of its runtime type.
    #[must_use]
    pub fn erased<E: ErrorKind>(error: E) -> Self {
        Self {
            kind: FatalKind::Erased {
                message: format!("{error:?}"),
                payload: Box::new(error),
            },
        }
    }

    /// Marks an interruption-style control signal: the underlying task was
    /// cancelled out from under the outcome.
    #[must_use]
    pub fn interrupted() -> Self {
        Self {
            kind: FatalKind::Interrupted,
        }
    }

    /// Whether this fatal error is a task interruption.
    #[must_use]
    pub fn is_interruption(&self) -> bool {
        matches!(self.kind, FatalKind::Interrupted)
    }

    /// Whether this fatal error wraps an escaped panic.
    #[must_use]
    pub fn is_panic(&self) -> bool {
        matches!(self.kind, FatalKind::Panic(_))
    }

    /// A printable description of the underlying failure.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.kind {
            FatalKind::Erased { message, .. } => message.clone(),
            FatalKind::Panic(panic) => panic.message().to_string(),
            FatalKind::Interrupted => "task cancelled before resolving".to_string(),
        }
    }

    /// Attempts to view the erased error as a `T`.
    ///
    /// Only errors constructed via [`erased`](Self::erased) carry a
    /// downcastable value; panic payloads are reachable through the
    /// message instead.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match &self.kind {
            FatalKind::Erased { payload, .. } => payload.downcast_ref::<T>(),
            FatalKind::Panic(_) | FatalKind::Interrupted => None,
        }
    }
}

impl From<CaughtPanic> for FatalError {
    fn from(panic: CaughtPanic) -> Self {
        Self {
            kind: FatalKind::Panic(panic),
        }
    }
}

impl fmt::Debug for FatalError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let variant = match self.kind {
            FatalKind::Erased { .. } => "Erased",
            FatalKind::Panic(_) => "Panic",
            FatalKind::Interrupted => "Interrupted",
        };
        formatter
            .debug_struct("FatalError")
            .field("kind", &variant)
            .field("message", &self.message())
            .finish()
    }
}

impl fmt::Display for FatalError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FatalKind::Erased { message, .. } => write!(formatter, "fatal error: {message}"),
            FatalKind::Panic(panic) => write!(formatter, "fatal panic: {}", panic.message()),
            FatalKind::Interrupted => {
                write!(formatter, "fatal interruption: task cancelled before resolving")
            }
        }
    }
}

impl Error for FatalError {}

// =============================================================================
// Join-Error Classification
// =============================================================================

/// A runtime failure sorted onto one of the two channels.
pub(crate) enum Classified {
    /// A panic at a construction boundary; the declared kind there defaults
    /// to [`CaughtPanic`], so the failure stays recoverable.
    Recoverable(CaughtPanic),
    /// An interruption-style signal; never visible to recovery.
    Fatal(FatalError),
}

impl Classified {
    /// Collapses the classification onto the fatal channel, for plumbing
    /// where no typed channel exists to carry a recoverable panic.
    pub(crate) fn escalate(self) -> FatalError {
        match self {
            Self::Recoverable(panic) => FatalError::from(panic),
            Self::Fatal(fatal) => fatal,
        }
    }
}

/// Classifies the failure of a joined task.
///
/// A panicked task carries a payload worth surfacing; a cancelled task is
/// an interruption-style control signal and is always fatal.
pub(crate) fn classify_join_error(error: JoinError) -> Classified {
    if error.is_panic() {
        Classified::Recoverable(CaughtPanic::from_payload(error.into_panic()))
    } else {
        Classified::Fatal(FatalError::interrupted())
    }
}

static_assertions::assert_impl_all!(CaughtPanic: Send);
static_assertions::assert_impl_all!(FatalError: Send);
