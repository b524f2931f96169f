//! # resolvent
//!
//! A typed-error outcome abstraction layered over deferred asynchronous
//! computations.
//!
//! ## Overview
//!
//! The central type is [`Outcome<E, A>`](outcome::Outcome): a computation
//! that will eventually produce a success value of type `A` or fail with an
//! error of the declared kind `E`. The compiler tracks which error kind each
//! composition step can produce, and the combinator algebra distinguishes
//! recoverable, typed failures from fatal ones that bypass every recovery
//! combinator.
//!
//! - **Typed failures** live in the declared channel `E` and are visible to
//!   [`catch_all`](outcome::Outcome::catch_all),
//!   [`catch_some`](outcome::Outcome::catch_some) and
//!   [`map_error`](outcome::Outcome::map_error).
//! - **Fatal failures** ([`FatalError`](failure::FatalError)) erase their
//!   kind and always propagate.
//!
//! Execution is delegated entirely to the host async runtime: composition is
//! lazy, and the operations that actually submit work take an explicit
//! [`Executor`](executor::Executor).
//!
//! ## Example
//!
//! ```rust
//! use resolvent::prelude::*;
//!
//! let cx = Executor::global();
//! let outcome = Outcome::<&str, i32>::succeed(20)
//!     .fmap(|x| x * 2)
//!     .flat_map(|x| Outcome::<&str, i32>::succeed(x + 2));
//!
//! let resolved = cx.block_on(outcome.resolve());
//! assert_eq!(resolved.success(), Some(42));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types.
///
/// # Usage
///
/// ```rust
/// use resolvent::prelude::*;
/// ```
pub mod prelude {
    pub use crate::executor::{BlockingError, Executor};
    pub use crate::failure::{CaughtPanic, ErrorKind, FatalError};
    pub use crate::outcome::{Outcome, Resolved};
    pub use crate::task::Task;
}

pub mod executor;
pub mod failure;
pub mod outcome;
pub mod task;

pub use executor::{BlockingError, Executor};
pub use failure::{CaughtPanic, ErrorKind, FatalError};
pub use outcome::{Outcome, Resolved};
pub use task::Task;
