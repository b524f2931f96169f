//! `Task` - the deferred asynchronous computation primitive.
//!
//! A [`Task<A>`] wraps an asynchronous computation producing a value of type
//! `A`. The computation is not started until [`run`](Task::run) is awaited,
//! so building and combining tasks is free of side effects.
//!
//! `Task` is the adapter between this crate and the host async runtime: the
//! [`Outcome`](crate::outcome::Outcome) combinators drive their work through
//! it and never poll futures themselves. It deliberately has no error
//! channel of its own; fallibility lives in the output type
//! ([`Resolved`](crate::outcome::Resolved) for outcomes).
//!
//! # Examples
//!
//! ```rust
//! use resolvent::task::Task;
//!
//! # let runtime = tokio::runtime::Runtime::new().unwrap();
//! # runtime.block_on(async {
//! let task = Task::ready(21).map(|x| x * 2);
//! assert_eq!(task.run().await, 42);
//! # });
//! ```

use std::future::Future;
use std::pin::Pin;

/// A deferred asynchronous computation producing a value of type `A`.
///
/// Nothing executes until [`run`](Task::run) is awaited; every combinator
/// wraps the receiver in a new deferred closure. A task is consumed by
/// running it, so it resolves at most once.
pub struct Task<A> {
    /// The wrapped computation, deferred behind a closure so that building
    /// a task never polls anything.
    thunk: Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = A> + Send>> + Send>,
}

// =============================================================================
// Constructors
// =============================================================================

impl<A: 'static> Task<A> {
    /// Creates a task from an async closure.
    ///
    /// The closure is not invoked until the task is run.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::task::Task;
    ///
    /// let task = Task::new(|| async { 10 + 20 });
    /// ```
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = A> + Send + 'static,
    {
        Self {
            thunk: Box::new(move || Box::pin(action())),
        }
    }

    /// Wraps an existing future that has not been polled yet.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::task::Task;
    ///
    /// let task = Task::from_future(async { 42 });
    /// ```
    pub fn from_future<Fut>(future: Fut) -> Self
    where
        Fut: Future<Output = A> + Send + 'static,
    {
        Self {
            thunk: Box::new(move || Box::pin(future)),
        }
    }
}

impl<A: Send + 'static> Task<A> {
    /// Creates an already-resolved task holding `value`.
    ///
    /// Running it returns the value without performing any work.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::task::Task;
    ///
    /// let task = Task::ready(42);
    /// ```
    pub fn ready(value: A) -> Self {
        Self {
            thunk: Box::new(move || Box::pin(async move { value })),
        }
    }
}

// =============================================================================
// Execution
// =============================================================================

impl<A: 'static> Task<A> {
    /// Executes the task and returns its value.
    ///
    /// This is the only way to extract a value from a task and the only
    /// point at which the deferred computation actually runs.
    pub async fn run(self) -> A {
        (self.thunk)().await
    }
}

// =============================================================================
// Combinators
// =============================================================================

impl<A: 'static> Task<A> {
    /// Transforms the task's value with `function` once it resolves.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::task::Task;
    ///
    /// let task = Task::ready(21).map(|x| x * 2);
    /// ```
    pub fn map<B, F>(self, function: F) -> Task<B>
    where
        F: FnOnce(A) -> B + Send + 'static,
        B: 'static,
    {
        Task::new(move || async move {
            let value = self.run().await;
            function(value)
        })
    }

    /// Sequentially composes this task with one derived from its value.
    ///
    /// The second task is created only after the first resolves.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::task::Task;
    ///
    /// let task = Task::ready(10).and_then(|x| Task::ready(x * 2));
    /// ```
    pub fn and_then<B, F>(self, function: F) -> Task<B>
    where
        F: FnOnce(A) -> Task<B> + Send + 'static,
        B: 'static,
    {
        Task::new(move || async move {
            let value = self.run().await;
            function(value).run().await
        })
    }
}

impl<A: Send + 'static> Task<A> {
    /// Combines two tasks, running them concurrently within the awaiting
    /// task, and merges their values with `combine`.
    ///
    /// No execution-order guarantee exists between the operands; only the
    /// combined value is a contract.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::task::Task;
    ///
    /// let task = Task::ready(10).zip_with(Task::ready(20), |a, b| a + b);
    /// ```
    pub fn zip_with<B, C, F>(self, other: Task<B>, combine: F) -> Task<C>
    where
        F: FnOnce(A, B) -> C + Send + 'static,
        B: Send + 'static,
        C: 'static,
    {
        Task::new(move || async move {
            let (left, right) = futures::future::join(self.run(), other.run()).await;
            combine(left, right)
        })
    }

    /// Aggregates an ordered collection of tasks into one task producing
    /// the values in input order.
    ///
    /// The operands are polled concurrently within the awaiting task.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use resolvent::task::Task;
    ///
    /// let task = Task::join_all(vec![Task::ready(1), Task::ready(2)]);
    /// ```
    pub fn join_all<I>(tasks: I) -> Task<Vec<A>>
    where
        I: IntoIterator<Item = Self> + Send + 'static,
        I::IntoIter: Send,
    {
        Task::new(move || async move {
            futures::future::join_all(tasks.into_iter().map(Task::run)).await
        })
    }
}

// =============================================================================
// Display Implementation
// =============================================================================

impl<A> std::fmt::Display for Task<A> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "<Task>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_display_task() {
        let task = Task::ready(42);
        assert_eq!(format!("{task}"), "<Task>");
    }

    #[tokio::test]
    async fn test_ready_and_run() {
        let task = Task::ready(42);
        assert_eq!(task.run().await, 42);
    }

    #[tokio::test]
    async fn test_new_and_run() {
        let task = Task::new(|| async { 10 + 20 });
        assert_eq!(task.run().await, 30);
    }

    #[tokio::test]
    async fn test_from_future() {
        let task = Task::from_future(async { 7 });
        assert_eq!(task.run().await, 7);
    }

    #[tokio::test]
    async fn test_map() {
        let task = Task::ready(21).map(|x| x * 2);
        assert_eq!(task.run().await, 42);
    }

    #[tokio::test]
    async fn test_and_then() {
        let task = Task::ready(10).and_then(|x| Task::ready(x + 5));
        assert_eq!(task.run().await, 15);
    }

    #[tokio::test]
    async fn test_zip_with() {
        let task = Task::ready(10).zip_with(Task::ready(20), |a, b| a + b);
        assert_eq!(task.run().await, 30);
    }

    #[tokio::test]
    async fn test_join_all_preserves_order() {
        let task = Task::join_all(vec![Task::ready(1), Task::ready(2), Task::ready(3)]);
        assert_eq!(task.run().await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_composition_is_lazy() {
        let executed = Arc::new(AtomicBool::new(false));
        let executed_clone = executed.clone();

        let task = Task::new(move || async move {
            executed_clone.store(true, Ordering::SeqCst);
            42
        })
        .map(|x| x + 1);

        // Not executed yet
        assert!(!executed.load(Ordering::SeqCst));

        assert_eq!(task.run().await, 43);
        assert!(executed.load(Ordering::SeqCst));
    }
}
