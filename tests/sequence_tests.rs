//! Sequence aggregator tests.
//!
//! Verifies the ordered aggregation contract: all-success preserves input
//! order, any failure fails the aggregate with exactly one failing error,
//! no partial results are exposed, and aggregation is lazy until resolved.

use resolvent::prelude::*;
use rstest::rstest;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

// =============================================================================
// Ordering Tests
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_sequence_preserves_input_order() {
    let cx = Executor::global();
    let outcome = Outcome::sequence(&cx, (1..=3).map(Outcome::<&str, i32>::succeed));
    assert_eq!(outcome.resolve().await.success(), Some(vec![1, 2, 3]));
}

#[rstest]
#[tokio::test]
async fn test_sequence_order_is_positional_not_completion() {
    let cx = Executor::global();

    // The first input resolves last in wall-clock time; the output must
    // still be in input order.
    let slow = Outcome::<&str, i32>::from_try_future(async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Ok(1)
    });
    let fast = Outcome::<&str, i32>::succeed(2);

    let outcome = Outcome::sequence(&cx, vec![slow, fast]);
    assert_eq!(outcome.resolve().await.success(), Some(vec![1, 2]));
}

#[rstest]
#[tokio::test]
async fn test_sequence_of_empty_collection() {
    let cx = Executor::global();
    let outcome = Outcome::sequence(&cx, Vec::<Outcome<&str, i32>>::new());
    assert_eq!(outcome.resolve().await.success(), Some(vec![]));
}

#[rstest]
#[tokio::test]
async fn test_sequence_of_many() {
    let cx = Executor::global();
    let outcome = Outcome::sequence(&cx, (0..100).map(Outcome::<&str, i32>::succeed));
    assert_eq!(
        outcome.resolve().await.success(),
        Some((0..100).collect::<Vec<_>>()),
    );
}

// =============================================================================
// Failure Tests
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_sequence_fails_with_the_failing_error() {
    let cx = Executor::global();
    let outcome = Outcome::sequence(
        &cx,
        vec![
            Outcome::<&str, i32>::succeed(1),
            Outcome::<&str, i32>::fail("broken"),
            Outcome::<&str, i32>::succeed(3),
        ],
    );
    assert_eq!(outcome.resolve().await.failure(), Some("broken"));
}

#[rstest]
#[tokio::test]
async fn test_sequence_exposes_no_partial_results() {
    let cx = Executor::global();
    let outcome = Outcome::sequence(
        &cx,
        vec![
            Outcome::<&str, i32>::succeed(1),
            Outcome::<&str, i32>::fail("broken"),
        ],
    );
    let resolved = outcome.resolve().await;
    assert!(resolved.success().is_none());
}

#[rstest]
#[tokio::test]
async fn test_sequence_carries_exactly_one_error() {
    let cx = Executor::global();
    let outcome = Outcome::sequence(
        &cx,
        vec![
            Outcome::<&str, i32>::fail("first"),
            Outcome::<&str, i32>::fail("second"),
        ],
    );
    // Which of several failures is carried is unspecified; it must be one
    // of the inputs' errors.
    let error = outcome.resolve().await.failure().expect("must fail");
    assert!(error == "first" || error == "second");
}

#[rstest]
#[tokio::test]
async fn test_sequence_propagates_fatal() {
    let cx = Executor::global();
    let outcome = Outcome::sequence(
        &cx,
        vec![
            Outcome::<&str, i32>::succeed(1),
            Outcome::<&str, i32>::fatal("corrupted"),
        ],
    );
    assert!(outcome.resolve().await.is_fatal());
}

#[rstest]
#[tokio::test]
async fn test_sequence_fatal_is_not_recoverable_afterwards() {
    let cx = Executor::global();
    let outcome = Outcome::sequence(
        &cx,
        vec![
            Outcome::<&str, i32>::succeed(1),
            Outcome::<&str, i32>::fatal("corrupted"),
        ],
    )
    .catch_all(|_| Outcome::<&str, Vec<i32>>::succeed(vec![]));
    assert!(outcome.resolve().await.is_fatal());
}

// =============================================================================
// Laziness Tests
// =============================================================================

#[rstest]
#[tokio::test]
async fn test_sequence_is_lazy() {
    let cx = Executor::global();
    let runs = Arc::new(AtomicUsize::new(0));

    let inputs: Vec<Outcome<&str, i32>> = (0..3)
        .map(|index| {
            let runs = runs.clone();
            Outcome::from_try_future(async move {
                runs.fetch_add(1, Ordering::SeqCst);
                Ok(index)
            })
        })
        .collect();

    let outcome = Outcome::sequence(&cx, inputs);

    // Nothing has been submitted yet.
    assert_eq!(runs.load(Ordering::SeqCst), 0);

    let resolved = outcome.resolve().await;
    assert_eq!(resolved.success(), Some(vec![0, 1, 2]));
    assert_eq!(runs.load(Ordering::SeqCst), 3);
}
