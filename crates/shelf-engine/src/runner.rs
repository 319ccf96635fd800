// Rust guideline compliant 2026-08-05

//! Sequential, cancellable async iteration.
//!
//! The engine never fans out: per-item bookkeeping runs one item at a
//! time, yielding to the scheduler between items so the owning thread is
//! never held for more than one item's work. Pass latency scales linearly
//! with item count; in exchange at most one operation is ever in flight.

use std::future::Future;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Aggregate result of a completed sequential walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Number of items processed.
    pub processed: usize,
    /// Wall time from first item to completion.
    pub elapsed: Duration,
}

/// Runs `op` over `items` strictly one at a time, in order.
///
/// The cancellation token is checked between every two steps; once
/// cancelled, no further `op` is invoked and the walk returns `None` —
/// completion is never observed. Already-performed work is not rolled
/// back.
///
/// # Arguments
///
/// * `items` - Snapshot list to walk, in order
/// * `cancel` - Scope token; cancel to stop the walk between steps
/// * `op` - Asynchronous per-item operation
///
/// # Returns
///
/// `Some(RunStats)` after the final item, `None` if cancelled.
pub async fn run_sequential<T, F, Fut>(
    items: Vec<T>,
    cancel: &CancellationToken,
    mut op: F,
) -> Option<RunStats>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = ()>,
{
    let started = Instant::now();
    let mut processed = 0usize;

    for item in items {
        if cancel.is_cancelled() {
            return None;
        }
        op(item).await;
        processed += 1;
        tokio::task::yield_now().await;
    }

    if cancel.is_cancelled() {
        return None;
    }

    Some(RunStats {
        processed,
        elapsed: started.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[tokio::test]
    async fn test_processes_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let cancel = CancellationToken::new();

        let stats = run_sequential(vec![1, 2, 3, 4], &cancel, |n| {
            let seen = Rc::clone(&seen);
            async move {
                seen.borrow_mut().push(n);
            }
        })
        .await
        .expect("walk completes");

        assert_eq!(stats.processed, 4);
        assert_eq!(*seen.borrow(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_empty_walk_completes() {
        let cancel = CancellationToken::new();
        let stats = run_sequential(Vec::<i32>::new(), &cancel, |_| async {})
            .await
            .expect("empty walk completes");
        assert_eq!(stats.processed, 0);
    }

    #[tokio::test]
    async fn test_cancellation_stops_between_steps() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let cancel = CancellationToken::new();

        let result = run_sequential(vec![1, 2, 3, 4, 5], &cancel, |n| {
            let seen = Rc::clone(&seen);
            let cancel = cancel.clone();
            async move {
                seen.borrow_mut().push(n);
                if n == 2 {
                    cancel.cancel();
                }
            }
        })
        .await;

        // Cancelled after item 2: items 3..5 never ran, no stats.
        assert!(result.is_none());
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_pre_cancelled_runs_nothing() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = run_sequential(vec![1, 2], &cancel, |n| {
            let seen = Rc::clone(&seen);
            async move {
                seen.borrow_mut().push(n);
            }
        })
        .await;

        assert!(result.is_none());
        assert!(seen.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_cancellation_after_last_item_suppresses_completion() {
        let cancel = CancellationToken::new();
        let result = run_sequential(vec![1], &cancel, |_| {
            let cancel = cancel.clone();
            async move {
                cancel.cancel();
            }
        })
        .await;

        assert!(result.is_none());
    }
}
