// tests/retry_backoff.rs
// The backoff contract: invocation counts, success pass-through, and the
// last error propagating unchanged after exhaustion.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use reelscore::retry::{retry, RetryPolicy};

fn policy(retries: u32) -> RetryPolicy {
    RetryPolicy {
        retries,
        delay_ms: 100,
        factor: 2.0,
        jitter: false,
    }
}

#[tokio::test(start_paused = true)]
async fn two_failures_then_success_with_three_retries() {
    let calls = Arc::new(AtomicU32::new(0));
    let c = calls.clone();

    let out = retry("flaky", policy(3), move || {
        let c = c.clone();
        async move {
            let n = c.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(anyhow!("transient failure {n}"))
            } else {
                Ok("resolved")
            }
        }
    })
    .await;

    assert_eq!(out.unwrap(), "resolved");
    assert_eq!(
        calls.load(Ordering::SeqCst),
        3,
        "the operation must run exactly three times"
    );
}

#[tokio::test(start_paused = true)]
async fn always_failing_operation_runs_exactly_n_times() {
    for n in [1u32, 2, 4] {
        let calls = Arc::new(AtomicU32::new(0));
        let c = calls.clone();

        let out: Result<()> = retry("doomed", policy(n), move || {
            let c = c.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err(anyhow!("permanent failure"))
            }
        })
        .await;

        assert!(out.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), n);
    }
}

#[tokio::test(start_paused = true)]
async fn last_error_is_propagated_unchanged() {
    let out: Result<()> = retry("doomed", policy(3), || async {
        Err(anyhow!("ECONNRESET from upstream"))
    })
    .await;

    assert_eq!(out.unwrap_err().to_string(), "ECONNRESET from upstream");
}

#[tokio::test(start_paused = true)]
async fn backoff_waits_grow_by_the_factor() {
    let t0 = tokio::time::Instant::now();

    let out: Result<()> = retry("doomed", policy(3), || async { Err(anyhow!("nope")) }).await;
    assert!(out.is_err());

    // waits: 100ms then 200ms (jitter disabled) -> 300ms of virtual time
    let elapsed = t0.elapsed();
    assert!(
        elapsed >= std::time::Duration::from_millis(300),
        "expected at least 300ms of backoff, got {elapsed:?}"
    );
}
