use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use copydesk_engine::ScopedTimers;
use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;

fn counting_timer(
    fired: Arc<AtomicUsize>,
    after: Duration,
) -> impl FnOnce(CancellationToken) -> BoxFuture<'static, ()> {
    move |token| {
        Box::pin(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(after) => {
                    fired.fetch_add(1, Ordering::SeqCst);
                }
            }
        })
    }
}

#[tokio::test]
async fn disarm_cancels_before_firing() {
    let fired = Arc::new(AtomicUsize::new(0));
    let mut timers = ScopedTimers::new();

    timers.arm("job-1", counting_timer(fired.clone(), Duration::from_millis(50)));
    assert!(timers.is_armed(&"job-1"));
    assert!(timers.disarm(&"job-1"));
    assert!(!timers.disarm(&"job-1"));

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    assert_eq!(timers.active(), 0);
}

#[tokio::test]
async fn rearming_replaces_the_previous_timer() {
    let fired = Arc::new(AtomicUsize::new(0));
    let mut timers = ScopedTimers::new();

    timers.arm(1u64, counting_timer(fired.clone(), Duration::from_millis(40)));
    timers.arm(1u64, counting_timer(fired.clone(), Duration::from_millis(40)));
    assert_eq!(timers.active(), 1);

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(!timers.is_armed(&1));
}

#[tokio::test]
async fn dropping_the_registry_cancels_everything() {
    let fired = Arc::new(AtomicUsize::new(0));
    {
        let mut timers = ScopedTimers::new();
        timers.arm("a", counting_timer(fired.clone(), Duration::from_millis(40)));
        timers.arm("b", counting_timer(fired.clone(), Duration::from_millis(40)));
        assert_eq!(timers.active(), 2);
    }

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}
