//! Drive a [`TickStream`] on the host runtime.
//!
//! The spawned task ends as soon as its [`LiveTicker`](super::live::LiveTicker)
//! is stopped or dropped, so the ticker stays the owner of the interval.

use super::live::{Tick, TickStream};
use futures_util::StreamExt;

/// Run `on_tick` for every tick on the current tokio runtime.
#[cfg(feature = "native")]
pub fn spawn_ticks<F>(mut ticks: TickStream, mut on_tick: F) -> tokio::task::JoinHandle<()>
where
    F: FnMut(Tick) + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(tick) = ticks.next().await {
            on_tick(tick);
        }
        tracing::debug!("Live tick task finished");
    })
}

/// Run `on_tick` for every tick on the browser event loop.
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub fn spawn_ticks_local<F>(mut ticks: TickStream, mut on_tick: F)
where
    F: FnMut(Tick) + 'static,
{
    wasm_bindgen_futures::spawn_local(async move {
        while let Some(tick) = ticks.next().await {
            on_tick(tick);
        }
        tracing::debug!("Live tick task finished");
    });
}

#[cfg(all(test, feature = "native"))]
mod tests {
    use super::*;
    use crate::chart::live::LiveTicker;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_task_ends_when_ticker_stops() {
        let seen = Arc::new(AtomicU64::new(0));
        let (mut ticker, ticks) = LiveTicker::start(Duration::from_millis(5));
        let task = spawn_ticks(ticks, {
            let seen = seen.clone();
            move |Tick(n)| seen.store(n, Ordering::SeqCst)
        });

        tokio::time::sleep(Duration::from_millis(30)).await;
        ticker.stop();
        task.await.unwrap();

        let at_stop = seen.load(Ordering::SeqCst);
        assert!(at_stop >= 1);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(seen.load(Ordering::SeqCst), at_stop);
    }
}
