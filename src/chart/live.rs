//! Live updater: bounded rolling window fed on a fixed interval.
//!
//! The interval is a [`LiveTicker`]: an owned handle around an abortable
//! tick stream. Stopping or dropping the handle ends the stream, so no tick
//! reaches the chart after it leaves LIVE or is torn down.

use crate::domain::series::{Observation, Series};
use crate::domain::timeframe::Timeframe;

use futures_util::future::AbortHandle;
use futures_util::stream::{Abortable, StreamExt};
use rand::Rng;
use std::time::Duration;

pub const LIVE_WINDOW_CAPACITY: usize = 60;
pub const LIVE_INTERVAL: Duration = Duration::from_secs(5);
/// Largest relative move of a synthesized observation per tick.
pub const MAX_SYNTHETIC_DRIFT: f64 = 0.01;

// ─── Window ──────────────────────────────────────────────────────────────────

/// Rolling window of at most `capacity` observations, oldest first.
#[derive(Debug, Clone)]
pub struct LiveWindow {
    series: Series,
    capacity: usize,
}

impl LiveWindow {
    pub fn new(seed: Series) -> Self {
        Self::with_capacity(seed, LIVE_WINDOW_CAPACITY)
    }

    /// Seeds longer than `capacity` keep their latest entries.
    pub fn with_capacity(seed: Series, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let series = if seed.len() > capacity {
            Series::new(seed.as_slice()[seed.len() - capacity..].to_vec())
        } else {
            seed
        };
        Self { series, capacity }
    }

    /// Append `obs`, evicting the oldest entry once full. A timestamp at or
    /// before the newest entry is moved to one second after it.
    pub fn push(&mut self, mut obs: Observation) -> Series {
        if let Some(last) = self.series.last() {
            if obs.timestamp <= last.timestamp {
                obs.timestamp = last.timestamp.saturating_add(1);
            }
        }
        self.series = self.series.appended_bounded(obs, self.capacity);
        self.series.clone()
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// ─── Ticker ──────────────────────────────────────────────────────────────────

/// Sequence number of a tick, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick(pub u64);

#[cfg(not(target_arch = "wasm32"))]
pub type TickStream = Abortable<futures_util::stream::BoxStream<'static, Tick>>;
#[cfg(target_arch = "wasm32")]
pub type TickStream = Abortable<futures_util::stream::LocalBoxStream<'static, Tick>>;

/// Owned handle for a running tick stream.
#[derive(Debug)]
pub struct LiveTicker {
    handle: AbortHandle,
    interval: Duration,
    stopped: bool,
}

impl LiveTicker {
    pub fn start(interval: Duration) -> (LiveTicker, TickStream) {
        let ticks = async_stream::stream! {
            let mut seq = 0u64;
            loop {
                futures_timer::Delay::new(interval).await;
                seq += 1;
                yield Tick(seq);
            }
        };
        #[cfg(not(target_arch = "wasm32"))]
        let ticks = ticks.boxed();
        #[cfg(target_arch = "wasm32")]
        let ticks = ticks.boxed_local();

        let (handle, registration) = AbortHandle::new_pair();
        tracing::debug!(interval_ms = interval.as_millis() as u64, "Live ticker started");

        (
            LiveTicker {
                handle,
                interval,
                stopped: false,
            },
            Abortable::new(ticks, registration),
        )
    }

    pub fn stop(&mut self) {
        if !self.stopped {
            self.handle.abort();
            self.stopped = true;
            tracing::debug!("Live ticker stopped");
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Drop for LiveTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─── Updater ─────────────────────────────────────────────────────────────────

/// Drives the live window while LIVE is selected.
#[derive(Debug)]
pub struct LiveUpdater {
    window: LiveWindow,
    timeframe: Timeframe,
    enabled: bool,
    interval: Duration,
    ticker: Option<LiveTicker>,
}

impl LiveUpdater {
    pub fn new(seed: Series, timeframe: Timeframe) -> Self {
        Self {
            window: LiveWindow::new(seed),
            timeframe,
            enabled: true,
            interval: LIVE_INTERVAL,
            ticker: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Start ticking if LIVE is selected, the updater is enabled, and no
    /// ticker is already running. The caller drives the returned stream.
    pub fn start(&mut self) -> Option<TickStream> {
        if !self.is_active() || self.is_running() {
            return None;
        }
        let (ticker, stream) = LiveTicker::start(self.interval);
        self.ticker = Some(ticker);
        Some(stream)
    }

    pub fn stop(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
        }
    }

    /// Follow a timeframe switch. Entering LIVE starts a ticker, leaving it
    /// stops the current one.
    pub fn set_timeframe(&mut self, timeframe: Timeframe) -> Option<TickStream> {
        self.timeframe = timeframe;
        if timeframe.is_live() {
            self.start()
        } else {
            self.stop();
            None
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) -> Option<TickStream> {
        self.enabled = enabled;
        if enabled {
            self.start()
        } else {
            self.stop();
            None
        }
    }

    pub fn is_active(&self) -> bool {
        self.enabled && self.timeframe.is_live()
    }

    pub fn is_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_stopped())
    }

    /// Replace the window, e.g. after a fresh LIVE fetch.
    pub fn reseed(&mut self, seed: Series) {
        self.window = LiveWindow::with_capacity(seed, self.window.capacity());
    }

    pub fn window(&self) -> &Series {
        self.window.series()
    }

    /// Advance one interval. Uses `fetched` when given, otherwise drifts
    /// the newest observation. `None` when inactive or there is nothing to
    /// drift from.
    pub fn tick(&mut self, now: i64, fetched: Option<Observation>) -> Option<Series> {
        self.tick_with(now, fetched, &mut rand::thread_rng())
    }

    pub fn tick_with<R: Rng + ?Sized>(
        &mut self,
        now: i64,
        fetched: Option<Observation>,
        rng: &mut R,
    ) -> Option<Series> {
        if !self.is_active() {
            return None;
        }
        let obs = match fetched {
            Some(obs) => Observation { timestamp: now, ..obs },
            None => synthesize(self.window.series().last()?, now, rng),
        };
        Some(self.window.push(obs))
    }
}

fn synthesize<R: Rng + ?Sized>(last: &Observation, now: i64, rng: &mut R) -> Observation {
    let market_drift = rng.gen_range(-MAX_SYNTHETIC_DRIFT..=MAX_SYNTHETIC_DRIFT);
    let floor_drift = rng.gen_range(-MAX_SYNTHETIC_DRIFT..=MAX_SYNTHETIC_DRIFT);
    let market_price = (last.market_price * (1.0 + market_drift)).max(0.0);
    let floor_price = (last.floor_price * (1.0 + floor_drift)).clamp(0.0, market_price);
    Observation::new(now, market_price, floor_price, last.volume)
}
