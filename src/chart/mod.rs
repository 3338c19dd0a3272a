//! Chart core: scales, geometry, hover and live updates for one chart.
//!
//! Everything here is synchronous except the live tick stream. A
//! [`PriceChart`] owns its series snapshot, viewport and hover state, and
//! rebuilds its [`ChartFrame`] whenever any of them changes.

pub mod frame;
pub mod geometry;
pub mod interaction;
pub mod live;
pub mod path;
#[cfg(any(feature = "native", feature = "wasm"))]
pub mod runtime;
pub mod scale;
pub mod summary;

pub use frame::{ChartFrame, PointerTarget, RenderMode, PLACEHOLDER_OPACITY};
pub use geometry::{Padding, Point, Viewport, DEFAULT_WIDTH};
pub use interaction::{HoverState, Interaction};
pub use live::{LiveTicker, LiveUpdater, LiveWindow, Tick, TickStream};
pub use path::{AreaGeometry, PathCommand, PathGeometry};
pub use scale::{build_scales, ScaleInfo};
pub use summary::{Direction, PriceSummary};

use crate::domain::series::{
    Applied, FetchedSeries, Observation, RequestTicket, Series, SeriesState,
};
use crate::domain::timeframe::Timeframe;
use crate::error::FetchError;
use crate::shared::TokenId;

use std::time::Duration;

pub const DEFAULT_HEIGHT: f64 = 200.0;

/// Host-facing inputs of a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartProps {
    pub timeframe: Timeframe,
    /// Latest known price from the asset, shown when nothing is hovered.
    pub current_price: Option<f64>,
    pub height: f64,
    pub show_floor: bool,
}

impl Default for ChartProps {
    fn default() -> Self {
        Self {
            timeframe: Timeframe::default(),
            current_price: None,
            height: DEFAULT_HEIGHT,
            show_floor: true,
        }
    }
}

type HoverCallback = Box<dyn FnMut(Option<&Observation>)>;
type TimeframeCallback = Box<dyn FnMut(Timeframe)>;

/// One chart instance, as embedded by a host UI.
///
/// The host forwards data, resize and pointer events; the chart calls back
/// when the hovered observation changes or the user picks a timeframe.
///
/// The chart owns the fetch tickets and the live interval for its selected
/// timeframe. Switching away from LIVE stops the interval, and so does
/// dropping the chart.
pub struct PriceChart {
    props: ChartProps,
    width: Option<f64>,
    state: SeriesState,
    live: LiveUpdater,
    pending_ticks: Option<TickStream>,
    frame: ChartFrame,
    interaction: Interaction,
    on_price_hover: Option<HoverCallback>,
    on_timeframe_change: Option<TimeframeCallback>,
}

impl PriceChart {
    pub fn new(props: ChartProps) -> Self {
        let frame = ChartFrame::derive(
            Series::empty(),
            Viewport::resolve(None, props.height),
            props.show_floor,
        );
        let mut state = SeriesState::new();
        state.switch_timeframe(props.timeframe);
        Self {
            props,
            width: None,
            state,
            live: LiveUpdater::new(Series::empty(), props.timeframe),
            pending_ticks: None,
            frame,
            interaction: Interaction::new(),
            on_price_hover: None,
            on_timeframe_change: None,
        }
    }

    pub fn on_price_hover(mut self, f: impl FnMut(Option<&Observation>) + 'static) -> Self {
        self.on_price_hover = Some(Box::new(f));
        self
    }

    pub fn on_timeframe_change(mut self, f: impl FnMut(Timeframe) + 'static) -> Self {
        self.on_timeframe_change = Some(Box::new(f));
        self
    }

    /// Override the live tick interval. Takes effect from the next start.
    pub fn with_live_interval(mut self, interval: Duration) -> Self {
        self.live = self.live.with_interval(interval);
        self
    }

    // ── Inputs ───────────────────────────────────────────────────────────

    /// Replace the displayed series and re-derive the frame. While LIVE is
    /// selected the series also becomes the live window's seed.
    pub fn set_price_data(&mut self, series: Series) {
        self.state.replace(series.clone());
        if self.props.timeframe.is_live() {
            self.live.reseed(series.clone());
        }
        self.rebuild(series);
    }

    pub fn set_current_price(&mut self, price: Option<f64>) {
        self.props.current_price = price;
    }

    pub fn set_show_floor(&mut self, show_floor: bool) {
        if self.props.show_floor != show_floor {
            self.props.show_floor = show_floor;
            self.rebuild(self.frame.series().clone());
        }
    }

    /// User picked a timeframe. Clears any hover, invalidates in-flight
    /// fetches, starts or stops the live interval and notifies the host,
    /// which is expected to fetch via [`begin_fetch`](Self::begin_fetch).
    /// Returns `false` if `timeframe` was already selected.
    pub fn select_timeframe(&mut self, timeframe: Timeframe) -> bool {
        if self.props.timeframe == timeframe {
            return false;
        }
        self.props.timeframe = timeframe;
        self.state.switch_timeframe(timeframe);
        self.live.reseed(Series::empty());
        self.pending_ticks = self.live.set_timeframe(timeframe);
        self.clear_hover();
        if let Some(cb) = self.on_timeframe_change.as_mut() {
            cb(timeframe);
        }
        true
    }

    /// Container resized. `None` width means layout has not happened yet.
    pub fn resize(&mut self, width: Option<f64>, height: f64) {
        self.width = width;
        self.props.height = height;
        self.rebuild(self.frame.series().clone());
    }

    // ── Fetching ─────────────────────────────────────────────────────────

    /// Ticket for a fetch of `token_id` at the selected timeframe. Any
    /// earlier ticket becomes stale.
    pub fn begin_fetch(&mut self, token_id: TokenId) -> RequestTicket {
        self.state.begin(token_id, self.props.timeframe)
    }

    /// Hand back a fetch result. Only the current ticket changes what is
    /// displayed; a failure keeps the last good series.
    pub fn complete_fetch(
        &mut self,
        ticket: &RequestTicket,
        result: Result<FetchedSeries, FetchError>,
    ) -> Applied {
        let applied = self.state.complete(ticket, result);
        if let Applied::Replaced { .. } = applied {
            let series = self.state.displayed().clone();
            if self.props.timeframe.is_live() {
                self.live.reseed(series.clone());
            }
            self.rebuild(series);
        }
        applied
    }

    // ── Live ─────────────────────────────────────────────────────────────

    /// The tick stream to drive while LIVE is selected. `None` when another
    /// timeframe is selected or the stream was already handed out. Each
    /// tick should be answered with [`tick`](Self::tick).
    pub fn live_ticks(&mut self) -> Option<TickStream> {
        self.pending_ticks.take().or_else(|| self.live.start())
    }

    /// Advance the live window by one interval and redraw. Returns whether
    /// the displayed series changed.
    pub fn tick(&mut self, now: i64, fetched: Option<Observation>) -> bool {
        let Some(series) = self.live.tick(now, fetched) else {
            return false;
        };
        if !self.state.apply_live(series.clone()) {
            return false;
        }
        self.rebuild(series);
        true
    }

    pub fn is_live_running(&self) -> bool {
        self.live.is_running()
    }

    // ── Pointer ──────────────────────────────────────────────────────────

    /// Whether pointer handlers should be attached at all.
    pub fn accepts_pointer(&self) -> bool {
        self.frame.pointer_target().is_some()
    }

    pub fn pointer_move(&mut self, x: f64) -> Option<HoverState> {
        let target = self.frame.pointer_target()?;
        let before = self.interaction.hover().map(|h| h.index);
        let after = self.interaction.on_pointer_move(&target, x).copied();
        if before != after.map(|h| h.index) {
            self.emit_hover();
        }
        after
    }

    pub fn pointer_leave(&mut self) {
        self.clear_hover();
    }

    // ── Outputs ──────────────────────────────────────────────────────────

    pub fn frame(&self) -> &ChartFrame {
        &self.frame
    }

    pub fn hover(&self) -> Option<&HoverState> {
        self.interaction.hover()
    }

    pub fn summary(&self) -> PriceSummary {
        PriceSummary::compute(
            self.frame.series(),
            self.interaction.hover(),
            self.props.current_price,
        )
    }

    pub fn props(&self) -> &ChartProps {
        &self.props
    }

    pub fn series(&self) -> &Series {
        self.frame.series()
    }

    pub fn series_state(&self) -> &SeriesState {
        &self.state
    }

    // ── Internal ─────────────────────────────────────────────────────────

    fn rebuild(&mut self, series: Series) {
        let viewport = Viewport::resolve(self.width, self.props.height);
        self.frame = ChartFrame::derive(series, viewport, self.props.show_floor);
        if self.interaction.sync(&self.frame) {
            self.emit_hover();
        }
    }

    fn clear_hover(&mut self) {
        if self.interaction.is_hovering() {
            self.interaction.on_pointer_leave();
            self.emit_hover();
        }
    }

    fn emit_hover(&mut self) {
        let observation = self.interaction.hover().map(|h| h.observation);
        if let Some(cb) = self.on_price_hover.as_mut() {
            cb(observation.as_ref());
        }
    }
}
