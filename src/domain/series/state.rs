//! Series state container: app-owned, SDK-provided update logic.
//!
//! Fetches may resolve out of order: a slow response for an earlier
//! timeframe can land after the response for the one now selected. Every
//! request carries a generation ticket and only the current generation may
//! replace the displayed series.

use super::{FetchedSeries, Series};
use crate::domain::timeframe::Timeframe;
use crate::error::FetchError;
use crate::shared::TokenId;

/// Identifies one in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
    pub token_id: TokenId,
    pub timeframe: Timeframe,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of handing a fetch result back to [`SeriesState::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The displayed series was replaced.
    Replaced { flat: bool },
    /// The fetch failed; the last good series stays displayed.
    Failed,
    /// The ticket was superseded or cancelled; nothing changed.
    Stale,
}

/// The series one chart instance displays.
///
/// The app owns instances of this type. The SDK provides update methods.
#[derive(Debug, Clone, Default)]
pub struct SeriesState {
    token_id: Option<TokenId>,
    timeframe: Timeframe,
    generation: u64,
    in_flight: Option<u64>,
    displayed: Series,
    loaded: bool,
    last_error: Option<String>,
}

impl SeriesState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fetch for `token_id` at `timeframe`. Any earlier in-flight
    /// ticket becomes stale.
    pub fn begin(&mut self, token_id: TokenId, timeframe: Timeframe) -> RequestTicket {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.token_id = Some(token_id.clone());
        self.timeframe = timeframe;

        RequestTicket {
            generation: self.generation,
            token_id,
            timeframe,
        }
    }

    /// Apply a fetch result if its ticket is still current.
    pub fn complete(
        &mut self,
        ticket: &RequestTicket,
        result: Result<FetchedSeries, FetchError>,
    ) -> Applied {
        if self.in_flight != Some(ticket.generation) {
            tracing::debug!(
                generation = ticket.generation,
                current = self.generation,
                timeframe = %ticket.timeframe,
                "Dropping stale series response"
            );
            return Applied::Stale;
        }
        self.in_flight = None;

        match result {
            Ok(fetched) => {
                let flat = fetched.is_flat();
                self.displayed = fetched.into_series();
                self.loaded = true;
                self.last_error = None;
                Applied::Replaced { flat }
            }
            Err(e) => {
                tracing::warn!(
                    token = %ticket.token_id,
                    timeframe = %ticket.timeframe,
                    "Series fetch failed, keeping last good series: {}",
                    e
                );
                self.last_error = Some(e.to_string());
                Applied::Failed
            }
        }
    }

    /// Invalidate any in-flight ticket (timeframe switch, unmount). The
    /// displayed series is left alone.
    pub fn cancel(&mut self) {
        if self.in_flight.take().is_some() {
            tracing::debug!(generation = self.generation, "Cancelled in-flight series fetch");
        }
        self.generation += 1;
    }

    /// Follow a timeframe switch before its fetch begins. In-flight tickets
    /// become stale and live appends are judged against `timeframe`.
    pub fn switch_timeframe(&mut self, timeframe: Timeframe) {
        self.cancel();
        self.timeframe = timeframe;
    }

    /// Host-supplied series. In-flight tickets stay valid.
    pub fn replace(&mut self, series: Series) {
        self.displayed = series;
        self.loaded = true;
        self.last_error = None;
    }

    /// Replace the series from the live updater. Ignored unless LIVE is the
    /// selected timeframe.
    pub fn apply_live(&mut self, series: Series) -> bool {
        if !self.timeframe.is_live() {
            return false;
        }
        self.displayed = series;
        self.loaded = true;
        true
    }

    /// Last successfully fetched series; empty (hence degenerate) until the
    /// first success.
    pub fn displayed(&self) -> &Series {
        &self.displayed
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn token_id(&self) -> Option<&TokenId> {
        self.token_id.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether any fetch has ever succeeded.
    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}
