//! Series domain: time-bucketed price/volume observations for one token.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod fetcher;
pub mod state;
pub mod wire;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use convert::ObservationError;
pub use fetcher::{SeriesFetcher, SeriesQuery, SeriesSource, DEFAULT_FETCH_TIMEOUT};
pub use state::{Applied, RequestTicket, SeriesState};

/// One time-bucketed price/volume sample. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Unix seconds.
    pub timestamp: i64,
    pub market_price: f64,
    /// Expected to sit at or below `market_price`; not enforced.
    pub floor_price: f64,
    /// Zero is meaningful: no trading in the bucket.
    pub volume: f64,
}

impl Observation {
    pub fn new(timestamp: i64, market_price: f64, floor_price: f64, volume: f64) -> Self {
        Self {
            timestamp,
            market_price,
            floor_price,
            volume,
        }
    }

    pub fn price(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Market => self.market_price,
            PriceField::Floor => self.floor_price,
        }
    }
}

/// Which price line of an observation to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    Market,
    Floor,
}

/// Ordered (ascending timestamp) snapshot of observations.
///
/// Cloning is cheap and never copies observations. Appends produce a new
/// snapshot, so a reader holding a clone always sees a consistent view.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    points: Arc<[Observation]>,
}

impl Default for Series {
    fn default() -> Self {
        Self::empty()
    }
}

impl Series {
    /// Build a series, ordering by timestamp. The sort is stable, so equal
    /// timestamps keep their source order.
    pub fn new(mut points: Vec<Observation>) -> Self {
        points.sort_by_key(|p| p.timestamp);
        Self {
            points: Arc::from(points),
        }
    }

    pub fn empty() -> Self {
        Self {
            points: Arc::from(Vec::new()),
        }
    }

    pub fn as_slice(&self) -> &[Observation] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.points.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Observation> {
        self.points.get(index)
    }

    pub fn first(&self) -> Option<&Observation> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A non-empty series with a single distinct market price, or with no
    /// trading volume at all.
    pub fn is_flat(&self) -> bool {
        let Some(first) = self.points.first() else {
            return false;
        };
        let single_price = self.points.iter().all(|p| p.market_price == first.market_price);
        let no_volume = self.points.iter().all(|p| p.volume == 0.0);
        single_price || no_volume
    }

    /// Empty or flat: nothing meaningful to plot or hover.
    pub fn is_degenerate(&self) -> bool {
        self.is_empty() || self.is_flat()
    }

    /// Index of the observation stamped `timestamp`, if any.
    pub fn position_of(&self, timestamp: i64) -> Option<usize> {
        self.points
            .binary_search_by_key(&timestamp, |p| p.timestamp)
            .ok()
    }

    /// `(first, last)` timestamps.
    pub fn time_bounds(&self) -> Option<(i64, i64)> {
        Some((self.points.first()?.timestamp, self.points.last()?.timestamp))
    }

    /// `(min, max)` over market prices, plus floor prices when asked.
    pub fn price_bounds(&self, include_floor: bool) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let fields: &[PriceField] = if include_floor {
            &[PriceField::Market, PriceField::Floor]
        } else {
            &[PriceField::Market]
        };
        let bounds = self
            .points
            .iter()
            .flat_map(|p| fields.iter().map(move |f| p.price(*f)))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        Some(bounds)
    }

    /// New snapshot with `obs` appended and the oldest entries evicted so at
    /// most `capacity` remain.
    pub fn appended_bounded(&self, obs: Observation, capacity: usize) -> Series {
        let keep = capacity.saturating_sub(1).min(self.points.len());
        let start = self.points.len() - keep;
        let mut next = Vec::with_capacity(keep + 1);
        next.extend_from_slice(&self.points[start..]);
        next.push(obs);
        Self {
            points: Arc::from(next),
        }
    }
}

impl From<Vec<Observation>> for Series {
    fn from(points: Vec<Observation>) -> Self {
        Self::new(points)
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Result of a fetch. `Flat` is the sentinel for empty or degenerate data,
/// a normal rendering state rather than a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchedSeries {
    Ready(Series),
    Flat(Series),
}

impl FetchedSeries {
    /// Classify a freshly fetched series.
    pub fn classify(series: Series) -> Self {
        if series.is_degenerate() {
            FetchedSeries::Flat(series)
        } else {
            FetchedSeries::Ready(series)
        }
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, FetchedSeries::Flat(_))
    }

    pub fn series(&self) -> &Series {
        match self {
            FetchedSeries::Ready(s) | FetchedSeries::Flat(s) => s,
        }
    }

    pub fn into_series(self) -> Series {
        match self {
            FetchedSeries::Ready(s) | FetchedSeries::Flat(s) => s,
        }
    }
}
