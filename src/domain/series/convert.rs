//! Conversions from wire observations to domain observations.

use super::wire::WireObservation;
use super::{Observation, Series};
use thiserror::Error;

/// A wire observation that cannot be plotted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObservationError {
    #[error("{field} at t={timestamp} is not a finite number")]
    NonFinite { field: &'static str, timestamp: i64 },
    #[error("{field} at t={timestamp} is negative: {value}")]
    Negative {
        field: &'static str,
        timestamp: i64,
        value: f64,
    },
}

fn check(field: &'static str, timestamp: i64, value: f64) -> Result<f64, ObservationError> {
    if !value.is_finite() {
        return Err(ObservationError::NonFinite { field, timestamp });
    }
    if value < 0.0 {
        return Err(ObservationError::Negative {
            field,
            timestamp,
            value,
        });
    }
    Ok(value)
}

impl TryFrom<WireObservation> for Observation {
    type Error = ObservationError;

    fn try_from(w: WireObservation) -> Result<Self, Self::Error> {
        Ok(Self {
            timestamp: w.timestamp,
            market_price: check("marketPrice", w.timestamp, w.market_price)?,
            floor_price: check("floorPrice", w.timestamp, w.floor_price)?,
            volume: check("volume", w.timestamp, w.volume)?,
        })
    }
}

/// Validate, order ascending and cap to the latest `max_points` buckets.
pub(crate) fn normalize(
    raw: Vec<WireObservation>,
    max_points: u32,
) -> Result<Series, ObservationError> {
    let mut points = raw
        .into_iter()
        .map(Observation::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    points.sort_by_key(|p| p.timestamp);
    let cap = max_points as usize;
    if points.len() > cap {
        points.drain(..points.len() - cap);
    }
    Ok(Series::new(points))
}
