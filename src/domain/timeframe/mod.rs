//! Timeframe domain: chart timeframe selector and query-plan resolution.
//!
//! Resolution is a fixed policy table: each timeframe picks a lookback
//! window, bucket granularity and point cap. Windows never reach back before
//! the asset existed.

use crate::shared::Granularity;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

const HOUR: i64 = 3_600;
const DAY: i64 = 24 * HOUR;

/// A named lookback window + granularity selector shown as chart tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "LIVE")]
    Live,
    #[serde(rename = "4H")]
    FourHours,
    #[default]
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "MAX")]
    Max,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "LIVE",
            Self::FourHours => "4H",
            Self::OneDay => "1D",
            Self::OneWeek => "1W",
            Self::OneMonth => "1M",
            Self::Max => "MAX",
        }
    }

    /// All timeframes in tab order.
    pub fn all() -> &'static [Timeframe] {
        &[
            Self::Live,
            Self::FourHours,
            Self::OneDay,
            Self::OneWeek,
            Self::OneMonth,
            Self::Max,
        ]
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }

    /// Nominal lookback in seconds. `None` for `Max`, which reaches back to
    /// the asset's creation.
    pub fn lookback_seconds(&self) -> Option<i64> {
        match self {
            Self::Live => Some(2 * HOUR),
            Self::FourHours => Some(4 * HOUR),
            Self::OneDay => Some(DAY),
            Self::OneWeek => Some(7 * DAY),
            Self::OneMonth => Some(30 * DAY),
            Self::Max => None,
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            Self::Live => Granularity::Minute,
            Self::FourHours | Self::OneDay => Granularity::Hour,
            Self::OneWeek | Self::OneMonth | Self::Max => Granularity::Day,
        }
    }

    /// Coarser granularity to query when the preferred one has no data.
    pub fn fallback_granularity(&self) -> Option<Granularity> {
        match self {
            Self::Live => Some(Granularity::Hour),
            _ => None,
        }
    }

    pub fn max_points(&self) -> u32 {
        match self {
            Self::Live => 10,
            Self::FourHours => 20,
            Self::OneDay => 50,
            Self::OneWeek => 30,
            Self::OneMonth => 60,
            Self::Max => 365,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown timeframe: {0}")]
pub struct ParseTimeframeError(pub String);

impl FromStr for Timeframe {
    type Err = ParseTimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::all()
            .iter()
            .copied()
            .find(|tf| tf.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseTimeframeError(s.to_string()))
    }
}

/// Resolved lookback/granularity/point-count for one timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPlan {
    pub timeframe: Timeframe,
    pub lookback_seconds: Option<i64>,
    pub granularity: Granularity,
    pub fallback_granularity: Option<Granularity>,
    pub max_points: u32,
    /// Lower bound (Unix seconds) of the query window.
    pub effective_since: i64,
}

/// Resolve a timeframe into a query plan.
///
/// Lookback windows are clamped so they never start before
/// `asset_created_at`; `Max` starts exactly at creation. Never fails.
pub fn resolve(timeframe: Timeframe, asset_created_at: i64, now: i64) -> QueryPlan {
    let effective_since = match timeframe.lookback_seconds() {
        Some(lookback) => now.saturating_sub(lookback).max(asset_created_at),
        None => asset_created_at,
    };

    QueryPlan {
        timeframe,
        lookback_seconds: timeframe.lookback_seconds(),
        granularity: timeframe.granularity(),
        fallback_granularity: timeframe.fallback_granularity(),
        max_points: timeframe.max_points(),
        effective_since,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_750_000_000;

    #[test]
    fn test_lookback_clamped_to_now_minus_window() {
        let plan = resolve(Timeframe::OneDay, 0, NOW);
        assert_eq!(plan.effective_since, NOW - DAY);
        assert_eq!(plan.granularity, Granularity::Hour);
        assert_eq!(plan.max_points, 50);
    }

    #[test]
    fn test_young_asset_clamps_lookback_to_creation() {
        let created = NOW - HOUR;
        let plan = resolve(Timeframe::OneWeek, created, NOW);
        assert_eq!(plan.effective_since, created);
    }

    #[test]
    fn test_max_starts_at_creation() {
        // Created more recently than the nominal 1M lookback.
        let created = NOW - 3 * DAY;
        let plan = resolve(Timeframe::Max, created, NOW);
        assert_eq!(plan.effective_since, created);
        assert_eq!(plan.lookback_seconds, None);
        assert_eq!(plan.max_points, 365);
        assert_eq!(plan.granularity, Granularity::Day);
    }

    #[test]
    fn test_live_plan_has_hourly_fallback() {
        let plan = resolve(Timeframe::Live, 0, NOW);
        assert_eq!(plan.granularity, Granularity::Minute);
        assert_eq!(plan.fallback_granularity, Some(Granularity::Hour));
        assert_eq!(plan.max_points, 10);
        assert_eq!(plan.effective_since, NOW - 2 * HOUR);
    }

    #[test]
    fn test_policy_table() {
        let rows: Vec<_> = Timeframe::all()
            .iter()
            .map(|tf| (tf.as_str(), tf.granularity(), tf.max_points()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("LIVE", Granularity::Minute, 10),
                ("4H", Granularity::Hour, 20),
                ("1D", Granularity::Hour, 50),
                ("1W", Granularity::Day, 30),
                ("1M", Granularity::Day, 60),
                ("MAX", Granularity::Day, 365),
            ]
        );
    }

    #[test]
    fn test_parse_and_serde() {
        assert_eq!("1w".parse::<Timeframe>().unwrap(), Timeframe::OneWeek);
        assert_eq!("LIVE".parse::<Timeframe>().unwrap(), Timeframe::Live);
        assert!("2Y".parse::<Timeframe>().is_err());

        let json = serde_json::to_string(&Timeframe::FourHours).unwrap();
        assert_eq!(json, "\"4H\"");
        let back: Timeframe = serde_json::from_str("\"MAX\"").unwrap();
        assert_eq!(back, Timeframe::Max);
    }
}
