//! Custom serde helpers for subgraph wire formats.
//!
//! The subgraph returns `BigInt`/`BigDecimal` fields as JSON strings, while
//! hand-rolled sources and fixtures tend to send plain numbers. Both are
//! accepted.

use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrString {
    Num(f64),
    Str(String),
}

/// Deserializes a decimal given as a JSON number or a numeric string into `f64`.
pub mod decimal {
    use super::*;

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(*value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumOrString::deserialize(deserializer)? {
            NumOrString::Num(n) => Ok(n),
            NumOrString::Str(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|e| serde::de::Error::custom(format!("Invalid decimal '{}': {}", s, e))),
        }
    }
}

/// Timestamps at or above this value are taken to be Unix milliseconds.
pub const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Converts a seconds-or-milliseconds timestamp to Unix seconds.
pub fn normalize_timestamp(raw: i64) -> i64 {
    if raw.abs() >= MILLIS_THRESHOLD {
        raw / 1_000
    } else {
        raw
    }
}

/// Deserializes a Unix timestamp (seconds or milliseconds, number or string)
/// into Unix seconds.
pub mod timestamp {
    use super::*;

    /// Always writes Unix seconds.
    pub fn serialize<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(*value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = match NumOrString::deserialize(deserializer)? {
            NumOrString::Num(n) => {
                if n.fract() != 0.0 || !n.is_finite() {
                    return Err(serde::de::Error::custom(format!("Invalid timestamp: {}", n)));
                }
                n as i64
            }
            NumOrString::Str(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|e| {
                    serde::de::Error::custom(format!("Invalid timestamp '{}': {}", s, e))
                })?,
        };
        Ok(normalize_timestamp(raw))
    }
}
