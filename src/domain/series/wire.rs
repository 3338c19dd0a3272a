//! Wire types for series queries (subgraph GraphQL).

use crate::shared::serde_util::{decimal, timestamp};
use crate::shared::Granularity;
use serde::{Deserialize, Serialize};

/// A single price bucket as the data source sends it.
///
/// Numeric fields may arrive as JSON numbers or as decimal strings; the
/// timestamp may be seconds or milliseconds. Unknown fields are ignored,
/// but every price field including `volume` is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireObservation {
    #[serde(with = "timestamp", alias = "periodStartUnix")]
    pub timestamp: i64,
    #[serde(with = "decimal")]
    pub market_price: f64,
    #[serde(with = "decimal")]
    pub floor_price: f64,
    #[serde(with = "decimal")]
    pub volume: f64,
}

/// `data` payload of the observations query. The query aliases whichever
/// granularity entity it reads to `buckets`.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationsData {
    #[serde(default)]
    pub buckets: Vec<WireObservation>,
}

/// Variables for [`observations_query`].
#[derive(Debug, Clone, Serialize)]
pub struct ObservationsVariables<'a> {
    pub token: &'a str,
    pub since: i64,
    pub first: u32,
}

/// GraphQL document for the newest `$first` buckets of `granularity` since
/// a timestamp. The fetcher re-orders them ascending.
pub fn observations_query(granularity: Granularity) -> String {
    format!(
        "query Observations($token: String!, $since: Int!, $first: Int!) {{ \
         buckets: {entity}(where: {{ token: $token, timestamp_gte: $since }}, \
         orderBy: timestamp, orderDirection: desc, first: $first) \
         {{ timestamp marketPrice floorPrice volume }} }}",
        entity = granularity.entity()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_observation_from_subgraph_strings() {
        let json = r#"{
            "timestamp": "1700000000",
            "marketPrice": "0.00042",
            "floorPrice": "0.0004",
            "volume": "0",
            "__typename": "TokenHourData"
        }"#;
        let w: WireObservation = serde_json::from_str(json).unwrap();
        assert_eq!(w.timestamp, 1_700_000_000);
        assert_eq!(w.market_price, 0.00042);
        assert_eq!(w.volume, 0.0);
    }

    #[test]
    fn test_wire_observation_millis_and_numbers() {
        let json = r#"{"timestamp":1700000000000,"marketPrice":2.5,"floorPrice":2,"volume":7}"#;
        let w: WireObservation = serde_json::from_str(json).unwrap();
        assert_eq!(w.timestamp, 1_700_000_000);
        assert_eq!(w.floor_price, 2.0);
        assert_eq!(w.volume, 7.0);
    }

    #[test]
    fn test_missing_volume_is_rejected() {
        let json = r#"{"timestamp":"60","marketPrice":"1.0","floorPrice":"0.5"}"#;
        let err = serde_json::from_str::<WireObservation>(json).unwrap_err();
        assert!(err.to_string().contains("volume"), "{}", err);
    }

    #[test]
    fn test_observations_query_uses_entity() {
        let q = observations_query(Granularity::Minute);
        assert!(q.contains("buckets: tokenMinuteDatas("));
        assert!(q.contains("orderDirection: desc"));
    }
}
