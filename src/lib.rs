//! # Miniapp Chart
//!
//! Timeframe-aware price chart engine for board tokens, supporting both
//! native and WASM targets.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core**: Shared types, domain models, timeframe resolution (always available, WASM-safe)
//! 2. **Chart**: Scales, path geometry, hover and live updates (pure, synchronous)
//! 3. **HTTP API**: `SubgraphHttp` with retry policies
//! 4. **High-Level Client**: `MiniappClient` with nested sub-clients and caching
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use miniapp_chart::prelude::*;
//!
//! let client = MiniappClient::builder()
//!     .subgraph_url("http://localhost:8000/subgraphs/name/miniapp")
//!     .build()?;
//!
//! let token = TokenId::from("0xabc");
//! let (_plan, fetched) = client.series().get(&token, Timeframe::OneDay).await?;
//!
//! let mut chart = PriceChart::new(ChartProps::default());
//! chart.resize(Some(390.0), 200.0);
//! chart.set_price_data(fetched.into_series());
//! let svg = chart.frame().market().to_svg();
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes, formatting and serde helpers.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, state.
pub mod domain;

/// Unified SDK error types.
pub mod error;

/// Network URL constants.
pub mod network;

// ── Layer 2: Chart ───────────────────────────────────────────────────────────

/// Scale engine, path builder, interaction engine, live updater.
pub mod chart;

// ── Layer 3: HTTP API ────────────────────────────────────────────────────────

/// Subgraph HTTP client with retry policies.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 4: High-Level Client ───────────────────────────────────────────────

/// `MiniappClient`: the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Clock, FixedClock, Granularity, SystemClock, TokenId};

    // Domain types: timeframe
    pub use crate::domain::timeframe::{resolve, QueryPlan, Timeframe};

    // Domain types: series, asset
    pub use crate::domain::asset::AssetInfo;
    pub use crate::domain::series::{
        Applied, FetchedSeries, Observation, PriceField, RequestTicket, Series, SeriesFetcher,
        SeriesQuery, SeriesSource, SeriesState,
    };

    // Chart
    pub use crate::chart::{
        ChartFrame, ChartProps, Direction, HoverState, LiveTicker, LiveUpdater, Padding,
        PriceChart, PriceSummary, RenderMode, ScaleInfo, Tick, Viewport,
    };

    // Errors
    pub use crate::error::{FetchError, SdkError};

    // Network
    pub use crate::network::DEFAULT_SUBGRAPH_URL;

    // HTTP client + sub-clients
    #[cfg(feature = "http")]
    pub use crate::client::{AssetsClient, MiniappClient, MiniappClientBuilder, SeriesSubClient};
    #[cfg(feature = "http")]
    pub use crate::http::retry::{RetryConfig, RetryPolicy};
}
