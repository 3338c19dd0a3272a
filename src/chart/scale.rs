//! Scale engine: maps (time, price) into pixel space.
//!
//! Scales are derived fresh from a series snapshot and a viewport and are
//! never mutated. Empty or flat series get a [`FlatScale`] that pins each
//! line to a fixed height, so the chart is always visibly present.

use super::geometry::Viewport;
use crate::domain::series::{PriceField, Series};

/// Price ranges narrower than this get the wider padding factor.
pub const NEAR_ZERO_RANGE: f64 = 1e-4;
/// Padding factor for near-zero price ranges (micro-cap tokens).
pub const NEAR_ZERO_PADDING: f64 = 1.10;
/// Padding factor for every other price range.
pub const DEFAULT_PADDING: f64 = 1.05;
/// Flat market line, as a fraction of viewport height.
pub const FLAT_MARKET_LEVEL: f64 = 0.5;
/// Flat floor line, as a fraction of viewport height.
pub const FLAT_FLOOR_LEVEL: f64 = 0.6;

pub fn padding_factor(range: f64) -> f64 {
    if range < NEAR_ZERO_RANGE {
        NEAR_ZERO_PADDING
    } else {
        DEFAULT_PADDING
    }
}

/// Asymmetric padding: the minimum is divided, the maximum multiplied, so
/// the lower bound never collapses onto the axis for tiny prices.
pub fn padded_price_domain(min_price: f64, max_price: f64) -> (f64, f64) {
    let factor = padding_factor(max_price - min_price);
    (min_price / factor, max_price * factor)
}

/// Linear time/price projection built from real data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedScale {
    viewport: Viewport,
    min_time: i64,
    max_time: i64,
    min_price: f64,
    max_price: f64,
    scaled_min: f64,
    scaled_max: f64,
}

impl ProjectedScale {
    fn time_span(&self) -> f64 {
        let span = self.max_time as f64 - self.min_time as f64;
        if span == 0.0 {
            1.0
        } else {
            span
        }
    }

    fn price_span(&self) -> f64 {
        let span = self.scaled_max - self.scaled_min;
        if span == 0.0 {
            1.0
        } else {
            span
        }
    }

    pub fn time_to_x(&self, t: i64) -> f64 {
        self.viewport.padding.left
            + (t as f64 - self.min_time as f64) / self.time_span() * self.viewport.chart_width()
    }

    pub fn price_to_y(&self, price: f64) -> f64 {
        let h = self.viewport.chart_height();
        self.viewport.padding.top + h - (price - self.scaled_min) / self.price_span() * h
    }

    pub fn x_to_time(&self, x: f64) -> f64 {
        let w = self.viewport.chart_width();
        if w == 0.0 {
            return self.min_time as f64;
        }
        self.min_time as f64 + (x - self.viewport.padding.left) / w * self.time_span()
    }

    pub fn y_to_price(&self, y: f64) -> f64 {
        let h = self.viewport.chart_height();
        if h == 0.0 {
            return self.scaled_min;
        }
        self.scaled_min + (self.viewport.padding.top + h - y) / h * self.price_span()
    }

    /// Unpadded `(min, max)` of the prices the scale was built from.
    pub fn price_domain(&self) -> (f64, f64) {
        (self.min_price, self.max_price)
    }

    /// Padded `(min, max)` actually mapped onto the plot height.
    pub fn padded_price_domain(&self) -> (f64, f64) {
        (self.scaled_min, self.scaled_max)
    }

    pub fn time_domain(&self) -> (i64, i64) {
        (self.min_time, self.max_time)
    }
}

/// Placeholder scale for empty or flat data: each line sits at a fixed
/// height and spans the full viewport width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatScale {
    width: f64,
    height: f64,
    time_domain: Option<(i64, i64)>,
}

impl FlatScale {
    pub fn level_y(&self, field: PriceField) -> f64 {
        let level = match field {
            PriceField::Market => FLAT_MARKET_LEVEL,
            PriceField::Floor => FLAT_FLOOR_LEVEL,
        };
        self.height * level
    }

    pub fn time_to_x(&self, t: i64) -> f64 {
        match self.time_domain {
            Some((lo, hi)) if hi > lo => {
                (t as f64 - lo as f64) / (hi as f64 - lo as f64) * self.width
            }
            _ => 0.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }
}

/// Time and price transforms plus the domain bounds they came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleInfo {
    Projected(ProjectedScale),
    Flat(FlatScale),
}

impl ScaleInfo {
    pub fn is_flat(&self) -> bool {
        matches!(self, ScaleInfo::Flat(_))
    }

    pub fn time_to_x(&self, t: i64) -> f64 {
        match self {
            ScaleInfo::Projected(s) => s.time_to_x(t),
            ScaleInfo::Flat(s) => s.time_to_x(t),
        }
    }

    /// Y for a price on the `field` line. Flat scales ignore the price.
    pub fn price_to_y(&self, price: f64, field: PriceField) -> f64 {
        match self {
            ScaleInfo::Projected(s) => s.price_to_y(price),
            ScaleInfo::Flat(s) => s.level_y(field),
        }
    }

    pub fn x_to_time(&self, x: f64) -> Option<f64> {
        match self {
            ScaleInfo::Projected(s) => Some(s.x_to_time(x)),
            ScaleInfo::Flat(_) => None,
        }
    }

    pub fn y_to_price(&self, y: f64) -> Option<f64> {
        match self {
            ScaleInfo::Projected(s) => Some(s.y_to_price(y)),
            ScaleInfo::Flat(_) => None,
        }
    }

    pub fn time_domain(&self) -> Option<(i64, i64)> {
        match self {
            ScaleInfo::Projected(s) => Some(s.time_domain()),
            ScaleInfo::Flat(s) => s.time_domain,
        }
    }

    pub fn price_domain(&self) -> Option<(f64, f64)> {
        match self {
            ScaleInfo::Projected(s) => Some(s.price_domain()),
            ScaleInfo::Flat(_) => None,
        }
    }
}

/// Build scales for `series` in `viewport`.
///
/// Pure: identical inputs give identical scales.
pub fn build_scales(series: &Series, viewport: &Viewport, include_floor: bool) -> ScaleInfo {
    let flat = || {
        ScaleInfo::Flat(FlatScale {
            width: viewport.width,
            height: viewport.height,
            time_domain: series.time_bounds(),
        })
    };

    if series.is_degenerate() {
        return flat();
    }
    let (Some((min_time, max_time)), Some((min_price, max_price))) =
        (series.time_bounds(), series.price_bounds(include_floor))
    else {
        return flat();
    };

    let (scaled_min, scaled_max) = padded_price_domain(min_price, max_price);

    ScaleInfo::Projected(ProjectedScale {
        viewport: *viewport,
        min_time,
        max_time,
        min_price,
        max_price,
        scaled_min,
        scaled_max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::geometry::Padding;
    use crate::domain::series::Observation;

    fn series(points: &[(i64, f64)]) -> Series {
        Series::new(
            points
                .iter()
                .map(|(t, p)| Observation::new(*t, *p, p * 0.5, 1.0))
                .collect(),
        )
    }

    fn viewport() -> Viewport {
        Viewport::new(220.0, 120.0).with_padding(Padding::uniform(10.0))
    }

    #[test]
    fn test_near_zero_range_uses_wide_padding() {
        let (lo, hi) = padded_price_domain(100.0, 100.00005);
        assert!((lo - 100.0 / 1.10).abs() < 1e-9);
        assert!((lo - 90.909).abs() < 1e-3);
        assert!((hi - 110.000055).abs() < 1e-9);
    }

    #[test]
    fn test_regular_range_uses_default_padding() {
        assert_eq!(padding_factor(10.0), DEFAULT_PADDING);
        let (lo, hi) = padded_price_domain(10.0, 20.0);
        assert!((lo - 10.0 / 1.05).abs() < 1e-12);
        assert!((hi - 21.0).abs() < 1e-12);
    }

    #[test]
    fn test_projection_is_monotonic() {
        let s = series(&[(0, 1.0), (60, 3.0), (120, 2.0), (180, 5.0)]);
        let scale = build_scales(&s, &viewport(), false);
        assert!(!scale.is_flat());

        let ys: Vec<_> = [1.0, 2.0, 3.0, 5.0]
            .iter()
            .map(|p| scale.price_to_y(*p, PriceField::Market))
            .collect();
        assert!(ys.windows(2).all(|w| w[1] < w[0]), "y must fall as price rises: {:?}", ys);

        let xs: Vec<_> = [0, 60, 120, 180].iter().map(|t| scale.time_to_x(*t)).collect();
        assert!(xs.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(xs[0], 10.0);
        assert_eq!(xs[3], 210.0);
    }

    #[test]
    fn test_inverse_round_trips() {
        let s = series(&[(1_000, 0.5), (2_000, 1.5)]);
        let scale = build_scales(&s, &viewport(), true);
        let x = scale.time_to_x(1_500);
        assert!((scale.x_to_time(x).unwrap() - 1_500.0).abs() < 1e-9);
        let y = scale.price_to_y(0.75, PriceField::Market);
        assert!((scale.y_to_price(y).unwrap() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_domain_contains_floor_when_included() {
        let s = series(&[(0, 10.0), (60, 20.0)]);
        let with_floor = build_scales(&s, &viewport(), true);
        let without = build_scales(&s, &viewport(), false);
        assert_eq!(with_floor.price_domain(), Some((5.0, 20.0)));
        assert_eq!(without.price_domain(), Some((10.0, 20.0)));
    }

    #[test]
    fn test_equal_timestamps_do_not_divide_by_zero() {
        let s = series(&[(60, 1.0), (60, 2.0)]);
        let scale = build_scales(&s, &viewport(), false);
        assert!(scale.time_to_x(60).is_finite());
        assert_eq!(scale.time_to_x(60), 10.0);
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let s = series(&[(0, 1.0), (60, 2.0)]);
        let scale = build_scales(&s, &viewport(), false);
        assert!(scale.time_to_x(i64::MIN).is_finite());
        assert!(scale.time_to_x(i64::MAX) > 210.0);

        let wide = series(&[(i64::MIN, 1.0), (i64::MAX, 2.0)]);
        let scale = build_scales(&wide, &viewport(), false);
        assert_eq!(scale.time_to_x(i64::MIN), 10.0);
        assert!((scale.time_to_x(i64::MAX) - 210.0).abs() < 1e-6);
    }

    #[test]
    fn test_flat_and_empty_pin_lines() {
        let vp = viewport();
        for s in [Series::empty(), series(&[(0, 4.0), (60, 4.0)])] {
            let scale = build_scales(&s, &vp, true);
            assert!(scale.is_flat());
            assert_eq!(scale.price_to_y(123.0, PriceField::Market), 60.0);
            assert_eq!(scale.price_to_y(123.0, PriceField::Floor), 72.0);
            assert_eq!(scale.price_domain(), None);
        }
    }

    #[test]
    fn test_idempotent() {
        let s = series(&[(0, 1.0), (60, 2.0), (120, 1.5)]);
        assert_eq!(build_scales(&s, &viewport(), true), build_scales(&s, &viewport(), true));
    }
}
