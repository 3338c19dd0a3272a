//! Price header shown above the chart: current or hovered price and the
//! change since the start of the displayed window.

use super::interaction::HoverState;
use crate::domain::series::Series;
use crate::shared::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Neutral,
}

impl Direction {
    fn of(change: f64) -> Self {
        if change > 0.0 {
            Direction::Up
        } else if change < 0.0 {
            Direction::Down
        } else {
            Direction::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSummary {
    pub price: Option<f64>,
    /// Absolute change from the first observation in the window.
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
    pub direction: Direction,
    /// Whether `price` comes from the hovered observation.
    pub hovered: bool,
}

impl PriceSummary {
    /// The hovered price wins, then the host-supplied current price, then
    /// the newest observation.
    pub fn compute(
        series: &Series,
        hover: Option<&HoverState>,
        current_price: Option<f64>,
    ) -> Self {
        let (price, hovered) = match hover {
            Some(h) => (Some(h.observation.market_price), true),
            None => (
                current_price
                    .filter(|p| p.is_finite())
                    .or_else(|| series.last().map(|o| o.market_price)),
                false,
            ),
        };

        let base = series.first().map(|o| o.market_price);
        let change = price.zip(base).map(|(p, b)| p - b);
        let change_percent = change
            .zip(base)
            .and_then(|(c, b)| (b != 0.0).then(|| c / b * 100.0));

        Self {
            price,
            change,
            change_percent,
            direction: change.map_or(Direction::Neutral, Direction::of),
            hovered,
        }
    }

    pub fn price_label(&self) -> String {
        self.price.map_or_else(|| "-".to_string(), fmt::price)
    }

    /// e.g. `+0.25 (+1.25%)`.
    pub fn change_label(&self) -> String {
        match (self.change, self.change_percent) {
            (Some(c), Some(pct)) => {
                let sign = if c > 0.0 { "+" } else { "" };
                format!("{}{} ({})", sign, fmt::price(c), fmt::percent(pct))
            }
            (Some(c), None) => fmt::price(c),
            _ => "-".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::Observation;

    fn series(prices: &[f64]) -> Series {
        Series::new(
            prices
                .iter()
                .enumerate()
                .map(|(i, p)| Observation::new(i as i64, *p, 0.0, 1.0))
                .collect(),
        )
    }

    #[test]
    fn test_uses_current_price_when_not_hovering() {
        let s = series(&[2.0, 3.0]);
        let summary = PriceSummary::compute(&s, None, Some(2.5));
        assert_eq!(summary.price, Some(2.5));
        assert_eq!(summary.change, Some(0.5));
        assert_eq!(summary.change_percent, Some(25.0));
        assert_eq!(summary.direction, Direction::Up);
        assert!(!summary.hovered);
    }

    #[test]
    fn test_hover_overrides_current_price() {
        let s = series(&[2.0, 1.0]);
        let hover = HoverState {
            observation: *s.get(1).unwrap(),
            x: 0.0,
            y: 0.0,
            index: 1,
        };
        let summary = PriceSummary::compute(&s, Some(&hover), Some(9.0));
        assert_eq!(summary.price, Some(1.0));
        assert_eq!(summary.direction, Direction::Down);
        assert!(summary.hovered);
        assert_eq!(summary.change_label(), "-1.00 (-50.00%)");
    }

    #[test]
    fn test_empty_series() {
        let summary = PriceSummary::compute(&Series::empty(), None, None);
        assert_eq!(summary.price, None);
        assert_eq!(summary.direction, Direction::Neutral);
        assert_eq!(summary.price_label(), "-");
        assert_eq!(summary.change_label(), "-");
    }

    #[test]
    fn test_zero_base_has_no_percent() {
        let s = series(&[0.0, 1.0]);
        let summary = PriceSummary::compute(&s, None, None);
        assert_eq!(summary.change, Some(1.0));
        assert_eq!(summary.change_percent, None);
    }
}
