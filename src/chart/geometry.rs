//! Viewport geometry in pixel units.

use serde::{Deserialize, Serialize};

/// Width used before the host has reported a layout (mobile viewport).
pub const DEFAULT_WIDTH: f64 = 375.0;

/// Inner margins around the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 12.0,
            bottom: 20.0,
            left: 12.0,
        }
    }
}

impl Padding {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Drawing surface size plus padding. Recomputed on container resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            padding: Padding::default(),
        }
    }

    pub fn with_padding(mut self, padding: Padding) -> Self {
        self.padding = padding;
        self
    }

    /// Viewport for a possibly-unknown width. Before first layout (no width,
    /// or a non-positive one) the chart renders at [`DEFAULT_WIDTH`].
    pub fn resolve(width: Option<f64>, height: f64) -> Self {
        let width = width
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(DEFAULT_WIDTH);
        Self::new(width, height.max(0.0))
    }

    pub fn chart_width(&self) -> f64 {
        (self.width - self.padding.left - self.padding.right).max(0.0)
    }

    pub fn chart_height(&self) -> f64 {
        (self.height - self.padding.top - self.padding.bottom).max(0.0)
    }

    pub fn plot_left(&self) -> f64 {
        self.padding.left
    }

    pub fn plot_right(&self) -> f64 {
        self.padding.left + self.chart_width()
    }

    /// Baseline of the plot area; area fills close down to it.
    pub fn plot_bottom(&self) -> f64 {
        self.padding.top + self.chart_height()
    }

    /// Whether `x` lies within the horizontal plot bounds (inclusive).
    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.plot_left() && x <= self.plot_right()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_falls_back_before_layout() {
        assert_eq!(Viewport::resolve(None, 200.0).width, DEFAULT_WIDTH);
        assert_eq!(Viewport::resolve(Some(0.0), 200.0).width, DEFAULT_WIDTH);
        assert_eq!(Viewport::resolve(Some(f64::NAN), 200.0).width, DEFAULT_WIDTH);
        assert_eq!(Viewport::resolve(Some(640.0), 200.0).width, 640.0);
    }

    #[test]
    fn test_plot_bounds() {
        let vp = Viewport::new(200.0, 100.0).with_padding(Padding {
            top: 10.0,
            right: 5.0,
            bottom: 20.0,
            left: 15.0,
        });
        assert_eq!(vp.chart_width(), 180.0);
        assert_eq!(vp.chart_height(), 70.0);
        assert_eq!(vp.plot_right(), 195.0);
        assert_eq!(vp.plot_bottom(), 80.0);
        assert!(vp.contains_x(15.0));
        assert!(!vp.contains_x(14.9));
        assert!(!vp.contains_x(196.0));
    }

    #[test]
    fn test_padding_larger_than_viewport_clamps() {
        let vp = Viewport::new(10.0, 10.0).with_padding(Padding::uniform(20.0));
        assert_eq!(vp.chart_width(), 0.0);
        assert_eq!(vp.chart_height(), 0.0);
    }
}
