//! Render frame: everything a surface needs to draw one chart state.
//!
//! A frame is derived from a series snapshot and a viewport through the pure
//! pipeline `Series -> ScaleInfo -> PathGeometry`, and is rebuilt whenever
//! either input changes.

use super::geometry::{Point, Viewport};
use super::path::{build_area, build_flat_line, build_path, AreaGeometry, PathGeometry};
use super::scale::{build_scales, ScaleInfo};
use crate::domain::series::{PriceField, Series};

/// Opacity for the placeholder lines drawn over empty or flat data.
pub const PLACEHOLDER_OPACITY: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderMode {
    /// Real curve with area fill; pointer input accepted.
    Interactive,
    /// Straight dimmed lines, no fill, no pointer input.
    Placeholder { opacity: f64 },
}

impl RenderMode {
    pub fn is_interactive(&self) -> bool {
        matches!(self, RenderMode::Interactive)
    }

    pub fn opacity(&self) -> f64 {
        match self {
            RenderMode::Interactive => 1.0,
            RenderMode::Placeholder { opacity } => *opacity,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    series: Series,
    viewport: Viewport,
    scale: ScaleInfo,
    mode: RenderMode,
    market: PathGeometry,
    floor: Option<PathGeometry>,
    area: Option<AreaGeometry>,
}

impl ChartFrame {
    pub fn derive(series: Series, viewport: Viewport, include_floor: bool) -> Self {
        let scale = build_scales(&series, &viewport, include_floor);

        if scale.is_flat() {
            let market = build_flat_line(&scale, viewport.width, PriceField::Market);
            let floor = include_floor
                .then(|| build_flat_line(&scale, viewport.width, PriceField::Floor));
            return Self {
                series,
                viewport,
                scale,
                mode: RenderMode::Placeholder {
                    opacity: PLACEHOLDER_OPACITY,
                },
                market,
                floor,
                area: None,
            };
        }

        let market = build_path(&series, &scale, PriceField::Market);
        let floor = include_floor.then(|| build_path(&series, &scale, PriceField::Floor));
        let area = Some(build_area(&market, &viewport));

        Self {
            series,
            viewport,
            scale,
            mode: RenderMode::Interactive,
            market,
            floor,
            area,
        }
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn scale(&self) -> &ScaleInfo {
        &self.scale
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    pub fn market(&self) -> &PathGeometry {
        &self.market
    }

    pub fn floor(&self) -> Option<&PathGeometry> {
        self.floor.as_ref()
    }

    pub fn area(&self) -> Option<&AreaGeometry> {
        self.area.as_ref()
    }

    pub fn is_degenerate(&self) -> bool {
        !self.mode.is_interactive()
    }

    /// The handle pointer events go through. `None` while the frame is a
    /// placeholder: there is nothing to attach handlers to.
    pub fn pointer_target(&self) -> Option<PointerTarget<'_>> {
        self.mode.is_interactive().then_some(PointerTarget { frame: self })
    }
}

/// Proof that a frame accepts pointer input.
#[derive(Debug, Clone, Copy)]
pub struct PointerTarget<'a> {
    frame: &'a ChartFrame,
}

impl<'a> PointerTarget<'a> {
    pub fn frame(&self) -> &'a ChartFrame {
        self.frame
    }

    /// Projected market points, one per observation.
    pub fn points(&self) -> &'a [Point] {
        &self.frame.market.points
    }

    pub fn series(&self) -> &'a Series {
        &self.frame.series
    }

    pub fn viewport(&self) -> &'a Viewport {
        &self.frame.viewport
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
                .map(|(i, p)| Observation::new(i as i64 * 3_600, *p, p * 0.9, 2.0))
                .collect(),
        )
    }

    #[test]
    fn test_interactive_frame() {
        let frame = ChartFrame::derive(series(&[1.0, 2.0, 1.5]), Viewport::new(300.0, 150.0), true);
        assert_eq!(frame.mode(), RenderMode::Interactive);
        assert!(frame.area().is_some_and(|a| !a.is_empty()));
        assert_eq!(frame.floor().map(|f| f.points.len()), Some(3));
        let target = frame.pointer_target().unwrap();
        assert_eq!(target.points().len(), 3);
    }

    #[test]
    fn test_flat_frame_is_placeholder_without_pointer_target() {
        let frame = ChartFrame::derive(series(&[2.0, 2.0, 2.0]), Viewport::new(300.0, 150.0), true);
        assert_eq!(
            frame.mode(),
            RenderMode::Placeholder {
                opacity: PLACEHOLDER_OPACITY
            }
        );
        assert!(frame.area().is_none());
        assert!(frame.pointer_target().is_none());
        assert_eq!(frame.market().points[1], Point::new(300.0, 75.0));
        assert_eq!(frame.floor().unwrap().points[0].y, 90.0);
    }

    #[test]
    fn test_empty_frame_still_draws_lines() {
        let frame = ChartFrame::derive(Series::empty(), Viewport::new(300.0, 150.0), false);
        assert!(frame.is_degenerate());
        assert!(!frame.market().is_empty());
        assert!(frame.floor().is_none());
    }
}
