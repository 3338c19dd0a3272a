//! Path builder: smoothed line and area geometry for one price field.
//!
//! The first segment is a quadratic curve whose control point sits at the
//! horizontal midpoint and at the first point's level. Every later segment
//! is a smooth quadratic that reflects the previous control point, so the
//! curve chains with continuous tangents instead of restarting per segment.

use super::geometry::{Point, Viewport};
use super::scale::ScaleInfo;
use crate::domain::series::{PriceField, Series};

use std::fmt::Write as _;

/// One drawing instruction, in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    QuadTo { control: Point, to: Point },
    /// SVG `T`. `control` is the reflected control point, carried so
    /// surfaces without a smooth-quad primitive can draw it as a plain quad.
    SmoothQuadTo { control: Point, to: Point },
    Close,
}

impl PathCommand {
    fn write_svg(&self, out: &mut String) {
        // Writing into a String cannot fail.
        let _ = match self {
            PathCommand::MoveTo(p) => write!(out, "M{:.2},{:.2}", p.x, p.y),
            PathCommand::LineTo(p) => write!(out, "L{:.2},{:.2}", p.x, p.y),
            PathCommand::QuadTo { control, to } => write!(
                out,
                "Q{:.2},{:.2} {:.2},{:.2}",
                control.x, control.y, to.x, to.y
            ),
            PathCommand::SmoothQuadTo { to, .. } => write!(out, "T{:.2},{:.2}", to.x, to.y),
            PathCommand::Close => write!(out, "Z"),
        };
    }
}

fn to_svg(commands: &[PathCommand]) -> String {
    let mut out = String::with_capacity(commands.len() * 16);
    for (i, cmd) in commands.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        cmd.write_svg(&mut out);
    }
    out
}

/// An open curve through projected points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathGeometry {
    pub commands: Vec<PathCommand>,
    /// The projected points the curve passes through, in series order.
    pub points: Vec<Point>,
}

impl PathGeometry {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    pub fn to_svg(&self) -> String {
        to_svg(&self.commands)
    }
}

/// A closed region under a curve, for gradient fills.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaGeometry {
    pub commands: Vec<PathCommand>,
}

impl AreaGeometry {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn to_svg(&self) -> String {
        to_svg(&self.commands)
    }
}

/// Project every observation's `field` price through `scale`.
pub fn project_points(series: &Series, scale: &ScaleInfo, field: PriceField) -> Vec<Point> {
    series
        .iter()
        .map(|o| Point::new(scale.time_to_x(o.timestamp), scale.price_to_y(o.price(field), field)))
        .collect()
}

/// Smoothed curve for `field`. Fewer than two points give an empty path.
pub fn build_path(series: &Series, scale: &ScaleInfo, field: PriceField) -> PathGeometry {
    let points = project_points(series, scale, field);
    if points.len() < 2 {
        return PathGeometry::default();
    }

    let mut commands = Vec::with_capacity(points.len());
    let p0 = points[0];
    let p1 = points[1];
    commands.push(PathCommand::MoveTo(p0));

    let mut control = Point::new((p0.x + p1.x) / 2.0, p0.y);
    commands.push(PathCommand::QuadTo { control, to: p1 });

    for pair in points.windows(2).skip(1) {
        let (prev, to) = (pair[0], pair[1]);
        control = Point::new(2.0 * prev.x - control.x, 2.0 * prev.y - control.y);
        commands.push(PathCommand::SmoothQuadTo { control, to });
    }

    PathGeometry { commands, points }
}

/// Close `path` down to the plot baseline and back to its first x.
pub fn build_area(path: &PathGeometry, viewport: &Viewport) -> AreaGeometry {
    let (Some(first), Some(last)) = (path.first(), path.last()) else {
        return AreaGeometry::default();
    };

    let bottom = viewport.plot_bottom();
    let mut commands = path.commands.clone();
    commands.push(PathCommand::LineTo(Point::new(last.x, bottom)));
    commands.push(PathCommand::LineTo(Point::new(first.x, bottom)));
    commands.push(PathCommand::Close);
    AreaGeometry { commands }
}

/// Straight horizontal line across the full width, at the `field` level.
/// Used for empty and flat series, where the curve would carry no meaning.
pub fn build_flat_line(scale: &ScaleInfo, width: f64, field: PriceField) -> PathGeometry {
    let y = scale.price_to_y(0.0, field);
    let from = Point::new(0.0, y);
    let to = Point::new(width, y);
    PathGeometry {
        commands: vec![PathCommand::MoveTo(from), PathCommand::LineTo(to)],
        points: vec![from, to],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::geometry::Padding;
    use crate::chart::scale::build_scales;
    use crate::domain::series::Observation;

    fn vp() -> Viewport {
        Viewport::new(200.0, 100.0).with_padding(Padding::uniform(0.0))
    }

    fn series(prices: &[f64]) -> Series {
        Series::new(
            prices
                .iter()
                .enumerate()
                .map(|(i, p)| Observation::new(i as i64 * 100, *p, p / 2.0, 1.0))
                .collect(),
        )
    }

    #[test]
    fn test_single_point_gives_empty_path() {
        let s = series(&[1.0]);
        let scale = build_scales(&s, &vp(), false);
        let path = build_path(&s, &scale, PriceField::Market);
        assert!(path.is_empty());
        assert!(build_area(&path, &vp()).is_empty());
    }

    #[test]
    fn test_first_segment_holds_then_eases() {
        let s = series(&[1.0, 3.0, 2.0]);
        let scale = build_scales(&s, &vp(), false);
        let path = build_path(&s, &scale, PriceField::Market);

        assert_eq!(path.commands.len(), 3);
        let PathCommand::MoveTo(p0) = path.commands[0] else {
            panic!("path must start with MoveTo");
        };
        let PathCommand::QuadTo { control, to } = path.commands[1] else {
            panic!("second command must be QuadTo");
        };
        assert_eq!(control.x, (p0.x + to.x) / 2.0);
        assert_eq!(control.y, p0.y);
        assert!(matches!(path.commands[2], PathCommand::SmoothQuadTo { .. }));
    }

    #[test]
    fn test_smooth_segments_reflect_previous_control() {
        let s = series(&[1.0, 3.0, 2.0, 4.0]);
        let scale = build_scales(&s, &vp(), false);
        let path = build_path(&s, &scale, PriceField::Market);

        let mut prev_control = match path.commands[1] {
            PathCommand::QuadTo { control, .. } => control,
            _ => unreachable!(),
        };
        for (i, cmd) in path.commands.iter().enumerate().skip(2) {
            let PathCommand::SmoothQuadTo { control, .. } = *cmd else {
                panic!("expected SmoothQuadTo at {}", i);
            };
            let anchor = path.points[i - 1];
            assert!((control.x - (2.0 * anchor.x - prev_control.x)).abs() < 1e-9);
            assert!((control.y - (2.0 * anchor.y - prev_control.y)).abs() < 1e-9);
            prev_control = control;
        }
    }

    #[test]
    fn test_area_closes_to_bottom() {
        let viewport = Viewport::new(200.0, 100.0).with_padding(Padding::uniform(10.0));
        let s = series(&[1.0, 2.0]);
        let scale = build_scales(&s, &viewport, false);
        let path = build_path(&s, &scale, PriceField::Market);
        let area = build_area(&path, &viewport);

        let n = area.commands.len();
        assert_eq!(area.commands[n - 1], PathCommand::Close);
        assert_eq!(area.commands[n - 2], PathCommand::LineTo(Point::new(10.0, 90.0)));
        assert_eq!(area.commands[n - 3], PathCommand::LineTo(Point::new(190.0, 90.0)));
    }

    #[test]
    fn test_flat_line_spans_width() {
        let s = series(&[2.0, 2.0]);
        let scale = build_scales(&s, &vp(), true);
        let market = build_flat_line(&scale, 200.0, PriceField::Market);
        let floor = build_flat_line(&scale, 200.0, PriceField::Floor);
        assert_eq!(market.to_svg(), "M0.00,50.00 L200.00,50.00");
        assert_eq!(floor.to_svg(), "M0.00,60.00 L200.00,60.00");
    }

    #[test]
    fn test_svg_output() {
        let s = series(&[1.0, 2.0, 1.5]);
        let scale = build_scales(&s, &vp(), false);
        let svg = build_path(&s, &scale, PriceField::Market).to_svg();
        assert!(svg.starts_with("M0.00,"));
        assert!(svg.contains(" Q50.00,"));
        assert!(svg.contains(" T200.00,"));
    }
}
