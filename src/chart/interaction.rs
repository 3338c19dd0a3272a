//! Interaction engine: pointer hover over the projected market series.
//!
//! Two states, `Idle` and `Hovering`. Pointer moves only arrive through a
//! [`PointerTarget`], which placeholder frames never hand out, so a flat
//! chart has no transitions at all. [`Interaction::sync`] carries a hover
//! across a re-derived frame and only drops it when the frame turns
//! degenerate.

use super::frame::{ChartFrame, PointerTarget};
use crate::domain::series::Observation;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverState {
    pub observation: Observation,
    pub x: f64,
    pub y: f64,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Hovering {
        hover: HoverState,
        /// Raw pointer x of the last move, before snapping to a point.
        pointer_x: f64,
    },
}

/// Index of the x closest to `x`. Ties go to the lower index.
pub fn nearest_index<I>(xs: I, x: f64) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, px) in xs.into_iter().enumerate() {
        let d = (px - x).abs();
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

fn hover_at(target: &PointerTarget<'_>, index: usize) -> Option<HoverState> {
    let observation = *target.series().get(index)?;
    let p = target.points().get(index)?;
    Some(HoverState {
        observation,
        x: p.x,
        y: p.y,
        index,
    })
}

fn hover_nearest(target: &PointerTarget<'_>, x: f64) -> Option<HoverState> {
    if !target.viewport().contains_x(x) {
        return None;
    }
    let index = nearest_index(target.points().iter().map(|p| p.x), x)?;
    hover_at(target, index)
}

impl Interaction {
    pub fn new() -> Self {
        Self::Idle
    }

    pub fn hover(&self) -> Option<&HoverState> {
        match self {
            Interaction::Idle => None,
            Interaction::Hovering { hover, .. } => Some(hover),
        }
    }

    pub fn is_hovering(&self) -> bool {
        matches!(self, Interaction::Hovering { .. })
    }

    pub fn on_pointer_move(&mut self, target: &PointerTarget<'_>, x: f64) -> Option<&HoverState> {
        *self = match hover_nearest(target, x) {
            Some(hover) => Interaction::Hovering { hover, pointer_x: x },
            None => Interaction::Idle,
        };
        self.hover()
    }

    pub fn on_pointer_leave(&mut self) {
        *self = Interaction::Idle;
    }

    /// Reconcile with a freshly derived frame. Returns whether the hovered
    /// observation changed.
    ///
    /// The hover follows its observation's timestamp into the new series.
    /// If that observation is gone, the nearest point under the last
    /// pointer x is hovered instead. Only a frame without a pointer target
    /// ends the hover.
    pub fn sync(&mut self, frame: &ChartFrame) -> bool {
        let Interaction::Hovering { hover, pointer_x } = *self else {
            return false;
        };

        let next = frame.pointer_target().and_then(|target| {
            target
                .series()
                .position_of(hover.observation.timestamp)
                .and_then(|index| hover_at(&target, index))
                .or_else(|| hover_nearest(&target, pointer_x))
        });

        match next {
            Some(next) => {
                *self = Interaction::Hovering {
                    hover: next,
                    pointer_x,
                };
                next.observation != hover.observation
            }
            None => {
                tracing::debug!(index = hover.index, "Clearing hover after series change");
                *self = Interaction::Idle;
                true
            }
        }
    }
}
