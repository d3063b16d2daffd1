//! Axis-locked drag mapping onto tension and friction.
//!
//! A gesture starts idle-to-dragging with a captured baseline. The first
//! movement with a dominant direction locks the axis for the rest of the
//! gesture: horizontal movement edits tension, vertical movement edits
//! friction. Movement is the cumulative offset from the gesture start, so each
//! emitted value is `baseline - movement * scale` rather than an accumulation.
//!
//! Values are not clamped here; the pipeline's validator decides what commits.

use serde::{Deserialize, Serialize};
use tracing::debug;
use twix_core::Real;

use crate::spring::SpringValue;

/// Tension change per horizontal pixel.
pub const TENSION_PER_PX: Real = 2.0;
/// Friction change per vertical pixel.
pub const FRICTION_PER_PX: Real = 1.0 / 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// Dominant axis of a movement, if there is one.
    pub fn dominant(dx: Real, dy: Real) -> Option<Self> {
        let (ax, ay) = (dx.abs(), dy.abs());
        if ax > ay {
            Some(Axis::X)
        } else if ay > ax {
            Some(Axis::Y)
        } else {
            None
        }
    }
}

/// Pixel-to-parameter calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragScale {
    pub tension_per_px: Real,
    pub friction_per_px: Real,
}

impl Default for DragScale {
    fn default() -> Self {
        Self {
            tension_per_px: TENSION_PER_PX,
            friction_per_px: FRICTION_PER_PX,
        }
    }
}

/// Gesture input, already resolved by the host's gesture recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Start,
    /// Cumulative movement since `Start`, in pixels.
    Move { dx: Real, dy: Real },
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging {
        baseline: SpringValue,
        axis: Option<Axis>,
    },
}

/// Drag-to-parameter state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct DragMapper {
    scale: DragScale,
    state: DragState,
}

impl Default for DragMapper {
    fn default() -> Self {
        Self::new(DragScale::default())
    }
}

impl DragMapper {
    pub fn new(scale: DragScale) -> Self {
        Self {
            scale,
            state: DragState::Idle,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn locked_axis(&self) -> Option<Axis> {
        match self.state {
            DragState::Dragging { axis, .. } => axis,
            DragState::Idle => None,
        }
    }

    /// Feed one gesture event. `current` is the value on screen, captured as
    /// the baseline on `Start`. Returns the value to forward as a change.
    pub fn handle(&mut self, event: DragEvent, current: &SpringValue) -> Option<SpringValue> {
        match event {
            DragEvent::Start => {
                self.start(current);
                None
            }
            DragEvent::Move { dx, dy } => self.movement(dx, dy),
            DragEvent::End => {
                self.end();
                None
            }
        }
    }

    pub fn start(&mut self, current: &SpringValue) {
        self.state = DragState::Dragging {
            baseline: *current,
            axis: None,
        };
    }

    pub fn movement(&mut self, dx: Real, dy: Real) -> Option<SpringValue> {
        let DragState::Dragging { baseline, axis } = &mut self.state else {
            return None;
        };
        let axis = match axis {
            Some(locked) => *locked,
            None => {
                let found = Axis::dominant(dx, dy)?;
                debug!(axis = ?found, "drag axis locked");
                *axis = Some(found);
                found
            }
        };
        Some(match axis {
            Axis::X => baseline.with_tension(baseline.tension - dx * self.scale.tension_per_px),
            Axis::Y => baseline.with_friction(baseline.friction - dy * self.scale.friction_per_px),
        })
    }

    pub fn end(&mut self) {
        self.state = DragState::Idle;
    }
}
