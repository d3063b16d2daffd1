//! Settle animation played on every accepted commit.
//!
//! The preview indicator flashes (`scale_x` 0, opacity 0.7), springs back to
//! its rest width using the committed spring parameters, then drops to rest
//! opacity. Opacity is an immediate field: it never interpolates, it holds
//! `from` until the width has settled and then jumps to `to`.
//!
//! The host's animation driver does the frame-by-frame work; this module only
//! describes the animation. `value_at` is there for drivers that want the
//! same curve without reimplementing it.

use serde::{Deserialize, Serialize};
use twix_core::Real;

use crate::oscillator::SpringParams;

/// Distance from rest below which the width counts as settled.
pub const SETTLE_EPSILON: Real = 1e-3;
/// Upper bound on the settle search, in ms.
pub const MAX_SETTLE_MS: Real = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    ScaleX,
    Opacity,
}

/// Animated style of the preview indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewStyle {
    pub scale_x: Real,
    pub opacity: Real,
}

impl PreviewStyle {
    /// Style at rest, also the style at mount.
    pub const REST: Self = Self {
        scale_x: 0.5,
        opacity: 0.2,
    };
    /// Style at the start of a settle.
    pub const FLASH: Self = Self {
        scale_x: 0.0,
        opacity: 0.7,
    };

    pub fn get(&self, field: Field) -> Real {
        match field {
            Field::ScaleX => self.scale_x,
            Field::Opacity => self.opacity,
        }
    }
}

/// `{from, to, config}` descriptor handed to the animation driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettleAnimation {
    pub from: PreviewStyle,
    pub to: PreviewStyle,
    pub config: SpringParams,
    /// Width settle time, searched once when the animation is created.
    settle_ms: Real,
}

impl SettleAnimation {
    pub fn on_commit(config: SpringParams) -> Self {
        let settle_ms = config
            .curve()
            .settle_time(SETTLE_EPSILON, MAX_SETTLE_MS)
            .unwrap_or(MAX_SETTLE_MS);
        Self {
            from: PreviewStyle::FLASH,
            to: PreviewStyle::REST,
            config,
            settle_ms,
        }
    }

    /// Fields that jump instead of interpolating.
    pub fn immediate(field: Field) -> bool {
        matches!(field, Field::Opacity)
    }

    /// Time for the interpolated width to settle, in ms.
    pub fn settle_time(&self) -> Real {
        self.settle_ms
    }

    /// Value of `field` at `t_ms` after the animation starts.
    pub fn value_at(&self, field: Field, t_ms: Real) -> Real {
        let from = self.from.get(field);
        let to = self.to.get(field);
        if Self::immediate(field) {
            return if t_ms < self.settle_ms { from } else { to };
        }
        from + (to - from) * self.config.curve().at(t_ms)
    }

    pub fn style_at(&self, t_ms: Real) -> PreviewStyle {
        PreviewStyle {
            scale_x: self.value_at(Field::ScaleX, t_ms),
            opacity: self.value_at(Field::Opacity, t_ms),
        }
    }
}

/// Host animation driver.
pub trait AnimationDriver {
    fn start(&mut self, animation: SettleAnimation);
}

/// Driver that keeps every started animation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingDriver {
    started: Vec<SettleAnimation>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started(&self) -> &[SettleAnimation] {
        &self.started
    }

    pub fn last(&self) -> Option<&SettleAnimation> {
        self.started.last()
    }
}

impl AnimationDriver for RecordingDriver {
    fn start(&mut self, animation: SettleAnimation) {
        self.started.push(animation);
    }
}
