//! Closed-form damped harmonic oscillator.
//!
//! Evaluates the unit-step response of a mass on a spring with damping:
//! displacement starts at 0 with zero velocity and settles at 1. Time is in
//! milliseconds; the natural frequency is `sqrt(tension / mass) / 1000` rad/ms.
//!
//! The regime is set by the damping ratio `zeta = friction / (2 sqrt(tension mass))`,
//! equivalently by comparing `tension` with the critical tension
//! `friction^2 / (4 mass)`:
//! - `tension > critical` (zeta < 1): underdamped, overshoots and rings
//! - `tension == critical` (zeta = 1): critically damped
//! - `tension < critical` (zeta > 1): overdamped, monotonic approach
//!
//! # Degenerate parameters
//!
//! `SpringCurve::new` and `sample` never fail. Tension, friction and mass are
//! clamped to at least `MIN_PARAM` (NaN included), negative or NaN time reads
//! as 0 and infinite time reads as the rest displacement. `SpringParams::new`
//! is the checked constructor for callers that want an error instead.

use serde::{Deserialize, Serialize};
use twix_core::{Real, Tolerances, clamp_min, ensure_positive, nearly_equal};

use crate::error::ControlResult;

/// Lower bound applied to tension, friction and mass before evaluation.
pub const MIN_PARAM: Real = 1e-6;

/// Mass used when none is given.
pub const DEFAULT_MASS: Real = 1.0;

/// Displacement the response settles to.
pub const REST_DISPLACEMENT: Real = 1.0;

/// Damping ratios this close to 1 are treated as critical.
const CRITICAL_BAND: Tolerances = Tolerances {
    abs: 1e-9,
    rel: 0.0,
};

/// Damping regime of a spring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Damping {
    Under,
    Critical,
    Over,
}

/// Spring parameters shared by the preview trace and the settle animation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringParams {
    pub tension: Real,
    pub friction: Real,
    pub mass: Real,
}

impl SpringParams {
    /// Create checked spring parameters.
    ///
    /// # Errors
    ///
    /// Returns error if any parameter is non-finite or not positive.
    pub fn new(tension: Real, friction: Real, mass: Real) -> ControlResult<Self> {
        Ok(Self {
            tension: ensure_positive(tension, "tension must be positive")?,
            friction: ensure_positive(friction, "friction must be positive")?,
            mass: ensure_positive(mass, "mass must be positive")?,
        })
    }

    /// Tension at which the response is critically damped.
    pub fn critical_tension(&self) -> Real {
        self.friction * self.friction / (4.0 * self.mass)
    }

    pub fn damping_ratio(&self) -> Real {
        self.curve().zeta
    }

    pub fn damping(&self) -> Damping {
        self.curve().damping
    }

    pub fn curve(&self) -> SpringCurve {
        SpringCurve::new(self.tension, self.friction, self.mass)
    }
}

/// Pre-computed step response for one set of parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringCurve {
    damping: Damping,
    /// Natural angular frequency, rad/ms.
    w0: Real,
    zeta: Real,
    kind: Response,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Response {
    /// `e^(-zeta w0 t) (cos(w1 t) + (zeta w0 / w1) sin(w1 t))`
    Under { decay: Real, w1: Real },
    /// `e^(-w0 t) (1 + w0 t)`
    Critical,
    /// `a e^(slow t) + b e^(fast t)`, both rates negative
    Over {
        slow: Real,
        fast: Real,
        a: Real,
        b: Real,
    },
}

impl SpringCurve {
    pub fn new(tension: Real, friction: Real, mass: Real) -> Self {
        let tension = clamp_min(tension, MIN_PARAM);
        let friction = clamp_min(friction, MIN_PARAM);
        let mass = clamp_min(mass, MIN_PARAM);

        let w0 = (tension / mass).sqrt() / 1000.0;
        let zeta = friction / (2.0 * (tension * mass).sqrt());

        if nearly_equal(zeta, 1.0, CRITICAL_BAND) {
            return Self {
                damping: Damping::Critical,
                w0,
                zeta,
                kind: Response::Critical,
            };
        }

        if zeta < 1.0 {
            let w1 = w0 * (1.0 - zeta * zeta).sqrt();
            Self {
                damping: Damping::Under,
                w0,
                zeta,
                kind: Response::Under {
                    decay: zeta * w0,
                    w1,
                },
            }
        } else {
            // Roots of s^2 + 2 zeta w0 s + w0^2. The slow root is written as
            // w0 / (zeta + root) to avoid cancellation at large zeta.
            let root = (zeta * zeta - 1.0).sqrt();
            let slow = -w0 / (zeta + root);
            let fast = -w0 * (zeta + root);
            let ratio = zeta / root;
            Self {
                damping: Damping::Over,
                w0,
                zeta,
                kind: Response::Over {
                    slow,
                    fast,
                    a: 0.5 * (1.0 + ratio),
                    b: 0.5 * (1.0 - ratio),
                },
            }
        }
    }

    pub fn damping(&self) -> Damping {
        self.damping
    }

    pub fn damping_ratio(&self) -> Real {
        self.zeta
    }

    /// Natural angular frequency in rad/ms.
    pub fn natural_frequency(&self) -> Real {
        self.w0
    }

    /// Displacement at `t_ms`.
    pub fn at(&self, t_ms: Real) -> Real {
        if t_ms.is_infinite() && t_ms > 0.0 {
            return REST_DISPLACEMENT;
        }
        if t_ms.is_nan() || t_ms <= 0.0 {
            return 0.0;
        }
        let t = t_ms;
        let remaining = match self.kind {
            Response::Under { decay, w1 } => {
                (-decay * t).exp() * ((w1 * t).cos() + (decay / w1) * (w1 * t).sin())
            }
            Response::Critical => (-self.w0 * t).exp() * (1.0 + self.w0 * t),
            Response::Over { slow, fast, a, b } => a * (slow * t).exp() + b * (fast * t).exp(),
        };
        REST_DISPLACEMENT - remaining
    }

    /// First time (ms, 1 ms resolution) after which the response stays within
    /// `epsilon` of rest, searched up to `max_ms`.
    pub fn settle_time(&self, epsilon: Real, max_ms: Real) -> Option<Real> {
        let mut last_outside = 0.0;
        let mut t = 1.0;
        while t <= max_ms {
            if (REST_DISPLACEMENT - self.at(t)).abs() > epsilon {
                last_outside = t;
            }
            t += 1.0;
        }
        if (REST_DISPLACEMENT - self.at(max_ms)).abs() > epsilon {
            None
        } else {
            Some(last_outside)
        }
    }
}

/// Displacement of the unit-step spring response at `t_ms`.
pub fn sample(tension: Real, friction: Real, mass: Real, t_ms: Real) -> Real {
    SpringCurve::new(tension, friction, mass).at(t_ms)
}
