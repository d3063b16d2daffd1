use crate::TwixError;

/// Floating point type used for every control value.
pub type Real = f64;

/// Absolute/relative tolerance pair used for float comparisons.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, TwixError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TwixError::NonFinite { what, value: v })
    }
}

/// Finite and strictly positive, or an error naming `what`.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, TwixError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(TwixError::InvalidArg { what })
    }
}

/// Lower-bounds `v` by `floor`. NaN maps to `floor`.
pub fn clamp_min(v: Real, floor: Real) -> Real {
    // f64::max returns the non-NaN operand
    v.max(floor)
}

/// Round to `decimals` places. Non-finite input is returned unchanged.
pub fn round_to(v: Real, decimals: u32) -> Real {
    if !v.is_finite() {
        return v;
    }
    let scale = 10f64.powi(decimals as i32);
    let rounded = (v * scale).round() / scale;
    if rounded.is_finite() { rounded } else { v }
}
