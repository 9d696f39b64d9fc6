use crate::{CoreError, CoreResult};

/// Floating point type used throughout the system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
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

/// Reject NaN and infinities at validation boundaries, naming the field
/// in the error.
pub fn ensure_finite(v: Real, what: &'static str) -> CoreResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// `num / den`, resolving a zero denominator to +Infinity instead of NaN
/// (or to 0 when the numerator is also zero).
///
/// The diagnostics contract requires undefined limits to be explicit
/// sentinels (0 or +Infinity), never NaN.
pub fn div_or_infinity(num: Real, den: Real) -> Real {
    if den == 0.0 {
        if num == 0.0 { 0.0 } else { Real::INFINITY }
    } else {
        num / den
    }
}

/// `num / den`, resolving a zero denominator to 0.
pub fn div_or_zero(num: Real, den: Real) -> Real {
    if den == 0.0 { 0.0 } else { num / den }
}

/// Square root clamped at zero: negative arguments (from roundoff near a
/// regime boundary) map to 0 instead of NaN.
pub fn sqrt_or_zero(v: Real) -> Real {
    if v > 0.0 { v.sqrt() } else { 0.0 }
}
