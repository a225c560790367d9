//! Reward-shaping functions that map raw metric values into bounded signals.
//!
//! Every function works on a single `f64`. [`Shaped`] carries either a scalar
//! or a sequence, and [`Shaped::map`] applies a scalar function element-wise
//! while keeping length and order.

use crate::constants::DEFAULT_DECAY;

/// A scalar or a sequence of values to shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Shaped {
    Scalar(f64),
    Sequence(Vec<f64>),
}

impl Shaped {
    /// Apply `f` to the scalar, or to every element of the sequence.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        match self {
            Shaped::Scalar(x) => Shaped::Scalar(f(x)),
            Shaped::Sequence(xs) => Shaped::Sequence(xs.into_iter().map(f).collect()),
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Shaped::Scalar(x) => Some(*x),
            Shaped::Sequence(_) => None,
        }
    }

    pub fn into_vec(self) -> Vec<f64> {
        match self {
            Shaped::Scalar(x) => vec![x],
            Shaped::Sequence(xs) => xs,
        }
    }
}

impl From<f64> for Shaped {
    fn from(x: f64) -> Self {
        Shaped::Scalar(x)
    }
}

impl From<Vec<f64>> for Shaped {
    fn from(xs: Vec<f64>) -> Self {
        Shaped::Sequence(xs)
    }
}

impl From<&[f64]> for Shaped {
    fn from(xs: &[f64]) -> Self {
        Shaped::Sequence(xs.to_vec())
    }
}

/// Gaussian bump `exp(-(x - mean)^2 / std^2)`.
///
/// `std` must be non-zero; with `std == 0` the division follows IEEE rules
/// (`0` away from the mean, `NaN` at it).
#[inline]
pub fn gauss_remap(x: f64, mean: f64, std: f64) -> f64 {
    (-(x - mean).powi(2) / std.powi(2)).exp()
}

/// Linear rescale of `x` from `[x_min, x_max]` to `[0, 1]`.
///
/// The rescale only happens when one of the bounds is exactly zero. With two
/// non-zero bounds the result is always `0`, and with equal bounds `x` comes
/// back unchanged.
pub fn remap(x: f64, x_min: f64, x_max: f64) -> f64 {
    if x_max != 0.0 && x_min != 0.0 {
        0.0
    } else if x_max - x_min == 0.0 {
        x
    } else {
        (x - x_min) / (x_max - x_min)
    }
}

/// `1` strictly inside `(low, high)`, `0` elsewhere.
#[inline]
pub fn constant_range(x: f64, low: f64, high: f64) -> f64 {
    if x <= low || x >= high {
        0.0
    } else {
        1.0
    }
}

/// `1` strictly inside `(low, high)` with Gaussian shoulders of width `decay`.
pub fn constant_bump(x: f64, low: f64, high: f64, decay: f64) -> f64 {
    if x <= low {
        (-(x - low).powi(2) / decay).exp()
    } else if x >= high {
        (-(x - high).powi(2) / decay).exp()
    } else {
        1.0
    }
}

/// Gaussian ramp on one side of `point`, flat `1` on the other.
///
/// With `increase` the ramp sits strictly below `point`, otherwise strictly
/// above. `x == point` is on the flat side in both modes.
pub fn smooth_plateau(x: f64, point: f64, decay: f64, increase: bool) -> f64 {
    let on_ramp = if increase { x < point } else { x > point };
    if on_ramp {
        (-(x - point).powi(2) / decay).exp()
    } else {
        1.0
    }
}

/// [`constant_bump`] with the default decay.
pub fn constant_bump_default(x: f64, low: f64, high: f64) -> f64 {
    constant_bump(x, low, high, DEFAULT_DECAY)
}

/// [`smooth_plateau`] with the default decay, increasing.
pub fn smooth_plateau_default(x: f64, point: f64) -> f64 {
    smooth_plateau(x, point, DEFAULT_DECAY, true)
}

/// Ratio of lengths `a.len() / b.len()`, `0` when `b` is empty.
pub fn pct<A, B>(a: &[A], b: &[B]) -> f64 {
    ratio(a.len(), b.len())
}

/// `part / whole`, `0` when `whole` is zero.
#[inline]
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64
}
