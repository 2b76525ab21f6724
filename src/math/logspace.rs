//! Log-space probability arithmetic for Gaussian kernels.
//!
//! ## Purpose
//!
//! Gaussian weights `exp(-d²/σ²)` underflow to zero once `d²` is a few
//! hundred times `σ²`. This module keeps kernel mass in log space until
//! the very last step and combines log-probabilities with a stable
//! two-term log-sum-exp.
//!
//! ## Design notes
//!
//! * **Unnormalised kernel**: The Gaussian normalising constant is dropped;
//!   every consumer divides by a total weight, which cancels it.
//! * **Order independence**: `logspace_add` is commutative, so a fold over
//!   an unordered anchor set has a well-defined value up to rounding.
//!
//! ## Invariants
//!
//! * `logspace_add(a, b) >= max(a, b)`.
//! * `logspace_add(-inf, b) == b`.

// External dependencies
use num_traits::Float;

// ============================================================================
// Kernel
// ============================================================================

/// Unnormalised Gaussian log-density for squared distance `d2`: `-d2 / sigma²`.
///
/// `sigma` is divided out twice and never squared.
#[inline]
pub fn gaussian_log_kernel<T: Float>(d2: T, sigma: T) -> T {
    -(d2 / sigma) / sigma
}

/// Unnormalised Gaussian weight for squared distance `d2`: `exp(-d2 / sigma²)`.
#[inline]
pub fn gaussian_weight<T: Float>(d2: T, sigma: T) -> T {
    gaussian_log_kernel(d2, sigma).exp()
}

// ============================================================================
// Log-Sum-Exp
// ============================================================================

/// `ln(1 + exp(x))`, accurate for large negative `x`.
#[inline]
pub fn log1pexp<T: Float>(x: T) -> T {
    let threshold = T::from(33.3).unwrap_or_else(T::max_value);
    if x > threshold {
        // exp(-x) is below f64 epsilon relative to x.
        x
    } else {
        x.exp().ln_1p()
    }
}

/// `ln(exp(a) + exp(b))` as `max + log1p(exp(-|a - b|))`.
#[inline]
pub fn logspace_add<T: Float>(a: T, b: T) -> T {
    if a == T::neg_infinity() {
        return b;
    }
    if b == T::neg_infinity() {
        return a;
    }
    let larger = if a > b { a } else { b };
    let diff = (a - b).abs();
    larger + log1pexp(-diff)
}

/// Fold `logspace_add` over a sequence, seeded with its first element.
/// An empty sequence gives `-inf`.
#[inline]
pub fn logsumexp<T: Float, I: IntoIterator<Item = T>>(values: I) -> T {
    let mut iter = values.into_iter();
    match iter.next() {
        Some(first) => iter.fold(first, logspace_add),
        None => T::neg_infinity(),
    }
}
