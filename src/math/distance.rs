//! Distance geometry in expression space.
//!
//! ## Purpose
//!
//! This module provides the geometric primitives both kernels are built
//! on: squared Euclidean distance between two cells, dot products for
//! projections, L2 normalisation of direction vectors, and the squared
//! distance from a point to a line.
//!
//! ## Design notes
//!
//! * **SIMD**: The two inner products are specialised per float type via
//!   `DistanceLinalg`, using `wide` lanes for `f64` and `f32`.
//! * **Squared distances**: Nothing here takes a square root; the Gaussian
//!   kernel consumes squared distances directly.
//!
//! ## Invariants
//!
//! * Squared distances are non-negative for finite inputs.
//! * `sq_distance_to_line` does not depend on where along the line the
//!   reference point sits.
//!
//! ## Non-goals
//!
//! * This module does not apply the kernel (see `logspace`).

// External dependencies
use num_traits::Float;
use wide::{f32x4, f64x2};

// ============================================================================
// DistanceLinalg Trait
// ============================================================================

/// Inner products specialised per float type.
pub trait DistanceLinalg: Float + 'static {
    /// Squared Euclidean distance `Σ(aᵢ - bᵢ)²`.
    fn squared_euclidean(a: &[Self], b: &[Self]) -> Self;

    /// Dot product `Σ aᵢ·bᵢ`.
    fn dot(a: &[Self], b: &[Self]) -> Self;
}

impl DistanceLinalg for f64 {
    #[inline]
    fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len(), "Points must have same dimension");
        let n = a.len();
        let mut acc = f64x2::splat(0.0);
        let mut i = 0;
        while i + 2 <= n {
            let d = f64x2::new([a[i], a[i + 1]]) - f64x2::new([b[i], b[i + 1]]);
            acc += d * d;
            i += 2;
        }
        let mut sum = acc.reduce_add();
        while i < n {
            let d = a[i] - b[i];
            sum += d * d;
            i += 1;
        }
        sum
    }

    #[inline]
    fn dot(a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        let n = a.len();
        let mut acc = f64x2::splat(0.0);
        let mut i = 0;
        while i + 2 <= n {
            acc += f64x2::new([a[i], a[i + 1]]) * f64x2::new([b[i], b[i + 1]]);
            i += 2;
        }
        let mut sum = acc.reduce_add();
        while i < n {
            sum += a[i] * b[i];
            i += 1;
        }
        sum
    }
}

impl DistanceLinalg for f32 {
    #[inline]
    fn squared_euclidean(a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len(), "Points must have same dimension");
        let n = a.len();
        let mut acc = f32x4::splat(0.0);
        let mut i = 0;
        while i + 4 <= n {
            let d = f32x4::new([a[i], a[i + 1], a[i + 2], a[i + 3]])
                - f32x4::new([b[i], b[i + 1], b[i + 2], b[i + 3]]);
            acc += d * d;
            i += 4;
        }
        let mut sum = acc.reduce_add();
        while i < n {
            let d = a[i] - b[i];
            sum += d * d;
            i += 1;
        }
        sum
    }

    #[inline]
    fn dot(a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len());
        let n = a.len();
        let mut acc = f32x4::splat(0.0);
        let mut i = 0;
        while i + 4 <= n {
            acc += f32x4::new([a[i], a[i + 1], a[i + 2], a[i + 3]])
                * f32x4::new([b[i], b[i + 1], b[i + 2], b[i + 3]]);
            i += 4;
        }
        let mut sum = acc.reduce_add();
        while i < n {
            sum += a[i] * b[i];
            i += 1;
        }
        sum
    }
}

// ============================================================================
// Generic Helpers
// ============================================================================

/// Normalise `v` to unit length in place and return its original L2 norm.
///
/// A zero vector becomes all-NaN (0/0) and the returned norm is zero; the
/// caller decides whether to skip it.
#[inline]
pub fn normalize_in_place<T: DistanceLinalg>(v: &mut [T]) -> T {
    let norm = T::dot(v, v).sqrt();
    for x in v.iter_mut() {
        *x = *x / norm;
    }
    norm
}

/// Squared distance from `point` to the line through `reference` along `grad`.
///
/// `grad` must have unit norm. `working` is overwritten and must have the
/// same length as the points; it is taken from the caller so that repeated
/// calls in a hot loop do not allocate.
///
/// # Formula
///
/// ```text
/// w = reference - point
/// w -= (w · grad) grad
/// return |w|²
/// ```
#[inline]
pub fn sq_distance_to_line<T: DistanceLinalg>(
    reference: &[T],
    grad: &[T],
    point: &[T],
    working: &mut [T],
) -> T {
    debug_assert_eq!(reference.len(), point.len());
    debug_assert_eq!(grad.len(), point.len());
    debug_assert_eq!(working.len(), point.len());

    for ((w, &r), &p) in working.iter_mut().zip(reference).zip(point) {
        *w = r - p;
    }

    let scale = T::dot(working, grad);
    let mut dist = T::zero();
    for (w, &g) in working.iter_mut().zip(grad) {
        *w = *w - scale * g;
        dist = dist + *w * *w;
    }
    dist
}
