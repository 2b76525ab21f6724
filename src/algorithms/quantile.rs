//! Weighted quantile matching along per-cell correction directions.
//!
//! ## Purpose
//!
//! For each cell of the batch being corrected, this module finds how far
//! the cell should move along its correction direction so that its
//! cumulative-probability position within its own batch matches the same
//! position within the reference batch. Both distributions are weighted by
//! a Gaussian kernel on the distance from each cell to the line through
//! the target cell along the direction.
//!
//! ## Design notes
//!
//! * **Weighted order statistics**: The reference quantile is read off a
//!   sorted (projection, weight) list rather than from means, so local
//!   density differences captured by the kernel carry through.
//! * **Self weight**: The target cell always contributes weight 1 to its
//!   own batch and always counts as "not greater than" itself.
//! * **Soft degeneracy**: A zero direction or an empty reference batch
//!   yields NaN for that cell only.
//!
//! ## Key concepts
//!
//! * **curproj** = `grad · x_c`
//! * **prob2** = kernel mass of same-batch cells with projection `<= curproj`,
//!   over the total same-batch kernel mass.
//! * **ref_quan** = smallest reference projection whose cumulative weight
//!   reaches `prob2 · Σ w_ref`.
//! * **scale** = `(ref_quan - curproj) / |direction|`
//!
//! ## Invariants
//!
//! * `prob2 ∈ (0, 1]` for finite inputs.
//! * Cumulative reference weight is non-decreasing along the sorted list.
//!
//! ## Non-goals
//!
//! * This module does not validate shapes (handled by `validator`).
//! * This module does not compute the directions themselves.

// External dependencies
use core::cmp::Ordering::Equal;
use num_traits::Float;
use tracing::trace;

// Internal dependencies
use crate::math::distance::{DistanceLinalg, normalize_in_place, sq_distance_to_line};
use crate::math::logspace::gaussian_weight;
use crate::primitives::buffer::AdjustmentBuffer;
use crate::primitives::matrix::MatrixAccess;

// ============================================================================
// Result Type
// ============================================================================

/// Quantile-matching outcome for a single target cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellAdjustment<T> {
    /// Rescaling factor for the cell's correction direction.
    pub scale: T,
    /// Cumulative kernel probability of the cell within its own batch.
    pub probability: T,
    /// Matching projection in the reference batch.
    pub quantile: T,
}

impl<T: Float> CellAdjustment<T> {
    /// All-NaN outcome for a cell without usable geometry.
    pub fn undefined() -> Self {
        Self {
            scale: T::nan(),
            probability: T::nan(),
            quantile: T::nan(),
        }
    }
}

// ============================================================================
// Weighted Quantiles
// ============================================================================

/// Sort `(projection, weight)` pairs by projection, ties broken by weight.
#[inline]
pub fn sort_by_projection<T: Float>(pairs: &mut [(T, T)]) {
    pairs.sort_unstable_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Equal)
            .then_with(|| a.1.partial_cmp(&b.1).unwrap_or(Equal))
    });
}

/// Projection at which the cumulative weight first reaches `target`.
///
/// `sorted` must be ordered by projection. Falls back to the largest
/// projection when rounding keeps the cumulative sum below `target`, and
/// returns NaN when `sorted` is empty.
pub fn weighted_quantile<T: Float>(sorted: &[(T, T)], target: T) -> T {
    let mut quantile = match sorted.last() {
        Some(&(proj, _)) => proj,
        None => return T::nan(),
    };

    let mut cumulative = T::zero();
    for &(proj, weight) in sorted {
        cumulative = cumulative + weight;
        if cumulative >= target {
            quantile = proj;
            break;
        }
    }
    quantile
}

// ============================================================================
// Per-Cell Adjustment
// ============================================================================

/// Quantile-match target cell `cell` against the reference batch.
///
/// * `reference`: genes × N₁ reference batch.
/// * `target`: genes × N₂ batch being corrected.
/// * `directions`: N₂ × genes raw direction rows.
pub fn adjust_cell<T, R, Q, D>(
    reference: &R,
    target: &Q,
    directions: &D,
    cell: usize,
    sigma: T,
    buf: &mut AdjustmentBuffer<T>,
) -> CellAdjustment<T>
where
    T: DistanceLinalg,
    R: MatrixAccess<T> + ?Sized,
    Q: MatrixAccess<T> + ?Sized,
    D: MatrixAccess<T> + ?Sized,
{
    let AdjustmentBuffer {
        grad,
        working,
        current,
        same,
        other,
        reference: pairs,
    } = buf;

    // Unit direction; the raw row is left untouched.
    let raw = directions.get_row(cell, working);
    grad.copy_from_slice(raw);
    let l2norm = normalize_in_place(grad);
    if l2norm == T::zero() {
        trace!(cell, "zero-norm direction, scale is undefined");
        return CellAdjustment::undefined();
    }

    let curcell = target.get_col(cell, current);
    let curproj = T::dot(grad, curcell);

    // Cumulative probability of the cell within its own batch.
    let mut prob2 = T::zero();
    let mut totalprob2 = T::zero();
    for idx in 0..target.ncol() {
        if idx == cell {
            prob2 = prob2 + T::one();
            totalprob2 = totalprob2 + T::one();
            continue;
        }
        let samecell = target.get_col(idx, same);
        let sameproj = T::dot(grad, samecell);
        let samedist = sq_distance_to_line(curcell, grad, samecell, working);
        let sameprob = gaussian_weight(samedist, sigma);
        if sameproj <= curproj {
            prob2 = prob2 + sameprob;
        }
        totalprob2 = totalprob2 + sameprob;
    }
    prob2 = prob2 / totalprob2;

    // Coordinates and weights of the reference batch.
    pairs.clear();
    let mut totalprob1 = T::zero();
    for idx in 0..reference.ncol() {
        let othercell = reference.get_col(idx, other);
        let proj = T::dot(grad, othercell);
        let dist = sq_distance_to_line(curcell, grad, othercell, working);
        let weight = gaussian_weight(dist, sigma);
        totalprob1 = totalprob1 + weight;
        pairs.push((proj, weight));
    }
    sort_by_projection(pairs);

    let ref_quan = weighted_quantile(pairs, prob2 * totalprob1);

    CellAdjustment {
        scale: (ref_quan - curproj) / l2norm,
        probability: prob2,
        quantile: ref_quan,
    }
}
