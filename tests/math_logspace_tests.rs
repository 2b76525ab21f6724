#![cfg(feature = "dev")]

use approx::assert_relative_eq;

use mnn_rs::internals::math::logspace::{
    gaussian_log_kernel, gaussian_weight, log1pexp, logspace_add, logsumexp,
};

// ============================================================================
// Kernel
// ============================================================================

#[test]
fn test_gaussian_log_kernel() {
    assert_relative_eq!(gaussian_log_kernel(2.0, 2.0), -0.5);
    assert_eq!(gaussian_log_kernel(0.0, 2.0), 0.0);
    assert_relative_eq!(gaussian_weight(2.0, 2.0), (-0.5f64).exp());
    assert_eq!(gaussian_weight(0.0, 1.0), 1.0);
}

#[test]
fn test_gaussian_log_kernel_tiny_sigma() {
    // sigma * sigma underflows to zero here.
    let sigma = 1e-170f64;
    assert_eq!(sigma * sigma, 0.0);

    assert_eq!(gaussian_log_kernel(0.0, sigma), 0.0);
    assert_eq!(gaussian_weight(0.0, sigma), 1.0);
    assert_eq!(gaussian_log_kernel(1.0, sigma), f64::NEG_INFINITY);
    assert_eq!(gaussian_weight(1.0, sigma), 0.0);
}

// ============================================================================
// Log-Space Arithmetic
// ============================================================================

#[test]
fn test_log1pexp() {
    assert_relative_eq!(log1pexp(0.0), 2.0f64.ln());
    assert_eq!(log1pexp(50.0), 50.0);
    assert_relative_eq!(log1pexp(-40.0), (-40.0f64).exp(), max_relative = 1e-10);
}

#[test]
fn test_logspace_add() {
    assert_relative_eq!(logspace_add(2.0f64.ln(), 3.0f64.ln()), 5.0f64.ln(), epsilon = 1e-12);
    assert_relative_eq!(logspace_add(3.0f64.ln(), 2.0f64.ln()), 5.0f64.ln(), epsilon = 1e-12);
}

#[test]
fn test_logspace_add_negative_infinity() {
    assert_eq!(logspace_add(f64::NEG_INFINITY, -3.0), -3.0);
    assert_eq!(logspace_add(-3.0, f64::NEG_INFINITY), -3.0);
    assert_eq!(
        logspace_add(f64::NEG_INFINITY, f64::NEG_INFINITY),
        f64::NEG_INFINITY
    );
}

#[test]
fn test_logspace_add_no_underflow() {
    // exp(-1000) underflows; the log-space sum must not.
    assert_relative_eq!(
        logspace_add(-1000.0, -1000.0),
        -1000.0 + 2.0f64.ln(),
        epsilon = 1e-9
    );
}

#[test]
fn test_logspace_add_propagates_nan() {
    assert!(logspace_add(f64::NAN, 1.0).is_nan());
    assert!(logspace_add(1.0, f64::NAN).is_nan());
}

#[test]
fn test_logsumexp() {
    let empty: [f64; 0] = [];
    assert_eq!(logsumexp(empty), f64::NEG_INFINITY);
    assert_eq!(logsumexp([-2.5]), -2.5);
    assert_relative_eq!(logsumexp([0.0, 0.0, 0.0]), 3.0f64.ln(), epsilon = 1e-12);
}

#[test]
fn test_logsumexp_order_independent() {
    let a = logsumexp([0.0, -1.0, -5.0, -0.25]);
    let b = logsumexp([-5.0, -0.25, 0.0, -1.0]);
    assert_relative_eq!(a, b, epsilon = 1e-12);

    let direct = (1.0 + (-1.0f64).exp() + (-5.0f64).exp() + (-0.25f64).exp()).ln();
    assert_relative_eq!(a, direct, epsilon = 1e-12);
}
