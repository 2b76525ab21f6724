//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides pure mathematical functions used by both kernels:
//! - Distance geometry (squared distances, projections, line distances)
//! - Log-space Gaussian kernel arithmetic
//!
//! These are reusable building blocks with no algorithm-specific logic.
//!
//! # Architecture
//!
//! ```text
//! Layer 5: API
//!   ↓
//! Layer 4: Engine
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Squared distances, projections and line distances.
pub mod distance;

/// Log-space kernel arithmetic.
pub mod logspace;
