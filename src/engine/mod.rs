//! Layer 4: Engine
//!
//! # Purpose
//!
//! This layer orchestrates the kernels:
//! - Validates inputs before any numeric work
//! - Drives the per-anchor and per-cell kernels, sequentially or in parallel
//! - Assembles owned results
//!
//! # Architecture
//!
//! ```text
//! Layer 5: API
//!   ↓
//! Layer 4: Engine ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Sequential and parallel execution drivers.
pub mod executor;

/// Result types.
pub mod output;

/// Input validation.
pub mod validator;
