//! Common Test Utilities
//!
//! Shared fixtures for the optimizer tests:
//! - A small catalog with zero racial values so expected numbers stay simple
//! - A [`Fixture`] that owns request, catalog and params and hands out a
//!   borrowed [`SearchSpace`](crate::core::build_optimizer::SearchSpace)


pub use fixtures::*;
