//! Arbitrary output variables: channel registry and sample accumulators.

pub mod accumulator;
pub mod registry;
