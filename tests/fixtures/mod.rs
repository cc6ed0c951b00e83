//! Test fixtures for delivery-planner.
//!
//! Provides realistic test data: real Udon Thani locations (the
//! planner's original operating area) for sequencing and navigation
//! scenarios.

pub mod udon_thani_locations;

pub use udon_thani_locations::*;
