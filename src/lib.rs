//! delivery-planner core
//!
//! Route ordering, segment resolution, and live-navigation tracking for a
//! multi-stop delivery planner. The mapping provider (routing + place
//! search) and the device position stream are consumed through traits.

pub mod traits;
pub mod place;
pub mod haversine;
pub mod sequencer;
pub mod resolver;
pub mod navigator;
pub mod longdo;
pub mod session;
