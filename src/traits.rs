//! Service seams for the planner core.
//!
//! The mapping provider and the device position stream live behind these
//! traits so the core stays testable without network or hardware. The
//! `longdo` module provides the production implementations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::place::{GeoPoint, Path, PlaceSuggestion};

/// One resolved point-to-point driving leg from the routing service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub distance_m: f64,
    pub duration_secs: f64,
    /// Road geometry between the two points; may be empty.
    pub path: Path,
    /// Turn-guidance text, in request order; may be empty.
    pub guide: Vec<String>,
}

/// Failure of a single routing request.
///
/// Recovered locally by the segment resolver; never fatal to a plan.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("routing service returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("routing service returned no usable route")]
    EmptyResponse,
}

/// Point-to-point driving-route provider.
pub trait RoutingService {
    fn route(&self, from: GeoPoint, to: GeoPoint) -> Result<RouteLeg, RoutingError>;
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("search service returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Keyword place search, used to construct `Place` instances.
pub trait PlaceSearch {
    fn suggest(&self, keyword: &str) -> Result<Vec<PlaceSuggestion>, SearchError>;
}

/// A single reported device position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub location: GeoPoint,
    /// Ground speed in meters/second, when the provider reports one.
    pub speed_mps: Option<f64>,
    /// Provider timestamp, milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
}

/// Options passed when opening a position watch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    /// Per-fix acquisition timeout in milliseconds.
    pub timeout_ms: u32,
    /// Maximum acceptable age of a cached fix in milliseconds.
    pub maximum_age_ms: u32,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 5000,
            maximum_age_ms: 0,
        }
    }
}

/// Failure of the position stream.
///
/// Fatal to the navigation session only; the planning session is
/// unaffected.
#[derive(Debug, Error)]
pub enum PositionError {
    #[error("position access denied")]
    PermissionDenied,
    #[error("position hardware unavailable")]
    Unavailable,
    #[error("position acquisition timed out")]
    Timeout,
}

/// Cancellation handle for an open position watch.
///
/// `cancel` must take effect before it returns: no fix may be delivered
/// to the sink afterwards. Must be idempotent. It may be invoked from
/// the fix-delivery context itself (a completed navigation cancels from
/// inside the sink), so an implementation that joins its delivery
/// thread must not block on that thread when called from it.
pub trait WatchHandle: Send {
    fn cancel(&mut self);
}

/// Receives fixes from an open watch.
pub type FixSink = Box<dyn FnMut(PositionFix) + Send>;

/// Long-lived position-fix stream, in the style of a geolocation watch.
pub trait PositionSource {
    fn watch(
        &self,
        options: WatchOptions,
        sink: FixSink,
    ) -> Result<Box<dyn WatchHandle>, PositionError>;
}
