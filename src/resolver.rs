//! Segment resolution: an ordered visiting sequence becomes a RoutePlan.
//!
//! Each consecutive pair is resolved against the routing service one at a
//! time, so a failed leg can be skipped without losing the legs already
//! resolved. When no leg resolves at all, the whole plan falls back to
//! straight-line estimates.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::haversine;
use crate::place::{Path, Place};
use crate::traits::{RoutingError, RoutingService};

/// Straight-line duration estimate: 20 km/h, i.e. 180 seconds per km.
const ESTIMATE_SECS_PER_KM: f64 = 180.0;

/// One travel leg between consecutive waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub from: Place,
    pub to: Place,
    pub distance_km: f64,
    /// Raw duration. Minute values are always derived by rounding up;
    /// plan totals round the summed seconds, not per-segment minutes.
    pub duration_secs: f64,
    /// Road geometry for this leg; empty for straight-line estimates.
    pub path: Path,
    /// Turn-guidance text; empty for straight-line estimates.
    pub guide: Vec<String>,
}

impl RouteSegment {
    /// Leg duration in whole minutes, rounded up.
    pub fn duration_minutes(&self) -> u32 {
        (self.duration_secs / 60.0).ceil() as u32
    }
}

/// A destination dropped from the plan because its inbound leg could not
/// be resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnreachableStop {
    pub place: Place,
    pub reason: String,
}

/// Outcome of resolving a single leg.
#[derive(Debug)]
pub enum SegmentOutcome {
    Resolved(RouteSegment),
    Failed { to: Place, reason: RoutingError },
}

/// The computed plan handed to rendering, export, and navigation.
///
/// Invariants: `segments.len() == route.len() - 1` for any non-empty
/// route; `total_distance_km` equals the sum of segment distances within
/// floating rounding; `total_duration_min` is the summed segment seconds
/// rounded up once at the end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    /// Visiting order; first element is the start.
    pub route: Vec<Place>,
    pub segments: Vec<RouteSegment>,
    pub total_distance_km: f64,
    pub total_duration_min: u32,
    /// True when the segments came from the routing service; false for
    /// straight-line estimates.
    pub has_navigation: bool,
    /// Flattened segment geometry for map rendering; empty when
    /// estimated.
    pub path: Path,
    /// Destinations dropped from `route` because their leg failed.
    pub unreachable: Vec<UnreachableStop>,
}

impl RoutePlan {
    fn without_segments(route: Vec<Place>) -> Self {
        Self {
            route,
            segments: Vec::new(),
            total_distance_km: 0.0,
            total_duration_min: 0,
            has_navigation: false,
            path: Path::default(),
            unreachable: Vec::new(),
        }
    }
}

/// Resolve every consecutive pair of `ordered` into a RoutePlan.
///
/// Legs are requested strictly one at a time. A failed leg drops its
/// destination from the plan (recorded in `unreachable`) and the next
/// request starts from the last place actually reached, so the
/// `segments.len() == route.len() - 1` invariant holds in every outcome.
/// If no leg resolves at all, the full straight-line fallback plan is
/// returned instead. A sequence of fewer than two places yields an empty
/// plan without any network call.
pub fn resolve<S: RoutingService>(ordered: Vec<Place>, service: &S) -> RoutePlan {
    if ordered.len() < 2 {
        return RoutePlan::without_segments(ordered);
    }

    let start = ordered[0].clone();
    let mut outcomes = Vec::with_capacity(ordered.len() - 1);
    let mut anchor = start.clone();

    for to in ordered.iter().skip(1) {
        match service.route(anchor.location, to.location) {
            Ok(leg) => {
                outcomes.push(SegmentOutcome::Resolved(RouteSegment {
                    from: anchor.clone(),
                    to: to.clone(),
                    distance_km: leg.distance_m / 1000.0,
                    duration_secs: leg.duration_secs,
                    path: leg.path,
                    guide: leg.guide,
                }));
                anchor = to.clone();
            }
            Err(reason) => {
                warn!(
                    from = %anchor.id,
                    to = %to.id,
                    error = %reason,
                    "skipping unresolvable leg"
                );
                outcomes.push(SegmentOutcome::Failed {
                    to: to.clone(),
                    reason,
                });
            }
        }
    }

    if !outcomes
        .iter()
        .any(|outcome| matches!(outcome, SegmentOutcome::Resolved(_)))
    {
        info!("no leg resolved, falling back to straight-line estimates");
        return straight_line_plan(ordered);
    }

    aggregate(start, outcomes)
}

/// Fold resolved-or-failed leg outcomes into a navigable plan.
fn aggregate(start: Place, outcomes: Vec<SegmentOutcome>) -> RoutePlan {
    let mut route = vec![start];
    let mut segments = Vec::new();
    let mut unreachable = Vec::new();
    let mut total_km = 0.0;
    let mut total_secs = 0.0;
    let mut path = Path::default();

    for outcome in outcomes {
        match outcome {
            SegmentOutcome::Resolved(segment) => {
                total_km += segment.distance_km;
                total_secs += segment.duration_secs;
                path.extend_from(&segment.path);
                route.push(segment.to.clone());
                segments.push(segment);
            }
            SegmentOutcome::Failed { to, reason } => {
                unreachable.push(UnreachableStop {
                    place: to,
                    reason: reason.to_string(),
                });
            }
        }
    }

    RoutePlan {
        route,
        segments,
        total_distance_km: total_km,
        total_duration_min: (total_secs / 60.0).ceil() as u32,
        has_navigation: true,
        path,
        unreachable,
    }
}

/// Build the estimate-only plan: haversine distances and a fixed 20 km/h
/// duration assumption for every consecutive pair.
pub fn straight_line_plan(ordered: Vec<Place>) -> RoutePlan {
    if ordered.len() < 2 {
        return RoutePlan::without_segments(ordered);
    }

    let mut segments = Vec::with_capacity(ordered.len() - 1);
    let mut total_km = 0.0;
    let mut total_secs = 0.0;

    for pair in ordered.windows(2) {
        let distance_km = haversine::distance_km(pair[0].location, pair[1].location);
        let duration_secs = distance_km * ESTIMATE_SECS_PER_KM;
        total_km += distance_km;
        total_secs += duration_secs;
        segments.push(RouteSegment {
            from: pair[0].clone(),
            to: pair[1].clone(),
            distance_km,
            duration_secs,
            path: Path::default(),
            guide: Vec::new(),
        });
    }

    RoutePlan {
        route: ordered,
        segments,
        total_distance_km: total_km,
        total_duration_min: (total_secs / 60.0).ceil() as u32,
        has_navigation: false,
        path: Path::default(),
        unreachable: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::place::GeoPoint;
    use crate::traits::RouteLeg;

    struct NeverCalled;

    impl RoutingService for NeverCalled {
        fn route(&self, _from: GeoPoint, _to: GeoPoint) -> Result<RouteLeg, RoutingError> {
            panic!("resolver must not call the service for < 2 places");
        }
    }

    fn place(id: &str, lat: f64, lon: f64) -> Place {
        Place::new(id, id, "", GeoPoint::new(lat, lon))
    }

    #[test]
    fn test_single_place_makes_no_network_call() {
        let plan = resolve(vec![place("start", 17.40, 102.80)], &NeverCalled);
        assert_eq!(plan.route.len(), 1);
        assert!(plan.segments.is_empty());
        assert_eq!(plan.total_distance_km, 0.0);
        assert_eq!(plan.total_duration_min, 0);
        assert!(!plan.has_navigation);
    }

    #[test]
    fn test_empty_sequence_makes_no_network_call() {
        let plan = resolve(Vec::new(), &NeverCalled);
        assert!(plan.route.is_empty());
        assert!(plan.segments.is_empty());
    }

    #[test]
    fn test_segment_duration_rounds_up() {
        let segment = RouteSegment {
            from: place("a", 17.40, 102.80),
            to: place("b", 17.41, 102.79),
            distance_km: 1.0,
            duration_secs: 61.0,
            path: Path::default(),
            guide: Vec::new(),
        };
        assert_eq!(segment.duration_minutes(), 2);
    }

    #[test]
    fn test_straight_line_duration_is_three_minutes_per_km() {
        // ~1.11 km apart along a meridian.
        let plan = straight_line_plan(vec![
            place("a", 17.40, 102.80),
            place("b", 17.41, 102.80),
        ]);
        let segment = &plan.segments[0];
        let expected = (segment.distance_km * 3.0).ceil() as u32;
        assert_eq!(segment.duration_minutes(), expected);
        assert!(!plan.has_navigation);
    }
}
