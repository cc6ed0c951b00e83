//! Segment resolver tests
//!
//! Covers full resolution, per-leg failure (degraded plans), and the
//! straight-line fallback when no leg resolves.

use std::cell::RefCell;
use std::collections::VecDeque;

use delivery_planner::haversine;
use delivery_planner::place::{GeoPoint, Path, Place};
use delivery_planner::resolver::resolve;
use delivery_planner::traits::{RouteLeg, RoutingError, RoutingService};

// ============================================================================
// Test Fixtures
// ============================================================================

enum Outcome {
    Leg(RouteLeg),
    Fail,
}

/// Routing service that replays a scripted outcome per call and records
/// the requested endpoints.
struct MockRouting {
    script: RefCell<VecDeque<Outcome>>,
    calls: RefCell<Vec<(GeoPoint, GeoPoint)>>,
}

impl MockRouting {
    fn new(script: Vec<Outcome>) -> Self {
        Self {
            script: RefCell::new(script.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(GeoPoint, GeoPoint)> {
        self.calls.borrow().clone()
    }
}

impl RoutingService for MockRouting {
    fn route(&self, from: GeoPoint, to: GeoPoint) -> Result<RouteLeg, RoutingError> {
        self.calls.borrow_mut().push((from, to));
        match self
            .script
            .borrow_mut()
            .pop_front()
            .expect("more routing calls than scripted")
        {
            Outcome::Leg(leg) => Ok(leg),
            Outcome::Fail => Err(RoutingError::EmptyResponse),
        }
    }
}

fn place(id: &str, lat: f64, lon: f64) -> Place {
    Place::new(id, id, "", GeoPoint::new(lat, lon))
}

fn leg(distance_m: f64, duration_secs: f64, path: &[(f64, f64)]) -> Outcome {
    Outcome::Leg(RouteLeg {
        distance_m,
        duration_secs,
        path: Path::new(path.iter().map(|&(lat, lon)| GeoPoint::new(lat, lon)).collect()),
        guide: vec!["turn left".to_string()],
    })
}

// ============================================================================
// Full resolution
// ============================================================================

#[test]
fn all_legs_resolved_yields_navigable_plan() {
    let ordered = vec![
        place("start", 17.40, 102.80),
        place("a", 17.41, 102.79),
        place("b", 17.39, 102.81),
    ];
    let service = MockRouting::new(vec![
        leg(1500.0, 61.0, &[(17.40, 102.80), (17.41, 102.79)]),
        leg(2500.0, 58.0, &[(17.41, 102.79), (17.39, 102.81)]),
    ]);

    let plan = resolve(ordered, &service);

    assert!(plan.has_navigation);
    assert_eq!(plan.route.len(), 3);
    assert_eq!(plan.segments.len(), plan.route.len() - 1);
    assert!(plan.unreachable.is_empty());
    assert!((plan.total_distance_km - 4.0).abs() < 1e-9);

    // 61s + 58s = 119s: rounded up once at the end, not per segment.
    assert_eq!(plan.total_duration_min, 2);

    // Flattened geometry is the concatenation of segment paths.
    assert_eq!(plan.path.len(), 4);
    assert_eq!(service.calls().len(), 2);
}

#[test]
fn total_distance_matches_segment_sum() {
    let ordered = vec![
        place("start", 17.40, 102.80),
        place("a", 17.41, 102.79),
        place("b", 17.39, 102.81),
        place("c", 17.42, 102.82),
    ];
    let service = MockRouting::new(vec![
        leg(1234.0, 100.0, &[]),
        leg(987.0, 200.0, &[]),
        leg(4321.0, 300.0, &[]),
    ]);

    let plan = resolve(ordered, &service);
    let sum: f64 = plan.segments.iter().map(|s| s.distance_km).sum();
    assert!((plan.total_distance_km - sum).abs() < 1e-9);
}

#[test]
fn segments_connect_consecutive_route_places() {
    let ordered = vec![
        place("start", 17.40, 102.80),
        place("a", 17.41, 102.79),
        place("b", 17.39, 102.81),
    ];
    let service = MockRouting::new(vec![leg(1000.0, 60.0, &[]), leg(1000.0, 60.0, &[])]);

    let plan = resolve(ordered, &service);
    for (i, segment) in plan.segments.iter().enumerate() {
        assert_eq!(segment.from.id, plan.route[i].id);
        assert_eq!(segment.to.id, plan.route[i + 1].id);
    }
}

// ============================================================================
// Partial failure: unreachable stops are dropped from the route
// ============================================================================

#[test]
fn failed_leg_drops_destination_and_reroutes_from_last_reached() {
    let start = place("start", 17.40, 102.80);
    let d1 = place("d1", 17.41, 102.79);
    let d2 = place("d2", 17.39, 102.81);
    let d3 = place("d3", 17.42, 102.82);
    let service = MockRouting::new(vec![
        leg(1000.0, 60.0, &[]),
        Outcome::Fail,
        leg(3000.0, 240.0, &[]),
    ]);

    let plan = resolve(vec![start, d1.clone(), d2.clone(), d3.clone()], &service);

    // d2 is dropped from the route, keeping the pairing invariant.
    let ids: Vec<&str> = plan.route.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["start", "d1", "d3"]);
    assert_eq!(plan.segments.len(), plan.route.len() - 1);

    assert_eq!(plan.unreachable.len(), 1);
    assert_eq!(plan.unreachable[0].place.id, "d2");

    // One resolved leg is enough to keep the plan navigable.
    assert!(plan.has_navigation);

    // The leg after the failure starts from d1, the last place reached.
    let calls = service.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[2].0, d1.location);
    assert_eq!(calls[2].1, d3.location);
}

#[test]
fn two_of_three_legs_resolved_keeps_exactly_two_segments() {
    // Service succeeds for 2 of 3 requested legs.
    let ordered = vec![
        place("start", 17.40, 102.80),
        place("a", 17.41, 102.79),
        place("b", 17.39, 102.81),
        place("c", 17.42, 102.82),
    ];
    let service = MockRouting::new(vec![
        leg(1000.0, 60.0, &[]),
        leg(2000.0, 120.0, &[]),
        Outcome::Fail,
    ]);

    let plan = resolve(ordered, &service);
    assert_eq!(plan.segments.len(), 2);
    assert!(plan.has_navigation, "partial failure must not force the estimate flag");
}

// ============================================================================
// Total failure: straight-line fallback
// ============================================================================

#[test]
fn every_leg_failed_falls_back_to_straight_line_plan() {
    let start = place("start", 17.40, 102.80);
    let a = place("a", 17.41, 102.79);
    let b = place("b", 17.39, 102.81);
    let service = MockRouting::new(vec![Outcome::Fail, Outcome::Fail]);

    let plan = resolve(vec![start.clone(), a.clone(), b.clone()], &service);

    assert!(!plan.has_navigation);
    // The full route survives; nothing is dropped in the fallback.
    assert_eq!(plan.route.len(), 3);
    assert_eq!(plan.segments.len(), 2);
    assert!(plan.unreachable.is_empty());

    // Distances are haversine between consecutive places.
    let d0 = haversine::distance_km(start.location, a.location);
    let d1 = haversine::distance_km(a.location, b.location);
    assert!((plan.segments[0].distance_km - d0).abs() < 1e-9);
    assert!((plan.segments[1].distance_km - d1).abs() < 1e-9);
    assert!((plan.total_distance_km - (d0 + d1)).abs() < 1e-9);

    // Durations are ceil(km * 3) minutes, a fixed 20 km/h assumption.
    assert_eq!(plan.segments[0].duration_minutes(), (d0 * 3.0).ceil() as u32);
    assert_eq!(plan.segments[1].duration_minutes(), (d1 * 3.0).ceil() as u32);

    // No road geometry in an estimate-only plan.
    assert!(plan.path.is_empty());
}
