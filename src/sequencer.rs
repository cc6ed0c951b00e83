//! Greedy nearest-neighbor visit ordering.
//!
//! Repeatedly appends the closest remaining destination to the current
//! position. A heuristic, not an optimal tour: for clustered stops it can
//! miss shorter orderings, which is an accepted trade for linear, fully
//! deterministic behavior.

use crate::haversine;
use crate::place::Place;

/// Order `destinations` into a visiting sequence beginning at `start`.
///
/// The result always has length `destinations.len() + 1` with `start`
/// first and every destination exactly once. Ties on distance keep the
/// first-encountered destination, so the output is deterministic for a
/// fixed input ordering. The input slice is not mutated.
pub fn sequence(start: Place, destinations: &[Place]) -> Vec<Place> {
    let mut route = Vec::with_capacity(destinations.len() + 1);
    let mut unvisited: Vec<Place> = destinations.to_vec();
    let mut current = start.location;

    route.push(start);

    while !unvisited.is_empty() {
        let mut nearest_index = 0;
        let mut shortest = f64::INFINITY;

        for (i, candidate) in unvisited.iter().enumerate() {
            let dist = haversine::distance_km(current, candidate.location);
            if dist < shortest {
                shortest = dist;
                nearest_index = i;
            }
        }

        let next = unvisited.remove(nearest_index);
        current = next.location;
        route.push(next);
    }

    route
}
