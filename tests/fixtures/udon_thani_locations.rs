//! Real Udon Thani locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap. All points lie inside the
//! city, a few hundred meters to a few kilometers apart, which matches
//! the distances a delivery round actually covers.

use delivery_planner::place::{GeoPoint, Place};

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn place(&self, id: &str) -> Place {
        Place::new(id, self.name, "Udon Thani", GeoPoint::new(self.lat, self.lon))
    }
}

// ============================================================================
// City-center landmarks (good start locations)
// ============================================================================

pub const LANDMARKS: &[Location] = &[
    Location::new("Thung Si Mueang", 17.4134, 102.7891),
    Location::new("Nong Prajak Park", 17.4178, 102.7826),
    Location::new("Udon Thani Railway Station", 17.4086, 102.8043),
    Location::new("City Pillar Shrine", 17.4129, 102.7905),
];

// ============================================================================
// Delivery stops around town
// ============================================================================

pub const DELIVERY_STOPS: &[Location] = &[
    Location::new("Central Plaza Udon Thani", 17.4172, 102.8025),
    Location::new("UD Town", 17.4065, 102.8056),
    Location::new("Udon Thani Hospital", 17.4047, 102.7925),
    Location::new("Big C Udon Thani", 17.3990, 102.8113),
    Location::new("Udon Thani International Airport", 17.3845, 102.7880),
    Location::new("Rajabhat University", 17.4223, 102.7931),
    Location::new("Provincial Hall", 17.4109, 102.7862),
    Location::new("Ban Huai Market", 17.4201, 102.7988),
];

/// Start at the city pillar with `n` delivery stops.
pub fn delivery_round(n: usize) -> (Place, Vec<Place>) {
    assert!(n <= DELIVERY_STOPS.len(), "only {} stops available", DELIVERY_STOPS.len());
    let start = LANDMARKS[0].place("start");
    let stops = DELIVERY_STOPS[..n]
        .iter()
        .enumerate()
        .map(|(i, loc)| loc.place(&format!("stop{}", i + 1)))
        .collect();
    (start, stops)
}
