//! Geographic value types for the planner.
//!
//! Coordinates are WGS84 decimal degrees. `Path` stores route geometry as
//! decoded points; encoding to a compact polyline format, when a frontend
//! wants one, happens at the API boundary, not here.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A committed destination in the working set.
///
/// Created when a search suggestion is resolved to a coordinate; owned
/// exclusively by the planning session that holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Unique within a planning session.
    pub id: String,
    pub name: String,
    pub address: String,
    pub location: GeoPoint,
}

impl Place {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        location: GeoPoint,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
            location,
        }
    }

    /// Promote a search suggestion to a Place.
    ///
    /// Returns `None` when the suggestion carries no coordinate, since a
    /// Place without a location cannot be routed.
    pub fn from_suggestion(id: impl Into<String>, suggestion: &PlaceSuggestion) -> Option<Self> {
        let location = suggestion.location()?;
        Some(Self::new(
            id,
            suggestion.name.clone(),
            suggestion.description.clone(),
            location,
        ))
    }
}

/// One entry from the place-search service.
///
/// Coordinates are optional: some suggestions are category or keyword
/// hints rather than concrete places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    pub name: String,
    pub description: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl PlaceSuggestion {
    pub fn location(&self) -> Option<GeoPoint> {
        Some(GeoPoint::new(self.lat?, self.lon?))
    }
}

/// Route geometry as a decoded coordinate sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    points: Vec<GeoPoint>,
}

impl Path {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Append another path's points, for flattening per-segment
    /// geometries into one plan-wide line.
    pub fn extend_from(&mut self, other: &Path) {
        self.points.extend_from_slice(&other.points);
    }

    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }
}
