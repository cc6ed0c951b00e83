//! Live-navigation tracking over a computed RoutePlan.
//!
//! `NavigationTracker` is a pure state machine: it consumes position
//! fixes and explicit start/stop commands and nothing else. There is no
//! timer-based advancement, so a vehicle that never comes within the
//! arrival threshold of a waypoint never advances past it. Subscription
//! wiring lives in [`crate::session`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::haversine;
use crate::place::Place;
use crate::resolver::RoutePlan;
use crate::traits::{PositionError, PositionFix};

/// A waypoint counts as reached within this many meters.
pub const ARRIVAL_THRESHOLD_M: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Idle,
    Navigating,
    Arrived,
}

/// Per-fix navigation snapshot handed to consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationState {
    /// Index of the segment currently being driven, 0-based into
    /// `RoutePlan::segments`; the target waypoint is
    /// `route[current_index + 1]`.
    pub current_index: usize,
    pub distance_to_next_m: f64,
    pub instruction: String,
    pub navigating: bool,
    /// Last reported ground speed, meters/second, never negative.
    pub speed_mps: f64,
    pub completed: bool,
}

/// Emitted by the tracker in response to a fix.
#[derive(Debug, Clone, PartialEq)]
pub enum NavEvent {
    /// Fresh snapshot after processing a fix.
    Updated(NavigationState),
    /// The vehicle came within the arrival threshold of this waypoint.
    WaypointReached(Place),
    /// The final waypoint was reached; the tracker is now Arrived.
    Completed,
}

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("navigation needs a plan with at least two places")]
    TooFewStops,
    #[error(transparent)]
    Position(#[from] PositionError),
}

/// State machine over {Idle, Navigating, Arrived}.
#[derive(Debug)]
pub struct NavigationTracker {
    plan: RoutePlan,
    state: NavState,
    snapshot: NavigationState,
}

impl NavigationTracker {
    /// Start command: Idle -> Navigating.
    ///
    /// Requires a plan with at least two places; estimate-only plans are
    /// accepted, navigation then runs on waypoint proximity alone.
    pub fn start(plan: RoutePlan) -> Result<Self, NavigationError> {
        if plan.route.len() < 2 {
            return Err(NavigationError::TooFewStops);
        }
        info!(stops = plan.route.len(), "navigation started");
        Ok(Self {
            plan,
            state: NavState::Navigating,
            snapshot: NavigationState {
                current_index: 0,
                distance_to_next_m: 0.0,
                instruction: String::new(),
                navigating: true,
                speed_mps: 0.0,
                completed: false,
            },
        })
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn snapshot(&self) -> &NavigationState {
        &self.snapshot
    }

    pub fn plan(&self) -> &RoutePlan {
        &self.plan
    }

    /// The waypoint currently being driven toward, if any.
    pub fn next_stop(&self) -> Option<&Place> {
        if self.state == NavState::Navigating {
            self.plan.route.get(self.snapshot.current_index + 1)
        } else {
            None
        }
    }

    /// Advance the state machine with one position fix.
    ///
    /// Fixes delivered outside the Navigating state are ignored. A fix
    /// advances `current_index` at most once, so repeated fixes inside
    /// the threshold of an already-reached waypoint cannot double-count.
    pub fn on_fix(&mut self, fix: &PositionFix) -> Vec<NavEvent> {
        if self.state != NavState::Navigating {
            return Vec::new();
        }

        let mut events = Vec::new();
        self.snapshot.speed_mps = fix.speed_mps.unwrap_or(0.0).max(0.0);

        let target = self.plan.route[self.snapshot.current_index + 1].clone();
        let mut distance = haversine::distance_m(fix.location, target.location);

        if distance < ARRIVAL_THRESHOLD_M {
            self.snapshot.current_index += 1;
            info!(waypoint = %target.name, "waypoint reached");
            events.push(NavEvent::WaypointReached(target));

            if self.snapshot.current_index == self.plan.route.len() - 1 {
                self.state = NavState::Arrived;
                self.snapshot.navigating = false;
                self.snapshot.completed = true;
                self.snapshot.distance_to_next_m = distance;
                self.snapshot.instruction = "arrived".to_string();
                info!("navigation complete");
                events.push(NavEvent::Updated(self.snapshot.clone()));
                events.push(NavEvent::Completed);
                return events;
            }

            let next = &self.plan.route[self.snapshot.current_index + 1];
            distance = haversine::distance_m(fix.location, next.location);
        }

        self.snapshot.distance_to_next_m = distance;
        self.snapshot.instruction = instruction_for(distance);
        events.push(NavEvent::Updated(self.snapshot.clone()));
        events
    }

    /// Stop command: any state -> Idle. Idempotent.
    pub fn stop(&mut self) {
        if self.state != NavState::Idle {
            info!("navigation stopped");
        }
        self.state = NavState::Idle;
        self.snapshot.navigating = false;
    }
}

/// Turn-instruction text banded by distance to the next waypoint.
fn instruction_for(meters: f64) -> String {
    if meters > 1000.0 {
        format!("continue for {:.1} km", meters / 1000.0)
    } else if meters > 100.0 {
        format!("continue for {} m", meters.round() as i64)
    } else {
        format!("arriving, {} m", meters.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_bands() {
        assert_eq!(instruction_for(2540.0), "continue for 2.5 km");
        assert_eq!(instruction_for(512.4), "continue for 512 m");
        assert_eq!(instruction_for(100.0), "arriving, 100 m");
        assert_eq!(instruction_for(62.0), "arriving, 62 m");
    }
}
