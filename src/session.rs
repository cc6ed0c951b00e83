//! Planning and navigation sessions.
//!
//! `PlanningSession` owns the working set of places and produces route
//! plans; `NavigationSession` couples a tracker to a position watch and
//! guarantees the watch is released on every exit path (stop command,
//! completion, or drop). Only one watch exists per navigation session,
//! and no fix is processed after `stop` returns.

use std::sync::{Arc, Mutex};

use thiserror::Error;
use tracing::warn;

use crate::navigator::{NavEvent, NavigationError, NavigationState, NavigationTracker};
use crate::place::Place;
use crate::resolver::{self, RoutePlan};
use crate::sequencer;
use crate::traits::{FixSink, PositionSource, RoutingService, WatchHandle, WatchOptions};

/// Working-set cap, matching the provider's practical marker limit.
pub const MAX_PLACES: usize = 60;

/// Input validation failures, rejected before any network activity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("at least one destination is required")]
    NoDestinations,
    #[error("at most {max} places per session")]
    TooManyPlaces { max: usize },
    #[error("a place with this id or these coordinates is already in the set")]
    DuplicatePlace,
}

/// The working set for one planning run: a start place plus destinations.
///
/// Replaced wholesale on reset; nothing here is shared across sessions.
#[derive(Debug, Clone)]
pub struct PlanningSession {
    start: Place,
    destinations: Vec<Place>,
}

impl PlanningSession {
    pub fn new(start: Place) -> Self {
        Self {
            start,
            destinations: Vec::new(),
        }
    }

    pub fn start_place(&self) -> &Place {
        &self.start
    }

    pub fn destinations(&self) -> &[Place] {
        &self.destinations
    }

    /// Add a destination.
    ///
    /// Rejects ids and coordinates already present (including the
    /// start), keeping ids unique within the session, and enforces
    /// [`MAX_PLACES`] counting the start.
    pub fn add_place(&mut self, place: Place) -> Result<(), PlanError> {
        if self.destinations.len() + 1 >= MAX_PLACES {
            return Err(PlanError::TooManyPlaces { max: MAX_PLACES });
        }
        let duplicate = self.start.location == place.location
            || self.start.id == place.id
            || self
                .destinations
                .iter()
                .any(|existing| {
                    existing.location == place.location || existing.id == place.id
                });
        if duplicate {
            return Err(PlanError::DuplicatePlace);
        }
        self.destinations.push(place);
        Ok(())
    }

    /// Remove a destination by id. Returns whether anything was removed.
    pub fn remove_place(&mut self, id: &str) -> bool {
        let before = self.destinations.len();
        self.destinations.retain(|place| place.id != id);
        self.destinations.len() != before
    }

    pub fn clear(&mut self) {
        self.destinations.clear();
    }

    /// Order the working set and resolve it into a RoutePlan.
    ///
    /// The only error here is input validation; routing failures degrade
    /// inside the resolver and always yield a usable plan.
    pub fn compute_route_plan<S: RoutingService>(
        &self,
        service: &S,
    ) -> Result<RoutePlan, PlanError> {
        if self.destinations.is_empty() {
            return Err(PlanError::NoDestinations);
        }
        let ordered = sequencer::sequence(self.start.clone(), &self.destinations);
        Ok(resolver::resolve(ordered, service))
    }
}

/// Consumer callbacks for a navigation session.
///
/// All default to no-ops; set only what you need.
pub struct NavigationCallbacks {
    on_update: Box<dyn FnMut(&NavigationState) + Send>,
    on_arrive: Box<dyn FnMut(&Place) + Send>,
    on_complete: Box<dyn FnMut() + Send>,
}

impl Default for NavigationCallbacks {
    fn default() -> Self {
        Self {
            on_update: Box::new(|_| {}),
            on_arrive: Box::new(|_| {}),
            on_complete: Box::new(|| {}),
        }
    }
}

impl NavigationCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_update(mut self, f: impl FnMut(&NavigationState) + Send + 'static) -> Self {
        self.on_update = Box::new(f);
        self
    }

    pub fn on_arrive(mut self, f: impl FnMut(&Place) + Send + 'static) -> Self {
        self.on_arrive = Box::new(f);
        self
    }

    pub fn on_complete(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_complete = Box::new(f);
        self
    }
}

struct SessionInner {
    tracker: NavigationTracker,
    callbacks: NavigationCallbacks,
    handle: Option<Box<dyn WatchHandle>>,
    stopped: bool,
}


/// A running navigation session; dropping it stops navigation.
pub struct NavigationSession {
    inner: Arc<Mutex<SessionInner>>,
}

/// Start navigating `plan` against a live position stream.
///
/// Opens the watch and drives the tracker from its fixes, dispatching
/// `callbacks` per event. Reaching the final waypoint cancels the watch
/// from inside the sink, so no session ever leaves one dangling.
pub fn start_navigation<S: PositionSource>(
    plan: RoutePlan,
    source: &S,
    options: WatchOptions,
    callbacks: NavigationCallbacks,
) -> Result<NavigationSession, NavigationError> {
    let tracker = NavigationTracker::start(plan)?;
    let inner = Arc::new(Mutex::new(SessionInner {
        tracker,
        callbacks,
        handle: None,
        stopped: false,
    }));

    // A cancel implementation is allowed to wait for an in-flight fix
    // delivery, so the session lock must never be held across cancel:
    // the delivery itself takes that lock.
    let sink_inner = Arc::clone(&inner);
    let sink: FixSink = Box::new(move |fix| {
        let released = {
            let Ok(mut guard) = sink_inner.lock() else {
                return;
            };
            if guard.stopped {
                return;
            }

            let events = guard.tracker.on_fix(&fix);
            let mut completed = false;
            for event in events {
                match event {
                    NavEvent::Updated(state) => (guard.callbacks.on_update)(&state),
                    NavEvent::WaypointReached(place) => (guard.callbacks.on_arrive)(&place),
                    NavEvent::Completed => completed = true,
                }
            }

            if completed {
                (guard.callbacks.on_complete)();
                guard.stopped = true;
                guard.handle.take()
            } else {
                None
            }
        };
        if let Some(mut handle) = released {
            handle.cancel();
        }
    });

    let handle = source.watch(options, sink).map_err(NavigationError::Position)?;

    let mut leftover = Some(handle);
    if let Ok(mut guard) = inner.lock() {
        if !guard.stopped {
            guard.handle = leftover.take();
        }
    }
    // Completed (or poisoned) before the handle was installed.
    if let Some(mut handle) = leftover {
        handle.cancel();
    }

    Ok(NavigationSession { inner })
}

impl NavigationSession {
    /// Stop command. Cancels the watch before returning, so no fix is
    /// processed afterwards. Idempotent across all states.
    pub fn stop(&self) {
        let released = {
            let Ok(mut guard) = self.inner.lock() else {
                warn!("navigation session lock poisoned during stop");
                return;
            };
            guard.stopped = true;
            guard.tracker.stop();
            guard.handle.take()
        };
        // Cancel outside the lock: the watch may be mid-delivery and
        // waiting on it. The stopped flag already voids any fix that
        // slips in before cancel completes.
        if let Some(mut handle) = released {
            handle.cancel();
        }
    }

    /// Whether the session is still consuming fixes.
    pub fn is_active(&self) -> bool {
        self.inner.lock().map(|guard| !guard.stopped).unwrap_or(false)
    }

    /// Current tracker snapshot.
    pub fn state(&self) -> Option<NavigationState> {
        self.inner
            .lock()
            .ok()
            .map(|guard| guard.tracker.snapshot().clone())
    }

    /// The waypoint currently being driven toward.
    pub fn next_stop(&self) -> Option<Place> {
        self.inner
            .lock()
            .ok()
            .and_then(|guard| guard.tracker.next_stop().cloned())
    }
}

impl Drop for NavigationSession {
    fn drop(&mut self) {
        self.stop();
    }
}
